use std::convert::Infallible;
use std::marker::PhantomData;
use std::rc::Rc;

use bytesize::ByteSize;
use log::debug;

use super::{Bindable, Handle, Mut, Object, Resource};
use crate::context::Context;
use crate::driver::BindingSlot;
use crate::error::{Error, ResourceKind, Result};
use crate::gl;

/// Binding target of a texture
pub trait TextureTarget: 'static {
    const TARGET: u32;
    const SLOT: BindingSlot;
    const NAME: &'static str;
}

/// `GL_TEXTURE_2D`
#[derive(Debug)]
pub enum Target2d {}

impl TextureTarget for Target2d {
    const TARGET: u32 = gl::TEXTURE_2D;
    const SLOT: BindingSlot = BindingSlot::Texture2d;
    const NAME: &'static str = "2D texture";
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Repeat = gl::REPEAT,
    MirroredRepeat = gl::MIRRORED_REPEAT,
    ClampToEdge = gl::CLAMP_TO_EDGE,
    ClampToBorder = gl::CLAMP_TO_BORDER,
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest = gl::NEAREST,
    Linear = gl::LINEAR,
    /// Minification only
    NearestMipmapNearest = gl::NEAREST_MIPMAP_NEAREST,
    /// Minification only
    LinearMipmapNearest = gl::LINEAR_MIPMAP_NEAREST,
    /// Minification only
    NearestMipmapLinear = gl::NEAREST_MIPMAP_LINEAR,
    /// Minification only
    LinearMipmapLinear = gl::LINEAR_MIPMAP_LINEAR,
}

/// Bytes per pixel of client data, `None` for combinations that cannot be
/// sized here
fn pixel_size(format: u32, ty: u32) -> Option<usize> {
    let packed = match ty {
        gl::UNSIGNED_BYTE_3_3_2 => Some(1),
        gl::UNSIGNED_SHORT_5_6_5 | gl::UNSIGNED_SHORT_4_4_4_4 | gl::UNSIGNED_SHORT_5_5_5_1 => {
            Some(2)
        }
        gl::UNSIGNED_INT_8_8_8_8
        | gl::UNSIGNED_INT_8_8_8_8_REV
        | gl::UNSIGNED_INT_2_10_10_10_REV
        | gl::UNSIGNED_INT_24_8
        | gl::UNSIGNED_INT_10F_11F_11F_REV
        | gl::UNSIGNED_INT_5_9_9_9_REV => Some(4),
        gl::FLOAT_32_UNSIGNED_INT_24_8_REV => Some(8),
        _ => None,
    };
    if packed.is_some() {
        return packed;
    }

    let component = match ty {
        gl::UNSIGNED_BYTE | gl::BYTE => 1,
        gl::UNSIGNED_SHORT | gl::SHORT | gl::HALF_FLOAT => 2,
        gl::UNSIGNED_INT | gl::INT | gl::FLOAT => 4,
        _ => return None,
    };
    let components = match format {
        gl::RED | gl::RED_INTEGER | gl::DEPTH_COMPONENT | gl::STENCIL_INDEX => 1,
        gl::RG | gl::RG_INTEGER => 2,
        gl::RGB | gl::BGR | gl::RGB_INTEGER | gl::BGR_INTEGER => 3,
        gl::RGBA | gl::BGRA | gl::RGBA_INTEGER | gl::BGRA_INTEGER => 4,
        _ => return None,
    };
    Some(component * components)
}

/// Bytes the driver reads from client memory for a `width` x `height` image,
/// following the current unpack row length, skips and row alignment
fn image_len(gl: &Context, width: usize, height: usize, pixel: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }

    let driver = gl.driver();
    let alignment = driver.unpack_parameter(gl::UNPACK_ALIGNMENT).max(1) as usize;
    let row_length = match driver.unpack_parameter(gl::UNPACK_ROW_LENGTH) {
        n if n > 0 => n as usize,
        _ => width,
    };
    let skip_pixels = driver.unpack_parameter(gl::UNPACK_SKIP_PIXELS).max(0) as usize;
    let skip_rows = driver.unpack_parameter(gl::UNPACK_SKIP_ROWS).max(0) as usize;

    let row = row_length.checked_mul(pixel)?;
    let stride = row.checked_add(alignment - 1)? / alignment * alignment;
    // The last row is not padded
    let last_row = skip_pixels.checked_add(width)?.checked_mul(pixel)?;
    stride
        .checked_mul(skip_rows.checked_add(height - 1)?)?
        .checked_add(last_row)
}

/// Reject uploads that would make the driver read past `pixels`
fn check_image(
    gl: &Context,
    width: i32,
    height: i32,
    format: u32,
    ty: u32,
    pixels: Option<&[u8]>,
) -> Result<()> {
    let invalid = |message: String| Error::InvalidArgument {
        op: "tex image 2d",
        message,
    };

    if width < 0 || height < 0 {
        return Err(invalid(format!("negative size {}x{}", width, height)));
    }

    let pixels = match pixels {
        Some(pixels) => pixels,
        None => return Ok(()),
    };

    let pixel = pixel_size(format, ty).ok_or_else(|| {
        invalid(format!(
            "cannot size pixel data of format 0x{:04x} and type 0x{:04x}",
            format, ty
        ))
    })?;
    let needed = image_len(gl, width as usize, height as usize, pixel)
        .ok_or_else(|| invalid(format!("{}x{} image is too large", width, height)))?;

    if pixels.len() < needed {
        return Err(invalid(format!(
            "{} of pixel data for a {}x{} image that reads {}",
            ByteSize(pixels.len() as u64),
            width,
            height,
            ByteSize(needed as u64)
        )));
    }

    Ok(())
}

/// Texture object kind for target `T`
pub struct Texture<T: TextureTarget>(Infallible, PhantomData<T>);

impl<T: TextureTarget> Resource for Texture<T> {
    const KIND: ResourceKind = ResourceKind::Texture;
    const NAME: &'static str = T::NAME;

    fn create(gl: &Context) -> Result<u32, String> {
        gl.driver().create_texture()
    }

    fn delete(gl: &Context, id: u32) {
        gl.driver().delete_texture(id)
    }
}

impl<T: TextureTarget> Bindable for Texture<T> {
    const SLOT: BindingSlot = T::SLOT;

    fn bind_raw(gl: &Context, id: u32) {
        gl.driver().bind_texture(T::TARGET, id)
    }
}

impl<T: TextureTarget> Handle<Texture<T>, Mut> {
    /// Specify the image at mip `level`; the texture must be bound
    ///
    /// `pixels` must hold the whole image as laid out by the current unpack
    /// state. This is checked whatever the [`Checks`](crate::Checks) say.
    #[allow(clippy::too_many_arguments)]
    pub fn img2d(
        &self,
        gl: &Context,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) -> Result<()> {
        let id = self.active(gl, "tex image 2d")?;
        check_image(gl, width, height, format, ty, pixels)?;
        debug!(
            "specifying {}x{} level {} of {} {} ({})",
            width,
            height,
            level,
            T::NAME,
            id,
            ByteSize(pixels.map_or(0, |p| p.len() as u64))
        );
        gl.driver().tex_image_2d(
            T::TARGET,
            level,
            internal_format,
            width,
            height,
            format,
            ty,
            pixels,
        );
        gl.check_error("tex image 2d")
    }

    /// Set an integer sampler parameter; the texture must be bound
    pub fn param(&self, gl: &Context, pname: u32, value: i32) -> Result<()> {
        self.active(gl, "tex parameter")?;
        gl.driver().tex_parameter_i32(T::TARGET, pname, value);
        gl.check_error("tex parameter")
    }

    pub fn wrap_s(&self, gl: &Context, wrap: Wrap) -> Result<()> {
        self.param(gl, gl::TEXTURE_WRAP_S, wrap as i32)
    }

    pub fn wrap_t(&self, gl: &Context, wrap: Wrap) -> Result<()> {
        self.param(gl, gl::TEXTURE_WRAP_T, wrap as i32)
    }

    pub fn wrap_s_t(&self, gl: &Context, wrap: Wrap) -> Result<()> {
        self.wrap_s(gl, wrap)?;
        self.wrap_t(gl, wrap)
    }

    pub fn mag_filter(&self, gl: &Context, filter: Filter) -> Result<()> {
        self.param(gl, gl::TEXTURE_MAG_FILTER, filter as i32)
    }

    pub fn min_filter(&self, gl: &Context, filter: Filter) -> Result<()> {
        self.param(gl, gl::TEXTURE_MIN_FILTER, filter as i32)
    }

    pub fn min_mag_filter(&self, gl: &Context, filter: Filter) -> Result<()> {
        self.mag_filter(gl, filter)?;
        self.min_filter(gl, filter)
    }

    /// Generate the mip chain from level 0; the texture must be bound
    pub fn gen_mipmaps(&self, gl: &Context) -> Result<()> {
        self.active(gl, "generate mipmap")?;
        gl.driver().generate_mipmap(T::TARGET);
        gl.check_error("generate mipmap")
    }
}

impl<T: TextureTarget> Object<Texture<T>> {
    /// Create a texture and specify its image, leaving the previous binding
    /// in place
    #[allow(clippy::too_many_arguments)]
    pub fn with_image(
        gl: &Rc<Context>,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) -> Result<Self> {
        let texture = Self::create(gl)?;
        {
            let _bound = texture.bind_scoped(gl)?;
            texture.img2d(
                gl,
                level,
                internal_format,
                width,
                height,
                format,
                ty,
                pixels,
            )?;
        }
        Ok(texture)
    }
}

pub type Texture2d = Object<Texture<Target2d>>;
pub type Texture2dRef = Handle<Texture<Target2d>, Mut>;
pub type Texture2dCRef = Handle<Texture<Target2d>>;
