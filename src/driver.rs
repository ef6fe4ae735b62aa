//! Driver entry points used by the wrappers
//!
//! Every wrapper method forwards to exactly one of these calls. The binding
//! slots of the context are never cached on this side: [`Driver::binding`]
//! asks the driver each time.

#[cfg(not(target_arch = "wasm32"))]
mod native;

#[cfg(test)]
pub(crate) mod mock;

use std::any::Any;
use std::fmt;

use crate::gl;

/// Per-target context state naming the currently active object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingSlot {
    ArrayBuffer,
    ElementArrayBuffer,
    Texture2d,
    /// Program in use for draw calls
    Program,
}

impl BindingSlot {
    /// `glGetIntegerv` parameter that reads this slot
    pub const fn query(self) -> u32 {
        match self {
            Self::ArrayBuffer => gl::ARRAY_BUFFER_BINDING,
            Self::ElementArrayBuffer => gl::ELEMENT_ARRAY_BUFFER_BINDING,
            Self::Texture2d => gl::TEXTURE_BINDING_2D,
            Self::Program => gl::CURRENT_PROGRAM,
        }
    }

    /// Slot written by binding to `target`
    pub fn from_target(target: u32) -> Option<Self> {
        Some(match target {
            gl::ARRAY_BUFFER => Self::ArrayBuffer,
            gl::ELEMENT_ARRAY_BUFFER => Self::ElementArrayBuffer,
            gl::TEXTURE_2D => Self::Texture2d,
            _ => return None,
        })
    }
}

impl fmt::Display for BindingSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::ArrayBuffer => "ARRAY_BUFFER_BINDING",
            Self::ElementArrayBuffer => "ELEMENT_ARRAY_BUFFER_BINDING",
            Self::Texture2d => "TEXTURE_BINDING_2D",
            Self::Program => "CURRENT_PROGRAM",
        })
    }
}

/// Immediate-mode driver calls, with object names as plain ids (0 is null)
///
/// Implementations assume their context is current on the calling thread.
///
/// The glow backend cannot name object 0: `shader_source`, `compile_shader`,
/// `attach_shader`, `detach_shader` and `link_program` drop a null id
/// instead of forwarding it, so with null checks off those calls raise no
/// driver error there. Binding calls do forward 0.
pub trait Driver {
    fn create_buffer(&self) -> Result<u32, String>;
    fn delete_buffer(&self, id: u32);
    fn bind_buffer(&self, target: u32, id: u32);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn buffer_data_size(&self, target: u32, size: i32, usage: u32);
    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]);

    fn create_shader(&self, stage: u32) -> Result<u32, String>;
    fn delete_shader(&self, id: u32);
    fn shader_source(&self, id: u32, source: &str);
    fn compile_shader(&self, id: u32);
    fn shader_compile_status(&self, id: u32) -> bool;
    fn shader_info_log(&self, id: u32) -> String;

    fn create_program(&self) -> Result<u32, String>;
    fn delete_program(&self, id: u32);
    fn attach_shader(&self, program: u32, shader: u32);
    fn detach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, id: u32);
    fn program_link_status(&self, id: u32) -> bool;
    fn program_info_log(&self, id: u32) -> String;
    /// -1 when `name` is not an active attribute
    fn attrib_location(&self, program: u32, name: &str) -> i32;
    /// -1 when `name` is not an active uniform
    fn uniform_location(&self, program: u32, name: &str) -> i32;
    fn use_program(&self, id: u32);
    /// `glUniform{1,2,3,4}f` depending on `values.len()`
    fn uniform_f32(&self, location: i32, values: &[f32]);
    /// `glUniform{1,2,3,4}i` depending on `values.len()`
    fn uniform_i32(&self, location: i32, values: &[i32]);
    fn uniform_matrix_4_f32(&self, location: i32, transpose: bool, values: &[f32; 16]);

    fn create_texture(&self) -> Result<u32, String>;
    fn delete_texture(&self, id: u32);
    fn bind_texture(&self, target: u32, id: u32);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    );
    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32);
    /// Current value of a `GL_UNPACK_*` pixel store parameter
    fn unpack_parameter(&self, pname: u32) -> i32;
    fn generate_mipmap(&self, target: u32);

    /// Id currently held by `slot`
    fn binding(&self, slot: BindingSlot) -> u32;
    /// Pop one error flag, `GL_NO_ERROR` when none is pending
    fn get_error(&self) -> u32;

    /// Concrete driver, for calls the wrappers do not cover
    fn as_any(&self) -> &dyn Any;
}
