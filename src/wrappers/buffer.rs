use std::convert::{Infallible, TryFrom};
use std::marker::PhantomData;
use std::rc::Rc;

use bytesize::ByteSize;
use log::debug;

use super::{Bindable, Handle, Mut, Object, Resource};
use crate::context::Context;
use crate::driver::BindingSlot;
use crate::error::{Error, ResourceKind, Result};
use crate::gl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessFrequency {
    /// Modified once, used a few times
    Stream,
    /// Modified once, used many times
    #[default]
    Static,
    /// Modified many times, used many times
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessNature {
    /// Modified by app, used in draw and spec commands
    #[default]
    Draw,
    /// Modified by reading from GL, used to return data to app
    Read,
    /// Modified by reading from GL, used in draw and spec commands
    Copy,
}

/// Buffer usage hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Usage {
    pub frequency: AccessFrequency,
    pub nature: AccessNature,
}

use AccessFrequency as Freq;
use AccessNature as Nat;

impl Usage {
    pub const STREAM_DRAW: Self = Self::new(Freq::Stream, Nat::Draw);
    pub const STATIC_DRAW: Self = Self::new(Freq::Static, Nat::Draw);
    pub const DYNAMIC_DRAW: Self = Self::new(Freq::Dynamic, Nat::Draw);

    pub const fn new(frequency: Freq, nature: Nat) -> Self {
        Self { frequency, nature }
    }

    pub const fn to_u32(self) -> u32 {
        match (self.frequency, self.nature) {
            (Freq::Stream, Nat::Draw) => gl::STREAM_DRAW,
            (Freq::Static, Nat::Draw) => gl::STATIC_DRAW,
            (Freq::Dynamic, Nat::Draw) => gl::DYNAMIC_DRAW,

            (Freq::Stream, Nat::Copy) => gl::STREAM_COPY,
            (Freq::Static, Nat::Copy) => gl::STATIC_COPY,
            (Freq::Dynamic, Nat::Copy) => gl::DYNAMIC_COPY,

            (Freq::Stream, Nat::Read) => gl::STREAM_READ,
            (Freq::Static, Nat::Read) => gl::STATIC_READ,
            (Freq::Dynamic, Nat::Read) => gl::DYNAMIC_READ,
        }
    }
}

/// Binding target of a buffer
pub trait BufferTarget: 'static {
    const TARGET: u32;
    const SLOT: BindingSlot;
    const NAME: &'static str;
}

/// Vertex attributes
#[derive(Debug)]
pub enum Array {}

/// Vertex array indices
#[derive(Debug)]
pub enum ElementArray {}

impl BufferTarget for Array {
    const TARGET: u32 = gl::ARRAY_BUFFER;
    const SLOT: BindingSlot = BindingSlot::ArrayBuffer;
    const NAME: &'static str = "array buffer";
}

impl BufferTarget for ElementArray {
    const TARGET: u32 = gl::ELEMENT_ARRAY_BUFFER;
    const SLOT: BindingSlot = BindingSlot::ElementArrayBuffer;
    const NAME: &'static str = "element array buffer";
}

/// Buffer object kind for target `T`
pub struct Buffer<T: BufferTarget>(Infallible, PhantomData<T>);

impl<T: BufferTarget> Resource for Buffer<T> {
    const KIND: ResourceKind = ResourceKind::Buffer;
    const NAME: &'static str = T::NAME;

    fn create(gl: &Context) -> Result<u32, String> {
        gl.driver().create_buffer()
    }

    fn delete(gl: &Context, id: u32) {
        gl.driver().delete_buffer(id)
    }
}

impl<T: BufferTarget> Bindable for Buffer<T> {
    const SLOT: BindingSlot = T::SLOT;

    fn bind_raw(gl: &Context, id: u32) {
        gl.driver().bind_buffer(T::TARGET, id)
    }
}

fn to_i32(op: &'static str, what: &str, value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::InvalidArgument {
        op,
        message: format!("{} {} does not fit in 32 bits", what, value),
    })
}

impl<T: BufferTarget> Handle<Buffer<T>, Mut> {
    /// Replace the contents of the buffer, which must be bound
    pub fn data(&self, gl: &Context, data: &[u8], usage: Usage) -> Result<()> {
        let id = self.active(gl, "buffer data")?;
        debug!(
            "uploading {} to {} {}",
            ByteSize(data.len() as u64),
            T::NAME,
            id
        );
        gl.driver().buffer_data(T::TARGET, data, usage.to_u32());
        gl.check_error("buffer data")
    }

    /// Replace the contents of the buffer with a slice of plain values
    pub fn data_of<P: bytemuck::Pod>(
        &self,
        gl: &Context,
        data: &[P],
        usage: Usage,
    ) -> Result<()> {
        self.data(gl, bytemuck::cast_slice(data), usage)
    }

    /// Allocate `size` bytes of uninitialized storage
    pub fn reserve(&self, gl: &Context, size: usize, usage: Usage) -> Result<()> {
        let id = self.active(gl, "buffer reserve")?;
        let size = to_i32("buffer reserve", "size", size)?;
        debug!("reserving {} for {} {}", ByteSize(size as u64), T::NAME, id);
        gl.driver()
            .buffer_data_size(T::TARGET, size, usage.to_u32());
        gl.check_error("buffer reserve")
    }

    /// Overwrite part of the existing storage
    pub fn sub_data(&self, gl: &Context, offset: usize, data: &[u8]) -> Result<()> {
        self.active(gl, "buffer sub data")?;
        let offset = to_i32("buffer sub data", "offset", offset)?;
        gl.driver().buffer_sub_data(T::TARGET, offset, data);
        gl.check_error("buffer sub data")
    }
}

impl<T: BufferTarget> Object<Buffer<T>> {
    /// Create a buffer and upload `data`, leaving the previous binding in place
    pub fn with_data(gl: &Rc<Context>, data: &[u8], usage: Usage) -> Result<Self> {
        let buffer = Self::create(gl)?;
        {
            let _bound = buffer.bind_scoped(gl)?;
            buffer.data(gl, data, usage)?;
        }
        Ok(buffer)
    }

    pub fn with_data_of<P: bytemuck::Pod>(
        gl: &Rc<Context>,
        data: &[P],
        usage: Usage,
    ) -> Result<Self> {
        Self::with_data(gl, bytemuck::cast_slice(data), usage)
    }
}

pub type ArrayBuffer = Object<Buffer<Array>>;
pub type ArrayBufferRef = Handle<Buffer<Array>, Mut>;
pub type ArrayBufferCRef = Handle<Buffer<Array>>;

pub type ElementArrayBuffer = Object<Buffer<ElementArray>>;
pub type ElementArrayBufferRef = Handle<Buffer<ElementArray>, Mut>;
pub type ElementArrayBufferCRef = Handle<Buffer<ElementArray>>;
