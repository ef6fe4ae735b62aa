use std::fmt;

use crate::driver::BindingSlot;
use crate::gl;

/// Kind of driver object behind a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Buffer,
    Shader,
    Program,
    Texture,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Buffer => "buffer",
            Self::Shader => "shader",
            Self::Program => "program",
            Self::Texture => "texture",
        })
    }
}

/// Error flag reported by `glGetError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    InvalidFramebufferOperation,
    OutOfMemory,
    StackUnderflow,
    StackOverflow,
    /// Vendor-specific or unknown code
    Unknown(u32),
}

impl GlError {
    /// Decode an error code, `None` for `GL_NO_ERROR`
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            gl::NO_ERROR => return None,
            gl::INVALID_ENUM => Self::InvalidEnum,
            gl::INVALID_VALUE => Self::InvalidValue,
            gl::INVALID_OPERATION => Self::InvalidOperation,
            gl::INVALID_FRAMEBUFFER_OPERATION => Self::InvalidFramebufferOperation,
            gl::OUT_OF_MEMORY => Self::OutOfMemory,
            gl::STACK_UNDERFLOW => Self::StackUnderflow,
            gl::STACK_OVERFLOW => Self::StackOverflow,
            other => Self::Unknown(other),
        })
    }

    pub fn code(self) -> u32 {
        match self {
            Self::InvalidEnum => gl::INVALID_ENUM,
            Self::InvalidValue => gl::INVALID_VALUE,
            Self::InvalidOperation => gl::INVALID_OPERATION,
            Self::InvalidFramebufferOperation => gl::INVALID_FRAMEBUFFER_OPERATION,
            Self::OutOfMemory => gl::OUT_OF_MEMORY,
            Self::StackUnderflow => gl::STACK_UNDERFLOW,
            Self::StackOverflow => gl::STACK_OVERFLOW,
            Self::Unknown(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A call that needs a live object was made on id 0
    #[error("{kind} operation `{op}` invoked on a null handle")]
    NullHandle {
        kind: ResourceKind,
        op: &'static str,
    },
    /// A call that needs the object in its binding slot found another id there
    #[error("{kind} {id} is not bound to {slot} (currently bound: {bound})")]
    NotBound {
        kind: ResourceKind,
        id: u32,
        slot: BindingSlot,
        bound: u32,
    },
    /// The driver raised its error flag during `op`
    #[error("driver reported {error:?} (0x{code:04x}) after `{op}`", code = .error.code())]
    Driver { op: &'static str, error: GlError },
    /// An argument would make the driver read or write outside the data
    /// it was given
    #[error("invalid argument to `{op}`: {message}")]
    InvalidArgument { op: &'static str, message: String },
    #[error("failed to create {kind}: {message}")]
    Create { kind: ResourceKind, message: String },
    #[error("{stage} shader compilation failed: {log}")]
    Compile { stage: &'static str, log: String },
    #[error("program link failed: {log}")]
    Link { log: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
