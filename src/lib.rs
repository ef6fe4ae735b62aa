//! Ownership-checked wrappers for OpenGL buffers, shaders, programs and
//! textures.
//!
//! An [`Object`](wrappers::Object) owns one driver id and deletes it when
//! dropped. A [`Handle`](wrappers::Handle) is a copyable, nullable view of an
//! id that never deletes anything. Calls go through a [`Context`], which owns
//! the [`Driver`](driver::Driver) and the [`Checks`] applied around each call.
//!
//! ```no_run
//! # fn demo(gl: std::rc::Rc<fogl::Context>) -> fogl::Result<()> {
//! use fogl::prelude::*;
//!
//! let vs = VertexShader::build(&gl, &["#version 330 core\n", "void main() {}"])?;
//! let fs = FragmentShader::build(&gl, &["#version 330 core\n", "void main() {}"])?;
//! let program = ShaderProgram::build(&gl, &vs, &fs)?;
//!
//! let vertices = ArrayBuffer::create(&gl)?;
//! vertices.bind(&gl)?;
//! vertices.data_of(&gl, &[0.0f32, 0.5, -0.5, -0.5, 0.5, -0.5], Usage::STATIC_DRAW)?;
//! program.use_program(&gl)?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "boilerplate")]
pub mod boilerplate;

mod checks;
pub use checks::*;

mod context;
pub use context::*;

mod error;
pub use error::*;

pub mod driver;
pub mod gl;
pub mod logging;
pub mod wrappers;

pub use glow;

pub mod prelude {
    pub use super::wrappers::{
        ArrayBuffer, ElementArrayBuffer, Filter, FragmentShader, ShaderProgram, Texture2d,
        Usage, VertexShader, Wrap,
    };
    pub use super::wrappers::{AsHandle, Handle, Object};
    pub use super::{Checks, Context, Error, Result};

    pub use cgmath;
}
