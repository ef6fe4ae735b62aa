//! Exposed OpenGL constants and bindings

pub use ::glow::*;
