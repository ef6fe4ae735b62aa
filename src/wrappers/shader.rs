use std::convert::Infallible;
use std::marker::PhantomData;
use std::rc::Rc;

use log::debug;

use super::{Access, Handle, Mut, Object, Resource};
use crate::context::Context;
use crate::error::{Error, ResourceKind, Result};
use crate::gl;

/// Pipeline stage of a shader
pub trait ShaderStage: 'static {
    const STAGE: u32;
    const NAME: &'static str;
}

#[derive(Debug)]
pub enum Vertex {}

#[derive(Debug)]
pub enum Fragment {}

impl ShaderStage for Vertex {
    const STAGE: u32 = gl::VERTEX_SHADER;
    const NAME: &'static str = "vertex";
}

impl ShaderStage for Fragment {
    const STAGE: u32 = gl::FRAGMENT_SHADER;
    const NAME: &'static str = "fragment";
}

/// Shader object kind for stage `S`
pub struct Shader<S: ShaderStage>(Infallible, PhantomData<S>);

impl<S: ShaderStage> Resource for Shader<S> {
    const KIND: ResourceKind = ResourceKind::Shader;
    const NAME: &'static str = match S::STAGE {
        gl::VERTEX_SHADER => "vertex shader",
        gl::FRAGMENT_SHADER => "fragment shader",
        _ => "shader",
    };

    fn create(gl: &Context) -> Result<u32, String> {
        gl.driver().create_shader(S::STAGE)
    }

    fn delete(gl: &Context, id: u32) {
        gl.driver().delete_shader(id)
    }
}

impl<S: ShaderStage, A: Access> Handle<Shader<S>, A> {
    /// Whether the last compilation succeeded
    pub fn status(&self, gl: &Context) -> bool {
        gl.driver().shader_compile_status(self.id())
    }

    /// Compiler diagnostics, possibly empty
    pub fn log(&self, gl: &Context) -> String {
        gl.driver().shader_info_log(self.id())
    }
}

impl<S: ShaderStage> Handle<Shader<S>, Mut> {
    /// Set the source to the concatenation of `sources`
    pub fn src(&self, gl: &Context, sources: &[&str]) -> Result<()> {
        let id = self.live(gl, "shader source")?;
        gl.driver().shader_source(id, &sources.concat());
        gl.check_error("shader source")
    }

    /// Compile the current source; see [`Handle::status`] for the outcome
    pub fn compile(&self, gl: &Context) -> Result<()> {
        let id = self.live(gl, "shader compile")?;
        gl.driver().compile_shader(id);
        gl.check_error("shader compile")
    }
}

impl<S: ShaderStage> Object<Shader<S>> {
    /// Create, set the source and compile, without looking at the status
    pub fn with_source(gl: &Rc<Context>, sources: &[&str]) -> Result<Self> {
        let shader = Self::create(gl)?;
        shader.src(gl, sources)?;
        shader.compile(gl)?;
        Ok(shader)
    }

    /// Like [`Object::with_source`], failing with the compiler log when the
    /// compilation does not succeed
    pub fn build(gl: &Rc<Context>, sources: &[&str]) -> Result<Self> {
        let shader = Self::with_source(gl, sources)?;

        if !shader.status(gl) {
            let log = shader.log(gl);
            debug!("{} shader {} failed to compile:", S::NAME, shader.id());
            for line in log.lines() {
                debug!(" | {}", line);
            }

            return Err(Error::Compile {
                stage: S::NAME,
                log,
            });
        }

        Ok(shader)
    }
}

pub type VertexShader = Object<Shader<Vertex>>;
pub type VertexShaderRef = Handle<Shader<Vertex>, Mut>;
pub type VertexShaderCRef = Handle<Shader<Vertex>>;

pub type FragmentShader = Object<Shader<Fragment>>;
pub type FragmentShaderRef = Handle<Shader<Fragment>, Mut>;
pub type FragmentShaderCRef = Handle<Shader<Fragment>>;
