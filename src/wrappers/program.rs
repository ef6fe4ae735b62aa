use std::convert::Infallible;
use std::rc::Rc;

use log::debug;

use super::{
    Access, AsHandle, Bindable, Fragment, Handle, Mut, Object, Resource, Shader, ShaderStage,
    Vertex,
};
use crate::context::Context;
use crate::driver::{BindingSlot, Driver};
use crate::error::{Error, ResourceKind, Result};

/// Program object kind
pub struct Program(Infallible);

impl Resource for Program {
    const KIND: ResourceKind = ResourceKind::Program;
    const NAME: &'static str = "program";

    fn create(gl: &Context) -> Result<u32, String> {
        gl.driver().create_program()
    }

    fn delete(gl: &Context, id: u32) {
        gl.driver().delete_program(id)
    }
}

impl Bindable for Program {
    const SLOT: BindingSlot = BindingSlot::Program;

    fn bind_raw(gl: &Context, id: u32) {
        gl.driver().use_program(id)
    }
}

/// Value that can be written to a uniform location
pub trait Uniform {
    fn write(&self, driver: &dyn Driver, location: i32);
}

impl Uniform for f32 {
    fn write(&self, driver: &dyn Driver, location: i32) {
        driver.uniform_f32(location, &[*self])
    }
}

impl Uniform for i32 {
    fn write(&self, driver: &dyn Driver, location: i32) {
        driver.uniform_i32(location, &[*self])
    }
}

impl Uniform for cgmath::Vector2<f32> {
    fn write(&self, driver: &dyn Driver, location: i32) {
        driver.uniform_f32(location, &[self.x, self.y])
    }
}

impl Uniform for cgmath::Vector3<f32> {
    fn write(&self, driver: &dyn Driver, location: i32) {
        driver.uniform_f32(location, &[self.x, self.y, self.z])
    }
}

impl Uniform for cgmath::Vector4<f32> {
    fn write(&self, driver: &dyn Driver, location: i32) {
        driver.uniform_f32(location, &[self.x, self.y, self.z, self.w])
    }
}

impl Uniform for cgmath::Vector2<i32> {
    fn write(&self, driver: &dyn Driver, location: i32) {
        driver.uniform_i32(location, &[self.x, self.y])
    }
}

impl Uniform for cgmath::Vector3<i32> {
    fn write(&self, driver: &dyn Driver, location: i32) {
        driver.uniform_i32(location, &[self.x, self.y, self.z])
    }
}

impl Uniform for cgmath::Matrix4<f32> {
    fn write(&self, driver: &dyn Driver, location: i32) {
        driver.uniform_matrix_4_f32(location, false, self.as_ref())
    }
}

impl<A: Access> Handle<Program, A> {
    /// Whether the last link succeeded
    pub fn status(&self, gl: &Context) -> bool {
        gl.driver().program_link_status(self.id())
    }

    /// Linker diagnostics, possibly empty
    pub fn log(&self, gl: &Context) -> String {
        gl.driver().program_info_log(self.id())
    }

    /// Location of a vertex attribute, -1 if there is no such attribute
    pub fn attribute_location(&self, gl: &Context, name: &str) -> i32 {
        gl.driver().attrib_location(self.id(), name)
    }

    /// Location of a uniform, -1 if there is no such uniform
    pub fn uniform_location(&self, gl: &Context, name: &str) -> i32 {
        gl.driver().uniform_location(self.id(), name)
    }

    /// Make this the program in effect for draw calls
    pub fn use_program(&self, gl: &Context) -> Result<()> {
        self.bind(gl)
    }

    /// Whether this is the program in effect
    pub fn is_current(&self, gl: &Context) -> bool {
        self.is_bound(gl)
    }
}

impl Handle<Program, Mut> {
    pub fn attach_shader<S: ShaderStage>(
        &self,
        gl: &Context,
        shader: &impl AsHandle<Shader<S>>,
    ) -> Result<()> {
        let id = self.live(gl, "attach shader")?;
        gl.driver().attach_shader(id, shader.as_handle().id());
        gl.check_error("attach shader")
    }

    pub fn detach_shader<S: ShaderStage>(
        &self,
        gl: &Context,
        shader: &impl AsHandle<Shader<S>>,
    ) -> Result<()> {
        let id = self.live(gl, "detach shader")?;
        gl.driver().detach_shader(id, shader.as_handle().id());
        gl.check_error("detach shader")
    }

    /// Link the attached shaders; see [`Handle::status`] for the outcome
    pub fn link(&self, gl: &Context) -> Result<()> {
        let id = self.live(gl, "link program")?;
        gl.driver().link_program(id);
        gl.check_error("link program")
    }

    /// Write `value` to `location` of this program, which must be in use
    pub fn uniform(&self, gl: &Context, location: i32, value: impl Uniform) -> Result<()> {
        self.active(gl, "uniform")?;
        value.write(gl.driver(), location);
        gl.check_error("uniform")
    }
}

impl Object<Program> {
    /// Create, attach both shaders and link, without looking at the status
    pub fn from_shaders(
        gl: &Rc<Context>,
        vertex: &impl AsHandle<Shader<Vertex>>,
        fragment: &impl AsHandle<Shader<Fragment>>,
    ) -> Result<Self> {
        let program = Self::create(gl)?;
        program.attach_shader(gl, vertex)?;
        program.attach_shader(gl, fragment)?;
        program.link(gl)?;
        Ok(program)
    }

    /// Like [`Object::from_shaders`], failing with the linker log when the
    /// link does not succeed
    pub fn build(
        gl: &Rc<Context>,
        vertex: &impl AsHandle<Shader<Vertex>>,
        fragment: &impl AsHandle<Shader<Fragment>>,
    ) -> Result<Self> {
        let program = Self::from_shaders(gl, vertex, fragment)?;

        if !program.status(gl) {
            let log = program.log(gl);
            debug!("program {} failed to link: {}", program.id(), log);
            return Err(Error::Link { log });
        }

        Ok(program)
    }
}

pub type ShaderProgram = Object<Program>;
pub type ShaderProgramRef = Handle<Program, Mut>;
pub type ShaderProgramCRef = Handle<Program>;
