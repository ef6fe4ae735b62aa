//! Recording driver for unit tests

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use super::{BindingSlot, Driver};
use crate::error::ResourceKind;
use crate::gl;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(ResourceKind, u32),
    Delete(ResourceKind, u32),
    BindBuffer(u32, u32),
    BindTexture(u32, u32),
    UseProgram(u32),
    BufferData { target: u32, data: Vec<u8>, usage: u32 },
    BufferDataSize { target: u32, size: i32 },
    BufferSubData { target: u32, offset: i32, data: Vec<u8> },
    ShaderSource(u32, String),
    CompileShader(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    Uniform(i32, Vec<f32>),
    TexImage2d { target: u32, level: i32, width: i32, height: i32 },
    TexParameter { target: u32, pname: u32, value: i32 },
    GenerateMipmap(u32),
}

#[derive(Default)]
pub struct State {
    next_id: u32,
    live: HashMap<ResourceKind, HashSet<u32>>,
    bindings: HashMap<BindingSlot, u32>,
    compiled: HashMap<u32, bool>,
    attached: HashMap<u32, Vec<u32>>,
    linked: HashMap<u32, bool>,
    locations: HashMap<String, i32>,
    unpack: HashMap<u32, i32>,
    errors: VecDeque<u32>,
    reject_compile: bool,
    refuse_create: bool,
    pub calls: Vec<Call>,
}

impl State {
    fn create(&mut self, kind: ResourceKind) -> Result<u32, String> {
        if self.refuse_create {
            return Err(format!("out of {} names", kind));
        }

        self.next_id += 1;
        let id = self.next_id;
        self.live.entry(kind).or_default().insert(id);
        self.calls.push(Call::Create(kind, id));
        Ok(id)
    }

    fn delete(&mut self, kind: ResourceKind, id: u32) {
        self.calls.push(Call::Delete(kind, id));
        if id == 0 {
            return;
        }

        if let Some(live) = self.live.get_mut(&kind) {
            live.remove(&id);
        }

        // Deleting a bound object reverts its slot to 0
        let slots: &[BindingSlot] = match kind {
            ResourceKind::Buffer => &[BindingSlot::ArrayBuffer, BindingSlot::ElementArrayBuffer],
            ResourceKind::Texture => &[BindingSlot::Texture2d],
            _ => &[],
        };
        for slot in slots {
            if self.bindings.get(slot) == Some(&id) {
                self.bindings.insert(*slot, 0);
            }
        }
    }

    fn bound(&self, slot: BindingSlot) -> u32 {
        self.bindings.get(&slot).copied().unwrap_or(0)
    }

    fn require_target_bound(&mut self, target: u32) {
        let bound = BindingSlot::from_target(target)
            .map(|slot| self.bound(slot))
            .unwrap_or(0);
        if bound == 0 {
            self.errors.push_back(gl::INVALID_OPERATION);
        }
    }
}

/// Driver double that hands out ids, tracks binding slots and records calls
#[derive(Clone, Default)]
pub struct MockDriver {
    state: Rc<RefCell<State>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn deletes(&self, kind: ResourceKind, id: u32) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| **call == Call::Delete(kind, id))
            .count()
    }

    pub fn live(&self, kind: ResourceKind) -> usize {
        self.state
            .borrow()
            .live
            .get(&kind)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    pub fn bound(&self, slot: BindingSlot) -> u32 {
        self.state.borrow().bound(slot)
    }

    /// Make every following compilation fail
    pub fn reject_compile(&self, reject: bool) {
        self.state.borrow_mut().reject_compile = reject;
    }

    pub fn refuse_create(&self, refuse: bool) {
        self.state.borrow_mut().refuse_create = refuse;
    }

    pub fn push_error(&self, code: u32) {
        self.state.borrow_mut().errors.push_back(code);
    }

    /// Override a `GL_UNPACK_*` pixel store parameter
    pub fn set_unpack(&self, pname: u32, value: i32) {
        self.state.borrow_mut().unpack.insert(pname, value);
    }

    pub fn define_location(&self, name: &str, location: i32) {
        self.state
            .borrow_mut()
            .locations
            .insert(name.to_owned(), location);
    }
}

impl Driver for MockDriver {
    fn create_buffer(&self) -> Result<u32, String> {
        self.state.borrow_mut().create(ResourceKind::Buffer)
    }

    fn delete_buffer(&self, id: u32) {
        self.state.borrow_mut().delete(ResourceKind::Buffer, id)
    }

    fn bind_buffer(&self, target: u32, id: u32) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BindBuffer(target, id));
        if let Some(slot) = BindingSlot::from_target(target) {
            state.bindings.insert(slot, id);
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        let mut state = self.state.borrow_mut();
        state.require_target_bound(target);
        state.calls.push(Call::BufferData {
            target,
            data: data.to_vec(),
            usage,
        });
    }

    fn buffer_data_size(&self, target: u32, size: i32, _usage: u32) {
        let mut state = self.state.borrow_mut();
        state.require_target_bound(target);
        state.calls.push(Call::BufferDataSize { target, size });
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.require_target_bound(target);
        state.calls.push(Call::BufferSubData {
            target,
            offset,
            data: data.to_vec(),
        });
    }

    fn create_shader(&self, _stage: u32) -> Result<u32, String> {
        self.state.borrow_mut().create(ResourceKind::Shader)
    }

    fn delete_shader(&self, id: u32) {
        self.state.borrow_mut().delete(ResourceKind::Shader, id)
    }

    fn shader_source(&self, id: u32, source: &str) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::ShaderSource(id, source.to_owned()));
    }

    fn compile_shader(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        let ok = !state.reject_compile;
        state.compiled.insert(id, ok);
        state.calls.push(Call::CompileShader(id));
    }

    fn shader_compile_status(&self, id: u32) -> bool {
        self.state.borrow().compiled.get(&id).copied().unwrap_or(false)
    }

    fn shader_info_log(&self, id: u32) -> String {
        if self.state.borrow().compiled.get(&id) == Some(&false) {
            "0:1(1): error: syntax error, unexpected end of file".to_owned()
        } else {
            String::new()
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        self.state.borrow_mut().create(ResourceKind::Program)
    }

    fn delete_program(&self, id: u32) {
        self.state.borrow_mut().delete(ResourceKind::Program, id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.attached.entry(program).or_default().push(shader);
        state.calls.push(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        if let Some(attached) = state.attached.get_mut(&program) {
            attached.retain(|s| *s != shader);
        }
        state.calls.push(Call::DetachShader(program, shader));
    }

    fn link_program(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        let ok = state
            .attached
            .get(&id)
            .map(|shaders| {
                !shaders.is_empty()
                    && shaders
                        .iter()
                        .all(|s| state.compiled.get(s).copied().unwrap_or(false))
            })
            .unwrap_or(false);
        state.linked.insert(id, ok);
        state.calls.push(Call::LinkProgram(id));
    }

    fn program_link_status(&self, id: u32) -> bool {
        self.state.borrow().linked.get(&id).copied().unwrap_or(false)
    }

    fn program_info_log(&self, id: u32) -> String {
        if self.state.borrow().linked.get(&id) == Some(&false) {
            "error: linking with uncompiled/unspecialized shader".to_owned()
        } else {
            String::new()
        }
    }

    fn attrib_location(&self, _program: u32, name: &str) -> i32 {
        self.state.borrow().locations.get(name).copied().unwrap_or(-1)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> i32 {
        self.state.borrow().locations.get(name).copied().unwrap_or(-1)
    }

    fn use_program(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        if id != 0 && state.linked.get(&id) != Some(&true) {
            state.errors.push_back(gl::INVALID_OPERATION);
            return;
        }
        state.bindings.insert(BindingSlot::Program, id);
        state.calls.push(Call::UseProgram(id));
    }

    fn uniform_f32(&self, location: i32, values: &[f32]) {
        let mut state = self.state.borrow_mut();
        if state.bound(BindingSlot::Program) == 0 {
            state.errors.push_back(gl::INVALID_OPERATION);
        }
        state.calls.push(Call::Uniform(location, values.to_vec()));
    }

    fn uniform_i32(&self, location: i32, values: &[i32]) {
        let values: Vec<f32> = values.iter().map(|v| *v as f32).collect();
        self.uniform_f32(location, &values)
    }

    fn uniform_matrix_4_f32(&self, location: i32, _transpose: bool, values: &[f32; 16]) {
        self.uniform_f32(location, values)
    }

    fn create_texture(&self) -> Result<u32, String> {
        self.state.borrow_mut().create(ResourceKind::Texture)
    }

    fn delete_texture(&self, id: u32) {
        self.state.borrow_mut().delete(ResourceKind::Texture, id)
    }

    fn bind_texture(&self, target: u32, id: u32) {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BindTexture(target, id));
        if let Some(slot) = BindingSlot::from_target(target) {
            state.bindings.insert(slot, id);
        }
    }

    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        _internal_format: i32,
        width: i32,
        height: i32,
        _format: u32,
        _ty: u32,
        pixels: Option<&[u8]>,
    ) {
        let mut state = self.state.borrow_mut();
        if width < 0 || height < 0 || pixels.map_or(false, |p| p.is_empty()) {
            state.errors.push_back(gl::INVALID_VALUE);
        }
        state.calls.push(Call::TexImage2d {
            target,
            level,
            width,
            height,
        });
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32) {
        self.state.borrow_mut().calls.push(Call::TexParameter {
            target,
            pname,
            value,
        });
    }

    fn unpack_parameter(&self, pname: u32) -> i32 {
        let default = if pname == gl::UNPACK_ALIGNMENT { 4 } else { 0 };
        self.state
            .borrow()
            .unpack
            .get(&pname)
            .copied()
            .unwrap_or(default)
    }

    fn generate_mipmap(&self, target: u32) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::GenerateMipmap(target));
    }

    fn binding(&self, slot: BindingSlot) -> u32 {
        self.state.borrow().bound(slot)
    }

    fn get_error(&self) -> u32 {
        self.state
            .borrow_mut()
            .errors
            .pop_front()
            .unwrap_or(gl::NO_ERROR)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
