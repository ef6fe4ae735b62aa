//! [`Driver`] over a desktop `glow` context

use std::any::Any;
use std::num::NonZeroU32;

use glow::HasContext;
use log::trace;

use super::{BindingSlot, Driver};

fn name<T>(id: u32, wrap: fn(NonZeroU32) -> T) -> Option<T> {
    NonZeroU32::new(id).map(wrap)
}

fn dropped(op: &str) {
    trace!("skipping {} on object 0, glow names are non-zero", op);
}

fn location(location: i32) -> Option<glow::NativeUniformLocation> {
    if location < 0 {
        None
    } else {
        Some(glow::NativeUniformLocation(location as u32))
    }
}

impl Driver for glow::Context {
    fn create_buffer(&self) -> Result<u32, String> {
        Ok(unsafe { HasContext::create_buffer(self) }?.0.get())
    }

    fn delete_buffer(&self, id: u32) {
        if let Some(buffer) = name(id, glow::NativeBuffer) {
            unsafe { HasContext::delete_buffer(self, buffer) }
        }
    }

    fn bind_buffer(&self, target: u32, id: u32) {
        unsafe { HasContext::bind_buffer(self, target, name(id, glow::NativeBuffer)) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.buffer_data_u8_slice(target, data, usage) }
    }

    fn buffer_data_size(&self, target: u32, size: i32, usage: u32) {
        unsafe { HasContext::buffer_data_size(self, target, size, usage) }
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        unsafe { self.buffer_sub_data_u8_slice(target, offset, data) }
    }

    fn create_shader(&self, stage: u32) -> Result<u32, String> {
        Ok(unsafe { HasContext::create_shader(self, stage) }?.0.get())
    }

    fn delete_shader(&self, id: u32) {
        if let Some(shader) = name(id, glow::NativeShader) {
            unsafe { HasContext::delete_shader(self, shader) }
        }
    }

    fn shader_source(&self, id: u32, source: &str) {
        if let Some(shader) = name(id, glow::NativeShader) {
            unsafe { HasContext::shader_source(self, shader, source) }
        } else {
            dropped("shader source")
        }
    }

    fn compile_shader(&self, id: u32) {
        if let Some(shader) = name(id, glow::NativeShader) {
            unsafe { HasContext::compile_shader(self, shader) }
        } else {
            dropped("compile shader")
        }
    }

    fn shader_compile_status(&self, id: u32) -> bool {
        name(id, glow::NativeShader)
            .map(|shader| unsafe { self.get_shader_compile_status(shader) })
            .unwrap_or(false)
    }

    fn shader_info_log(&self, id: u32) -> String {
        name(id, glow::NativeShader)
            .map(|shader| unsafe { self.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn create_program(&self) -> Result<u32, String> {
        Ok(unsafe { HasContext::create_program(self) }?.0.get())
    }

    fn delete_program(&self, id: u32) {
        if let Some(program) = name(id, glow::NativeProgram) {
            unsafe { HasContext::delete_program(self, program) }
        }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (
            name(program, glow::NativeProgram),
            name(shader, glow::NativeShader),
        ) {
            unsafe { HasContext::attach_shader(self, program, shader) }
        } else {
            dropped("attach shader")
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (
            name(program, glow::NativeProgram),
            name(shader, glow::NativeShader),
        ) {
            unsafe { HasContext::detach_shader(self, program, shader) }
        } else {
            dropped("detach shader")
        }
    }

    fn link_program(&self, id: u32) {
        if let Some(program) = name(id, glow::NativeProgram) {
            unsafe { HasContext::link_program(self, program) }
        } else {
            dropped("link program")
        }
    }

    fn program_link_status(&self, id: u32) -> bool {
        name(id, glow::NativeProgram)
            .map(|program| unsafe { self.get_program_link_status(program) })
            .unwrap_or(false)
    }

    fn program_info_log(&self, id: u32) -> String {
        name(id, glow::NativeProgram)
            .map(|program| unsafe { self.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn attrib_location(&self, program: u32, attrib: &str) -> i32 {
        name(program, glow::NativeProgram)
            .and_then(|program| unsafe { self.get_attrib_location(program, attrib) })
            .map(|location| location as i32)
            .unwrap_or(-1)
    }

    fn uniform_location(&self, program: u32, uniform: &str) -> i32 {
        name(program, glow::NativeProgram)
            .and_then(|program| unsafe { self.get_uniform_location(program, uniform) })
            .map(|location| location.0 as i32)
            .unwrap_or(-1)
    }

    fn use_program(&self, id: u32) {
        unsafe { HasContext::use_program(self, name(id, glow::NativeProgram)) }
    }

    fn uniform_f32(&self, loc: i32, values: &[f32]) {
        let loc = location(loc);
        let loc = loc.as_ref();
        unsafe {
            match *values {
                [x] => self.uniform_1_f32(loc, x),
                [x, y] => self.uniform_2_f32(loc, x, y),
                [x, y, z] => self.uniform_3_f32(loc, x, y, z),
                [x, y, z, w] => self.uniform_4_f32(loc, x, y, z, w),
                _ => log::warn!("ignoring uniform with {} components", values.len()),
            }
        }
    }

    fn uniform_i32(&self, loc: i32, values: &[i32]) {
        let loc = location(loc);
        let loc = loc.as_ref();
        unsafe {
            match *values {
                [x] => self.uniform_1_i32(loc, x),
                [x, y] => self.uniform_2_i32(loc, x, y),
                [x, y, z] => self.uniform_3_i32(loc, x, y, z),
                [x, y, z, w] => self.uniform_4_i32(loc, x, y, z, w),
                _ => log::warn!("ignoring uniform with {} components", values.len()),
            }
        }
    }

    fn uniform_matrix_4_f32(&self, loc: i32, transpose: bool, values: &[f32; 16]) {
        let loc = location(loc);
        unsafe { self.uniform_matrix_4_f32_slice(loc.as_ref(), transpose, values) }
    }

    fn create_texture(&self) -> Result<u32, String> {
        Ok(unsafe { HasContext::create_texture(self) }?.0.get())
    }

    fn delete_texture(&self, id: u32) {
        if let Some(texture) = name(id, glow::NativeTexture) {
            unsafe { HasContext::delete_texture(self, texture) }
        }
    }

    fn bind_texture(&self, target: u32, id: u32) {
        unsafe { HasContext::bind_texture(self, target, name(id, glow::NativeTexture)) }
    }

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
    ) {
        unsafe {
            HasContext::tex_image_2d(
                self,
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                ty,
                pixels,
            )
        }
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, target, pname, value) }
    }

    fn unpack_parameter(&self, pname: u32) -> i32 {
        unsafe { self.get_parameter_i32(pname) }
    }

    fn generate_mipmap(&self, target: u32) {
        unsafe { HasContext::generate_mipmap(self, target) }
    }

    fn binding(&self, slot: BindingSlot) -> u32 {
        unsafe { self.get_parameter_i32(slot.query()) as u32 }
    }

    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
