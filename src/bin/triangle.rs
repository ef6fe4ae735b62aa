use std::rc::Rc;
use std::time::Instant;

use fogl::glow::{self, HasContext};
use fogl::prelude::*;
use fogl::{boilerplate::Demo, gl};

const HEADER: &str = "#version 330 core\n";

const VERTEX: &str = r#"
in vec2 a_pos;
in vec2 a_uv;
out vec2 v_uv;

void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

const FRAGMENT: &str = r#"
uniform sampler2D u_texture;
uniform vec3 u_tint;
in vec2 v_uv;
out vec4 o_color;

void main() {
    o_color = vec4(u_tint, 1.0) * texture(u_texture, v_uv);
}
"#;

#[rustfmt::skip]
const VERTICES: [f32; 12] = [
    // a_pos       a_uv
    -0.8, -0.8,    0.0, 0.0,
     0.8, -0.8,    4.0, 0.0,
     0.0,  0.8,    2.0, 4.0,
];

const INDICES: [u16; 3] = [0, 1, 2];

#[rustfmt::skip]
const CHECKER: [u8; 16] = [
    255, 255, 255, 255,    40, 40, 40, 255,
     40,  40,  40, 255,   255, 255, 255, 255,
];

#[derive(Default)]
struct Triangle;

struct State {
    program: ShaderProgram,
    texture: Texture2d,
    // Kept alive for the vertex array
    _vertices: ArrayBuffer,
    _indices: ElementArrayBuffer,
    tint: i32,
    start: Instant,
}

fn native(gl: &Context) -> Result<&glow::Context, String> {
    gl.native::<glow::Context>()
        .ok_or_else(|| "triangle needs a glow context".to_owned())
}

impl Demo for Triangle {
    type State = State;
    type Error = String;

    fn init(&mut self, gl: &Rc<Context>) -> Result<State, String> {
        let vs = VertexShader::build(gl, &[HEADER, VERTEX]).map_err(|e| e.to_string())?;
        let fs = FragmentShader::build(gl, &[HEADER, FRAGMENT]).map_err(|e| e.to_string())?;
        let program = ShaderProgram::build(gl, &vs, &fs).map_err(|e| e.to_string())?;

        // Build and bind the VAO that records the buffer layout
        let raw = native(gl)?;
        unsafe {
            let vao = raw.create_vertex_array()?;
            raw.bind_vertex_array(Some(vao));
        }

        let vertices = ArrayBuffer::create(gl).map_err(|e| e.to_string())?;
        vertices.bind(gl).map_err(|e| e.to_string())?;
        vertices
            .data_of(gl, &VERTICES, Usage::STATIC_DRAW)
            .map_err(|e| e.to_string())?;

        let indices = ElementArrayBuffer::create(gl).map_err(|e| e.to_string())?;
        indices.bind(gl).map_err(|e| e.to_string())?;
        indices
            .data_of(gl, &INDICES, Usage::STATIC_DRAW)
            .map_err(|e| e.to_string())?;

        let stride = 4 * std::mem::size_of::<f32>() as i32;
        for (name, offset) in [("a_pos", 0), ("a_uv", 2)].iter() {
            let location = program.attribute_location(gl, name);
            if location < 0 {
                return Err(format!("attribute {} is not active", name));
            }

            unsafe {
                raw.enable_vertex_attrib_array(location as u32);
                raw.vertex_attrib_pointer_f32(
                    location as u32,
                    2,
                    gl::FLOAT,
                    false,
                    stride,
                    offset * std::mem::size_of::<f32>() as i32,
                );
            }
        }

        let texture = Texture2d::create(gl).map_err(|e| e.to_string())?;
        texture.bind(gl).map_err(|e| e.to_string())?;
        texture
            .img2d(
                gl,
                0,
                gl::RGBA as i32,
                2,
                2,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                Some(&CHECKER[..]),
            )
            .and_then(|_| texture.wrap_s_t(gl, Wrap::Repeat))
            .and_then(|_| texture.mag_filter(gl, Filter::Nearest))
            .and_then(|_| texture.min_filter(gl, Filter::NearestMipmapNearest))
            .and_then(|_| texture.gen_mipmaps(gl))
            .map_err(|e| e.to_string())?;

        program.use_program(gl).map_err(|e| e.to_string())?;
        let sampler = program.uniform_location(gl, "u_texture");
        program
            .uniform(gl, sampler, 0)
            .map_err(|e| e.to_string())?;
        let tint = program.uniform_location(gl, "u_tint");

        Ok(State {
            program,
            texture,
            _vertices: vertices,
            _indices: indices,
            tint,
            start: Instant::now(),
        })
    }

    fn render(&mut self, gl: &Context, state: &mut State) -> Result<(), String> {
        let raw = native(gl)?;
        unsafe {
            raw.clear_color(0.1, 0.1, 0.12, 1.0);
            raw.clear(gl::COLOR_BUFFER_BIT);
        }

        let t = state.start.elapsed().as_secs_f32();
        let tint = cgmath::vec3(0.6 + 0.4 * t.sin(), 0.8, 0.6 + 0.4 * t.cos());

        state.program.use_program(gl).map_err(|e| e.to_string())?;
        state.texture.bind(gl).map_err(|e| e.to_string())?;
        state
            .program
            .uniform(gl, state.tint, tint)
            .map_err(|e| e.to_string())?;

        unsafe {
            raw.draw_elements(gl::TRIANGLES, INDICES.len() as i32, gl::UNSIGNED_SHORT, 0);
        }

        Ok(())
    }

    fn title(&self) -> String {
        "fogl triangle".to_owned()
    }
}

fn main() {
    if let Err(err) = fogl::boilerplate::desktop::run_boilerplate(Triangle::default()) {
        eprintln!("triangle: {}", err);
        std::process::exit(1);
    }
}
