use std::rc::Rc;

use glow::HasContext;
use glutin::event::{Event, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::window::WindowBuilder;
use glutin::ContextBuilder;
use log::{error, info};

use crate::{Checks, Context};

fn forward_debug_message(source: u32, message_type: u32, id: u32, severity: u32, message: &str) {
    use crate::gl as Gl;
    let source = match source {
        Gl::DEBUG_SOURCE_API => "opengl::api",
        Gl::DEBUG_SOURCE_WINDOW_SYSTEM => "opengl::window_system",
        Gl::DEBUG_SOURCE_SHADER_COMPILER => "opengl::shader_compiler",
        Gl::DEBUG_SOURCE_THIRD_PARTY => "opengl::third_party",
        Gl::DEBUG_SOURCE_APPLICATION => "opengl::application",
        Gl::DEBUG_SOURCE_OTHER => "opengl::other",
        _ => "opengl::unknown",
    };

    let level = match severity {
        Gl::DEBUG_SEVERITY_HIGH => log::Level::Error,
        Gl::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        Gl::DEBUG_SEVERITY_LOW => log::Level::Info,
        Gl::DEBUG_SEVERITY_NOTIFICATION => log::Level::Debug,
        _ => log::Level::Trace,
    };

    let message_type = match message_type {
        Gl::DEBUG_TYPE_ERROR => "error",
        Gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "deprecated behavior",
        Gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "undefined behavior",
        Gl::DEBUG_TYPE_PORTABILITY => "portability",
        Gl::DEBUG_TYPE_PERFORMANCE => "performance",
        Gl::DEBUG_TYPE_MARKER => "marker",
        Gl::DEBUG_TYPE_PUSH_GROUP => "push group",
        Gl::DEBUG_TYPE_POP_GROUP => "pop group",
        Gl::DEBUG_TYPE_OTHER => "other",
        _ => "unknown",
    };

    // Create record manually so we can override the module path
    log::logger().log(
        &log::Record::builder()
            .args(format_args!("{} ({}): {}", message_type, id, message))
            .level(level)
            .target("opengl")
            .module_path_static(Some(source))
            .build(),
    );
}

/// Open a window with an OpenGL 3.3 core context and drive `demo` in it
///
/// Only returns on setup failure; once the event loop starts the process
/// exits with it.
pub fn run_boilerplate<T>(mut demo: T) -> Result<(), Box<dyn std::error::Error>>
where
    T: super::Demo + 'static,
    T::Error: std::fmt::Display,
    T::State: 'static,
{
    crate::logging::init();

    let el = EventLoop::new();

    let wb = WindowBuilder::new()
        .with_title(demo.title())
        .with_inner_size(glutin::dpi::LogicalSize::new(768.0, 768.0));

    let windowed_context = ContextBuilder::new()
        .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGl, (3, 3)))
        .with_gl_profile(glutin::GlProfile::Core)
        .with_gl_debug_flag(true)
        .build_windowed(wb, &el)?;

    let windowed_context = unsafe { windowed_context.make_current() }.map_err(|(_, err)| err)?;

    let mut native = unsafe {
        glow::Context::from_loader_function(|s| windowed_context.get_proc_address(s) as *const _)
    };

    // Setup logging on the context
    if native.supports_debug() {
        unsafe {
            native.enable(crate::gl::DEBUG_OUTPUT);
            native.debug_message_callback(forward_debug_message);
        }
    }

    let checks = Checks::from_env();
    info!("running with {:?}", checks);
    let gl = Rc::new(Context::with_checks(native, checks));

    // Initialize demo
    let mut state = demo
        .init(&gl)
        .map_err(|err| format!("failed to initialize demo: {}", err))?;

    el.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::LoopDestroyed => {}
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(physical_size) => windowed_context.resize(physical_size),
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                _ => (),
            },
            Event::RedrawRequested(_) => {
                // Render demo
                if let Err(err) = demo.render(&gl, &mut state) {
                    error!("render failed: {}", err);
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                windowed_context.window().request_redraw();
                if let Err(err) = windowed_context.swap_buffers() {
                    error!("failed to swap buffers: {}", err);
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => (),
        }
    });
}
