#![allow(dead_code)]
use std::error::Error;
use std::mem;
use std::path::Path;
use std::ptr;
use std::sync::Once;
use std::time::{Duration, Instant};

use fnv::FnvHashSet;
use learngl::backend::glutin::{SimpleWindowBuilder, WindowOptions};
use learngl::gl;
use learngl::gl::types::{GLint, GLsizei, GLsizeiptr, GLuint};
use learngl::{Display, ResourceDir, SwapBuffersError};
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::EventLoopBuilder;

/// Environment variable overriding the directory that shaders and textures are loaded from.
pub const RESOURCES_VAR: &str = "LEARNGL_RESOURCES";

static INIT_LOGGING: Once = Once::new();

/// Installs `env_logger`, honoring `RUST_LOG` and defaulting to `info`.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();
    });
}

/// The `demos/` directory, unless `LEARNGL_RESOURCES` points elsewhere.
pub fn resources() -> ResourceDir {
    ResourceDir::from_env(RESOURCES_VAR, ResourceDir::from_manifest_dir().join("demos").root())
}

/// Keys currently held down.
#[derive(Debug, Default)]
pub struct Input {
    held: FnvHashSet<VirtualKeyCode>,
}

impl Input {
    pub fn is_pressed(&self, key: VirtualKeyCode) -> bool {
        self.held.contains(&key)
    }

    fn process(&mut self, input: &KeyboardInput) {
        if let Some(key) = input.virtual_keycode {
            match input.state {
                ElementState::Pressed => self.held.insert(key),
                ElementState::Released => self.held.remove(&key),
            };
        }
    }
}

/// One tutorial program. Its fields are the whole state of the demo.
pub trait Application: Sized {
    /// Window options, the default 800x600 window unless overridden.
    fn options() -> WindowOptions {
        WindowOptions::default()
    }

    /// Compiles the programs and uploads the buffers of the demo.
    fn new(display: &Display, resources: &ResourceDir) -> Result<Self, Box<dyn Error>>;

    /// Called once per frame before drawing, with the time since the start of the demo.
    fn update(&mut self, _input: &Input, _elapsed: Duration) { }

    fn draw_frame(&mut self, display: &Display);

    /// Frees everything `new` allocated. The context is still current.
    fn destroy(self, display: &Display);
}

/// Opens the window described by `A::options()` and runs `A` until it is closed or Escape is
/// pressed.
pub fn run<A: Application + 'static>() -> Result<(), Box<dyn Error>> {
    init_logging();

    let event_loop = EventLoopBuilder::new().build();
    let (window, display) = SimpleWindowBuilder::from_options(A::options()).build(&event_loop)?;
    log::info!("running on {}", display.get_version());

    let mut app = Some(A::new(&display, &resources())?);
    let mut input = Input::default();
    let start = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::RedrawRequested(_) => {
                if let Some(app) = &mut app {
                    app.update(&input, start.elapsed());
                    app.draw_frame(&display);
                }

                match display.swap_buffers() {
                    Ok(()) => (),
                    Err(SwapBuffersError::ContextLost) => {
                        log::error!("the OpenGL context was lost");
                        // the context is gone, nothing is left to free
                        mem::forget(app.take());
                        control_flow.set_exit();
                    },
                    Err(err) => log::warn!("{}", err),
                }
            },
            // By requesting a redraw in response to a RedrawEventsCleared event we get continuous rendering.
            Event::RedrawEventsCleared => window.request_redraw(),
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => control_flow.set_exit(),
                WindowEvent::Resized(new_size) => display.resize(new_size.into()),
                WindowEvent::KeyboardInput { input: key, .. } => {
                    if key.virtual_keycode == Some(VirtualKeyCode::Escape) {
                        control_flow.set_exit();
                    }
                    input.process(&key);
                },
                _ => (),
            },
            Event::LoopDestroyed => {
                if let Some(app) = app.take() {
                    app.destroy(&display);
                }
            },
            _ => (),
        }
    })
}

/// Location, component count and byte offset of one vertex attribute.
#[derive(Copy, Clone, Debug)]
pub struct Attribute {
    pub location: GLuint,
    pub components: GLint,
    pub offset: usize,
}

/// A `#[repr(C)]` struct of `f32` fields uploaded to a vertex buffer.
pub trait Vertex: Copy {
    fn attributes() -> Vec<Attribute>;
}

/// Implements `Vertex` for a struct: `implement_vertex!(MyVertex, position: 3 => 0)` puts the
/// 3-component `position` field at attribute location 0.
macro_rules! implement_vertex {
    ($struct_name:ident, $($field:ident: $components:expr => $location:expr),+) => {
        impl $crate::support::Vertex for $struct_name {
            fn attributes() -> Vec<$crate::support::Attribute> {
                vec![$(
                    $crate::support::Attribute {
                        location: $location,
                        components: $components,
                        offset: memoffset::offset_of!($struct_name, $field),
                    }
                ),+]
            }
        }
    };
}

/// A vertex array with its vertex buffer and optional element buffer.
pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: Option<GLuint>,
    count: GLsizei,
}

impl Mesh {
    /// Uploads `vertices`, drawn in order.
    pub fn new<V: Vertex>(gl: &gl::Gl, vertices: &[V]) -> Mesh {
        Mesh::build(gl, vertices, None)
    }

    /// Uploads `vertices`, drawn through `indices`.
    pub fn indexed<V: Vertex>(gl: &gl::Gl, vertices: &[V], indices: &[u32]) -> Mesh {
        Mesh::build(gl, vertices, Some(indices))
    }

    fn build<V: Vertex>(gl: &gl::Gl, vertices: &[V], indices: Option<&[u32]>) -> Mesh {
        let (mut vao, mut vbo) = (0, 0);

        unsafe {
            gl.GenVertexArrays(1, &mut vao);
            gl.GenBuffers(1, &mut vbo);

            // bind the Vertex Array Object first, then bind and set vertex buffer(s), and then
            // configure vertex attribute(s)
            gl.BindVertexArray(vao);

            gl.BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl.BufferData(gl::ARRAY_BUFFER, mem::size_of_val(vertices) as GLsizeiptr,
                          vertices.as_ptr() as *const _, gl::STATIC_DRAW);

            let ebo = indices.map(|indices| {
                let mut ebo = 0;
                gl.GenBuffers(1, &mut ebo);
                gl.BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
                gl.BufferData(gl::ELEMENT_ARRAY_BUFFER, mem::size_of_val(indices) as GLsizeiptr,
                              indices.as_ptr() as *const _, gl::STATIC_DRAW);
                ebo
            });

            for attribute in V::attributes() {
                gl.VertexAttribPointer(attribute.location, attribute.components, gl::FLOAT,
                                       gl::FALSE, mem::size_of::<V>() as GLsizei,
                                       attribute.offset as *const _);
                gl.EnableVertexAttribArray(attribute.location);
            }

            // the element buffer binding is part of the vertex array and must stay bound
            gl.BindBuffer(gl::ARRAY_BUFFER, 0);
            gl.BindVertexArray(0);

            let count = indices.map_or(vertices.len(), |i| i.len()) as GLsizei;
            Mesh { vao, vbo, ebo, count }
        }
    }

    pub fn draw(&self, gl: &gl::Gl) {
        unsafe {
            gl.BindVertexArray(self.vao);
            match self.ebo {
                Some(_) => gl.DrawElements(gl::TRIANGLES, self.count, gl::UNSIGNED_INT, ptr::null()),
                None => gl.DrawArrays(gl::TRIANGLES, 0, self.count),
            }
        }
    }

    pub fn delete(self, gl: &gl::Gl) {
        unsafe {
            gl.DeleteVertexArrays(1, &self.vao);
            gl.DeleteBuffers(1, &self.vbo);
            if let Some(ebo) = &self.ebo {
                gl.DeleteBuffers(1, ebo);
            }
        }
    }
}

/// Clears the color buffer.
pub fn clear(gl: &gl::Gl, [r, g, b, a]: [f32; 4]) {
    unsafe {
        gl.ClearColor(r, g, b, a);
        gl.Clear(gl::COLOR_BUFFER_BIT);
    }
}

/// Loads an image into a new mipmapped texture with repeat wrapping.
///
/// A missing or undecodable file is logged and replaced by a checkerboard, so the demo keeps
/// running.
pub fn load_texture(gl: &gl::Gl, path: &Path) -> GLuint {
    let image = match image::open(path) {
        // OpenGL expects the first row at the bottom
        Ok(image) => image.flipv().into_rgba8(),
        Err(err) => {
            log::warn!("Failed to load texture {}: {}", path.display(), err);
            checkerboard(64)
        },
    };

    let (width, height) = image.dimensions();
    let mut texture = 0;

    unsafe {
        gl.GenTextures(1, &mut texture);
        gl.BindTexture(gl::TEXTURE_2D, texture);

        gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as GLint);
        gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as GLint);
        gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR_MIPMAP_LINEAR as GLint);
        gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);

        gl.TexImage2D(gl::TEXTURE_2D, 0, gl::RGBA as GLint, width as GLsizei, height as GLsizei,
                      0, gl::RGBA, gl::UNSIGNED_BYTE, image.as_ptr() as *const _);
        gl.GenerateMipmap(gl::TEXTURE_2D);
    }

    texture
}

/// Binds `texture` to texture unit `unit`.
pub fn bind_texture(gl: &gl::Gl, unit: u32, texture: GLuint) {
    unsafe {
        gl.ActiveTexture(gl::TEXTURE0 + unit);
        gl.BindTexture(gl::TEXTURE_2D, texture);
    }
}

pub fn delete_texture(gl: &gl::Gl, texture: GLuint) {
    unsafe { gl.DeleteTextures(1, &texture) };
}

fn checkerboard(size: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(size, size, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            image::Rgba([255, 0, 255, 255])
        } else {
            image::Rgba([32, 32, 32, 255])
        }
    })
}
