//! A textured quad, tinted by its vertex colors.
use std::error::Error;

use learngl::gl::types::GLuint;
use learngl::{Display, Program, ResourceDir};

#[macro_use]
mod support;

#[repr(C)]
#[derive(Copy, Clone)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
    tex_coords: [f32; 2],
}

implement_vertex!(Vertex, position: 3 => 0, color: 3 => 1, tex_coords: 2 => 2);

const QUAD: [Vertex; 4] = [
    Vertex { position: [0.5, 0.5, 0.0], color: [1.0, 0.0, 0.0], tex_coords: [1.0, 1.0] },   // top right
    Vertex { position: [0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0], tex_coords: [1.0, 0.0] },  // bottom right
    Vertex { position: [-0.5, -0.5, 0.0], color: [0.0, 0.0, 1.0], tex_coords: [0.0, 0.0] }, // bottom left
    Vertex { position: [-0.5, 0.5, 0.0], color: [1.0, 1.0, 0.0], tex_coords: [0.0, 1.0] },  // top left
];

const QUAD_INDICES: [u32; 6] = [
    0, 1, 3, // first triangle
    1, 2, 3, // second triangle
];

struct Textures {
    program: Program,
    quad: support::Mesh,
    texture: GLuint,
}

/// Horizontal shift of the quad in clip space; 0.5 moves it to the right side of the window.
const HORIZON_OFFSET: f32 = 0.0;

impl support::Application for Textures {
    fn new(display: &Display, resources: &ResourceDir) -> Result<Self, Box<dyn Error>> {
        let program = Program::from_files(display, resources.path("shaders/textures.vs"),
                                          resources.path("shaders/textures.fs"))?;

        let gl = display.gl();
        let quad = support::Mesh::indexed(gl, &QUAD, &QUAD_INDICES);
        let texture = support::load_texture(gl, &resources.path("textures/container.jpg"));

        // the sampler reads from texture unit 0
        program.use_program();
        program.set_int("texture1", 0)?;

        Ok(Textures { program, quad, texture })
    }

    fn draw_frame(&mut self, display: &Display) {
        let gl = display.gl();
        support::clear(gl, [0.2, 0.3, 0.3, 1.0]);

        support::bind_texture(gl, 0, self.texture);

        self.program.use_program();
        if let Err(err) = self.program.set_float("horizonOffset", HORIZON_OFFSET) {
            log::warn!("{}", err);
        }
        self.quad.draw(gl);
    }

    fn destroy(self, display: &Display) {
        let gl = display.gl();
        self.quad.delete(gl);
        support::delete_texture(gl, self.texture);
        self.program.release();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    support::run::<Textures>()
}
