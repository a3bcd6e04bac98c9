//! Two textures blended by the `mixValue` uniform. Hold the up and down arrows to change it.
use std::error::Error;
use std::time::Duration;

use learngl::gl::types::GLuint;
use learngl::{Display, Program, ResourceDir};
use winit::event::VirtualKeyCode;

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
    Vertex { position: [0.5, 0.5, 0.0], color: [1.0, 0.0, 0.0], tex_coords: [1.0, 1.0] },
    Vertex { position: [0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0], tex_coords: [1.0, 0.0] },
    Vertex { position: [-0.5, -0.5, 0.0], color: [0.0, 0.0, 1.0], tex_coords: [0.0, 0.0] },
    Vertex { position: [-0.5, 0.5, 0.0], color: [1.0, 1.0, 0.0], tex_coords: [0.0, 1.0] },
];

const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Change of `mix_value` per frame while an arrow is held.
const MIX_STEP: f32 = 0.001;

struct TexturesCombined {
    program: Program,
    quad: support::Mesh,
    textures: [GLuint; 2],
    mix_value: f32,
}

impl support::Application for TexturesCombined {
    fn options() -> learngl::backend::glutin::WindowOptions {
        learngl::backend::glutin::WindowOptions::with_title("LearnOpenGL: mixing textures")
    }

    fn new(display: &Display, resources: &ResourceDir) -> Result<Self, Box<dyn Error>> {
        let program = Program::from_files(display, resources.path("shaders/textures.vs"),
                                          resources.path("shaders/textures_combined.fs"))?;

        let gl = display.gl();
        let quad = support::Mesh::indexed(gl, &QUAD, &QUAD_INDICES);
        let textures = [
            support::load_texture(gl, &resources.path("textures/container.jpg")),
            support::load_texture(gl, &resources.path("textures/awesomeface.png")),
        ];

        // tell each sampler which texture unit it belongs to (only has to be done once)
        program.use_program();
        program.set_int("texture1", 0)?;
        program.set_int("texture2", 1)?;

        Ok(TexturesCombined { program, quad, textures, mix_value: 0.2 })
    }

    fn update(&mut self, input: &support::Input, _: Duration) {
        if input.is_pressed(VirtualKeyCode::Up) {
            self.mix_value += MIX_STEP;
        }
        if input.is_pressed(VirtualKeyCode::Down) {
            self.mix_value -= MIX_STEP;
        }
        self.mix_value = self.mix_value.clamp(0.0, 1.0);
    }

    fn draw_frame(&mut self, display: &Display) {
        let gl = display.gl();
        support::clear(gl, [0.2, 0.3, 0.3, 1.0]);

        support::bind_texture(gl, 0, self.textures[0]);
        support::bind_texture(gl, 1, self.textures[1]);

        self.program.use_program();
        if let Err(err) = self.program.set_float("horizonOffset", 0.0) {
            log::warn!("{}", err);
        }
        if let Err(err) = self.program.set_float("mixValue", self.mix_value) {
            log::warn!("{}", err);
        }
        self.quad.draw(gl);
    }

    fn destroy(self, display: &Display) {
        let gl = display.gl();
        self.quad.delete(gl);
        for texture in self.textures {
            support::delete_texture(gl, texture);
        }
        self.program.release();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    support::run::<TexturesCombined>()
}
