//! A triangle with per-vertex colors, drawn upside down by its vertex shader.
//!
//! Left and right arrows move it horizontally through the `horizonOffset` uniform.
use std::error::Error;

use learngl::{Display, Program, ResourceDir};
use winit::event::VirtualKeyCode;

#[macro_use]
mod support;

#[repr(C)]
#[derive(Copy, Clone)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

implement_vertex!(Vertex, position: 3 => 0, color: 3 => 1);

struct UpsideDown {
    program: Program,
    triangle: support::Mesh,
    horizon_offset: f32,
}

impl support::Application for UpsideDown {
    fn options() -> learngl::backend::glutin::WindowOptions {
        learngl::backend::glutin::WindowOptions::with_title("LearnOpenGL: upside down")
    }

    fn new(display: &Display, resources: &ResourceDir) -> Result<Self, Box<dyn Error>> {
        let program = Program::from_files(display, resources.path("shaders/upside_down.vs"),
                                          resources.path("shaders/upside_down.fs"))?;

        let vertices = [
            Vertex { position: [0.5, -0.5, 0.0], color: [1.0, 0.0, 0.0] },   // bottom right
            Vertex { position: [-0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0] },  // bottom left
            Vertex { position: [0.0, 0.5, 0.0], color: [0.0, 0.0, 1.0] },    // top
        ];
        let triangle = support::Mesh::new(display.gl(), &vertices);

        Ok(UpsideDown { program, triangle, horizon_offset: 0.0 })
    }

    fn update(&mut self, input: &support::Input, _: std::time::Duration) {
        if input.is_pressed(VirtualKeyCode::Right) {
            self.horizon_offset = (self.horizon_offset + 0.005).min(0.5);
        }
        if input.is_pressed(VirtualKeyCode::Left) {
            self.horizon_offset = (self.horizon_offset - 0.005).max(-0.5);
        }
    }

    fn draw_frame(&mut self, display: &Display) {
        let gl = display.gl();
        support::clear(gl, [0.2, 0.3, 0.3, 1.0]);

        self.program.use_program();
        if let Err(err) = self.program.set_float("horizonOffset", self.horizon_offset) {
            log::warn!("{}", err);
        }
        self.triangle.draw(gl);
    }

    fn destroy(self, display: &Display) {
        self.triangle.delete(display.gl());
        self.program.release();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    support::run::<UpsideDown>()
}
