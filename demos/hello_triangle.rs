//! A quad drawn as two orange triangles, each with its own vertex array.
use std::error::Error;

use learngl::{Display, Program, ResourceDir};

#[macro_use]
mod support;

#[repr(C)]
#[derive(Copy, Clone)]
struct Vertex {
    position: [f32; 3],
}

implement_vertex!(Vertex, position: 3 => 0);

struct HelloTriangle {
    program: Program,
    first: support::Mesh,
    second: support::Mesh,
}

impl support::Application for HelloTriangle {
    fn new(display: &Display, resources: &ResourceDir) -> Result<Self, Box<dyn Error>> {
        let program = Program::from_files(display, resources.path("shaders/hello_triangle.vs"),
                                          resources.path("shaders/hello_triangle.fs"))?;

        let gl = display.gl();
        let first = support::Mesh::new(gl, &[
            Vertex { position: [0.5, 0.5, 0.0] },    // top right
            Vertex { position: [0.5, -0.5, 0.0] },   // bottom right
            Vertex { position: [-0.5, 0.5, 0.0] },   // top left
        ]);
        let second = support::Mesh::new(gl, &[
            Vertex { position: [0.5, -0.5, 0.0] },   // bottom right
            Vertex { position: [-0.5, -0.5, 0.0] },  // bottom left
            Vertex { position: [-0.5, 0.5, 0.0] },   // top left
        ]);

        Ok(HelloTriangle { program, first, second })
    }

    fn draw_frame(&mut self, display: &Display) {
        let gl = display.gl();
        support::clear(gl, [0.2, 0.3, 0.3, 1.0]);

        self.program.use_program();
        self.first.draw(gl);
        self.second.draw(gl);
    }

    fn destroy(self, display: &Display) {
        let gl = display.gl();
        self.first.delete(gl);
        self.second.delete(gl);
        self.program.release();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    support::run::<HelloTriangle>()
}
