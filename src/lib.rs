/*!
Shader programs for learning OpenGL.

# Initialization

With the default `simple_window` feature, a window and its OpenGL context are opened with a
[`SimpleWindowBuilder`](backend::glutin::SimpleWindowBuilder), configured through
[`WindowOptions`](backend::glutin::WindowOptions):

```no_run
use learngl::backend::glutin::{SimpleWindowBuilder, WindowOptions};

let event_loop = winit::event_loop::EventLoopBuilder::new().build();
let (window, display) = SimpleWindowBuilder::from_options(WindowOptions::with_title("LearnOpenGL"))
    .build(&event_loop)
    .unwrap();
```

The `display` object is the most important object of this library: every program is created
on it, and it gives access to the raw OpenGL bindings for everything this crate doesn't wrap
(buffers, vertex arrays, textures, draw calls).

# Programs

A program is a vertex shader and a fragment shader linked together. Compilation and link
errors come back as a [`ProgramCreationError`] carrying the driver's info log, and are also
logged through the `log` crate.

```no_run
# fn example(display: &learngl::Display) -> Result<(), Box<dyn std::error::Error>> {
let program = learngl::Program::from_files(display, "shaders/shader.vs", "shaders/shader.fs")?;

program.use_program();
program.set_float("mixValue", 0.2)?;

// ... draw ...

program.release();
# Ok(())
# }
```

Setting a uniform that doesn't exist in the program is a no-op, exactly like in OpenGL. In
debug builds it is also reported as a [`UniformError`](uniforms::UniformError); see
[`Context::set_report_missing_uniforms`].

*/
#![warn(missing_docs)]

#[cfg(feature = "simple_window")]
pub use crate::backend::glutin::{Display, DisplayCreationError};
#[cfg(feature = "simple_window")]
pub use glutin;
#[cfg(feature = "simple_window")]
pub use winit;

pub use crate::backend::Facade;
pub use crate::context::{Context, IncompatibleOpenGl, ShaderFunctions};
pub use crate::program::{Program, ProgramCreationError, ShaderStage, SourceCode};
pub use crate::program::ProgramCreationError::{CompilationError, LinkingError};
pub use crate::resources::ResourceDir;
pub use crate::version::{Api, Version};

use std::error::Error;
use std::fmt;

pub mod backend;
pub mod program;
pub mod resources;
pub mod uniforms;

mod context;
mod version;

/// The OpenGL 3.3 core bindings generated at build time.
#[allow(clippy::all, missing_docs, non_camel_case_types, non_snake_case, non_upper_case_globals)]
#[allow(unused_imports, dead_code)]
pub mod gl {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

/// Trait for objects that are OpenGL objects.
pub trait GlObject {
    /// The type of identifier for this object.
    type Id;

    /// Returns the id of the object.
    fn get_id(&self) -> Self::Id;
}

/// Error that can happen when swapping buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapBuffersError {
    /// The OpenGL context has been lost and needs to be recreated. The `Display` and all the
    /// objects associated to it (programs, buffers, textures) are now unusable.
    ContextLost,

    /// The window system reported another error.
    Other(String),
}

impl fmt::Display for SwapBuffersError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            SwapBuffersError::ContextLost =>
                fmt.write_str("the OpenGL context has been lost and needs to be recreated"),
            SwapBuffersError::Other(err) => write!(fmt, "could not swap buffers: {}", err),
        }
    }
}

impl Error for SwapBuffersError {}
