use crate::gl;

/// Represents the part of the OpenGL state that this crate tracks.
///
/// The current state is passed to each function through the `CommandContext` and can be
/// freely updated.
#[derive(Debug, Default)]
pub struct GlState {
    /// The program bound with `glUseProgram`, or 0.
    pub program: gl::types::GLuint,
}
