/*!
Vertex and fragment shaders linked into a [`Program`].

Creating a program compiles both stages, links them and deletes the intermediate shader
objects whatever the outcome. Failures are logged with the driver's info log, in the
`ERROR::SHADER::<STAGE>::COMPILATION_FAILED` format, and returned as a
[`ProgramCreationError`].

Uniforms are set by name on the program; see the [`uniforms`](crate::uniforms) module.
*/
use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use lazy_static::lazy_static;

use crate::gl;

pub use self::program::Program;

mod program;
mod shader;
mod uniforms_storage;

/// Maximum number of bytes read from a shader or program info log.
pub const INFO_LOG_CAPACITY: usize = 512;

// Some shader compilers have race-condition issues, so we lock this mutex
// in the GL thread every time we compile a shader or link a program.
lazy_static! {
    static ref COMPILER_GLOBAL_LOCK: Mutex<()> = Mutex::new(());
}

/// One stage of the programmable pipeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Executed once per vertex.
    Vertex,
    /// Executed once per fragment.
    Fragment,
}

impl ShaderStage {
    /// Returns the `GLenum` passed to `glCreateShader`.
    #[inline]
    pub fn to_glenum(&self) -> gl::types::GLenum {
        match *self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    fn log_tag(&self) -> &'static str {
        match *self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ShaderStage::Vertex => fmt.write_str("vertex shader"),
            ShaderStage::Fragment => fmt.write_str("fragment shader"),
        }
    }
}

/// Error that can be triggered when creating a `Program`.
#[derive(Debug)]
pub enum ProgramCreationError {
    /// Error while compiling one of the shaders.
    CompilationError(String, ShaderStage),

    /// Error while linking the program.
    LinkingError(String),

    /// The driver refused to create a shader object of this type.
    ShaderTypeNotSupported(ShaderStage),

    /// One of the source files couldn't be read.
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying error.
        error: io::Error,
    },
}

impl fmt::Display for ProgramCreationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            ProgramCreationError::CompilationError(s, stage) =>
                write!(formatter, "Compilation error in the {}: {}", stage, s),
            ProgramCreationError::LinkingError(s) =>
                write!(formatter, "Error while linking shaders together: {}", s),
            ProgramCreationError::ShaderTypeNotSupported(stage) =>
                write!(formatter, "The backend refused to create a {}", stage),
            ProgramCreationError::Io { path, error } =>
                write!(formatter, "Could not read {}: {}", path.display(), error),
        }
    }
}

impl Error for ProgramCreationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProgramCreationError::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Represents the source code of a program.
#[derive(Copy, Clone, Debug)]
pub struct SourceCode<'a> {
    /// Source code of the vertex shader.
    pub vertex_shader: &'a str,

    /// Source code of the fragment shader.
    pub fragment_shader: &'a str,
}

/// Error returned by the uniform setters.
///
/// Only produced when the context reports missing uniforms, see
/// [`Context::set_report_missing_uniforms`](crate::Context::set_report_missing_uniforms).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UniformError {
    /// The program has no active uniform with this name.
    ///
    /// This also happens for uniforms that are declared but unused, since the GLSL compiler
    /// is free to optimize them away.
    NotFound(String),
}

impl fmt::Display for UniformError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformError::NotFound(name) =>
                write!(formatter, "The program has no active uniform named `{}`", name),
        }
    }
}

impl Error for UniformError {}
