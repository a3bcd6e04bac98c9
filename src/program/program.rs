use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use log::{debug, warn};

use crate::backend::Facade;
use crate::context::{CommandContext, Context};
use crate::gl;
use crate::program::shader::{build_shader, info_log_to_string, report, Shader};
use crate::program::uniforms_storage::UniformsStorage;
use crate::program::{ProgramCreationError, ShaderStage, SourceCode, UniformError};
use crate::program::{COMPILER_GLOBAL_LOCK, INFO_LOG_CAPACITY};
use crate::uniforms::UniformValue;
use crate::GlObject;

/// A vertex shader and a fragment shader linked together.
///
/// A `Program` only exists once both stages compiled and the link succeeded; every failure is
/// returned as a [`ProgramCreationError`] instead.
///
/// The program object is freed by [`release`](Program::release). Since `release` takes the
/// program by value, a released program can't be used again:
///
/// ```compile_fail
/// # fn example(display: &learngl::Display) -> Result<(), learngl::ProgramCreationError> {
/// let program = learngl::Program::from_source(display, "", "")?;
/// program.release();
/// program.use_program();
/// # Ok(())
/// # }
/// ```
///
/// A program that is dropped without being released is freed as well. Either way this
/// happens before the context is destroyed, because the program keeps it alive.
pub struct Program {
    context: Rc<Context>,
    id: gl::types::GLuint,
    uniforms: UniformsStorage,
    released: bool,
}

impl Program {
    /// Builds a new program.
    pub fn new<F: ?Sized>(facade: &F, input: SourceCode<'_>) -> Result<Program, ProgramCreationError>
        where F: Facade
    {
        let SourceCode { vertex_shader, fragment_shader } = input;

        let _lock = COMPILER_GLOBAL_LOCK.lock();

        // both stages are compiled so that both logs get reported
        let vertex = build_shader(facade, ShaderStage::Vertex, vertex_shader);
        let fragment = build_shader(facade, ShaderStage::Fragment, fragment_shader);

        let shaders = match (vertex, fragment) {
            (Ok(vertex), Ok(fragment)) => [vertex, fragment],
            (Err(err), _) | (_, Err(err)) => return Err(err),
        };

        // the shaders are deleted when `shaders` is dropped, linked or not
        let id = link(facade.get_context(), &shaders)?;

        debug!("linked program {}", id);

        Ok(Program {
            context: facade.get_context().clone(),
            id,
            uniforms: UniformsStorage::new(),
            released: false,
        })
    }

    /// Builds a new program from GLSL source code.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn example(display: &learngl::Display) {
    /// let vertex_source = "
    ///     #version 330 core
    ///     layout (location = 0) in vec3 aPos;
    ///     void main() {
    ///         gl_Position = vec4(aPos, 1.0);
    ///     }
    /// ";
    ///
    /// let fragment_source = "
    ///     #version 330 core
    ///     out vec4 FragColor;
    ///     void main() {
    ///         FragColor = vec4(1.0, 0.5, 0.2, 1.0);
    ///     }
    /// ";
    ///
    /// let program = learngl::Program::from_source(display, vertex_source, fragment_source);
    /// # }
    /// ```
    #[inline]
    pub fn from_source<F: ?Sized>(facade: &F, vertex_shader: &str, fragment_shader: &str)
                                  -> Result<Program, ProgramCreationError> where F: Facade
    {
        Program::new(facade, SourceCode { vertex_shader, fragment_shader })
    }

    /// Reads the two stages from files and builds a program from them.
    pub fn from_files<F: ?Sized, P, Q>(facade: &F, vertex_path: P, fragment_path: Q)
                                       -> Result<Program, ProgramCreationError>
        where F: Facade, P: AsRef<Path>, Q: AsRef<Path>
    {
        let vertex_shader = read_source(vertex_path.as_ref())?;
        let fragment_shader = read_source(fragment_path.as_ref())?;

        Program::from_source(facade, &vertex_shader, &fragment_shader)
    }

    /// Makes this program the active one for the next draw calls.
    pub fn use_program(&self) {
        let mut ctxt = self.context.make_current();
        ctxt.bind_program(self.id);
    }

    /// Sets a `bool` uniform. The driver stores it as 1 or 0.
    #[inline]
    pub fn set_bool(&self, name: &str, value: bool) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::Bool(value))
    }

    /// Sets an `int` uniform, or the texture unit of a sampler.
    #[inline]
    pub fn set_int(&self, name: &str, value: i32) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::SignedInt(value))
    }

    /// Sets a `float` uniform.
    #[inline]
    pub fn set_float(&self, name: &str, value: f32) -> Result<(), UniformError> {
        self.set_uniform(name, UniformValue::Float(value))
    }

    /// Sets a `mat4` uniform from a column-major matrix.
    #[inline]
    pub fn set_mat4<M>(&self, name: &str, value: M) -> Result<(), UniformError>
        where M: Into<[[f32; 4]; 4]>
    {
        self.set_uniform(name, UniformValue::Mat4(value.into()))
    }

    /// Looks up `name` and uploads `value`.
    ///
    /// If the program has no active uniform called `name`, nothing is sent to the driver. The
    /// call then returns `Err(UniformError::NotFound)` if the context reports missing uniforms
    /// and `Ok(())` otherwise.
    ///
    /// The program is made current if it isn't already.
    pub fn set_uniform(&self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let mut ctxt = self.context.make_current();

        let location = self.uniforms.location(&ctxt, self.id, name);
        if location < 0 {
            return missing_uniform(&ctxt, self.id, name);
        }

        ctxt.bind_program(self.id);
        self.uniforms.set_uniform_value(&ctxt, self.id, location, value.to_raw());
        Ok(())
    }

    /// Reads back an `int` or `bool` uniform from the driver.
    ///
    /// Returns `None` if the program has no active uniform called `name`.
    pub fn get_int(&self, name: &str) -> Option<i32> {
        let ctxt = self.context.make_current();
        let location = self.uniforms.location(&ctxt, self.id, name);
        if location < 0 {
            return None;
        }

        Some(unsafe { ctxt.functions.get_uniform_iv(self.id, location) })
    }

    /// Reads back a `float` uniform from the driver.
    ///
    /// Returns `None` if the program has no active uniform called `name`.
    pub fn get_float(&self, name: &str) -> Option<f32> {
        let ctxt = self.context.make_current();
        let location = self.uniforms.location(&ctxt, self.id, name);
        if location < 0 {
            return None;
        }

        Some(unsafe { ctxt.functions.get_uniform_fv(self.id, location) })
    }

    /// Frees the program object.
    ///
    /// If the program is the active one, it is unbound first.
    pub fn release(mut self) {
        self.destroy();
    }

    fn destroy(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let mut ctxt = self.context.make_current();

        if ctxt.state.program == self.id {
            ctxt.bind_program(0);
        }

        unsafe { ctxt.functions.delete_program(self.id) };
        debug!("released program {}", self.id);
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(formatter, "Program #{}", self.id)
    }
}

impl GlObject for Program {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        if !self.released {
            debug!("program {} dropped without being released", self.id);
            self.destroy();
        }
    }
}

/// Attaches the shaders to a new program object and links it.
///
/// A program object that fails to link is deleted before returning.
fn link(context: &Rc<Context>, shaders: &[Shader]) -> Result<gl::types::GLuint, ProgramCreationError> {
    let ctxt = context.make_current();

    let id = unsafe { ctxt.functions.create_program() };
    if id == 0 {
        return Err(report(ProgramCreationError::LinkingError(
            "glCreateProgram returned 0".to_owned())));
    }

    unsafe {
        for shader in shaders {
            ctxt.functions.attach_shader(id, shader.get_id());
        }

        ctxt.functions.link_program(id);
    }

    if unsafe { ctxt.functions.link_status(id) } {
        return Ok(id);
    }

    let log = unsafe {
        let log = ctxt.functions.program_info_log(id, INFO_LOG_CAPACITY);
        ctxt.functions.delete_program(id);
        log
    };

    Err(report(ProgramCreationError::LinkingError(info_log_to_string(log))))
}

fn missing_uniform(ctxt: &CommandContext<'_>, program: gl::types::GLuint, name: &str)
                   -> Result<(), UniformError>
{
    if ctxt.report_missing_uniforms {
        warn!("program {} has no active uniform named `{}`", program, name);
        Err(UniformError::NotFound(name.to_owned()))
    } else {
        Ok(())
    }
}

fn read_source(path: &Path) -> Result<String, ProgramCreationError> {
    fs::read_to_string(path).map_err(|error| {
        report(ProgramCreationError::Io { path: path.to_owned(), error })
    })
}
