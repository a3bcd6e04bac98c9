use std::cell::{Cell, RefCell, RefMut};
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use log::info;

use crate::backend::Backend;
use crate::gl;
use crate::version::Version;
use crate::SwapBuffersError;

pub use self::functions::ShaderFunctions;
pub use self::state::GlState;

pub(crate) use self::functions::uniform_name;

mod functions;
mod state;

/// Stores the state and information required for learngl objects to interact with an
/// OpenGL context.
///
/// Programs keep an `Rc<Context>`, so the context outlives every object created on it.
pub struct Context {
    /// The function table used by programs.
    functions: Rc<dyn ShaderFunctions>,

    /// The generated bindings, when the context was created from a real backend.
    gl: Option<Rc<gl::Gl>>,

    state: RefCell<GlState>,
    version: Version,

    report_missing_uniforms: Cell<bool>,

    /// `None` for contexts built directly on top of a function table.
    backend: Option<Box<dyn Backend>>,
}

/// Gives access to the function table and the tracked state.
///
/// Obtained with `Context::make_current`, which also makes the backend current.
pub struct CommandContext<'a> {
    pub functions: &'a dyn ShaderFunctions,
    pub state: RefMut<'a, GlState>,
    pub version: &'a Version,
    pub report_missing_uniforms: bool,
}

impl<'a> CommandContext<'a> {
    /// Binds `program` with `glUseProgram`, skipping the call if it is already current.
    pub fn bind_program(&mut self, program: gl::types::GLuint) {
        if self.state.program != program {
            unsafe { self.functions.use_program(program) };
            self.state.program = program;
        }
    }
}

/// Error that can happen when creating a context: the OpenGL implementation reported a version
/// without a programmable pipeline, or no usable version at all.
#[derive(Clone, Debug)]
pub struct IncompatibleOpenGl(pub String);

impl fmt::Display for IncompatibleOpenGl {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "The OpenGL implementation is too old to work with learngl: {}", self.0)
    }
}

impl Error for IncompatibleOpenGl {}

impl Context {
    /// Builds a new context on top of a backend.
    ///
    /// The backend is made current and the OpenGL function pointers are loaded from it.
    ///
    /// # Safety
    ///
    /// The backend must return valid function pointers from `get_proc_address` and must keep
    /// the underlying context alive for as long as the returned `Context` exists.
    pub unsafe fn new<B>(backend: B) -> Result<Rc<Context>, IncompatibleOpenGl>
        where B: Backend + 'static
    {
        backend.make_current();

        let gl = Rc::new(gl::Gl::load_with(|symbol| backend.get_proc_address(symbol)));
        let version = check_gl_compatibility(&*gl)?;

        info!("created {} context", version);

        Ok(Rc::new(Context {
            functions: gl.clone(),
            gl: Some(gl),
            state: RefCell::new(GlState::default()),
            version,
            report_missing_uniforms: Cell::new(cfg!(debug_assertions)),
            backend: Some(Box::new(backend)),
        }))
    }

    /// Builds a context around an existing function table, with no window-system backend.
    ///
    /// The version is queried from the table and checked the same way as in `new`.
    pub fn from_functions<F>(functions: F) -> Result<Rc<Context>, IncompatibleOpenGl>
        where F: ShaderFunctions + 'static
    {
        let version = check_gl_compatibility(&functions)?;

        Ok(Rc::new(Context {
            functions: Rc::new(functions),
            gl: None,
            state: RefCell::new(GlState::default()),
            version,
            report_missing_uniforms: Cell::new(cfg!(debug_assertions)),
            backend: None,
        }))
    }

    /// Makes the backend current if needed and returns the command context.
    ///
    /// # Panics
    ///
    /// Panics if a `CommandContext` obtained from this context is still alive.
    pub fn make_current(&self) -> CommandContext<'_> {
        if let Some(backend) = &self.backend {
            if !backend.is_current() {
                unsafe { backend.make_current() };
            }
        }

        CommandContext {
            functions: &*self.functions,
            state: self.state.borrow_mut(),
            version: &self.version,
            report_missing_uniforms: self.report_missing_uniforms.get(),
        }
    }

    /// Returns the function table.
    #[inline]
    pub fn functions(&self) -> &dyn ShaderFunctions {
        &*self.functions
    }

    /// Returns the raw OpenGL bindings, if the context was created from a backend.
    #[inline]
    pub fn gl(&self) -> Option<&gl::Gl> {
        self.gl.as_deref()
    }

    #[inline]
    pub(crate) fn gl_handle(&self) -> Option<Rc<gl::Gl>> {
        self.gl.clone()
    }

    /// Returns the version of OpenGL reported by the driver.
    #[inline]
    pub fn get_version(&self) -> &Version {
        &self.version
    }

    /// Returns the program currently bound on this context, or 0.
    #[inline]
    pub fn current_program(&self) -> gl::types::GLuint {
        self.state.borrow().program
    }

    /// Chooses whether setting a uniform that the program doesn't have returns
    /// `UniformError::NotFound`.
    ///
    /// Defaults to `true` in debug builds and `false` in release builds. When disabled, such
    /// calls are silent no-ops, just like the underlying `glUniform*` call with location -1.
    #[inline]
    pub fn set_report_missing_uniforms(&self, report: bool) {
        self.report_missing_uniforms.set(report);
    }

    /// Returns the current setting of `set_report_missing_uniforms`.
    #[inline]
    pub fn reports_missing_uniforms(&self) -> bool {
        self.report_missing_uniforms.get()
    }

    /// Returns the dimensions of the default framebuffer, or `(0, 0)` without a backend.
    #[inline]
    pub fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.backend.as_ref().map_or((0, 0), |b| b.get_framebuffer_dimensions())
    }

    /// Swaps the buffers of the backend. A no-op without a backend.
    pub fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        match &self.backend {
            Some(backend) => {
                if !backend.is_current() {
                    unsafe { backend.make_current() };
                }

                // this is necessary on Windows 8, or nothing is being displayed
                if let Some(gl) = &self.gl {
                    unsafe { gl.Flush() };
                }

                backend.swap_buffers()
            },
            None => Ok(()),
        }
    }

    /// Resizes the backend's surface after the window changed size.
    pub fn resize(&self, new_size: (u32, u32)) {
        if let Some(backend) = &self.backend {
            backend.resize(new_size);
        }
    }
}

fn check_gl_compatibility<F: ?Sized>(functions: &F) -> Result<Version, IncompatibleOpenGl>
    where F: ShaderFunctions
{
    let version_string = unsafe { functions.version_string() }
        .ok_or_else(|| IncompatibleOpenGl("glGetString(GL_VERSION) returned null".to_owned()))?;

    let version = Version::parse(&version_string).ok_or_else(|| {
        IncompatibleOpenGl(format!("could not parse the version string {:?}", version_string))
    })?;

    if !version.supports_shaders() {
        return Err(IncompatibleOpenGl(format!(
            "{} doesn't support vertex/fragment shaders", version
        )));
    }

    Ok(version)
}
