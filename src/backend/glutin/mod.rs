/*!

Backend implementation for the glutin library

# Features

Only available if the 'simple_window' feature is enabled.

*/
pub use self::simple_window_builder::{SimpleWindowBuilder, WindowOptions};

pub mod simple_window_builder;

use std::cell::Cell;
use std::error::Error;
use std::ffi::CString;
use std::fmt;
use std::num::NonZeroU32;
use std::ops::Deref;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

use glutin::context::PossiblyCurrentContext;
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, WindowSurface};

use crate::backend::{Backend, Context, Facade};
use crate::context::IncompatibleOpenGl;
use crate::gl;
use crate::SwapBuffersError;

/// A GL context combined with a facade for drawing upon.
///
/// The `Display` keeps the glutin context/surface pair alive alongside the learngl context.
#[derive(Clone)]
pub struct Display {
    // contains everything related to the current context and its state
    context: Rc<Context>,
    // the glutin context and surface, shared with the backend
    gl_context: Rc<ContextSurfacePair>,
    // the raw bindings, for the calls that this crate doesn't wrap
    gl: Rc<gl::Gl>,
    // used to check whether the framebuffer dimensions have changed between frames
    last_framebuffer_dimensions: Cell<(u32, u32)>,
}

/// An implementation of the `Backend` trait for glutin.
#[derive(Clone)]
pub struct GlutinBackend(Rc<ContextSurfacePair>);

/// A glutin context that is current together with the surface it draws to.
pub struct ContextSurfacePair {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
}

impl ContextSurfacePair {
    fn new(context: PossiblyCurrentContext, surface: Surface<WindowSurface>) -> Self {
        Self { context, surface }
    }

    /// Returns the glutin context.
    #[inline]
    pub fn context(&self) -> &PossiblyCurrentContext {
        &self.context
    }

    /// Returns the glutin surface.
    #[inline]
    pub fn surface(&self) -> &Surface<WindowSurface> {
        &self.surface
    }

    #[inline]
    fn swap_buffers(&self) -> Result<(), glutin::error::Error> {
        self.surface.swap_buffers(&self.context)
    }

    #[inline]
    fn make_current(&self) -> Result<(), glutin::error::Error> {
        self.context.make_current(&self.surface)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.surface.width().unwrap_or(0), self.surface.height().unwrap_or(0))
    }

    fn resize_surface(&self, (width, height): (u32, u32)) {
        // a minimized window reports 0x0, which glutin can't represent
        if let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, width, height);
        }
    }
}

/// Error that can happen while creating a learngl display.
#[derive(Debug)]
pub enum DisplayCreationError {
    /// An error has happened while creating the glutin display, context or surface.
    GlutinError(glutin::error::Error),
    /// The window couldn't be created.
    WindowCreationError(Box<dyn Error>),
    /// The OpenGL implementation is too old.
    IncompatibleOpenGl(IncompatibleOpenGl),
}

impl fmt::Display for DisplayCreationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            DisplayCreationError::GlutinError(err) =>
                write!(fmt, "Error while creating the OpenGL context: {}", err),
            DisplayCreationError::WindowCreationError(err) =>
                write!(fmt, "Error while creating the window: {}", err),
            DisplayCreationError::IncompatibleOpenGl(err) => write!(fmt, "{}", err),
        }
    }
}

impl Error for DisplayCreationError {
    #[inline]
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayCreationError::GlutinError(err) => Some(err),
            DisplayCreationError::WindowCreationError(err) => Some(err.as_ref()),
            DisplayCreationError::IncompatibleOpenGl(err) => Some(err),
        }
    }
}

impl From<glutin::error::Error> for DisplayCreationError {
    #[inline]
    fn from(err: glutin::error::Error) -> DisplayCreationError {
        DisplayCreationError::GlutinError(err)
    }
}

impl From<IncompatibleOpenGl> for DisplayCreationError {
    #[inline]
    fn from(err: IncompatibleOpenGl) -> DisplayCreationError {
        DisplayCreationError::IncompatibleOpenGl(err)
    }
}

impl Display {
    /// Create a new learngl `Display` from a glutin context and window surface.
    ///
    /// The context must already be current on `surface`. Performs a compatibility check to
    /// make sure that the implementation supports vertex and fragment shaders.
    pub fn from_context_surface(
        context: PossiblyCurrentContext,
        surface: Surface<WindowSurface>,
    ) -> Result<Self, IncompatibleOpenGl> {
        let gl_context = Rc::new(ContextSurfacePair::new(context, surface));
        let backend = GlutinBackend(gl_context.clone());
        let framebuffer_dimensions = backend.get_framebuffer_dimensions();

        let context = unsafe { Context::new(backend) }?;

        let gl = context.gl_handle().ok_or_else(|| {
            IncompatibleOpenGl("the OpenGL bindings were not loaded".to_owned())
        })?;

        Ok(Display {
            context,
            gl_context,
            gl,
            last_framebuffer_dimensions: Cell::new(framebuffer_dimensions),
        })
    }

    /// Resizes the surface and the viewport after the window changed size.
    ///
    /// Calling this with the current dimensions does nothing.
    pub fn resize(&self, new_size: (u32, u32)) {
        if self.last_framebuffer_dimensions.get() == new_size {
            return;
        }

        self.last_framebuffer_dimensions.set(new_size);
        self.context.resize(new_size);

        let _ctxt = self.context.make_current();
        unsafe { self.gl.Viewport(0, 0, new_size.0 as gl::types::GLsizei,
                                  new_size.1 as gl::types::GLsizei) };
    }

    /// Borrow the inner glutin context and surface.
    #[inline]
    pub fn context_surface_pair(&self) -> &ContextSurfacePair {
        &self.gl_context
    }

    /// Returns the raw OpenGL bindings.
    ///
    /// The context is made current before returning.
    #[inline]
    pub fn gl(&self) -> &gl::Gl {
        drop(self.context.make_current());
        &self.gl
    }

    /// Presents the frame drawn since the last call.
    #[inline]
    pub fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        self.context.swap_buffers()
    }
}

impl Deref for Display {
    type Target = Context;
    #[inline]
    fn deref(&self) -> &Context {
        &self.context
    }
}

impl Facade for Display {
    #[inline]
    fn get_context(&self) -> &Rc<Context> {
        &self.context
    }
}

impl Deref for GlutinBackend {
    type Target = Rc<ContextSurfacePair>;
    #[inline]
    fn deref(&self) -> &Rc<ContextSurfacePair> {
        &self.0
    }
}

unsafe impl Backend for GlutinBackend {
    #[inline]
    fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        match self.0.swap_buffers() {
            Ok(()) => Ok(()),
            Err(err) if matches!(err.error_kind(), glutin::error::ErrorKind::ContextLost) =>
                Err(SwapBuffersError::ContextLost),
            Err(err) => Err(SwapBuffersError::Other(err.to_string())),
        }
    }

    #[inline]
    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void {
        match CString::new(symbol) {
            Ok(symbol) => self.0.context().display().get_proc_address(&symbol),
            Err(_) => ptr::null(),
        }
    }

    #[inline]
    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    #[inline]
    fn resize(&self, new_size: (u32, u32)) {
        self.0.resize_surface(new_size);
    }

    #[inline]
    fn is_current(&self) -> bool {
        self.0.context().is_current()
    }

    #[inline]
    unsafe fn make_current(&self) {
        if let Err(err) = self.0.make_current() {
            log::error!("failed to make the OpenGL context current: {}", err);
        }
    }
}
