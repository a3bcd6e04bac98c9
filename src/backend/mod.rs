/*!

The `backend` module allows one to link between learngl and the OpenGL context.

There are two parts to this module:

 - The `Backend` trait. It represents a window-system context and is what a `Context` is
   built upon.
 - The `Facade` trait. Anything that can hand out a `Rc<Context>`; all the constructors of
   this crate take a `&impl Facade`.

*/
use std::ops::Deref;
use std::os::raw::c_void;
use std::rc::Rc;

pub use crate::context::{Context, ShaderFunctions};
use crate::SwapBuffersError;

#[cfg(feature = "simple_window")]
pub mod glutin;

/// Trait for types that can be used as a backend for a learngl context.
///
/// This trait is unsafe because a bad implementation (returning wrong function pointers,
/// lying about being current) leads to undefined behavior in the driver.
pub unsafe trait Backend {
    /// Swaps buffers at the end of a frame.
    fn swap_buffers(&self) -> Result<(), SwapBuffersError>;

    /// Returns the address of an OpenGL function.
    ///
    /// Must be called in the same thread and after the backend has been made current
    /// with `make_current`.
    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void;

    /// Returns the dimensions of the window, or screen, etc.
    fn get_framebuffer_dimensions(&self) -> (u32, u32);

    /// Resizes the drawable surface. Called after the window has been resized.
    fn resize(&self, new_size: (u32, u32));

    /// Returns true if the OpenGL context is the current one in the thread.
    fn is_current(&self) -> bool;

    /// Makes the OpenGL context the current context in the current thread.
    unsafe fn make_current(&self);
}

unsafe impl<T> Backend for Rc<T> where T: Backend {
    fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        self.deref().swap_buffers()
    }

    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void {
        self.deref().get_proc_address(symbol)
    }

    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.deref().get_framebuffer_dimensions()
    }

    fn resize(&self, new_size: (u32, u32)) {
        self.deref().resize(new_size)
    }

    fn is_current(&self) -> bool {
        self.deref().is_current()
    }

    unsafe fn make_current(&self) {
        self.deref().make_current();
    }
}

/// Trait for types that provide a safe access for learngl functions.
pub trait Facade {
    /// Returns an opaque type that contains the OpenGL state, extensions, version, etc.
    fn get_context(&self) -> &Rc<Context>;
}

impl Facade for Rc<Context> {
    #[inline]
    fn get_context(&self) -> &Rc<Context> {
        self
    }
}

