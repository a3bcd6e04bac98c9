use std::ffi::{CStr, CString};
use std::ptr;
use std::rc::Rc;

use crate::gl;
use crate::gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};

/// The driver entry points used to build and drive shader programs.
///
/// This is implemented for the generated OpenGL bindings. Anything else implementing it (a
/// recording mock, a tracing wrapper) can be handed to
/// [`Context::from_functions`](crate::Context::from_functions).
///
/// # Safety
///
/// Every method is a raw driver call: the context that owns the function table must be
/// current on the calling thread, and ids must have been returned by the same table.
pub trait ShaderFunctions {
    /// `glGetString(GL_VERSION)`.
    unsafe fn version_string(&self) -> Option<String>;

    /// `glCreateShader`. Returns 0 on failure.
    unsafe fn create_shader(&self, shader_type: GLenum) -> GLuint;
    /// `glShaderSource` with a single nul-terminated string.
    unsafe fn shader_source(&self, shader: GLuint, source: &CStr);
    /// `glCompileShader`.
    unsafe fn compile_shader(&self, shader: GLuint);
    /// `GL_COMPILE_STATUS` of the shader.
    unsafe fn compile_status(&self, shader: GLuint) -> bool;
    /// `glGetShaderInfoLog`, reading at most `capacity` bytes.
    unsafe fn shader_info_log(&self, shader: GLuint, capacity: usize) -> Vec<u8>;
    /// `glDeleteShader`.
    unsafe fn delete_shader(&self, shader: GLuint);

    /// `glCreateProgram`. Returns 0 on failure.
    unsafe fn create_program(&self) -> GLuint;
    /// `glAttachShader`.
    unsafe fn attach_shader(&self, program: GLuint, shader: GLuint);
    /// `glLinkProgram`.
    unsafe fn link_program(&self, program: GLuint);
    /// `GL_LINK_STATUS` of the program.
    unsafe fn link_status(&self, program: GLuint) -> bool;
    /// `glGetProgramInfoLog`, reading at most `capacity` bytes.
    unsafe fn program_info_log(&self, program: GLuint, capacity: usize) -> Vec<u8>;
    /// `glDeleteProgram`.
    unsafe fn delete_program(&self, program: GLuint);
    /// `glUseProgram`. 0 unbinds.
    unsafe fn use_program(&self, program: GLuint);

    /// `glGetUniformLocation`. Returns -1 for names the program doesn't have.
    unsafe fn get_uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    /// `glUniform1i` on the current program.
    unsafe fn uniform_1i(&self, location: GLint, value: GLint);
    /// `glUniform1f` on the current program.
    unsafe fn uniform_1f(&self, location: GLint, value: f32);
    /// `glUniformMatrix4fv` with a single column-major matrix.
    unsafe fn uniform_matrix_4fv(&self, location: GLint, value: &[[f32; 4]; 4]);
    /// `glGetUniformiv`.
    unsafe fn get_uniform_iv(&self, program: GLuint, location: GLint) -> GLint;
    /// `glGetUniformfv`.
    unsafe fn get_uniform_fv(&self, program: GLuint, location: GLint) -> f32;
}

impl ShaderFunctions for gl::Gl {
    unsafe fn version_string(&self) -> Option<String> {
        let version = self.GetString(gl::VERSION);
        if version.is_null() {
            return None;
        }

        Some(CStr::from_ptr(version as *const GLchar).to_string_lossy().into_owned())
    }

    #[inline]
    unsafe fn create_shader(&self, shader_type: GLenum) -> GLuint {
        self.CreateShader(shader_type)
    }

    #[inline]
    unsafe fn shader_source(&self, shader: GLuint, source: &CStr) {
        self.ShaderSource(shader, 1, [source.as_ptr()].as_ptr(), ptr::null());
    }

    #[inline]
    unsafe fn compile_shader(&self, shader: GLuint) {
        self.CompileShader(shader);
    }

    unsafe fn compile_status(&self, shader: GLuint) -> bool {
        let mut success: GLint = 0;
        self.GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        success == gl::TRUE as GLint
    }

    unsafe fn shader_info_log(&self, shader: GLuint, capacity: usize) -> Vec<u8> {
        let mut log: Vec<u8> = Vec::with_capacity(capacity);
        let mut length: GLsizei = 0;
        self.GetShaderInfoLog(shader, capacity as GLsizei, &mut length,
                              log.as_mut_ptr() as *mut GLchar);
        log.set_len((length.max(0) as usize).min(capacity));
        log
    }

    #[inline]
    unsafe fn delete_shader(&self, shader: GLuint) {
        self.DeleteShader(shader);
    }

    #[inline]
    unsafe fn create_program(&self) -> GLuint {
        self.CreateProgram()
    }

    #[inline]
    unsafe fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.AttachShader(program, shader);
    }

    #[inline]
    unsafe fn link_program(&self, program: GLuint) {
        self.LinkProgram(program);
    }

    unsafe fn link_status(&self, program: GLuint) -> bool {
        let mut success: GLint = 0;
        self.GetProgramiv(program, gl::LINK_STATUS, &mut success);
        success == gl::TRUE as GLint
    }

    unsafe fn program_info_log(&self, program: GLuint, capacity: usize) -> Vec<u8> {
        let mut log: Vec<u8> = Vec::with_capacity(capacity);
        let mut length: GLsizei = 0;
        self.GetProgramInfoLog(program, capacity as GLsizei, &mut length,
                               log.as_mut_ptr() as *mut GLchar);
        log.set_len((length.max(0) as usize).min(capacity));
        log
    }

    #[inline]
    unsafe fn delete_program(&self, program: GLuint) {
        self.DeleteProgram(program);
    }

    #[inline]
    unsafe fn use_program(&self, program: GLuint) {
        self.UseProgram(program);
    }

    #[inline]
    unsafe fn get_uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        self.GetUniformLocation(program, name.as_ptr())
    }

    #[inline]
    unsafe fn uniform_1i(&self, location: GLint, value: GLint) {
        self.Uniform1i(location, value);
    }

    #[inline]
    unsafe fn uniform_1f(&self, location: GLint, value: f32) {
        self.Uniform1f(location, value);
    }

    #[inline]
    unsafe fn uniform_matrix_4fv(&self, location: GLint, value: &[[f32; 4]; 4]) {
        self.UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr() as *const f32);
    }

    unsafe fn get_uniform_iv(&self, program: GLuint, location: GLint) -> GLint {
        let mut value: GLint = 0;
        self.GetUniformiv(program, location, &mut value);
        value
    }

    unsafe fn get_uniform_fv(&self, program: GLuint, location: GLint) -> f32 {
        let mut value = 0.0f32;
        self.GetUniformfv(program, location, &mut value);
        value
    }
}

macro_rules! forward {
    ($($name:ident($($arg:ident: $ty:ty),*) -> $ret:ty;)+) => {
        $(
            #[inline]
            unsafe fn $name(&self, $($arg: $ty),*) -> $ret {
                (**self).$name($($arg),*)
            }
        )+
    };
}

impl<T: ?Sized> ShaderFunctions for Rc<T> where T: ShaderFunctions {
    forward! {
        version_string() -> Option<String>;
        create_shader(shader_type: GLenum) -> GLuint;
        shader_source(shader: GLuint, source: &CStr) -> ();
        compile_shader(shader: GLuint) -> ();
        compile_status(shader: GLuint) -> bool;
        shader_info_log(shader: GLuint, capacity: usize) -> Vec<u8>;
        delete_shader(shader: GLuint) -> ();
        create_program() -> GLuint;
        attach_shader(program: GLuint, shader: GLuint) -> ();
        link_program(program: GLuint) -> ();
        link_status(program: GLuint) -> bool;
        program_info_log(program: GLuint, capacity: usize) -> Vec<u8>;
        delete_program(program: GLuint) -> ();
        use_program(program: GLuint) -> ();
        get_uniform_location(program: GLuint, name: &CStr) -> GLint;
        uniform_1i(location: GLint, value: GLint) -> ();
        uniform_1f(location: GLint, value: f32) -> ();
        uniform_matrix_4fv(location: GLint, value: &[[f32; 4]; 4]) -> ();
        get_uniform_iv(program: GLuint, location: GLint) -> GLint;
        get_uniform_fv(program: GLuint, location: GLint) -> f32;
    }
}

/// Converts a uniform name to the nul-terminated form the driver expects.
///
/// Returns `None` if the name contains an interior nul byte; such a name can't exist in a
/// GLSL program anyway.
pub(crate) fn uniform_name(name: &str) -> Option<CString> {
    CString::new(name).ok()
}
