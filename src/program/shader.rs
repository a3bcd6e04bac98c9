use std::ffi::CString;
use std::rc::Rc;

use log::error;

use crate::backend::Facade;
use crate::context::Context;
use crate::program::{ProgramCreationError, ShaderStage, INFO_LOG_CAPACITY};
use crate::{gl, GlObject};

/// A single, compiled but unlinked, shader.
///
/// The shader object is deleted when this is dropped. A shader that is still attached to a
/// program is only flagged for deletion by the driver, so this is safe right after linking.
pub struct Shader {
    context: Rc<Context>,
    id: gl::types::GLuint,
}

impl GlObject for Shader {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.functions.delete_shader(self.id) };
    }
}

/// Builds an individual shader.
///
/// On failure the stage's info log is reported through `log::error!` before being returned.
pub fn build_shader<F: ?Sized>(facade: &F, stage: ShaderStage, source_code: &str)
                               -> Result<Shader, ProgramCreationError> where F: Facade
{
    let source_code = CString::new(source_code.as_bytes()).map_err(|_| {
        report(ProgramCreationError::CompilationError(
            "the source code contains a nul byte".to_owned(), stage))
    })?;

    let id = {
        let ctxt = facade.get_context().make_current();
        unsafe { ctxt.functions.create_shader(stage.to_glenum()) }
    };
    if id == 0 {
        return Err(report(ProgramCreationError::ShaderTypeNotSupported(stage)));
    }

    // from now on the shader object is deleted when `shader` goes out of scope
    let shader = Shader {
        context: facade.get_context().clone(),
        id,
    };

    let ctxt = facade.get_context().make_current();

    unsafe {
        ctxt.functions.shader_source(id, &source_code);
        ctxt.functions.compile_shader(id);
    }

    // checking compilation success by reading a flag on the shader
    if unsafe { ctxt.functions.compile_status(id) } {
        return Ok(shader);
    }

    let log = unsafe { ctxt.functions.shader_info_log(id, INFO_LOG_CAPACITY) };
    drop(ctxt);     // `shader` needs the context to delete itself

    Err(report(ProgramCreationError::CompilationError(info_log_to_string(log), stage)))
}

/// Turns a raw info log into a message, never returning an empty string.
pub fn info_log_to_string(log: Vec<u8>) -> String {
    let message = match String::from_utf8(log) {
        Ok(msg) => msg,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    };

    // drivers pad the log with nul bytes and trailing newlines
    let message = message.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());

    if message.is_empty() {
        "the driver didn't provide an info log".to_owned()
    } else {
        message.to_owned()
    }
}

/// Logs a creation error in the format of the classic tutorials and passes it through.
pub fn report(err: ProgramCreationError) -> ProgramCreationError {
    match &err {
        ProgramCreationError::CompilationError(log, stage) =>
            error!("ERROR::SHADER::{}::COMPILATION_FAILED\n{}", stage.log_tag(), log),
        ProgramCreationError::LinkingError(log) =>
            error!("ERROR::SHADER::PROGRAM::LINKING_FAILED\n{}", log),
        other => error!("ERROR::SHADER::PROGRAM::CREATION_FAILED\n{}", other),
    }

    err
}

#[cfg(test)]
mod tests {
    use super::info_log_to_string;

    #[test]
    fn info_log_is_trimmed() {
        let log = b"0:1(1): error: syntax error\n\0\0".to_vec();
        assert_eq!(info_log_to_string(log), "0:1(1): error: syntax error");
    }

    #[test]
    fn empty_info_log_gets_a_placeholder() {
        assert!(!info_log_to_string(Vec::new()).is_empty());
        assert!(!info_log_to_string(b"\n\0".to_vec()).is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let log = vec![b'e', b'r', 0xff, b'r'];
        assert_eq!(info_log_to_string(log), "er\u{fffd}r");
    }
}
