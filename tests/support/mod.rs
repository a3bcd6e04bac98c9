/*!
Test supports module.

Provides `MockGl`, a recording stand-in for the OpenGL driver. It understands just enough GLSL
to be useful: a stage compiles if it has a `#version` line and a `main` function, stages link
if every `in` of the fragment shader is an `out` of the vertex shader, and every `uniform`
declaration of a linked program gets a location.

*/

#![allow(dead_code)]

use std::cell::{Ref, RefCell};
use std::ffi::CStr;
use std::rc::Rc;
use std::sync::Once;

use fnv::FnvHashMap;
use learngl::gl;
use learngl::gl::types::{GLenum, GLint, GLuint};
use learngl::{Context, ShaderFunctions};

/// A vertex shader with two uniforms, outputting a color.
pub const VERTEX_SOURCE: &str = "
    #version 330 core
    layout (location = 0) in vec3 aPos;
    layout (location = 1) in vec3 aColor;

    out vec3 ourColor;

    uniform mat4 transform;
    uniform float horizonOffset;

    void main() {
        gl_Position = transform * vec4(aPos.x + horizonOffset, aPos.y, aPos.z, 1.0);
        ourColor = aColor;
    }
";

/// A fragment shader using the color of `VERTEX_SOURCE` and a few uniforms of each type.
pub const FRAGMENT_SOURCE: &str = "
    #version 330 core
    in vec3 ourColor;
    out vec4 FragColor;

    uniform sampler2D texture1;
    uniform float mixValue;
    uniform bool flipped;
    uniform int mode;

    void main() {
        FragColor = vec4(ourColor * mixValue, 1.0);
    }
";

/// A fragment shader reading a varying that `VERTEX_SOURCE` doesn't write.
pub const MISMATCHED_FRAGMENT_SOURCE: &str = "
    #version 330 core
    in vec2 TexCoord;
    out vec4 FragColor;

    void main() {
        FragColor = vec4(TexCoord, 0.0, 1.0);
    }
";

/// Source code that no compiler accepts.
pub const INVALID_SOURCE: &str = "invalid glsl code";

/// A driver call that `MockGl` records.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateShader(GLuint),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    DeleteProgram(GLuint),
    UseProgram(GLuint),
    GetUniformLocation(GLuint, String),
    Uniform1i(GLint, GLint),
    Uniform1f(GLint, f32),
    UniformMatrix4fv(GLint, [[f32; 4]; 4]),
}

/// A value stored in a mock program.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MockValue {
    Int(GLint),
    Float(f32),
    Mat4([[f32; 4]; 4]),
}

#[derive(Debug)]
pub struct MockShader {
    pub shader_type: GLenum,
    pub source: String,
    pub compiled: bool,
}

#[derive(Debug, Default)]
pub struct MockProgram {
    pub attached: Vec<GLuint>,
    pub linked: bool,
    pub info_log: String,
    /// name -> location
    pub uniforms: FnvHashMap<String, GLint>,
    /// location -> value
    pub values: FnvHashMap<GLint, MockValue>,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub version: Option<String>,
    pub next_id: GLuint,
    pub shaders: FnvHashMap<GLuint, MockShader>,
    pub programs: FnvHashMap<GLuint, MockProgram>,
    pub bound_program: GLuint,
    pub calls: Vec<Call>,
    /// when set, `glCreateShader` fails for this type
    pub refused_shader_type: Option<GLenum>,
    /// `capacity` argument of every info log read
    pub log_capacities: Vec<usize>,
}

/// Recording driver. Clones share their state.
#[derive(Clone, Debug)]
pub struct MockGl(Rc<RefCell<MockState>>);

impl MockGl {
    pub fn new() -> MockGl {
        MockGl::with_version("3.3.0 Mock")
    }

    pub fn with_version(version: &str) -> MockGl {
        MockGl(Rc::new(RefCell::new(MockState {
            version: Some(version.to_owned()),
            next_id: 1,
            ..Default::default()
        })))
    }

    pub fn state(&self) -> Ref<'_, MockState> {
        self.0.borrow()
    }

    pub fn refuse_shader_type(&self, shader_type: GLenum) {
        self.0.borrow_mut().refused_shader_type = Some(shader_type);
    }

    /// Shader objects that exist and haven't been deleted.
    pub fn live_shaders(&self) -> usize {
        self.0.borrow().shaders.len()
    }

    /// Program objects that exist and haven't been deleted.
    pub fn live_programs(&self) -> usize {
        self.0.borrow().programs.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn count_calls<P: Fn(&Call) -> bool>(&self, predicate: P) -> usize {
        self.0.borrow().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn bound_program(&self) -> GLuint {
        self.0.borrow().bound_program
    }

    /// Value stored for `name` in `program`, bypassing `glGetUniform`.
    pub fn value(&self, program: GLuint, name: &str) -> Option<MockValue> {
        let state = self.0.borrow();
        let program = state.programs.get(&program)?;
        let location = program.uniforms.get(name)?;
        program.values.get(location).copied()
    }

    fn record(&self, call: Call) {
        self.0.borrow_mut().calls.push(call);
    }

    fn upload(&self, location: GLint, value: MockValue) {
        // location -1 is silently ignored, like a real driver does
        if location < 0 {
            return;
        }

        let mut state = self.0.borrow_mut();
        let bound = state.bound_program;
        if let Some(program) = state.programs.get_mut(&bound) {
            if program.uniforms.values().any(|&l| l == location) {
                program.values.insert(location, value);
            }
        }
    }

    fn read(&self, program: GLuint, location: GLint) -> Option<MockValue> {
        let state = self.0.borrow();
        let program = state.programs.get(&program)?;
        if !program.uniforms.values().any(|&l| l == location) {
            return None;
        }
        Some(program.values.get(&location).copied().unwrap_or(MockValue::Int(0)))
    }
}

/// Names declared with `keyword` (`in`, `out`, `uniform`) in `source`, with their types.
pub fn declarations<'a>(source: &'a str, keyword: &str) -> Vec<(&'a str, &'a str)> {
    source.lines()
        .map(str::trim)
        .filter_map(|line| {
            let mut words = line.trim_end_matches(';').split_whitespace();
            if words.next()? != keyword {
                return None;
            }
            let ty = words.next()?;
            let name = words.next()?;
            Some((ty, name))
        })
        .collect()
}

fn compiles(source: &str) -> bool {
    source.contains("#version") && source.contains("void main()")
}

impl ShaderFunctions for MockGl {
    unsafe fn version_string(&self) -> Option<String> {
        self.0.borrow().version.clone()
    }

    unsafe fn create_shader(&self, shader_type: GLenum) -> GLuint {
        let mut state = self.0.borrow_mut();
        if state.refused_shader_type == Some(shader_type) {
            return 0;
        }

        let id = state.next_id;
        state.next_id += 1;
        state.shaders.insert(id, MockShader { shader_type, source: String::new(), compiled: false });
        state.calls.push(Call::CreateShader(id));
        id
    }

    unsafe fn shader_source(&self, shader: GLuint, source: &CStr) {
        let mut state = self.0.borrow_mut();
        let shader = state.shaders.get_mut(&shader).expect("glShaderSource on a deleted shader");
        shader.source = source.to_string_lossy().into_owned();
    }

    unsafe fn compile_shader(&self, shader: GLuint) {
        self.record(Call::CompileShader(shader));
        let mut state = self.0.borrow_mut();
        let shader = state.shaders.get_mut(&shader).expect("glCompileShader on a deleted shader");
        shader.compiled = compiles(&shader.source);
    }

    unsafe fn compile_status(&self, shader: GLuint) -> bool {
        self.0.borrow().shaders.get(&shader).map_or(false, |s| s.compiled)
    }

    unsafe fn shader_info_log(&self, shader: GLuint, capacity: usize) -> Vec<u8> {
        let mut state = self.0.borrow_mut();
        state.log_capacities.push(capacity);
        let mut log = match state.shaders.get(&shader) {
            Some(s) if !s.compiled => {
                format!("0:1(1): error: syntax error, unexpected end of file in `{}`\n",
                        s.source.trim()).into_bytes()
            },
            _ => Vec::new(),
        };
        log.truncate(capacity);
        log
    }

    unsafe fn delete_shader(&self, shader: GLuint) {
        self.record(Call::DeleteShader(shader));
        let removed = self.0.borrow_mut().shaders.remove(&shader);
        assert!(removed.is_some(), "shader {} deleted twice", shader);
    }

    unsafe fn create_program(&self) -> GLuint {
        let mut state = self.0.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.programs.insert(id, MockProgram::default());
        state.calls.push(Call::CreateProgram(id));
        id
    }

    unsafe fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::AttachShader(program, shader));
        let mut state = self.0.borrow_mut();
        assert!(state.shaders.contains_key(&shader), "attaching a deleted shader");
        let program = state.programs.get_mut(&program).expect("attaching to a deleted program");
        program.attached.push(shader);
    }

    unsafe fn link_program(&self, program: GLuint) {
        self.record(Call::LinkProgram(program));
        let mut state = self.0.borrow_mut();

        let attached = state.programs[&program].attached.clone();
        let sources: Vec<(GLenum, String)> = attached.iter()
            .map(|id| {
                let shader = &state.shaders[id];
                assert!(shader.compiled, "linking a shader that didn't compile");
                (shader.shader_type, shader.source.clone())
            })
            .collect();

        let stage = |ty: GLenum| sources.iter().find(|(t, _)| *t == ty).map(|(_, s)| s.as_str());
        let (vertex, fragment) = match (stage(gl::VERTEX_SHADER), stage(gl::FRAGMENT_SHADER)) {
            (Some(v), Some(f)) => (v, f),
            _ => {
                let program = state.programs.get_mut(&program).unwrap();
                program.linked = false;
                program.info_log = "error: a vertex and a fragment shader are required".to_owned();
                return;
            },
        };

        let outputs = declarations(vertex, "out");
        let missing = declarations(fragment, "in").into_iter()
            .find(|input| !outputs.contains(input));

        let mut uniforms = FnvHashMap::default();
        for (_, name) in declarations(vertex, "uniform").into_iter()
            .chain(declarations(fragment, "uniform"))
        {
            let next = uniforms.len() as GLint;
            uniforms.entry(name.to_owned()).or_insert(next);
        }

        let program = state.programs.get_mut(&program).unwrap();
        match missing {
            Some((_, name)) => {
                program.linked = false;
                program.info_log = format!("error: fragment shader input `{}` has no equivalent \
                                            output in the vertex shader", name);
            },
            None => {
                program.linked = true;
                program.uniforms = uniforms;
            },
        }
    }

    unsafe fn link_status(&self, program: GLuint) -> bool {
        self.0.borrow().programs.get(&program).map_or(false, |p| p.linked)
    }

    unsafe fn program_info_log(&self, program: GLuint, capacity: usize) -> Vec<u8> {
        let mut state = self.0.borrow_mut();
        state.log_capacities.push(capacity);
        let mut log = state.programs.get(&program)
            .map(|p| p.info_log.clone().into_bytes())
            .unwrap_or_default();
        log.truncate(capacity);
        log
    }

    unsafe fn delete_program(&self, program: GLuint) {
        self.record(Call::DeleteProgram(program));
        let mut state = self.0.borrow_mut();
        let removed = state.programs.remove(&program);
        assert!(removed.is_some(), "program {} deleted twice", program);
        if state.bound_program == program {
            // the driver keeps it alive until unbound, which the tests treat as a leak
            panic!("program {} deleted while bound", program);
        }
    }

    unsafe fn use_program(&self, program: GLuint) {
        self.record(Call::UseProgram(program));
        let mut state = self.0.borrow_mut();
        if program != 0 {
            let linked = state.programs.get(&program).map_or(false, |p| p.linked);
            assert!(linked, "glUseProgram({}) on a program that isn't linked", program);
        }
        state.bound_program = program;
    }

    unsafe fn get_uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        let name = name.to_string_lossy().into_owned();
        self.record(Call::GetUniformLocation(program, name.clone()));
        let state = self.0.borrow();
        state.programs.get(&program)
            .and_then(|p| p.uniforms.get(&name).copied())
            .unwrap_or(-1)
    }

    unsafe fn uniform_1i(&self, location: GLint, value: GLint) {
        self.record(Call::Uniform1i(location, value));
        self.upload(location, MockValue::Int(value));
    }

    unsafe fn uniform_1f(&self, location: GLint, value: f32) {
        self.record(Call::Uniform1f(location, value));
        self.upload(location, MockValue::Float(value));
    }

    unsafe fn uniform_matrix_4fv(&self, location: GLint, value: &[[f32; 4]; 4]) {
        self.record(Call::UniformMatrix4fv(location, *value));
        self.upload(location, MockValue::Mat4(*value));
    }

    unsafe fn get_uniform_iv(&self, program: GLuint, location: GLint) -> GLint {
        match self.read(program, location) {
            Some(MockValue::Int(v)) => v,
            Some(MockValue::Float(v)) => v as GLint,
            Some(MockValue::Mat4(m)) => m[0][0] as GLint,
            None => 0,
        }
    }

    unsafe fn get_uniform_fv(&self, program: GLuint, location: GLint) -> f32 {
        match self.read(program, location) {
            Some(MockValue::Int(v)) => v as f32,
            Some(MockValue::Float(v)) => v,
            Some(MockValue::Mat4(m)) => m[0][0],
            None => 0.0,
        }
    }
}

/// Builds a context over a fresh `MockGl` and returns both.
pub fn build_context() -> (Rc<Context>, MockGl) {
    let gl = MockGl::new();
    let context = Context::from_functions(gl.clone()).expect("the mock reports OpenGL 3.3");
    (context, gl)
}

/// Builds a context and a program from `VERTEX_SOURCE` and `FRAGMENT_SOURCE`.
pub fn build_program() -> (learngl::Program, Rc<Context>, MockGl) {
    let (context, gl) = build_context();
    let program = learngl::Program::from_source(&context, VERTEX_SOURCE, FRAGMENT_SOURCE)
        .expect("the test sources are valid");
    (program, context, gl)
}

/// A `log::Log` keeping the records of each thread apart, so that tests running in parallel
/// only see their own.
struct CaptureLogger;

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let message = record.args().to_string();
        RECORDS.with(|records| records.borrow_mut().push((record.level(), message)));
    }

    fn flush(&self) { }
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;
static INSTALL_LOGGER: Once = Once::new();

/// Runs `f` and returns what it logged on this thread.
pub fn capture_logs<F, R>(f: F) -> (R, Vec<(log::Level, String)>) where F: FnOnce() -> R {
    INSTALL_LOGGER.call_once(|| {
        log::set_logger(&CAPTURE_LOGGER).expect("no other logger in the test binary");
        log::set_max_level(log::LevelFilter::Trace);
    });

    RECORDS.with(|records| records.borrow_mut().clear());
    let result = f();
    let records = RECORDS.with(|records| records.borrow_mut().drain(..).collect());
    (result, records)
}

/// The error-level messages among `records`.
pub fn errors(records: &[(log::Level, String)]) -> Vec<&str> {
    records.iter()
        .filter(|(level, _)| *level == log::Level::Error)
        .map(|(_, message)| message.as_str())
        .collect()
}
