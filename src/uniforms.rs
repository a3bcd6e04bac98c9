/*!
A uniform is a global variable in your program, set from the CPU side by name.

The setters on [`Program`](crate::Program) cover the four types the tutorials use; each of them
goes through [`UniformValue`], which is also the argument of
[`Program::set_uniform`](crate::Program::set_uniform).

```no_run
# fn example(program: &learngl::Program) -> Result<(), learngl::uniforms::UniformError> {
program.use_program();

// samplers are plain integers: the texture unit to read from
program.set_int("texture1", 0)?;
program.set_int("texture2", 1)?;
program.set_float("mixValue", 0.2)?;
# Ok(())
# }
```

Matrices are column-major, the layout of `cgmath::Matrix4` and of GLSL's `mat4`.
*/
pub use crate::program::UniformError;

/// A value that can be uploaded to a uniform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UniformValue {
    /// A `bool` uniform. Uploaded as the integer 1 or 0.
    Bool(bool),
    /// An `int` uniform, or a sampler's texture unit.
    SignedInt(i32),
    /// A `float` uniform.
    Float(f32),
    /// A `mat4` uniform, column-major.
    Mat4([[f32; 4]; 4]),
}

/// What is actually sent to the driver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum RawUniformValue {
    SignedInt(i32),
    Float(f32),
    Mat4([[f32; 4]; 4]),
}

impl UniformValue {
    #[inline]
    pub(crate) fn to_raw(self) -> RawUniformValue {
        match self {
            UniformValue::Bool(b) => RawUniformValue::SignedInt(b as i32),
            UniformValue::SignedInt(v) => RawUniformValue::SignedInt(v),
            UniformValue::Float(v) => RawUniformValue::Float(v),
            UniformValue::Mat4(v) => RawUniformValue::Mat4(v),
        }
    }
}

impl From<bool> for UniformValue {
    #[inline]
    fn from(value: bool) -> UniformValue {
        UniformValue::Bool(value)
    }
}

impl From<i32> for UniformValue {
    #[inline]
    fn from(value: i32) -> UniformValue {
        UniformValue::SignedInt(value)
    }
}

impl From<f32> for UniformValue {
    #[inline]
    fn from(value: f32) -> UniformValue {
        UniformValue::Float(value)
    }
}

impl From<[[f32; 4]; 4]> for UniformValue {
    #[inline]
    fn from(value: [[f32; 4]; 4]) -> UniformValue {
        UniformValue::Mat4(value)
    }
}
