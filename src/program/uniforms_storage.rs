use std::cell::RefCell;

use fnv::FnvHashMap;
use smallvec::SmallVec;

use crate::context::{uniform_name, CommandContext};
use crate::gl;
use crate::uniforms::RawUniformValue;

/// Per-program cache of uniform locations and of the last value sent to each location.
pub struct UniformsStorage {
    locations: RefCell<FnvHashMap<String, gl::types::GLint>>,
    values: RefCell<SmallVec<[Option<RawUniformValue>; 16]>>,
}

impl UniformsStorage {
    /// Builds a new empty storage.
    pub fn new() -> UniformsStorage {
        UniformsStorage {
            locations: RefCell::new(FnvHashMap::default()),
            values: RefCell::new(SmallVec::new()),
        }
    }

    /// Returns the location of `name` in `program`, querying the driver the first time.
    ///
    /// Names the program doesn't have resolve to -1, and that answer is cached too. Linked
    /// programs never gain uniforms.
    pub fn location(&self, ctxt: &CommandContext<'_>, program: gl::types::GLuint, name: &str)
                    -> gl::types::GLint
    {
        if let Some(&location) = self.locations.borrow().get(name) {
            return location;
        }

        let location = match uniform_name(name) {
            Some(c_name) => unsafe { ctxt.functions.get_uniform_location(program, &c_name) },
            None => -1,
        };

        self.locations.borrow_mut().insert(name.to_owned(), location);
        location
    }

    /// Compares `value` with the value stored in this object. If the values differ, updates
    /// the storage and calls `glUniform`.
    ///
    /// The program must be current.
    pub fn set_uniform_value(&self, ctxt: &CommandContext<'_>, program: gl::types::GLuint,
                             location: gl::types::GLint, value: RawUniformValue)
    {
        debug_assert!(location >= 0);
        debug_assert_eq!(ctxt.state.program, program);

        let mut values = self.values.borrow_mut();

        if values.len() <= location as usize {
            values.resize(location as usize + 1, None);
        }

        match (value, &mut values[location as usize]) {
            (a, &mut Some(b)) if a == b => (),

            (RawUniformValue::SignedInt(v), target) => {
                *target = Some(value);
                unsafe { ctxt.functions.uniform_1i(location, v) };
            },

            (RawUniformValue::Float(v), target) => {
                *target = Some(value);
                unsafe { ctxt.functions.uniform_1f(location, v) };
            },

            (RawUniformValue::Mat4(v), target) => {
                *target = Some(value);
                unsafe { ctxt.functions.uniform_matrix_4fv(location, &v) };
            },
        }
    }
}
