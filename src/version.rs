use std::cmp::Ordering;
use std::fmt;

/// Describes an OpenGL version.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Version(pub Api, pub u8, pub u8);

/// Describes the corresponding API.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Api {
    /// Desktop OpenGL.
    Gl,
    /// OpenGL ES.
    GlEs,
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        if self.0 != other.0 {
            return None;
        }

        match self.1.cmp(&other.1) {
            Ordering::Equal => Some(self.2.cmp(&other.2)),
            a => Some(a)
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Api::Gl => write!(fmt, "OpenGL {}.{}", self.1, self.2),
            Api::GlEs => write!(fmt, "OpenGL ES {}.{}", self.1, self.2),
        }
    }
}

impl Version {
    /// Parses the string returned by `glGetString(GL_VERSION)`.
    ///
    /// Accepts both the desktop form (`"3.3.0 NVIDIA 535.0"`) and the ES form
    /// (`"OpenGL ES 3.2 Mesa"`). Returns `None` if no `major.minor` pair can be found.
    pub fn parse(version: &str) -> Option<Version> {
        let (version, api) = match version.strip_prefix("OpenGL ES ") {
            Some(rest) => (rest, Api::GlEs),
            None => (version, Api::Gl),
        };

        // some ES drivers put a profile suffix right after the number, as in "3.0-something"
        let version = version.split_whitespace().next()?;
        let mut iter = version.split(|c: char| c == '.' || c == '-');
        let major = iter.next()?.parse().ok()?;
        let minor = iter.next()?.parse().ok()?;

        Some(Version(api, major, minor))
    }

    /// Returns true if the programmable vertex/fragment pipeline is part of the core API.
    #[inline]
    pub fn supports_shaders(&self) -> bool {
        *self >= Version(Api::Gl, 2, 0) || *self >= Version(Api::GlEs, 2, 0)
    }
}
