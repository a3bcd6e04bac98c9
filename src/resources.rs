/*!
Resolution of asset paths.

The tutorials load their shaders and textures from paths like `"./Textures/shader.vs"`, which
only work when the program is started from one particular directory. A [`ResourceDir`] makes
that directory explicit: relative paths are joined to its root instead of to the working
directory of the process.
*/
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A directory that asset paths are resolved against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDir {
    root: PathBuf,
}

impl ResourceDir {
    /// Resolves paths against `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> ResourceDir {
        ResourceDir { root: root.into() }
    }

    /// Resolves paths against the directory of this crate's `Cargo.toml`.
    pub fn from_manifest_dir() -> ResourceDir {
        ResourceDir::new(env!("CARGO_MANIFEST_DIR"))
    }

    /// Resolves paths against the directory named by the environment variable `var`, or
    /// against `fallback` if it isn't set.
    pub fn from_env<P: Into<PathBuf>>(var: &str, fallback: P) -> ResourceDir {
        match env::var_os(var) {
            Some(root) if !root.is_empty() => ResourceDir::new(root),
            _ => ResourceDir::new(fallback),
        }
    }

    /// The root directory.
    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns a new `ResourceDir` for a subdirectory.
    pub fn join<P: AsRef<Path>>(&self, subdirectory: P) -> ResourceDir {
        ResourceDir::new(self.root.join(subdirectory))
    }

    /// Resolves `relative`. Absolute paths are returned unchanged.
    pub fn path<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.root.join(relative)
    }

    /// Reads the UTF-8 file at `relative`.
    pub fn read_to_string<P: AsRef<Path>>(&self, relative: P) -> io::Result<String> {
        fs::read_to_string(self.path(relative))
    }
}
