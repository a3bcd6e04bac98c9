use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};

fn main() {
    let dest = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let mut file = BufWriter::new(
        File::create(Path::new(&dest).join("gl_bindings.rs"))
            .expect("failed to create gl_bindings.rs"),
    );

    // the tutorials target 3.3 core; everything the shader wrapper calls exists since 2.0
    Registry::new(Api::Gl, (3, 3), Profile::Core, Fallbacks::All, [])
        .write_bindings(StructGenerator, &mut file)
        .expect("failed to write the OpenGL bindings");

    println!("cargo:rerun-if-changed=build/main.rs");
}
