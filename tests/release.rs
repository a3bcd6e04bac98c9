use learngl::{GlObject, Program};

mod support;

use support::Call;

#[test]
fn release_deletes_the_program() {
    let (program, _context, gl) = support::build_program();
    let id = program.get_id();

    program.release();

    assert_eq!(gl.calls().iter().filter(|c| **c == Call::DeleteProgram(id)).count(), 1);
    assert_eq!(gl.live_programs(), 0);
}

#[test]
fn release_unbinds_the_current_program() {
    let (program, context, gl) = support::build_program();
    program.use_program();

    program.release();

    assert_eq!(gl.bound_program(), 0);
    assert_eq!(context.current_program(), 0);
    assert_eq!(gl.live_programs(), 0);
}

#[test]
fn release_leaves_other_bindings_alone() {
    let (context, gl) = support::build_context();
    let first = Program::from_source(&context, support::VERTEX_SOURCE,
                                     support::FRAGMENT_SOURCE).unwrap();
    let second = Program::from_source(&context, support::VERTEX_SOURCE,
                                      support::FRAGMENT_SOURCE).unwrap();

    second.use_program();
    first.release();

    assert_eq!(gl.bound_program(), second.get_id());
    assert_eq!(gl.count_calls(|c| *c == Call::UseProgram(0)), 0);
    assert_eq!(gl.live_programs(), 1);
}

#[test]
fn drop_frees_the_program() {
    let (program, _context, gl) = support::build_program();
    program.use_program();

    drop(program);

    assert_eq!(gl.live_programs(), 0);
    assert_eq!(gl.bound_program(), 0);
    assert_eq!(gl.count_calls(|c| matches!(c, Call::DeleteProgram(_))), 1);
}

#[test]
fn rebinding_after_release() {
    let (context, gl) = support::build_context();
    let first = Program::from_source(&context, support::VERTEX_SOURCE,
                                     support::FRAGMENT_SOURCE).unwrap();
    first.use_program();
    first.release();

    // a new program may reuse nothing of the old binding state
    let second = Program::from_source(&context, support::VERTEX_SOURCE,
                                      support::FRAGMENT_SOURCE).unwrap();
    second.use_program();

    assert_eq!(gl.bound_program(), second.get_id());
}

#[test]
fn program_outlives_the_facade_handle() {
    let (context, gl) = support::build_context();
    let program = Program::from_source(&context, support::VERTEX_SOURCE,
                                       support::FRAGMENT_SOURCE).unwrap();

    // the program keeps its own reference to the context
    drop(context);
    program.set_float("mixValue", 0.5).unwrap();
    program.release();

    assert_eq!(gl.live_programs(), 0);
}
