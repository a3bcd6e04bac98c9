use learngl::Program;

mod support;

#[test]
fn vertex_compilation_failure_is_logged() {
    let (context, _gl) = support::build_context();

    let (program, records) = support::capture_logs(|| {
        Program::from_source(&context, support::INVALID_SOURCE, support::FRAGMENT_SOURCE)
    });
    assert!(program.is_err());

    let errors = support::errors(&records);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("ERROR::SHADER::VERTEX::COMPILATION_FAILED\n"));
    assert!(errors[0].contains("syntax error"));
    assert!(errors[0].contains(support::INVALID_SOURCE));
}

#[test]
fn fragment_compilation_failure_is_logged() {
    let (context, _gl) = support::build_context();

    let (program, records) = support::capture_logs(|| {
        Program::from_source(&context, support::VERTEX_SOURCE, support::INVALID_SOURCE)
    });
    assert!(program.is_err());

    let errors = support::errors(&records);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("ERROR::SHADER::FRAGMENT::COMPILATION_FAILED\n"));
    assert!(errors[0].contains("syntax error"));
}

#[test]
fn both_compilation_failures_are_logged() {
    let (context, _gl) = support::build_context();

    let (_, records) = support::capture_logs(|| {
        Program::from_source(&context, support::INVALID_SOURCE, support::INVALID_SOURCE)
    });

    let errors = support::errors(&records);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("ERROR::SHADER::VERTEX::COMPILATION_FAILED"));
    assert!(errors[1].starts_with("ERROR::SHADER::FRAGMENT::COMPILATION_FAILED"));
}

#[test]
fn linking_failure_is_logged() {
    let (context, _gl) = support::build_context();

    let (program, records) = support::capture_logs(|| {
        Program::from_source(&context, support::VERTEX_SOURCE,
                             support::MISMATCHED_FRAGMENT_SOURCE)
    });
    assert!(program.is_err());

    let errors = support::errors(&records);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("ERROR::SHADER::PROGRAM::LINKING_FAILED\n"));
    assert!(errors[0].contains("TexCoord"));
}

#[test]
fn successful_creation_logs_no_error() {
    let (context, _gl) = support::build_context();

    let (program, records) = support::capture_logs(|| {
        Program::from_source(&context, support::VERTEX_SOURCE, support::FRAGMENT_SOURCE)
    });
    assert!(program.is_ok());
    assert!(support::errors(&records).is_empty());
}

#[test]
fn missing_file_is_logged() {
    let (context, _gl) = support::build_context();

    let (_, records) = support::capture_logs(|| {
        Program::from_files(&context, "surely/not/a/shader.vs", "surely/not/a/shader.fs")
    });

    let errors = support::errors(&records);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("ERROR::SHADER::PROGRAM::CREATION_FAILED\n"));
    assert!(errors[0].contains("shader.vs"));
}
