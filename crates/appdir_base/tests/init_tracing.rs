use appdir_base::tracing::init_tracing;

// Runs in its own binary: the subscriber is process-global.
#[test]
fn test_init_tracing_only_once() {
    init_tracing().unwrap();

    let err = init_tracing().unwrap_err();
    assert!(
        err.to_string()
            .starts_with("Configuration error: Failed to initialize tracing")
    );
}
