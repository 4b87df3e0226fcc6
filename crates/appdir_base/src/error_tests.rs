/* 📖 # Why use a separate file for these error tests?

The test cases verify span traces which contain line numbers.

To prevent these line numbers from changing when modifying the main error module, we use a separate file for the tests.
*/

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{AppDirError, AppDirResult, ResultExt};
    use expect_test::expect;
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;
    use tracing::span;
    use tracing::warn_span;
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    // 📖 # Why set up a subscriber in the test?
    // SpanTrace::capture() requires an active tracing subscriber to record span information.
    // We use `try_init()` because tests run concurrently and only one global subscriber can win.
    fn setup_tracing_subscriber() {
        let _ = tracing_subscriber::registry()
            .with(ErrorLayer::default())
            .try_init();
    }

    #[test]
    fn test_error_context_attachment() {
        let error = AppDirError::message("original error")
            .context("first context")
            .context("second context");

        assert_eq!(error.get_context().len(), 2);
        assert_eq!(error.get_context()[0], "first context");
        assert_eq!(error.get_context()[1], "second context");
    }

    #[test]
    fn test_error_with_context_lazy_evaluation() {
        let mut called = false;
        let error = AppDirError::message("error").with_context(|| {
            called = true;
            "lazy context".to_string()
        });

        assert!(called);
        assert_eq!(error.get_context()[0], "lazy context");
    }

    #[test]
    fn test_error_display_with_multiple_contexts() {
        let error = AppDirError::message("root error")
            .context("first")
            .context("second")
            .context("third");
        assert_eq!(error.to_string(), "first: second: third: root error");
    }

    #[test]
    fn test_error_display_file_error() {
        let error = AppDirError::new(ErrorKind::FileError {
            path: PathBuf::from("/tmp/test.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        });
        let display = error.to_string();
        assert!(display.contains("/tmp/test.txt"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_error_display_conflict() {
        let error = AppDirError::conflict("/docs/b.txt").context("Failed to rename a.txt");
        assert_eq!(
            error.to_string(),
            "Failed to rename a.txt: Already exists: /docs/b.txt"
        );
    }

    #[test]
    fn test_error_source_write_error() {
        let error = AppDirError::new(ErrorKind::Write {
            path: PathBuf::from("test.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        });
        assert!(error.source().is_some());
        assert_eq!(error.io_kind(), Some(io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_error_source_decode_error() {
        let source = String::from_utf8(vec![0xFF]).unwrap_err();
        let error = AppDirError::new(ErrorKind::Decode {
            path: PathBuf::from("bad.txt"),
            source,
        });
        assert!(error.source().is_some());
        assert_eq!(error.to_string(), "File is not valid UTF-8: bad.txt");
    }

    #[test]
    fn test_error_source_not_found() {
        let error = AppDirError::not_found("missing.txt");
        assert!(error.source().is_none());
        assert_eq!(error.root_cause().to_string(), "Not found: missing.txt");
    }

    #[test]
    fn test_result_ext_context_success() {
        let result: AppDirResult<i32> = Ok(42);
        let final_result = result.context("operation failed");
        assert_eq!(final_result.unwrap(), 42);
    }

    #[test]
    fn test_result_ext_chaining() {
        let result: AppDirResult<i32> = Err(Box::new(AppDirError::message("root")));
        let final_result = result
            .context("step 1")
            .context("step 2")
            .with_context(|| "step 3".to_string());
        let err = final_result.unwrap_err();
        assert_eq!(err.to_string(), "step 1: step 2: step 3: root");
    }

    #[test]
    fn test_debug_without_span_has_no_trace() {
        let error = AppDirError::message("something went wrong")
            .context("during file processing")
            .context("in batch job");

        expect![[r#"
            something went wrong
            ├─ during file processing
            └─ in batch job
        "#]]
        .assert_debug_eq(&error);
    }

    #[test]
    fn test_debug_nested_errors() {
        let inner_error = AppDirError::not_found("/mock/Documents/a.txt").context("inner context");
        let outer_error = AppDirError::message("outer error")
            .context("outer context")
            .caused_by(inner_error);

        expect![[r#"
            outer error
            ├─ outer context
            └─ cause: Not found: /mock/Documents/a.txt
               └─ inner context
        "#]]
        .assert_debug_eq(&outer_error);
    }

    #[test]
    fn test_debug_multiple_nested_errors() {
        let error_1 = AppDirError::message("error 1").context("context 1");
        let error_2 = AppDirError::message("error 2")
            .context("context 2")
            .caused_by(error_1);
        let error_3 = AppDirError::message("error 3")
            .context("context 3")
            .caused_by(error_2);

        expect![[r#"
            error 3
            ├─ context 3
            └─ cause: error 2
               ├─ context 2
               └─ cause: error 1
                  └─ context 1
        "#]]
        .assert_debug_eq(&error_3);
    }

    #[test]
    fn test_spantrace_is_captured_inside_span() {
        setup_tracing_subscriber();

        let operation_span = span!(tracing::Level::DEBUG, "test_operation", operation_id = 42);
        let _guard = operation_span.enter();

        let error = AppDirError::message("test error message");
        let debug = format!("{:?}", error);

        assert!(debug.starts_with("test error message\nTrace: "));
        assert!(debug.contains("test_operation"));
        assert!(debug.contains("operation_id=42"));
    }

    #[test]
    fn test_spantrace_lists_nested_spans() {
        setup_tracing_subscriber();

        let operation_span = span!(tracing::Level::DEBUG, "operation");
        let _guard = operation_span.enter();
        let outer_span = warn_span!("outer span");
        let _outer_guard = outer_span.enter();

        let error = AppDirError::message("outer error").context("outer context");
        let debug = format!("{:?}", error);

        let outer = debug.find("outer span").unwrap();
        let operation = debug.find("error_tests::tests::operation").unwrap();
        assert!(outer < operation);
    }
}
