use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use tracing_error::{SpanTrace, SpanTraceStatus};

/* 📖 # Why a custom error type and not use anyhow/eyre/thiserror etc?

- Callers need to tell "not found" from "already exists" from "bad name" without
  string matching, so the kinds are a closed enum
- Better control over how context and span traces are rendered
- No dependencies to compile and integrate beyond tracing-error
 */

/// Error variants that can occur in appdir operations.
/// Each variant represents a specific error category with its associated context.
#[derive(Debug)]
pub enum ErrorKind {
    /// The target file or directory does not exist
    NotFound { path: PathBuf },

    /// The destination of a rename, move or copy is already occupied
    Conflict { path: PathBuf },

    /// Creating or writing a file failed
    Write { path: PathBuf, source: io::Error },

    /// File contents are not valid UTF-8
    Decode {
        path: PathBuf,
        source: FromUtf8Error,
    },

    /// A file name is empty or malformed
    InvalidName { name: String, reason: String },

    /// The platform cannot supply a requested directory, or configuration is unusable
    Configuration { message: String },

    /// Any other file system failure
    FileError { path: PathBuf, source: io::Error },

    /// Catch-all for other errors with a message
    Message { message: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound { path } => write!(f, "Not found: {}", path.display()),
            ErrorKind::Conflict { path } => write!(f, "Already exists: {}", path.display()),
            ErrorKind::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            ErrorKind::Decode { path, .. } => {
                write!(f, "File is not valid UTF-8: {}", path.display())
            }
            ErrorKind::InvalidName { name, reason } => {
                write!(f, "Invalid file name '{}': {}", name, reason)
            }
            ErrorKind::Configuration { message } => write!(f, "Configuration error: {}", message),
            ErrorKind::FileError { path, source } => {
                write!(f, "File error at {}: {}", path.display(), source)
            }
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }
}

/* 📖 # Why separate ErrorKind and AppDirError?
This two-layer design provides a clear separation of concerns:
- ErrorKind: structural variants with specific contexts (file paths, names, etc.)
- AppDirError: wraps ErrorKind with runtime context strings, an optional cause and
  the span trace captured where the error was created

Users pattern match on ErrorKind; AppDirError carries everything needed to
explain the failure when it is finally reported.
*/

/// Error type wrapping [`ErrorKind`] with context, cause and span trace.
pub struct AppDirError {
    kind: ErrorKind,
    context: Vec<String>,
    cause: Option<Box<AppDirError>>,
    span_trace: SpanTrace,
}

impl AppDirError {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            cause: None,
            span_trace: SpanTrace::capture(),
        }
    }

    /// Creates a catch-all error with the given message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(ErrorKind::NotFound { path: path.into() })
    }

    pub fn conflict(path: impl Into<PathBuf>) -> Self {
        Self::new(ErrorKind::Conflict { path: path.into() })
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidName {
            name: name.into(),
            reason: reason.into(),
        })
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration {
            message: message.into(),
        })
    }

    /// Classifies an I/O error for the given path.
    ///
    /// `NotFound` and `AlreadyExists` map to their dedicated kinds, everything
    /// else becomes [`ErrorKind::FileError`].
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::new(ErrorKind::NotFound { path }),
            io::ErrorKind::AlreadyExists => Self::new(ErrorKind::Conflict { path }),
            _ => Self::new(ErrorKind::FileError { path, source }),
        }
    }

    /// Attaches context to an error.
    /// Context is displayed before the error message.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Records another error as the cause of this one.
    pub fn caused_by(mut self, cause: impl Into<Box<AppDirError>>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Returns a reference to the underlying ErrorKind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn get_context(&self) -> &[String] {
        &self.context
    }

    pub fn cause(&self) -> Option<&AppDirError> {
        self.cause.as_deref()
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// The kind of the underlying I/O error, if this error wraps one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match &self.kind {
            ErrorKind::Write { source, .. } | ErrorKind::FileError { source, .. } => {
                Some(source.kind())
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self.kind, ErrorKind::Conflict { .. })
    }

    /// Returns the innermost error in the chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        let children = self.context.len() + usize::from(self.cause.is_some());
        for (index, context) in self.context.iter().enumerate() {
            let branch = if index + 1 == children { "└─" } else { "├─" };
            write!(f, "\n{}{} {}", indent, branch, context)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "\n{}└─ cause: ", indent)?;
            cause.fmt_tree(f, &format!("{}   ", indent))?;
        }
        Ok(())
    }
}

impl From<ErrorKind> for AppDirError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<ErrorKind> for Box<AppDirError> {
    fn from(kind: ErrorKind) -> Self {
        Box::new(AppDirError::new(kind))
    }
}

impl StdError for AppDirError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::Write { source, .. } | ErrorKind::FileError { source, .. } => Some(source),
            ErrorKind::Decode { source, .. } => Some(source),
            _ => self
                .cause
                .as_deref()
                .map(|cause| cause as &(dyn StdError + 'static)),
        }
    }
}

impl fmt::Display for AppDirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for context in &self.context {
            write!(f, "{}: ", context)?;
        }
        write!(f, "{}", self.kind)
    }
}

/* 📖 # Why a hand-written Debug impl?
Errors usually end up in logs or test failure output via `{:?}`. The derived
format buries the message in struct noise, so Debug renders a tree instead:
the message, its context lines, the cause chain, and the span trace if one was
captured.
*/

impl fmt::Debug for AppDirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, "")?;
        if self.span_trace.status() == SpanTraceStatus::CAPTURED {
            write!(f, "\nTrace: {}", self.span_trace)?;
        }
        Ok(())
    }
}

/* 📖 # Why use Box<AppDirError> in the result type?

Boxing the error reduces the size of the result type, making it more efficient to return in the common case.
The span trace and context vector would otherwise be copied around on every `?`.
*/

/// Standard result type for appdir operations.
pub type AppDirResult<T> = std::result::Result<T, Box<AppDirError>>;

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    fn context(self, context: impl Into<String>) -> AppDirResult<T>;

    /// Attaches context using lazy evaluation.
    /// Context is only evaluated if the result is an error.
    fn with_context<F>(self, f: F) -> AppDirResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for AppDirResult<T> {
    fn context(self, context: impl Into<String>) -> AppDirResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> AppDirResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}
