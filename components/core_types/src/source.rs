//! Source location and stack frame types attached to `JsError`.

use std::fmt;

/// A position in script source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    /// Line number
    pub line: u32,
    /// Column number
    pub column: u32,
    /// Byte offset from the start of the source
    pub offset: usize,
}

/// A single frame of a stack trace.
///
/// Host jobs that fail (reaction jobs, scheduled tasks) record a native frame
/// naming the job so the origin of a rejection can be traced.
///
/// # Examples
///
/// ```
/// use core_types::StackFrame;
///
/// let frame = StackFrame::native("PromiseReactionJob");
/// assert_eq!(frame.to_string(), "at PromiseReactionJob (native)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Name of the function, or None for anonymous functions
    pub function_name: Option<String>,
    /// URL or file path of the source, or None for native frames
    pub source_url: Option<String>,
    /// Line number where the call occurred
    pub line: u32,
    /// Column number where the call occurred
    pub column: u32,
}

impl StackFrame {
    /// Creates a frame for a host-native job.
    pub fn native(function_name: impl Into<String>) -> Self {
        Self {
            function_name: Some(function_name.into()),
            source_url: None,
            line: 0,
            column: 0,
        }
    }

    /// Returns true if the frame has no source location.
    pub fn is_native(&self) -> bool {
        self.source_url.is_none()
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.function_name.as_deref().unwrap_or("<anonymous>");
        match &self.source_url {
            Some(url) => write!(f, "at {} ({}:{}:{})", name, url, self.line, self.column),
            None => write!(f, "at {} (native)", name),
        }
    }
}
