use std::io;

use thiserror::Error;

/// The main error type for VDF parsing, access, and archive reading.
#[derive(Debug, Error)]
pub enum VdfError {
    /// Any grammar violation found while lexing or parsing text.
    #[error("[VDF] Syntax Error at {line}:{column}: {message}{}{}", fmt_hint(.hint), fmt_code(.code))]
    SyntaxError {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised by accessors when no entry matches the requested key or path.
    #[error("[VDF] Not Found: '{path}'")]
    NotFound {
        path: String,
    },
    #[error("[VDF] Type Error{}: {message}{}{}", fmt_line(.line), fmt_hint(.hint), fmt_code(.code))]
    TypeError {
        message: String,
        line: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for malformed VDFS archives.
    #[error("[VDF] Archive Error: {message}{}{}", fmt_hint(.hint), fmt_code(.code))]
    Archive {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl VdfError {
    pub(crate) fn syntax(message: impl Into<String>, line: usize, column: usize, code: u32) -> Self {
        VdfError::SyntaxError {
            message: message.into(),
            line,
            column,
            hint: None,
            code: Some(code),
        }
    }

    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        VdfError::NotFound { path: path.into() }
    }

    pub(crate) fn archive(message: impl Into<String>, code: u32) -> Self {
        VdfError::Archive {
            message: message.into(),
            hint: None,
            code: Some(code),
        }
    }

    /// Attach a hint to a diagnostic variant. Other variants are returned unchanged.
    pub(crate) fn with_hint(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            VdfError::SyntaxError { hint, .. }
            | VdfError::TypeError { hint, .. }
            | VdfError::Archive { hint, .. } => *hint = Some(text.into()),
            VdfError::NotFound { .. } | VdfError::Json(_) | VdfError::Io(_) => {}
        }
        self
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, VdfError::NotFound { .. })
    }

    pub fn code(&self) -> Option<u32> {
        match self {
            VdfError::SyntaxError { code, .. }
            | VdfError::TypeError { code, .. }
            | VdfError::Archive { code, .. } => *code,
            VdfError::NotFound { .. } => Some(304),
            VdfError::Json(_) | VdfError::Io(_) => None,
        }
    }

    /// Line/column for syntax errors, `None` otherwise.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            VdfError::SyntaxError { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

fn fmt_hint(hint: &Option<String>) -> String {
    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h))
}

fn fmt_code(code: &Option<u32>) -> String {
    code.map_or(String::new(), |c| format!(" Code: {}", c))
}

fn fmt_line(line: &usize) -> String {
    if *line > 0 { format!(" at line {}", line) } else { String::new() }
}

pub type Result<T, E = VdfError> = std::result::Result<T, E>;
