use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Structural violations found in grapher output
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Duplicate def key: {0}")]
    DuplicateDef(String),

    #[error("Duplicate ref key: {0}")]
    DuplicateRef(String),

    #[error("Duplicate doc key: {0}")]
    DuplicateDoc(String),

    #[error("Invalid {kind} span in {file:?}: start={start}, end={end}")]
    InvalidSpan {
        kind: &'static str,
        file: String,
        start: usize,
        end: usize,
    },

    #[error("Invalid tree path {tree_path:?} for def {def}: {reason}")]
    InvalidTreePath {
        def: String,
        tree_path: String,
        reason: &'static str,
    },

    #[error("Def {0} carries inline docs; documentation belongs in Output.Docs")]
    InlineDefDocs(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    pub(crate) fn invalid_span(kind: &'static str, file: &str, start: usize, end: usize) -> Self {
        Self::InvalidSpan {
            kind,
            file: file.to_string(),
            start,
            end,
        }
    }
}
