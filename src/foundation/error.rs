/// Convenience result type used across drawon.
pub type DrawonResult<T> = Result<T, DrawonError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum DrawonError {
    /// Path data that does not follow the path command grammar.
    #[error("malformed path data{}: {message} (at byte {offset})", path_label(.path_id))]
    MalformedPath {
        /// Id of the path the data belongs to, when known.
        path_id: Option<String>,
        /// Byte offset of the offending token inside the `d` string.
        offset: usize,
        /// Human-readable description of what was expected.
        message: String,
    },

    /// A path whose measured length is zero.
    #[error("degenerate path '{path_id}': total length is zero")]
    DegeneratePath {
        /// Id of the offending path.
        path_id: String,
    },

    /// Out-of-range or inconsistent configuration values.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Unreadable or structurally unusable SVG input.
    #[error("document error: {0}")]
    Document(String),

    /// The external encoder binary is missing or could not be spawned.
    #[error("encoder unavailable: {0}")]
    EncoderUnavailable(String),

    /// The external encoder exited unsuccessfully.
    #[error("encoder failed with status {status}: {stderr}")]
    EncoderFailed {
        /// Exit status as reported by the OS.
        status: String,
        /// Trimmed stderr output captured from the encoder.
        stderr: String,
    },

    /// An export was aborted through its cancellation token.
    #[error("export cancelled")]
    Cancelled,

    /// Rasterizer contract violations (sizes, buffers).
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn path_label(path_id: &Option<String>) -> String {
    match path_id {
        Some(id) => format!(" in path '{id}'"),
        None => String::new(),
    }
}

impl DrawonError {
    /// Build a [`DrawonError::MalformedPath`] value without a path id.
    pub fn malformed(offset: usize, msg: impl Into<String>) -> Self {
        Self::MalformedPath {
            path_id: None,
            offset,
            message: msg.into(),
        }
    }

    /// Build a [`DrawonError::DegeneratePath`] value.
    pub fn degenerate(path_id: impl Into<String>) -> Self {
        Self::DegeneratePath {
            path_id: path_id.into(),
        }
    }

    /// Build a [`DrawonError::InvalidConfiguration`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`DrawonError::Document`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Build a [`DrawonError::EncoderUnavailable`] value.
    pub fn encoder_unavailable(msg: impl Into<String>) -> Self {
        Self::EncoderUnavailable(msg.into())
    }

    /// Build a [`DrawonError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Attach `id` to a [`DrawonError::MalformedPath`] raised by the id-agnostic parser.
    ///
    /// Other variants are returned unchanged.
    pub fn with_path_id(self, id: &str) -> Self {
        match self {
            Self::MalformedPath {
                path_id: None,
                offset,
                message,
            } => Self::MalformedPath {
                path_id: Some(id.to_owned()),
                offset,
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
