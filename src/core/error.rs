//! Error handling logic

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QwError>;

/// Failures a walk run, a graph construction or a file load can report.
///
/// Every configuration and topology failure is detected before the first
/// time step, so a run either produces a complete `ProbabilityTable` or one
/// of these errors and nothing else.
#[derive(Debug, Error)]
pub enum QwError {
    /// Adjacency input is not square, not symmetric, carries a self-loop
    /// or holds an entry other than 0/1.
    #[error("Invalid Topology: {message}")]
    InvalidTopology {
        /// InvalidTopology failure message
        message: String,
    },

    /// A start or marked vertex is out of range, or the start vertex is isolated.
    #[error("Invalid Vertex ({vertex}): {message}")]
    InvalidVertex {
        /// Offending 0-indexed vertex
        vertex: usize,
        /// InvalidVertex failure message
        message: String,
    },

    /// Both a start vertex and a marked vertex were configured.
    #[error("Configuration Conflict: {message}")]
    ConfigurationConflict {
        /// ConfigurationConflict failure message
        message: String,
    },

    /// A parameter value is outside its valid domain (e.g. zero steps).
    #[error("Invalid Parameter: {message}")]
    InvalidParameter {
        /// InvalidParameter failure message
        message: String,
    },

    /// A simulation buffer could not be reserved.
    #[error("Allocation Failure: {message}")]
    Allocation {
        /// Allocation failure message
        message: String,
    },

    /// A state or table failed a conservation check, or a coin is not orthogonal.
    #[error("Normalization Drift: {message}")]
    NormalizationDrift {
        /// NormalizationDrift failure message
        message: String,
    },

    /// A persisted file is malformed.
    #[error("Format Error (line {line}): {message}")]
    Format {
        /// 1-indexed line where the problem was detected
        line: usize,
        /// Format failure message
        message: String,
    },

    /// Underlying file system failure.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
}

impl QwError {
    pub(crate) fn topology(message: impl Into<String>) -> Self {
        QwError::InvalidTopology { message: message.into() }
    }

    pub(crate) fn vertex(vertex: usize, message: impl Into<String>) -> Self {
        QwError::InvalidVertex { vertex, message: message.into() }
    }

    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        QwError::Format { line, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_vertex_and_message() {
        let err = QwError::vertex(4, "start vertex has degree 0");
        assert_eq!(err.to_string(), "Invalid Vertex (4): start vertex has degree 0");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.adj");
        let err: QwError = io.into();
        assert!(matches!(err, QwError::Io(_)));
    }
}
