//! Error types and context management for synthesis operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all synthesis operations
#[derive(Debug)]
pub enum SynthesisError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Source image uses a color mode the synthesis core cannot handle
    ///
    /// Raised before the core runs. Alpha-bearing images must be flattened first.
    UnsupportedColorMode {
        /// Color type reported by the decoder
        color: String,
        /// Explanation of what the caller should do instead
        reason: String,
    },

    /// Source data doesn't meet synthesis requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Synthesis was canceled before the canvas was fully covered
    Aborted {
        /// Iteration at which cancellation was honored
        iteration: usize,
        /// Number of filled pixels at cancellation time
        filled: usize,
        /// Total number of canvas pixels
        total: usize,
    },

    /// An internal invariant of the synthesis loop was broken
    ///
    /// Indicates a bug rather than a runtime condition, for example asking
    /// for the next anchor on a canvas that is already fully covered.
    InvariantViolation {
        /// Iteration when this occurred
        iteration: usize,
        /// Canvas anchor `[x, y]` of the failing placement, when known
        position: Option<[usize; 2]>,
        /// Operation that detected the violation
        operation: &'static str,
        /// Description of the violated invariant
        reason: String,
    },

    /// Failed to save synthesized image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::UnsupportedColorMode { color, reason } => {
                write!(f, "Unsupported color mode {color}: {reason}")
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Aborted {
                iteration,
                filled,
                total,
            } => {
                write!(
                    f,
                    "Synthesis aborted at iteration {iteration} with {filled}/{total} pixels filled"
                )
            }
            Self::InvariantViolation {
                iteration,
                position,
                operation,
                reason,
            } => {
                write!(
                    f,
                    "Internal invariant violated in {operation} at iteration {iteration}"
                )?;
                if let Some([x, y]) = position {
                    write!(f, " (anchor [{x}, {y}])")?;
                }
                write!(f, ": {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for SynthesisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for synthesis results
pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Current synthesis iteration
    pub iteration: Option<usize>,
    /// Canvas coordinates `[x, y]` where the error occurred
    pub position: Option<[usize; 2]>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches error messages with synthesis state information
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<SynthesisError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only loop-state errors carry an iteration, position or operation
            match &mut error {
                SynthesisError::InvariantViolation {
                    iteration,
                    position,
                    operation,
                    ..
                } => {
                    if let Some(iter) = context.iteration {
                        *iteration = iter;
                    }
                    if context.position.is_some() {
                        *position = context.position;
                    }
                    if let Some(op) = context.operation {
                        *operation = op;
                    }
                }
                SynthesisError::Aborted { iteration, .. } => {
                    if let Some(iter) = context.iteration {
                        *iteration = iter;
                    }
                }
                _ => {}
            }
            error
        })
    }
}

impl From<image::ImageError> for SynthesisError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for SynthesisError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SynthesisError {
    SynthesisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invariant violation error
///
/// The iteration starts at zero and the position empty; callers stamp the
/// real ones through [`WithContext`].
pub fn invariant_violation(operation: &'static str, reason: &impl ToString) -> SynthesisError {
    SynthesisError::InvariantViolation {
        iteration: 0,
        position: None,
        operation,
        reason: reason.to_string(),
    }
}
