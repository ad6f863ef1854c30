//! Error types for crack synthesis, patch compositing, and collaborator calls

use std::fmt;
use std::path::PathBuf;

/// Main error type for all crate operations
#[derive(Debug)]
pub enum CrackError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Input data doesn't meet the requirements of an operation
    ///
    /// Raised for an empty crop region or a coordinate record that lies
    /// outside the image it is applied to.
    InvalidSourceData {
        /// Description of what's wrong with the input data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to save an image to disk
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

    /// Crop coordinate record could not be read or written
    CoordinateRecord {
        /// Path to the record file
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// An external collaborator (segmentation oracle or generative refiner) failed
    Collaborator {
        /// Pipeline stage that invoked the collaborator
        stage: &'static str,
        /// Description reported by the collaborator
        reason: String,
    },
}

impl fmt::Display for CrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
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
            Self::CoordinateRecord { path, source } => {
                write!(
                    f,
                    "Malformed crop coordinate record '{}': {source}",
                    path.display()
                )
            }
            Self::Collaborator { stage, reason } => {
                write!(f, "External {stage} failed: {reason}")
            }
        }
    }
}

impl std::error::Error for CrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::CoordinateRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for crate results
pub type Result<T> = std::result::Result<T, CrackError>;

impl From<image::ImageError> for CrackError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for CrackError {
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
) -> CrackError {
    CrackError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an error for a rejected path argument
pub fn io_error(msg: &str) -> CrackError {
    CrackError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}

/// Create a collaborator failure for the given pipeline stage
pub fn collaborator_error(stage: &'static str, reason: &impl ToString) -> CrackError {
    CrackError::Collaborator {
        stage,
        reason: reason.to_string(),
    }
}
