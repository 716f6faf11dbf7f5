//! Path Validation Module
//!
//! Checks applied to user-supplied directories before a batch touches disk.
//! 路径验证模块：空路径与输入输出冲突检查。

use std::fmt;
use std::path::Path;

/// Path validation error
/// 路径验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathValidationError {
    /// Path is empty
    /// 路径为空
    EmptyPath,
    /// Input and output paths are the same directory
    /// 输入和输出路径相同
    InputOutputConflict { path: String },
}

impl fmt::Display for PathValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathValidationError::EmptyPath => {
                write!(f, "empty path provided")
            }
            PathValidationError::InputOutputConflict { path } => {
                write!(f, "input and output paths are identical: {}", path)
            }
        }
    }
}

impl std::error::Error for PathValidationError {}

/// Reject empty paths.
pub fn validate_path(path: &Path) -> Result<(), PathValidationError> {
    if path.as_os_str().is_empty() {
        return Err(PathValidationError::EmptyPath);
    }
    Ok(())
}

/// Reject an output directory that is the input directory.
///
/// Both paths are canonicalized when they exist, so `./in` and `in/` compare
/// equal. A path that does not exist yet cannot be the other one.
pub fn check_input_output_conflict(input: &Path, output: &Path) -> Result<(), PathValidationError> {
    let (Ok(input_canon), Ok(output_canon)) = (input.canonicalize(), output.canonicalize()) else {
        return Ok(());
    };

    if input_canon == output_canon {
        return Err(PathValidationError::InputOutputConflict {
            path: output_canon.display().to_string(),
        });
    }
    Ok(())
}
