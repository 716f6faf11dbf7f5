//! Error types
//!
//! `ConfigError` and `ScrubError` abort a run before or while setting it up.
//! `FileError` belongs to a single file: it is reported through the progress
//! sink and the batch moves on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no input folder selected")]
    MissingInput,

    #[error("no output folder selected")]
    MissingOutput,

    #[error("quality {value} out of range [{min}, {max}]")]
    QualityOutOfRange { value: i64, min: u8, max: u8 },

    #[error("output folder is the input folder ({0}); originals would be overwritten")]
    InputOutputConflict(String),
}

#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot read input folder {}: {source}", .path.display())]
    InputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create output folder {}: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("batch worker thread panicked")]
    Worker,
}

#[derive(Error, Debug)]
pub enum FileError {
    #[error("cannot open: {0}")]
    Open(#[source] std::io::Error),

    #[error("cannot decode: {0}")]
    Decode(#[source] image::ImageError),

    #[error("cannot encode JPEG: {0}")]
    Encode(#[source] jpeg_encoder::EncodingError),

    #[error("{width}x{height} exceeds the JPEG limit of 65535 pixels per side")]
    TooLarge { width: u32, height: u32 },

    #[error("cannot write output: {0}")]
    Write(#[source] std::io::Error),

    #[error("cannot move output into place: {0}")]
    Persist(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScrubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = ScrubError::from(ConfigError::QualityOutOfRange {
            value: 101,
            min: 10,
            max: 100,
        });
        assert_eq!(
            err.to_string(),
            "invalid configuration: quality 101 out of range [10, 100]"
        );

        let err = ScrubError::InputDirectory {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().starts_with("cannot read input folder /nope"));
    }
}
