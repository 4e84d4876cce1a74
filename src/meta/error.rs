use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing MetaImage files.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("i/o error while reading image data: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed header line {line_number}: {line:?}")]
    MalformedLine { line_number: usize, line: String },

    #[error("header field {field} has invalid value {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("header is missing required field {0}")]
    MissingField(&'static str),

    #[error("unsupported element type {0:?}")]
    UnsupportedElementType(String),

    #[error("ASCII-encoded element data is not supported (BinaryData = False)")]
    AsciiData,

    #[error("compressed element data is not supported (CompressedData = True)")]
    CompressedData,

    #[error(
        "pixel buffer length mismatch: got {actual} bytes, expected {expected} \
         ({pixels} pixels of {element} bytes)"
    )]
    DataLength {
        actual: usize,
        expected: usize,
        pixels: usize,
        element: usize,
    },

    #[error("pixel buffer does not match the image shape: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("unsupported output extension {0:?} (expected mha, mhd or png)")]
    UnsupportedOutputFormat(String),

    #[error("PNG output supports only 2D unsigned 8-bit or 16-bit images, got {0}")]
    PngUnsupported(String),

    #[error("failed to encode PNG: {0}")]
    Png(#[from] image::ImageError),
}
