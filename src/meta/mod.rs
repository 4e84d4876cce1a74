//! MetaImage file reading, writing and header inspection
//!
//! The header is plain text and can always be read without touching pixel
//! data; [`inspect`] relies on that to report image properties cheaply.

pub mod error;
pub mod header;
mod pixel_data;
pub mod validation;

pub use error::MetaError;
pub use header::{DataFile, MetaHeader};

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::image::TypedImage;
use crate::types::ImageInfo;

/// Read only the header of a MetaImage file.
pub fn read_header(path: &Path) -> Result<MetaHeader, MetaError> {
    let file = File::open(path).map_err(|source| MetaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    MetaHeader::parse(&mut reader)
}

impl From<&MetaHeader> for ImageInfo {
    fn from(header: &MetaHeader) -> Self {
        Self {
            pixel_type: header.element_type,
            dimension: header.ndims,
            components: header.element_channels,
            extents: header.dim_size.clone(),
        }
    }
}

/// Report image properties without decoding pixel data.
pub fn inspect(path: &Path) -> Result<ImageInfo, MetaError> {
    let header = read_header(path)?;
    Ok(ImageInfo::from(&header))
}

/// Read and decode a full image.
///
/// Decoding follows `info`, not the stored header, so that explicit
/// pixel-type or dimension overrides take effect; a mismatch against the
/// actual payload is reported as a data-length error.
pub fn read_image(path: &Path, info: &ImageInfo) -> Result<TypedImage, MetaError> {
    let file = File::open(path).map_err(|source| MetaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let header = MetaHeader::parse(&mut reader)?;

    if !header.binary {
        return Err(MetaError::AsciiData);
    }
    if header.compressed {
        return Err(MetaError::CompressedData);
    }

    let mut bytes = Vec::new();
    match &header.element_data_file {
        DataFile::Local => {
            reader.read_to_end(&mut bytes)?;
        }
        DataFile::Path(relative) => {
            let data_path = match path.parent() {
                Some(parent) => parent.join(relative),
                None => Path::new(relative).to_path_buf(),
            };
            let mut data_file = File::open(&data_path).map_err(|source| MetaError::Open {
                path: data_path.clone(),
                source,
            })?;
            data_file.read_to_end(&mut bytes)?;
        }
    }

    pixel_data::decode(
        &bytes,
        info.pixel_type,
        info.effective_extents(),
        header.byte_order_msb,
    )
}

/// Write an image to `path`, choosing the container by extension.
///
/// `.mha` stores the data inline, `.mhd` writes a sibling `.raw` file, and
/// `.png` is accepted for 2D unsigned 8/16-bit images. `spacing` and
/// `offset` carry the input geometry through to the output header.
pub fn write_image(
    path: &Path,
    image: &TypedImage,
    spacing: &[f64],
    offset: &[f64],
) -> Result<(), MetaError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mha" => write_mha(path, image, spacing, offset),
        "mhd" => write_mhd(path, image, spacing, offset),
        "png" => write_png(path, image),
        other => Err(MetaError::UnsupportedOutputFormat(other.to_string())),
    }
}

fn make_header(image: &TypedImage, spacing: &[f64], offset: &[f64]) -> MetaHeader {
    let extents = image.extents();
    let ndims = extents.len();
    let spacing = if spacing.len() == ndims {
        spacing.to_vec()
    } else {
        vec![1.0; ndims]
    };
    let offset = if offset.len() == ndims {
        offset.to_vec()
    } else {
        vec![0.0; ndims]
    };
    MetaHeader::new(image.pixel_type(), &extents, spacing, offset)
}

fn write_mha(
    path: &Path,
    image: &TypedImage,
    spacing: &[f64],
    offset: &[f64],
) -> Result<(), MetaError> {
    let header = make_header(image, spacing, offset);
    let file = File::create(path).map_err(|source| MetaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    header.write_to(&mut writer)?;
    writer.write_all(&pixel_data::encode(image))?;
    writer.flush()?;
    Ok(())
}

fn write_mhd(
    path: &Path,
    image: &TypedImage,
    spacing: &[f64],
    offset: &[f64],
) -> Result<(), MetaError> {
    let raw_path = path.with_extension("raw");
    let raw_name = raw_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| MetaError::UnsupportedOutputFormat(path.display().to_string()))?;

    let mut header = make_header(image, spacing, offset);
    header.element_data_file = DataFile::Path(raw_name);

    let file = File::create(path).map_err(|source| MetaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    header.write_to(&mut writer)?;
    writer.flush()?;

    let raw_file = File::create(&raw_path).map_err(|source| MetaError::Open {
        path: raw_path.clone(),
        source,
    })?;
    let mut raw_writer = BufWriter::new(raw_file);
    raw_writer.write_all(&pixel_data::encode(image))?;
    raw_writer.flush()?;
    Ok(())
}

fn write_png(path: &Path, image: &TypedImage) -> Result<(), MetaError> {
    use image::ExtendedColorType;

    if image.ndim() != 2 {
        return Err(MetaError::PngUnsupported(format!(
            "{}-dimensional image",
            image.ndim()
        )));
    }
    let shape = image.shape();
    let (height, width) = (shape[0] as u32, shape[1] as u32);

    match image {
        TypedImage::U8(a) => {
            let data: Vec<u8> = a.iter().copied().collect();
            image::save_buffer(path, &data, width, height, ExtendedColorType::L8)?;
        }
        TypedImage::U16(a) => {
            // save_buffer expects 16-bit samples as native-endian bytes.
            let data: Vec<u8> = a.iter().flat_map(|v| v.to_ne_bytes()).collect();
            image::save_buffer(path, &data, width, height, ExtendedColorType::L16)?;
        }
        other => {
            return Err(MetaError::PngUnsupported(other.pixel_type().to_string()));
        }
    }
    Ok(())
}
