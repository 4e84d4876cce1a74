//! Raw element data decoding and encoding
//!
//! Handles the conversion between the on-disk byte stream and a
//! [`TypedImage`], including big-endian inputs. Data on disk is x-fastest,
//! which is C order for the reversed extent list, so arrays are built with
//! the slowest axis first.

use ndarray::{ArrayD, IxDyn};

use crate::image::TypedImage;
use crate::meta::MetaError;
use crate::types::PixelType;

/// Decode raw element bytes into a typed array.
///
/// `extents` is in file order (x fastest); the byte count must match
/// `extents` product times the element width exactly.
pub fn decode(
    bytes: &[u8],
    pixel_type: PixelType,
    extents: &[usize],
    byte_order_msb: bool,
) -> Result<TypedImage, MetaError> {
    let pixels: usize = extents.iter().product();
    let expected = pixels * pixel_type.byte_width();
    if bytes.len() != expected {
        return Err(MetaError::DataLength {
            actual: bytes.len(),
            expected,
            pixels,
            element: pixel_type.byte_width(),
        });
    }

    let shape: Vec<usize> = extents.iter().rev().copied().collect();
    let shape = IxDyn(&shape);

    let image = match pixel_type {
        PixelType::UChar => TypedImage::U8(ArrayD::from_shape_vec(shape, bytes.to_vec())?),
        PixelType::Char => {
            let data = bytes.iter().map(|&b| b as i8).collect();
            TypedImage::I8(ArrayD::from_shape_vec(shape, data)?)
        }
        PixelType::UShort => {
            let data = bytes
                .chunks_exact(2)
                .map(|c| {
                    let pair = [c[0], c[1]];
                    if byte_order_msb {
                        u16::from_be_bytes(pair)
                    } else {
                        u16::from_le_bytes(pair)
                    }
                })
                .collect();
            TypedImage::U16(ArrayD::from_shape_vec(shape, data)?)
        }
        PixelType::Short => {
            let data = bytes
                .chunks_exact(2)
                .map(|c| {
                    let pair = [c[0], c[1]];
                    if byte_order_msb {
                        i16::from_be_bytes(pair)
                    } else {
                        i16::from_le_bytes(pair)
                    }
                })
                .collect();
            TypedImage::I16(ArrayD::from_shape_vec(shape, data)?)
        }
        PixelType::Float => {
            let data = bytes
                .chunks_exact(4)
                .map(|c| {
                    let quad = [c[0], c[1], c[2], c[3]];
                    if byte_order_msb {
                        f32::from_be_bytes(quad)
                    } else {
                        f32::from_le_bytes(quad)
                    }
                })
                .collect();
            TypedImage::F32(ArrayD::from_shape_vec(shape, data)?)
        }
    };

    Ok(image)
}

/// Encode a typed array as little-endian element bytes in file order.
#[must_use]
pub fn encode(image: &TypedImage) -> Vec<u8> {
    match image {
        TypedImage::U8(a) => a.iter().copied().collect(),
        TypedImage::I8(a) => a.iter().map(|&v| v as u8).collect(),
        TypedImage::U16(a) => a.iter().flat_map(|v| v.to_le_bytes()).collect(),
        TypedImage::I16(a) => a.iter().flat_map(|v| v.to_le_bytes()).collect(),
        TypedImage::F32(a) => a.iter().flat_map(|v| v.to_le_bytes()).collect(),
    }
}
