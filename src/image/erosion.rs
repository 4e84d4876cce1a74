//! Grayscale morphological erosion
//!
//! Each output pixel is the minimum input value over an ellipsoid
//! neighborhood. Reads outside the image substitute a constant boundary
//! value, by default the maximum representable pixel value so that the
//! border never spuriously lowers the minimum.

use anyhow::{bail, Context, Result};
use ndarray::{ArrayD, IxDyn};
use num_traits::{Bounded, NumCast};

use super::TypedImage;

/// Relative offsets of an ellipsoid ("ball") structuring element.
///
/// An offset `d` is part of the neighborhood iff `sum((d_i / r_i)^2) <= 1`;
/// radius 1 in every direction yields the center plus its face neighbors.
/// `radius` is in array-axis order.
fn ball_offsets(radius: &[usize]) -> Vec<Vec<isize>> {
    let dims = radius.len();
    let mut offsets = Vec::new();
    let mut current: Vec<isize> = radius.iter().map(|&r| -(r as isize)).collect();

    loop {
        let distance: f64 = current
            .iter()
            .zip(radius)
            .map(|(&d, &r)| {
                let normalized = d as f64 / r as f64;
                normalized * normalized
            })
            .sum();
        if distance <= 1.0 + 1e-9 {
            offsets.push(current.clone());
        }

        // Odometer increment over [-r_i, r_i] per axis.
        let mut axis = dims;
        let mut exhausted = true;
        while axis > 0 {
            axis -= 1;
            if current[axis] < radius[axis] as isize {
                current[axis] += 1;
                for (later, &r) in current.iter_mut().zip(radius).skip(axis + 1) {
                    *later = -(r as isize);
                }
                exhausted = false;
                break;
            }
        }
        if exhausted {
            break;
        }
    }

    offsets
}

/// Erode a single typed array.
///
/// `radius` is in array-axis order and must match the array rank.
fn erode<T>(input: &ArrayD<T>, radius: &[usize], boundary: T) -> ArrayD<T>
where
    T: Copy + PartialOrd,
{
    debug_assert_eq!(radius.len(), input.ndim());
    let offsets = ball_offsets(radius);
    let shape: Vec<usize> = input.shape().to_vec();
    let ndim = shape.len();

    let mut output = input.clone();
    let mut coords = vec![0usize; ndim];
    for (idx, out_px) in output.indexed_iter_mut() {
        // The zero offset is always part of the ball, so the center value
        // is a valid starting minimum.
        let mut min = *out_px;
        for offset in &offsets {
            let mut outside = false;
            for axis in 0..ndim {
                let c = idx[axis] as isize + offset[axis];
                if c < 0 || c >= shape[axis] as isize {
                    outside = true;
                    break;
                }
                coords[axis] = c as usize;
            }
            let value = if outside {
                boundary
            } else {
                input[IxDyn(&coords)]
            };
            if value < min {
                min = value;
            }
        }
        *out_px = min;
    }
    output
}

/// Parse the boundary-condition flag for a concrete pixel type.
///
/// Absent means "maximum representable value". Integer pixel types parse
/// the text as an integer, floating types as a float; values that do not
/// fit the pixel type are rejected.
fn parse_boundary<T>(value: Option<&str>, integral: bool) -> Result<T>
where
    T: Bounded + NumCast + Copy,
{
    let Some(text) = value else {
        return Ok(T::max_value());
    };
    if integral {
        let parsed: i64 = text
            .trim()
            .parse()
            .with_context(|| format!("invalid boundary condition value {text:?}"))?;
        NumCast::from(parsed).with_context(|| {
            format!("boundary condition value {parsed} is out of range for the pixel type")
        })
    } else {
        let parsed: f64 = text
            .trim()
            .parse()
            .with_context(|| format!("invalid boundary condition value {text:?}"))?;
        NumCast::from(parsed).with_context(|| {
            format!("boundary condition value {parsed} is out of range for the pixel type")
        })
    }
}

/// Erode an image with a ball structuring element.
///
/// `radius` is per-dimension in file order (x first) and must already be
/// resolved against the image dimensionality. The supported matrix is
/// {unsigned char, char, unsigned short, short} x {2D, 3D}; anything else
/// is an explicit error.
pub fn erode_image(
    image: &TypedImage,
    radius: &[usize],
    boundary: Option<&str>,
) -> Result<TypedImage> {
    let dim = image.ndim();
    if !matches!(dim, 2 | 3) {
        bail!("unsupported image dimension for erosion: {dim}D (supported: 2D, 3D)");
    }
    if radius.len() != dim {
        // A dimension override larger than the stored image can get here.
        bail!(
            "radius has {} components but the image is {dim}D",
            radius.len()
        );
    }

    // Radii arrive x-first; array axes run z-first.
    let array_radius: Vec<usize> = radius.iter().rev().copied().collect();

    match image {
        TypedImage::U8(a) => Ok(TypedImage::U8(erode(
            a,
            &array_radius,
            parse_boundary::<u8>(boundary, true)?,
        ))),
        TypedImage::I8(a) => Ok(TypedImage::I8(erode(
            a,
            &array_radius,
            parse_boundary::<i8>(boundary, true)?,
        ))),
        TypedImage::U16(a) => Ok(TypedImage::U16(erode(
            a,
            &array_radius,
            parse_boundary::<u16>(boundary, true)?,
        ))),
        TypedImage::I16(a) => Ok(TypedImage::I16(erode(
            a,
            &array_radius,
            parse_boundary::<i16>(boundary, true)?,
        ))),
        TypedImage::F32(_) => bail!(
            "unsupported pixel type for erosion: float \
             (supported: unsigned char, char, unsigned short, short)"
        ),
    }
}
