//! Single-slice extraction from a 3D volume
//!
//! The extraction region covers the full extent along every axis except
//! the chosen one, which is collapsed to a single plane; the result is a
//! 2D image with the remaining axes in their original order.

use anyhow::{bail, Result};
use ndarray::{ArrayD, Axis};

use super::TypedImage;

fn slice_axis<T: Clone>(volume: &ArrayD<T>, array_axis: usize, index: usize) -> ArrayD<T> {
    volume.index_axis(Axis(array_axis), index).to_owned()
}

/// Extract the 2D slice at `index` along user axis `axis` (0 = x, 2 = z).
///
/// Dispatches on pixel type alone; every supported type may be sliced. The
/// input must be 3D and the index in range, both normally guaranteed by
/// up-front validation but re-checked here so the library API cannot panic.
pub fn extract_slice(image: &TypedImage, axis: usize, index: usize) -> Result<TypedImage> {
    let dim = image.ndim();
    if dim != 3 {
        bail!("slice extraction requires a 3D input image, got {dim}D");
    }
    if axis >= dim {
        bail!("cannot extract a slice along axis {axis}: the input image is only {dim}D");
    }
    // User axis 0 is the fastest-varying axis, i.e. the last array axis.
    let array_axis = dim - 1 - axis;
    let extent = image.shape()[array_axis];
    if index >= extent {
        bail!("slice {index} selected, but the input image only has {extent} slices along axis {axis}");
    }

    Ok(match image {
        TypedImage::U8(a) => TypedImage::U8(slice_axis(a, array_axis, index)),
        TypedImage::I8(a) => TypedImage::I8(slice_axis(a, array_axis, index)),
        TypedImage::U16(a) => TypedImage::U16(slice_axis(a, array_axis, index)),
        TypedImage::I16(a) => TypedImage::I16(slice_axis(a, array_axis, index)),
        TypedImage::F32(a) => TypedImage::F32(slice_axis(a, array_axis, index)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::IxDyn;

    /// Extents (x, y, z) = (4, 3, 2), pixel value = x + 4y + 12z.
    fn sample_volume() -> TypedImage {
        let data: Vec<u8> = (0..24).collect();
        TypedImage::U8(ArrayD::from_shape_vec(IxDyn(&[2, 3, 4]), data).unwrap())
    }

    #[test]
    fn z_slice_keeps_x_and_y() {
        let slice = extract_slice(&sample_volume(), 2, 1).unwrap();
        assert_eq!(slice.extents(), vec![4, 3]);
        let arr = slice.as_u8().unwrap();
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(arr[[y, x]], (x + 4 * y + 12) as u8);
            }
        }
    }

    #[test]
    fn x_slice_keeps_y_and_z() {
        let slice = extract_slice(&sample_volume(), 0, 2).unwrap();
        assert_eq!(slice.extents(), vec![3, 2]);
        let arr = slice.as_u8().unwrap();
        for z in 0..2 {
            for y in 0..3 {
                assert_eq!(arr[[z, y]], (2 + 4 * y + 12 * z) as u8);
            }
        }
    }

    #[test]
    fn y_slice_keeps_x_and_z() {
        let slice = extract_slice(&sample_volume(), 1, 0).unwrap();
        assert_eq!(slice.extents(), vec![4, 2]);
        let arr = slice.as_u8().unwrap();
        for z in 0..2 {
            for x in 0..4 {
                assert_eq!(arr[[z, x]], (x + 12 * z) as u8);
            }
        }
    }

    #[test]
    fn float_volumes_are_sliceable() {
        let data: Vec<f32> = (0..8).map(|v| v as f32 * 0.5).collect();
        let volume = TypedImage::F32(ArrayD::from_shape_vec(IxDyn(&[2, 2, 2]), data).unwrap());
        let slice = extract_slice(&volume, 2, 1).unwrap();
        let arr = slice.as_f32().unwrap();
        assert_abs_diff_eq!(arr[[0, 0]], 2.0);
        assert_abs_diff_eq!(arr[[1, 1]], 3.5);
    }

    #[test]
    fn out_of_range_slice_is_rejected() {
        let err = extract_slice(&sample_volume(), 2, 2).unwrap_err();
        assert!(err.to_string().contains("2 slices along axis 2"));
    }

    #[test]
    fn non_3d_volumes_are_rejected() {
        let flat = TypedImage::U8(ArrayD::zeros(IxDyn(&[3, 4])));
        let err = extract_slice(&flat, 1, 0).unwrap_err();
        assert!(err.to_string().contains("3D"));
    }
}
