//! Semantic validation of tool parameters against inspected image properties

use anyhow::{bail, Result};

use crate::types::ImageInfo;

/// Both tools operate on scalar images only.
#[inline]
pub fn validate_scalar_components(info: &ImageInfo) -> Result<()> {
    if info.components > 1 {
        bail!(
            "the image has {} components per pixel; vector images are not supported",
            info.components
        );
    }
    Ok(())
}

/// Resolve the user-supplied radius list against the image dimensionality.
///
/// A single value is broadcast to every dimension; otherwise the list length
/// must equal the dimensionality. Every component must be at least 1 — the
/// zero check covers index 0 as well, not only the trailing elements.
pub fn effective_radius(radius: &[u32], dimension: usize) -> Result<Vec<usize>> {
    if radius.len() != 1 && radius.len() != dimension {
        bail!(
            "the number of radii must be 1 or equal the image dimension ({dimension}), got {}",
            radius.len()
        );
    }

    let resolved: Vec<usize> = if radius.len() == 1 {
        vec![radius[0] as usize; dimension]
    } else {
        radius.iter().map(|&r| r as usize).collect()
    };

    if let Some(bad) = resolved.iter().position(|&r| r < 1) {
        bail!("no nonpositive numbers are allowed in the radius (component {bad} is 0)");
    }

    Ok(resolved)
}

/// Check slice-extraction parameters.
///
/// The axis bound is checked before the slice bound so that the extent
/// lookup itself cannot go out of range.
pub fn validate_extraction(info: &ImageInfo, axis: usize, slice_index: usize) -> Result<()> {
    if info.dimension != 3 {
        bail!(
            "slice extraction requires a 3D input image, got {}D",
            info.dimension
        );
    }
    if axis >= info.dimension {
        bail!(
            "cannot extract a slice along axis {axis}: the input image is only {}D",
            info.dimension
        );
    }
    let Some(&extent) = info.effective_extents().get(axis) else {
        bail!("the image header reports no extent for axis {axis}");
    };
    if slice_index >= extent {
        bail!(
            "slice {slice_index} selected, but the input image only has {extent} slices along axis {axis}"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelType;

    fn volume_info() -> ImageInfo {
        ImageInfo {
            pixel_type: PixelType::UShort,
            dimension: 3,
            components: 1,
            extents: vec![4, 5, 6],
        }
    }

    #[test]
    fn scalar_images_pass() {
        assert!(validate_scalar_components(&volume_info()).is_ok());
    }

    #[test]
    fn vector_images_are_rejected() {
        let mut info = volume_info();
        info.components = 3;
        let err = validate_scalar_components(&info).unwrap_err();
        assert!(err.to_string().contains("vector images"));
    }

    #[test]
    fn single_radius_broadcasts() {
        assert_eq!(effective_radius(&[2], 3).unwrap(), vec![2, 2, 2]);
        assert_eq!(effective_radius(&[1], 2).unwrap(), vec![1, 1]);
    }

    #[test]
    fn full_radius_list_is_taken_verbatim() {
        assert_eq!(effective_radius(&[1, 2, 3], 3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn wrong_radius_arity_is_rejected() {
        assert!(effective_radius(&[1, 2], 3).is_err());
        assert!(effective_radius(&[1, 2, 3, 4], 3).is_err());
    }

    #[test]
    fn zero_radius_is_rejected_in_every_position() {
        assert!(effective_radius(&[0], 3).is_err());
        assert!(effective_radius(&[1, 0, 1], 3).is_err());
        assert!(effective_radius(&[0, 1, 1], 3).is_err());
    }

    #[test]
    fn extraction_bounds() {
        let info = volume_info();
        assert!(validate_extraction(&info, 2, 0).is_ok());
        assert!(validate_extraction(&info, 2, 5).is_ok());
        // Index == extent is out of range.
        let err = validate_extraction(&info, 2, 6).unwrap_err();
        assert!(err.to_string().contains("6 slices along axis 2"));
        assert!(validate_extraction(&info, 0, 3).is_ok());
        let err = validate_extraction(&info, 3, 0).unwrap_err();
        assert!(err.to_string().contains("axis 3"));
    }

    #[test]
    fn extraction_requires_3d() {
        let mut info = volume_info();
        info.dimension = 2;
        let err = validate_extraction(&info, 1, 0).unwrap_err();
        assert!(err.to_string().contains("3D"));
    }
}
