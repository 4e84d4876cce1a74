//! Grayscale erosion tool

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::commands::stem_and_extension;
use crate::image::erode_image;
use crate::meta::{self, validation};
use crate::types::{ImageInfo, PixelType};

/// Erode an image with a ball-shaped structuring element.
///
/// Supported: 2D, 3D, (unsigned) short, (unsigned) char.
#[derive(Debug, Clone, Parser)]
#[command(name = "erode-image", version, about)]
pub struct ErodeArgs {
    /// Input image
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output image; default: input stem + "ERODED" + input extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Structuring element radius: one value, or one per dimension
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub radius: Vec<u32>,

    /// Override the dimensionality detected from the image header
    #[arg(long)]
    pub dimension: Option<usize>,

    /// Override the pixel type detected from the image header
    #[arg(long, value_name = "TYPE")]
    pub pixel_type: Option<PixelType>,

    /// Grey value outside the image; default: max of the pixel type
    #[arg(short, long, value_name = "VALUE")]
    pub boundary: Option<String>,
}

impl ErodeArgs {
    pub fn run(&self) -> Result<()> {
        let header = meta::read_header(&self.input)
            .with_context(|| format!("failed to inspect {}", self.input.display()))?;
        let mut info = ImageInfo::from(&header);
        info!("input image properties: {info}");

        if self.pixel_type.is_some() || self.dimension.is_some() {
            info.apply_overrides(self.pixel_type, self.dimension);
            info!("user overrides applied: {info}");
        }

        validation::validate_scalar_components(&info)?;
        let radius = validation::effective_radius(&self.radius, info.dimension)?;

        let image = meta::read_image(&self.input, &info)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let eroded = erode_image(&image, &radius, self.boundary.as_deref())?;

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output_name(&self.input));
        // Geometry is carried through unchanged; a dimension override may
        // leave fewer axes than the stored header describes.
        let axes = eroded.ndim().min(header.element_spacing.len());
        meta::write_image(
            &output,
            &eroded,
            &header.element_spacing[..axes],
            &header.offset[..axes.min(header.offset.len())],
        )
        .with_context(|| format!("failed to write {}", output.display()))?;
        info!("wrote {}", output.display());
        Ok(())
    }
}

fn default_output_name(input: &Path) -> PathBuf {
    let (stem, extension) = stem_and_extension(input);
    input.with_file_name(format!("{stem}ERODED{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::TypedImage;
    use ndarray::{ArrayD, IxDyn};

    fn args(input: PathBuf, radius: Vec<u32>) -> ErodeArgs {
        ErodeArgs {
            input,
            output: None,
            radius,
            dimension: None,
            pixel_type: None,
            boundary: None,
        }
    }

    #[test]
    fn default_output_appends_eroded_before_the_extension() {
        assert_eq!(
            default_output_name(Path::new("scan.mha")),
            PathBuf::from("scanERODED.mha")
        );
        assert_eq!(
            default_output_name(Path::new("/data/scan.mhd")),
            PathBuf::from("/data/scanERODED.mhd")
        );
    }

    #[test]
    fn erodes_a_volume_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cube.mha");
        let output = dir.path().join("out.mha");

        // All 200 except the (0, 0, 0) corner.
        let mut data = vec![200u8; 64];
        data[0] = 10;
        let volume =
            TypedImage::U8(ArrayD::from_shape_vec(IxDyn(&[4, 4, 4]), data).unwrap());
        meta::write_image(&input, &volume, &[1.0; 3], &[0.0; 3]).unwrap();

        let mut cli = args(input, vec![1]);
        cli.output = Some(output.clone());
        cli.run().unwrap();

        let info = meta::inspect(&output).unwrap();
        assert_eq!(info.extents, vec![4, 4, 4]);
        let result = meta::read_image(&output, &info).unwrap();
        let arr = result.as_u8().unwrap();
        assert_eq!(arr[[0, 0, 0]], 10);
        assert_eq!(arr[[0, 0, 1]], 10);
        assert_eq!(arr[[0, 1, 0]], 10);
        assert_eq!(arr[[1, 0, 0]], 10);
        assert_eq!(arr[[1, 1, 1]], 200);
        assert_eq!(arr[[3, 3, 3]], 200);
    }

    #[test]
    fn missing_input_fails_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.mha");
        let output = dir.path().join("out.mha");

        let mut cli = args(input, vec![1]);
        cli.output = Some(output.clone());
        assert!(cli.run().is_err());
        assert!(!output.exists());
    }

    #[test]
    fn vector_images_are_rejected_before_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("rgb.mha");
        std::fs::write(
            &input,
            "ObjectType = Image\nNDims = 2\nBinaryData = True\n\
             ElementNumberOfChannels = 3\nDimSize = 2 2\n\
             ElementType = MET_UCHAR\nElementDataFile = LOCAL\n",
        )
        .unwrap();

        let err = args(input, vec![1]).run().unwrap_err();
        assert!(err.to_string().contains("vector images"));
    }

    #[test]
    fn mismatched_radius_arity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("flat.mha");
        let image = TypedImage::U8(ArrayD::zeros(IxDyn(&[4, 4])));
        meta::write_image(&input, &image, &[], &[]).unwrap();

        let err = args(input, vec![1, 2, 3]).run().unwrap_err();
        assert!(err.to_string().contains("number of radii"));
    }
}
