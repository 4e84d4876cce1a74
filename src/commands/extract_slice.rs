//! Slice extraction tool

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::commands::stem_and_extension;
use crate::image::extract_slice;
use crate::meta::{self, validation};
use crate::types::{ImageInfo, PixelType};

/// Extract a 2D slice from a 3D image.
///
/// Supported pixel types: (unsigned) char, (unsigned) short, float.
#[derive(Debug, Clone, Parser)]
#[command(name = "extract-slice", version, about)]
pub struct ExtractSliceArgs {
    /// Input image
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output image; default: input stem + "_slice_<axis>=<n>" + extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Slice number to extract
    #[arg(short = 's', long = "slice", value_name = "N")]
    pub slice_index: usize,

    /// Axis to extract from: 0 = x, 1 = y, 2 = z
    #[arg(short, long, default_value_t = 2)]
    pub axis: usize,

    /// Override the pixel type detected from the image header
    #[arg(long, value_name = "TYPE")]
    pub pixel_type: Option<PixelType>,
}

impl ExtractSliceArgs {
    pub fn run(&self) -> Result<()> {
        let header = meta::read_header(&self.input)
            .with_context(|| format!("failed to inspect {}", self.input.display()))?;
        let mut info = ImageInfo::from(&header);
        info!("input image properties: {info}");

        if self.pixel_type.is_some() {
            info.apply_overrides(self.pixel_type, None);
            info!("user overrides applied: {info}");
        }

        validation::validate_scalar_components(&info)?;
        validation::validate_extraction(&info, self.axis, self.slice_index)?;

        let image = meta::read_image(&self.input, &info)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let slice = extract_slice(&image, self.axis, self.slice_index)?;

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| self.default_output_name(&self.input));
        // The collapsed axis drops out of the output geometry.
        let spacing = remove_axis(&header.element_spacing, self.axis);
        let offset = remove_axis(&header.offset, self.axis);
        meta::write_image(&output, &slice, &spacing, &offset)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!("wrote {}", output.display());
        Ok(())
    }

    fn default_output_name(&self, input: &Path) -> PathBuf {
        let (stem, extension) = stem_and_extension(input);
        let direction = axis_letter(self.axis);
        input.with_file_name(format!(
            "{stem}_slice_{direction}={n}{extension}",
            n = self.slice_index
        ))
    }
}

fn axis_letter(axis: usize) -> char {
    match axis {
        0 => 'x',
        1 => 'y',
        _ => 'z',
    }
}

fn remove_axis(values: &[f64], axis: usize) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != axis)
        .map(|(_, &v)| v)
        .collect()
}
