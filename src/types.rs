//! Domain-specific types shared by both tools

use std::fmt;
use std::str::FromStr;

/// Scalar component type of a single pixel.
///
/// The closed set of types the tools dispatch over. MetaImage headers name
/// these `MET_UCHAR`, `MET_CHAR`, `MET_USHORT`, `MET_SHORT` and `MET_FLOAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    UChar,
    Char,
    UShort,
    Short,
    Float,
}

impl PixelType {
    /// Parse a MetaImage `ElementType` tag.
    pub fn from_met_tag(tag: &str) -> Option<Self> {
        Some(match tag.trim() {
            "MET_UCHAR" => Self::UChar,
            "MET_CHAR" => Self::Char,
            "MET_USHORT" => Self::UShort,
            "MET_SHORT" => Self::Short,
            "MET_FLOAT" => Self::Float,
            _ => return None,
        })
    }

    #[inline]
    #[must_use]
    pub fn met_tag(&self) -> &'static str {
        match self {
            Self::UChar => "MET_UCHAR",
            Self::Char => "MET_CHAR",
            Self::UShort => "MET_USHORT",
            Self::Short => "MET_SHORT",
            Self::Float => "MET_FLOAT",
        }
    }

    /// Size of one component in bytes.
    #[inline]
    #[must_use]
    pub fn byte_width(&self) -> usize {
        match self {
            Self::UChar | Self::Char => 1,
            Self::UShort | Self::Short => 2,
            Self::Float => 4,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Float)
    }
}

impl FromStr for PixelType {
    type Err = String;

    /// Accepts the CLI spellings, with or without underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', " ");
        Ok(match normalized.as_str() {
            "uchar" | "unsigned char" => Self::UChar,
            "char" => Self::Char,
            "ushort" | "unsigned short" => Self::UShort,
            "short" => Self::Short,
            "float" => Self::Float,
            other => {
                return Err(format!(
                    "unknown pixel type {other:?} (expected one of: uchar, char, ushort, short, float)"
                ))
            }
        })
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UChar => "unsigned char",
            Self::Char => "char",
            Self::UShort => "unsigned short",
            Self::Short => "short",
            Self::Float => "float",
        };
        write!(f, "{name}")
    }
}

/// Image properties determined from a file header, possibly overridden by
/// the user.
///
/// Extents are kept in file order: x fastest, so `extents[0]` is the width.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub pixel_type: PixelType,
    pub dimension: usize,
    pub components: usize,
    pub extents: Vec<usize>,
}

impl ImageInfo {
    /// Replace inspected values with explicit user overrides.
    ///
    /// Overrides are taken at face value; a type or dimension that does not
    /// match the actual file contents surfaces later as a decode error.
    pub fn apply_overrides(&mut self, pixel_type: Option<PixelType>, dimension: Option<usize>) {
        if let Some(pt) = pixel_type {
            self.pixel_type = pt;
        }
        if let Some(dim) = dimension {
            self.dimension = dim;
        }
    }

    /// Extents of the first `dimension` axes.
    ///
    /// A dimension override below the stored NDims truncates, one above it
    /// is caught at decode time.
    #[must_use]
    pub fn effective_extents(&self) -> &[usize] {
        &self.extents[..self.dimension.min(self.extents.len())]
    }

    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.effective_extents().iter().product()
    }
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type={}, dimension={}, components={}, extents={:?}",
            self.pixel_type, self.dimension, self.components, self.extents
        )
    }
}
