//! MetaImage header parsing and serialization
//!
//! A MetaImage header is a sequence of `Key = Value` text lines terminated
//! by the `ElementDataFile` entry; for `.mha` files the raw pixel data
//! follows immediately after that line.

use std::io::{BufRead, Write};

use crate::meta::MetaError;
use crate::types::PixelType;

/// MetaIO caps image dimensionality at 10.
const MAX_NDIMS: usize = 10;

/// Where the pixel data lives relative to the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataFile {
    /// Data follows the header in the same file (`ElementDataFile = LOCAL`).
    Local,
    /// Data is in a sibling file, path relative to the header.
    Path(String),
}

/// Parsed MetaImage header.
///
/// `dim_size` is in file order (x fastest), matching `DimSize`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaHeader {
    pub ndims: usize,
    pub dim_size: Vec<usize>,
    pub element_type: PixelType,
    pub element_channels: usize,
    pub binary: bool,
    pub byte_order_msb: bool,
    pub compressed: bool,
    pub element_spacing: Vec<f64>,
    pub offset: Vec<f64>,
    pub element_data_file: DataFile,
}

impl MetaHeader {
    /// Header for a freshly produced image with the given geometry.
    #[must_use]
    pub fn new(
        element_type: PixelType,
        extents: &[usize],
        element_spacing: Vec<f64>,
        offset: Vec<f64>,
    ) -> Self {
        Self {
            ndims: extents.len(),
            dim_size: extents.to_vec(),
            element_type,
            element_channels: 1,
            binary: true,
            byte_order_msb: false,
            compressed: false,
            element_spacing,
            offset,
            element_data_file: DataFile::Local,
        }
    }

    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.dim_size.iter().product()
    }

    /// Parse header lines from `reader`, stopping after `ElementDataFile`.
    ///
    /// On success the reader is positioned at the first byte of pixel data
    /// (for `LOCAL` storage). Unknown keys are skipped.
    pub fn parse<R: BufRead>(reader: &mut R) -> Result<Self, MetaError> {
        let mut ndims = None;
        let mut dim_size: Option<Vec<usize>> = None;
        let mut element_type = None;
        let mut element_channels = 1usize;
        let mut binary = true;
        let mut byte_order_msb = false;
        let mut compressed = false;
        let mut element_spacing: Option<Vec<f64>> = None;
        let mut offset: Option<Vec<f64>> = None;
        let mut element_data_file = None;

        let mut line_number = 0;
        let mut buf = Vec::new();
        loop {
            line_number += 1;
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf)?;
            if n == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| MetaError::MalformedLine {
                line_number,
                line: line.to_string(),
            })?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                "ObjectType" => {
                    if value != "Image" {
                        return Err(MetaError::InvalidField {
                            field: "ObjectType",
                            value: value.to_string(),
                        });
                    }
                }
                "NDims" => ndims = Some(parse_field::<usize>("NDims", value)?),
                "DimSize" => dim_size = Some(parse_list::<usize>("DimSize", value)?),
                "ElementType" => {
                    element_type = Some(
                        PixelType::from_met_tag(value)
                            .ok_or_else(|| MetaError::UnsupportedElementType(value.to_string()))?,
                    );
                }
                "ElementNumberOfChannels" => {
                    element_channels = parse_field::<usize>("ElementNumberOfChannels", value)?;
                }
                "BinaryData" => binary = parse_bool("BinaryData", value)?,
                "BinaryDataByteOrderMSB" | "ElementByteOrderMSB" => {
                    byte_order_msb = parse_bool("BinaryDataByteOrderMSB", value)?;
                }
                "CompressedData" => compressed = parse_bool("CompressedData", value)?,
                "ElementSpacing" => {
                    element_spacing = Some(parse_list::<f64>("ElementSpacing", value)?);
                }
                "Offset" | "Origin" | "Position" => {
                    offset = Some(parse_list::<f64>("Offset", value)?);
                }
                "ElementDataFile" => {
                    element_data_file = Some(if value.eq_ignore_ascii_case("LOCAL") {
                        DataFile::Local
                    } else {
                        DataFile::Path(value.to_string())
                    });
                    // ElementDataFile is always the last header entry.
                    break;
                }
                _ => {}
            }
        }

        let ndims = ndims.ok_or(MetaError::MissingField("NDims"))?;
        if ndims == 0 || ndims > MAX_NDIMS {
            return Err(MetaError::InvalidField {
                field: "NDims",
                value: ndims.to_string(),
            });
        }
        let dim_size = dim_size.ok_or(MetaError::MissingField("DimSize"))?;
        if dim_size.len() != ndims {
            return Err(MetaError::InvalidField {
                field: "DimSize",
                value: format!("{} entries for NDims = {ndims}", dim_size.len()),
            });
        }
        let element_type = element_type.ok_or(MetaError::MissingField("ElementType"))?;
        let element_data_file =
            element_data_file.ok_or(MetaError::MissingField("ElementDataFile"))?;

        Ok(Self {
            ndims,
            dim_size,
            element_type,
            element_channels,
            binary,
            byte_order_msb,
            compressed,
            element_spacing: element_spacing.unwrap_or_else(|| vec![1.0; ndims]),
            offset: offset.unwrap_or_else(|| vec![0.0; ndims]),
            element_data_file,
        })
    }

    /// Serialize the header; `ElementDataFile` comes last.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), MetaError> {
        writeln!(writer, "ObjectType = Image")?;
        writeln!(writer, "NDims = {}", self.ndims)?;
        writeln!(writer, "BinaryData = True")?;
        writeln!(
            writer,
            "BinaryDataByteOrderMSB = {}",
            if self.byte_order_msb { "True" } else { "False" }
        )?;
        writeln!(writer, "CompressedData = False")?;
        writeln!(writer, "Offset = {}", join_list(&self.offset))?;
        writeln!(writer, "ElementSpacing = {}", join_list(&self.element_spacing))?;
        writeln!(writer, "DimSize = {}", join_list(&self.dim_size))?;
        if self.element_channels != 1 {
            writeln!(writer, "ElementNumberOfChannels = {}", self.element_channels)?;
        }
        writeln!(writer, "ElementType = {}", self.element_type.met_tag())?;
        match &self.element_data_file {
            DataFile::Local => writeln!(writer, "ElementDataFile = LOCAL")?,
            DataFile::Path(p) => writeln!(writer, "ElementDataFile = {p}")?,
        }
        Ok(())
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, MetaError> {
    value.parse().map_err(|_| MetaError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn parse_list<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<Vec<T>, MetaError> {
    value
        .split_whitespace()
        .map(|tok| {
            tok.parse().map_err(|_| MetaError::InvalidField {
                field,
                value: value.to_string(),
            })
        })
        .collect()
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, MetaError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(MetaError::InvalidField {
            field,
            value: value.to_string(),
        })
    }
}

fn join_list<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    const HEADER: &str = "ObjectType = Image\n\
        NDims = 3\n\
        BinaryData = True\n\
        BinaryDataByteOrderMSB = False\n\
        CompressedData = False\n\
        TransformMatrix = 1 0 0 0 1 0 0 0 1\n\
        Offset = 0 0 0\n\
        ElementSpacing = 1 1 2.5\n\
        DimSize = 4 5 6\n\
        ElementType = MET_SHORT\n\
        ElementDataFile = LOCAL\n";

    #[test]
    fn parses_a_typical_header() {
        let mut cursor = Cursor::new(HEADER.as_bytes());
        let header = MetaHeader::parse(&mut cursor).unwrap();
        assert_eq!(header.ndims, 3);
        assert_eq!(header.dim_size, vec![4, 5, 6]);
        assert_eq!(header.element_type, PixelType::Short);
        assert_eq!(header.element_channels, 1);
        assert_eq!(header.element_spacing, vec![1.0, 1.0, 2.5]);
        assert_eq!(header.element_data_file, DataFile::Local);
        assert!(!header.compressed);
        // Reader must now sit at the start of the pixel data.
        assert_eq!(cursor.position() as usize, HEADER.len());
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let text = HEADER.replace(
            "Offset = 0 0 0\n",
            "Offset = 0 0 0\nAnatomicalOrientation = RAI\nCenterOfRotation = 0 0 0\n",
        );
        let header = MetaHeader::parse(&mut Cursor::new(text.as_bytes())).unwrap();
        assert_eq!(header.dim_size, vec![4, 5, 6]);
    }

    #[test]
    fn missing_element_type_is_an_error() {
        let text = HEADER.replace("ElementType = MET_SHORT\n", "");
        let err = MetaHeader::parse(&mut Cursor::new(text.as_bytes())).unwrap_err();
        assert_matches!(err, MetaError::MissingField("ElementType"));
    }

    #[test]
    fn double_element_type_is_unsupported() {
        let text = HEADER.replace("MET_SHORT", "MET_DOUBLE");
        let err = MetaHeader::parse(&mut Cursor::new(text.as_bytes())).unwrap_err();
        assert_matches!(err, MetaError::UnsupportedElementType(tag) if tag == "MET_DOUBLE");
    }

    #[test]
    fn dim_size_arity_must_match_ndims() {
        let text = HEADER.replace("DimSize = 4 5 6", "DimSize = 4 5");
        let err = MetaHeader::parse(&mut Cursor::new(text.as_bytes())).unwrap_err();
        assert_matches!(err, MetaError::InvalidField { field: "DimSize", .. });
    }

    #[test]
    fn line_without_separator_is_malformed() {
        let text = HEADER.replace("BinaryData = True", "BinaryData True");
        let err = MetaHeader::parse(&mut Cursor::new(text.as_bytes())).unwrap_err();
        assert_matches!(err, MetaError::MalformedLine { .. });
    }

    #[test]
    fn serialization_round_trips() {
        let header = MetaHeader::new(
            PixelType::UChar,
            &[3, 2],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        );
        let mut out = Vec::new();
        header.write_to(&mut out).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.ends_with("ElementDataFile = LOCAL\n"));

        let parsed = MetaHeader::parse(&mut Cursor::new(&out)).unwrap();
        assert_eq!(parsed, header);
    }
}
