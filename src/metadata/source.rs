//! The MetadataSource capability
//!
//! Each supported container exposes the same three fields through an explicit
//! schema. A field the file does not carry comes back as `None`.

use exif::{Exif, In, Tag, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::kind::ImageKind;
use crate::error::SkipReason;

/// Capture settings a photo can report about itself
pub trait MetadataSource {
    /// Focal length in millimetres, as recorded at capture time
    fn focal_length(&self) -> Option<f64>;

    /// Printable lens model, if the camera recorded one
    fn lens_model(&self) -> Option<String>;

    /// Aperture as an f-number
    fn aperture(&self) -> Option<f64>;
}

/// EXIF-backed metadata for JPEG, PNG, WebP, HEIF, TIFF and TIFF-based RAW files
pub struct ExifSource {
    exif: Exif,
}

impl ExifSource {
    /// Open a file and parse its EXIF block according to its container kind
    pub fn open(path: &Path, kind: ImageKind) -> Result<Self, SkipReason> {
        let file = File::open(path).map_err(|e| SkipReason::UnreadableFile(e.to_string()))?;
        let reader = exif::Reader::new();

        let parsed = if kind.is_tiff_based() {
            // TIFF and RAW files are the EXIF structure itself
            let mut data = Vec::new();
            BufReader::new(file)
                .read_to_end(&mut data)
                .map_err(|e| SkipReason::UnreadableFile(e.to_string()))?;
            reader.read_raw(data)
        } else {
            reader.read_from_container(&mut BufReader::new(file))
        };

        parsed.map(Self::from_exif).map_err(classify_error)
    }

    /// Wrap an already parsed EXIF block
    pub fn from_exif(exif: Exif) -> Self {
        Self { exif }
    }

    fn number(&self, tag: Tag) -> Option<f64> {
        let field = self.exif.get_field(tag, In::PRIMARY)?;

        match &field.value {
            Value::Rational(values) => values
                .first()
                .and_then(|r| rational_to_f64(r.num as f64, r.denom as f64)),
            Value::SRational(values) => values
                .first()
                .and_then(|r| rational_to_f64(r.num as f64, r.denom as f64)),
            Value::Short(values) => values.first().map(|&v| v as f64),
            Value::Long(values) => values.first().map(|&v| v as f64),
            _ => None,
        }
    }

    fn text(&self, tag: Tag) -> Option<String> {
        let field = self.exif.get_field(tag, In::PRIMARY)?;

        match &field.value {
            Value::Ascii(parts) => parts.first().and_then(|bytes| printable_ascii(bytes)),
            _ => None,
        }
    }
}

impl MetadataSource for ExifSource {
    fn focal_length(&self) -> Option<f64> {
        self.number(Tag::FocalLength)
    }

    fn lens_model(&self) -> Option<String> {
        self.text(Tag::LensModel)
    }

    fn aperture(&self) -> Option<f64> {
        self.number(Tag::FNumber)
    }
}

/// Map an EXIF parser failure onto a skip reason
fn classify_error(err: exif::Error) -> SkipReason {
    match err {
        exif::Error::NotFound(_) => SkipReason::NoMetadata,
        exif::Error::Io(e) => SkipReason::UnreadableFile(e.to_string()),
        exif::Error::NotSupported(_) => SkipReason::UnsupportedFormat,
        other => SkipReason::CorruptMetadata(other.to_string()),
    }
}

/// Convert an EXIF rational to float
fn rational_to_f64(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Keep printable ASCII only, trimmed. Camera firmware pads with NULs and
/// sometimes writes vendor bytes into LensModel.
fn printable_ascii(bytes: &[u8]) -> Option<String> {
    let text: String = bytes
        .iter()
        .filter(|b| b.is_ascii_graphic() || **b == b' ')
        .map(|&b| b as char)
        .collect();
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tagged_jpeg;
    use std::fs;

    #[test]
    fn test_rational_conversion() {
        assert_eq!(rational_to_f64(1.0, 2.0), Some(0.5));
        assert_eq!(rational_to_f64(500.0, 10.0), Some(50.0));
        assert_eq!(rational_to_f64(1.0, 0.0), None);
    }

    #[test]
    fn test_printable_ascii() {
        assert_eq!(printable_ascii(b"EF24-70mm f/2.8L\0\0"), Some("EF24-70mm f/2.8L".to_string()));
        assert_eq!(printable_ascii(b"  XF35mm\xc2\xb0 "), Some("XF35mm".to_string()));
        assert_eq!(printable_ascii(b"\0\0\0"), None);
        assert_eq!(printable_ascii(b""), None);
    }

    #[test]
    fn test_reads_fields_from_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        fs::write(&path, tagged_jpeg(Some("LensA"), Some(50.0), Some(2.8))).unwrap();

        let source = ExifSource::open(&path, ImageKind::Jpeg).unwrap();
        assert_eq!(source.focal_length(), Some(50.0));
        assert_eq!(source.lens_model(), Some("LensA".to_string()));
        assert_eq!(source.aperture(), Some(2.8));
    }

    #[test]
    fn test_absent_fields_are_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.jpg");
        fs::write(&path, tagged_jpeg(None, None, None)).unwrap();

        let source = ExifSource::open(&path, ImageKind::Jpeg).unwrap();
        assert_eq!(source.focal_length(), None);
        assert_eq!(source.lens_model(), None);
        assert_eq!(source.aperture(), None);
    }

    #[test]
    fn test_jpeg_without_exif_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jpg");
        fs::write(&path, crate::test_support::plain_jpeg()).unwrap();

        assert!(matches!(
            ExifSource::open(&path, ImageKind::Jpeg),
            Err(SkipReason::NoMetadata)
        ));
    }
}
