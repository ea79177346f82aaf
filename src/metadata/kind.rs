use image::ImageFormat;
use std::path::Path;

/// TIFF-based RAW containers whose EXIF block sits in the TIFF structure
const RAW_EXTENSIONS: [&str; 10] = [
    "dng", "nef", "cr2", "arw", "pef", "srw", "erf", "kdc", "dcr", "mos",
];

/// Image container families we know how to pull EXIF out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Tiff,
    WebP,
    Heif,
    Raw,
}

impl ImageKind {
    /// Classify a path by its extension (case-insensitive)
    /// Returns None for files that are not candidate images at all
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();

        match ext.as_str() {
            "jpg" | "jpeg" | "jpe" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "tif" | "tiff" => Some(ImageKind::Tiff),
            "webp" => Some(ImageKind::WebP),
            "heic" | "heif" => Some(ImageKind::Heif),
            other if RAW_EXTENSIONS.contains(&other) => Some(ImageKind::Raw),
            _ => None,
        }
    }

    /// Whether the EXIF block is read straight from TIFF structure
    pub fn is_tiff_based(self) -> bool {
        matches!(self, ImageKind::Tiff | ImageKind::Raw)
    }

    /// Format the `image` crate can recognise from magic bytes, if any.
    /// HEIF and RAW containers are not sniffable that way.
    fn sniffable_format(self) -> Option<ImageFormat> {
        match self {
            ImageKind::Jpeg => Some(ImageFormat::Jpeg),
            ImageKind::Png => Some(ImageFormat::Png),
            ImageKind::Tiff => Some(ImageFormat::Tiff),
            ImageKind::WebP => Some(ImageFormat::WebP),
            ImageKind::Heif | ImageKind::Raw => None,
        }
    }

    /// Check the file's magic bytes against known image signatures
    ///
    /// A `.jpg` full of text is not an image. Kinds that cannot be sniffed
    /// are accepted here and left to the EXIF parser to reject.
    pub fn looks_like_image(self, path: &Path) -> std::io::Result<bool> {
        if self.sniffable_format().is_none() {
            return Ok(true);
        }

        let reader = image::ImageReader::open(path)?.with_guessed_format()?;
        Ok(reader.format().is_some())
    }
}
