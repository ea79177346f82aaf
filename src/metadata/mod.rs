/// Photo metadata extraction
///
/// This module handles:
/// - Deciding which files are candidate images (kind.rs)
/// - The MetadataSource capability and its EXIF implementation (source.rs)
/// - Turning one file into a PhotoRecord or a skip reason (reader.rs)

pub mod kind;
pub mod source;
pub mod reader;

pub use kind::ImageKind;
pub use reader::read_photo;
