//! On-disk format tags

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Provenance label recording which on-disk layout a matrix came from.
///
/// Tags are derived from the filename extension only, never from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    #[default]
    Unknown,
    /// Two-line `<cols> <rows>` / values text layout
    DelimitedText,
    /// XML storage container with a single `matrix` node
    XmlContainer,
    /// Header-less fixed-geometry sensor dump
    RawSensor,
    Bitmap,
    Jpeg,
    Png,
}

impl FormatTag {
    /// Maps a filename to its format tag by extension, ignoring case.
    ///
    /// The suffix after the last dot of the file name counts as the
    /// extension, so a file named `.txt` is delimited text.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, e)| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("xml") => Self::XmlContainer,
            Some("txt") => Self::DelimitedText,
            Some("raw") => Self::RawSensor,
            Some("bmp") => Self::Bitmap,
            Some("jpg") | Some("jpeg") => Self::Jpeg,
            Some("png") => Self::Png,
            _ => Self::Unknown,
        }
    }

    /// Numeric data layouts (text and XML).
    pub fn is_data(self) -> bool {
        matches!(self, Self::XmlContainer | Self::DelimitedText)
    }

    /// Image layouts, including raw sensor frames.
    pub fn is_image(self) -> bool {
        matches!(self, Self::Bitmap | Self::Jpeg | Self::Png | Self::RawSensor)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::DelimitedText => "txt",
            Self::XmlContainer => "xml",
            Self::RawSensor => "raw",
            Self::Bitmap => "bmp",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        };
        f.write_str(name)
    }
}
