use serde::{Deserialize, Serialize};

/// Suffix required on the primary document's file name.
pub const PRIMARY_EXTENSION: &str = ".md";

pub const PRIMARY_MEDIA_TYPE: &str = "text/markdown";

pub const ARCHIVE_EXTENSION: &str = "zip";

/// Extensions accepted as supporting assets, both as loose files and as
/// archive members. Compared against the lowercased extension.
pub const SUPPORTED_ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pdf", "svg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    RasterImage,
    VectorImage,
    DocumentPage,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" | "jpg" | "jpeg" => Some(Self::RasterImage),
            "svg" => Some(Self::VectorImage),
            "pdf" => Some(Self::DocumentPage),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        extension_of(name).and_then(|ext| Self::from_extension(&ext))
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::RasterImage => write!(f, "raster-image"),
            MediaKind::VectorImage => write!(f, "vector-image"),
            MediaKind::DocumentPage => write!(f, "document-page"),
        }
    }
}

/// Lowercased text after the last `.` of the final path component.
///
/// Archive member names may carry a `dir/` prefix, so both `/` and `\` are
/// treated as separators. A name without a dot has no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub fn is_supported_asset(name: &str) -> bool {
    extension_of(name)
        .map(|ext| SUPPORTED_ASSET_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn is_archive(name: &str) -> bool {
    extension_of(name).as_deref() == Some(ARCHIVE_EXTENSION)
}

/// `strict` keeps the suffix match case-sensitive.
pub fn is_primary_name(name: &str, strict: bool) -> bool {
    if strict {
        name.ends_with(PRIMARY_EXTENSION)
    } else {
        name.to_lowercase().ends_with(PRIMARY_EXTENSION)
    }
}

/// MIME type sent with an asset's multipart part.
pub fn media_type_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
