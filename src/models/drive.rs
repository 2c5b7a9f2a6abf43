use crate::constants::{VIDEO_EXTENSIONS, drive::FOLDER_MIME_TYPE};
use crate::parser::format_size;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// A file or folder entry from a Drive listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: Option<i64>,
}

impl DriveFile {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: None,
            size: None,
        }
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }

    /// Video detection by MIME type, falling back to the file extension when
    /// Drive reports nothing better than `application/octet-stream`.
    #[must_use]
    pub fn is_video_file(&self) -> bool {
        if self.is_folder() {
            return false;
        }

        match self.mime_type.as_deref() {
            Some(mime) if mime.starts_with("video/") => true,
            Some(mime) if mime != "application/octet-stream" && !mime.is_empty() => false,
            _ => self.has_video_extension(),
        }
    }

    fn has_video_extension(&self) -> bool {
        let path = Path::new(&self.name);
        let known = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                VIDEO_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            });

        known
            || mime_guess::from_path(path)
                .first()
                .is_some_and(|m| m.type_() == mime_guess::mime::VIDEO)
    }

    #[must_use]
    pub fn human_size(&self) -> Option<String> {
        self.size.map(format_size)
    }
}

/// One page of a Drive `files.list` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Number(i64),
    Text(String),
}

// Drive encodes int64 fields as JSON strings.
fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<SizeRepr>::deserialize(deserializer)?;
    Ok(match repr {
        Some(SizeRepr::Number(n)) => Some(n),
        Some(SizeRepr::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
