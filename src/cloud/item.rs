use chrono::{DateTime, Utc};

/// Kind of a stored item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudType {
    Image,
    Audio,
    Video,
    Directory,
    File,
}

impl CloudType {
    /// Parse the `type` field sent by the API (`PICTURE`, `AUDIO`, ...).
    pub fn from_wire(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "PICTURE" | "IMAGE" => CloudType::Image,
            "AUDIO" => CloudType::Audio,
            "VIDEO" => CloudType::Video,
            "FOLDER" | "DIRECTORY" => CloudType::Directory,
            _ => CloudType::File,
        }
    }
}

/// A file or a directory stored in the cloud.
///
/// Folders and files share the same record; directories have `kind` set to
/// [`CloudType::Directory`]. Size, dates and URLs are only known for plain
/// files and only once extra information was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudItem {
    pub identifier: String,
    pub name: String,
    pub kind: CloudType,
    pub size: Option<u64>,
    pub creation_date: Option<DateTime<Utc>>,
    pub download_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub preview_url: Option<String>,
    pub parent_identifier: Option<String>,
}

impl CloudItem {
    pub fn folder(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(identifier, name, CloudType::Directory)
    }

    pub fn file(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(identifier, name, CloudType::File)
    }

    fn new(identifier: impl Into<String>, name: impl Into<String>, kind: CloudType) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            kind,
            size: None,
            creation_date: None,
            download_url: None,
            thumbnail_url: None,
            preview_url: None,
            parent_identifier: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_identifier = Some(parent.into());
        self
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    pub fn is_directory(&self) -> bool {
        self.kind == CloudType::Directory
    }
}
