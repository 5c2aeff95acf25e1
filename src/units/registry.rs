use super::{TestUnit, UnitKind};

/// Ordered, fixed sequence of checks.
///
/// Order matters: a check may rely on what earlier checks left in the
/// context (uploading needs the folder created before it).
#[derive(Debug, Clone)]
pub struct Registry {
    units: Vec<TestUnit>,
}

impl Registry {
    pub fn new(units: Vec<TestUnit>) -> Self {
        Self { units }
    }

    /// The full round trip: connect, create, upload, list, read, rename,
    /// copy, download and clean up.
    pub fn standard() -> Self {
        use UnitKind::*;

        let units = [
            ("connect", Connection),
            ("get root folder", RootFolder),
            ("create folder", CreateFolder),
            ("upload file", UploadFile),
            ("list folder", ListFolder),
            ("get direct file content", FileContent),
            ("rename directory", RenameDirectory),
            ("list folder", ListFolder),
            ("copy file", CopyFile),
            ("rename file", RenameFile),
            ("get file information", FileInfo),
            ("download file", DownloadFile),
            ("download thumbnail", Thumbnail),
            ("get file information", FileInfo),
            ("delete file", DeleteFile),
            ("delete folder", DeleteFolder),
        ]
        .into_iter()
        .map(|(name, kind)| TestUnit::new(name, kind))
        .collect();

        Self { units }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TestUnit> {
        self.units.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestUnit> {
        self.units.iter()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
