use std::path::PathBuf;

use crate::cloud::{CloudItem, CloudSession};

/// Fixed names used by the checks.
pub const FOLDER_NAME: &str = "__TestFolder__";
pub const FOLDER_NAME_ALT: &str = "__TestFolder_2__";
pub const IMAGE_NAME: &str = "image.jpg";
pub const IMAGE_NAME_ALT: &str = "image_2.png";

/// Scratch state shared by all checks of a run.
///
/// Checks hand artifacts to later checks through the optional fields: the
/// root folder, the folder created for the run, and the current file. The
/// fields are not reset between runs, so a new run may start with references
/// left by the previous one.
pub struct TestContext<S> {
    pub session: S,
    pub root_folder: Option<CloudItem>,
    pub test_folder: Option<CloudItem>,
    pub test_file: Option<CloudItem>,
    /// Local file uploaded by the upload check
    pub fixture: PathBuf,
    pub folder_name: &'static str,
    pub folder_name_alt: &'static str,
    pub image_name: &'static str,
    pub image_name_alt: &'static str,
}

impl<S: CloudSession> TestContext<S> {
    pub fn new(session: S, fixture: impl Into<PathBuf>) -> Self {
        Self {
            session,
            root_folder: None,
            test_folder: None,
            test_file: None,
            fixture: fixture.into(),
            folder_name: FOLDER_NAME,
            folder_name_alt: FOLDER_NAME_ALT,
            image_name: IMAGE_NAME,
            image_name_alt: IMAGE_NAME_ALT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::session::OfflineSession;

    #[test]
    fn test_new_context_is_empty() {
        let ctx = TestContext::new(OfflineSession::default(), "fixtures/image.jpg");
        assert!(ctx.root_folder.is_none());
        assert!(ctx.test_folder.is_none());
        assert!(ctx.test_file.is_none());
        assert_eq!(ctx.folder_name, "__TestFolder__");
        assert_eq!(ctx.image_name_alt, "image_2.png");
        assert_eq!(ctx.fixture, PathBuf::from("fixtures/image.jpg"));
    }
}
