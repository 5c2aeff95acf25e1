pub mod checks;
pub mod registry;

pub use registry::Registry;

use crate::cloud::CloudSession;
use crate::context::TestContext;
use crate::runner::TestState;

/// The cloud checks a unit can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Connection,
    RootFolder,
    CreateFolder,
    UploadFile,
    ListFolder,
    FileInfo,
    FileContent,
    Thumbnail,
    DownloadFile,
    RenameFile,
    RenameDirectory,
    CopyFile,
    DeleteFile,
    DeleteFolder,
}

impl UnitKind {
    /// Run the check against the shared context. Resolves exactly once.
    pub async fn execute<S: CloudSession>(&self, ctx: &mut TestContext<S>) -> TestState {
        match self {
            UnitKind::Connection => checks::connection(ctx).await,
            UnitKind::RootFolder => checks::root_folder(ctx).await,
            UnitKind::CreateFolder => checks::create_folder(ctx).await,
            UnitKind::UploadFile => checks::upload_file(ctx).await,
            UnitKind::ListFolder => checks::list_folder(ctx).await,
            UnitKind::FileInfo => checks::file_info(ctx).await,
            UnitKind::FileContent => checks::file_content(ctx).await,
            UnitKind::Thumbnail => checks::thumbnail(ctx).await,
            UnitKind::DownloadFile => checks::download_file(ctx).await,
            UnitKind::RenameFile => checks::rename_file(ctx).await,
            UnitKind::RenameDirectory => checks::rename_directory(ctx).await,
            UnitKind::CopyFile => checks::copy_file(ctx).await,
            UnitKind::DeleteFile => checks::delete_file(ctx).await,
            UnitKind::DeleteFolder => checks::delete_folder(ctx).await,
        }
    }
}

/// A named check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUnit {
    pub name: String,
    pub kind: UnitKind,
}

impl TestUnit {
    pub fn new(name: impl Into<String>, kind: UnitKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub async fn execute<S: CloudSession>(&self, ctx: &mut TestContext<S>) -> TestState {
        self.kind.execute(ctx).await
    }
}
