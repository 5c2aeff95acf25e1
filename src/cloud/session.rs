use crate::cloud::item::CloudItem;
use crate::cloud::status::CloudStatus;

/// Result of a cloud call: the payload, or the failing status.
pub type CloudResult<T> = std::result::Result<T, CloudStatus>;

/// Upload progress callback: `(bytes_sent, bytes_total)`.
///
/// How often it fires is up to the session; a session that cannot observe
/// the transfer reports only completion.
pub type UploadProgress<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Which entries a folder listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemFilter {
    #[default]
    All,
    Image,
    Audio,
    Video,
    Other,
}

impl ItemFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemFilter::All => "all",
            ItemFilter::Image => "image",
            ItemFilter::Audio => "audio",
            ItemFilter::Video => "video",
            ItemFilter::Other => "other",
        }
    }
}

/// Folder listing options.
///
/// `limit == 0` means no pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub restricted_mode: bool,
    pub show_thumbnails: bool,
    pub filter: ItemFilter,
    pub flat: bool,
    pub tree: bool,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            restricted_mode: false,
            show_thumbnails: true,
            filter: ItemFilter::All,
            flat: false,
            tree: false,
            limit: 0,
            offset: 0,
        }
    }
}

/// Operations the checks need from a cloud storage session.
///
/// Every async method resolves exactly once. Implementations decide how calls
/// reach the service; the runner only looks at success versus failure.
#[allow(async_fn_in_trait)]
pub trait CloudSession {
    fn is_connected(&self) -> bool;

    /// Open (or re-open) the session. Called on every run, even when connected.
    async fn open_session(&mut self) -> CloudResult<()>;

    fn logout(&mut self);

    /// True when the session already reported `status` to the user itself,
    /// so the caller must not raise its own alert.
    fn handles_status(&self, _status: CloudStatus) -> bool {
        false
    }

    /// Access token of the open session, used to build direct download URLs.
    fn token(&self) -> Option<&str>;

    async fn root_folder(&self) -> CloudResult<CloudItem>;

    async fn create_folder(&self, name: &str, parent: &CloudItem) -> CloudResult<CloudItem>;

    async fn list_folder(
        &self,
        folder: &CloudItem,
        options: &ListOptions,
    ) -> CloudResult<Vec<CloudItem>>;

    async fn upload_data(
        &self,
        data: Vec<u8>,
        filename: &str,
        folder_id: &str,
        progress: Option<UploadProgress<'_>>,
    ) -> CloudResult<CloudItem>;

    async fn file_info(&self, file: &CloudItem) -> CloudResult<CloudItem>;

    async fn file_content(&self, file: &CloudItem) -> CloudResult<Vec<u8>>;

    async fn thumbnail(&self, file: &CloudItem) -> CloudResult<Vec<u8>>;

    async fn rename(&self, item: &CloudItem, new_name: &str) -> CloudResult<CloudItem>;

    async fn copy(&self, file: &CloudItem, destination: &CloudItem) -> CloudResult<CloudItem>;

    async fn delete_file(&self, file: &CloudItem) -> CloudResult<()>;

    async fn delete_folder(&self, folder: &CloudItem) -> CloudResult<()>;
}

/// Session that never reaches a cloud; only the connection flag is real.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct OfflineSession {
    pub connected: bool,
}

#[cfg(test)]
impl CloudSession for OfflineSession {
    fn is_connected(&self) -> bool {
        self.connected
    }
    async fn open_session(&mut self) -> CloudResult<()> {
        self.connected = true;
        Ok(())
    }
    fn logout(&mut self) {
        self.connected = false;
    }
    fn token(&self) -> Option<&str> {
        None
    }
    async fn root_folder(&self) -> CloudResult<CloudItem> {
        Err(CloudStatus::NetworkError)
    }
    async fn create_folder(&self, _: &str, _: &CloudItem) -> CloudResult<CloudItem> {
        Err(CloudStatus::NetworkError)
    }
    async fn list_folder(&self, _: &CloudItem, _: &ListOptions) -> CloudResult<Vec<CloudItem>> {
        Err(CloudStatus::NetworkError)
    }
    async fn upload_data(
        &self,
        _: Vec<u8>,
        _: &str,
        _: &str,
        _: Option<UploadProgress<'_>>,
    ) -> CloudResult<CloudItem> {
        Err(CloudStatus::NetworkError)
    }
    async fn file_info(&self, _: &CloudItem) -> CloudResult<CloudItem> {
        Err(CloudStatus::NetworkError)
    }
    async fn file_content(&self, _: &CloudItem) -> CloudResult<Vec<u8>> {
        Err(CloudStatus::NetworkError)
    }
    async fn thumbnail(&self, _: &CloudItem) -> CloudResult<Vec<u8>> {
        Err(CloudStatus::NetworkError)
    }
    async fn rename(&self, _: &CloudItem, _: &str) -> CloudResult<CloudItem> {
        Err(CloudStatus::NetworkError)
    }
    async fn copy(&self, _: &CloudItem, _: &CloudItem) -> CloudResult<CloudItem> {
        Err(CloudStatus::NetworkError)
    }
    async fn delete_file(&self, _: &CloudItem) -> CloudResult<()> {
        Err(CloudStatus::NetworkError)
    }
    async fn delete_folder(&self, _: &CloudItem) -> CloudResult<()> {
        Err(CloudStatus::NetworkError)
    }
}
