#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use cloudprobe::cloud::{
    CloudItem, CloudResult, CloudSession, CloudStatus, ListOptions, UploadProgress,
};

#[derive(Default)]
struct Cloud {
    folders: Vec<CloudItem>,
    files: Vec<CloudItem>,
    next_id: usize,
}

impl Cloud {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }
}

/// In-memory cloud with scripted failures. Records every remote call.
pub struct ScriptedSession {
    connected: bool,
    open_results: VecDeque<CloudResult<()>>,
    token: Option<String>,
    root: CloudItem,
    download_base: Option<String>,
    failing: Vec<&'static str>,
    handled: Vec<CloudStatus>,
    cloud: Mutex<Cloud>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self {
            connected: false,
            open_results: VecDeque::new(),
            token: Some("secret-token".to_string()),
            root: CloudItem::folder("root", "apps"),
            download_base: None,
            failing: Vec::new(),
            handled: Vec::new(),
            cloud: Mutex::new(Cloud::default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Results returned by successive `open_session` calls (then `Ok`).
    pub fn with_open_results(mut self, results: Vec<CloudResult<()>>) -> Self {
        self.open_results = results.into();
        self
    }

    pub fn connected(mut self) -> Self {
        self.connected = true;
        self
    }

    /// Make the named operation fail with `BadParameter`.
    pub fn failing(mut self, op: &'static str) -> Self {
        self.failing.push(op);
        self
    }

    pub fn handling(mut self, status: CloudStatus) -> Self {
        self.handled.push(status);
        self
    }

    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    /// Uploaded files get `<base>/<id>` as download URL.
    pub fn with_download_base(mut self, base: impl Into<String>) -> Self {
        self.download_base = Some(base.into());
        self
    }

    /// Seed a folder under the root.
    pub fn with_folder(self, id: &str, name: &str) -> Self {
        self.cloud
            .lock()
            .unwrap()
            .folders
            .push(CloudItem::folder(id, name).with_parent("root"));
        self
    }

    pub fn root(&self) -> CloudItem {
        self.root.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == op).count()
    }

    pub fn file_names(&self) -> Vec<String> {
        let cloud = self.cloud.lock().unwrap();
        cloud.files.iter().map(|f| f.name.clone()).collect()
    }

    fn call(&self, op: &str) -> CloudResult<()> {
        self.calls.lock().unwrap().push(op.to_string());
        if self.failing.iter().any(|f| *f == op) {
            Err(CloudStatus::BadParameter)
        } else {
            Ok(())
        }
    }
}

impl CloudSession for ScriptedSession {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn open_session(&mut self) -> CloudResult<()> {
        self.calls.lock().unwrap().push("open_session".to_string());
        let result = self.open_results.pop_front().unwrap_or(Ok(()));
        self.connected = result.is_ok();
        result
    }

    fn logout(&mut self) {
        self.calls.lock().unwrap().push("logout".to_string());
        self.connected = false;
    }

    fn handles_status(&self, status: CloudStatus) -> bool {
        self.handled.contains(&status)
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    async fn root_folder(&self) -> CloudResult<CloudItem> {
        self.call("root_folder")?;
        Ok(self.root.clone())
    }

    async fn create_folder(&self, name: &str, parent: &CloudItem) -> CloudResult<CloudItem> {
        self.call("create_folder")?;
        let mut cloud = self.cloud.lock().unwrap();
        let exists = cloud.folders.iter().any(|f| {
            f.name == name && f.parent_identifier.as_deref() == Some(parent.identifier.as_str())
        });
        if exists {
            return Err(CloudStatus::BadParameter);
        }
        let id = cloud.next_id("folder-");
        let folder = CloudItem::folder(id, name).with_parent(&parent.identifier);
        cloud.folders.push(folder.clone());
        Ok(folder)
    }

    async fn list_folder(
        &self,
        folder: &CloudItem,
        _options: &ListOptions,
    ) -> CloudResult<Vec<CloudItem>> {
        self.call("list_folder")?;
        let cloud = self.cloud.lock().unwrap();
        let in_folder = |item: &&CloudItem| {
            item.parent_identifier.as_deref() == Some(folder.identifier.as_str())
        };
        Ok(cloud
            .folders
            .iter()
            .filter(in_folder)
            .chain(cloud.files.iter().filter(in_folder))
            .cloned()
            .collect())
    }

    async fn upload_data(
        &self,
        data: Vec<u8>,
        filename: &str,
        folder_id: &str,
        progress: Option<UploadProgress<'_>>,
    ) -> CloudResult<CloudItem> {
        self.call("upload_data")?;
        let mut cloud = self.cloud.lock().unwrap();
        let id = cloud.next_id("file-");
        let mut file = CloudItem::file(&id, filename).with_parent(folder_id);
        file.size = Some(data.len() as u64);
        if let Some(base) = &self.download_base {
            file.download_url = Some(format!("{}/{}", base, id));
        }
        cloud.files.push(file.clone());
        if let Some(progress) = progress {
            progress(data.len() as u64, data.len() as u64);
        }
        Ok(file)
    }

    async fn file_info(&self, file: &CloudItem) -> CloudResult<CloudItem> {
        self.call("file_info")?;
        let cloud = self.cloud.lock().unwrap();
        cloud
            .files
            .iter()
            .find(|f| f.identifier == file.identifier)
            .cloned()
            .ok_or(CloudStatus::NotFound)
    }

    async fn file_content(&self, file: &CloudItem) -> CloudResult<Vec<u8>> {
        self.call("file_content")?;
        let cloud = self.cloud.lock().unwrap();
        if cloud.files.iter().any(|f| f.identifier == file.identifier) {
            Ok(b"content".to_vec())
        } else {
            Err(CloudStatus::NotFound)
        }
    }

    async fn thumbnail(&self, file: &CloudItem) -> CloudResult<Vec<u8>> {
        self.call("thumbnail")?;
        let cloud = self.cloud.lock().unwrap();
        if cloud.files.iter().any(|f| f.identifier == file.identifier) {
            Ok(b"thumb".to_vec())
        } else {
            Err(CloudStatus::NotFound)
        }
    }

    async fn rename(&self, item: &CloudItem, new_name: &str) -> CloudResult<CloudItem> {
        self.call("rename")?;
        let mut cloud = self.cloud.lock().unwrap();
        let items = if item.is_directory() {
            &mut cloud.folders
        } else {
            &mut cloud.files
        };
        let stored = items
            .iter_mut()
            .find(|i| i.identifier == item.identifier)
            .ok_or(CloudStatus::NotFound)?;
        stored.name = new_name.to_string();
        Ok(stored.clone())
    }

    async fn copy(&self, file: &CloudItem, destination: &CloudItem) -> CloudResult<CloudItem> {
        self.call("copy")?;
        let mut cloud = self.cloud.lock().unwrap();
        let id = cloud.next_id("file-");
        let mut copied = file.clone();
        copied.identifier = id;
        copied.parent_identifier = Some(destination.identifier.clone());
        cloud.files.push(copied.clone());
        Ok(copied)
    }

    async fn delete_file(&self, file: &CloudItem) -> CloudResult<()> {
        self.call("delete_file")?;
        let mut cloud = self.cloud.lock().unwrap();
        let before = cloud.files.len();
        cloud.files.retain(|f| f.identifier != file.identifier);
        if cloud.files.len() == before {
            Err(CloudStatus::NotFound)
        } else {
            Ok(())
        }
    }

    async fn delete_folder(&self, folder: &CloudItem) -> CloudResult<()> {
        self.call("delete_folder")?;
        let mut cloud = self.cloud.lock().unwrap();
        let before = cloud.folders.len();
        cloud.folders.retain(|f| f.identifier != folder.identifier);
        if cloud.folders.len() == before {
            Err(CloudStatus::NotFound)
        } else {
            Ok(())
        }
    }
}
