use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::Result;
use crate::cloud::item::{CloudItem, CloudType};
use crate::cloud::session::{CloudResult, CloudSession, ListOptions, UploadProgress};
use crate::cloud::status::CloudStatus;
use crate::config::CloudConfig;

/// REST implementation of [`CloudSession`] using bearer-token auth.
#[derive(Clone)]
pub struct HttpCloudSession {
    inner: reqwest::Client,
    base_url: String,
    upload_url: String,
    token: Option<String>,
    connected: bool,
    free_space: Option<u64>,
}

impl HttpCloudSession {
    pub fn new(config: &CloudConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let base_url = config.base_url.trim_end_matches('/').to_string();
        // fail early on a malformed base URL
        Url::parse(&base_url)?;
        let upload_url = config
            .upload_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| base_url.clone());

        Ok(Self {
            inner: builder.build()?,
            base_url,
            upload_url,
            token: config.token.clone(),
            connected: false,
            free_space: None,
        })
    }

    /// Free space reported when the session was opened, in bytes.
    pub fn free_space(&self) -> Option<u64> {
        self.free_space
    }

    fn endpoint(&self, root: &str, path: &str, params: &[(&str, String)]) -> CloudResult<Url> {
        let raw = format!("{}{}", root, path);
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| {
            warn!("Invalid endpoint {}: {}", raw, e);
            CloudStatus::InvalidUrl
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.inner.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> CloudResult<reqwest::Response> {
        let response = req.send().await.map_err(|e| {
            warn!("Cloud request failed: {}", e);
            CloudStatus::NetworkError
        })?;
        let status = CloudStatus::from_http(response.status().as_u16());
        debug!(
            "{} -> {} ({})",
            response.url(),
            response.status().as_u16(),
            status
        );
        if status.is_ok() {
            Ok(response)
        } else {
            Err(status)
        }
    }

    async fn send_bytes(&self, req: RequestBuilder) -> CloudResult<Vec<u8>> {
        let response = self.send(req).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|_| CloudStatus::NetworkError)?;
        Ok(bytes.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> CloudResult<T> {
        let bytes = self.send_bytes(req).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Malformed cloud response: {}", e);
            CloudStatus::ResponseMalformed
        })
    }

    fn item_path(item: &CloudItem) -> String {
        if item.is_directory() {
            format!("/folders/{}", item.identifier)
        } else {
            format!("/files/{}", item.identifier)
        }
    }
}

impl CloudSession for HttpCloudSession {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn open_session(&mut self) -> CloudResult<()> {
        self.connected = false;
        if self.token.is_none() {
            return Err(CloudStatus::MissingToken);
        }
        let url = self.endpoint(&self.base_url, "/freespace", &[])?;
        let space: FreeSpaceDto = self.send_json(self.request(Method::GET, url)).await?;
        info!("Session opened, {} bytes free", space.freespace);
        self.free_space = Some(space.freespace);
        self.connected = true;
        Ok(())
    }

    fn logout(&mut self) {
        self.connected = false;
        self.free_space = None;
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    async fn root_folder(&self) -> CloudResult<CloudItem> {
        let url = self.endpoint(&self.base_url, "/folders", &[])?;
        let folder: FolderDto = self.send_json(self.request(Method::GET, url)).await?;
        Ok(folder.into_item())
    }

    async fn create_folder(&self, name: &str, parent: &CloudItem) -> CloudResult<CloudItem> {
        let url = self.endpoint(&self.base_url, "/folders", &[])?;
        let body = json!({ "name": name, "parentFolderId": parent.identifier });
        let folder: FolderDto = self
            .send_json(self.request(Method::POST, url).json(&body))
            .await?;
        let mut item = folder.into_item();
        if item.parent_identifier.is_none() {
            item.parent_identifier = Some(parent.identifier.clone());
        }
        Ok(item)
    }

    async fn list_folder(
        &self,
        folder: &CloudItem,
        options: &ListOptions,
    ) -> CloudResult<Vec<CloudItem>> {
        let mut params = vec![
            ("restrictedmode", options.restricted_mode.to_string()),
            ("showthumbnails", options.show_thumbnails.to_string()),
            ("filter", options.filter.as_str().to_string()),
            ("flat", options.flat.to_string()),
            ("tree", options.tree.to_string()),
        ];
        if options.limit > 0 {
            params.push(("limit", options.limit.to_string()));
            params.push(("offset", options.offset.to_string()));
        }
        let path = format!("/folders/{}", folder.identifier);
        let url = self.endpoint(&self.base_url, &path, &params)?;
        let listing: FolderDto = self
            .send_json(self.request(Method::GET, url))
            .await
            .map_err(|status| match status {
                CloudStatus::NotFound => CloudStatus::ListFolderFailed,
                other => other,
            })?;
        Ok(listing.into_children())
    }

    /// Sends the whole body in one request, so `progress` fires once with
    /// `(total, total)` after the service accepted the file.
    async fn upload_data(
        &self,
        data: Vec<u8>,
        filename: &str,
        folder_id: &str,
        progress: Option<UploadProgress<'_>>,
    ) -> CloudResult<CloudItem> {
        let params = [
            ("name", filename.to_string()),
            ("folderid", folder_id.to_string()),
        ];
        let url = self.endpoint(&self.upload_url, "/files/content", &params)?;
        let total = data.len() as u64;
        let uploaded: UploadDto = self
            .send_json(
                self.request(Method::POST, url)
                    .header("Content-Type", "application/octet-stream")
                    .body(data),
            )
            .await?;
        if let Some(progress) = progress {
            progress(total, total);
        }
        let mut item = CloudItem::file(uploaded.file_id, uploaded.file_name).with_parent(folder_id);
        item.size = Some(total);
        Ok(item)
    }

    async fn file_info(&self, file: &CloudItem) -> CloudResult<CloudItem> {
        let path = format!("/files/{}", file.identifier);
        let url = self.endpoint(&self.base_url, &path, &[])?;
        let info: FileDto = self.send_json(self.request(Method::GET, url)).await?;
        Ok(info.into_item())
    }

    async fn file_content(&self, file: &CloudItem) -> CloudResult<Vec<u8>> {
        if file.is_directory() {
            return Err(CloudStatus::NotAFile);
        }
        let path = format!("/files/{}/content", file.identifier);
        let url = self.endpoint(&self.base_url, &path, &[])?;
        self.send_bytes(self.request(Method::GET, url)).await
    }

    async fn thumbnail(&self, file: &CloudItem) -> CloudResult<Vec<u8>> {
        if file.is_directory() {
            return Err(CloudStatus::NotAFile);
        }
        let path = format!("/files/{}/thumbnail", file.identifier);
        let url = self.endpoint(&self.base_url, &path, &[])?;
        self.send_bytes(self.request(Method::GET, url)).await
    }

    async fn rename(&self, item: &CloudItem, new_name: &str) -> CloudResult<CloudItem> {
        let url = self.endpoint(&self.base_url, &Self::item_path(item), &[])?;
        let body = json!({ "name": new_name });
        let req = self.request(Method::POST, url).json(&body);
        let renamed = if item.is_directory() {
            self.send_json::<FolderDto>(req).await?.into_item()
        } else {
            self.send_json::<FileDto>(req).await?.into_item()
        };
        Ok(renamed)
    }

    async fn copy(&self, file: &CloudItem, destination: &CloudItem) -> CloudResult<CloudItem> {
        let path = format!("/files/{}", file.identifier);
        let url = self.endpoint(&self.base_url, &path, &[])?;
        let body = json!({ "parentFolderId": destination.identifier, "clone": true });
        let copied: FileDto = self
            .send_json(self.request(Method::POST, url).json(&body))
            .await?;
        Ok(copied.into_item())
    }

    async fn delete_file(&self, file: &CloudItem) -> CloudResult<()> {
        let path = format!("/files/{}", file.identifier);
        let url = self.endpoint(&self.base_url, &path, &[])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn delete_folder(&self, folder: &CloudItem) -> CloudResult<()> {
        let path = format!("/folders/{}", folder.identifier);
        let url = self.endpoint(&self.base_url, &path, &[])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

/// Fetch raw bytes from a direct URL, outside any session.
pub async fn fetch_bytes(url: Url) -> Result<Vec<u8>> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}

#[derive(Debug, Deserialize)]
struct FreeSpaceDto {
    freespace: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadDto {
    #[serde(alias = "id")]
    file_id: String,
    #[serde(alias = "name")]
    file_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FolderDto {
    id: String,
    name: String,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    subfolders: Vec<FolderDto>,
    #[serde(default)]
    files: Vec<FileDto>,
}

impl FolderDto {
    fn into_item(self) -> CloudItem {
        let mut item = CloudItem::folder(self.id, self.name);
        item.parent_identifier = self.parent_id;
        item
    }

    /// Subfolders first, then files, as the API returns them.
    fn into_children(self) -> Vec<CloudItem> {
        let parent = self.id;
        let folders = self.subfolders.into_iter().map(|f| {
            let mut item = f.into_item();
            if item.parent_identifier.is_none() {
                item.parent_identifier = Some(parent.clone());
            }
            item
        });
        let files = self.files.into_iter().map(|f| {
            let mut item = f.into_item();
            if item.parent_identifier.is_none() {
                item.parent_identifier = Some(parent.clone());
            }
            item
        });
        folders.chain(files).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileDto {
    id: String,
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    thumb_url: Option<String>,
    #[serde(default)]
    preview_url: Option<String>,
    #[serde(default)]
    parent_id: Option<String>,
}

impl FileDto {
    fn into_item(self) -> CloudItem {
        CloudItem {
            identifier: self.id,
            name: self.name,
            kind: self
                .kind
                .as_deref()
                .map(CloudType::from_wire)
                .unwrap_or(CloudType::File),
            size: self.size,
            creation_date: self.creation_date,
            download_url: self.download_url,
            thumbnail_url: self.thumb_url,
            preview_url: self.preview_url,
            parent_identifier: self.parent_id,
        }
    }
}
