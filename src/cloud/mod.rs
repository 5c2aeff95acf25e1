pub mod http;
pub mod item;
pub mod session;
pub mod status;

// Re-export commonly used types for convenient access
pub use http::HttpCloudSession;
pub use item::{CloudItem, CloudType};
pub use session::{CloudResult, CloudSession, ItemFilter, ListOptions, UploadProgress};
pub use status::CloudStatus;
