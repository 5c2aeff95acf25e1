use thiserror::Error;

use crate::cloud::CloudStatus;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("连接失败: {0}")]
    Connection(CloudStatus),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML 解析错误: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL 解析错误: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

// Add conversion from anyhow::Error
impl From<anyhow::Error> for ProbeError {
    fn from(err: anyhow::Error) -> Self {
        ProbeError::Other(err.to_string())
    }
}

/// Result type for cloudprobe crate
pub type Result<T> = std::result::Result<T, ProbeError>;
