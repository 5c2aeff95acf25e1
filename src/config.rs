use regex::{Captures, Regex};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use crate::{ProbeError, Result};

const STATS_DIR: &str = ".cloudprobe";
const DEFAULT_FIXTURE: &str = "fixtures/image.jpg";

/// 完整的配置文件 (cloudprobe.toml)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProbeConfig {
    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub stats: StatsConfig,
}

/// 云服务连接配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CloudConfig {
    /// API 根地址
    #[serde(default)]
    pub base_url: String,

    /// 上传地址，缺省时使用 base_url
    pub upload_url: Option<String>,

    /// 访问令牌，支持 ${VAR}
    pub token: Option<String>,

    /// 请求超时（秒），缺省时不设超时
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunConfig {
    /// 上传测试使用的本地文件
    pub fixture: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StatsConfig {
    pub dir: Option<PathBuf>,
}

/// CLI 传入的覆盖项（优先级最高）
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub fixture: Option<PathBuf>,
}

impl ProbeConfig {
    /// 应用 CLI 覆盖并解析 ${VAR}
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.cloud.base_url = base_url;
        }
        if let Some(token) = overrides.token {
            self.cloud.token = Some(token);
        }
        if let Some(fixture) = overrides.fixture {
            self.run.fixture = Some(fixture);
        }

        self.cloud.base_url = resolve_env_vars(&self.cloud.base_url);
        self.cloud.upload_url = self.cloud.upload_url.as_deref().map(resolve_env_vars);
        self.cloud.token = self
            .cloud
            .token
            .as_deref()
            .map(resolve_env_vars)
            .filter(|t| !t.is_empty());
        self
    }

    /// 检查运行所需的字段
    pub fn validate(&self) -> Result<()> {
        if self.cloud.base_url.trim().is_empty() {
            return Err(ProbeError::Config(
                "cloud.base_url is not set (use --base-url or cloudprobe.toml)".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fixture_path(&self) -> PathBuf {
        self.run
            .fixture
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE))
    }

    /// 统计数据目录：CLOUDPROBE_STATS_DIR > 配置文件 > .cloudprobe
    pub fn stats_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var("CLOUDPROBE_STATS_DIR") {
            return PathBuf::from(dir);
        }
        self.stats
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(STATS_DIR))
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "cloudprobe.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ProbeConfig> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及父目录
    /// 2. 用户配置目录 ~/.config/cloudprobe/
    ///
    /// 找到但无法解析的文件返回错误，不会回退到下一个位置
    pub fn find_and_load() -> Result<Option<ProbeConfig>> {
        if let Ok(current) = std::env::current_dir()
            && let Some(config) = Self::find_upwards(&current)?
        {
            return Ok(Some(config));
        }

        Self::try_load_from_user_dir()
    }

    /// 按需加载：显式路径必须存在，否则查找，找不到时使用默认值
    pub fn load(explicit: Option<&Path>) -> Result<ProbeConfig> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::find_and_load()?.unwrap_or_default()),
        }
    }

    /// 从 `start` 开始逐级向上查找 cloudprobe.toml
    pub fn find_upwards(start: &Path) -> Result<Option<ProbeConfig>> {
        let mut current = start.to_path_buf();

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_from_path(&config_path).map(Some);
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    fn try_load_from_user_dir() -> Result<Option<ProbeConfig>> {
        let Some(home) = dirs::home_dir() else {
            return Ok(None);
        };
        let config_path = home
            .join(".config")
            .join("cloudprobe")
            .join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_path(&config_path).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// 解析并替换系统环境变量 ${VAR}
pub fn resolve_env_vars(text: &str) -> String {
    static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ENV_REGEX.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

    re.replace_all(text, |caps: &Captures| {
        let env_name = &caps[1];
        std::env::var(env_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .to_string()
}
