//! # 应用程序模块
//!
//! 把持久化和就绪等待绑定到一个配置好的目录上，并负责从 TOML 文件加载配置。

use crate::AppResult;
use error::ErrorInfo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use svid_disk::{
    CertificateWaiter, ConfigError, PersistConfig, SvidMarshal, SvidWriter, WaitConfig,
    WriteStrategy, X509Svid,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// 配置文件路径环境变量
pub const CONFIG_ENV: &str = "SVIDDISK_CONFIG";

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "sviddisk.toml";

/// 应用程序配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 证书目录
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// 轮询间隔（毫秒）
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// 最大等待时间（秒）
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,

    /// 写入策略
    #[serde(default)]
    pub strategy: WriteStrategy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            poll_interval_ms: default_poll_interval_ms(),
            max_wait_secs: default_max_wait_secs(),
            strategy: WriteStrategy::default(),
        }
    }
}

impl AppConfig {
    /// 从 TOML 文件加载配置，文件不存在时使用默认配置
    #[cfg(feature = "config")]
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!("配置文件不存在，使用默认配置: {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ErrorInfo::from(ConfigError::Load(e.to_string()))
                .with_context(format!("配置文件: {}", path.display()))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            ErrorInfo::from(ConfigError::Load(e.to_string()))
                .with_context(format!("配置文件: {}", path.display()))
        })?;

        info!("从配置文件加载: {}", path.display());
        Ok(config)
    }

    /// 未启用 `config` 特性时总是使用默认配置
    #[cfg(not(feature = "config"))]
    pub fn load(_path: &Path) -> AppResult<Self> {
        Ok(Self::default())
    }

    /// 从 `SVIDDISK_CONFIG` 指定的文件加载配置
    pub fn from_env() -> AppResult<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(Path::new(&path))
    }

    /// 转换为经过验证的等待配置
    pub fn wait_config(&self) -> Result<WaitConfig, ConfigError> {
        WaitConfig::builder()
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_max_wait(Duration::from_secs(self.max_wait_secs))
            .build()
    }

    /// 转换为持久化配置
    pub fn persist_config(&self) -> PersistConfig {
        PersistConfig::with_strategy(self.strategy)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.directory.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDirectory(String::new()));
        }
        Ok(())
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("./svid")
}

const fn default_poll_interval_ms() -> u64 {
    500
}

const fn default_max_wait_secs() -> u64 {
    180
}

/// 绑定到单个证书目录的应用程序
pub struct SvidApp {
    config: AppConfig,
    writer: SvidWriter,
    waiter: CertificateWaiter,
}

impl SvidApp {
    /// 验证配置并创建应用程序
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let waiter = CertificateWaiter::new(config.wait_config()?);
        let writer = SvidWriter::new(config.persist_config());

        Ok(Self { config, writer, waiter })
    }

    /// 获取配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 证书目录
    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// 将身份文档写入证书目录
    pub async fn persist<D>(&self, svid: &D) -> AppResult<()>
    where
        D: SvidMarshal + ?Sized,
    {
        self.writer
            .write(svid, self.directory())
            .await
            .map_err(|e| self.with_directory(e.into()))
    }

    /// 等待证书目录中的凭据就绪
    pub async fn wait_ready(&self, cancel: &CancellationToken) -> AppResult<()> {
        self.waiter
            .wait_with_cancel(self.directory(), cancel)
            .await
            .map_err(|e| self.with_directory(e.into()))
    }

    /// 读取证书目录中的凭据
    pub async fn load(&self) -> AppResult<X509Svid> {
        svid_disk::load_from_disk(self.directory())
            .await
            .map_err(|e| self.with_directory(e.into()))
    }

    fn with_directory(&self, error: ErrorInfo) -> ErrorInfo {
        error.with_context(format!("证书目录: {}", self.directory().display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::ErrorCategory;
    use svid_disk::{MarshaledSvid, SvidError};
    use tempfile::TempDir;

    struct FixedSvid;

    impl SvidMarshal for FixedSvid {
        fn marshal(&self) -> Result<MarshaledSvid, SvidError> {
            Ok(MarshaledSvid {
                certs_pem: b"CERT-A".to_vec(),
                key_pem: b"KEY-A".to_vec(),
            })
        }
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.directory, PathBuf::from("./svid"));
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.max_wait_secs, 180);
        assert_eq!(config.strategy, WriteStrategy::Direct);
        assert_eq!(config.wait_config().unwrap(), WaitConfig::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_load_partial_toml() {
        let temp_dir = TempDir::new().expect("无法创建临时目录");
        let path = temp_dir.path().join("sviddisk.toml");
        std::fs::write(&path, "directory = \"/run/svid\"\nstrategy = \"atomic\"\n").unwrap();

        let config = AppConfig::load(&path).expect("加载应该成功");
        assert_eq!(config.directory, PathBuf::from("/run/svid"));
        assert_eq!(config.strategy, WriteStrategy::Atomic);
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().expect("无法创建临时目录");
        let path = temp_dir.path().join("sviddisk.toml");
        std::fs::write(&path, "poll_interval_ms = \"fast\"").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let temp_dir = TempDir::new().expect("无法创建临时目录");
        let config = AppConfig::load(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_app_rejects_invalid_config() {
        let config = AppConfig { poll_interval_ms: 0, ..AppConfig::default() };
        let err = SvidApp::new(config).err().expect("零间隔应该被拒绝");
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let config = AppConfig { directory: PathBuf::new(), ..AppConfig::default() };
        assert!(SvidApp::new(config).is_err());
    }

    #[tokio::test]
    async fn test_persist_then_wait() {
        let temp_dir = TempDir::new().expect("无法创建临时目录");
        let config = AppConfig {
            directory: temp_dir.path().to_path_buf(),
            poll_interval_ms: 10,
            max_wait_secs: 1,
            ..AppConfig::default()
        };
        let app = SvidApp::new(config).expect("应用创建失败");

        app.persist(&FixedSvid).await.expect("写入应该成功");
        app.wait_ready(&CancellationToken::new()).await.expect("等待应该成功");
    }

    #[tokio::test]
    async fn test_timeout_error_carries_directory_context() {
        let temp_dir = TempDir::new().expect("无法创建临时目录");
        let config = AppConfig {
            directory: temp_dir.path().to_path_buf(),
            poll_interval_ms: 10,
            max_wait_secs: 1,
            ..AppConfig::default()
        };
        let app = SvidApp::new(config).expect("应用创建失败");

        let err = app.wait_ready(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Timeout);
        assert!(err.is_retryable());
        assert!(err.context().iter().any(|c| c.starts_with("证书目录")));
    }
}
