//! # SVID 磁盘同步模块
//!
//! 在异步签发身份的写入方和需要凭据就绪才能继续的读取方之间，
//! 以共享目录和固定文件名作为同步点。
//!
//! ## 核心功能
//!
//! - **持久化**: 将 X.509 SVID 写入 `<dir>/tls.crt`（0644）和 `<dir>/tls.key`（0600），先证书后私钥
//! - **就绪等待**: 按固定间隔轮询两个文件是否同时存在，默认 500 毫秒 × 360 次，支持取消
//! - **回读**: 从目录读取并解析 PEM 证书链和私钥
//!
//! 两者之间没有运行时依赖，通常由调用方在不同进程中组合使用。
//! 检测只基于文件是否存在，不加锁、不监听文件系统事件。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use svid_disk::{write_to_disk, wait_for_certificates, X509Svid};
//!
//! # async fn example(cert_der: Vec<u8>, key_der: Vec<u8>) -> Result<(), svid_disk::SvidError> {
//! let svid = X509Svid::new(vec![cert_der], key_der);
//! write_to_disk(&svid, "/run/svid").await?;
//!
//! // 另一个进程中
//! wait_for_certificates("/run/svid").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod storage;
pub mod types;
pub mod waiter;

pub use config::{
    PersistConfig, WaitConfig, WaitConfigBuilder, WriteStrategy, CERTS_FILE_MODE, CERTS_FILE_NAME,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, KEY_FILE_MODE, KEY_FILE_NAME,
};
pub use error::{ConfigError, SvidError, TIMEOUT_MESSAGE};
pub use storage::{load_from_disk, write_to_disk, SvidWriter};
pub use types::{MarshaledSvid, SvidFile, SvidMarshal, SvidPaths, X509Svid};
pub use waiter::{wait_for_certificates, CertificateWaiter};

pub use tokio_util::sync::CancellationToken;
