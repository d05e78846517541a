//! # SVID 磁盘同步工具 - sviddisk
//!
//! 以共享目录为同步点，把工作负载的 X.509 SVID 写入磁盘，
//! 并让其他进程等待凭据就绪后再继续启动。
//!
//! ## 模块架构
//!
//! ```text
//! sviddisk/
//! ├── src/
//! │   ├── main.rs         # 主程序入口（就绪等待）
//! │   ├── lib.rs          # 库入口
//! │   ├── app.rs          # 应用程序配置和入口
//! │   └── crates/
//! │       ├── error/          # 错误处理框架
//! │       └── svid-disk/      # 持久化和就绪等待
//! ```
//!
//! ## 使用示例
//!
//! ```no_run
//! use sviddisk::app::{AppConfig, SvidApp};
//! use sviddisk::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = SvidApp::new(AppConfig::default())?;
//!
//!     // 阻塞直到 tls.crt 和 tls.key 同时出现
//!     app.wait_ready(&CancellationToken::new()).await?;
//!     Ok(())
//! }
//! ```

// 导出应用程序模块
pub mod app;

pub use error::{ErrorCategory, ErrorInfo, ErrorSeverity};

// 重新导出磁盘同步模块
pub use svid_disk::{
    load_from_disk, wait_for_certificates, write_to_disk, CancellationToken, CertificateWaiter,
    ConfigError, MarshaledSvid, PersistConfig, SvidError, SvidMarshal, SvidWriter, WaitConfig,
    WriteStrategy, X509Svid,
};

/// 应用程序结果类型
pub type AppResult<T> = std::result::Result<T, ErrorInfo>;
