//! # sviddisk 主程序入口
//!
//! 等待配置目录中的证书和私钥就绪，成功后以 0 退出，超时或取消时以非零退出。

use sviddisk::app::{AppConfig, SvidApp};
use sviddisk::{CancellationToken, ErrorSeverity};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("sviddisk 启动");

    let config = AppConfig::from_env()?;
    let app = SvidApp::new(config)?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("收到停止信号，取消等待");
                cancel.cancel();
            }
        }
    });

    tracing::info!("等待证书就绪: {}", app.directory().display());
    if let Err(e) = app.wait_ready(&cancel).await {
        match e.severity() {
            ErrorSeverity::Info => tracing::info!("等待已中止: {}", e),
            ErrorSeverity::Warning => tracing::warn!("等待证书失败: {}", e),
            ErrorSeverity::Error => tracing::error!("等待证书失败: {}", e),
        }
        return Err(e.into());
    }

    tracing::info!("证书已就绪，sviddisk 退出");
    Ok(())
}
