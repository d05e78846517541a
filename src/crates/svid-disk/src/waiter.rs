//! # 证书就绪等待
//!
//! 按固定间隔轮询目标目录，直到 `tls.crt` 和 `tls.key` 同时存在或预算耗尽。
//!
//! 只检查文件是否存在，不校验内容是否完整。每次检查前先休眠一个间隔，
//! 因此即使文件已经就绪也至少需要一个间隔才会返回；失败路径的总耗时
//! 恰好是 间隔 × 最大尝试次数。

use crate::config::WaitConfig;
use crate::error::SvidError;
use crate::types::SvidPaths;
use std::path::Path;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// 证书就绪等待器
#[derive(Debug, Clone, Default)]
pub struct CertificateWaiter {
    config: WaitConfig,
}

impl CertificateWaiter {
    /// 创建等待器
    pub fn new(config: WaitConfig) -> Self {
        Self { config }
    }

    /// 获取等待配置
    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// 等待证书和私钥出现，不可取消
    pub async fn wait(&self, dir: impl AsRef<Path>) -> Result<(), SvidError> {
        self.wait_with_cancel(dir, &CancellationToken::new()).await
    }

    /// 等待证书和私钥出现
    ///
    /// 取消信号在休眠期间和每次检查之前都会被观察到。
    ///
    /// # 错误
    ///
    /// - [`SvidError::Timeout`]：预算耗尽仍未同时观察到两个文件
    /// - [`SvidError::Cancelled`]：`cancel` 被触发
    pub async fn wait_with_cancel(
        &self,
        dir: impl AsRef<Path>,
        cancel: &CancellationToken,
    ) -> Result<(), SvidError> {
        let dir = dir.as_ref();
        let paths = SvidPaths::new(dir);
        let max_attempts = self.config.max_attempts();
        let started = Instant::now();

        debug!("开始等待证书: {} (间隔 {:?}, 最多 {} 次)",
               dir.display(), self.config.poll_interval(), max_attempts);

        for attempt in 1..=max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SvidError::Cancelled),
                _ = time::sleep(self.config.poll_interval()) => {}
            }

            if cancel.is_cancelled() {
                return Err(SvidError::Cancelled);
            }

            if !exists(&paths.certs).await {
                debug!("第 {} 次检查: 证书文件不存在", attempt);
                continue;
            }

            if !exists(&paths.key).await {
                debug!("第 {} 次检查: 私钥文件不存在", attempt);
                continue;
            }

            info!("证书已就绪: {} (第 {} 次检查, 耗时 {:?})",
                  dir.display(), attempt, started.elapsed());
            return Ok(());
        }

        Err(SvidError::Timeout)
    }
}

/// 使用默认预算（500 毫秒 × 360 次）等待证书和私钥出现
pub async fn wait_for_certificates(dir: impl AsRef<Path>) -> Result<(), SvidError> {
    CertificateWaiter::default().wait(dir).await
}

/// 检查失败（包括权限错误）一律视为不存在
async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
