//! # 持久化与等待配置
//!
//! 固定的文件名与权限常量，以及可注入的等待预算和写入策略。
//! 等待配置使用构建器模式创建并在构建时验证。

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 证书文件名
pub const CERTS_FILE_NAME: &str = "tls.crt";

/// 私钥文件名
pub const KEY_FILE_NAME: &str = "tls.key";

/// 证书文件权限：所有者读写，组和其他用户只读
pub const CERTS_FILE_MODE: u32 = 0o644;

/// 私钥文件权限：仅所有者读写
pub const KEY_FILE_MODE: u32 = 0o600;

const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// 默认轮询间隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);

/// 默认最大尝试次数
pub const DEFAULT_MAX_ATTEMPTS: u32 = 360;

/// 默认等待预算：轮询间隔 × 最大尝试次数（180 秒）
pub const DEFAULT_MAX_WAIT: Duration =
    Duration::from_millis(DEFAULT_POLL_INTERVAL_MS * DEFAULT_MAX_ATTEMPTS as u64);

/// 等待配置构建器
///
/// 反序列化 [`WaitConfig`] 时也经过这里，缺省字段取默认值。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaitConfigBuilder {
    poll_interval: Duration,
    max_wait: Duration,
}

impl Default for WaitConfigBuilder {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl WaitConfigBuilder {
    /// 创建新的配置构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置两次检查之间的间隔
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// 设置总等待预算
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// 构建并验证配置
    pub fn build(self) -> Result<WaitConfig, ConfigError> {
        self.validate()?;
        Ok(WaitConfig {
            poll_interval: self.poll_interval,
            max_wait: self.max_wait,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidPollInterval(self.poll_interval.as_millis()));
        }

        if self.max_wait < self.poll_interval {
            return Err(ConfigError::InvalidMaxWait(self.max_wait.as_millis()));
        }

        Ok(())
    }
}

/// 等待配置
///
/// 默认值与历史行为一致：每 500 毫秒检查一次，最多 360 次。
/// 只能通过构建器或反序列化得到，两条路径都会验证。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WaitConfigBuilder")]
pub struct WaitConfig {
    poll_interval: Duration,
    max_wait: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl WaitConfig {
    /// 创建配置构建器
    pub fn builder() -> WaitConfigBuilder {
        WaitConfigBuilder::new()
    }

    /// 两次检查之间的间隔
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// 总等待预算
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// 最大尝试次数，向上取整
    ///
    /// 构建时已保证间隔非零且不大于预算，结果至少为 1。
    pub fn max_attempts(&self) -> u32 {
        let attempts = self.max_wait.as_nanos().div_ceil(self.poll_interval.as_nanos());
        u32::try_from(attempts).unwrap_or(u32::MAX)
    }
}

impl TryFrom<WaitConfigBuilder> for WaitConfig {
    type Error = ConfigError;

    fn try_from(builder: WaitConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/// 写入策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStrategy {
    /// 直接截断并覆盖目标文件
    #[default]
    Direct,

    /// 先写入同目录下的临时文件，再重命名覆盖目标文件
    ///
    /// 读者不会看到写了一半的文件；两个文件之间的先后窗口仍然存在。
    Atomic,
}

/// 持久化配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistConfig {
    /// 写入策略
    #[serde(default)]
    pub strategy: WriteStrategy,
}

impl PersistConfig {
    /// 使用指定写入策略
    pub fn with_strategy(strategy: WriteStrategy) -> Self {
        Self { strategy }
    }
}
