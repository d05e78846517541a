//! # SVID 磁盘操作错误定义
//!
//! 所有错误都原样返回给直接调用方，本模块内部不记录日志、不吞掉错误。

use crate::types::SvidFile;
use error::{ErrorCategory, ErrorInfo, ErrorSeverity};
use std::fmt;

/// 等待超时的固定错误消息，下游工具可能依赖该文本
pub const TIMEOUT_MESSAGE: &str = "Timed out waiting for trust bundle";

/// SVID 磁盘操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvidError {
    /// 身份文档无法序列化，此时不会写入任何文件
    Marshal(String),

    /// 写入证书或私钥文件失败
    Write {
        /// 失败的文件
        file: SvidFile,
        /// 底层 IO 错误描述
        message: String,
    },

    /// 读取证书或私钥文件失败
    Read {
        /// 失败的文件
        file: SvidFile,
        /// 底层 IO 错误描述
        message: String,
    },

    /// 磁盘上的 PEM 内容无法解析
    Parse(String),

    /// 在等待预算内没有同时观察到两个文件
    Timeout,

    /// 等待被调用方取消
    Cancelled,

    /// 配置错误
    Config(ConfigError),
}

impl SvidError {
    /// 构造写入错误
    pub(crate) fn write(file: SvidFile, err: impl fmt::Display) -> Self {
        SvidError::Write { file, message: err.to_string() }
    }

    /// 构造读取错误
    pub(crate) fn read(file: SvidFile, err: impl fmt::Display) -> Self {
        SvidError::Read { file, message: err.to_string() }
    }

    /// 调用方是否可以直接重试
    ///
    /// 只有超时可以重试；其余错误需要调用方先修复输入或环境。
    pub fn is_retryable(&self) -> bool {
        matches!(self, SvidError::Timeout)
    }
}

impl fmt::Display for SvidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvidError::Marshal(msg) => write!(f, "无法序列化 X.509 SVID: {}", msg),
            SvidError::Write { file, message } => {
                write!(f, "写入{}失败 ({}): {}", file.description(), file.file_name(), message)
            }
            SvidError::Read { file, message } => {
                write!(f, "读取{}失败 ({}): {}", file.description(), file.file_name(), message)
            }
            SvidError::Parse(msg) => write!(f, "解析 PEM 失败: {}", msg),
            SvidError::Timeout => write!(f, "{}", TIMEOUT_MESSAGE),
            SvidError::Cancelled => write!(f, "等待证书已取消"),
            SvidError::Config(err) => write!(f, "配置错误: {}", err),
        }
    }
}

impl std::error::Error for SvidError {}

impl From<ConfigError> for SvidError {
    fn from(err: ConfigError) -> Self {
        SvidError::Config(err)
    }
}

/// 配置错误详细类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 轮询间隔必须大于零（毫秒）
    InvalidPollInterval(u128),

    /// 最大等待时间不能小于轮询间隔（毫秒）
    InvalidMaxWait(u128),

    /// 目标目录为空
    InvalidDirectory(String),

    /// 配置文件加载失败
    Load(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPollInterval(ms) => write!(f, "无效的轮询间隔: {} 毫秒", ms),
            ConfigError::InvalidMaxWait(ms) => write!(f, "无效的最大等待时间: {} 毫秒", ms),
            ConfigError::InvalidDirectory(dir) => write!(f, "无效的证书目录: {:?}", dir),
            ConfigError::Load(msg) => write!(f, "加载配置失败: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<SvidError> for ErrorInfo {
    fn from(err: SvidError) -> Self {
        let (code, category, severity) = match &err {
            SvidError::Marshal(_) => (7001, ErrorCategory::Encoding, ErrorSeverity::Error),
            SvidError::Write { .. } => (7002, ErrorCategory::FileSystem, ErrorSeverity::Error),
            SvidError::Read { .. } => (7003, ErrorCategory::FileSystem, ErrorSeverity::Error),
            SvidError::Parse(_) => (7004, ErrorCategory::Parse, ErrorSeverity::Error),
            SvidError::Timeout => (7005, ErrorCategory::Timeout, ErrorSeverity::Warning),
            SvidError::Cancelled => (7006, ErrorCategory::Cancelled, ErrorSeverity::Info),
            SvidError::Config(_) => (7007, ErrorCategory::Configuration, ErrorSeverity::Error),
        };

        let info = ErrorInfo::new(code, err.to_string())
            .with_category(category)
            .with_severity(severity);

        match &err {
            SvidError::Write { file, .. } | SvidError::Read { file, .. } => {
                info.with_context(format!("文件: {}", file.file_name()))
            }
            _ => info,
        }
    }
}

impl From<ConfigError> for ErrorInfo {
    fn from(err: ConfigError) -> Self {
        SvidError::Config(err).into()
    }
}
