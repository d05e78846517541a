//! # 错误处理框架
//!
//! 零依赖的错误信息框架，为各个子库提供统一的错误码、类别和严重程度。
//!
//! 子库定义自己的错误枚举，再显式转换为 [`ErrorInfo`] 向上传播：
//!
//! ```rust
//! use error::{ErrorInfo, ErrorCategory, ErrorSeverity};
//!
//! let error = ErrorInfo::new(7002, "写入证书文件失败".to_string())
//!     .with_category(ErrorCategory::FileSystem)
//!     .with_severity(ErrorSeverity::Error)
//!     .with_context("目标目录: /tmp/svid".to_string());
//!
//! assert_eq!(error.code(), 7002);
//! ```

use std::fmt;

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 信息级别：操作被主动中止
    Info = 1,
    /// 警告级别：调用方可以重试
    Warning = 2,
    /// 错误级别：当前操作失败
    Error = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "信息"),
            ErrorSeverity::Warning => write!(f, "警告"),
            ErrorSeverity::Error => write!(f, "错误"),
        }
    }
}

/// 错误类别
///
/// 便于调用方按类别决定处理策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 文件系统错误
    FileSystem,
    /// 编码/序列化错误
    Encoding,
    /// 解析错误
    Parse,
    /// 配置错误
    Configuration,
    /// 等待超时
    Timeout,
    /// 操作被取消
    Cancelled,
    /// 其他错误
    Other,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::FileSystem => write!(f, "文件系统错误"),
            ErrorCategory::Encoding => write!(f, "编码错误"),
            ErrorCategory::Parse => write!(f, "解析错误"),
            ErrorCategory::Configuration => write!(f, "配置错误"),
            ErrorCategory::Timeout => write!(f, "超时错误"),
            ErrorCategory::Cancelled => write!(f, "取消"),
            ErrorCategory::Other => write!(f, "其他错误"),
        }
    }
}

/// 错误信息结构体
///
/// 封装错误码、消息、上下文、严重程度和类别。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    code: u32,
    message: String,
    context: Vec<String>,
    severity: ErrorSeverity,
    category: ErrorCategory,
}

impl ErrorInfo {
    /// 创建一个新的错误信息
    ///
    /// 默认严重程度为 [`ErrorSeverity::Error`]，类别为 [`ErrorCategory::Other`]。
    pub fn new(code: u32, message: String) -> Self {
        Self {
            code,
            message,
            context: Vec::new(),
            severity: ErrorSeverity::Error,
            category: ErrorCategory::Other,
        }
    }

    /// 链式添加错误上下文
    pub fn with_context(mut self, context: String) -> Self {
        self.context.push(context);
        self
    }

    /// 设置错误严重程度
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// 设置错误类别
    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = category;
        self
    }

    /// 获取错误码
    pub fn code(&self) -> u32 {
        self.code
    }

    /// 获取错误消息
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取错误上下文
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// 获取错误严重程度
    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    /// 是否值得调用方重试
    pub fn is_retryable(&self) -> bool {
        self.category == ErrorCategory::Timeout
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}][错误码: {}] {}",
               self.severity, self.category, self.code, self.message)?;

        for ctx in &self.context {
            write!(f, "\n  上下文: {}", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorInfo {}
