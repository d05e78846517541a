//! # SVID 数据类型定义
//!
//! 身份文档、序列化能力以及从目标目录推导出的文件布局。

use crate::config::{CERTS_FILE_MODE, CERTS_FILE_NAME, KEY_FILE_MODE, KEY_FILE_NAME};
use crate::error::SvidError;
use pem::{EncodeConfig, LineEnding, Pem};
use std::fmt;
use std::path::{Path, PathBuf};

/// PEM 证书块标签
const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// PEM PKCS#8 私钥块标签
const PRIVATE_KEY_TAG: &str = "PRIVATE KEY";

/// PEM 编码统一使用 LF 换行
fn lf_encoding() -> EncodeConfig {
    EncodeConfig::new().set_line_ending(LineEnding::LF)
}

/// 落盘的两个文件之一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SvidFile {
    /// 公开材料：证书链
    Certs,
    /// 私密材料：私钥
    Key,
}

impl SvidFile {
    /// 固定文件名
    pub fn file_name(&self) -> &'static str {
        match self {
            SvidFile::Certs => CERTS_FILE_NAME,
            SvidFile::Key => KEY_FILE_NAME,
        }
    }

    /// 文件权限（Unix 模式位）
    pub fn mode(&self) -> u32 {
        match self {
            SvidFile::Certs => CERTS_FILE_MODE,
            SvidFile::Key => KEY_FILE_MODE,
        }
    }

    /// 中文描述，用于错误消息
    pub fn description(&self) -> &'static str {
        match self {
            SvidFile::Certs => "证书文件",
            SvidFile::Key => "私钥文件",
        }
    }
}

/// 从目标目录确定性推导出的文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvidPaths {
    /// `<dir>/tls.crt`
    pub certs: PathBuf,
    /// `<dir>/tls.key`
    pub key: PathBuf,
}

impl SvidPaths {
    /// 根据目录推导文件路径，目录可以是相对路径
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            certs: dir.join(CERTS_FILE_NAME),
            key: dir.join(KEY_FILE_NAME),
        }
    }

    /// 获取指定文件的路径
    pub fn path(&self, file: SvidFile) -> &Path {
        match file {
            SvidFile::Certs => &self.certs,
            SvidFile::Key => &self.key,
        }
    }
}

/// 序列化后的身份文档
#[derive(Clone, PartialEq, Eq)]
pub struct MarshaledSvid {
    /// 公开材料（PEM 证书链）
    pub certs_pem: Vec<u8>,
    /// 私密材料（PEM 私钥）
    pub key_pem: Vec<u8>,
}

impl fmt::Debug for MarshaledSvid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshaledSvid")
            .field("certs_pem_len", &self.certs_pem.len())
            .field("key_pem", &"<redacted>")
            .finish()
    }
}

/// 身份文档的序列化能力
///
/// 持久化只依赖这一个能力，任何调用方类型都可以实现它。
pub trait SvidMarshal {
    /// 序列化为（公开材料, 私密材料），内部状态不完整时返回 [`SvidError::Marshal`]
    fn marshal(&self) -> Result<MarshaledSvid, SvidError>;
}

/// X.509 SVID：证书链与对应的私钥
#[derive(Clone, PartialEq, Eq)]
pub struct X509Svid {
    /// DER 编码的证书链，叶子证书在前
    cert_chain: Vec<Vec<u8>>,
    /// PKCS#8 DER 编码的私钥
    private_key: Vec<u8>,
}

impl X509Svid {
    /// 由 DER 证书链和 PKCS#8 私钥创建
    ///
    /// 不校验内容，序列化时才检查完整性。
    pub fn new(cert_chain: Vec<Vec<u8>>, private_key: Vec<u8>) -> Self {
        Self { cert_chain, private_key }
    }

    /// 从 PEM 文本解析
    ///
    /// `certs_pem` 必须只包含 `CERTIFICATE` 块，`key_pem` 必须包含一个 `PRIVATE KEY` 块。
    pub fn from_pem(certs_pem: &[u8], key_pem: &[u8]) -> Result<Self, SvidError> {
        let blocks = pem::parse_many(certs_pem)
            .map_err(|e| SvidError::Parse(format!("证书链: {}", e)))?;

        if blocks.is_empty() {
            return Err(SvidError::Parse("证书链中没有证书".to_string()));
        }

        let mut cert_chain = Vec::with_capacity(blocks.len());
        for block in blocks {
            if block.tag() != CERTIFICATE_TAG {
                return Err(SvidError::Parse(format!("证书链中出现非证书块: {}", block.tag())));
            }
            cert_chain.push(block.into_contents());
        }

        let key = pem::parse(key_pem).map_err(|e| SvidError::Parse(format!("私钥: {}", e)))?;
        if key.tag() != PRIVATE_KEY_TAG {
            return Err(SvidError::Parse(format!("期望 PRIVATE KEY 块，实际为: {}", key.tag())));
        }

        Ok(Self {
            cert_chain,
            private_key: key.into_contents(),
        })
    }

    /// DER 证书链
    pub fn cert_chain(&self) -> &[Vec<u8>] {
        &self.cert_chain
    }

    /// 叶子证书
    pub fn leaf(&self) -> Option<&[u8]> {
        self.cert_chain.first().map(Vec::as_slice)
    }

    /// PKCS#8 DER 私钥
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }
}

impl fmt::Debug for X509Svid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X509Svid")
            .field("cert_chain_len", &self.cert_chain.len())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl SvidMarshal for X509Svid {
    fn marshal(&self) -> Result<MarshaledSvid, SvidError> {
        if self.cert_chain.is_empty() {
            return Err(SvidError::Marshal("没有可序列化的证书".to_string()));
        }
        if let Some(index) = self.cert_chain.iter().position(Vec::is_empty) {
            return Err(SvidError::Marshal(format!("第 {} 个证书为空", index)));
        }
        if self.private_key.is_empty() {
            return Err(SvidError::Marshal("私钥为空".to_string()));
        }

        let certs: Vec<Pem> = self
            .cert_chain
            .iter()
            .map(|der| Pem::new(CERTIFICATE_TAG, der.clone()))
            .collect();
        let certs_pem = pem::encode_many_config(&certs, lf_encoding());

        let key = Pem::new(PRIVATE_KEY_TAG, self.private_key.clone());
        let key_pem = pem::encode_config(&key, lf_encoding());

        Ok(MarshaledSvid {
            certs_pem: certs_pem.into_bytes(),
            key_pem: key_pem.into_bytes(),
        })
    }
}
