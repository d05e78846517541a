//! # SVID 持久化
//!
//! 将身份文档写入目标目录下的 `tls.crt`（0644）和 `tls.key`（0600）。
//!
//! 写入顺序固定为先证书后私钥。两个文件之间没有事务保证：私钥写入失败时
//! 证书文件会留在磁盘上，错误原样返回给调用方，不做回滚。

use crate::config::{PersistConfig, WriteStrategy};
use crate::error::SvidError;
use crate::types::{SvidFile, SvidMarshal, SvidPaths, X509Svid};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// SVID 写入器
///
/// 无状态，可在多个独立调用之间复用；同一目录上的并发写入需要调用方自行串行化。
#[derive(Debug, Clone, Default)]
pub struct SvidWriter {
    config: PersistConfig,
}

impl SvidWriter {
    /// 创建写入器
    pub fn new(config: PersistConfig) -> Self {
        Self { config }
    }

    /// 获取持久化配置
    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// 将身份文档写入目标目录
    ///
    /// 目录必须已存在。每次写入都完全替换已有内容。
    ///
    /// # 错误
    ///
    /// - [`SvidError::Marshal`]：序列化失败，不写入任何文件
    /// - [`SvidError::Write`] (`Certs`)：证书写入失败，不会尝试写私钥
    /// - [`SvidError::Write`] (`Key`)：私钥写入失败，证书文件保留
    pub async fn write<D>(&self, svid: &D, dir: impl AsRef<Path>) -> Result<(), SvidError>
    where
        D: SvidMarshal + ?Sized,
    {
        let dir = dir.as_ref();
        let paths = SvidPaths::new(dir);

        let marshaled = svid.marshal()?;

        self.write_file(&paths, SvidFile::Certs, &marshaled.certs_pem).await?;
        self.write_file(&paths, SvidFile::Key, &marshaled.key_pem).await?;

        info!("SVID 已写入目录: {}", dir.display());
        Ok(())
    }

    async fn write_file(&self, paths: &SvidPaths, file: SvidFile, contents: &[u8]) -> Result<(), SvidError> {
        let target = paths.path(file);
        debug!("写入{}: {} ({} 字节, 策略 {:?})",
               file.description(), target.display(), contents.len(), self.config.strategy);

        let result = match self.config.strategy {
            WriteStrategy::Direct => write_in_place(target, contents, file.mode()).await,
            WriteStrategy::Atomic => write_atomic(target, contents, file.mode()).await,
        };

        result.map_err(|e| SvidError::write(file, e))
    }
}

/// 使用默认配置将身份文档写入目标目录
pub async fn write_to_disk<D>(svid: &D, dir: impl AsRef<Path>) -> Result<(), SvidError>
where
    D: SvidMarshal + ?Sized,
{
    SvidWriter::default().write(svid, dir).await
}

/// 从目标目录读取并解析 SVID
///
/// 只校验 PEM 结构，不校验证书内容。
pub async fn load_from_disk(dir: impl AsRef<Path>) -> Result<X509Svid, SvidError> {
    let paths = SvidPaths::new(dir);

    let certs_pem = fs::read(&paths.certs)
        .await
        .map_err(|e| SvidError::read(SvidFile::Certs, e))?;
    let key_pem = fs::read(&paths.key)
        .await
        .map_err(|e| SvidError::read(SvidFile::Key, e))?;

    X509Svid::from_pem(&certs_pem, &key_pem)
}

/// 截断并写入目标文件
async fn write_in_place(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    let mut file = open_restricted(path, mode).await?;
    file.write_all(contents).await?;
    file.flush().await
}

/// 打开并截断目标文件，在写入任何内容之前设置目标权限
///
/// 新建文件从创建起就带有目标权限；已存在的文件通过打开的句柄被收紧或放宽。
async fn open_restricted(path: &Path, mode: u32) -> io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(mode);

    let file = options.open(path).await?;
    apply_mode(&file, mode).await?;
    Ok(file)
}

/// 写入同目录临时文件后重命名覆盖目标文件
async fn write_atomic(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    let tmp_path = temp_path(path);

    // 残留的临时文件可能带有错误的权限
    let _ = fs::remove_file(&tmp_path).await;

    if let Err(e) = write_in_place(&tmp_path, contents, mode).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e);
    }

    Ok(())
}

/// `dir/tls.key` -> `dir/.tls.key.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(unix)]
async fn apply_mode(file: &fs::File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode)).await
}

#[cfg(not(unix))]
async fn apply_mode(_file: &fs::File, _mode: u32) -> io::Result<()> {
    Ok(())
}
