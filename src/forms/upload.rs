use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{QaFlowError, Result};

/// 上传文件的内容来源
#[derive(Clone, Debug, PartialEq)]
pub enum FileSource {
    Memory(Arc<[u8]>),
    Disk(PathBuf),
}

/// 上传文件描述
///
/// 捕获后不再修改；内容在提交时才读取。
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    /// 毫秒时间戳
    pub last_modified: u64,
    source: FileSource,
}

impl UploadedFile {
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            content_type: content_type.into(),
            last_modified: now_millis(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    pub fn from_path(
        name: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            content_type: content_type.into(),
            last_modified: now_millis(),
            source: FileSource::Disk(path.into()),
        }
    }

    /// 从磁盘文件读取元数据（内容延迟读取）
    pub async fn from_disk(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| QaFlowError::FileRead {
                name: name.clone(),
                source,
            })?;
        let last_modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or_else(now_millis);

        Ok(Self {
            content_type: guess_content_type(&name).to_string(),
            name,
            size: metadata.len(),
            last_modified,
            source: FileSource::Disk(path.to_path_buf()),
        })
    }

    pub fn with_last_modified(mut self, last_modified: u64) -> Self {
        self.last_modified = last_modified;
        self
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
            FileSource::Disk(path) => tokio::fs::read(path).await,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// 按扩展名推断 MIME 类型
pub fn guess_content_type(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// 上传回调：收到当前完整的文件列表
pub type UploadCallback = Arc<dyn Fn(Vec<UploadedFile>) + Send + Sync>;

/// 新选择的文件是替换还是追加到已有列表
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadMode {
    #[default]
    Replace,
    Append,
}

/// 文件上传面板的状态
///
/// 每次变化都把完整列表通过回调重新发出。
pub struct FileUploadSurface {
    mode: UploadMode,
    files: Vec<UploadedFile>,
    on_upload: UploadCallback,
}

impl FileUploadSurface {
    pub fn new(mode: UploadMode, on_upload: UploadCallback) -> Self {
        Self {
            mode,
            files: Vec::new(),
            on_upload,
        }
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn select(&mut self, selection: Vec<UploadedFile>) {
        self.files = match self.mode {
            UploadMode::Replace => selection,
            UploadMode::Append => self.files.iter().cloned().chain(selection).collect(),
        };
        (self.on_upload)(self.files.clone());
    }

    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.files.len() {
            return Err(QaFlowError::FileIndex(index));
        }
        self.files = self
            .files
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, file)| file.clone())
            .collect();
        (self.on_upload)(self.files.clone());
        Ok(())
    }
}
