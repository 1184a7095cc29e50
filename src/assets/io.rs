use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::ImportError;

/// 资产读取器 Trait
/// 支持本地文件和网络资源的异步读取
pub trait AssetReader: Send + Sync {
    /// 异步读取资源字节流
    fn read_bytes(&self, uri: &str) -> impl std::future::Future<Output = Result<Vec<u8>, ImportError>> + Send;
}

/// 本地文件读取器
#[derive(Debug)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.as_os_str().is_empty() {
            PathBuf::from(".")
        } else if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

#[cfg(target_arch = "wasm32")]
impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>, ImportError> {
        Err(ImportError::FeatureNotEnabled(format!(
            "local file access is unavailable on wasm32 ({})",
            self.root_path.join(uri).display()
        )))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AssetReader for FileAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>, ImportError> {
        let path = self.root_path.join(uri);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ImportError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// HTTP 网络读取器 (条件编译)
#[cfg(feature = "http")]
#[derive(Debug)]
pub struct HttpAssetReader {
    root_url: url::Url,
}

#[cfg(feature = "http")]
impl HttpAssetReader {
    pub fn new(url_str: &str) -> Result<Self, ImportError> {
        let url = url::Url::parse(url_str)?;
        let root_url = if url.path().ends_with('/') {
            url
        } else {
            let mut u = url.clone();
            if let Ok(mut segments) = u.path_segments_mut() {
                segments.pop();
                segments.push("");
            }
            u
        };

        Ok(Self { root_url })
    }

    #[inline]
    #[must_use]
    pub fn root_url(&self) -> &url::Url {
        &self.root_url
    }
}

#[cfg(feature = "http")]
impl AssetReader for HttpAssetReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>, ImportError> {
        let url = self.root_url.join(uri)?;
        let request = ehttp::Request::get(url.as_str());
        let resp = ehttp::fetch_async(request).await.map_err(ImportError::Network)?;
        if !resp.ok {
            return Err(ImportError::HttpStatus {
                status: resp.status,
                url: resp.url,
            });
        }
        Ok(resp.bytes)
    }
}

/// 资产读取器变体枚举
/// 避免 trait object 的运行时开销
#[derive(Debug, Clone)]
pub enum AssetReaderVariant {
    File(Arc<FileAssetReader>),
    #[cfg(feature = "http")]
    Http(Arc<HttpAssetReader>),
}

impl AssetReaderVariant {
    /// 从路径或 URL 自动创建合适的读取器
    pub fn from_source(source: &str) -> Result<Self, ImportError> {
        if is_remote(source) {
            #[cfg(feature = "http")]
            {
                Ok(Self::Http(Arc::new(HttpAssetReader::new(source)?)))
            }
            #[cfg(not(feature = "http"))]
            {
                Err(ImportError::FeatureNotEnabled(
                    "HTTP feature is not enabled. Enable it with `features = [\"http\"]`".to_string(),
                ))
            }
        } else {
            Ok(Self::File(Arc::new(FileAssetReader::new(source))))
        }
    }

    /// 异步读取字节数据
    pub async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>, ImportError> {
        match self {
            Self::File(r) => r.read_bytes(uri).await,
            #[cfg(feature = "http")]
            Self::Http(r) => r.read_bytes(uri).await,
        }
    }
}

#[inline]
fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
