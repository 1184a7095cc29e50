//! Importers turn a model URL into a [`Prefab`].
//!
//! Importing never touches the scene: the result is plain data that
//! [`Scene::instantiate`](crate::scene::Scene::instantiate) turns into live
//! nodes once the fetch has completed.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::assets::io::AssetReaderVariant;
use crate::assets::prefab::{Prefab, SharedPrefab};
use crate::assets::url::{ResourceUrl, split_url};
use crate::errors::ImportError;

/// Fetches and decodes all meshes and animation groups at a URL.
///
/// Futures are driven on a single logical thread and need not be `Send`.
pub trait AssetImporter {
    fn import(&self, url: &str) -> impl Future<Output = Result<SharedPrefab, ImportError>>;
}

impl<T: AssetImporter> AssetImporter for Arc<T> {
    fn import(&self, url: &str) -> impl Future<Output = Result<SharedPrefab, ImportError>> {
        (**self).import(url)
    }
}

/// Turns raw asset bytes into a [`Prefab`]. Format parsing lives outside
/// this crate.
pub trait PrefabDecoder {
    fn decode(&self, bytes: &[u8], source: &ResourceUrl) -> Result<Prefab, ImportError>;
}

impl<F> PrefabDecoder for F
where
    F: Fn(&[u8], &ResourceUrl) -> Result<Prefab, ImportError>,
{
    fn decode(&self, bytes: &[u8], source: &ResourceUrl) -> Result<Prefab, ImportError> {
        self(bytes, source)
    }
}

/// Reads bytes through an [`AssetReaderVariant`] chosen from the URL scheme
/// and hands them to a decoder.
pub struct ReaderImporter<D> {
    decoder: D,
}

impl<D: PrefabDecoder> ReaderImporter<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }
}

impl<D: PrefabDecoder> AssetImporter for ReaderImporter<D> {
    async fn import(&self, url: &str) -> Result<SharedPrefab, ImportError> {
        let source = split_url(url);
        let reader = AssetReaderVariant::from_source(&source.root_url)?;
        let bytes = reader.read_bytes(&source.filename).await?;
        log::debug!("Read {} bytes from {url}", bytes.len());
        let prefab = self.decoder.decode(&bytes, &source)?;
        Ok(Arc::new(prefab))
    }
}

#[derive(Debug, Clone)]
enum MemoryAsset {
    Prefab(SharedPrefab),
    Failure(String),
}

/// Serves prefabs from an in-memory table keyed by URL.
///
/// Unknown URLs fail with [`ImportError::NotFound`]; URLs registered through
/// [`MemoryImporter::insert_failure`] fail with a network error. Every
/// request is recorded.
#[derive(Debug, Default)]
pub struct MemoryImporter {
    assets: FxHashMap<String, MemoryAsset>,
    requests: Mutex<Vec<String>>,
}

impl MemoryImporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, prefab: Prefab) {
        self.assets.insert(url.into(), MemoryAsset::Prefab(Arc::new(prefab)));
    }

    #[must_use]
    pub fn with_asset(mut self, url: impl Into<String>, prefab: Prefab) -> Self {
        self.insert(url, prefab);
        self
    }

    pub fn insert_failure(&mut self, url: impl Into<String>, reason: impl Into<String>) {
        self.assets.insert(url.into(), MemoryAsset::Failure(reason.into()));
    }

    #[must_use]
    pub fn with_failure(mut self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        self.insert_failure(url, reason);
        self
    }

    /// URLs requested so far, in request order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    fn lookup(&self, url: &str) -> Result<SharedPrefab, ImportError> {
        self.requests.lock().push(url.to_string());
        match self.assets.get(url) {
            Some(MemoryAsset::Prefab(prefab)) => Ok(Arc::clone(prefab)),
            Some(MemoryAsset::Failure(reason)) => Err(ImportError::Network(reason.clone())),
            None => Err(ImportError::NotFound(url.to_string())),
        }
    }
}

impl AssetImporter for MemoryImporter {
    async fn import(&self, url: &str) -> Result<SharedPrefab, ImportError> {
        self.lookup(url)
    }
}
