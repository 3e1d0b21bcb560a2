use std::{cell::RefCell, collections::HashMap, path::PathBuf};

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;

use crate::{
    config::LoaderConfig,
    data_structures::texture::{self, Texture},
    error::SceneError,
};

/**
 * This module contains all logic for loading textures and model files from external sources.
 */
pub mod data_uri;
pub mod gltf;
pub mod obj;

/// Where asset bytes come from.
///
/// Every load is a suspension point; the loader awaits one asset at a time.
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    async fn load_binary(&self, url: &str) -> anyhow::Result<Vec<u8>>;

    async fn load_string(&self, url: &str) -> anyhow::Result<String> {
        let bytes = self.load_binary(url).await?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Reads assets from disk on native targets and over HTTP on the web.
#[derive(Clone, Debug)]
pub struct FileSource {
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(config.asset_root.clone())
    }
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window to resolve {file_name} against"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not available"))?;
    let base = reqwest::Url::parse(&format!("{origin}/"))?;
    Ok(base.join(file_name.trim_start_matches('/'))?)
}

impl AssetSource for FileSource {
    async fn load_binary(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        #[cfg(target_arch = "wasm32")]
        let data = {
            let url = format_url(url)?;
            reqwest::get(url).await?.error_for_status()?.bytes().await?.to_vec()
        };
        #[cfg(not(target_arch = "wasm32"))]
        let data = {
            let path = self.root.join(url.trim_start_matches('/'));
            tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?
        };
        Ok(data)
    }
}

/// Serves assets from memory and records every request.
///
/// Useful for embedded assets and for asserting which files a load touched.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

fn normalize(url: &str) -> &str {
    url.trim_start_matches('/')
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, url: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(url, bytes);
        self
    }

    pub fn insert(&mut self, url: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(normalize(url).to_string(), bytes.into());
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl AssetSource for MemorySource {
    async fn load_binary(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        self.files
            .get(normalize(url))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no asset registered at {url}"))
    }
}

/// Resolves `relative` against the directory of `base`, the way files
/// referenced from inside a model (buffers, textures) are located.
pub fn resolve_relative(base: &str, relative: &str) -> String {
    if relative.starts_with('/') || relative.contains("://") || relative.starts_with("data:") {
        return relative.to_string();
    }
    match base.rfind('/') {
        Some(idx) => format!("{}{}", &base[..=idx], relative),
        None => relative.to_string(),
    }
}

/// The file name of `url` without directory and extension.
pub(crate) fn file_stem(url: &str) -> &str {
    let file = url.rsplit('/').next().unwrap_or(url);
    file.rsplit_once('.').map_or(file, |(stem, _)| stem)
}

pub async fn load_texture<S: AssetSource>(source: &S, url: &str) -> Result<Texture, SceneError> {
    let data = source
        .load_binary(url)
        .await
        .map_err(|e| SceneError::asset_load(url, e))?;
    Texture::from_bytes(&data, url, texture::extension(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_follow_the_model_directory() {
        assert_eq!(resolve_relative("/models/ship/ship.gltf", "ship.bin"), "/models/ship/ship.bin");
        assert_eq!(resolve_relative("ship.gltf", "ship.bin"), "ship.bin");
        assert_eq!(resolve_relative("/models/a.mtl", "/textures/a.png"), "/textures/a.png");
        assert_eq!(file_stem("/static/models/moon.obj"), "moon");
    }

    #[tokio::test]
    async fn memory_source_records_requests() {
        let source = MemorySource::new().with_file("/static/a.txt", "hello");
        assert_eq!(source.load_string("static/a.txt").await.unwrap(), "hello");
        assert!(source.load_binary("/static/missing.txt").await.is_err());
        assert_eq!(source.requests(), ["static/a.txt", "/static/missing.txt"]);
    }

    #[tokio::test]
    async fn file_source_reads_below_its_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static/planet.mtl"), "newmtl rock\n").unwrap();
        let source = FileSource::new(dir.path());
        assert_eq!(source.load_string("/static/planet.mtl").await.unwrap(), "newmtl rock\n");
        let err = source.load_binary("/static/none.obj").await.unwrap_err();
        assert!(err.to_string().contains("none.obj"));
    }
}
