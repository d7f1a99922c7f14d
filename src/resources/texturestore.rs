//! Loaded textures keyed by string ids.
//!
//! Atlas regions carry the id of their texture; the render system resolves
//! it here at draw time.

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::info;
use raylib::prelude::{RaylibHandle, RaylibThread, Texture2D};
use rustc_hash::FxHashMap;

use crate::error::{AtlasError, Result};
use crate::resources::atlasloader::TextureLoader;

#[derive(Resource, Default)]
pub struct TextureStore {
    map: FxHashMap<Arc<str>, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<Arc<str>>, texture: Texture2D) {
        self.map.insert(id.into(), texture);
    }

    pub fn get(&self, id: impl AsRef<str>) -> Option<&Texture2D> {
        self.map.get(id.as_ref())
    }

    /// The stored key for `id`, so regions can share it.
    pub fn key(&self, id: &str) -> Option<Arc<str>> {
        self.map.get_key_value(id).map(|(k, _)| k.clone())
    }

    pub fn contains(&self, id: impl AsRef<str>) -> bool {
        self.map.contains_key(id.as_ref())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Loads atlas textures from disk through raylib into a [`TextureStore`].
///
/// Paths from the description are resolved against `content_root` and the
/// texture is stored under the path as written. A path already in the store
/// is not loaded twice.
pub struct RaylibTextureLoader<'a> {
    pub rl: &'a mut RaylibHandle,
    pub thread: &'a RaylibThread,
    pub store: &'a mut TextureStore,
    pub content_root: PathBuf,
}

impl TextureLoader for RaylibTextureLoader<'_> {
    fn load_texture(&mut self, path: &str) -> Result<Arc<str>> {
        if let Some(key) = self.store.key(path) {
            return Ok(key);
        }
        let full_path = self.content_root.join(path);
        let texture = self
            .rl
            .load_texture(self.thread, &full_path.to_string_lossy())
            .map_err(|e| AtlasError::Texture {
                path: full_path.display().to_string(),
                reason: e.to_string(),
            })?;
        info!(
            "Loaded texture {:?} ({}x{})",
            full_path, texture.width, texture.height
        );
        let key: Arc<str> = Arc::from(path);
        self.store.insert(key.clone(), texture);
        Ok(key)
    }
}
