use crate::assets::ResourceCache;
use crate::container::{AssetId, AssetKind, PackFile};
use crate::decode::JsonDecoder;
use crate::graph::DecodedAsset;
use crate::index::AssetIndex;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One loaded container with its index and decode cache.
pub struct LoadedContainer {
    source: PathBuf,
    label: String,
    index: AssetIndex,
    cache: ResourceCache,
}

impl LoadedContainer {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn index(&self) -> &AssetIndex {
        &self.index
    }

    pub fn resolve(&mut self, id: AssetId, kind: AssetKind) -> Result<Arc<DecodedAsset>> {
        self.cache.resolve(id, kind)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.cached_count()
    }
}

/// Holds whichever container is active, if any. `load` is all-or-nothing:
/// the new provider, index and cache are built completely before replacing
/// the old ones, so a failed load leaves the running session as it was.
/// Panels are never touched here; their `Arc` clones keep old decoded nodes
/// alive for as long as the panels stay open.
#[derive(Default)]
pub struct SessionState {
    active: Option<LoadedContainer>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let pack = PackFile::open(path)?;
        let index = AssetIndex::build(&pack)
            .with_context(|| format!("Failed to index pack {}", path.display()))?;
        let label = pack.name().to_string();
        let cache = ResourceCache::new(Box::new(pack), Box::new(JsonDecoder));
        println!("[session] loaded pack '{}' from {}", label, path.display());
        self.active = Some(LoadedContainer {
            source: path.to_path_buf(),
            label,
            index,
            cache,
        });
        Ok(())
    }

    pub fn active(&self) -> Option<&LoadedContainer> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut LoadedContainer> {
        self.active.as_mut()
    }

    pub fn active_label(&self) -> Option<&str> {
        self.active.as_ref().map(|loaded| loaded.label())
    }

    pub fn has_container(&self) -> bool {
        self.active.is_some()
    }
}
