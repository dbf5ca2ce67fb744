use crate::container::{AssetId, AssetKind, ContainerProvider};
use crate::decode::AssetDecoder;
use crate::graph::DecodedAsset;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Memoizing decode cache over a container. Each asset is decoded at most
/// once for the lifetime of the cache; every caller asking for the same id
/// gets a clone of the same `Arc`. There is no eviction; a cache lives
/// exactly as long as its container stays loaded.
pub struct ResourceCache {
    provider: Box<dyn ContainerProvider>,
    decoder: Box<dyn AssetDecoder>,
    entries: HashMap<AssetId, Arc<DecodedAsset>>,
}

impl ResourceCache {
    pub fn new(provider: Box<dyn ContainerProvider>, decoder: Box<dyn AssetDecoder>) -> Self {
        Self { provider, decoder, entries: HashMap::new() }
    }

    /// Returns the decoded node for `id`, decoding on first request. A hit
    /// is served as-is; `expected_kind` only steers the decoder on a miss.
    pub fn resolve(&mut self, id: AssetId, expected_kind: AssetKind) -> Result<Arc<DecodedAsset>> {
        if let Some(existing) = self.entries.get(&id) {
            return Ok(existing.clone());
        }
        let bytes = self
            .provider
            .raw_bytes(id)
            .with_context(|| format!("Failed to read bytes for asset {id}"))?;
        let decoded = self
            .decoder
            .decode(id, expected_kind, &bytes)
            .with_context(|| format!("Failed to decode {expected_kind} asset {id}"))?;
        let shared = Arc::new(decoded);
        self.entries.insert(id, shared.clone());
        Ok(shared)
    }

    pub fn provider(&self) -> &dyn ContainerProvider {
        self.provider.as_ref()
    }

    pub fn cached_count(&self) -> usize {
        self.entries.len()
    }
}
