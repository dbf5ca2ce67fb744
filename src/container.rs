use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Stable key for one addressable entity inside a container. Within a loaded
/// container the same id always denotes the same logical asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub u32);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    World,
    Area,
    Model,
    Texture,
    Audio,
    Script,
}

impl AssetKind {
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::World => "world",
            AssetKind::Area => "area",
            AssetKind::Model => "model",
            AssetKind::Texture => "texture",
            AssetKind::Audio => "audio",
            AssetKind::Script => "script",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read access to a loaded container: enumeration order is the container's
/// own declaration order and must stay stable for the provider's lifetime.
pub trait ContainerProvider {
    fn asset_ids(&self) -> Vec<AssetId>;
    fn declared_kind(&self, id: AssetId) -> Result<AssetKind>;
    fn raw_bytes(&self, id: AssetId) -> Result<Vec<u8>>;
}

#[derive(Debug, Deserialize)]
struct PackManifestFile {
    #[serde(default)]
    name: Option<String>,
    assets: Vec<PackEntryFile>,
}

#[derive(Debug, Deserialize)]
struct PackEntryFile {
    id: AssetId,
    kind: AssetKind,
    data: serde_json::Value,
}

#[derive(Debug)]
struct PackEntry {
    kind: AssetKind,
    data: serde_json::Value,
}

/// Container backed by a JSON pack manifest. Entries are kept in file order;
/// payloads are handed out as bytes so callers stay format-agnostic.
#[derive(Debug)]
pub struct PackFile {
    name: String,
    order: Vec<AssetId>,
    entries: HashMap<AssetId, PackEntry>,
}

impl PackFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read pack file {}", path.display()))?;
        Self::from_slice(&bytes).with_context(|| format!("Failed to parse pack file {}", path.display()))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let manifest: PackManifestFile = serde_json::from_slice(bytes)?;
        let mut order = Vec::with_capacity(manifest.assets.len());
        let mut entries = HashMap::with_capacity(manifest.assets.len());
        for entry in manifest.assets {
            if entries.insert(entry.id, PackEntry { kind: entry.kind, data: entry.data }).is_some() {
                bail!("Pack declares asset {} more than once", entry.id);
            }
            order.push(entry.id);
        }
        Ok(Self { name: manifest.name.unwrap_or_else(|| "unnamed pack".to_string()), order, entries })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ContainerProvider for PackFile {
    fn asset_ids(&self) -> Vec<AssetId> {
        self.order.clone()
    }

    fn declared_kind(&self, id: AssetId) -> Result<AssetKind> {
        self.entries.get(&id).map(|entry| entry.kind).ok_or_else(|| anyhow!("Asset {id} not found in pack"))
    }

    fn raw_bytes(&self, id: AssetId) -> Result<Vec<u8>> {
        let entry = self.entries.get(&id).ok_or_else(|| anyhow!("Asset {id} not found in pack"))?;
        serde_json::to_vec(&entry.data).with_context(|| format!("Failed to serialize payload for asset {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = r#"{
        "name": "sample",
        "assets": [
            {"id": 10, "kind": "world", "data": {"name": "w", "areas": []}},
            {"id": 3, "kind": "area", "data": {"name": "a", "layers": []}},
            {"id": 7, "kind": "texture", "data": {}}
        ]
    }"#;

    #[test]
    fn preserves_declaration_order() {
        let pack = PackFile::from_slice(PACK.as_bytes()).expect("pack parses");
        assert_eq!(pack.name(), "sample");
        assert_eq!(pack.asset_ids(), vec![AssetId(10), AssetId(3), AssetId(7)]);
        assert_eq!(pack.declared_kind(AssetId(3)).expect("kind"), AssetKind::Area);
    }

    #[test]
    fn missing_identifier_errors() {
        let pack = PackFile::from_slice(PACK.as_bytes()).expect("pack parses");
        let err = pack.raw_bytes(AssetId(99)).unwrap_err();
        assert!(err.to_string().contains("not found"), "missing ids should be reported");
    }

    #[test]
    fn duplicate_identifier_rejected() {
        let doubled = r#"{"assets": [
            {"id": 5, "kind": "world", "data": {}},
            {"id": 5, "kind": "area", "data": {}}
        ]}"#;
        let err = PackFile::from_slice(doubled.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn asset_id_formats_as_hex() {
        assert_eq!(AssetId(0xdeadbeef).to_string(), "deadbeef");
        assert_eq!(AssetId(7).to_string(), "00000007");
    }
}
