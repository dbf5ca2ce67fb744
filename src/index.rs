use crate::container::{AssetId, AssetKind, ContainerProvider};
use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: AssetId,
    pub kind: AssetKind,
}

/// Ordered snapshot of every asset a container declares, id plus kind only.
/// Built once per load from container metadata; nothing here decodes.
pub struct AssetIndex {
    entries: Vec<IndexEntry>,
}

impl AssetIndex {
    pub fn build(provider: &dyn ContainerProvider) -> Result<Self> {
        let ids = provider.asset_ids();
        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let kind = provider
                .declared_kind(id)
                .with_context(|| format!("Failed to classify asset {id} while indexing"))?;
            entries.push(IndexEntry { id, kind });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// All entries of one kind, keeping their relative container order.
    pub fn of_kind(&self, kind: AssetKind) -> impl Iterator<Item = IndexEntry> + '_ {
        self.entries.iter().copied().filter(move |entry| entry.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
