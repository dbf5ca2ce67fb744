use crate::container::{AssetId, AssetKind};
use std::sync::Arc;

/// A container asset after decoding. Panels hold these behind `Arc`, so a
/// decoded node outlives the cache that produced it if a view still shows it.
#[derive(Debug)]
pub enum DecodedAsset {
    World(WorldAsset),
    Area(AreaAsset),
}

impl DecodedAsset {
    pub fn kind(&self) -> AssetKind {
        match self {
            DecodedAsset::World(_) => AssetKind::World,
            DecodedAsset::Area(_) => AssetKind::Area,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DecodedAsset::World(world) => &world.name,
            DecodedAsset::Area(area) => &area.name,
        }
    }

    pub fn as_world(&self) -> Option<&WorldAsset> {
        match self {
            DecodedAsset::World(world) => Some(world),
            _ => None,
        }
    }

    pub fn as_area(&self) -> Option<&AreaAsset> {
        match self {
            DecodedAsset::Area(area) => Some(area),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct WorldAsset {
    pub name: String,
    pub areas: Vec<AreaRef>,
}

#[derive(Debug)]
pub struct AreaRef {
    pub name: String,
    pub area_id: AssetId,
}

#[derive(Debug)]
pub struct AreaAsset {
    pub name: String,
    pub layers: Vec<LayerNode>,
}

#[derive(Debug)]
pub struct LayerNode {
    pub name: Option<String>,
    pub instances: Vec<Arc<InstanceNode>>,
}

impl LayerNode {
    /// Layers without an authored name hold objects emitted by tooling.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<Generated Objects>")
    }
}

#[derive(Debug)]
pub struct InstanceNode {
    pub name: String,
    pub instance_id: u32,
    pub type_name: String,
    pub properties: PropertyBag,
}

#[derive(Debug)]
pub struct PropertyBag {
    pub type_name: String,
    pub fields: Vec<(String, PropertyValue)>,
}

#[derive(Debug)]
pub enum PropertyValue {
    Bag(PropertyBag),
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    AssetRef(AssetId),
}

impl PropertyValue {
    pub fn type_name(&self) -> &str {
        match self {
            PropertyValue::Bag(bag) => &bag.type_name,
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Text(_) => "string",
            PropertyValue::AssetRef(_) => "asset_id",
        }
    }

    pub fn leaf_text(&self) -> Option<String> {
        match self {
            PropertyValue::Bag(_) => None,
            PropertyValue::Bool(value) => Some(value.to_string()),
            PropertyValue::Int(value) => Some(value.to_string()),
            PropertyValue::Float(value) => Some(value.to_string()),
            PropertyValue::Text(value) => Some(value.clone()),
            PropertyValue::AssetRef(id) => Some(id.to_string()),
        }
    }
}

/// One field as seen by the tree walker: either it exposes named sub-fields
/// or it is a textual leaf. The distinction is a capability of the value,
/// never something declared about it.
pub enum FieldValue<'a> {
    Composite(&'a dyn Described),
    Leaf { type_name: &'a str, text: String },
}

/// Capability of a value to describe itself as an ordered list of named
/// fields. The inspector tree renders anything implementing this.
pub trait Described {
    fn name(&self) -> &str;
    fn type_name(&self) -> &str;
    fn fields(&self) -> Vec<(&str, FieldValue<'_>)>;
}

impl Described for PropertyBag {
    fn name(&self) -> &str {
        &self.type_name
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn fields(&self) -> Vec<(&str, FieldValue<'_>)> {
        self.fields
            .iter()
            .map(|(name, value)| {
                let field = match value {
                    PropertyValue::Bag(bag) => FieldValue::Composite(bag),
                    leaf => FieldValue::Leaf {
                        type_name: leaf.type_name(),
                        // leaf_text is None only for Bag, handled above
                        text: leaf.leaf_text().unwrap_or_default(),
                    },
                };
                (name.as_str(), field)
            })
            .collect()
    }
}

impl Described for InstanceNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn fields(&self) -> Vec<(&str, FieldValue<'_>)> {
        self.properties.fields()
    }
}
