use crate::container::{AssetId, AssetKind};
use crate::graph::{
    AreaAsset, AreaRef, DecodedAsset, InstanceNode, LayerNode, PropertyBag, PropertyValue,
    WorldAsset,
};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::sync::Arc;

/// Turns raw container bytes into a decoded node. Invoked by the cache at
/// most once per asset id.
pub trait AssetDecoder {
    fn decode(&self, id: AssetId, kind: AssetKind, bytes: &[u8]) -> Result<DecodedAsset>;
}

#[derive(Debug, Deserialize)]
struct WorldFile {
    name: String,
    #[serde(default)]
    areas: Vec<AreaRefFile>,
}

#[derive(Debug, Deserialize)]
struct AreaRefFile {
    name: String,
    area: AssetId,
}

#[derive(Debug, Deserialize)]
struct AreaFile {
    name: String,
    #[serde(default)]
    layers: Vec<LayerFile>,
}

#[derive(Debug, Deserialize)]
struct LayerFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    instances: Vec<InstanceFile>,
}

#[derive(Debug, Deserialize)]
struct InstanceFile {
    name: String,
    id: u32,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    properties: Vec<PropertyFieldFile>,
}

#[derive(Debug, Deserialize)]
struct PropertyFieldFile {
    name: String,
    #[serde(rename = "type", default)]
    type_name: Option<String>,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    fields: Option<Vec<PropertyFieldFile>>,
}

/// Decoder for the JSON payloads packs carry for worlds and areas.
pub struct JsonDecoder;

impl AssetDecoder for JsonDecoder {
    fn decode(&self, id: AssetId, kind: AssetKind, bytes: &[u8]) -> Result<DecodedAsset> {
        match kind {
            AssetKind::World => {
                let file: WorldFile = serde_json::from_slice(bytes)
                    .with_context(|| format!("Failed to parse world payload for asset {id}"))?;
                Ok(DecodedAsset::World(world_from_file(file)))
            }
            AssetKind::Area => {
                let file: AreaFile = serde_json::from_slice(bytes)
                    .with_context(|| format!("Failed to parse area payload for asset {id}"))?;
                Ok(DecodedAsset::Area(area_from_file(file)?))
            }
            other => bail!("No decoder registered for {other} asset {id}"),
        }
    }
}

fn world_from_file(file: WorldFile) -> WorldAsset {
    WorldAsset {
        name: file.name,
        areas: file
            .areas
            .into_iter()
            .map(|area| AreaRef { name: area.name, area_id: area.area })
            .collect(),
    }
}

fn area_from_file(file: AreaFile) -> Result<AreaAsset> {
    let mut layers = Vec::with_capacity(file.layers.len());
    for layer in file.layers {
        let mut instances = Vec::with_capacity(layer.instances.len());
        for instance in layer.instances {
            instances.push(Arc::new(instance_from_file(instance)?));
        }
        layers.push(LayerNode { name: layer.name, instances });
    }
    Ok(AreaAsset { name: file.name, layers })
}

fn instance_from_file(file: InstanceFile) -> Result<InstanceNode> {
    let properties = PropertyBag {
        type_name: file.type_name.clone(),
        fields: fields_from_files(file.properties)
            .with_context(|| format!("Bad property data on instance {}", file.name))?,
    };
    Ok(InstanceNode {
        name: file.name,
        instance_id: file.id,
        type_name: file.type_name,
        properties,
    })
}

fn fields_from_files(files: Vec<PropertyFieldFile>) -> Result<Vec<(String, PropertyValue)>> {
    let mut out = Vec::with_capacity(files.len());
    for field in files {
        let value = property_from_file(&field)?;
        out.push((field.name, value));
    }
    Ok(out)
}

fn property_from_file(field: &PropertyFieldFile) -> Result<PropertyValue> {
    // A field carrying sub-fields is a nested struct regardless of its tag.
    if let Some(children) = &field.fields {
        let type_name = field.type_name.clone().unwrap_or_else(|| "struct".to_string());
        let mut fields = Vec::with_capacity(children.len());
        for child in children {
            fields.push((child.name.clone(), property_from_file(child)?));
        }
        return Ok(PropertyValue::Bag(PropertyBag { type_name, fields }));
    }

    let Some(value) = &field.value else {
        bail!("Property field {} has neither a value nor sub-fields", field.name);
    };

    if field.type_name.as_deref() == Some("asset_id") {
        let Some(raw) = value.as_u64() else {
            bail!("Property field {} tagged asset_id is not an integer", field.name);
        };
        let id = u32::try_from(raw)
            .with_context(|| format!("Property field {} asset_id {raw} is out of range", field.name))?;
        return Ok(PropertyValue::AssetRef(AssetId(id)));
    }

    let decoded = match value {
        serde_json::Value::Bool(b) => PropertyValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(int) = n.as_i64() {
                PropertyValue::Int(int)
            } else {
                PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => PropertyValue::Text(s.clone()),
        other => bail!("Property field {} has unsupported value {other}", field.name),
    };
    Ok(decoded)
}
