use crate::container::{AssetId, AssetKind};
use crate::graph::{DecodedAsset, InstanceNode};
use crate::panels::{FrameCtx, Panel};
use crate::tree::{walk, TreeSink};
use anyhow::{anyhow, Result};
use std::sync::Arc;

const INDENT_PER_LEVEL: f32 = 14.0;

/// The pinned entry-point panel: every world the loaded container declares,
/// one row each. Clicking a row opens that world's own panel.
pub fn asset_browser_panel() -> Panel {
    Panel::pinned("Asset Browser", |ui, frame| render_asset_browser(ui, frame))
}

fn render_asset_browser(ui: &mut egui::Ui, frame: &mut FrameCtx<'_>) -> Result<()> {
    let Some(loaded) = frame.session.active() else {
        ui.weak("No container loaded. Use Project \u{25b8} Open Pack\u{2026} to pick one.");
        return Ok(());
    };
    ui.strong(loaded.label().to_string());
    ui.separator();

    let worlds: Vec<AssetId> =
        loaded.index().of_kind(AssetKind::World).map(|entry| entry.id).collect();
    if worlds.is_empty() {
        ui.weak("This container declares no worlds.");
        return Ok(());
    }

    let mut clicked = None;
    egui::Grid::new("asset_browser_grid").striped(true).show(ui, |ui| {
        ui.strong("Type");
        ui.strong("Asset Id");
        ui.strong("Name");
        ui.end_row();
        for id in worlds {
            ui.label(AssetKind::World.label());
            if ui.selectable_label(false, egui::RichText::new(id.to_string()).monospace()).clicked() {
                clicked = Some(id);
            }
            match frame.session.active_mut().and_then(|c| c.resolve(id, AssetKind::World).ok()) {
                Some(asset) => ui.label(asset.name().to_string()),
                None => ui.weak("<unknown>"),
            };
            ui.end_row();
        }
    });
    if let Some(id) = clicked {
        open_world_panel(frame, id);
    }
    Ok(())
}

/// Resolves a world and queues its panel; failure opens a placeholder so a
/// click always has a visible result.
pub fn open_world_panel(frame: &mut FrameCtx<'_>, id: AssetId) {
    match resolve_in_session(frame, id, AssetKind::World) {
        Ok(asset) => {
            let title = format!("{} - {id}", asset.name());
            frame.panels.open(Panel::new(title, move |ui, frame| {
                render_world(ui, frame, &asset)
            }));
        }
        Err(err) => open_unresolved_panel(frame, id, err),
    }
}

fn render_world(ui: &mut egui::Ui, frame: &mut FrameCtx<'_>, asset: &Arc<DecodedAsset>) -> Result<()> {
    let world = asset.as_world().ok_or_else(|| anyhow!("Asset is not a world"))?;
    if world.areas.is_empty() {
        ui.weak("This world has no areas.");
        return Ok(());
    }
    let mut clicked = None;
    egui::Grid::new("world_areas_grid").striped(true).show(ui, |ui| {
        ui.strong("Name");
        ui.strong("Asset Id");
        ui.end_row();
        for area in &world.areas {
            if ui.selectable_label(false, area.name.clone()).clicked() {
                clicked = Some(area.area_id);
            }
            ui.monospace(area.area_id.to_string());
            ui.end_row();
        }
    });
    if let Some(area_id) = clicked {
        open_area_panel(frame, area_id);
    }
    Ok(())
}

pub fn open_area_panel(frame: &mut FrameCtx<'_>, id: AssetId) {
    match resolve_in_session(frame, id, AssetKind::Area) {
        Ok(asset) => {
            let title = format!("{} - {id}", asset.name());
            frame.panels.open(Panel::new(title, move |ui, frame| {
                render_area(ui, frame, &asset)
            }));
        }
        Err(err) => open_unresolved_panel(frame, id, err),
    }
}

fn render_area(ui: &mut egui::Ui, frame: &mut FrameCtx<'_>, asset: &Arc<DecodedAsset>) -> Result<()> {
    let area = asset.as_area().ok_or_else(|| anyhow!("Asset is not an area"))?;
    let mut clicked: Option<Arc<InstanceNode>> = None;
    egui::Grid::new("area_instances_grid").striped(true).show(ui, |ui| {
        ui.strong("Layer");
        ui.strong("Instance Id");
        ui.strong("Type");
        ui.strong("Name");
        ui.end_row();
        for layer in &area.layers {
            for instance in &layer.instances {
                ui.label(layer.display_name().to_string());
                ui.monospace(format!("{:08x}", instance.instance_id));
                ui.label(instance.type_name.clone());
                if ui.selectable_label(false, instance.name.clone()).clicked() {
                    clicked = Some(instance.clone());
                }
                ui.end_row();
            }
        }
    });
    if let Some(instance) = clicked {
        open_instance_panel(frame, instance, area.name.clone());
    }
    Ok(())
}

pub fn open_instance_panel(frame: &mut FrameCtx<'_>, instance: Arc<InstanceNode>, area_name: String) {
    let title = format!("{} - {:08x} ({})", instance.name, instance.instance_id, area_name);
    frame.panels.open(Panel::new(title, move |ui, _frame| {
        render_instance(ui, &instance)
    }));
}

fn render_instance(ui: &mut egui::Ui, instance: &Arc<InstanceNode>) -> Result<()> {
    ui.strong(instance.type_name.clone());
    ui.separator();
    // Salt with the surrounding window id so duplicate panels over the same
    // instance keep separate grid and expansion state.
    let root = ui.id().with(("property_tree", instance.instance_id));
    egui::Grid::new(root.with("grid")).striped(true).show(ui, |ui| {
        ui.strong("Name");
        ui.strong("Type");
        ui.strong("Value");
        ui.end_row();
        let mut sink = EguiTreeSink { ui, stack: vec![root] };
        walk(instance.as_ref(), &mut sink);
    });
    Ok(())
}

fn open_unresolved_panel(frame: &mut FrameCtx<'_>, id: AssetId, err: anyhow::Error) {
    eprintln!("[panel] could not resolve asset {id}: {err:?}");
    let message = format!("{err:#}");
    frame.panels.open(Panel::new(format!("Unresolved - {id}"), move |ui, _frame| {
        ui.colored_label(egui::Color32::LIGHT_RED, format!("Asset {id} could not be resolved."));
        ui.weak(message.clone());
        Ok(())
    }));
}

fn resolve_in_session(
    frame: &mut FrameCtx<'_>,
    id: AssetId,
    kind: AssetKind,
) -> Result<Arc<DecodedAsset>> {
    frame
        .session
        .active_mut()
        .ok_or_else(|| anyhow!("No container loaded"))?
        .resolve(id, kind)
}

/// Grid rows for the property tree. Expansion state for composite rows is
/// persisted in egui memory under ids derived from the field path, rooted at
/// the instance id.
struct EguiTreeSink<'a> {
    ui: &'a mut egui::Ui,
    stack: Vec<egui::Id>,
}

impl<'a> EguiTreeSink<'a> {
    fn path_id(&self, name: &str) -> egui::Id {
        self.stack.last().copied().unwrap_or_else(|| egui::Id::new("property_tree")).with(name)
    }

    fn name_cell(&mut self, depth: usize, text: impl Into<egui::WidgetText>) -> egui::Response {
        let indent = depth as f32 * INDENT_PER_LEVEL;
        self.ui
            .horizontal(|ui| {
                ui.add_space(indent);
                ui.label(text)
            })
            .inner
    }
}

impl<'a> TreeSink for EguiTreeSink<'a> {
    fn composite_row(&mut self, depth: usize, name: &str, type_name: &str) -> bool {
        let id = self.path_id(name);
        let mut expanded =
            self.ui.ctx().data_mut(|data| data.get_persisted::<bool>(id)).unwrap_or(false);
        let indent = depth as f32 * INDENT_PER_LEVEL;
        let toggled = self
            .ui
            .horizontal(|ui| {
                ui.add_space(indent);
                let arrow = if expanded { "\u{23f7}" } else { "\u{23f5}" };
                ui.selectable_label(expanded, format!("{arrow} {name}")).clicked()
            })
            .inner;
        if toggled {
            expanded = !expanded;
            self.ui.ctx().data_mut(|data| data.insert_persisted(id, expanded));
        }
        self.ui.label(type_name.to_string());
        self.ui.weak("--");
        self.ui.end_row();
        self.stack.push(id);
        expanded
    }

    fn close_composite(&mut self) {
        self.stack.pop();
    }

    fn leaf_row(&mut self, depth: usize, name: &str, type_name: &str, value: &str) {
        self.name_cell(depth, name.to_string());
        self.ui.label(type_name.to_string());
        if type_name == "asset_id" {
            self.ui.monospace(value.to_string());
        } else {
            self.ui.label(value.to_string());
        }
        self.ui.end_row();
    }
}
