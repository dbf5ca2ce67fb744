use crate::session::SessionState;
use anyhow::Result;

/// Everything a panel callback may touch during a frame. Panels resolve
/// assets through the session and request new panels through the queue;
/// neither is reachable any other way from inside a callback.
pub struct FrameCtx<'a> {
    pub session: &'a mut SessionState,
    pub panels: &'a mut PanelQueue,
}

type RenderFn = Box<dyn FnMut(&mut egui::Ui, &mut FrameCtx<'_>) -> Result<()>>;

/// One inspector window: a title, a render callback and a failure slot. The
/// callback owns whatever data the panel shows (usually `Arc` clones of
/// decoded nodes), so a panel can outlive the cache it was opened from.
pub struct Panel {
    title: String,
    render: RenderFn,
    failure: Option<String>,
    closable: bool,
}

impl Panel {
    pub fn new(
        title: impl Into<String>,
        render: impl FnMut(&mut egui::Ui, &mut FrameCtx<'_>) -> Result<()> + 'static,
    ) -> Self {
        Self { title: title.into(), render: Box::new(render), failure: None, closable: true }
    }

    /// A panel without a close button, e.g. the asset browser.
    pub fn pinned(
        title: impl Into<String>,
        render: impl FnMut(&mut egui::Ui, &mut FrameCtx<'_>) -> Result<()> + 'static,
    ) -> Self {
        Self { title: title.into(), render: Box::new(render), failure: None, closable: false }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Panels requested during the current frame. They never join the live set
/// mid-frame; the registry drains this queue at the frame boundary.
#[derive(Default)]
pub struct PanelQueue {
    pending: Vec<Panel>,
}

impl PanelQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, panel: Panel) {
        self.pending.push(panel);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

struct LivePanel {
    serial: u64,
    open: bool,
    panel: Panel,
}

/// Owns the live panels and renders them once per frame. Rendering never
/// mutates the live list; closes and newly queued panels both take effect
/// between frames.
#[derive(Default)]
pub struct PanelRegistry {
    live: Vec<LivePanel>,
    next_serial: u64,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves queued panels into the live list in the order they were opened,
    /// and drops panels the user closed last frame. Call exactly once per
    /// frame, before building any UI.
    pub fn flush_pending(&mut self, queue: &mut PanelQueue) {
        self.live.retain(|slot| slot.open);
        for panel in queue.pending.drain(..) {
            let serial = self.next_serial;
            self.next_serial += 1;
            self.live.push(LivePanel { serial, open: true, panel });
        }
    }

    /// Renders every live panel as its own window. A callback error parks
    /// that panel in a failed state and is reported; the remaining panels
    /// still render this frame.
    pub fn render_all(&mut self, ctx: &egui::Context, frame: &mut FrameCtx<'_>) {
        for slot in &mut self.live {
            let window = egui::Window::new(slot.panel.title.clone())
                .id(egui::Id::new(("panel", slot.serial)))
                .default_width(420.0)
                .resizable(true);
            let window = if slot.panel.closable { window.open(&mut slot.open) } else { window };
            window.show(ctx, |ui| {
                if let Some(message) = &slot.panel.failure {
                    ui.colored_label(egui::Color32::LIGHT_RED, "Panel failed to render.");
                    ui.weak(message.clone());
                    return;
                }
                if let Err(err) = (slot.panel.render)(ui, frame) {
                    eprintln!("[panel] '{}' failed: {err:?}", slot.panel.title);
                    slot.panel.failure = Some(format!("{err:#}"));
                }
            });
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn live_titles(&self) -> Vec<&str> {
        self.live.iter().map(|slot| slot.panel.title()).collect()
    }

    pub fn failed_count(&self) -> usize {
        self.live.iter().filter(|slot| slot.panel.failed()).count()
    }
}
