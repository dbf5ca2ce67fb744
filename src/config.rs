use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StartupConfig {
    /// Pack to load on launch; `--container` on the command line wins.
    #[serde(default)]
    pub container: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    pub window: WindowConfig,
    #[serde(default)]
    pub startup: StartupConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vsync: Option<bool>,
    pub container: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Worldscope".to_string(), width: 1280, height: 720, vsync: true }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if let Some(vsync) = overrides.vsync {
            self.window.vsync = vsync;
        }
        if let Some(container) = &overrides.container {
            self.startup.container = Some(container.clone());
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.vsync.is_none()
            && self.container.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.width.is_some() {
            fields.push("width");
        }
        if self.height.is_some() {
            fields.push("height");
        }
        if self.vsync.is_some() {
            fields.push("vsync");
        }
        if self.container.is_some() {
            fields.push("container");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_window_and_startup_fields() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(&AppConfigOverrides {
            width: Some(1600),
            height: None,
            vsync: Some(false),
            container: Some("assets/packs/demo_pack.json".to_string()),
        });
        assert_eq!(cfg.window.width, 1600);
        assert_eq!(cfg.window.height, 720);
        assert!(!cfg.window.vsync);
        assert_eq!(cfg.startup.container.as_deref(), Some("assets/packs/demo_pack.json"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"window": {"title": "t", "width": 640, "height": 480, "vsync": true}}"#,
        )
        .expect("config parses");
        assert!(cfg.startup.container.is_none());
    }
}
