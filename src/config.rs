use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Runtime options shared by the browser and native front-ends.
///
/// Every field has a default so a partial JSON document (or none at all)
/// yields a usable configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// DOM id of the canvas the browser build renders into.
    pub canvas_id: String,
    /// Directory (native) or URL prefix (browser) holding `<name>.png` files.
    pub asset_base: String,
    /// Texture names in click order. The first one is shown on startup.
    pub textures: Vec<String>,
    /// RGBA color the frame is cleared to before the quad is drawn.
    pub clear_color: [f32; 4],
    /// Half width and height of the quad in clip space.
    pub quad_half_extent: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            canvas_id: "glcanvas".to_string(),
            asset_base: "assets".to_string(),
            textures: vec!["grass".to_string(), "stone".to_string()],
            clear_color: [0.5, 0.2, 0.6, 1.0],
            quad_half_extent: 0.5,
        }
    }
}

impl DemoConfig {
    /// Parses a JSON configuration, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the renderer cannot draw.
    pub fn validate(&self) -> Result<()> {
        if self.textures.is_empty() {
            return Err(anyhow!("at least one texture name is required"));
        }
        if let Some(index) = self.textures.iter().position(|name| name.trim().is_empty()) {
            return Err(anyhow!("texture name at index {index} is empty"));
        }
        if !self.quad_half_extent.is_finite() || self.quad_half_extent <= 0.0 {
            return Err(anyhow!(
                "quad half extent must be positive, got {}",
                self.quad_half_extent
            ));
        }
        Ok(())
    }

    /// Location of the PNG for `name` below [`DemoConfig::asset_base`].
    pub fn asset_path(&self, name: &str) -> String {
        let base = self.asset_base.trim_end_matches('/');
        if base.is_empty() {
            format!("{name}.png")
        } else {
            format!("{base}/{name}.png")
        }
    }

    /// Clear color as a wgpu color value.
    ///
    /// `clear_color` is given in display (sRGB) space. wgpu encodes clear
    /// values written to an sRGB target, so they are linearized first.
    pub fn wgpu_clear_color(&self, srgb_target: bool) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        let channel = |c: f32| {
            if srgb_target {
                srgb_to_linear(c) as f64
            } else {
                c as f64
            }
        };
        wgpu::Color {
            r: channel(r),
            g: channel(g),
            b: channel(b),
            a: a as f64,
        }
    }
}

/// Decodes one sRGB-encoded channel in `[0, 1]` to linear light.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo() {
        let config = DemoConfig::default();
        assert_eq!(config.canvas_id, "glcanvas");
        assert_eq!(config.textures, vec!["grass", "stone"]);
        assert_eq!(config.clear_color, [0.5, 0.2, 0.6, 1.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DemoConfig::from_json(r#"{ "asset_base": "static/img" }"#).unwrap();
        assert_eq!(config.asset_base, "static/img");
        assert_eq!(config.textures.len(), 2);
        assert_eq!(config.quad_half_extent, 0.5);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(DemoConfig::from_json(r#"{ "textur": ["grass"] }"#).is_err());
    }

    #[test]
    fn empty_texture_list_is_rejected() {
        let err = DemoConfig::from_json(r#"{ "textures": [] }"#).unwrap_err();
        assert!(err.to_string().contains("at least one texture"));
    }

    #[test]
    fn blank_texture_name_is_rejected() {
        assert!(DemoConfig::from_json(r#"{ "textures": ["grass", " "] }"#).is_err());
    }

    #[test]
    fn non_positive_extent_is_rejected() {
        let config = DemoConfig {
            quad_half_extent: 0.0,
            ..DemoConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn srgb_targets_get_linearized_clear_color() {
        let color = DemoConfig::default().wgpu_clear_color(true);
        assert!((color.r - 0.214_041).abs() < 1e-4);
        assert!((color.g - 0.033_105).abs() < 1e-4);
        assert!((color.b - 0.318_547).abs() < 1e-4);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn linear_targets_keep_clear_color() {
        let color = DemoConfig::default().wgpu_clear_color(false);
        assert_eq!((color.r, color.g, color.b, color.a), (0.5, 0.2, 0.6, 1.0));
    }

    #[test]
    fn linearized_clear_color_encodes_back_to_the_configured_value() {
        // An sRGB target stores encode(linear), which must equal the input.
        let encode = |l: f64| {
            if l <= 0.003_130_8 {
                l * 12.92
            } else {
                1.055 * l.powf(1.0 / 2.4) - 0.055
            }
        };
        let color = DemoConfig::default().wgpu_clear_color(true);
        for (stored, expected) in [(color.r, 0.5), (color.g, 0.2), (color.b, 0.6)] {
            assert!((encode(stored) - expected).abs() < 1e-4);
        }
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!((srgb_to_linear(0.04) - 0.04 / 12.92).abs() < 1e-7);
    }

    #[test]
    fn asset_path_collapses_trailing_slash() {
        let mut config = DemoConfig::default();
        assert_eq!(config.asset_path("grass"), "assets/grass.png");
        config.asset_base = "src/".to_string();
        assert_eq!(config.asset_path("stone"), "src/stone.png");
        config.asset_base = String::new();
        assert_eq!(config.asset_path("stone"), "stone.png");
    }
}
