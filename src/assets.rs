//! Image loading for the quad texture.
//!
//! Images are decoded into RGBA8 with a full mip chain so the GPU side only
//! has to copy bytes. Native builds read from disk, browser builds fetch over
//! HTTP; both end up in [`TextureImage::decode`].

use image::imageops::FilterType;
use image::RgbaImage;
use thiserror::Error;

use crate::DemoConfig;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image not found: {path}")]
    NotFound { path: String },
    #[error("unable to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to decode image {name}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("fetching {url} failed: {message}")]
    Fetch { url: String, message: String },
}

/// Decoded texture and its mip levels, largest first.
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub levels: Vec<RgbaImage>,
}

impl TextureImage {
    /// Decodes an encoded image and builds its mip chain.
    ///
    /// Alpha is forced to opaque: the quad is drawn as an RGB texture.
    pub fn decode(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let decoded = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
            name: name.to_string(),
            source,
        })?;
        let mut base = decoded.to_rgba8();
        for pixel in base.pixels_mut() {
            pixel.0[3] = u8::MAX;
        }
        Ok(Self::from_rgba(name, base))
    }

    pub fn from_rgba(name: &str, base: RgbaImage) -> Self {
        let (width, height) = base.dimensions();
        Self {
            name: name.to_string(),
            width,
            height,
            levels: build_mip_chain(base),
        }
    }

    pub fn mip_level_count(&self) -> u32 {
        self.levels.len() as u32
    }
}

/// Number of levels in a full mip chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

fn build_mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let count = mip_level_count(base.width(), base.height()) as usize;
    let mut levels = Vec::with_capacity(count);
    levels.push(base);
    while levels.len() < count {
        let previous = &levels[levels.len() - 1];
        let width = (previous.width() / 2).max(1);
        let height = (previous.height() / 2).max(1);
        let next = image::imageops::resize(previous, width, height, FilterType::Triangle);
        levels.push(next);
    }
    levels
}

/// Any non-2xx HTTP status is a fetch failure, 404 included.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn status_error(url: &str, status: u16) -> Option<AssetError> {
    if (200..300).contains(&status) {
        None
    } else {
        Some(AssetError::Fetch {
            url: url.to_string(),
            message: format!("HTTP status {status}"),
        })
    }
}

/// Reads `<asset_base>/<name>.png` from disk.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_image(config: &DemoConfig, name: &str) -> Result<TextureImage, AssetError> {
    let path = config.asset_path(name);
    let bytes = std::fs::read(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            AssetError::NotFound { path: path.clone() }
        } else {
            AssetError::Io {
                path: path.clone(),
                source,
            }
        }
    })?;
    log::debug!("read {} bytes from {path}", bytes.len());
    TextureImage::decode(name, &bytes)
}

/// Fetches `<asset_base>/<name>.png` relative to the page.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_image(config: &DemoConfig, name: &str) -> Result<TextureImage, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let url = config.asset_path(name);
    let fetch_error = |message: String| AssetError::Fetch {
        url: url.clone(),
        message,
    };

    let window = web_sys::window().ok_or_else(|| fetch_error("window not available".into()))?;
    let response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(|err| fetch_error(format!("{err:?}")))?
        .dyn_into::<web_sys::Response>()
        .map_err(|_| fetch_error("fetch did not return a Response".into()))?;
    if let Some(err) = status_error(&url, response.status()) {
        return Err(err);
    }

    let body = response
        .array_buffer()
        .map_err(|err| fetch_error(format!("{err:?}")))?;
    let buffer = JsFuture::from(body)
        .await
        .map_err(|err| fetch_error(format!("{err:?}")))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    TextureImage::decode(name, &bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba};

    use super::*;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn mip_counts_cover_down_to_one_pixel() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(16, 16), 5);
        assert_eq!(mip_level_count(17, 3), 5);
        assert_eq!(mip_level_count(256, 64), 9);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn mip_chain_halves_each_level() {
        let image = TextureImage::from_rgba("grass", RgbaImage::new(8, 2));
        let sizes: Vec<(u32, u32)> = image.levels.iter().map(|l| l.dimensions()).collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert_eq!(image.mip_level_count(), 4);
    }

    #[test]
    fn decode_drops_alpha() {
        let source = RgbaImage::from_pixel(4, 4, Rgba([10, 200, 30, 0]));
        let image = TextureImage::decode("stone", &encode_png(&source)).unwrap();
        assert_eq!((image.width, image.height), (4, 4));
        assert_eq!(image.levels[0].get_pixel(1, 1), &Rgba([10, 200, 30, 255]));
        assert_eq!(image.levels[2].get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = TextureImage::decode("grass", b"not a png").unwrap_err();
        assert!(matches!(err, AssetError::Decode { ref name, .. } if name == "grass"));
    }

    #[test]
    fn non_success_statuses_are_fetch_errors() {
        assert!(status_error("assets/grass.png", 200).is_none());
        assert!(status_error("assets/grass.png", 204).is_none());
        for status in [304, 404, 500] {
            let err = status_error("assets/lava.png", status).unwrap();
            assert!(
                matches!(err, AssetError::Fetch { ref url, ref message }
                    if url == "assets/lava.png" && message.contains(&status.to_string()))
            );
        }
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = DemoConfig {
            asset_base: dir.path().display().to_string(),
            ..DemoConfig::default()
        };
        let err = load_image(&config, "grass").unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
    }

    #[test]
    fn bundled_textures_decode() {
        let config = DemoConfig {
            asset_base: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_string(),
            ..DemoConfig::default()
        };
        for name in &config.textures {
            let image = load_image(&config, name).unwrap();
            assert_eq!((image.width, image.height), (16, 16));
            assert_eq!(image.mip_level_count(), 5);
        }
    }

    #[test]
    fn loads_png_from_asset_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        std::fs::write(dir.path().join("stone.png"), encode_png(&source)).unwrap();
        let config = DemoConfig {
            asset_base: dir.path().display().to_string(),
            ..DemoConfig::default()
        };
        let image = load_image(&config, "stone").unwrap();
        assert_eq!(image.name, "stone");
        assert_eq!(image.mip_level_count(), 2);
    }
}
