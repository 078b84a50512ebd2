use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("missing asset {path}: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {name}: {source}")]
    Decode {
        name: &'static str,
        #[source]
        source: image::ImageError,
    },
}

/// The two images the touchpad is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkinDrawable {
    Background,
    Knob,
}

impl SkinDrawable {
    pub const ALL: [SkinDrawable; 2] = [SkinDrawable::Background, SkinDrawable::Knob];

    pub fn name(self) -> &'static str {
        match self {
            SkinDrawable::Background => "touchBackground",
            SkinDrawable::Knob => "touchKnob",
        }
    }

    /// Path relative to the asset root
    pub fn relative_path(self) -> &'static str {
        match self {
            SkinDrawable::Background => "data/touchBackground.png",
            SkinDrawable::Knob => "data/touchKnob.png",
        }
    }

    fn embedded_bytes(self) -> &'static [u8] {
        match self {
            SkinDrawable::Background => include_bytes!("../../assets/data/touchBackground.png"),
            SkinDrawable::Knob => include_bytes!("../../assets/data/touchKnob.png"),
        }
    }
}

/// Decoded RGBA8 image
#[derive(Debug, Clone)]
pub struct SkinImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SkinImage {
    fn decode(drawable: SkinDrawable, bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|source| AssetError::Decode { name: drawable.name(), source })?
            .to_rgba8();
        Ok(Self {
            width: img.width(),
            height: img.height(),
            rgba: img.into_raw(),
        })
    }
}

pub struct TouchpadSkin {
    pub background: SkinImage,
    pub knob: SkinImage,
}

impl TouchpadSkin {
    /// Read both drawables from disk. A missing file is fatal for the UI.
    pub fn load(asset_root: &Path) -> Result<Self, AssetError> {
        let read = |drawable: SkinDrawable| -> Result<SkinImage, AssetError> {
            let path = asset_root.join(drawable.relative_path());
            let bytes = std::fs::read(&path).map_err(|source| AssetError::Missing { path: path.clone(), source })?;
            tracing::debug!("loaded {} from {}", drawable.name(), path.display());
            SkinImage::decode(drawable, &bytes)
        };
        Ok(Self {
            background: read(SkinDrawable::Background)?,
            knob: read(SkinDrawable::Knob)?,
        })
    }

    /// Skin compiled into the binary (web builds have no filesystem)
    pub fn embedded() -> Result<Self, AssetError> {
        Ok(Self {
            background: SkinImage::decode(SkinDrawable::Background, SkinDrawable::Background.embedded_bytes())?,
            knob: SkinImage::decode(SkinDrawable::Knob, SkinDrawable::Knob.embedded_bytes())?,
        })
    }

    pub fn get(&self, drawable: SkinDrawable) -> &SkinImage {
        match drawable {
            SkinDrawable::Background => &self.background,
            SkinDrawable::Knob => &self.knob,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_skin_decodes() {
        let skin = TouchpadSkin::embedded().unwrap();
        for drawable in SkinDrawable::ALL {
            let img = skin.get(drawable);
            assert!(img.width > 0 && img.height > 0);
            assert_eq!(img.rgba.len(), (img.width * img.height * 4) as usize);
        }
    }

    #[test]
    fn missing_asset_root_is_an_error() {
        let err = TouchpadSkin::load(Path::new("does/not/exist")).err().unwrap();
        assert!(matches!(err, AssetError::Missing { .. }));
    }

    #[test]
    fn skin_loads_from_repo_assets() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let skin = TouchpadSkin::load(&root).unwrap();
        assert_eq!((skin.knob.width, skin.knob.height), (64, 64));
    }
}
