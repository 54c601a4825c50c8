use std::path::{Path, PathBuf};

use eframe::egui;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot locate the application executable")]
    ExeLocation(#[source] std::io::Error),
    #[error("failed to decode image {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// The bundled `assets/` directory, resolved against the install location
/// rather than the working directory.
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Looks next to the executable first (how the bundle lays files out),
    /// then in the macOS bundle resources, then falls back to the crate
    /// directory so `cargo run` works from a checkout.
    pub fn locate() -> Result<Self, AssetError> {
        let exe = std::env::current_exe().map_err(AssetError::ExeLocation)?;
        let exe_dir = exe.parent().unwrap_or(Path::new("."));
        for candidate in [exe_dir.join("assets"), exe_dir.join("../Resources/assets")] {
            if candidate.is_dir() {
                log::debug!("using assets from {}", candidate.display());
                return Ok(Self::new(candidate));
            }
        }
        Ok(Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")))
    }

    /// Path of a bundled file without checking that it exists. Used for the
    /// default font, where a missing file falls back instead of failing.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Path of a required bundled file.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, AssetError> {
        let path = self.path_of(name);
        if path.exists() {
            Ok(path)
        } else {
            Err(AssetError::NotFound(path))
        }
    }

    /// Decode a bundled image and scale it to `edge` x `edge`, ready for
    /// upload as an egui texture.
    pub fn load_icon(&self, name: &str, edge: u32) -> Result<egui::ColorImage, AssetError> {
        let path = self.resolve(name)?;
        let decoded = image::open(&path)
            .map_err(|source| AssetError::Decode { path: path.clone(), source })?
            .resize_exact(edge, edge, image::imageops::FilterType::Triangle)
            .to_rgba8();
        let size = [decoded.width() as usize, decoded.height() as usize];
        Ok(egui::ColorImage::from_rgba_unmultiplied(size, &decoded.into_raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("exit.png"), b"stub").unwrap();

        let assets = AssetDir::new(dir.path());
        assert_eq!(assets.resolve("exit.png").unwrap(), dir.path().join("exit.png"));
    }

    #[test]
    fn missing_assets_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetDir::new(dir.path());

        match assets.resolve("exit.png") {
            Err(AssetError::NotFound(path)) => assert_eq!(path, dir.path().join("exit.png")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn path_of_does_not_require_existence() {
        let assets = AssetDir::new("/nowhere");
        assert_eq!(assets.path_of("DynaPuff.ttf"), PathBuf::from("/nowhere/DynaPuff.ttf"));
    }

    #[test]
    fn icon_loading_fails_before_any_window_exists() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetDir::new(dir.path());
        assert!(matches!(assets.load_icon("exit.png", 24), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn icons_are_scaled_to_the_requested_edge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exit.png");
        image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let assets = AssetDir::new(dir.path());
        let icon = assets.load_icon("exit.png", 24).unwrap();
        assert_eq!(icon.size, [24, 24]);
    }

    #[test]
    fn undecodable_icons_are_decode_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("exit.png"), b"not a png").unwrap();

        let assets = AssetDir::new(dir.path());
        assert!(matches!(assets.load_icon("exit.png", 24), Err(AssetError::Decode { .. })));
    }
}
