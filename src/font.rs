use std::path::Path;

use eframe::egui;
use eframe::egui::{FontData, FontDefinitions, FontFamily};

/// Outcome of trying to make a custom font usable.
///
/// Registration never fails upward; every problem degrades to the built-in
/// proportional face so the window always renders legible text.
pub enum ResolvedFont {
    Custom { family: String, data: FontData },
    Fallback,
}

impl ResolvedFont {
    pub fn family_name(&self) -> Option<&str> {
        match self {
            Self::Custom { family, .. } => Some(family),
            Self::Fallback => None,
        }
    }
}

/// Family name a font file registers under: its file stem.
pub fn family_name(path: &Path) -> Option<String> {
    Some(path.file_stem()?.to_str()?.to_owned())
}

/// Read and validate the font at `path`.
///
/// Fonts loaded this way live in the process's own glyph atlas, so they are
/// never visible system-wide and vanish with the process.
pub fn register(path: &Path) -> ResolvedFont {
    if !path.is_file() {
        log::warn!("font {} does not exist, using the default face", path.display());
        return ResolvedFont::Fallback;
    }
    let Some(family) = family_name(path) else {
        log::warn!("font {} has no usable family name, using the default face", path.display());
        return ResolvedFont::Fallback;
    };
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("failed to read font {}: {err}", path.display());
            return ResolvedFont::Fallback;
        }
    };
    // The renderer panics on unparseable fonts, so reject them here with the
    // same parser it uses.
    if ab_glyph::FontRef::try_from_slice(&bytes).is_err() {
        log::warn!("{} is not a usable font, using the default face", path.display());
        return ResolvedFont::Fallback;
    }
    log::info!("registered font family {family:?} from {}", path.display());
    ResolvedFont::Custom {
        family,
        data: FontData::from_owned(bytes),
    }
}

/// Install the resolved font into the egui atlas and return the family to
/// render with.
pub fn install(ctx: &egui::Context, resolved: ResolvedFont) -> FontFamily {
    match resolved {
        ResolvedFont::Custom { family, data } => {
            let mut fonts = FontDefinitions::default();
            fonts.font_data.insert(family.clone(), data);
            fonts
                .families
                .insert(FontFamily::Name(family.as_str().into()), vec![family.clone()]);
            ctx.set_fonts(fonts);
            FontFamily::Name(family.as_str().into())
        }
        ResolvedFont::Fallback => FontFamily::Proportional,
    }
}
