//! Colour palettes.

use serde::Serialize;

use quizlearn_core::config::CustomColors;
use quizlearn_core::model::Difficulty;

/// Name of the user-defined palette entry.
pub const CUSTOM_PALETTE: &str = "Custom";

/// A named set of four colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub name: String,
    pub background: String,
    pub text: String,
    pub card: String,
    pub accent: String,
}

struct BuiltinPalette {
    name: &'static str,
    background: &'static str,
    text: &'static str,
    card: &'static str,
    accent: &'static str,
}

const fn builtin(
    name: &'static str,
    background: &'static str,
    text: &'static str,
    card: &'static str,
    accent: &'static str,
) -> BuiltinPalette {
    BuiltinPalette {
        name,
        background,
        text,
        card,
        accent,
    }
}

const BUILTIN_PALETTES: [BuiltinPalette; 10] = [
    builtin("Default Dark", "#0b0e14", "#ffffff", "#161b22", "#4f46e5"),
    builtin("Midnight Blue", "#0f172a", "#f8fafc", "#1e293b", "#0ea5e9"),
    builtin("Deep Forest", "#061613", "#e6f4f1", "#0c2d27", "#059669"),
    builtin("Cyberpunk", "#0d0221", "#ffffff", "#1a084d", "#db2777"),
    builtin("Nordic Light", "#f3f4f6", "#1f2937", "#ffffff", "#2563eb"),
    builtin("Slate & Gold", "#1e293b", "#f1f5f9", "#334155", "#ca8a04"),
    builtin("Rose Pine", "#191724", "#e0def4", "#1f1d2e", "#908caa"),
    builtin("Espresso", "#1c1917", "#fafaf9", "#292524", "#ea580c"),
    builtin("Material Dark", "#212121", "#eeffff", "#424242", "#00acc1"),
    builtin("Amethyst", "#1a103d", "#f5f3ff", "#2d1b69", "#7c3aed"),
];

impl From<&BuiltinPalette> for Palette {
    fn from(p: &BuiltinPalette) -> Self {
        Self {
            name: p.name.to_string(),
            background: p.background.to_string(),
            text: p.text.to_string(),
            card: p.card.to_string(),
            accent: p.accent.to_string(),
        }
    }
}

impl Palette {
    /// Build the "Custom" entry from configured colours.
    pub fn custom(colors: &CustomColors) -> Self {
        Self {
            name: CUSTOM_PALETTE.to_string(),
            background: colors.background.clone(),
            text: colors.text.clone(),
            card: colors.card.clone(),
            accent: colors.accent.clone(),
        }
    }

    pub fn default_dark() -> Self {
        Palette::from(&BUILTIN_PALETTES[0])
    }
}

/// Every palette name, built-ins first, then "Custom".
pub fn palette_names() -> Vec<&'static str> {
    BUILTIN_PALETTES
        .iter()
        .map(|p| p.name)
        .chain(std::iter::once(CUSTOM_PALETTE))
        .collect()
}

/// All palettes, with "Custom" taken from `custom`.
pub fn all_palettes(custom: &CustomColors) -> Vec<Palette> {
    BUILTIN_PALETTES
        .iter()
        .map(Palette::from)
        .chain(std::iter::once(Palette::custom(custom)))
        .collect()
}

/// Look up a palette by name (case-insensitive). `None` for unknown names.
pub fn resolve_palette(name: &str, custom: &CustomColors) -> Option<Palette> {
    let name = name.trim();
    if name.eq_ignore_ascii_case(CUSTOM_PALETTE) {
        return Some(Palette::custom(custom));
    }
    BUILTIN_PALETTES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(Palette::from)
}

/// Badge colour for a difficulty level.
pub fn difficulty_accent(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "#00C851",
        Difficulty::Medium => "#FFBB33",
        Difficulty::Hard => "#FF4444",
    }
}
