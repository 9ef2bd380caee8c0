//! Template catalogue and style options shared by the preview and the export.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::errors::EditError;
use crate::layout::font_metrics::FontFamily;

pub const MIN_FONT_SIZE: u8 = 10;
pub const MAX_FONT_SIZE: u8 = 16;
pub const DEFAULT_FONT_SIZE: u8 = 12;

// ────────────────────────────────────────────────────────────────────────────
// Templates
// ────────────────────────────────────────────────────────────────────────────

/// A visual template. Unknown identifiers resolve to `Modern`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Template {
    #[default]
    Modern,
    Classic,
    Creative,
}

/// Three-color palette shown in the template picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: HexColor,
    pub secondary: HexColor,
    pub accent: HexColor,
}

/// Catalogue entry returned by `GET /api/v1/templates`.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub colors: Palette,
}

impl Template {
    pub const ALL: [Template; 3] = [Template::Modern, Template::Classic, Template::Creative];

    /// Resolves a template id, falling back to `Modern` for anything unknown.
    pub fn resolve(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "classic" => Template::Classic,
            "creative" => Template::Creative,
            _ => Template::Modern,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Template::Modern => "modern",
            Template::Classic => "classic",
            Template::Creative => "creative",
        }
    }

    pub fn font(&self) -> FontFamily {
        match self {
            Template::Classic => FontFamily::TimesRoman,
            Template::Modern | Template::Creative => FontFamily::Helvetica,
        }
    }

    pub fn info(&self) -> TemplateInfo {
        let (name, description, colors) = match self {
            Template::Modern => (
                "Modern",
                "Clean and contemporary design",
                [(0x3B, 0x82, 0xF6), (0x1E, 0x40, 0xAF), (0xF8, 0xFA, 0xFC)],
            ),
            Template::Classic => (
                "Classic",
                "Traditional professional layout",
                [(0x1F, 0x29, 0x37), (0x37, 0x41, 0x51), (0xF9, 0xFA, 0xFB)],
            ),
            Template::Creative => (
                "Creative",
                "Bold and artistic approach",
                [(0x7C, 0x3A, 0xED), (0x5B, 0x21, 0xB6), (0xFA, 0xF5, 0xFF)],
            ),
        };
        let [p, s, a] = colors.map(|(r, g, b)| HexColor { r, g, b });
        TemplateInfo {
            id: self.id(),
            name,
            description,
            colors: Palette {
                primary: p,
                secondary: s,
                accent: a,
            },
        }
    }
}

impl From<String> for Template {
    fn from(id: String) -> Self {
        Template::resolve(&id)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.id().to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Colors
// ────────────────────────────────────────────────────────────────────────────

/// An sRGB color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        HexColor { r, g, b }
    }

    /// Components scaled to 0.0..=1.0, as PDF color operators expect.
    pub fn to_unit_rgb(&self) -> [f32; 3] {
        [self.r, self.g, self.b].map(|c| c as f32 / 255.0)
    }
}

impl FromStr for HexColor {
    type Err = EditError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || EditError::Validation(format!("'{raw}' is not a #RRGGBB color"));
        let digits = raw.trim().strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(HexColor {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Style options and design
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    pub font_size: u8,
    pub primary_color: HexColor,
    pub text_color: HexColor,
}

impl Default for StyleOptions {
    fn default() -> Self {
        StyleOptions {
            font_size: DEFAULT_FONT_SIZE,
            primary_color: HexColor::new(0x3B, 0x82, 0xF6),
            text_color: HexColor::new(0x00, 0x00, 0x00),
        }
    }
}

impl StyleOptions {
    pub fn new(font_size: u8, primary_color: &str, text_color: &str) -> Result<Self, EditError> {
        Ok(StyleOptions {
            font_size: check_font_size(font_size)?,
            primary_color: primary_color.parse()?,
            text_color: text_color.parse()?,
        })
    }
}

fn check_font_size(size: u8) -> Result<u8, EditError> {
    if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
        return Err(EditError::Validation(format!(
            "font size must be between {MIN_FONT_SIZE} and {MAX_FONT_SIZE}, got {size}"
        )));
    }
    Ok(size)
}

/// Template plus style options; the presentation half of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub template: Template,
    pub style: StyleOptions,
}

/// Partial design change. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignUpdate {
    pub template: Option<Template>,
    pub font_size: Option<u8>,
    pub primary_color: Option<String>,
    pub text_color: Option<String>,
}

impl Design {
    /// Returns the design with `update` applied, or the first invalid field.
    pub fn apply(&self, update: &DesignUpdate) -> Result<Design, EditError> {
        let mut next = *self;
        if let Some(template) = update.template {
            next.template = template;
        }
        if let Some(size) = update.font_size {
            next.style.font_size = check_font_size(size)?;
        }
        if let Some(color) = &update.primary_color {
            next.style.primary_color = color.parse()?;
        }
        if let Some(color) = &update.text_color {
            next.style.text_color = color.parse()?;
        }
        Ok(next)
    }
}
