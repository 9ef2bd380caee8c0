//! Page geometry for the PDF export.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Paper sizes in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (595.0, 842.0),
            PaperSize::Letter => (612.0, 792.0),
        }
    }
}

impl FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PaperSize::A4),
            "letter" => Ok(PaperSize::Letter),
            other => Err(format!("unknown paper size '{other}' (expected a4 or letter)")),
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaperSize::A4 => "a4",
            PaperSize::Letter => "letter",
        })
    }
}

/// Printable area of one page. PDF y grows upward from the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// 40pt margins on every side.
    pub fn new(paper: PaperSize) -> Self {
        let (width, height) = paper.dimensions();
        PageGeometry {
            width,
            height,
            margin: 40.0,
        }
    }

    pub fn left(&self) -> f32 {
        self.margin
    }

    pub fn right(&self) -> f32 {
        self.width - self.margin
    }

    pub fn top(&self) -> f32 {
        self.height - self.margin
    }

    pub fn bottom(&self) -> f32 {
        self.margin
    }

    pub fn text_width(&self) -> f32 {
        self.right() - self.left()
    }
}
