//! PDF export.
//!
//! The document is laid out with the static base-14 metrics from `layout` and
//! written with lopdf. Fonts are the standard Helvetica/Times faces with
//! WinAnsi encoding, so nothing is embedded and the output stays small.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as PdfDocument, Object, ObjectId, Stream, StringFormat};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::layout::{get_metrics, wrap_text, FontMetricTable, PageGeometry, PaperSize, TextStyle};
use crate::models::resume::Document;
use crate::render::markdown::to_plain_text;
use crate::render::template::Design;
use crate::render::{contact_items, outline, trace, Body, Item, RenderedSection, META_SEPARATOR};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not encode page content: {0}")]
    Encode(String),

    #[error("could not write PDF: {0}")]
    Write(String),

    #[error("export task did not complete: {0}")]
    Task(String),
}

/// A finished export. Nothing partial is ever handed out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub sections: Vec<RenderedSection>,
    pub page_count: usize,
}

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// `John Doe` → `John_Doe_Resume.pdf`. A blank name gives `Resume.pdf`.
pub fn export_file_name(full_name: &str) -> String {
    if full_name.trim().is_empty() {
        return "Resume.pdf".to_string();
    }
    format!("{}_Resume.pdf", WHITESPACE_RUN.replace_all(full_name, "_"))
}

// ────────────────────────────────────────────────────────────────────────────
// Export
// ────────────────────────────────────────────────────────────────────────────

const FONT_REGULAR: &[u8] = b"F1";
const FONT_BOLD: &[u8] = b"F2";
const LEADING: f32 = 1.2;
const DESCRIPTION_LEADING: f32 = 1.4;
const SECTION_GAP: f32 = 20.0;
const ITEM_GAP: f32 = 12.0;
const HEADER_GAP: f32 = 30.0;
const COLUMN_GAP: f32 = 12.0;

/// Renders `document` to a PDF. CPU-bound; call from `spawn_blocking`.
///
/// `created` is stamped into the PDF info dictionary and is the only input
/// besides the snapshot, so equal arguments give equal bytes.
pub fn export_pdf(
    document: &Document,
    design: &Design,
    paper: PaperSize,
    created: DateTime<Utc>,
) -> Result<ExportArtifact, ExportError> {
    let blocks = outline(document);
    let font = design.template.font();
    let size = design.style.font_size as f32;
    let mut composer = Composer::new(PageGeometry::new(paper), get_metrics(font), design);

    // Header
    let info = document.personal_info();
    composer.lines(&info.full_name, bold(size + 8.0), Ink::Text, Align::Center, LEADING);
    composer.gap(8.0);
    let contacts = contact_items(info).join("  |  ");
    composer.lines(&contacts, regular(size - 2.0), Ink::Text, Align::Center, LEADING);
    if let Some(summary) = info.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        composer.gap(8.0);
        composer.lines(
            &to_plain_text(summary),
            regular(size - 1.0),
            Ink::Text,
            Align::Left,
            DESCRIPTION_LEADING,
        );
    }
    composer.gap(HEADER_GAP);

    for block in &blocks {
        // Keep a title together with the first line of its body.
        composer.reserve((size + 2.0) * LEADING + 16.0 + size * LEADING * 2.0);
        composer.lines(&block.title, bold(size + 2.0), Ink::Primary, Align::Left, LEADING);
        composer.rule(1.5);
        composer.gap(12.0);

        match &block.body {
            Body::Labels(labels) => {
                let labels = labels
                    .iter()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty())
                    .collect::<Vec<_>>()
                    .join(META_SEPARATOR);
                composer.lines(&labels, regular(size - 1.0), Ink::Text, Align::Left, LEADING);
            }
            Body::Items(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        composer.gap(ITEM_GAP);
                    }
                    composer.item(item, size);
                }
            }
        }
        composer.gap(SECTION_GAP);
    }

    let pages = composer.finish();
    let page_count = pages.len();
    let fonts = (font.base_font(false), font.base_font(true));
    let bytes = write_pdf(pages, paper, fonts, &info.full_name, created)?;

    let artifact = ExportArtifact {
        file_name: export_file_name(&info.full_name),
        bytes,
        sections: trace(&blocks),
        page_count,
    };
    info!(
        "Exported {} ({} bytes, {} page(s), {} section(s))",
        artifact.file_name,
        artifact.bytes.len(),
        artifact.page_count,
        artifact.sections.len()
    );
    Ok(artifact)
}

// ────────────────────────────────────────────────────────────────────────────
// Page composition
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy)]
enum Ink {
    Text,
    Primary,
}

fn regular(size_pt: f32) -> TextStyle {
    TextStyle {
        size_pt,
        bold: false,
    }
}

fn bold(size_pt: f32) -> TextStyle {
    TextStyle {
        size_pt,
        bold: true,
    }
}

/// Accumulates drawing operations page by page. `y` is the top of the next
/// line in PDF space and moves downward.
struct Composer {
    geometry: PageGeometry,
    metrics: &'static FontMetricTable,
    text_rgb: [f32; 3],
    primary_rgb: [f32; 3],
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl Composer {
    fn new(geometry: PageGeometry, metrics: &'static FontMetricTable, design: &Design) -> Self {
        Composer {
            geometry,
            metrics,
            text_rgb: design.style.text_color.to_unit_rgb(),
            primary_rgb: design.style.primary_color.to_unit_rgb(),
            pages: Vec::new(),
            ops: Vec::new(),
            y: geometry.top(),
        }
    }

    fn rgb(&self, ink: Ink) -> [f32; 3] {
        match ink {
            Ink::Text => self.text_rgb,
            Ink::Primary => self.primary_rgb,
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = self.geometry.top();
    }

    /// Starts a new page unless `height` still fits on this one. A fresh page
    /// always accepts content, however tall.
    fn reserve(&mut self, height: f32) {
        let at_top = self.y >= self.geometry.top();
        if !at_top && self.y - height < self.geometry.bottom() {
            self.break_page();
        }
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn show(&mut self, x: f32, baseline: f32, text: &str, style: TextStyle, rgb: [f32; 3]) {
        let font = if style.bold { FONT_BOLD } else { FONT_REGULAR };
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font.to_vec()), Object::Real(style.size_pt)],
            ),
            Operation::new("rg", rgb.iter().map(|c| Object::Real(*c)).collect()),
            Operation::new("Td", vec![Object::Real(x), Object::Real(baseline)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn x_for(&self, text: &str, style: TextStyle, align: Align) -> f32 {
        let width = self.metrics.width_pt(text, style.size_pt, style.bold);
        match align {
            Align::Left => self.geometry.left(),
            Align::Center => {
                (self.geometry.left() + (self.geometry.text_width() - width) / 2.0)
                    .max(self.geometry.left())
            }
            Align::Right => (self.geometry.right() - width).max(self.geometry.left()),
        }
    }

    /// Wraps `text` to the text width and sets each line.
    fn lines(&mut self, text: &str, style: TextStyle, ink: Ink, align: Align, leading: f32) {
        let rgb = self.rgb(ink);
        for line in wrap_text(text, self.metrics, style, self.geometry.text_width()) {
            let advance = style.size_pt * leading;
            self.reserve(advance);
            let baseline = self.y - style.size_pt;
            let x = self.x_for(&line, style, align);
            self.show(x, baseline, &line, style, rgb);
            self.y -= advance;
        }
    }

    /// Bold heading on the left, dates right-aligned on its first line.
    fn heading(&mut self, heading: &str, dates: Option<&str>, size: f32) {
        let head_style = bold(size);
        let date_style = regular(size - 2.0);
        let date_width = dates
            .map(|d| self.metrics.width_pt(d, date_style.size_pt, false) + COLUMN_GAP)
            .unwrap_or(0.0);
        let head_width = (self.geometry.text_width() - date_width).max(self.geometry.text_width() / 2.0);

        let mut lines = wrap_text(heading, self.metrics, head_style, head_width).into_iter();
        let advance = size * LEADING;
        self.reserve(advance);
        let baseline = self.y - size;
        let text_rgb = self.text_rgb;
        if let Some(first) = lines.next() {
            self.show(self.geometry.left(), baseline, &first, head_style, text_rgb);
        }
        if let Some(dates) = dates {
            let x = self.x_for(dates, date_style, Align::Right);
            self.show(x, baseline, dates, date_style, text_rgb);
        }
        self.y -= advance;

        for line in lines {
            self.reserve(advance);
            let baseline = self.y - size;
            self.show(self.geometry.left(), baseline, &line, head_style, text_rgb);
            self.y -= advance;
        }
    }

    fn item(&mut self, item: &Item, size: f32) {
        self.heading(&item.heading, item.dates.as_deref(), size);
        if let Some(meta) = &item.meta {
            self.gap(2.0);
            self.lines(meta, regular(size - 1.0), Ink::Text, Align::Left, LEADING);
        }
        if let Some(description) = &item.description {
            self.gap(4.0);
            self.lines(
                &to_plain_text(description),
                regular(size - 1.0),
                Ink::Text,
                Align::Left,
                DESCRIPTION_LEADING,
            );
        }
        if let Some(link) = &item.link {
            self.lines(link, regular(size - 2.0), Ink::Primary, Align::Left, LEADING);
        }
    }

    /// Horizontal rule across the text width, just below the last line.
    fn rule(&mut self, width: f32) {
        self.gap(2.0);
        let [r, g, b] = self.primary_rgb;
        let y = self.y;
        self.ops.extend([
            Operation::new("w", vec![Object::Real(width)]),
            Operation::new("RG", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
            Operation::new("m", vec![Object::Real(self.geometry.left()), Object::Real(y)]),
            Operation::new("l", vec![Object::Real(self.geometry.right()), Object::Real(y)]),
            Operation::new("S", vec![]),
        ]);
        self.y -= width;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
        }
        self.pages
    }
}

/// Maps text onto WinAnsiEncoding. Characters it cannot carry become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// PDF assembly
// ────────────────────────────────────────────────────────────────────────────

fn font_dict(base_font: &str) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(base_font.as_bytes().to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ])
}

fn pdf_text(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Literal)
}

fn write_pdf(
    pages: Vec<Vec<Operation>>,
    paper: PaperSize,
    (regular_font, bold_font): (&str, &str),
    title: &str,
    created: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    let mut doc = PdfDocument::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dict(regular_font));
    let bold_id = doc.add_object(font_dict(bold_font));
    let resources = Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![
            ("F1", Object::Reference(regular_id)),
            ("F2", Object::Reference(bold_id)),
        ])),
    )]);
    let resources_id = doc.add_object(resources);

    let (width, height) = paper.dimensions();
    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }
            .encode()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width),
                    Object::Real(height),
                ]),
            ),
            ("Resources", Object::Reference(resources_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_ids.len() as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    let created = created.format("D:%Y%m%d%H%M%SZ").to_string();
    let info_id = doc.add_object(Dictionary::from_iter(vec![
        ("Title", pdf_text(&format!("{title} Resume"))),
        ("Producer", pdf_text("vitae")),
        ("CreationDate", pdf_text(&created)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::Write(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::mutators::{add_entry, reorder_sections, update_personal_info};
    use crate::editor::seed::seed_document;
    use crate::models::resume::{Entry, Experience};
    use crate::render::preview::render_preview;
    use crate::render::template::{DesignUpdate, Template};
    use pretty_assertions::assert_eq;

    fn created() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn extract(bytes: &[u8]) -> String {
        pdf_extract::extract_text_from_mem(bytes).expect("exported PDF should parse")
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name("John Doe"), "John_Doe_Resume.pdf");
        assert_eq!(export_file_name("Mary  Ann\tLee"), "Mary_Ann_Lee_Resume.pdf");
        assert_eq!(export_file_name("Cher"), "Cher_Resume.pdf");
        assert_eq!(export_file_name("   "), "Resume.pdf");
    }

    #[test]
    fn test_export_produces_pdf_bytes() {
        let artifact =
            export_pdf(&seed_document(), &Design::default(), PaperSize::A4, created()).unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF-1.7"));
        assert_eq!(artifact.file_name, "John_Doe_Resume.pdf");
        assert_eq!(artifact.page_count, 1);
    }

    #[test]
    fn test_export_text_follows_section_order() {
        let doc = reorder_sections(&seed_document(), 0, 2).unwrap();
        let artifact = export_pdf(&doc, &Design::default(), PaperSize::A4, created()).unwrap();
        let text = extract(&artifact.bytes);

        let name = text.find("John Doe").expect("name");
        let experience = text.find("Work Experience").expect("experience title");
        let education = text.find("Bachelor of Science").expect("education entry");
        let skills = text.find("TypeScript").expect("skill label");
        assert!(name < experience && experience < education && education < skills);
        assert!(text.contains("Senior Software Engineer"));
        assert!(text.contains("Tech Corp"));
    }

    #[test]
    fn test_export_strips_markdown_from_descriptions() {
        let doc = add_entry(
            &seed_document(),
            "experience",
            Entry::Experience(Experience {
                title: "Staff Engineer".into(),
                company: "Initech".into(),
                description: "**Shipped** the [billing service](https://example.com)".into(),
                ..Default::default()
            }),
        )
        .unwrap();
        let artifact =
            export_pdf(&doc, &Design::default(), PaperSize::Letter, created()).unwrap();
        let text = extract(&artifact.bytes);
        assert!(text.contains("Shipped"));
        assert!(text.contains("billing service"));
        assert!(!text.contains("**"));
        assert!(!text.contains("https://example.com"));
    }

    #[test]
    fn test_long_documents_paginate() {
        let mut doc = seed_document();
        for n in 0..40 {
            doc = add_entry(
                &doc,
                "experience",
                Entry::Experience(Experience {
                    title: format!("Engineer {n}"),
                    company: "Acme".into(),
                    start_date: "2010-01".into(),
                    description: "Built and operated services. ".repeat(8),
                    ..Default::default()
                }),
            )
            .unwrap();
        }
        let artifact = export_pdf(&doc, &Design::default(), PaperSize::A4, created()).unwrap();
        assert!(artifact.page_count > 1);
        let parsed = PdfDocument::load_mem(&artifact.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), artifact.page_count);
    }

    #[test]
    fn test_preview_and_export_agree_on_sections() {
        let doc = reorder_sections(&seed_document(), 1, 0).unwrap();
        let design = Design::default()
            .apply(&DesignUpdate {
                template: Some(Template::Classic),
                ..Default::default()
            })
            .unwrap();
        let preview = render_preview(&doc, &design);
        let artifact = export_pdf(&doc, &design, PaperSize::A4, created()).unwrap();
        assert_eq!(preview.sections, artifact.sections);
    }

    #[test]
    fn test_blank_name_exports_as_resume_pdf() {
        let doc = update_personal_info(&seed_document(), "fullName", "").unwrap();
        let artifact = export_pdf(&doc, &Design::default(), PaperSize::A4, created()).unwrap();
        assert_eq!(artifact.file_name, "Resume.pdf");
    }

    #[test]
    fn test_export_is_deterministic_for_one_timestamp() {
        let doc = seed_document();
        let a = export_pdf(&doc, &Design::default(), PaperSize::A4, created()).unwrap();
        let b = export_pdf(&doc, &Design::default(), PaperSize::A4, created()).unwrap();
        assert_eq!(a.bytes, b.bytes);

        let parsed = PdfDocument::load_mem(&a.bytes).unwrap();
        let info = parsed
            .trailer
            .get(b"Info")
            .and_then(Object::as_reference)
            .and_then(|id| parsed.get_dictionary(id))
            .unwrap();
        let stamp = info.get(b"CreationDate").and_then(Object::as_str).unwrap();
        assert_eq!(stamp, b"D:20240301093000Z");
    }

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(encode_win_ansi("a•b"), vec![b'a', 0x95, b'b']);
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }
}
