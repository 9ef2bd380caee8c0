//! Render adapters: HTML preview and PDF export.
//!
//! Both adapters walk the same outline, so they cannot disagree about which
//! sections appear, in what order, or what literal text each one carries.
//! Only presentation differs.

pub mod export;
pub mod handlers;
pub mod markdown;
pub mod preview;
pub mod template;

use serde::Serialize;

use crate::models::resume::{
    Certification, Document, Education, EndDate, Experience, PersonalInfo, Project, Section,
    SectionContent,
};

/// One section as it was actually emitted, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub id: String,
    pub title: String,
    pub position: usize,
}

/// A non-empty section reduced to renderable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock {
    pub id: String,
    pub title: String,
    pub position: usize,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Skill labels, in model order.
    Labels(Vec<String>),
    Items(Vec<Item>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub heading: String,
    pub dates: Option<String>,
    pub meta: Option<String>,
    /// Raw markdown; each renderer converts it its own way.
    pub description: Option<String>,
    pub link: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Outline
// ────────────────────────────────────────────────────────────────────────────

/// The ordered, non-empty sections of `document`.
///
/// Sections are visited by ascending `order`; empty ones are skipped and
/// positions count only what is emitted.
pub fn outline(document: &Document) -> Vec<SectionBlock> {
    let mut sections: Vec<&Section> = document.sections().iter().collect();
    sections.sort_by_key(|s| s.order);

    sections
        .into_iter()
        .filter(|s| !s.content.is_empty())
        .enumerate()
        .map(|(position, section)| SectionBlock {
            id: section.id.clone(),
            title: section.title.clone(),
            position,
            body: body_of(&section.content),
        })
        .collect()
}

/// The section trace an outline renders to.
pub fn trace(blocks: &[SectionBlock]) -> Vec<RenderedSection> {
    blocks
        .iter()
        .map(|b| RenderedSection {
            id: b.id.clone(),
            title: b.title.clone(),
            position: b.position,
        })
        .collect()
}

fn body_of(content: &SectionContent) -> Body {
    match content {
        SectionContent::Skills(skills) => Body::Labels(skills.clone()),
        SectionContent::Experience(items) => Body::Items(items.iter().map(experience_item).collect()),
        SectionContent::Education(items) => Body::Items(items.iter().map(education_item).collect()),
        SectionContent::Projects(items) => Body::Items(items.iter().map(project_item).collect()),
        SectionContent::Certifications(items) => {
            Body::Items(items.iter().map(certification_item).collect())
        }
    }
}

fn experience_item(e: &Experience) -> Item {
    Item {
        heading: e.title.clone(),
        dates: date_range(&e.start_date, &e.end_date),
        meta: join_meta(&[e.company.as_str(), e.location.as_str()]),
        description: non_blank(&e.description),
        link: None,
    }
}

fn education_item(e: &Education) -> Item {
    let gpa = e
        .gpa
        .as_deref()
        .filter(|g| !g.trim().is_empty())
        .map(|g| format!("GPA: {g}"))
        .unwrap_or_default();
    Item {
        heading: e.degree.clone(),
        dates: date_range(&e.start_date, &e.end_date),
        meta: join_meta(&[e.school.as_str(), e.location.as_str(), gpa.as_str()]),
        description: None,
        link: None,
    }
}

fn project_item(p: &Project) -> Item {
    let technologies: Vec<&str> = p
        .technologies
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    Item {
        heading: p.title.clone(),
        dates: None,
        meta: (!technologies.is_empty()).then(|| technologies.join(", ")),
        description: non_blank(&p.description),
        link: p.link.as_deref().and_then(non_blank),
    }
}

fn certification_item(c: &Certification) -> Item {
    Item {
        heading: c.name.clone(),
        dates: None,
        meta: join_meta(&[c.issuer.as_str(), c.date.as_str()]),
        description: None,
        link: c.link.as_deref().and_then(non_blank),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared formatting
// ────────────────────────────────────────────────────────────────────────────

pub const META_SEPARATOR: &str = " • ";

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Joins the non-blank parts with ` • `.
pub fn join_meta(parts: &[&str]) -> Option<String> {
    let kept: Vec<&str> = parts.iter().map(|p| p.trim()).filter(|p| !p.is_empty()).collect();
    (!kept.is_empty()).then(|| kept.join(META_SEPARATOR))
}

/// `start - end`, or whichever side is set.
pub fn date_range(start: &str, end: &EndDate) -> Option<String> {
    let end = end.to_string();
    match (start.trim(), end.trim()) {
        ("", "") => None,
        (start, "") => Some(start.to_string()),
        ("", end) => Some(end.to_string()),
        (start, end) => Some(format!("{start} - {end}")),
    }
}

/// Contact details for the header line, in display order.
pub fn contact_items(info: &PersonalInfo) -> Vec<&str> {
    [
        Some(info.email.as_str()),
        Some(info.phone.as_str()),
        Some(info.location.as_str()),
        info.website.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::mutators::{add_section, reorder_sections};
    use crate::editor::seed::seed_document;
    use crate::models::resume::SectionKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outline_follows_order() {
        let doc = reorder_sections(&seed_document(), 0, 2).unwrap();
        let ids: Vec<String> = outline(&doc).into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["experience", "education", "skills"]);
    }

    #[test]
    fn test_outline_skips_empty_sections_and_packs_positions() {
        let doc = add_section(&seed_document(), SectionKind::Projects, "");
        let doc = reorder_sections(&doc, 3, 0).unwrap();
        assert_eq!(doc.ordered_ids()[0], "projects");

        let blocks = outline(&doc);
        assert_eq!(
            trace(&blocks),
            vec![
                RenderedSection {
                    id: "skills".into(),
                    title: "Skills".into(),
                    position: 0
                },
                RenderedSection {
                    id: "experience".into(),
                    title: "Work Experience".into(),
                    position: 1
                },
                RenderedSection {
                    id: "education".into(),
                    title: "Education".into(),
                    position: 2
                },
            ]
        );
    }

    #[test]
    fn test_seed_items() {
        let blocks = outline(&seed_document());
        let Body::Items(items) = &blocks[1].body else {
            panic!("experience renders items");
        };
        assert_eq!(items[0].heading, "Senior Software Engineer");
        assert_eq!(items[0].dates.as_deref(), Some("2022-01 - Present"));
        assert_eq!(items[0].meta.as_deref(), Some("Tech Corp • San Francisco, CA"));

        let Body::Items(items) = &blocks[2].body else {
            panic!("education renders items");
        };
        assert_eq!(
            items[0].meta.as_deref(),
            Some("University of Technology • Boston, MA • GPA: 3.8")
        );
    }

    #[test]
    fn test_join_meta_drops_blank_parts() {
        assert_eq!(join_meta(&["Acme", " ", "Remote"]).as_deref(), Some("Acme • Remote"));
        assert_eq!(join_meta(&["", ""]), None);
    }

    #[test]
    fn test_date_range_partial() {
        assert_eq!(date_range("", &EndDate::Present).as_deref(), Some("Present"));
        assert_eq!(date_range("2020", &EndDate::default()).as_deref(), Some("2020"));
        assert_eq!(date_range("", &EndDate::default()), None);
    }

    #[test]
    fn test_contact_items_skip_blanks() {
        let info = PersonalInfo {
            full_name: "Ada".into(),
            email: "ada@example.com".into(),
            location: "London".into(),
            ..Default::default()
        };
        assert_eq!(contact_items(&info), vec!["ada@example.com", "London"]);
    }
}
