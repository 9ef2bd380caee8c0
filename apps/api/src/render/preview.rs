//! HTML preview of a document snapshot.
//!
//! Produces one standalone page. Every section block carries
//! `data-section-id` and `data-position` so the editor can map pointer
//! positions back to sections during a drag.

use serde::Serialize;

use crate::models::resume::Document;
use crate::render::markdown::{escape_html, to_html};
use crate::render::template::{Design, Template};
use crate::render::{contact_items, outline, trace, Body, Item, RenderedSection};

#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub html: String,
    pub sections: Vec<RenderedSection>,
}

pub fn render_preview(document: &Document, design: &Design) -> Preview {
    let blocks = outline(document);
    let style = &design.style;
    let primary = style.primary_color.to_string();
    let text = style.text_color.to_string();
    let rule = match design.template {
        Template::Modern => primary.clone(),
        Template::Classic => text.clone(),
        Template::Creative => design.template.info().colors.secondary.to_string(),
    };
    let size = style.font_size;

    let mut html = String::new();
    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\"/>\n\
         <title>{title}</title>\n<style>\n\
         body {{ font-family: {font}; font-size: {size}px; color: {text}; margin: 0; }}\n\
         .page {{ max-width: 8.5in; margin: 0 auto; padding: 2rem; }}\n\
         header {{ text-align: center; margin-bottom: 2rem; }}\n\
         h1 {{ font-size: {name}px; margin: 0 0 0.5rem; }}\n\
         .contact {{ font-size: {contact}px; display: flex; flex-wrap: wrap; justify-content: center; gap: 1rem; }}\n\
         section {{ margin-bottom: 1.5rem; }}\n\
         h2 {{ color: {primary}; border-bottom: 2px solid {rule}; padding-bottom: 0.5rem; }}\n\
         .item {{ margin-bottom: 1rem; }}\n\
         .item-head {{ display: flex; justify-content: space-between; }}\n\
         .dates, .meta {{ font-size: {contact}px; opacity: 0.75; }}\n\
         .skills {{ display: flex; flex-wrap: wrap; gap: 0.5rem; }}\n\
         .skill {{ border: 1px solid {primary}; border-radius: 4px; padding: 0 0.4rem; }}\n\
         </style>\n</head>\n<body class=\"template-{template}\">\n<div class=\"page\">\n",
        title = escape_html(&document.personal_info().full_name),
        font = design.template.font().css_stack(),
        name = size as u16 + 8,
        contact = size.saturating_sub(2),
        template = design.template.id(),
    ));

    let info = document.personal_info();
    html.push_str(&format!("<header>\n<h1>{}</h1>\n", escape_html(&info.full_name)));
    let contacts = contact_items(info);
    if !contacts.is_empty() {
        html.push_str("<div class=\"contact\">");
        for item in contacts {
            html.push_str(&format!("<span>{}</span>", escape_html(item)));
        }
        html.push_str("</div>\n");
    }
    if let Some(summary) = info.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        html.push_str(&format!("<p class=\"summary\">{}</p>\n", to_html(summary)));
    }
    html.push_str("</header>\n");

    for block in &blocks {
        html.push_str(&format!(
            "<section data-section-id=\"{}\" data-position=\"{}\">\n<h2>{}</h2>\n",
            escape_html(&block.id),
            block.position,
            escape_html(&block.title)
        ));
        match &block.body {
            Body::Labels(labels) => {
                html.push_str("<div class=\"skills\">");
                for label in labels {
                    html.push_str(&format!("<span class=\"skill\">{}</span>", escape_html(label)));
                }
                html.push_str("</div>\n");
            }
            Body::Items(items) => {
                for item in items {
                    write_item(&mut html, item);
                }
            }
        }
        html.push_str("</section>\n");
    }

    html.push_str("</div>\n</body>\n</html>\n");
    Preview {
        html,
        sections: trace(&blocks),
    }
}

fn write_item(html: &mut String, item: &Item) {
    html.push_str("<div class=\"item\">\n<div class=\"item-head\">");
    html.push_str(&format!("<h3>{}</h3>", escape_html(&item.heading)));
    if let Some(dates) = &item.dates {
        html.push_str(&format!("<span class=\"dates\">{}</span>", escape_html(dates)));
    }
    html.push_str("</div>\n");
    if let Some(meta) = &item.meta {
        html.push_str(&format!("<div class=\"meta\">{}</div>\n", escape_html(meta)));
    }
    if let Some(description) = &item.description {
        html.push_str(&format!("<div class=\"description\">{}</div>\n", to_html(description)));
    }
    if let Some(link) = &item.link {
        let link = escape_html(link);
        html.push_str(&format!("<a class=\"link\" href=\"{link}\">{link}</a>\n"));
    }
    html.push_str("</div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::mutators::{add_entry, add_section, reorder_sections};
    use crate::editor::seed::seed_document;
    use crate::models::resume::{Entry, Project, SectionKind};
    use crate::render::template::DesignUpdate;

    #[test]
    fn test_preview_tags_sections_in_order() {
        let doc = reorder_sections(&seed_document(), 2, 0).unwrap();
        let preview = render_preview(&doc, &Design::default());

        let edu = preview.html.find("data-section-id=\"education\" data-position=\"0\"");
        let skills = preview.html.find("data-section-id=\"skills\" data-position=\"1\"");
        let exp = preview.html.find("data-section-id=\"experience\" data-position=\"2\"");
        assert!(edu.is_some() && skills.is_some() && exp.is_some());
        assert!(edu < skills && skills < exp);
        assert_eq!(preview.sections[0].id, "education");
    }

    #[test]
    fn test_preview_contains_literal_content() {
        let preview = render_preview(&seed_document(), &Design::default());
        for text in [
            "John Doe",
            "john.doe@email.com",
            "Senior Software Engineer",
            "2022-01 - Present",
            "Tech Corp • San Francisco, CA",
            "GPA: 3.8",
            "TypeScript",
        ] {
            assert!(preview.html.contains(text), "missing {text}");
        }
    }

    #[test]
    fn test_preview_omits_empty_sections() {
        let doc = add_section(&seed_document(), SectionKind::Projects, "Side Projects");
        let preview = render_preview(&doc, &Design::default());
        assert!(!preview.html.contains("Side Projects"));
        assert_eq!(preview.sections.len(), 3);
    }

    #[test]
    fn test_preview_escapes_and_breaks_descriptions() {
        let doc = add_section(&seed_document(), SectionKind::Projects, "");
        let doc = add_entry(
            &doc,
            "projects",
            Entry::Project(Project {
                title: "<Parser>".into(),
                description: "line one\nline two".into(),
                technologies: vec!["Rust".into(), "nom".into()],
                ..Default::default()
            }),
        )
        .unwrap();
        let preview = render_preview(&doc, &Design::default());
        assert!(preview.html.contains("&lt;Parser&gt;"));
        assert!(preview.html.contains("line one<br/>line two"));
        assert!(preview.html.contains("Rust, nom"));
    }

    #[test]
    fn test_preview_applies_style() {
        let design = Design::default()
            .apply(&DesignUpdate {
                template: Some(Template::Classic),
                font_size: Some(14),
                primary_color: Some("#112233".into()),
                ..Default::default()
            })
            .unwrap();
        let preview = render_preview(&seed_document(), &design);
        assert!(preview.html.contains("font-size: 14px"));
        assert!(preview.html.contains("font-size: 22px"));
        assert!(preview.html.contains("color: #112233"));
        assert!(preview.html.contains("Times New Roman"));
        assert!(preview.html.contains("template-classic"));
    }
}
