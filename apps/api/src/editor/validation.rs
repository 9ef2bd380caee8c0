//! Required-field checks applied before an entry is saved into a section.
//!
//! Only presence is checked. Dates, emails and links are free text.

use serde::Serialize;

use crate::errors::EditError;
use crate::models::resume::{Entry, SectionContent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingField {
    pub entry_id: String,
    pub field: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryValidationResult {
    pub passed: bool,
    pub missing: Vec<MissingField>,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Fields an entry cannot be saved without:
/// - experience: title, company
/// - education: degree, school
/// - project: title
/// - certification: name, issuer
pub fn check_entry(entry: &Entry) -> EntryValidationResult {
    let required: Vec<(&'static str, &str)> = match entry {
        Entry::Experience(e) => vec![("title", e.title.as_str()), ("company", e.company.as_str())],
        Entry::Education(e) => vec![("degree", e.degree.as_str()), ("school", e.school.as_str())],
        Entry::Project(p) => vec![("title", p.title.as_str())],
        Entry::Certification(c) => vec![("name", c.name.as_str()), ("issuer", c.issuer.as_str())],
    };

    let missing: Vec<MissingField> = required
        .into_iter()
        .filter(|(_, value)| blank(value))
        .map(|(field, _)| MissingField {
            entry_id: entry.id().to_string(),
            field,
        })
        .collect();

    EntryValidationResult {
        passed: missing.is_empty(),
        missing,
    }
}

/// Converts a failed check into the error mutators return.
pub fn validate_entry(entry: &Entry) -> Result<(), EditError> {
    let result = check_entry(entry);
    if result.passed {
        return Ok(());
    }
    let fields: Vec<&str> = result.missing.iter().map(|m| m.field).collect();
    Err(EditError::Validation(format!(
        "{} entry is missing required field(s): {}",
        entry.section_kind(),
        fields.join(", ")
    )))
}

pub fn validate_skill(skill: &str) -> Result<(), EditError> {
    if blank(skill) {
        return Err(EditError::Validation("skill cannot be empty".to_string()));
    }
    Ok(())
}

/// Validates every item of a replacement payload, collecting all failures.
pub fn validate_content(content: &SectionContent) -> Result<(), EditError> {
    let entries: Vec<Entry> = match content {
        SectionContent::Skills(skills) => {
            return skills.iter().try_for_each(|s| validate_skill(s));
        }
        SectionContent::Experience(v) => v.iter().cloned().map(Entry::Experience).collect(),
        SectionContent::Education(v) => v.iter().cloned().map(Entry::Education).collect(),
        SectionContent::Projects(v) => v.iter().cloned().map(Entry::Project).collect(),
        SectionContent::Certifications(v) => {
            v.iter().cloned().map(Entry::Certification).collect()
        }
    };

    let missing: Vec<MissingField> = entries
        .iter()
        .flat_map(|e| check_entry(e).missing)
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    let described: Vec<String> = missing
        .iter()
        .map(|m| {
            if m.entry_id.is_empty() {
                m.field.to_string()
            } else {
                format!("{} (entry {})", m.field, m.entry_id)
            }
        })
        .collect();
    Err(EditError::Validation(format!(
        "{} content is missing required field(s): {}",
        content.kind(),
        described.join(", ")
    )))
}
