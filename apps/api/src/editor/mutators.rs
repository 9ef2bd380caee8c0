//! Section mutators. Every edit to a resume goes through one of these.
//!
//! Each function takes the current snapshot by reference and returns a brand
//! new `Document` or an `EditError`. The input is never modified, so a failed
//! edit leaves the caller's snapshot exactly as it was. No clocks, no
//! randomness: identical inputs give identical outputs, including the ids
//! handed out to new entries and sections.

use std::collections::HashSet;

use crate::editor::validation::{validate_content, validate_entry, validate_skill};
use crate::errors::EditError;
use crate::models::resume::{
    Document, Entry, EntryRecord, PersonalField, Section, SectionContent, SectionKind,
};

// ────────────────────────────────────────────────────────────────────────────
// Personal info
// ────────────────────────────────────────────────────────────────────────────

/// Replaces one personal-info field. An empty value clears an optional field.
pub fn update_personal_info(
    document: &Document,
    field: &str,
    value: &str,
) -> Result<Document, EditError> {
    let field = PersonalField::parse(field).ok_or_else(|| {
        EditError::Validation(format!("'{field}' is not a personal info field"))
    })?;

    let optional = |v: &str| {
        if v.trim().is_empty() {
            None
        } else {
            Some(v.to_string())
        }
    };

    let mut info = document.personal_info().clone();
    match field {
        PersonalField::FullName => info.full_name = value.to_string(),
        PersonalField::Email => info.email = value.to_string(),
        PersonalField::Phone => info.phone = value.to_string(),
        PersonalField::Location => info.location = value.to_string(),
        PersonalField::Website => info.website = optional(value),
        PersonalField::Summary => info.summary = optional(value),
    }

    Ok(Document::from_ordered(info, document.sections().to_vec()))
}

// ────────────────────────────────────────────────────────────────────────────
// Section content
// ────────────────────────────────────────────────────────────────────────────

/// Replaces a section's entry list with `delta`.
///
/// The delta must be of the section's kind. Entries without an id get a fresh
/// one; two entries sharing an id are rejected.
pub fn update_section_content(
    document: &Document,
    section_id: &str,
    delta: SectionContent,
) -> Result<Document, EditError> {
    with_section(document, section_id, |section| {
        if delta.kind() != section.kind() {
            return Err(EditError::Validation(format!(
                "cannot store {} content in {} section '{}'",
                delta.kind(),
                section.kind(),
                section.id
            )));
        }
        validate_content(&delta)?;
        section.content = assign_entry_ids(delta)?;
        Ok(())
    })
}

/// Appends an entry. A missing or already-taken id is replaced with a fresh one.
pub fn add_entry(document: &Document, section_id: &str, entry: Entry) -> Result<Document, EditError> {
    validate_entry(&entry)?;
    with_section(document, section_id, |section| {
        match (&mut section.content, entry) {
            (SectionContent::Experience(items), Entry::Experience(e)) => push_with_id(items, e),
            (SectionContent::Education(items), Entry::Education(e)) => push_with_id(items, e),
            (SectionContent::Projects(items), Entry::Project(e)) => push_with_id(items, e),
            (SectionContent::Certifications(items), Entry::Certification(e)) => {
                push_with_id(items, e)
            }
            (content, entry) => return Err(kind_mismatch(content.kind(), &entry)),
        }
        Ok(())
    })
}

/// Replaces the entry whose id matches `entry`'s id.
pub fn update_entry(
    document: &Document,
    section_id: &str,
    entry: Entry,
) -> Result<Document, EditError> {
    validate_entry(&entry)?;
    let entry_id = entry.id().to_string();
    with_section(document, section_id, |section| {
        let replaced = match (&mut section.content, entry) {
            (SectionContent::Experience(items), Entry::Experience(e)) => replace_by_id(items, e),
            (SectionContent::Education(items), Entry::Education(e)) => replace_by_id(items, e),
            (SectionContent::Projects(items), Entry::Project(e)) => replace_by_id(items, e),
            (SectionContent::Certifications(items), Entry::Certification(e)) => {
                replace_by_id(items, e)
            }
            (content, entry) => return Err(kind_mismatch(content.kind(), &entry)),
        };
        if !replaced {
            return Err(EditError::NotFound(format!(
                "entry '{entry_id}' in section '{}'",
                section.id
            )));
        }
        Ok(())
    })
}

/// Removes an entry. Removing an id that is not there is a no-op.
pub fn remove_entry(
    document: &Document,
    section_id: &str,
    entry_id: &str,
) -> Result<Document, EditError> {
    let entry_id = entry_id.trim();
    with_section(document, section_id, |section| {
        match &mut section.content {
            SectionContent::Skills(_) => {
                return Err(EditError::Validation(format!(
                    "section '{}' holds skills, not entries",
                    section.id
                )))
            }
            SectionContent::Experience(items) => items.retain(|e| e.id() != entry_id),
            SectionContent::Education(items) => items.retain(|e| e.id() != entry_id),
            SectionContent::Projects(items) => items.retain(|e| e.id() != entry_id),
            SectionContent::Certifications(items) => items.retain(|e| e.id() != entry_id),
        }
        Ok(())
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// Appends a skill to the skills section. Duplicates are kept.
pub fn add_skill(document: &Document, skill: &str) -> Result<Document, EditError> {
    validate_skill(skill)?;
    let skill = skill.trim().to_string();
    with_skills(document, |skills| skills.push(skill))
}

/// Removes every occurrence of `skill` from the skills section.
pub fn remove_skill(document: &Document, skill: &str) -> Result<Document, EditError> {
    let skill = skill.trim();
    with_skills(document, |skills| skills.retain(|s| s != skill))
}

// ────────────────────────────────────────────────────────────────────────────
// Section list
// ────────────────────────────────────────────────────────────────────────────

/// Moves the section at `source_index` to `target_index` and renumbers `order`.
pub fn reorder_sections(
    document: &Document,
    source_index: usize,
    target_index: usize,
) -> Result<Document, EditError> {
    let len = document.len();
    for index in [source_index, target_index] {
        if index >= len {
            return Err(EditError::Range { index, len });
        }
    }

    let mut sections = document.sections().to_vec();
    if source_index != target_index {
        let moved = sections.remove(source_index);
        sections.insert(target_index, moved);
    }
    Ok(Document::from_ordered(
        document.personal_info().clone(),
        sections,
    ))
}

/// Appends an empty section of `kind`. A blank title falls back to the kind's
/// default title.
pub fn add_section(document: &Document, kind: SectionKind, title: &str) -> Document {
    let title = if title.trim().is_empty() {
        kind.default_title().to_string()
    } else {
        title.trim().to_string()
    };
    let mut sections = document.sections().to_vec();
    sections.push(Section::new(
        fresh_section_id(document, kind),
        title,
        SectionContent::empty(kind),
    ));
    Document::from_ordered(document.personal_info().clone(), sections)
}

/// Drops a section together with all of its entries.
pub fn remove_section(document: &Document, section_id: &str) -> Result<Document, EditError> {
    let index = document
        .position_of(section_id)
        .ok_or_else(|| section_not_found(section_id))?;
    let mut sections = document.sections().to_vec();
    sections.remove(index);
    Ok(Document::from_ordered(
        document.personal_info().clone(),
        sections,
    ))
}

pub fn rename_section(
    document: &Document,
    section_id: &str,
    title: &str,
) -> Result<Document, EditError> {
    if title.trim().is_empty() {
        return Err(EditError::Validation("section title cannot be empty".to_string()));
    }
    with_section(document, section_id, |section| {
        section.title = title.trim().to_string();
        Ok(())
    })
}

/// Id for a new section of `kind`: the kind name, then `-2`, `-3`, … on collision.
pub fn fresh_section_id(document: &Document, kind: SectionKind) -> String {
    let base = kind.as_str();
    if document.section(base).is_none() {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| document.section(candidate).is_none())
        .unwrap_or_else(|| base.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn section_not_found(section_id: &str) -> EditError {
    EditError::NotFound(format!("section '{section_id}'"))
}

fn kind_mismatch(kind: SectionKind, entry: &Entry) -> EditError {
    if kind == SectionKind::Skills {
        return EditError::Validation(
            "skills sections hold plain labels; use the skill operations".to_string(),
        );
    }
    EditError::Validation(format!(
        "{} entry cannot be stored in a {} section",
        entry.section_kind(),
        kind
    ))
}

/// Applies `edit` to a copy of one section and returns the resulting document.
fn with_section<F>(document: &Document, section_id: &str, edit: F) -> Result<Document, EditError>
where
    F: FnOnce(&mut Section) -> Result<(), EditError>,
{
    let index = document
        .position_of(section_id)
        .ok_or_else(|| section_not_found(section_id))?;
    let mut sections = document.sections().to_vec();
    edit(&mut sections[index])?;
    Ok(Document::from_ordered(
        document.personal_info().clone(),
        sections,
    ))
}

fn with_skills<F>(document: &Document, edit: F) -> Result<Document, EditError>
where
    F: FnOnce(&mut Vec<String>),
{
    let section_id = document
        .first_of_kind(SectionKind::Skills)
        .map(|s| s.id.clone())
        .ok_or_else(|| EditError::NotFound("skills section".to_string()))?;
    with_section(document, &section_id, |section| {
        if let SectionContent::Skills(skills) = &mut section.content {
            edit(skills);
        }
        Ok(())
    })
}

/// Smallest decimal id not yet used in `items`, starting from `len + 1`.
fn fresh_entry_id<T: EntryRecord>(items: &[T]) -> String {
    let used: HashSet<&str> = items.iter().map(EntryRecord::id).collect();
    let mut n = items.len() + 1;
    while used.contains(n.to_string().as_str()) {
        n += 1;
    }
    n.to_string()
}

/// Stores `entry` under its trimmed id, or a fresh one when that is blank or taken.
fn push_with_id<T: EntryRecord>(items: &mut Vec<T>, mut entry: T) {
    let id = entry.id().trim().to_string();
    if id.is_empty() || items.iter().any(|e| e.id() == id) {
        entry.set_id(fresh_entry_id(items));
    } else {
        entry.set_id(id);
    }
    items.push(entry);
}

fn replace_by_id<T: EntryRecord>(items: &mut [T], mut entry: T) -> bool {
    let id = entry.id().trim().to_string();
    match items.iter_mut().find(|e| e.id() == id) {
        Some(slot) => {
            entry.set_id(id);
            *slot = entry;
            true
        }
        None => false,
    }
}

fn unique_ids<T: EntryRecord>(mut items: Vec<T>) -> Result<Vec<T>, EditError> {
    let mut seen = HashSet::new();
    for item in items.iter_mut() {
        let id = item.id().trim().to_string();
        if !id.is_empty() && !seen.insert(id.clone()) {
            return Err(EditError::Validation(format!("duplicate entry id '{id}'")));
        }
        item.set_id(id);
    }
    for i in 0..items.len() {
        if items[i].id().trim().is_empty() {
            let id = fresh_entry_id(&items);
            items[i].set_id(id);
        }
    }
    Ok(items)
}

fn assign_entry_ids(content: SectionContent) -> Result<SectionContent, EditError> {
    Ok(match content {
        SectionContent::Skills(skills) => {
            SectionContent::Skills(skills.into_iter().map(|s| s.trim().to_string()).collect())
        }
        SectionContent::Experience(v) => SectionContent::Experience(unique_ids(v)?),
        SectionContent::Education(v) => SectionContent::Education(unique_ids(v)?),
        SectionContent::Projects(v) => SectionContent::Projects(unique_ids(v)?),
        SectionContent::Certifications(v) => SectionContent::Certifications(unique_ids(v)?),
    })
}
