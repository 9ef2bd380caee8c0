//! The resume document: personal info plus an ordered set of typed sections.
//!
//! A `Document` is a value. Nothing here mutates one in place; edits go through
//! `editor::mutators`, which build a fresh document via `Document::from_ordered`
//! so the `order` invariant is restored in exactly one spot.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::EditError;

// ────────────────────────────────────────────────────────────────────────────
// Personal info
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A recognized `PersonalInfo` key. Accepts both the front end's camelCase
/// names and snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Location,
    Website,
    Summary,
}

impl PersonalField {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "fullName" | "full_name" => Some(Self::FullName),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "location" => Some(Self::Location),
            "website" => Some(Self::Website),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

/// End of a date range. `Present` marks an ongoing role or course.
///
/// On the wire this is a plain string. `"present"` in any case, with any
/// surrounding whitespace, is read as the sentinel and always written back as
/// `"Present"`; every other string is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EndDate {
    Present,
    On(String),
}

impl Default for EndDate {
    fn default() -> Self {
        EndDate::On(String::new())
    }
}

impl From<String> for EndDate {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("present") {
            EndDate::Present
        } else {
            EndDate::On(raw)
        }
    }
}

impl From<EndDate> for String {
    fn from(end: EndDate) -> Self {
        end.to_string()
    }
}

impl fmt::Display for EndDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndDate::Present => f.write_str("Present"),
            EndDate::On(date) => f.write_str(date),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: EndDate,
    /// Markdown-capable free text.
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub id: String,
    pub degree: String,
    pub school: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: EndDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub issuer: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Anything stored in a section's entry list under a section-local id.
pub trait EntryRecord: Clone {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_entry_record {
    ($($ty:ty),*) => {
        $(impl EntryRecord for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        })*
    };
}

impl_entry_record!(Experience, Education, Project, Certification);

/// One entry as produced by an editor form, tagged by the kind of list it
/// belongs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Experience(Experience),
    Education(Education),
    Project(Project),
    Certification(Certification),
}

impl Entry {
    pub fn id(&self) -> &str {
        match self {
            Entry::Experience(e) => e.id(),
            Entry::Education(e) => e.id(),
            Entry::Project(e) => e.id(),
            Entry::Certification(e) => e.id(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        match &mut self {
            Entry::Experience(e) => e.set_id(id),
            Entry::Education(e) => e.set_id(id),
            Entry::Project(e) => e.set_id(id),
            Entry::Certification(e) => e.set_id(id),
        }
        self
    }

    /// The section kind whose list holds this entry.
    pub fn section_kind(&self) -> SectionKind {
        match self {
            Entry::Experience(_) => SectionKind::Experience,
            Entry::Education(_) => SectionKind::Education,
            Entry::Project(_) => SectionKind::Projects,
            Entry::Certification(_) => SectionKind::Certifications,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            SectionKind::Skills => "Skills",
            SectionKind::Experience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section's payload. The variant *is* the section kind, so a section can
/// never carry content of the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum SectionContent {
    Skills(Vec<String>),
    Experience(Vec<Experience>),
    Education(Vec<Education>),
    Projects(Vec<Project>),
    Certifications(Vec<Certification>),
}

impl SectionContent {
    pub fn empty(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Skills => SectionContent::Skills(Vec::new()),
            SectionKind::Experience => SectionContent::Experience(Vec::new()),
            SectionKind::Education => SectionContent::Education(Vec::new()),
            SectionKind::Projects => SectionContent::Projects(Vec::new()),
            SectionKind::Certifications => SectionContent::Certifications(Vec::new()),
        }
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            SectionContent::Skills(_) => SectionKind::Skills,
            SectionContent::Experience(_) => SectionKind::Experience,
            SectionContent::Education(_) => SectionKind::Education,
            SectionContent::Projects(_) => SectionKind::Projects,
            SectionContent::Certifications(_) => SectionKind::Certifications,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SectionContent::Skills(v) => v.len(),
            SectionContent::Experience(v) => v.len(),
            SectionContent::Education(v) => v.len(),
            SectionContent::Projects(v) => v.len(),
            SectionContent::Certifications(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry ids in list order. Skills have no ids.
    pub fn entry_ids(&self) -> Vec<&str> {
        fn ids<T: EntryRecord>(items: &[T]) -> Vec<&str> {
            items.iter().map(EntryRecord::id).collect()
        }
        match self {
            SectionContent::Skills(_) => Vec::new(),
            SectionContent::Experience(v) => ids(v),
            SectionContent::Education(v) => ids(v),
            SectionContent::Projects(v) => ids(v),
            SectionContent::Certifications(v) => ids(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    /// Display position. Always equals the section's index in its document.
    pub order: usize,
    pub content: SectionContent,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: SectionContent) -> Self {
        Section {
            id: id.into(),
            title: title.into(),
            order: 0,
            content,
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.content.kind()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDocument")]
pub struct Document {
    personal_info: PersonalInfo,
    sections: Vec<Section>,
}

/// Unchecked wire shape; every deserialized document goes through `Document::new`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    personal_info: PersonalInfo,
    #[serde(default)]
    sections: Vec<Section>,
}

impl TryFrom<RawDocument> for Document {
    type Error = EditError;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        Document::new(raw.personal_info, raw.sections)
    }
}

impl Document {
    /// Builds a document from sections in any order.
    ///
    /// Sections are stably sorted by their incoming `order` and renumbered
    /// 0..n-1. Duplicate section ids, and duplicate entry ids within one
    /// section, are rejected.
    pub fn new(personal_info: PersonalInfo, mut sections: Vec<Section>) -> Result<Self, EditError> {
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id.as_str()) {
                return Err(EditError::Validation(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
            let mut entry_ids = HashSet::new();
            for id in section.content.entry_ids() {
                if !entry_ids.insert(id.trim()) {
                    return Err(EditError::Validation(format!(
                        "duplicate entry id '{}' in section '{}'",
                        id.trim(),
                        section.id
                    )));
                }
            }
        }
        sections.sort_by_key(|s| s.order);
        Ok(Self::from_ordered(personal_info, sections))
    }

    /// Builds a document whose display order is the vector order.
    ///
    /// Callers guarantee id uniqueness; `order` is overwritten.
    pub(crate) fn from_ordered(personal_info: PersonalInfo, mut sections: Vec<Section>) -> Self {
        for (index, section) in sections.iter_mut().enumerate() {
            section.order = index;
        }
        Document {
            personal_info,
            sections,
        }
    }

    pub fn personal_info(&self) -> &PersonalInfo {
        &self.personal_info
    }

    /// Sections in display order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// First section of `kind` in display order.
    pub fn first_of_kind(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind() == kind)
    }

    pub fn ordered_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(id: &str, order: usize, content: SectionContent) -> Section {
        Section {
            id: id.to_string(),
            title: id.to_uppercase(),
            order,
            content,
        }
    }

    #[test]
    fn test_new_normalizes_sparse_order() {
        let doc = Document::new(
            PersonalInfo::default(),
            vec![
                section("education", 40, SectionContent::Education(vec![])),
                section("skills", 3, SectionContent::Skills(vec![])),
                section("experience", 17, SectionContent::Experience(vec![])),
            ],
        )
        .unwrap();

        assert_eq!(doc.ordered_ids(), vec!["skills", "experience", "education"]);
        let orders: Vec<usize> = doc.sections().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_new_keeps_input_order_on_ties() {
        let doc = Document::new(
            PersonalInfo::default(),
            vec![
                section("b", 1, SectionContent::Skills(vec![])),
                section("a", 1, SectionContent::Skills(vec![])),
                section("c", 0, SectionContent::Skills(vec![])),
            ],
        )
        .unwrap();
        assert_eq!(doc.ordered_ids(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_new_rejects_duplicate_section_ids() {
        let err = Document::new(
            PersonalInfo::default(),
            vec![
                section("skills", 0, SectionContent::Skills(vec![])),
                section("skills", 1, SectionContent::Skills(vec![])),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, EditError::Validation(_)));
    }

    #[test]
    fn test_new_rejects_duplicate_entry_ids_in_a_section() {
        let entry = |id: &str| Experience {
            id: id.to_string(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            ..Default::default()
        };
        let err = Document::new(
            PersonalInfo::default(),
            vec![section(
                "experience",
                0,
                SectionContent::Experience(vec![entry("1"), entry("acme"), entry("acme ")]),
            )],
        )
        .unwrap_err();
        assert!(matches!(err, EditError::Validation(ref m) if m.contains("acme")));

        // The same id in two different sections is fine.
        let doc = Document::new(
            PersonalInfo::default(),
            vec![
                section("experience", 0, SectionContent::Experience(vec![entry("1")])),
                section("internships", 1, SectionContent::Experience(vec![entry("1")])),
            ],
        );
        assert!(doc.is_ok());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_entry_ids() {
        let json = r#"{
            "personalInfo": {"fullName": "Ada", "email": "", "phone": "", "location": ""},
            "sections": [
                {"id": "certs", "title": "Certifications", "order": 0,
                 "content": {"kind": "certifications", "items": [
                    {"id": "x", "name": "A", "issuer": "B", "date": "2020"},
                    {"id": "x", "name": "C", "issuer": "D", "date": "2021"}
                 ]}}
            ]
        }"#;
        assert!(serde_json::from_str::<Document>(json).is_err());
    }

    #[test]
    fn test_end_date_present_sentinel() {
        assert_eq!(EndDate::from("present".to_string()), EndDate::Present);
        assert_eq!(EndDate::from(" Present ".to_string()), EndDate::Present);
        assert_eq!(
            EndDate::from("2022-05".to_string()),
            EndDate::On("2022-05".to_string())
        );
        assert_eq!(EndDate::Present.to_string(), "Present");
    }

    #[test]
    fn test_end_date_sentinel_is_written_canonically() {
        let end: EndDate = serde_json::from_str(r#"" present""#).unwrap();
        assert_eq!(serde_json::to_string(&end).unwrap(), r#""Present""#);
        let end: EndDate = serde_json::from_str(r#""2021-06 ""#).unwrap();
        assert_eq!(serde_json::to_string(&end).unwrap(), r#""2021-06 ""#);
    }

    #[test]
    fn test_deserialize_validates_and_normalizes() {
        let json = r#"{
            "personalInfo": {
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "phone": "555",
                "location": "London"
            },
            "sections": [
                {"id": "edu", "title": "Education", "order": 5,
                 "content": {"kind": "education", "items": []}},
                {"id": "sk", "title": "Skills", "order": 2,
                 "content": {"kind": "skills", "items": ["Analysis"]}}
            ]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.ordered_ids(), vec!["sk", "edu"]);
        assert_eq!(doc.section("edu").unwrap().order, 1);
        assert_eq!(doc.first_of_kind(SectionKind::Skills).unwrap().id, "sk");
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        let json = r#"{
            "personalInfo": {"fullName": "", "email": "", "phone": "", "location": ""},
            "sections": [
                {"id": "x", "title": "A", "order": 0, "content": {"kind": "skills", "items": []}},
                {"id": "x", "title": "B", "order": 1, "content": {"kind": "skills", "items": []}}
            ]
        }"#;
        assert!(serde_json::from_str::<Document>(json).is_err());
    }

    #[test]
    fn test_entry_json_is_tagged_by_kind() {
        let entry: Entry = serde_json::from_str(
            r#"{"kind": "experience", "title": "Engineer", "company": "Acme", "endDate": "Present"}"#,
        )
        .unwrap();
        assert_eq!(entry.section_kind(), SectionKind::Experience);
        assert_eq!(entry.id(), "");
        match entry {
            Entry::Experience(exp) => assert_eq!(exp.end_date, EndDate::Present),
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_personal_field_keys() {
        assert_eq!(PersonalField::parse("fullName"), Some(PersonalField::FullName));
        assert_eq!(PersonalField::parse("full_name"), Some(PersonalField::FullName));
        assert_eq!(PersonalField::parse("website"), Some(PersonalField::Website));
        assert_eq!(PersonalField::parse("twitter"), None);
    }
}
