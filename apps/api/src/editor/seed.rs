use crate::models::resume::{
    Document, Education, EndDate, Experience, PersonalInfo, Section, SectionContent,
};

/// The sample resume every new editing session starts from.
pub fn seed_document() -> Document {
    let personal_info = PersonalInfo {
        full_name: "John Doe".to_string(),
        email: "john.doe@email.com".to_string(),
        phone: "+1 (555) 123-4567".to_string(),
        location: "New York, NY".to_string(),
        website: Some("linkedin.com/in/johndoe".to_string()),
        summary: None,
    };

    let sections = vec![
        Section::new(
            "skills",
            "Skills",
            SectionContent::Skills(
                ["JavaScript", "React", "TypeScript", "Node.js", "Python"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        ),
        Section::new(
            "experience",
            "Work Experience",
            SectionContent::Experience(vec![Experience {
                id: "1".to_string(),
                title: "Senior Software Engineer".to_string(),
                company: "Tech Corp".to_string(),
                location: "San Francisco, CA".to_string(),
                start_date: "2022-01".to_string(),
                end_date: EndDate::Present,
                description: "Led development of React applications and mentored junior developers."
                    .to_string(),
            }]),
        ),
        Section::new(
            "education",
            "Education",
            SectionContent::Education(vec![Education {
                id: "1".to_string(),
                degree: "Bachelor of Science in Computer Science".to_string(),
                school: "University of Technology".to_string(),
                location: "Boston, MA".to_string(),
                start_date: "2018-09".to_string(),
                end_date: EndDate::On("2022-05".to_string()),
                gpa: Some("3.8".to_string()),
            }]),
        ),
    ];

    Document::from_ordered(personal_info, sections)
}
