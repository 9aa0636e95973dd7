//! Cover letter draft template: personal details block, salutation, the four
//! selected sections, signature.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::generation::section::SectionId;

const NAME_PLACEHOLDER: &str = "[Your Name]";
const ADDRESS_PLACEHOLDER: &str = "[Your Address]";
const EMAIL_PLACEHOLDER: &str = "[Your Email]";
const PHONE_PLACEHOLDER: &str = "[Your Phone Number]";

const LINE_BREAK: &str = "<br />\n";

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b").expect("email regex is valid")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?|\()?\d{3}[-.\s]?\d{3}[-.\s]?\d{4}")
        .expect("phone regex is valid")
});

/// Contact block at the top of the letter, pulled from the résumé text.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalDetails {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl PersonalDetails {
    /// Name is the first non-empty line; email and phone are the first
    /// pattern matches. Anything not found becomes a bracketed placeholder.
    pub fn from_resume(resume_text: &str) -> Self {
        let name = resume_text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or(NAME_PLACEHOLDER);

        let email = EMAIL
            .find(resume_text)
            .map_or(EMAIL_PLACEHOLDER, |m| m.as_str());

        let phone = PHONE
            .find(resume_text)
            .map_or(PHONE_PLACEHOLDER, |m| m.as_str().trim());

        PersonalDetails {
            name: name.to_string(),
            address: ADDRESS_PLACEHOLDER.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }
}

/// Builds the editable draft. Blocks are separated by blank lines so that
/// cleaning yields one document paragraph per block; lines inside a block
/// end in `<br />`.
pub fn assemble_draft(
    details: &PersonalDetails,
    date: NaiveDate,
    selections: &BTreeMap<SectionId, String>,
) -> String {
    let header = [
        details.name.as_str(),
        details.address.as_str(),
        details.email.as_str(),
        details.phone.as_str(),
        &date.format("%-m/%-d/%Y").to_string(),
    ]
    .join(LINE_BREAK);

    let mut blocks = vec![header, "Dear Hiring Manager,".to_string()];
    blocks.extend(
        SectionId::ALL
            .iter()
            .map(|id| selections.get(id).map(|s| s.trim().to_string()).unwrap_or_default()),
    );
    blocks.push(format!("Sincerely,{LINE_BREAK}{}", details.name));

    blocks.join("\n\n")
}
