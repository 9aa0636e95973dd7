//! The four cover-letter sections, in progression order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionId {
    OpenHook,
    KeyExperiences,
    PersonalValues,
    ClosingStatement,
}

impl SectionId {
    pub const ALL: [SectionId; 4] = [
        SectionId::OpenHook,
        SectionId::KeyExperiences,
        SectionId::PersonalValues,
        SectionId::ClosingStatement,
    ];

    /// Human-readable name, also used in prompts and the dedup key.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::OpenHook => "Open Hook",
            SectionId::KeyExperiences => "Key Experiences",
            SectionId::PersonalValues => "Personal Values",
            SectionId::ClosingStatement => "Closing Statement",
        }
    }

    /// URL slug, e.g. `open-hook` in `/generate-open-hook`.
    pub fn slug(self) -> &'static str {
        match self {
            SectionId::OpenHook => "open-hook",
            SectionId::KeyExperiences => "key-experiences",
            SectionId::PersonalValues => "personal-values",
            SectionId::ClosingStatement => "closing-statement",
        }
    }

    pub fn index(self) -> usize {
        match self {
            SectionId::OpenHook => 0,
            SectionId::KeyExperiences => 1,
            SectionId::PersonalValues => 2,
            SectionId::ClosingStatement => 3,
        }
    }

    pub fn is_last(self) -> bool {
        self.index() == Self::ALL.len() - 1
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the slug, the label or the variant name, case-insensitively.
impl FromStr for SectionId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SectionId::ALL
            .into_iter()
            .find(|section| {
                wanted.eq_ignore_ascii_case(section.slug())
                    || wanted.eq_ignore_ascii_case(section.label())
                    || wanted.eq_ignore_ascii_case(&format!("{section:?}"))
            })
            .ok_or_else(|| AppError::InvalidSection(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_index() {
        for (i, section) in SectionId::ALL.iter().enumerate() {
            assert_eq!(section.index(), i);
        }
        assert!(SectionId::ClosingStatement.is_last());
        assert!(!SectionId::OpenHook.is_last());
    }

    #[test]
    fn test_parse_accepts_slug_label_and_variant() {
        assert_eq!("open-hook".parse::<SectionId>().unwrap(), SectionId::OpenHook);
        assert_eq!(
            "Key Experiences".parse::<SectionId>().unwrap(),
            SectionId::KeyExperiences
        );
        assert_eq!(
            "personalvalues".parse::<SectionId>().unwrap(),
            SectionId::PersonalValues
        );
        assert_eq!(
            " CLOSING-STATEMENT ".parse::<SectionId>().unwrap(),
            SectionId::ClosingStatement
        );
    }

    #[test]
    fn test_parse_rejects_unknown_section() {
        let err = "Cover Note".parse::<SectionId>().unwrap_err();
        assert!(matches!(err, AppError::InvalidSection(ref s) if s == "Cover Note"));
    }

    #[test]
    fn test_serde_uses_variant_names() {
        let json = serde_json::to_string(&SectionId::KeyExperiences).unwrap();
        assert_eq!(json, r#""KeyExperiences""#);
    }
}
