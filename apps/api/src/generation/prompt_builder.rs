//! Prompt Builder: pure mapping from (section, job description, résumé) to an
//! `InstructionPayload`. No I/O.

use crate::generation::prompts::*;
use crate::generation::section::SectionId;
use crate::llm_client::prompts::{
    COVER_LETTER_SYSTEM, GENERATION_TEMPERATURE, SECTION_MAX_TOKENS, SKILL_MATCH_MAX_TOKENS,
    SKILL_MATCH_SYSTEM,
};
use crate::llm_client::InstructionPayload;

struct SectionTemplate {
    brief: &'static str,
    rules: &'static [&'static str],
    examples: &'static [&'static str],
}

fn section_template(section: SectionId) -> SectionTemplate {
    match section {
        SectionId::OpenHook => SectionTemplate {
            brief: OPEN_HOOK_BRIEF,
            rules: OPEN_HOOK_RULES,
            examples: OPEN_HOOK_EXAMPLES,
        },
        SectionId::KeyExperiences => SectionTemplate {
            brief: KEY_EXPERIENCES_BRIEF,
            rules: KEY_EXPERIENCES_RULES,
            examples: KEY_EXPERIENCES_EXAMPLES,
        },
        SectionId::PersonalValues => SectionTemplate {
            brief: PERSONAL_VALUES_BRIEF,
            rules: PERSONAL_VALUES_RULES,
            examples: PERSONAL_VALUES_EXAMPLES,
        },
        SectionId::ClosingStatement => SectionTemplate {
            brief: CLOSING_STATEMENT_BRIEF,
            rules: CLOSING_STATEMENT_RULES,
            examples: CLOSING_STATEMENT_EXAMPLES,
        },
    }
}

/// Builds the instruction payload for one section. Total over `SectionId`;
/// unknown section names are rejected earlier, when parsing into `SectionId`.
pub fn build_section_prompt(
    section: SectionId,
    job_description: &str,
    resume_text: &str,
) -> InstructionPayload {
    let template = section_template(section);

    let rules = template
        .rules
        .iter()
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n");

    let exemplars = template
        .examples
        .iter()
        .enumerate()
        .map(|(i, e)| format!("- Example{}: {e}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = fill_template(
        SECTION_PROMPT_TEMPLATE,
        &[
            ("section_brief", template.brief),
            ("paragraph_rules", &rules),
            ("job_description", job_description),
            ("resume_text", resume_text),
            ("output_grammar", OPTION_OUTPUT_GRAMMAR),
            ("exemplars", &exemplars),
        ],
    );

    InstructionPayload {
        system: COVER_LETTER_SYSTEM.to_string(),
        prompt,
        max_tokens: SECTION_MAX_TOKENS,
        temperature: GENERATION_TEMPERATURE,
    }
}

/// Builds the instruction payload for the skill matching table.
pub fn build_skill_match_prompt(resume_text: &str, job_description: &str) -> InstructionPayload {
    let prompt = fill_template(
        SKILL_MATCH_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_text", resume_text),
            ("example_table", SKILL_MATCH_EXAMPLE_TABLE),
        ],
    );

    InstructionPayload {
        system: SKILL_MATCH_SYSTEM.to_string(),
        prompt,
        max_tokens: SKILL_MATCH_MAX_TOKENS,
        temperature: GENERATION_TEMPERATURE,
    }
}

/// Substitutes `{key}` placeholders in a single left-to-right pass, so text
/// inserted from user input is never re-scanned for placeholders.
/// Unknown `{...}` sequences are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substitution = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });

        match substitution {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
