// Shared system prompts. Each feature module keeps its own user-prompt
// templates in a prompts.rs alongside it.

/// System prompt for every cover-letter section generation call.
pub const COVER_LETTER_SYSTEM: &str = "You are an expert cover letter writer. \
    Your task is to generate high-quality, personalized cover letter sections \
    based on the provided job description and resume.";

/// System prompt for the skill matching call.
pub const SKILL_MATCH_SYSTEM: &str = "You are an expert job skills matcher.";

/// Low temperature keeps the output grammar stable across calls.
pub const GENERATION_TEMPERATURE: f32 = 0.1;

pub const SECTION_MAX_TOKENS: u32 = 2000;
pub const SKILL_MATCH_MAX_TOKENS: u32 = 3000;
