// All LLM prompt templates for the generation module.
// Placeholders are filled in a single pass by `prompt_builder::fill_template`.

/// Output grammar every section prompt demands.
///
/// `grammar::parse_options` depends on the `Option N:` and `Why Choose This:`
/// literals in this string. Change both together.
pub const OPTION_OUTPUT_GRAMMAR: &str = "Format the output as:
Option 1:
[Paragraph]

Why Choose This: [Explanation]

Option 2:
[Paragraph]

Why Choose This: [Explanation]

Option 3:
[Paragraph]

Why Choose This: [Explanation]";

/// Section prompt template.
/// Replace: {section_brief}, {paragraph_rules}, {job_description}, {resume_text},
///          {output_grammar}, {exemplars}
pub const SECTION_PROMPT_TEMPLATE: &str = "Write three {section_brief} paragraphs for a cover letter in the first person.
Each paragraph should:
{paragraph_rules}
- Avoid any symbols like '**'

Job Description: {job_description}
Resume: {resume_text}

{output_grammar}

Learn from the examples to ensure the contents you generate sound natural, authentic, and true to the user's personality, avoiding generic or AI-like language:
{exemplars}";

pub const OPEN_HOOK_BRIEF: &str = "opening";
pub const OPEN_HOOK_RULES: &[&str] = &[
    "Be short, engaging, and showcase genuine enthusiasm for the company.",
    "Highlight a unique connection to the company's mission, culture, or achievements.",
];
pub const OPEN_HOOK_EXAMPLES: &[&str] = &[
    "I was so excited to see your post on LinkedIn because it's exactly the type of job I'm looking for: an opportunity to bring my experience with video production and enthusiasm for storytelling to an organization that sets the standard for high-quality management content.",
    "I am a second year master's student in MIT's Technology and Policy Program (TPP) writing to apply for a consulting position in Navigant's Emerging Technology & Business Strategy group. After speaking with John Smith at the MIT career fair, I realized that Navigant's values of excellence, continuous development, entrepreneurial spirit, and integrity align with the principles that guide me every day and that have driven me throughout my career. Moreover, I believe that my knowledge of the energy sector, passion for data analysis, polished communication skills, and four years of consulting experience will enable me to deliver superior value for Navigant's clients.",
];

pub const KEY_EXPERIENCES_BRIEF: &str = "key experiences";
pub const KEY_EXPERIENCES_RULES: &[&str] = &[
    "Highlight 2-3 specific achievements or projects from my experience.",
    "Use concrete examples to showcase impact and relevance.",
];
pub const KEY_EXPERIENCES_EXAMPLES: &[&str] = &[
    "In addition to five years of experience in broadcast journalism, research, and video production, I would bring an organized and systems-level perspective to this role. I view video production as a puzzle, and like to think about which parts need to come together in order to make a great final product. My approach is to have in-depth conversations with my team members, and the various stakeholders, before each project. This helps me nail down the logistics, from location to talent. From there, the fun begins: fleshing out the concept and identifying what visuals will best represent it. I know I'm not right all the time, so I enjoy working with a diverse team that can bring in new perspectives, brainstorm, and pitch ideas that will make the final product stronger.",
    "As a graduate student in MIT's Technology and Policy Program, I spend every day at the cutting edge of the energy sector. In my capacity as an MIT Energy Initiative research assistant, I use statistical analysis to investigate trends in public acceptance and regulation related to emerging energy technologies. Graduate classes in data science, energy economics, energy ventures and strategy, and technology policy have prepared me to help Navigant offer the expert services that set it apart from competitors.",
    "Even before MIT, my four years of work experience in consulting, first at LMN Research Group and then at XYZ Consulting, allowed me to develop the skillset that Navigant looks for in candidates. As a science writer and policy analyst at LMN Research Group, I developed superb technical writing and visual communication skills, as well as an ability to communicate and collaborate with clients at federal agencies such as EPA and DOE. As a research analyst at XYZ Consulting, I developed an in-depth understanding of data analysis, program evaluation, and policy design.",
];

pub const PERSONAL_VALUES_BRIEF: &str = "personal values";
pub const PERSONAL_VALUES_RULES: &[&str] = &[
    "Discuss my personal values, passions, and career aspirations.",
    "Show alignment with the company's mission and the role's objectives.",
];
pub const PERSONAL_VALUES_EXAMPLES: &[&str] = &[
    "Given this experience and my enthusiasm for the work you do, I believe I'd make a great addition to your team. I recently had a chance to try out your Patient Zero product at my current organization. The simulation is both challenging and engaging. I was impressed by your ability to apply different storytelling methods to an online training course (which, let's admit, can often be a little dry). Your work exemplifies exactly what I believe: There's an opportunity to tell a compelling story in everything, and all you have to do is deliver it right.",
    "I have always believed that the best work happens when people feel ownership over the problems they solve. That belief is why your commitment to small, autonomous teams stood out to me, and it is the environment where I have done my most meaningful work. Long term, I want to grow into someone who helps other engineers find that same sense of ownership.",
];

pub const CLOSING_STATEMENT_BRIEF: &str = "closing statement";
pub const CLOSING_STATEMENT_RULES: &[&str] = &[
    "Be short, confident, and enthusiastic.",
    "Reflect my unique voice and excitement for the role.",
];
pub const CLOSING_STATEMENT_EXAMPLES: &[&str] = &[
    "I'd love to come in and speak with you more about what I'd be able to offer in this role. Harvard Business Publishing is my top choice and I believe I'd make valuable contributions to your team. Thank you for your time and consideration!",
    "I take pride in my skills and experience in several domains: critical thinking and analysis, communication, and leadership. I note that Navigant values these same ideals, and I very much hope to use my abilities in service of the firm and its clients. Thank you for your time and consideration, I look forward to speaking with you further about my qualifications.",
];

/// Skill matching prompt template.
/// Replace: {job_description}, {resume_text}, {example_table}
pub const SKILL_MATCH_PROMPT_TEMPLATE: &str = "You are an expert job skills matcher. Your task is to match skills in the following resume with the requirements in the job description.

Job Description:
{job_description}

Resume Text:
{resume_text}

Please create a structured table in markdown format with three columns:
- Job Requirement (exact text from the job description).
- Relevant Skills / Experience (relevant experience from the resume that aligns with each job requirement, with a brief description explaining the relevance).
- Match Level (High, Medium, or Low, based on how well the experience matches the requirement).

Ensure each row in the table represents one job requirement matched with one relevant skill or experience from the resume. If there is no match, write \"No matching experience found\" in the \"Relevant Skills / Experience\" column. Follow this format exactly:

{example_table}

Only output the table and nothing else.";

/// The example table shown to the model. The model is expected to echo this shape.
pub const SKILL_MATCH_EXAMPLE_TABLE: &str = "| Job Requirement                         | Relevant Skills / Experience                                                | Match Level |
|-----------------------------------------|-----------------------------------------------------------------------------|-------------|
| Proficiency in JavaScript               | Proficient in JavaScript (ES6+) with experience in frameworks like React.js.| High        |
| Experience with Python                  | Familiar with Python for data analysis and automation tasks.                | Medium      |
| Expertise in cloud infrastructure       | No matching experience found                                                | Low         |";
