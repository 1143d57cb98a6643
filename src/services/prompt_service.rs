use crate::dto::assessment_dto::GenerationRequest;
use crate::models::question::{AnswerPair, ScoreResult};
use crate::models::recommendation::Link;
use crate::utils::text::fill_template;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Vocabulary and focus areas for one trade. Adding a trade means adding one
/// of these; nothing downstream of the prompt cares which one matched.
#[derive(Debug, Clone)]
pub struct DomainTemplate {
    pub key: String,
    pub title: String,
    pub keywords: Vec<String>,
    pub focus_areas: Vec<String>,
    pub preserved_terms: Vec<String>,
    pub study_links: Vec<Link>,
}

impl DomainTemplate {
    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct LanguagePolicy {
    pub body_language: String,
    pub term_script: String,
}

impl Default for LanguagePolicy {
    fn default() -> Self {
        Self {
            body_language: "Marathi".to_string(),
            term_script: "English script (Roman, A-Z)".to_string(),
        }
    }
}

/// Labels the report must use for its score card, with their maxima.
pub const REPORT_CATEGORIES: &[(&str, u32)] = &[
    ("Technical Proficiency", 10),
    ("Communication", 10),
    ("Decision-making", 10),
    ("Confidence", 10),
    ("Language Fluency", 10),
    ("Overall Score", 50),
];

const GENERAL_TERMS: &[&str] = &[
    "Circuit",
    "SOP",
    "Standard Operating Procedure",
    "Quality Control",
    "Insulator",
    "Soldering",
];

const QUESTION_SYSTEM_PROMPT: &str = r#"You are a senior technical examiner and industrial specialist.
Your goal is to generate high-depth, practical and UNIQUE Multiple Choice Questions (MCQs) for entry-level engineering and manufacturing trainees.

LINGUISTIC AND GRAMMAR RULES:
1. Write the general language of each question in proper, formal, grammatically correct {language}.
2. Keep every technical, theoretical and management term in {script} exactly as written. Never translate or transliterate these terms. Examples: {terms}.
3. Technical terms stay in {script} even inside {language} sentences.
4. All OPTIONS must be written in {script} so the technical meaning is unambiguous.
5. Never generate school mathematics or general academic syllabus questions.

You must output strictly valid JSON only. Do not add markdown formatting or any text outside the JSON."#;

const QUESTION_USER_PROMPT: &str = r#"Create exactly {count} UNIQUE and high-depth MCQ questions for {target}.

STRICT VARIETY RULES:
- Each question must cover a different sub-topic. Do not repeat a theme.
- Range from basic definitions to practical troubleshooting ("What will you do if...").

TECHNICAL CONTEXT:
{context}

FORMATTING RULES:
- Output a single JSON object with one key "questions" holding an array of exactly {count} items.
- Every item has exactly 4 options.
- "correctAnswer" must be copied character for character from one of the options.
- Keep JSON keys in English.
- JSON structure:
{
  "questions": [
    {
      "id": 1,
      "questionText": "Question text in {language} with technical terms in Roman script",
      "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
      "correctAnswer": "Option 2"
    }
  ]
}"#;

const REPORT_SYSTEM_PROMPT: &str = "You are a helpful teacher speaking {language}. Analyze the trainee's performance and write an encouraging but honest evaluation report.";

const REPORT_USER_PROMPT: &str = r#"The trainee answered {score} out of {total} questions correctly in Subject: {subject} (role: {role}).

Write the whole report in formal {language}. Technical terms ({terms}) MUST stay in {script}.

SCORE CARD:
Use these exact English labels followed by a colon so the system can parse them, for example "Technical Proficiency: 8/10".
{categories}

REPORT STRUCTURE:
1. Score card using the labels above.
2. Detailed analysis of strengths and weaknesses.
3. Key areas to study next.{missed}
4. A plan to improve the score next time.
5. Suggestions: clickable Markdown links [Title](URL) to videos, such as:
{links}
   and exactly 2 specific BOOK TITLES in English script for the field.

Do not list every question individually. Produce one comprehensive report."#;

const REVIEW_USER_PROMPT: &str = r#"Compare the trainee's submitted answers with the original answers for Subject: {subject} (role: {role}).

Write the whole report in formal {language}. Technical terms ({terms}) MUST stay in {script}.

SCORE CARD:
Use these exact English labels followed by a colon so the system can parse them, for example "Technical Proficiency: 8/10".
{categories}

ANSWERS:
{answers}

REPORT STRUCTURE:
1. Score card using the labels above.
2. Detailed analysis of strengths and weaknesses.
3. Specific examples taken from the answers.
4. Suggestions: clickable Markdown links [Title](URL) to videos, such as:
{links}
   and exactly 2 specific BOOK TITLES in English script for the field.

Produce one comprehensive report, not question by question."#;

/// Input for the evaluation report prompt.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub score: ScoreResult,
    pub subject: String,
    pub role: String,
    /// Text of questions answered wrongly, used as study hints.
    pub missed_questions: Vec<String>,
}

const MAX_MISSED_IN_PROMPT: usize = 10;
const MAX_REVIEW_ANSWERS: usize = 50;

/// Input for the answer review prompt.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    pub subject: String,
    pub role: String,
    pub answers: Vec<AnswerPair>,
}

#[derive(Debug, Clone)]
pub struct PromptService {
    templates: Vec<DomainTemplate>,
    language: LanguagePolicy,
    question_count: usize,
}

impl PromptService {
    pub fn new(templates: Vec<DomainTemplate>, language: LanguagePolicy, question_count: usize) -> Self {
        Self {
            templates,
            language,
            question_count,
        }
    }

    pub fn with_defaults(question_count: usize) -> Self {
        Self::new(default_templates(), LanguagePolicy::default(), question_count)
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Templates whose keywords appear in the given text. When none do, every
    /// template is returned so the model still gets trade vocabulary.
    pub fn matching_templates(&self, text: &str) -> Vec<&DomainTemplate> {
        let haystack = text.to_lowercase();
        let matched: Vec<&DomainTemplate> =
            self.templates.iter().filter(|t| t.matches(&haystack)).collect();
        if matched.is_empty() {
            self.templates.iter().collect()
        } else {
            matched
        }
    }

    pub fn question_prompt(&self, req: &GenerationRequest) -> PromptPair {
        let target = describe_target(req);
        let templates = self.matching_templates(&target);
        let terms = preserved_terms(&templates).join(", ");
        let count = self.question_count.to_string();
        let context = templates
            .iter()
            .map(|t| format!("- {}: {}", t.title, t.focus_areas.join(", ")))
            .collect::<Vec<_>>()
            .join("\n");

        PromptPair {
            system: fill_template(
                QUESTION_SYSTEM_PROMPT,
                &[
                    ("language", self.language.body_language.as_str()),
                    ("script", self.language.term_script.as_str()),
                    ("terms", terms.as_str()),
                ],
            ),
            user: fill_template(
                QUESTION_USER_PROMPT,
                &[
                    ("count", count.as_str()),
                    ("target", target.as_str()),
                    ("context", context.as_str()),
                    ("language", self.language.body_language.as_str()),
                ],
            ),
        }
    }

    pub fn report_prompt(&self, ctx: &ReportContext) -> PromptPair {
        let templates = self.matching_templates(&format!("{} {}", ctx.subject, ctx.role));
        let terms = preserved_terms(&templates).join(", ");
        let categories = score_card();
        let links = study_links(&templates);
        let missed = if ctx.missed_questions.is_empty() {
            String::new()
        } else {
            let list = ctx
                .missed_questions
                .iter()
                .take(MAX_MISSED_IN_PROMPT)
                .map(|q| format!("   - {}", q))
                .collect::<Vec<_>>()
                .join("\n");
            format!(" Topics of wrongly answered questions:\n{}", list)
        };
        let score = ctx.score.score.to_string();
        let total = ctx.score.total.to_string();

        PromptPair {
            system: fill_template(REPORT_SYSTEM_PROMPT, &[("language", self.language.body_language.as_str())]),
            user: fill_template(
                REPORT_USER_PROMPT,
                &[
                    ("score", score.as_str()),
                    ("total", total.as_str()),
                    ("subject", ctx.subject.as_str()),
                    ("role", ctx.role.as_str()),
                    ("language", self.language.body_language.as_str()),
                    ("script", self.language.term_script.as_str()),
                    ("terms", terms.as_str()),
                    ("categories", categories.as_str()),
                    ("missed", missed.as_str()),
                    ("links", links.as_str()),
                ],
            ),
        }
    }

    /// Report comparing submitted answers with the original ones. Templates
    /// are matched on subject, role and the question texts.
    pub fn review_prompt(&self, ctx: &ReviewContext) -> PromptPair {
        let mut haystack = format!("{} {}", ctx.subject, ctx.role);
        for pair in &ctx.answers {
            haystack.push(' ');
            haystack.push_str(&pair.question);
        }
        let templates = self.matching_templates(&haystack);
        let terms = preserved_terms(&templates).join(", ");
        let categories = score_card();
        let links = study_links(&templates);
        let answers = ctx
            .answers
            .iter()
            .take(MAX_REVIEW_ANSWERS)
            .enumerate()
            .map(|(idx, pair)| {
                format!(
                    "{}. Q: {}\n   Original answer: {}\n   Submitted answer: {}",
                    idx + 1,
                    pair.question,
                    pair.correct_answer.as_deref().unwrap_or("(none)"),
                    pair.user_answer.as_deref().unwrap_or("(no answer)"),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        PromptPair {
            system: fill_template(REPORT_SYSTEM_PROMPT, &[("language", self.language.body_language.as_str())]),
            user: fill_template(
                REVIEW_USER_PROMPT,
                &[
                    ("subject", ctx.subject.as_str()),
                    ("role", ctx.role.as_str()),
                    ("language", self.language.body_language.as_str()),
                    ("script", self.language.term_script.as_str()),
                    ("terms", terms.as_str()),
                    ("categories", categories.as_str()),
                    ("answers", answers.as_str()),
                    ("links", links.as_str()),
                ],
            ),
        }
    }
}

fn score_card() -> String {
    REPORT_CATEGORIES
        .iter()
        .map(|(label, max)| format!("- {}: <score>/{}", label, max))
        .collect::<Vec<_>>()
        .join("\n")
}

fn study_links(templates: &[&DomainTemplate]) -> String {
    templates
        .iter()
        .flat_map(|t| t.study_links.iter())
        .map(|l| format!("   - [{}]({})", l.title, l.url))
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_target(req: &GenerationRequest) -> String {
    let mut parts = Vec::new();
    if let Some(role) = req.role.as_deref().filter(|v| !v.trim().is_empty()) {
        parts.push(format!("Role {}", role.trim()));
    }
    if let Some(subject) = req.subject.as_deref().filter(|v| !v.trim().is_empty()) {
        parts.push(format!("Subject {}", subject.trim()));
    }
    if let Some(board) = req.board.as_deref().filter(|v| !v.trim().is_empty()) {
        parts.push(format!("Board {}", board.trim()));
    }
    if let Some(level) = req.level.as_deref().filter(|v| !v.trim().is_empty()) {
        parts.push(format!("Level {}", level.trim()));
    }
    parts.join(", ")
}

fn preserved_terms(templates: &[&DomainTemplate]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let all = GENERAL_TERMS
        .iter()
        .map(|t| t.to_string())
        .chain(templates.iter().flat_map(|t| t.preserved_terms.iter().cloned()));
    for term in all {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn link(title: &str, url: &str) -> Link {
    Link {
        title: title.to_string(),
        url: url.to_string(),
    }
}

pub fn default_templates() -> Vec<DomainTemplate> {
    vec![
        DomainTemplate {
            key: "pcb".to_string(),
            title: "PCB (Printed Circuit Board)".to_string(),
            keywords: strings(&["pcb", "printed circuit", "circuit board"]),
            focus_areas: strings(&[
                "Design & Data (Gerber files, DRC, Schematics vs Layout)",
                "Fabrication (Multilayer stack-up, Etching, Prepreg, Soldermask)",
                "Assembly (SMT vs Through-hole, Pick-and-place, Reflow vs Wave soldering, Bridging, Cold joints)",
                "Testing & Quality (AOI, X-Ray, Flying probe, ICT)",
                "Components (Passive vs Active, BGA, QFP, 0603 packages)",
            ]),
            preserved_terms: strings(&[
                "PCB", "SMT", "Gerber", "DRC", "Reflow", "Prepreg", "Soldermask", "AOI", "ICT", "BGA",
            ]),
            study_links: vec![
                link(
                    "PCB design for beginners",
                    "https://www.youtube.com/results?search_query=PCB+design+for+beginners",
                ),
                link(
                    "PCB assembly process",
                    "https://www.youtube.com/results?search_query=PCB+assembly+process",
                ),
            ],
        },
        DomainTemplate {
            key: "aao".to_string(),
            title: "AAO (Automotive Assembly Operator)".to_string(),
            keywords: strings(&["aao", "automotive", "assembly operator", "assembly line"]),
            focus_areas: strings(&[
                "Assembly Process (Torque management, SOP, Assembly sequence)",
                "Tools & Equipment (Pneumatic tools, Jigs and Fixtures, Conveyor operations)",
                "Quality Control (Poka-yoke, Visual inspection, Reject handling)",
                "Safety & Environment (PPE, LOTO, 5S, Forklift safety)",
                "Teamwork & Production (FIFO, Cycle time, Production targets)",
            ]),
            preserved_terms: strings(&[
                "Torque", "Poka-yoke", "PPE", "LOTO", "5S", "FIFO", "Cycle time", "Jigs", "Fixtures",
            ]),
            study_links: vec![
                link(
                    "Automotive assembly line process",
                    "https://www.youtube.com/results?search_query=automotive+assembly+line+process",
                ),
                link(
                    "Automotive assembly operator skills",
                    "https://www.youtube.com/results?search_query=automotive+assembly+operator+skills",
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcb_request() -> GenerationRequest {
        GenerationRequest {
            level: None,
            role: Some("PCB Technician".into()),
            board: Some("MSBTE".into()),
            subject: Some("PCB Assembly".into()),
        }
    }

    #[test]
    fn question_prompt_carries_count_and_json_contract() {
        let prompts = PromptService::with_defaults(25).question_prompt(&pcb_request());
        assert!(prompts.user.contains("exactly 25"));
        assert!(prompts.user.contains("\"questions\""));
        assert!(prompts.user.contains("Role PCB Technician"));
        assert!(prompts.system.contains("strictly valid JSON"));
        assert!(!prompts.user.contains("{count}"));
    }

    #[test]
    fn matched_template_limits_vocabulary() {
        let prompts = PromptService::with_defaults(10).question_prompt(&pcb_request());
        assert!(prompts.system.contains("Gerber"));
        assert!(!prompts.system.contains("LOTO"));
    }

    #[test]
    fn unmatched_request_gets_every_template() {
        let svc = PromptService::with_defaults(10);
        let req = GenerationRequest {
            level: Some("10".into()),
            ..Default::default()
        };
        let prompts = svc.question_prompt(&req);
        assert!(prompts.system.contains("Gerber"));
        assert!(prompts.system.contains("LOTO"));
    }

    #[test]
    fn custom_template_needs_no_code_change() {
        let welding = DomainTemplate {
            key: "welding".into(),
            title: "Welding".into(),
            keywords: vec!["weld".into()],
            focus_areas: vec!["Arc welding".into()],
            preserved_terms: vec!["MIG".into(), "TIG".into()],
            study_links: vec![],
        };
        let svc = PromptService::new(vec![welding], LanguagePolicy::default(), 5);
        let req = GenerationRequest {
            level: None,
            role: Some("Welder".into()),
            board: Some("ITI".into()),
            subject: Some("Welding".into()),
        };
        let prompts = svc.question_prompt(&req);
        assert!(prompts.system.contains("MIG"));
        assert!(prompts.user.contains("Arc welding"));
    }

    #[test]
    fn report_prompt_lists_every_category_label() {
        let svc = PromptService::with_defaults(25);
        let prompts = svc.report_prompt(&ReportContext {
            score: ScoreResult { score: 18, total: 25 },
            subject: "AAO".into(),
            role: "Student".into(),
            missed_questions: vec!["What is LOTO?".into()],
        });
        for (label, max) in REPORT_CATEGORIES {
            assert!(prompts.user.contains(&format!("{}: <score>/{}", label, max)));
        }
        assert!(prompts.user.contains("18 out of 25"));
        assert!(prompts.user.contains("What is LOTO?"));
        assert!(prompts.user.contains("automotive+assembly+line+process"));
    }

    #[test]
    fn review_prompt_lists_answers_and_score_card() {
        let svc = PromptService::with_defaults(25);
        let prompts = svc.review_prompt(&ReviewContext {
            subject: "General".into(),
            role: "Student".into(),
            answers: vec![AnswerPair {
                question: "What is reflow soldering in PCB assembly?".into(),
                correct_answer: Some("Melting paste in an oven".into()),
                user_answer: None,
            }],
        });
        for (label, max) in REPORT_CATEGORIES {
            assert!(prompts.user.contains(&format!("{}: <score>/{}", label, max)));
        }
        assert!(prompts.user.contains("1. Q: What is reflow soldering"));
        assert!(prompts.user.contains("Original answer: Melting paste in an oven"));
        assert!(prompts.user.contains("Submitted answer: (no answer)"));
        assert!(prompts.user.contains("PCB+design+for+beginners"));
        assert!(!prompts.user.contains("automotive+assembly"));
    }

    #[test]
    fn placeholders_in_user_text_are_not_expanded() {
        let svc = PromptService::with_defaults(25);
        let prompts = svc.report_prompt(&ReportContext {
            score: ScoreResult { score: 1, total: 2 },
            subject: "AAO {links}".into(),
            role: "{language}".into(),
            missed_questions: vec!["Why {terms}?".into()],
        });
        assert!(prompts.user.contains("Subject: AAO {links} (role: {language})"));
        assert!(prompts.user.contains("Why {terms}?"));
    }
}
