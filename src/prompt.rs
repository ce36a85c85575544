use crate::constants::MR_MAX_CHARS;
use crate::generation::{GenerationConfig, Mode, clamp_max_lines};

const PERSONA: &[&str] = &[
    "You are a senior software engineer writing a Pull Request (PR) or Merge Request (MR) description for a project.",
    "You are given a Git patch (diff) representing code changes from a feature branch.",
    "",
];

const EXPLAIN_DESIGN: &[&str] = &[
    "For each code change, include brief, natural explanations of the design intention or architectural reasoning.",
];

const CHANGELOG: &[&str] = &[
    "Focus only on user-facing changes that would matter in a changelog.",
    "Write like you're documenting a release - what will users notice?",
];

const INTERNAL: &[&str] = &[
    "Keep it minimal and technical - this is an internal note-to-self.",
    "Use shorthand that other developers on the team would understand.",
];

const TITLE_RULES: &str = "**Title (50-72 chars):** Capitalize system names as proper nouns. Be specific about what changed in each system. Use precise verbs: refactor, rebuild, migrate, implement.";

const LONGFORM: &[&str] = &[
    "Write a comprehensive technical commit message with detailed narrative explanations.",
    "",
    TITLE_RULES,
    "",
    "**Body:** Lead with 1-2 sentences summarizing technical scope. Write detailed paragraphs explaining the technical reasoning and implementation details for each major change. Use flowing narrative that explains the \"why\" behind technical decisions.",
    "",
    "**Additional changes:** Always format as bulleted list for secondary updates.",
    "",
    "**Language:** Use domain-appropriate terminology with detailed explanations. Include user experience impact and technical trade-offs.",
];

const SCANNABLE: &[&str] = &[
    "Write a scannable technical commit message optimized for maintainers and code reviewers.",
    "",
    TITLE_RULES,
    "",
    "**Body:** Lead with 1-2 sentences summarizing technical scope. Use bullet points for major changes in distinct systems/areas. Keep descriptions focused on technical implementation details.",
    "",
    "**Additional changes:** Always format as bulleted list for secondary updates.",
    "",
    "**Language:** Use precise technical language that matches actual complexity. Focus on what was changed and how, not lengthy explanations of why.",
];

const MINIMAL: &[&str] = &[
    "Write a concise, technical Git commit message in imperative mood.",
    "Be specific about what systems or components were changed.",
    "Start with the main technical accomplishment in 50-72 characters.",
    "Capitalize feature/page names as proper nouns: \"About Page\", \"Photography Gallery\", \"User Dashboard\".",
    "Include key technical terms: component names, layout systems, or technologies used.",
    "Use precise technical verbs: \"refactor\", \"rebuild\", \"migrate\", \"implement\", \"replace\".",
    "Focus on what was built, fixed, or refactored - not individual files.",
    "Connect multiple related changes into a single coherent statement.",
    "Skip trivial formatting or test updates unless they're the primary change.",
    "Output only the commit message - no explanations or prefatory text.",
];

const MR_SECTIONS: &[&str] = &[
    "Your task is to generate a concise and professional GitLab MR description with the following sections, using markdown format:",
    "",
    "**TITLE:** Perfectly captures what this changeset does. Should be specific enough that someone could understand the scope without reading the description.",
    "",
    "**1) SUMMARY:** Speak as the author in a casual but still detail-oriented manner. Answer what this changeset accomplishes and why it was needed to a colleague over coffee. Focus on the business/user value, and high-level technical implementation details.",
    "If there are broken states, compilation issues, or clearly unfinished work, mention these limitations clearly (e.g., \"This MR improves the layout system but leaves the authentication flow incomplete\" or \"Refactors the API layer though some endpoints still return 500 errors\").",
    "Frame blocking issues as \"...but leaves X broken/incomplete\" and non-critical issues as \"...with Y intentionally left for future work\" or \"...while keeping Z minimal for now\".",
    "If architectural or design decisions were made, explain WHY these specific technical approaches were chosen. Include trade-offs or alternatives to consider.",
    "",
    "**2) CHANGES:** Bullet points listing major technical changes (e.g., new routes, modules, config changes, service logic, refactors), grouped logically by purpose. Focus on WHAT was changed technically. Avoid repeating details already covered in SUMMARY.",
    "",
    "**3) NOTES FOR REVIEWERS (optional):** Things that require fresh eyes or different perspectives - complex logic that needs validation, potential edge cases, security considerations, performance implications, accessibility concerns, or areas where the implementation might have unintended consequences that the author might have missed.",
    "",
    "Requirements:",
    "- Each section should complement, not repeat, information from other sections. e.g. CHANGES can explain technical specifics but never repeat what was said in SUMMARY",
    "- SUMMARY should be business/product focused (what user/stakeholder value was delivered)",
    "- SUMMARY should be honest about completeness - clearly state if anything is broken, incomplete, or non-functional",
    "- CHANGES should be technical implementation focused (what code/systems were modified)",
    "- NOTES FOR REVIEWERS should be review-process focused (what reviewers should pay attention to)",
];

const MR_TONE: &str =
    "- Use neutral, descriptive language grounded in the changes in the code diff";

/// render the instruction block for `config` followed by the raw diff
///
/// pure: the same inputs always produce the same bytes, and the diff is
/// passed through untouched
pub fn compile(config: &GenerationConfig, diff: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(max_lines) = clamp_max_lines(config.max_lines) {
        lines.push(format!(
            "CRITICAL CONSTRAINT: Your response must contain NO MORE than {max_lines} bullet points."
        ));
        lines.push("This constraint overrides ALL other formatting instructions.".to_string());
        lines.push(
            "If you have more items, combine related changes into single bullet points."
                .to_string(),
        );
        lines.push(String::new());
    }

    extend(&mut lines, PERSONA);

    match config.mode {
        Mode::Mr => {
            extend(&mut lines, MR_SECTIONS);
            lines.push(format!(
                "- Total length must be under {MR_MAX_CHARS} characters (including section headings)"
            ));
            lines.push(MR_TONE.to_string());
        }
        Mode::Commit => {
            if config.explain_design {
                extend(&mut lines, EXPLAIN_DESIGN);
            }
            if config.changelog {
                extend(&mut lines, CHANGELOG);
            }
            if config.internal {
                extend(&mut lines, INTERNAL);
            }

            if !config.has_persona_modifiers() {
                extend(&mut lines, MINIMAL);
            } else if config.longform {
                extend(&mut lines, LONGFORM);
            } else {
                extend(&mut lines, SCANNABLE);
            }
        }
    }

    let mut prompt = lines.join("\n");
    prompt.push_str("\n\nGit diff:\n---\n");
    prompt.push_str(diff);
    prompt
}

fn extend(lines: &mut Vec<String>, block: &[&str]) {
    lines.extend(block.iter().map(|line| (*line).to_string()));
}
