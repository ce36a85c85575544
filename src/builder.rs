use crate::config::ProviderConfig;
use crate::console::Console;
use crate::constants::MAX_LINES_LIMIT;
use crate::generation::{GenerationConfig, Mode, Preset};
use crate::ui;
use anyhow::Result;
use thiserror::Error;

/// the user closed input part way through the questions
#[derive(Error, Debug)]
#[error("configuration cancelled")]
struct Cancelled;

/// a conditional question, which may never have been put to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    NotAsked,
    No,
    Yes,
}

impl Answer {
    fn is_yes(self) -> bool {
        self == Answer::Yes
    }
}

impl From<bool> for Answer {
    fn from(yes: bool) -> Self {
        if yes { Answer::Yes } else { Answer::No }
    }
}

/// everything the fully custom question sequence collected
#[derive(Debug)]
struct CustomAnswers {
    longform: bool,
    explain_design: bool,
    internal: Answer,
    changelog: Answer,
    max_lines: Option<u8>,
}

impl CustomAnswers {
    fn into_config(self) -> GenerationConfig {
        GenerationConfig {
            mode: Mode::Commit,
            longform: self.longform,
            explain_design: self.explain_design,
            internal: self.internal.is_yes(),
            changelog: self.changelog.is_yes(),
            max_lines: self.max_lines,
            is_preset: false,
        }
    }
}

/// outcome of the free-text max lines question
#[derive(Debug, PartialEq, Eq)]
enum MaxLinesInput {
    Limit(u8),
    Clamped(u8),
    NoLimit,
    Invalid,
}

fn parse_max_lines(raw: &str) -> MaxLinesInput {
    let raw = raw.trim();
    if raw.is_empty() {
        return MaxLinesInput::NoLimit;
    }
    match raw.parse::<u64>() {
        Ok(0) => MaxLinesInput::NoLimit,
        Ok(n) => match u8::try_from(n) {
            Ok(n) if n <= MAX_LINES_LIMIT => MaxLinesInput::Limit(n),
            _ => MaxLinesInput::Clamped(MAX_LINES_LIMIT),
        },
        Err(_) => MaxLinesInput::Invalid,
    }
}

/// resolve the generation config for one attempt, from a preset or questions
///
/// `None` when the user closes input (ctrl-c, ctrl-d) at any question
pub fn build(
    console: &mut dyn Console,
    provider: &ProviderConfig,
) -> Result<Option<GenerationConfig>> {
    match ask_questions(console, provider) {
        Ok(config) => Ok(Some(config)),
        Err(e) if e.is::<Cancelled>() => {
            console.status("cancelled");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn ask_questions(console: &mut dyn Console, provider: &ProviderConfig) -> Result<GenerationConfig> {
    console.info(&ui::welcome_banner(ui::tagline_index()));
    console.info("This tool helps devs document their changes with better commit messages.");
    console.info("Use the default settings or configure to optimize for length or style.");
    console.info(&format!(
        "(Current model: {}, Temp: {}, Target: {})",
        provider.model, provider.temperature, provider.target_branch
    ));

    let gate = read_answer(
        console,
        "(Press Enter to generate the default commit message. Press c to configure.): ",
    )?;
    if gate != "c" {
        console.status(&format!("using {} preset", Preset::Default.name()));
        return Ok(resolved(console, Preset::Default.config()));
    }

    console.status("building custom configuration...");
    let mode = choose(console, "What are you generating?", &["commit", "mr"], "commit")?;
    if mode == "mr" {
        return Ok(resolved(console, GenerationConfig::merge_request()));
    }

    let presets = [Preset::Quick, Preset::Detailed];
    let style = choose(
        console,
        "Commit message style?",
        &[presets[0].name(), presets[1].name(), "custom"],
        Preset::Quick.name(),
    )?;
    let config = match presets.into_iter().find(|preset| preset.name() == style) {
        Some(preset) => preset.config(),
        None => {
            console.status("building fully custom configuration...");
            build_custom(console)?.into_config()
        }
    };

    Ok(resolved(console, config))
}

fn resolved(console: &mut dyn Console, config: GenerationConfig) -> GenerationConfig {
    let config = config.normalized();
    console.status(&format!("using {config}"));
    config
}

fn build_custom(console: &mut dyn Console) -> Result<CustomAnswers> {
    let longform = ask_yes_no(console, "Use detailed narrative format?", false)?;
    let explain_design = ask_yes_no(console, "Add design rationale?", false)?;

    let internal = if explain_design {
        Answer::from(ask_yes_no(console, "Internal/WIP mode?", false)?)
    } else {
        Answer::NotAsked
    };

    let changelog = if internal.is_yes() {
        Answer::NotAsked
    } else {
        Answer::from(ask_yes_no(
            console,
            "Changelog mode (user-visible only)?",
            false,
        )?)
    };

    let max_lines = if ask_yes_no(console, "Set max # of lines?", true)? {
        ask_max_lines(console)?
    } else {
        None
    };

    Ok(CustomAnswers {
        longform,
        explain_design,
        internal,
        changelog,
        max_lines,
    })
}

fn ask_max_lines(console: &mut dyn Console) -> Result<Option<u8>> {
    let raw = read_answer(console, &format!("Enter max # of lines (1-{MAX_LINES_LIMIT}): "))?;
    Ok(match parse_max_lines(&raw) {
        MaxLinesInput::Limit(n) => Some(n),
        MaxLinesInput::Clamped(n) => {
            console.warning(&format!("max lines capped at {n}"));
            Some(n)
        }
        MaxLinesInput::NoLimit => None,
        MaxLinesInput::Invalid => {
            console.warning(&format!("'{raw}' is not a number, using no line limit"));
            None
        }
    })
}

/// trimmed, lowercased answer; closed input cancels the whole sequence
fn read_answer(console: &mut dyn Console, prompt: &str) -> Result<String> {
    let answer = console.read_line(prompt)?.ok_or(Cancelled)?;
    Ok(answer.trim().to_lowercase())
}

fn ask_yes_no(console: &mut dyn Console, question: &str, default: bool) -> Result<bool> {
    let hint = if default { "y*/n" } else { "y/n*" };
    let answer = read_answer(console, &format!("{question} ({hint}) "))?;
    if answer.is_empty() {
        return Ok(default);
    }
    Ok(matches!(answer.as_str(), "y" | "yes" | "true"))
}

fn choose(
    console: &mut dyn Console,
    question: &str,
    options: &[&'static str],
    default: &'static str,
) -> Result<&'static str> {
    let listed: Vec<String> = options
        .iter()
        .map(|opt| {
            let star = if *opt == default { "*" } else { "" };
            format!("({}{star})", opt.to_uppercase())
        })
        .collect();

    let answer = read_answer(console, &format!("{question} {}: ", listed.join(" or ")))?;
    if answer.is_empty() {
        return Ok(default);
    }
    match options.iter().find(|opt| **opt == answer) {
        Some(opt) => Ok(*opt),
        None => {
            console.warning(&format!("unknown choice '{answer}', using '{default}'"));
            Ok(default)
        }
    }
}
