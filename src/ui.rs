use crate::constants::FALLBACK_EDITOR;
use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[macro_export]
macro_rules! paint {
    ($stream:ident, $colour:ident, $($arg:tt)*) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::$stream(), "{}", format!($($arg)*).$colour());
    }};
}

#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {
        $crate::paint!(stderr, yellow, $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::paint!(stderr, red, $($arg)*)
    };
}

#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        $crate::paint!(stdout, green, $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    () => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout());
    }};
    ($($arg:tt)*) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), $($arg)*);
    }};
}

const TAGLINES: &[&str] = &[
    "Commit smarter, not harder ✨",
    "You wrote it. Now help Future You understand it.",
    "Turning \"what did I do\" into \"ahh, that's what I did\"",
    "Let commits speak for you",
    "Commit messages that stop archaeology",
    "One good commit message may save someone an hour",
    "Take a moment to document ☕",
    "Sins of omission haunt your git blame\nConfess now, or repent at merge-time",
    "Do the right thing or be lazy? Why not both?",
];

const SPINNER_FRAMES: &[&str] = &[
    "●    ", " ●   ", "  ●  ", "   ● ", "    ●", "   ● ", "  ●  ", " ●   ", "     ",
];

/// boxed welcome banner around the tagline at `index` (wrapping)
pub fn welcome_banner(index: usize) -> String {
    let width = TAGLINES
        .iter()
        .flat_map(|t| t.lines())
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        + 4;

    let tagline = TAGLINES[index % TAGLINES.len()];
    let body: Vec<String> = tagline
        .lines()
        .map(|line| format!("│{:^width$}│", line))
        .collect();

    let title = format!("{:^width$}", "👋 Welcome to AutoCommit", width = width + 2);
    format!(
        "\n{}\n╭{rule}╮\n{}\n╰{rule}╯\n",
        title.trim_end(),
        body.join("\n"),
        rule = "─".repeat(width)
    )
}

/// tagline index that varies between runs
pub fn tagline_index() -> usize {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0)
}

/// frame the candidate message so it stands apart from the prompts around it
pub fn frame_candidate(text: &str, is_retry: bool) -> String {
    let border = format!("🤖 {} 🤖", "─".repeat(60));
    let retry = if is_retry { "\n🔄 RETRY\n" } else { "" };
    format!("{retry}\n{border}\n{text}\n{border}\n")
}

/// progress notifications for the slow steps of a generation
pub trait StepIndicator {
    fn start(&mut self, step: &str);
    fn complete(&mut self);
    fn fail(&mut self, reason: &str);
}

/// terminal spinner, cleared before any completion line is printed
#[derive(Default)]
pub struct Spinner {
    bar: Option<ProgressBar>,
    step: String,
}

impl StepIndicator for Spinner {
    fn start(&mut self, step: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        let style = ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(step.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        self.step = step.to_string();
        self.bar = Some(bar);
    }

    fn complete(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            crate::status!("✓ {}", self.step);
        }
    }

    fn fail(&mut self, reason: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            crate::error!("✗ {} - {}", self.step, reason);
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// indicator for non-interactive use, records nothing and prints nothing
pub struct Silent;

impl StepIndicator for Silent {
    fn start(&mut self, _step: &str) {}
    fn complete(&mut self) {}
    fn fail(&mut self, _reason: &str) {}
}

/// editor command from `VISUAL`, then `EDITOR`, then nano
pub fn resolve_editor() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// open `text` in `editor` and return the trimmed result once it exits
///
/// the temporary file is removed before returning
pub fn edit_with(editor: &str, text: &str) -> Result<String> {
    use std::fs;
    use std::io::Write;
    use std::process::Command;
    use tempfile::Builder;

    let mut temp_file = Builder::new()
        .prefix("autocommit-msg-")
        .suffix(".txt")
        .tempfile()
        .context("failed to create temporary file")?;

    temp_file
        .write_all(text.as_bytes())
        .context("failed to write to temporary file")?;
    temp_file
        .flush()
        .context("failed to flush temporary file")?;

    // run the editor via shell to properly handle arguments in EDITOR
    let quoted_path = shlex::try_quote(&temp_file.path().to_string_lossy())
        .context("temporary file path cannot be quoted")?
        .into_owned();
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{editor} {quoted_path}"))
        .status()
        .with_context(|| format!("failed to run editor: {editor}"))?;

    if !status.success() {
        bail!("editor exited with {status}");
    }

    let edited = fs::read_to_string(temp_file.path())
        .context("failed to read edited message")?
        .trim()
        .to_string();

    temp_file
        .close()
        .context("failed to remove temporary file")?;

    Ok(edited)
}
