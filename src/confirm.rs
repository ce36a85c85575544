use crate::changeset::ChangeSet;
use crate::console::Console;
use crate::constants::DIFF_SIZE_WARNING_BYTES;
use crate::git::status_char_label;
use crate::provider::Candidate;
use crate::ui;
use anyhow::Result;
use num_format::{Locale, ToFormattedString};

const MAX_FILES_TO_SHOW: usize = 10;

const ACTION_PROMPT: &str = "(a)ccept / (e)dit / (r)etry / (q)uit: ";
const INVALID_OPTION: &str = "invalid option, choose (a)ccept, (e)dit, (r)etry, or (q)uit";
const NOTHING_TO_COMMIT: &str = "generation failed, there is no message to commit; (r)etry or (q)uit";

/// the side effects the confirmation loop drives
pub trait Workflow {
    /// run the builder, compiler and gateway once
    ///
    /// `None` when the user cancelled before anything was sent
    fn generate(&mut self, console: &mut dyn Console) -> Result<Option<Candidate>>;
    /// commit with `message`, returning whether the commit succeeded
    fn commit(&mut self, message: &str) -> Result<bool>;
    /// let the user rewrite `message` in an external editor
    fn edit(&mut self, message: &str) -> Result<String>;
}

/// how a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NothingToCommit,
    Committed { edited: bool },
    CommitFailed,
    Cancelled,
}

impl Outcome {
    /// whether the process should exit non-zero; only a failed commit does
    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::CommitFailed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Accept,
    Edit,
    Retry,
    Quit,
}

impl Action {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" => Some(Action::Accept),
            "e" => Some(Action::Edit),
            "r" => Some(Action::Retry),
            "q" => Some(Action::Quit),
            _ => None,
        }
    }
}

struct ConfirmationSession {
    candidate: Candidate,
    is_retry: bool,
}

/// generate a first candidate for `changeset` and hand it to the loop
///
/// an empty diff ends the run before anything is generated
pub fn run(
    console: &mut dyn Console,
    changeset: &ChangeSet,
    workflow: &mut dyn Workflow,
) -> Result<Outcome> {
    if changeset.is_empty() {
        console.warning(&format!("no {} to commit", changeset.describe_source()));
        return Ok(Outcome::NothingToCommit);
    }

    describe_changes(console, changeset);
    match workflow.generate(console)? {
        Some(first) => confirm(console, workflow, first),
        None => Ok(Outcome::Cancelled),
    }
}

fn describe_changes(console: &mut dyn Console, changeset: &ChangeSet) {
    let file_count = changeset.files.len();
    let file_word = if file_count == 1 { "file" } else { "files" };
    console.status(&format!(
        "generating from {} touching {file_count} {file_word}...",
        changeset.describe_source()
    ));

    for file in changeset.files.iter().take(MAX_FILES_TO_SHOW) {
        let label = status_char_label(file.status);
        match &file.old_path {
            Some(old_path) => console.info(&format!("{label} {old_path} → {}", file.path)),
            None => console.info(&format!("{label} {}", file.path)),
        }
    }
    if file_count > MAX_FILES_TO_SHOW {
        console.info(&format!("(+{} more)", file_count - MAX_FILES_TO_SHOW));
    }

    let diff_size = changeset.diff.len();
    if diff_size > DIFF_SIZE_WARNING_BYTES {
        console.warning(&format!(
            "diff is large ({} chars), this may use many tokens",
            diff_size.to_formatted_string(&Locale::en)
        ));
    }
}

/// present candidates until the user commits or gives up
pub fn confirm(
    console: &mut dyn Console,
    workflow: &mut dyn Workflow,
    first: Candidate,
) -> Result<Outcome> {
    let mut session = ConfirmationSession {
        candidate: first,
        is_retry: false,
    };

    loop {
        console.info(&ui::frame_candidate(
            session.candidate.display_text(),
            session.is_retry,
        ));
        if let Candidate::Failed(reason) = &session.candidate {
            console.warning(&format!("generation failed: {reason}"));
        }

        loop {
            let Some(input) = console.read_line(ACTION_PROMPT)? else {
                console.status("cancelled");
                return Ok(Outcome::Cancelled);
            };

            match Action::parse(&input) {
                Some(Action::Accept) => {
                    let Some(message) = session.candidate.message() else {
                        console.warning(NOTHING_TO_COMMIT);
                        continue;
                    };
                    return Ok(finish(console, workflow.commit(message), false));
                }
                Some(Action::Edit) => {
                    let Some(message) = session.candidate.message() else {
                        console.warning(NOTHING_TO_COMMIT);
                        continue;
                    };
                    let edited = match workflow.edit(message) {
                        Ok(edited) => edited,
                        Err(e) => {
                            console.error(&format!("{e:#}"));
                            continue;
                        }
                    };
                    if edited.is_empty() {
                        console.warning("edited message is empty, nothing committed");
                        return Ok(Outcome::Cancelled);
                    }
                    return Ok(finish(console, workflow.commit(&edited), true));
                }
                Some(Action::Retry) => {
                    console.status("regenerating...");
                    let Some(candidate) = workflow.generate(console)? else {
                        return Ok(Outcome::Cancelled);
                    };
                    session.candidate = candidate;
                    session.is_retry = true;
                    break;
                }
                Some(Action::Quit) => {
                    console.status("cancelled");
                    return Ok(Outcome::Cancelled);
                }
                None => console.warning(INVALID_OPTION),
            }
        }
    }
}

fn finish(console: &mut dyn Console, committed: Result<bool>, edited: bool) -> Outcome {
    match committed {
        Ok(true) => {
            console.status(if edited {
                "committed edited message"
            } else {
                "committed"
            });
            Outcome::Committed { edited }
        }
        Ok(false) => {
            console.error("commit failed");
            Outcome::CommitFailed
        }
        Err(e) => {
            console.error(&format!("commit failed: {e:#}"));
            Outcome::CommitFailed
        }
    }
}
