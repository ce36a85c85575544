use crate::{error, info, status, warning};
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// the interactive input/output handle shared by every prompt in a run
///
/// `read_line` returns `None` when the user closes input (ctrl-c, ctrl-d)
pub trait Console {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
    fn status(&mut self, text: &str);
    fn info(&mut self, text: &str);
    fn warning(&mut self, text: &str);
    fn error(&mut self, text: &str);
}

/// the line editing primitive a `Terminal` drives
pub trait LineReader {
    fn readline(&mut self, prompt: &str) -> rustyline::Result<String>;
}

impl LineReader for DefaultEditor {
    fn readline(&mut self, prompt: &str) -> rustyline::Result<String> {
        rustyline::Editor::readline(self, prompt)
    }
}

type Opener<R> = Box<dyn FnMut() -> rustyline::Result<R>>;

/// line editor backed console
///
/// the editor is created on first read and released exactly once, either by
/// an explicit `close` or on drop; reading after `close` acquires a new one
pub struct Terminal<R: LineReader = DefaultEditor> {
    editor: Option<R>,
    open: Opener<R>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::with_opener(DefaultEditor::new)
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: LineReader> Terminal<R> {
    pub fn with_opener(open: impl FnMut() -> rustyline::Result<R> + 'static) -> Self {
        Self {
            editor: None,
            open: Box::new(open),
        }
    }

    fn editor(&mut self) -> Result<&mut R> {
        if self.editor.is_none() {
            tracing::debug!("acquiring line editor");
            self.editor = Some((self.open)().context("failed to initialise line editor")?);
        }
        self.editor
            .as_mut()
            .context("line editor unavailable after initialisation")
    }

    pub fn close(&mut self) {
        if self.editor.take().is_some() {
            tracing::debug!("released line editor");
        }
    }
}

impl<R: LineReader> Drop for Terminal<R> {
    fn drop(&mut self) {
        self.close();
    }
}

/// what to echo when input is closed: `^C` for an interrupt, a bare newline
/// for end of file
fn closed_input_echo(e: &ReadlineError) -> &'static str {
    match e {
        ReadlineError::Interrupted => "^C",
        _ => "",
    }
}

impl<R: LineReader> Console for Terminal<R> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor()?.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(e @ (ReadlineError::Interrupted | ReadlineError::Eof)) => {
                info!("{}", closed_input_echo(&e));
                Ok(None)
            }
            Err(e) => Err(e).context("failed to read input"),
        }
    }

    fn status(&mut self, text: &str) {
        status!("{text}");
    }

    fn info(&mut self, text: &str) {
        info!("{text}");
    }

    fn warning(&mut self, text: &str) {
        warning!("{text}");
    }

    fn error(&mut self, text: &str) {
        error!("{text}");
    }
}
