use crate::config::{self, GitignoreUpdate, Provider, ProviderConfig};
use crate::console::Console;
use crate::constants::{
    DEFAULT_ANTHROPIC_MODEL, DEFAULT_OPENAI_MODEL, DEFAULT_TARGET_BRANCH, DEFAULT_TEMPERATURE,
    MAX_TEMPERATURE,
};
use crate::git;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

/// directory that receives `.autocommitrc`
///
/// the repository root when `start` is inside a repository, otherwise `start`
/// itself, with a warning
pub fn target_dir(console: &mut dyn Console, start: &Path) -> PathBuf {
    match git::repo_root(start) {
        Ok(root) => root,
        Err(e) => {
            tracing::debug!(error = %e, "setup outside a git repository");
            console.warning(&format!(
                "not inside a git repository, writing .autocommitrc to {}",
                start.display()
            ));
            console.warning(
                "autocommit reads .autocommitrc from the repository root, run setup there",
            );
            start.to_path_buf()
        }
    }
}

/// ask for provider details and write `.autocommitrc` into `repo_root`
pub fn run(console: &mut dyn Console, repo_root: &Path) -> Result<PathBuf> {
    console.status("🛠️  autocommit setup");
    console.info("You can always update .autocommitrc later.");
    console.info("The generated .autocommitrc is added to this repository's .gitignore.");
    console.warning("check .gitignore into version control to avoid leaking API keys");

    let provider = ask_provider(console)?;

    let default_model = match provider {
        Provider::OpenAiCompatible => DEFAULT_OPENAI_MODEL,
        Provider::AnthropicCompatible => DEFAULT_ANTHROPIC_MODEL,
    };
    let model = ask(
        console,
        &format!("Model? (e.g. {default_model}) [{default_model}]: "),
        default_model,
    )?;

    let api_key = ask(console, "Paste your API key (sk-...): ", "")?;
    if api_key.is_empty() {
        bail!("an API key is required, setup aborted");
    }

    let target_branch = ask(
        console,
        &format!("Target branch? [{DEFAULT_TARGET_BRANCH}]: "),
        DEFAULT_TARGET_BRANCH,
    )?;
    let temperature = ask_temperature(console)?;

    let provider_config = ProviderConfig::new(provider, model, temperature, target_branch, api_key);
    provider_config.validate()?;

    let path = config::save(repo_root, &provider_config)?;
    console.status(&format!("✅ {} created", path.display()));

    match config::ensure_gitignored(repo_root)? {
        GitignoreUpdate::Created => console.status("📄 created .gitignore and added .autocommitrc to it"),
        GitignoreUpdate::Appended => console.status("📄 added .autocommitrc to .gitignore"),
        GitignoreUpdate::AlreadyPresent => {
            tracing::debug!(".autocommitrc already listed in .gitignore");
        }
    }

    Ok(path)
}

/// trimmed answer, or `default` when the answer is empty or input is closed
fn ask(console: &mut dyn Console, prompt: &str, default: &str) -> Result<String> {
    let answer = console.read_line(prompt)?.unwrap_or_default();
    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

fn ask_provider(console: &mut dyn Console) -> Result<Provider> {
    let answer = ask(console, "Which provider? (claude/gpt) [claude]: ", "claude")?;
    match answer.to_lowercase().as_str() {
        "claude" | "anthropic" | "anthropic-compatible" => Ok(Provider::AnthropicCompatible),
        "gpt" | "openai" | "openai-compatible" => Ok(Provider::OpenAiCompatible),
        other => bail!("unknown provider '{other}', expected claude or gpt"),
    }
}

fn ask_temperature(console: &mut dyn Console) -> Result<f32> {
    let default = DEFAULT_TEMPERATURE.to_string();
    let answer = ask(console, &format!("Temperature? [{default}]: "), &default)?;
    match answer.parse::<f32>() {
        Ok(t) if (0.0..=MAX_TEMPERATURE).contains(&t) => Ok(t),
        _ => {
            console.warning(&format!(
                "'{answer}' is not a temperature between 0 and {MAX_TEMPERATURE}, using {default}"
            ));
            Ok(DEFAULT_TEMPERATURE)
        }
    }
}
