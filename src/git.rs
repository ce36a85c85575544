use crate::changeset::{ChangeSet, DiffSource, FileChange};
use anyhow::{Context, Result, bail};
use git2::{Delta, DiffFindOptions, DiffFormat, DiffOptions, Repository, RepositoryState};
use std::path::{Path, PathBuf};

/// locate the working tree root of the repository containing `path`
pub fn repo_root(path: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(path).context("not in a git repository")?;
    match repo.workdir() {
        Some(workdir) => Ok(workdir.to_path_buf()),
        None => bail!("bare repositories are not supported"),
    }
}

/// notices about unusual repository states
///
/// mid-merge, mid-rebase and detached HEAD are reported, never refused
pub fn sanity_check(path: &Path) -> Result<Vec<&'static str>> {
    let repo = Repository::open(path).context("failed to open git repository")?;
    let mut notices = Vec::new();

    if repo.state() != RepositoryState::Clean {
        notices.push("repository is in the middle of an operation (merge, rebase, etc)");
    }
    if repo.head_detached().unwrap_or(false) {
        notices.push("repository is in detached HEAD state");
    }

    Ok(notices)
}

/// collect the diff to summarise from the requested source
///
/// an empty changeset is not an error, callers decide what nothing-to-do means
pub fn get_changes(path: &Path, source: &DiffSource, context_lines: u32) -> Result<ChangeSet> {
    let repo = Repository::open(path).context("failed to open git repository")?;

    let mut opts = DiffOptions::new();
    opts.context_lines(context_lines);

    let mut diff = match source {
        DiffSource::Staged => create_staged_diff(&repo, &mut opts)?,
        DiffSource::Branch(target) => create_branch_diff(&repo, target, &mut opts)?,
    };

    // enable rename detection with lower threshold for better detection
    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    find_opts.rename_threshold(50); // 50% similarity (git default)
    find_opts.copy_threshold(50);
    diff.find_similar(Some(&mut find_opts))
        .context("failed to detect renames")?;

    let files = files_from_git_diff(&diff);
    let diff = format_diff(&diff, &files)?;

    Ok(ChangeSet {
        files,
        diff,
        source: source.clone(),
    })
}

/// index against HEAD, or against the empty tree on an unborn branch
fn create_staged_diff<'r>(
    repo: &'r Repository,
    opts: &mut DiffOptions,
) -> Result<git2::Diff<'r>> {
    let tree = match repo.head() {
        Ok(head) => Some(head.peel_to_tree().context("failed to get HEAD tree")?),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
        Err(e) => return Err(e).context("failed to get HEAD"),
    };

    repo.diff_tree_to_index(tree.as_ref(), None, Some(opts))
        .context("failed to create staged diff")
}

/// HEAD against its merge base with `target`, so upstream commits on the
/// target branch don't show up as changes
fn create_branch_diff<'r>(
    repo: &'r Repository,
    target: &str,
    opts: &mut DiffOptions,
) -> Result<git2::Diff<'r>> {
    let head = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .context("failed to resolve HEAD commit")?;
    let target_commit = repo
        .revparse_single(target)
        .and_then(|object| object.peel_to_commit())
        .with_context(|| format!("failed to resolve target branch {target}"))?;

    let base_oid = repo
        .merge_base(target_commit.id(), head.id())
        .with_context(|| format!("no common ancestor between HEAD and {target}"))?;
    let base_tree = repo
        .find_commit(base_oid)
        .and_then(|commit| commit.tree())
        .context("failed to get merge base tree")?;
    let head_tree = head.tree().context("failed to get HEAD tree")?;

    repo.diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(opts))
        .context("failed to create branch diff")
}

/// extract list of files from a `git2::Diff` using native types
fn files_from_git_diff(diff: &git2::Diff) -> Vec<FileChange> {
    let mut files = Vec::new();

    for delta in diff.deltas() {
        let status = match delta.status() {
            Delta::Deleted => 'D',
            Delta::Modified | Delta::Typechange => 'M',
            Delta::Renamed => 'R',
            Delta::Added | Delta::Copied | Delta::Untracked => 'A',
            _ => continue,
        };

        let (path, old_path) = match delta.status() {
            Delta::Renamed => (
                delta.new_file().path(),
                delta
                    .old_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string()),
            ),
            Delta::Deleted => (delta.old_file().path(), None),
            _ => (delta.new_file().path(), None),
        };

        if let Some(path) = path {
            let path = path.to_string_lossy().to_string();
            let is_binary = delta.new_file().is_binary() || delta.old_file().is_binary();
            let diff_ignored = should_ignore_diff(&path) || is_binary;

            files.push(FileChange {
                status,
                path,
                old_path,
                diff_ignored,
            });
        }
    }

    files
}

/// generated files whose contents only add noise to the prompt
fn should_ignore_diff(path: &str) -> bool {
    let path_lower = path.to_lowercase();

    if path_lower.ends_with("-lock.json") || path_lower.ends_with("-lock.yaml") {
        return true;
    }

    if Path::new(&path_lower)
        .extension()
        .is_some_and(|ext| ext == "lock")
    {
        return true;
    }

    path_lower.ends_with(".min.js")
        || path_lower.ends_with(".min.css")
        || path_lower.ends_with("-min.js")
        || path_lower.ends_with("-min.css")
}

/// render the diff as unified text, replacing ignored files with a one-line note
fn format_diff(diff: &git2::Diff, files: &[FileChange]) -> Result<String> {
    let mut output = String::new();
    let mut skip_current_file = false;

    diff.print(DiffFormat::Patch, |delta, _hunk, line| {
        let origin = line.origin();

        if origin == 'F' {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();

            skip_current_file = files
                .iter()
                .find(|f| f.path == path)
                .is_some_and(|f| f.diff_ignored);

            if skip_current_file {
                use std::fmt::Write;
                let _ = writeln!(output, "--- {path} (diff ignored)");
                return true;
            }
        }

        if skip_current_file {
            return true;
        }

        if matches!(origin, '+' | '-' | ' ') {
            output.push(origin);
        }
        output.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .context("failed to format diff")?;

    Ok(output.trim_end_matches('\n').to_string())
}

/// create a commit with the given message, returning whether git succeeded
///
/// uses the git binary rather than git2 so commit signing and hooks
/// (pre-commit, commit-msg, etc.) behave as they do for a manual commit
pub fn commit(path: &Path, message: &str) -> Result<bool> {
    let status = std::process::Command::new("git")
        .arg("commit")
        .arg("--message")
        .arg(message)
        .current_dir(path)
        .status()
        .context("failed to run git commit")?;

    if !status.success() {
        tracing::debug!(%status, "git commit exited unsuccessfully");
    }
    Ok(status.success())
}

pub fn status_char_label(status: char) -> &'static str {
    match status {
        'A' => "added",
        'D' => "deleted",
        'R' => "renamed",
        _ => "modified",
    }
}

#[cfg(test)]
mod tests;
