use super::*;
use crate::constants::DEFAULT_CONTEXT;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// helper to initialise a test git repository
fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = Repository::init(temp_dir.path()).unwrap();

    // configure git user for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
    config.set_bool("commit.gpgsign", false).unwrap();

    (temp_dir, repo)
}

/// helper to create a file with content
fn create_file(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

/// helper to stage everything in the working tree
fn stage_all(repo: &Repository) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
}

/// helper to commit all changes
fn commit_all(repo: &Repository, message: &str) -> git2::Oid {
    stage_all(repo);
    let mut index = repo.index().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = repo.signature().unwrap();

    let parent_commit = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent_commit.iter().collect();

    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )
    .unwrap()
}

#[test]
fn test_nothing_staged_is_empty() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("readme.md"), "hello\n");
    commit_all(&repo, "initial commit");

    // unstaged edits are not part of the staged diff
    create_file(&repo_path.join("readme.md"), "hello again\n");

    let changeset = get_changes(repo_path, &DiffSource::Staged, DEFAULT_CONTEXT).unwrap();
    assert!(changeset.is_empty());
    assert!(changeset.files.is_empty());
}

#[test]
fn test_staged_diff_on_unborn_branch() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("main.rs"), "fn main() {}\n");
    stage_all(&repo);

    let changeset = get_changes(repo_path, &DiffSource::Staged, DEFAULT_CONTEXT).unwrap();
    assert!(!changeset.is_empty());
    assert_eq!(changeset.files.len(), 1);
    assert_eq!(changeset.files[0].status, 'A');
    assert!(changeset.diff.contains("+fn main() {}"));
}

#[test]
fn test_file_rename() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("old_name.txt"), "file content");
    commit_all(&repo, "initial commit");

    fs::rename(
        repo_path.join("old_name.txt"),
        repo_path.join("new_name.txt"),
    )
    .unwrap();

    let mut index = repo.index().unwrap();
    index.remove_path(Path::new("old_name.txt")).unwrap();
    index.add_path(Path::new("new_name.txt")).unwrap();
    index.write().unwrap();

    let changeset = get_changes(repo_path, &DiffSource::Staged, DEFAULT_CONTEXT).unwrap();

    assert_eq!(
        changeset.files.len(),
        1,
        "rename detected as single operation"
    );
    let file = &changeset.files[0];
    assert_eq!(file.status, 'R', "status should be R for rename");
    assert_eq!(file.path, "new_name.txt");
    assert_eq!(file.old_path, Some("old_name.txt".to_string()));
}

#[test]
fn test_context_lines_are_honoured() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    let original: String = (1..=30).map(|n| format!("line {n}\n")).collect();
    create_file(&repo_path.join("numbers.txt"), &original);
    commit_all(&repo, "initial commit");

    let edited = original.replace("line 15\n", "line fifteen\n");
    create_file(&repo_path.join("numbers.txt"), &edited);
    stage_all(&repo);

    let narrow = get_changes(repo_path, &DiffSource::Staged, 1).unwrap();
    assert!(narrow.diff.contains(" line 14\n"));
    assert!(!narrow.diff.contains(" line 12\n"));

    let wide = get_changes(repo_path, &DiffSource::Staged, 10).unwrap();
    assert!(wide.diff.contains(" line 6\n"));
    assert!(wide.diff.contains(" line 24\n"));
}

#[test]
fn test_binary_file_is_ignored() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    let binary_content = vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01];
    fs::write(repo_path.join("data.bin"), binary_content).unwrap();
    create_file(&repo_path.join("text.txt"), "text content");
    stage_all(&repo);

    let changeset = get_changes(repo_path, &DiffSource::Staged, DEFAULT_CONTEXT).unwrap();

    let binary_file = changeset
        .files
        .iter()
        .find(|f| f.path == "data.bin")
        .expect("binary file should be in changes");
    assert!(binary_file.diff_ignored);

    let text_file = changeset
        .files
        .iter()
        .find(|f| f.path == "text.txt")
        .expect("text file should be in changes");
    assert!(!text_file.diff_ignored);
    assert!(changeset.diff.contains("+text content"));
}

#[test]
fn test_lock_file_is_ignored() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("Cargo.lock"), "lock content");
    create_file(&repo_path.join("src.rs"), "code content");
    stage_all(&repo);

    let changeset = get_changes(repo_path, &DiffSource::Staged, DEFAULT_CONTEXT).unwrap();

    assert!(changeset.diff.contains("--- Cargo.lock (diff ignored)"));
    assert!(!changeset.diff.contains("lock content"));
    assert!(changeset.diff.contains("+code content"));
}

#[test]
fn test_should_ignore_diff_patterns() {
    assert!(should_ignore_diff("package-lock.json"));
    assert!(should_ignore_diff("pnpm-lock.yaml"));
    assert!(should_ignore_diff("sub/dir/Cargo.LOCK"));
    assert!(should_ignore_diff("static/app.min.js"));
    assert!(should_ignore_diff("static/site-min.css"));
    assert!(!should_ignore_diff("src/lock.rs"));
    assert!(!should_ignore_diff("README.md"));
}

#[test]
fn test_branch_diff_uses_merge_base() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("base.txt"), "base\n");
    let base = commit_all(&repo, "base commit");
    let base_commit = repo.find_commit(base).unwrap();
    repo.branch("target", &base_commit, false).unwrap();

    create_file(&repo_path.join("feature.txt"), "feature work\n");
    commit_all(&repo, "feature commit");

    let changeset = get_changes(
        repo_path,
        &DiffSource::Branch("target".to_string()),
        DEFAULT_CONTEXT,
    )
    .unwrap();

    assert_eq!(changeset.files.len(), 1);
    assert_eq!(changeset.files[0].path, "feature.txt");
    assert!(changeset.diff.contains("+feature work"));
    assert!(!changeset.diff.contains("+base"));
    assert_eq!(changeset.describe_source(), "changes against target");
}

#[test]
fn test_branch_diff_unknown_target() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("base.txt"), "base\n");
    commit_all(&repo, "base commit");

    let result = get_changes(
        repo_path,
        &DiffSource::Branch("does-not-exist".to_string()),
        DEFAULT_CONTEXT,
    );
    assert!(result.is_err());
}

#[test]
fn test_commit_uses_message_verbatim() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("base.txt"), "base\n");
    commit_all(&repo, "base commit");

    create_file(&repo_path.join("base.txt"), "changed\n");
    stage_all(&repo);

    let message = "Refactor Base Loader\n\n- swap the contents";
    assert!(commit(repo_path, message).unwrap());

    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message().unwrap().trim_end(), message);
}

#[test]
fn test_commit_failure_is_reported_not_raised() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();

    create_file(&repo_path.join("base.txt"), "base\n");
    commit_all(&repo, "base commit");

    // nothing staged, so git refuses to commit
    assert!(!commit(repo_path, "empty commit").unwrap());
}

#[test]
fn test_repo_root_from_subdirectory() {
    let (temp_dir, _repo) = setup_test_repo();
    let nested = temp_dir.path().join("a/b");
    fs::create_dir_all(&nested).unwrap();

    let root = repo_root(&nested).unwrap();
    assert_eq!(
        root.canonicalize().unwrap(),
        temp_dir.path().canonicalize().unwrap()
    );
}

#[test]
fn test_sanity_check_clean_repo() {
    let (temp_dir, repo) = setup_test_repo();
    create_file(&temp_dir.path().join("base.txt"), "base\n");
    commit_all(&repo, "base commit");

    assert!(sanity_check(temp_dir.path()).unwrap().is_empty());
}

#[test]
fn test_sanity_check_allows_detached_head() {
    let (temp_dir, repo) = setup_test_repo();
    let repo_path = temp_dir.path();
    create_file(&repo_path.join("base.txt"), "base\n");
    let base = commit_all(&repo, "base commit");
    repo.set_head_detached(base).unwrap();

    create_file(&repo_path.join("base.txt"), "base\nsplit\n");
    stage_all(&repo);

    let notices = sanity_check(repo_path).unwrap();
    assert_eq!(notices, vec!["repository is in detached HEAD state"]);

    let changeset = get_changes(repo_path, &DiffSource::Staged, DEFAULT_CONTEXT).unwrap();
    assert!(!changeset.is_empty());
}

#[test]
fn test_sanity_check_allows_merge_in_progress() {
    let (temp_dir, repo) = setup_test_repo();
    create_file(&temp_dir.path().join("base.txt"), "base\n");
    let base = commit_all(&repo, "base commit");
    fs::write(repo.path().join("MERGE_HEAD"), format!("{base}\n")).unwrap();

    let notices = sanity_check(temp_dir.path()).unwrap();
    assert_eq!(
        notices,
        vec!["repository is in the middle of an operation (merge, rebase, etc)"]
    );
}
