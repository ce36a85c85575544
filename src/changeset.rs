/// a single file touched by the diff
#[derive(Debug)]
pub struct FileChange {
    pub status: char, // 'A', 'M', 'D', or 'R'
    pub path: String,
    pub old_path: Option<String>, // set for renames ('R' status)
    pub diff_ignored: bool,       // lock files, minified files, binaries
}

/// where the diff was taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// index against HEAD (`git diff --cached`)
    Staged,
    /// HEAD against its merge base with the named branch (`git diff <branch>...HEAD`)
    Branch(String),
}

/// the text handed to the model plus the files it covers
#[derive(Debug)]
pub struct ChangeSet {
    pub files: Vec<FileChange>,
    pub diff: String,
    pub source: DiffSource,
}

impl ChangeSet {
    pub fn describe_source(&self) -> String {
        match &self.source {
            DiffSource::Staged => String::from("staged changes"),
            DiffSource::Branch(target) => format!("changes against {target}"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diff.trim().is_empty()
    }
}
