/// A file picked by the user, held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DraftFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// In-progress form input. Only `instructions` outlives the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    files: Vec<DraftFile>,
    keys: String,
    instructions: String,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[DraftFile] {
        &self.files
    }

    pub fn keys(&self) -> &str {
        &self.keys
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Appends a new selection after the files already picked.
    pub fn push_files(&mut self, files: impl IntoIterator<Item = DraftFile>) -> usize {
        let before = self.files.len();
        self.files.extend(files);
        self.files.len() - before
    }

    pub fn remove_file(&mut self, index: usize) -> Option<DraftFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn set_keys(&mut self, keys: impl Into<String>) {
        self.keys = keys.into();
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.instructions = instructions.into();
    }

    pub fn key_list(&self) -> Vec<String> {
        split_keys(&self.keys)
    }
}

/// Splits a comma-delimited key list, trimming each entry and dropping blanks.
pub fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
