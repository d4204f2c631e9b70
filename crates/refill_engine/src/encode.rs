use reqwest::multipart::{Form, Part};
use refill_core::Draft;

use crate::{ExtractError, FailureKind};

pub(crate) const FIELD_FILE: &str = "file";
pub(crate) const FIELD_KEYS: &str = "keys";
pub(crate) const FIELD_INSTRUCTIONS: &str = "instructions";
pub(crate) const FIELD_CREDENTIAL: &str = "openai_api_key";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("no files selected")]
    NoFiles,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Wire-ready submission. Built whole from a draft; never sent partially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    files: Vec<FilePart>,
    keys: String,
    instructions: String,
    credential: String,
}

impl SubmissionPayload {
    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    pub fn keys(&self) -> &str {
        &self.keys
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Builds the multipart body: one `file` part per file in selection order,
    /// then `keys`, `instructions` and `openai_api_key` as text fields.
    pub fn into_form(self) -> Result<Form, ExtractError> {
        let mut form = Form::new();
        for file in self.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.filename)
                .mime_str(file.content_type)
                .map_err(|err| ExtractError::new(FailureKind::Encoding, err.to_string()))?;
            form = form.part(FIELD_FILE, part);
        }
        Ok(form
            .text(FIELD_KEYS, self.keys)
            .text(FIELD_INSTRUCTIONS, self.instructions)
            .text(FIELD_CREDENTIAL, self.credential))
    }
}

/// Packages a draft and credential for submission. Keys and instructions are
/// carried verbatim; the service decides how to split the key list.
pub fn encode(draft: &Draft, credential: &str) -> Result<SubmissionPayload, EncodeError> {
    if !draft.has_files() {
        return Err(EncodeError::NoFiles);
    }
    let files = draft
        .files()
        .iter()
        .map(|file| FilePart {
            filename: file.name.clone(),
            content_type: content_type_for(&file.name),
            bytes: file.bytes.clone(),
        })
        .collect();
    Ok(SubmissionPayload {
        files,
        keys: draft.keys().to_string(),
        instructions: draft.instructions().to_string(),
        credential: credential.to_string(),
    })
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
