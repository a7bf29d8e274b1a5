//! Command system for user actions
//!
//! A shell turns clicks or arguments into [`Command`] values and hands them to
//! [`CommandDispatcher::dispatch`] together with the [`Library`]. Per-file
//! actions carry the target record, so no handler closes over UI state.

use crate::{AppConfig, AppError, FileRecord, Library, Result};
use std::path::PathBuf;

/// Every user action the library understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateDirectory { name: String },
    RenameDirectory { from: String, to: String },
    DeleteDirectory { name: String },
    SelectDirectory { name: String },
    /// List the current directory's records
    ListFiles,
    Upload { source: PathBuf },
    /// Sort the current directory by timestamp
    Sort,
    /// Filter the current directory without changing it
    Search { query: String },
    DeleteFile { record: FileRecord },
    DownloadFile { record: FileRecord, destination: PathBuf },
    OpenFile { record: FileRecord },
    OpenFolder { record: FileRecord },
}

impl Command {
    /// Stable identifier used in logs
    pub fn id(&self) -> &'static str {
        match self {
            Command::CreateDirectory { .. } => "dir.create",
            Command::RenameDirectory { .. } => "dir.rename",
            Command::DeleteDirectory { .. } => "dir.delete",
            Command::SelectDirectory { .. } => "dir.select",
            Command::ListFiles => "file.list",
            Command::Upload { .. } => "file.upload",
            Command::Sort => "file.sort",
            Command::Search { .. } => "file.search",
            Command::DeleteFile { .. } => "file.delete",
            Command::DownloadFile { .. } => "file.download",
            Command::OpenFile { .. } => "file.open",
            Command::OpenFolder { .. } => "file.open_folder",
        }
    }

    /// Does this command rewrite the metadata file when it succeeds?
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::CreateDirectory { .. }
                | Command::RenameDirectory { .. }
                | Command::DeleteDirectory { .. }
                | Command::Upload { .. }
                | Command::Sort
                | Command::DeleteFile { .. }
        )
    }
}

/// What a dispatched command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The catalog changed and was saved
    Changed,
    /// Input was ignored, nothing changed
    Unchanged,
    /// The user declined a confirmation
    Cancelled,
    /// A listing or search result
    Files(Vec<FileRecord>),
    Uploaded(FileRecord),
    /// Number of records removed with a file
    Removed(usize),
    /// A side effect outside the catalog finished (open, download, select)
    Done,
}

impl Outcome {
    /// Whether the catalog was written back to disk
    pub fn saved(&self) -> bool {
        matches!(self, Outcome::Changed | Outcome::Uploaded(_) | Outcome::Removed(_))
    }
}

/// Yes/no question to the user
pub trait Prompt {
    fn confirm(&self, message: &str) -> bool;
}

/// Answers yes to everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Routes commands to the library
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    confirm_delete: bool,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self {
            confirm_delete: true,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            confirm_delete: config.general.confirm_delete,
        }
    }

    pub fn confirm_delete(mut self, enabled: bool) -> Self {
        self.confirm_delete = enabled;
        self
    }

    pub fn dispatch(
        &self,
        library: &mut Library,
        prompt: &dyn Prompt,
        cmd: Command,
    ) -> Result<Outcome> {
        let id = cmd.id();
        let mutating = cmd.is_mutating();
        let result = self.execute(library, prompt, cmd);

        match &result {
            Ok(outcome) if mutating && outcome.saved() => {
                tracing::info!("Command {} saved {:?}", id, library.store().path())
            }
            Ok(outcome) => tracing::debug!("Command {} -> {:?}", id, outcome_kind(outcome)),
            Err(e) if e.is_user_error() => tracing::debug!("Command {} rejected: {}", id, e),
            Err(e) => tracing::warn!("Command {} failed: {}", id, e),
        }
        result
    }

    fn execute(&self, library: &mut Library, prompt: &dyn Prompt, cmd: Command) -> Result<Outcome> {
        match cmd {
            Command::CreateDirectory { name } => {
                library.create_directory(&name)?;
                Ok(Outcome::Changed)
            }
            Command::RenameDirectory { from, to } => {
                library.rename_directory(&from, &to)?;
                Ok(Outcome::Changed)
            }
            Command::DeleteDirectory { name } => {
                if !library.contains(&name) {
                    return Ok(Outcome::Unchanged);
                }
                let question = format!("Delete directory {}?", name);
                if self.confirm_delete && !prompt.confirm(&question) {
                    return Ok(Outcome::Cancelled);
                }
                Ok(changed(library.delete_directory(&name)?))
            }
            Command::SelectDirectory { name } => {
                library.select_directory(&name)?;
                Ok(Outcome::Done)
            }
            Command::ListFiles => {
                let current = current(library)?;
                Ok(Outcome::Files(library.files(&current)?.to_vec()))
            }
            Command::Upload { source } => Ok(Outcome::Uploaded(library.upload(&source)?)),
            // Without a selection sort and search quietly do nothing
            Command::Sort => match library.current_directory().map(str::to_string) {
                Some(current) => {
                    library.sort(&current)?;
                    Ok(Outcome::Changed)
                }
                None => Ok(Outcome::Unchanged),
            },
            Command::Search { query } => match library.current_directory() {
                Some(current) => Ok(Outcome::Files(library.search(current, &query)?)),
                None => Ok(Outcome::Files(Vec::new())),
            },
            Command::DeleteFile { record } => Ok(Outcome::Removed(library.delete_file(&record)?)),
            Command::DownloadFile {
                record,
                destination,
            } => {
                library.download(&record, &destination)?;
                Ok(Outcome::Done)
            }
            Command::OpenFile { record } => {
                library.open_file(&record)?;
                Ok(Outcome::Done)
            }
            Command::OpenFolder { record } => {
                library.open_folder(&record)?;
                Ok(Outcome::Done)
            }
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn changed(did_change: bool) -> Outcome {
    if did_change {
        Outcome::Changed
    } else {
        Outcome::Unchanged
    }
}

fn current(library: &Library) -> Result<String> {
    library
        .current_directory()
        .map(str::to_string)
        .ok_or(AppError::NoDirectorySelected)
}

fn outcome_kind(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Changed => "changed",
        Outcome::Unchanged => "unchanged",
        Outcome::Cancelled => "cancelled",
        Outcome::Files(_) => "files",
        Outcome::Uploaded(_) => "uploaded",
        Outcome::Removed(_) => "removed",
        Outcome::Done => "done",
    }
}
