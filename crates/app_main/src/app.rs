//! Shell that turns command-line actions into library commands

use crate::cli::Action;
use anyhow::Result;
use app_core::{
    AppConfig, AssumeYes, Command, CommandDispatcher, FileRecord, Library, Outcome, Prompt,
};
use std::io::{BufRead, Write};

/// Asks yes/no questions on the terminal; anything but "y"/"yes" is a no
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        eprint!("{} [y/N] ", message);
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// One library plus the means to talk to the user
pub struct Shell<W: Write> {
    library: Library,
    dispatcher: CommandDispatcher,
    prompt: Box<dyn Prompt>,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(library: Library, config: &AppConfig, prompt: Box<dyn Prompt>, out: W) -> Self {
        Self {
            library,
            dispatcher: CommandDispatcher::from_config(config),
            prompt,
            out,
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn run(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Dirs => {
                let names: Vec<String> = self.library.directories().map(str::to_string).collect();
                if names.is_empty() {
                    writeln!(self.out, "No directories yet.")?;
                }
                for name in names {
                    writeln!(self.out, "{}", name)?;
                }
            }
            Action::Mkdir { name } => {
                let cmd = Command::CreateDirectory { name: name.clone() };
                if self.send_reporting_rejection(cmd)? {
                    writeln!(self.out, "Created directory {}", name)?;
                }
            }
            Action::Rename { old, new } => {
                let cmd = Command::RenameDirectory {
                    from: old.clone(),
                    to: new.clone(),
                };
                if self.send_reporting_rejection(cmd)? {
                    writeln!(self.out, "Renamed {} to {}", old, new)?;
                }
            }
            Action::Rmdir { name, yes } => {
                let cmd = Command::DeleteDirectory { name: name.clone() };
                let outcome = if yes {
                    self.dispatcher.dispatch(&mut self.library, &AssumeYes, cmd)?
                } else {
                    self.send(cmd)?
                };
                match outcome {
                    Outcome::Changed => writeln!(self.out, "Deleted directory {}", name)?,
                    Outcome::Cancelled => writeln!(self.out, "Cancelled")?,
                    _ => writeln!(self.out, "No directory named {}", name)?,
                }
            }
            Action::Ls { directory, sort } => {
                self.select(&directory)?;
                if sort {
                    self.send(Command::Sort)?;
                }
                let outcome = self.send(Command::ListFiles)?;
                self.render(outcome)?;
            }
            Action::Sort { directory } => {
                self.select(&directory)?;
                self.send(Command::Sort)?;
                let outcome = self.send(Command::ListFiles)?;
                self.render(outcome)?;
            }
            Action::Search { directory, query } => {
                self.select(&directory)?;
                let outcome = self.send(Command::Search { query })?;
                self.render(outcome)?;
            }
            Action::Upload { directory, file } => {
                self.select(&directory)?;
                let outcome = self.send(Command::Upload { source: file })?;
                self.render(outcome)?;
            }
            Action::Rm { directory, name } => {
                let record = self.record(&directory, &name)?;
                let outcome = self.send(Command::DeleteFile { record })?;
                self.render(outcome)?;
            }
            Action::Download {
                directory,
                name,
                destination,
            } => {
                let record = self.record(&directory, &name)?;
                self.send(Command::DownloadFile {
                    record,
                    destination: destination.clone(),
                })?;
                writeln!(self.out, "File downloaded to {}", destination.display())?;
            }
            Action::Open { directory, name } => {
                let record = self.record(&directory, &name)?;
                self.send(Command::OpenFile { record })?;
            }
            Action::OpenFolder { directory, name } => {
                let record = self.record(&directory, &name)?;
                self.send(Command::OpenFolder { record })?;
            }
        }
        Ok(())
    }

    fn send(&mut self, cmd: Command) -> Result<Outcome> {
        Ok(self
            .dispatcher
            .dispatch(&mut self.library, self.prompt.as_ref(), cmd)?)
    }

    /// Like [`Self::send`], but an input rejection is printed instead of
    /// failing the run. Returns whether the command went through.
    fn send_reporting_rejection(&mut self, cmd: Command) -> Result<bool> {
        match self.dispatcher.dispatch(&mut self.library, self.prompt.as_ref(), cmd) {
            Ok(_) => Ok(true),
            Err(e) if e.is_user_error() => {
                writeln!(self.out, "{}", e.user_message())?;
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn select(&mut self, directory: &str) -> Result<()> {
        self.send(Command::SelectDirectory {
            name: directory.to_string(),
        })?;
        Ok(())
    }

    /// Select `directory` and look up the first record called `name`
    fn record(&mut self, directory: &str, name: &str) -> Result<FileRecord> {
        self.select(directory)?;
        Ok(self.library.find_file(directory, name)?.clone())
    }

    fn render(&mut self, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Files(records) => {
                if records.is_empty() {
                    writeln!(self.out, "No files.")?;
                }
                for record in records {
                    writeln!(self.out, "{}\t{}\t{}", record.timestamp, record.name, record.path.display())?;
                }
            }
            Outcome::Uploaded(record) => {
                writeln!(self.out, "File uploaded: {} ({})", record.name, record.timestamp)?;
            }
            Outcome::Removed(count) => {
                writeln!(self.out, "File deleted ({} records removed)", count)?;
            }
            Outcome::Cancelled => writeln!(self.out, "Cancelled")?,
            Outcome::Changed | Outcome::Unchanged | Outcome::Done => {}
        }
        Ok(())
    }
}

/// Load configuration and the catalog, then perform one action
pub fn run(config: &AppConfig, action: Action) -> Result<()> {
    let library = Library::from_config(config)?;
    let mut shell = Shell::new(library, config, Box::new(TerminalPrompt), std::io::stdout().lock());
    tracing::info!(
        "Catalog {:?} opened with {} directories",
        shell.library().store().path(),
        shell.library().catalog().len()
    );

    shell.run(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::{AppError, MetadataStore};
    use std::path::{Path, PathBuf};

    struct Refuse;

    impl Prompt for Refuse {
        fn confirm(&self, _message: &str) -> bool {
            false
        }
    }

    fn shell(dir: &Path, prompt: Box<dyn Prompt>) -> Shell<Vec<u8>> {
        let mut config = AppConfig::default();
        config.storage.data_file = dir.join("directory_data.json");
        config.storage.upload_root = dir.join("uploaded_files");
        let library = Library::from_config(&config).unwrap();
        Shell::new(library, &config, prompt, Vec::new())
    }

    fn output(shell: &mut Shell<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut shell.out)).unwrap()
    }

    fn source(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, name).unwrap();
        path
    }

    #[test]
    fn test_directory_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = shell(dir.path(), Box::new(AssumeYes));

        sh.run(Action::Dirs).unwrap();
        assert_eq!(output(&mut sh), "No directories yet.\n");

        sh.run(Action::Mkdir { name: "A".into() }).unwrap();
        sh.run(Action::Mkdir { name: "A".into() }).unwrap();
        assert_eq!(
            output(&mut sh),
            "Created directory A\nDirectory already exists: A\n"
        );

        sh.run(Action::Mkdir { name: String::new() }).unwrap();
        sh.run(Action::Rename { old: "Z".into(), new: "B".into() }).unwrap();
        assert_eq!(
            output(&mut sh),
            "Directory name must not be empty\nDirectory not found: Z\n"
        );

        sh.run(Action::Rename { old: "A".into(), new: "B".into() }).unwrap();
        sh.run(Action::Dirs).unwrap();
        assert_eq!(output(&mut sh), "Renamed A to B\nB\n");

        sh.run(Action::Rmdir { name: "B".into(), yes: false }).unwrap();
        assert_eq!(output(&mut sh), "Deleted directory B\n");
    }

    #[test]
    fn test_rmdir_declined() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = shell(dir.path(), Box::new(Refuse));
        sh.run(Action::Mkdir { name: "A".into() }).unwrap();
        output(&mut sh);

        sh.run(Action::Rmdir { name: "A".into(), yes: false }).unwrap();
        assert_eq!(output(&mut sh), "Cancelled\n");
        assert!(sh.library().contains("A"));

        sh.run(Action::Rmdir { name: "A".into(), yes: true }).unwrap();
        assert!(!sh.library().contains("A"));
    }

    #[test]
    fn test_upload_search_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = shell(dir.path(), Box::new(AssumeYes));
        sh.run(Action::Mkdir { name: "A".into() }).unwrap();

        for name in ["x.csv", "y.csv"] {
            sh.run(Action::Upload {
                directory: "A".into(),
                file: source(dir.path(), name),
            })
            .unwrap();
        }
        output(&mut sh);

        sh.run(Action::Search { directory: "A".into(), query: "X.".into() }).unwrap();
        let found = output(&mut sh);
        assert_eq!(found.lines().count(), 1);
        assert!(found.contains("\tx.csv\t"));

        sh.run(Action::Rm { directory: "A".into(), name: "x.csv".into() }).unwrap();
        assert_eq!(output(&mut sh), "File deleted (1 records removed)\n");

        let stored = MetadataStore::new(dir.path().join("directory_data.json")).load().unwrap();
        assert_eq!(stored["A"].len(), 1);
        assert_eq!(stored["A"][0].name, "y.csv");
    }

    #[test]
    fn test_download() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = shell(dir.path(), Box::new(AssumeYes));
        sh.run(Action::Mkdir { name: "A".into() }).unwrap();
        sh.run(Action::Upload {
            directory: "A".into(),
            file: source(dir.path(), "x.csv"),
        })
        .unwrap();

        let destination = dir.path().join("out.csv");
        sh.run(Action::Download {
            directory: "A".into(),
            name: "x.csv".into(),
            destination: destination.clone(),
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(destination).unwrap(), "x.csv");
    }

    #[test]
    fn test_unknown_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = shell(dir.path(), Box::new(AssumeYes));

        let err = sh.run(Action::Ls { directory: "nope".into(), sort: false }).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::DirectoryNotFound(_))
        ));

        sh.run(Action::Mkdir { name: "A".into() }).unwrap();
        let err = sh.run(Action::Open { directory: "A".into(), name: "x".into() }).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::RecordNotFound { .. })
        ));
    }
}
