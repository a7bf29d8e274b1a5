//! Command-line surface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "datashelf")]
#[command(about = "Organize uploaded files into named directories", version)]
pub struct Cli {
    /// Configuration file (defaults to the per-user config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Action {
    /// List directories
    Dirs,
    /// Create a directory
    Mkdir { name: String },
    /// Rename a directory
    Rename { old: String, new: String },
    /// Remove a directory from the catalog (stored files stay on disk)
    Rmdir {
        name: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// List the files of a directory
    Ls {
        directory: String,
        /// Sort by upload time first
        #[arg(long)]
        sort: bool,
    },
    /// Sort a directory's files by upload time
    Sort { directory: String },
    /// Search a directory by file name or timestamp
    Search { directory: String, query: String },
    /// Copy a file into a directory
    Upload { directory: String, file: PathBuf },
    /// Delete a stored file (and every record sharing its name)
    Rm { directory: String, name: String },
    /// Copy a stored file to a destination
    Download {
        directory: String,
        name: String,
        destination: PathBuf,
    },
    /// Open a stored file with its default application
    Open { directory: String, name: String },
    /// Open the folder holding a stored file
    OpenFolder { directory: String, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload() {
        let cli = Cli::parse_from(["datashelf", "upload", "Cells", "/tmp/run1.csv"]);
        assert_eq!(
            cli.action,
            Action::Upload {
                directory: "Cells".to_string(),
                file: PathBuf::from("/tmp/run1.csv"),
            }
        );
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_parse_global_config_and_flags() {
        let cli = Cli::parse_from(["datashelf", "rmdir", "Old", "--yes", "--config", "shelf.toml"]);
        assert_eq!(
            cli.action,
            Action::Rmdir {
                name: "Old".to_string(),
                yes: true,
            }
        );
        assert_eq!(cli.config, Some(PathBuf::from("shelf.toml")));
    }

    #[test]
    fn test_parse_open_folder() {
        let cli = Cli::parse_from(["datashelf", "open-folder", "A", "x.txt"]);
        assert!(matches!(cli.action, Action::OpenFolder { .. }));
    }
}
