use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blue Package Manager for Diamond Language
#[derive(Parser)]
#[command(name = "blue", version, about = "Blue Package Manager for Diamond Language")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List all available packages
    List,
    /// Install a package
    Install {
        /// Package name to install
        package: String,
    },
    /// Search for packages
    Search {
        /// Search query
        query: String,
    },
    /// Get package information
    Info {
        /// Package name
        package: String,
    },
    /// Upload a package
    Upload {
        /// File to upload
        file: PathBuf,
    },
    /// List installed packages
    Installed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_arguments() {
        let cli = Cli::try_parse_from(["blue", "install", "audio"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Install { package }) if package == "audio"));

        let cli = Cli::try_parse_from(["blue", "upload", "pkg/main.c"]).unwrap();
        assert!(
            matches!(cli.command, Some(Commands::Upload { file }) if file == PathBuf::from("pkg/main.c"))
        );
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["blue"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn missing_argument_is_rejected() {
        assert!(Cli::try_parse_from(["blue", "search"]).is_err());
    }
}
