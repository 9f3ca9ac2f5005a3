use clap::{ArgAction, Parser, Subcommand};

/// Detect a possibility to have a dependency confusion in your Python dependencies
#[derive(Parser, Debug)]
#[command(name = "yorkshire")]
#[command(version, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Run this tool in a debug mode
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print version and exit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check for a possible dependency confusion in a requirements file, files in a
    /// directory, or a URL
    Detect {
        /// Manifest file, directory to walk, or http(s) URL of a manifest
        #[arg(value_name = "FILE|URL|DIR")]
        path: String,

        /// Allowed package index URL (can be repeated)
        #[arg(long = "index-url", value_name = "URL")]
        index_urls: Vec<String>,

        /// Output results as JSON lines
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detect() {
        let cli = Cli::try_parse_from(["yorkshire", "detect", "requirements.txt"]).unwrap();
        let Some(Command::Detect {
            path,
            index_urls,
            json,
        }) = cli.command
        else {
            panic!("expected detect command");
        };
        assert_eq!(path, "requirements.txt");
        assert!(index_urls.is_empty());
        assert!(!json);
    }

    #[test]
    fn test_repeated_index_url() {
        let cli = Cli::try_parse_from([
            "yorkshire",
            "detect",
            "--index-url",
            "https://a.example/simple",
            "--index-url",
            "https://b.example/simple",
            ".",
        ])
        .unwrap();
        let Some(Command::Detect { index_urls, .. }) = cli.command else {
            panic!("expected detect command");
        };
        assert_eq!(
            index_urls,
            vec!["https://a.example/simple", "https://b.example/simple"]
        );
    }

    #[test]
    fn test_debug_flag_is_global() {
        let cli = Cli::try_parse_from(["yorkshire", "detect", ".", "--debug"]).unwrap();
        assert!(cli.debug);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["yorkshire", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_detect_requires_path() {
        assert!(Cli::try_parse_from(["yorkshire", "detect"]).is_err());
    }
}
