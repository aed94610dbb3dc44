//! CLI argument parsing via clap.

use clap::Parser;

/// Manage AI coding tools and shells as tmux panes from one tree view.
#[derive(Debug, Parser)]
#[command(name = "codely", disable_version_flag = true, after_help = codely::build_info::HELP_BUILD_METADATA)]
pub struct Args {
    /// Path to config file (default: ~/.config/codely/codely.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Path to the session state file (default: ~/.local/state/codely/session.json).
    #[arg(long = "state")]
    pub state: Option<String>,

    /// Write debug logs to the debug log file.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Debug log location (default: ~/.local/state/codely/debug.log).
    #[arg(long = "debug-file", value_name = "PATH")]
    pub debug_file: Option<String>,

    /// Print version, commit and build time.
    #[arg(short = 'V', long = "version")]
    pub version: bool,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn defaults_without_flags() {
        let args = Args::parse_from(["codely"]);
        assert!(args.config.is_none());
        assert!(args.state.is_none());
        assert!(!args.debug);
        assert!(!args.version);
    }

    #[test]
    fn parses_all_flags() {
        let args = Args::parse_from([
            "codely",
            "-c",
            "/tmp/c.toml",
            "--state",
            "/tmp/s.json",
            "-d",
            "--debug-file",
            "/tmp/d.log",
        ]);
        assert_eq!(args.config.as_deref(), Some("/tmp/c.toml"));
        assert_eq!(args.state.as_deref(), Some("/tmp/s.json"));
        assert!(args.debug);
        assert_eq!(args.debug_file.as_deref(), Some("/tmp/d.log"));
    }

    #[test]
    fn version_flag_is_custom() {
        let args = Args::parse_from(["codely", "--version"]);
        assert!(args.version);
    }
}
