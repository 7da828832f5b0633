//! CLI argument definitions
//!
//! All Clap derive structs for `imagr-validator` command-line parsing.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use imagr_validator_core::{PasswordRule, ScriptRule};

// ============================================================================
// Root CLI
// ============================================================================

/// Validate Imagr workflow configurations.
#[derive(Parser, Debug)]
#[command(name = "imagr-validator", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress diagnostic logging.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(
        long,
        default_value = "auto",
        global = true,
        env = "IMAGR_VALIDATOR_COLOR"
    )]
    pub color: ColorChoice,

    /// Format of diagnostic log lines on stderr.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: OutputFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one or more configuration files or URLs.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Validate Command
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Paths or http(s) URLs of configurations to validate.
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Report every violation instead of stopping at the first.
    #[arg(long)]
    pub report_all: bool,

    /// How the `password` key is checked.
    #[arg(long, default_value = "non-empty-if-present")]
    pub password_rule: PasswordRule,

    /// What a `script` component must carry.
    #[arg(long, default_value = "content-or-url")]
    pub script_rule: ScriptRule,

    /// Timeout in seconds for fetching remote configurations.
    #[arg(long, env = "IMAGR_VALIDATOR_FETCH_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Largest configuration accepted, in bytes.
    #[arg(long, env = "IMAGR_VALIDATOR_MAX_DOCUMENT_SIZE")]
    pub max_size: Option<usize>,
}

// ============================================================================
// Utility Commands
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for results and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_args(argv: &[&str]) -> ValidateArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Validate(args) => args,
            other => panic!("Expected ValidateArgs, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_single_source() {
        let args = validate_args(&["imagr-validator", "validate", "imagr_config.plist"]);
        assert_eq!(args.sources, ["imagr_config.plist"]);
        assert_eq!(args.format, OutputFormat::Human);
        assert!(!args.report_all);
    }

    #[test]
    fn test_validate_many_sources() {
        let args = validate_args(&[
            "imagr-validator",
            "validate",
            "a.plist",
            "https://imagr.example.com/b.plist",
        ]);
        assert_eq!(args.sources.len(), 2);
    }

    #[test]
    fn test_validate_requires_source() {
        let result = Cli::try_parse_from(["imagr-validator", "validate"]);
        assert!(result.is_err(), "Expected error for missing source");
    }

    #[test]
    fn test_rule_defaults() {
        let args = validate_args(&["imagr-validator", "validate", "x.plist"]);
        assert_eq!(args.password_rule, PasswordRule::NonEmptyIfPresent);
        assert_eq!(args.script_rule, ScriptRule::ContentOrUrl);
    }

    #[test]
    fn test_legacy_rules_parse() {
        let args = validate_args(&[
            "imagr-validator",
            "validate",
            "x.plist",
            "--password-rule",
            "required",
            "--script-rule",
            "content-required",
            "--report-all",
            "--format",
            "json",
        ]);
        assert_eq!(args.password_rule, PasswordRule::Required);
        assert_eq!(args.script_rule, ScriptRule::ContentRequired);
        assert!(args.report_all);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let result = Cli::try_parse_from([
            "imagr-validator",
            "validate",
            "x.plist",
            "--password-rule",
            "sometimes",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_limits_parse() {
        let args = validate_args(&[
            "imagr-validator",
            "validate",
            "x.plist",
            "--timeout-secs",
            "5",
            "--max-size",
            "1024",
        ]);
        assert_eq!(args.timeout_secs, Some(5));
        assert_eq!(args.max_size, Some(1024));
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["imagr-validator", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["imagr-validator", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from([
                "imagr-validator",
                "--color",
                variant,
                "validate",
                "x.plist",
            ]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["imagr-validator", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["imagr-validator", "validate", "x.plist", "-vv", "--quiet"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }
}
