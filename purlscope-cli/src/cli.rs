//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// purlscope -- attach usage, data-flow and crypto evidence to CycloneDX SBOMs.
///
/// Use `purlscope <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "purlscope", version, about, long_about = None)]
pub struct Cli {
    /// Path to the purlscope.toml configuration file.
    #[arg(short, long, default_value = "purlscope.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format for command reports.
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Attach slice evidence to an existing SBOM.
    Evinse(EvinseArgs),

    /// Manage the namespace index.
    Index(IndexArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- evinse ----

/// Correlate slice files with the components of an SBOM.
#[derive(Args, Debug)]
pub struct EvinseArgs {
    /// Input CycloneDX SBOM (JSON).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output SBOM path (default: overwrite the input).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Language of the analysed code (overrides `[evidence].language`).
    #[arg(short, long)]
    pub language: Option<String>,

    /// Namespace index (SQLite) path.
    #[arg(long)]
    pub db_path: Option<String>,

    /// Usages slice file.
    #[arg(short, long)]
    pub usages_slices_file: Option<PathBuf>,

    /// Data-flow slice file.
    #[arg(short, long)]
    pub data_flow_slices_file: Option<PathBuf>,

    /// Reachables slice file.
    #[arg(short, long)]
    pub reachables_slices_file: Option<PathBuf>,

    /// Semantics slice file (Swift).
    #[arg(short, long)]
    pub semantics_slices_file: Option<PathBuf>,

    /// Attach data-flow call stacks.
    #[arg(long)]
    pub with_data_flow: bool,

    /// Attach reachability call stacks.
    #[arg(long)]
    pub with_reachables: bool,

    /// Detect cryptographic algorithms in reachable flows.
    #[arg(long)]
    pub include_crypto: bool,

    /// Embed the loaded slice files as document annotations.
    #[arg(long)]
    pub annotate: bool,

    /// Also write the raw evidence maps as JSON.
    #[arg(long)]
    pub maps_output: Option<PathBuf>,

    /// Crypto algorithm catalog (JSON) replacing the built-in one.
    #[arg(long)]
    pub crypto_catalog: Option<PathBuf>,
}

// ---- index ----

/// Manage the SQLite namespace index.
#[derive(Args, Debug)]
pub struct IndexArgs {
    #[command(subcommand)]
    pub action: IndexAction,
}

#[derive(Subcommand, Debug)]
pub enum IndexAction {
    /// Load a JSON object `{purl: namespaces}` into the index.
    Import {
        /// JSON file to import.
        source: PathBuf,

        /// Index path (overrides `[evidence].db_path`).
        #[arg(long)]
        db_path: Option<String>,
    },
    /// List the purls whose namespace data contains a symbol.
    Query {
        /// Symbol or namespace fragment.
        needle: String,

        /// Index path (overrides `[evidence].db_path`).
        #[arg(long)]
        db_path: Option<String>,
    },
}

// ---- config ----

/// Manage purlscope configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, evidence).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_evinse_minimal() {
        let cli = Cli::try_parse_from(["purlscope", "evinse", "-i", "bom.json"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Evinse(args) => {
                assert_eq!(args.input, PathBuf::from("bom.json"));
                assert!(args.output.is_none());
                assert!(args.language.is_none());
                assert!(!args.with_data_flow);
                assert!(!args.with_reachables);
                assert!(!args.include_crypto);
                assert!(!args.annotate);
            }
            _ => panic!("expected Evinse command"),
        }
    }

    #[test]
    fn test_cli_parse_evinse_full() {
        let cli = Cli::try_parse_from([
            "purlscope",
            "evinse",
            "-i",
            "bom.json",
            "-o",
            "bom.evinse.json",
            "-l",
            "python",
            "--db-path",
            "/tmp/ns.db",
            "-u",
            "usages.slices.json",
            "-d",
            "data-flow.slices.json",
            "-r",
            "reachables.slices.json",
            "--with-data-flow",
            "--with-reachables",
            "--include-crypto",
            "--annotate",
            "--maps-output",
            "maps.json",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Evinse(args) => {
                assert_eq!(args.output, Some(PathBuf::from("bom.evinse.json")));
                assert_eq!(args.language.as_deref(), Some("python"));
                assert_eq!(args.db_path.as_deref(), Some("/tmp/ns.db"));
                assert_eq!(
                    args.usages_slices_file,
                    Some(PathBuf::from("usages.slices.json"))
                );
                assert_eq!(
                    args.data_flow_slices_file,
                    Some(PathBuf::from("data-flow.slices.json"))
                );
                assert_eq!(
                    args.reachables_slices_file,
                    Some(PathBuf::from("reachables.slices.json"))
                );
                assert!(args.with_data_flow);
                assert!(args.with_reachables);
                assert!(args.include_crypto);
                assert!(args.annotate);
                assert_eq!(args.maps_output, Some(PathBuf::from("maps.json")));
            }
            _ => panic!("expected Evinse command"),
        }
    }

    #[test]
    fn test_cli_parse_evinse_requires_input() {
        let result = Cli::try_parse_from(["purlscope", "evinse"]);
        assert!(result.is_err(), "evinse without --input should fail");
    }

    #[test]
    fn test_cli_parse_index_import() {
        let cli = Cli::try_parse_from(["purlscope", "index", "import", "ns.json"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Index(args) => match args.action {
                IndexAction::Import { source, db_path } => {
                    assert_eq!(source, PathBuf::from("ns.json"));
                    assert!(db_path.is_none());
                }
                _ => panic!("expected Import action"),
            },
            _ => panic!("expected Index command"),
        }
    }

    #[test]
    fn test_cli_parse_index_query_with_db() {
        let cli = Cli::try_parse_from([
            "purlscope",
            "index",
            "query",
            "org.slf4j",
            "--db-path",
            "ns.db",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Index(args) => match args.action {
                IndexAction::Query { needle, db_path } => {
                    assert_eq!(needle, "org.slf4j");
                    assert_eq!(db_path.as_deref(), Some("ns.db"));
                }
                _ => panic!("expected Query action"),
            },
            _ => panic!("expected Index command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["purlscope", "config", "show", "--section", "evidence"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(args) => match args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section.as_deref(), Some("evidence"));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "purlscope",
            "--config",
            "/etc/purlscope.toml",
            "config",
            "validate",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/purlscope.toml"));
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_default_config_path() {
        let cli = Cli::try_parse_from(["purlscope", "config", "validate"]).expect("parse");
        assert_eq!(cli.config, PathBuf::from("purlscope.toml"));
        assert!(matches!(cli.format, OutputFormat::Text));
    }

    #[test]
    fn test_cli_unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["purlscope", "scan"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
