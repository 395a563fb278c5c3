use crate::config::DEFAULT_CONFIG_PATH;
use crate::tokens::report::ReportFormat;
use crate::workflow::artifact::ArtifactKind;
use crate::workflow::export::ExportMode;
use clap::{Args, Parser, Subcommand};

// Display order for log level option (placed at end of help text)
const LOG_LEVEL_DISPLAY_ORDER: usize = 100;

/// Options shared by both binaries
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Log level (see https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
    /// [env: PLATFORM_UI_LOG=] [default: info]
    #[arg(
        long,
        env = "PLATFORM_UI_LOG",
        default_value = "info",
        global = true,
        hide_default_value = true,
        hide_env = true,
        display_order = LOG_LEVEL_DISPLAY_ORDER,
        verbatim_doc_comment
    )]
    pub log_level: String,

    /// Path to config file (initialize with `init`)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: String,

    /// Override config values using dot notation (e.g. tokens.token_prefix=ds)
    #[arg(long = "config-override", global = true)]
    pub config_overrides: Vec<String>,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Override existing config file
    #[arg(long)]
    pub r#override: bool,
}

/// design-tokens CLI arguments
#[derive(Parser, Debug)]
#[command(
    name = "design-tokens",
    version,
    about = "Check React sources for raw HTML, inline styles and non-token classes",
    long_about = None
)]
pub struct TokensCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: TokensCommand,
}

#[derive(Subcommand, Debug)]
pub enum TokensCommand {
    /// Initialize a default platform-ui.toml config file
    Init(InitArgs),
    /// Scan sources and report design-token violations
    Verify(VerifyArgs),
    /// Rewrite inline-style literals that map onto tokens
    Fix(FixArgs),
}

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Output file path (.md or .json), overrides --format
    #[arg(long)]
    pub output: Option<String>,

    /// Dry run: only list the files that would be scanned
    #[arg(long)]
    pub dry_run: bool,

    /// Debug logging unless --log-level is set
    #[arg(long, short)]
    pub verbose: bool,
}

/// Arguments for the fix command
#[derive(Args, Debug)]
pub struct FixArgs {
    /// Log planned changes without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Log every change, and debug logging unless --log-level is set
    #[arg(long, short)]
    pub verbose: bool,
}

/// design-workflow CLI arguments
#[derive(Parser, Debug)]
#[command(
    name = "design-workflow",
    version,
    about = "Spec-first design workflow: product docs, component specs, validation and export",
    long_about = None
)]
pub struct WorkflowCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: WorkflowCommand,
}

#[derive(Subcommand, Debug)]
pub enum WorkflowCommand {
    /// Initialize a default platform-ui.toml config file
    Init(InitArgs),
    /// Write product/product-overview.md from its template
    ProductVision(ProductDocArgs),
    /// Write product/product-roadmap.md from its template
    ProductRoadmap(ProductDocArgs),
    /// Write product/data-model.md from its template
    DataModel(ProductDocArgs),
    /// Create specs/<name>/ with SPEC.md and skeleton JSON artifacts
    SectionSpec(SectionSpecArgs),
    /// Export product documents and component specs
    Export(ExportArgs),
    /// Check that component specs are approved and not stale
    CheckApproval(CheckApprovalArgs),
    /// Validate every component spec
    Validate,
    /// List components with their approval status
    ListComponents,
    /// Print the JSON schema of an artifact file
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
pub struct ProductDocArgs {
    /// Overwrite the document if it exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct SectionSpecArgs {
    /// Component name in kebab-case (e.g. season-allocation)
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(long, value_enum, default_value_t = ExportMode::Full)]
    pub mode: ExportMode,

    /// Output file path [default: <export_dir>/design-export.{json,md}]
    #[arg(long)]
    pub output: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckApprovalArgs {
    /// Component to check [default: all]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub artifact: ArtifactKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_clis_are_well_formed() {
        TokensCli::command().debug_assert();
        WorkflowCli::command().debug_assert();
    }

    #[test]
    fn test_verify_args() {
        let cli = TokensCli::try_parse_from([
            "design-tokens",
            "verify",
            "--format",
            "json",
            "--verbose",
            "--config-override",
            "tokens.roots=[\"app\"]",
        ])
        .unwrap();
        assert_eq!(cli.global.config, DEFAULT_CONFIG_PATH);
        assert_eq!(cli.global.config_overrides, vec!["tokens.roots=[\"app\"]"]);
        let TokensCommand::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.format, ReportFormat::Json);
        assert!(args.verbose);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_workflow_subcommand_names() {
        let cli = WorkflowCli::try_parse_from(["design-workflow", "export", "--mode", "markdown"]).unwrap();
        let WorkflowCommand::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.mode, ExportMode::Markdown);

        let cli = WorkflowCli::try_parse_from(["design-workflow", "section-spec"]).unwrap();
        assert!(matches!(cli.command, WorkflowCommand::SectionSpec(SectionSpecArgs { name: None })));

        let cli = WorkflowCli::try_parse_from(["design-workflow", "schema", "testids"]).unwrap();
        assert!(matches!(
            cli.command,
            WorkflowCommand::Schema(SchemaArgs { artifact: ArtifactKind::Testids })
        ));

        assert!(WorkflowCli::try_parse_from(["design-workflow", "product-vision", "--force"]).is_ok());
        assert!(WorkflowCli::try_parse_from(["design-workflow", "nope"]).is_err());
    }
}
