use clap::Parser;
use platform_ui_devtools::cli::{WorkflowCli, WorkflowCommand};
use platform_ui_devtools::config::Config;
use platform_ui_devtools::workflow::issue;
use platform_ui_devtools::workflow::layout::{Layout, ProductDoc};
use platform_ui_devtools::workflow::{artifact, export, scaffold, validate};
use platform_ui_devtools::{EXIT_FAILURE, EXIT_SUCCESS, logging};
use std::path::Path;
use tracing::{error, info};

fn main() {
    let cli = WorkflowCli::parse();
    logging::init(&cli.global.log_level);

    match run(&cli) {
        Ok(true) => std::process::exit(EXIT_SUCCESS),
        Ok(false) => std::process::exit(EXIT_FAILURE),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Run one subcommand; `Ok(false)` means issues were found
fn run(cli: &WorkflowCli) -> anyhow::Result<bool> {
    if let WorkflowCommand::Init(args) = &cli.command {
        Config::init(&cli.global.config, args.r#override)?;
        info!("Config file initialized at {}", cli.global.config);
        return Ok(true);
    }

    let config = Config::load(&cli.global.config, &cli.global.config_overrides)?;
    let root = std::env::current_dir()?;
    let layout = Layout::new(&config.workflow, &root);

    match &cli.command {
        WorkflowCommand::Init(_) => Ok(true),
        WorkflowCommand::ProductVision(args) => product_doc(&layout, ProductDoc::Vision, args.force),
        WorkflowCommand::ProductRoadmap(args) => product_doc(&layout, ProductDoc::Roadmap, args.force),
        WorkflowCommand::DataModel(args) => product_doc(&layout, ProductDoc::DataModel, args.force),
        WorkflowCommand::SectionSpec(args) => match &args.name {
            Some(name) => {
                scaffold::section_spec(&layout, name)?;
                Ok(true)
            }
            None => {
                list_components(&layout)?;
                error!("Missing component name, usage: design-workflow section-spec <name>");
                Ok(false)
            }
        },
        WorkflowCommand::Export(args) => {
            let (_, issues) = export::export(&layout, args.mode, args.output.as_deref().map(Path::new))?;
            Ok(issue::report_issues(&issues))
        }
        WorkflowCommand::CheckApproval(args) => {
            let issues = validate::check_approvals(&layout, args.name.as_deref())?;
            Ok(issue::report_issues(&issues))
        }
        WorkflowCommand::Validate => {
            let issues = validate::validate_all(&layout)?;
            Ok(issue::report_issues(&issues))
        }
        WorkflowCommand::ListComponents => {
            list_components(&layout)?;
            Ok(true)
        }
        WorkflowCommand::Schema(args) => {
            println!("{}", artifact::schema(args.artifact)?);
            Ok(true)
        }
    }
}

fn product_doc(layout: &Layout, doc: ProductDoc, force: bool) -> anyhow::Result<bool> {
    scaffold::product_doc(layout, doc, force)?;
    Ok(true)
}

fn list_components(layout: &Layout) -> anyhow::Result<()> {
    let statuses = validate::list_components(layout)?;
    if statuses.is_empty() {
        info!("No components under {}", layout.specs_dir.display());
        return Ok(());
    }
    info!("{} components:", statuses.len());
    for status in statuses {
        info!("  {}", status.line());
    }
    Ok(())
}
