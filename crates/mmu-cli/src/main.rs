//! MMU Companion CLI
//!
//! Command-line front end over the forms engine.
//!
//! # Usage
//!
//! ```bash
//! mmu templates list
//! mmu templates show pump_inspection --format json
//! mmu render pump_inspection --set temperature=23.5 --set status=ATT
//! mmu fill mmu_daily_checklist --equipment MMU-14 --set engine_oil=SAT --submit
//! mmu equipment list
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "mmu")]
#[command(version)]
#[command(about = "MMU Companion forms command line interface", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, short, global = true)]
    format: Option<output::OutputFormat>,

    /// Engine configuration file (JSON)
    #[arg(long, short, global = true, env = "MMU_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of JSON template overrides
    #[arg(long, global = true, env = "MMU_TEMPLATE_DIR")]
    template_dir: Option<PathBuf>,

    /// Name recorded as the author of new forms
    #[arg(long, global = true, env = "MMU_USER")]
    user: Option<String>,

    /// Profile name from config file
    #[arg(long, short, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect form templates
    Templates {
        #[command(subcommand)]
        action: TemplateCommands,
    },
    /// Render a form after applying field values
    Render {
        /// Form type code; unknown codes use the default template
        code: String,
        /// Field value as id=text, repeatable
        #[arg(long = "set", value_name = "ID=VALUE")]
        values: Vec<String>,
    },
    /// Fill a form and save it as a draft or submission; records live in memory and are not kept after exit
    Fill {
        code: String,
        #[arg(long = "set", value_name = "ID=VALUE")]
        values: Vec<String>,
        /// Prefill equipment fields from the fleet register
        #[arg(long)]
        equipment: Option<String>,
        /// Submit instead of saving a draft
        #[arg(long)]
        submit: bool,
    },
    /// Browse the fleet register
    Equipment {
        #[command(subcommand)]
        action: EquipmentCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// List available templates
    List,
    /// Show a template's sections and fields
    Show { code: String },
}

#[derive(Subcommand)]
enum EquipmentCommands {
    /// List equipment
    List,
    /// Get equipment details
    Get { id: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli { format, config: config_path, template_dir, user, profile, command } = cli;

    let command = match command {
        Commands::Config { action } => return commands::config::handle(action, profile.as_deref()),
        other => other,
    };

    let file = config::Config::load(profile.as_deref())?;
    let settings = commands::Settings::resolve(&file, format, config_path.as_deref(), template_dir, user)?;

    match command {
        Commands::Templates { action } => commands::templates::handle(action, &settings).await,
        Commands::Render { code, values } => commands::render::handle(&code, &values, &settings).await,
        Commands::Fill { code, values, equipment, submit } => {
            commands::fill::handle(&code, &values, equipment.as_deref(), submit, &settings).await
        }
        Commands::Equipment { action } => commands::equipment::handle(action, &settings).await,
        Commands::Config { .. } => Ok(()),
    }
}
