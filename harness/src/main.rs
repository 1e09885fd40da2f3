use clap::{Args, Parser, Subcommand};
use harness::{
    planned_checks, write_reports, AppConfig, Console, HarnessResult, ValidationRunner,
};
use servicenow::{InstanceConfig, ServiceNowClient, TableApi};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

/// Exit code when the suite itself breaks rather than a check failing.
const CRASH_EXIT_CODE: u8 = 2;

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Validate a ServiceNow application package installation over the REST API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every check against the instance and write the reports (default)
    Run(RunArgs),
    /// Print the checks that would run, without contacting the instance
    Plan {
        /// TOML application descriptor replacing the built-in one
        #[arg(long)]
        app_config: Option<PathBuf>,
    },
    /// Print the effective application descriptor as JSON
    ShowConfig {
        /// TOML application descriptor replacing the built-in one
        #[arg(long)]
        app_config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// TOML application descriptor replacing the built-in one
    #[arg(long)]
    app_config: Option<PathBuf>,
    /// Directory for test-results.json and TEST_REPORT.md
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
    /// Instance hostname, overriding SN_INSTANCE
    #[arg(short, long)]
    instance: Option<String>,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            app_config: None,
            output_dir: PathBuf::from("."),
            instance: None,
            no_color: false,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => run_suite(args).await,
        Commands::Plan { app_config } => show_plan(app_config.as_deref()).map(|_| 0),
        Commands::ShowConfig { app_config } => show_config(app_config.as_deref()).map(|_| 0),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("Test suite crashed: {}", e);
            eprintln!("Test suite crashed: {}", e);
            ExitCode::from(CRASH_EXIT_CODE)
        }
    }
}

fn load_app_config(path: Option<&Path>) -> HarnessResult<AppConfig> {
    match path {
        Some(path) => {
            info!("Loading application descriptor from {}", path.display());
            AppConfig::from_file(path)
        }
        None => Ok(AppConfig::default()),
    }
}

async fn run_suite(args: RunArgs) -> HarnessResult<u8> {
    let app = load_app_config(args.app_config.as_deref())?;

    let mut instance = InstanceConfig::from_env();
    if let Some(host) = args.instance {
        instance = instance.with_instance(host);
    }

    let console = if args.no_color {
        Console::plain()
    } else {
        Console::default()
    };

    if !instance.has_credentials() {
        console.line("WARN ServiceNow credentials not configured. Set SN_USERNAME and SN_PASSWORD.");
        console.line("   Every live check will fail until credentials are provided.");
    }

    let client = ServiceNowClient::new(instance)?;
    let summary = ValidationRunner::new(&client, &app)
        .with_console(console)
        .run()
        .await;

    let paths = write_reports(&args.output_dir, &summary, &app, client.instance_name())?;
    console.line("\nTest reports written:");
    console.line(&format!("   - {}", paths.json.display()));
    console.line(&format!("   - {}", paths.markdown.display()));

    Ok(summary.exit_code())
}

fn show_plan(app_config: Option<&Path>) -> HarnessResult<()> {
    let app = load_app_config(app_config)?;

    println!("Planned checks for {} (scope {}):", app.app_name, app.scope);
    for (index, check) in planned_checks(&app).iter().enumerate() {
        println!("  {}. {}", index + 1, check.name);
        println!("     {}", check.description);
    }

    Ok(())
}

fn show_config(app_config: Option<&Path>) -> HarnessResult<()> {
    let app = load_app_config(app_config)?;
    println!("{}", serde_json::to_string_pretty(&app)?);
    Ok(())
}
