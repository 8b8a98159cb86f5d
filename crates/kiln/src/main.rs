mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kiln")]
#[command(about = "Build, test and push the container images declared in an inventory", long_about = None)]
struct Cli {
    /// Increase log verbosity on stderr (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every image, then build its tests on top of it
    Test {
        #[command(flatten)]
        inventory: InventoryArgs,
        #[command(flatten)]
        docker: DockerArgs,
        #[command(flatten)]
        run: RunArgs,
        /// Do not reuse the layer cache
        #[arg(long)]
        no_cache: bool,
        /// Directory for per-worker test workspaces
        #[arg(long, env = "KILN_WORKSPACE")]
        workspace: Option<PathBuf>,
    },
    /// Push every image to its registry
    Push {
        #[command(flatten)]
        inventory: InventoryArgs,
        #[command(flatten)]
        docker: DockerArgs,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Tag every image with its declared aliases
    Alias {
        #[command(flatten)]
        inventory: InventoryArgs,
        #[command(flatten)]
        docker: DockerArgs,
    },
    /// Check the inventory without running anything
    Validate {
        #[command(flatten)]
        inventory: InventoryArgs,
    },
    /// Print version information
    Version,
}

#[derive(Args)]
pub struct InventoryArgs {
    /// Inventory file (default: ./inventory.yml, ./.kiln/inventory.yml or KILN_INVENTORY_PATH)
    #[arg(short, long)]
    pub inventory: Option<PathBuf>,
}

#[derive(Args)]
pub struct DockerArgs {
    /// docker-compatible CLI used for build / push / tag
    #[arg(long, env = "KILN_DOCKER", default_value = "docker")]
    pub docker: String,
}

#[derive(Args)]
pub struct RunArgs {
    /// Number of images processed concurrently (values below 1 become 1)
    #[arg(
        short = 'j',
        long,
        env = "KILN_THREADS",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub threads: i64,
    /// Extra attempts after a failed build or push (values below 0 become 0)
    #[arg(
        short,
        long,
        env = "KILN_RETRIES",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub retries: i64,
}

fn init_tracing(verbose: u8) {
    // stdout はレポート専用なのでログは stderr へ
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let failures = match cli.command {
        Commands::Version => {
            println!("kiln {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Validate { inventory } => {
            commands::validate::handle(&inventory)?;
            return Ok(());
        }
        Commands::Test {
            inventory,
            docker,
            run,
            no_cache,
            workspace,
        } => commands::test::handle(&inventory, &docker, &run, no_cache, workspace).await?,
        Commands::Push {
            inventory,
            docker,
            run,
        } => commands::push::handle(&inventory, &docker, &run).await?,
        Commands::Alias { inventory, docker } => {
            commands::alias::handle(&inventory, &docker).await?
        }
    };

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
