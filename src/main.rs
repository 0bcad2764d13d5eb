use btc_planner::api::{self, ApiResult, CompareCli, ProjectionCli, ScheduleCli};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "btc_planner", about = "Bitcoin allocation projections and loan schedules")]
struct Args {
    #[arg(long, default_value = "info", help = "Log level when RUST_LOG is unset")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Project one strategy over the scenario horizon
    Project(ProjectionCli),
    /// Project several strategies side by side and rank them
    Compare(CompareCli),
    /// Build the collateralized-loan schedule
    Schedule(ScheduleCli),
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_or_exit(output: ApiResult<String>) {
    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match args.command {
        Command::Serve { port } => {
            if let Err(e) = api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Project(cli) => print_or_exit(api::run_projection_command(&cli)),
        Command::Compare(cli) => print_or_exit(api::run_compare_command(&cli)),
        Command::Schedule(cli) => print_or_exit(api::run_schedule_command(&cli)),
    }
}
