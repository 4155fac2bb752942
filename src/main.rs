use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use talentflow::api::{run_api, ApiState};
use talentflow::client::MutationController;
use talentflow::config::{FaultPolicy, ServerConfig, SimulationConfig};
use talentflow::remote::RemoteEndpoint;
use talentflow::seed::seed_store;
use talentflow::shutdown::install_shutdown_handler;
use talentflow::store::RecordStore;

#[derive(Parser, Debug)]
#[command(name = "talentflow")]
#[command(version)]
#[command(about = "A recruiting-pipeline backend with a deliberately unreliable API")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server over a freshly seeded store
    Serve(ServeArgs),

    /// Drive the optimistic mutation controller against an in-process
    /// endpoint and print each action's lifecycle
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "8700")]
    port: u16,

    /// Artificial latency added to every API call, in milliseconds
    #[arg(long, default_value = "400")]
    latency_ms: u64,

    /// Probability in [0.0, 1.0] that a mutating call fails
    #[arg(long, default_value = "0.1")]
    fault_rate: f64,

    /// Seed for the fault-injection RNG (omit for entropy)
    #[arg(long)]
    fault_seed: Option<u64>,

    /// Number of jobs to seed
    #[arg(long, default_value = "25")]
    seed_jobs: usize,

    /// Number of candidates to seed
    #[arg(long, default_value = "1000")]
    seed_candidates: usize,

    /// Seed for generated sample data
    #[arg(long, default_value = "1")]
    data_seed: u64,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Probability in [0.0, 1.0] that a mutating call fails
    #[arg(long, default_value = "0.3")]
    fault_rate: f64,

    /// Seed for the fault-injection RNG
    #[arg(long, default_value = "7")]
    fault_seed: u64,

    /// Number of moves to attempt
    #[arg(long, default_value = "10")]
    moves: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match args.command {
        Commands::Serve(args) => run_server(args).await,
        Commands::Demo(args) => run_demo(args).await,
    }
}

async fn run_server(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&args.fault_rate) {
        return Err("--fault-rate must be within [0.0, 1.0]".into());
    }

    let server_config = ServerConfig {
        listen_addr: format!("0.0.0.0:{}", args.port).parse::<SocketAddr>()?,
        seed_jobs: args.seed_jobs,
        seed_candidates: args.seed_candidates,
        seed_rng: args.data_seed,
        ..ServerConfig::default()
    };

    let mut store = RecordStore::new();
    let mut rng = StdRng::seed_from_u64(server_config.seed_rng);
    seed_store(
        &mut store,
        server_config.seed_jobs,
        server_config.seed_candidates,
        &mut rng,
    );

    let simulation = SimulationConfig {
        latency: Duration::from_millis(args.latency_ms),
        faults: FaultPolicy {
            probability: args.fault_rate,
            seed: args.fault_seed,
            ..FaultPolicy::default()
        },
    };
    tracing::info!(
        latency_ms = args.latency_ms,
        fault_rate = args.fault_rate,
        "Simulated unreliability configured"
    );

    let remote = RemoteEndpoint::new(Arc::new(RwLock::new(store)), simulation);
    let shutdown = install_shutdown_handler();
    run_api(server_config.listen_addr, ApiState { remote }, shutdown).await;
    Ok(())
}

async fn run_demo(args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&args.fault_rate) {
        return Err("--fault-rate must be within [0.0, 1.0]".into());
    }

    let mut store = RecordStore::new();
    let mut rng = StdRng::seed_from_u64(1);
    seed_store(&mut store, 10, 0, &mut rng);

    let simulation = SimulationConfig {
        latency: Duration::from_millis(150),
        faults: FaultPolicy {
            probability: args.fault_rate,
            seed: Some(args.fault_seed),
            ..FaultPolicy::default()
        },
    };
    let remote = RemoteEndpoint::new(Arc::new(RwLock::new(store)), simulation);
    let controller = MutationController::new(remote);

    let jobs = controller.refresh_jobs().await?;
    println!("Loaded {} jobs", jobs.len());

    let mut confirmed = 0;
    let mut rolled_back = 0;
    for i in 0..args.moves {
        let n = controller.view().read().await.jobs.len() as u32;
        let from = i % n;
        let to = (i * 3 + 1) % n;
        match controller.move_job(from, to).await {
            Ok(_) => {
                confirmed += 1;
                println!("move {from} -> {to}: confirmed");
            }
            Err(err) => {
                rolled_back += 1;
                let hint = if err.is_retryable() {
                    ", worth retrying"
                } else {
                    ""
                };
                println!("move {from} -> {to}: rolled back ({err}{hint})");
            }
        }
    }

    let view = controller.view();
    let view = view.read().await;
    println!(
        "{confirmed} confirmed, {rolled_back} rolled back, ordering dense: {}",
        talentflow::ordering::is_dense(&view.jobs)
    );
    Ok(())
}
