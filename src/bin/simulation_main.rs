// simulation_main.rs
use intersection_sim::config::SimulationConfig;
use intersection_sim::monitoring::traffic_monitoring_system::TrafficMonitor;
use intersection_sim::renderer::{Renderer, SnapshotWriter};
use intersection_sim::simulation_engine::simulation::run_simulation;
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };

    let mut renderers: Vec<Box<dyn Renderer + Send>> = Vec::new();
    match &config.csv_log_path {
        Some(path) => match TrafficMonitor::to_csv_file(path) {
            Ok(monitor) => renderers.push(Box::new(monitor)),
            Err(e) => {
                eprintln!("Error opening {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => renderers.push(Box::new(TrafficMonitor::without_recorder())),
    }
    if let Some(path) = &config.snapshot_path {
        match File::create(path) {
            Ok(file) => renderers.push(Box::new(SnapshotWriter::new(BufWriter::new(file)))),
            Err(e) => {
                eprintln!("Error creating {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    println!("Starting intersection simulation (Ctrl-C to stop)...");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Error waiting for Ctrl-C: {}", e);
        }
    };

    match run_simulation(config, &mut renderers, shutdown).await {
        Ok(summary) => {
            println!(
                "Done: {} ticks, {} vehicles spawned, {} exited, {} still on the road.",
                summary.ticks, summary.spawned, summary.exited, summary.remaining
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Simulation error: {}", e);
            ExitCode::FAILURE
        }
    }
}
