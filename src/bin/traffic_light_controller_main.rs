use intersection_sim::config::SimulationConfig;
use intersection_sim::control_system::traffic_light_controller::TrafficLightController;
use std::time::{Duration, Instant};

// Each approach holds the token for three phases. Saturates for huge counts.
fn phase_changes(rotations: u32) -> u32 {
    rotations.saturating_mul(4 * 3)
}

// Runs the light controller on its own and prints every phase change.
// Usage: traffic_light_controller_main [rotations]
fn main() {
    env_logger::init();

    let rotations: u32 = match std::env::args().nth(1) {
        Some(raw) => match raw.parse() {
            Ok(n) => n,
            Err(e) => {
                eprintln!("Invalid rotation count {:?}: {}", raw, e);
                std::process::exit(1);
            }
        },
        None => 1,
    };

    let config = SimulationConfig::default();
    let mut controller =
        TrafficLightController::with_random_start(Instant::now(), config.phase_durations());
    println!("Starting traffic controller for {} rotation(s)...", rotations);

    let mut last = (controller.active_approach(), controller.light_state());
    println!("{} is {:?}", last.0, last.1);
    let mut remaining = phase_changes(rotations);
    while remaining > 0 {
        std::thread::sleep(Duration::from_millis(50));
        let current = controller.advance(Instant::now());
        if current != last {
            println!("{} is {:?}", current.0, current.1);
            last = current;
            remaining -= 1;
        }
    }
}
