// simulation.rs
use crate::config::{ConfigError, SimulationConfig};
use crate::control_system::traffic_light_controller::TrafficLightController;
use crate::renderer::Renderer;
use crate::shared_data::IntersectionSnapshot;
use crate::simulation_engine::geometry::Geometry;
use crate::simulation_engine::spawner::{spawn_producer, VehicleSpawner};
use crate::simulation_engine::vehicle_set::VehicleSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Totals reported when a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSummary {
    pub ticks: u64,
    pub spawned: u64,
    pub exited: u64,
    pub remaining: usize,
}

/// The controller, the geometry and the live vehicles of one run.
pub struct Simulation {
    geometry: Arc<Geometry>,
    controller: TrafficLightController,
    vehicles: VehicleSet,
    started_at: Instant,
    ticks: u64,
    exited: u64,
}

impl Simulation {
    pub fn new(config: &SimulationConfig, started_at: Instant) -> Result<Self, ConfigError> {
        let geometry = Arc::new(Geometry::new(config)?);
        let durations = config.phase_durations();
        let controller = match config.start_approach {
            Some(start) => TrafficLightController::new(start, started_at, durations),
            None => TrafficLightController::with_random_start(started_at, durations),
        };
        log::info!(
            "Simulation ready: {}x{} canvas, road width {}, {} starts green",
            geometry.width(),
            geometry.height(),
            geometry.road_width(),
            controller.active_approach()
        );
        Ok(Self {
            geometry,
            controller,
            vehicles: VehicleSet::new(),
            started_at,
            ticks: 0,
            exited: 0,
        })
    }

    pub fn geometry(&self) -> Arc<Geometry> {
        Arc::clone(&self.geometry)
    }

    /// Handle for producers; appends show up on the next tick.
    pub fn vehicles(&self) -> VehicleSet {
        self.vehicles.clone()
    }

    pub fn controller(&self) -> &TrafficLightController {
        &self.controller
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn exited(&self) -> u64 {
        self.exited
    }

    /// Runs one tick at `now` and returns what the renderer should draw.
    pub fn tick(&mut self, now: Instant) -> IntersectionSnapshot {
        let (active_approach, light_state) = self.controller.advance(now);
        let removed = self.vehicles.tick(active_approach, light_state, &self.geometry);
        self.exited += removed as u64;
        self.ticks += 1;

        let elapsed_ms = now.saturating_duration_since(self.started_at).as_millis() as u64;
        IntersectionSnapshot::new(
            self.ticks,
            elapsed_ms,
            active_approach,
            light_state,
            self.vehicles.snapshot(),
        )
    }
}

/// Runs the simulation until `shutdown` resolves or the tick limit is hit.
///
/// The producer runs as its own task. On the way out it is signalled to stop
/// and awaited before the summary is returned.
pub async fn run_simulation<F>(
    config: SimulationConfig,
    renderer: &mut dyn Renderer,
    shutdown: F,
) -> Result<SimulationSummary, ConfigError>
where
    F: Future<Output = ()>,
{
    let mut simulation = Simulation::new(&config, Instant::now())?;

    let spawner = match config.spawn_seed {
        Some(seed) => VehicleSpawner::seeded(seed, config.vehicle_speed),
        None => VehicleSpawner::new(config.vehicle_speed),
    };
    let (stop_tx, stop_rx) = watch::channel(false);
    let producer = spawn_producer(
        spawner,
        simulation.vehicles(),
        simulation.geometry(),
        config.spawn_interval(),
        stop_rx,
    );

    let mut ticker = interval(config.tick_period());
    // A late tick just sees a larger time step; no need to burst.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        if config
            .max_ticks
            .is_some_and(|max| simulation.ticks() >= max)
        {
            log::info!("Reached tick limit of {}", simulation.ticks());
            break;
        }
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Shutdown requested after {} ticks", simulation.ticks());
                break;
            }
            _ = ticker.tick() => {
                let snapshot = simulation.tick(Instant::now());
                renderer.render(&snapshot);
            }
        }
    }

    // The receiver may already be gone if the producer panicked.
    let _ = stop_tx.send(true);
    let accounted = simulation.exited() + simulation.vehicles().len() as u64;
    let spawned = join_producer(producer, accounted).await;
    renderer.finish();

    let summary = SimulationSummary {
        ticks: simulation.ticks(),
        spawned,
        exited: simulation.exited(),
        remaining: simulation.vehicles().len(),
    };
    log::info!(
        "Simulation finished: {} ticks, {} spawned, {} exited, {} still on the road",
        summary.ticks,
        summary.spawned,
        summary.exited,
        summary.remaining
    );
    Ok(summary)
}

/// Waits for the producer. Only the producer adds vehicles, so if it failed
/// the vehicles seen so far (`accounted`) are what it spawned.
async fn join_producer(producer: JoinHandle<u64>, accounted: u64) -> u64 {
    match producer.await {
        Ok(spawned) => spawned,
        Err(e) => {
            log::error!("Vehicle producer failed: {}", e);
            accounted
        }
    }
}
