use crate::simulation_engine::geometry::Geometry;
use crate::simulation_engine::intersections::Approach;
use crate::simulation_engine::vehicle_set::VehicleSet;
use crate::simulation_engine::vehicles::{Maneuver, Vehicle};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};

/// Creates vehicles with a uniformly random approach and maneuver.
pub struct VehicleSpawner {
    rng: SmallRng,
    next_vehicle_id: u64,
    speed: f64,
}

impl VehicleSpawner {
    pub fn new(speed: f64) -> Self {
        Self::with_rng(SmallRng::from_os_rng(), speed)
    }

    /// Reproducible spawner for tests and benchmarks.
    pub fn seeded(seed: u64, speed: f64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed), speed)
    }

    fn with_rng(rng: SmallRng, speed: f64) -> Self {
        Self {
            rng,
            next_vehicle_id: 1,
            speed,
        }
    }

    pub fn spawned(&self) -> u64 {
        self.next_vehicle_id - 1
    }

    pub fn spawn_vehicle(&mut self, geometry: &Geometry) -> Vehicle {
        let incoming = Approach::ALL[self.rng.random_range(0..Approach::ALL.len())];
        let maneuver = Maneuver::ALL[self.rng.random_range(0..Maneuver::ALL.len())];
        let vehicle = Vehicle::new(self.next_vehicle_id, incoming, maneuver, self.speed, geometry);
        self.next_vehicle_id += 1;
        vehicle
    }
}

/// Runs the producer as a tokio task: one vehicle every `interval` until the
/// stop signal turns true. Resolves to the number of vehicles spawned.
pub fn spawn_producer(
    mut spawner: VehicleSpawner,
    vehicles: VehicleSet,
    geometry: Arc<Geometry>,
    interval: Duration,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<u64> {
    tokio::spawn(async move {
        'producer: loop {
            if *stop.borrow() {
                break;
            }
            let vehicle = spawner.spawn_vehicle(&geometry);
            log::debug!(
                "Spawned vehicle {} from {} going {:?}",
                vehicle.id,
                vehicle.incoming,
                vehicle.maneuver
            );
            vehicles.push(vehicle);

            // Only a true stop flag ends the wait early; other updates keep
            // the cadence.
            let next_spawn = Instant::now() + interval;
            loop {
                tokio::select! {
                    _ = sleep_until(next_spawn) => break,
                    changed = stop.changed() => {
                        // Sender dropped counts as a stop request too.
                        if changed.is_err() || *stop.borrow_and_update() {
                            break 'producer;
                        }
                    }
                }
            }
        }
        log::info!("Vehicle producer stopped after {} vehicles", spawner.spawned());
        spawner.spawned()
    })
}
