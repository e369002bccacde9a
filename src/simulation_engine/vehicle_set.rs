use crate::shared_data::VehicleData;
use crate::simulation_engine::geometry::Geometry;
use crate::simulation_engine::intersections::{Approach, LightState};
use crate::simulation_engine::vehicles::Vehicle;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to the live vehicles.
///
/// Clones point at the same collection. The producer only appends; the
/// simulation loop is the only caller of `tick`.
#[derive(Debug, Clone, Default)]
pub struct VehicleSet {
    vehicles: Arc<Mutex<Vec<Vehicle>>>,
}

impl VehicleSet {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic elsewhere must not take the whole simulation down with it.
    fn lock(&self) -> MutexGuard<'_, Vec<Vehicle>> {
        self.vehicles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, vehicle: Vehicle) {
        self.lock().push(vehicle);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Moves every vehicle one tick, then drops the ones that left the canvas.
    /// Returns how many were removed.
    pub fn tick(
        &self,
        active_approach: Approach,
        light_state: LightState,
        geometry: &Geometry,
    ) -> usize {
        let mut vehicles = self.lock();
        let before = vehicles.len();
        vehicles.retain_mut(|vehicle| {
            vehicle.step(active_approach, light_state, geometry);
            let gone = vehicle.is_out_of_bounds(geometry);
            if gone {
                log::debug!(
                    "Vehicle {} ({:?} from {}) left the canvas at ({:.2}, {:.2})",
                    vehicle.id,
                    vehicle.maneuver,
                    vehicle.incoming,
                    vehicle.position.x,
                    vehicle.position.y
                );
            }
            !gone
        });
        before - vehicles.len()
    }

    /// Copies the live vehicles for rendering.
    pub fn snapshot(&self) -> Vec<VehicleData> {
        self.lock().iter().map(VehicleData::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::simulation_engine::geometry::Point;
    use crate::simulation_engine::vehicles::Maneuver;

    fn geometry() -> Geometry {
        Geometry::new(&SimulationConfig::default()).unwrap()
    }

    #[test]
    fn clones_share_the_same_vehicles() {
        let g = geometry();
        let set = VehicleSet::new();
        let producer_side = set.clone();
        producer_side.push(Vehicle::new(1, Approach::North, Maneuver::Left, 0.25, &g));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }

    #[test]
    fn tick_removes_only_vehicles_that_leave() {
        let g = geometry();
        let set = VehicleSet::new();
        let mut leaving = Vehicle::new(1, Approach::West, Maneuver::Straight, 1.0, &g);
        leaving.position = Point::new(g.width() - 0.5, 437.0);
        set.push(leaving);
        set.push(Vehicle::new(2, Approach::East, Maneuver::Right, 1.0, &g));

        let removed = set.tick(Approach::West, LightState::Green, &g);
        assert_eq!(removed, 1);
        let remaining = set.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
        // East traffic is not green; it creeps toward its stop line.
        assert_eq!(remaining[0].position, Point::new(g.width() - 1.0, 363.0));
    }

    #[test]
    fn queued_vehicles_stay_put() {
        let g = geometry();
        let set = VehicleSet::new();
        let mut queued = Vehicle::new(1, Approach::North, Maneuver::Straight, 0.25, &g);
        queued.position.y = g.threshold(Approach::North);
        set.push(queued);
        for _ in 0..50 {
            assert_eq!(set.tick(Approach::South, LightState::Green, &g), 0);
        }
        assert_eq!(set.snapshot()[0].position.y, g.threshold(Approach::North));
    }
}
