// src/shared_data.rs

use crate::simulation_engine::geometry::Point;
use crate::simulation_engine::intersections::{Approach, LightState};
use crate::simulation_engine::vehicles::{Maneuver, Vehicle};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// What a renderer needs to draw one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleData {
    pub id: u64,
    pub incoming: Approach,
    pub maneuver: Maneuver,
    pub position: Point,
}

impl From<&Vehicle> for VehicleData {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            incoming: vehicle.incoming,
            maneuver: vehicle.maneuver,
            position: vehicle.position,
        }
    }
}

/// Immutable view of the crossing after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionSnapshot {
    pub tick: u64,
    /// Milliseconds since the simulation started.
    pub elapsed_ms: u64,
    pub active_approach: Approach,
    pub light_state: LightState,
    /// Light shown on each approach, in rotation order.
    pub lights: Vec<(Approach, LightState)>,
    pub vehicles: Vec<VehicleData>,
}

impl IntersectionSnapshot {
    pub fn new(
        tick: u64,
        elapsed_ms: u64,
        active_approach: Approach,
        light_state: LightState,
        vehicles: Vec<VehicleData>,
    ) -> Self {
        let lights = Approach::ALL
            .iter()
            .map(|&approach| {
                let shown = if approach == active_approach {
                    light_state
                } else {
                    LightState::Red
                };
                (approach, shown)
            })
            .collect();
        Self {
            tick,
            elapsed_ms,
            active_approach,
            light_state,
            lights,
            vehicles,
        }
    }
}

/// Seconds since the Unix epoch, for log records.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
