use crate::simulation_engine::geometry::{Geometry, Point};
use crate::simulation_engine::intersections::{Approach, LightState};
use serde::{Deserialize, Serialize};

/// Path a vehicle takes through the crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Maneuver {
    Straight,
    Left,
    Right,
}

impl Maneuver {
    pub const ALL: [Maneuver; 3] = [Maneuver::Straight, Maneuver::Left, Maneuver::Right];

    /// RGB color the renderer paints vehicles with.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Maneuver::Straight => (255, 163, 60),
            Maneuver::Left => (135, 196, 255),
            Maneuver::Right => (255, 75, 145),
        }
    }
}

/// A vehicle travelling through the intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: u64,
    pub incoming: Approach,
    pub maneuver: Maneuver,
    pub position: Point,
    /// Pixels per tick, the same for every vehicle.
    pub speed: f64,
}

impl Vehicle {
    /// Places a new vehicle on the spawn point of its approach.
    pub fn new(
        id: u64,
        incoming: Approach,
        maneuver: Maneuver,
        speed: f64,
        geometry: &Geometry,
    ) -> Self {
        Self {
            id,
            incoming,
            maneuver,
            position: geometry.spawn_point(incoming),
            speed,
        }
    }

    /// Where this vehicle will be after one tick under the given light.
    pub fn next_position(
        &self,
        active_approach: Approach,
        light_state: LightState,
        geometry: &Geometry,
    ) -> Point {
        let has_green = self.incoming == active_approach && light_state == LightState::Green;
        geometry
            .rule(self.incoming, self.maneuver)
            .step(self.position, has_green, light_state, self.speed)
    }

    /// Moves the vehicle one tick and returns its new position.
    pub fn step(
        &mut self,
        active_approach: Approach,
        light_state: LightState,
        geometry: &Geometry,
    ) -> Point {
        self.position = self.next_position(active_approach, light_state, geometry);
        self.position
    }

    pub fn is_out_of_bounds(&self, geometry: &Geometry) -> bool {
        geometry.is_out_of_bounds(self.position)
    }

    /// Strictly past the stop line of its approach.
    pub fn is_committed(&self, geometry: &Geometry) -> bool {
        geometry
            .rule(self.incoming, self.maneuver)
            .is_committed(self.position)
    }
}
