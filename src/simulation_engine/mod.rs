// simulation_engine/mod.rs
pub mod geometry;
pub mod intersections;
pub mod movement;
pub mod simulation;
pub mod spawner;
pub mod vehicle_set;
pub mod vehicles;
