// Vehicle motion and the shared vehicle set under concurrent producers.

use intersection_sim::config::SimulationConfig;
use intersection_sim::simulation_engine::geometry::{Geometry, Point};
use intersection_sim::simulation_engine::intersections::{Approach, LightState};
use intersection_sim::simulation_engine::spawner::VehicleSpawner;
use intersection_sim::simulation_engine::vehicle_set::VehicleSet;
use intersection_sim::simulation_engine::vehicles::{Maneuver, Vehicle};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn geometry() -> Geometry {
    Geometry::new(&SimulationConfig::default()).unwrap()
}

#[test]
fn west_left_holds_on_red_then_moves_on_x_then_only_on_y() {
    let g = geometry();
    let mut vehicle = Vehicle::new(1, Approach::West, Maneuver::Left, 0.25, &g);
    vehicle.position = Point::new(g.threshold(Approach::West), vehicle.position.y);

    for light in [LightState::Red, LightState::Yellow, LightState::Green] {
        for _ in 0..20 {
            let before = vehicle.position;
            // Green for someone else, or any stop phase: no movement.
            let active = if light == LightState::Green {
                Approach::South
            } else {
                Approach::West
            };
            assert_eq!(vehicle.step(active, light, &g), before);
        }
    }

    let turning_point = g.turning_point(Maneuver::Left, Approach::West).unwrap();
    while vehicle.position.x < turning_point {
        let y = vehicle.position.y;
        vehicle.step(Approach::West, LightState::Green, &g);
        assert_eq!(vehicle.position.y, y);
    }
    let x = vehicle.position.x;
    while !vehicle.is_out_of_bounds(&g) {
        vehicle.step(Approach::West, LightState::Green, &g);
        assert_eq!(vehicle.position.x, x);
    }
}

#[test]
fn committed_vehicles_exit_while_the_queue_waits() {
    let g = geometry();
    let set = VehicleSet::new();

    let mut committed = Vehicle::new(1, Approach::East, Maneuver::Straight, 0.25, &g);
    committed.position.x = g.threshold(Approach::East) - 0.25;
    set.push(committed);
    set.push(Vehicle::new(2, Approach::East, Maneuver::Left, 0.25, &g));

    let mut exited = 0;
    for _ in 0..10_000 {
        exited += set.tick(Approach::East, LightState::Red, &g);
    }
    assert_eq!(exited, 1);
    let left = set.snapshot();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, 2);
    assert_eq!(left[0].position.x, g.threshold(Approach::East));
}

#[test]
fn vehicle_past_the_line_waits_out_another_approach_green() {
    let g = geometry();
    let mut vehicle = Vehicle::new(1, Approach::West, Maneuver::Straight, 0.25, &g);
    vehicle.position = Point::new(g.threshold(Approach::West) + 10.0, vehicle.position.y);
    let parked = vehicle.position;

    for _ in 0..100 {
        assert_eq!(vehicle.step(Approach::North, LightState::Green, &g), parked);
    }
    vehicle.step(Approach::North, LightState::Yellow, &g);
    assert!(vehicle.position.x > parked.x);
}

#[test]
fn concurrent_spawning_neither_loses_nor_duplicates_vehicles() {
    const PRODUCERS: u64 = 4;
    const PER_PRODUCER: u64 = 250;
    const TICKS: usize = 2_000;

    let config = SimulationConfig {
        vehicle_speed: 5.0,
        ..SimulationConfig::default()
    };
    let speed = config.vehicle_speed;
    let g = Arc::new(Geometry::new(&config).unwrap());
    let set = VehicleSet::new();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let set = set.clone();
            let g = Arc::clone(&g);
            thread::spawn(move || {
                let mut spawner = VehicleSpawner::seeded(p, speed);
                for _ in 0..PER_PRODUCER {
                    let mut vehicle = spawner.spawn_vehicle(&g);
                    // Keep ids unique across producers.
                    vehicle.id += p * PER_PRODUCER;
                    set.push(vehicle);
                    thread::yield_now();
                }
            })
        })
        .collect();

    let ticker = {
        let set = set.clone();
        let g = Arc::clone(&g);
        thread::spawn(move || {
            let mut removed = 0;
            for tick in 0..TICKS {
                let approach = Approach::ALL[(tick / 100) % 4];
                removed += set.tick(approach, LightState::Green, &g);
            }
            removed
        })
    };

    for producer in producers {
        producer.join().unwrap();
    }
    let removed = ticker.join().unwrap();

    let live = set.snapshot();
    assert_eq!(live.len() + removed, (PRODUCERS * PER_PRODUCER) as usize);
    let ids: HashSet<u64> = live.iter().map(|v| v.id).collect();
    assert_eq!(ids.len(), live.len());
}
