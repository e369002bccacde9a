// Full-rotation checks of the light controller.

use intersection_sim::config::PhaseDurations;
use intersection_sim::control_system::traffic_light_controller::TrafficLightController;
use intersection_sim::simulation_engine::intersections::{Approach, LightState};
use std::time::{Duration, Instant};

const STEP: Duration = Duration::from_millis(100);

// Samples the controller every 100 ms for `total` and returns what it reported.
fn sample(start: Approach, total: Duration) -> Vec<(Duration, Approach, LightState, usize)> {
    let t0 = Instant::now();
    let mut controller = TrafficLightController::new(start, t0, PhaseDurations::default());
    let mut samples = Vec::new();
    let mut offset = Duration::ZERO;
    while offset <= total {
        let (approach, light) = controller.advance(t0 + offset);
        let non_red = Approach::ALL
            .iter()
            .filter(|&&a| controller.light_for(a) != LightState::Red)
            .count();
        samples.push((offset, approach, light, non_red));
        offset += STEP;
    }
    samples
}

#[test]
fn at_most_one_approach_is_ever_non_red() {
    for start in Approach::ALL {
        for (_, _, light, non_red) in sample(start, Duration::from_secs(96)) {
            let expected = if light == LightState::Red { 0 } else { 1 };
            assert_eq!(non_red, expected);
        }
    }
}

#[test]
fn rotation_order_is_fixed_from_any_start() {
    for start in Approach::ALL {
        let mut order = vec![start];
        for (_, approach, _, _) in sample(start, Duration::from_secs(48)) {
            if *order.last().unwrap() != approach {
                order.push(approach);
            }
        }
        let mut expected = vec![start];
        for _ in 0..4 {
            let next = expected.last().unwrap().next();
            expected.push(next);
        }
        assert_eq!(order, expected, "starting from {}", start);
        assert_eq!(order.first(), order.last());
    }
}

#[test]
fn each_approach_holds_the_token_for_twelve_seconds() {
    let samples = sample(Approach::North, Duration::from_secs(48));
    // (offset, approach, light) at every change.
    let mut changes = Vec::new();
    let mut last = None;
    for (offset, approach, light, _) in samples {
        if last != Some((approach, light)) {
            changes.push((offset, approach, light));
            last = Some((approach, light));
        }
    }

    let secs = |s| Duration::from_secs(s);
    let expected = vec![
        (secs(0), Approach::North, LightState::Green),
        (secs(5), Approach::North, LightState::Yellow),
        (secs(7), Approach::East, LightState::Red),
        (secs(12), Approach::East, LightState::Green),
        (secs(17), Approach::East, LightState::Yellow),
        (secs(19), Approach::South, LightState::Red),
        (secs(24), Approach::South, LightState::Green),
        (secs(29), Approach::South, LightState::Yellow),
        (secs(31), Approach::West, LightState::Red),
        (secs(36), Approach::West, LightState::Green),
        (secs(41), Approach::West, LightState::Yellow),
        (secs(43), Approach::North, LightState::Red),
        (secs(48), Approach::North, LightState::Green),
    ];
    assert_eq!(changes, expected);
}

#[test]
fn repeated_calls_at_one_instant_are_idempotent() {
    let t0 = Instant::now();
    let mut controller =
        TrafficLightController::new(Approach::East, t0, PhaseDurations::default());
    for offset in [5, 7, 12] {
        let at = t0 + Duration::from_secs(offset);
        let first = controller.advance(at);
        assert_eq!(controller.advance(at), first);
        assert_eq!(controller.advance(at), first);
    }
    assert_eq!(controller.active_approach(), Approach::South);
    assert_eq!(controller.light_state(), LightState::Green);
}
