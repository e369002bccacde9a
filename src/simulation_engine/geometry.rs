use crate::config::{ConfigError, SimulationConfig};
use crate::global_variables::{SOUTH_STOP_LINE_INSET, STOP_LINE_GAP};
use crate::simulation_engine::intersections::Approach;
use crate::simulation_engine::movement::{Axis, Heading, MovementRule, Turn};
use crate::simulation_engine::vehicles::Maneuver;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A sub-pixel canvas position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fixed layout of the crossing: stop lines, turning points, spawn points and
/// the movement rule of every (approach, maneuver) pair.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Geometry {
    width: f64,
    height: f64,
    road_width: f64,
    center: Point,
    spawn_points: HashMap<Approach, Point>,
    rules: HashMap<(Approach, Maneuver), MovementRule>,
}

impl Geometry {
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let width = config.canvas_width as i64;
        let height = config.canvas_height as i64;
        let road = config.road_width as i64;

        let (cx, cy) = (width / 2, height / 2);
        let half = road / 2;
        let quarter = road / 4;
        // Width of the pedestrian crossing in front of each stop line.
        let crossing = road / 5;

        let mut thresholds = HashMap::new();
        thresholds.insert(Approach::West, cx - half - crossing - STOP_LINE_GAP);
        thresholds.insert(Approach::East, cx - half + road + crossing + STOP_LINE_GAP);
        thresholds.insert(Approach::North, cy - half - crossing - STOP_LINE_GAP);
        thresholds.insert(Approach::South, cy + road - SOUTH_STOP_LINE_INSET);

        let mut spawn_points = HashMap::new();
        spawn_points.insert(Approach::West, point(0, cy + quarter));
        spawn_points.insert(Approach::East, point(2 * cx, cy - quarter));
        spawn_points.insert(Approach::North, point(cx - quarter, 0));
        spawn_points.insert(Approach::South, point(cx + quarter, 2 * cy));

        let mut turning_points = HashMap::new();
        turning_points.insert((Maneuver::Left, Approach::West), cx + quarter);
        turning_points.insert((Maneuver::Left, Approach::North), cy + quarter);
        turning_points.insert((Maneuver::Left, Approach::East), cx - quarter);
        turning_points.insert((Maneuver::Left, Approach::South), cy - quarter);
        turning_points.insert((Maneuver::Right, Approach::West), cx - quarter);
        turning_points.insert((Maneuver::Right, Approach::North), cy - quarter);
        turning_points.insert((Maneuver::Right, Approach::East), cx + quarter);
        turning_points.insert((Maneuver::Right, Approach::South), cy + quarter);

        let mut rules = HashMap::new();
        for approach in Approach::ALL {
            let threshold = thresholds[&approach] as f64;
            for maneuver in Maneuver::ALL {
                let turn = match maneuver {
                    Maneuver::Straight => None,
                    Maneuver::Left | Maneuver::Right => {
                        turning_points.get(&(maneuver, approach)).map(|&tp| Turn {
                            point: tp as f64,
                            heading: turn_heading(approach, maneuver),
                        })
                    }
                };
                rules.insert(
                    (approach, maneuver),
                    MovementRule {
                        heading: approach_heading(approach),
                        threshold,
                        turn,
                    },
                );
            }
        }

        validate_rules(&rules, &spawn_points)?;

        Ok(Self {
            width: width as f64,
            height: height as f64,
            road_width: road as f64,
            center: point(cx, cy),
            spawn_points,
            rules,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn road_width(&self) -> f64 {
        self.road_width
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Movement rule of a pair. Every pair is present once `new` succeeded.
    pub fn rule(&self, approach: Approach, maneuver: Maneuver) -> &MovementRule {
        &self.rules[&(approach, maneuver)]
    }

    pub fn threshold(&self, approach: Approach) -> f64 {
        self.rule(approach, Maneuver::Straight).threshold
    }

    pub fn turning_point(&self, maneuver: Maneuver, approach: Approach) -> Option<f64> {
        self.rule(approach, maneuver).turn.map(|turn| turn.point)
    }

    pub fn spawn_point(&self, approach: Approach) -> Point {
        self.spawn_points[&approach]
    }

    /// Strictly outside the canvas on either axis.
    pub fn is_out_of_bounds(&self, position: Point) -> bool {
        position.x < 0.0 || position.x > self.width || position.y < 0.0 || position.y > self.height
    }
}

fn point(x: i64, y: i64) -> Point {
    Point::new(x as f64, y as f64)
}

fn approach_heading(approach: Approach) -> Heading {
    match approach {
        Approach::West => Heading::EAST,
        Approach::East => Heading::WEST,
        Approach::North => Heading::SOUTH,
        Approach::South => Heading::NORTH,
    }
}

fn turn_heading(approach: Approach, maneuver: Maneuver) -> Heading {
    match (approach, maneuver) {
        (Approach::West, Maneuver::Left) => Heading::NORTH,
        (Approach::West, _) => Heading::SOUTH,
        (Approach::East, Maneuver::Left) => Heading::SOUTH,
        (Approach::East, _) => Heading::NORTH,
        (Approach::North, Maneuver::Left) => Heading::EAST,
        (Approach::North, _) => Heading::WEST,
        (Approach::South, Maneuver::Left) => Heading::WEST,
        (Approach::South, _) => Heading::EAST,
    }
}

/// Checks the full approach x maneuver cross-product of a rule table.
///
/// Each approach needs a spawn point, each pair a rule, turning maneuvers a turn
/// onto the other axis, and along every path the order must be spawn point,
/// stop line, turning point.
pub fn validate_rules(
    rules: &HashMap<(Approach, Maneuver), MovementRule>,
    spawn_points: &HashMap<Approach, Point>,
) -> Result<(), ConfigError> {
    for approach in Approach::ALL {
        let spawn = spawn_points
            .get(&approach)
            .copied()
            .ok_or_else(|| ConfigError::Invalid(format!("no spawn point for {}", approach)))?;
        for maneuver in Maneuver::ALL {
            let rule = rules
                .get(&(approach, maneuver))
                .ok_or(ConfigError::MissingRule(approach, maneuver))?;

            if rule.heading.progress(spawn, rule.threshold) >= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} vehicles spawn at or past their stop line",
                    approach
                )));
            }

            match (maneuver, rule.turn) {
                (Maneuver::Straight, None) => {}
                (Maneuver::Straight, Some(_)) => {
                    return Err(ConfigError::Invalid(format!(
                        "straight traffic from {} must not turn",
                        approach
                    )))
                }
                (_, None) => return Err(ConfigError::MissingRule(approach, maneuver)),
                (_, Some(turn)) => {
                    if turn.heading.axis == rule.heading.axis {
                        return Err(ConfigError::Invalid(format!(
                            "{:?} turn from {} stays on its approach axis",
                            maneuver, approach
                        )));
                    }
                    let mut stop_line = spawn;
                    match rule.heading.axis {
                        Axis::X => stop_line.x = rule.threshold,
                        Axis::Y => stop_line.y = rule.threshold,
                    }
                    if rule.heading.progress(stop_line, turn.point) >= 0.0 {
                        return Err(ConfigError::Invalid(format!(
                            "{:?} turning point from {} lies before the stop line",
                            maneuver, approach
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}
