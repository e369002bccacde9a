use crate::simulation_engine::geometry::Point;
use crate::simulation_engine::intersections::LightState;

/// Canvas axis a vehicle travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// An axis plus a direction of travel along it (+1.0 or -1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    pub axis: Axis,
    pub sign: f64,
}

impl Heading {
    pub const EAST: Heading = Heading { axis: Axis::X, sign: 1.0 };
    pub const WEST: Heading = Heading { axis: Axis::X, sign: -1.0 };
    pub const SOUTH: Heading = Heading { axis: Axis::Y, sign: 1.0 };
    pub const NORTH: Heading = Heading { axis: Axis::Y, sign: -1.0 };

    fn coordinate(&self, position: Point) -> f64 {
        match self.axis {
            Axis::X => position.x,
            Axis::Y => position.y,
        }
    }

    /// Signed distance travelled past `mark`. Negative while still short of it.
    pub fn progress(&self, position: Point, mark: f64) -> f64 {
        self.sign * (self.coordinate(position) - mark)
    }

    pub fn advance(&self, position: Point, distance: f64) -> Point {
        let delta = self.sign * distance;
        match self.axis {
            Axis::X => Point::new(position.x + delta, position.y),
            Axis::Y => Point::new(position.x, position.y + delta),
        }
    }
}

/// Where a turning vehicle leaves its approach axis and which way it goes next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Turn {
    pub point: f64,
    pub heading: Heading,
}

/// Motion of one (approach, maneuver) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementRule {
    /// Direction of travel before the turn.
    pub heading: Heading,
    /// Stop line coordinate on the heading axis.
    pub threshold: f64,
    /// `None` for straight-through traffic.
    pub turn: Option<Turn>,
}

impl MovementRule {
    /// True once the vehicle is strictly past the stop line.
    pub fn is_committed(&self, position: Point) -> bool {
        self.heading.progress(position, self.threshold) > 0.0
    }

    /// Position after one tick.
    ///
    /// A vehicle with a green light follows its path. One already past the stop
    /// line keeps going while the phase is yellow or red, and holds where it is
    /// while another approach has green. Anything else creeps up to the stop
    /// line and waits there.
    pub fn step(&self, position: Point, has_green: bool, phase: LightState, speed: f64) -> Point {
        let clearing = phase != LightState::Green && self.is_committed(position);
        if has_green || clearing {
            self.follow_path(position, speed)
        } else {
            self.approach_stop_line(position, speed)
        }
    }

    // The turn check is positional only, so a turn in progress is never undone.
    fn follow_path(&self, position: Point, speed: f64) -> Point {
        match self.turn {
            Some(turn) if self.heading.progress(position, turn.point) >= 0.0 => {
                turn.heading.advance(position, speed)
            }
            _ => self.heading.advance(position, speed),
        }
    }

    // Never moves a vehicle that is already on or past the line.
    fn approach_stop_line(&self, position: Point, speed: f64) -> Point {
        let remaining = -self.heading.progress(position, self.threshold);
        if remaining <= 0.0 {
            return position;
        }
        self.heading.advance(position, speed.min(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eastbound_left() -> MovementRule {
        MovementRule {
            heading: Heading::EAST,
            threshold: 100.0,
            turn: Some(Turn {
                point: 200.0,
                heading: Heading::NORTH,
            }),
        }
    }

    #[test]
    fn waits_exactly_on_the_stop_line() {
        let rule = eastbound_left();
        let next = rule.step(Point::new(99.5, 50.0), false, LightState::Red, 2.0);
        assert_eq!(next, Point::new(100.0, 50.0));
        assert_eq!(rule.step(next, false, LightState::Red, 2.0), next);
        assert!(!rule.is_committed(next));
    }

    #[test]
    fn turns_once_the_turning_point_is_reached() {
        let rule = eastbound_left();
        assert_eq!(
            rule.step(Point::new(199.0, 50.0), true, LightState::Green, 1.0),
            Point::new(200.0, 50.0)
        );
        assert_eq!(
            rule.step(Point::new(200.0, 50.0), true, LightState::Green, 1.0),
            Point::new(200.0, 49.0)
        );
    }

    #[test]
    fn committed_vehicle_keeps_turning_on_yellow_and_red() {
        let rule = eastbound_left();
        for phase in [LightState::Yellow, LightState::Red] {
            let next = rule.step(Point::new(200.0, 30.0), false, phase, 1.0);
            assert_eq!(next, Point::new(200.0, 29.0));
        }
    }

    #[test]
    fn committed_vehicle_holds_while_another_approach_is_green() {
        let rule = eastbound_left();
        for position in [Point::new(150.0, 50.0), Point::new(200.0, 30.0)] {
            assert_eq!(rule.step(position, false, LightState::Green, 1.0), position);
        }
    }

    #[test]
    fn heading_progress_respects_sign() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(Heading::EAST.progress(p, 5.0), 5.0);
        assert_eq!(Heading::WEST.progress(p, 5.0), -5.0);
        assert_eq!(Heading::NORTH.advance(p, 3.0), Point::new(10.0, 17.0));
    }
}
