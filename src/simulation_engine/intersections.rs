use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four compass directions traffic enters the intersection from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Approach {
    North,
    East,
    South,
    West,
}

impl Approach {
    /// Rotation order of the light token.
    pub const ALL: [Approach; 4] = [
        Approach::North,
        Approach::East,
        Approach::South,
        Approach::West,
    ];

    /// The approach that receives the light after this one.
    pub fn next(self) -> Approach {
        match self {
            Approach::North => Approach::East,
            Approach::East => Approach::South,
            Approach::South => Approach::West,
            Approach::West => Approach::North,
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Approach::North => "north",
            Approach::East => "east",
            Approach::South => "south",
            Approach::West => "west",
        };
        f.write_str(name)
    }
}

/// Signal shown by the active approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LightState {
    Green,
    Yellow,
    Red,
}

impl LightState {
    /// The phase that follows this one in the cycle.
    pub fn next(self) -> LightState {
        match self {
            LightState::Green => LightState::Yellow,
            LightState::Yellow => LightState::Red,
            LightState::Red => LightState::Green,
        }
    }
}
