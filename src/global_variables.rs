// Canvas and road dimensions (pixels)
pub const CANVAS_WIDTH: u32 = 1000;
pub const CANVAS_HEIGHT: u32 = 800;
pub const ROAD_WIDTH: u32 = 150;

// Gap kept between the crossing and the stop line on most approaches.
pub const STOP_LINE_GAP: i64 = 30;
// The south stop line sits this far inside the far edge of the road.
pub const SOUTH_STOP_LINE_INSET: i64 = 15;

// Light phase durations (seconds)
pub const GREEN_SECS: u64 = 5;
pub const YELLOW_SECS: u64 = 2;
pub const RED_SECS: u64 = 5;

// Vehicles
pub const VEHICLE_SPEED: f64 = 0.25; // pixels per tick
pub const SPAWN_INTERVAL_MS: u64 = 1000;

// Simulation loop. Fast enough that a vehicle caught past its stop line
// leaves the canvas within the following red phase (longest path ~710 px).
pub const TICK_RATE_HZ: u32 = 600;
