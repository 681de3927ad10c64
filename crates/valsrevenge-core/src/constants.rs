//! Simulation constants and tuning parameters.

// --- Frame timing ---

/// Largest frame delta the simulation will integrate in one tick (seconds).
/// Longer host stalls are clipped so spawns and motion do not jump.
pub const MAX_FRAME_DT: f64 = 0.1;

// --- Player ---

/// Player run speed per axis (points/s). Diagonals move at this speed on both axes.
pub const PLAYER_RUN_SPEED: f32 = 100.0;

/// Distance a thrown projectile travels per axis (points).
pub const ATTACK_DISTANCE: f32 = 300.0;

/// Flight time of a thrown projectile (seconds).
pub const ATTACK_DURATION_SECS: f32 = 0.25;

/// Projectile sprite footprint.
pub const PROJECTILE_SIZE: (f32, f32) = (16.0, 48.0);

pub const PLAYER_DEFAULT_HEALTH: i32 = 3;

// --- Built-in motion ---

/// Halvings used to bring a blocked body flush against a blocker.
pub const SLIDE_BISECTIONS: usize = 6;

/// Bodies closer than this count as touching for contact reports (points).
/// Blocked bodies stop just short of real overlap.
pub const CONTACT_SKIN: f32 = 1.0;

// --- Monster agents ---

pub const MONSTER_MASS: f32 = 1.0;
pub const MONSTER_MAX_SPEED: f32 = 125.0;
pub const MONSTER_MAX_ACCELERATION: f32 = 125.0;
pub const MONSTER_RADIUS: f32 = 60.0;
/// Speed a fresh monster agent starts with, heading along +x.
pub const MONSTER_INITIAL_SPEED: f32 = 100.0;
pub const MONSTER_SPRITE_SCALE: f32 = 0.65;
pub const MONSTER_SIZE: (f32, f32) = (64.0, 64.0);

/// Prediction horizon for the intercept goal (seconds).
pub const INTERCEPT_PREDICTION_SECS: f32 = 1.0;

pub const WANDER_WEIGHT: f32 = 100.0;
/// Intercept weight while the player holds a key.
pub const INTERCEPT_WEIGHT_ACTIVE: f32 = 100.0;
pub const INTERCEPT_WEIGHT_IDLE: f32 = 0.0;

/// Radius of the wander circle projected ahead of the agent.
pub const WANDER_RADIUS: f32 = 1.0;
/// Distance of the wander circle ahead of the agent.
pub const WANDER_DISTANCE: f32 = 2.0;
/// Maximum change of the wander angle per second (radians).
pub const WANDER_JITTER_PER_SEC: f32 = 3.0;

// --- Pathfinding agents ---

pub const PATROL_MASS: f32 = 1.0;
pub const PATROL_MAX_SPEED: f32 = 100.0;
pub const PATROL_MAX_ACCELERATION: f32 = 100.0;
pub const PATROL_RADIUS: f32 = 60.0;
/// Speed a patroller starts with when pathfinding begins.
pub const PATROL_INITIAL_SPEED: f32 = 50.0;
pub const PATROL_PREDICTION_SECS: f32 = 1.0;
pub const FOLLOW_PATH_WEIGHT: f32 = 0.5;
pub const AVOID_OBSTACLES_WEIGHT: f32 = 100.0;
/// Path tolerance band. Zero as observed in the shipped levels.
pub const PATROL_PATH_RADIUS: f32 = 0.0;

// --- Generators ---

pub const GENERATOR_DEFAULT_MAX_MONSTERS: u32 = 10;
pub const GENERATOR_DEFAULT_WAIT_SECS: f32 = 5.0;
pub const GENERATOR_DEFAULT_MONSTER_HEALTH: i32 = 3;

/// Lateral offsets a fresh monster is displaced by; weighted two-to-one toward the left.
pub const SPAWN_LATERAL_OFFSETS: [f32; 3] = [-50.0, -50.0, 50.0];

// --- Health defaults ---

pub const DEFAULT_HEALTH: i32 = 3;

// --- Effect durations (stand-ins for sound completion callbacks) ---

/// Time between entering Dying and removal/reset.
pub const DEATH_EFFECT_SECS: f64 = 0.5;

// --- Controls ---

/// Joystick travel from centre to either axis limit (points).
pub const JOYSTICK_RANGE: f32 = 55.0;
/// Offsets shorter than this read as `Direction::Stop`.
pub const JOYSTICK_DEAD_ZONE: f32 = 10.0;

// --- Persistence ---

pub const SAVE_FILE_NAME: &str = "gamedata.json";
