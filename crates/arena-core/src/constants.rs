//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Battlefield ---

/// Battlefield width in pixels.
pub const BATTLEFIELD_WIDTH: f64 = 2000.0;

/// Battlefield height in pixels.
pub const BATTLEFIELD_HEIGHT: f64 = 1000.0;

/// Edge length of one structure cell in pixels.
pub const CELL_SIZE: f64 = 16.0;

/// Top of the ground band where ground units (and crash landings) sit.
pub const GROUND_BAND_MIN_Y: f64 = 760.0;

/// Bottom of the ground band.
pub const GROUND_BAND_MAX_Y: f64 = 920.0;

/// Cruise altitude band for freshly deployed air units.
pub const AIR_SPAWN_Y: f64 = 300.0;

/// Width of each base rectangle (flush against the battlefield edge).
pub const BASE_WIDTH: f64 = 90.0;

/// Vertical extent of each base rectangle.
pub const BASE_TOP_Y: f64 = 620.0;

/// Default base hit points when the node config has no override.
pub const BASE_DEFAULT_HP: f64 = 1000.0;

// --- Mobility ---

/// Converts engine power per unit mass into raw speed (pixels/s).
pub const SPEED_SCALE: f64 = 30.0;

/// Acceleration as a fraction of raw speed.
pub const ACCEL_FACTOR: f64 = 0.92;

/// Acceleration ceiling as a multiple of max speed.
pub const ACCEL_SPEED_CAP_FACTOR: f64 = 1.6;

/// Per-second velocity retention at standstill.
pub const TURN_DRAG_MIN: f64 = 0.80;

/// Per-second velocity retention at full speed.
pub const TURN_DRAG_MAX: f64 = 0.94;

/// Air units whose achievable speed drops below this lose lift.
pub const AIR_LIFT_MIN_SPEED: f64 = 45.0;

/// Gravity applied to air units in the air-drop state (pixels/s²).
pub const AIR_DROP_GRAVITY: f64 = 420.0;

// --- Weapons & projectiles ---

/// Minimum projectile lifetime in seconds.
pub const PROJECTILE_TTL_MIN: f64 = 2.0;

/// Speed floor used when deriving projectile lifetime from range.
pub const PROJECTILE_TTL_SPEED_FLOOR: f64 = 120.0;

/// Bomb-delivery muzzle speed multiplier.
pub const BOMB_SPEED_FACTOR: f64 = 0.5;

/// Bomb-delivery gravity multiplier.
pub const BOMB_GRAVITY_FACTOR: f64 = 1.35;

/// Loader duration multiplier for fast-operation loaders.
pub const LOADER_FAST_FACTOR: f64 = 0.82;

/// Loader duration multiplier for ordinary loaders.
pub const LOADER_SLOW_FACTOR: f64 = 1.08;

/// Burst interval fallback when no compatible loader remains alive.
pub const LOADER_DEFAULT_BURST_SECS: f64 = 0.3;

/// Nonlinear armor softening scale in the hit damage model.
pub const ARMOR_SOFTEN_SCALE: f64 = 1.0;

/// Vertical band inside which a projectile can strike an air unit.
pub const AIR_HIT_Y_TOLERANCE: f64 = 48.0;

// --- Targeting & AI ---

/// Default preferred engagement distance.
pub const DESIRED_RANGE_DEFAULT: f64 = 280.0;

/// Inside this fraction of desired range the AI backs off.
pub const RETREAT_BAND_FACTOR: f64 = 0.6;

/// Weight on vertical separation in target scoring.
pub const TARGET_Y_WEIGHT: f64 = 0.7;

/// Speed reference for the closing penalty in target scoring.
pub const CLOSING_SPEED_REF: f64 = 40.0;

/// Scale of the closing penalty in target scoring.
pub const CLOSING_PENALTY_FACTOR: f64 = 0.2;

/// Structural integrity below which the default tree retreats evasively.
pub const EVADE_INTEGRITY_THRESHOLD: f64 = 0.24;

/// Projectile pressure kernel scale (summed as `scale / d²`).
pub const PROJECTILE_PRESSURE_SCALE: f64 = 20_000.0;

/// Pressure above which the movement planner adds a perpendicular dodge.
pub const DODGE_PRESSURE_MIN: f64 = 0.15;

/// Dodge weight multiplier on pressure.
pub const DODGE_WEIGHT: f64 = 0.7;

/// Pressure above which air units are permitted to descend.
pub const DESCEND_PRESSURE_MIN: f64 = 0.5;

/// Ground-vs-ground shots require vertical separation within this band.
pub const GROUND_FIRE_Y_TOLERANCE: f64 = 90.0;

/// Global multiplier applied to weapon range when judging reachability.
pub const EFFECTIVE_RANGE_MULTIPLIER: f64 = 1.15;

/// Flat range bonus for airborne shooters.
pub const AIR_RANGE_ALTITUDE_BONUS: f64 = 60.0;

// --- Weapon plan scoring ---

/// Weight on slot damage.
pub const SCORE_DAMAGE_WEIGHT: f64 = 1.2;

/// Cap on the range-alignment bonus.
pub const SCORE_RANGE_ALIGN_MAX: f64 = 25.0;

/// Bonus when the ballistic solver found a lead solution.
pub const SCORE_LEAD_BONUS: f64 = 18.0;

/// Bonus when only direct aim is available.
pub const SCORE_LEAD_FALLBACK: f64 = 9.3;

/// Penalty when the shot bearing falls outside the firing cone.
pub const SCORE_ANGLE_PENALTY: f64 = 7.0;

// --- Aim feedback ---

/// Vertical aim-bias correction step applied per observed miss.
pub const AIM_BIAS_STEP: f64 = 4.0;

/// Bound on the accumulated vertical aim bias.
pub const AIM_BIAS_LIMIT: f64 = 36.0;

// --- Enemy spawn economy ---

/// Base gas accrual rate for the enemy economy (gas/s at difficulty 1).
pub const ENEMY_GAS_RATE_BASE: f64 = 6.0;

/// Gas rate growth per difficulty point.
pub const ENEMY_GAS_RATE_PER_DIFFICULTY: f64 = 1.5;

/// Enemy army cap at difficulty 1.
pub const ENEMY_CAP_BASE: u32 = 4;

/// Additional army cap per difficulty point.
pub const ENEMY_CAP_PER_DIFFICULTY: u32 = 1;

/// Seconds between enemy deploy attempts.
pub const ENEMY_DEPLOY_INTERVAL_SECS: f64 = 4.0;

/// Player starting gas.
pub const PLAYER_STARTING_GAS: f64 = 120.0;

/// Player army cap.
pub const PLAYER_ARMY_CAP: u32 = 8;

// --- Effects ---

/// Debris fragments scattered per destroyed cell.
pub const DEBRIS_PER_CELL: usize = 3;

/// Particles emitted per blast detonation.
pub const PARTICLES_PER_BLAST: usize = 8;

/// Lifetime of a debris fragment in seconds.
pub const DEBRIS_TTL_SECS: f64 = 1.4;

/// Lifetime of a blast particle in seconds.
pub const PARTICLE_TTL_SECS: f64 = 0.6;
