//! Algorithm constants and runtime configuration defaults

// Signature extraction
/// Points sampled along each tile edge
pub const EDGE_SAMPLES: usize = 8;
/// Pixels sampled inward along the winning ray of each edge sample
pub const RAY_DEPTH: usize = 10;
/// Candidate ray angles in degrees, relative to the edge's inward normal
pub const RAY_ANGLES_DEG: [f32; 5] = [-60.0, -30.0, 0.0, 30.0, 60.0];
/// Tiles converted per chunk when signature building is interleaved
pub const SIGNATURE_TILES_PER_CHUNK: usize = 16;

// Bucket quantization of mean edge color
/// Quantization bits per `OKLab` channel (5 bits = 32 levels)
pub const KEY_BITS: u32 = 5;
/// Quantization levels per channel derived from `KEY_BITS`
pub const KEY_LEVELS: u32 = 1 << KEY_BITS;

// Candidate search
/// Candidates sampled from the matching edge bucket per attempt
pub const K_BUCKET: usize = 24;
/// Uniformly random exploratory candidates per attempt
pub const K_RANDOM: usize = 16;
/// Random positions examined by the fallback jump tournament
pub const TOURNAMENT_T: usize = 8;
/// Bounded random probes before falling back to an exhaustive scan when
/// locating a candidate tile on the board
pub const PROBE_TRIES: usize = 6;

// Acceptance policy
/// Probability of accepting a non-improving best move
pub const ESCAPE_MOVE_CHANCE: f64 = 0.1 / 100.0;
/// Escape chance multiplier applied while a move is tabu
pub const ESCAPE_TABU_FACTOR: f64 = 0.25;
/// Steps during which a moved tile stays tabu
pub const TABU_STEPS: u32 = 50;
/// Improvement threshold that overrides tabu status
pub const TABU_OVERRIDE: f64 = -0.1;

// Scoring weights
/// Weight of the border color term
pub const W_COLOR: f64 = 1.0;
/// Weight of the inward ray (vector) term
pub const W_VECTOR: f64 = 0.7;
/// Weight of the region-cohesion (blob) term; zero disables it
pub const W_BLOB: f64 = 0.12;
/// Penalty weight for mismatched winning-ray angle indices, relative to the
/// ray color mismatch itself
pub const ANGLE_PENALTY_WEIGHT: f64 = 0.15;

// Cursor focus dynamics
/// Maximum consecutive stays on the same focus position
pub const CURSOR_MAX_STAY: u32 = 12;
/// Chance to step sideways instead of straight toward the worst seam
pub const CURSOR_SIDE_STEP_CHANCE: f64 = 0.18;
/// Minimum teleport probability
pub const CURSOR_JUMP_BASE: f64 = 0.02;
/// Probability that a jump targets the frontier rather than a tournament
pub const CURSOR_JUMP_FRONTIER_P: f64 = 0.75;
/// Failed-attempt streak that saturates the stall signal
pub const STALL_WINDOW: f64 = 60.0;
/// Multiplicative stall decay applied on every accepted move
pub const STALL_DECAY_ON_ACCEPT: f64 = 0.6;
/// Hard cap on the stall counter
pub const STALL_HARD_CAP: u32 = 200;
/// Smoothing factor of the accepted-delta moving average
pub const DELTA_EMA_ALPHA: f64 = 0.06;
/// Accepted-delta magnitude that saturates the improvement-trend signal
pub const TREND_SCALE: f64 = 0.15;

// Normalization heuristics for cursor signals (rough; only shapes movement)
/// Local score mapped to zero badness
pub const BADNESS_BASELINE: f64 = 0.1;
/// Local score span mapped onto the badness range
pub const BADNESS_SPAN: f64 = 0.35;
/// Cohesion cost mapped to zero
pub const COHESION_BASELINE: f64 = 0.01;
/// Cohesion cost span mapped onto the cohesion range
pub const COHESION_SPAN: f64 = 0.06;

// Growth mode
/// Initial seam-cost threshold for accepting a growth placement
pub const GROW_MATCH_THRESHOLD: f64 = 0.95;
/// Multiplicative relaxation applied when no frontier position matches
pub const GROW_RELAX_FACTOR: f64 = 1.05;

// Defaults for configurable shell parameters
/// Square tile side in source pixels
pub const DEFAULT_TILE_PX: usize = 32;
/// Fixed seed for reproducible runs
pub const DEFAULT_SEED: u64 = 42;
/// Optimization attempts per file before exporting
pub const DEFAULT_ATTEMPTS: u64 = 200_000;
/// Attempts run between progress updates
pub const ATTEMPT_BATCH: u64 = 512;
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Individual progress bars shown before switching to batch display
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 4;

/// Runtime configuration owned by the solver context
///
/// Everything here is fixed for the lifetime of a run except the four mode
/// toggles (`use_vector`, `allow_rotation`, `toroidal_x`, `toroidal_y`),
/// which the solver exposes through setters that trigger the required
/// local-score recompute.
#[derive(Clone, Copy, Debug)]
// Mode toggles are genuinely independent booleans, not a state machine
#[allow(clippy::struct_excessive_bools)]
pub struct SolverConfig {
    /// Border color mismatch weight
    pub w_color: f64,
    /// Inward ray mismatch weight
    pub w_vector: f64,
    /// Region-cohesion weight; zero disables the term
    pub w_blob: f64,
    /// Whether the vector term participates in seam costs
    pub use_vector: bool,
    /// Whether moves may change tile rotations
    pub allow_rotation: bool,
    /// Whether the horizontal axis wraps
    pub toroidal_x: bool,
    /// Whether the vertical axis wraps
    pub toroidal_y: bool,
    /// Candidates sampled from the matching bucket
    pub k_bucket: usize,
    /// Random exploratory candidates
    pub k_random: usize,
    /// Tournament size for fallback jump targeting
    pub tournament: usize,
    /// Probability of accepting a non-improving move
    pub escape_move_chance: f64,
    /// Tabu window in optimizer steps
    pub tabu_steps: u32,
    /// Delta threshold that overrides tabu status
    pub tabu_override: f64,
    /// Maximum consecutive cursor stays
    pub cursor_max_stay: u32,
    /// Sideways-step chance while the cursor walks
    pub cursor_side_step_chance: f64,
    /// Minimum cursor teleport probability
    pub cursor_jump_base: f64,
    /// Probability that a cursor jump pops the frontier
    pub cursor_jump_frontier_p: f64,
    /// Initial growth acceptance threshold
    pub grow_match_threshold: f64,
    /// Growth threshold relaxation factor
    pub grow_relax_factor: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            w_color: W_COLOR,
            w_vector: W_VECTOR,
            w_blob: W_BLOB,
            use_vector: true,
            allow_rotation: true,
            toroidal_x: true,
            toroidal_y: true,
            k_bucket: K_BUCKET,
            k_random: K_RANDOM,
            tournament: TOURNAMENT_T,
            escape_move_chance: ESCAPE_MOVE_CHANCE,
            tabu_steps: TABU_STEPS,
            tabu_override: TABU_OVERRIDE,
            cursor_max_stay: CURSOR_MAX_STAY,
            cursor_side_step_chance: CURSOR_SIDE_STEP_CHANCE,
            cursor_jump_base: CURSOR_JUMP_BASE,
            cursor_jump_frontier_p: CURSOR_JUMP_FRONTIER_P,
            grow_match_threshold: GROW_MATCH_THRESHOLD,
            grow_relax_factor: GROW_RELAX_FACTOR,
        }
    }
}
