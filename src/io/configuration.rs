//! Synthesis constants and runtime configuration defaults

// Default values for the crack parameters exposed on the command line
/// Number of crack seeds grown per mask
pub const DEFAULT_NUM_CRACKS: usize = 3;
/// Shortest main-body length in steps
pub const DEFAULT_MIN_LENGTH: usize = 300;
/// Longest main-body length in steps
pub const DEFAULT_MAX_LENGTH: usize = 500;
/// Probability of spawning one more branch from the same seed
pub const DEFAULT_BRANCH_PROB: f64 = 0.3;
/// Multiplier applied to the stroke thickness profile
pub const DEFAULT_THICKNESS_SCALE: f64 = 1.0;
/// Direction changes attempted per step before a branch stops
pub const DEFAULT_MAX_RETRIES: usize = 5;
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

// Region handling
/// Intensities strictly above this value count as inside the region
pub const MASK_THRESHOLD: u8 = 127;
/// Intensity written for crack pixels
pub const STENCIL_VALUE: u8 = 255;
/// Boundary draws attempted before a crack is skipped
pub const SEED_ATTEMPTS: usize = 20;

// Stroke shape
/// Largest per-axis stride multiplier of a main-body step
pub const MAX_STEP_STRIDE: i64 = 3;
/// Per-axis jitter added to a main-body step
pub const STEP_JITTER: i64 = 1;
/// Heading drift after an accepted main-body step (radians, about 11 degrees)
pub const STEP_TURN: f64 = 0.2;
/// Heading change after a rejected main-body step (radians)
pub const RETRY_TURN: f64 = std::f64::consts::FRAC_PI_4;
/// Steps appended past the end of each branch
pub const TAIL_STEPS: usize = 40;
/// Fixed stride of a tail step in pixels
pub const TAIL_STRIDE: f64 = 2.0;
/// Heading drift after an accepted tail step (radians, about 3 degrees)
pub const TAIL_TURN: f64 = 0.05;
/// Heading change after a rejected tail step (radians)
pub const TAIL_RETRY_TURN: f64 = std::f64::consts::FRAC_PI_6;

// Patch handling
/// Edge length of the square patch cut from large regions
pub const DEFAULT_CROP_SIZE: u32 = 768;
/// Radius of the square dilation applied before guidance edge extraction
pub const GUIDANCE_DILATION: u8 = 1;
/// Lower hysteresis threshold of the guidance Canny pass
pub const GUIDANCE_CANNY_LOW: f32 = 100.0;
/// Upper hysteresis threshold of the guidance Canny pass
pub const GUIDANCE_CANNY_HIGH: f32 = 200.0;

// Generative refiner sampling defaults
/// Seed handed to the refiner
pub const DEFAULT_REFINER_SEED: u64 = 1;
/// Prompt adherence strength
pub const DEFAULT_GUIDANCE_SCALE: f64 = 70.0;
/// Strength of the guidance image conditioning
pub const DEFAULT_CONDITIONING_SCALE: f64 = 2.5;
/// Number of sampling steps
pub const DEFAULT_INFERENCE_STEPS: u32 = 200;
/// Text description of the damage to synthesize
pub const DEFAULT_REFINER_PROMPT: &str = "Ultra-realistic high resolution macro photograph of jagged dark deep recessed cracks in a concrete wall, thin hairline fractures blending naturally with the surface, subtle shadow and depth, photorealistic";

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output naming
/// Suffix added to crack stencil filenames
pub const OUTPUT_SUFFIX: &str = "_crack_mask";
/// Suffix of a patch stencil reprojected onto the full-size canvas
pub const FULL_STENCIL_SUFFIX: &str = "_crack_mask_full";
/// Suffix stripped from cropped mask stems before naming the stencil
pub const CROPPED_MASK_SUFFIX: &str = "_cropped_mask";
/// Suffix of a cropped image patch
pub const CROPPED_IMAGE_SUFFIX: &str = "_cropped";
/// Suffix of the crop coordinate record
pub const CROP_COORDS_SUFFIX: &str = "_crop_coords";
/// Suffix of a composited full-size image
pub const MODIFIED_SUFFIX: &str = "_modified";
/// Suffix of a guidance edge map
pub const GUIDE_SUFFIX: &str = "_guide";
