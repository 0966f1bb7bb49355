// context.rs — per-level compile state threaded through the passes
//
// All derived state lives here instead of in process-wide globals, and is
// reset at the start of every level build.

use log::debug;

use crate::light::Light;
use crate::region::{Region, Surface};

// ============================================================
// Constants
// ============================================================

/// Lowest final shade a region can end up with.
pub const DEFAULT_MIN_SHADE: i32 = 96;

/// First group id handed out when a region has no explicit tag. Map tags
/// are 16-bit, so minted ids can never collide with a user tag.
pub const FIRST_MINTED_GROUP: i32 = 0x10000;

/// Regions processed between cooperative cancellation checks.
pub const TICK_INTERVAL: usize = 16;

// ============================================================
// Progress reporting / cancellation
// ============================================================

/// Cooperative hook the solver polls during long region loops. The
/// surrounding application uses `tick` to keep its UI alive and
/// `cancelled` to abort the remaining work; regions not yet visited keep
/// whatever shade they already had.
pub trait Progress {
    fn tick(&mut self) {}
    fn cancelled(&self) -> bool {
        false
    }
}

/// No-op progress sink for headless callers.
pub struct NoProgress;

impl Progress for NoProgress {}

// ============================================================
// Statistics
// ============================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileStats {
    /// Visibility traces actually run.
    pub c_traces: i32,
    /// Lights skipped by the cheap bound check before tracing.
    pub c_trace_skips: i32,
    /// Regions that went through the light solver.
    pub c_regions_shaded: i32,
    /// Group ids minted for untagged regions.
    pub c_groups_minted: i32,
}

// ============================================================
// Compile context
// ============================================================

pub struct CompileContext {
    /// Surface arena; gaps refer into this by index.
    pub surfaces: Vec<Surface>,
    /// Region arena; BSP leaves refer into this by index.
    pub regions: Vec<Region>,
    /// Lights discovered by the upstream entity pass.
    pub lights: Vec<Light>,
    /// Region indices in shading order: descending group id, solid
    /// (group -1) regions at the tail. Filled by the grouping pass.
    pub shade_order: Vec<usize>,
    /// Lowest admissible final shade.
    pub min_shade: i32,
    /// Next group id to mint for an untagged region.
    pub next_group: i32,
    pub stats: CompileStats,
}

impl Default for CompileContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CompileContext {
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            regions: Vec::new(),
            lights: Vec::new(),
            shade_order: Vec::new(),
            min_shade: DEFAULT_MIN_SHADE,
            next_group: FIRST_MINTED_GROUP,
            stats: CompileStats::default(),
        }
    }

    /// Reset derived per-level state. Surfaces, regions and lights are
    /// replaced wholesale by the caller for each level; this clears what
    /// the passes themselves accumulate.
    pub fn begin_level(&mut self) {
        self.shade_order.clear();
        self.next_group = FIRST_MINTED_GROUP;
        self.stats = CompileStats::default();
        debug!("begin_level: compile state reset");
    }
}

// ============================================================
// Tests
// ============================================================
