// light.rs — static light solving over grouped regions
//
// Every region gets the maximum usable light level visible from its gap
// midpoint, clamped below by the configured minimum, then each shading
// group is flattened to its maximum so a physical sector lights
// uniformly.

use log::debug;

use mapc_common::math::{vector_length, vector_subtract, Vec3};

use crate::bsp::BspTree;
use crate::context::{CompileContext, Progress, TICK_INTERVAL};
use crate::error::CompileError;
use crate::trace::{trace_visibility, VIS_BLOCKED};

// ============================================================
// Constants
// ============================================================

/// Distance (after attenuation) per one step of light-level falloff.
pub const STYLE_FALLOFF_STEP: f32 = 6.0;

// ============================================================
// Lights
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Point,
    /// Directional sky light. Needs a sky-visibility test, not a
    /// point-light trace; rejected by this solver.
    Sun,
}

/// A point light discovered by the upstream entity pass. Immutable during
/// the solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub origin: Vec3,
    /// Packed style value; the high byte is the base light level.
    pub level: i32,
    /// Distance-attenuation divisor.
    pub atten: f32,
    pub kind: LightKind,
}

impl Light {
    pub fn point(origin: Vec3, level: i32, atten: f32) -> Self {
        Self {
            origin,
            level,
            atten,
            kind: LightKind::Point,
        }
    }
}

/// Light level this light can deliver at the given attenuated distance:
/// base level minus one step per STYLE_FALLOFF_STEP units, quantized to
/// 16-unit style buckets while positive. Mirrors the coarse, lossy
/// style encoding of the level format.
pub fn effective_style(level: i32, dist: f32) -> i32 {
    let mut style = (level >> 8) - (dist / STYLE_FALLOFF_STEP).floor() as i32;
    if style > 0 {
        style &= !0xf;
    }
    style
}

// ============================================================
// Solver
// ============================================================

/// Shade every grouped region, then merge each shading group to its
/// maximum. Processes regions in the order recorded by the grouping pass
/// and stops at the solid tail. Polls `progress` every TICK_INTERVAL
/// regions; on cancellation the loop stops early and unvisited regions
/// keep whatever shade they had (merge is skipped, the partial result is
/// accepted as-is).
pub fn shade_regions(
    ctx: &mut CompileContext,
    tree: &BspTree,
    progress: &mut dyn Progress,
) -> Result<(), CompileError> {
    if ctx.lights.iter().any(|l| l.kind == LightKind::Sun) {
        return Err(CompileError::SunLightUnsupported);
    }

    let mut since_tick = 0usize;
    let mut cancelled = false;

    for oi in 0..ctx.shade_order.len() {
        let ri = ctx.shade_order[oi];
        if ctx.regions[ri].group < 0 {
            // Solid regions sorted to the tail need no light.
            break;
        }

        since_tick += 1;
        if since_tick >= TICK_INTERVAL {
            since_tick = 0;
            progress.tick();
            if progress.cancelled() {
                cancelled = true;
                break;
            }
        }

        let shade = shade_one_region(ctx, tree, ri)?;
        ctx.regions[ri].shade = shade;
        ctx.stats.c_regions_shaded += 1;
    }

    if !cancelled {
        merge_shade_groups(ctx);
    }

    debug!(
        "shade_regions: {} shaded, {} traces, {} skipped{}",
        ctx.stats.c_regions_shaded,
        ctx.stats.c_traces,
        ctx.stats.c_trace_skips,
        if cancelled { " (cancelled)" } else { "" }
    );
    Ok(())
}

/// Evaluate all lights against one region's sample point.
fn shade_one_region(
    ctx: &mut CompileContext,
    tree: &BspTree,
    ri: usize,
) -> Result<i32, CompileError> {
    let sample = ctx.regions[ri].sample_point();
    let mut shade = ctx.min_shade;

    for li in 0..ctx.lights.len() {
        let light = ctx.lights[li];

        let delta = vector_subtract(&light.origin, &sample);
        let dist = vector_length(&delta);
        if dist == 0.0 {
            return Err(CompileError::DegenerateVector {
                what: "sample-to-light",
            });
        }

        // Cheap bound check before the expensive trace: a light that
        // cannot beat the current shade is skipped outright.
        let style = effective_style(light.level, dist / light.atten);
        if style <= shade {
            ctx.stats.c_trace_skips += 1;
            continue;
        }

        ctx.stats.c_traces += 1;
        let vis = trace_visibility(
            tree,
            &ctx.regions,
            &[sample[0], sample[1]],
            &[light.origin[0], light.origin[1]],
        );
        if vis != VIS_BLOCKED {
            shade = style;
        }
    }

    Ok(shade)
}

/// Flatten every contiguous run of equal group ids in the shading order
/// to the run's maximum shade. Idempotent; stops at the solid tail.
pub fn merge_shade_groups(ctx: &mut CompileContext) {
    let mut i = 0;
    while i < ctx.shade_order.len() {
        let group = ctx.regions[ctx.shade_order[i]].group;
        if group < 0 {
            break;
        }

        let mut j = i;
        let mut max_shade = i32::MIN;
        while j < ctx.shade_order.len() && ctx.regions[ctx.shade_order[j]].group == group {
            max_shade = max_shade.max(ctx.regions[ctx.shade_order[j]].shade);
            j += 1;
        }
        for k in i..j {
            let ri = ctx.shade_order[k];
            ctx.regions[ri].shade = max_shade;
        }
        i = j;
    }
}

// ============================================================
// Tests
// ============================================================
