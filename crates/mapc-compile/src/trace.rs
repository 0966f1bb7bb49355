// trace.rs — visibility trace through the BSP tree
//
// Walks a 2-D segment between a region sample point and a light position,
// splitting the segment at every partition line it straddles. A segment is
// blocked only by closed structures: leaves whose open gap has collapsed
// to door height or less. Everything else, including the void outside the
// map and zero-area leaves, passes light.

use mapc_common::math::{line_side, point_on_segment, Vec2};

use crate::bsp::{BspChild, BspTree};
use crate::region::Region;

// ============================================================
// Constants
// ============================================================

/// Fully clear. Values between blocked and clear are reserved for partial
/// transmission, which was never implemented upstream; today every trace
/// resolves to one of the two extremes.
pub const VIS_CLEAR: i32 = 100;

/// Fully blocked.
pub const VIS_BLOCKED: i32 = 0;

/// A leaf whose total gap height is at or below this many map units is a
/// closed door. Known upstream simplification; keep literal.
pub const DOOR_GAP_HEIGHT: f32 = 4.0;

// ============================================================
// Trace
// ============================================================

/// Trace the segment p1 -> p2 from the tree root. Returns VIS_BLOCKED or
/// VIS_CLEAR.
pub fn trace_visibility(tree: &BspTree, regions: &[Region], p1: &Vec2, p2: &Vec2) -> i32 {
    trace_r(tree, regions, p1, p2, tree.root)
}

fn trace_r(tree: &BspTree, regions: &[Region], p1: &Vec2, p2: &Vec2, child: BspChild) -> i32 {
    let num = match child {
        BspChild::Node(n) => n,
        BspChild::Leaf(l) => return leaf_visibility(&regions[l]),
        // Void outside the built geometry passes light.
        BspChild::None => return VIS_CLEAR,
    };

    let node = &tree.nodes[num];
    let d1 = line_side(&node.line[0], &node.line[1], p1);
    let d2 = line_side(&node.line[0], &node.line[1], p2);

    // Both endpoints on one side: descend without splitting.
    if d1 >= 0.0 && d2 >= 0.0 {
        return trace_r(tree, regions, p1, p2, node.children[0]);
    }
    if d1 <= 0.0 && d2 <= 0.0 {
        return trace_r(tree, regions, p1, p2, node.children[1]);
    }

    // Straddling: split at the crossing point, trace both halves. Either
    // half being blocked blocks the whole segment.
    let frac = d1 / (d1 - d2);
    let mid = point_on_segment(p1, p2, frac);
    let (near, far) = if d1 > 0.0 { (0, 1) } else { (1, 0) };

    let front = trace_r(tree, regions, p1, &mid, node.children[near]);
    if front == VIS_BLOCKED {
        return VIS_BLOCKED;
    }
    let back = trace_r(tree, regions, &mid, p2, node.children[far]);
    front.min(back)
}

/// Visibility contribution of one leaf region.
fn leaf_visibility(region: &Region) -> i32 {
    if region.degenerate {
        return VIS_CLEAR;
    }
    // No gaps at all: open space outside built geometry.
    if region.gaps.is_empty() {
        return VIS_CLEAR;
    }
    if region.gap_span() <= DOOR_GAP_HEIGHT {
        return VIS_BLOCKED;
    }
    VIS_CLEAR
}

// ============================================================
// Tests
// ============================================================
