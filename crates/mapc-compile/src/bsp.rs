// bsp.rs — read-only view of the externally built BSP tree
//
// The tree is built and owned by the partitioning collaborator; this core
// only follows child links. Children are arena indices rather than
// pointers, so a tree rebuild upstream cannot leave anything dangling
// here.

use mapc_common::math::Vec2;

/// One side of a split: another node, a leaf region, or the void outside
/// the map. Node ids index `BspTree::nodes`; leaf ids index the region
/// arena on the compile context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BspChild {
    Node(usize),
    Leaf(usize),
    None,
}

/// Binary partition node. The splitting line is stored as the two
/// endpoints of the segment it was built from; `children[0]` is the front
/// (left-of-line) side, `children[1]` the back.
#[derive(Debug, Clone)]
pub struct TraceNode {
    pub line: [Vec2; 2],
    pub children: [BspChild; 2],
}

#[derive(Debug, Clone, Default)]
pub struct BspTree {
    pub nodes: Vec<TraceNode>,
    pub root: BspChild,
}

impl Default for BspChild {
    fn default() -> Self {
        BspChild::None
    }
}

impl BspTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: BspChild::None,
        }
    }
}
