#![allow(clippy::needless_return, clippy::needless_range_loop, clippy::float_cmp,
         clippy::manual_range_contains, clippy::comparison_chain,
         clippy::too_many_arguments)]

pub mod error;
pub mod region;
pub mod bsp;
pub mod context;
pub mod group;
pub mod trace;
pub mod light;
pub mod registry;

pub use error::CompileError;
pub use context::{CompileContext, CompileStats, NoProgress, Progress};
pub use region::{Gap, Properties, Region, Surface};
pub use bsp::{BspChild, BspTree, TraceNode};
pub use group::group_regions;
pub use trace::{trace_visibility, VIS_BLOCKED, VIS_CLEAR};
pub use light::{merge_shade_groups, shade_regions, Light, LightKind};
pub use registry::PrimitiveTables;
