#![allow(clippy::needless_return, clippy::needless_range_loop, clippy::float_cmp,
         clippy::identity_op, clippy::manual_range_contains)]

pub mod math;
pub mod bspfile;
