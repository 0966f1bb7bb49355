// bspfile.rs — binary level-format design bounds and canonical table records
//
// The emitter serializes the plane and texinfo tables verbatim, in index
// order. Index stability and the plane pair layout (2k = canonical plane,
// 2k+1 = its exact negation) are a hard contract with that emitter.

use crate::math::Vec3;

// ============================================================
// Upper design bounds
// ============================================================

pub const MAX_MAP_PLANES: usize = 65536;
pub const MAX_MAP_TEXINFO: usize = 8192;

/// Fixed texture-name buffer in the texinfo record, NUL terminator included.
pub const MAX_TEXNAME: usize = 32;

// ============================================================
// Plane axis classification
// ============================================================

// 0-2 are axial planes, 3-5 are dominant-axis planes
pub const PLANE_X: i32 = 0;
pub const PLANE_Y: i32 = 1;
pub const PLANE_Z: i32 = 2;
pub const PLANE_ANYX: i32 = 3;
pub const PLANE_ANYY: i32 = 4;
pub const PLANE_ANYZ: i32 = 5;

// ============================================================
// Surface flags
// ============================================================

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SurfFlags: i32 {
        const LIGHT   = 0x1;
        const SLICK   = 0x2;
        const SKY     = 0x4;
        const WARP    = 0x8;
        const TRANS33 = 0x10;
        const TRANS66 = 0x20;
        const FLOWING = 0x40;
        const NODRAW  = 0x80;
    }
}

// ============================================================
// Canonical table records
// ============================================================

#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct DPlane {
    pub normal: Vec3,
    pub dist: f32,
    pub plane_type: i32,
}

#[derive(Debug, Clone)]
#[repr(C)]
pub struct TexInfo {
    /// [s, t] texture-projection vectors, 4 components each.
    pub vecs: [[f32; 4]; 2],
    pub flags: SurfFlags,
    pub value: i32,
    /// NUL-padded texture name.
    pub texture: [u8; MAX_TEXNAME],
    /// Next texinfo in the caller-side animation chain, -1 = none.
    pub next_texinfo: i32,
}

impl TexInfo {
    /// Decode the fixed name buffer up to the first NUL.
    pub fn texture_name(&self) -> &str {
        let end = self
            .texture
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MAX_TEXNAME);
        std::str::from_utf8(&self.texture[..end]).unwrap_or("")
    }
}

// ============================================================
// Tests
// ============================================================
