// registry.rs — canonical plane and texinfo tables
//
// Deduplicates oriented planes and texture-projection descriptors into the
// dense index tables the binary-format emitter serializes verbatim. Both
// tables are append-only for the duration of one level and must be cleared
// in lockstep with their hash indices before the next one.

use log::debug;

use mapc_common::bspfile::{
    DPlane, SurfFlags, TexInfo, MAX_MAP_PLANES, MAX_MAP_TEXINFO, MAX_TEXNAME, PLANE_ANYX, PLANE_X,
};
use mapc_common::math::{dot_product, vector_negate, vector_normalize, Vec3};

use crate::error::CompileError;

// ============================================================
// Constants
// ============================================================

pub const PLANE_HASHES: usize = 64;
pub const TEXINFO_HASHES: usize = 64;

const NORMAL_EPSILON: f32 = 0.00001;
const DIST_EPSILON: f32 = 0.01;
/// Texinfo projection components match within this tolerance.
const TEXINFO_EPSILON: f32 = 0.01;

// ============================================================
// Primitive tables
// ============================================================

pub struct PrimitiveTables {
    /// Pair layout: index 2k is the canonical plane (dominant-axis
    /// component non-negative), 2k+1 its exact negation. `add_plane`
    /// returns the canonical index OR'd with the flipped bit, which
    /// therefore indexes the caller's original orientation directly.
    pub planes: Vec<DPlane>,
    plane_hash: Vec<Vec<usize>>,
    pub texinfo: Vec<TexInfo>,
    texinfo_hash: Vec<Vec<usize>>,
}

impl Default for PrimitiveTables {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimitiveTables {
    pub fn new() -> Self {
        Self {
            planes: Vec::new(),
            plane_hash: vec![Vec::new(); PLANE_HASHES],
            texinfo: Vec::new(),
            texinfo_hash: vec![Vec::new(); TEXINFO_HASHES],
        }
    }

    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    pub fn num_texinfo(&self) -> usize {
        self.texinfo.len()
    }

    /// Reset both tables and both hash indices for a new level. Nothing
    /// from a previous level may leak into the next one.
    pub fn clear(&mut self) {
        debug!(
            "primitive tables cleared: {} planes, {} texinfos dropped",
            self.planes.len(),
            self.texinfo.len()
        );
        self.planes.clear();
        self.texinfo.clear();
        for bucket in &mut self.plane_hash {
            bucket.clear();
        }
        for bucket in &mut self.texinfo_hash {
            bucket.clear();
        }
    }

    // ============================================================
    // Planes
    // ============================================================

    /// Register the plane through `point` with the given direction.
    /// Returns the table index of the caller's orientation: canonical
    /// index for planes whose dominant axis was already non-negative,
    /// canonical index | 1 for planes stored flipped.
    pub fn add_plane(&mut self, point: &Vec3, dir: &Vec3) -> Result<usize, CompileError> {
        let mut normal = *dir;
        if vector_normalize(&mut normal) == 0.0 {
            return Err(CompileError::DegenerateVector {
                what: "plane direction",
            });
        }
        let mut dist = dot_product(point, &normal);

        // Canonical sign: the dominant axis component is never negative.
        let axis = major_axis(&normal);
        let flipped = normal[axis] < 0.0;
        if flipped {
            normal = vector_negate(&normal);
            dist = -dist;
        }

        let hash = hash_plane(&normal, dist);
        for &pi in &self.plane_hash[hash] {
            if plane_matches(&self.planes[pi], &normal, dist) {
                return Ok(pi | flipped as usize);
            }
        }

        if self.planes.len() + 2 > MAX_MAP_PLANES {
            return Err(CompileError::TableOverflow {
                table: "plane",
                limit: MAX_MAP_PLANES,
            });
        }

        // Append the canonical plane and its exact negation as a pair.
        // Both carry the classification of the canonical normal.
        let plane_type = plane_type_for_normal(&normal);
        let index = self.planes.len();
        self.planes.push(DPlane { normal, dist, plane_type });
        self.planes.push(DPlane {
            normal: vector_negate(&normal),
            dist: -dist,
            plane_type,
        });
        self.plane_hash[hash].push(index);

        Ok(index | flipped as usize)
    }

    // ============================================================
    // Texinfo
    // ============================================================

    /// Register a texture-projection descriptor. Two descriptors are the
    /// same entity iff name, flags, and all 8 projection components match
    /// within tolerance.
    pub fn add_texinfo(
        &mut self,
        name: &str,
        flags: SurfFlags,
        s: &[f32; 4],
        t: &[f32; 4],
    ) -> Result<usize, CompileError> {
        if name.len() >= MAX_TEXNAME {
            return Err(CompileError::TextureNameTooLong {
                name: name.to_string(),
                limit: MAX_TEXNAME - 1,
            });
        }

        let hash = hash_texname(name);
        'probe: for &ti in &self.texinfo_hash[hash] {
            let entry = &self.texinfo[ti];
            if entry.flags != flags || entry.texture_name() != name {
                continue;
            }
            for j in 0..4 {
                if (entry.vecs[0][j] - s[j]).abs() > TEXINFO_EPSILON
                    || (entry.vecs[1][j] - t[j]).abs() > TEXINFO_EPSILON
                {
                    continue 'probe;
                }
            }
            return Ok(ti);
        }

        if self.texinfo.len() >= MAX_MAP_TEXINFO {
            return Err(CompileError::TableOverflow {
                table: "texinfo",
                limit: MAX_MAP_TEXINFO,
            });
        }

        let mut texture = [0u8; MAX_TEXNAME];
        texture[..name.len()].copy_from_slice(name.as_bytes());
        let index = self.texinfo.len();
        self.texinfo.push(TexInfo {
            vecs: [*s, *t],
            flags,
            value: 0,
            texture,
            next_texinfo: -1,
        });
        self.texinfo_hash[hash].push(index);

        Ok(index)
    }
}

// ============================================================
// Plane helpers
// ============================================================

/// Index of the component with the largest magnitude.
fn major_axis(normal: &Vec3) -> usize {
    let mut axis = 0;
    let mut max = normal[0].abs();
    for i in 1..3 {
        if normal[i].abs() > max {
            max = normal[i].abs();
            axis = i;
        }
    }
    axis
}

/// Classify a canonical (dominant axis non-negative) unit normal.
fn plane_type_for_normal(normal: &Vec3) -> i32 {
    for i in 0..3 {
        if normal[i] >= 1.0 - NORMAL_EPSILON {
            return PLANE_X + i as i32;
        }
    }
    PLANE_ANYX + major_axis(normal) as i32
}

fn plane_matches(plane: &DPlane, normal: &Vec3, dist: f32) -> bool {
    // Axis classification is a pure function of the normal, so it is
    // redundant for equality.
    (plane.dist - dist).abs() < DIST_EPSILON
        && (plane.normal[0] - normal[0]).abs() < NORMAL_EPSILON
        && (plane.normal[1] - normal[1]).abs() < NORMAL_EPSILON
        && (plane.normal[2] - normal[2]).abs() < NORMAL_EPSILON
}

/// Bucket from quantized distance (1/8 steps) and quantized normal
/// components. Canonicalization runs first, so a direction and its
/// negation always land in the same bucket.
fn hash_plane(normal: &Vec3, dist: f32) -> usize {
    let mut h = (dist.abs() * 0.125) as i64;
    h += (normal[0] * 4.0).round() as i64;
    h += (normal[1] * 4.0).round() as i64;
    h += (normal[2] * 4.0).round() as i64;
    h.unsigned_abs() as usize & (PLANE_HASHES - 1)
}

fn hash_texname(name: &str) -> usize {
    let sum: usize = name.bytes().map(|b| b as usize).sum();
    sum & (TEXINFO_HASHES - 1)
}

// ============================================================
// Tests
// ============================================================
