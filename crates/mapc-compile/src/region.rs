// region.rs — convex leaf regions and their brush-surface gaps
//
// Regions arrive from the upstream CSG pass and are mutated in place by
// grouping and shading. They are never destroyed here. Surfaces live in a
// shared arena on the compile context; a floor face can be referenced by
// several stacked regions, and the grouping pass relies on that aliasing
// when it stamps its cached group tag.

use mapc_common::math::{Vec2, Vec3};

// ============================================================
// Key/value property sets
// ============================================================

/// Ordered string key/value pairs attached to a surface, in the style of
/// entity epairs. Small enough that linear probing beats a map.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    pairs: Vec<(String, String)>,
}

impl Properties {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.0 == key)
            .map(|pair| pair.1.as_str())
    }

    /// Set or replace a value.
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(pair) = self.pairs.iter_mut().find(|pair| pair.0 == key) {
            pair.1 = value.to_string();
        } else {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    /// Parse a property as an integer. A missing or malformed value reads
    /// as absent.
    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(|v| v.trim().parse::<i32>().ok())
    }
}

// ============================================================
// Surfaces and gaps
// ============================================================

/// One brush surface. Only the property set matters to this core; the
/// surface geometry itself was consumed upstream when the gaps were built.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    pub props: Properties,
}

/// One floor/ceiling pair inside a region. `floor` and `ceil` index the
/// surface arena on the compile context.
#[derive(Debug, Clone, Copy)]
pub struct Gap {
    pub floor: usize,
    pub ceil: usize,
    pub bottom: f32,
    pub top: f32,
}

// ============================================================
// Regions
// ============================================================

/// A convex leaf area of the level, bounded by gaps ordered bottom-to-top.
#[derive(Debug, Clone)]
pub struct Region {
    pub gaps: Vec<Gap>,
    /// Interior sample location in the floor plan.
    pub point: Vec2,
    /// Shading-group id, -1 until grouped (and permanently -1 for solid
    /// regions with no gaps).
    pub group: i32,
    /// Final baked light level, -1 until shaded.
    pub shade: i32,
    /// Zero-area leaves are always treated as visible by the tracer.
    pub degenerate: bool,
}

impl Region {
    pub fn new(point: Vec2, gaps: Vec<Gap>) -> Self {
        Self {
            gaps,
            point,
            group: -1,
            shade: -1,
            degenerate: false,
        }
    }

    /// Solid regions have no open gap at all.
    pub fn is_solid(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Total open height: top of the topmost gap minus bottom of the
    /// bottommost gap. Zero for solid regions.
    pub fn gap_span(&self) -> f32 {
        match (self.gaps.first(), self.gaps.last()) {
            (Some(lowest), Some(highest)) => highest.top - lowest.bottom,
            _ => 0.0,
        }
    }

    /// Representative sample point for light tracing: the floor-plan point
    /// at the midpoint of the region's open span.
    pub fn sample_point(&self) -> Vec3 {
        let mid = match (self.gaps.first(), self.gaps.last()) {
            (Some(lowest), Some(highest)) => (lowest.bottom + highest.top) * 0.5,
            _ => 0.0,
        };
        [self.point[0], self.point[1], mid]
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_set_get() {
        let mut props = Properties::new();
        props.set("tag", "5");
        props.set("texture", "e1u1/floor1_3");
        assert_eq!(props.get("tag"), Some("5"));
        assert_eq!(props.get_int("tag"), Some(5));
        assert_eq!(props.get("missing"), None);

        // Replacement, not duplication
        props.set("tag", "9");
        assert_eq!(props.get_int("tag"), Some(9));
    }

    #[test]
    fn test_properties_malformed_int_reads_as_absent() {
        let mut props = Properties::new();
        props.set("tag", "not a number");
        assert_eq!(props.get_int("tag"), None);
    }

    #[test]
    fn test_gap_span_and_sample_point() {
        let gaps = vec![
            Gap { floor: 0, ceil: 1, bottom: 0.0, top: 64.0 },
            Gap { floor: 2, ceil: 3, bottom: 96.0, top: 160.0 },
        ];
        let region = Region::new([10.0, 20.0], gaps);
        assert_eq!(region.gap_span(), 160.0);
        assert_eq!(region.sample_point(), [10.0, 20.0, 80.0]);
        assert!(!region.is_solid());
    }

    #[test]
    fn test_solid_region() {
        let region = Region::new([0.0, 0.0], Vec::new());
        assert!(region.is_solid());
        assert_eq!(region.gap_span(), 0.0);
        assert_eq!(region.group, -1);
        assert_eq!(region.shade, -1);
    }
}
