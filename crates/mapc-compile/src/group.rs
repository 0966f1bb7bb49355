// group.rs — partition regions into shading groups
//
// Two regions must end up with the same final shade iff they are the same
// physical sector. Sectors are identified by an explicit map "tag" on the
// floor or ceiling face, or failing that by a minted id cached on the
// floor face so repeated grouping passes (and regions sharing that face)
// agree.

use log::debug;

use crate::context::CompileContext;

/// Explicit map tag property.
pub const TAG_KEY: &str = "tag";

/// Private cache key stamped on floor faces for minted group ids.
pub const SHADE_TAG_KEY: &str = "_shade_tag";

/// Assign every region a group id and record the shading order on the
/// context: descending group id, equal ids contiguous, solid regions
/// (group -1) at the tail. Later passes stop at the first group < 0.
pub fn group_regions(ctx: &mut CompileContext) {
    for i in 0..ctx.regions.len() {
        let group = region_group_id(ctx, i);
        ctx.regions[i].group = group;
    }

    let mut order: Vec<usize> = (0..ctx.regions.len()).collect();
    let regions = &ctx.regions;
    order.sort_by(|&a, &b| regions[b].group.cmp(&regions[a].group));
    ctx.shade_order = order;

    debug!(
        "group_regions: {} regions, {} minted groups",
        ctx.regions.len(),
        ctx.stats.c_groups_minted
    );
}

/// Group id for one region. Solid regions get -1. Mints and caches a new
/// id on the floor face when no tag is present.
fn region_group_id(ctx: &mut CompileContext, ri: usize) -> i32 {
    let (floor_surf, ceil_surf) = {
        let region = &ctx.regions[ri];
        if region.gaps.is_empty() {
            return -1;
        }
        // Floor face of the lowest gap, top face of the highest gap.
        (
            region.gaps[0].floor,
            region.gaps[region.gaps.len() - 1].ceil,
        )
    };

    if let Some(tag) = ctx.surfaces[floor_surf].props.get_int(TAG_KEY) {
        return tag;
    }
    if let Some(tag) = ctx.surfaces[ceil_surf].props.get_int(TAG_KEY) {
        return tag;
    }
    if let Some(tag) = ctx.surfaces[floor_surf].props.get_int(SHADE_TAG_KEY) {
        return tag;
    }

    let group = ctx.next_group;
    ctx.next_group += 1;
    ctx.stats.c_groups_minted += 1;
    ctx.surfaces[floor_surf]
        .props
        .set(SHADE_TAG_KEY, &group.to_string());
    group
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FIRST_MINTED_GROUP;
    use crate::region::{Gap, Region, Surface};

    fn open_region(ctx: &mut CompileContext, x: f32) -> usize {
        let floor = ctx.surfaces.len();
        ctx.surfaces.push(Surface::default());
        let ceil = ctx.surfaces.len();
        ctx.surfaces.push(Surface::default());
        let gaps = vec![Gap { floor, ceil, bottom: 0.0, top: 128.0 }];
        ctx.regions.push(Region::new([x, 0.0], gaps));
        ctx.regions.len() - 1
    }

    // =========================================================================
    // Explicit tags group regions together
    // =========================================================================

    #[test]
    fn test_tagged_regions_share_group_and_solid_sorts_last() {
        let mut ctx = CompileContext::new();
        for i in 0..3 {
            let ri = open_region(&mut ctx, i as f32 * 100.0);
            let floor = ctx.regions[ri].gaps[0].floor;
            ctx.surfaces[floor].props.set(TAG_KEY, "5");
        }
        // Fourth region: no tag, no gaps (solid)
        ctx.regions.push(Region::new([300.0, 0.0], Vec::new()));

        group_regions(&mut ctx);

        for ri in 0..3 {
            assert_eq!(ctx.regions[ri].group, 5, "tagged regions get the tag as group id");
        }
        assert_eq!(ctx.regions[3].group, -1, "solid region gets group -1");

        // Tagged regions contiguous, solid region last
        assert_eq!(&ctx.shade_order[..3], &[0, 1, 2]);
        assert_eq!(ctx.shade_order[3], 3);
    }

    #[test]
    fn test_ceiling_tag_also_groups() {
        let mut ctx = CompileContext::new();
        let ri = open_region(&mut ctx, 0.0);
        let ceil = ctx.regions[ri].gaps[0].ceil;
        ctx.surfaces[ceil].props.set(TAG_KEY, "12");

        group_regions(&mut ctx);
        assert_eq!(ctx.regions[ri].group, 12);
    }

    // =========================================================================
    // Minted ids: above the legal tag range, cached, alias-consistent
    // =========================================================================

    #[test]
    fn test_minted_ids_never_collide_with_tags() {
        let mut ctx = CompileContext::new();
        open_region(&mut ctx, 0.0);
        open_region(&mut ctx, 100.0);

        group_regions(&mut ctx);

        assert!(ctx.regions[0].group >= FIRST_MINTED_GROUP);
        assert!(ctx.regions[1].group >= FIRST_MINTED_GROUP);
        assert_ne!(ctx.regions[0].group, ctx.regions[1].group);
        assert_eq!(ctx.stats.c_groups_minted, 2);
    }

    #[test]
    fn test_regrouping_is_idempotent_via_shade_tag_cache() {
        let mut ctx = CompileContext::new();
        let ri = open_region(&mut ctx, 0.0);

        group_regions(&mut ctx);
        let first = ctx.regions[ri].group;

        // The cached _shade_tag must survive a second pass, even though
        // the mint counter has moved on.
        ctx.regions[ri].group = -1;
        group_regions(&mut ctx);
        assert_eq!(ctx.regions[ri].group, first);
        let floor = ctx.regions[ri].gaps[0].floor;
        assert_eq!(
            ctx.surfaces[floor].props.get_int(SHADE_TAG_KEY),
            Some(first)
        );
    }

    #[test]
    fn test_stacked_regions_sharing_floor_face_share_minted_group() {
        let mut ctx = CompileContext::new();
        let floor = ctx.surfaces.len();
        ctx.surfaces.push(Surface::default());
        let ceil = ctx.surfaces.len();
        ctx.surfaces.push(Surface::default());

        // Two regions aliasing the same floor surface
        for x in [0.0, 50.0] {
            let gaps = vec![Gap { floor, ceil, bottom: 0.0, top: 64.0 }];
            ctx.regions.push(Region::new([x, 0.0], gaps));
        }

        group_regions(&mut ctx);
        assert_eq!(ctx.regions[0].group, ctx.regions[1].group);
        assert_eq!(ctx.stats.c_groups_minted, 1);
    }

    // =========================================================================
    // Ordering: descending group id, equal runs contiguous
    // =========================================================================

    #[test]
    fn test_order_descending_with_minted_before_tagged() {
        let mut ctx = CompileContext::new();
        let tagged = open_region(&mut ctx, 0.0);
        let floor = ctx.regions[tagged].gaps[0].floor;
        ctx.surfaces[floor].props.set(TAG_KEY, "7");
        let minted = open_region(&mut ctx, 100.0);
        ctx.regions.push(Region::new([200.0, 0.0], Vec::new())); // solid

        group_regions(&mut ctx);

        // Minted ids sit above 0xffff, so they sort before small tags;
        // solid regions always sort last.
        assert_eq!(ctx.shade_order, vec![minted, tagged, 2]);
    }
}
