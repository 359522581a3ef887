// ABOUTME: Pure geometry for split decisions and divider placement.
// ABOUTME: Pressure, room checks, extent limits and divider arithmetic.

use pp_core::{Orientation, Size};

use crate::{NodeId, PaneTree, PanesDelegate};

/// Minimum extent used when no delegate supplies one
pub const FALLBACK_MINIMUM_EXTENT: f32 = 1.0;

/// Number of panes competing for space along the axis of `split`.
///
/// Splitting along the container's own orientation crowds every child;
/// a perpendicular split only divides the one pane being split.
pub fn pressure(container: Orientation, child_count: usize, split: Orientation) -> usize {
    if container == split {
        child_count.max(1)
    } else {
        1
    }
}

/// Whether every existing pane and one more keep at least `minimum` extent
pub fn can_add_pane(current_extent: f32, pressure: usize, minimum: f32) -> bool {
    current_extent - pressure as f32 * minimum >= minimum
}

/// Smallest extent `can_add_pane` accepts for the given pressure
pub fn required_extent(pressure: usize, minimum: f32) -> f32 {
    (pressure + 1) as f32 * minimum
}

pub fn minimum_extent(delegate: Option<&dyn PanesDelegate>, split: Orientation) -> f32 {
    match (delegate, split) {
        (Some(delegate), Orientation::Row) => delegate.minimum_width(),
        (Some(delegate), Orientation::Column) => delegate.minimum_height(),
        (None, _) => FALLBACK_MINIMUM_EXTENT,
    }
}

/// Largest content extent reachable on the window's screen, if known
pub fn maximum_extent(screen_content: Option<Size>, split: Orientation) -> Option<f32> {
    screen_content.map(|size| size.extent(split))
}

/// Extent of every child, given dividers measured from the container origin
pub fn child_extents(dividers: &[f32], extent: f32, thickness: f32) -> Vec<f32> {
    let mut extents = Vec::with_capacity(dividers.len() + 1);
    let mut start = 0.0;
    for divider in dividers {
        extents.push((divider - start).max(0.0));
        start = divider + thickness;
    }
    extents.push((extent - start).max(0.0));
    extents
}

/// Divider offsets that produce the given child extents
pub fn dividers_for_extents(extents: &[f32], thickness: f32) -> Vec<f32> {
    let mut dividers = Vec::with_capacity(extents.len().saturating_sub(1));
    let mut position = 0.0;
    for extent in extents.iter().take(extents.len().saturating_sub(1)) {
        position += extent;
        dividers.push(position);
        position += thickness;
    }
    dividers
}

/// Dividers giving `count` children equal extents
pub fn even_dividers(extent: f32, count: usize, thickness: f32) -> Vec<f32> {
    if count < 2 {
        return Vec::new();
    }
    let gaps = thickness * (count - 1) as f32;
    let child = ((extent - gaps) / count as f32).max(0.0);
    dividers_for_extents(&vec![child; count], thickness)
}

/// Scale children proportionally when the container extent changes.
/// Divider thickness does not scale.
pub fn rescale_dividers(
    dividers: &[f32],
    old_extent: f32,
    new_extent: f32,
    thickness: f32,
) -> Vec<f32> {
    let count = dividers.len() + 1;
    let gaps = thickness * dividers.len() as f32;
    let old_available = old_extent - gaps;
    if old_available <= 0.0 {
        return even_dividers(new_extent, count, thickness);
    }
    let factor = (new_extent - gaps).max(0.0) / old_available;
    let extents: Vec<f32> = child_extents(dividers, old_extent, thickness)
        .into_iter()
        .map(|e| e * factor)
        .collect();
    dividers_for_extents(&extents, thickness)
}

/// Clamp a dragged divider so both neighbours keep `minimum` extent.
///
/// `lower` is where the child before the divider starts, `upper` where the
/// child after it ends. With `can_collapse`, dragging past half the minimum
/// collapses the neighbour instead.
pub fn constrain_divider(
    proposed: f32,
    lower: f32,
    upper: f32,
    thickness: f32,
    minimum: f32,
    can_collapse: bool,
) -> f32 {
    let first_edge = lower;
    let last_edge = upper - thickness;

    if can_collapse {
        if proposed < first_edge + minimum / 2.0 {
            return first_edge;
        }
        if proposed > last_edge - minimum / 2.0 {
            return last_edge;
        }
    }

    let min_position = first_edge + minimum;
    let max_position = last_edge - minimum;
    if min_position > max_position {
        return (first_edge + last_edge) / 2.0;
    }
    proposed.clamp(min_position, max_position)
}

/// Root extent along `axis` at which `container` reaches `required`,
/// assuming window growth is shared out by `rescale_dividers`.
pub fn required_root_extent(
    tree: &PaneTree,
    container: NodeId,
    axis: Orientation,
    required: f32,
) -> f32 {
    let thickness = tree.divider_thickness();
    let mut need = required;
    let mut node = container;

    while let Some(parent) = tree.parent(node) {
        let (Some(outer), Some(frame)) = (tree.container(parent), tree.frame(parent)) else {
            break;
        };
        let extent = frame.extent(axis);
        if outer.orientation() == axis {
            let extents = child_extents(outer.dividers(), extent, thickness);
            let share = outer
                .children()
                .iter()
                .position(|c| *c == node)
                .and_then(|i| extents.get(i).copied())
                .unwrap_or(0.0);
            let gaps = thickness * outer.dividers().len() as f32;
            need = if share > 0.0 {
                gaps + need * (extent - gaps) / share
            } else {
                need + (extent - share)
            };
        }
        need = need.max(extent);
        node = parent;
    }
    need
}

/// Extent `container` gets along `axis` once the root is laid out with
/// `root_extent` along that axis. Replays the arithmetic of the layout pass.
pub fn projected_extent(
    tree: &PaneTree,
    container: NodeId,
    axis: Orientation,
    root_extent: f32,
) -> f32 {
    let thickness = tree.divider_thickness();
    let mut chain = vec![container];
    let mut node = container;
    while let Some(parent) = tree.parent(node) {
        chain.push(parent);
        node = parent;
    }

    let mut extent = root_extent;
    for pair in chain.windows(2).rev() {
        let (child, parent) = (pair[0], pair[1]);
        let (Some(outer), Some(frame)) = (tree.container(parent), tree.frame(parent)) else {
            break;
        };
        // Perpendicular containers hand their axis extent through unchanged
        if outer.orientation() != axis {
            continue;
        }
        let old_extent = frame.extent(axis);
        let dividers =
            if outer.children().len() > 1 && (old_extent - extent).abs() > f32::EPSILON {
                rescale_dividers(outer.dividers(), old_extent, extent, thickness)
            } else {
                outer.dividers().to_vec()
            };
        let index = outer.children().iter().position(|c| *c == child).unwrap_or(0);
        extent = child_extents(&dividers, extent, thickness)
            .get(index)
            .copied()
            .unwrap_or(0.0);
    }
    extent
}

/// Whole points the root has to grow along `axis` before `container`
/// passes `can_add_pane`. Starts from the proportional estimate and steps
/// up until the replayed layout agrees.
pub fn expansion_needed(
    tree: &PaneTree,
    container: NodeId,
    axis: Orientation,
    pressure: usize,
    minimum: f32,
) -> f32 {
    const MAX_STEPS: usize = 16;

    let root_extent = tree.bounds().extent(axis);
    let required = required_extent(pressure, minimum);
    let estimate = required_root_extent(tree, container, axis, required);
    let mut additional = (estimate - root_extent).max(0.0).ceil();
    for _ in 0..MAX_STEPS {
        let projected = projected_extent(tree, container, axis, root_extent + additional);
        if can_add_pane(projected, pressure, minimum) {
            break;
        }
        additional += 1.0;
    }
    additional
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_pressure_same_orientation_counts_children() {
        assert_eq!(pressure(Orientation::Row, 3, Orientation::Row), 3);
        assert_eq!(pressure(Orientation::Row, 0, Orientation::Row), 1);
    }

    #[test]
    fn test_pressure_perpendicular_is_one() {
        assert_eq!(pressure(Orientation::Row, 5, Orientation::Column), 1);
    }

    #[test]
    fn test_can_add_pane() {
        assert!(can_add_pane(800.0, 1, 100.0));
        assert!(can_add_pane(200.0, 1, 100.0));
        assert!(!can_add_pane(199.0, 1, 100.0));
        // 150 - 2 * 100 = -50 < 100
        assert!(!can_add_pane(150.0, 2, 100.0));
        assert_eq!(required_extent(2, 100.0), 300.0);
    }

    #[test]
    fn test_minimum_extent_fallback() {
        assert_eq!(minimum_extent(None, Orientation::Row), FALLBACK_MINIMUM_EXTENT);
    }

    #[test]
    fn test_maximum_extent_uses_split_axis() {
        let screen = Some(Size::new(1440.0, 870.0));
        assert_eq!(maximum_extent(screen, Orientation::Row), Some(1440.0));
        assert_eq!(maximum_extent(screen, Orientation::Column), Some(870.0));
        assert_eq!(maximum_extent(None, Orientation::Row), None);
    }

    #[test]
    fn test_even_dividers_preserve_extent() {
        let dividers = even_dividers(800.0, 2, 1.0);
        assert_eq!(dividers, vec![399.5]);

        let dividers = even_dividers(800.0, 3, 1.0);
        let extents = child_extents(&dividers, 800.0, 1.0);
        let total: f32 = extents.iter().sum::<f32>() + 2.0;
        assert!(approx(total, 800.0));
        assert!(extents.iter().all(|e| approx(*e, 266.0)));
    }

    #[test]
    fn test_child_extents_roundtrip() {
        let extents = vec![100.0, 250.0, 448.0];
        let dividers = dividers_for_extents(&extents, 1.0);
        assert_eq!(dividers, vec![100.0, 351.0]);
        assert_eq!(child_extents(&dividers, 800.0, 1.0), extents);
    }

    #[test]
    fn test_rescale_keeps_proportions() {
        let dividers = rescale_dividers(&[99.0], 400.0, 799.0, 1.0);
        let extents = child_extents(&dividers, 799.0, 1.0);
        assert!(approx(extents[0], 198.0));
        assert!(approx(extents[1], 600.0));
    }

    #[test]
    fn test_constrain_divider_clamps_to_minimum() {
        assert_eq!(constrain_divider(10.0, 0.0, 400.0, 1.0, 100.0, false), 100.0);
        assert_eq!(constrain_divider(390.0, 0.0, 400.0, 1.0, 100.0, false), 299.0);
        assert_eq!(constrain_divider(200.0, 0.0, 400.0, 1.0, 100.0, false), 200.0);
    }

    #[test]
    fn test_constrain_divider_collapses_when_allowed() {
        assert_eq!(constrain_divider(20.0, 0.0, 400.0, 1.0, 100.0, true), 0.0);
        assert_eq!(constrain_divider(60.0, 0.0, 400.0, 1.0, 100.0, true), 100.0);
        assert_eq!(constrain_divider(380.0, 0.0, 400.0, 1.0, 100.0, true), 399.0);
    }

    #[test]
    fn test_constrain_divider_without_room_centres() {
        assert_eq!(constrain_divider(10.0, 0.0, 151.0, 1.0, 100.0, false), 75.0);
    }

    struct Blank;

    impl crate::PaneFactory for Blank {
        fn new_pane(&mut self) -> crate::Pane {
            crate::Pane::default()
        }
    }

    #[test]
    fn test_projection_matches_layout_pass() {
        let mut tree = PaneTree::new(
            Orientation::Row,
            Size::new(800.0, 600.0),
            1.0,
            crate::Pane::default(),
        );
        let first = tree.panes()[0];
        for split in [
            Orientation::Row,
            Orientation::Row,
            Orientation::Row,
            Orientation::Column,
        ] {
            let parent = tree.parent(first).unwrap();
            tree.split_pane(parent, first, split, &mut Blank);
        }
        let sub = tree.parent(first).unwrap();
        let width = tree.frame(sub).unwrap().width;
        assert_eq!(projected_extent(&tree, sub, Orientation::Row, 800.0), width);
        assert!(!can_add_pane(width, 1, 100.0));

        let additional = expansion_needed(&tree, sub, Orientation::Row, 1, 100.0);
        assert!(additional >= 3.0);
        let projected = projected_extent(&tree, sub, Orientation::Row, 800.0 + additional);
        assert!(can_add_pane(projected, 1, 100.0));

        tree.resize(Size::new(800.0 + additional, 600.0));
        assert_eq!(tree.frame(sub).unwrap().width, projected);
        assert_eq!(projected_extent(&tree, sub, Orientation::Column, 600.0), 600.0);
    }
}
