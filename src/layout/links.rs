use super::*;

/// Elbow connector from the parent's link source to the child's primary box.
/// `toward` is +1 when children grow along the depth axis and -1 when the
/// subtree is mirrored.
///
/// A spouse stacked behind the primary box cannot link straight toward the
/// children, so its connector leaves the spouse's outer side and runs
/// `detour` past the couple before turning.
pub(super) fn parent_link(
    parent: &LaidOutNode,
    child: &LaidOutNode,
    source: LinkSource,
    axes: Axes,
    toward: f32,
    rank_spacing: f32,
    detour: f32,
) -> LinkLayout {
    let to = child.indi_rect();
    let (to_min, to_max) = axes.depth_range(&to);
    let to_edge = if toward > 0.0 { to_min } else { to_max };
    let mid = to_edge - toward * rank_spacing / 2.0;
    let to_cross = axes.cross_center(&to);

    let (from, from_id, blocked) = match (source, parent.spouse.as_ref(), parent.spouse_rect()) {
        (LinkSource::Spouse, Some(spouse), Some(rect)) => {
            let blocked = !faces(&rect, &parent.indi_rect(), axes, toward);
            (rect, spouse.id.clone(), blocked)
        }
        (LinkSource::Family, _, _) => (parent.footprint(), parent.indi.id.clone(), false),
        _ => (parent.indi_rect(), parent.indi.id.clone(), false),
    };
    let mut points = if blocked {
        let (_, side) = axes.cross_range(&from);
        let (_, outer) = axes.cross_range(&parent.footprint());
        let depth = axes.depth_center(&from);
        vec![
            axes.point(side, depth),
            axes.point(outer + detour, depth),
            axes.point(outer + detour, mid),
        ]
    } else {
        let (from_min, from_max) = axes.depth_range(&from);
        let from_edge = if toward > 0.0 { from_max } else { from_min };
        let from_cross = axes.cross_center(&from);
        vec![axes.point(from_cross, from_edge), axes.point(from_cross, mid)]
    };
    points.push(axes.point(to_cross, mid));
    points.push(axes.point(to_cross, to_edge));

    LinkLayout {
        from: from_id,
        to: child.indi.id.clone(),
        points,
        style: LinkStyle::Solid,
    }
}

/// True when nothing of `blocker` lies between `rect` and the next
/// generation in the `toward` direction.
fn faces(rect: &Rect, blocker: &Rect, axes: Axes, toward: f32) -> bool {
    let (min, max) = axes.depth_range(rect);
    let (blocker_min, blocker_max) = axes.depth_range(blocker);
    if toward > 0.0 {
        min >= blocker_max
    } else {
        max <= blocker_min
    }
}

/// Straight connector along the row from a node to its additional marriage.
pub(super) fn marriage_link(owner: &LaidOutNode, marriage: &LaidOutNode, axes: Axes) -> LinkLayout {
    let from = owner.footprint();
    let to = marriage.indi_rect();
    let (_, from_cross) = axes.cross_range(&from);
    let (to_cross, _) = axes.cross_range(&to);
    let depth = axes.depth_center(&owner.indi_rect());
    LinkLayout {
        from: owner.indi.id.clone(),
        to: marriage.indi.id.clone(),
        points: vec![axes.point(from_cross, depth), axes.point(to_cross, depth)],
        style: LinkStyle::AdditionalMarriage,
    }
}

/// Affordance glyphs for entries with hidden or collapsible relatives.
/// Individual expanders point toward ancestors (negative depth), spouse
/// expanders sit beside the spouse box, family expanders point toward
/// descendants.
pub fn expander_layouts(nodes: &[LaidOutNode], horizontal: bool, size: f32, gap: f32) -> Vec<ExpanderLayout> {
    let axes = Axes { horizontal };
    let mut expanders = Vec::new();
    for node in nodes {
        if let Some(state) = node.indi.expander {
            let rect = node.indi_rect();
            let cross = axes.cross_center(&rect);
            let (edge, _) = axes.depth_range(&rect);
            expanders.push(expander(
                &node.indi.id,
                ExpanderTarget::Indi,
                state,
                axes.rect(cross - size / 2.0, edge - gap - size, size, size),
                [axes.point(cross, edge), axes.point(cross, edge - gap)],
            ));
        }
        if let (Some(spouse), Some(rect)) = (node.spouse.as_ref(), node.spouse_rect())
            && let Some(state) = spouse.expander
        {
            let (_, edge) = axes.cross_range(&rect);
            let depth = axes.depth_center(&rect);
            expanders.push(expander(
                &spouse.id,
                ExpanderTarget::Spouse,
                state,
                axes.rect(edge + gap, depth - size / 2.0, size, size),
                [axes.point(edge, depth), axes.point(edge + gap, depth)],
            ));
        }
        if let Some(family) = node.family.as_ref()
            && let Some(state) = family.expander
        {
            let rect = node.footprint();
            let cross = axes.cross_center(&rect);
            let (_, edge) = axes.depth_range(&rect);
            expanders.push(expander(
                &family.id,
                ExpanderTarget::Family,
                state,
                axes.rect(cross - size / 2.0, edge + gap, size, size),
                [axes.point(cross, edge), axes.point(cross, edge + gap)],
            ));
        }
    }
    expanders
}

fn expander(
    id: &str,
    target: ExpanderTarget,
    state: ExpanderState,
    rect: Rect,
    stub: [(f32, f32); 2],
) -> ExpanderLayout {
    ExpanderLayout {
        id: id.to_string(),
        target,
        state,
        rect,
        stub: LinkLayout {
            from: id.to_string(),
            to: id.to_string(),
            points: stub.to_vec(),
            style: LinkStyle::Dotted,
        },
    }
}
