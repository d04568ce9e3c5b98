use super::*;

struct Slot<'t> {
    node: &'t TreeNode,
    /// Parent in the generation above; `None` for the root and for marriages.
    parent: Option<usize>,
    /// Node whose additional marriage this slot is.
    owner: Option<usize>,
    depth: usize,
    children: Vec<usize>,
    marriages: Vec<usize>,
    cross_len: f32,
    depth_len: f32,
    cross: f32,
}

/// Sets every entry's box size from the renderer, failing on a node without
/// a primary entry.
pub(super) fn measure_tree(node: &mut TreeNode, renderer: &dyn Renderer) -> Result<()> {
    let generation = node.generation;
    let indi = node
        .indi
        .as_mut()
        .ok_or(ChartError::MalformedNode { generation })?;
    (indi.width, indi.height) = renderer.preferred_indi_size(&indi.id)?;
    if let Some(spouse) = node.spouse.as_mut() {
        (spouse.width, spouse.height) = renderer.preferred_indi_size(&spouse.id)?;
    }
    for child in node.children.iter_mut().chain(node.marriages.iter_mut()) {
        measure_tree(child, renderer)?;
    }
    Ok(())
}

fn footprint(node: &TreeNode, horizontal: bool) -> Result<(f32, f32)> {
    let indi = node.primary()?;
    let Some(spouse) = node.spouse.as_ref() else {
        return Ok((indi.width, indi.height));
    };
    let (dx, dy) = spouse_offset(horizontal, indi);
    Ok((
        indi.width.max(dx + spouse.width),
        indi.height.max(dy + spouse.height),
    ))
}

fn collect<'t>(
    node: &'t TreeNode,
    parent: Option<usize>,
    owner: Option<usize>,
    depth: usize,
    axes: Axes,
    slots: &mut Vec<Slot<'t>>,
) -> Result<usize> {
    let (width, height) = footprint(node, axes.horizontal)?;
    let index = slots.len();
    slots.push(Slot {
        node,
        parent,
        owner,
        depth,
        children: Vec::new(),
        marriages: Vec::new(),
        cross_len: axes.cross_len(width, height),
        depth_len: axes.depth_len(width, height),
        cross: 0.0,
    });
    for marriage in &node.marriages {
        let slot = collect(marriage, None, Some(index), depth, axes, slots)?;
        slots[index].marriages.push(slot);
    }
    for child in &node.children {
        let slot = collect(child, Some(index), None, depth + 1, axes, slots)?;
        slots[index].children.push(slot);
    }
    Ok(index)
}

/// A node and its additional marriages share one row and one block of
/// children.
fn unit_members(slots: &[Slot<'_>], index: usize) -> Vec<usize> {
    std::iter::once(index)
        .chain(slots[index].marriages.iter().copied())
        .collect()
}

fn unit_children(slots: &[Slot<'_>], index: usize) -> Vec<usize> {
    unit_members(slots, index)
        .into_iter()
        .flat_map(|member| slots[member].children.iter().copied())
        .collect()
}

fn span(lengths: impl Iterator<Item = f32>, spacing: f32) -> f32 {
    let mut total = 0.0;
    let mut count = 0usize;
    for length in lengths {
        total += length;
        count += 1;
    }
    if count > 1 {
        total += spacing * (count - 1) as f32;
    }
    total
}

fn place(slots: &mut [Slot<'_>], extents: &[f32], index: usize, start: f32, spacing: f32) {
    let extent = extents[index];
    let members = unit_members(slots, index);
    let unit = span(members.iter().map(|m| slots[*m].cross_len), spacing);
    let mut cursor = start + (extent - unit) / 2.0;
    for member in members {
        slots[member].cross = cursor;
        cursor += slots[member].cross_len + spacing;
    }

    let children = unit_children(slots, index);
    let total = span(children.iter().map(|c| extents[*c]), spacing);
    let mut cursor = start + (extent - total) / 2.0;
    for child in children {
        place(slots, extents, child, cursor, spacing);
        cursor += extents[child] + spacing;
    }
}

pub(super) fn position_tree(root: &TreeNode, options: &LayoutOptions) -> Result<ChartLayout> {
    let axes = Axes {
        horizontal: options.horizontal,
    };
    let mut slots = Vec::new();
    collect(root, None, None, 0, axes, &mut slots)?;

    // Cross-axis extent per subtree. Descendants always sit at higher
    // indices, so a reverse sweep sees children before their parents.
    let mut extents = vec![0.0f32; slots.len()];
    for index in (0..slots.len()).rev() {
        if slots[index].owner.is_some() {
            continue;
        }
        let members = unit_members(&slots, index);
        let unit = span(members.iter().map(|m| slots[*m].cross_len), options.node_spacing);
        let children = unit_children(&slots, index);
        let below = span(children.iter().map(|c| extents[*c]), options.node_spacing);
        extents[index] = unit.max(below);
    }
    place(&mut slots, &extents, 0, 0.0, options.node_spacing);

    let rows = slots.iter().map(|slot| slot.depth).max().unwrap_or(0) + 1;
    let mut row_len = vec![0.0f32; rows];
    for slot in &slots {
        row_len[slot.depth] = row_len[slot.depth].max(slot.depth_len);
    }
    let mut row_start = vec![0.0f32; rows];
    for row in 1..rows {
        row_start[row] = row_start[row - 1] + row_len[row - 1] + options.rank_spacing;
    }

    let root_cross = slots[0].cross;
    let root_depth_len = slots[0].depth_len;
    let mut nodes = Vec::with_capacity(slots.len());
    for slot in &slots {
        let start = row_start[slot.depth];
        // Mirrored rows keep the root box where the unflipped layout puts it.
        let depth = if options.flip_vertically {
            root_depth_len - start - slot.depth_len
        } else {
            start
        };
        let (x, y) = axes.point(slot.cross - root_cross, depth);
        let indi = slot.node.primary()?.clone();
        let offset = spouse_offset(options.horizontal, &indi);
        nodes.push(LaidOutNode {
            indi,
            spouse: slot.node.spouse.clone(),
            family: slot.node.family.clone(),
            generation: slot.node.generation,
            link_from: slot.node.link_from,
            additional_marriage: slot.node.additional_marriage,
            x,
            y,
            spouse_offset: offset,
        });
    }

    let toward = if options.flip_vertically { -1.0 } else { 1.0 };
    let mut links = Vec::new();
    for (index, slot) in slots.iter().enumerate() {
        if let Some(parent) = slot.parent {
            links.push(parent_link(
                &nodes[parent],
                &nodes[index],
                slot.node.link_from,
                axes,
                toward,
                options.rank_spacing,
                options.node_spacing / 2.0,
            ));
        }
        if let Some(owner) = slot.owner {
            links.push(marriage_link(&nodes[owner], &nodes[index], axes));
        }
    }

    Ok(ChartLayout { nodes, links })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_adds_gaps_between_items_only() {
        assert_eq!(span([10.0, 20.0, 30.0].into_iter(), 5.0), 70.0);
        assert_eq!(span([10.0].into_iter(), 5.0), 10.0);
        assert_eq!(span(std::iter::empty(), 5.0), 0.0);
    }

    #[test]
    fn couple_footprint_follows_spouse_offset() {
        let mut node = TreeNode::new(TreeEntry::new("A"), 0, LinkSource::Family);
        node.indi.as_mut().unwrap().width = 60.0;
        node.indi.as_mut().unwrap().height = 41.0;
        let mut spouse = TreeEntry::new("B");
        spouse.width = 80.0;
        spouse.height = 27.0;
        node.spouse = Some(spouse);
        assert_eq!(footprint(&node, false).unwrap(), (80.0, 68.0));
        assert_eq!(footprint(&node, true).unwrap(), (140.0, 41.0));
    }
}
