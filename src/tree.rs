use crate::config::LayoutConfig;
use crate::data::{DataProvider, Family};
use crate::error::{ChartError, Result};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpanderState {
    /// More relatives exist beyond this entry and are hidden.
    Plus,
    /// Relatives beyond this entry are shown and can be collapsed.
    Minus,
}

/// One drawable person (or family) box.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEntry {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub expander: Option<ExpanderState>,
}

impl TreeEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: 0.0,
            height: 0.0,
            expander: None,
        }
    }
}

/// Which part of the parent node a child node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSource {
    Indi,
    Spouse,
    Family,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPoint {
    Indi(String),
    Fam(String),
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub indi: Option<TreeEntry>,
    pub spouse: Option<TreeEntry>,
    pub family: Option<TreeEntry>,
    /// Negative for ancestors, positive for descendants, 0 for the focal node.
    pub generation: i32,
    pub link_from: LinkSource,
    pub additional_marriage: bool,
    pub children: Vec<TreeNode>,
    /// Further marriages of the person in this node, drawn in the same row.
    pub marriages: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(indi: TreeEntry, generation: i32, link_from: LinkSource) -> Self {
        Self {
            indi: Some(indi),
            spouse: None,
            family: None,
            generation,
            link_from,
            additional_marriage: false,
            children: Vec::new(),
            marriages: Vec::new(),
        }
    }

    pub fn primary(&self) -> Result<&TreeEntry> {
        self.indi.as_ref().ok_or(ChartError::MalformedNode {
            generation: self.generation,
        })
    }

    pub fn entry_mut(&mut self, source: LinkSource) -> Option<&mut TreeEntry> {
        match source {
            LinkSource::Indi => self.indi.as_mut(),
            LinkSource::Spouse => self.spouse.as_mut(),
            LinkSource::Family => self.family.as_mut(),
        }
    }

    /// Total number of nodes in this subtree, marriages included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .chain(self.marriages.iter())
            .map(TreeNode::node_count)
            .sum::<usize>()
    }
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub max_ancestor_generations: usize,
    pub max_descendant_generations: usize,
    pub expanders: bool,
    /// Individuals whose parents stay hidden.
    pub collapsed_ancestors: HashSet<String>,
    /// Families whose children stay hidden.
    pub collapsed_descendants: HashSet<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_ancestor_generations: 5,
            max_descendant_generations: 5,
            expanders: true,
            collapsed_ancestors: HashSet::new(),
            collapsed_descendants: HashSet::new(),
        }
    }
}

impl BuildOptions {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            max_ancestor_generations: config.max_ancestor_generations,
            max_descendant_generations: config.max_descendant_generations,
            expanders: config.expanders,
            ..Default::default()
        }
    }

    fn marker(&self, collapsed: bool) -> Option<ExpanderState> {
        self.expanders.then_some(if collapsed {
            ExpanderState::Plus
        } else {
            ExpanderState::Minus
        })
    }
}

fn known<'a>(data: &dyn DataProvider, id: Option<&'a str>) -> Option<&'a str> {
    let id = id?;
    if data.indi(id).is_some() {
        Some(id)
    } else {
        tracing::warn!(id, "dangling individual reference");
        None
    }
}

/// Husband as primary and wife as spouse; a lone parent becomes the primary.
fn couple_node(
    data: &dyn DataProvider,
    fam: &Family,
    generation: i32,
    link_from: LinkSource,
) -> Option<TreeNode> {
    let husb = known(data, fam.husb.as_deref());
    let wife = known(data, fam.wife.as_deref());
    let (primary, spouse) = match (husb, wife) {
        (Some(h), w) => (h, w),
        (None, Some(w)) => (w, None),
        (None, None) => return None,
    };
    let mut node = TreeNode::new(TreeEntry::new(primary), generation, link_from);
    node.spouse = spouse.map(TreeEntry::new);
    node.family = Some(TreeEntry::new(fam.id.as_str()));
    Some(node)
}

fn start_family<'a>(data: &'a dyn DataProvider, id: &str) -> Result<&'a Family> {
    data.fam(id)
        .ok_or_else(|| ChartError::UnknownFamily(id.to_string()))
}

pub fn ancestors_tree(
    data: &dyn DataProvider,
    start: &StartPoint,
    options: &BuildOptions,
) -> Result<TreeNode> {
    let mut root = match start {
        StartPoint::Indi(id) => {
            data.indi(id)
                .ok_or_else(|| ChartError::UnknownIndi(id.clone()))?;
            TreeNode::new(TreeEntry::new(id.as_str()), 0, LinkSource::Family)
        }
        StartPoint::Fam(id) => {
            let fam = start_family(data, id)?;
            couple_node(data, fam, 0, LinkSource::Family)
                .ok_or_else(|| ChartError::EmptyFamily(id.clone()))?
        }
    };
    expand_ancestors(data, &mut root, 0, options);
    tracing::debug!(nodes = root.node_count(), "built ancestors tree");
    Ok(root)
}

fn expand_ancestors(
    data: &dyn DataProvider,
    node: &mut TreeNode,
    depth: usize,
    options: &BuildOptions,
) {
    let generation = node.generation - 1;
    let mut parents = Vec::new();
    for source in [LinkSource::Indi, LinkSource::Spouse] {
        let Some(entry) = node.entry_mut(source) else {
            continue;
        };
        let Some(famc) = data.indi(&entry.id).and_then(|indi| indi.famc.as_deref()) else {
            continue;
        };
        let Some(fam) = data.fam(famc) else {
            tracing::warn!(id = famc, "dangling family reference");
            continue;
        };
        let Some(mut parent) = couple_node(data, fam, generation, source) else {
            continue;
        };
        let collapsed = depth >= options.max_ancestor_generations
            || options.collapsed_ancestors.contains(&entry.id);
        entry.expander = options.marker(collapsed);
        if collapsed {
            continue;
        }
        expand_ancestors(data, &mut parent, depth + 1, options);
        parents.push(parent);
    }
    node.children = parents;
}

pub fn descendants_tree(
    data: &dyn DataProvider,
    start: &StartPoint,
    options: &BuildOptions,
) -> Result<TreeNode> {
    let root = match start {
        StartPoint::Indi(id) => {
            data.indi(id)
                .ok_or_else(|| ChartError::UnknownIndi(id.clone()))?;
            person_node(data, id, 0, 0, options)
        }
        StartPoint::Fam(id) => {
            let fam = start_family(data, id)?;
            let mut node = couple_node(data, fam, 0, LinkSource::Family)
                .ok_or_else(|| ChartError::EmptyFamily(id.clone()))?;
            expand_family(data, &mut node, fam, 0, options);
            node
        }
    };
    tracing::debug!(nodes = root.node_count(), "built descendants tree");
    Ok(root)
}

fn person_node(
    data: &dyn DataProvider,
    id: &str,
    generation: i32,
    depth: usize,
    options: &BuildOptions,
) -> TreeNode {
    let mut node = TreeNode::new(TreeEntry::new(id), generation, LinkSource::Family);
    let families: Vec<&Family> = data
        .indi(id)
        .map(|indi| {
            indi.fams
                .iter()
                .filter_map(|fam_id| {
                    let fam = data.fam(fam_id);
                    if fam.is_none() {
                        tracing::warn!(id = fam_id.as_str(), "dangling family reference");
                    }
                    fam
                })
                .collect()
        })
        .unwrap_or_default();
    let Some((first, rest)) = families.split_first() else {
        return node;
    };

    node.spouse = known(data, first.spouse_of(id)).map(TreeEntry::new);
    node.family = Some(TreeEntry::new(first.id.as_str()));
    expand_family(data, &mut node, first, depth, options);

    for fam in rest {
        let spouse = known(data, fam.spouse_of(id));
        let mut marriage =
            TreeNode::new(TreeEntry::new(spouse.unwrap_or(id)), generation, LinkSource::Family);
        marriage.family = Some(TreeEntry::new(fam.id.as_str()));
        expand_family(data, &mut marriage, fam, depth, options);
        if spouse.is_some() {
            marriage.additional_marriage = true;
            node.marriages.push(marriage);
        } else {
            // Nobody else to draw: the children join the person's first family.
            merge_family(&mut node, marriage);
        }
    }
    node
}

/// Moves the children of a spouseless marriage under `node`. A hidden block
/// wins over a shown one so the `Plus` marker is not lost.
fn merge_family(node: &mut TreeNode, marriage: TreeNode) {
    let marker = marriage.family.and_then(|family| family.expander);
    if let (Some(family), Some(state)) = (node.family.as_mut(), marker)
        && family.expander != Some(ExpanderState::Plus)
    {
        family.expander = Some(state);
    }
    node.children.extend(marriage.children);
}

fn expand_family(
    data: &dyn DataProvider,
    node: &mut TreeNode,
    fam: &Family,
    depth: usize,
    options: &BuildOptions,
) {
    let children: Vec<&str> = fam
        .children
        .iter()
        .filter_map(|child| known(data, Some(child.as_str())))
        .collect();
    if children.is_empty() {
        return;
    }
    let collapsed = depth >= options.max_descendant_generations
        || options.collapsed_descendants.contains(&fam.id);
    if let Some(family) = node.family.as_mut() {
        family.expander = options.marker(collapsed);
    }
    if collapsed {
        return;
    }
    node.children = children
        .into_iter()
        .map(|child| person_node(data, child, node.generation + 1, depth + 1, options))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::doe_family;

    fn ids(nodes: &[TreeNode]) -> Vec<&str> {
        nodes
            .iter()
            .filter_map(|node| node.indi.as_ref().map(|entry| entry.id.as_str()))
            .collect()
    }

    #[test]
    fn ancestors_of_individual() {
        let data = doe_family();
        let root = ancestors_tree(&data, &StartPoint::Indi("I1".into()), &BuildOptions::default())
            .unwrap();
        assert_eq!(root.primary().unwrap().id, "I1");
        assert!(root.spouse.is_none());
        assert_eq!(root.indi.as_ref().unwrap().expander, Some(ExpanderState::Minus));

        let parents = &root.children[0];
        assert_eq!(parents.generation, -1);
        assert_eq!(parents.primary().unwrap().id, "I2");
        assert_eq!(parents.spouse.as_ref().unwrap().id, "I3");
        assert_eq!(ids(&parents.children), vec!["G1", "G3"]);
        assert_eq!(parents.children[0].link_from, LinkSource::Indi);
        assert_eq!(parents.children[1].link_from, LinkSource::Spouse);
        // Henry Brown's family has no wife, so no placeholder box.
        assert!(parents.children[1].spouse.is_none());
        assert_eq!(root.node_count(), 5);
    }

    #[test]
    fn depth_limit_marks_frontier_with_plus() {
        let data = doe_family();
        let options = BuildOptions {
            max_ancestor_generations: 1,
            ..Default::default()
        };
        let root = ancestors_tree(&data, &StartPoint::Indi("I1".into()), &options).unwrap();
        let parents = &root.children[0];
        assert!(parents.children.is_empty());
        assert_eq!(parents.indi.as_ref().unwrap().expander, Some(ExpanderState::Plus));
        assert_eq!(parents.spouse.as_ref().unwrap().expander, Some(ExpanderState::Plus));
    }

    #[test]
    fn collapsed_individual_keeps_parents_hidden() {
        let data = doe_family();
        let options = BuildOptions {
            collapsed_ancestors: HashSet::from(["I1".to_string()]),
            ..Default::default()
        };
        let root = ancestors_tree(&data, &StartPoint::Indi("I1".into()), &options).unwrap();
        assert!(root.children.is_empty());
        assert_eq!(root.indi.as_ref().unwrap().expander, Some(ExpanderState::Plus));
    }

    #[test]
    fn expanders_can_be_disabled() {
        let data = doe_family();
        let options = BuildOptions {
            expanders: false,
            max_ancestor_generations: 0,
            ..Default::default()
        };
        let root = ancestors_tree(&data, &StartPoint::Indi("I1".into()), &options).unwrap();
        assert!(root.indi.as_ref().unwrap().expander.is_none());
    }

    #[test]
    fn descendants_with_additional_marriage() {
        let data = doe_family();
        let root =
            descendants_tree(&data, &StartPoint::Indi("I1".into()), &BuildOptions::default())
                .unwrap();
        assert_eq!(root.primary().unwrap().id, "I1");
        assert_eq!(root.spouse.as_ref().unwrap().id, "I5");
        assert_eq!(root.family.as_ref().unwrap().id, "F2");
        assert_eq!(ids(&root.children), vec!["I6", "I9"]);
        assert_eq!(root.children[0].generation, 1);

        assert_eq!(root.marriages.len(), 1);
        let second = &root.marriages[0];
        assert!(second.additional_marriage);
        assert_eq!(second.primary().unwrap().id, "I8");
        assert!(second.spouse.is_none());
        assert_eq!(second.family.as_ref().unwrap().id, "F5");
        assert_eq!(ids(&second.children), vec!["I7"]);
    }

    #[test]
    fn spouseless_marriage_does_not_repeat_the_person() {
        let data = doe_family();
        let root =
            descendants_tree(&data, &StartPoint::Indi("I1".into()), &BuildOptions::default())
                .unwrap();
        fn count(node: &TreeNode, id: &str) -> usize {
            let own = [node.indi.as_ref(), node.spouse.as_ref()]
                .into_iter()
                .flatten()
                .filter(|entry| entry.id == id)
                .count();
            own + node
                .children
                .iter()
                .chain(&node.marriages)
                .map(|child| count(child, id))
                .sum::<usize>()
        }
        assert_eq!(count(&root, "I1"), 1);
        // F6 has no husband: Ida hangs from Jane's first family.
        let ida = root.children.iter().find(|c| c.primary().unwrap().id == "I9").unwrap();
        assert_eq!(ida.generation, 1);
        assert_eq!(ida.link_from, LinkSource::Family);
    }

    #[test]
    fn hidden_spouseless_children_keep_plus_marker() {
        let data = doe_family();
        let options = BuildOptions {
            collapsed_descendants: HashSet::from(["F6".to_string()]),
            ..Default::default()
        };
        let root = descendants_tree(&data, &StartPoint::Indi("I1".into()), &options).unwrap();
        assert_eq!(ids(&root.children), vec!["I6"]);
        assert_eq!(root.family.as_ref().unwrap().expander, Some(ExpanderState::Plus));
    }

    #[test]
    fn descendants_of_family() {
        let data = doe_family();
        let root = descendants_tree(&data, &StartPoint::Fam("F1".into()), &BuildOptions::default())
            .unwrap();
        assert_eq!(root.primary().unwrap().id, "I2");
        assert_eq!(root.spouse.as_ref().unwrap().id, "I3");
        assert_eq!(ids(&root.children), vec!["I1", "I4"]);
        assert_eq!(root.family.as_ref().unwrap().expander, Some(ExpanderState::Minus));
    }

    #[test]
    fn collapsed_family_hides_children() {
        let data = doe_family();
        let options = BuildOptions {
            collapsed_descendants: HashSet::from(["F1".to_string()]),
            ..Default::default()
        };
        let root = descendants_tree(&data, &StartPoint::Fam("F1".into()), &options).unwrap();
        assert!(root.children.is_empty());
        assert_eq!(root.family.as_ref().unwrap().expander, Some(ExpanderState::Plus));
    }

    #[test]
    fn unknown_start_is_an_error() {
        let data = doe_family();
        let err = ancestors_tree(&data, &StartPoint::Indi("nobody".into()), &BuildOptions::default())
            .unwrap_err();
        assert!(matches!(err, ChartError::UnknownIndi(_)));
        let err = descendants_tree(&data, &StartPoint::Fam("F404".into()), &BuildOptions::default())
            .unwrap_err();
        assert!(matches!(err, ChartError::UnknownFamily(_)));
    }

    #[test]
    fn node_without_primary_is_malformed() {
        let mut node = TreeNode::new(TreeEntry::new("I1"), -2, LinkSource::Indi);
        node.indi = None;
        assert!(matches!(
            node.primary(),
            Err(ChartError::MalformedNode { generation: -2 })
        ));
    }
}
