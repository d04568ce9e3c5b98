use crate::layout::{ChartInfo, ChartLayout, ExpanderLayout, LaidOutNode, Rect, expander_layouts};
use crate::tree::{ExpanderState, LinkSource, TreeEntry};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub orientation: String,
    pub width: f32,
    pub height: f32,
    pub origin: [f32; 2],
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
    pub expanders: Vec<ExpanderLayout>,
}

#[derive(Debug, Serialize)]
pub struct EntryDump {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub expander: Option<ExpanderState>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub generation: i32,
    pub link_from: LinkSource,
    pub additional_marriage: bool,
    pub x: f32,
    pub y: f32,
    pub indi: EntryDump,
    pub spouse: Option<EntryDump>,
    pub spouse_rect: Option<Rect>,
    pub family: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub from: String,
    pub to: String,
    pub style: String,
    pub points: Vec<[f32; 2]>,
}

fn entry(entry: &TreeEntry) -> EntryDump {
    EntryDump {
        id: entry.id.clone(),
        width: entry.width,
        height: entry.height,
        expander: entry.expander,
    }
}

fn node(node: &LaidOutNode) -> NodeDump {
    NodeDump {
        generation: node.generation,
        link_from: node.link_from,
        additional_marriage: node.additional_marriage,
        x: node.x,
        y: node.y,
        indi: entry(&node.indi),
        spouse: node.spouse.as_ref().map(entry),
        spouse_rect: node.spouse_rect(),
        family: node.family.as_ref().map(|family| family.id.clone()),
    }
}

impl LayoutDump {
    pub fn from_layout(
        layout: &ChartLayout,
        info: &ChartInfo,
        horizontal: bool,
        expander_size: f32,
        expander_gap: f32,
    ) -> Self {
        let links = layout
            .links
            .iter()
            .map(|link| LinkDump {
                from: link.from.clone(),
                to: link.to.clone(),
                style: link.style.css_class().to_string(),
                points: link.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            orientation: if horizontal { "horizontal" } else { "vertical" }.to_string(),
            width: info.width,
            height: info.height,
            origin: [info.origin.0, info.origin.1],
            nodes: layout.nodes.iter().map(node).collect(),
            links,
            expanders: expander_layouts(&layout.nodes, horizontal, expander_size, expander_gap),
        }
    }
}

pub fn write_layout_dump(path: &Path, dump: &LayoutDump) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, dump)?;
    tracing::info!(path = %path.display(), nodes = dump.nodes.len(), "wrote layout dump");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{AnimationHandle, LinkLayout, LinkStyle};

    #[test]
    fn dump_serializes_nodes_links_and_expanders() {
        let mut indi = TreeEntry::new("I1");
        indi.width = 60.0;
        indi.height = 41.0;
        indi.expander = Some(ExpanderState::Plus);
        let layout = ChartLayout {
            nodes: vec![LaidOutNode {
                indi,
                spouse: None,
                family: None,
                generation: 0,
                link_from: LinkSource::Family,
                additional_marriage: false,
                x: 0.0,
                y: 0.0,
                spouse_offset: (0.0, 41.0),
            }],
            links: vec![LinkLayout {
                from: "I1".into(),
                to: "I6".into(),
                points: vec![(30.0, 41.0), (30.0, 61.0)],
                style: LinkStyle::Solid,
            }],
        };
        let info = ChartInfo {
            width: 90.0,
            height: 89.0,
            origin: (15.0, 33.0),
            animation: AnimationHandle::finished(),
        };
        let dump = LayoutDump::from_layout(&layout, &info, false, 12.0, 6.0);
        let value = serde_json::to_value(&dump).unwrap();
        assert_eq!(value["orientation"], "vertical");
        assert_eq!(value["nodes"][0]["indi"]["expander"], "plus");
        assert_eq!(value["nodes"][0]["link_from"], "family");
        assert_eq!(value["links"][0]["style"], "link");
        assert_eq!(value["links"][0]["points"][1][1], 61.0);
        assert_eq!(value["expanders"][0]["target"], "indi");
        assert_eq!(value["expanders"][0]["stub"]["style"], "dotted");
    }
}
