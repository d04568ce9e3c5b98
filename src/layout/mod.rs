mod links;
mod tidy;
mod types;

pub use links::expander_layouts;
pub use types::*;
use links::*;
use tidy::*;

use crate::config::LayoutConfig;
use crate::error::{ChartError, Result};
use crate::render::{Element, Layer, Renderer, SvgSurface, num, points_to_path};
use crate::tree::{ExpanderState, LinkSource, TreeNode};
use std::time::Duration;

#[cfg(test)]
use crate::tree::TreeEntry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Mirror the depth axis so the tree grows toward negative coordinates.
    pub flip_vertically: bool,
    pub horizontal: bool,
    pub node_spacing: f32,
    pub rank_spacing: f32,
}

impl LayoutOptions {
    pub fn from_config(config: &LayoutConfig, horizontal: bool) -> Self {
        Self {
            flip_vertically: false,
            horizontal,
            node_spacing: config.node_spacing,
            rank_spacing: config.rank_spacing,
        }
    }

    pub fn flipped(self) -> Self {
        Self {
            flip_vertically: true,
            ..self
        }
    }
}

/// Sizes every entry through `renderer`, then positions the tree with the
/// root's primary box at the origin. Nodes come back in pre-order, root first.
pub fn lay_out_chart(
    root: &mut TreeNode,
    renderer: &dyn Renderer,
    options: &LayoutOptions,
) -> Result<ChartLayout> {
    measure_tree(root, renderer)?;
    let layout = position_tree(root, options)?;
    tracing::debug!(
        nodes = layout.nodes.len(),
        links = layout.links.len(),
        flipped = options.flip_vertically,
        "laid out chart"
    );
    Ok(layout)
}

pub fn chart_bounds(layout: &ChartLayout, config: &LayoutConfig, horizontal: bool) -> Option<Rect> {
    let expanders = expander_layouts(
        &layout.nodes,
        horizontal,
        config.expander_size,
        config.expander_gap,
    );
    layout
        .nodes
        .iter()
        .map(LaidOutNode::footprint)
        .chain(expanders.iter().map(|expander| expander.rect))
        .reduce(|acc, rect| acc.union(&rect))
}

/// Overall size with a margin on every side, and the offset that moves the
/// chart's top-left bound to that margin.
pub fn chart_info(layout: &ChartLayout, config: &LayoutConfig, horizontal: bool) -> ChartInfo {
    let margin = config.margin;
    let bounds = chart_bounds(layout, config, horizontal).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
    ChartInfo {
        width: bounds.width + 2.0 * margin,
        height: bounds.height + 2.0 * margin,
        origin: (margin - bounds.x, margin - bounds.y),
        animation: AnimationHandle::finished(),
    }
}

/// Draws links and expanders, then hands every node to the renderer as an
/// entering node.
pub fn render_chart(
    surface: &mut SvgSurface,
    layout: &ChartLayout,
    renderer: &dyn Renderer,
    config: &LayoutConfig,
    horizontal: bool,
) -> Result<AnimationHandle> {
    surface.set_css(renderer.css());

    for link in &layout.links {
        surface.append(Layer::Links, link_element(link));
    }

    for expander in expander_layouts(
        &layout.nodes,
        horizontal,
        config.expander_size,
        config.expander_gap,
    ) {
        surface.append(Layer::Links, link_element(&expander.stub));
        surface.append(Layer::Expanders, expander_element(&expander));
    }

    renderer.render(surface, &layout.nodes, &[])?;

    let duration = Duration::from_millis(config.animation_ms);
    surface.set_fade_in(duration);
    Ok(AnimationHandle::new(duration))
}

fn link_element(link: &LinkLayout) -> Element {
    Element::new("path")
        .attr("class", link.style.css_class())
        .attr("d", points_to_path(&link.points))
}

fn expander_element(expander: &ExpanderLayout) -> Element {
    let glyph = match expander.state {
        ExpanderState::Plus => "+",
        ExpanderState::Minus => "−",
    };
    let size = expander.rect.width;
    Element::new("g")
        .attr("class", "expander")
        .attr(
            "transform",
            format!("translate({}, {})", num(expander.rect.x), num(expander.rect.y)),
        )
        .child(
            Element::new("rect")
                .attr("width", num(size))
                .attr("height", num(expander.rect.height)),
        )
        .child(
            Element::new("text")
                .attr("text-anchor", "middle")
                .attr("x", num(size / 2.0))
                .attr("y", num(expander.rect.height - 2.0))
                .text(glyph),
        )
}
