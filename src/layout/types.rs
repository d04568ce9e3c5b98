use serde::Serialize;
use std::time::Duration;

use crate::tree::{ExpanderState, LinkSource, TreeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// Maps the generation (depth) axis and the sibling (cross) axis onto x/y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Axes {
    pub horizontal: bool,
}

impl Axes {
    pub fn point(&self, cross: f32, depth: f32) -> (f32, f32) {
        if self.horizontal {
            (depth, cross)
        } else {
            (cross, depth)
        }
    }

    pub fn rect(&self, cross: f32, depth: f32, cross_len: f32, depth_len: f32) -> Rect {
        let (x, y) = self.point(cross, depth);
        let (width, height) = self.point(cross_len, depth_len);
        Rect::new(x, y, width, height)
    }

    pub fn cross_len(&self, width: f32, height: f32) -> f32 {
        if self.horizontal { height } else { width }
    }

    pub fn depth_len(&self, width: f32, height: f32) -> f32 {
        if self.horizontal { width } else { height }
    }

    pub fn cross_range(&self, rect: &Rect) -> (f32, f32) {
        if self.horizontal {
            (rect.y, rect.bottom())
        } else {
            (rect.x, rect.right())
        }
    }

    pub fn depth_range(&self, rect: &Rect) -> (f32, f32) {
        if self.horizontal {
            (rect.x, rect.right())
        } else {
            (rect.y, rect.bottom())
        }
    }

    pub fn cross_center(&self, rect: &Rect) -> f32 {
        let (min, max) = self.cross_range(rect);
        (min + max) / 2.0
    }

    pub fn depth_center(&self, rect: &Rect) -> f32 {
        let (min, max) = self.depth_range(rect);
        (min + max) / 2.0
    }
}

/// Where the spouse box sits relative to the primary box's top-left corner:
/// below the primary when `horizontal` is false, to its right otherwise.
pub fn spouse_offset(horizontal: bool, primary: &TreeEntry) -> (f32, f32) {
    if horizontal {
        (primary.width, 0.0)
    } else {
        (0.0, primary.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutNode {
    pub indi: TreeEntry,
    pub spouse: Option<TreeEntry>,
    pub family: Option<TreeEntry>,
    pub generation: i32,
    pub link_from: LinkSource,
    pub additional_marriage: bool,
    /// Top-left corner of the primary box.
    pub x: f32,
    pub y: f32,
    pub spouse_offset: (f32, f32),
}

impl LaidOutNode {
    pub fn indi_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.indi.width, self.indi.height)
    }

    pub fn spouse_rect(&self) -> Option<Rect> {
        self.spouse.as_ref().map(|spouse| {
            Rect::new(
                self.x + self.spouse_offset.0,
                self.y + self.spouse_offset.1,
                spouse.width,
                spouse.height,
            )
        })
    }

    /// Bounding box of the primary and spouse boxes together.
    pub fn footprint(&self) -> Rect {
        let indi = self.indi_rect();
        match self.spouse_rect() {
            Some(spouse) => indi.union(&spouse),
            None => indi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkStyle {
    Solid,
    Dotted,
    AdditionalMarriage,
}

impl LinkStyle {
    pub fn css_class(&self) -> &'static str {
        match self {
            LinkStyle::Solid => "link",
            LinkStyle::Dotted => "link-dotted",
            LinkStyle::AdditionalMarriage => "link additional-marriage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkLayout {
    pub from: String,
    pub to: String,
    pub points: Vec<(f32, f32)>,
    pub style: LinkStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpanderTarget {
    Indi,
    Spouse,
    Family,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpanderLayout {
    pub id: String,
    pub target: ExpanderTarget,
    pub state: ExpanderState,
    pub rect: Rect,
    /// Dotted connector from the box edge to the glyph.
    pub stub: LinkLayout,
}

/// Positioned nodes in pre-order (root first) plus their connectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartLayout {
    pub nodes: Vec<LaidOutNode>,
    pub links: Vec<LinkLayout>,
}

/// Completion of the entry fade-in; finished once `duration` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationHandle {
    duration: Duration,
}

impl AnimationHandle {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn finished() -> Self {
        Self::default()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartInfo {
    pub width: f32,
    pub height: f32,
    /// Translation that moves the chart's top-left bound to the margin.
    pub origin: (f32, f32),
    pub animation: AnimationHandle,
}
