use std::time::Duration;

use super::{escape_xml, num};
use crate::layout::Rect;
use crate::zoom::ZoomBehavior;

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

/// One SVG element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: &'static str,
    attrs: Vec<(&'static str, String)>,
    content: Vec<Content>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            content: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn set_attr(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.content.push(Content::Element(child));
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content.push(Content::Text(text.into()));
        self
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.content.iter().filter_map(|content| match content {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for content in &self.content {
            match content {
                Content::Text(text) => out.push_str(text),
                Content::Element(element) => out.push_str(&element.text_content()),
            }
        }
        out
    }

    /// Depth-first search including `self`.
    pub fn find_all<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        if self.name == name {
            out.push(self);
        }
        for child in self.children() {
            child.find_all(name, out);
        }
    }

    pub fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attrs {
            out.push_str(&format!(" {key}=\"{}\"", escape_xml(value)));
        }
        if self.content.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for content in &self.content {
            match content {
                Content::Element(element) => element.write(out),
                Content::Text(text) => out.push_str(&escape_xml(text)),
            }
        }
        out.push_str(&format!("</{}>", self.name));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Links,
    Expanders,
    Nodes,
}

impl Layer {
    const ALL: [Layer; 3] = [Layer::Links, Layer::Expanders, Layer::Nodes];

    fn index(self) -> usize {
        match self {
            Layer::Links => 0,
            Layer::Expanders => 1,
            Layer::Nodes => 2,
        }
    }

    fn class(self) -> &'static str {
        match self {
            Layer::Links => "links",
            Layer::Expanders => "expanders",
            Layer::Nodes => "nodes",
        }
    }
}

struct ClickRegion {
    rect: Rect,
    handler: Box<dyn Fn()>,
}

/// Drawing surface handle: the chart group's layers, the stylesheet, click
/// regions in chart coordinates and an optional attached zoom behavior.
pub struct SvgSurface {
    width: String,
    height: String,
    background: String,
    css: String,
    layers: [Vec<Element>; 3],
    regions: Vec<ClickRegion>,
    zoom: Option<ZoomBehavior>,
    fade_in: Duration,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32, background: impl Into<String>) -> Self {
        Self {
            width: num(width),
            height: num(height),
            background: background.into(),
            css: String::new(),
            layers: Default::default(),
            regions: Vec::new(),
            zoom: None,
            fade_in: Duration::ZERO,
        }
    }

    pub fn set_size(&mut self, width: impl Into<String>, height: impl Into<String>) {
        self.width = width.into();
        self.height = height.into();
    }

    pub fn size(&self) -> (&str, &str) {
        (&self.width, &self.height)
    }

    pub fn set_css(&mut self, css: String) {
        self.css = css;
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn set_fade_in(&mut self, duration: Duration) {
        self.fade_in = duration;
    }

    pub fn append(&mut self, layer: Layer, element: Element) {
        self.layers[layer.index()].push(element);
    }

    pub fn layer(&self, layer: Layer) -> &[Element] {
        &self.layers[layer.index()]
    }

    /// Registers `handler` for clicks inside `rect` (chart coordinates).
    /// Later registrations sit on top of earlier ones.
    pub fn on_click(&mut self, rect: Rect, handler: impl Fn() + 'static) {
        self.regions.push(ClickRegion {
            rect,
            handler: Box::new(handler),
        });
    }

    /// Fires the topmost region containing the chart-space point.
    pub fn click_at(&self, x: f32, y: f32) -> bool {
        match self.regions.iter().rev().find(|region| region.rect.contains(x, y)) {
            Some(region) => {
                (region.handler)();
                true
            }
            None => false,
        }
    }

    /// Screen-space click: undoes the zoom transform before hit testing.
    pub fn click(&self, x: f32, y: f32) -> bool {
        let (x, y) = match &self.zoom {
            Some(zoom) => zoom.transform().invert((x, y)),
            None => (x, y),
        };
        self.click_at(x, y)
    }

    pub fn attach_zoom(&mut self, zoom: ZoomBehavior) {
        self.zoom = Some(zoom);
    }

    pub fn zoom(&self) -> Option<&ZoomBehavior> {
        self.zoom.as_ref()
    }

    pub fn zoom_mut(&mut self) -> Option<&mut ZoomBehavior> {
        self.zoom.as_mut()
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
            escape_xml(&self.width),
            escape_xml(&self.height)
        ));
        if !self.css.is_empty() {
            svg.push_str("<style>");
            svg.push_str(&escape_xml(&self.css));
            svg.push_str("</style>");
        }
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&self.background)
        ));

        let mut chart = Element::new("g").attr("class", "chart");
        if let Some(zoom) = &self.zoom {
            chart.set_attr("transform", zoom.transform().to_string());
        }
        for layer in Layer::ALL {
            let mut group = Element::new("g").attr("class", layer.class());
            if layer == Layer::Nodes && !self.fade_in.is_zero() {
                group.push(
                    Element::new("animate")
                        .attr("attributeName", "opacity")
                        .attr("from", "0")
                        .attr("to", "1")
                        .attr("dur", format!("{}ms", self.fade_in.as_millis()))
                        .attr("fill", "freeze"),
                );
            }
            for element in self.layer(layer) {
                group.push(element.clone());
            }
            chart.push(group);
        }
        chart.write(&mut svg);
        svg.push_str("</svg>");
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zoom::{ZoomBehavior, ZoomTransform};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn element_serializes_attributes_in_order() {
        let mut out = String::new();
        Element::new("text")
            .attr("class", "name")
            .attr("x", "1")
            .text("Tom & Jerry")
            .write(&mut out);
        assert_eq!(out, "<text class=\"name\" x=\"1\">Tom &amp; Jerry</text>");
    }

    #[test]
    fn set_attr_replaces_existing_value() {
        let el = Element::new("g").attr("transform", "a").attr("transform", "b");
        assert_eq!(el.get_attr("transform"), Some("b"));
    }

    #[test]
    fn topmost_region_wins() {
        let hits = Rc::new(Cell::new(0));
        let mut surface = SvgSurface::new(100.0, 100.0, "#fff");
        let first = Rc::clone(&hits);
        surface.on_click(Rect::new(0.0, 0.0, 50.0, 50.0), move || first.set(1));
        let second = Rc::clone(&hits);
        surface.on_click(Rect::new(10.0, 10.0, 10.0, 10.0), move || second.set(2));
        assert!(surface.click_at(15.0, 15.0));
        assert_eq!(hits.get(), 2);
        assert!(surface.click_at(40.0, 40.0));
        assert_eq!(hits.get(), 1);
        assert!(!surface.click_at(90.0, 90.0));
    }

    #[test]
    fn screen_click_goes_through_zoom() {
        let hits = Rc::new(Cell::new(false));
        let mut surface = SvgSurface::new(100.0, 100.0, "#fff");
        let hit = Rc::clone(&hits);
        surface.on_click(Rect::new(0.0, 0.0, 10.0, 10.0), move || hit.set(true));
        let mut zoom = ZoomBehavior::default();
        zoom.set_transform(ZoomTransform::new(100.0, 100.0, 2.0));
        surface.attach_zoom(zoom);
        assert!(!surface.click(5.0, 5.0));
        assert!(surface.click(110.0, 110.0));
        assert!(hits.get());
    }

    #[test]
    fn fade_in_adds_animation() {
        let mut surface = SvgSurface::new(100.0, 100.0, "#fff");
        assert!(!surface.to_svg().contains("<animate"));
        surface.set_fade_in(Duration::from_millis(300));
        assert!(surface.to_svg().contains("dur=\"300ms\""));
    }
}
