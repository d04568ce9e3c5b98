mod composite;
mod indi_box;
mod output;
mod simple;
mod surface;

pub use composite::CompositeRenderer;
pub use output::write_output_svg;
#[cfg(feature = "png")]
pub use output::write_output_png;
pub use simple::SimpleRenderer;
pub use surface::{Content, Element, Layer, SvgSurface};

use crate::config::RendererKind;
use crate::data::DataProvider;
use crate::error::Result;
use crate::layout::LaidOutNode;
use crate::text_metrics::TextMeasurer;
use crate::theme::Theme;
use std::fmt;
use std::rc::Rc;

/// Draws individual boxes and reports how much room each one needs.
pub trait Renderer {
    /// `(width, height)` of the box for individual `id`.
    fn preferred_indi_size(&self, id: &str) -> Result<(f32, f32)>;

    /// Appends one group per node to the surface. Entering and updated nodes
    /// are drawn the same way.
    fn render(
        &self,
        surface: &mut SvgSurface,
        enter: &[LaidOutNode],
        update: &[LaidOutNode],
    ) -> Result<()>;

    /// Stylesheet fragment the drawn elements rely on.
    fn css(&self) -> String;
}

/// Delivered to the click callback of a person box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndiInfo {
    pub id: String,
    pub generation: i32,
}

pub type HrefFn = Rc<dyn Fn(&str) -> String>;
pub type IndiCallback = Rc<dyn Fn(&IndiInfo)>;

#[derive(Clone)]
pub struct RendererOptions {
    pub data: Rc<dyn DataProvider>,
    /// Generations run left to right instead of top to bottom.
    pub horizontal: bool,
    pub theme: Theme,
    pub indi_href: Option<HrefFn>,
    pub indi_callback: Option<IndiCallback>,
}

impl RendererOptions {
    pub fn new(data: Rc<dyn DataProvider>) -> Self {
        Self {
            data,
            horizontal: false,
            theme: Theme::default(),
            indi_href: None,
            indi_callback: None,
        }
    }

    /// Link every box to `template` with `{id}` replaced by the individual id.
    pub fn with_href_template(mut self, template: impl Into<String>) -> Self {
        let template = template.into();
        self.indi_href = Some(Rc::new(move |id: &str| template.replace("{id}", id)));
        self
    }
}

impl fmt::Debug for RendererOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererOptions")
            .field("horizontal", &self.horizontal)
            .field("theme", &self.theme)
            .field("indi_href", &self.indi_href.is_some())
            .field("indi_callback", &self.indi_callback.is_some())
            .finish_non_exhaustive()
    }
}

pub fn renderer_for(
    kind: RendererKind,
    options: RendererOptions,
    measurer: Box<dyn TextMeasurer>,
) -> Box<dyn Renderer> {
    match kind {
        RendererKind::Simple => Box::new(SimpleRenderer::new(options, measurer)),
        RendererKind::Composite => Box::new(CompositeRenderer::new(options, measurer)),
    }
}

/// Shortest decimal form with at most two fraction digits.
pub(crate) fn num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

pub(crate) fn points_to_path(points: &[(f32, f32)]) -> String {
    let mut d = String::new();
    for (idx, (x, y)) in points.iter().enumerate() {
        if idx > 0 {
            d.push(' ');
        }
        d.push(if idx == 0 { 'M' } else { 'L' });
        d.push_str(&format!(" {} {}", num(*x), num(*y)));
    }
    d
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
