use super::{Element, IndiInfo, Layer, RendererOptions, SvgSurface, num};
use crate::data::Individual;
use crate::error::{ChartError, Result};
use crate::layout::{LaidOutNode, Rect};
use crate::text_metrics::{TextMeasurer, TextStyle};
use crate::tree::TreeEntry;

/// Extra height reserved for the years line.
pub(super) const YEARS_HEIGHT: f32 = 14.0;
const NAME_PADDING: f32 = 8.0;
const DETAILS_FONT_SIZE: f32 = 10.0;

/// Geometry and text rows of one renderer variant.
pub(super) struct BoxVariant {
    pub class: &'static str,
    pub min_width: f32,
    pub min_height: f32,
    pub corner_radius: f32,
    /// Baseline of each name line, in order.
    pub name_rows: &'static [f32],
    pub years_row: f32,
    pub name_lines: fn(&Individual) -> Vec<String>,
}

/// Measuring and drawing shared by the renderer variants.
pub(super) struct IndiBoxes {
    pub options: RendererOptions,
    measurer: Box<dyn TextMeasurer>,
    variant: BoxVariant,
}

impl IndiBoxes {
    pub fn new(options: RendererOptions, measurer: Box<dyn TextMeasurer>, variant: BoxVariant) -> Self {
        Self {
            options,
            measurer,
            variant,
        }
    }

    pub fn class(&self) -> &'static str {
        self.variant.class
    }

    fn individual(&self, id: &str) -> Result<&Individual> {
        self.options
            .data
            .indi(id)
            .ok_or_else(|| ChartError::UnknownIndi(id.to_string()))
    }

    pub fn preferred_size(&self, id: &str) -> Result<(f32, f32)> {
        let indi = self.individual(id)?;
        let name_style = TextStyle::bold(self.options.theme.font_size);
        let mut name_width = 0.0f32;
        for line in (self.variant.name_lines)(indi) {
            name_width = name_width.max(self.measurer.measure(&line, name_style)?);
        }
        let years = indi.years();
        let years_width = self
            .measurer
            .measure(&years, TextStyle::regular(DETAILS_FONT_SIZE))?;
        let width = (name_width + NAME_PADDING)
            .max(years_width)
            .max(self.variant.min_width);
        let height = if years.is_empty() {
            self.variant.min_height
        } else {
            self.variant.min_height + YEARS_HEIGHT
        };
        Ok((width, height))
    }

    pub fn render(
        &self,
        surface: &mut SvgSurface,
        enter: &[LaidOutNode],
        update: &[LaidOutNode],
    ) -> Result<()> {
        for node in enter.iter().chain(update) {
            let mut group = Element::new("g").attr("class", self.variant.class).attr(
                "transform",
                format!("translate({}, {})", num(node.x), num(node.y)),
            );
            group.push(self.indi_element(&node.indi)?);
            self.bind_click(surface, &node.indi, node.indi_rect(), node.generation);

            if let (Some(spouse), Some(rect)) = (node.spouse.as_ref(), node.spouse_rect()) {
                let (dx, dy) = node.spouse_offset;
                group.push(
                    Element::new("g")
                        .attr("transform", format!("translate({}, {})", num(dx), num(dy)))
                        .child(self.indi_element(spouse)?),
                );
                self.bind_click(surface, spouse, rect, node.generation);
            }
            surface.append(Layer::Nodes, group);
        }
        Ok(())
    }

    fn bind_click(&self, surface: &mut SvgSurface, entry: &TreeEntry, rect: Rect, generation: i32) {
        let Some(callback) = self.options.indi_callback.clone() else {
            return;
        };
        let info = IndiInfo {
            id: entry.id.clone(),
            generation,
        };
        surface.on_click(rect, move || callback(&info));
    }

    fn indi_element(&self, entry: &TreeEntry) -> Result<Element> {
        let indi = self.individual(&entry.id)?;
        let theme = &self.options.theme;
        let fill = indi.color.as_deref().unwrap_or(&theme.default_fill);
        let center = num(entry.width / 2.0);

        let mut rect = Element::new("rect")
            .attr("width", num(entry.width))
            .attr("height", num(entry.height))
            .attr("fill", fill);
        if self.variant.corner_radius > 0.0 {
            rect.set_attr("rx", num(self.variant.corner_radius));
        }

        let mut parts = vec![rect];
        let lines = (self.variant.name_lines)(indi);
        for (line, row) in lines.into_iter().zip(self.variant.name_rows) {
            parts.push(text_row("name", &center, *row, line));
        }
        let years = indi.years();
        if !years.is_empty() {
            parts.push(text_row("details", &center, self.variant.years_row, years));
        }

        let mut container = match &self.options.indi_href {
            Some(href) => Element::new("a").attr("href", href(entry.id.as_str())),
            None => Element::new("g").attr("class", "indi"),
        };
        for part in parts {
            container.push(part);
        }
        Ok(container)
    }
}

fn text_row(class: &'static str, center: &str, row: f32, text: String) -> Element {
    Element::new("text")
        .attr("text-anchor", "middle")
        .attr("class", class)
        .attr("transform", format!("translate({center}, {})", num(row)))
        .text(text)
}

/// Rules shared by every variant: links, expanders and hidden nodes.
pub(super) fn common_css(options: &RendererOptions) -> String {
    let theme = &options.theme;
    format!(
        r#"
.link {{
  fill: none;
  stroke: {line};
  stroke-width: 1px;
}}

.link-dotted {{
  fill: none;
  stroke: {line};
  stroke-width: 1px;
  stroke-dasharray: 4;
}}

.additional-marriage {{
  stroke-dasharray: 2;
}}

.expander {{
  cursor: pointer;
}}

.expander rect {{
  fill: {expander};
  stroke: {stroke};
}}

.expander text {{
  font: 10px {family};
  fill: {text};
}}

.invisible {{
  opacity: 0;
}}"#,
        line = theme.line_color,
        expander = theme.expander_fill,
        stroke = theme.box_stroke,
        family = theme.font_family,
        text = theme.text_color,
    )
}
