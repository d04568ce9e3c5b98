use super::indi_box::{BoxVariant, IndiBoxes, common_css};
use super::{Renderer, RendererOptions, SvgSurface};
use crate::data::Individual;
use crate::error::Result;
use crate::layout::LaidOutNode;
use crate::text_metrics::TextMeasurer;

pub const MIN_WIDTH: f32 = 50.0;
pub const MIN_HEIGHT: f32 = 40.0;

/// Rounded box with the full name on one line and the years beneath.
pub struct CompositeRenderer {
    boxes: IndiBoxes,
}

fn name_lines(indi: &Individual) -> Vec<String> {
    vec![indi.full_name()]
}

impl CompositeRenderer {
    pub fn new(options: RendererOptions, measurer: Box<dyn TextMeasurer>) -> Self {
        let variant = BoxVariant {
            class: "composite",
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            corner_radius: 4.0,
            name_rows: &[17.0],
            years_row: 33.0,
            name_lines,
        };
        Self {
            boxes: IndiBoxes::new(options, measurer, variant),
        }
    }
}

impl Renderer for CompositeRenderer {
    fn preferred_indi_size(&self, id: &str) -> Result<(f32, f32)> {
        self.boxes.preferred_size(id)
    }

    fn render(
        &self,
        surface: &mut SvgSurface,
        enter: &[LaidOutNode],
        update: &[LaidOutNode],
    ) -> Result<()> {
        self.boxes.render(surface, enter, update)
    }

    fn css(&self) -> String {
        let theme = &self.boxes.options.theme;
        format!(
            r#"
.composite text {{
  font: {size}px {family};
  fill: {text};
}}

.composite .name {{
  font-weight: bold;
}}

.composite .details {{
  font-size: 10px;
  fill-opacity: 0.8;
}}

.composite rect {{
  stroke: {stroke};
  stroke-width: 1.5px;
}}
{common}"#,
            size = theme.font_size,
            family = theme.font_family,
            text = theme.text_color,
            stroke = theme.box_stroke,
            common = common_css(&self.boxes.options),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::doe_family;
    use crate::render::Layer;
    use crate::render::testing::{FixedWidth, fixed_options};
    use crate::tree::{LinkSource, TreeEntry};

    fn renderer() -> CompositeRenderer {
        CompositeRenderer::new(fixed_options(&doe_family()), Box::new(FixedWidth))
    }

    #[test]
    fn full_name_drives_width() {
        let renderer = renderer();
        // "Jane Doe" is 8 chars, narrower than the years label.
        assert_eq!(renderer.preferred_indi_size("I1").unwrap(), (77.0, 54.0));
        // "Tom Doe" without years.
        assert_eq!(renderer.preferred_indi_size("I4").unwrap(), (57.0, 40.0));
    }

    #[test]
    fn draws_rounded_box_with_one_name_line() {
        let renderer = renderer();
        let mut indi = TreeEntry::new("I1");
        (indi.width, indi.height) = renderer.preferred_indi_size("I1").unwrap();
        let node = LaidOutNode {
            indi,
            spouse: None,
            family: None,
            generation: 1,
            link_from: LinkSource::Family,
            additional_marriage: false,
            x: 0.0,
            y: 0.0,
            spouse_offset: (0.0, 0.0),
        };
        let mut surface = SvgSurface::new(100.0, 100.0, "#fff");
        renderer.render(&mut surface, &[node], &[]).unwrap();
        let group = &surface.layer(Layer::Nodes)[0];
        assert_eq!(group.get_attr("class"), Some("composite"));

        let mut rects = Vec::new();
        group.find_all("rect", &mut rects);
        assert_eq!(rects[0].get_attr("rx"), Some("4"));

        let mut texts = Vec::new();
        group.find_all("text", &mut texts);
        let lines: Vec<String> = texts.iter().map(|t| t.text_content()).collect();
        assert_eq!(lines, vec!["Jane Doe", "1900 – 1980"]);
    }

    #[test]
    fn css_is_scoped_to_composite() {
        let css = renderer().css();
        assert!(css.contains(".composite rect"));
        assert!(!css.contains(".simple"));
        assert!(css.contains(".link"));
    }
}
