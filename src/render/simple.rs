use super::indi_box::{BoxVariant, IndiBoxes, common_css};
use super::{Renderer, RendererOptions, SvgSurface};
use crate::data::Individual;
use crate::error::Result;
use crate::layout::LaidOutNode;
use crate::text_metrics::TextMeasurer;

pub const MIN_WIDTH: f32 = 50.0;
pub const MIN_HEIGHT: f32 = 27.0;

/// Box with the first name, the last name and the years of birth and death.
pub struct SimpleRenderer {
    boxes: IndiBoxes,
}

fn name_lines(indi: &Individual) -> Vec<String> {
    vec![indi.first_name().to_string(), indi.last_name().to_string()]
}

impl SimpleRenderer {
    pub fn new(options: RendererOptions, measurer: Box<dyn TextMeasurer>) -> Self {
        let variant = BoxVariant {
            class: "simple",
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            corner_radius: 0.0,
            name_rows: &[12.0, 24.0],
            years_row: 37.0,
            name_lines,
        };
        Self {
            boxes: IndiBoxes::new(options, measurer, variant),
        }
    }
}

impl Renderer for SimpleRenderer {
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
        let class = self.boxes.class();
        format!(
            r#"
.{class} text {{
  font: {size}px {family};
  fill: {text};
}}

.{class} .name {{
  font-weight: bold;
}}

.{class} .details {{
  font-size: 10px;
}}

.{class} rect {{
  stroke: {stroke};
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
