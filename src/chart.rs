use crate::config::{Config, LayoutConfig};
use crate::data::DataProvider;
use crate::error::Result;
use crate::layout::{
    ChartInfo, ChartLayout, LaidOutNode, LayoutOptions, chart_info, lay_out_chart, render_chart,
};
use crate::render::{Renderer, RendererOptions, SvgSurface, num, renderer_for};
use crate::text_metrics::measurer_for;
use crate::tree::{BuildOptions, StartPoint, ancestors_tree, descendants_tree};
use crate::zoom::{SCALE_EXTENT, ZoomBehavior, ZoomTransform};
use std::rc::Rc;

pub struct ChartOptions {
    pub data: Rc<dyn DataProvider>,
    pub renderer: Box<dyn Renderer>,
    pub start: StartPoint,
    pub horizontal: bool,
    pub layout: LayoutConfig,
    pub build: BuildOptions,
}

/// Ancestors of the focal node above it, descendants below (or left and
/// right when horizontal).
pub struct HourglassChart {
    options: ChartOptions,
}

impl HourglassChart {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    /// Both halves laid out around the focal node at the origin, the focal
    /// node listed once.
    pub fn layout(&self) -> Result<ChartLayout> {
        let options = &self.options;
        let data = options.data.as_ref();
        let renderer = options.renderer.as_ref();
        let layout_options = LayoutOptions::from_config(&options.layout, options.horizontal);

        let mut ancestors = ancestors_tree(data, &options.start, &options.build)?;
        let mut descendants = descendants_tree(data, &options.start, &options.build)?;
        let up = lay_out_chart(&mut ancestors, renderer, &layout_options.flipped())?;
        let mut down = lay_out_chart(&mut descendants, renderer, &layout_options)?;

        if let (Some(from), Some(to)) = (up.nodes.first(), down.nodes.first_mut()) {
            copy_expanders(from, to);
        }
        down.nodes.extend(up.nodes.into_iter().skip(1));
        down.links.extend(up.links);
        Ok(down)
    }

    /// Draws the chart into `surface`, sizes it to fill its container and
    /// attaches pan/zoom centered on the chart origin.
    pub fn render(&self, surface: &mut SvgSurface) -> Result<ChartInfo> {
        let layout = self.layout()?;
        self.render_layout(surface, &layout)
    }

    /// [`HourglassChart::render`] for a layout computed earlier.
    pub fn render_layout(&self, surface: &mut SvgSurface, layout: &ChartLayout) -> Result<ChartInfo> {
        let options = &self.options;
        let animation = render_chart(
            surface,
            layout,
            options.renderer.as_ref(),
            &options.layout,
            options.horizontal,
        )?;
        let info = ChartInfo {
            animation,
            ..chart_info(layout, &options.layout, options.horizontal)
        };

        let mut zoom = ZoomBehavior::new(SCALE_EXTENT);
        zoom.set_transform(ZoomTransform::translate(info.origin.0, info.origin.1));
        surface.attach_zoom(zoom);
        surface.set_size("100%", "100%");

        tracing::debug!(
            nodes = layout.nodes.len(),
            width = info.width,
            height = info.height,
            "rendered hourglass chart"
        );
        Ok(info)
    }
}

/// Moves the ancestor root's markers onto the matching descendant root entries.
fn copy_expanders(from: &LaidOutNode, to: &mut LaidOutNode) {
    if from.indi.id == to.indi.id && from.indi.expander.is_some() {
        to.indi.expander = from.indi.expander;
    }
    if let (Some(source), Some(target)) = (from.spouse.as_ref(), to.spouse.as_mut())
        && source.id == target.id
        && source.expander.is_some()
    {
        target.expander = source.expander;
    }
}

#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub svg: String,
    pub info: ChartInfo,
    pub layout: ChartLayout,
}

/// One-shot rendering for file output: the SVG gets the chart's pixel size
/// instead of `100%`.
pub fn render_hourglass(
    data: Rc<dyn DataProvider>,
    start: StartPoint,
    config: &Config,
) -> Result<RenderedChart> {
    let horizontal = config.render.horizontal;
    let mut renderer_options = RendererOptions::new(Rc::clone(&data));
    renderer_options.horizontal = horizontal;
    renderer_options.theme = config.theme.clone();
    if let Some(template) = &config.render.href_template {
        renderer_options = renderer_options.with_href_template(template.as_str());
    }
    let measurer = measurer_for(&config.theme.font_family, config.layout.fast_text_metrics);
    let renderer = renderer_for(config.render.renderer, renderer_options, measurer);

    let chart = HourglassChart::new(ChartOptions {
        data,
        renderer,
        start,
        horizontal,
        layout: config.layout.clone(),
        build: BuildOptions::from_config(&config.layout),
    });
    let layout = chart.layout()?;
    let mut surface = SvgSurface::new(
        config.render.width,
        config.render.height,
        config.render.background.as_str(),
    );
    let info = chart.render_layout(&mut surface, &layout)?;
    surface.set_size(num(info.width), num(info.height));
    Ok(RenderedChart {
        svg: surface.to_svg(),
        info,
        layout,
    })
}
