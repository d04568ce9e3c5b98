#[cfg(feature = "cli")]
pub mod cli;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod tree;
pub mod zoom;

pub use chart::{ChartOptions, HourglassChart, RenderedChart, render_hourglass};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, RendererKind};
pub use data::{DataProvider, Family, Individual, JsonDataProvider, load_data};
pub use error::{ChartError, Result};
pub use layout::{ChartInfo, ChartLayout, LaidOutNode};
pub use render::{CompositeRenderer, Renderer, RendererOptions, SimpleRenderer, SvgSurface};
pub use theme::Theme;
pub use tree::StartPoint;
