use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between neighbouring nodes on the cross axis.
    pub node_spacing: f32,
    /// Gap between generation rows.
    pub rank_spacing: f32,
    /// Blank border around the chart bounds.
    pub margin: f32,
    pub expander_size: f32,
    /// Length of the dotted stub between a box and its expander.
    pub expander_gap: f32,
    pub max_ancestor_generations: usize,
    pub max_descendant_generations: usize,
    pub expanders: bool,
    pub fast_text_metrics: bool,
    pub animation_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 15.0,
            rank_spacing: 40.0,
            margin: 15.0,
            expander_size: 12.0,
            expander_gap: 6.0,
            max_ancestor_generations: 5,
            max_descendant_generations: 5,
            expanders: true,
            fast_text_metrics: false,
            animation_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Simple,
    Composite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub renderer: RendererKind,
    pub horizontal: bool,
    /// `{id}` is replaced by the individual id.
    pub href_template: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
            renderer: RendererKind::Simple,
            horizontal: false,
            href_template: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    box_stroke: Option<String>,
    line_color: Option<String>,
    default_fill: Option<String>,
    expander_fill: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    margin: Option<f32>,
    expander_size: Option<f32>,
    expander_gap: Option<f32>,
    max_ancestor_generations: Option<usize>,
    max_descendant_generations: Option<usize>,
    expanders: Option<bool>,
    fast_text_metrics: Option<bool>,
    animation_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    renderer: Option<RendererKind>,
    horizontal: Option<bool>,
    href_template: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parses a JSON or JSON5 config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    match parsed.theme.as_deref() {
        Some("modern") => config.theme = Theme::modern(),
        Some("classic") | Some("default") | None => {}
        Some(other) => tracing::warn!(theme = other, "unknown theme, keeping classic"),
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.box_stroke {
            config.theme.box_stroke = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.default_fill {
            config.theme.default_fill = v;
        }
        if let Some(v) = vars.expander_fill {
            config.theme.expander_fill = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.node_spacing {
            target.node_spacing = v;
        }
        if let Some(v) = layout.rank_spacing {
            target.rank_spacing = v;
        }
        if let Some(v) = layout.margin {
            target.margin = v;
        }
        if let Some(v) = layout.expander_size {
            target.expander_size = v;
        }
        if let Some(v) = layout.expander_gap {
            target.expander_gap = v;
        }
        if let Some(v) = layout.max_ancestor_generations {
            target.max_ancestor_generations = v;
        }
        if let Some(v) = layout.max_descendant_generations {
            target.max_descendant_generations = v;
        }
        if let Some(v) = layout.expanders {
            target.expanders = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            target.fast_text_metrics = v;
        }
        if let Some(v) = layout.animation_ms {
            target.animation_ms = v;
        }
    }

    if let Some(v) = parsed.renderer {
        config.render.renderer = v;
    }
    if let Some(v) = parsed.horizontal {
        config.render.horizontal = v;
    }
    if parsed.href_template.is_some() {
        config.render.href_template = parsed.href_template;
    }

    Ok(config)
}
