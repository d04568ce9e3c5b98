use crate::chart::render_hourglass;
use crate::config::{Config, RendererKind, load_config};
use crate::data::{JsonDataProvider, load_data};
use crate::layout_dump::{LayoutDump, write_layout_dump};
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::write_output_svg;
use crate::tree::StartPoint;
use anyhow::Result;
use clap::{ArgGroup, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "hgr",
    version,
    about = "Hourglass genealogy chart renderer: ancestors above, descendants below"
)]
#[command(group(ArgGroup::new("start").required(true).args(["indi", "fam"])))]
pub struct Args {
    /// Genealogy JSON file ({"indis": [...], "fams": [...]}) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Focal individual id
    #[arg(long = "indi")]
    pub indi: Option<String>,

    /// Focal family id (the couple becomes the focal node)
    #[arg(long = "fam")]
    pub fam: Option<String>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file (theme, themeVariables, layout)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Box style
    #[arg(short = 'r', long = "renderer", value_enum)]
    pub renderer: Option<RendererArg>,

    /// Generations run left to right
    #[arg(long = "horizontal")]
    pub horizontal: bool,

    /// Ancestor generations to show
    #[arg(short = 'a', long = "ancestors")]
    pub ancestors: Option<usize>,

    /// Descendant generations to show
    #[arg(short = 'd', long = "descendants")]
    pub descendants: Option<usize>,

    /// Link every box, e.g. "https://example.org/person/{id}"
    #[arg(long = "hrefTemplate")]
    pub href_template: Option<String>,

    /// Estimate text widths instead of reading system fonts
    #[arg(long = "fastTextMetrics")]
    pub fast_text_metrics: bool,

    /// Also write the positioned nodes and links as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Canvas width used when rasterizing
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height used when rasterizing
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RendererArg {
    Simple,
    Composite,
}

impl From<RendererArg> for RendererKind {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Simple => RendererKind::Simple,
            RendererArg::Composite => RendererKind::Composite,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = apply_args(load_config(args.config.as_deref())?, &args);
    let data = read_data(args.input.as_deref())?;
    let start = match (&args.indi, &args.fam) {
        (Some(id), _) => StartPoint::Indi(id.clone()),
        (None, Some(id)) => StartPoint::Fam(id.clone()),
        (None, None) => return Err(anyhow::anyhow!("Either --indi or --fam is required")),
    };
    tracing::info!(?start, renderer = ?config.render.renderer, "rendering hourglass chart");

    let rendered = render_hourglass(Rc::new(data), start, &config)?;

    if let Some(path) = &args.dump_layout {
        let dump = LayoutDump::from_layout(
            &rendered.layout,
            &rendered.info,
            config.render.horizontal,
            config.layout.expander_size,
            config.layout.expander_gap,
        );
        write_layout_dump(path, &dump)?;
    }

    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&rendered.svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&rendered.svg, &output, &config)?;
        }
    }
    Ok(())
}

fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(kind) = args.renderer {
        config.render.renderer = kind.into();
    }
    if args.horizontal {
        config.render.horizontal = true;
    }
    if let Some(n) = args.ancestors {
        config.layout.max_ancestor_generations = n;
    }
    if let Some(n) = args.descendants {
        config.layout.max_descendant_generations = n;
    }
    if let Some(template) = &args.href_template {
        config.render.href_template = Some(template.clone());
    }
    if args.fast_text_metrics {
        config.layout.fast_text_metrics = true;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    config
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn read_data(path: Option<&Path>) -> Result<JsonDataProvider> {
    match path {
        Some(path) if path != Path::new("-") => load_data(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(JsonDataProvider::from_json(&buf)?)
        }
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    write_output_png(svg, output, &config.render, &config.theme.font_family)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn start_point_is_required() {
        assert!(Args::try_parse_from(["hgr", "-i", "tree.json"]).is_err());
        assert!(Args::try_parse_from(["hgr", "--indi", "I1", "--fam", "F1"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "hgr",
            "--fam",
            "F1",
            "-r",
            "composite",
            "--horizontal",
            "-a",
            "2",
            "-d",
            "1",
            "--hrefTemplate",
            "/p/{id}",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        let config = apply_args(Config::default(), &args);
        assert_eq!(config.render.renderer, RendererKind::Composite);
        assert!(config.render.horizontal);
        assert_eq!(config.layout.max_ancestor_generations, 2);
        assert_eq!(config.layout.max_descendant_generations, 1);
        assert_eq!(config.render.href_template.as_deref(), Some("/p/{id}"));
    }
}
