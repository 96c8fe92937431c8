use clap::{Parser, ValueEnum};
use slidex_lib::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slidex")]
#[command(
    version,
    about = "Slide exporter - Render HTML slides to PDF and PNG with headless Chromium",
    long_about = "Slide exporter (slidex)\n\nFinds every *.html file under ROOT (recursively) and writes NAME.png and NAME.pdf next to each one, using a single headless Chrome/Chromium instance.\n\nA slide that fails to render is skipped and reported; the rest of the batch continues."
)]
pub struct Cli {
    #[arg(
        default_value = "./slides",
        value_name = "ROOT",
        help = "Directory containing the HTML slides"
    )]
    pub root: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        value_name = "PATH",
        help = "Optional config file (TOML) with render defaults (size, margins, timeouts, settle delays); CLI flags override config"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "PX", help = "Output width in pixels [default: 1600]")]
    pub width: Option<u32>,

    #[arg(long, value_name = "PX", help = "Output height in pixels [default: 900]")]
    pub height: Option<u32>,

    #[arg(
        long,
        value_name = "WIDTHxHEIGHT[@SCALE]",
        help = "Layout viewport, e.g. 1600x900 or 1600x900@1.5 [default: 1600x900@1]"
    )]
    pub viewport: Option<Viewport>,

    #[arg(long, value_enum, help = "Raster image format [default: png]")]
    pub image_format: Option<ImageFormatArg>,

    #[arg(
        long,
        value_name = "0-100",
        value_parser = clap::value_parser!(u8).range(0..=100),
        help = "Image quality, only used for jpeg [default: 95]"
    )]
    pub image_quality: Option<u8>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Chrome/Chromium binary to try before the standard install locations"
    )]
    pub chrome: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "pretty", help = "Summary format")]
    pub format: OutputFormat,

    #[arg(long, short, help = "Write the summary to this file instead of stdout")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ImageFormatArg {
    Png,
    Jpeg,
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
