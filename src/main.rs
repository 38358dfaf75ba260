use clap::Parser;
use img2path::TracingConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "img2path", version, about = "Raster image to layered SVG paths")]
struct Cli {
    /// Input image path (PNG, JPEG, BMP, GIF)
    #[arg(short, long)]
    input: PathBuf,

    /// Output SVG path
    #[arg(short, long)]
    output: PathBuf,

    /// Squared error allowed for straight lines
    #[arg(long = "ltres", default_value = "1.0")]
    line_threshold: f64,

    /// Squared error allowed for quadratic curves
    #[arg(long = "qtres", default_value = "1.0")]
    curve_threshold: f64,

    /// Traced paths with fewer points are discarded (0 = keep all)
    #[arg(long, default_value = "8")]
    path_omit: usize,

    /// Generate the initial palette instead of sampling the image
    #[arg(long)]
    no_color_sampling: bool,

    /// Number of palette colors
    #[arg(short = 'n', long, default_value = "16")]
    colors: usize,

    /// Pixel share below which a color is reseeded (with --reseed)
    #[arg(long, default_value = "0.02")]
    min_color_ratio: f64,

    /// Quantization passes
    #[arg(long, default_value = "3")]
    cycles: usize,

    /// Replace sparse colors with random ones between passes
    #[arg(long)]
    reseed: bool,

    /// Seed for reseeding and generated palettes
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Selective blur radius (0 = off, max 5)
    #[arg(long, default_value = "0")]
    blur_radius: u32,

    /// Blur is undone where a pixel changed by more than this (RGBA sum)
    #[arg(long, default_value = "20")]
    blur_delta: f64,

    /// Output coordinate multiplier
    #[arg(long, default_value = "1.0")]
    scale: f64,

    /// Decimal places in output coordinates (-1 = no rounding)
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    round: i32,

    /// Emit a viewBox instead of width/height
    #[arg(long)]
    viewbox: bool,

    /// Omit desc attributes
    #[arg(long)]
    no_desc: bool,

    /// Draw markers on line end points with this radius
    #[arg(long, default_value = "0")]
    lcpr: f64,

    /// Draw markers on quadratic control points with this radius
    #[arg(long, default_value = "0")]
    qcpr: f64,

    /// Re-render the result to this PNG and report fidelity
    #[arg(long)]
    compare: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let config = TracingConfig {
        line_error_threshold: cli.line_threshold,
        curve_error_threshold: cli.curve_threshold,
        path_omit: cli.path_omit,
        color_sampling: !cli.no_color_sampling,
        color_count: cli.colors,
        min_color_ratio: cli.min_color_ratio,
        quant_cycles: cli.cycles,
        blur_radius: cli.blur_radius,
        blur_delta: cli.blur_delta,
        reseed_sparse_colors: cli.reseed,
        seed: cli.seed,
        scale: cli.scale,
        round_coords: u32::try_from(cli.round).ok(),
        view_box: cli.viewbox,
        include_descriptions: !cli.no_desc,
        line_control_radius: cli.lcpr,
        curve_control_radius: cli.qcpr,
    };

    // Pipeline (the library logs per-stage progress)
    let result = img2path::trace(&cli.input, &config)?;
    img2path::output::write_svg(&cli.output, &result, &config)?;
    log::info!("wrote       {}", cli.output.display());

    if let Some(png_path) = &cli.compare {
        let source = img2path::bitmap::load_rgba(&cli.input)?;
        let rendered = img2path::render::rasterize(&result, 1.0)?;
        let diff = img2path::render::compare(&source, &rendered)?;
        img2path::render::save_png(&rendered, png_path)?;
        log::info!(
            "compare     {:.1}% exact pixels, mean channel error {:.2}  → {}",
            diff.exact_match * 100.0,
            diff.mean_abs_error,
            png_path.display()
        );
    }

    Ok(())
}
