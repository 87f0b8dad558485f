use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use promoclip::{
    AppConfig, NvencProbe, RandomSelector, RenderCounter, Submission, TextRasterize,
    TextRasterizer, TextStyle, init_logging,
};

#[derive(Parser, Debug)]
#[command(name = "promoclip", version)]
struct Cli {
    /// JSON config file; `PROMOCLIP_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one promo video from a submission (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Rasterize a text to a PNG to preview font and styling.
    Text(TextArgs),
    /// List available templates as JSON.
    Templates,
    /// Print the number of successful renders.
    Count,
    /// Delete rendered videos older than the retention window.
    Clean(CleanArgs),
    /// Run the retention sweep once a day, forever.
    ScheduleClean(ScheduleArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text revealed character by character.
    #[arg(long)]
    typewriter: String,

    /// Static texts, up to three, top to bottom.
    #[arg(long = "static", num_args = 1, value_name = "TEXT")]
    statics: Vec<String>,

    /// Template id used in the output file name.
    #[arg(long)]
    template: String,

    /// Seed asset and suffix picks for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Encode on the CPU even when NVENC is available.
    #[arg(long)]
    cpu: bool,
}

#[derive(Parser, Debug)]
struct TextArgs {
    #[arg(long)]
    text: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 60.0)]
    size: f32,

    /// Color as `#rrggbb`, `#rrggbbaa` or a name.
    #[arg(long, default_value = "white")]
    color: String,

    #[arg(long, default_value_t = 0)]
    stroke: u32,

    #[arg(long, default_value_t = 0.0)]
    rotate: f64,
}

#[derive(Parser, Debug)]
struct CleanArgs {
    /// Retention in days; defaults to the configured value. `0` deletes every output.
    #[arg(long)]
    days: Option<u32>,
}

#[derive(Parser, Debug)]
struct ScheduleArgs {
    /// Daily run time as `HH:MM` local time; defaults to the configured value.
    #[arg(long)]
    at: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;
    cfg.validate()?;
    init_logging(&cfg.logging);

    match cli.cmd {
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Text(args) => cmd_text(&cfg, args),
        Command::Templates => cmd_templates(&cfg),
        Command::Count => cmd_count(&cfg),
        Command::Clean(args) => cmd_clean(&cfg, args),
        Command::ScheduleClean(args) => cmd_schedule_clean(&cfg, args),
    }
}

fn cmd_render(cfg: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    if args.statics.len() > 3 {
        anyhow::bail!("at most three --static texts are supported");
    }
    let mut static_texts: [String; 3] = Default::default();
    for (slot, text) in static_texts.iter_mut().zip(args.statics) {
        *slot = text;
    }
    let submission = Submission {
        typewriter_text: args.typewriter,
        static_texts,
        template_id: args.template,
    };

    let mut cfg = cfg.clone();
    cfg.force_cpu |= args.cpu;
    let mut selector = match args.seed {
        Some(seed) => RandomSelector::seeded(seed),
        None => RandomSelector::from_entropy(),
    };

    let result = promoclip::process_submission(&cfg, &submission, &mut selector, &NvencProbe)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_text(cfg: &AppConfig, args: TextArgs) -> anyhow::Result<()> {
    let color = args.color.parse()?;
    let style = TextStyle::sized(args.size)
        .with_color(color)
        .with_stroke(promoclip::Rgba8::BLACK, args.stroke)
        .with_rotation(args.rotate);
    style.validate()?;

    let mut rasterizer = TextRasterizer::new(&cfg.fonts, cfg.raster_scale)?;
    let bitmap = rasterizer.rasterize(&args.text, &style)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    bitmap
        .to_straight_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, font {})",
        args.out.display(),
        bitmap.width,
        bitmap.height,
        rasterizer.font_path().display()
    );
    Ok(())
}

fn cmd_templates(cfg: &AppConfig) -> anyhow::Result<()> {
    let templates = promoclip::list_templates(&cfg.video_dir)?;
    println!("{}", serde_json::to_string_pretty(&templates)?);
    Ok(())
}

fn cmd_count(cfg: &AppConfig) -> anyhow::Result<()> {
    let count = RenderCounter::open(&cfg.counter_file)?.get()?;
    println!("{count}");
    Ok(())
}

fn cmd_clean(cfg: &AppConfig, args: CleanArgs) -> anyhow::Result<()> {
    let days = args.days.unwrap_or(cfg.cleanup.retention_days);
    let removed =
        promoclip::clean_old_videos(&cfg.output_dir, days, chrono::Utc::now().timestamp())?;
    eprintln!("removed {removed} video(s) from {}", cfg.output_dir.display());
    Ok(())
}

fn cmd_schedule_clean(cfg: &AppConfig, args: ScheduleArgs) -> anyhow::Result<()> {
    let at = promoclip::parse_daily_time(args.at.as_deref().unwrap_or(&cfg.cleanup.daily_at))?;
    tracing::info!(%at, days = cfg.cleanup.retention_days, "cleanup scheduler started");
    loop {
        let now = chrono::Local::now();
        let next = promoclip::next_run_after(&now, at);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::info!(next = %next, "next cleanup scheduled");
        std::thread::sleep(wait);

        match promoclip::clean_old_videos(
            &cfg.output_dir,
            cfg.cleanup.retention_days,
            chrono::Utc::now().timestamp(),
        ) {
            Ok(removed) => tracing::info!(removed, "scheduled cleanup finished"),
            Err(err) => tracing::error!(error = %err, "scheduled cleanup failed"),
        }
    }
}
