use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use rectpack_core::config::{PackerConfig, Placement};
use rectpack_core::{PackingHint, PackingHints, PackingRectangle, PackingResult, pack_with_config};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "rectpack",
    about = "Pack rectangles into the smallest atlas layout",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a size list (JSON/YAML) or a folder of images and export the layout
    Pack(PackArgs),
    /// Time every heuristic on random sizes and print bounds + occupancy
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Size list (.json/.yaml with [{name, width, height}]), image file, or image directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output file for the layout (stdout when omitted)
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// YAML config file path (overrides packing options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob) for directory input
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob) for directory input
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Packing
    /// Heuristics: find_best | unusual_sizes | mostly_squared | comma list of area,perimeter,bigger_side,width,height,pathological
    #[arg(long, default_value = "find_best", help_heading = "Packing")]
    hints: String,
    /// Padding between rectangles
    #[arg(long, default_value_t = 0, help_heading = "Packing")]
    padding: u32,
    /// Free-space structure: guillotine | skyline
    #[arg(long, value_parser = ["guillotine", "skyline"], default_value = "guillotine", help_heading = "Packing")]
    placement: String,
    /// Evaluate heuristics in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Packing")]
    parallel: bool,

    // Layout
    /// Max bounding width
    #[arg(long, help_heading = "Layout")]
    max_width: Option<u32>,
    /// Max bounding height
    #[arg(long, help_heading = "Layout")]
    max_height: Option<u32>,
    /// Round bounds up to powers of two
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    pow2: bool,
    /// Force square bounds
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    square: bool,

    // Export
    /// Metadata format: json-array | json (alias) | json-hash
    #[arg(long, default_value = "json-array", help_heading = "Export")]
    metadata: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Number of random rectangles
    #[arg(long, default_value_t = 500)]
    count: usize,
    /// Smallest side
    #[arg(long, default_value_t = 4)]
    min_size: u32,
    /// Largest side
    #[arg(long, default_value_t = 128)]
    max_size: u32,
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Repetitions per heuristic (timing is averaged)
    #[arg(long, default_value_t = 5)]
    runs: u32,
    /// Free-space structure: guillotine | skyline
    #[arg(long, value_parser = ["guillotine", "skyline"], default_value = "guillotine")]
    placement: String,
}

/// One entry of a size list file.
#[derive(Debug, Clone, Deserialize)]
struct SizeEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(alias = "w")]
    width: u32,
    #[serde(alias = "h")]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Bench(b) => run_bench(b, cli.progress && !cli.quiet),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let base = PackerConfig {
        hints: parse_hints(&cli.hints)?,
        padding: cli.padding,
        placement: parse_placement(&cli.placement)?,
        max_width: cli.max_width,
        max_height: cli.max_height,
        power_of_two: cli.pow2,
        square: cli.square,
        parallel: cli.parallel,
    };

    // Config file sets packing options en bloc, on top of the flags
    let cfg = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_packer_config(base)?
    } else {
        base
    };
    cfg.validate()?;

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let (names, rects) = load_inputs(cli, show_progress)?;
    if rects.is_empty() {
        anyhow::bail!("nothing to pack in {}", cli.input.display());
    }
    info!(count = rects.len(), "loaded input sizes");

    let start = Instant::now();
    let result = pack_with_config(&rects, &cfg)?;
    let stats = result.stats();
    info!(
        width = result.width,
        height = result.height,
        hint = ?result.hint,
        occupancy = stats.occupancy,
        time = %fmt_dur(start.elapsed()),
        "packed"
    );

    let value = match cli.metadata.as_str() {
        "json-array" | "json" => rectpack_core::to_json_array(&result, names.as_slice()),
        "json-hash" => rectpack_core::to_json_hash(&result, names.as_slice()),
        other => anyhow::bail!("unknown metadata format: {}", other),
    };
    let json = serde_json::to_string_pretty(&value)?;
    match &cli.out {
        Some(path) if !cli.dry_run => {
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            info!(?path, "layout written");
        }
        Some(_) => {}
        None => println!("{}", json),
    }

    if let Some(stats_path) = &cli.export_stats {
        let value = serde_json::json!({
            "rects": stats.num_rects,
            "width": stats.width,
            "height": stats.height,
            "used_area": stats.used_area,
            "total_area": stats.bound_area,
            "occupancy": stats.occupancy,
            "hint": result.hint,
        });
        if !cli.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&value)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            eprintln!("{}", stats.summary());
        }
    }
    Ok(())
}

fn run_bench(b: &BenchArgs, show_progress: bool) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rand::{Rng, SeedableRng};

    if b.min_size == 0 || b.min_size > b.max_size {
        anyhow::bail!("invalid size range {}..={}", b.min_size, b.max_size);
    }
    let mut rng = rand::rngs::StdRng::seed_from_u64(b.seed);
    let rects: Vec<PackingRectangle> = (0..b.count)
        .map(|i| {
            PackingRectangle::new(
                i,
                rng.gen_range(b.min_size..=b.max_size),
                rng.gen_range(b.min_size..=b.max_size),
            )
        })
        .collect();
    let placement = parse_placement(&b.placement)?;

    let mut candidates: Vec<(String, PackingHints)> = PackingHint::ALL
        .iter()
        .map(|h| (h.name().to_string(), PackingHints::from(*h)))
        .collect();
    candidates.push(("find_best".into(), PackingHints::FIND_BEST));

    let runs = b.runs.max(1);
    let bar = if show_progress {
        let bar = ProgressBar::new(candidates.len() as u64 * runs as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} bench {pos}/{len} [{elapsed_precise}] {wide_msg}")
                .context("progress template")?,
        );
        Some(bar)
    } else {
        None
    };

    let mut rows: Vec<(String, PackingResult, Duration)> = Vec::new();
    for (name, hints) in candidates {
        if let Some(bar) = &bar {
            bar.set_message(name.clone());
        }
        let cfg = PackerConfig {
            hints,
            placement,
            ..Default::default()
        };
        let mut total = Duration::ZERO;
        let mut last = None;
        for _ in 0..runs {
            let start = Instant::now();
            last = Some(pack_with_config(&rects, &cfg)?);
            total += start.elapsed();
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        if let Some(out) = last {
            rows.push((name, out, total / runs));
        }
    }
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    println!("{:<24} {:>12} {:>10} {:>10}", "heuristic", "bounds", "occupancy", "time");
    for (name, out, dur) in &rows {
        println!(
            "{:<24} {:>12} {:>9.2}% {:>10}",
            name,
            format!("{}x{}", out.width, out.height),
            out.stats().occupancy * 100.0,
            fmt_dur(*dur)
        );
    }
    Ok(())
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn parse_hints(s: &str) -> anyhow::Result<PackingHints> {
    s.parse::<PackingHints>()
        .map_err(|_| anyhow::anyhow!("unknown hints: {}", s))
}

fn parse_placement(s: &str) -> anyhow::Result<Placement> {
    s.parse::<Placement>()
        .map_err(|_| anyhow::anyhow!("unknown placement: {}", s))
}

/// Returns rectangle names (indexed by id) and the rectangles to pack.
fn load_inputs(
    cli: &PackArgs,
    show_progress: bool,
) -> anyhow::Result<(Vec<String>, Vec<PackingRectangle>)> {
    let input = &cli.input;
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase());
    if input.is_file() {
        match ext.as_deref() {
            Some("json") => {
                let text = fs::read_to_string(input)
                    .with_context(|| format!("read {}", input.display()))?;
                let entries: Vec<SizeEntry> = serde_json::from_str(&text)?;
                return Ok(entries_to_rects(entries));
            }
            Some("yaml") | Some("yml") => {
                let text = fs::read_to_string(input)
                    .with_context(|| format!("read {}", input.display()))?;
                let entries: Vec<SizeEntry> = serde_yaml::from_str(&text)?;
                return Ok(entries_to_rects(entries));
            }
            _ => {}
        }
    }
    let paths = gather_paths(input, &cli.include, &cli.exclude)?;
    read_image_sizes(&paths, show_progress)
}

fn entries_to_rects(entries: Vec<SizeEntry>) -> (Vec<String>, Vec<PackingRectangle>) {
    let mut names = Vec::with_capacity(entries.len());
    let mut rects = Vec::with_capacity(entries.len());
    for (id, e) in entries.into_iter().enumerate() {
        names.push(e.name.unwrap_or_else(|| id.to_string()));
        rects.push(PackingRectangle::new(id, e.width, e.height));
    }
    (names, rects)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "gif")
    )
}

/// Reads image dimensions from file headers; unreadable files are skipped.
fn read_image_sizes(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<(Vec<String>, Vec<PackingRectangle>)> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} reading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .context("progress template")?,
        );
        Some(b)
    } else {
        None
    };
    let mut names = Vec::with_capacity(paths.len());
    let mut rects = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match image::image_dimensions(p) {
            Ok((w, h)) if w > 0 && h > 0 => {
                rects.push(PackingRectangle::new(names.len(), w, h));
                names.push(p.to_string_lossy().replace('\\', "/"));
            }
            Ok(_) => warn!(?p, "skip empty image"),
            Err(e) => error!(?p, error = %e, "skip image"),
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok((names, rects))
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    // stdout may carry the layout JSON
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    hints: Option<String>,
    padding: Option<u32>,
    placement: Option<String>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    power_of_two: Option<bool>,
    square: Option<bool>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.hints {
            cfg.hints = parse_hints(&v)?;
        }
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.placement {
            cfg.placement = parse_placement(&v)?;
        }
        if let Some(v) = self.max_width {
            cfg.max_width = Some(v);
        }
        if let Some(v) = self.max_height {
            cfg.max_height = Some(v);
        }
        if let Some(v) = self.power_of_two {
            cfg.power_of_two = v;
        }
        if let Some(v) = self.square {
            cfg.square = v;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}
