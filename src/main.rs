// Tue Jan 13 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use macho_core_reader::{
    config::Config,
    mach::MachCore,
    utils::{self, logging::scoped_timer, LoggingUtils},
};
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Lists the images loaded in a Mach-O core file", long_about = None)]
struct Args {
    /// Core file to inspect
    core: PathBuf,

    /// Address to probe for the dynamic linker before scanning
    #[arg(long, value_parser = parse_address)]
    dylinker_hint: Option<u64>,

    /// Scan granularity in bytes
    #[arg(long)]
    page_size: Option<u64>,

    /// Only list images whose path matches
    #[arg(short, long)]
    filter: Option<String>,

    #[arg(long)]
    json: bool,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(long)]
    no_color: bool,
}

#[derive(Serialize)]
struct ImageReport {
    path: String,
    load_address: String,
    file_type: Option<&'static str>,
}

#[derive(Serialize)]
struct CoreReport {
    core: String,
    dylinker_address: String,
    all_image_infos_version: u32,
    images: Vec<ImageReport>,
}

fn parse_address(s: &str) -> Result<u64, String> {
    utils::parse_address(s).ok_or_else(|| format!("invalid address '{}'", s))
}

fn main() {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    if !LoggingUtils::init_from_env() {
        LoggingUtils::init_logger_with_color(
            LoggingUtils::level_from_verbosity(args.verbose),
            !args.no_color,
        );
    }

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }
    if let Some(hint) = args.dylinker_hint {
        config = config.with_dylinker_hint(hint);
    }
    if let Err(e) = config.validate() {
        bail!("Invalid config: {}", e);
    }
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let filter = args
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid --filter pattern")?;

    let start_time = Instant::now();
    let _timer = scoped_timer("core discovery");

    let core = MachCore::open(&args.core, &config)
        .with_context(|| format!("Failed to open {}", args.core.display()))?;
    if !core.is_valid_core_file() {
        bail!("{} is not a Mach-O core file", args.core.display());
    }

    let dylinker_address = core.dylinker_address()?;
    let version = core.dylinker()?.all_image_infos()?.version;
    let images: Vec<ImageReport> = core
        .loaded_images()?
        .iter()
        .filter(|image| filter.as_ref().map_or(true, |re| re.is_match(image.path())))
        .map(|image| ImageReport {
            path: image.path().to_string(),
            load_address: image.load_address().to_string(),
            file_type: image.image().header().ok().map(|h| h.file_type_name()),
        })
        .collect();

    if args.json {
        let report = CoreReport {
            core: args.core.display().to_string(),
            dylinker_address: dylinker_address.to_string(),
            all_image_infos_version: version,
            images,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} Core: {}", "[*]".blue(), args.core.display());
    println!("{} Dynamic linker at {}", "[+]".green(), dylinker_address);
    println!("{} dyld_all_image_infos version {}", "[+]".green(), version);
    println!();

    for image in &images {
        println!(
            "  {} {} {}",
            image.load_address.cyan(),
            image.file_type.unwrap_or("?").yellow(),
            image.path
        );
    }

    println!();
    println!(
        "{} {} in {:.2}s",
        "[+]".green(),
        utils::pluralize(images.len(), "image", "images"),
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
