//! Utility to scan a label transcript from files and print the JSON response
//!
//! Usage: parse_label <TRANSCRIPT|-> [--serving-size FILE] [--servings FILE] [--sugar FILE]

use std::io::Read;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use nutriscan::config::AppConfig;
use nutriscan::models::{LabelTranscripts, RegionField, RegionTexts};
use nutriscan::nutrition::Extractor;
use nutriscan::tools::label::scan_label_text;

const USAGE: &str =
    "Usage: parse_label <TRANSCRIPT|-> [--serving-size FILE] [--servings FILE] [--sugar FILE]";

fn read_text(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(Path::new(path))
    }
}

fn region_flag(flag: &str) -> Option<RegionField> {
    match flag {
        "--serving-size" => Some(RegionField::ServingSize),
        "--servings" => Some(RegionField::ServingsPerPack),
        "--sugar" => Some(RegionField::Sugar),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutriscan=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut global_path: Option<&str> = None;
    let mut regions = RegionTexts::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(field) = region_flag(arg) {
            let path = iter
                .next()
                .ok_or_else(|| format!("{} needs a file argument\n{}", arg, USAGE))?;
            regions.set(field, read_text(path)?);
        } else if arg == "-h" || arg == "--help" {
            println!("{}", USAGE);
            return Ok(());
        } else if global_path.is_none() {
            global_path = Some(arg.as_str());
        } else {
            return Err(format!("unexpected argument '{}'\n{}", arg, USAGE).into());
        }
    }

    let global_path = global_path.ok_or(USAGE)?;
    let transcripts = LabelTranscripts {
        global: read_text(global_path)?,
        regions,
        ..LabelTranscripts::default()
    };

    let config = AppConfig::from_env()?;
    let extractor = Extractor::new(config.extraction);
    let response = scan_label_text(&extractor, &config.presentation, &transcripts)?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
