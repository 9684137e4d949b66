// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{parse_args, resolve_config, Args};
pub use output::{format_json, format_report, format_summary};

use anyhow::{Context, Result};
use colorful::Colorful;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::RecitationAnalyzer;
use crate::detection::RecitationReport;

const AUDIO_EXTENSIONS: [&str; 6] = ["flac", "wav", "mp3", "ogg", "m4a", "aac"];

/// Run the CLI. Returns `true` when every input was analyzed.
pub fn run(args: &Args) -> Result<bool> {
    let config = resolve_config(args)?;

    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(true);
    }

    let mut audio_files = Vec::new();
    for input in &args.inputs {
        audio_files.extend(collect_audio_files(input));
    }

    if audio_files.is_empty() {
        eprintln!("{}", "No audio files found!".red());
        return Ok(false);
    }

    if args.spectrogram {
        std::fs::create_dir_all(&args.output).with_context(|| {
            format!("Failed to create output directory: {}", args.output.display())
        })?;
    }

    let analyzer = RecitationAnalyzer::builder()
        .config(config)
        .target_sample_rate(args.resample)
        .build()?;

    if !args.json {
        println!("Found {} audio file(s)\n", audio_files.len());
    }

    let progress = (!args.json && audio_files.len() > 1).then(|| progress_bar(audio_files.len()));

    let mut reports = Vec::new();
    let mut failures = 0usize;

    for file_path in &audio_files {
        if let Some(pb) = &progress {
            pb.set_message(file_name(file_path));
        }

        match process_file(&analyzer, file_path, args) {
            Ok(report) => {
                if !args.json {
                    let text = format!(
                        "Analyzing: {}\n{}",
                        file_path.display().to_string().cyan(),
                        format_report(&report, args.verbose)
                    );
                    match &progress {
                        Some(pb) => pb.println(text),
                        None => println!("{}", text),
                    }
                }
                reports.push(report);
            }
            Err(e) => {
                error!("{}: {:#}", file_path.display(), e);
                failures += 1;
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if args.json {
        println!("{}", format_json(&reports)?);
    } else if audio_files.len() > 1 || failures > 0 {
        print!("{}", format_summary(&reports, failures));
    }

    Ok(failures == 0)
}

fn process_file(analyzer: &RecitationAnalyzer, file_path: &Path, args: &Args) -> Result<RecitationReport> {
    let (waveform, report) = analyzer.analyze_file(file_path)?;

    if args.spectrogram {
        let output_path = args.output.join(format!("{}.png", file_name(file_path)));
        analyzer.render_spectrogram(&waveform, &output_path)?;
        info!("Spectrogram saved to: {}", output_path.display());
    }

    Ok(report)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}

fn file_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string())
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect audio files from a file or directory path
pub fn collect_audio_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return if is_audio_file(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_audio_file(p))
        .collect();
    files.sort();
    files
}
