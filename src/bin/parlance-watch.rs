// Parlance Watch - dispatch newly captured clips through the pipeline

use notify::{EventKind, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use parlance::config::{Credentials, PipelineConfig, CONFIG_FILE};
use parlance::display;
use parlance::pipeline::{AudioClip, Collaborators, Pipeline, PipelineOutcome, TargetLanguage};
use parlance::watch::{find_last_modified_clip, is_audio_clip, should_ignore};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--init" => {
                let path = PathBuf::from(CONFIG_FILE);
                if path.exists() {
                    eprintln!("❌ {} already exists", CONFIG_FILE);
                    std::process::exit(1);
                }
                PipelineConfig::write_example(&path)?;
                println!("✅ Created example config at: {}", path.display());
                return Ok(());
            }
            "--last" => {
                let (config, pipeline, target) = setup()?;

                println!("🔍 Searching for last captured clip...\n");
                let clips_dir = PathBuf::from(&config.clips_dir);
                match find_last_modified_clip(&clips_dir, &config.ignore_patterns, config.watch_hidden)? {
                    Some(clip_path) => dispatch_clip(&clip_path, &pipeline, target).await?,
                    None => println!("⚠️  No clips found in {}", clips_dir.display()),
                }
                return Ok(());
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Use --help for usage information");
                std::process::exit(1);
            }
        }
    }

    let (config, pipeline, target) = setup()?;

    println!("\n🎙️  Parlance Clip Watcher");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    let clips_dir = PathBuf::from(&config.clips_dir);
    if !clips_dir.exists() {
        std::fs::create_dir_all(&clips_dir)?;
        println!("📁 Created clips directory: {}", clips_dir.display());
    }

    println!("Watching: {}", clips_dir.display());
    println!("Target language: {}", target.as_str());
    println!("Debounce: {}ms", config.debounce_ms);
    if !config.ignore_patterns.is_empty() {
        println!("Ignoring patterns:");
        for pattern in &config.ignore_patterns {
            println!("  • {}", pattern);
        }
    }
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Drop WAV clips into the directory to translate them. (Press Ctrl+C to stop)\n");

    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(
        Duration::from_millis(config.debounce_ms),
        None,
        move |result: DebounceEventResult| {
            tx.send(result).unwrap();
        },
    )?;

    debouncer.watch(&clips_dir, RecursiveMode::Recursive)?;

    for result in rx {
        match result {
            Ok(events) => {
                let mut seen = HashSet::new();
                for event in events {
                    if !matches!(event.event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                        continue;
                    }
                    for path in &event.event.paths {
                        if should_ignore(path, &config.ignore_patterns, config.watch_hidden) {
                            continue;
                        }
                        if !is_audio_clip(path) || !path.is_file() {
                            continue;
                        }
                        if !seen.insert(path.clone()) {
                            continue;
                        }

                        let timestamp = chrono::Local::now().format("%H:%M:%S");
                        println!("[{}] 🎙️  New clip: {}", timestamp, path.display());

                        if let Err(e) = dispatch_clip(path, &pipeline, target).await {
                            eprintln!("❌ Pipeline failed for {}: {}", path.display(), e);
                        }
                    }
                }
            }
            Err(errors) => {
                for error in errors {
                    eprintln!("⚠️  Watch error: {}", error);
                }
            }
        }
    }

    Ok(())
}

fn setup() -> Result<(PipelineConfig, Pipeline, TargetLanguage), Box<dyn std::error::Error>> {
    let config = PipelineConfig::load()?;
    let credentials = Credentials::from_env()?;
    let target = config.default_target()?;
    let pipeline = Pipeline::new(Collaborators::google_openai(&config, &credentials));
    Ok((config, pipeline, target))
}

async fn dispatch_clip(
    path: &Path,
    pipeline: &Pipeline,
    target: TargetLanguage,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    let clip = AudioClip::new(bytes);

    if !clip.is_wav() {
        println!("⚠️  Skipping {}: no WAV header", path.display());
        return Ok(());
    }
    if let Some(rate) = clip.sample_rate() {
        println!("   {} bytes, {} Hz", clip.len(), rate);
    }

    let outcome = pipeline.run(&clip, target).await?;
    display::render(&outcome);

    if let PipelineOutcome::Completed(report) = &outcome {
        let out_path = synthesized_path(path, target.as_str());
        tokio::fs::write(&out_path, &report.audio).await?;
        println!("🔊 Synthesized speech written to {}\n", out_path.display());
    }

    Ok(())
}

fn synthesized_path(clip_path: &Path, target: &str) -> PathBuf {
    let stem = clip_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("clip");
    clip_path.with_file_name(format!("{}.{}.mp3", stem, target))
}

fn print_usage() {
    println!("Parlance Watch - clip watcher for the voice translation pipeline");
    println!();
    println!("Usage: parlance-watch [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --init     Create example {} config", CONFIG_FILE);
    println!("    --last     Dispatch the most recently captured clip");
    println!("    --help     Show this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    Place {} in your project directory or home directory", CONFIG_FILE);
    println!();
    println!("Environment variables:");
    println!("  OPENAI_API_KEY  - OpenAI credential (required)");
    println!("  GOOGLE_API_KEY  - Google Cloud credential (required)");
}
