// Parlance Run - one clip through the voice translation pipeline

use parlance::config::{Credentials, PipelineConfig};
use parlance::display;
use parlance::pipeline::{AudioClip, Collaborators, Pipeline, PipelineOutcome, TargetLanguage};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let clip_path = PathBuf::from(&args[1]);
    if !clip_path.exists() {
        eprintln!("Error: File not found: {}", clip_path.display());
        std::process::exit(1);
    }

    let config = PipelineConfig::load()?;
    let credentials = Credentials::from_env()?;

    let target = match args.get(2) {
        Some(code) => TargetLanguage::parse(code).ok_or_else(|| {
            format!("unknown target language: {} (expected one of en, es, fr, de, hi, zh)", code)
        })?,
        None => config.default_target()?,
    };

    println!("🎙️  Parlance Voice Translator");
    println!("================================\n");
    println!("📁 Clip: {}", clip_path.display());
    println!("🌐 Target language: {}\n", target.as_str());

    let bytes = tokio::fs::read(&clip_path).await?;
    let clip = AudioClip::new(bytes);
    if !clip.is_wav() {
        eprintln!("⚠️  {} does not carry a WAV header, sending it anyway", clip_path.display());
    }
    if let Some(rate) = clip.sample_rate() {
        println!("🎧 {} bytes, {} Hz\n", clip.len(), rate);
    }

    let pipeline = Pipeline::new(Collaborators::google_openai(&config, &credentials));

    println!("🔄 Running pipeline...\n");
    let outcome = pipeline.run(&clip, target).await?;

    display::render(&outcome);

    if let PipelineOutcome::Completed(report) = &outcome {
        let out_path = synthesized_path(&clip_path, target.as_str());
        tokio::fs::write(&out_path, &report.audio).await?;
        println!("\n🔊 Synthesized speech written to {}", out_path.display());
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
    println!("Parlance Run - voice translation with emotion and meaning detection");
    println!();
    println!("Usage: parlance-run <clip.wav> [target]");
    println!();
    println!("The pipeline will:");
    println!("  1. Transcribe the clip");
    println!("  2. Detect the spoken language");
    println!("  3. Translate the text into the target language");
    println!("  4. Score the sentiment and derive a mood");
    println!("  5. Ask a language model what the speaker really means");
    println!("  6. Synthesize speech for the translation (written next to the clip)");
    println!();
    println!("Targets: en, es, fr, de, hi, zh (default from .parlance.json)");
    println!();
    println!("Environment variables:");
    println!("  OPENAI_API_KEY  - OpenAI credential (required)");
    println!("  GOOGLE_API_KEY  - Google Cloud credential (required)");
    println!("  OPENAI_MODEL    - Model for meaning analysis (default: gpt-3.5-turbo)");
    println!();
    println!("Examples:");
    println!("  parlance-run message.wav es");
    println!("  OPENAI_MODEL=gpt-4o-mini parlance-run message.wav zh");
}
