use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use asl_client::{FrameSource, Session, TrainingDataClient};
use asl_core::{Recognizer, RecognizerConfig, SampleStore};
use asl_shared::{Gesture, RecognizerSettings};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "ASL gesture recognition over recorded hand landmarks", long_about = None)]
struct Args {
    /// JSON-lines landmark recording, or '-' for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Training-data service URL (e.g., http://localhost:8000)
    #[arg(short, long)]
    server: Option<String>,

    /// Capture every hand frame as a sample of this gesture (e.g., "Okay", "I_Me")
    #[arg(short, long)]
    capture: Option<Gesture>,

    /// JSON file with recognizer settings
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn load_settings(path: Option<&PathBuf>) -> Result<RecognizerSettings> {
    let Some(path) = path else {
        return Ok(RecognizerSettings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    RecognizerSettings::from_json(&text)
        .with_context(|| format!("Invalid settings file {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("ASL recognizer starting...");
    log::info!("Input: {}", args.input);

    let settings = load_settings(args.settings.as_ref())?;
    let config = RecognizerConfig::from_settings(&settings);

    let client = args
        .server
        .as_deref()
        .map(TrainingDataClient::new)
        .transpose()?;
    let samples = match &client {
        Some(client) => client.load_all().unwrap_or_else(|e| {
            log::warn!("Continuing without stored samples: {:#}", e);
            SampleStore::new()
        }),
        None => SampleStore::new(),
    };

    let mut session = Session::new(Recognizer::with_samples(config, samples));
    if let Some(gesture) = args.capture {
        log::info!("Capturing samples for {}", gesture);
        session = session.capture_as(gesture, client);
    }

    let started = Instant::now();
    let source = FrameSource::open(&args.input)?;
    for frame in source {
        match frame {
            Ok(frame) => {
                session.process(&frame);
            }
            Err(e) => log::warn!("{:#}", e),
        }
    }

    let summary = session.finish(started.elapsed());
    println!("{}", summary);

    Ok(())
}
