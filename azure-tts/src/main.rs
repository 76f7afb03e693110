//! Azure TTS demo
//!
//! Synthesizes one phrase with the subscription key from the environment and
//! writes the audio to a file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use azure_tts::{AudioFormat, Config, Gender, Locale, TextToSpeech};
use azure_tts_common::tracing::init_tracing;
use clap::Parser;

/// Command-line arguments for the demo.
#[derive(Parser, Debug)]
#[command(name = "azure-tts")]
#[command(about = "Synthesize speech with Azure Cognitive Services")]
struct Args {
    /// Text to speak
    #[arg(default_value = "64 BASIC BYTES FREE. READY.")]
    text: String,

    /// Spoken locale, e.g. en-US
    #[arg(long, default_value = "en-US")]
    locale: Locale,

    /// Voice gender (male or female)
    #[arg(long, default_value = "female")]
    gender: Gender,

    /// Output encoding
    #[arg(long, default_value = "audio-16khz-32kbitrate-mono-mp3")]
    format: AudioFormat,

    /// Where to write the audio
    #[arg(long, short, default_value = "audio.mp3")]
    output: PathBuf,

    /// Resolve voices from the region's voice directory
    #[arg(long)]
    voice_directory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    config.voice_directory |= args.voice_directory;
    tracing::info!(
        region = %config.region,
        voice_directory = config.voice_directory,
        "Configuration loaded"
    );

    let tts = TextToSpeech::from_config(&config)
        .await
        .context("failed to create client")?;

    let result = tts
        .synthesize(&args.text, args.locale, args.gender, args.format)
        .await;

    // Stop the refresher before reporting any synthesis error.
    tts.shutdown().await;

    let audio = result.context("synthesis failed")?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&args.output, &audio)
        .await
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(path = %args.output.display(), bytes = audio.len(), "Wrote audio");
    Ok(())
}
