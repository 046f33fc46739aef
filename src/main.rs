//! Application entry point — single-shot voice translation.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Load the Whisper model and build the HTTP collaborators.
//! 5. Open the capture session on the default input device.
//! 6. Run the pipeline once: record → transcribe → prompt → translate →
//!    synthesize, then print the report.

use std::sync::Arc;

use anyhow::Context;

use voice_translate::{
    audio::AudioCapture,
    config::{AppConfig, AppPaths},
    pipeline::{Pipeline, PipelineError, StdinPrompt},
    stt::{TranscribeParams, Transcriber, WhisperTranscriber},
    translate::{HttpTranslator, Translator},
    tts::{HttpSynthesizer, Synthesizer},
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("voice-translate starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 workers — blocking STT plus the HTTP calls)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Collaborators.  Unlike a resident app there is no graceful
    //    degradation here: a single-shot run without a model has nothing
    //    useful to do, so fail fast.
    let model_path = AppPaths::new()
        .models_dir
        .join(format!("{}.bin", config.stt.model));

    let stt_params = TranscribeParams {
        language: config.stt.language.clone(),
        ..TranscribeParams::default()
    };

    let transcriber: Arc<dyn Transcriber> =
        Arc::new(WhisperTranscriber::load(&model_path, stt_params).with_context(|| {
            format!("could not load Whisper model {}", model_path.display())
        })?);
    log::info!("Whisper model loaded: {}", model_path.display());

    let translator: Arc<dyn Translator> = Arc::new(HttpTranslator::from_config(
        &config.translate,
        config.stt.language.clone(),
    ));
    let synthesizer: Arc<dyn Synthesizer> = Arc::new(HttpSynthesizer::from_config(&config.tts));

    // 5. Capture session
    let capture = AudioCapture::new().context("no usable audio input device")?;
    let params = config.audio.capture_params();
    let session = capture
        .open_session(&params)
        .context("failed to start the capture stream")?;

    println!(
        "Listening... speak now (recording stops after {:.1}s of silence).",
        config.audio.silence_duration_secs
    );

    // 6. One run, end to end.  The pipeline consumes the session and
    //    releases the device as soon as recording stops.
    let mut pipeline = Pipeline::new(config, transcriber, translator, synthesizer);
    let mut prompt = StdinPrompt;

    let report = match rt.block_on(pipeline.run(session, &mut prompt)) {
        Ok(report) => report,
        Err(PipelineError::NoSpeech) => {
            println!("No speech detected.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("You said:    {}", report.transcript);
    println!("Translation: {}", report.translated);
    println!(
        "Saved {} and {}",
        report.capture_path.display(),
        report.synthesis_path.display()
    );

    Ok(())
}
