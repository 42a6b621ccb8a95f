//! Command execution
//!
//! Every command prints one pretty JSON document to the given writer.

use std::io::Write;
use std::path::Path;

use ai_core::LlmProvider;
use ai_speech::{SpeechBackendId, decode_data_url};
use anyhow::Context;
use infrastructure::AppContext;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{Commands, GenerateArgs, TextInput};

/// Provider status printed by `providers`
#[derive(Debug, Serialize)]
pub struct ProvidersReport {
    pub provider: LlmProvider,
    pub stubs_required: bool,
    pub speech_backends: Vec<SpeechBackendId>,
}

impl ProvidersReport {
    pub fn from_context(context: &AppContext) -> Self {
        Self {
            provider: context.registry().active_provider(),
            stubs_required: context.registry().stub_providers_required(),
            speech_backends: context.pipeline().narration().backends().enabled(),
        }
    }
}

/// Execute one command against a wired context
///
/// # Errors
///
/// Returns an error for invalid requests, unreadable input files, hard
/// generation failures and output write failures.
pub fn run<W: Write>(command: &Commands, context: &AppContext, out: &mut W) -> anyhow::Result<()> {
    match command {
        Commands::Generate(args) => generate(args, context, out),
        Commands::Summarize(input) => {
            let text = read_input(input)?;
            let summary = context.pipeline().summarize(&text)?;
            print_json(out, &summary)
        },
        Commands::Validate(input) => {
            let text = read_input(input)?;
            print_json(out, &context.pipeline().validate(&text))
        },
        Commands::Providers => print_json(out, &ProvidersReport::from_context(context)),
    }
}

fn generate<W: Write>(args: &GenerateArgs, context: &AppContext, out: &mut W) -> anyhow::Result<()> {
    let request = context
        .validate_request(args.to_draft())
        .context("Invalid story request")?;
    let response = context.pipeline().generate(&request)?;
    print_json(out, &response)?;

    if let Some(path) = &args.audio_out {
        match response.audio_url.as_deref() {
            Some(reference) => write_audio(reference, path)?,
            None => warn!(path = %path.display(), "No narration audio was produced"),
        }
    }
    Ok(())
}

fn write_audio(reference: &str, path: &Path) -> anyhow::Result<()> {
    let bytes = decode_data_url(reference).context("Narration audio is not an inline data URL")?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("Failed to write audio to {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Narration audio written");
    Ok(())
}

fn read_input(input: &TextInput) -> anyhow::Result<String> {
    input.read().context("Failed to read story text")
}

fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
