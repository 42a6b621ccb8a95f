//! Piper local text-to-speech backend
//!
//! Runs a Piper-compatible CLI: narration text on stdin, a WAV written to the
//! path given by `--output_file`.
//!
//! # Installation
//!
//! ```bash
//! wget https://github.com/rhasspy/piper/releases/download/v1.2.0/piper_arm64.tar.gz
//! tar -xzf piper_arm64.tar.gz && sudo mv piper /usr/local/bin/
//!
//! mkdir -p ~/.local/share/piper/voices && cd ~/.local/share/piper/voices
//! wget https://huggingface.co/rhasspy/piper-voices/resolve/main/it/it_IT/paola/medium/it_IT-paola-medium.onnx
//! wget https://huggingface.co/rhasspy/piper-voices/resolve/main/it/it_IT/paola/medium/it_IT-paola-medium.onnx.json
//! ```

use std::io::{Read, Seek, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};

use crate::config::LocalTtsConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechBackend, SpeechBackendId};
use crate::types::{AudioData, AudioFormat, RenderedSpeech};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Kill a synthesizer that will not be waited on again and collect its status
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Local TTS backend using Piper
#[derive(Debug, Clone)]
pub struct PiperBackend {
    config: LocalTtsConfig,
}

impl PiperBackend {
    pub const fn new(config: LocalTtsConfig) -> Self {
        Self { config }
    }

    fn executable(&self) -> &Path {
        &self.config.executable_path
    }

    /// Voice model for a `piper:<name>` voice, else the language, else the default
    fn voice_model_path(&self, language: &str, voice: Option<&str>) -> Option<&Path> {
        let voice_name = voice
            .and_then(|v| v.split_once(':'))
            .map(|(_, name)| name.trim())
            .filter(|name| !name.is_empty());

        voice_name
            .and_then(|name| self.config.voices.get(name))
            .or_else(|| self.config.voices.get(language))
            .or(self.config.model_path.as_ref())
            .map(std::path::PathBuf::as_path)
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    fn run_piper(&self, text: &str, model: Option<&Path>) -> Result<Vec<u8>, SpeechError> {
        // Both temp files are removed on drop, on every return path below.
        let output_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to create temp file: {e}"))
        })?;
        let mut stderr_file = NamedTempFile::new().map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to create temp file: {e}"))
        })?;
        let stderr_handle = stderr_file.reopen().map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to open temp file: {e}"))
        })?;

        let mut cmd = Command::new(self.executable());
        if let Some(model) = model {
            cmd.arg("--model").arg(model);
        }
        cmd.arg("--output_file")
            .arg(output_file.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_handle));

        debug!("Running piper: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!(
                    "Piper not found at '{}'",
                    self.executable().display()
                ))
            } else {
                SpeechError::SynthesisFailed(format!("Failed to run piper: {e}"))
            }
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                reap(&mut child);
                return Err(SpeechError::SynthesisFailed(format!(
                    "Failed to write to piper stdin: {e}"
                )));
            }
            // stdin is dropped here, closing it
        }

        let deadline = Instant::now() + Duration::from_millis(self.config.timeout_ms);
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    reap(&mut child);
                    return Err(SpeechError::Timeout(format!(
                        "piper did not finish within {}ms",
                        self.config.timeout_ms
                    )));
                },
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    reap(&mut child);
                    return Err(SpeechError::SynthesisFailed(format!(
                        "Failed to wait for piper: {e}"
                    )));
                },
            }
        };

        if !status.success() {
            let mut stderr = String::new();
            let _ = stderr_file.rewind();
            let _ = stderr_file.read_to_string(&mut stderr);
            warn!(status = %status, "Piper failed");
            return Err(SpeechError::SynthesisFailed(format!(
                "Piper exited with status {status}: {}",
                stderr.trim()
            )));
        }

        let audio = std::fs::read(output_file.path()).map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to read piper output: {e}"))
        })?;

        if audio.is_empty() {
            warn!("Piper produced empty output");
            return Err(SpeechError::EmptyAudio);
        }

        Ok(audio)
    }
}

impl SpeechBackend for PiperBackend {
    fn id(&self) -> SpeechBackendId {
        SpeechBackendId::Piper
    }

    fn synthesize(
        &self,
        text: &str,
        language: &str,
        voice: Option<&str>,
    ) -> Result<RenderedSpeech, SpeechError> {
        if !self.config.enabled {
            return Err(SpeechError::NotAvailable("local tts disabled".to_string()));
        }
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        let model = self.voice_model_path(language, voice);
        let wav = self.run_piper(text, model)?;
        let audio = AudioData::new(wav, AudioFormat::Wav);

        Ok(RenderedSpeech::new(
            audio.to_data_url(),
            SpeechBackendId::Piper.as_str(),
        ))
    }
}
