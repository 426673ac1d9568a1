//! Recognizer backed by an external OCR command.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use bento_core::models::config::OcrConfig;
use bento_core::{OcrError, PlainTextRecognizer, SlipImage, SlipRecognizer};

/// Reads `.txt` inputs directly and pipes images through the configured
/// OCR command (`<command> stdin stdout -l <languages> [--psm N] ...`).
pub struct CliRecognizer {
    ocr: OcrConfig,
}

impl CliRecognizer {
    pub fn new(ocr: OcrConfig) -> Self {
        Self { ocr }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.ocr.command);
        cmd.arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.ocr.languages);
        if let Some(psm) = self.ocr.page_segmentation_mode {
            cmd.arg("--psm").arg(psm.to_string());
        }
        cmd.args(&self.ocr.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl SlipRecognizer for CliRecognizer {
    async fn recognize(&self, image: &SlipImage) -> Result<String, OcrError> {
        if image.is_text() {
            return PlainTextRecognizer.recognize(image).await;
        }

        let bytes = image.contents()?;
        debug!("Running {} on {}", self.ocr.command, image.name);
        let mut child = self
            .command()
            .spawn()
            .map_err(|e| OcrError::Unavailable(format!("{}: {}", self.ocr.command, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&bytes)
                .await
                .map_err(|e| OcrError::Recognition(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| OcrError::Recognition(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(OcrError::Recognition(if stderr.is_empty() {
                format!("{} exited with {}", self.ocr.command, output.status)
            } else {
                stderr
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
