use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use super::types::FirstPageExtractor;
use super::ExtractionError;
use crate::config::{SealConfig, DEFAULT_EXTRACT_TIMEOUT, DEFAULT_MAX_TEXT_BYTES};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const OUTPUT_FILE_NAME: &str = "page1.txt";

/// First-page extractor backed by poppler's `pdftotext`.
///
/// The tool is run directly (never through a shell) with exactly
/// `-f 1 -l 1 <input> <output>`. The input is canonicalized first, so an
/// attacker-chosen file name can never be read as an option. Output lands in
/// a private scratch directory that is removed when the call returns,
/// whatever the outcome.
#[derive(Debug, Clone)]
pub struct PdfToTextExtractor {
    program: PathBuf,
    timeout: Duration,
    max_text_bytes: u64,
    scratch_dir: Option<PathBuf>,
}

impl Default for PdfToTextExtractor {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

impl PdfToTextExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_EXTRACT_TIMEOUT,
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
            scratch_dir: None,
        }
    }

    pub fn from_config(config: &SealConfig) -> Self {
        Self {
            program: config.pdftotext_program.clone(),
            timeout: config.extract_timeout,
            max_text_bytes: config.max_text_bytes,
            scratch_dir: config.scratch_dir.clone(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_text_bytes(mut self, max_text_bytes: u64) -> Self {
        self.max_text_bytes = max_text_bytes;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn scratch(&self) -> std::io::Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("rider-seal-");
        match &self.scratch_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
    }

    /// Wait for the child, killing it once the timeout elapses.
    fn wait_bounded(&self, child: &mut Child) -> Result<ExitStatus, ExtractionError> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    reap(child);
                    return Err(e.into());
                }
            }

            if started.elapsed() > self.timeout {
                reap(child);
                return Err(ExtractionError::TimedOut {
                    program: self.program_name(),
                    elapsed_ms: started.elapsed().as_millis(),
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn read_output(&self, output: &Path) -> Result<String, ExtractionError> {
        let mut bytes = Vec::new();
        std::fs::File::open(output)?
            .take(self.max_text_bytes)
            .read_to_end(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl FirstPageExtractor for PdfToTextExtractor {
    fn extract_first_page(&self, path: &Path) -> Result<String, ExtractionError> {
        let input = std::fs::canonicalize(path)?;
        let scratch = self.scratch()?;
        let output = scratch.path().join(OUTPUT_FILE_NAME);

        let mut child = Command::new(&self.program)
            .args(["-f", "1", "-l", "1"])
            .arg(&input)
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ExtractionError::Spawn {
                program: self.program_name(),
                source,
            })?;

        let status = self.wait_bounded(&mut child)?;
        if !status.success() {
            return Err(ExtractionError::ToolFailed {
                program: self.program_name(),
                status: status.to_string(),
            });
        }

        let text = self.read_output(&output)?;
        tracing::debug!(
            program = %self.program.display(),
            chars = text.chars().count(),
            "First page extracted"
        );
        Ok(text)
    }
}
