//! Startup discovery of the tesseract binary.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Whether a working engine was found at startup.
///
/// Computed once by [`EngineProbe::probe`] and handed to the extractor; it is
/// never revised afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAvailability {
    /// A binary was found and answered `--version`.
    Available { binary: PathBuf, version: String },
    /// No binary, or the binary failed to initialize.
    Unavailable { reason: String },
}

impl EngineAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// The bound engine binary, if any.
    pub fn binary(&self) -> Option<&Path> {
        match self {
            Self::Available { binary, .. } => Some(binary),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Checks candidate locations for the engine binary.
#[derive(Debug, Clone)]
pub struct EngineProbe {
    candidates: Vec<PathBuf>,
}

impl EngineProbe {
    /// Create a probe over candidates in priority order.
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Create a probe from the OCR configuration (override first, then search paths).
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.candidates())
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists as a file.
    pub fn locate(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|path| {
                let found = path.is_file();
                debug!("Engine candidate {}: {}", path.display(), if found { "found" } else { "missing" });
                found
            })
    }

    /// Locate and validate the engine.
    pub fn probe(&self) -> EngineAvailability {
        let Some(binary) = self.locate() else {
            warn!("Tesseract not found in any of {} known locations, using demo mode", self.candidates.len());
            let err = OcrError::EngineUnavailable("tesseract binary not found".to_string());
            return EngineAvailability::Unavailable {
                reason: err.to_string(),
            };
        };

        match engine_version(binary) {
            Ok(version) => {
                info!("Tesseract found at {} ({})", binary.display(), version);
                EngineAvailability::Available {
                    binary: binary.to_path_buf(),
                    version,
                }
            }
            Err(e) => {
                warn!("Tesseract at {} failed to initialize: {}, using demo mode", binary.display(), e);
                EngineAvailability::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Run `<binary> --version` and return the first line it prints.
fn engine_version(binary: &Path) -> Result<String, OcrError> {
    let output = Command::new(binary)
        .arg("--version")
        .output()
        .map_err(|e| OcrError::Invocation(format!("{}: {}", binary.display(), e)))?;

    if !output.status.success() {
        return Err(OcrError::EngineFailed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    // Older releases print the banner on stderr.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let version = stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("unknown version")
        .to_string();

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_candidates_found() {
        let dir = tempfile::tempdir().unwrap();
        let probe = EngineProbe::new(vec![
            dir.path().join("missing-a"),
            dir.path().join("missing-b"),
        ]);

        assert!(probe.locate().is_none());
        let availability = probe.probe();
        assert!(!availability.is_available());
        assert_eq!(availability.binary(), None);
    }

    #[test]
    fn test_directory_is_not_a_binary() {
        let dir = tempfile::tempdir().unwrap();
        let probe = EngineProbe::new(vec![dir.path().to_path_buf()]);
        assert!(probe.locate().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_first_existing_candidate_wins() {
        use crate::ocr::testing::fake_engine;

        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let a = fake_engine(first.path(), "echo 'tesseract 5.3.0'");
        let b = fake_engine(second.path(), "echo 'tesseract 4.1.1'");

        let probe = EngineProbe::new(vec![first.path().join("nope"), a.clone(), b]);
        assert_eq!(probe.locate(), Some(a.as_path()));

        assert_eq!(
            probe.probe(),
            EngineAvailability::Available {
                binary: a,
                version: "tesseract 5.3.0".to_string(),
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_initialization_is_unavailable() {
        use crate::ocr::testing::fake_engine;

        let dir = tempfile::tempdir().unwrap();
        let broken = fake_engine(dir.path(), "echo 'missing libtesseract' >&2\nexit 127");

        let availability = EngineProbe::new(vec![broken]).probe();
        match availability {
            EngineAvailability::Unavailable { reason } => {
                assert!(reason.contains("missing libtesseract"), "reason: {reason}");
            }
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tesseract");
        std::fs::write(&path, "not a program").unwrap();

        assert!(!EngineProbe::new(vec![path]).probe().is_available());
    }
}
