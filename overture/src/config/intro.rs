use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::captions::sync::CaptionDescriptor;
use crate::foundation::core::{Fps, Viewport};
use crate::foundation::error::{OvertureError, OvertureResult};
use crate::session::intro::{SessionOpts, SheenClock};

/// Everything needed to reproduce an intro offline: viewport, frame rate, particle seed, mark text
/// and the page's captions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IntroConfig {
    /// Logical viewport the intro is rendered for.
    pub viewport: Viewport,
    /// Frame rate for simulation and export.
    #[serde(default)]
    pub fps: Fps,
    /// Particle placement seed.
    #[serde(default)]
    pub seed: u64,
    /// Text drawn on the final chip.
    #[serde(default = "default_mark")]
    pub mark: String,
    /// Sheen time source.
    #[serde(default = "default_sheen_clock")]
    pub sheen_clock: SheenClock,
    /// Caption windows, in page order.
    #[serde(default)]
    pub captions: Vec<CaptionDescriptor>,
}

fn default_mark() -> String {
    "DZ".to_string()
}

fn default_sheen_clock() -> SheenClock {
    SheenClock::Session
}

impl IntroConfig {
    /// Config for `viewport` with every other field at its default.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            fps: Fps::default(),
            seed: 0,
            mark: default_mark(),
            sheen_clock: default_sheen_clock(),
            captions: Vec::new(),
        }
    }

    /// Parse an intro config from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> OvertureResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| OvertureError::serde(format!("parse intro config JSON: {e}")))
    }

    /// Parse an intro config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> OvertureResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            OvertureError::validation(format!("open intro config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate viewport, frame rate, mark and captions.
    pub fn validate(&self) -> OvertureResult<()> {
        self.viewport.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.mark.trim().is_empty() {
            return Err(OvertureError::validation("mark must be non-empty"));
        }
        for (i, caption) in self.captions.iter().enumerate() {
            caption
                .validate()
                .map_err(|e| OvertureError::validation(format!("caption {i}: {e}")))?;
        }
        Ok(())
    }

    /// Session options derived from this config.
    pub fn session_opts(&self) -> SessionOpts {
        SessionOpts {
            seed: self.seed,
            mark: self.mark.clone(),
            sheen_clock: self.sheen_clock,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/intro.rs"]
mod tests;
