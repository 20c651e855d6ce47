//! Animation mode selection and tunables.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::AnimError;

/// Which animator a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Layout optimization: seven pieces reshuffling into a compact block.
    Packing,
    /// PDF generation: scattered pieces packing and morphing into a page icon.
    Morph,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Packing => "opt",
            Self::Morph => "pdf",
        }
    }
}

impl FromStr for Mode {
    type Err = AnimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opt" => Ok(Self::Packing),
            "pdf" => Ok(Self::Morph),
            other => Err(AnimError::UnknownMode(other.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for one animation run. Every field has a default, so a partial
/// JSON object (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimConfig {
    /// Canvas backing-store width in pixels.
    pub canvas_width: u32,
    /// Canvas backing-store height in pixels.
    pub canvas_height: u32,
    /// Class toggled on the container while the animation is shown.
    pub visible_class: String,
    /// Class marking the caption node inside the container.
    pub label_class: String,
    pub opt_label: String,
    pub pdf_label: String,
    /// Time between packing reshuffles.
    pub shuffle_interval_ms: f64,
    /// Time constant of the exponential follow toward a piece's target.
    /// The default reproduces a 0.10 ratio per frame at 60 Hz.
    pub follow_tau_ms: f64,
    /// Upper bound on a single frame delta, so a throttled tab resumes
    /// where it left off instead of jumping. Frames slower than this run
    /// animation time behind wall-clock time, stretching the morph phases.
    pub max_frame_dt_ms: f64,
    /// Fixed RNG seed; `None` seeds from the OS entropy source.
    pub seed: Option<u64>,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self {
            canvas_width: 320,
            canvas_height: 220,
            visible_class: "oa-visible".to_owned(),
            label_class: "oa-label".to_owned(),
            opt_label: "Optimizing…".to_owned(),
            pdf_label: "Generating PDF…".to_owned(),
            shuffle_interval_ms: 1600.0,
            follow_tau_ms: 158.2,
            max_frame_dt_ms: 250.0,
            seed: None,
        }
    }
}

impl AnimConfig {
    /// Parse a JSON options object. Out-of-range tunables fall back to their
    /// defaults (see [`AnimConfig::validated`]).
    pub fn from_json(json: &str) -> Result<Self, AnimError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Replace every timing tunable that is not finite and positive with its
    /// default.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        for (name, value, fallback) in [
            ("shuffle_interval_ms", &mut self.shuffle_interval_ms, defaults.shuffle_interval_ms),
            ("follow_tau_ms", &mut self.follow_tau_ms, defaults.follow_tau_ms),
            ("max_frame_dt_ms", &mut self.max_frame_dt_ms, defaults.max_frame_dt_ms),
        ] {
            if !(value.is_finite() && *value > 0.0) {
                log::warn!("ignoring {name} = {value}; using {fallback}");
                *value = fallback;
            }
        }
        self
    }

    /// Caption text shown while `mode` runs.
    pub fn label(&self, mode: Mode) -> &str {
        match mode {
            Mode::Packing => &self.opt_label,
            Mode::Morph => &self.pdf_label,
        }
    }
}
