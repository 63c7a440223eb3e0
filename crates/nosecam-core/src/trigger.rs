//! Debounced capture trigger.
//!
//! Fires once when the tracked nose position enters the target region, then
//! ignores every observation until the debounce window has elapsed.

use crate::types::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Target box: 100×100 centred at (100, 300) in layer coordinates.
const DEFAULT_REGION: Rect = Rect::new(50.0, 250.0, 100.0, 100.0);
const DEFAULT_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Quiet period after a capture, in milliseconds.
    pub debounce_ms: u64,
    /// Capture fires while the nose is strictly inside this rectangle.
    pub region: Rect,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            region: DEFAULT_REGION,
        }
    }
}

impl TriggerConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Outcome of one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerDecision {
    /// Nose inside the region and no debounce pending: take a photo.
    Capture,
    /// A capture fired less than one debounce window ago.
    Debounced,
    /// Nose tracked but outside the region.
    Outside,
    /// No nose position in this frame.
    NoFace,
}

pub struct CaptureTrigger {
    config: TriggerConfig,
    last_capture: Option<Instant>,
    captures: usize,
}

impl CaptureTrigger {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            last_capture: None,
            captures: 0,
        }
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Number of captures fired so far.
    pub fn captures(&self) -> usize {
        self.captures
    }

    /// True while a capture at `now` would be suppressed.
    pub fn is_debouncing(&self, now: Instant) -> bool {
        self.last_capture
            .is_some_and(|at| now.saturating_duration_since(at) < self.config.debounce())
    }

    /// Feed the latest nose position. `now` must not go backwards between calls.
    pub fn observe(&mut self, position: Option<Point>, now: Instant) -> TriggerDecision {
        let Some(position) = position else {
            return TriggerDecision::NoFace;
        };

        if self.is_debouncing(now) {
            tracing::debug!(x = position.x, y = position.y, "capture debounced");
            return TriggerDecision::Debounced;
        }

        if !self.config.region.contains(position) {
            return TriggerDecision::Outside;
        }

        self.last_capture = Some(now);
        self.captures += 1;
        tracing::info!(
            x = position.x,
            y = position.y,
            captures = self.captures,
            "nose entered capture region"
        );
        TriggerDecision::Capture
    }

    /// Close any pending debounce window.
    pub fn reset(&mut self) {
        self.last_capture = None;
    }
}

impl Default for CaptureTrigger {
    fn default() -> Self {
        Self::new(TriggerConfig::default())
    }
}
