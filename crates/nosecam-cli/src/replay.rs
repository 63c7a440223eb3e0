//! Replay recorded detector frames through the capture trigger.

use anyhow::{Context, Result};
use nosecam_core::{
    CaptureTrigger, LandmarkError, LandmarkRegion, Path, Point, Rect, TriggerConfig,
    TriggerDecision,
};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

/// One JSON-lines input record.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameRecord {
    /// Milliseconds since the start of the recording.
    pub t_ms: u64,
    /// Nose outline already in layer coordinates.
    #[serde(default)]
    pub path: Option<Path>,
    /// Face box for a normalized `nose` outline.
    #[serde(default)]
    pub face: Option<Rect>,
    #[serde(default)]
    pub nose: Option<Vec<Point>>,
    #[serde(default)]
    pub closed: Option<bool>,
}

impl FrameRecord {
    /// Nose position for this frame, `None` when the frame carries no face.
    pub fn nose_position(&self) -> Result<Option<Point>, LandmarkError> {
        if let Some(path) = &self.path {
            return Ok(Some(path.centroid()?));
        }
        match (&self.face, &self.nose) {
            (Some(face), Some(nose)) => {
                let region = LandmarkRegion {
                    points: nose.clone(),
                    closed: self.closed.unwrap_or(true),
                };
                Ok(Some(region.center_in(face)?))
            }
            _ => Ok(None),
        }
    }

    /// True when only one of `face` / `nose` is present and no `path`
    /// stands in for them.
    pub fn is_incomplete(&self) -> bool {
        self.path.is_none() && (self.face.is_some() != self.nose.is_some())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub t_ms: u64,
    pub position: Option<Point>,
    pub decision: TriggerDecision,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub frames: usize,
    pub captures: usize,
}

/// Read frames from `input`, write one report line per frame and a final
/// summary line to `out`.
pub fn replay<R: BufRead, W: Write>(
    input: R,
    mut out: W,
    config: TriggerConfig,
) -> Result<Summary> {
    let mut trigger = CaptureTrigger::new(config);
    tracing::info!(
        region = ?trigger.config().region,
        debounce_ms = trigger.config().debounce_ms,
        "replay starting"
    );
    let base = Instant::now();
    let mut frames = 0usize;
    let mut last_t = 0u64;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("reading line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: FrameRecord = serde_json::from_str(&line)
            .with_context(|| format!("parsing frame on line {line_no}"))?;

        if record.t_ms < last_t {
            tracing::warn!(
                line = line_no,
                t_ms = record.t_ms,
                previous = last_t,
                "frame timestamp went backwards"
            );
        }
        last_t = last_t.max(record.t_ms);

        if record.is_incomplete() {
            tracing::warn!(
                line = line_no,
                has_face = record.face.is_some(),
                has_nose = record.nose.is_some(),
                "frame needs both face and nose; treating as no face"
            );
        }

        let position = match record.nose_position() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "skipping unusable nose outline");
                None
            }
        };

        let now = base + Duration::from_millis(record.t_ms);
        let decision = trigger.observe(position, now);
        tracing::debug!(t_ms = record.t_ms, ?decision, "frame");

        let report = FrameReport {
            t_ms: record.t_ms,
            position,
            decision,
        };
        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
        frames += 1;
    }

    let summary = Summary {
        frames,
        captures: trigger.captures(),
    };
    serde_json::to_writer(&mut out, &summary)?;
    writeln!(out)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> (Summary, Vec<serde_json::Value>) {
        let mut out = Vec::new();
        let summary = replay(input.as_bytes(), &mut out, TriggerConfig::default()).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, lines)
    }

    const INSIDE_PATH: &str = r#"[{"op":"move_to","x":90,"y":290},{"op":"line_to","x":110,"y":310}]"#;

    #[test]
    fn test_path_frames_fire_and_debounce() {
        let input = format!(
            "{{\"t_ms\":0,\"path\":{INSIDE_PATH}}}\n\
             {{\"t_ms\":500,\"path\":{INSIDE_PATH}}}\n\
             {{\"t_ms\":1200,\"path\":{INSIDE_PATH}}}\n"
        );
        let (summary, lines) = run(&input);
        assert_eq!(summary, Summary { frames: 3, captures: 2 });
        assert_eq!(lines[0]["decision"], "capture");
        assert_eq!(lines[0]["position"], serde_json::json!({"x": 100.0, "y": 300.0}));
        assert_eq!(lines[1]["decision"], "debounced");
        assert_eq!(lines[2]["decision"], "capture");
        assert_eq!(lines[3], serde_json::json!({"frames": 3, "captures": 2}));
    }

    #[test]
    fn test_landmark_frame() {
        let input = r#"{"t_ms":0,"face":{"x":50,"y":250,"width":100,"height":100},"nose":[{"x":0.4,"y":0.4},{"x":0.6,"y":0.6}]}"#;
        let (summary, lines) = run(input);
        assert_eq!(summary.captures, 1);
        assert_eq!(lines[0]["decision"], "capture");
    }

    #[test]
    fn test_no_face_and_blank_lines() {
        let input = "{\"t_ms\":0}\n\n{\"t_ms\":33}\n";
        let (summary, lines) = run(input);
        assert_eq!(summary, Summary { frames: 2, captures: 0 });
        assert_eq!(lines[0]["decision"], "no_face");
        assert!(lines[0]["position"].is_null());
    }

    #[test]
    fn test_empty_path_is_skipped() {
        let input = r#"{"t_ms":0,"path":[{"op":"close_path"}]}"#;
        let (summary, lines) = run(input);
        assert_eq!(summary.captures, 0);
        assert_eq!(lines[0]["decision"], "no_face");
    }

    #[test]
    fn test_face_without_nose_is_incomplete() {
        let face_only: FrameRecord =
            serde_json::from_str(r#"{"t_ms":0,"face":{"x":0,"y":0,"width":1,"height":1}}"#)
                .unwrap();
        assert!(face_only.is_incomplete());
        assert_eq!(face_only.nose_position().unwrap(), None);

        let nose_only: FrameRecord =
            serde_json::from_str(r#"{"t_ms":0,"nose":[{"x":0.5,"y":0.5}]}"#).unwrap();
        assert!(nose_only.is_incomplete());

        let empty: FrameRecord = serde_json::from_str(r#"{"t_ms":0}"#).unwrap();
        assert!(!empty.is_incomplete());

        let with_path: FrameRecord = serde_json::from_str(&format!(
            "{{\"t_ms\":0,\"path\":{INSIDE_PATH},\"face\":{{\"x\":0,\"y\":0,\"width\":1,\"height\":1}}}}"
        ))
        .unwrap();
        assert!(!with_path.is_incomplete());
    }

    #[test]
    fn test_incomplete_frame_reports_no_face() {
        let input = r#"{"t_ms":0,"face":{"x":50,"y":250,"width":100,"height":100}}"#;
        let (summary, lines) = run(input);
        assert_eq!(summary.captures, 0);
        assert_eq!(lines[0]["decision"], "no_face");
    }

    #[test]
    fn test_malformed_line_fails() {
        let mut out = Vec::new();
        let err = replay("{\"t_ms\":0}\nnot json\n".as_bytes(), &mut out, TriggerConfig::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "{err:#}");
    }

    #[test]
    fn test_nose_position_prefers_path() {
        let record: FrameRecord = serde_json::from_str(&format!(
            "{{\"t_ms\":0,\"path\":{INSIDE_PATH},\"face\":{{\"x\":0,\"y\":0,\"width\":1,\"height\":1}},\"nose\":[]}}"
        ))
        .unwrap();
        assert_eq!(record.nose_position().unwrap(), Some(Point::new(100.0, 300.0)));
    }
}
