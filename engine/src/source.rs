//! Landmark sources: the opaque detector the frame loop polls.
//!
//! `ReplaySource` plays back recorded detector output, one frame per line:
//!
//! ```text
//! ; comment
//! (:hands ((:label "Left" :points ((0.5 0.8 0.0) ... 21 points ...))))
//! (:hands ())
//! (:error "camera busy")
//! ```

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use lexpr::Value;
use tracing::{debug, info};

use crate::sexp::{as_f64, get_string, list_items, plist_get};
use crate::tracking::{Detection, Handedness, Landmark};

/// A detector that yields zero to two labeled landmark sets per request.
pub trait LandmarkSource {
    /// Short description for logs.
    fn name(&self) -> &str;

    /// Run one detection.  `Ok(None)` means the source is exhausted; `Err`
    /// is a transient fault and the caller may retry on the next frame.
    fn detect(&mut self) -> anyhow::Result<Option<Vec<Detection>>>;
}

// ── Replay ─────────────────────────────────────────────────

pub struct ReplaySource {
    name: String,
    lines: Vec<String>,
    next_line: usize,
    /// Frames returned so far (faults excluded).
    pub frames: u64,
}

impl ReplaySource {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read replay {}", path.display()))?;
        let source = Self::from_text(path.display().to_string(), &text);
        info!(
            "Opened replay {} ({} lines)",
            path.display(),
            source.lines.len()
        );
        Ok(source)
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: text.lines().map(str::to_owned).collect(),
            next_line: 0,
            frames: 0,
        }
    }

    /// Next line holding a frame, with its 1-based line number.
    fn next_frame_line(&mut self) -> Option<(usize, String)> {
        while self.next_line < self.lines.len() {
            let index = self.next_line;
            self.next_line += 1;
            let line = self.lines[index].trim();
            if !line.is_empty() && !line.starts_with(';') {
                return Some((index + 1, line.to_owned()));
            }
        }
        None
    }
}

impl LandmarkSource for ReplaySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&mut self) -> anyhow::Result<Option<Vec<Detection>>> {
        let Some((line_no, line)) = self.next_frame_line() else {
            debug!("Replay exhausted after {} frames", self.frames);
            return Ok(None);
        };
        let value =
            lexpr::from_str(&line).with_context(|| format!("line {}: unreadable frame", line_no))?;
        let detections = parse_frame(&value).with_context(|| format!("line {}", line_no))?;
        self.frames += 1;
        Ok(Some(detections))
    }
}

/// Decode one recorded frame.
pub fn parse_frame(value: &Value) -> anyhow::Result<Vec<Detection>> {
    if let Some(reason) = get_string(value, "error") {
        bail!("detector fault: {}", reason);
    }
    let hands = plist_get(value, "hands").ok_or_else(|| anyhow!("frame has no :hands"))?;
    list_items(hands).into_iter().map(parse_hand).collect()
}

fn parse_hand(value: &Value) -> anyhow::Result<Detection> {
    let label = get_string(value, "label").ok_or_else(|| anyhow!("hand has no :label"))?;
    let label = Handedness::parse(&label).ok_or_else(|| anyhow!("unknown hand label {:?}", label))?;
    let points = plist_get(value, "points").ok_or_else(|| anyhow!("hand has no :points"))?;
    let landmarks = list_items(points)
        .into_iter()
        .map(parse_point)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Detection { label, landmarks })
}

/// `(x y)` or `(x y z)`.
fn parse_point(value: &Value) -> anyhow::Result<Landmark> {
    let coords = list_items(value)
        .into_iter()
        .map(|v| as_f64(v).map(|n| n as f32))
        .collect::<Option<Vec<f32>>>();
    match coords.as_deref() {
        Some(&[x, y]) => Ok(Landmark::new(x, y, 0.0)),
        Some(&[x, y, z]) => Ok(Landmark::new(x, y, z)),
        _ => bail!("bad point {}", value),
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::LANDMARK_COUNT;

    fn hand_line(label: &str, x: f32) -> String {
        let points: Vec<String> = (0..LANDMARK_COUNT)
            .map(|i| format!("({} {} 0.0)", x, 0.1 + i as f32 * 0.01))
            .collect();
        format!("(:label \"{}\" :points ({}))", label, points.join(" "))
    }

    #[test]
    fn test_replay_frames() {
        let text = format!(
            "; recorded session\n\n(:hands ({} {}))\n(:hands ())\n",
            hand_line("Left", 0.3),
            hand_line("Right", 0.7)
        );
        let mut source = ReplaySource::from_text("test", &text);

        let frame = source.detect().unwrap().unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].label, Handedness::Left);
        assert_eq!(frame[1].label, Handedness::Right);
        assert_eq!(frame[0].landmarks.len(), LANDMARK_COUNT);
        assert!((frame[1].landmarks[0].x - 0.7).abs() < 1e-6);

        assert!(source.detect().unwrap().unwrap().is_empty());
        assert!(source.detect().unwrap().is_none(), "exhausted");
        assert!(source.detect().unwrap().is_none(), "stays exhausted");
        assert_eq!(source.frames, 2);
    }

    #[test]
    fn test_fault_line_is_transient() {
        let text = format!("(:error \"camera busy\")\n(:hands ({}))\n", hand_line("Left", 0.5));
        let mut source = ReplaySource::from_text("test", &text);
        let err = source.detect().unwrap_err();
        assert!(format!("{:#}", err).contains("camera busy"));
        assert_eq!(source.detect().unwrap().unwrap().len(), 1, "next frame still readable");
    }

    #[test]
    fn test_two_coordinate_points() {
        let v = lexpr::from_str("(:hands ((:label \"right\" :points ((0.1 0.2) (0.3 0.4 0.5)))))")
            .unwrap();
        let frame = parse_frame(&v).unwrap();
        assert_eq!(frame[0].landmarks[0], Landmark::new(0.1, 0.2, 0.0));
        assert_eq!(frame[0].landmarks[1], Landmark::new(0.3, 0.4, 0.5));
    }

    #[test]
    fn test_rejects_bad_frames() {
        for bad in [
            "(:hands ((:label \"Middle\" :points ())))",
            "(:hands ((:points ())))",
            "(:hands ((:label \"Left\" :points ((0.1)))))",
            "(:hands ((:label \"Left\" :points ((0.1 foo)))))",
            "(:something-else 1)",
        ] {
            let v = lexpr::from_str(bad).unwrap();
            assert!(parse_frame(&v).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_unreadable_line_reports_line_number() {
        let mut source = ReplaySource::from_text("test", "\n(:hands (");
        let err = source.detect().unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }
}
