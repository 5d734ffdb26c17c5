//! Engine configuration: every tunable threshold, loaded from an
//! s-expression plist such as
//! `(:pinch-threshold 0.07 :navigation-cooldown-ms 800 :zoom-max 4.0)`.
//!
//! Missing keys keep their defaults; unknown keys are logged and ignored;
//! out-of-range values are rejected.

use std::fmt::Display;
use std::path::Path;

use anyhow::{bail, Context};
use lexpr::Value;
use tracing::{info, warn};

use crate::geometry::Region;
use crate::interaction::{
    DismissConfig, GridLayout, HandChannels, NavigationConfig, SelectConfig, ZoomPanConfig,
};
use crate::sexp::{as_f64, as_text, get_bool, list_items, plist_get};
use crate::tracking::{AssemblerConfig, GestureConfig, Handedness};

/// Smallest gallery row, as a fraction of the display height.
const MIN_ROW_HEIGHT: f32 = 0.01;

const MAX_COLUMNS: usize = 64;

/// Every key `from_sexp` understands.
const KNOWN_KEYS: &[&str] = &[
    "pinch-threshold",
    "thumb-gesture-threshold",
    "thumb-extension-x",
    "thumb-extension-y",
    "palm-thumb-spread",
    "mirror-x",
    "publish-throttle-ms",
    "flip-handedness",
    "gallery-region",
    "gallery-columns",
    "gallery-row-height",
    "accept-region",
    "scroll-gain",
    "zoom-min",
    "zoom-max",
    "zoom-gain",
    "pan-min",
    "pan-max",
    "pan-gain",
    "pan-dead-zone",
    "zoom-dominance",
    "dismiss-zone-fraction",
    "dismiss-delay-ms",
    "navigation-cooldown-ms",
    "select-hand",
    "zoom-pan-hand",
    "dismiss-hand",
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    pub assembler: AssemblerConfig,
    pub layout: GridLayout,
    pub select: SelectConfig,
    pub zoom_pan: ZoomPanConfig,
    pub dismiss: DismissConfig,
    pub navigation: NavigationConfig,
    pub channels: HandChannels,
}

impl EngineConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let value = lexpr::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        let config = Self::from_sexp(&value)
            .with_context(|| format!("invalid config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply a plist over the defaults and validate the result.
    pub fn from_sexp(value: &Value) -> anyhow::Result<Self> {
        if !matches!(value, Value::Cons(_) | Value::Nil | Value::Null) {
            bail!("config must be a plist");
        }
        warn_unknown_keys(value);

        let mut c = Self::default();
        let g = &mut c.gesture;
        read_f32(value, "pinch-threshold", &mut g.pinch_threshold)?;
        read_f32(value, "thumb-gesture-threshold", &mut g.thumb_gesture_threshold)?;
        read_f32(value, "thumb-extension-x", &mut g.thumb_extension_x)?;
        read_f32(value, "thumb-extension-y", &mut g.thumb_extension_y)?;
        read_f32(value, "palm-thumb-spread", &mut g.palm_thumb_spread)?;
        read_bool(value, "mirror-x", &mut g.mirror_x);

        read_f64(value, "publish-throttle-ms", &mut c.assembler.publish_throttle_ms)?;
        read_bool(value, "flip-handedness", &mut c.assembler.flip_handedness);

        read_region(value, "gallery-region", &mut c.layout.region)?;
        if let Some(v) = plist_get(value, "gallery-columns") {
            c.layout.columns = match as_f64(v) {
                Some(n) if n >= 1.0 && n.fract() == 0.0 => n as usize,
                _ => bail!("gallery-columns: expected a positive integer"),
            };
        }
        read_f32(value, "gallery-row-height", &mut c.layout.row_height)?;

        // One accept region serves both the drop target and the viewer drag.
        read_region(value, "accept-region", &mut c.select.accept_region)?;
        c.dismiss.accept_region = c.select.accept_region;
        read_f32(value, "scroll-gain", &mut c.select.scroll_gain)?;

        let z = &mut c.zoom_pan;
        read_f32(value, "zoom-min", &mut z.zoom_min)?;
        read_f32(value, "zoom-max", &mut z.zoom_max)?;
        read_f32(value, "zoom-gain", &mut z.zoom_gain)?;
        read_f32(value, "pan-min", &mut z.pan_min)?;
        read_f32(value, "pan-max", &mut z.pan_max)?;
        read_f32(value, "pan-gain", &mut z.pan_gain)?;
        read_f32(value, "pan-dead-zone", &mut z.pan_dead_zone)?;
        read_f32(value, "zoom-dominance", &mut z.zoom_dominance)?;

        read_f32(value, "dismiss-zone-fraction", &mut c.dismiss.dismiss_zone_fraction)?;
        read_f64(value, "dismiss-delay-ms", &mut c.dismiss.dismiss_delay_ms)?;
        read_f64(value, "navigation-cooldown-ms", &mut c.navigation.cooldown_ms)?;

        read_hand(value, "select-hand", &mut c.channels.select)?;
        read_hand(value, "zoom-pan-hand", &mut c.channels.zoom_pan)?;
        read_hand(value, "dismiss-hand", &mut c.channels.dismiss)?;

        c.validate()?;
        Ok(c)
    }

    /// Reject values no controller can work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        let g = &self.gesture;
        require(g.pinch_threshold > 0.0, "pinch-threshold must be positive")?;
        require(
            g.thumb_gesture_threshold > 0.0,
            "thumb-gesture-threshold must be positive",
        )?;
        require(g.thumb_extension_x > 0.0, "thumb-extension-x must be positive")?;
        require(g.thumb_extension_y > 0.0, "thumb-extension-y must be positive")?;
        require(g.palm_thumb_spread > 0.0, "palm-thumb-spread must be positive")?;

        require(
            self.assembler.publish_throttle_ms >= 0.0,
            "publish-throttle-ms must not be negative",
        )?;

        valid_region(&self.layout.region, "gallery-region")?;
        require(
            self.layout.row_height >= MIN_ROW_HEIGHT,
            "gallery-row-height must be at least 0.01",
        )?;
        require(
            self.layout.columns <= MAX_COLUMNS,
            "gallery-columns must be at most 64",
        )?;
        valid_region(&self.select.accept_region, "accept-region")?;
        valid_region(&self.dismiss.accept_region, "accept-region")?;
        require(self.select.scroll_gain.is_finite(), "scroll-gain must be finite")?;

        let z = &self.zoom_pan;
        require(z.zoom_min > 0.0, "zoom-min must be positive")?;
        require(
            z.zoom_max.is_finite() && z.zoom_min <= z.zoom_max,
            "zoom range is inverted",
        )?;
        require(
            z.pan_min.is_finite() && z.pan_max.is_finite() && z.pan_min <= z.pan_max,
            "pan range is inverted",
        )?;
        require(z.zoom_gain.is_finite(), "zoom-gain must be finite")?;
        require(z.pan_gain.is_finite(), "pan-gain must be finite")?;
        require(z.pan_dead_zone >= 0.0, "pan-dead-zone must not be negative")?;
        require(z.zoom_dominance >= 0.0, "zoom-dominance must not be negative")?;

        let f = self.dismiss.dismiss_zone_fraction;
        require(
            (0.0..=1.0).contains(&f),
            "dismiss-zone-fraction must be within [0, 1]",
        )?;
        require(
            self.dismiss.dismiss_delay_ms >= 0.0,
            "dismiss-delay-ms must not be negative",
        )?;
        require(
            self.navigation.cooldown_ms >= 0.0,
            "navigation-cooldown-ms must not be negative",
        )?;
        Ok(())
    }

    /// Render the effective configuration in the file format.
    pub fn to_sexp(&self) -> String {
        let g = &self.gesture;
        let z = &self.zoom_pan;
        let mut out = String::from("(");
        let mut push = |key: &str, value: &dyn Display| {
            if out.len() > 1 {
                out.push(' ');
            }
            out.push_str(&format!(":{} {}", key, value));
        };
        push("pinch-threshold", &g.pinch_threshold);
        push("thumb-gesture-threshold", &g.thumb_gesture_threshold);
        push("thumb-extension-x", &g.thumb_extension_x);
        push("thumb-extension-y", &g.thumb_extension_y);
        push("palm-thumb-spread", &g.palm_thumb_spread);
        push("mirror-x", &sexp_bool(g.mirror_x));
        push("publish-throttle-ms", &self.assembler.publish_throttle_ms);
        push("flip-handedness", &sexp_bool(self.assembler.flip_handedness));
        push("gallery-region", &self.layout.region.to_sexp());
        push("gallery-columns", &self.layout.columns);
        push("gallery-row-height", &self.layout.row_height);
        push("accept-region", &self.select.accept_region.to_sexp());
        push("scroll-gain", &self.select.scroll_gain);
        push("zoom-min", &z.zoom_min);
        push("zoom-max", &z.zoom_max);
        push("zoom-gain", &z.zoom_gain);
        push("pan-min", &z.pan_min);
        push("pan-max", &z.pan_max);
        push("pan-gain", &z.pan_gain);
        push("pan-dead-zone", &z.pan_dead_zone);
        push("zoom-dominance", &z.zoom_dominance);
        push("dismiss-zone-fraction", &self.dismiss.dismiss_zone_fraction);
        push("dismiss-delay-ms", &self.dismiss.dismiss_delay_ms);
        push("navigation-cooldown-ms", &self.navigation.cooldown_ms);
        push("select-hand", &format!(":{}", self.channels.select.as_str()));
        push("zoom-pan-hand", &format!(":{}", self.channels.zoom_pan.as_str()));
        push("dismiss-hand", &format!(":{}", self.channels.dismiss.as_str()));
        out.push(')');
        out
    }
}

// ── Helpers ────────────────────────────────────────────────

fn require(ok: bool, what: &str) -> anyhow::Result<()> {
    if !ok {
        bail!("{}", what);
    }
    Ok(())
}

fn valid_region(r: &Region, key: &str) -> anyhow::Result<()> {
    let in_unit = |v: f32| (0.0..=1.0).contains(&v);
    if !(in_unit(r.left) && in_unit(r.top) && in_unit(r.right) && in_unit(r.bottom)) {
        bail!("{} must lie within [0, 1]", key);
    }
    if r.left >= r.right || r.top >= r.bottom {
        bail!("{} is empty or inverted", key);
    }
    Ok(())
}

fn sexp_bool(b: bool) -> &'static str {
    if b {
        "t"
    } else {
        "nil"
    }
}

fn warn_unknown_keys(value: &Value) {
    for key in list_items(value).into_iter().step_by(2) {
        match as_text(key) {
            Some(name) if KNOWN_KEYS.contains(&name.as_str()) => {}
            Some(name) => warn!("Ignoring unknown config key :{}", name),
            None => warn!("Ignoring non-keyword config entry {}", key),
        }
    }
}

fn read_f64(value: &Value, key: &str, target: &mut f64) -> anyhow::Result<()> {
    if let Some(v) = plist_get(value, key) {
        match as_f64(v) {
            Some(n) if n.is_finite() => *target = n,
            _ => bail!("{}: expected a number, got {}", key, v),
        }
    }
    Ok(())
}

fn read_f32(value: &Value, key: &str, target: &mut f32) -> anyhow::Result<()> {
    let mut n = f64::from(*target);
    read_f64(value, key, &mut n)?;
    *target = n as f32;
    Ok(())
}

fn read_bool(value: &Value, key: &str, target: &mut bool) {
    if let Some(b) = get_bool(value, key) {
        *target = b;
    }
}

fn read_region(value: &Value, key: &str, target: &mut Region) -> anyhow::Result<()> {
    let Some(v) = plist_get(value, key) else {
        return Ok(());
    };
    let edges: Vec<f64> = list_items(v).into_iter().filter_map(as_f64).collect();
    match edges[..] {
        [left, top, right, bottom] if list_items(v).len() == 4 => {
            *target = Region::new(left as f32, top as f32, right as f32, bottom as f32);
            Ok(())
        }
        _ => bail!("{}: expected (left top right bottom), got {}", key, v),
    }
}

fn read_hand(value: &Value, key: &str, target: &mut Handedness) -> anyhow::Result<()> {
    if let Some(v) = plist_get(value, key) {
        match as_text(v).as_deref().and_then(Handedness::parse) {
            Some(hand) => *target = hand,
            None => bail!("{}: expected :left or :right, got {}", key, v),
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────
