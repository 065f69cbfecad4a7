use crate::sim::{BodySnapshot, DEFAULT_AIR_RESISTANCE, DEFAULT_FRICTION, DEFAULT_TIME_SCALE, DEFAULT_TRACK_LENGTH};
use crate::BodyConfig;
use serde::Serialize;

pub const DEMO_MASS: f64 = 10.0;
pub const DEMO_SPEED: f64 = 0.0;

/// Horizontal margin on each side of the track, in canvas pixels.
pub const TRACK_MARGIN: f64 = 50.0;
pub const MARKER_RADIUS: f64 = 20.0;

/// Bounds of one page slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

/// Every slider the page builds, keyed by its control name.
pub fn slider_ranges() -> &'static [(&'static str, SliderRange)] {
    &[
        ("maxDistance", SliderRange { min: 10.0, max: 500.0, step: 10.0, default: DEFAULT_TRACK_LENGTH }),
        ("timeScale", SliderRange { min: 0.1, max: 5.0, step: 0.1, default: DEFAULT_TIME_SCALE }),
        ("friction", SliderRange { min: 0.0, max: 1.0, step: 0.01, default: DEFAULT_FRICTION }),
        ("airRes", SliderRange { min: 0.0, max: 1.0, step: 0.01, default: DEFAULT_AIR_RESISTANCE }),
        ("speed", SliderRange { min: 0.0, max: 50.0, step: 0.5, default: DEMO_SPEED }),
        ("mass", SliderRange { min: 1.0, max: 100.0, step: 1.0, default: DEMO_MASS }),
    ]
}

/// The classroom line-up: three equal bodies at rest, A red, B green, C blue.
pub fn demo_configs() -> Vec<BodyConfig> {
    [("A", "red"), ("B", "green"), ("C", "blue")]
        .into_iter()
        .map(|(label, color)| BodyConfig::new(label, DEMO_MASS, DEMO_SPEED).with_color(color))
        .collect()
}

/// Heading for a body's control panel, e.g. `Object A (RED)`.
pub fn panel_title(config: &BodyConfig) -> String {
    format!("Object {} ({})", config.label, config.color.to_uppercase())
}

/// Canvas-space marker centers, one row per body.
///
/// Rows are spaced `height / (n + 1)` apart; x maps `[0, track_length]` onto
/// `[TRACK_MARGIN, width - TRACK_MARGIN]`.
pub fn marker_positions(positions: &[f64], track_length: f64, width: f64, height: f64) -> Vec<[f64; 2]> {
    let spacing = height / (positions.len() + 1) as f64;
    let span = width - 2.0 * TRACK_MARGIN;
    positions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let fraction = if track_length > 0.0 { p / track_length } else { 1.0 };
            [TRACK_MARGIN + fraction * span, spacing * (i + 1) as f64]
        })
        .collect()
}

/// Two readout lines drawn above a marker.
pub fn readout(snapshot: &BodySnapshot) -> [String; 2] {
    [
        format!("Speed: {:.1} m/s", snapshot.speed),
        format!("Distance: {:.1} m", snapshot.position),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn demo_lineup() {
        let configs = demo_configs();
        assert_eq!(configs.len(), 3);
        assert_eq!(configs[1].label, "B");
        assert_eq!(configs[2].color, "blue");
        assert!(configs.iter().all(|c| c.mass == DEMO_MASS && c.speed == DEMO_SPEED));
        assert_eq!(panel_title(&configs[0]), "Object A (RED)");
    }

    #[test]
    fn markers_span_the_canvas() {
        let m = marker_positions(&[0.0, 50.0, 100.0], 100.0, 900.0, 400.0);
        assert_relative_eq!(m[0][0], 50.0);
        assert_relative_eq!(m[1][0], 450.0);
        assert_relative_eq!(m[2][0], 850.0);
        assert_relative_eq!(m[0][1], 100.0);
        assert_relative_eq!(m[2][1], 300.0);
    }

    #[test]
    fn readout_uses_one_decimal() {
        let snap = BodySnapshot {
            label: "A".into(),
            color: "red".into(),
            mass: 10.0,
            position: 8.994,
            speed: 8.994,
            acceleration: 3.994,
            arrived: false,
        };
        assert_eq!(readout(&snap), ["Speed: 9.0 m/s".to_string(), "Distance: 9.0 m".to_string()]);
    }

    #[test]
    fn slider_defaults_match_parameters() {
        let params = crate::SimulationParameters::default();
        let find = |name: &str| slider_ranges().iter().find(|(n, _)| *n == name).map(|(_, r)| *r);
        assert_eq!(find("friction").map(|r| r.default), Some(params.friction_coefficient));
        assert_eq!(find("maxDistance").map(|r| r.default), Some(params.track_length));
        for (_, r) in slider_ranges() {
            assert!(r.min <= r.default && r.default <= r.max);
        }
    }
}
