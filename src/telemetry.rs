use std::fmt;

use crate::angle::{normalize_angle, to_degrees};
use crate::session::Session;

/// Labelled readouts describing the current session state.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub rows: Vec<(&'static str, String)>,
}

impl Telemetry {
    pub fn capture(session: &Session) -> Self {
        let map = session.map();
        let cam = session.camera();
        let view = session.view();

        let distance = match view.rays.get(view.rays.len() / 2) {
            None => "N/A".to_string(),
            Some(r) if r.distance.is_finite() => format!("{:.2}", r.distance),
            Some(_) => "inf".to_string(),
        };

        let rows = vec![
            ("grid", format!("{} x {}", map.width(), map.height())),
            ("tile", format!("{}", map.tile_size())),
            (
                "coord",
                format!("{} x {}", view.pos[0] as i64, view.pos[1] as i64),
            ),
            (
                "direction",
                format!("{}°", to_degrees(normalize_angle(view.angle)).round()),
            ),
            ("rotation", format!("{:.1}°", to_degrees(cam.turn_speed))),
            ("movSpeed", format!("{}", cam.move_speed)),
            ("distance", distance),
        ];
        Self { rows }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, value)) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{label} {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::world::GridMap;

    #[test]
    fn reports_pose_and_middle_distance() {
        let map = GridMap::generate_blank(5, 5, 32.0).unwrap();
        let session = Session::new(Config::default(), map).unwrap();
        let t = Telemetry::capture(&session);

        assert_eq!(t.get("grid"), Some("7 x 7"));
        assert_eq!(t.get("tile"), Some("32"));
        assert_eq!(t.get("coord"), Some("112 x 112"));
        assert_eq!(t.get("direction"), Some("90°"));
        assert_eq!(t.get("distance"), Some("80.00"));
        assert!(t.to_string().starts_with("grid 7 x 7 | tile 32"));
    }
}
