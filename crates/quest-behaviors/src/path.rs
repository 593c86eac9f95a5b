//! Search path: a circular queue of waypoints.
//!
//! The front of the queue is the current destination. Reaching it rotates the
//! queue one step left, so a path of N waypoints returns to its original order
//! after N rotations.

use std::collections::{BTreeMap, VecDeque};

use bot_core::Vec3;

use crate::error::ConfigIssue;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchPath {
    waypoints: VecDeque<Vec3>,
}

impl SearchPath {
    pub fn new(waypoints: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
        }
    }

    /// Single-waypoint path, used when no hotspots are configured.
    pub fn single(point: Vec3) -> Self {
        Self::new([point])
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn front(&self) -> Option<Vec3> {
        self.waypoints.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.waypoints.iter().copied()
    }

    /// Moves the front waypoint to the back.
    pub fn rotate(&mut self) {
        if !self.waypoints.is_empty() {
            self.waypoints.rotate_left(1);
        }
    }

    /// Rotates until the waypoint nearest `location` is at the front.
    pub fn rotate_to_nearest(&mut self, location: Vec3) {
        let nearest = self
            .waypoints
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance_sqr(location)
                    .total_cmp(&b.distance_sqr(location))
            })
            .map(|(index, _)| index);
        if let Some(index) = nearest {
            self.waypoints.rotate_left(index);
        }
    }
}

/// Reads `X`/`Y`/`Z` hotspot elements into points.
///
/// A malformed hotspot is reported and skipped; the rest are still parsed.
pub fn parse_hotspots(hotspots: &[BTreeMap<String, String>]) -> (Vec<Vec3>, Vec<ConfigIssue>) {
    let mut points = Vec::with_capacity(hotspots.len());
    let mut issues = Vec::new();

    for (index, hotspot) in hotspots.iter().enumerate() {
        let mut coords = [0.0f32; 3];
        let mut valid = true;
        for (slot, axis) in coords.iter_mut().zip(["X", "Y", "Z"]) {
            let problem = match hotspot.get(axis) {
                None => format!("missing {axis} attribute"),
                Some(raw) => match raw.trim().parse::<f32>() {
                    Ok(value) if value.is_finite() => {
                        *slot = value;
                        continue;
                    }
                    _ => format!("{axis}=\"{raw}\" is not a number"),
                },
            };
            valid = false;
            issues.push(ConfigIssue::Waypoint {
                index,
                element: render_element(hotspot),
                problem,
            });
        }
        if valid {
            points.push(Vec3::new(coords[0], coords[1], coords[2]));
        }
    }

    (points, issues)
}

fn render_element(hotspot: &BTreeMap<String, String>) -> String {
    let attributes = hotspot
        .iter()
        .map(|(key, value)| format!("{key}=\"{value}\""))
        .collect::<Vec<_>>()
        .join(" ");
    format!("<Hotspot {attributes} />")
}
