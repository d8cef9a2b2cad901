// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, initial_bearing, Graph, Node, RouteError};

/// Way name used for steps along edges which are missing or unnamed.
pub const UNKNOWN_ROAD: &str = "unknown road";

/// Maneuver to perform at the beginning of a [NavigationDirection].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Start,
    Straight,
    SlightLeft,
    SlightRight,
    Left,
    Right,
    SharpLeft,
    SharpRight,
}

impl Direction {
    const ALL: [Self; 8] = [
        Self::Start,
        Self::Straight,
        Self::SlightLeft,
        Self::SlightRight,
        Self::Left,
        Self::Right,
        Self::SharpLeft,
        Self::SharpRight,
    ];

    /// Returns the human-readable instruction for this direction.
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Straight => "Go straight",
            Self::SlightLeft => "Slight left",
            Self::SlightRight => "Slight right",
            Self::Left => "Turn left",
            Self::Right => "Turn right",
            Self::SharpLeft => "Sharp left",
            Self::SharpRight => "Sharp right",
        }
    }

    /// Inverse of [Direction::label].
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }

    /// Classifies a turn by its relative bearing, in degrees within `(-180, 180]`.
    /// Negative bearings turn left, positive ones turn right.
    pub fn from_relative_bearing(bearing: f64) -> Self {
        let magnitude = bearing.abs();
        let left = bearing < 0.0;

        if magnitude < 15.0 {
            Self::Straight
        } else if magnitude < 30.0 {
            if left {
                Self::SlightLeft
            } else {
                Self::SlightRight
            }
        } else if magnitude < 100.0 {
            if left {
                Self::Left
            } else {
                Self::Right
            }
        } else if left {
            Self::SharpLeft
        } else {
            Self::SharpRight
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single turn-by-turn step: perform `direction` onto `way`,
/// and follow it for `distance` miles.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationDirection {
    pub direction: Direction,
    pub way: String,
    pub distance: f64,
}

impl NavigationDirection {
    /// Parses the [Display](std::fmt::Display) representation of a direction,
    /// e.g. `"Turn left on Oak Ave and continue for 0.690 miles."`.
    ///
    /// Returns `None` if the string is malformed.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_suffix(" miles.")?;
        let (head, distance) = rest.rsplit_once(" and continue for ")?;
        let (label, way) = head.split_once(" on ")?;

        if distance.is_empty() || !distance.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return None;
        }

        Some(Self {
            direction: Direction::from_label(label)?,
            way: way.to_string(),
            distance: distance.parse().ok()?,
        })
    }
}

impl std::fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} on {} and continue for {:.3} miles.",
            self.direction, self.way, self.distance
        )
    }
}

/// Normalizes the difference between two bearings into `(-180, 180]`.
fn relative_bearing(heading: f64, bearing: f64) -> f64 {
    let mut relative = (bearing - heading) % 360.0;
    if relative <= -180.0 {
        relative += 360.0;
    }
    if relative > 180.0 {
        relative -= 360.0;
    }
    relative
}

fn way_name(g: &Graph, from: &Node, to: &Node) -> String {
    match g.get_edge(from.id, to.id) {
        Some(edge) if !edge.name.is_empty() => edge.name.clone(),
        _ => UNKNOWN_ROAD.to_string(),
    }
}

fn leg_bearing(from: &Node, to: &Node) -> f64 {
    initial_bearing(from.lat, from.lon, to.lat, to.lon)
}

fn leg_distance(from: &Node, to: &Node) -> f64 {
    earth_distance(from.lat, from.lon, to.lat, to.lon)
}

/// Converts a route (as returned by [find_route](crate::find_route)) into turn-by-turn
/// directions. A new direction starts whenever the name of the followed way changes;
/// the first direction is always [Direction::Start].
///
/// Fails if the route has fewer than 2 nodes, or references a node missing from the graph.
pub fn route_directions(
    g: &Graph,
    route: &[i64],
) -> Result<Vec<NavigationDirection>, RouteError> {
    if route.len() < 2 {
        return Err(RouteError::RouteTooShort(route.len()));
    }

    let nodes = route
        .iter()
        .map(|&id| g.get_node(id).ok_or(RouteError::InvalidReference(id)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut directions = Vec::default();
    let mut current = NavigationDirection {
        direction: Direction::Start,
        way: way_name(g, nodes[0], nodes[1]),
        distance: leg_distance(nodes[0], nodes[1]),
    };

    for legs in nodes.windows(3) {
        let (previous, at, next) = (legs[0], legs[1], legs[2]);

        let way = way_name(g, at, next);
        if way != current.way {
            let relative = relative_bearing(leg_bearing(previous, at), leg_bearing(at, next));
            let finished = std::mem::replace(
                &mut current,
                NavigationDirection {
                    direction: Direction::from_relative_bearing(relative),
                    way,
                    distance: 0.0,
                },
            );
            directions.push(finished);
        }

        current.distance += leg_distance(at, next);
    }

    directions.push(current);
    Ok(directions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-6),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn graph_with(nodes: &[(i64, f64, f64)], edges: &[(i64, i64, &str)]) -> Graph {
        let mut g = Graph::new();
        for &(id, lat, lon) in nodes {
            g.set_node(Node::new(id, lat, lon, ""));
        }
        for &(a, b, name) in edges {
            assert!(g.set_edge(a, b, Edge::new(name, "")));
        }
        g
    }

    #[test]
    fn single_edge() {
        let g = graph_with(&[(1, 0.0, 0.0), (2, 1.0, 0.0)], &[(1, 2, "Main St")]);

        let directions = route_directions(&g, &[1, 2]).unwrap();
        assert_eq!(directions.len(), 1);
        assert_eq!(directions[0].direction, Direction::Start);
        assert_eq!(directions[0].way, "Main St");
        assert!((directions[0].distance - 69.0).abs() < 0.2);
    }

    #[test]
    fn straight_single_way() {
        let g = graph_with(
            &[(1, 0.0, 0.0), (2, 0.0, 0.01), (3, 0.001, 0.02)],
            &[(1, 2, "Main St"), (2, 3, "Main St")],
        );

        let directions = route_directions(&g, &[1, 2, 3]).unwrap();
        assert_eq!(directions.len(), 1);
        assert_eq!(directions[0].direction, Direction::Start);
        assert_eq!(directions[0].way, "Main St");
        assert_almost_eq!(
            directions[0].distance,
            g.distance(1, 2).unwrap() + g.distance(2, 3).unwrap()
        );
    }

    #[test]
    fn turns() {
        //         4───5
        //         │
        //   1──2──3
        let g = graph_with(
            &[
                (1, 0.0, 0.0),
                (2, 0.0, 0.01),
                (3, 0.0, 0.02),
                (4, 0.01, 0.02),
                (5, 0.01, 0.03),
            ],
            &[
                (1, 2, "Main St"),
                (2, 3, "Main St"),
                (3, 4, "Oak Ave"),
                (4, 5, "Elm St"),
            ],
        );

        let directions = route_directions(&g, &[1, 2, 3, 4, 5]).unwrap();
        let steps: Vec<(Direction, &str)> = directions
            .iter()
            .map(|d| (d.direction, d.way.as_str()))
            .collect();
        assert_eq!(
            steps,
            vec![
                (Direction::Start, "Main St"),
                (Direction::Left, "Oak Ave"),
                (Direction::Right, "Elm St"),
            ],
        );
        assert_almost_eq!(directions[1].distance, g.distance(3, 4).unwrap());
        assert_almost_eq!(directions[2].distance, g.distance(4, 5).unwrap());
    }

    #[test]
    fn unknown_road() {
        let g = graph_with(
            &[(1, 0.0, 0.0), (2, 0.0, 0.01), (3, 0.0, 0.02)],
            &[(1, 2, "")],
        );

        let directions = route_directions(&g, &[1, 2, 3]).unwrap();
        assert_eq!(directions.len(), 1);
        assert_eq!(directions[0].way, UNKNOWN_ROAD);
    }

    #[test]
    fn route_too_short() {
        let g = graph_with(&[(1, 0.0, 0.0)], &[]);

        assert_eq!(route_directions(&g, &[]), Err(RouteError::RouteTooShort(0)));
        assert_eq!(route_directions(&g, &[1]), Err(RouteError::RouteTooShort(1)));
    }

    #[test]
    fn route_with_unknown_node() {
        let g = graph_with(&[(1, 0.0, 0.0)], &[]);
        assert_eq!(
            route_directions(&g, &[1, 42]),
            Err(RouteError::InvalidReference(42))
        );
    }

    #[test]
    fn relative_bearings() {
        assert_almost_eq!(relative_bearing(170.0, -170.0), 20.0);
        assert_almost_eq!(relative_bearing(-170.0, 170.0), -20.0);
        assert_almost_eq!(relative_bearing(0.0, 180.0), 180.0);
        assert_almost_eq!(relative_bearing(180.0, 0.0), 180.0);
        assert_almost_eq!(relative_bearing(90.0, 0.0), -90.0);
    }

    #[test]
    fn classify_turns() {
        assert_eq!(Direction::from_relative_bearing(0.0), Direction::Straight);
        assert_eq!(Direction::from_relative_bearing(-14.9), Direction::Straight);
        assert_eq!(Direction::from_relative_bearing(15.0), Direction::SlightRight);
        assert_eq!(Direction::from_relative_bearing(-29.0), Direction::SlightLeft);
        assert_eq!(Direction::from_relative_bearing(30.0), Direction::Right);
        assert_eq!(Direction::from_relative_bearing(-99.9), Direction::Left);
        assert_eq!(Direction::from_relative_bearing(100.0), Direction::SharpRight);
        assert_eq!(Direction::from_relative_bearing(-100.0), Direction::SharpLeft);
        assert_eq!(Direction::from_relative_bearing(180.0), Direction::SharpRight);
    }

    #[test]
    fn display_and_parse() {
        let d = NavigationDirection {
            direction: Direction::SlightLeft,
            way: "Avenue on the Park".to_string(),
            distance: 1.25,
        };

        let text = d.to_string();
        assert_eq!(
            text,
            "Slight left on Avenue on the Park and continue for 1.250 miles."
        );
        assert_eq!(NavigationDirection::parse(&text), Some(d));

        for label in ["Start", "Go straight", "Turn right", "Sharp left"] {
            let text = format!("{} on Main St and continue for 0.500 miles.", label);
            let parsed = NavigationDirection::parse(&text).unwrap();
            assert_eq!(parsed.direction.label(), label);
            assert_eq!(parsed.way, "Main St");
            assert_eq!(parsed.distance, 0.5);
        }
    }

    #[test]
    fn parse_malformed() {
        for text in [
            "",
            "Start on Main St",
            "Start on Main St and continue for 1.0 miles",
            "Fly on Main St and continue for 1.0 miles.",
            "Start on Main St and continue for -1.0 miles.",
            "Start on Main St and continue for 1.0.0 miles.",
            "Start on Main St and continue for  miles.",
            "Start Main St and continue for 1.0 miles.",
        ] {
            assert_eq!(NavigationDirection::parse(text), None, "{:?}", text);
        }
    }
}
