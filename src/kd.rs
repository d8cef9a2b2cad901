// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, Graph, Node};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    id: i64,
    lat: f64,
    lon: f64,
}

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// which can be used to speed up nearest-node search for large graphs.
/// [Graph::find_nearest_node] scans every node, which dominates the cost of
/// [shortest_path](crate::shortest_path) on big datasets. A k-d tree trades memory for CPU time.
///
/// The tree is a snapshot - it is not updated when the graph changes.
/// Pass it to [shortest_path_indexed](crate::shortest_path_indexed) to route between positions.
///
/// This implementation assumes euclidean geometry for splitting, even though distances
/// are measured with [earth_distance]. Results may be off close to the antimeridian
/// or the poles.
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: Point,
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Finds the id of the closest node to the given position.
    pub fn find_nearest_node(&self, lat: f64, lon: f64) -> i64 {
        self.find_nearest_impl(lat, lon, false).0.id
    }

    fn find_nearest_impl(&self, lat: f64, lon: f64, lon_divides: bool) -> (Point, f64) {
        // Start by assuming that pivot is the closest
        let mut best = self.pivot;
        let mut best_dist = earth_distance(lat, lon, best.lat, best.lon);

        let first_left = if lon_divides {
            lon < best.lon
        } else {
            lat < best.lat
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        if let Some(branch) = first {
            let (alt, alt_dist) = branch.find_nearest_impl(lat, lon, !lon_divides);
            if alt_dist < best_dist {
                best = alt;
                best_dist = alt_dist;
            }
        }

        if let Some(branch) = second {
            // A closer node is possible in the second branch if and only if
            // the splitting axis is closer than the current best candidate.
            let (axis_lat, axis_lon) = if lon_divides {
                (lat, self.pivot.lon)
            } else {
                (self.pivot.lat, lon)
            };

            if earth_distance(lat, lon, axis_lat, axis_lon) < best_dist {
                let (alt, alt_dist) = branch.find_nearest_impl(lat, lon, !lon_divides);
                if alt_dist < best_dist {
                    best = alt;
                    best_dist = alt_dist;
                }
            }
        }

        (best, best_dist)
    }

    /// Builds a k-d tree over all nodes of a [Graph].
    /// Returns `None` for an empty graph.
    pub fn from_graph(g: &Graph) -> Option<Self> {
        Self::from_nodes(g.iter())
    }

    /// Builds a k-d tree from an iterable of [Nodes](Node).
    pub fn from_nodes<'a, I: IntoIterator<Item = &'a Node>>(nodes: I) -> Option<Self> {
        let mut points: Vec<Point> = nodes
            .into_iter()
            .map(|n| Point {
                id: n.id,
                lat: n.lat,
                lon: n.lon,
            })
            .collect();
        Self::build(&mut points, false)
    }

    fn build(points: &mut [Point], lon_divides: bool) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        if lon_divides {
            points.sort_by(|a, b| a.lon.total_cmp(&b.lon));
        } else {
            points.sort_by(|a, b| a.lat.total_cmp(&b.lat));
        }

        let median = points.len() / 2;
        let pivot = points[median];
        let (left, right_and_pivot) = points.split_at_mut(median);
        Some(Self {
            pivot,
            left: Self::build(left, !lon_divides).map(Box::new),
            right: Self::build(&mut right_and_pivot[1..], !lon_divides).map(Box::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_graph() -> Graph {
        let mut g = Graph::new();
        let coords = [
            (0.01, 0.01),
            (0.01, 0.05),
            (0.03, 0.09),
            (0.04, 0.03),
            (0.04, 0.07),
            (0.07, 0.03),
            (0.07, 0.01),
            (0.08, 0.05),
            (0.08, 0.09),
        ];
        for (i, &(lat, lon)) in coords.iter().enumerate() {
            g.set_node(Node::new(i as i64 + 1, lat, lon, ""));
        }
        g
    }

    #[test]
    fn kd_tree() {
        let tree = KDTree::from_graph(&grid_graph())
            .expect("k-d tree from non-empty graph must not be empty");

        assert_eq!(tree.find_nearest_node(0.02, 0.02), 1);
        assert_eq!(tree.find_nearest_node(0.05, 0.03), 4);
        assert_eq!(tree.find_nearest_node(0.05, 0.08), 5);
        assert_eq!(tree.find_nearest_node(0.09, 0.06), 8);
    }

    #[test]
    fn matches_linear_scan() {
        let g = grid_graph();
        let tree = KDTree::from_graph(&g).unwrap();

        for i in 0..20 {
            for j in 0..20 {
                let lat = i as f64 * 0.005 + 0.0013;
                let lon = j as f64 * 0.005 + 0.0007;
                assert_eq!(
                    tree.find_nearest_node(lat, lon),
                    g.find_nearest_node(lat, lon).unwrap().id,
                    "at {}, {}",
                    lat,
                    lon
                );
            }
        }
    }

    #[test]
    fn empty_graph() {
        assert!(KDTree::from_graph(&Graph::new()).is_none());
    }
}
