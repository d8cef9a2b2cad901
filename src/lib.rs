// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Backend logic of a slippy-map service: routing, autocomplete and tile rastering.
//!
//! A road network is stored as a weighted undirected [Graph], populated by an external
//! loader through [Graph::set_node] and [Graph::set_edge]. Routes are found with A*
//! ([find_route], [shortest_path]) and turned into turn-by-turn [directions](route_directions).
//! Points of interest are searchable by name prefix ([Graph::locations_by_prefix]),
//! and [rasterize] picks the grid of map tiles to display for a viewport.
//!
//! # Example
//!
//! ```
//! use slippyroute::{Edge, Graph, Node};
//!
//! let mut g = Graph::new();
//! g.set_node(Node::new(1, 0.0, 0.0, "Home"));
//! g.set_node(Node::new(2, 1.0, 0.0, "Work"));
//! g.set_edge(1, 2, Edge::new("Main St", ""));
//! g.prune();
//!
//! let route = slippyroute::shortest_path(&g, 0.0, 0.01, 0.99, 0.0);
//! assert_eq!(route, vec![1, 2]);
//!
//! let directions = slippyroute::route_directions(&g, &route).unwrap();
//! println!("{}", directions[0]); // Start on Main St and continue for 69.167 miles.
//!
//! assert_eq!(g.locations_by_prefix("wo"), vec!["Work"]);
//! ```

mod astar;
mod distance;
mod graph;
mod kd;
mod names;
pub mod raster;
mod trie;

pub use astar::{
    find_route, route_directions, shortest_path, shortest_path_indexed, Direction,
    NavigationDirection, RouteError, UNKNOWN_ROAD,
};
pub use distance::{earth_distance, initial_bearing};
pub use graph::Graph;
pub use kd::KDTree;
pub use names::clean_name;
pub use raster::rasterize;
pub use trie::Trie;

/// Represents a point of the road network: an intersection, a point along a road,
/// or a named location.
///
/// `id` must be unique within a [Graph]. `name` may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

impl Node {
    pub fn new(id: i64, lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self {
            id,
            lat,
            lon,
            name: name.into(),
        }
    }
}

/// Represents an undirected road segment between two [Nodes](Node).
///
/// The cost of traversing an edge is always the great-circle distance between its nodes;
/// `max_speed` is informational only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Edge {
    pub name: String,
    pub max_speed: String,
}

impl Edge {
    pub fn new(name: impl Into<String>, max_speed: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_speed: max_speed.into(),
        }
    }
}
