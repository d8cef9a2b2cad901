// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::{BTreeSet, HashMap};

use crate::{clean_name, earth_distance, initial_bearing, Edge, Node, Trie};

/// Canonical display form of a cleaned name,
/// and the original names of all nodes carrying that cleaned name, by node id.
#[derive(Debug, Default, Clone, PartialEq)]
struct IndexedName {
    display: String,
    nodes: BTreeMap<i64, String>,
}

/// Represents a road network as a set of [Nodes](Node)
/// and undirected [Edges](Edge) between them.
///
/// Every edge is stored in the adjacency tables of both of its endpoints,
/// and the two copies are always added and removed together.
///
/// Node names are indexed for exact lookups ([Graph::locations]) and,
/// after [cleaning](crate::clean_name), for prefix search ([Graph::locations_by_prefix]).
/// Nodes removed from the network by [Graph::prune] stay searchable by name,
/// as isolated nodes are usually points of interest rather than parts of roads.
///
/// The graph is meant to be built once by a loader and then queried.
/// Queries never mutate the graph, so a built graph may be shared between threads.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<i64, (Node, BTreeMap<i64, Edge>)>,
    detached: BTreeMap<i64, Node>,
    locations: HashMap<String, BTreeSet<i64>>,
    names: HashMap<String, IndexedName>,
    trie: Trie,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().map(|(node, _)| node)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<&Node> {
        self.nodes.get(&id).map(|(node, _)| node)
    }

    /// Creates or updates a [Node] with `node.id`.
    ///
    /// All edges of an updated node are preserved. A location detached by
    /// [Graph::prune] is brought back into the network.
    /// The node's name is registered for location and prefix search;
    /// if an existing node is renamed, its previous name is unregistered first.
    pub fn set_node(&mut self, node: Node) {
        let previous = match self.nodes.entry(node.id) {
            Entry::Vacant(e) => {
                e.insert((node.clone(), BTreeMap::default()));
                None
            }
            Entry::Occupied(mut e) => Some(std::mem::replace(&mut e.get_mut().0, node.clone())),
        };
        let previous = previous.or_else(|| self.detached.remove(&node.id));

        if let Some(previous) = previous {
            if previous.name == node.name {
                return;
            }
            self.unregister_name(&previous);
        }

        self.register_name(&node);
    }

    /// Deletes a [Node] with a given `id`, together with all of its edges,
    /// and unregisters its name. Locations detached by [Graph::prune] are deleted as well.
    /// Returns the deleted node, or `None` if no such node existed.
    pub fn delete_node(&mut self, id: i64) -> Option<Node> {
        let node = match self.nodes.remove(&id) {
            Some((node, edges)) => {
                for neighbor_id in edges.keys() {
                    if let Some((_, neighbor_edges)) = self.nodes.get_mut(neighbor_id) {
                        neighbor_edges.remove(&id);
                    }
                }
                node
            }
            None => self.detached.remove(&id)?,
        };

        self.unregister_name(&node);
        Some(node)
    }

    /// Creates or replaces the [Edge] between two nodes, in both directions.
    ///
    /// Returns `false` (and leaves the graph unchanged) if either node doesn't exist.
    pub fn set_edge(&mut self, a: i64, b: i64, edge: Edge) -> bool {
        if !self.contains(a) || !self.contains(b) {
            log::warn!("ignoring edge {} - {}: unknown node", a, b);
            return false;
        }

        if let Some((_, edges)) = self.nodes.get_mut(&a) {
            edges.insert(b, edge.clone());
        }
        if let Some((_, edges)) = self.nodes.get_mut(&b) {
            edges.insert(a, edge);
        }
        true
    }

    /// Removes the [Edge] between two nodes, in both directions.
    pub fn delete_edge(&mut self, a: i64, b: i64) -> Option<Edge> {
        let edge = self.nodes.get_mut(&a)?.1.remove(&b)?;
        if let Some((_, edges)) = self.nodes.get_mut(&b) {
            edges.remove(&a);
        }
        Some(edge)
    }

    /// Gets the [Edge] between two nodes, if one exists.
    pub fn get_edge(&self, a: i64, b: i64) -> Option<&Edge> {
        self.nodes.get(&a).and_then(|(_, edges)| edges.get(&b))
    }

    /// Returns ids of all nodes adjacent to `id`, ordered by id.
    ///
    /// Returns `None` if `id` doesn't exist - this is different from an existing
    /// node without any neighbors, for which an empty iterator is returned.
    pub fn neighbors(&self, id: i64) -> Option<impl Iterator<Item = i64> + '_> {
        self.nodes.get(&id).map(|(_, edges)| edges.keys().copied())
    }

    /// Returns the great-circle distance between two nodes, in miles.
    pub fn distance(&self, a: i64, b: i64) -> Option<f64> {
        let a = self.get_node(a)?;
        let b = self.get_node(b)?;
        Some(earth_distance(a.lat, a.lon, b.lat, b.lon))
    }

    /// Returns the initial bearing from one node towards another, in degrees.
    pub fn bearing(&self, a: i64, b: i64) -> Option<f64> {
        let a = self.get_node(a)?;
        let b = self.get_node(b)?;
        Some(initial_bearing(a.lat, a.lon, b.lat, b.lon))
    }

    /// Finds the closest [Node] to the given position.
    ///
    /// This function requires computing the distance to every [Node] in the graph,
    /// and is not suitable for large graphs - see [KDTree](crate::KDTree).
    /// Of multiple equidistant nodes, the one with the smallest id is returned.
    pub fn find_nearest_node(&self, lat: f64, lon: f64) -> Option<&Node> {
        self.iter()
            .map(|nd| (earth_distance(lat, lon, nd.lat, nd.lon), nd))
            .min_by(|(a_dist, _), (b_dist, _)| a_dist.total_cmp(b_dist))
            .map(|(_, nd)| nd)
    }

    /// Removes all nodes without any edges from the network.
    /// Returns the number of removed nodes.
    ///
    /// Loaders should call this after adding all features, as such nodes can't
    /// be a part of any route. This does not guarantee that the remaining graph is connected.
    ///
    /// Removed nodes are no longer returned by [Graph::get_node], [Graph::iter] or
    /// [Graph::find_nearest_node], but remain available through [Graph::locations]
    /// and [Graph::locations_by_prefix].
    pub fn prune(&mut self) -> usize {
        let isolated: Vec<i64> = self
            .nodes
            .iter()
            .filter(|(_, (_, edges))| edges.is_empty())
            .map(|(&id, _)| id)
            .collect();

        for &id in &isolated {
            if let Some((node, _)) = self.nodes.remove(&id) {
                self.detached.insert(id, node);
            }
        }

        log::debug!("pruned {} isolated nodes", isolated.len());
        isolated.len()
    }

    /// Returns all nodes with exactly the provided name, ordered by id.
    /// This includes locations detached by [Graph::prune].
    pub fn locations(&self, name: &str) -> Vec<&Node> {
        self.locations
            .get(name)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.get_node(*id).or_else(|| self.detached.get(id)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns display names of all locations whose cleaned name starts with
    /// the cleaned `prefix`, ordered by the cleaned name.
    pub fn locations_by_prefix(&self, prefix: &str) -> Vec<&str> {
        self.trie
            .words_with_prefix(&clean_name(prefix))
            .iter()
            .filter_map(|cleaned| self.names.get(cleaned))
            .map(|name| name.display.as_str())
            .collect()
    }

    fn register_name(&mut self, node: &Node) {
        self.locations
            .entry(node.name.clone())
            .or_default()
            .insert(node.id);

        let cleaned = clean_name(&node.name);
        if cleaned.is_empty() {
            return;
        }

        self.trie.insert(&cleaned);
        let indexed = self.names.entry(cleaned).or_default();
        indexed.display.clone_from(&node.name);
        indexed.nodes.insert(node.id, node.name.clone());
    }

    fn unregister_name(&mut self, node: &Node) {
        if let Some(ids) = self.locations.get_mut(&node.name) {
            ids.remove(&node.id);
            if ids.is_empty() {
                self.locations.remove(&node.name);
            }
        }

        let cleaned = clean_name(&node.name);
        let Some(indexed) = self.names.get_mut(&cleaned) else {
            return;
        };

        indexed.nodes.remove(&node.id);
        if indexed.nodes.is_empty() {
            self.names.remove(&cleaned);
            self.trie.remove(&cleaned);
        } else if !indexed.nodes.values().any(|name| *name == indexed.display) {
            // The display name must belong to a remaining node
            if let Some(name) = indexed.nodes.values().next() {
                indexed.display = name.clone();
            }
        }
    }
}
