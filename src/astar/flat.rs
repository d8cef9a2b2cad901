// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::{earth_distance, Graph, KDTree, RouteError};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    score: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.score.total_cmp(&other.score).is_eq()
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for QueueItem {}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.score.total_cmp(&self.score)
    }
}

fn reconstruct_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    path
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the shortest route between two nodes in the provided graph.
///
/// The cost of every edge is the great-circle distance between its nodes,
/// and the same distance to the target serves as the (admissible) heuristic.
///
/// Returns an empty vector if there is no route between the two nodes.
/// Concluding that no route exists requires settling every node reachable from the start,
/// which takes O(V log V + E) time in the worst case.
pub fn find_route(g: &Graph, from_id: i64, to_id: i64) -> Result<Vec<i64>, RouteError> {
    let to_node = g
        .get_node(to_id)
        .ok_or(RouteError::InvalidReference(to_id))?;
    let from_node = g
        .get_node(from_id)
        .ok_or(RouteError::InvalidReference(from_id))?;

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut best: HashMap<i64, f64> = HashMap::default();
    let mut settled: HashSet<i64> = HashSet::default();

    queue.push(QueueItem {
        at: from_id,
        score: earth_distance(from_node.lat, from_node.lon, to_node.lat, to_node.lon),
    });
    best.insert(from_id, 0.0);

    while let Some(item) = queue.pop() {
        // Contrary to the wikipedia definition, we might keep multiple items in the queue
        // for the same node. Only the first one to be popped is expanded.
        if settled.contains(&item.at) {
            continue;
        }

        if item.at == to_id {
            log::debug!(
                "route {} -> {} found after settling {} nodes",
                from_id,
                to_id,
                settled.len()
            );
            return Ok(reconstruct_path(&came_from, to_id));
        }

        settled.insert(item.at);

        let Some(node) = g.get_node(item.at) else {
            continue;
        };
        let Some(neighbors) = g.neighbors(item.at) else {
            continue;
        };
        let node_cost = best.get(&item.at).copied().unwrap_or(f64::INFINITY);

        for neighbor_id in neighbors {
            let Some(neighbor) = g.get_node(neighbor_id) else {
                continue;
            };

            // Check if this is the cheapest way to the neighbor
            let neighbor_cost =
                node_cost + earth_distance(node.lat, node.lon, neighbor.lat, neighbor.lon);
            if neighbor_cost >= best.get(&neighbor_id).copied().unwrap_or(f64::INFINITY) {
                continue;
            }

            // Push the new item into the queue
            came_from.insert(neighbor_id, item.at);
            best.insert(neighbor_id, neighbor_cost);
            queue.push(QueueItem {
                at: neighbor_id,
                score: neighbor_cost
                    + earth_distance(neighbor.lat, neighbor.lon, to_node.lat, to_node.lon),
            });
        }
    }

    log::debug!(
        "no route {} -> {} after settling {} nodes",
        from_id,
        to_id,
        settled.len()
    );
    Ok(vec![])
}

/// Finds the shortest route between the nodes closest to the start and end positions.
/// See [find_route].
///
/// Returns an empty vector if the graph is empty or there is no route between the nodes.
pub fn shortest_path(
    g: &Graph,
    start_lat: f64,
    start_lon: f64,
    end_lat: f64,
    end_lon: f64,
) -> Vec<i64> {
    let (Some(start), Some(end)) = (
        g.find_nearest_node(start_lat, start_lon),
        g.find_nearest_node(end_lat, end_lon),
    ) else {
        return vec![];
    };

    // Both ids come from the graph, so the search can't fail
    find_route(g, start.id, end.id).unwrap_or_default()
}

/// Like [shortest_path], but uses a [KDTree] to find the nodes closest to
/// the start and end positions, instead of scanning the whole graph.
///
/// `index` must be built from `g` after it was last modified. Returns an empty vector
/// if there is no route, or if the index refers to nodes missing from the graph.
pub fn shortest_path_indexed(
    g: &Graph,
    index: &KDTree,
    start_lat: f64,
    start_lon: f64,
    end_lat: f64,
    end_lon: f64,
) -> Vec<i64> {
    let start = index.find_nearest_node(start_lat, start_lon);
    let end = index.find_nearest_node(end_lat, end_lon);

    match find_route(g, start, end) {
        Ok(route) => route,
        Err(e) => {
            log::warn!("stale nearest-node index: {}", e);
            vec![]
        }
    }
}
