// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Error conditions which may occur during [find_route](crate::find_route)
/// or [route_directions](crate::route_directions).
///
/// Absence of a route is not an error - an empty route is returned instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The start or end nodes don't exist in a graph.
    #[error("invalid node: {0}")]
    InvalidReference(i64),

    /// Directions were requested for a route with fewer than 2 nodes.
    #[error("route must have at least 2 nodes to generate directions, got {0}")]
    RouteTooShort(usize),
}
