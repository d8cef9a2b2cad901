// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod directions;
mod error;
mod flat;

pub use directions::{route_directions, Direction, NavigationDirection, UNKNOWN_ROAD};
pub use error::RouteError;
pub use flat::{find_route, shortest_path, shortest_path_indexed};
