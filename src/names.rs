// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Reduces a display name to its search key: every character which is not
/// an ASCII letter or a space is dropped, and letters are lowercased.
///
/// ```
/// assert_eq!(slippyroute::clean_name("Peet's Coffee & Tea"), "peets coffee  tea");
/// ```
pub fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
