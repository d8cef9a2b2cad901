// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

const ROOT: usize = 0;

#[derive(Debug, Default, Clone)]
struct TrieNode {
    terminal: bool,
    children: BTreeMap<char, usize>,
}

/// Trie implements a [prefix tree](https://en.wikipedia.org/wiki/Trie) over strings,
/// used to answer autocomplete queries.
///
/// Nodes live in a flat arena and refer to their children by index. Children are
/// kept ordered by character, so [Trie::words_with_prefix] returns words in
/// lexicographic order. Lookups, insertion, removal, cloning and dropping never
/// recurse, and thus are unaffected by the length of stored keys.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    free: Vec<usize>,
    len: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            free: Vec::default(),
            len: 0,
        }
    }
}

impl PartialEq for Trie {
    /// Two tries are equal if they store the same words,
    /// regardless of how their arenas are laid out.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.collect_words(ROOT, String::new()) == other.collect_words(ROOT, String::new())
    }
}

impl Eq for Trie {}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct words stored in the trie.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores a word in the trie. Empty words are ignored,
    /// and inserting an already-present word has no effect.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }

        let mut at = ROOT;
        for c in word.chars() {
            at = match self.nodes[at].children.get(&c) {
                Some(&child) => child,
                None => {
                    let child = self.allocate();
                    self.nodes[at].children.insert(c, child);
                    child
                }
            };
        }

        if !self.nodes[at].terminal {
            self.nodes[at].terminal = true;
            self.len += 1;
        }
    }

    /// Checks whether the exact word was stored in the trie.
    pub fn contains(&self, word: &str) -> bool {
        self.find_node(word).is_some_and(|at| self.nodes[at].terminal)
    }

    /// Removes a word from the trie, releasing all nodes which no longer lead
    /// to any stored word. Returns `false` if the word was not stored.
    pub fn remove(&mut self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();

        // Find the deepest node on the path which must survive the removal -
        // either because it terminates another word, or because it branches
        // into other words. The root always survives.
        let mut path = Vec::with_capacity(chars.len() + 1);
        let mut keep_depth = 0;
        let mut at = ROOT;
        path.push(at);
        for (depth, c) in chars.iter().enumerate() {
            let node = &self.nodes[at];
            if node.terminal || node.children.len() > 1 {
                keep_depth = depth;
            }
            match node.children.get(c) {
                Some(&child) => at = child,
                None => return false,
            }
            path.push(at);
        }

        if !self.nodes[at].terminal {
            return false;
        }
        self.len -= 1;

        if !self.nodes[at].children.is_empty() {
            self.nodes[at].terminal = false;
            return true;
        }

        self.nodes[path[keep_depth]]
            .children
            .remove(&chars[keep_depth]);
        for &released in &path[keep_depth + 1..] {
            self.nodes[released] = TrieNode::default();
            self.free.push(released);
        }

        true
    }

    /// Returns all stored words starting with the provided prefix,
    /// in lexicographic order. An empty prefix matches nothing.
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            return vec![];
        }

        match self.find_node(prefix) {
            Some(at) => self.collect_words(at, prefix.to_string()),
            None => vec![],
        }
    }

    /// Collects all words in the subtree of the `start` node,
    /// which is reached by spelling out `prefix`.
    fn collect_words(&self, start: usize, prefix: String) -> Vec<String> {
        let mut words = Vec::default();
        let mut stack = vec![(start, prefix)];

        while let Some((at, mut word)) = stack.pop() {
            let node = &self.nodes[at];
            if node.terminal {
                words.push(word.clone());
            }

            // Push in reverse, so that the smallest character is popped first.
            // The smallest child is pushed last and takes over `word` without a copy.
            let mut children = node.children.iter().rev().peekable();
            while let Some((&c, &child)) = children.next() {
                if children.peek().is_some() {
                    let mut extended = word.clone();
                    extended.push(c);
                    stack.push((child, extended));
                } else {
                    word.push(c);
                    stack.push((child, word));
                    break;
                }
            }
        }

        words
    }

    fn find_node(&self, prefix: &str) -> Option<usize> {
        let mut at = ROOT;
        for c in prefix.chars() {
            at = *self.nodes[at].children.get(&c)?;
        }
        Some(at)
    }

    fn allocate(&mut self) -> usize {
        match self.free.pop() {
            Some(at) => at,
            None => {
                self.nodes.push(TrieNode::default());
                self.nodes.len() - 1
            }
        }
    }
}
