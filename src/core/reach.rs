// path existence between annotated vertices
use std::collections::{HashMap, VecDeque};

use petgraph::algo::astar;

use crate::core::graph::DependenceGraph;
use crate::core::types::VertexId;

/// Answers "is there a directed path from `from` to `to`" and returns one shortest witness.
/// A vertex always reaches itself (zero-length path `[from]`).
pub trait PathFinder {
    fn find_path(&mut self, graph: &DependenceGraph, from: VertexId, to: VertexId) -> Option<Vec<VertexId>>;
}

impl DependenceGraph {
    /// Unweighted shortest path, every edge costs 1.
    pub fn shortest_path(&self, from: VertexId, to: VertexId) -> Option<Vec<VertexId>> {
        if !self.graph.contains_node(from) || !self.graph.contains_node(to) {
            return None;
        }
        astar(&self.graph, from, |n| n == to, |_| 1usize, |_| 0usize).map(|(_, path)| path)
    }
}

/// One independent shortest-path query per call, nothing remembered.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestPath;

impl PathFinder for ShortestPath {
    fn find_path(&mut self, graph: &DependenceGraph, from: VertexId, to: VertexId) -> Option<Vec<VertexId>> {
        graph.shortest_path(from, to)
    }
}

/// Memoises one BFS tree per source vertex.
///
/// The graph must not change between queries; build a fresh cache after reducing.
#[derive(Debug, Default)]
pub struct ReachabilityCache {
    //source -> (reached vertex -> predecessor on a shortest path)
    trees: HashMap<VertexId, HashMap<VertexId, Option<VertexId>>>,
}

impl ReachabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached_sources(&self) -> usize {
        self.trees.len()
    }

    fn tree(&mut self, graph: &DependenceGraph, from: VertexId) -> &HashMap<VertexId, Option<VertexId>> {
        self.trees.entry(from).or_insert_with(|| bfs_tree(graph, from))
    }
}

impl PathFinder for ReachabilityCache {
    fn find_path(&mut self, graph: &DependenceGraph, from: VertexId, to: VertexId) -> Option<Vec<VertexId>> {
        let tree = self.tree(graph, from);
        if !tree.contains_key(&to) {
            return None;
        }

        let mut path = vec![to];
        let mut current = to;
        while let Some(&Some(prev)) = tree.get(&current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

fn bfs_tree(graph: &DependenceGraph, from: VertexId) -> HashMap<VertexId, Option<VertexId>> {
    let mut pred = HashMap::new();
    if graph.vertex(from).is_err() {
        return pred;
    }

    pred.insert(from, None);
    let mut queue = VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        for (_, next, _) in graph.outgoing_edges(node) {
            if !pred.contains_key(&next) {
                pred.insert(next, Some(node));
                queue.push_back(next);
            }
        }
    }
    pred
}
