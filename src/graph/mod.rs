//! # Topology Graph
//!
//! Named nodes joined by edges whose weight is computed on demand by a
//! per-edge function, so weights may depend on the endpoints or on the rest
//! of the graph. Used to derive the communication delay of a relation from
//! the network layout.
//!
//! Two searches are provided and deliberately kept apart:
//!
//! - [`Graph::weighted_best_first_path`] - expands the cheapest accumulated
//!   cost first (equal costs in insertion order)
//! - [`Graph::unweighted_bfs_path`] - expands in FIFO order, so it finds the
//!   path with the fewest hops and only reports its accumulated weight
//!
//! Both return `(f64::INFINITY, vec![])` when the target is unreachable.

use crate::error::{Result, TimingError};
use indexmap::{IndexMap, IndexSet};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::io::{Read, Write};
use std::sync::Arc;

const EDGE_DELIMITER: u8 = b' ';
const EDGE_QUOTE: u8 = b'|';

pub type WeightFn<N> = Arc<dyn Fn(&Graph<N>, &N, &N) -> f64 + Send + Sync>;

/// Wraps a plain closure as an edge weight function.
pub fn weight_fn<N: 'static, F>(f: F) -> WeightFn<N>
where
    F: Fn(&Graph<N>, &N, &N) -> f64 + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Weight function returning the same value for every call.
pub fn constant<N: 'static>(weight: f64) -> WeightFn<N> {
    Arc::new(move |_: &Graph<N>, _: &N, _: &N| weight)
}

pub struct Graph<N> {
    adjacency: IndexMap<N, IndexSet<N>>,
    weight_functions: IndexMap<(N, N), WeightFn<N>>,
    directed: bool,
}

/// Search frontier entry; the heap pops the lowest cost, then the earliest push.
struct Frontier<N> {
    cost: f64,
    seq: u64,
    node: N,
    path: Vec<N>,
}

impl<N> PartialEq for Frontier<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N> Eq for Frontier<N> {}

impl<N> PartialOrd for Frontier<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for Frontier<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<N: Eq + Hash + Clone> Graph<N> {
    pub fn new(directed: bool) -> Self {
        Graph {
            adjacency: IndexMap::new(),
            weight_functions: IndexMap::new(),
            directed,
        }
    }

    pub fn with_connections<I>(connections: I, directed: bool) -> Self
    where
        I: IntoIterator<Item = (N, N, WeightFn<N>)>,
    {
        let mut graph = Graph::new(directed);
        graph.add_connections(connections);
        graph
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn add_connections<I>(&mut self, connections: I)
    where
        I: IntoIterator<Item = (N, N, WeightFn<N>)>,
    {
        for (source, target, weight) in connections {
            self.add_connection(source, target, weight);
        }
    }

    /// Adds `source -> target`; undirected graphs also get `target -> source`
    /// sharing the same weight function.
    pub fn add_connection(&mut self, source: N, target: N, weight: WeightFn<N>) {
        self.adjacency.entry(source.clone()).or_default().insert(target.clone());
        if !self.directed {
            self.adjacency.entry(target.clone()).or_default().insert(source.clone());
            self.weight_functions.insert((target.clone(), source.clone()), weight.clone());
        }
        self.weight_functions.insert((source, target), weight);
    }

    /// Drops `node` together with every edge touching it.
    pub fn remove(&mut self, node: &N) {
        self.adjacency.shift_remove(node);
        for neighbours in self.adjacency.values_mut() {
            neighbours.shift_remove(node);
        }
        self.weight_functions
            .retain(|(source, target), _| source != node && target != node);
    }

    pub fn is_connected(&self, source: &N, target: &N) -> bool {
        self.adjacency
            .get(source)
            .is_some_and(|neighbours| neighbours.contains(target))
    }

    pub fn neighbours(&self, node: &N) -> impl Iterator<Item = &N> {
        self.adjacency.get(node).into_iter().flatten()
    }

    /// Weight of the direct edge, or 0 when the nodes are not adjacent.
    pub fn get_weight(&self, source: &N, target: &N) -> f64 {
        if !self.is_connected(source, target) {
            return 0.0;
        }
        match self.weight_functions.get(&(source.clone(), target.clone())) {
            Some(weight) => weight(self, source, target),
            None => 0.0,
        }
    }

    pub fn edge_list(&self) -> Vec<(N, N)> {
        self.adjacency
            .iter()
            .flat_map(|(source, neighbours)| neighbours.iter().map(move |n| (source.clone(), n.clone())))
            .collect()
    }

    /// Every node, in the order it was first seen.
    pub fn node_list(&self) -> Vec<N> {
        let mut nodes: IndexSet<N> = IndexSet::new();
        for (source, neighbours) in &self.adjacency {
            nodes.insert(source.clone());
            nodes.extend(neighbours.iter().cloned());
        }
        nodes.into_iter().collect()
    }

    /// Cheapest path from `source` to `target` and its cost.
    pub fn weighted_best_first_path(&self, source: &N, target: &N) -> (f64, Vec<N>) {
        let mut queue = BinaryHeap::new();
        let mut visited = HashSet::new();
        let mut seq = 0u64;
        queue.push(Frontier {
            cost: 0.0,
            seq,
            node: source.clone(),
            path: Vec::new(),
        });

        while let Some(Frontier { cost, node, mut path, .. }) = queue.pop() {
            if !visited.insert(node.clone()) {
                continue;
            }
            path.push(node.clone());
            if &node == target {
                return (cost, path);
            }
            for neighbour in self.neighbours(&node) {
                if visited.contains(neighbour) {
                    continue;
                }
                seq += 1;
                queue.push(Frontier {
                    cost: cost + self.get_weight(&node, neighbour),
                    seq,
                    node: neighbour.clone(),
                    path: path.clone(),
                });
            }
        }
        (f64::INFINITY, Vec::new())
    }

    /// Path with the fewest hops, reporting the weight accumulated along it.
    pub fn unweighted_bfs_path(&self, source: &N, target: &N) -> (f64, Vec<N>) {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        queue.push_back((0.0, source.clone(), Vec::new()));

        while let Some((cost, node, mut path)) = queue.pop_front() {
            if !visited.insert(node.clone()) {
                continue;
            }
            path.push(node.clone());
            if &node == target {
                return (cost, path);
            }
            for neighbour in self.neighbours(&node) {
                if !visited.contains(neighbour) {
                    queue.push_back((cost + self.get_weight(&node, neighbour), neighbour.clone(), path.clone()));
                }
            }
        }
        (f64::INFINITY, Vec::new())
    }
}

impl<N: Eq + Hash + Clone + fmt::Display> Graph<N> {
    /// Cheapest path cost between two nodes, as a one-way delay.
    pub fn communication_delay(&self, from: &N, to: &N) -> Result<f64> {
        let (cost, path) = self.weighted_best_first_path(from, to);
        if path.is_empty() {
            return Err(TimingError::Unreachable {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(cost)
    }

    /// Writes one `source target weight` row per directed edge. Fields are
    /// space separated; names containing spaces are quoted with `|`.
    pub fn write_edge_list<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .delimiter(EDGE_DELIMITER)
            .quote(EDGE_QUOTE)
            .has_headers(false)
            .from_writer(writer);
        for (source, target) in self.edge_list() {
            let weight = self.get_weight(&source, &target);
            csv.write_record([source.to_string(), target.to_string(), weight.to_string()])?;
        }
        csv.flush()?;
        Ok(())
    }
}

impl Graph<String> {
    /// Rebuilds an undirected graph with constant weights from the format
    /// written by [`Graph::write_edge_list`]. Blank lines are skipped.
    pub fn read_edge_list<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(EDGE_DELIMITER)
            .quote(EDGE_QUOTE)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut graph = Graph::new(false);
        for (index, record) in csv.records().enumerate() {
            let record = record?;
            let line = record.position().map_or(index as u64 + 1, |pos| pos.line());
            let (Some(source), Some(target), Some(weight), None) =
                (record.get(0), record.get(1), record.get(2), record.get(3))
            else {
                return Err(TimingError::invalid(
                    "edge list",
                    format!("line {}: expected 'source target weight'", line),
                ));
            };
            let weight: f64 = weight.parse().map_err(|_| {
                TimingError::invalid("edge list", format!("line {}: bad weight '{}'", line, weight))
            })?;
            graph.add_connection(source.to_string(), target.to_string(), constant(weight));
        }
        Ok(graph)
    }
}

impl<N: Eq + Hash + Clone + fmt::Display> fmt::Display for Graph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (source, target)) in self.edge_list().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {}, {})", source, target, self.get_weight(source, target))?;
        }
        write!(f, "]")
    }
}

impl<N: fmt::Debug> fmt::Debug for Graph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("adjacency", &self.adjacency)
            .field("directed", &self.directed)
            .finish()
    }
}

mod tests;
