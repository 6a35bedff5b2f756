use std::time::Instant;

use log::trace;

use super::ColoredGraph;
use super::VertexColor;
use crate::containers::UnionFind;
use crate::create_statistics_struct;
use crate::statistics::QueryStatistic;

create_statistics_struct!(
    /// The work done by a [`SearchCanonizer`] over its lifetime.
    CanonizerStatistics {
        canonizations: QueryStatistic,
        num_search_nodes: usize,
        num_leaves: usize,
        num_automorphisms: usize,
    }
);

/// The graph permuted by its canonical labeling. Two graphs are isomorphic if and only if their
/// canonical forms are equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalForm {
    colors: Vec<VertexColor>,
    edges: Vec<(u32, u32)>,
}

impl CanonicalForm {
    fn new(graph: &ColoredGraph, labeling: &[u32]) -> CanonicalForm {
        let mut colors = graph.colors().to_vec();
        for (vertex, &color) in graph.colors().iter().enumerate() {
            colors[labeling[vertex] as usize] = color;
        }

        let mut edges = graph
            .edges()
            .iter()
            .map(|&(from, to)| (labeling[from as usize], labeling[to as usize]))
            .collect::<Vec<_>>();
        edges.sort_unstable();

        CanonicalForm { colors, edges }
    }
}

/// The outcome of canonizing a graph.
#[derive(Clone, Debug)]
pub struct CanonicalLabeling {
    /// `labeling[v]` is the position of vertex `v` in the canonical form.
    pub labeling: Vec<u32>,
    /// Automorphisms encountered during the search; `automorphism[v]` is the image of `v`.
    ///
    /// They generate a subgroup of the automorphism group which is large enough to have pruned
    /// the search, in practice often the whole group.
    pub automorphisms: Vec<Vec<u32>>,
    pub form: CanonicalForm,
}

impl CanonicalLabeling {
    /// For every vertex, the smallest vertex in its orbit under the found automorphisms.
    pub fn orbits(&self) -> Vec<u32> {
        let mut orbits = UnionFind::new(self.labeling.len());
        for automorphism in &self.automorphisms {
            for (vertex, &image) in automorphism.iter().enumerate() {
                let _ = orbits.union(vertex, image as usize, false);
            }
        }

        (0..self.labeling.len())
            .map(|vertex| orbits.find(vertex).0 as u32)
            .collect()
    }
}

/// Computes canonical labelings of colored graphs.
pub trait AutomorphismOracle {
    fn canonical_labeling(&mut self, graph: &ColoredGraph) -> CanonicalLabeling;

    fn canonical_form(&mut self, graph: &ColoredGraph) -> CanonicalForm {
        self.canonical_labeling(graph).form
    }

    fn statistics(&self) -> CanonizerStatistics;
}

/// An individualization-refinement canonizer.
///
/// Every node of the search tree holds an equitable ordered partition of the vertices. A
/// non-discrete partition is split by individualizing, in turn, each vertex of its first
/// non-singleton cell and refining again. Discrete partitions are labelings; the one giving the
/// smallest permuted graph is canonical. Leaves that give the same permuted graph reveal
/// automorphisms, which are used to skip children that lie in the same orbit as an explored one.
#[derive(Clone, Debug, Default)]
pub struct SearchCanonizer {
    statistics: CanonizerStatistics,
}

impl AutomorphismOracle for SearchCanonizer {
    fn canonical_labeling(&mut self, graph: &ColoredGraph) -> CanonicalLabeling {
        let start = Instant::now();

        let mut search = Search::new(graph, &mut self.statistics);
        let (cells, num_cells) = rank(graph.colors());
        let (cells, num_cells) = search.refine(cells, num_cells);
        search.explore(cells, num_cells, &mut vec![]);

        let Search {
            best,
            automorphisms,
            ..
        } = search;
        let (form, labeling) = best.expect("every search reaches at least one leaf");

        trace!(
            "canonized a graph with {} vertices, {} automorphisms found",
            graph.num_vertices(),
            automorphisms.len()
        );
        self.statistics.canonizations.record(start);

        CanonicalLabeling {
            labeling,
            automorphisms,
            form,
        }
    }

    fn statistics(&self) -> CanonizerStatistics {
        self.statistics
    }
}

/// Replaces every key by the rank of its value among the distinct values, returning the ranks
/// and the number of distinct values.
fn rank<T: Ord>(keys: &[T]) -> (Vec<u32>, usize) {
    let mut distinct = keys.iter().collect::<Vec<_>>();
    distinct.sort_unstable();
    distinct.dedup();

    let ranks = keys
        .iter()
        .map(|key| {
            distinct
                .binary_search(&key)
                .expect("every key is among the distinct keys") as u32
        })
        .collect();

    (ranks, distinct.len())
}

struct Search<'a> {
    graph: &'a ColoredGraph,
    outgoing: Vec<Vec<u32>>,
    incoming: Vec<Vec<u32>>,
    first: Option<(CanonicalForm, Vec<u32>)>,
    best: Option<(CanonicalForm, Vec<u32>)>,
    automorphisms: Vec<Vec<u32>>,
    statistics: &'a mut CanonizerStatistics,
}

impl<'a> Search<'a> {
    fn new(graph: &'a ColoredGraph, statistics: &'a mut CanonizerStatistics) -> Search<'a> {
        let mut outgoing = vec![vec![]; graph.num_vertices()];
        let mut incoming = vec![vec![]; graph.num_vertices()];
        for &(from, to) in graph.edges() {
            outgoing[from as usize].push(to);
            incoming[to as usize].push(from);
        }

        Search {
            graph,
            outgoing,
            incoming,
            first: None,
            best: None,
            automorphisms: vec![],
            statistics,
        }
    }

    /// Splits cells by the multisets of cells adjacent to their vertices until the partition is
    /// equitable. Cells keep their relative order, and new cells are ordered by their
    /// adjacency, so the result does not depend on the numbering of the vertices.
    fn refine(&self, mut cells: Vec<u32>, mut num_cells: usize) -> (Vec<u32>, usize) {
        loop {
            let signatures = (0..cells.len())
                .map(|vertex| {
                    let mut successors = self.outgoing[vertex]
                        .iter()
                        .map(|&other| cells[other as usize])
                        .collect::<Vec<_>>();
                    successors.sort_unstable();
                    let mut predecessors = self.incoming[vertex]
                        .iter()
                        .map(|&other| cells[other as usize])
                        .collect::<Vec<_>>();
                    predecessors.sort_unstable();
                    (cells[vertex], successors, predecessors)
                })
                .collect::<Vec<_>>();

            let (refined, num_refined) = rank(&signatures);
            if num_refined == num_cells {
                return (cells, num_cells);
            }
            cells = refined;
            num_cells = num_refined;
        }
    }

    fn explore(&mut self, cells: Vec<u32>, num_cells: usize, path: &mut Vec<u32>) {
        self.statistics.num_search_nodes += 1;

        if num_cells == cells.len() {
            self.leaf(cells);
            return;
        }

        let mut sizes = vec![0_usize; num_cells];
        for &cell in &cells {
            sizes[cell as usize] += 1;
        }
        let target = sizes
            .iter()
            .position(|&size| size > 1)
            .expect("a partition which is not discrete has a cell with two vertices")
            as u32;

        let candidates = (0..cells.len() as u32)
            .filter(|&vertex| cells[vertex as usize] == target)
            .collect::<Vec<_>>();
        let mut explored: Vec<u32> = vec![];

        for vertex in candidates {
            if self.in_explored_orbit(vertex, &explored, path) {
                continue;
            }
            explored.push(vertex);

            let individualized = cells
                .iter()
                .enumerate()
                .map(|(other, &cell)| {
                    2 * cell + u32::from(cell == target && other as u32 != vertex)
                })
                .collect::<Vec<_>>();
            let (individualized, num_individualized) = rank(&individualized);
            let (refined, num_refined) = self.refine(individualized, num_individualized);

            path.push(vertex);
            self.explore(refined, num_refined, path);
            let _ = path.pop();
        }
    }

    /// Whether an automorphism fixing every vertex of `path` connects `vertex` to an explored
    /// sibling.
    fn in_explored_orbit(&self, vertex: u32, explored: &[u32], path: &[u32]) -> bool {
        if explored.is_empty() {
            return false;
        }

        let mut orbits = UnionFind::new(self.graph.num_vertices());
        for automorphism in self
            .automorphisms
            .iter()
            .filter(|automorphism| path.iter().all(|&fixed| automorphism[fixed as usize] == fixed))
        {
            for (other, &image) in automorphism.iter().enumerate() {
                let _ = orbits.union(other, image as usize, false);
            }
        }

        explored
            .iter()
            .any(|&sibling| orbits.same_set(sibling as usize, vertex as usize))
    }

    fn leaf(&mut self, labeling: Vec<u32>) {
        self.statistics.num_leaves += 1;
        let form = CanonicalForm::new(self.graph, &labeling);

        let automorphism = [&self.first, &self.best]
            .into_iter()
            .flatten()
            .find(|(known_form, _)| *known_form == form)
            .map(|(_, known_labeling)| {
                let mut inverse = vec![0; known_labeling.len()];
                for (vertex, &label) in known_labeling.iter().enumerate() {
                    inverse[label as usize] = vertex as u32;
                }
                labeling
                    .iter()
                    .map(|&label| inverse[label as usize])
                    .collect::<Vec<_>>()
            });

        if let Some(automorphism) = automorphism {
            let is_identity = automorphism
                .iter()
                .enumerate()
                .all(|(vertex, &image)| vertex as u32 == image);
            if !is_identity {
                self.statistics.num_automorphisms += 1;
                self.automorphisms.push(automorphism);
            }
            return;
        }

        if self.first.is_none() {
            self.first = Some((form.clone(), labeling.clone()));
        }
        let improves = match &self.best {
            Some((best_form, _)) => form < *best_form,
            None => true,
        };
        if improves {
            self.best = Some((form, labeling));
        }
    }
}
