//! Graph algorithms: bridges, traversals, components and matrices.
//!
//! Every traversal uses an explicit stack or queue. Visitation order is a
//! function of insertion order only.

use std::collections::VecDeque;

use petgraph::algo::floyd_warshall;
use petgraph::graph::{NodeIndex, UnGraph};

use super::Graph;

/// Discovery clock for the bridge search, threaded through one call.
#[derive(Debug, Default)]
struct DfsClock {
    time: usize,
}

impl DfsClock {
    fn tick(&mut self) -> usize {
        let t = self.time;
        self.time += 1;
        t
    }
}

impl Graph {
    /// Vertex ids adjacent to each vertex, ascending.
    pub fn adjacency_list(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.vertices.len()];
        for edge in &self.edges {
            adj[edge.source_id].push(edge.target_id);
            adj[edge.target_id].push(edge.source_id);
        }
        for row in &mut adj {
            row.sort_unstable();
            row.dedup();
        }
        adj
    }

    pub fn adjacency_matrix(&self) -> Vec<Vec<bool>> {
        let n = self.vertices.len();
        let mut m = vec![vec![false; n]; n];
        for edge in &self.edges {
            m[edge.source_id][edge.target_id] = true;
            m[edge.target_id][edge.source_id] = true;
        }
        m
    }

    /// Adjacency matrix with all bridges removed. Its non-trivial connected
    /// components are the ring systems.
    pub fn component_adjacency_matrix(&self) -> Vec<Vec<bool>> {
        let mut m = self.adjacency_matrix();
        for (a, b) in self.bridges() {
            m[a][b] = false;
            m[b][a] = false;
        }
        m
    }

    /// Adjacency among `vertex_ids`, indexed by position in the slice.
    pub fn subgraph_adjacency_matrix(&self, vertex_ids: &[usize]) -> Vec<Vec<bool>> {
        let n = vertex_ids.len();
        let mut m = vec![vec![false; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                if self.has_edge(vertex_ids[i], vertex_ids[j]) {
                    m[i][j] = true;
                    m[j][i] = true;
                }
            }
        }
        m
    }

    /// The subgraph induced by `vertex_ids` as a petgraph graph. Node `i`
    /// carries `vertex_ids[i]`, each edge carries its edge id.
    pub fn induced_subgraph(&self, vertex_ids: &[usize]) -> UnGraph<usize, usize> {
        let mut g = UnGraph::with_capacity(vertex_ids.len(), vertex_ids.len());
        let nodes: Vec<NodeIndex> = vertex_ids.iter().map(|&v| g.add_node(v)).collect();
        for i in 0..vertex_ids.len() {
            for j in (i + 1)..vertex_ids.len() {
                if let Some(edge_id) = self.edge_id(vertex_ids[i], vertex_ids[j]) {
                    g.add_edge(nodes[i], nodes[j], edge_id);
                }
            }
        }
        g
    }

    /// Shortest path lengths (in bonds) between the vertices of the induced
    /// subgraph, indexed by position. Unreachable pairs are infinite.
    pub fn subgraph_distance_matrix(&self, vertex_ids: &[usize]) -> Vec<Vec<f64>> {
        let n = vertex_ids.len();
        let g = self.induced_subgraph(vertex_ids);
        let mut out = vec![vec![f64::INFINITY; n]; n];
        let dist = floyd_warshall(&g, |_| 1.0f64).unwrap_or_default();
        for ((a, b), d) in dist {
            out[a.index()][b.index()] = d;
        }
        for (i, row) in out.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        out
    }

    /// All bridges as `(parent, child)` pairs of the DFS forest, in the order
    /// they are found. Roots are tried in vertex order.
    pub fn bridges(&self) -> Vec<(usize, usize)> {
        let adj = self.adjacency_list();
        let n = adj.len();
        let mut clock = DfsClock::default();
        let mut visited = vec![false; n];
        let mut disc = vec![0usize; n];
        let mut low = vec![0usize; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut bridges = Vec::new();

        for root in 0..n {
            if visited[root] {
                continue;
            }
            // (vertex, index of the next neighbour to look at)
            let mut stack = vec![(root, 0usize)];
            visited[root] = true;
            let t = clock.tick();
            disc[root] = t;
            low[root] = t;

            while let Some(top) = stack.last_mut() {
                let u = top.0;
                let next = adj[u].get(top.1).copied();
                top.1 += 1;
                match next {
                    Some(v) if !visited[v] => {
                        visited[v] = true;
                        parent[v] = Some(u);
                        let t = clock.tick();
                        disc[v] = t;
                        low[v] = t;
                        stack.push((v, 0));
                    }
                    Some(v) => {
                        if parent[u] != Some(v) {
                            low[u] = low[u].min(disc[v]);
                        }
                    }
                    None => {
                        stack.pop();
                        if let Some(p) = parent[u] {
                            low[p] = low[p].min(low[u]);
                            if low[u] > disc[p] {
                                bridges.push((p, u));
                            }
                        }
                    }
                }
            }
        }

        bridges
    }

    /// Whether the edge between `a` and `b` is a bridge.
    pub fn is_bridge_edge(&self, a: usize, b: usize) -> bool {
        self.bridges()
            .iter()
            .any(|&(u, v)| (u == a && v == b) || (u == b && v == a))
    }

    /// Breadth-first walk from `start`, calling `visit` once per reached
    /// vertex in discovery order.
    pub fn traverse_bf<F: FnMut(usize)>(&self, start: usize, mut visit: F) {
        let mut visited = vec![false; self.vertices.len()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        while let Some(current) = queue.pop_front() {
            visit(current);
            for &n in &self.vertices[current].neighbours {
                if !visited[n] {
                    visited[n] = true;
                    queue.push_back(n);
                }
            }
        }
    }

    /// Height of the spanning subtree hanging off `vertex_id` when entered
    /// from `parent_id`; a leaf has depth 1.
    pub fn tree_depth(&self, vertex_id: usize, parent_id: usize) -> usize {
        // Pre-order collection, then children before parents.
        let mut order: Vec<(usize, Vec<usize>)> = Vec::new();
        let mut stack = vec![(vertex_id, parent_id)];
        while let Some((v, p)) = stack.pop() {
            let children = self.vertices[v].spanning_tree_neighbours(Some(p));
            for &c in &children {
                stack.push((c, v));
            }
            order.push((v, children));
        }

        let mut depth = vec![0usize; self.vertices.len()];
        for (v, children) in order.iter().rev() {
            let max = children.iter().map(|&c| depth[c]).max().unwrap_or(0);
            depth[*v] = max + 1;
        }
        depth[vertex_id]
    }

    /// Depth-first walk over all neighbours starting at `vertex_id`, never
    /// stepping back to `parent_id` directly. Stops `max_depth` levels below
    /// the start. With `ignore_first` the start vertex is not reported.
    pub fn traverse_tree<F: FnMut(usize)>(
        &self,
        vertex_id: usize,
        parent_id: Option<usize>,
        max_depth: Option<usize>,
        ignore_first: bool,
        mut visit: F,
    ) {
        let max_depth = max_depth.unwrap_or(usize::MAX - 1);
        let mut visited = vec![false; self.vertices.len()];
        let mut stack = vec![(vertex_id, parent_id, 1usize)];
        while let Some((v, parent, depth)) = stack.pop() {
            if depth > max_depth + 1 || visited[v] {
                continue;
            }
            visited[v] = true;
            if !ignore_first || depth > 1 {
                visit(v);
            }
            let neighbours = self.vertices[v].neighbours_except(parent);
            for &n in neighbours.iter().rev() {
                stack.push((n, Some(v), depth + 1));
            }
        }
    }

    /// Vertex ids reached by [`Graph::traverse_tree`].
    pub fn subtree(&self, vertex_id: usize, parent_id: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.traverse_tree(vertex_id, Some(parent_id), None, false, |v| out.push(v));
        out
    }

    /// Connected components of a symmetric boolean adjacency matrix.
    /// Singletons are dropped.
    pub fn connected_components(matrix: &[Vec<bool>]) -> Vec<Vec<usize>> {
        let n = matrix.len();
        let mut visited = vec![false; n];
        let mut components = Vec::new();
        for start in 0..n {
            if visited[start] {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            visited[start] = true;
            while let Some(v) = stack.pop() {
                component.push(v);
                for (w, &adjacent) in matrix[v].iter().enumerate() {
                    if adjacent && !visited[w] {
                        visited[w] = true;
                        stack.push(w);
                    }
                }
            }
            if component.len() > 1 {
                components.push(component);
            }
        }
        components
    }

    pub fn connected_component_count(matrix: &[Vec<bool>]) -> usize {
        Self::connected_components(matrix).len()
    }
}
