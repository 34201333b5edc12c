//! Ring perception for layout and bond geometry.
//!
//! Ring closures are first turned into edges. The smallest set of smallest
//! rings is found per ring system (the non-trivial components left after
//! removing all bridges) with Horton candidates filtered for GF(2)
//! independence. Rings that share more than an edge are merged into a
//! bridged ring, which layout places as one unit. The simple rings stay in
//! the arena, flagged, for bond geometry and aromatic circles.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::bond::{BondType, Edge};
use crate::error::GraphError;
use crate::graph::Graph;
use crate::math::DVec2;

#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub id: usize,
    /// Members in cyclic order. For bridged rings, all vertices of the
    /// constituent rings.
    pub members: Vec<usize>,
    pub center: DVec2,
    pub positioned: bool,
    pub is_bridged: bool,
    pub is_part_of_bridged: bool,
    pub is_fused: bool,
    pub is_spiro: bool,
    /// Constituent simple rings of a bridged ring.
    pub sub_rings: Vec<usize>,
}

impl Ring {
    fn new(id: usize, members: Vec<usize>) -> Self {
        Self {
            id,
            members,
            center: DVec2::ZERO,
            positioned: false,
            is_bridged: false,
            is_part_of_bridged: false,
            is_fused: false,
            is_spiro: false,
            sub_rings: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, vertex_id: usize) -> bool {
        self.members.contains(&vertex_id)
    }

    /// Mean position of the members.
    pub fn centroid(&self, graph: &Graph) -> DVec2 {
        if self.members.is_empty() {
            return DVec2::ZERO;
        }
        let sum: DVec2 = self.members.iter().map(|&m| graph.vertex(m).position).sum();
        sum / self.members.len() as f64
    }

    /// Edge ids between cyclically adjacent members.
    pub fn edges(&self, graph: &Graph) -> Vec<usize> {
        let n = self.members.len();
        (0..n)
            .filter_map(|i| graph.edge_id(self.members[i], self.members[(i + 1) % n]))
            .collect()
    }

    /// Every member was written in aromatic form.
    pub fn is_aromatic(&self, graph: &Graph) -> bool {
        self.members
            .iter()
            .all(|&m| graph.vertex(m).value.is_part_of_aromatic_ring)
    }

    /// Six members with three double bonds, or five with two.
    pub fn is_benzene_like(&self, graph: &Graph) -> bool {
        let doubles = self
            .edges(graph)
            .iter()
            .filter(|&&e| graph.edges[e].bond_type == BondType::Double)
            .count();
        (self.size() == 6 && doubles == 3) || (self.size() == 5 && doubles == 2)
    }

    /// Interior angle of the regular polygon drawn for this ring.
    pub fn inner_angle(&self) -> f64 {
        crate::math::inner_angle(self.size())
    }
}

/// Vertices shared between two simple rings.
#[derive(Debug, Clone, PartialEq)]
pub struct RingConnection {
    pub id: usize,
    pub first_ring_id: usize,
    pub second_ring_id: usize,
    pub vertices: BTreeSet<usize>,
}

impl RingConnection {
    fn new(id: usize, first: &Ring, second: &Ring) -> Self {
        let vertices = first
            .members
            .iter()
            .copied()
            .filter(|m| second.contains(*m))
            .collect();
        Self {
            id,
            first_ring_id: first.id,
            second_ring_id: second.id,
            vertices,
        }
    }

    pub fn contains_ring(&self, ring_id: usize) -> bool {
        self.first_ring_id == ring_id || self.second_ring_id == ring_id
    }

    pub fn other(&self, ring_id: usize) -> usize {
        if self.first_ring_id == ring_id {
            self.second_ring_id
        } else {
            self.first_ring_id
        }
    }

    /// More than two shared vertices, or a shared vertex in more than two
    /// rings.
    pub fn is_bridge(&self, graph: &Graph) -> bool {
        self.vertices.len() > 2
            || self
                .vertices
                .iter()
                .any(|&v| graph.vertex(v).value.rings.len() > 2)
    }
}

/// Turns ring-bond descriptors into edges.
///
/// Vertices are scanned from last to first. An explicit non-single symbol on
/// either end sets the closure's bond type, otherwise a single bond is used.
pub fn close_ring_bonds(graph: &mut Graph) -> Result<(), GraphError> {
    let mut open: BTreeMap<u16, (usize, usize, Option<BondType>)> = BTreeMap::new();
    for vertex_id in (0..graph.vertex_count()).rev() {
        let ring_bonds = graph.vertex(vertex_id).value.ring_bonds.clone();
        for (index, ring_bond) in ring_bonds.iter().enumerate() {
            match open.remove(&ring_bond.id) {
                None => {
                    open.insert(ring_bond.id, (vertex_id, index, ring_bond.bond));
                }
                Some((source_id, source_index, source_bond)) => {
                    let bond = closure_bond(source_bond, ring_bond.bond);
                    graph.add_edge(Edge::new(source_id, vertex_id, bond))?;
                    graph.vertex_mut(vertex_id).add_ring_bond_child(source_id, index);
                    graph.vertex_mut(source_id).add_ring_bond_child(vertex_id, source_index);
                }
            }
        }
    }
    Ok(())
}

fn closure_bond(later: Option<BondType>, earlier: Option<BondType>) -> BondType {
    match later {
        Some(bond) if bond != BondType::Single => bond,
        _ => earlier.or(later).unwrap_or(BondType::Single),
    }
}

/// The smallest set of smallest rings, members in cyclic order.
pub fn sssr(graph: &Graph) -> Vec<Vec<usize>> {
    let components = Graph::connected_components(&graph.component_adjacency_matrix());
    let mut rings = Vec::new();
    for mut component in components {
        component.sort_unstable();
        let g = graph.induced_subgraph(&component);
        let expected = expected_ring_count(&g);
        if expected == 0 {
            continue;
        }
        let candidates = horton_candidates(&g);
        for ring in independent_cycles(&candidates, expected, &g) {
            rings.push(ring.into_iter().map(|n| g[n]).collect());
        }
    }
    rings
}

fn expected_ring_count(g: &UnGraph<usize, usize>) -> usize {
    let v = g.node_count();
    let e = g.edge_count();
    let c = connected_components(g);
    (e + c).saturating_sub(v)
}

/// Breadth-first shortest paths from every node. Neighbours are visited in
/// index order so ties resolve the same way on every run.
struct ShortestPaths {
    dist: Vec<Vec<Option<u32>>>,
    parent: Vec<Vec<Option<NodeIndex>>>,
}

impl ShortestPaths {
    fn new(g: &UnGraph<usize, usize>) -> Self {
        let n = g.node_count();
        let mut dist = vec![vec![None; n]; n];
        let mut parent = vec![vec![None; n]; n];
        for source in g.node_indices() {
            let (d, p) = (&mut dist[source.index()], &mut parent[source.index()]);
            d[source.index()] = Some(0);
            let mut queue = VecDeque::from([source]);
            while let Some(cur) = queue.pop_front() {
                let next = d[cur.index()].map_or(0, |x| x + 1);
                let mut neighbours: Vec<NodeIndex> = g.neighbors(cur).collect();
                neighbours.sort_unstable();
                for nb in neighbours {
                    if d[nb.index()].is_none() {
                        d[nb.index()] = Some(next);
                        p[nb.index()] = Some(cur);
                        queue.push_back(nb);
                    }
                }
            }
        }
        Self { dist, parent }
    }

    fn distance(&self, from: NodeIndex, to: NodeIndex) -> Option<u32> {
        self.dist[from.index()][to.index()]
    }

    /// Nodes from `from` to `to`, both included.
    fn path(&self, from: NodeIndex, to: NodeIndex) -> Option<Vec<NodeIndex>> {
        let mut path = vec![to];
        let mut cur = to;
        while cur != from {
            cur = self.parent[from.index()][cur.index()]?;
            path.push(cur);
        }
        path.reverse();
        Some(path)
    }
}

/// Candidate cycles: for every edge `u-v` and node `w`, the shortest paths
/// `w..u` and `w..v` closed by the edge, kept when they meet only at `w`.
/// Sorted by length, duplicates removed.
fn horton_candidates(g: &UnGraph<usize, usize>) -> Vec<Vec<NodeIndex>> {
    let paths = ShortestPaths::new(g);
    let mut candidates: Vec<Vec<NodeIndex>> = Vec::new();

    for edge in g.edge_references() {
        let (u, v) = (edge.source(), edge.target());
        for w in g.node_indices() {
            let (Some(du), Some(dv)) = (paths.distance(w, u), paths.distance(w, v)) else {
                continue;
            };
            if du + dv + 1 < 3 {
                continue;
            }
            let (Some(to_u), Some(to_v)) = (paths.path(w, u), paths.path(w, v)) else {
                continue;
            };
            if to_u[1..].iter().any(|x| to_v[1..].contains(x)) {
                continue;
            }
            let mut cycle = to_u;
            cycle.extend(to_v[1..].iter().rev());
            candidates.push(cycle);
        }
    }

    candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    candidates.dedup();
    candidates
}

/// The edges of a cycle as a bit set over edge indices.
fn edge_set(cycle: &[NodeIndex], g: &UnGraph<usize, usize>) -> Vec<u64> {
    let mut bits = vec![0u64; g.edge_count().div_ceil(64)];
    for (i, &a) in cycle.iter().enumerate() {
        let b = cycle[(i + 1) % cycle.len()];
        if let Some(edge) = g.find_edge(a, b) {
            bits[edge.index() / 64] |= 1u64 << (edge.index() % 64);
        }
    }
    bits
}

fn lowest_bit(bits: &[u64]) -> Option<usize> {
    bits.iter()
        .position(|&w| w != 0)
        .map(|i| i * 64 + bits[i].trailing_zeros() as usize)
}

/// Edge sets reduced over GF(2), keyed by their lowest set bit.
#[derive(Default)]
struct CycleBasis {
    rows: BTreeMap<usize, Vec<u64>>,
}

impl CycleBasis {
    /// Adds `cycle` if no combination of the rows so far produces it.
    fn insert(&mut self, mut cycle: Vec<u64>) -> bool {
        while let Some(pivot) = lowest_bit(&cycle) {
            match self.rows.get(&pivot) {
                Some(row) => {
                    for (c, r) in cycle.iter_mut().zip(row) {
                        *c ^= r;
                    }
                }
                None => {
                    self.rows.insert(pivot, cycle);
                    return true;
                }
            }
        }
        false
    }
}

/// Keeps the shortest candidates that are independent of each other, up to
/// `needed` of them.
fn independent_cycles(
    candidates: &[Vec<NodeIndex>],
    needed: usize,
    g: &UnGraph<usize, usize>,
) -> Vec<Vec<NodeIndex>> {
    let mut basis = CycleBasis::default();
    let mut out = Vec::with_capacity(needed);
    for cycle in candidates {
        if out.len() == needed {
            break;
        }
        if basis.insert(edge_set(cycle, g)) {
            out.push(normalize_ring(cycle));
        }
    }
    out.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    out
}

/// Rotates the cycle to start at its smallest node and walk towards the
/// smaller of the two neighbours.
fn normalize_ring(ring: &[NodeIndex]) -> Vec<NodeIndex> {
    let Some(min_pos) = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
    else {
        return vec![];
    };

    let len = ring.len();
    let mut normalized: Vec<NodeIndex> = (0..len).map(|i| ring[(min_pos + i) % len]).collect();
    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }
    normalized
}

/// All rings of a molecule: simple rings first, bridged rings appended.
#[derive(Debug, Clone, Default)]
pub struct RingSet {
    pub rings: Vec<Ring>,
    /// Connections between simple rings.
    pub connections: Vec<RingConnection>,
}

impl RingSet {
    /// Perceives rings on a graph whose ring closures are already edges
    /// (see [`close_ring_bonds`]) and records membership on the atoms.
    pub fn perceive(graph: &mut Graph) -> RingSet {
        let mut set = RingSet::default();

        for members in sssr(graph) {
            let id = set.rings.len();
            for &m in &members {
                graph.vertex_mut(m).value.rings.push(id);
            }
            set.rings.push(Ring::new(id, members));
        }

        for i in 0..set.rings.len() {
            for j in (i + 1)..set.rings.len() {
                let conn = RingConnection::new(set.connections.len(), &set.rings[i], &set.rings[j]);
                if !conn.vertices.is_empty() {
                    set.connections.push(conn);
                }
            }
        }

        for ring in &set.rings {
            if let Some(&first) = ring.members.first() {
                graph.vertex_mut(first).value.anchored_rings.push(ring.id);
            }
        }

        let simple = set.rings.len();
        loop {
            let candidate = (0..simple).rev().find(|&r| {
                !set.rings[r].is_part_of_bridged && set.is_part_of_bridged_ring(graph, r)
            });
            let Some(ring_id) = candidate else {
                break;
            };
            let involved = set.bridged_ring_rings(graph, ring_id);
            set.create_bridged_ring(graph, &involved);
        }

        debug!(
            rings = simple,
            bridged = set.rings.len() - simple,
            connections = set.connections.len(),
            "perceived rings"
        );
        set
    }

    pub fn ring(&self, id: usize) -> &Ring {
        &self.rings[id]
    }

    pub fn ring_mut(&mut self, id: usize) -> &mut Ring {
        &mut self.rings[id]
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn has_bridged_ring(&self) -> bool {
        self.rings.iter().any(|r| r.is_bridged)
    }

    /// The rings found by perception, excluding merged bridged rings.
    pub fn simple_rings(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter().filter(|r| !r.is_bridged)
    }

    /// The rings layout places: bridged rings stand in for their parts.
    pub fn layout_rings(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter().filter(|r| !r.is_part_of_bridged)
    }

    fn ring_neighbours(&self, ring_id: usize) -> Vec<usize> {
        self.connections
            .iter()
            .filter(|c| c.contains_ring(ring_id))
            .map(|c| c.other(ring_id))
            .collect()
    }

    fn connection(&self, a: usize, b: usize) -> Option<&RingConnection> {
        self.connections
            .iter()
            .find(|c| c.contains_ring(a) && c.contains_ring(b) && a != b)
    }

    fn is_part_of_bridged_ring(&self, graph: &Graph, ring_id: usize) -> bool {
        self.connections
            .iter()
            .any(|c| c.contains_ring(ring_id) && c.is_bridge(graph))
    }

    /// All simple rings reachable from `ring_id` over bridge connections.
    fn bridged_ring_rings(&self, graph: &Graph, ring_id: usize) -> Vec<usize> {
        let mut involved = Vec::new();
        let mut stack = vec![ring_id];
        while let Some(r) = stack.pop() {
            if involved.contains(&r) {
                continue;
            }
            involved.push(r);
            let mut next: Vec<usize> = self
                .ring_neighbours(r)
                .into_iter()
                .filter(|&n| {
                    !involved.contains(&n)
                        && self.connection(r, n).is_some_and(|c| c.is_bridge(graph))
                })
                .collect();
            next.reverse();
            stack.extend(next);
        }
        involved
    }

    /// Number of simple rings containing both ends of an edge.
    pub fn edge_ring_count(&self, graph: &Graph, edge_id: usize) -> usize {
        let edge = &graph.edges[edge_id];
        let a = &graph.vertex(edge.source_id).value.rings;
        let b = &graph.vertex(edge.target_id).value.rings;
        a.iter().filter(|r| b.contains(r)).count()
    }

    fn create_bridged_ring(&mut self, graph: &mut Graph, ring_ids: &[usize]) {
        let mut members: Vec<usize> = Vec::new();
        for &r in ring_ids {
            self.rings[r].is_part_of_bridged = true;
            for &m in &self.rings[r].members {
                if !members.contains(&m) {
                    members.push(m);
                }
            }
        }

        for &id in &members {
            let rings = &graph.vertex(id).value.rings;
            let in_involved = rings.iter().filter(|r| ring_ids.contains(r)).count();
            if rings.len() == 1 || in_involved == 1 {
                continue;
            }
            let on_periphery = graph
                .vertex(id)
                .edges
                .iter()
                .any(|&e| self.edge_ring_count(graph, e) == 1);
            if !on_periphery {
                graph.vertex_mut(id).value.is_bridge = true;
            }
        }

        let id = self.rings.len();
        let mut ring = Ring::new(id, members);
        ring.is_bridged = true;
        ring.sub_rings = ring_ids.to_vec();
        for &m in &ring.members {
            graph.vertex_mut(m).value.bridged_ring = Some(id);
        }
        self.rings.push(ring);
    }

    /// Rings layout sees a vertex in: its simple rings that are not merged,
    /// plus its bridged ring.
    pub fn layout_rings_of(&self, graph: &Graph, vertex_id: usize) -> Vec<usize> {
        let atom = &graph.vertex(vertex_id).value;
        let mut out: Vec<usize> = atom
            .rings
            .iter()
            .copied()
            .filter(|&r| !self.rings[r].is_part_of_bridged)
            .collect();
        if let Some(b) = atom.bridged_ring {
            out.push(b);
        }
        out
    }

    pub fn in_same_layout_ring(&self, graph: &Graph, a: usize, b: usize) -> bool {
        let rb = self.layout_rings_of(graph, b);
        self.layout_rings_of(graph, a).iter().any(|r| rb.contains(r))
    }

    /// Layout rings sharing vertices with `ring_id`, most shared first.
    pub fn ordered_layout_neighbours(&self, ring_id: usize) -> Vec<(usize, Vec<usize>)> {
        let ring = &self.rings[ring_id];
        let mut out: Vec<(usize, Vec<usize>)> = self
            .layout_rings()
            .filter(|other| other.id != ring_id)
            .map(|other| {
                let shared: Vec<usize> = ring
                    .members
                    .iter()
                    .copied()
                    .filter(|m| other.contains(*m))
                    .collect();
                (other.id, shared)
            })
            .filter(|(_, shared)| !shared.is_empty())
            .collect();
        out.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        out
    }

    /// Simple rings containing both vertices.
    pub fn common_rings(&self, graph: &Graph, a: usize, b: usize) -> Vec<usize> {
        let rb = &graph.vertex(b).value.rings;
        graph
            .vertex(a)
            .value
            .rings
            .iter()
            .copied()
            .filter(|r| rb.contains(r))
            .collect()
    }

    pub fn in_same_ring(&self, graph: &Graph, a: usize, b: usize) -> bool {
        !self.common_rings(graph, a, b).is_empty()
    }

    /// The largest simple ring containing both vertices. Among rings of
    /// equal size an aromatic or benzene-like ring wins, then the lower id.
    pub fn largest_or_aromatic_common_ring(
        &self,
        graph: &Graph,
        a: usize,
        b: usize,
    ) -> Option<&Ring> {
        self.common_rings(graph, a, b)
            .into_iter()
            .map(|r| &self.rings[r])
            .max_by(|x, y| {
                let ax = x.is_aromatic(graph) || x.is_benzene_like(graph);
                let ay = y.is_aromatic(graph) || y.is_benzene_like(graph);
                x.size()
                    .cmp(&y.size())
                    .then(ax.cmp(&ay))
                    .then(y.id.cmp(&x.id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse;

    fn perceived(smiles: &str) -> (Graph, RingSet) {
        let mut g = Graph::from_parse_tree(&parse(smiles).unwrap(), true);
        close_ring_bonds(&mut g).unwrap();
        let rings = RingSet::perceive(&mut g);
        (g, rings)
    }

    fn sizes(rings: &RingSet) -> Vec<usize> {
        let mut s: Vec<usize> = rings.simple_rings().map(Ring::size).collect();
        s.sort();
        s
    }

    #[test]
    fn closure_edge_and_bond_type() {
        let mut g = Graph::from_parse_tree(&parse("C=1CCCCC1").unwrap(), true);
        close_ring_bonds(&mut g).unwrap();
        assert_eq!(g.edge_count(), 6);
        assert_eq!(g.get_edge(0, 5).unwrap().bond_type, BondType::Double);
        assert_eq!(g.vertex(0).value.bond_count, 3);
        assert_eq!(g.get_edge(0, 1).unwrap().bond_type, BondType::Single);
    }

    #[test]
    fn closure_takes_the_non_single_symbol() {
        for smiles in ["C=1CCCCC-1", "C-1CCCCC=1"] {
            let mut g = Graph::from_parse_tree(&parse(smiles).unwrap(), true);
            close_ring_bonds(&mut g).unwrap();
            assert_eq!(g.get_edge(0, 5).unwrap().bond_type, BondType::Double, "{smiles}");
        }
    }

    #[test]
    fn reused_digit_closes_two_rings() {
        let mut g = Graph::from_parse_tree(&parse("C1CC1C=1CCC1").unwrap(), true);
        close_ring_bonds(&mut g).unwrap();
        assert_eq!(g.get_edge(0, 2).unwrap().bond_type, BondType::Single);
        assert_eq!(g.get_edge(2, 3).unwrap().bond_type, BondType::Single);
        assert_eq!(g.get_edge(3, 6).unwrap().bond_type, BondType::Double);
    }

    #[test]
    fn closure_neighbour_is_not_a_tree_child() {
        let mut g = Graph::from_parse_tree(&parse("C1CC1").unwrap(), true);
        close_ring_bonds(&mut g).unwrap();
        assert!(g.vertex(0).neighbours.contains(&2));
        assert!(!g.vertex(0).spanning_tree_children.contains(&2));
    }

    #[test]
    fn cyclohexane() {
        let (_, rings) = perceived("C1CCCCC1");
        assert_eq!(sizes(&rings), vec![6]);
        assert_eq!(rings.ring(0).members, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn benzene_is_aromatic() {
        let (g, rings) = perceived("c1ccccc1");
        assert_eq!(sizes(&rings), vec![6]);
        assert!(rings.ring(0).is_aromatic(&g));
        assert!(g.edges.iter().all(|e| e.is_part_of_aromatic_ring));
    }

    #[test]
    fn kekule_benzene_is_benzene_like() {
        let (g, rings) = perceived("C1=CC=CC=C1");
        assert!(!rings.ring(0).is_aromatic(&g));
        assert!(rings.ring(0).is_benzene_like(&g));
    }

    #[test]
    fn acyclic() {
        let (_, rings) = perceived("CCCC");
        assert!(rings.is_empty());
    }

    #[test]
    fn naphthalene_is_fused_not_bridged() {
        let (g, rings) = perceived("c1ccc2ccccc2c1");
        assert_eq!(sizes(&rings), vec![6, 6]);
        assert!(!rings.has_bridged_ring());
        assert_eq!(rings.connections.len(), 1);
        assert_eq!(rings.connections[0].vertices.len(), 2);
        let shared: Vec<usize> = rings.connections[0].vertices.iter().copied().collect();
        assert_eq!(rings.common_rings(&g, shared[0], shared[1]).len(), 2);
    }

    #[test]
    fn spiro() {
        let (_, rings) = perceived("C1CCC2(CC1)CCC2");
        assert_eq!(sizes(&rings), vec![4, 6]);
        assert_eq!(rings.connections[0].vertices.len(), 1);
        assert!(!rings.has_bridged_ring());
    }

    #[test]
    fn norbornane_is_bridged() {
        let (g, rings) = perceived("C1CC2CC1CC2");
        assert_eq!(sizes(&rings), vec![5, 5]);
        assert!(rings.has_bridged_ring());
        let bridged = rings.rings.iter().find(|r| r.is_bridged).unwrap();
        assert_eq!(bridged.size(), 7);
        assert_eq!(bridged.sub_rings.len(), 2);
        for &m in &bridged.members {
            assert_eq!(g.vertex(m).value.bridged_ring, Some(bridged.id));
        }
        assert_eq!(rings.layout_rings().count(), 1);
        let bridge = g.vertices.iter().filter(|v| v.value.is_bridge).count();
        assert_eq!(bridge, 1);
    }

    #[test]
    fn dependent_cycle_is_rejected() {
        let mut basis = CycleBasis::default();
        assert!(basis.insert(vec![0b0011]));
        assert!(basis.insert(vec![0b0110]));
        assert!(!basis.insert(vec![0b0101]));
        assert!(!basis.insert(vec![0]));
        assert!(basis.insert(vec![0b1001 | 1 << 63, 1]));
    }

    #[test]
    fn cubane_has_five_rings() {
        let (_, rings) = perceived("C12C3C4C1C5C3C4C25");
        assert_eq!(rings.simple_rings().count(), 5);
        assert!(rings.has_bridged_ring());
    }

    #[test]
    fn largest_common_ring_prefers_size_then_aromatic() {
        // Indane: a benzene fused to a cyclopentane.
        let (g, rings) = perceived("c1ccc2c(c1)CCC2");
        let shared: Vec<usize> = rings.connections[0].vertices.iter().copied().collect();
        let ring = rings
            .largest_or_aromatic_common_ring(&g, shared[0], shared[1])
            .unwrap();
        assert_eq!(ring.size(), 6);
        assert!(rings.largest_or_aromatic_common_ring(&g, 0, 8).is_none());
    }

    #[test]
    fn ring_order_is_cyclic() {
        let (g, rings) = perceived("C1CCC2CCCCC2C1");
        for ring in rings.simple_rings() {
            let n = ring.size();
            for i in 0..n {
                assert!(g.has_edge(ring.members[i], ring.members[(i + 1) % n]));
            }
        }
    }

    #[test]
    fn edge_ring_count_on_fusion_bond() {
        let (g, rings) = perceived("C1CCC2CCCCC2C1");
        let shared: Vec<usize> = rings.connections[0].vertices.iter().copied().collect();
        let edge = g.edge_id(shared[0], shared[1]).unwrap();
        assert_eq!(rings.edge_ring_count(&g, edge), 2);
        assert_eq!(rings.edge_ring_count(&g, g.edge_id(0, 1).unwrap()), 1);
    }
}
