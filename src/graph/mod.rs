//! The molecular graph: vertices own atoms, edges are bonds.
//!
//! Ids are positional indices into append-only sequences. A map from vertex
//! id pairs (both directions) to edge ids gives constant-time adjacency
//! lookups.

pub mod algo;

use std::collections::HashMap;

use crate::annotations::Annotations;
use crate::atom::{Atom, Chirality};
use crate::bond::{BondType, Edge};
use crate::error::GraphError;
use crate::math::DVec2;
use crate::parse_tree::{ParseAtom, ParseNode};

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: usize,
    pub value: Atom,
    pub position: DVec2,
    pub previous_position: DVec2,
    /// Tree edge back to the vertex this one was created from.
    pub parent_vertex_id: Option<usize>,
    pub children: Vec<usize>,
    /// Children reached through the parse tree, excluding ring closures.
    pub spanning_tree_children: Vec<usize>,
    pub edges: Vec<usize>,
    pub neighbours: Vec<usize>,
    pub positioned: bool,
    pub force_positioned: bool,
    /// Angle of the bond into this vertex relative to the previous bond.
    pub angle: Option<f64>,
}

impl Vertex {
    pub fn new(value: Atom) -> Self {
        Self {
            id: 0,
            value,
            position: DVec2::ZERO,
            previous_position: DVec2::ZERO,
            parent_vertex_id: None,
            children: Vec::new(),
            spanning_tree_children: Vec::new(),
            edges: Vec::new(),
            neighbours: Vec::new(),
            positioned: false,
            force_positioned: false,
            angle: None,
        }
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    /// A vertex with at most one neighbour.
    pub fn is_terminal(&self) -> bool {
        self.neighbours.len() <= 1
    }

    /// All neighbours except `exclude`.
    pub fn neighbours_except(&self, exclude: Option<usize>) -> Vec<usize> {
        self.neighbours
            .iter()
            .copied()
            .filter(|&n| Some(n) != exclude)
            .collect()
    }

    /// Spanning-tree neighbours (tree children, then parent) except `exclude`.
    pub fn spanning_tree_neighbours(&self, exclude: Option<usize>) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .spanning_tree_children
            .iter()
            .copied()
            .filter(|&c| Some(c) != exclude)
            .collect();
        if let Some(parent) = self.parent_vertex_id {
            if Some(parent) != exclude {
                out.push(parent);
            }
        }
        out
    }

    /// Direction of the bond arriving at this vertex.
    pub fn incoming_angle(&self) -> f64 {
        (self.position - self.previous_position).to_angle()
    }

    fn set_parent(&mut self, parent_id: usize) {
        self.parent_vertex_id = Some(parent_id);
        self.neighbours.push(parent_id);
    }

    fn add_child(&mut self, child_id: usize) {
        self.children.push(child_id);
        self.neighbours.push(child_id);
        self.spanning_tree_children.push(child_id);
    }

    /// Registers the partner of a ring closure. For chiral bracket atoms the
    /// partner is slotted where it was written: after the parent and the
    /// bracket hydrogens, in ring-bond order.
    pub(crate) fn add_ring_bond_child(&mut self, vertex_id: usize, ring_bond_index: usize) {
        self.children.push(vertex_id);
        if self.value.is_stereo_center {
            let slot = usize::from(self.parent_vertex_id.is_some())
                + self.value.bracket_hcount() as usize
                + ring_bond_index;
            let slot = slot.min(self.neighbours.len());
            self.neighbours.insert(slot, vertex_id);
        } else {
            self.neighbours.push(vertex_id);
        }
    }
}

/// Counter threaded through construction in place of a graph-wide field.
#[derive(Debug, Default)]
struct BuildState {
    atom_idx: usize,
}

enum BuildFrame<'a> {
    Node {
        node: &'a ParseNode,
        parent: Option<usize>,
        is_branch: bool,
    },
    /// Implicit hydrogen spawned by a stereocenter.
    Hydrogen { parent: usize },
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    /// Heavy-atom index to vertex id.
    pub atom_idx_to_vertex_id: Vec<usize>,
    pub annotations: Annotations,
    vertex_ids_to_edge_id: HashMap<(usize, usize), usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph by a depth-first walk over the parse tree.
    ///
    /// Per node the visit order is: stereo hydrogens, branches in order,
    /// then the chain continuation. This order fixes vertex ids. Ring
    /// closures are left as descriptors on the atoms. With `isomeric` off,
    /// chirality markers are ignored.
    pub fn from_parse_tree(tree: &ParseNode, isomeric: bool) -> Self {
        let mut graph = Graph::new();
        let mut state = BuildState::default();
        let mut stack = vec![BuildFrame::Node {
            node: tree,
            parent: None,
            is_branch: false,
        }];

        while let Some(frame) = stack.pop() {
            match frame {
                BuildFrame::Node {
                    node,
                    parent,
                    is_branch,
                } => {
                    let id = graph.push_node(&mut state, node, parent, is_branch);
                    let mut pending = Vec::new();
                    let atom = &graph.vertices[id].value;
                    if isomeric && atom.bracket.is_some() && atom.chirality() != Chirality::None {
                        let hcount = atom.bracket_hcount();
                        graph.vertices[id].value.is_stereo_center = true;
                        graph.vertices[id].value.has_hydrogen = hcount > 0;
                        for _ in 0..hcount {
                            pending.push(BuildFrame::Hydrogen { parent: id });
                        }
                    }
                    for branch in &node.branches {
                        pending.push(BuildFrame::Node {
                            node: branch,
                            parent: Some(id),
                            is_branch: true,
                        });
                    }
                    if let Some(next) = &node.next {
                        pending.push(BuildFrame::Node {
                            node: next,
                            parent: Some(id),
                            is_branch: false,
                        });
                    }
                    stack.extend(pending.into_iter().rev());
                }
                BuildFrame::Hydrogen { parent } => {
                    let hydrogen = ParseNode::new(ParseAtom::bare("H"));
                    graph.push_node(&mut state, &hydrogen, Some(parent), true);
                }
            }
        }

        graph
    }

    fn push_node(
        &mut self,
        state: &mut BuildState,
        node: &ParseNode,
        parent: Option<usize>,
        is_branch: bool,
    ) -> usize {
        let mut atom = Atom::from_parse_atom(&node.atom);
        if atom.element != "H" || (!node.has_next() && parent.is_none()) {
            atom.idx = Some(state.atom_idx);
            state.atom_idx += 1;
        }
        if is_branch {
            atom.branch_bond = Some(node.bond);
        }
        atom.ring_bonds = node.ring_bonds.clone();

        let has_idx = atom.idx.is_some();
        let id = self.add_vertex(Vertex::new(atom));
        if has_idx {
            self.atom_idx_to_vertex_id.push(id);
        }

        if let Some(parent_id) = parent {
            self.vertices[id].set_parent(parent_id);
            self.vertices[parent_id].add_child(id);
            if !is_branch {
                self.vertices[parent_id].value.bond_type = node.bond;
            }
            let edge = Edge::new(parent_id, id, node.bond);
            // Both endpoints exist: the parent was pushed earlier.
            self.insert_edge(edge);
        }
        id
    }

    /// Appends a vertex; its id is the insertion index.
    pub fn add_vertex(&mut self, mut vertex: Vertex) -> usize {
        let id = self.vertices.len();
        vertex.id = id;
        self.vertices.push(vertex);
        id
    }

    /// Appends an edge, registers both directional keys and adds its weight
    /// to both endpoints' bond counts.
    pub fn add_edge(&mut self, edge: Edge) -> Result<usize, GraphError> {
        let len = self.vertices.len();
        for id in [edge.source_id, edge.target_id] {
            if id >= len {
                return Err(GraphError::VertexOutOfBounds { id, len });
            }
        }
        Ok(self.insert_edge(edge))
    }

    fn insert_edge(&mut self, mut edge: Edge) -> usize {
        let id = self.edges.len();
        edge.id = id;
        let (s, t) = (edge.source_id, edge.target_id);
        edge.is_part_of_aromatic_ring = self.vertices[s].value.is_part_of_aromatic_ring
            && self.vertices[t].value.is_part_of_aromatic_ring;
        let weight = u32::from(edge.weight);
        self.vertex_ids_to_edge_id.insert((s, t), id);
        self.vertex_ids_to_edge_id.insert((t, s), id);
        self.vertices[s].value.bond_count += weight;
        self.vertices[t].value.bond_count += weight;
        self.vertices[s].edges.push(id);
        self.vertices[t].edges.push(id);
        self.edges.push(edge);
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// # Panics
    /// If `id` is out of bounds.
    pub fn vertex(&self, id: usize) -> &Vertex {
        &self.vertices[id]
    }

    /// # Panics
    /// If `id` is out of bounds.
    pub fn vertex_mut(&mut self, id: usize) -> &mut Vertex {
        &mut self.vertices[id]
    }

    pub fn try_vertex(&self, id: usize) -> Result<&Vertex, GraphError> {
        self.vertices.get(id).ok_or(GraphError::VertexOutOfBounds {
            id,
            len: self.vertices.len(),
        })
    }

    pub fn try_edge(&self, id: usize) -> Result<&Edge, GraphError> {
        self.edges.get(id).ok_or(GraphError::EdgeOutOfBounds {
            id,
            len: self.edges.len(),
        })
    }

    pub fn edge_id(&self, a: usize, b: usize) -> Option<usize> {
        self.vertex_ids_to_edge_id.get(&(a, b)).copied()
    }

    pub fn get_edge(&self, a: usize, b: usize) -> Option<&Edge> {
        self.edge_id(a, b).map(|id| &self.edges[id])
    }

    pub fn get_edge_mut(&mut self, a: usize, b: usize) -> Option<&mut Edge> {
        self.edge_id(a, b).map(move |id| &mut self.edges[id])
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.vertex_ids_to_edge_id.contains_key(&(a, b))
    }

    /// Edge ids incident to a vertex, in neighbour order.
    pub fn get_edges(&self, vertex_id: usize) -> Vec<usize> {
        self.vertices[vertex_id]
            .neighbours
            .iter()
            .filter_map(|&n| self.edge_id(vertex_id, n))
            .collect()
    }

    /// Positions of vertices, indexed by vertex id.
    pub fn positions(&self) -> Vec<DVec2> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Mean position of the vertices placed so far.
    pub fn center_of_mass(&self) -> DVec2 {
        let placed: Vec<DVec2> = self
            .vertices
            .iter()
            .filter(|v| v.positioned)
            .map(|v| v.position)
            .collect();
        if placed.is_empty() {
            return DVec2::ZERO;
        }
        let n = placed.len() as f64;
        placed.into_iter().sum::<DVec2>() / n
    }

    /// The chain bond symbol written after this vertex, as used when
    /// deciding straight chains.
    pub fn chain_bond(&self, vertex_id: usize) -> BondType {
        self.vertices[vertex_id].value.bond_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse;

    fn graph(smiles: &str) -> Graph {
        Graph::from_parse_tree(&parse(smiles).unwrap(), true)
    }

    #[test]
    fn ethane() {
        let g = graph("CC");
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 0));
        assert_eq!(g.edge_id(0, 1), g.edge_id(1, 0));
    }

    #[test]
    fn bond_types_propagate_to_edges() {
        let g = graph("CC(=O)C#N");
        assert_eq!(g.get_edge(1, 2).unwrap().bond_type, BondType::Double);
        assert_eq!(g.get_edge(3, 4).unwrap().bond_type, BondType::Triple);
        assert_eq!(g.vertices[2].value.branch_bond, Some(BondType::Double));
        assert_eq!(g.chain_bond(3), BondType::Triple);
    }

    #[test]
    fn bond_count_is_sum_of_weights() {
        let g = graph("C=CC#N");
        for v in &g.vertices {
            let sum: u32 = g
                .get_edges(v.id)
                .iter()
                .map(|&e| u32::from(g.edges[e].weight))
                .sum();
            assert_eq!(v.value.bond_count, sum);
        }
        assert_eq!(g.vertices[2].value.bond_count, 4);
    }

    #[test]
    fn visit_order_branches_before_chain() {
        // C(O)(N)S: branches O and N come before the continuation S.
        let g = graph("C(O)(N)S");
        let elements: Vec<&str> = g.vertices.iter().map(|v| v.value.element.as_str()).collect();
        assert_eq!(elements, vec!["C", "O", "N", "S"]);
        assert_eq!(g.vertices[0].spanning_tree_children, vec![1, 2, 3]);
    }

    #[test]
    fn stereo_center_spawns_hydrogens_first() {
        let g = graph("F[C@H](Cl)Br");
        let center = &g.vertices[1];
        assert!(center.value.is_stereo_center);
        assert_eq!(g.vertices[2].value.element, "H");
        assert_eq!(g.vertices[3].value.element, "Cl");
        assert_eq!(center.neighbours, vec![0, 2, 3, 4]);
        // The spawned hydrogen gets no heavy-atom index.
        assert_eq!(g.atom_idx_to_vertex_id, vec![0, 1, 3, 4]);
    }

    #[test]
    fn non_isomeric_ignores_chirality() {
        let g = Graph::from_parse_tree(&parse("F[C@H](Cl)Br").unwrap(), false);
        assert_eq!(g.vertex_count(), 4);
        assert!(!g.vertices[1].value.is_stereo_center);
    }

    #[test]
    fn ring_closures_are_not_edges_yet() {
        let g = graph("C1CC1");
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.vertices[0].value.ring_bonds.len(), 1);
        assert_eq!(g.vertices[2].value.ring_bonds.len(), 1);
    }

    #[test]
    fn aromatic_flag_needs_both_ends() {
        let g = graph("Cc1ccccc1");
        assert!(!g.get_edge(0, 1).unwrap().is_part_of_aromatic_ring);
        assert!(g.get_edge(1, 2).unwrap().is_part_of_aromatic_ring);
    }

    #[test]
    fn add_edge_rejects_unknown_vertices() {
        let mut g = graph("CC");
        let err = g.add_edge(Edge::new(0, 7, BondType::Single)).unwrap_err();
        assert_eq!(err, GraphError::VertexOutOfBounds { id: 7, len: 2 });
        assert!(g.try_vertex(2).is_err());
        assert!(g.try_edge(0).is_ok());
    }

    #[test]
    fn lone_hydrogen_keeps_an_index() {
        assert_eq!(graph("[H]").vertices[0].value.idx, Some(0));
        let g = graph("[H][H]");
        assert_eq!(g.vertices[0].value.idx, None);
        assert_eq!(g.vertices[1].value.idx, None);
        assert!(g.atom_idx_to_vertex_id.is_empty());
    }
}
