//! Stereocenter annotation on a laid-out graph.
//!
//! Neighbours of a stereocenter are ranked by a breadth-limited walk that
//! collects atomic numbers level by level, a simplified form of the CIP
//! rules. The rank order, the written chirality and the drawn arrangement
//! decide the R/S label and which bonds get solid or dashed wedges.

use tracing::debug;

use crate::atom::{Chirality, Cip};
use crate::bond::Wedge;
use crate::graph::Graph;
use crate::math::{permutation_parity, PlaneExt};
use crate::rings::RingSet;

/// Levels explored when ranking a neighbour.
const MAX_DEPTH: usize = 10;

/// Hides hydrogens unless they sit on a stereocenter in two or more rings,
/// and flags their neighbour as carrying hydrogen. With
/// `explicit_hydrogens` every hydrogen stays visible.
pub fn hide_hydrogens(graph: &mut Graph, explicit_hydrogens: bool) {
    if explicit_hydrogens {
        return;
    }
    let mut hidden = 0;
    for id in 0..graph.vertex_count() {
        if graph.vertex(id).value.element != "H" {
            continue;
        }
        let Some(&neighbour) = graph.vertex(id).neighbours.first() else {
            continue;
        };
        let atom = &mut graph.vertex_mut(neighbour).value;
        atom.has_hydrogen = true;
        if !atom.is_stereo_center || atom.rings.len() < 2 {
            graph.vertex_mut(id).value.is_drawn = false;
            hidden += 1;
        }
    }
    debug!(hidden, "hid hydrogens");
}

/// Priority key of the branch starting at `start` seen from `center`:
/// one list of `parent * 1000 + atomic number` entries per level, each
/// sorted descending. Free valences count as hydrogens one level down.
fn branch_priority(graph: &Graph, start: usize, center: usize) -> Vec<Vec<u32>> {
    let mut levels: Vec<Vec<u32>> = Vec::new();
    let mut visited = vec![false; graph.vertex_count()];
    visited[center] = true;
    // Each path carries its own visited set.
    let mut stack = vec![(start, center, 0usize, 0u32, visited)];

    while let Some((id, previous, depth, parent_number, mut visited)) = stack.pop() {
        visited[id] = true;
        let vertex = graph.vertex(id);
        let number = u32::from(vertex.value.atomic_number());
        if levels.len() <= depth {
            levels.push(Vec::new());
        }
        let weight = graph.get_edge(id, previous).map_or(0, |e| e.weight);
        for _ in 0..weight {
            levels[depth].push(parent_number * 1000 + number);
        }

        if depth + 1 < MAX_DEPTH {
            let bonds: u32 = vertex
                .neighbours
                .iter()
                .filter_map(|&n| graph.get_edge(id, n))
                .map(|e| u32::from(e.weight))
                .sum();
            let free = u32::from(vertex.value.max_bonds()).saturating_sub(bonds);
            if free > 0 {
                if levels.len() <= depth + 1 {
                    levels.push(Vec::new());
                }
                for _ in 0..free {
                    levels[depth + 1].push(number * 1000 + 1);
                }
            }
            for &n in vertex.neighbours.iter().rev() {
                if !visited[n] {
                    stack.push((n, id, depth + 1, number, visited.clone()));
                }
            }
        }
    }

    for level in &mut levels {
        level.sort_unstable_by(|a, b| b.cmp(a));
    }
    levels
}

/// Neighbour indices of a stereocenter, highest priority first.
pub fn rank_neighbours(graph: &Graph, vertex: usize) -> Vec<usize> {
    let neighbours = &graph.vertex(vertex).neighbours;
    let priorities: Vec<Vec<Vec<u32>>> = neighbours
        .iter()
        .map(|&n| branch_priority(graph, n, vertex))
        .collect();

    let max_levels = priorities.iter().map(Vec::len).max().unwrap_or(0);
    let max_entries = priorities
        .iter()
        .flat_map(|p| p.iter().map(Vec::len))
        .max()
        .unwrap_or(0)
        .max(1);

    // Pad to a common shape, then break remaining ties by vertex id.
    let keys: Vec<Vec<u32>> = priorities
        .into_iter()
        .zip(neighbours)
        .map(|(mut levels, &n)| {
            levels.resize(max_levels, Vec::new());
            levels.push(vec![n as u32]);
            levels
                .into_iter()
                .flat_map(|mut level| {
                    level.resize(max_entries, 0);
                    level
                })
                .collect()
        })
        .collect();

    let mut order: Vec<usize> = (0..neighbours.len()).collect();
    order.sort_by(|&a, &b| keys[b].cmp(&keys[a]));
    order
}

/// Assigns R/S labels and wedges to every stereocenter with at least three
/// neighbours.
pub fn annotate_stereochemistry(graph: &mut Graph, rings: &RingSet) {
    let centers: Vec<usize> = graph
        .vertices
        .iter()
        .filter(|v| v.value.is_stereo_center)
        .map(|v| v.id)
        .collect();

    for vertex in centers {
        let neighbours = graph.vertex(vertex).neighbours.clone();
        if neighbours.len() < 3 {
            debug!(vertex, "stereocenter with fewer than three neighbours left unlabelled");
            continue;
        }
        let order = rank_neighbours(graph, vertex);

        let center_pos = graph.vertex(vertex).position;
        let pos_a = graph.vertex(neighbours[order[0]]).position;
        let pos_b = graph.vertex(neighbours[order[1]]).position;
        let is_cw = pos_a.relative_clockwise(pos_b, center_pos) == -1;

        let rotation = match graph.vertex(vertex).value.chirality() {
            Chirality::Ccw => -1,
            _ => 1,
        };
        let cip = if permutation_parity(&order) * rotation == 1 {
            Cip::R
        } else {
            Cip::S
        };

        let (mut wedge_a, mut wedge_b) = (Wedge::Down, Wedge::Up);
        if (is_cw && cip != Cip::R) || (!is_cw && cip != Cip::S) {
            wedge_a = Wedge::Up;
            wedge_b = Wedge::Down;
        }

        let has_hydrogen = graph.vertex(vertex).value.has_hydrogen;
        if has_hydrogen {
            let lowest = neighbours[order[order.len() - 1]];
            if let Some(edge) = graph.get_edge_mut(vertex, lowest) {
                edge.wedge = wedge_a;
            }
        }

        // Prefer wedging towards non-stereocenters outside the ring, then
        // heteroatoms, then short subtrees.
        let offset = usize::from(has_hydrogen);
        let mut candidates: Vec<(i64, usize)> = order[..order.len() - offset]
            .iter()
            .map(|&j| {
                let n = neighbours[j];
                let atom = &graph.vertex(n).value;
                let depth = atom.subtree_depth as i64;
                let mut score = 0i64;
                if !atom.is_stereo_center {
                    score += 100_000;
                }
                if !rings.in_same_ring(graph, n, vertex) {
                    score += 10_000;
                }
                if atom.is_hetero_atom() {
                    score += 1_000;
                }
                if depth == 0 {
                    score -= 1_000;
                }
                score += 1_000 - depth;
                (score, n)
            })
            .collect();
        candidates.sort_by(|a, b| b.0.cmp(&a.0));

        let show_hydrogen = graph.vertex(vertex).value.rings.len() > 1 && has_hydrogen;
        if !show_hydrogen {
            if let Some(&(_, wedge_id)) = candidates.first() {
                let wedge = if has_hydrogen {
                    wedge_b
                } else {
                    let mut wedge = wedge_b;
                    for &j in order.iter().rev() {
                        wedge = if wedge == wedge_a { wedge_b } else { wedge_a };
                        if neighbours[j] == wedge_id {
                            break;
                        }
                    }
                    wedge
                };
                if let Some(edge) = graph.get_edge_mut(vertex, wedge_id) {
                    edge.wedge = wedge;
                }
            }
        }

        graph.vertex_mut(vertex).value.cip = Some(cip);
        debug!(vertex, ?cip, "annotated stereocenter");
    }
}
