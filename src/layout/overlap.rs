//! Overlap resolution.
//!
//! A ring atom carrying two non-ring substituents places both straight away
//! from the ring, on top of each other. The two subtrees are spread apart
//! symmetrically, towards whichever side scores less overlap. Terminal atoms
//! still crowding another atom afterwards are turned a little about their
//! parent.

use tracing::debug;

use super::Layout;
use crate::graph::Graph;
use crate::math::{to_rad, DVec2, PlaneExt};
use crate::options::DrawOptions;

/// Pairwise crowding of drawn vertices closer than one bond length.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapScore {
    pub total: f64,
    /// Per-vertex share, indexed by vertex id.
    pub vertex_scores: Vec<f64>,
}

impl OverlapScore {
    pub fn compute(graph: &Graph, options: &DrawOptions) -> Self {
        let n = graph.vertex_count();
        let mut total = 0.0;
        let mut vertex_scores = vec![0.0; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (graph.vertex(i), graph.vertex(j));
                if !a.value.is_drawn || !b.value.is_drawn {
                    continue;
                }
                let dist_sq = a.position.distance_squared(b.position);
                if dist_sq < options.bond_length_sq() {
                    let weighted = (options.bond_length - dist_sq.sqrt()) / options.bond_length;
                    total += weighted;
                    vertex_scores[i] += weighted;
                    vertex_scores[j] += weighted;
                }
            }
        }
        Self {
            total,
            vertex_scores,
        }
    }

    /// Mean score of the crowded vertices in the subtree of `vertex` away
    /// from `parent`. `None` when no vertex there is crowded.
    pub fn subtree(&self, graph: &Graph, vertex: usize, parent: usize, sensitivity: f64) -> Option<f64> {
        let mut score = 0.0;
        let mut count = 0usize;
        graph.traverse_tree(vertex, Some(parent), None, false, |v| {
            if !graph.vertex(v).value.is_drawn {
                return;
            }
            let s = self.vertex_scores[v];
            if s > sensitivity {
                score += s;
                count += 1;
            }
        });
        (count > 0).then(|| score / count as f64)
    }
}

impl Layout<'_> {
    /// Neighbours sharing no ring with `vertex` that are not bridge atoms.
    fn non_ring_neighbours(&self, vertex: usize) -> Vec<usize> {
        let rings = &self.graph.vertex(vertex).value.rings;
        self.graph
            .vertex(vertex)
            .neighbours
            .iter()
            .copied()
            .filter(|&n| {
                let atom = &self.graph.vertex(n).value;
                !atom.is_bridge && !atom.rings.iter().any(|r| rings.contains(r))
            })
            .collect()
    }

    /// Rotates the subtree of `vertex` away from `parent` about `center`,
    /// dragging the centres of rings anchored in it along.
    pub fn rotate_subtree(&mut self, vertex: usize, parent: usize, angle: f64, center: DVec2) {
        for id in self.graph.subtree(vertex, parent) {
            let v = self.graph.vertex_mut(id);
            v.position = v.position.rotated_about(angle, center);
            v.previous_position = v.previous_position.rotated_about(angle, center);
            let anchored = v.value.anchored_rings.clone();
            for ring_id in anchored {
                if let Some(ring) = self.rings.rings.get_mut(ring_id) {
                    ring.center = ring.center.rotated_about(angle, center);
                }
            }
        }
    }

    fn subtree_pair_score(&self, a: usize, b: usize, common: usize) -> Option<f64> {
        let score = OverlapScore::compute(self.graph, self.options);
        let sensitivity = self.options.overlap_sensitivity;
        Some(
            score.subtree(self.graph, a, common, sensitivity)?
                + score.subtree(self.graph, b, common, sensitivity)?,
        )
    }

    /// Spreads pairs of substituents that leave a ring atom on the same line.
    pub fn resolve_primary_overlaps(&mut self) {
        let mut done = vec![false; self.graph.vertex_count()];
        let mut overlaps: Vec<(usize, usize, [usize; 2])> = Vec::new();

        for ring in self.rings.simple_rings() {
            for &m in &ring.members {
                if done[m] {
                    continue;
                }
                done[m] = true;
                let outside = self.non_ring_neighbours(m);
                if let [a, b] = outside[..] {
                    let first_ring = self.graph.vertex(m).value.rings.first().copied();
                    overlaps.push((m, first_ring.unwrap_or(ring.id), [a, b]));
                }
            }
        }

        let mut resolved = 0;
        for (common, ring_id, [a, b]) in overlaps {
            if !self.graph.vertex(a).value.is_drawn || !self.graph.vertex(b).value.is_drawn {
                continue;
            }
            let center = self.graph.vertex(common).position;
            let angle = (2.0 * std::f64::consts::PI - self.rings.ring(ring_id).inner_angle()) / 6.0;

            self.rotate_subtree(a, common, angle, center);
            self.rotate_subtree(b, common, -angle, center);
            let first = self.subtree_pair_score(a, b, common);

            self.rotate_subtree(a, common, -2.0 * angle, center);
            self.rotate_subtree(b, common, 2.0 * angle, center);
            let second = self.subtree_pair_score(a, b, common);

            if let (Some(first), Some(second)) = (first, second) {
                if second > first {
                    self.rotate_subtree(a, common, 2.0 * angle, center);
                    self.rotate_subtree(b, common, -2.0 * angle, center);
                }
            }
            resolved += 1;
        }
        debug!(resolved, "resolved primary overlaps");
    }

    /// Nearest other drawn vertex.
    fn closest_vertex(&self, id: usize) -> Option<usize> {
        let position = self.graph.vertex(id).position;
        self.graph
            .vertices
            .iter()
            .filter(|v| v.id != id && v.value.is_drawn)
            .map(|v| (v.id, v.position.distance_squared(position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(v, _)| v)
    }

    /// The point a vertex pivots on, or is pushed away from. Vertex 0 has no
    /// real previous position, so vertex 1 stands in for it.
    fn anchor(&self, id: usize, terminal: bool) -> DVec2 {
        let v = self.graph.vertex(id);
        if id == 0 && self.graph.vertex_count() > 1 {
            self.graph.vertex(1).position
        } else if terminal {
            v.previous_position
        } else {
            v.position
        }
    }

    /// Turns crowded terminal atoms by 20 degrees about their parent, away
    /// from the nearest other atom. Most crowded first.
    pub fn resolve_secondary_overlaps(&mut self) {
        let score = OverlapScore::compute(self.graph, self.options);
        let sensitivity = self.options.overlap_sensitivity;
        let mut crowded: Vec<(usize, f64)> = score
            .vertex_scores
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, s)| s > sensitivity)
            .collect();
        crowded.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut moved = 0;
        for (id, _) in crowded {
            if !self.graph.vertex(id).is_terminal() {
                continue;
            }
            let Some(closest) = self.closest_vertex(id) else {
                continue;
            };
            let away_from = self.anchor(closest, self.graph.vertex(closest).is_terminal());
            let pivot = self.anchor(id, true);
            let v = self.graph.vertex_mut(id);
            v.position = v.position.rotated_away_from(away_from, pivot, to_rad(20.0));
            moved += 1;
        }
        debug!(moved, "resolved secondary overlaps");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::{BondType, Edge};
    use crate::graph::Vertex;
    use crate::rings::{close_ring_bonds, RingSet};
    use crate::smiles::parse;

    #[test]
    fn overlapping_pair_scores() {
        let mut g = Graph::from_parse_tree(&parse("C.C").unwrap(), true);
        g.vertex_mut(0).set_position(DVec2::new(0.0, 0.0));
        g.vertex_mut(1).set_position(DVec2::new(15.0, 0.0));
        let score = OverlapScore::compute(&g, &DrawOptions::default());
        assert!((score.total - 0.5).abs() < 1e-12);
        assert_eq!(score.vertex_scores, vec![0.5, 0.5]);
        assert_eq!(score.subtree(&g, 1, 0, 0.42), Some(0.5));
        assert_eq!(score.subtree(&g, 1, 0, 0.6), None);
    }

    #[test]
    fn gem_substituents_are_spread() {
        let mut g = Graph::from_parse_tree(&parse("CC1(C)CCCCC1").unwrap(), true);
        close_ring_bonds(&mut g).unwrap();
        let mut rings = RingSet::perceive(&mut g);
        let options = DrawOptions::default();
        let mut layout = Layout::new(&mut g, &mut rings, &options);
        layout.position();
        // Both methyls start on the same spot.
        assert!(layout.graph.vertex(0).position.distance(layout.graph.vertex(2).position) < 1e-6);
        layout.resolve_primary_overlaps();
        let d = layout.graph.vertex(0).position.distance(layout.graph.vertex(2).position);
        assert!(d > 20.0, "methyls still {d} apart");
        // The ring atom keeps its bond lengths.
        let hub = layout.graph.vertex(1).position;
        assert!((layout.graph.vertex(0).position.distance(hub) - 30.0).abs() < 1e-6);
        assert!((layout.graph.vertex(2).position.distance(hub) - 30.0).abs() < 1e-6);
    }

    #[test]
    fn coinciding_terminal_atoms_are_turned_apart() {
        // Two ethane fragments whose end atoms land on the same spot.
        let mut g = Graph::new();
        let placed = [
            (DVec2::new(0.0, 0.0), DVec2::ZERO),
            (DVec2::new(30.0, 0.0), DVec2::new(0.0, 0.0)),
            (DVec2::new(55.0, 12.0), DVec2::ZERO),
            (DVec2::new(30.0, 0.0), DVec2::new(55.0, 12.0)),
        ];
        for (position, previous_position) in placed {
            let mut v = Vertex::new(Atom::new("C"));
            v.position = position;
            v.previous_position = previous_position;
            g.add_vertex(v);
        }
        for (a, b) in [(0, 1), (2, 3)] {
            g.add_edge(Edge::new(a, b, BondType::Single)).unwrap();
            g.vertex_mut(a).neighbours.push(b);
            g.vertex_mut(b).neighbours.push(a);
        }
        let mut rings = RingSet::default();
        let options = DrawOptions::default();
        let mut layout = Layout::new(&mut g, &mut rings, &options);
        layout.resolve_secondary_overlaps();

        let p: Vec<DVec2> = layout.graph.positions();
        assert!(p[1].distance(p[3]) > 5.0, "ends only {} apart", p[1].distance(p[3]));
        assert!((p[1].distance(p[0]) - 30.0).abs() < 1e-9);
        assert!((p[3].distance(p[2]) - DVec2::new(25.0, 12.0).length()).abs() < 1e-9);
        // Uncrowded atoms stay put.
        assert_eq!(p[0], DVec2::ZERO);
        assert_eq!(p[2], DVec2::new(55.0, 12.0));
    }
}
