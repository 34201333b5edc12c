//! Kamada–Kawai spring layout for a subset of vertices.
//!
//! Every pair of vertices is joined by a spring whose rest length is the
//! bond length times their graph distance and whose strength falls off with
//! the square of that distance. The vertex with the largest energy gradient
//! is moved by Newton steps until all gradients are below the threshold.
//! Vertices that are already positioned stay fixed.
//!
//! Positions are written back only on success.

use tracing::trace;

use crate::error::LayoutError;
use crate::graph::Graph;
use crate::math::{central_angle, poly_circumradius, DVec2};
use crate::options::DrawOptions;

#[derive(Debug, Clone, PartialEq)]
pub struct KkParams {
    pub bond_length: f64,
    pub threshold: f64,
    pub inner_threshold: f64,
    pub max_iteration: usize,
    pub max_inner_iteration: usize,
    pub max_energy: f64,
}

impl KkParams {
    pub fn from_options(options: &DrawOptions) -> Self {
        Self {
            bond_length: options.bond_length,
            threshold: options.kk_threshold,
            inner_threshold: options.kk_inner_threshold,
            max_iteration: options.kk_max_iteration,
            max_inner_iteration: options.kk_max_inner_iteration,
            max_energy: options.kk_max_energy,
        }
    }
}

impl Default for KkParams {
    fn default() -> Self {
        Self::from_options(&DrawOptions::default())
    }
}

/// Statistics of a converged run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KkOutcome {
    pub iterations: usize,
    /// Largest remaining squared gradient among the free vertices.
    pub energy: f64,
}

struct Springs {
    length: Vec<Vec<f64>>,
    strength: Vec<Vec<f64>>,
}

impl Springs {
    fn new(distances: &[Vec<f64>], bond_length: f64) -> Self {
        let n = distances.len();
        let mut length = vec![vec![0.0; n]; n];
        let mut strength = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                let d = distances[i][j];
                // Disconnected pairs exert no force.
                if i != j && d.is_finite() && d > 0.0 {
                    length[i][j] = bond_length * d;
                    strength[i][j] = bond_length * d.powi(-2);
                }
            }
        }
        Self { length, strength }
    }

    /// Gradient of the spring energy between `u` and `v` with respect to `u`.
    fn gradient(&self, i: usize, j: usize, u: DVec2, v: DVec2) -> DVec2 {
        let k = self.strength[i][j];
        let d = u - v;
        let len = d.length();
        if k == 0.0 || len == 0.0 {
            return DVec2::ZERO;
        }
        let l = self.length[i][j];
        DVec2::new(k * (d.x - l * d.x / len), k * (d.y - l * d.y / len))
    }
}

struct State {
    positions: Vec<DVec2>,
    fixed: Vec<bool>,
    /// `pair[i][j]`: gradient contribution of `j` on `i`.
    pair: Vec<Vec<DVec2>>,
    sums: Vec<DVec2>,
}

impl State {
    fn energy(&self, i: usize) -> f64 {
        self.sums[i].length_squared()
    }

    /// Free vertex with the largest energy, if any has energy above zero.
    fn highest_energy(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.positions.len() {
            if self.fixed[i] {
                continue;
            }
            let e = self.energy(i);
            if !e.is_finite() {
                return Some((i, e));
            }
            if e > best.map_or(0.0, |(_, b)| b) {
                best = Some((i, e));
            }
        }
        best
    }

    fn update(&mut self, index: usize, springs: &Springs) {
        let n = self.positions.len();
        let u = self.positions[index];
        let g = self.sums[index];

        let (mut dxx, mut dyy, mut dxy) = (0.0, 0.0, 0.0);
        for i in 0..n {
            let k = springs.strength[index][i];
            if i == index || k == 0.0 {
                continue;
            }
            let l = springs.length[index][i];
            let d = u - self.positions[i];
            let m = d.x * d.x;
            let denom = 1.0 / (m + d.y * d.y).powf(1.5);
            if !denom.is_finite() {
                continue;
            }
            dxx += k * (1.0 - l * d.y * d.y * denom);
            dyy += k * (1.0 - l * m * denom);
            dxy += k * (l * d.x * d.y * denom);
        }

        let mut det = dxx * dyy - dxy * dxy;
        if det == 0.0 {
            det = 0.1;
        }
        let dx = (-g.x * dyy + g.y * dxy) / det;
        let dy = (-g.y * dxx + g.x * dxy) / det;
        self.positions[index] += DVec2::new(dx, dy);

        let u = self.positions[index];
        let mut sum = DVec2::ZERO;
        for i in 0..n {
            if i == index {
                continue;
            }
            let t = springs.gradient(index, i, u, self.positions[i]);
            let previous = self.pair[index][i];
            self.pair[index][i] = t;
            self.pair[i][index] = -t;
            sum += t;
            self.sums[i] -= t - previous;
        }
        self.sums[index] = sum;
    }
}

fn check(energy: f64, params: &KkParams) -> Result<(), LayoutError> {
    if !energy.is_finite() || energy > params.max_energy {
        return Err(LayoutError::Diverged {
            energy,
            max_energy: params.max_energy,
        });
    }
    Ok(())
}

/// Lays out `vertex_ids` around `center`.
///
/// Free vertices start on a regular polygon in slice order. When
/// `start_vertex_id` is already positioned, the polygon is turned so that
/// the start vertex's slot points where the vertex actually is. On success
/// every free vertex in the subset is marked positioned and force-positioned.
///
/// Takes the ring's members and centre rather than the ring itself, so the
/// ring set stays untouched here. Callers record the ring centre and mark
/// the ring positioned once this returns `Ok`.
pub fn layout(
    graph: &mut Graph,
    vertex_ids: &[usize],
    center: DVec2,
    start_vertex_id: Option<usize>,
    params: &KkParams,
) -> Result<KkOutcome, LayoutError> {
    let n = vertex_ids.len();
    if n == 0 {
        return Err(LayoutError::EmptySubset);
    }

    let distances = graph.subgraph_distance_matrix(vertex_ids);
    let springs = Springs::new(&distances, params.bond_length);

    let sides = n.max(3);
    let radius = poly_circumradius(params.bond_length, sides);
    let step = central_angle(sides);
    let mut a = 0.0;
    if let Some(start) = start_vertex_id {
        if let Some(slot) = vertex_ids.iter().position(|&v| v == start) {
            let vertex = graph.vertex(start);
            if vertex.positioned {
                a = (vertex.position - center).to_angle() - step * slot as f64;
            }
        }
    }

    let mut positions = Vec::with_capacity(n);
    let mut fixed = Vec::with_capacity(n);
    for &id in vertex_ids {
        let vertex = graph.vertex(id);
        if vertex.positioned {
            positions.push(vertex.position);
        } else {
            positions.push(center + DVec2::from_angle(a) * radius);
        }
        fixed.push(vertex.positioned);
        a += step;
    }

    let mut pair = vec![vec![DVec2::ZERO; n]; n];
    let mut sums = vec![DVec2::ZERO; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                let t = springs.gradient(i, j, positions[i], positions[j]);
                pair[i][j] = t;
                sums[i] += t;
            }
        }
    }
    let mut state = State {
        positions,
        fixed,
        pair,
        sums,
    };

    let mut iterations = 0;
    loop {
        let Some((index, energy)) = state.highest_energy() else {
            break;
        };
        check(energy, params)?;
        if energy <= params.threshold {
            break;
        }
        if iterations >= params.max_iteration {
            return Err(LayoutError::NotConverged { energy, iterations });
        }
        iterations += 1;

        let mut delta = energy;
        let mut inner = 0;
        while delta > params.inner_threshold && inner < params.max_inner_iteration {
            inner += 1;
            state.update(index, &springs);
            delta = state.energy(index);
            check(delta, params)?;
        }
    }

    let energy = state.highest_energy().map_or(0.0, |(_, e)| e);
    trace!(vertices = n, iterations, energy, "force layout converged");

    for (i, &id) in vertex_ids.iter().enumerate() {
        if state.fixed[i] {
            continue;
        }
        let vertex = graph.vertex_mut(id);
        vertex.set_position(state.positions[i]);
        vertex.positioned = true;
        vertex.force_positioned = true;
    }

    Ok(KkOutcome { iterations, energy })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rings::close_ring_bonds;
    use crate::smiles::parse;

    fn ring_graph(smiles: &str) -> Graph {
        let mut g = Graph::from_parse_tree(&parse(smiles).unwrap(), true);
        close_ring_bonds(&mut g).unwrap();
        g
    }

    fn all(g: &Graph) -> Vec<usize> {
        (0..g.vertex_count()).collect()
    }

    #[test]
    fn empty_subset() {
        let mut g = ring_graph("C1CC1");
        assert_eq!(
            layout(&mut g, &[], DVec2::ZERO, None, &KkParams::default()),
            Err(LayoutError::EmptySubset)
        );
    }

    #[test]
    fn norbornane_bonds_are_near_bond_length() {
        let mut g = ring_graph("C1CC2CC1CC2");
        let ids = all(&g);
        let outcome = layout(&mut g, &ids, DVec2::ZERO, None, &KkParams::default()).unwrap();
        assert!(outcome.energy <= 0.1);
        for e in &g.edges {
            let d = g.vertex(e.source_id).position.distance(g.vertex(e.target_id).position);
            assert!(d > 15.0 && d < 45.0, "bond length {d}");
        }
        assert!(g.vertices.iter().all(|v| v.positioned && v.force_positioned));
    }

    #[test]
    fn deterministic() {
        let run = || {
            let mut g = ring_graph("C12C3C4C1C5C3C4C25");
            let ids = all(&g);
            layout(&mut g, &ids, DVec2::new(5.0, -3.0), None, &KkParams::default()).unwrap();
            g.positions()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn positioned_vertices_stay_fixed() {
        let mut g = ring_graph("C1CC2CC1CC2");
        g.vertex_mut(0).set_position(DVec2::new(30.0, 0.0));
        g.vertex_mut(0).positioned = true;
        let ids = all(&g);
        layout(&mut g, &ids, DVec2::ZERO, Some(0), &KkParams::default()).unwrap();
        assert_eq!(g.vertex(0).position, DVec2::new(30.0, 0.0));
        assert!(!g.vertex(0).force_positioned);
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let mut g = ring_graph("C1CC2CC1CC2");
        let ids = all(&g);
        let params = KkParams {
            max_iteration: 0,
            ..KkParams::default()
        };
        let err = layout(&mut g, &ids, DVec2::ZERO, None, &params).unwrap_err();
        assert!(matches!(err, LayoutError::NotConverged { iterations: 0, .. }));
        // Nothing is written back on failure.
        assert!(g.vertices.iter().all(|v| !v.positioned));
    }

    #[test]
    fn energy_ceiling_is_reported() {
        let mut g = ring_graph("C1CC2CC1CC2");
        let ids = all(&g);
        let params = KkParams {
            max_energy: 1e-9,
            ..KkParams::default()
        };
        let err = layout(&mut g, &ids, DVec2::ZERO, None, &params).unwrap_err();
        assert!(matches!(err, LayoutError::Diverged { .. }));
    }
}
