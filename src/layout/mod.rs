//! Deterministic 2D coordinates for a ring-perceived graph.
//!
//! Placement walks outwards from a start vertex. Chains follow fixed angle
//! rules (zig-zag at ±60°, straight through triple bonds and cumulated
//! double bonds, crosses at branch points). Simple rings are regular
//! polygons; fused and spiro neighbours are attached to already placed
//! edges or vertices. Bridged ring systems go through the force layout in
//! [`kamada_kawai`] and fall back to a polygon when it fails.
//!
//! The walk keeps an explicit task stack that reproduces depth-first order.

pub mod kamada_kawai;
mod overlap;

use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::bond::BondType;
use crate::graph::Graph;
use crate::math::{apothem, central_angle, poly_circumradius, to_rad, units, DVec2, PlaneExt};
use crate::options::DrawOptions;
use crate::rings::RingSet;

use self::kamada_kawai::KkParams;

/// Default zig-zag angle of a chain, 60°.
const CHAIN_ANGLE: f64 = 1.0472;

#[derive(Debug, Clone, Copy)]
enum Task {
    NextBond {
        vertex: usize,
        previous: Option<usize>,
        angle: f64,
        origin_shortest: bool,
    },
    Ring {
        ring: usize,
        center: DVec2,
        start: Option<usize>,
        previous: Option<usize>,
    },
    /// Attach an unplaced neighbour ring to a placed one.
    NeighbourRing { ring: usize, neighbour: usize },
    /// Place the non-ring atoms hanging off a placed ring.
    RingSubstituents { ring: usize },
}

/// Mutable state of one layout pass.
pub struct Layout<'a> {
    graph: &'a mut Graph,
    rings: &'a mut RingSet,
    options: &'a DrawOptions,
    kk: KkParams,
    /// Pending `/` or `\` seen before the double bond it configures.
    double_bond_config: Option<BondType>,
    double_bond_config_count: usize,
    /// Bridged rings that had to be placed as plain polygons.
    pub fallbacks: usize,
}

impl<'a> Layout<'a> {
    pub fn new(graph: &'a mut Graph, rings: &'a mut RingSet, options: &'a DrawOptions) -> Self {
        Self {
            graph,
            rings,
            options,
            kk: KkParams::from_options(options),
            double_bond_config: None,
            double_bond_config_count: 0,
            fallbacks: 0,
        }
    }

    /// Picks the start vertex: a bridged ring member if there is one, else a
    /// ring member, else vertex 0.
    pub fn start_vertex(&self) -> Option<usize> {
        if self.graph.vertex_count() == 0 {
            return None;
        }
        let mut start = self
            .graph
            .vertices
            .iter()
            .find(|v| v.value.bridged_ring.is_some())
            .map(|v| v.id);
        for ring in self.rings.layout_rings() {
            if ring.is_bridged {
                start = ring.members.first().copied();
            }
        }
        if start.is_none() {
            start = self
                .rings
                .layout_rings()
                .next()
                .and_then(|r| r.members.first().copied());
        }
        Some(start.unwrap_or(0))
    }

    /// Places every vertex reachable from the start vertex, then any
    /// component the walk could not reach.
    pub fn position(&mut self) {
        let Some(start) = self.start_vertex() else {
            return;
        };
        self.run(Task::NextBond {
            vertex: start,
            previous: None,
            angle: 0.0,
            origin_shortest: false,
        });

        // Fragments are normally joined by `.` edges; this only catches
        // drawn vertices the walk skipped.
        for id in 0..self.graph.vertex_count() {
            let v = self.graph.vertex(id);
            if v.positioned || !v.value.is_drawn {
                continue;
            }
            let anchor = v
                .neighbours
                .iter()
                .copied()
                .find(|&n| self.graph.vertex(n).positioned);
            self.run(Task::NextBond {
                vertex: id,
                previous: anchor,
                angle: 0.0,
                origin_shortest: false,
            });
        }

        for ring in &mut self.rings.rings {
            if !ring.is_bridged {
                ring.center = ring.centroid(self.graph);
            }
        }
        debug!(
            vertices = self.graph.vertex_count(),
            fallbacks = self.fallbacks,
            "positioned vertices"
        );
    }

    fn run(&mut self, task: Task) {
        let mut stack = vec![task];
        while let Some(task) = stack.pop() {
            let follow_up = match task {
                Task::NextBond {
                    vertex,
                    previous,
                    angle,
                    origin_shortest,
                } => self.next_bond(vertex, previous, angle, origin_shortest),
                Task::Ring {
                    ring,
                    center,
                    start,
                    previous,
                } => self.create_ring(ring, center, start, previous),
                Task::NeighbourRing { ring, neighbour } => self.neighbour_ring(ring, neighbour),
                Task::RingSubstituents { ring } => self.ring_substituents(ring),
            };
            stack.extend(follow_up.into_iter().rev());
        }
    }

    fn position_of(&self, id: usize) -> DVec2 {
        self.graph.vertex(id).position
    }

    fn in_layout_ring(&self, id: usize) -> bool {
        !self.rings.layout_rings_of(self.graph, id).is_empty()
    }

    fn place(&mut self, id: usize, position: DVec2, previous_position: DVec2) {
        let v = self.graph.vertex_mut(id);
        v.previous_position = previous_position;
        v.set_position(position);
        v.positioned = true;
    }

    fn track_double_bond_config(&mut self, vertex: usize, previous: usize) -> bool {
        let Some(mut config) = self.graph.get_edge(vertex, previous).map(|e| e.bond_type) else {
            return false;
        };
        if !config.is_directional() {
            return false;
        }
        self.double_bond_config_count += 1;
        if self.double_bond_config_count % 2 == 0 || self.double_bond_config.is_some() {
            return false;
        }
        if self.graph.vertex(previous).parent_vertex_id.is_none()
            && self.graph.vertex(vertex).value.branch_bond.is_some()
        {
            config = flip_direction(config);
        }
        self.double_bond_config = Some(config);
        true
    }

    fn next_bond(
        &mut self,
        vertex: usize,
        previous: Option<usize>,
        angle: f64,
        origin_shortest: bool,
    ) -> Vec<Task> {
        if self.graph.vertex(vertex).positioned {
            return Vec::new();
        }
        let bond_length = self.options.bond_length;
        let config_set = previous.is_some_and(|p| self.track_double_bond_config(vertex, p));

        match previous {
            None => {
                let v = self.graph.vertex_mut(vertex);
                v.previous_position = DVec2::new(bond_length, 0.0).rotated(to_rad(-60.0));
                v.set_position(DVec2::new(bond_length, 0.0));
                v.angle = Some(to_rad(-60.0));
                // A bridged ring member is placed by the force layout.
                if v.value.bridged_ring.is_none() {
                    v.positioned = true;
                }
            }
            Some(p) if self.in_layout_ring(p) => {
                let p_rings = self.rings.layout_rings_of(self.graph, p);
                let p_pos = self.position_of(p);
                let neighbours = self.graph.vertex(p).neighbours.clone();
                let mut joined = None;
                if self.graph.vertex(p).value.bridged_ring.is_none() && p_rings.len() > 1 {
                    joined = neighbours.iter().copied().find(|&n| {
                        let n_rings = self.rings.layout_rings_of(self.graph, n);
                        p_rings.iter().all(|r| n_rings.contains(r))
                    });
                }
                let pos = match joined {
                    Some(j) => self.position_of(j).rotated_about(PI, p_pos),
                    None => {
                        let mut sum = DVec2::ZERO;
                        for &n in &neighbours {
                            if self.graph.vertex(n).positioned
                                && self.rings.in_same_layout_ring(self.graph, n, p)
                            {
                                sum += self.position_of(n) - p_pos;
                            }
                        }
                        p_pos + (-sum).normalize_or_zero() * bond_length
                    }
                };
                self.place(vertex, pos, p_pos);
            }
            Some(p) => {
                let p_pos = self.position_of(p);
                let pos = DVec2::new(bond_length, 0.0).rotated(angle) + p_pos;
                self.place(vertex, pos, p_pos);
            }
        }

        let atom = &self.graph.vertex(vertex).value;
        let entered_ring = match atom.bridged_ring {
            Some(b) => Some(b),
            None => self.rings.layout_rings_of(self.graph, vertex).first().copied(),
        };
        if let Some(ring_id) = entered_ring {
            let ring = self.rings.ring(ring_id);
            if ring.positioned {
                return Vec::new();
            }
            let v = self.graph.vertex(vertex);
            let direction = (v.position - v.previous_position).normalize_or_zero();
            let center = v.position + direction * poly_circumradius(bond_length, ring.size());
            return vec![Task::Ring {
                ring: ring_id,
                center,
                start: Some(vertex),
                previous: None,
            }];
        }

        self.chain(vertex, previous, origin_shortest, config_set)
    }

    fn chain(
        &mut self,
        vertex: usize,
        previous: Option<usize>,
        origin_shortest: bool,
        config_set: bool,
    ) -> Vec<Task> {
        let neighbours: Vec<usize> = self
            .graph
            .vertex(vertex)
            .neighbours
            .iter()
            .copied()
            .filter(|&n| self.graph.vertex(n).value.is_drawn && Some(n) != previous)
            .collect();
        let previous_angle = self.graph.vertex(vertex).incoming_angle();
        let vertex_angle = self.graph.vertex(vertex).angle.filter(|&a| a != 0.0);

        match neighbours.len() {
            0 => Vec::new(),
            1 => self.chain_one(
                vertex,
                previous,
                neighbours[0],
                previous_angle,
                origin_shortest,
                config_set,
            ),
            2 => {
                let a = vertex_angle.unwrap_or(CHAIN_ANGLE);
                let (n0, n1) = (neighbours[0], neighbours[1]);
                let depth_a = self.subtree_depth(n0, vertex);
                let depth_b = self.subtree_depth(n1, vertex);
                let depth_c = match previous {
                    Some(p) => self.subtree_depth(p, vertex),
                    None => 0,
                };

                let carbon_a = self.graph.vertex(n0).value.element == "C";
                let carbon_b = self.graph.vertex(n1).value.element == "C";
                let (cis, trans) = if carbon_b && !carbon_a && depth_b > 1 && depth_a < 5 {
                    (n1, n0)
                } else if !carbon_b && carbon_a && depth_a > 1 && depth_b < 5 {
                    (n0, n1)
                } else if depth_b > depth_a {
                    (n1, n0)
                } else {
                    (n0, n1)
                };
                let origin_shortest = depth_c < depth_a && depth_c < depth_b;

                let (mut trans_angle, mut cis_angle) = (a, -a);
                if let Some(config) = self.double_bond_config {
                    if self.graph.vertex(trans).value.branch_bond == Some(config) {
                        trans_angle = -a;
                        cis_angle = a;
                    }
                }
                self.graph.vertex_mut(trans).angle = Some(trans_angle);
                self.graph.vertex_mut(cis).angle = Some(cis_angle);
                vec![
                    Task::NextBond {
                        vertex: trans,
                        previous: Some(vertex),
                        angle: previous_angle + trans_angle,
                        origin_shortest,
                    },
                    Task::NextBond {
                        vertex: cis,
                        previous: Some(vertex),
                        angle: previous_angle + cis_angle,
                        origin_shortest,
                    },
                ]
            }
            3 => {
                let d: Vec<usize> = neighbours
                    .iter()
                    .map(|&n| self.subtree_depth(n, vertex))
                    .collect();
                let (n0, n1, n2) = (neighbours[0], neighbours[1], neighbours[2]);
                let (s, l, r) = if d[1] > d[0] && d[1] > d[2] {
                    (n1, n0, n2)
                } else if d[2] > d[0] && d[2] > d[1] {
                    (n2, n0, n1)
                } else {
                    (n0, n1, n2)
                };

                let acyclic = previous.is_some_and(|p| !self.in_layout_ring(p))
                    && [s, l, r].iter().all(|&x| !self.in_layout_ring(x));
                let angles = if acyclic
                    && self.graph.tree_depth(l, vertex) == 1
                    && self.graph.tree_depth(r, vertex) == 1
                    && self.graph.tree_depth(s, vertex) > 1
                {
                    let va = self.graph.vertex(vertex).angle.unwrap_or(0.0);
                    if va >= 0.0 {
                        [-va, to_rad(30.0), to_rad(90.0)]
                    } else {
                        [-va, -to_rad(30.0), -to_rad(90.0)]
                    }
                } else {
                    [0.0, to_rad(90.0), -to_rad(90.0)]
                };
                self.fan_out(vertex, &[s, l, r], &angles, previous_angle)
            }
            4 => {
                let d: Vec<usize> = neighbours
                    .iter()
                    .map(|&n| self.subtree_depth(n, vertex))
                    .collect();
                let [n0, n1, n2, n3] = [neighbours[0], neighbours[1], neighbours[2], neighbours[3]];
                let order = if d[1] > d[0] && d[1] > d[2] && d[1] > d[3] {
                    [n1, n0, n2, n3]
                } else if d[2] > d[0] && d[2] > d[1] && d[2] > d[3] {
                    [n2, n0, n1, n3]
                } else if d[3] > d[0] && d[3] > d[1] && d[3] > d[2] {
                    [n3, n0, n1, n2]
                } else {
                    [n0, n1, n2, n3]
                };
                let angles = [
                    -to_rad(36.0),
                    to_rad(36.0),
                    -to_rad(108.0),
                    to_rad(108.0),
                ];
                self.fan_out(vertex, &order, &angles, previous_angle)
            }
            n => {
                // Hypervalent centres: spread evenly around the full circle.
                let step = 2.0 * PI / (n as f64 + 1.0);
                let angles: Vec<f64> = (0..n).map(|i| PI - step * (i as f64 + 1.0)).collect();
                self.fan_out(vertex, &neighbours, &angles, previous_angle)
            }
        }
    }

    fn chain_one(
        &mut self,
        vertex: usize,
        previous: Option<usize>,
        next: usize,
        previous_angle: f64,
        origin_shortest: bool,
        config_set: bool,
    ) -> Vec<Task> {
        let bond = self.graph.vertex(vertex).value.bond_type;
        let previous_bond = previous.map(|p| self.graph.vertex(p).value.bond_type);
        let triple = bond == BondType::Triple || previous_bond == Some(BondType::Triple);
        let cumulated = bond == BondType::Double
            && previous.is_some_and(|p| !self.in_layout_ring(p))
            && previous_bond == Some(BondType::Double)
            && self.graph.vertex(vertex).value.branch_bond != Some(BondType::Single);

        if triple || cumulated {
            if let Some(p) = previous {
                if let Some(edge) = self.graph.get_edge_mut(vertex, p) {
                    edge.center = true;
                }
            }
            if let Some(edge) = self.graph.get_edge_mut(vertex, next) {
                edge.center = true;
            }
            if triple {
                self.graph.vertex_mut(next).angle = Some(0.0);
            }
            let next_angle = self.graph.vertex(next).angle.unwrap_or(0.0);
            return vec![Task::NextBond {
                vertex: next,
                previous: Some(vertex),
                angle: previous_angle + next_angle,
                origin_shortest: false,
            }];
        }

        if previous.is_some_and(|p| self.in_layout_ring(p)) {
            // Leaving a ring: bend away from everything placed so far.
            let bond_length = self.options.bond_length;
            let here = self.position_of(vertex);
            let a = to_rad(60.0);
            let proposed_a = DVec2::new(bond_length, 0.0).rotated(a) + here;
            let proposed_b = DVec2::new(bond_length, 0.0).rotated(-a) + here;
            let com = self.graph.center_of_mass();
            let next_angle = if proposed_a.distance_squared(com) < proposed_b.distance_squared(com) {
                -a
            } else {
                a
            };
            self.graph.vertex_mut(next).angle = Some(next_angle);
            return vec![Task::NextBond {
                vertex: next,
                previous: Some(vertex),
                angle: previous_angle + next_angle,
                origin_shortest: false,
            }];
        }

        let mut a = self.graph.vertex(vertex).angle.filter(|&x| x != 0.0);
        if previous.is_some_and(|p| self.graph.vertex(p).neighbours.len() > 3) {
            a = Some(match a {
                Some(x) if x > 0.0 => x.min(CHAIN_ANGLE),
                Some(x) if x < 0.0 => x.max(-CHAIN_ANGLE),
                _ => CHAIN_ANGLE,
            });
        } else if a.is_none() {
            a = self.last_angle(vertex);
        }
        let mut a = a.unwrap_or(CHAIN_ANGLE);

        if previous.is_some() && !config_set {
            let bond = self
                .graph
                .get_edge(vertex, next)
                .map_or(BondType::Single, |e| e.bond_type);
            if bond.is_directional() {
                if let Some(config) = self.double_bond_config {
                    if config != bond {
                        a = -a;
                    }
                }
                self.double_bond_config = None;
            }
        }

        let next_angle = if origin_shortest { a } else { -a };
        self.graph.vertex_mut(next).angle = Some(next_angle);
        vec![Task::NextBond {
            vertex: next,
            previous: Some(vertex),
            angle: previous_angle + next_angle,
            origin_shortest: false,
        }]
    }

    fn fan_out(
        &mut self,
        vertex: usize,
        targets: &[usize],
        angles: &[f64],
        previous_angle: f64,
    ) -> Vec<Task> {
        targets
            .iter()
            .zip(angles)
            .map(|(&t, &a)| {
                self.graph.vertex_mut(t).angle = Some(a);
                Task::NextBond {
                    vertex: t,
                    previous: Some(vertex),
                    angle: previous_angle + a,
                    origin_shortest: false,
                }
            })
            .collect()
    }

    /// Tree depth of `vertex` seen from `parent`, cached on the atom.
    fn subtree_depth(&mut self, vertex: usize, parent: usize) -> usize {
        let depth = self.graph.tree_depth(vertex, parent);
        self.graph.vertex_mut(vertex).value.subtree_depth = depth;
        depth
    }

    /// Angle of the nearest ancestor that has a non-zero one.
    fn last_angle(&self, vertex: usize) -> Option<f64> {
        let mut current = Some(vertex);
        while let Some(id) = current {
            let v = self.graph.vertex(id);
            if let Some(a) = v.angle.filter(|&a| a != 0.0) {
                return Some(a);
            }
            current = v.parent_vertex_id;
        }
        None
    }

    fn create_ring(
        &mut self,
        ring_id: usize,
        center: DVec2,
        start: Option<usize>,
        previous: Option<usize>,
    ) -> Vec<Task> {
        if self.rings.ring(ring_id).positioned {
            return Vec::new();
        }
        let ring = self.rings.ring(ring_id);
        let start = start.filter(|s| ring.contains(*s));
        let starting_angle = start.map_or(0.0, |s| (self.position_of(s) - center).to_angle());

        let mut center = center;
        if ring.is_bridged {
            let members = ring.members.clone();
            let sub_rings = ring.sub_rings.clone();
            if let Err(err) = kamada_kawai::layout(self.graph, &members, center, start, &self.kk) {
                warn!(ring = ring_id, %err, "force layout failed, placing bridged ring as a polygon");
                self.fallbacks += 1;
                self.place_polygon(ring_id, center, starting_angle, start, previous);
            }
            center = self.rings.ring(ring_id).centroid(self.graph);
            for sub in sub_rings {
                let c = self.rings.ring(sub).centroid(self.graph);
                let r = self.rings.ring_mut(sub);
                r.center = c;
                r.positioned = true;
            }
        } else {
            self.place_polygon(ring_id, center, starting_angle, start, previous);
        }

        let ring = self.rings.ring_mut(ring_id);
        ring.positioned = true;
        ring.center = center;

        let mut tasks: Vec<Task> = self
            .rings
            .ordered_layout_neighbours(ring_id)
            .into_iter()
            .map(|(neighbour, _)| Task::NeighbourRing {
                ring: ring_id,
                neighbour,
            })
            .collect();
        tasks.push(Task::RingSubstituents { ring: ring_id });
        tasks
    }

    /// Walks the ring from `start`, away from `previous`, placing unplaced
    /// members on a regular polygon around `center`.
    fn place_polygon(
        &mut self,
        ring_id: usize,
        center: DVec2,
        starting_angle: f64,
        start: Option<usize>,
        previous: Option<usize>,
    ) {
        let ring = self.rings.ring(ring_id);
        let size = ring.size();
        if size == 0 {
            return;
        }
        let radius = poly_circumradius(self.options.bond_length, size);
        let step = central_angle(size);
        let walk = self.ring_walk(ring_id, start, previous);

        let mut a = starting_angle;
        for id in walk {
            let v = self.graph.vertex_mut(id);
            if !v.positioned {
                v.set_position(center + DVec2::from_angle(a) * radius);
            }
            a += step;
            v.angle = Some(a);
            v.positioned = true;
        }
    }

    /// Members in cyclic order beginning at `start`. The direction is that
    /// of the first ring neighbour of `start` other than `previous`.
    fn ring_walk(&self, ring_id: usize, start: Option<usize>, previous: Option<usize>) -> Vec<usize> {
        let members = &self.rings.ring(ring_id).members;
        let n = members.len();
        let start_idx = start
            .and_then(|s| members.iter().position(|&m| m == s))
            .unwrap_or(0);
        let forward = members[(start_idx + 1) % n];
        let backward = members[(start_idx + n - 1) % n];
        let first = self
            .graph
            .vertex(members[start_idx])
            .neighbours
            .iter()
            .copied()
            .find(|&nb| (nb == forward || nb == backward) && Some(nb) != previous);
        let reverse = first == Some(backward) && backward != forward;
        (0..n)
            .map(|i| {
                if reverse {
                    members[(start_idx + n - i) % n]
                } else {
                    members[(start_idx + i) % n]
                }
            })
            .collect()
    }

    fn neighbour_ring(&mut self, ring_id: usize, neighbour_id: usize) -> Vec<Task> {
        if self.rings.ring(neighbour_id).positioned {
            return Vec::new();
        }
        let bond_length = self.options.bond_length;
        let center = self.rings.ring(ring_id).center;
        let neighbour = self.rings.ring(neighbour_id);
        let size = neighbour.size();
        let shared: Vec<usize> = self
            .rings
            .ring(ring_id)
            .members
            .iter()
            .copied()
            .filter(|&m| neighbour.contains(m))
            .collect();

        match shared.as_slice() {
            &[a, b] => {
                self.rings.ring_mut(ring_id).is_fused = true;
                self.rings.ring_mut(neighbour_id).is_fused = true;
                let (pa, pb) = (self.position_of(a), self.position_of(b));
                let midpoint = pa.midpoint(pb);
                let [n0, n1] = units(pa, pb);
                let ap = apothem(poly_circumradius(bond_length, size), size);
                let c0 = midpoint + n0 * ap;
                let c1 = midpoint + n1 * ap;
                // The side away from the placed ring.
                let next_center = if center.distance_squared(c1) > center.distance_squared(c0) {
                    c1
                } else {
                    c0
                };
                let (start, previous) = if (pa - next_center).clockwise(pb - next_center) == -1 {
                    (a, b)
                } else {
                    (b, a)
                };
                vec![Task::Ring {
                    ring: neighbour_id,
                    center: next_center,
                    start: Some(start),
                    previous: Some(previous),
                }]
            }
            &[a] => {
                self.rings.ring_mut(ring_id).is_spiro = true;
                self.rings.ring_mut(neighbour_id).is_spiro = true;
                let pa = self.position_of(a);
                let direction = (pa - center).normalize_or_zero();
                let next_center = pa + direction * poly_circumradius(bond_length, size);
                vec![Task::Ring {
                    ring: neighbour_id,
                    center: next_center,
                    start: Some(a),
                    previous: None,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn ring_substituents(&mut self, ring_id: usize) -> Vec<Task> {
        let members = self.rings.ring(ring_id).members.clone();
        let mut tasks = Vec::new();
        for m in members {
            let neighbours = self.graph.vertex(m).neighbours.clone();
            for n in neighbours {
                if self.graph.vertex(n).positioned {
                    continue;
                }
                tasks.push(Task::NextBond {
                    vertex: n,
                    previous: Some(m),
                    angle: 0.0,
                    origin_shortest: false,
                });
            }
        }
        tasks
    }
}

fn flip_direction(bond: BondType) -> BondType {
    match bond {
        BondType::Up => BondType::Down,
        BondType::Down => BondType::Up,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rings::close_ring_bonds;
    use crate::smiles::parse;

    fn laid_out(smiles: &str) -> (Graph, RingSet) {
        let mut g = Graph::from_parse_tree(&parse(smiles).unwrap(), true);
        close_ring_bonds(&mut g).unwrap();
        let mut rings = RingSet::perceive(&mut g);
        let options = DrawOptions::default();
        Layout::new(&mut g, &mut rings, &options).position();
        (g, rings)
    }

    fn bond_lengths(g: &Graph) -> Vec<f64> {
        g.edges
            .iter()
            .map(|e| g.vertex(e.source_id).position.distance(g.vertex(e.target_id).position))
            .collect()
    }

    #[test]
    fn first_vertex_placement() {
        let (g, _) = laid_out("C");
        assert_eq!(g.vertex(0).position, DVec2::new(30.0, 0.0));
        assert!(g.vertex(0).positioned);
    }

    #[test]
    fn chain_bonds_have_bond_length() {
        let (g, _) = laid_out("CCCCCC");
        for d in bond_lengths(&g) {
            assert!((d - 30.0).abs() < 1e-9);
        }
    }

    #[test]
    fn chain_zig_zags() {
        let (g, _) = laid_out("CCCC");
        let p: Vec<DVec2> = g.positions();
        // Consecutive turns alternate in direction.
        let turn = |a: DVec2, b: DVec2, c: DVec2| (b - a).clockwise(c - b);
        assert_eq!(turn(p[0], p[1], p[2]), -turn(p[1], p[2], p[3]));
    }

    #[test]
    fn triple_bond_is_straight() {
        let (g, _) = laid_out("CC#CC");
        let p = g.positions();
        let d1 = (p[2] - p[1]).normalize_or_zero();
        let d2 = (p[3] - p[2]).normalize_or_zero();
        assert!((d1 - d2).length() < 1e-9);
        assert!(g.get_edge(1, 2).unwrap().center);
    }

    #[test]
    fn benzene_is_a_regular_hexagon() {
        let (g, rings) = laid_out("c1ccccc1");
        let center = rings.ring(0).center;
        for v in &g.vertices {
            assert!((v.position.distance(center) - 30.0).abs() < 1e-9);
        }
        for d in bond_lengths(&g) {
            assert!((d - 30.0).abs() < 1e-9);
        }
    }

    #[test]
    fn naphthalene_rings_do_not_overlap() {
        let (g, rings) = laid_out("c1ccc2ccccc2c1");
        let c0 = rings.ring(0).center;
        let c1 = rings.ring(1).center;
        let expected = 2.0 * crate::math::apothem_from_side_length(30.0, 6);
        assert!((c0.distance(c1) - expected).abs() < 1e-6);
        for d in bond_lengths(&g) {
            assert!((d - 30.0).abs() < 1e-6);
        }
    }

    #[test]
    fn spiro_rings_meet_in_one_point() {
        let (g, rings) = laid_out("C1CCC2(CC1)CCC2");
        assert!(rings.ring(0).is_spiro && rings.ring(1).is_spiro);
        for d in bond_lengths(&g) {
            assert!((d - 30.0).abs() < 1e-6);
        }
    }

    #[test]
    fn substituent_points_away_from_ring() {
        let (g, rings) = laid_out("Cc1ccccc1");
        let ring_center = rings.ring(0).center;
        let attach = g.vertex(1).position;
        let methyl = g.vertex(0).position;
        assert!(methyl.distance(ring_center) > attach.distance(ring_center));
    }

    #[test]
    fn bridged_ring_goes_through_force_layout() {
        let (g, rings) = laid_out("C1CC2CC1CC2");
        assert!(rings.has_bridged_ring());
        assert!(g.vertices.iter().all(|v| v.positioned));
        assert!(g.vertices.iter().any(|v| v.force_positioned));
    }

    #[test]
    fn every_vertex_is_placed() {
        for smiles in ["CC(C)(C)C", "CC.O", "C1CC1C(=O)N[C@@H](C)c1ccccc1", "OC(=O)C=CC"] {
            let (g, _) = laid_out(smiles);
            for v in &g.vertices {
                assert!(v.positioned, "{smiles}: vertex {} unplaced", v.id);
                assert!(v.position.is_finite());
            }
        }
    }

    #[test]
    fn deterministic() {
        let a = laid_out("CC1=CC2=C(C=C1)C1CCC2C1").0.positions();
        let b = laid_out("CC1=CC2=C(C=C1)C1CCC2C1").0.positions();
        assert_eq!(a, b);
    }
}
