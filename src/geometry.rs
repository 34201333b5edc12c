//! Bond geometry: turns each edge of a laid-out graph into line segments,
//! wedge outlines and aromatic circles.
//!
//! Double bonds inside a ring get their second line on the ring's side.
//! Outside rings the second line goes to the side with more neighbouring
//! atoms, or both lines are centred on the bond axis for terminal and
//! cumulated bonds. Everything here is pure with respect to the graph.

use serde::Serialize;
use tracing::warn;

use crate::bond::{BondType, Wedge};
use crate::graph::Graph;
use crate::math::{apothem_from_side_length, units, DVec2, Line, PlaneExt, EPSILON};
use crate::options::DrawOptions;
use crate::rings::RingSet;

/// Width of the broad end of a wedge on either side of the bond axis,
/// before the half bond thickness is added.
const WEDGE_SPREAD: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineGeometry {
    pub from: DVec2,
    pub to: DVec2,
    pub left_element: String,
    pub right_element: String,
    pub is_dashed: bool,
    /// The inner line of an aromatic bond.
    pub is_aromatic_shadow: bool,
}

impl LineGeometry {
    fn plain(line: &Line) -> Self {
        Self {
            from: line.from,
            to: line.to,
            left_element: line.left_element().to_string(),
            right_element: line.right_element().to_string(),
            is_dashed: false,
            is_aromatic_shadow: false,
        }
    }

    fn aromatic(line: &Line) -> Self {
        Self {
            is_dashed: true,
            is_aromatic_shadow: true,
            ..Self::plain(line)
        }
    }
}

/// Stereo bond outline. The narrow end sits on the stereocenter; the
/// gradient runs from the narrow to the broad end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WedgeGeometry {
    Solid {
        polygon: [DVec2; 4],
        gradient_from: DVec2,
        gradient_to: DVec2,
    },
    Dashed {
        dash_segments: Vec<[DVec2; 2]>,
        gradient_from: DVec2,
        gradient_to: DVec2,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BondGeometry {
    pub edge_id: usize,
    pub lines: Vec<LineGeometry>,
    pub wedge: Option<WedgeGeometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AromaticRing {
    pub ring_id: usize,
    pub center: DVec2,
    pub radius: f64,
}

/// Tally of atoms on either side of a bond, by the side of `normals[0]`
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideCounts {
    /// Over every vertex of the graph.
    pub total_side_count: [usize; 2],
    /// Over the neighbours of the bond's endpoints.
    pub side_count: [usize; 2],
    pub a_count: usize,
    pub b_count: usize,
}

/// Unit normals of an edge, left-hand normal first.
pub fn edge_normals(graph: &Graph, edge_id: usize) -> [DVec2; 2] {
    let edge = &graph.edges[edge_id];
    units(
        graph.vertex(edge.source_id).position,
        graph.vertex(edge.target_id).position,
    )
}

/// Counts neighbouring atoms on each side of the bond `a`-`b`. `side` is a
/// point on the `normals[0]` side.
pub fn choose_side(graph: &Graph, a: usize, b: usize, side: DVec2) -> SideCounts {
    let (pa, pb) = (graph.vertex(a).position, graph.vertex(b).position);
    let an = graph.vertex(a).neighbours_except(Some(b));
    let bn = graph.vertex(b).neighbours_except(Some(a));

    let mut side_count = [0, 0];
    for &n in an.iter().chain(&bn) {
        if graph.vertex(n).position.same_side_as(pa, pb, side) {
            side_count[0] += 1;
        } else {
            side_count[1] += 1;
        }
    }
    let mut total_side_count = [0, 0];
    for v in &graph.vertices {
        if v.position.same_side_as(pa, pb, side) {
            total_side_count[0] += 1;
        } else {
            total_side_count[1] += 1;
        }
    }
    SideCounts {
        total_side_count,
        side_count,
        a_count: an.len(),
        b_count: bn.len(),
    }
}

fn offset_line(a: DVec2, b: DVec2, offset: DVec2, ea: &str, eb: &str) -> Line {
    Line::new(a + offset, b + offset, ea, eb)
}

/// Geometry of one edge. `None` for `.` bonds, bonds to hidden atoms and
/// degenerate bonds.
pub fn bond_geometry(
    graph: &Graph,
    rings: &RingSet,
    options: &DrawOptions,
    edge_id: usize,
) -> Option<BondGeometry> {
    let edge = &graph.edges[edge_id];
    let (va, vb) = (graph.vertex(edge.source_id), graph.vertex(edge.target_id));
    if !va.value.is_drawn || !vb.value.is_drawn || edge.bond_type == BondType::NoBond {
        return None;
    }
    let (a, b) = (va.position, vb.position);
    if !a.is_finite() || !b.is_finite() || a.distance(b) < EPSILON {
        warn!(edge = edge_id, ?a, ?b, "skipping bond with degenerate endpoints");
        return None;
    }
    let (ea, eb) = (va.value.element.as_str(), vb.value.element.as_str());
    let normals = edge_normals(graph, edge_id);
    let full = Line::new(a, b, ea, eb);
    let mut lines = Vec::new();
    let mut wedge = None;

    // Ring closures carry their resolved symbol on the edge.
    let draws_double = edge.bond_type == BondType::Double
        || (edge.is_part_of_aromatic_ring && rings.has_bridged_ring());

    if draws_double {
        let side = a + normals[0] * 10.0;
        let counts = choose_side(graph, va.id, vb.id, side);
        if let Some(ring) = rings.largest_or_aromatic_common_ring(graph, va.id, vb.id) {
            // Inside the ring, on the side of its centre.
            let center = ring.centroid(graph);
            let spaced = normals.map(|n| n * options.bond_spacing);
            let inner = if center.same_side_as(a, b, a + spaced[0]) {
                spaced[0]
            } else {
                spaced[1]
            };
            let mut line = offset_line(a, b, inner, ea, eb);
            line.shorten(options.short_bond_shortening());
            lines.push(if edge.is_part_of_aromatic_ring {
                LineGeometry::aromatic(&line)
            } else {
                LineGeometry::plain(&line)
            });
            lines.push(LineGeometry::plain(&full));
        } else if edge.center
            || (va.is_terminal() && vb.is_terminal())
            || (counts.a_count == 0 && counts.b_count > 1)
            || (counts.b_count == 0 && counts.a_count > 1)
        {
            let half = normals.map(|n| n * options.half_bond_spacing());
            lines.push(LineGeometry::plain(&offset_line(a, b, half[0], ea, eb)));
            lines.push(LineGeometry::plain(&offset_line(a, b, half[1], ea, eb)));
        } else {
            let by_side = counts.side_count[0].cmp(&counts.side_count[1]);
            let by_total = counts.total_side_count[0].cmp(&counts.total_side_count[1]);
            let normal = if by_side.then(by_total).is_gt() {
                normals[0]
            } else {
                normals[1]
            };
            let mut line = offset_line(a, b, normal * options.bond_spacing, ea, eb);
            line.shorten(options.short_bond_shortening());
            lines.push(LineGeometry::plain(&line));
            lines.push(LineGeometry::plain(&full));
        }
    } else if edge.bond_type == BondType::Triple {
        let spaced = normals.map(|n| n * (options.bond_spacing / 1.5));
        lines.push(LineGeometry::plain(&offset_line(a, b, spaced[0], ea, eb)));
        lines.push(LineGeometry::plain(&offset_line(a, b, spaced[1], ea, eb)));
        lines.push(LineGeometry::plain(&full));
    } else {
        let line = full.with_chirality(va.value.is_stereo_center, vb.value.is_stereo_center);
        match edge.wedge {
            Wedge::Up => wedge = Some(solid_wedge(&line, options)),
            Wedge::Down => wedge = Some(dashed_wedge(&line, options)),
            Wedge::None => lines.push(LineGeometry::plain(&line)),
        }
    }

    Some(BondGeometry {
        edge_id,
        lines,
        wedge,
    })
}

/// Narrow and broad end of a wedge drawn along `line`.
fn wedge_ends(line: &Line) -> (DVec2, DVec2) {
    let (l, r) = (line.left(), line.right());
    if line.right_chiral() {
        (r, l)
    } else {
        (l, r)
    }
}

pub fn solid_wedge(line: &Line, options: &DrawOptions) -> WedgeGeometry {
    let [n0, n1] = units(line.left(), line.right());
    let (start, end) = wedge_ends(line);
    let half = options.bond_thickness / 2.0;
    WedgeGeometry::Solid {
        polygon: [
            start + n0 * half,
            end + n0 * (WEDGE_SPREAD + half),
            end + n1 * (WEDGE_SPREAD + half),
            start + n1 * half,
        ],
        gradient_from: start,
        gradient_to: end,
    }
}

/// Dashes across the bond, widening from the stereocenter outwards.
pub fn dashed_wedge(line: &Line, options: &DrawOptions) -> WedgeGeometry {
    let [n0, _] = units(line.left(), line.right());
    let (start, end) = wedge_ends(line);
    let dir = (end - start).normalize_or_zero();
    let length = line.length();
    let step = 1.25 / (length / (options.bond_thickness * 3.0));

    let mut dash_segments = Vec::new();
    if !step.is_finite() || step <= 0.0 {
        warn!(step, "no dash spacing for wedge");
        return WedgeGeometry::Dashed {
            dash_segments,
            gradient_from: start,
            gradient_to: end,
        };
    }
    let mut t = 0.0;
    while t < 1.0 {
        let offset = n0 * (WEDGE_SPREAD * t);
        let base = start + dir * (t * length) - offset;
        dash_segments.push([base, base + offset * 2.0]);
        t += step;
    }
    WedgeGeometry::Dashed {
        dash_segments,
        gradient_from: start,
        gradient_to: end,
    }
}

/// Geometry for every drawable edge, in breadth-first order from vertex 0.
pub fn draw_edges(graph: &Graph, rings: &RingSet, options: &DrawOptions) -> Vec<BondGeometry> {
    let mut drawn = vec![false; graph.edge_count()];
    let mut reached = vec![false; graph.vertex_count()];
    let mut out = Vec::new();
    for start in 0..graph.vertex_count() {
        if reached[start] {
            continue;
        }
        graph.traverse_bf(start, |v| {
            reached[v] = true;
            for edge_id in graph.get_edges(v) {
                if drawn[edge_id] {
                    continue;
                }
                drawn[edge_id] = true;
                if let Some(bond) = bond_geometry(graph, rings, options, edge_id) {
                    out.push(bond);
                }
            }
        });
    }
    out
}

/// One circle per aromatic simple ring. None are drawn when a bridged ring
/// exists; aromatic bonds are then drawn as double bonds instead.
pub fn aromatic_rings(graph: &Graph, rings: &RingSet, options: &DrawOptions) -> Vec<AromaticRing> {
    if rings.has_bridged_ring() {
        return Vec::new();
    }
    rings
        .simple_rings()
        .filter(|r| r.is_aromatic(graph))
        .map(|r| AromaticRing {
            ring_id: r.id,
            center: r.centroid(graph),
            radius: apothem_from_side_length(options.bond_length, r.size()) - options.bond_spacing,
        })
        .collect()
}
