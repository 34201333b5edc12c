use molsketch::geometry::LineGeometry;
use molsketch::math::{DVec2, PlaneExt};
use molsketch::{parse_smiles, BondType, DrawOptions, Drawer, Drawing, Molecule, WedgeGeometry};

fn prepare(smiles: &str) -> (Drawer, Molecule) {
    let drawer = Drawer::default();
    let tree = parse_smiles(smiles).unwrap_or_else(|e| panic!("parse failed for '{smiles}': {e}"));
    let molecule = drawer
        .prepare(&tree)
        .unwrap_or_else(|e| panic!("prepare failed for '{smiles}': {e}"));
    (drawer, molecule)
}

fn draw(smiles: &str) -> Drawing {
    Drawer::default()
        .draw_smiles(smiles)
        .unwrap_or_else(|e| panic!("draw failed for '{smiles}': {e}"))
}

fn midpoint(line: &LineGeometry) -> DVec2 {
    line.from.midpoint(line.to)
}

#[test]
fn ethene_is_two_symmetric_lines() {
    let drawing = draw("C=C");
    assert_eq!(drawing.positions.len(), 2);
    assert_eq!(drawing.bonds.len(), 1);
    let lines = &drawing.bonds[0].lines;
    assert_eq!(lines.len(), 2);

    let axis = drawing.positions[0].midpoint(drawing.positions[1]);
    let (m0, m1) = (midpoint(&lines[0]), midpoint(&lines[1]));
    let spacing = DrawOptions::default().bond_spacing;
    assert!((m0.distance(m1) - spacing).abs() < 1e-9);
    assert!(m0.midpoint(m1).distance(axis) < 1e-9);
    assert!(lines.iter().all(|l| !l.is_dashed && !l.is_aromatic_shadow));
}

#[test]
fn benzene_is_six_lines_and_a_circle() {
    let drawing = draw("c1ccccc1");
    assert_eq!(drawing.bonds.len(), 6);
    assert!(drawing.bonds.iter().all(|b| b.lines.len() == 1 && b.wedge.is_none()));
    assert_eq!(drawing.aromatic_rings.len(), 1);

    let ring = &drawing.aromatic_rings[0];
    let expected = molsketch::math::apothem_from_side_length(30.0, 6) - 0.17 * 30.0;
    assert!((ring.radius - expected).abs() < 1e-9);
    for p in &drawing.positions {
        assert!((p.distance(ring.center) - 30.0).abs() < 1e-6);
    }
}

#[test]
fn kekule_benzene_has_no_circle() {
    let drawing = draw("C1=CC=CC=C1");
    assert!(drawing.aromatic_rings.is_empty());
    let doubles = drawing.bonds.iter().filter(|b| b.lines.len() == 2).count();
    assert_eq!(doubles, 3);
}

#[test]
fn ring_double_bond_is_drawn_inside() {
    for smiles in ["C1=CCCCC1", "C1CCCC=C1", "C1CC=CCC1", "C1CCC2=C(C1)CCCC2"] {
        let (drawer, molecule) = prepare(smiles);
        let drawing = drawer.geometry(&molecule);
        let graph = &molecule.graph;
        let mut checked = 0;
        for bond in &drawing.bonds {
            let edge = &graph.edges[bond.edge_id];
            if edge.bond_type != BondType::Double {
                continue;
            }
            let ring = molecule
                .rings
                .largest_or_aromatic_common_ring(graph, edge.source_id, edge.target_id)
                .unwrap_or_else(|| panic!("{smiles}: double bond outside a ring"));
            let center = ring.centroid(graph);
            let a = graph.vertex(edge.source_id).position;
            let b = graph.vertex(edge.target_id).position;

            assert_eq!(bond.lines.len(), 2, "{smiles}");
            let inner = midpoint(&bond.lines[0]);
            assert!(
                center.same_side_as(a, b, inner),
                "{smiles}: inner line of edge {} is outside the ring",
                bond.edge_id
            );
            assert!(bond.lines[0].from.distance(bond.lines[0].to) < a.distance(b));
            checked += 1;
        }
        assert!(checked > 0, "{smiles}: no double bond checked");
    }
}

#[test]
fn reused_ring_digit_keeps_chain_bonds_single() {
    let (drawer, molecule) = prepare("C1CC1C=1CCC1");
    let drawing = drawer.geometry(&molecule);
    let graph = &molecule.graph;
    for bond in &drawing.bonds {
        let edge = &graph.edges[bond.edge_id];
        let expected = match edge.bond_type {
            BondType::Double => 2,
            _ => 1,
        };
        assert_eq!(
            bond.lines.len(),
            expected,
            "edge {}-{} ({:?})",
            edge.source_id,
            edge.target_id,
            edge.bond_type
        );
    }
    assert_eq!(graph.get_edge(3, 6).map(|e| e.bond_type), Some(BondType::Double));
}

#[test]
fn bonds_follow_breadth_first_order() {
    let drawing = draw("C1CCC1");
    let order: Vec<usize> = drawing.bonds.iter().map(|b| b.edge_id).collect();
    assert_eq!(order, vec![0, 3, 1, 2]);

    let drawing = draw("CC(C)C");
    let order: Vec<usize> = drawing.bonds.iter().map(|b| b.edge_id).collect();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn bridged_layout_is_deterministic() {
    let a = draw("C1CC2CC1CC2");
    let b = draw("C1CC2CC1CC2");
    assert_eq!(a, b);
    assert!(a.positions.iter().all(|p| p.is_finite()));
    assert_eq!(a.bonds.len(), 8);
}

#[test]
fn bridged_aromatic_edges_draw_as_double() {
    let (drawer, molecule) = prepare("c1cc2ccc1C2");
    assert!(molecule.rings.has_bridged_ring());
    let drawing = drawer.geometry(&molecule);
    assert!(drawing.aromatic_rings.is_empty());
    for bond in &drawing.bonds {
        let edge = &molecule.graph.edges[bond.edge_id];
        if edge.is_part_of_aromatic_ring {
            assert_eq!(bond.lines.len(), 2);
        }
    }
}

#[test]
fn stereocenter_draws_wedges() {
    let drawing = draw("N[C@@H](C)C(=O)O");
    let wedges: Vec<&WedgeGeometry> = drawing.bonds.iter().filter_map(|b| b.wedge.as_ref()).collect();
    assert_eq!(wedges.len(), 2);
    let solid = wedges
        .iter()
        .filter(|w| matches!(w, WedgeGeometry::Solid { .. }))
        .count();
    assert_eq!(solid, 1);
    // Every wedge narrows towards the stereocenter.
    for w in wedges {
        let from = match w {
            WedgeGeometry::Solid { gradient_from, .. } => gradient_from,
            WedgeGeometry::Dashed { gradient_from, .. } => gradient_from,
        };
        assert_eq!(*from, drawing.positions[1]);
    }
}

#[test]
fn real_molecules_render() {
    for smiles in [
        "Cn1cnc2c1c(=O)n(C)c(=O)n2C",
        "CC(C)Cc1ccc(cc1)C(C)C(=O)O",
        "CC1(C)C2CCC1(C)C(=O)C2",
        "C12C3C4C1C5C3C4C25",
        "CC(C)c1c(C(=O)Nc2ccccc2)c(-c2ccccc2)c(-c2ccc(F)cc2)n1CC[C@@H](O)C[C@@H](O)CC(=O)O",
    ] {
        let drawing = draw(smiles);
        assert!(
            drawing.positions.iter().all(|p| p.is_finite()),
            "{smiles}: non-finite position"
        );
        for bond in &drawing.bonds {
            for line in &bond.lines {
                assert!(line.from.is_finite() && line.to.is_finite(), "{smiles}");
            }
        }
    }
}
