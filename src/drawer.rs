//! End-to-end drawing: parse tree to graph, rings, layout, stereo and
//! geometry.

use serde::Serialize;
use tracing::debug;

use crate::error::DrawError;
use crate::geometry::{self, AromaticRing, BondGeometry};
use crate::graph::Graph;
use crate::layout::Layout;
use crate::math::DVec2;
use crate::options::DrawOptions;
use crate::parse_tree::ParseNode;
use crate::rings::{self, RingSet};
use crate::smiles;
use crate::stereo;

/// Everything the renderer needs for one molecule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    /// Indexed by vertex id.
    pub positions: Vec<DVec2>,
    pub bonds: Vec<BondGeometry>,
    pub aromatic_rings: Vec<AromaticRing>,
}

/// A graph with its rings, laid out and annotated.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub graph: Graph,
    pub rings: RingSet,
    /// Bridged systems placed as plain polygons after the force layout failed.
    pub layout_fallbacks: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Drawer {
    pub options: DrawOptions,
}

impl Drawer {
    pub fn new(options: DrawOptions) -> Self {
        Self { options }
    }

    pub fn draw_smiles(&self, smiles: &str) -> Result<Drawing, DrawError> {
        let tree = smiles::parse(smiles)?;
        self.draw(&tree)
    }

    pub fn draw(&self, tree: &ParseNode) -> Result<Drawing, DrawError> {
        let molecule = self.prepare(tree)?;
        Ok(self.geometry(&molecule))
    }

    /// Builds and lays out the molecule without computing bond geometry.
    pub fn prepare(&self, tree: &ParseNode) -> Result<Molecule, DrawError> {
        self.options.validate()?;
        let mut graph = Graph::from_parse_tree(tree, self.options.isomeric);
        rings::close_ring_bonds(&mut graph)?;
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built graph"
        );

        let mut rings = RingSet::perceive(&mut graph);
        stereo::hide_hydrogens(&mut graph, self.options.explicit_hydrogens);

        let mut layout = Layout::new(&mut graph, &mut rings, &self.options);
        layout.position();
        layout.resolve_primary_overlaps();
        layout.resolve_secondary_overlaps();
        let layout_fallbacks = layout.fallbacks;

        if self.options.isomeric {
            stereo::annotate_stereochemistry(&mut graph, &rings);
        }
        debug!(rings = rings.rings.len(), layout_fallbacks, "laid out molecule");

        Ok(Molecule {
            graph,
            rings,
            layout_fallbacks,
        })
    }

    pub fn geometry(&self, molecule: &Molecule) -> Drawing {
        let (graph, rings) = (&molecule.graph, &molecule.rings);
        let bonds = geometry::draw_edges(graph, rings, &self.options);
        let aromatic_rings = geometry::aromatic_rings(graph, rings, &self.options);
        debug!(
            bonds = bonds.len(),
            aromatic_rings = aromatic_rings.len(),
            "computed bond geometry"
        );
        Drawing {
            positions: graph.positions(),
            bonds,
            aromatic_rings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OptionsError, SmilesError};

    #[test]
    fn bad_smiles_is_reported() {
        let err = Drawer::default().draw_smiles("C(C").unwrap_err();
        assert!(matches!(err, DrawError::Smiles(SmilesError::UnmatchedParen { .. })));
    }

    #[test]
    fn zero_thickness_is_rejected_before_layout() {
        let options = DrawOptions {
            bond_thickness: 0.0,
            ..DrawOptions::default()
        };
        let err = Drawer::new(options).draw_smiles("N[C@@H](C)C(=O)O").unwrap_err();
        assert!(matches!(
            err,
            DrawError::Options(OptionsError::NotPositive { field: "bondThickness", .. })
        ));
    }

    #[test]
    fn disconnected_fragments_draw_without_a_bond() {
        let drawing = Drawer::default().draw_smiles("C.C").unwrap();
        assert_eq!(drawing.positions.len(), 2);
        assert!(drawing.bonds.is_empty());
    }

    #[test]
    fn hidden_hydrogen_has_no_bond() {
        let options = DrawOptions {
            explicit_hydrogens: false,
            ..DrawOptions::default()
        };
        let drawing = Drawer::new(options).draw_smiles("F[C@H](Cl)Br").unwrap();
        // Four bonds in the graph, the one to the hydrogen is not drawn.
        assert_eq!(drawing.bonds.len(), 3);
    }

    #[test]
    fn non_isomeric_ignores_stereo() {
        let options = DrawOptions {
            isomeric: false,
            ..DrawOptions::default()
        };
        let molecule = Drawer::new(options).prepare(&smiles::parse("F[C@H](Cl)Br").unwrap()).unwrap();
        assert_eq!(molecule.graph.vertex_count(), 4);
        assert!(molecule.graph.vertices.iter().all(|v| v.value.cip.is_none()));
    }

    #[test]
    fn serializes_camel_case() {
        let drawing = Drawer::default().draw_smiles("c1ccccc1").unwrap();
        let json = serde_json::to_string(&drawing).unwrap();
        assert!(json.contains("\"aromaticRings\""));
        assert!(json.contains("\"isAromaticShadow\""));
    }
}
