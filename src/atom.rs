use serde::{Deserialize, Serialize};

use crate::bond::BondType;
use crate::element;
use crate::parse_tree::{BracketAtom, ParseAtom, RingBond};

/// Chirality marker written on a bracket atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Chirality {
    /// No chirality marker.
    #[default]
    None,
    /// Clockwise (`@@`) arrangement.
    Cw,
    /// Counterclockwise (`@`) arrangement.
    Ccw,
}

/// Stereo descriptor assigned to a drawn stereocenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cip {
    R,
    S,
}

/// Atom payload owned by a vertex.
///
/// Holds what was written in the input plus the flags that ring analysis,
/// layout and stereo annotation attach to an atom while a molecule is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Normalized element symbol (`C`, `Cl`), never the aromatic lowercase form.
    pub element: String,
    pub bracket: Option<BracketAtom>,
    /// Index among heavy atoms, `None` for folded hydrogens.
    pub idx: Option<usize>,
    /// Bond to the main-chain continuation of this atom.
    pub bond_type: BondType,
    /// Bond into this atom when it heads a branch.
    pub branch_bond: Option<BondType>,
    pub ring_bonds: Vec<RingBond>,
    /// Ids of the simple rings containing this atom.
    pub rings: Vec<usize>,
    /// Id of the bridged ring system this atom is laid out with.
    pub bridged_ring: Option<usize>,
    /// Rings whose centre moves with this atom when its subtree is rotated.
    pub anchored_rings: Vec<usize>,
    pub bond_count: u32,
    /// Written in aromatic form. Ring-level aromaticity is decided by ring analysis.
    pub is_part_of_aromatic_ring: bool,
    pub is_stereo_center: bool,
    pub has_hydrogen: bool,
    pub is_drawn: bool,
    /// Inside a bridged system without lying on its periphery.
    pub is_bridge: bool,
    pub subtree_depth: usize,
    pub cip: Option<Cip>,
}

impl Atom {
    pub fn new(symbol: &str) -> Self {
        Self {
            element: element::normalize_symbol(symbol),
            bracket: None,
            idx: None,
            bond_type: BondType::Single,
            branch_bond: None,
            ring_bonds: Vec::new(),
            rings: Vec::new(),
            bridged_ring: None,
            anchored_rings: Vec::new(),
            bond_count: 0,
            is_part_of_aromatic_ring: element::is_aromatic_symbol(symbol),
            is_stereo_center: false,
            has_hydrogen: false,
            is_drawn: true,
            is_bridge: false,
            subtree_depth: 1,
            cip: None,
        }
    }

    pub fn from_parse_atom(atom: &ParseAtom) -> Self {
        let mut out = Atom::new(atom.symbol());
        out.bracket = atom.bracket().cloned();
        out
    }

    pub fn atomic_number(&self) -> u8 {
        element::atomic_number(&self.element)
    }

    pub fn max_bonds(&self) -> u8 {
        element::max_bonds(&self.element)
    }

    pub fn is_hetero_atom(&self) -> bool {
        self.element != "C" && self.element != "H"
    }

    pub fn chirality(&self) -> Chirality {
        self.bracket
            .as_ref()
            .map(|b| b.chirality)
            .unwrap_or(Chirality::None)
    }

    /// Hydrogens written inside the brackets, `0` for bare atoms.
    pub fn bracket_hcount(&self) -> u8 {
        self.bracket.as_ref().and_then(|b| b.hcount).unwrap_or(0)
    }

    pub fn ring_bond_count(&self) -> usize {
        self.ring_bonds.len()
    }

    pub fn in_ring(&self, ring_id: usize) -> bool {
        self.rings.contains(&ring_id)
    }
}
