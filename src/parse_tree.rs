//! The parse tree consumed by graph construction.
//!
//! Each node is one atom. `bond` is the bond leading into the node from its
//! parent, `branches` are parenthesized side chains in input order and
//! `next` continues the main chain. Ring closures are kept as descriptors
//! and only turned into edges by ring analysis.

use serde::{Deserialize, Serialize};

use crate::atom::Chirality;
use crate::bond::BondType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketAtom {
    pub symbol: String,
    pub isotope: u16,
    pub chirality: Chirality,
    /// Hydrogens written inside the brackets (`[CH2]`). `None` when absent.
    pub hcount: Option<u8>,
    pub charge: i8,
    pub class: u16,
}

impl BracketAtom {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            isotope: 0,
            chirality: Chirality::None,
            hcount: None,
            charge: 0,
            class: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParseAtom {
    /// An organic-subset atom written without brackets.
    Bare { symbol: String },
    Bracket(BracketAtom),
}

impl ParseAtom {
    pub fn bare(symbol: &str) -> Self {
        ParseAtom::Bare {
            symbol: symbol.to_string(),
        }
    }

    /// Symbol as written, lowercase for aromatic atoms.
    pub fn symbol(&self) -> &str {
        match self {
            ParseAtom::Bare { symbol } => symbol,
            ParseAtom::Bracket(b) => &b.symbol,
        }
    }

    pub fn bracket(&self) -> Option<&BracketAtom> {
        match self {
            ParseAtom::Bare { .. } => None,
            ParseAtom::Bracket(b) => Some(b),
        }
    }
}

/// A ring-bond descriptor: the ring-closure number and the bond symbol
/// written next to it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingBond {
    pub id: u16,
    pub bond: Option<BondType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseNode {
    pub atom: ParseAtom,
    pub bond: BondType,
    pub branches: Vec<ParseNode>,
    pub ring_bonds: Vec<RingBond>,
    pub next: Option<Box<ParseNode>>,
}

impl ParseNode {
    pub fn new(atom: ParseAtom) -> Self {
        Self {
            atom,
            bond: BondType::Single,
            branches: Vec::new(),
            ring_bonds: Vec::new(),
            next: None,
        }
    }

    pub fn with_bond(mut self, bond: BondType) -> Self {
        self.bond = bond;
        self
    }

    pub fn with_branch(mut self, branch: ParseNode) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn with_ring_bond(mut self, id: u16, bond: Option<BondType>) -> Self {
        self.ring_bonds.push(RingBond { id, bond });
        self
    }

    pub fn with_next(mut self, next: ParseNode) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    pub fn ring_bond_count(&self) -> usize {
        self.ring_bonds.len()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Total number of nodes in the tree rooted here.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.branches.iter());
            if let Some(next) = &node.next {
                stack.push(next);
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_counts() {
        let tree = ParseNode::new(ParseAtom::bare("C"))
            .with_branch(ParseNode::new(ParseAtom::bare("O")).with_bond(BondType::Double))
            .with_next(ParseNode::new(ParseAtom::bare("O")));
        assert_eq!(tree.branch_count(), 1);
        assert!(tree.has_next());
        assert_eq!(tree.ring_bond_count(), 0);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn bracket_accessors() {
        let mut b = BracketAtom::new("N");
        b.charge = 1;
        b.hcount = Some(4);
        let atom = ParseAtom::Bracket(b);
        assert_eq!(atom.symbol(), "N");
        assert_eq!(atom.bracket().and_then(|b| b.hcount), Some(4));
        assert!(ParseAtom::bare("c").bracket().is_none());
    }
}
