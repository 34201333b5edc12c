//! A small SMILES reader producing the nested [`ParseNode`] tree.
//!
//! It checks structure only (brackets, parentheses, ring digits); valence
//! and aromaticity are taken as written.

mod builder;
mod tokenizer;

use crate::error::SmilesError;
use crate::parse_tree::ParseNode;

pub use tokenizer::{tokenize, Token};

pub fn parse(s: &str) -> Result<ParseNode, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    builder::build_parse_tree(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Chirality;
    use crate::bond::BondType;

    #[test]
    fn empty_input() {
        assert_eq!(parse("").unwrap_err(), SmilesError::EmptyInput);
        assert_eq!(parse("   ").unwrap_err(), SmilesError::EmptyInput);
    }

    #[test]
    fn benzene() {
        let tree = parse("c1ccccc1").unwrap();
        assert_eq!(tree.node_count(), 6);
        assert_eq!(tree.atom.symbol(), "c");
        assert_eq!(tree.ring_bond_count(), 1);
    }

    #[test]
    fn stereocenter() {
        let tree = parse("N[C@@H](C)C(=O)O").unwrap();
        let center = tree.next.as_ref().unwrap();
        let bracket = center.atom.bracket().unwrap();
        assert_eq!(bracket.chirality, Chirality::Cw);
        assert_eq!(bracket.hcount, Some(1));
    }

    #[test]
    fn directional_bonds() {
        let tree = parse("F/C=C/F").unwrap();
        let c1 = tree.next.as_ref().unwrap();
        assert_eq!(c1.bond, BondType::Up);
        assert_eq!(c1.next.as_ref().unwrap().bond, BondType::Double);
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(parse("  CC \n").unwrap().node_count(), 2);
    }
}
