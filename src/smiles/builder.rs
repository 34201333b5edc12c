use std::collections::BTreeMap;

use crate::bond::BondType;
use crate::error::SmilesError;
use crate::parse_tree::{ParseAtom, ParseNode, RingBond};
use crate::smiles::tokenizer::Token;

/// A node before nesting: children are referenced by index.
#[derive(Debug)]
struct FlatNode {
    atom: ParseAtom,
    bond: BondType,
    ring_bonds: Vec<RingBond>,
    branches: Vec<usize>,
    next: Option<usize>,
}

pub fn build_parse_tree(tokens: &[Token]) -> Result<ParseNode, SmilesError> {
    let mut nodes: Vec<FlatNode> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut current: Option<usize> = None;
    let mut opens_branch = false;
    let mut pending_bond: Option<(BondType, usize)> = None;
    let mut open_rings: BTreeMap<u16, usize> = BTreeMap::new();

    for token in tokens {
        match token {
            Token::Atom { atom, pos } => {
                let idx = nodes.len();
                let bond = match (current, pending_bond.take()) {
                    (None, Some(_)) => return Err(SmilesError::DanglingBond { pos: *pos }),
                    (_, Some((bond, _))) => bond,
                    (_, None) => BondType::Single,
                };
                nodes.push(FlatNode {
                    atom: atom.clone(),
                    bond,
                    ring_bonds: Vec::new(),
                    branches: Vec::new(),
                    next: None,
                });
                if let Some(cur) = current {
                    if opens_branch {
                        nodes[cur].branches.push(idx);
                    } else {
                        nodes[cur].next = Some(idx);
                    }
                }
                opens_branch = false;
                current = Some(idx);
            }
            Token::Bond { bond, pos } => {
                if pending_bond.is_some() {
                    return Err(SmilesError::UnexpectedChar {
                        pos: *pos,
                        ch: bond.symbol(),
                    });
                }
                pending_bond = Some((*bond, *pos));
            }
            Token::RingClosure { bond, digit, pos } => {
                let cur = current.ok_or(SmilesError::InvalidRingBond {
                    digit: *digit,
                    pos: *pos,
                })?;
                if open_rings.remove(digit).is_none() {
                    open_rings.insert(*digit, cur);
                }
                nodes[cur].ring_bonds.push(RingBond {
                    id: *digit,
                    bond: *bond,
                });
            }
            Token::OpenParen(pos) => {
                let cur = current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                if let Some((_, bond_pos)) = pending_bond {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                stack.push(cur);
                opens_branch = true;
            }
            Token::CloseParen(pos) => {
                if let Some((_, bond_pos)) = pending_bond {
                    return Err(SmilesError::DanglingBond { pos: bond_pos });
                }
                current = Some(stack.pop().ok_or(SmilesError::UnmatchedParen { pos: *pos })?);
                opens_branch = false;
            }
            Token::Dot(pos) => {
                if current.is_none() || pending_bond.is_some() {
                    return Err(SmilesError::UnexpectedChar { pos: *pos, ch: '.' });
                }
                pending_bond = Some((BondType::NoBond, *pos));
            }
        }
    }

    if let Some((_, pos)) = pending_bond {
        return Err(SmilesError::DanglingBond { pos });
    }
    if !stack.is_empty() {
        return Err(SmilesError::UnmatchedParen { pos: 0 });
    }
    if let Some((&digit, _)) = open_rings.iter().next() {
        return Err(SmilesError::UnclosedRing { digit });
    }

    nest(nodes)
}

/// Children always come after their parent, so building from the back
/// finds every child finished.
fn nest(nodes: Vec<FlatNode>) -> Result<ParseNode, SmilesError> {
    let mut built: Vec<Option<ParseNode>> = Vec::with_capacity(nodes.len());
    built.resize_with(nodes.len(), || None);

    for (idx, flat) in nodes.into_iter().enumerate().rev() {
        let branches = flat
            .branches
            .iter()
            .filter_map(|&b| built[b].take())
            .collect();
        let next = flat.next.and_then(|n| built[n].take()).map(Box::new);
        built[idx] = Some(ParseNode {
            atom: flat.atom,
            bond: flat.bond,
            branches,
            ring_bonds: flat.ring_bonds,
            next,
        });
    }

    built
        .into_iter()
        .next()
        .flatten()
        .ok_or(SmilesError::EmptyInput)
}
