use serde::{Deserialize, Serialize};

/// Bond symbol as written in the input.
///
/// The weight of an edge is a pure function of this symbol, see
/// [`BondType::weight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BondType {
    /// `.`: disconnected fragments, drawn as nothing.
    NoBond,
    /// `-`
    #[default]
    Single,
    /// `=`
    Double,
    /// `#`
    Triple,
    /// `$`
    Quadruple,
    /// `:`
    Aromatic,
    /// `/`
    Up,
    /// `\`
    Down,
}

impl BondType {
    pub fn from_symbol(symbol: char) -> Option<BondType> {
        match symbol {
            '.' => Some(BondType::NoBond),
            '-' => Some(BondType::Single),
            '=' => Some(BondType::Double),
            '#' => Some(BondType::Triple),
            '$' => Some(BondType::Quadruple),
            ':' => Some(BondType::Aromatic),
            '/' => Some(BondType::Up),
            '\\' => Some(BondType::Down),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BondType::NoBond => '.',
            BondType::Single => '-',
            BondType::Double => '=',
            BondType::Triple => '#',
            BondType::Quadruple => '$',
            BondType::Aromatic => ':',
            BondType::Up => '/',
            BondType::Down => '\\',
        }
    }

    /// Bond order contributed to both endpoints' bond counts.
    pub fn weight(self) -> u8 {
        match self {
            BondType::NoBond => 0,
            BondType::Single | BondType::Aromatic | BondType::Up | BondType::Down => 1,
            BondType::Double => 2,
            BondType::Triple => 3,
            BondType::Quadruple => 4,
        }
    }

    /// `/` and `\`, which encode double-bond configuration.
    pub fn is_directional(self) -> bool {
        matches!(self, BondType::Up | BondType::Down)
    }
}

/// Stereo glyph for a single bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Wedge {
    #[default]
    None,
    /// Solid wedge, pointing towards the viewer.
    Up,
    /// Dashed wedge, pointing away from the viewer.
    Down,
}

/// A bond between two vertices. `id` is its position in the graph's edge
/// sequence and is assigned when the edge is added.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: usize,
    pub source_id: usize,
    pub target_id: usize,
    pub weight: u8,
    pub bond_type: BondType,
    /// Both endpoints are flagged aromatic. Necessary, not sufficient.
    pub is_part_of_aromatic_ring: bool,
    /// Draw a double bond centred on the bond axis.
    pub center: bool,
    pub wedge: Wedge,
}

impl Edge {
    pub fn new(source_id: usize, target_id: usize, bond_type: BondType) -> Self {
        Self {
            id: 0,
            source_id,
            target_id,
            weight: bond_type.weight(),
            bond_type,
            is_part_of_aromatic_ring: false,
            center: false,
            wedge: Wedge::None,
        }
    }

    pub fn set_bond_type(&mut self, bond_type: BondType) {
        self.bond_type = bond_type;
        self.weight = bond_type.weight();
    }

    /// The endpoint that is not `vertex_id`.
    pub fn other(&self, vertex_id: usize) -> usize {
        if self.source_id == vertex_id {
            self.target_id
        } else {
            self.source_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_follow_symbols() {
        let table = [('.', 0), ('-', 1), ('/', 1), ('\\', 1), ('=', 2), ('#', 3), ('$', 4)];
        for (symbol, weight) in table {
            let bond = BondType::from_symbol(symbol).unwrap();
            assert_eq!(bond.weight(), weight, "weight of {symbol}");
            assert_eq!(bond.symbol(), symbol);
        }
    }

    #[test]
    fn set_bond_type_updates_weight() {
        let mut edge = Edge::new(0, 1, BondType::Single);
        edge.set_bond_type(BondType::Triple);
        assert_eq!(edge.weight, 3);
        assert_eq!(edge.other(0), 1);
        assert_eq!(edge.other(1), 0);
    }
}
