//! Element symbol lookups needed by depiction: atomic numbers for stereo
//! priorities and typical bond capacity for implicit hydrogen filling.

static SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca",
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Canonical capitalization of an element symbol: aromatic lowercase forms
/// (`c`, `se`) map to `C`, `Se`.
pub fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.extend(chars.flat_map(|c| c.to_lowercase()));
            out
        }
        None => String::new(),
    }
}

/// Whether the symbol is written in aromatic (lowercase) form.
pub fn is_aromatic_symbol(symbol: &str) -> bool {
    symbol.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

/// Atomic number for a (normalized) symbol, `0` when unknown.
pub fn atomic_number(symbol: &str) -> u8 {
    SYMBOLS
        .iter()
        .position(|&s| s == symbol)
        .map(|i| (i + 1) as u8)
        .unwrap_or(0)
}

pub fn is_known(symbol: &str) -> bool {
    atomic_number(symbol) != 0
}

/// Number of bonds an uncharged atom of this element usually forms.
pub fn max_bonds(symbol: &str) -> u8 {
    match symbol {
        "H" | "F" | "Cl" | "Br" | "I" => 1,
        "O" | "S" => 2,
        "B" | "N" | "P" => 3,
        "C" => 4,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        assert_eq!(normalize_symbol("c"), "C");
        assert_eq!(normalize_symbol("se"), "Se");
        assert_eq!(normalize_symbol("Cl"), "Cl");
    }

    #[test]
    fn numbers() {
        assert_eq!(atomic_number("H"), 1);
        assert_eq!(atomic_number("C"), 6);
        assert_eq!(atomic_number("Br"), 35);
        assert_eq!(atomic_number("Og"), 118);
        assert_eq!(atomic_number("Xx"), 0);
    }

    #[test]
    fn aromatic_form() {
        assert!(is_aromatic_symbol("c"));
        assert!(!is_aromatic_symbol("C"));
    }
}
