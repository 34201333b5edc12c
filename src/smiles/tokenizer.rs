use crate::atom::Chirality;
use crate::bond::BondType;
use crate::element;
use crate::error::SmilesError;
use crate::parse_tree::{BracketAtom, ParseAtom};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Atom {
        atom: ParseAtom,
        pos: usize,
    },
    Bond {
        bond: BondType,
        pos: usize,
    },
    RingClosure {
        bond: Option<BondType>,
        digit: u16,
        pos: usize,
    },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

const ORGANIC_TWO: [&str; 2] = ["Cl", "Br"];
const ORGANIC_ONE: [char; 14] = [
    'B', 'C', 'N', 'O', 'P', 'S', 'F', 'I', 'b', 'c', 'n', 'o', 'p', 's',
];

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ' ' | '\t' | '\r' | '\n' => {
                i += 1;
            }
            '[' => {
                let (bracket, next) = parse_bracket_atom(&chars, i)?;
                tokens.push(Token::Atom {
                    atom: ParseAtom::Bracket(bracket),
                    pos: i,
                });
                i = next;
            }
            c if c.is_ascii_alphabetic() => {
                let two: String = chars[i..(i + 2).min(chars.len())].iter().collect();
                if ORGANIC_TWO.contains(&two.as_str()) {
                    tokens.push(Token::Atom {
                        atom: ParseAtom::bare(&two),
                        pos: i,
                    });
                    i += 2;
                } else if ORGANIC_ONE.contains(&c) {
                    tokens.push(Token::Atom {
                        atom: ParseAtom::bare(&c.to_string()),
                        pos: i,
                    });
                    i += 1;
                } else {
                    return Err(SmilesError::UnexpectedChar { pos: i, ch: c });
                }
            }
            '-' => {
                if looks_like_bond(&tokens) {
                    tokens.push(Token::Bond {
                        bond: BondType::Single,
                        pos: i,
                    });
                    i += 1;
                } else {
                    return Err(SmilesError::UnexpectedChar { pos: i, ch: '-' });
                }
            }
            c @ ('=' | '#' | '$' | ':' | '/' | '\\') => {
                if let Some(bond) = BondType::from_symbol(c) {
                    tokens.push(Token::Bond { bond, pos: i });
                }
                i += 1;
            }
            '(' => {
                tokens.push(Token::OpenParen(i));
                i += 1;
            }
            ')' => {
                tokens.push(Token::CloseParen(i));
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot(i));
                i += 1;
            }
            '%' => {
                let (digit, next) = parse_percent_ring(&chars, i)?;
                let bond = try_consume_pending_bond(&mut tokens);
                tokens.push(Token::RingClosure { bond, digit, pos: i });
                i = next;
            }
            d @ '0'..='9' => {
                let bond = try_consume_pending_bond(&mut tokens);
                tokens.push(Token::RingClosure {
                    bond,
                    digit: (d as u16) - b'0' as u16,
                    pos: i,
                });
                i += 1;
            }
            ch => return Err(SmilesError::UnexpectedChar { pos: i, ch }),
        }
    }

    Ok(tokens)
}

fn looks_like_bond(tokens: &[Token]) -> bool {
    matches!(
        tokens.last(),
        Some(Token::Atom { .. })
            | Some(Token::RingClosure { .. })
            | Some(Token::CloseParen(_))
            | Some(Token::OpenParen(_))
            | None
    )
}

fn try_consume_pending_bond(tokens: &mut Vec<Token>) -> Option<BondType> {
    if let Some(Token::Bond { .. }) = tokens.last() {
        if let Some(Token::Bond { bond, .. }) = tokens.pop() {
            return Some(bond);
        }
    }
    None
}

fn parse_percent_ring(chars: &[char], start: usize) -> Result<(u16, usize), SmilesError> {
    let i = start + 1;
    if i + 1 >= chars.len() || !chars[i].is_ascii_digit() || !chars[i + 1].is_ascii_digit() {
        return Err(SmilesError::UnexpectedChar {
            pos: start,
            ch: '%',
        });
    }
    let d1 = (chars[i] as u16) - b'0' as u16;
    let d2 = (chars[i + 1] as u16) - b'0' as u16;
    Ok((d1 * 10 + d2, i + 2))
}

fn parse_bracket_atom(chars: &[char], start: usize) -> Result<(BracketAtom, usize), SmilesError> {
    let mut i = start + 1;

    let isotope = parse_isotope(chars, &mut i)?;
    let symbol = parse_bracket_element(chars, &mut i, start)?;
    let chirality = parse_chirality(chars, &mut i);
    let hcount = parse_hcount(chars, &mut i);
    let charge = parse_charge(chars, &mut i)?;
    let class = parse_atom_class(chars, &mut i)?;

    if i >= chars.len() || chars[i] != ']' {
        return Err(SmilesError::UnclosedBracket { pos: start });
    }
    i += 1;

    let mut bracket = BracketAtom::new(&symbol);
    bracket.isotope = isotope;
    bracket.chirality = chirality;
    bracket.hcount = hcount;
    bracket.charge = charge;
    bracket.class = class;
    Ok((bracket, i))
}

fn parse_number(chars: &[char], i: &mut usize) -> Result<Option<u16>, SmilesError> {
    let start = *i;
    let mut val: u16 = 0;
    let mut found = false;
    while *i < chars.len() && chars[*i].is_ascii_digit() {
        found = true;
        val = val
            .checked_mul(10)
            .and_then(|v| v.checked_add(chars[*i] as u16 - b'0' as u16))
            .ok_or(SmilesError::NumberOverflow { pos: start })?;
        *i += 1;
    }
    Ok(found.then_some(val))
}

fn parse_isotope(chars: &[char], i: &mut usize) -> Result<u16, SmilesError> {
    Ok(parse_number(chars, i)?.unwrap_or(0))
}

/// Returns the symbol as written, lowercase for aromatic atoms.
fn parse_bracket_element(
    chars: &[char],
    i: &mut usize,
    bracket_start: usize,
) -> Result<String, SmilesError> {
    if *i >= chars.len() {
        return Err(SmilesError::UnclosedBracket { pos: bracket_start });
    }

    const AROMATIC: [&str; 10] = ["se", "te", "as", "si", "b", "c", "n", "o", "p", "s"];
    for pat in AROMATIC {
        let end = *i + pat.len();
        if end <= chars.len() {
            let slice: String = chars[*i..end].iter().collect();
            if slice == pat {
                *i = end;
                return Ok(slice);
            }
        }
    }

    if *i + 1 < chars.len() && chars[*i].is_ascii_uppercase() && chars[*i + 1].is_ascii_lowercase()
    {
        let sym: String = chars[*i..=*i + 1].iter().collect();
        if element::is_known(&sym) {
            *i += 2;
            return Ok(sym);
        }
    }

    if chars[*i].is_ascii_uppercase() {
        let sym = chars[*i].to_string();
        if element::is_known(&sym) {
            *i += 1;
            return Ok(sym);
        }
    }

    Err(SmilesError::InvalidElement {
        pos: *i,
        text: chars.get(*i).map(|c| c.to_string()).unwrap_or_default(),
    })
}

fn parse_chirality(chars: &[char], i: &mut usize) -> Chirality {
    if *i < chars.len() && chars[*i] == '@' {
        *i += 1;
        if *i < chars.len() && chars[*i] == '@' {
            *i += 1;
            Chirality::Cw
        } else {
            Chirality::Ccw
        }
    } else {
        Chirality::None
    }
}

fn parse_hcount(chars: &[char], i: &mut usize) -> Option<u8> {
    if *i < chars.len() && chars[*i] == 'H' {
        *i += 1;
        let mut count: u8 = 1;
        if *i < chars.len() && chars[*i].is_ascii_digit() {
            count = chars[*i] as u8 - b'0';
            *i += 1;
        }
        Some(count)
    } else {
        None
    }
}

fn parse_charge(chars: &[char], i: &mut usize) -> Result<i8, SmilesError> {
    let Some(&sign_char) = chars.get(*i) else {
        return Ok(0);
    };
    let sign: i8 = match sign_char {
        '+' => 1,
        '-' => -1,
        _ => return Ok(0),
    };
    let pos = *i;
    *i += 1;

    if *i < chars.len() && chars[*i] == sign_char {
        let mut count: i8 = sign;
        while *i < chars.len() && chars[*i] == sign_char {
            count = count
                .checked_add(sign)
                .ok_or(SmilesError::InvalidCharge { pos })?;
            *i += 1;
        }
        return Ok(count);
    }

    match parse_number(chars, i)? {
        Some(n) => {
            let n = i8::try_from(n).map_err(|_| SmilesError::InvalidCharge { pos })?;
            Ok(sign * n)
        }
        None => Ok(sign),
    }
}

fn parse_atom_class(chars: &[char], i: &mut usize) -> Result<u16, SmilesError> {
    if *i < chars.len() && chars[*i] == ':' {
        *i += 1;
        Ok(parse_number(chars, i)?.unwrap_or(0))
    } else {
        Ok(0)
    }
}
