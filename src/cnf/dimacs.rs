//! Reading DIMACS clause files into a [`Cnf`].
//!
//! Everything before the first line containing `p cnf` is ignored. The header
//! declares the highest variable number and the number of clause lines that
//! follow; both are enforced. Each clause line ends with a terminator token,
//! which is dropped. Variable numbers are translated to names through the
//! supplied map; numbers without a name become `VARIABLE_<id>`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::FormatError;

use super::{Cnf, CnfVariable};

pub const CNF_START_INDICATOR: &str = "p cnf";

const CNF_START_LINE_LENGTH: usize = 4;

/// The declared clause count is untrusted input.
const MAX_PREALLOCATED_ROWS: u32 = 4096;

pub fn read_dimacs_file<P: AsRef<Path>>(path: P, names: &HashMap<u32, String>) -> Result<Cnf, FormatError> {
    let file = File::open(path)?;
    read_dimacs(BufReader::new(file), names)
}

pub fn parse_dimacs(text: &str, names: &HashMap<u32, String>) -> Result<Cnf, FormatError> {
    read_dimacs(text.as_bytes(), names)
}

pub fn read_dimacs<R: BufRead>(reader: R, names: &HashMap<u32, String>) -> Result<Cnf, FormatError> {
    let mut lines = reader.lines().enumerate().map(|(idx, line)| line.map(|l| (idx + 1, l)));

    let (header_line, header) = loop {
        match lines.next() {
            Some(line) => {
                let (number, text) = line?;
                if text.contains(CNF_START_INDICATOR) {
                    break (number, text);
                }
            }
            None => return Err(FormatError::MissingHeader),
        }
    };

    let tokens = header.split_whitespace().collect::<Vec<_>>();
    if tokens.len() != CNF_START_LINE_LENGTH {
        return Err(FormatError::InvalidHeader { line: header_line, text: header.clone() });
    }
    let max_number = parse_number(tokens[2], header_line)?;
    let expected = parse_number(tokens[3], header_line)?;
    debug!("DIMACS header: {} variables, {} clauses", max_number, expected);

    let mut cnf = Cnf::with_capacity(expected.min(MAX_PREALLOCATED_ROWS) as usize);
    let mut count = 0;
    for line in lines {
        let (number, text) = line?;
        if text.trim().is_empty() {
            continue;
        }
        count += 1;
        if count > expected {
            return Err(FormatError::TooManyClauses { line: number });
        }
        cnf.add_row(parse_line(&text, names, max_number, number)?);
    }

    if count < expected {
        return Err(FormatError::TooFewClauses { expected: expected as usize, found: count as usize });
    }
    Ok(cnf)
}

fn parse_number(token: &str, line: usize) -> Result<u32, FormatError> {
    token.parse().map_err(|e: std::num::ParseIntError| {
        FormatError::InvalidNumber { line, reason: format!("{}: {}", token, e) }
    })
}

fn parse_line(line: &str, names: &HashMap<u32, String>, max_number: u32, line_number: usize)
              -> Result<Vec<CnfVariable>, FormatError> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let mut row = Vec::with_capacity(tokens.len().saturating_sub(1));

    for (i, token) in tokens.iter().enumerate() {
        let dimacs_number: i64 = token.parse().map_err(|e: std::num::ParseIntError| {
            FormatError::InvalidNumber { line: line_number, reason: format!("{}: {}", token, e) }
        })?;
        if i + 1 == tokens.len() {
            // terminator
            break;
        }
        let negated = dimacs_number < 0;
        let id = dimacs_number.unsigned_abs();
        if id > max_number as u64 {
            return Err(FormatError::VariableOutOfRange { line: line_number, id: id as u32 });
        }
        let id = id as u32;
        let literal = match names.get(&id) {
            Some(name) => CnfVariable::new(negated, name),
            None => CnfVariable::new(negated, format!("VARIABLE_{}", id)),
        };
        row.push(literal);
    }

    Ok(row)
}
