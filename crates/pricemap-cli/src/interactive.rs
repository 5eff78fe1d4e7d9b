//! Terminal review of low-confidence column assignments.

use std::collections::BTreeMap;
use std::io::{self, BufRead};

use pricemap_map::{Confirmation, ConfirmationHook};
use pricemap_model::{ColumnAssignment, ColumnProfile, Role};

use crate::summary::column_table;

/// Asks on stderr and reads the answer from stdin.
///
/// Answers: empty or `y` accepts, `n` rejects, and `INDEX=ROLE` pairs
/// separated by commas or spaces remap columns (`2=price, 5=undefined`).
/// End of input accepts the proposal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmation;

impl ConfirmationHook for TerminalConfirmation {
    fn review(&self, profiles: &[ColumnProfile]) -> Confirmation {
        let columns: Vec<ColumnAssignment> = profiles.iter().map(ColumnAssignment::from).collect();
        eprintln!("{}", column_table(&columns));
        let stdin = io::stdin();
        loop {
            eprint!("Accept roles? [Y/n/INDEX=ROLE,...] ");
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => {
                    tracing::warn!("no answer on stdin, accepting proposed roles");
                    return Confirmation::Accept;
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(%error, "failed to read answer, accepting proposed roles");
                    return Confirmation::Accept;
                }
            }
            match parse_answer(&line) {
                Ok(confirmation) => return confirmation,
                Err(message) => eprintln!("{message}"),
            }
        }
    }
}

/// Parses one reviewer answer.
pub fn parse_answer(answer: &str) -> Result<Confirmation, String> {
    let answer = answer.trim();
    match answer.to_lowercase().as_str() {
        "" | "y" | "yes" => return Ok(Confirmation::Accept),
        "n" | "no" => return Ok(Confirmation::Reject),
        _ => {}
    }
    let mut remap = BTreeMap::new();
    for pair in answer
        .split([',', ' '])
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
    {
        let (index, role) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected INDEX=ROLE, got '{pair}'"))?;
        let index: usize = index
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a column index", index.trim()))?;
        let role: Role = role.parse()?;
        remap.insert(index, role);
    }
    Ok(Confirmation::Remap(remap))
}
