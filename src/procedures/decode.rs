//! Decoding of a solver's solution line into typed assignments.
//!
//! The solution line is the one beginning with the marker `v`: space-separated
//! signed integers, one per variable, in ascending variable order.
//! Its absence is not an empty result but a [solver
//! failure](crate::types::err::SolverError::NoSolutionLine) --- a timeout or a
//! crash --- and aborts the batch, so a fit can never mistake a failed solve
//! for a learnt rule.
//!
//! Decoding partitions the assignment by the [variable
//! layout](crate::builder::VariableLayout): the feature-slot block becomes the
//! candidate rule, the noise block becomes per-sample error flags, and any
//! auxiliary tail is ignored.

use crate::{
    builder::VariableLayout,
    misc::log::targets::{self},
    solvers::SolverOutput,
    structures::literal::{SignedLiteral, Variable},
    types::err::{self},
};

/// The marker of a solution line in solver output.
pub const SOLUTION_MARKER: char = 'v';

/// A decoded solution, split by the variable layout.
#[derive(Clone, Debug)]
pub struct Decoded {
    rule_literals: Vec<SignedLiteral>,
    noise: Vec<bool>,
}

impl Decoded {
    /// The feature-slot assignment, one literal per slot in slot order.
    pub fn rule_literals(&self) -> &[SignedLiteral] {
        &self.rule_literals
    }

    /// Consume the decoded solution, keeping the feature-slot assignment.
    pub fn into_rule_literals(self) -> Vec<SignedLiteral> {
        self.rule_literals
    }

    /// Per sample of the block, whether the sample was left misclassified.
    pub fn noise(&self) -> &[bool] {
        &self.noise
    }

    /// The variables of the feature slots asserted by the solution.
    pub fn true_rules(&self) -> Vec<Variable> {
        self.rule_literals
            .iter()
            .filter(|literal| literal.polarity())
            .map(|literal| literal.variable())
            .collect()
    }

    /// The count of samples left misclassified.
    pub fn error_count(&self) -> usize {
        self.noise.iter().filter(|&&noisy| noisy).count()
    }

    /// The assignment as zeroes and ones, feature slots then noise.
    pub fn zero_one(&self) -> Vec<u8> {
        self.rule_literals
            .iter()
            .map(|literal| literal.polarity() as u8)
            .chain(self.noise.iter().map(|&noisy| noisy as u8))
            .collect()
    }
}

/// Decode the solution line of the given output against a variable layout.
pub fn decode(output: &SolverOutput, layout: &VariableLayout) -> Result<Decoded, err::ErrorKind> {
    let line = output
        .text()
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(SOLUTION_MARKER))
        .ok_or(err::SolverError::NoSolutionLine)?;

    let mut literals = Vec::with_capacity(layout.feature_slots() + layout.sample_count());
    for token in line[SOLUTION_MARKER.len_utf8()..].split_whitespace() {
        let int: i64 = token
            .parse()
            .map_err(|_| err::DecodeError::Token(token.to_string()))?;
        match SignedLiteral::from_int(int) {
            Some(literal) => literals.push(literal),
            // A zero terminates the assignment.
            None => break,
        }
    }

    let needed = layout.feature_slots() + layout.sample_count();
    if literals.len() < needed {
        return Err(err::DecodeError::TokenCount {
            expected: needed,
            found: literals.len(),
        }
        .into());
    }

    for (position, literal) in literals.iter().take(needed).enumerate() {
        if literal.variable() as usize != position + 1 {
            return Err(err::DecodeError::VariableOrder { position }.into());
        }
    }

    let noise = literals[layout.feature_slots()..needed]
        .iter()
        .map(|literal| literal.polarity())
        .collect::<Vec<_>>();
    literals.truncate(layout.feature_slots());

    log::trace!(target: targets::DECODE,
        "{} feature slots, {} noise flags ({} errors)",
        literals.len(), noise.len(),
        noise.iter().filter(|&&noisy| noisy).count());

    Ok(Decoded {
        rule_literals: literals,
        noise,
    })
}
