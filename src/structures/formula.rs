//! Weighted formulas in conjunctive normal form, and their WCNF serialization.
//!
//! A [WcnfFormula] is a transient value: built by the
//! [encoding builder](crate::builder), written for a solver, and discarded
//! once the solution has been decoded.
//!
//! # The WCNF format
//!
//! The serialized form is the partial weighted MaxSAT exchange format:
//! a header line
//!
//! ```none
//! p wcnf <nbvars> <nbclauses> <topWeight>
//! ```
//!
//! followed by one line per clause, `<weight> <lit-1> … <lit-n> 0`.
//! A clause whose weight equals the top weight must be satisfied (is *hard*);
//! any lighter clause may be violated at a cost of its weight (is *soft*).

use std::io::Write;

use crate::structures::literal::{SignedLiteral, Variable};

/// The weight of a clause, with the formula's top weight marking hard clauses.
pub type ClauseWeight = u64;

/// A clause paired with its weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedClause {
    /// The cost of violating the clause, or the top weight if it is hard.
    pub weight: ClauseWeight,

    /// The literals of the clause.
    pub literals: Vec<SignedLiteral>,
}

/// A weighted CNF formula over a fixed count of variables.
#[derive(Clone, Debug)]
pub struct WcnfFormula {
    variable_count: usize,
    top_weight: ClauseWeight,
    clauses: Vec<WeightedClause>,
}

impl WcnfFormula {
    /// An empty formula over the given variables with the given top weight.
    pub fn new(variable_count: usize, top_weight: ClauseWeight) -> Self {
        WcnfFormula {
            variable_count,
            top_weight,
            clauses: Vec::default(),
        }
    }

    /// The declared variable count of the formula.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// The weight marking a clause as hard.
    pub fn top_weight(&self) -> ClauseWeight {
        self.top_weight
    }

    /// The clauses of the formula, in order of addition.
    pub fn clauses(&self) -> &[WeightedClause] {
        &self.clauses
    }

    /// The count of clauses in the formula.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Add a clause which must be satisfied.
    pub fn add_hard(&mut self, literals: Vec<SignedLiteral>) {
        self.clauses.push(WeightedClause {
            weight: self.top_weight,
            literals,
        });
    }

    /// Add a clause whose violation costs the given weight.
    pub fn add_soft(&mut self, weight: ClauseWeight, literals: Vec<SignedLiteral>) {
        debug_assert!(weight < self.top_weight);
        self.clauses.push(WeightedClause { weight, literals });
    }

    /// The summed weight of every soft clause in the formula.
    pub fn soft_weight_sum(&self) -> ClauseWeight {
        self.clauses
            .iter()
            .filter(|clause| clause.weight != self.top_weight)
            .map(|clause| clause.weight)
            .sum()
    }

    /// The highest variable referenced by any clause.
    pub fn max_variable(&self) -> Variable {
        self.clauses
            .iter()
            .flat_map(|clause| clause.literals.iter())
            .map(|literal| literal.variable())
            .max()
            .unwrap_or(0)
    }

    /// The formula in its WCNF form.
    pub fn as_dimacs(&self) -> String {
        let mut dimacs = String::with_capacity(16 * (self.clauses.len() + 1));
        dimacs.push_str(&format!(
            "p wcnf {} {} {}\n",
            self.variable_count,
            self.clauses.len(),
            self.top_weight
        ));
        for clause in &self.clauses {
            dimacs.push_str(&format!("{}", clause.weight));
            for literal in &clause.literals {
                dimacs.push_str(&format!(" {literal}"));
            }
            dimacs.push_str(" 0\n");
        }
        dimacs
    }

    /// Write the formula in its WCNF form.
    pub fn write_dimacs(&self, mut writer: impl Write) -> std::io::Result<()> {
        writer.write_all(self.as_dimacs().as_bytes())?;
        writer.flush()
    }
}
