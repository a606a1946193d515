/*!
The carried model state and the rule it denotes.

A [ModelState] is the durable outcome of a fit: one signed literal per feature
slot, the assignment decoded (and pruned) from the most recent batch.
It is threaded through a fit as a value --- empty before the first batch,
replaced wholesale after each successful batch, and frozen afterwards as the
trained model.
A failed batch never replaces it, so callers are never left holding a
partially-updated model.

A [Rule] is the readable face of a model state: the positive slots of each
clause, labelled by the schema and joined by the connectives of the rule's
family.
*/

use serde::Serialize;

use crate::{
    config::RuleKind,
    structures::{
        feature::{FeatureLabel, FeatureSchema},
        literal::SignedLiteral,
    },
};

/// The carried feature-slot assignment of a fit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelState {
    /// One literal per feature slot, in slot order; empty before any batch.
    assignment: Vec<SignedLiteral>,

    /// The column count of the matrix the assignment was learnt over.
    feature_count: usize,
}

impl ModelState {
    /// The state before any batch has been solved.
    pub fn empty() -> Self {
        ModelState::default()
    }

    /// Whether any batch has been solved.
    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// A state holding a decoded assignment of one literal per feature slot.
    pub fn from_assignment(assignment: Vec<SignedLiteral>, feature_count: usize) -> Self {
        debug_assert!(feature_count != 0 && assignment.len() % feature_count == 0);
        ModelState {
            assignment,
            feature_count,
        }
    }

    /// The literals of the assignment, in slot order.
    pub fn literals(&self) -> &[SignedLiteral] {
        &self.assignment
    }

    /// The clause count of the assignment.
    pub fn clause_count(&self) -> usize {
        match self.feature_count {
            0 => 0,
            count => self.assignment.len() / count,
        }
    }

    /// Per clause, the feature columns selected into the rule.
    pub fn selected_columns(&self) -> Vec<Vec<usize>> {
        let mut selected = vec![Vec::new(); self.clause_count()];
        for (slot, literal) in self.assignment.iter().enumerate() {
            if literal.polarity() {
                selected[slot / self.feature_count].push(slot % self.feature_count);
            }
        }
        selected
    }

    /// The rule the assignment denotes, labelled by the given schema.
    ///
    /// A DNF rule was learnt against flipped labels, and so its labels are
    /// rendered with each operator swapped for its complement.
    pub fn rule(&self, schema: &FeatureSchema, kind: RuleKind) -> Rule {
        let clauses = self
            .selected_columns()
            .into_iter()
            .map(|columns| {
                columns
                    .into_iter()
                    .map(|column| {
                        let mut label = schema.label(column).clone();
                        if kind == RuleKind::Dnf {
                            label.operator = label.operator.swap();
                        }
                        label
                    })
                    .collect()
            })
            .collect();
        Rule { kind, clauses }
    }
}

/// A learnt rule: labelled clauses under a connective family.
#[derive(Clone, Debug)]
pub struct Rule {
    kind: RuleKind,
    clauses: Vec<Vec<FeatureLabel>>,
}

impl Rule {
    /// The connective family of the rule.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// The labelled literals of each clause.
    pub fn clauses(&self) -> &[Vec<FeatureLabel>] {
        &self.clauses
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (outer, inner) = match self.kind {
            RuleKind::Cnf => ("and", "or"),
            RuleKind::Dnf => ("or", "and"),
        };
        for (index, clause) in self.clauses.iter().enumerate() {
            if index > 0 {
                write!(f, " {outer}\n")?;
            }
            write!(f, "( ")?;
            for (position, label) in clause.iter().enumerate() {
                if position > 0 {
                    write!(f, " {inner} ")?;
                }
                write!(f, "{label}")?;
            }
            write!(f, " )")?;
        }
        Ok(())
    }
}

/// The durable form of a trained model, as written by the CLI.
#[derive(Clone, Debug, Serialize)]
pub struct ModelExport {
    /// The connective family of the rule.
    pub kind: RuleKind,

    /// The rendered rule.
    pub rule: String,

    /// Per clause, the feature columns selected into the rule.
    pub selected_columns: Vec<Vec<usize>>,
}
