//! Metadata describing the columns of a discretized feature matrix.
//!
//! Discretization turns each original column of a tabular dataset into a group
//! of Boolean columns, and the way those columns constrain one another depends
//! on the kind of the original column.
//! The discretization step itself is a collaborator of this library; what is
//! consumed here is its output: the [groups](FeatureGroup) and one printable
//! [label](FeatureLabel) per derived column, bundled as a [FeatureSchema].
//!
//! The group kinds matter twice:
//! - [pruning](crate::procedures::prune) removes redundant literals inside
//!   monotonically nested threshold groups, and
//! - [rendering](crate::model) swaps each operator for its complement when a
//!   rule was learnt against flipped labels.

use serde::{Deserialize, Serialize};

use crate::types::err::{self};

/// The mutual-constraint family of a group of discretized columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    /// Two complementary columns derived from a two-valued source column.
    Binary,

    /// One-hot value columns together with their negations.
    Categorical,

    /// Nested `<=` threshold columns, thresholds increasing.
    LowerBound,

    /// Nested `>` threshold columns, thresholds increasing.
    UpperBound,
}

/// The ordered set of derived columns owned by one source column.
///
/// Within a [LowerBound](GroupKind::LowerBound) or
/// [UpperBound](GroupKind::UpperBound) group the columns are monotonically
/// nested, and so at most one should logically hold in any clause of a rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGroup {
    /// The constraint family of the group.
    pub kind: GroupKind,

    /// The derived columns of the group, in threshold (or value) order.
    pub columns: Vec<usize>,
}

/// The display operator of a derived column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Assertion of a two-valued column.
    Is,

    /// Denial of a two-valued column.
    IsNot,

    /// Equality with a categorical value.
    Eq,

    /// Difference from a categorical value.
    Neq,

    /// An at-most threshold.
    Leq,

    /// A greater-than threshold.
    Gt,
}

impl Operator {
    /// The complementary operator, used when rendering a rule learnt against
    /// flipped labels.
    ///
    /// Swapping is an involution on each of the three pairs:
    ///
    /// ```rust
    /// # use rulesat::structures::feature::Operator;
    /// assert_eq!(Operator::Leq.swap(), Operator::Gt);
    /// assert_eq!(Operator::Leq.swap().swap(), Operator::Leq);
    /// ```
    pub fn swap(self) -> Self {
        match self {
            Self::Is => Self::IsNot,
            Self::IsNot => Self::Is,
            Self::Eq => Self::Neq,
            Self::Neq => Self::Eq,
            Self::Leq => Self::Gt,
            Self::Gt => Self::Leq,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Is => write!(f, "is"),
            Self::IsNot => write!(f, "is not"),
            Self::Eq => write!(f, "=="),
            Self::Neq => write!(f, "!="),
            Self::Leq => write!(f, "<="),
            Self::Gt => write!(f, ">"),
        }
    }
}

/// The printable identity of one derived column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLabel {
    /// The name of the source column.
    pub name: String,

    /// The operator relating the source column to the value, if any.
    pub operator: Operator,

    /// The threshold or categorical value, absent for two-valued columns.
    pub value: Option<String>,
}

impl std::fmt::Display for FeatureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} {}", self.name, self.operator, value),
            None => write!(f, "{} {}", self.name, self.operator),
        }
    }
}

/// Group metadata and labels for every column of a discretized matrix.
///
/// A valid schema tiles the column range: reading the groups in order, their
/// member columns are exactly `0..label_count`, without gap or overlap.
#[derive(Clone, Debug, Serialize)]
pub struct FeatureSchema {
    groups: Vec<FeatureGroup>,
    labels: Vec<FeatureLabel>,
}

impl FeatureSchema {
    /// Bundle groups and labels, checking the tiling invariant.
    pub fn new(
        groups: Vec<FeatureGroup>,
        labels: Vec<FeatureLabel>,
    ) -> Result<Self, err::ConfigError> {
        let mut expected = 0;
        for group in &groups {
            for &column in &group.columns {
                if column != expected {
                    return Err(err::ConfigError::SchemaColumnOrder {
                        expected,
                        found: column,
                    });
                }
                expected += 1;
            }
        }
        if expected != labels.len() {
            return Err(err::ConfigError::SchemaLabelCount {
                columns: expected,
                labels: labels.len(),
            });
        }
        Ok(FeatureSchema { groups, labels })
    }

    /// The number of derived columns the schema describes.
    pub fn feature_count(&self) -> usize {
        self.labels.len()
    }

    /// The groups of the schema, in column order.
    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    /// The labels of the schema, one per column.
    pub fn labels(&self) -> &[FeatureLabel] {
        &self.labels
    }

    /// The label of the given column.
    pub fn label(&self, column: usize) -> &FeatureLabel {
        &self.labels[column]
    }
}
