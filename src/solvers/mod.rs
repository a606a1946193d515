/*!
The boundary to the weighted MaxSAT solver.

Solving is delegated: the library builds [problems](crate::structures::formula)
and decodes [solutions](crate::procedures::decode), and anything which can turn
the one into the other can sit in between.
The [MaxSatSolver] trait is that seam --- the shipped implementation is an
[external process](ExternalSolver), and tests substitute a stub returning a
fixed solution line.

The only output contract is a line beginning with the solution marker `v`,
followed by space-separated signed variable assignments in ascending variable
order.
A solver which produces no such line within its budget has timed out or
failed, and the batch it was solving is abandoned.
*/

mod external;
pub use external::ExternalSolver;

use std::time::Duration;

use crate::{structures::formula::WcnfFormula, types::err::{self}};

/// The raw output of one solver run.
#[derive(Clone, Debug)]
pub struct SolverOutput {
    text: String,
}

impl SolverOutput {
    /// Output from the given text.
    pub fn from_text(text: String) -> Self {
        SolverOutput { text }
    }

    /// The text of the output.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Something which solves weighted CNF problems under a time budget.
pub trait MaxSatSolver {
    /// Solve the problem, blocking for at most (about) the given budget.
    fn solve(
        &self,
        problem: &WcnfFormula,
        budget: Duration,
    ) -> Result<SolverOutput, err::SolverError>;

    /// Whether the solver can be reached at all, checked before a fit begins.
    fn available(&self) -> bool {
        true
    }
}
