//! Invocation of an external solver binary.
//!
//! The problem is written as a WCNF file under the configured scratch
//! directory, the binary is launched as a blocking process against that file,
//! and its standard output is captured whole.
//! The file is transient: it is removed once the process returns, whatever
//! the outcome.
//!
//! Cancellation is by the solver's own CPU-time limit --- the process is
//! otherwise synchronous and uninterruptible, so the limit flag matters.
//! Which flag, if any, depends on the [SolverKind].
//!
//! The exit status of a solver is not itself an error: MaxSAT solvers signal
//! through status and solution lines, and several exit nonzero as a matter of
//! course. What decides success is whether a solution line can be
//! [decoded](crate::procedures::decode) from the captured output.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    process::Command,
    time::Duration,
};

use crate::{
    config::SolverKind,
    misc::log::targets::{self},
    solvers::{MaxSatSolver, SolverOutput},
    structures::formula::WcnfFormula,
    types::err::{self},
};

/// The name of the transient problem file within the scratch directory.
const PROBLEM_FILE: &str = "problem.wcnf";

/// An external solver binary, launched per problem.
#[derive(Clone, Debug)]
pub struct ExternalSolver {
    binary: PathBuf,
    kind: SolverKind,
    work_dir: PathBuf,
}

impl ExternalSolver {
    /// A solver from a binary, its family, and a scratch directory.
    pub fn new(binary: PathBuf, kind: SolverKind, work_dir: PathBuf) -> Self {
        ExternalSolver {
            binary,
            kind,
            work_dir,
        }
    }

    /// The binary of the solver.
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl MaxSatSolver for ExternalSolver {
    fn solve(
        &self,
        problem: &WcnfFormula,
        budget: Duration,
    ) -> Result<SolverOutput, err::SolverError> {
        let path = self.work_dir.join(PROBLEM_FILE);

        let file = File::create(&path).map_err(|e| err::SolverError::ProblemFile(e.kind()))?;
        problem
            .write_dimacs(BufWriter::new(file))
            .map_err(|e| err::SolverError::ProblemFile(e.kind()))?;

        let mut command = Command::new(&self.binary);
        command.arg(&path);
        match self.kind {
            SolverKind::OpenWbo | SolverKind::MaxHs => {
                command.arg(format!("-cpu-lim={}", budget.as_secs().max(1)));
            }
            SolverKind::Generic => {}
        }

        log::info!(target: targets::SOLVER,
            "launching {} against {} ({} variables, {} clauses)",
            self.binary.display(), path.display(),
            problem.variable_count(), problem.clause_count());

        let outcome = command.output();

        // The problem file is released whatever became of the process.
        let _ = std::fs::remove_file(&path);

        let output = outcome.map_err(|e| err::SolverError::Launch(e.kind()))?;
        if !output.status.success() {
            log::debug!(target: targets::SOLVER, "solver exited with {}", output.status);
        }

        Ok(SolverOutput::from_text(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }

    fn available(&self) -> bool {
        if self.binary.components().count() > 1 {
            return self.binary.exists();
        }
        match std::env::var_os("PATH") {
            Some(paths) => {
                std::env::split_paths(&paths).any(|dir| dir.join(&self.binary).exists())
            }
            None => false,
        }
    }
}
