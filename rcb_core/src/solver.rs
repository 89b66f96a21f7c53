//! Convergence bookkeeping for the iterative solvers.
//!
//! Each damped solver (doubly-reinforced equilibrium, polygonal equilibrium,
//! polygonal design search) runs for a fixed maximum number of iterations and
//! returns its best estimate together with a [`Convergence`] record, so a
//! capped approximation is distinguishable from a converged answer.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Outcome of a bounded iterative solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Convergence {
    /// Solver name, used in warnings and errors
    pub solver: String,
    /// Tolerance was met before the iteration cap
    pub converged: bool,
    /// Iterations performed
    pub iterations: usize,
    /// Final residual in the solver's own measure (mm, kN or shortfall fraction)
    pub residual: f64,
}

impl Convergence {
    /// Record a solve that met its tolerance
    pub fn converged(solver: impl Into<String>, iterations: usize, residual: f64) -> Self {
        Convergence {
            solver: solver.into(),
            converged: true,
            iterations,
            residual,
        }
    }

    /// Record a solve that ran out of iterations
    pub fn capped(solver: impl Into<String>, iterations: usize, residual: f64) -> Self {
        Convergence {
            solver: solver.into(),
            converged: false,
            iterations,
            residual,
        }
    }

    /// Emit the termination trace and hand back self.
    pub(crate) fn traced(self) -> Self {
        if self.converged {
            tracing::debug!(
                solver = %self.solver,
                iterations = self.iterations,
                residual = self.residual,
                "solver converged"
            );
        } else {
            tracing::warn!(
                solver = %self.solver,
                iterations = self.iterations,
                residual = self.residual,
                "solver hit iteration cap; returning best estimate"
            );
        }
        self
    }

    /// Turn a capped solve into a [`CalcError::NotConverged`].
    ///
    /// Callers that would rather reject an approximation than report it use
    /// this on the result's convergence record.
    pub fn require(&self) -> CalcResult<()> {
        if self.converged {
            Ok(())
        } else {
            Err(CalcError::not_converged(&self.solver, self.iterations, self.residual))
        }
    }

    /// Warning suffix for status messages, empty when converged
    pub fn warning(&self) -> String {
        if self.converged {
            String::new()
        } else {
            format!(
                " | WARNING: {} did not converge in {} iterations (residual {:.3})",
                self.solver, self.iterations, self.residual
            )
        }
    }
}
