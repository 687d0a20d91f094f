//! Backends that maximize a [`LinearProgram`](crate::program::LinearProgram).

use std::thread;
use std::time::Duration;

use good_lp::{default_solver, variable, variables, Expression, ResolutionError, Solution, SolutionStatus, SolverModel, WithTimeLimit};
use log::{debug, warn};
use strum::Display;

use crate::program::{Domain, LinearExpr, LinearProgram, Relation, VarId};

/// Terminal state of one optimization run.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
pub enum SolveStatus {
    /// A proven optimum was found.
    Optimal,
    /// No assignment satisfies every constraint.
    Infeasible,
    /// The objective can grow without bound.
    Unbounded,
    /// The time limit expired before optimality was proven.
    TimedOut,
    /// The backend failed.
    Error,
}

/// A value for every variable of the solved program, indexed by [`VarId::index`].
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    /// Wrap one value per variable.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// # Panics
    /// If `var` belongs to a different, larger program.
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    /// All values, indexed by [`VarId::index`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// What a [`SolverBackend`] hands back. Only [`Optimal`](SolveOutcome::Optimal) carries values.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveOutcome {
    /// A proven optimum.
    Optimal(Assignment),
    /// See [`SolveStatus::Infeasible`].
    Infeasible,
    /// See [`SolveStatus::Unbounded`].
    Unbounded,
    /// See [`SolveStatus::TimedOut`].
    TimedOut,
    /// The backend failed; the message says why.
    Error(String),
}

impl SolveOutcome {
    /// The payload-free status of this outcome.
    pub fn status(&self) -> SolveStatus {
        match self {
            Self::Optimal(_) => SolveStatus::Optimal,
            Self::Infeasible => SolveStatus::Infeasible,
            Self::Unbounded => SolveStatus::Unbounded,
            Self::TimedOut => SolveStatus::TimedOut,
            Self::Error(_) => SolveStatus::Error,
        }
    }
}

/// Anything that can maximize a [`LinearProgram`].
///
/// Implementations must not block past `time_limit` when one is given; they return
/// [`SolveOutcome::TimedOut`] instead.
pub trait SolverBackend: Send + Sync {
    /// Maximize `program`, giving up after `time_limit` if one is set.
    fn solve(&self, program: &LinearProgram, time_limit: Option<Duration>) -> SolveOutcome;
}

/// The default backend: branch-and-bound via [`good_lp`] on its pure-Rust `microlp` solver.
///
/// Every call runs on its own worker thread and waits for it, so no solve outlives the call.
/// The time limit is handed to `microlp`, which stops at its deadline; a search stopped before
/// proving optimality is [`SolveOutcome::TimedOut`] even when it found a feasible assignment.
#[derive(Copy, Clone, Debug, Default)]
pub struct MilpSolver;

impl SolverBackend for MilpSolver {
    fn solve(&self, program: &LinearProgram, time_limit: Option<Duration>) -> SolveOutcome {
        run_on_worker(|| solve_blocking(program, time_limit))
    }
}

/// Run `job` on a named worker thread and wait for it to finish.
///
/// A worker that panics or cannot be spawned yields [`SolveOutcome::Error`].
pub(crate) fn run_on_worker<F>(job: F) -> SolveOutcome
where
    F: FnOnce() -> SolveOutcome + Send,
{
    thread::scope(|scope| {
        let worker = thread::Builder::new()
            .name("enclosure-solve".to_string())
            .spawn_scoped(scope, job);

        match worker {
            Ok(handle) => handle.join()
                .unwrap_or_else(|_| SolveOutcome::Error("solver thread panicked".to_string())),
            Err(err) => SolveOutcome::Error(format!("could not start solver thread: {err}")),
        }
    })
}

fn to_expression(expr: &LinearExpr, handles: &[good_lp::Variable]) -> Expression {
    let mut out = Expression::with_capacity(expr.terms().len());
    for (var, coefficient) in expr.terms() {
        out.add_mul(*coefficient, handles[var.index()]);
    }
    out
}

fn solve_blocking(program: &LinearProgram, time_limit: Option<Duration>) -> SolveOutcome {
    let mut vars = variables!();
    let handles = program.variables().iter()
        .map(|definition| match definition.domain {
            Domain::Binary => vars.add(variable().binary().name(definition.name.clone())),
            Domain::Continuous { min, max } => vars.add(variable().min(min).max(max).name(definition.name.clone())),
        })
        .collect::<Vec<_>>();

    let mut problem = vars.maximise(to_expression(program.objective(), &handles)).using(default_solver);
    if let Some(limit) = time_limit {
        problem = problem.with_time_limit(limit.as_secs_f64());
    }
    for constraint in program.constraints() {
        let lhs = to_expression(&constraint.expr, &handles);
        problem = problem.with(match constraint.relation {
            Relation::Le => lhs.leq(constraint.rhs),
            Relation::Eq => lhs.eq(constraint.rhs),
            Relation::Ge => lhs.geq(constraint.rhs),
        });
    }

    debug!("handing {} variables and {} constraints to the solver", handles.len(), program.constraints().len());
    match problem.solve() {
        Ok(solution) => match solution.status() {
            SolutionStatus::Optimal => SolveOutcome::Optimal(Assignment::new(handles.iter().map(|handle| solution.value(*handle)).collect())),
            SolutionStatus::TimeLimit => timed_out(time_limit),
            SolutionStatus::GapLimit => SolveOutcome::Error("solver stopped at its gap limit".to_string()),
        },
        Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
        Err(ResolutionError::Unbounded) => SolveOutcome::Unbounded,
        // microlp stopped before it found any feasible assignment
        Err(ResolutionError::Other(message)) if message.starts_with("Time limit") => timed_out(time_limit),
        Err(err) => SolveOutcome::Error(err.to_string()),
    }
}

fn timed_out(time_limit: Option<Duration>) -> SolveOutcome {
    warn!("solver did not prove an optimum within {:?}", time_limit.unwrap_or_default());
    SolveOutcome::TimedOut
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use crate::program::{LinearExpr, LinearProgram};
    use crate::solver::{run_on_worker, MilpSolver, SolveOutcome, SolveStatus, SolverBackend};

    #[test]
    fn knapsack_optimum() {
        let mut program = LinearProgram::new();
        let a = program.add_binary("a");
        let b = program.add_binary("b");
        let c = program.add_binary("c");
        program.add_constraint(LinearExpr::new().term(a, 3.0).term(b, 4.0).term(c, 2.0).leq(5.0));
        program.maximise(LinearExpr::new().term(a, 4.0).term(b, 5.0).term(c, 3.0));

        let SolveOutcome::Optimal(assignment) = MilpSolver.solve(&program, None) else {
            panic!("expected an optimum");
        };
        assert_eq!(program.objective().evaluate(assignment.values()).round(), 7.0);
        assert!(assignment.value(a) > 0.5);
        assert!(assignment.value(b) < 0.5);
        assert!(assignment.value(c) > 0.5);
    }

    #[test]
    fn continuous_bounds() {
        let mut program = LinearProgram::new();
        let x = program.add_continuous("x", 0.0, 2.5);
        program.maximise(LinearExpr::from(x));

        let SolveOutcome::Optimal(assignment) = MilpSolver.solve(&program, Some(Duration::from_secs(30))) else {
            panic!("expected an optimum");
        };
        assert!((assignment.value(x) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn contradiction_is_infeasible() {
        let mut program = LinearProgram::new();
        let x = program.add_binary("x");
        program.add_constraint(LinearExpr::from(x).eq(1.0));
        program.add_constraint(LinearExpr::from(x).eq(0.0));
        program.maximise(LinearExpr::from(x));

        assert_eq!(MilpSolver.solve(&program, None).status(), SolveStatus::Infeasible);
    }

    #[test]
    fn zero_time_limit_times_out() {
        let mut program = LinearProgram::new();
        let a = program.add_binary("a");
        let b = program.add_binary("b");
        program.add_constraint(LinearExpr::new().term(a, 2.0).term(b, 2.0).leq(3.0));
        program.maximise(LinearExpr::new().term(a, 1.0).term(b, 1.0));

        assert_eq!(MilpSolver.solve(&program, Some(Duration::ZERO)), SolveOutcome::TimedOut);
        assert_eq!(MilpSolver.solve(&program, Some(Duration::from_secs(30))).status(), SolveStatus::Optimal);
    }

    #[test]
    fn worker_finishes_before_returning() {
        let finished = AtomicBool::new(false);
        let outcome = run_on_worker(|| {
            thread::sleep(Duration::from_millis(50));
            finished.store(true, Ordering::SeqCst);
            SolveOutcome::Unbounded
        });
        assert_eq!(outcome, SolveOutcome::Unbounded);
        assert!(finished.load(Ordering::SeqCst));
    }

    #[test]
    fn panicking_worker_is_an_error() {
        let outcome = run_on_worker(|| panic!("solver blew up"));
        assert_eq!(outcome.status(), SolveStatus::Error);
    }

    #[test]
    fn status_names() {
        assert_eq!(SolveStatus::Optimal.to_string(), "Optimal");
        assert_eq!(SolveStatus::TimedOut.to_string(), "TimedOut");
    }
}
