//! A solver-neutral mixed-integer linear program.
//!
//! [`EnclosureModel`](crate::model::EnclosureModel) writes into a [`LinearProgram`]; a
//! [`SolverBackend`](crate::solver::SolverBackend) reads it. Nothing here knows about grids.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use strum::Display as StrumDisplay;

/// Handle to a variable of one [`LinearProgram`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VarId(usize);

impl VarId {
    /// Position of this variable in [`LinearProgram::variables`] and in any assignment vector.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The values a [`Variable`] may take.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Domain {
    /// Integral, 0 or 1.
    Binary,
    /// Real-valued within `[min, max]`.
    Continuous {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

/// A named decision variable.
#[derive(Clone, Debug)]
pub struct Variable {
    /// Readable name such as `wall_12`, used in dumps and by backends that accept names.
    pub name: String,
    /// Allowed values.
    pub domain: Domain,
}

/// `Σ coefficient * variable`. Repeated variables are allowed and add up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// The empty expression, worth 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty expression with room for `capacity` terms.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { terms: Vec::with_capacity(capacity) }
    }

    /// Add `coefficient * var` in place.
    pub fn add(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// Builder-style [`Self::add`].
    pub fn term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add(var, coefficient);
        self
    }

    /// `(variable, coefficient)` pairs in insertion order.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Value of this expression under `values`, indexed by [`VarId::index`].
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|(var, coefficient)| coefficient * values[var.index()]).sum()
    }

    /// `self <= rhs`.
    pub fn leq(self, rhs: f64) -> Constraint {
        Constraint { expr: self, relation: Relation::Le, rhs }
    }

    /// `self = rhs`.
    pub fn eq(self, rhs: f64) -> Constraint {
        Constraint { expr: self, relation: Relation::Eq, rhs }
    }

    /// `self >= rhs`.
    pub fn geq(self, rhs: f64) -> Constraint {
        Constraint { expr: self, relation: Relation::Ge, rhs }
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        Self::new().term(var, 1.0)
    }
}

/// How a [`Constraint`]'s expression compares to its right-hand side.
#[derive(Copy, Clone, Debug, Eq, PartialEq, StrumDisplay)]
pub enum Relation {
    /// At most.
    #[strum(to_string = "<=")]
    Le,
    /// Exactly.
    #[strum(to_string = "=")]
    Eq,
    /// At least.
    #[strum(to_string = ">=")]
    Ge,
}

/// `expr relation rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Comparison.
    pub relation: Relation,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl Constraint {
    /// Whether `values` satisfy this constraint up to `tolerance`.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::Le => lhs <= self.rhs + tolerance,
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
            Relation::Ge => lhs >= self.rhs - tolerance,
        }
    }
}

/// Variables, constraints and a linear objective to maximize.
#[derive(Clone, Debug, Default)]
pub struct LinearProgram {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl LinearProgram {
    /// A program with no variables, no constraints and a zero objective.
    pub fn new() -> Self {
        Self::default()
    }

    fn add_variable(&mut self, name: String, domain: Domain) -> VarId {
        self.variables.push(Variable { name, domain });
        VarId(self.variables.len() - 1)
    }

    /// Add a 0/1 variable.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_variable(name.into(), Domain::Binary)
    }

    /// Add a real variable bounded by `[min, max]`.
    pub fn add_continuous(&mut self, name: impl Into<String>, min: f64, max: f64) -> VarId {
        self.add_variable(name.into(), Domain::Continuous { min, max })
    }

    /// Require `constraint` of every solution.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Replace the objective; the program always maximizes it.
    pub fn maximise(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// All variables, indexed by [`VarId::index`].
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// All constraints in insertion order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The expression being maximized.
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Indices of the constraints (and domains) `values` break, for checking solver output.
    ///
    /// Domain violations are reported as `None`, constraint violations as `Some(index)`.
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<Option<usize>> {
        let domains = self.variables.iter().zip(values)
            .filter(|(variable, value)| match variable.domain {
                Domain::Binary => value.abs() > tolerance && (*value - 1.0).abs() > tolerance,
                Domain::Continuous { min, max } => **value < min - tolerance || **value > max + tolerance,
            })
            .map(|_| None);
        let constraints = self.constraints.iter()
            .positions(|constraint| !constraint.is_satisfied_by(values, tolerance))
            .map(Some);

        domains.chain(constraints).collect_vec()
    }
}

impl Display for LinearProgram {
    /// LP-file-like dump, one line per row.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let render = |expr: &LinearExpr| {
            if expr.terms.is_empty() {
                return "0".to_string();
            }
            expr.terms.iter()
                .map(|(var, coefficient)| format!("{:+} {}", coefficient, self.variables[var.index()].name))
                .join(" ")
        };

        writeln!(f, "maximize {}", render(&self.objective))?;
        for constraint in &self.constraints {
            writeln!(f, "  {} {} {}", render(&constraint.expr), constraint.relation, constraint.rhs)?;
        }
        for variable in &self.variables {
            match variable.domain {
                Domain::Binary => writeln!(f, "  {} binary", variable.name)?,
                Domain::Continuous { min, max } => writeln!(f, "  {} <= {} <= {}", min, variable.name, max)?,
            }
        }

        Ok(())
    }
}
