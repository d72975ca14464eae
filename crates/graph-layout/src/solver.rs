//! Minimal seam around the external LP/ILP solver
//!
//! The layered engine's ordering and coordinate stages describe their
//! programs as plain data ([`Problem`]) and hand them to a [`Solver`]. Only
//! the backend implementation knows a concrete solver API, so swapping
//! solvers never touches the layout algorithms. Solves are blocking and
//! all-or-nothing: a failure is propagated as [`LayoutError::Solver`], never
//! replaced by a partial or default solution.

use crate::LayoutError;
use good_lp::{
    variable, Expression, IntoAffineExpression, ProblemVariables, Solution, SolverModel,
};

/// Index of a variable within a [`Problem`]
pub type VariableId = usize;

/// Kind of decision variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    /// Continuous variable bounded below
    Continuous { lower: f64 },
    /// 0/1 integer variable
    Binary,
}

/// Comparison direction of a linear constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    GreaterEq,
}

/// A linear constraint `sum(coefficient * variable) <relation> rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub terms: Vec<(VariableId, f64)>,
    pub relation: Relation,
    pub rhs: f64,
}

/// A linear program or mixed-integer program, always minimizing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Problem {
    variables: Vec<VarKind>,
    constraints: Vec<Constraint>,
    objective: Vec<(VariableId, f64)>,
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a continuous variable with the given lower bound
    pub fn add_continuous(&mut self, lower: f64) -> VariableId {
        self.variables.push(VarKind::Continuous { lower });
        self.variables.len() - 1
    }

    /// Add a binary variable
    pub fn add_binary(&mut self) -> VariableId {
        self.variables.push(VarKind::Binary);
        self.variables.len() - 1
    }

    /// Add the constraint `sum(terms) <relation> rhs`
    pub fn add_constraint(&mut self, terms: Vec<(VariableId, f64)>, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint {
            terms,
            relation,
            rhs,
        });
    }

    /// Add `coefficient * variable` to the minimization objective
    pub fn add_objective_term(&mut self, variable: VariableId, coefficient: f64) {
        self.objective.push((variable, coefficient));
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &[VarKind] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[(VariableId, f64)] {
        &self.objective
    }
}

/// An opaque optimization service that can solve a [`Problem`]
pub trait Solver {
    /// Solve the problem and return one value per variable, in the order the
    /// variables were added
    ///
    /// # Errors
    /// Returns [`LayoutError::Solver`] with the backend's message when the
    /// program is infeasible, unbounded or the solve fails.
    fn solve(&self, problem: &Problem) -> Result<Vec<f64>, LayoutError>;
}

/// Default backend: the pure-Rust `microlp` solver driven through `good_lp`
///
/// Handles both the continuous coordinate program and the binary ordering
/// program, so the crate works without any system solver installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLp;

impl Solver for MicroLp {
    fn solve(&self, problem: &Problem) -> Result<Vec<f64>, LayoutError> {
        let mut definitions = ProblemVariables::new();
        let handles: Vec<good_lp::Variable> = problem
            .variables()
            .iter()
            .map(|kind| match kind {
                VarKind::Continuous { lower } => definitions.add(variable().min(*lower)),
                VarKind::Binary => definitions.add(variable().binary()),
            })
            .collect();

        let mut objective: Expression = 0.into();
        for &(id, coefficient) in problem.objective() {
            objective += handles[id].into_expression() * coefficient;
        }

        let mut model = definitions
            .minimise(objective)
            .using(good_lp::solvers::microlp::microlp);

        for constraint in problem.constraints() {
            let mut expression: Expression = 0.into();
            for &(id, coefficient) in &constraint.terms {
                expression += handles[id].into_expression() * coefficient;
            }
            model.add_constraint(match constraint.relation {
                Relation::LessEq => expression.leq(constraint.rhs),
                Relation::GreaterEq => expression.geq(constraint.rhs),
            });
        }

        let solution = model
            .solve()
            .map_err(|e| LayoutError::Solver(e.to_string()))?;

        Ok(handles.iter().map(|&v| solution.value(v)).collect())
    }
}
