//! The integer program for a level.

use std::collections::HashMap;

use itertools::Itertools;

use crate::graph::Topology;
use crate::level::Level;
use crate::location::CellIndex;
use crate::program::{LinearExpr, LinearProgram, VarId};

/// The integer program for one level, together with the handles needed to read a solution back.
///
/// # Logical setup
/// Suppose the level is directed graph G with N cells, as given by its [`Topology`].
///
/// ## Variables
/// Every cell V has a binary `wall[V]` (a wall is placed on V) and a binary `reach[V]` (V is enclosed).
/// Every edge E = U → V with neither endpoint water has a continuous `flow[E]` in `[0, N]`.
///
/// ## Objective
/// Maximize Σ `reach[V] * (1 + fruit value of V)`.
///
/// ## Constraints
/// At most `budget` walls are placed.
/// The start is enclosed and never walled. Water is neither walled nor enclosed.
/// Portals and fruit are never walled. Border cells are never enclosed.
/// A walled cell is not enclosed: `reach[V] <= 1 - wall[V]`.
///
/// An enclosed cell may not leak: for every edge U → V between non-water cells, if U is enclosed and V is not,
/// V must be a wall, i.e. `reach[U] - reach[V] <= wall[V]`.
/// This alone admits enclosed islands with no connection to the start, so connectivity is enforced with a
/// single-commodity flow out of the start: flow only runs between enclosed cells
/// (`flow[U → V] <= N * reach[U]` and `flow[U → V] <= N * reach[V]`) and every cell other than the start
/// absorbs exactly one unit if enclosed and none otherwise (`inflow - outflow = reach[V]`).
/// The start is the only source, so every enclosed cell is joined to it by a path of enclosed cells.
pub struct EnclosureModel {
    program: LinearProgram,
    wall: Vec<VarId>,
    reach: Vec<VarId>,
    flow: Vec<((CellIndex, CellIndex), VarId)>,
}

impl EnclosureModel {
    /// Translate `level` and its `topology` into an [`EnclosureModel`].
    ///
    /// A start cell on the border yields a model that is infeasible by construction: the start is required
    /// to be enclosed and, as a border cell, required not to be.
    pub fn build(level: &Level, topology: &Topology) -> Self {
        let cells = level.cell_count();
        let big_m = cells as f64;
        let start = level.start();
        let mut program = LinearProgram::new();

        let wall = (0..cells).map(|cell| program.add_binary(format!("wall_{cell}"))).collect_vec();
        let reach = (0..cells).map(|cell| program.add_binary(format!("reach_{cell}"))).collect_vec();

        let is_land = |cell: CellIndex| !level.is_water(cell);
        let flow = topology.edges()
            .filter(|(from, to, _)| is_land(*from) && is_land(*to))
            .map(|(from, to, _)| ((from, to), program.add_continuous(format!("flow_{from}_{to}"), 0.0, big_m)))
            .collect_vec();

        program.maximise((0..cells).fold(LinearExpr::with_capacity(cells), |objective, cell| {
            objective.term(reach[cell], (1 + level.fruit_value(cell)) as f64)
        }));

        program.add_constraint(wall.iter().fold(LinearExpr::with_capacity(cells), |used, var| used.term(*var, 1.0))
            .leq(level.budget() as f64));

        // fixed exclusions
        program.add_constraint(LinearExpr::from(reach[start]).eq(1.0));
        program.add_constraint(LinearExpr::from(wall[start]).eq(0.0));
        for cell in 0..cells {
            if level.is_water(cell) {
                program.add_constraint(LinearExpr::from(wall[cell]).eq(0.0));
                program.add_constraint(LinearExpr::from(reach[cell]).eq(0.0));
                continue;
            }
            if level.is_border(cell) {
                program.add_constraint(LinearExpr::from(reach[cell]).eq(0.0));
            }
            if cell != start && !level.is_wall_eligible(cell) {
                // portal or fruit
                program.add_constraint(LinearExpr::from(wall[cell]).eq(0.0));
            }

            // a wall is never enclosed
            program.add_constraint(LinearExpr::from(reach[cell]).term(wall[cell], 1.0).leq(1.0));
        }

        // leaks: reach[u] - reach[v] <= wall[v]
        for ((from, to), _) in &flow {
            program.add_constraint(LinearExpr::from(reach[*from])
                .term(reach[*to], -1.0)
                .term(wall[*to], -1.0)
                .leq(0.0));
        }

        // flow only between enclosed cells
        for ((from, to), var) in &flow {
            program.add_constraint(LinearExpr::from(*var).term(reach[*from], -big_m).leq(0.0));
            program.add_constraint(LinearExpr::from(*var).term(reach[*to], -big_m).leq(0.0));
        }

        // conservation: every enclosed cell but the start drains one unit
        let mut net: HashMap<CellIndex, LinearExpr> = HashMap::with_capacity(cells);
        for ((from, to), var) in &flow {
            net.entry(*to).or_default().add(*var, 1.0);
            net.entry(*from).or_default().add(*var, -1.0);
        }
        for cell in (0..cells).filter(|cell| *cell != start && is_land(*cell)) {
            let balance = net.remove(&cell).unwrap_or_default().term(reach[cell], -1.0);
            program.add_constraint(balance.eq(0.0));
        }

        Self {
            program,
            wall,
            reach,
            flow,
        }
    }

    /// The program to hand to a [`SolverBackend`](crate::solver::SolverBackend).
    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    /// `wall[cell]`.
    pub fn wall_var(&self, cell: CellIndex) -> VarId {
        self.wall[cell]
    }

    /// `reach[cell]`.
    pub fn reach_var(&self, cell: CellIndex) -> VarId {
        self.reach[cell]
    }

    /// Flow variables keyed by the directed edge they sit on.
    pub fn flow_vars(&self) -> &[((CellIndex, CellIndex), VarId)] {
        &self.flow
    }

    /// Number of cells in the modelled level.
    pub fn cell_count(&self) -> usize {
        self.wall.len()
    }
}
