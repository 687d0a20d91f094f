//! Reading a solver outcome back into walls and an enclosed region.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use log::warn;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Bfs;
use thiserror::Error;

use crate::cell::Tile;
use crate::graph::Topology;
use crate::level::Level;
use crate::location::CellIndex;
use crate::model::EnclosureModel;
use crate::solver::{SolveOutcome, SolveStatus};

/// Binary variables above this count as set.
const ON: f64 = 0.5;
/// Flow below this is solver noise.
const FLOW_EPSILON: f64 = 1e-6;

/// The result of solving a level.
///
/// Unless [`status`](Self::status) is [`SolveStatus::Optimal`], there are no walls, no enclosed cells and no score.
#[derive(Clone, Debug, PartialEq)]
pub struct Enclosure {
    status: SolveStatus,
    walls: BTreeSet<CellIndex>,
    reach: BTreeSet<CellIndex>,
    score: Option<i64>,
    flows: Vec<(CellIndex, CellIndex, f64)>,
}

/// A broken property of a solved [`Enclosure`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Violation {
    /// More walls than the budget allows.
    #[error("{used} walls placed with a budget of {budget}")]
    OverBudget {
        /// Walls placed.
        used: usize,
        /// Walls allowed.
        budget: u32,
    },
    /// The horse's cell holds a wall.
    #[error("the start cell is walled")]
    StartWalled,
    /// The horse's cell is not enclosed.
    #[error("the start cell is not enclosed")]
    StartOutside,
    /// A wall on water, fruit or a portal.
    #[error("cell {0} is walled but may not be")]
    IllegalWall(CellIndex),
    /// An enclosed water or border cell.
    #[error("cell {0} is enclosed but is water or on the border")]
    IllegalReach(CellIndex),
    /// An enclosed cell that no positive flow path joins to the horse.
    #[error("cell {0} is enclosed but no flow reaches it from the start")]
    Disconnected(CellIndex),
    /// An enclosed cell next to an open, unwalled cell.
    #[error("enclosed cell {from} leaks into open cell {to}")]
    Leak {
        /// The enclosed cell.
        from: CellIndex,
        /// The open neighbor.
        to: CellIndex,
    },
    /// The reported score differs from the enclosed cells' worth.
    #[error("score is {found}, enclosed cells are worth {expected}")]
    ScoreMismatch {
        /// Worth of the enclosed cells.
        expected: i64,
        /// Reported score.
        found: i64,
    },
}

impl Enclosure {
    /// Read the outcome of solving `model` back into cell sets and a score.
    pub fn extract(model: &EnclosureModel, outcome: &SolveOutcome) -> Self {
        let SolveOutcome::Optimal(assignment) = outcome else {
            return Self::unsolved(outcome.status());
        };
        if assignment.values().len() != model.program().variables().len() {
            warn!(
                "backend returned {} values for {} variables",
                assignment.values().len(),
                model.program().variables().len(),
            );
            return Self::unsolved(SolveStatus::Error);
        }

        let walls = (0..model.cell_count())
            .filter(|cell| assignment.value(model.wall_var(*cell)) > ON)
            .collect();
        let reach = (0..model.cell_count())
            .filter(|cell| assignment.value(model.reach_var(*cell)) > ON)
            .collect();
        let flows = model.flow_vars().iter()
            .map(|((from, to), var)| (*from, *to, assignment.value(*var)))
            .filter(|(_, _, amount)| *amount > FLOW_EPSILON)
            .collect();
        let score = model.program().objective().evaluate(assignment.values()).round() as i64;

        Self {
            status: SolveStatus::Optimal,
            walls,
            reach,
            score: Some(score),
            flows,
        }
    }

    /// An empty result carrying only `status`.
    pub fn unsolved(status: SolveStatus) -> Self {
        Self {
            status,
            walls: BTreeSet::new(),
            reach: BTreeSet::new(),
            score: None,
            flows: Vec::new(),
        }
    }

    /// How the solve ended.
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Cells turned into walls.
    pub fn walls(&self) -> &BTreeSet<CellIndex> {
        &self.walls
    }

    /// Enclosed cells, the start included.
    pub fn reach(&self) -> &BTreeSet<CellIndex> {
        &self.reach
    }

    /// The objective value, only for optimal results.
    pub fn score(&self) -> Option<i64> {
        self.score
    }

    /// Directed edges carrying flow, with the amount carried.
    pub fn flows(&self) -> &[(CellIndex, CellIndex, f64)] {
        &self.flows
    }

    /// Check this result against the rules of `level`; an empty list means every property holds.
    ///
    /// Results that are not optimal have nothing to check and always pass.
    pub fn violations(&self, level: &Level, topology: &Topology) -> Vec<Violation> {
        let mut found = Vec::new();
        if self.status != SolveStatus::Optimal {
            return found;
        }

        if self.walls.len() > level.budget() as usize {
            found.push(Violation::OverBudget { used: self.walls.len(), budget: level.budget() });
        }
        if self.walls.contains(&level.start()) {
            found.push(Violation::StartWalled);
        }
        if !self.reach.contains(&level.start()) {
            found.push(Violation::StartOutside);
        }
        found.extend(self.walls.iter()
            .filter(|cell| **cell != level.start() && !level.is_wall_eligible(**cell))
            .map(|cell| Violation::IllegalWall(*cell)));
        found.extend(self.reach.iter()
            .filter(|cell| level.is_water(**cell) || level.is_border(**cell))
            .map(|cell| Violation::IllegalReach(*cell)));

        // every enclosed cell must be fed by flow that starts at the start cell
        let mut carrying: DiGraphMap<CellIndex, ()> = DiGraphMap::from_edges(self.flows.iter().map(|(from, to, _)| (*from, *to)));
        carrying.add_node(level.start());
        let mut fed = BTreeSet::new();
        let mut bfs = Bfs::new(&carrying, level.start());
        while let Some(cell) = bfs.next(&carrying) {
            fed.insert(cell);
        }
        found.extend(self.reach.difference(&fed).map(|cell| Violation::Disconnected(*cell)));

        found.extend(self.reach.iter()
            .flat_map(|from| topology.successors(*from).map(move |to| (*from, to)))
            .filter(|(_, to)| !self.reach.contains(to) && !level.is_water(*to) && !self.walls.contains(to))
            .map(|(from, to)| Violation::Leak { from, to }));

        if let Some(score) = self.score {
            let expected = self.reach.iter().map(|cell| level.tile(*cell).weight()).sum();
            if score != expected {
                found.push(Violation::ScoreMismatch { expected, found: score });
            }
        }

        found
    }
}

/// A [`Level`] with its [`Enclosure`], printable as a board.
///
/// New walls show as `#` and enclosed grass as `+`; every other cell keeps its map glyph.
pub struct SolvedLevel<'a> {
    /// The puzzle.
    pub level: &'a Level,
    /// Its solution.
    pub enclosure: &'a Enclosure,
}

impl Display for SolvedLevel<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for cell in 0..self.level.cell_count() {
            let tile = self.level.tile(cell);
            if self.enclosure.walls().contains(&cell) {
                write!(f, "#")?;
            } else if tile == Tile::Empty && self.enclosure.reach().contains(&cell) {
                write!(f, "+")?;
            } else {
                write!(f, "{}", tile)?;
            }

            if (cell + 1) % self.level.width() == 0 {
                writeln!(f)?;
            }
        }

        Ok(())
    }
}
