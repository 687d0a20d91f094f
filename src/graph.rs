//! The adjacency of a level as a directed graph.

use itertools::Itertools;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::level::Level;
use crate::location::CellIndex;
use crate::shape::SquareStep;

/// How one cell leads to another.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Link {
    /// Orthogonal adjacency, in the direction of travel.
    Step(SquareStep),
    /// A jump between two portals sharing a label.
    Teleport(char),
}

/// The directed adjacency of a level: every cell is a node, every usable move is an edge.
///
/// Orthogonal neighbors are linked in both directions independently, and every portal group
/// is linked as a complete bidirectional clique. A pair of cells linked both ways keeps a single
/// edge per direction.
pub struct Topology {
    graph: DiGraphMap<CellIndex, Link>,
}

impl From<&Level> for Topology {
    fn from(level: &Level) -> Self {
        let mut graph = DiGraphMap::with_capacity(
            level.cell_count(),
            // two directions per interior adjacency, ignoring portals
            2 * ((level.width() - 1) * level.height() + (level.height() - 1) * level.width()),
        );

        for cell in 0..level.cell_count() {
            graph.add_node(cell);
        }

        for cell in 0..level.cell_count() {
            for (direction, neighbor) in SquareStep::neighbors_of(level.location_of(cell), level.dims()) {
                graph.add_edge(cell, level.index_of(neighbor), Link::Step(direction));
            }
        }

        for (label, members) in level.portals() {
            for pair in members.iter().permutations(2) {
                graph.add_edge(*pair[0], *pair[1], Link::Teleport(*label));
            }
        }

        Self { graph }
    }
}

impl Topology {
    /// All directed edges as `(from, to, link)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (CellIndex, CellIndex, Link)> + '_ {
        self.graph.all_edges().map(|(from, to, link)| (from, to, *link))
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Cells reachable from `cell` in one move.
    pub fn successors(&self, cell: CellIndex) -> impl Iterator<Item = CellIndex> + '_ {
        self.graph.neighbors_directed(cell, Direction::Outgoing)
    }

    /// Number of directed edges that jump between portals.
    pub fn teleport_count(&self) -> usize {
        self.graph.all_edges().filter(|(_, _, link)| matches!(link, Link::Teleport(_))).count()
    }
}
