use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use itertools::Itertools;
use msgs::box_data::{BoxId, Position};
use msgs::direction::Direction;
use priority_queue::PriorityQueue;

use crate::grid::Grid;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoxMove {
    pub box_id: BoxId,
    pub source: Position,
    pub destination: Position,
}

impl BoxMove {
    pub fn direction(&self) -> Option<Direction> {
        let offset = (
            self.destination.x - self.source.x,
            self.destination.y - self.source.y,
            self.destination.z - self.source.z,
        );
        Direction::all()
            .into_iter()
            .find(|direction| direction.offset() == offset)
    }

    // Routing stays in one plane; a leg that changes height becomes a
    // vertical step followed by the lateral one.
    fn split_vertical(self) -> Vec<BoxMove> {
        if self.source.z == self.destination.z {
            return vec![self];
        }

        let mid = Position::new(self.source.x, self.source.y, self.destination.z);
        vec![
            BoxMove {
                box_id: self.box_id,
                source: self.source,
                destination: mid,
            },
            BoxMove {
                box_id: self.box_id,
                source: mid,
                destination: self.destination,
            },
        ]
    }
}

/// Path cost of reaching a cell. Impeded moves pass through an occupied
/// cell whose occupant has to be shoved aside first, so they dominate the
/// ordering.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Label {
    impeded_moves: u32,
    non_impeded_moves: u32,
    impeded_move: bool,
    previous: Option<Position>,
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.impeded_moves
            .cmp(&other.impeded_moves)
            .then_with(|| self.non_impeded_moves.cmp(&other.non_impeded_moves))
    }
}

/// The full move list that brings a box to its target: shoves that clear
/// occupied route cells first, then the box's own steps. `None` when no
/// route exists, an empty list when the box already sits on the target.
pub fn shortest_route(box_id: BoxId, target: Position, grid: &Grid) -> Option<Vec<BoxMove>> {
    let mut grid = grid.clone();

    let labeled_path = route_allowing_pass_through(box_id, target, &grid)?;

    // Reserve the free route cells so shoved boxes don't land on them.
    for (position, label) in &labeled_path {
        if !label.impeded_move {
            let _ = grid.block_position(*position);
        }
    }

    let mut shove_moves = Vec::new();
    for (position, label) in &labeled_path {
        if !label.impeded_move {
            continue;
        }
        let occupant = grid.box_id_at(*position)?;
        let shove = grid
            .adjacent_positions(*position)
            .into_iter()
            .find_map(|adjacent| {
                let candidate = BoxMove {
                    box_id: occupant,
                    source: *position,
                    destination: adjacent,
                };
                grid.is_valid_move(candidate).then_some(candidate)
            })?;
        grid.apply_move(shove);
        shove_moves.push(shove);
    }

    let route_moves = labeled_path
        .iter()
        .copied()
        .tuple_windows()
        .map(|((source, _), (destination, _))| BoxMove {
            box_id,
            source,
            destination,
        });

    Some(
        shove_moves
            .into_iter()
            .chain(route_moves)
            .flat_map(BoxMove::split_vertical)
            .collect(),
    )
}

/// Dijkstra labeling where stepping into an occupied cell is allowed as
/// long as its occupant carries nothing, at the price of an impeded move.
fn route_allowing_pass_through(
    box_id: BoxId,
    target: Position,
    grid: &Grid,
) -> Option<Vec<(Position, Label)>> {
    let mut frontier: PriorityQueue<Position, Reverse<Label>> = PriorityQueue::new();
    let mut settled: HashMap<Position, Label> = HashMap::new();

    frontier.push_increase(
        grid.box_position(box_id)?,
        Reverse(Label {
            impeded_moves: 0,
            non_impeded_moves: 0,
            impeded_move: false,
            previous: None,
        }),
    );

    while let Some((position, Reverse(label))) = frontier.pop() {
        settled.insert(position, label);

        if position == target {
            return Some(trace_back(position, label, &settled));
        }

        for adjacent in grid.adjacent_positions(position) {
            if settled.contains_key(&adjacent) {
                continue;
            }
            if !grid.is_occupied(adjacent) && !grid.is_blocked(adjacent) {
                frontier.push_increase(
                    adjacent,
                    Reverse(Label {
                        impeded_moves: label.impeded_moves,
                        non_impeded_moves: label.non_impeded_moves + 1,
                        impeded_move: false,
                        previous: Some(position),
                    }),
                );
            } else if grid.is_occupied(adjacent) && !grid.box_above(adjacent) {
                frontier.push_increase(
                    adjacent,
                    Reverse(Label {
                        impeded_moves: label.impeded_moves + 1,
                        non_impeded_moves: label.non_impeded_moves,
                        impeded_move: true,
                        previous: Some(position),
                    }),
                );
            }
        }
    }

    None
}

fn trace_back(
    final_position: Position,
    final_label: Label,
    settled: &HashMap<Position, Label>,
) -> Vec<(Position, Label)> {
    let mut path = vec![(final_position, final_label)];

    let mut current = final_label;
    while let Some(previous) = current.previous {
        current = settled[&previous];
        path.push((previous, current));
    }

    path.reverse();
    path
}
