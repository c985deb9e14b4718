//! Breadth-first pathfinding over board occupancy
//!
//! Every hop costs the same, so BFS yields shortest paths. Cells are passable
//! when they are empty or equal to the destination, which lets callers route
//! "toward" an occupied cell (the motion layer stops one hop short).

use std::collections::{HashMap, VecDeque};

use crate::grid::board::HexBoard;
use crate::grid::hex::HexCoord;

/// Find a shortest path from `start` to `goal`
///
/// The path includes both endpoints. Returns an empty path when the goal is
/// unreachable (fully enclosed, off the board, or the start is not on the
/// board).
pub fn find_path(board: &HexBoard, start: HexCoord, goal: HexCoord) -> Vec<HexCoord> {
    if !board.contains(start) || !board.contains(goal) {
        return Vec::new();
    }
    if start == goal {
        return vec![start];
    }

    let mut frontier = VecDeque::new();
    let mut came_from: HashMap<HexCoord, HexCoord> = HashMap::new();

    frontier.push_back(start);
    came_from.insert(start, start);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            return reconstruct_path(&came_from, start, goal);
        }

        for neighbor in current.neighbors() {
            if came_from.contains_key(&neighbor) {
                continue;
            }
            if !board.contains(neighbor) {
                continue;
            }
            // Occupied cells block unless they are the destination itself
            if board.occupant_at(neighbor).is_some() && neighbor != goal {
                continue;
            }
            came_from.insert(neighbor, current);
            frontier.push_back(neighbor);
        }
    }

    Vec::new()
}

fn reconstruct_path(
    came_from: &HashMap<HexCoord, HexCoord>,
    start: HexCoord,
    goal: HexCoord,
) -> Vec<HexCoord> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}
