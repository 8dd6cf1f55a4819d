//! A* search from a start board to a goal board.
//!
//! All nodes created during one search live in a [`NodeArena`] and refer to
//! their predecessor by [`NodeId`]. The arena, frontier and closed set belong
//! to a single [`AStar`] value, so independent searches share no state.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::iter;

use tracing::{debug, error, info, trace, warn};

use crate::error::{PuzzleError, Result};
use crate::puzzle::{Board, Move};

/// Index of a node inside the arena of the search that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// How a node was reached from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Direction the blank travelled.
    pub direction: Move,
    /// Tile that slid into the blank's old cell.
    pub tile: u8,
}

#[derive(Debug, Clone)]
pub struct SearchNode {
    pub board: Board,
    /// Moves from the start.
    pub g: u32,
    /// Manhattan distance to the goal.
    pub h: u32,
    pub blank: (usize, usize),
    pub parent: Option<NodeId>,
    /// `None` only for the start node.
    pub transition: Option<Transition>,
}

impl SearchNode {
    pub fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// Owns every node of one search. Nodes are never removed individually.
#[derive(Debug, Default)]
struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    fn insert(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct FrontierEntry {
    f: u32,
    id: NodeId,
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap: lowest f wins, then the earliest created node.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Open set ordered by total estimated cost.
#[derive(Debug, Default)]
struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    peak: usize,
}

impl Frontier {
    fn push(&mut self, f: u32, id: NodeId) {
        self.heap.push(FrontierEntry { f, id });
        self.peak = self.peak.max(self.heap.len());
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.id)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Boards that have already been expanded.
#[derive(Debug, Default)]
struct ClosedSet {
    boards: HashSet<Board>,
}

impl ClosedSet {
    fn contains(&self, board: &Board) -> bool {
        self.boards.contains(board)
    }

    /// Returns `false` if the board was already closed.
    fn insert(&mut self, board: Board) -> bool {
        self.boards.insert(board)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Running,
    Found(NodeId),
    Exhausted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped from the frontier and expanded.
    pub expanded: usize,
    /// Nodes created, including the start node.
    pub generated: usize,
    /// Largest frontier size seen.
    pub peak_frontier: usize,
}

/// One entry of a solution path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub board: Board,
    /// How this board was reached from the previous entry; `None` for the first.
    pub transition: Option<Transition>,
}

#[derive(Debug, Clone)]
pub struct Solution {
    /// Start board first, goal board last.
    pub steps: Vec<PathStep>,
    pub stats: SearchStats,
}

impl Solution {
    pub fn move_count(&self) -> usize {
        self.steps.len() - 1
    }
}

/// A single A* search. Drive it with [`AStar::step`] or run it to completion
/// with [`AStar::run`].
#[derive(Debug)]
pub struct AStar {
    goal: Board,
    arena: NodeArena,
    frontier: Frontier,
    closed: ClosedSet,
    state: SearchState,
    expanded: usize,
}

impl AStar {
    pub fn new(start: Board, goal: Board) -> Self {
        let mut search = Self {
            goal,
            arena: NodeArena::default(),
            frontier: Frontier::default(),
            closed: ClosedSet::default(),
            state: SearchState::Running,
            expanded: 0,
        };

        let h = start.manhattan_distance(&goal);
        let id = search.arena.insert(SearchNode {
            board: start,
            g: 0,
            h,
            blank: start.blank_position(),
            parent: None,
            transition: None,
        });
        search.frontier.push(h, id);
        search
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            expanded: self.expanded,
            generated: self.arena.len(),
            peak_frontier: self.frontier.peak,
        }
    }

    /// Performs one iteration of the search loop and returns the new state.
    /// Once the search has left `Running` this does nothing.
    pub fn step(&mut self) -> SearchState {
        if self.state != SearchState::Running {
            return self.state;
        }

        let Some(id) = self.frontier.pop() else {
            self.state = SearchState::Exhausted;
            return self.state;
        };

        let current = self.arena.get(id).clone();
        // A board can be queued several times before it is first expanded.
        if self.closed.contains(&current.board) {
            return self.state;
        }
        if current.board == self.goal {
            self.state = SearchState::Found(id);
            return self.state;
        }

        self.closed.insert(current.board);
        self.expanded += 1;
        trace!(
            g = current.g,
            h = current.h,
            f = current.f(),
            frontier = self.frontier.len(),
            "expanding node"
        );

        for direction in Move::ALL {
            let Some(slide) = current.board.slide(current.blank, direction) else {
                continue;
            };
            if self.closed.contains(&slide.board) {
                continue;
            }

            let node = SearchNode {
                board: slide.board,
                g: current.g + 1,
                h: slide.board.manhattan_distance(&self.goal),
                blank: slide.blank,
                parent: Some(id),
                transition: Some(Transition {
                    direction,
                    tile: slide.tile,
                }),
            };
            let f = node.f();
            let child = self.arena.insert(node);
            self.frontier.push(f, child);
        }

        self.state
    }

    /// Runs until the goal is found or the frontier is empty.
    pub fn run(&mut self) -> Option<Solution> {
        loop {
            match self.step() {
                SearchState::Running => continue,
                SearchState::Found(id) => {
                    let stats = self.stats();
                    info!(
                        moves = self.arena.get(id).g,
                        expanded = stats.expanded,
                        generated = stats.generated,
                        "goal reached"
                    );
                    return Some(Solution {
                        steps: reconstruct_path(&self.arena, id),
                        stats,
                    });
                }
                SearchState::Exhausted => {
                    error!(
                        expanded = self.expanded,
                        "frontier exhausted without reaching the goal"
                    );
                    return None;
                }
            }
        }
    }
}

/// Follows parent links from `goal` back to the start and returns the path in
/// start-to-goal order.
fn reconstruct_path(arena: &NodeArena, goal: NodeId) -> Vec<PathStep> {
    let mut steps: Vec<PathStep> = iter::successors(Some(goal), |&id| arena.get(id).parent)
        .map(|id| {
            let node = arena.get(id);
            PathStep {
                board: node.board,
                transition: node.transition,
            }
        })
        .collect();
    steps.reverse();
    steps
}

/// Finds a minimum-length sequence of slides from `start` to `goal`.
///
/// Callers should check that both boards share solvability parity first, see
/// [`solve_checked`]. On a mismatched pair the search visits every reachable
/// state and returns `None`.
pub fn solve(start: &Board, goal: &Board) -> Option<Solution> {
    info!(h = start.manhattan_distance(goal), "starting A* search");
    AStar::new(*start, *goal).run()
}

/// Checks solvability parity and, if it matches, solves.
pub fn solve_checked(start: &Board, goal: &Board) -> Result<Solution> {
    let (start_parity, goal_parity) = (start.is_solvable(), goal.is_solvable());
    debug!(
        start_inversions = start.count_inversions(),
        goal_inversions = goal.count_inversions(),
        "parity check"
    );
    if start_parity != goal_parity {
        warn!("start and goal are in different parity classes");
        return Err(PuzzleError::Unsolvable);
    }

    solve(start, goal).ok_or(PuzzleError::SearchExhausted)
}
