//! Pairwise spatial relationships between placed objects

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::scene::directions::{Direction, DirectionFrame};
use crate::scene::object::PlacedObject;

/// Default threshold a displacement must exceed along a direction
pub const DEFAULT_EPS: f64 = 0.2;

/// For each horizontal direction, the objects lying that way from each object
///
/// `behind[i]` lists, in ascending order, every `j` whose displacement from
/// `i` projects onto "behind" by more than the threshold. Vertical relations
/// are never emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    /// Objects behind each object
    pub behind: Vec<Vec<usize>>,
    /// Objects in front of each object
    pub front: Vec<Vec<usize>>,
    /// Objects left of each object
    pub left: Vec<Vec<usize>>,
    /// Objects right of each object
    pub right: Vec<Vec<usize>>,
}

impl RelationshipGraph {
    /// Infer relationships from placed objects
    pub fn infer(objects: &[PlacedObject], frame: &DirectionFrame, eps: f64) -> Self {
        let positions: Vec<Vec3> = objects.iter().map(|o| o.position).collect();
        Self::from_positions(&positions, frame, eps)
    }

    /// Infer relationships from bare positions
    pub fn from_positions(positions: &[Vec3], frame: &DirectionFrame, eps: f64) -> Self {
        let mut graph = Self::default();
        for direction in Direction::HORIZONTAL {
            let v = frame.vector(direction);
            let related: Vec<Vec<usize>> = positions
                .iter()
                .enumerate()
                .map(|(i, from)| {
                    positions
                        .iter()
                        .enumerate()
                        .filter(|&(j, to)| j != i && (to - from).dot(&v) > eps)
                        .map(|(j, _)| j)
                        .collect()
                })
                .collect();
            if let Some(slot) = graph.slot_mut(direction) {
                *slot = related;
            }
        }
        graph
    }

    /// Relation lists for a direction; `None` for above and below
    pub fn get(&self, direction: Direction) -> Option<&[Vec<usize>]> {
        match direction {
            Direction::Behind => Some(&self.behind),
            Direction::Front => Some(&self.front),
            Direction::Left => Some(&self.left),
            Direction::Right => Some(&self.right),
            Direction::Above | Direction::Below => None,
        }
    }

    /// Whether `j` lies in `direction` from `i`
    pub fn relates(&self, direction: Direction, i: usize, j: usize) -> bool {
        self.get(direction)
            .and_then(|lists| lists.get(i))
            .is_some_and(|list| list.binary_search(&j).is_ok())
    }

    fn slot_mut(&mut self, direction: Direction) -> Option<&mut Vec<Vec<usize>>> {
        match direction {
            Direction::Behind => Some(&mut self.behind),
            Direction::Front => Some(&mut self.front),
            Direction::Left => Some(&mut self.left),
            Direction::Right => Some(&mut self.right),
            Direction::Above | Direction::Below => None,
        }
    }
}
