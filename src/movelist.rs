use crate::r#move::Move;
use crate::square::Square;
use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::Rng;

// No chess position has more than 218 legal moves
pub const MAX_MOVELIST_CAPACITY: usize = 256;

#[derive(Clone, Debug)]
pub struct MoveList(ArrayVec<Move, MAX_MOVELIST_CAPACITY>);
impl Default for MoveList {
    fn default() -> Self {
        MoveList(ArrayVec::new())
    }
}
impl MoveList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn push(&mut self, m: Move) {
        self.0.push(m)
    }
    pub fn get(&self, i: usize) -> Option<&Move> {
        self.0.get(i)
    }
    pub fn as_slice(&self) -> &[Move] {
        self.0.as_slice()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }
    pub fn extend(&mut self, other: &MoveList) {
        for m in other {
            self.push(*m)
        }
    }
    pub fn retain<F: FnMut(&mut Move) -> bool>(&mut self, f: F) {
        self.0.retain(f)
    }

    /// Looks up the move going from `origin` to `target`
    pub fn find(&self, origin: Square, target: Square) -> Option<Move> {
        self.iter()
            .find(|m| m.origin == origin && m.target == target)
            .copied()
    }

    /// Picks a move uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.as_slice().choose(rng).copied()
    }

    /// The moves satisfying a predicate, in generation order
    pub fn filtered<F: FnMut(&Move) -> bool>(&self, mut f: F) -> MoveList {
        let mut mv_list = MoveList::default();
        for m in self {
            if f(m) {
                mv_list.push(*m)
            }
        }
        mv_list
    }
}
impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
