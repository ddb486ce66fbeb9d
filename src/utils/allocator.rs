use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Non-owning handle to a shape stored in the world's shape arena.
///
/// Several bodies may hold the same handle; removing the shape from the arena
/// invalidates every copy. The default handle never resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ShapeId {
    index: usize,
    generation: u32,
}

impl ShapeId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new(usize::MAX, 0)
    }
}

/// Generational arena that hands out stable handles while preventing use-after-free.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> ShapeId {
        if let Some(index) = self.free_list.pop_front() {
            let generation = self.generations[index];
            self.items[index] = Some(item);
            return ShapeId::new(index, generation);
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        ShapeId::new(index, 0)
    }

    pub fn get(&self, id: ShapeId) -> Option<&T> {
        if self.is_valid(id) {
            self.items.get(id.index()).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<T> {
        if !self.is_valid(id) {
            return None;
        }
        let slot = self.items.get_mut(id.index())?;
        if slot.is_some() {
            self.generations[id.index()] = self.generations[id.index()].wrapping_add(1);
            self.free_list.push_back(id.index());
        }
        slot.take()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_valid(&self, id: ShapeId) -> bool {
        self.generations
            .get(id.index())
            .copied()
            .map(|gen| gen == id.generation())
            .unwrap_or(false)
    }
}

/// Mutable access to two distinct elements of a slice.
///
/// Returns `None` when the indices coincide or either is out of range.
pub fn get2_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }

    let (first, second, flipped) = if a < b { (a, b, false) } else { (b, a, true) };
    let (left, right) = items.split_at_mut(second);
    let first_slot = &mut left[first];
    let second_slot = &mut right[0];

    if flipped {
        Some((second_slot, first_slot))
    } else {
        Some((first_slot, second_slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handles_go_stale() {
        let mut arena = Arena::new();
        let first = arena.insert("sphere");
        assert_eq!(arena.remove(first), Some("sphere"));

        let second = arena.insert("plane");
        assert_eq!(second.index(), first.index());
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second), Some(&"plane"));
        assert_eq!(arena.remove(first), None);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(ShapeId::default()).is_none());
    }

    #[test]
    fn get2_mut_respects_argument_order() {
        let mut values = [1, 2, 3];
        let (a, b) = get2_mut(&mut values, 2, 0).expect("distinct indices");
        assert_eq!((*a, *b), (3, 1));
        *a = 30;
        assert_eq!(values, [1, 2, 30]);
        assert!(get2_mut(&mut values, 1, 1).is_none());
        assert!(get2_mut(&mut values, 0, 3).is_none());
    }
}
