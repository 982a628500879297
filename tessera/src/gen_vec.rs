use std::collections::VecDeque;

/// Slot index tagged with the generation it was issued for, so that a stale
/// index never reaches an item stored later in the same slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenIdx(u32);

/// Slots addressable by a [`GenIdx`]. The last 24-bit index is kept back so
/// that a live item can never be named by [`GenIdx::INVALID`].
const MAX_SLOTS: usize = 0xFFFFFF;

impl GenIdx {
    pub const INVALID: Self = Self::new(MAX_SLOTS, 0xFF);

    const fn new(index: usize, gen: u8) -> Self {
        Self(((gen as u32) << 24) | index as u32)
    }

    fn split(&self) -> (usize, u8) {
        let index = (self.0 & 0xFFFFFF) as usize;
        let gen = ((self.0 >> 24) & 0xFF) as u8;
        (index, gen)
    }
}

struct Slot<T> {
    gen: u8,
    item: Option<T>,
}

/// Generational arena. Removal frees the slot for reuse and invalidates
/// every index previously handed out for it.
pub struct GenVec<T> {
    slots: Vec<Slot<T>>,
    free: VecDeque<usize>,
    len: usize,
    max_slots: usize,
}

impl<T> Default for GenVec<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: VecDeque::new(),
            len: 0,
            max_slots: MAX_SLOTS,
        }
    }
}

impl<T> GenVec<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_max_slots(max_slots: usize) -> Self {
        Self {
            max_slots,
            ..Self::default()
        }
    }

    /// Stores `item`, reusing a freed slot when there is one.
    ///
    /// Returns `None` without storing anything once all 16,777,215 slots
    /// hold live items.
    pub fn add(&mut self, item: T) -> Option<GenIdx> {
        let index = match self.free.pop_front() {
            Some(index) => index,
            None if self.slots.len() < self.max_slots => {
                self.slots.push(Slot { gen: 0, item: None });
                self.slots.len() - 1
            }
            None => return None,
        };

        self.slots[index].item = Some(item);
        self.len += 1;

        Some(GenIdx::new(index, self.slots[index].gen))
    }

    pub fn remove(&mut self, idx: GenIdx) -> Option<T> {
        let (index, gen) = idx.split();
        let slot = self.slots.get_mut(index).filter(|s| s.gen == gen)?;
        let item = slot.item.take()?;

        // Generations wrap after 256 reuses of a slot.
        slot.gen = slot.gen.wrapping_add(1);
        self.free.push_back(index);
        self.len -= 1;

        Some(item)
    }

    pub fn get(&self, idx: GenIdx) -> Option<&T> {
        let (index, gen) = idx.split();
        self.slots
            .get(index)
            .filter(|s| s.gen == gen)
            .and_then(|s| s.item.as_ref())
    }

    pub fn get_mut(&mut self, idx: GenIdx) -> Option<&mut T> {
        let (index, gen) = idx.split();
        self.slots
            .get_mut(index)
            .filter(|s| s.gen == gen)
            .and_then(|s| s.item.as_mut())
    }

    pub fn contains(&self, idx: GenIdx) -> bool {
        self.get(idx).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.item.take().is_some() {
                slot.gen = slot.gen.wrapping_add(1);
                self.free.push_back(index);
            }
        }
        self.len = 0;
    }

    /// Live items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|s| s.item.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|s| s.item.as_mut())
    }

    pub fn entries(&self) -> impl Iterator<Item = (GenIdx, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, s)| {
            s.item
                .as_ref()
                .map(|item| (GenIdx::new(index, s.gen), item))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_get_remove() {
        let mut items = GenVec::new();
        let a = items.add("a").unwrap();
        let b = items.add("b").unwrap();

        assert_eq!(Some(&"a"), items.get(a));
        assert_eq!(2, items.len());

        assert_eq!(Some("a"), items.remove(a));
        assert_eq!(None, items.get(a));
        assert_eq!(None, items.remove(a));
        assert_eq!(Some(&"b"), items.get(b));
        assert_eq!(1, items.len());
    }

    #[test]
    fn stale_index_does_not_reach_reused_slot() {
        let mut items = GenVec::new();
        let old = items.add(1).unwrap();
        items.remove(old);

        let new = items.add(2).unwrap();
        assert_ne!(old, new);
        assert_eq!(None, items.get(old));
        assert_eq!(Some(&2), items.get(new));
    }

    #[test]
    fn iteration_skips_holes() {
        let mut items = GenVec::new();
        let ids: Vec<_> = (0..4).map(|i| items.add(i).unwrap()).collect();
        items.remove(ids[1]);

        assert_eq!(vec![&0, &2, &3], items.iter().collect::<Vec<_>>());
        assert_eq!(
            vec![ids[0], ids[2], ids[3]],
            items.entries().map(|(id, _)| id).collect::<Vec<_>>()
        );

        for item in items.iter_mut() {
            *item *= 10;
        }
        assert_eq!(Some(&30), items.get(ids[3]));
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut items = GenVec::new();
        let a = items.add('a').unwrap();
        items.clear();

        assert!(items.is_empty());
        assert!(!items.contains(a));
        assert!(!items.contains(GenIdx::INVALID));
    }

    #[test]
    fn full_arena_refuses_new_items() {
        let mut items = GenVec::with_max_slots(2);
        let a = items.add(1).unwrap();
        items.add(2).unwrap();

        assert_eq!(None, items.add(3));
        assert_eq!(2, items.len());

        items.remove(a);
        let c = items.add(3).unwrap();
        assert_eq!(Some(&3), items.get(c));
        assert_eq!(None, items.add(4));
    }

    #[test]
    fn invalid_index_lies_past_the_last_slot() {
        let (index, gen) = GenIdx::INVALID.split();
        assert_eq!(MAX_SLOTS, index);
        assert_eq!(0xFF, gen);

        // Every slot the arena can issue packs without touching the
        // generation bits.
        let last = GenIdx::new(MAX_SLOTS - 1, 0xFF);
        assert_eq!((MAX_SLOTS - 1, 0xFF), last.split());
        assert_ne!(GenIdx::INVALID, last);
    }
}
