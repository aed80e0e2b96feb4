//! Handle-addressable blip collection.
//!
//! Records live in a generational arena so a handle stays valid across
//! other insertions and removals and goes stale once its own record is
//! removed. Iteration follows insertion order.

use serde::{Deserialize, Serialize};

/// One plotted entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blip {
    /// Classification tag, carried onto the rendered primitive as its class.
    pub tag: String,
    pub range: f64,
    pub angle: f64,
    pub power: f64,
}

impl Blip {
    pub fn new(tag: impl Into<String>, range: f64, angle: f64, power: f64) -> Self {
        Self {
            tag: tag.into(),
            range,
            angle,
            power,
        }
    }

    /// All of range, angle and power are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.range.is_finite() && self.angle.is_finite() && self.power.is_finite()
    }
}

/// Stable identity of a stored blip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlipHandle {
    index: u32,
    generation: u32,
}

impl BlipHandle {
    /// Key used for the rendered primitive of this blip.
    pub fn key(&self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    blip: Option<Blip>,
}

#[derive(Debug, Clone, Default)]
pub struct BlipStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Insertion order. May hold stale handles until the next compaction.
    order: Vec<BlipHandle>,
    stale: usize,
    len: usize,
}

impl BlipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, blip: Blip) -> BlipHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.blip = Some(blip);
                BlipHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    blip: Some(blip),
                });
                BlipHandle {
                    index,
                    generation: 0,
                }
            }
        };
        self.order.push(handle);
        self.len += 1;
        handle
    }

    pub fn contains(&self, handle: BlipHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: BlipHandle) -> Option<&Blip> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.blip.as_ref())
    }

    /// Swap in a whole new record under an existing handle.
    /// Returns the previous record, or `None` (and drops `blip`) if the
    /// handle is unknown.
    pub fn replace(&mut self, handle: BlipHandle, blip: Blip) -> Option<Blip> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.blip.is_none() {
            return None;
        }
        slot.blip.replace(blip)
    }

    /// Remove a record. Unknown or stale handles are ignored.
    pub fn remove(&mut self, handle: BlipHandle) -> Option<Blip> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let blip = slot.blip.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        self.stale += 1;
        if self.stale * 2 > self.order.len() {
            self.compact();
        }
        Some(blip)
    }

    /// Drop every record and invalidate all outstanding handles.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.blip.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        // Reuse low indices first.
        self.free.reverse();
        self.order.clear();
        self.stale = 0;
        self.len = 0;
    }

    /// Replace the whole collection; returns the new handles in list order.
    pub fn replace_all(&mut self, blips: impl IntoIterator<Item = Blip>) -> Vec<BlipHandle> {
        self.clear();
        blips.into_iter().map(|b| self.insert(b)).collect()
    }

    /// Live records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BlipHandle, &Blip)> + '_ {
        self.order
            .iter()
            .filter_map(move |&h| self.get(h).map(|b| (h, b)))
    }

    pub fn handles(&self) -> impl Iterator<Item = BlipHandle> + '_ {
        self.iter().map(|(h, _)| h)
    }

    fn compact(&mut self) {
        let slots = &self.slots;
        self.order.retain(|h| {
            slots
                .get(h.index as usize)
                .is_some_and(|s| s.generation == h.generation && s.blip.is_some())
        });
        self.stale = 0;
    }
}
