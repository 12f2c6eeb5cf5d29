//! A reusable stack for nested style values
//!
//! Each markup property that can be nested (color, size, weight and so on)
//! keeps its values on a [`NestingStack`]. Opening a tag pushes the new value,
//! closing it restores whatever was active before. Stacks are reset with
//! [`NestingStack::set_default`] at the start of every layout pass and are
//! never reallocated once warmed up.

use crate::error::Error;

const DEFAULT_CAPACITY: usize = 4;

/// A stack of values with an optional baseline and an optional ring-buffer mode.
///
/// In the default, bounded mode (`rollover_size == 0`) [`push`] grows the
/// backing storage as needed and nothing is ever discarded.
///
/// When a rollover size is set the stack behaves as a ring buffer: pushes
/// wrap around after `rollover_size` slots and only the most recent
/// `rollover_size` items can be popped again.
///
/// Operations on an empty stack never fail; they yield the *fallback* item,
/// which is `T::default()` unless set with [`with_fallback`].
///
/// [`push`]: NestingStack::push
/// [`with_fallback`]: NestingStack::with_fallback
#[derive(Clone, Debug, PartialEq)]
pub struct NestingStack<T> {
    items: Vec<T>,
    index: usize,
    count: usize,
    fallback: T,
    rollover_size: usize,
    has_default: bool,
}

impl<T: Clone + Default> Default for NestingStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Default> NestingStack<T> {
    /// Create an empty stack with no storage.
    ///
    /// Storage is allocated on the first [`push`](Self::push) or
    /// [`set_default`](Self::set_default).
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a stack with `capacity` pre-allocated slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(vec![T::default(); capacity])
    }

    /// Create a ring-buffer stack holding the last `rollover_size` pushes.
    pub fn with_rollover(capacity: usize, rollover_size: usize) -> Self {
        let mut stack = Self::with_capacity(capacity);
        stack.rollover_size = rollover_size;
        stack
    }

    /// Use an existing table as storage.
    ///
    /// The contents of `items` are treated as free slots; the stack starts
    /// out empty.
    pub fn from_vec(items: Vec<T>) -> Self {
        NestingStack {
            items,
            index: 0,
            count: 0,
            fallback: T::default(),
            rollover_size: 0,
            has_default: false,
        }
    }

    /// Set the item returned when the stack is empty.
    pub fn with_fallback(mut self, fallback: T) -> Self {
        self.fallback = fallback;
        self
    }

    /// The number of items on the stack, including the baseline.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    pub fn rollover_size(&self) -> usize {
        self.rollover_size
    }

    /// Change the ring-buffer size; `0` switches back to bounded mode.
    ///
    /// This is intended to be called on an empty stack.
    pub fn set_rollover_size(&mut self, rollover_size: usize) {
        self.rollover_size = rollover_size;
    }

    fn is_ring(&self) -> bool {
        self.rollover_size > 0
    }

    /// The slot holding the top item, if any.
    fn top_slot(&self) -> Option<usize> {
        if self.is_ring() {
            (self.count > 0).then(|| (self.index + self.rollover_size - 1) % self.rollover_size)
        } else {
            self.index.checked_sub(1)
        }
    }

    fn slot_or_base(&self, slot: Option<usize>) -> T {
        slot.or(Some(0))
            .and_then(|slot| self.items.get(slot))
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Reset the stack to hold only `item` as its baseline.
    ///
    /// The baseline lives in slot 0. [`pop`](Self::pop) and
    /// [`remove`](Self::remove) never remove it, so closing more tags than
    /// were opened always lands back on the default.
    pub fn set_default(&mut self, item: T) {
        if self.items.is_empty() {
            self.items.resize(DEFAULT_CAPACITY, self.fallback.clone());
        }
        self.items[0] = item;
        self.index = 1;
        self.count = 1;
        self.has_default = true;
    }

    /// Call [`set_default`](Self::set_default) on every stack in `stacks`.
    pub fn set_default_all(stacks: &mut [NestingStack<T>], item: T) {
        for stack in stacks {
            stack.set_default(item.clone());
        }
    }

    /// Empty the stack, dropping the baseline as well.
    ///
    /// Storage is kept for reuse.
    pub fn clear(&mut self) {
        self.index = 0;
        self.count = 0;
        self.has_default = false;
    }

    /// Push an item, growing the storage if it is full.
    pub fn push(&mut self, item: T) {
        if self.index == self.items.len() {
            let new_capacity = match self.items.len() * 2 {
                0 => DEFAULT_CAPACITY,
                n => n,
            };
            self.items.resize(new_capacity, self.fallback.clone());
        }

        self.items[self.index] = item;

        if self.is_ring() {
            self.index = (self.index + 1) % self.rollover_size;
            self.count = (self.count + 1).min(self.rollover_size);
        } else {
            self.index += 1;
            self.count += 1;
        }
    }

    /// Remove and return the top item.
    ///
    /// Returns the fallback if the stack is empty. If a baseline was set and
    /// it is the only item left, it is returned and stays in place.
    pub fn pop(&mut self) -> T {
        let Some(top) = self.top_slot() else {
            return self.fallback.clone();
        };
        if self.has_default && self.count == 1 {
            return self.items[top].clone();
        }
        self.index = top;

        let item = std::mem::replace(&mut self.items[self.index], self.fallback.clone());
        self.count = self.count.saturating_sub(1);
        item
    }

    /// Return the top item without removing it, or the fallback if empty.
    pub fn peek(&self) -> T {
        match self.top_slot() {
            Some(slot) => self.items[slot].clone(),
            None => self.fallback.clone(),
        }
    }

    /// The top item, or the item in slot 0 if the stack is empty.
    pub fn current(&self) -> T {
        self.slot_or_base(self.top_slot())
    }

    /// The item below the top, or the item in slot 0 if there is none.
    pub fn previous(&self) -> T {
        let slot = if self.is_ring() {
            (self.count > 1)
                .then(|| (self.index + 2 * self.rollover_size - 2) % self.rollover_size)
        } else {
            self.index.checked_sub(2)
        };
        self.slot_or_base(slot)
    }

    /// Append an item without growing the storage.
    ///
    /// This is used with tables that were sized up front. If there is no free
    /// slot the item is dropped and [`Error::StackFull`] is returned; the
    /// stack is left unchanged. In ring mode the index wraps like
    /// [`push`](Self::push).
    pub fn add(&mut self, item: T) -> Result<(), Error> {
        match self.items.get_mut(self.index) {
            Some(slot) => {
                *slot = item;
                if self.is_ring() {
                    self.index = (self.index + 1) % self.rollover_size;
                    self.count = (self.count + 1).min(self.rollover_size);
                } else {
                    self.index += 1;
                    self.count += 1;
                }
                Ok(())
            }
            None => {
                log::trace!("stack full at {} items, dropping value", self.index);
                Err(Error::StackFull {
                    capacity: self.items.len(),
                })
            }
        }
    }

    /// Drop the top item in response to a closing tag.
    ///
    /// Returns the item that is current afterwards. The stack never shrinks
    /// below slot 0: removing from a stack that only holds its baseline
    /// returns the baseline.
    pub fn remove(&mut self) -> T {
        if self.is_ring() {
            if self.count > 1 {
                self.index = (self.index + self.rollover_size - 1) % self.rollover_size;
                self.count -= 1;
            }
            return self.current();
        }
        if self.index <= 1 {
            if self.items.is_empty() {
                return self.fallback.clone();
            }
            self.index = 1;
            self.count = 1;
            return self.items[0].clone();
        }
        self.index -= 1;
        self.count = self.count.saturating_sub(1);
        self.items[self.index - 1].clone()
    }
}
