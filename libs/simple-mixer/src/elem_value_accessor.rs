// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Typed access to the values of control element.

use super::registry::ElemValue;

/// The trait for typed access to values in [`ElemValue`].
pub trait ElemValueAccessor<T>
where
    T: Copy + Clone + Default + Eq + PartialEq,
{
    fn vals(&self) -> &[T];
    fn vals_mut(&mut self) -> &mut [T];

    /// The value at the position, or default value when the position is beyond the storage.
    fn val_at(&self, pos: usize) -> T {
        self.vals().get(pos).copied().unwrap_or_default()
    }

    fn set_val_at(&mut self, pos: usize, val: T) {
        if let Some(v) = self.vals_mut().get_mut(pos) {
            *v = val;
        }
    }

    /// The value for the channel in the control element which has the number of values. The
    /// channel beyond the number refers to the first value.
    fn channel_val(&self, ch: usize, value_count: usize) -> T {
        let pos = if ch >= value_count { 0 } else { ch };
        self.val_at(pos)
    }

    fn set_vals<F>(&mut self, len: usize, mut cb: F)
    where
        F: FnMut(usize) -> T,
    {
        let len = std::cmp::min(len, self.vals().len());
        self.vals_mut()[..len]
            .iter_mut()
            .enumerate()
            .for_each(|(pos, v)| *v = cb(pos));
    }
}

impl ElemValueAccessor<bool> for ElemValue {
    fn vals(&self) -> &[bool] {
        self.boolean()
    }

    fn vals_mut(&mut self) -> &mut [bool] {
        self.boolean_mut()
    }
}

impl ElemValueAccessor<i32> for ElemValue {
    fn vals(&self) -> &[i32] {
        self.int()
    }

    fn vals_mut(&mut self) -> &mut [i32] {
        self.int_mut()
    }
}

impl ElemValueAccessor<u32> for ElemValue {
    fn vals(&self) -> &[u32] {
        self.enumerated()
    }

    fn vals_mut(&mut self) -> &mut [u32] {
        self.enumerated_mut()
    }
}
