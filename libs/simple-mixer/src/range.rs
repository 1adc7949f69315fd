// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Conversion of value between the range of control element and the range in user side.

/// The range of available value.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValueRange {
    /// The minimum value.
    pub min: i64,
    /// The maximum value.
    pub max: i64,
}

impl ValueRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// The length from the minimum to maximum. It does not fit in i64 when the range covers
    /// more than half of i64.
    pub fn length(&self) -> i128 {
        self.max as i128 - self.min as i128
    }

    /// Whether the val is between the minimum and maximum.
    pub fn contains(&self, val: i64) -> bool {
        val >= self.min && val <= self.max
    }

    /// Whether the minimum equals to the maximum.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

// The numerator is biased by the half of divisor to round to nearest. The result saturates at
// the bounds of i64.
fn rescale(value: i64, src: &ValueRange, dst: &ValueRange) -> i64 {
    let divisor = src.length();
    let n = (value as i128 - src.min as i128).saturating_mul(dst.length());
    let val = dst.min as i128 + (n.saturating_add(divisor / 2)) / divisor;
    val.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Convert the value of control element into the value in user side. The minimum in user side
/// is returned when the range of control element is degenerate.
pub fn to_user(value: i64, device: &ValueRange, user: &ValueRange) -> i64 {
    if device.is_degenerate() {
        user.min
    } else {
        rescale(value, device, user)
    }
}

/// Convert the value in user side into the value of control element. The minimum of control
/// element is returned when the range in user side is degenerate.
pub fn from_user(value: i64, device: &ValueRange, user: &ValueRange) -> i64 {
    if user.is_degenerate() {
        device.min
    } else {
        rescale(value, user, device)
    }
}
