// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Simple mixer abstraction over ALSA control elements.
//!
//! The crate groups control elements in mixer interface into simple elements, according to the
//! suffix of their names; e.g. `Master Playback Volume` and `Master Playback Switch` are
//! aggregated into one simple element named `Master`. The simple element has channel model for
//! playback and capture directions, range of volume in user side, and the set of capabilities
//! inferred from the attached control elements.
//!
//! The control elements are accessed through [`ControlRegistry`] trait, thus the crate itself
//! has no dependency on system library. The events of control elements should be delivered to
//! [`Mixer::handle_elem_event`], then the mixer publishes [`MixerEvent`] to its subscribers.

pub mod elem_value_accessor;
pub mod mixer;
pub mod name;
pub mod range;
pub mod registry;
pub mod selem;

mod sync;

#[cfg(test)]
mod test_registry;

pub use {
    mixer::{ElemEvent, Mixer, MixerEvent},
    range::ValueRange,
    registry::*,
    selem::{CtlType, Direction, SelemCaps, SelemId, SimpleElem},
};

/// The error type at failure of operations for simple mixer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid channel, out-of-range value, or the capability is not available.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The operation is not supported by the abstraction; e.g. any operation about dB.
    #[error("Not supported")]
    NotSupported,
    /// The control element occupies the role in the simple element already.
    #[error("{elem_id} appears twice or more")]
    DuplicateSlot { elem_id: ElemId },
    /// The control registry fails to operate.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Fail to allocate.
    #[error("Out of memory")]
    OutOfMemory,
}

impl Error {
    pub(crate) fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
