// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Interface to the registry of control elements.
//!
//! The registry enumerates control elements, reports their information, and performs read and
//! write operations for their values. In Linux sound subsystem it is the control character
//! device of sound card, while any in-memory implementation is available as well.

/// The maximum number of values in one control element.
pub const VALUE_COUNT_MAX: usize = 128;

/// The type of interface for control element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElemIfaceType {
    Card,
    Hwdep,
    Mixer,
    Pcm,
    Rawmidi,
    Timer,
    Sequencer,
}

impl std::fmt::Display for ElemIfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Card => "CARD",
            Self::Hwdep => "HWDEP",
            Self::Mixer => "MIXER",
            Self::Pcm => "PCM",
            Self::Rawmidi => "RAWMIDI",
            Self::Timer => "TIMER",
            Self::Sequencer => "SEQUENCER",
        };
        write!(f, "{}", label)
    }
}

/// The identifier of control element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElemId {
    iface: ElemIfaceType,
    device_id: u32,
    subdevice_id: u32,
    name: String,
    index: u32,
}

impl ElemId {
    pub fn new_by_name(
        iface: ElemIfaceType,
        device_id: u32,
        subdevice_id: u32,
        name: &str,
        index: u32,
    ) -> Self {
        Self {
            iface,
            device_id,
            subdevice_id,
            name: name.to_string(),
            index,
        }
    }

    pub fn iface(&self) -> ElemIfaceType {
        self.iface
    }

    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    pub fn subdevice_id(&self) -> u32 {
        self.subdevice_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl std::fmt::Display for ElemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},'{}',{},{},{})",
            self.iface, self.name, self.index, self.device_id, self.subdevice_id
        )
    }
}

/// The type of control element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ElemType {
    #[default]
    Boolean,
    Integer,
    Enumerated,
    Bytes,
    Iec60958,
    Integer64,
}

/// The information of control element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElemInfo {
    pub elem_type: ElemType,
    /// The number of values; i.e. channels, or cells of matrix.
    pub value_count: usize,
    /// The minimum value for integer type.
    pub value_min: i32,
    /// The maximum value for integer type.
    pub value_max: i32,
    /// The labels of items for enumerated type.
    pub labels: Vec<String>,
    pub inactive: bool,
}

impl ElemInfo {
    pub fn boolean(value_count: usize) -> Self {
        Self {
            elem_type: ElemType::Boolean,
            value_count,
            ..Default::default()
        }
    }

    pub fn integer(value_count: usize, value_min: i32, value_max: i32) -> Self {
        Self {
            elem_type: ElemType::Integer,
            value_count,
            value_min,
            value_max,
            ..Default::default()
        }
    }

    pub fn enumerated<O: AsRef<str>>(value_count: usize, labels: &[O]) -> Self {
        Self {
            elem_type: ElemType::Enumerated,
            value_count,
            labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_inactive(mut self, inactive: bool) -> Self {
        self.inactive = inactive;
        self
    }
}

/// The container of values for control element.
///
/// Like the structure in UAPI of Linux sound subsystem, it has storage for the maximum number of
/// values in each type. Any position beyond the storage is read as default value and ignored at
/// write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElemValue {
    boolean: [bool; VALUE_COUNT_MAX],
    int: [i32; VALUE_COUNT_MAX],
    enumerated: [u32; VALUE_COUNT_MAX],
}

impl Default for ElemValue {
    fn default() -> Self {
        Self {
            boolean: [false; VALUE_COUNT_MAX],
            int: [0; VALUE_COUNT_MAX],
            enumerated: [0; VALUE_COUNT_MAX],
        }
    }
}

impl ElemValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boolean(&self) -> &[bool] {
        &self.boolean
    }

    pub fn int(&self) -> &[i32] {
        &self.int
    }

    pub fn enumerated(&self) -> &[u32] {
        &self.enumerated
    }

    pub fn set_bool(&mut self, vals: &[bool]) {
        copy_prefix(&mut self.boolean, vals);
    }

    pub fn set_int(&mut self, vals: &[i32]) {
        copy_prefix(&mut self.int, vals);
    }

    pub fn set_enum(&mut self, vals: &[u32]) {
        copy_prefix(&mut self.enumerated, vals);
    }

    pub(crate) fn boolean_mut(&mut self) -> &mut [bool] {
        &mut self.boolean
    }

    pub(crate) fn int_mut(&mut self) -> &mut [i32] {
        &mut self.int
    }

    pub(crate) fn enumerated_mut(&mut self) -> &mut [u32] {
        &mut self.enumerated
    }
}

fn copy_prefix<T: Copy>(dst: &mut [T], src: &[T]) {
    let len = std::cmp::min(dst.len(), src.len());
    dst[..len].copy_from_slice(&src[..len]);
}

/// The error type at failure of operation in control registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{msg}{}", errno_suffix(.errno))]
pub struct RegistryError {
    msg: String,
    errno: Option<i32>,
}

impl RegistryError {
    pub fn new(msg: &str) -> Self {
        RegistryError {
            msg: msg.to_string(),
            errno: None,
        }
    }

    pub fn with_errno(msg: &str, errno: i32) -> Self {
        RegistryError {
            msg: msg.to_string(),
            errno: Some(errno),
        }
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn errno(&self) -> Option<i32> {
        self.errno
    }
}

fn errno_suffix(errno: &Option<i32>) -> String {
    errno.map(|errno| format!(" ({})", errno)).unwrap_or_default()
}

/// The trait for registry of control elements.
pub trait ControlRegistry {
    /// Enumerate identifiers of all control elements in the registry.
    fn elem_id_list(&self) -> Result<Vec<ElemId>, RegistryError>;

    /// Retrieve information of the control element.
    fn elem_info(&self, elem_id: &ElemId) -> Result<ElemInfo, RegistryError>;

    /// Read current values of the control element.
    fn read_elem_value(
        &self,
        elem_id: &ElemId,
        elem_value: &mut ElemValue,
    ) -> Result<(), RegistryError>;

    /// Write values to the control element.
    fn write_elem_value(
        &mut self,
        elem_id: &ElemId,
        elem_value: &ElemValue,
    ) -> Result<(), RegistryError>;
}
