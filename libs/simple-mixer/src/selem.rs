// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Simple element which aggregates control elements.
//!
//! The simple element has twelve slots for roles of control elements. The capabilities, the
//! number of channels, and the range of volume for both directions are derived from the set of
//! attached control elements.

use super::{name::compare_weight, range::ValueRange, *};

/// The maximum number of channels in simple element.
pub const CHANNELS_MAX: usize = 32;

const ALL_SWITCHES_ON: u32 = !0;

/// The role of control element in simple element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CtlType {
    /// The control element without suffix in its name.
    Single,
    /// The enumerated control element.
    EnumList,
    GlobalSwitch,
    GlobalVolume,
    GlobalRoute,
    PlaybackSwitch,
    PlaybackVolume,
    PlaybackRoute,
    CaptureSwitch,
    CaptureVolume,
    CaptureRoute,
    /// The item of enumerated control element for source of capture.
    CaptureSource,
}

impl CtlType {
    pub const ALL: [CtlType; 12] = [
        CtlType::Single,
        CtlType::EnumList,
        CtlType::GlobalSwitch,
        CtlType::GlobalVolume,
        CtlType::GlobalRoute,
        CtlType::PlaybackSwitch,
        CtlType::PlaybackVolume,
        CtlType::PlaybackRoute,
        CtlType::CaptureSwitch,
        CtlType::CaptureVolume,
        CtlType::CaptureRoute,
        CtlType::CaptureSource,
    ];

    fn pos(self) -> usize {
        self as usize
    }
}

/// The direction of stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Playback,
    Capture,
}

impl Direction {
    fn pos(self) -> usize {
        self as usize
    }
}

/// The set of capabilities for simple element.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SelemCaps(u32);

impl SelemCaps {
    pub const GVOLUME: Self = Self(1 << 1);
    pub const GSWITCH: Self = Self(1 << 2);
    pub const PVOLUME: Self = Self(1 << 3);
    pub const PVOLUME_JOIN: Self = Self(1 << 4);
    pub const PSWITCH: Self = Self(1 << 5);
    pub const PSWITCH_JOIN: Self = Self(1 << 6);
    pub const CVOLUME: Self = Self(1 << 7);
    pub const CVOLUME_JOIN: Self = Self(1 << 8);
    pub const CSWITCH: Self = Self(1 << 9);
    pub const CSWITCH_JOIN: Self = Self(1 << 10);
    pub const CSWITCH_EXCL: Self = Self(1 << 11);
    pub const PENUM: Self = Self(1 << 12);
    pub const CENUM: Self = Self(1 << 13);
    pub const ENUM: Self = Self(Self::PENUM.0 | Self::CENUM.0);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether all of the given flags are included.
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any of the given flags is included.
    pub fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 > 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for SelemCaps {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for SelemCaps {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// The identifier of simple element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelemId {
    pub name: String,
    pub index: u32,
}

impl SelemId {
    pub fn new(name: &str, index: u32) -> Self {
        Self {
            name: name.to_string(),
            index,
        }
    }
}

impl std::fmt::Display for SelemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}',{}", self.name, self.index)
    }
}

/// The slot for control element.
#[derive(Debug, Clone, Default)]
pub(crate) struct SelemCtl {
    pub elem_id: Option<ElemId>,
    pub elem_type: ElemType,
    pub inactive: bool,
    /// The number of values. For route, the length of one side in the matrix.
    pub values: usize,
    pub min: i64,
    pub max: i64,
    /// The labels of items for enumerated control element.
    pub labels: Vec<String>,
}

impl SelemCtl {
    pub fn is_attached(&self) -> bool {
        self.elem_id.is_some()
    }

    pub fn range(&self) -> ValueRange {
        ValueRange::new(self.min, self.max)
    }
}

/// The state of one direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelemStream {
    /// Whether the range is forced by user.
    pub forced_range: bool,
    pub min: i64,
    pub max: i64,
    pub channels: usize,
    pub vol: [i64; CHANNELS_MAX],
    pub sw: u32,
}

impl SelemStream {
    pub fn range(&self) -> ValueRange {
        ValueRange::new(self.min, self.max)
    }
}

/// The simple element.
#[derive(Debug, Clone)]
pub struct SimpleElem {
    id: SelemId,
    compare_weight: u32,
    pub(crate) ctls: [SelemCtl; 12],
    pub(crate) capture_item: u32,
    pub(crate) caps: SelemCaps,
    pub(crate) str: [SelemStream; 2],
}

impl SimpleElem {
    pub(crate) fn new(id: SelemId) -> Self {
        let compare_weight = compare_weight(&id.name, id.index);
        Self {
            id,
            compare_weight,
            ctls: Default::default(),
            capture_item: 0,
            caps: SelemCaps::empty(),
            str: Default::default(),
        }
    }

    pub(crate) fn ctl(&self, ctl_type: CtlType) -> &SelemCtl {
        &self.ctls[ctl_type.pos()]
    }

    pub(crate) fn stream(&self, dir: Direction) -> &SelemStream {
        &self.str[dir.pos()]
    }

    pub(crate) fn stream_mut(&mut self, dir: Direction) -> &mut SelemStream {
        &mut self.str[dir.pos()]
    }

    pub(crate) fn has_ctl(&self, ctl_type: CtlType) -> bool {
        self.ctl(ctl_type).is_attached()
    }

    /// Attach the control element to the slot. The slot should be empty.
    pub(crate) fn attach(
        &mut self,
        ctl_type: CtlType,
        elem_id: &ElemId,
        elem_info: &ElemInfo,
        values: usize,
        capture_item: u32,
    ) -> Result<(), Error> {
        let ctl = &mut self.ctls[ctl_type.pos()];
        if ctl.is_attached() {
            return Err(Error::DuplicateSlot {
                elem_id: elem_id.clone(),
            });
        }

        ctl.elem_id = Some(elem_id.clone());
        ctl.elem_type = elem_info.elem_type;
        ctl.inactive = elem_info.inactive;
        ctl.values = values;
        ctl.labels = elem_info.labels.clone();
        if ctl_type == CtlType::EnumList {
            ctl.min = 0;
            ctl.max = elem_info.labels.len() as i64;
        } else if elem_info.elem_type == ElemType::Integer {
            ctl.min = elem_info.value_min as i64;
            ctl.max = elem_info.value_max as i64;
        } else {
            ctl.min = 0;
            ctl.max = 0;
        }

        if ctl_type == CtlType::CaptureSource {
            self.capture_item = capture_item;
        }

        Ok(())
    }

    /// Detach the control element, then return the role which it had.
    pub(crate) fn detach(&mut self, elem_id: &ElemId) -> Option<CtlType> {
        CtlType::ALL
            .iter()
            .find(|ctl_type| self.ctls[ctl_type.pos()].elem_id.as_ref() == Some(elem_id))
            .map(|&ctl_type| {
                self.ctls[ctl_type.pos()] = SelemCtl::default();
                ctl_type
            })
    }

    /// Whether no control element is attached.
    pub fn is_empty(&self) -> bool {
        self.ctls.iter().all(|ctl| !ctl.is_attached())
    }

    /// The identifiers of attached control elements.
    pub fn elem_ids(&self) -> Vec<&ElemId> {
        let mut elem_ids: Vec<&ElemId> = Vec::new();
        self.ctls
            .iter()
            .filter_map(|ctl| ctl.elem_id.as_ref())
            .for_each(|elem_id| {
                if !elem_ids.contains(&elem_id) {
                    elem_ids.push(elem_id);
                }
            });
        elem_ids
    }

    /// Derive the capabilities, the number of channels, and the range of volume from attached
    /// control elements. The range forced by user is kept.
    pub(crate) fn update(&mut self) {
        let mut caps = SelemCaps::empty();
        let mut pchannels = 0;
        let mut cchannels = 0;
        let mut prange: Option<ValueRange> = None;
        let mut crange: Option<ValueRange> = None;

        fn unite(range: &mut Option<ValueRange>, ctl: &SelemCtl) {
            *range = Some(match range {
                Some(r) => ValueRange::new(r.min.min(ctl.min), r.max.max(ctl.max)),
                None => ctl.range(),
            });
        }

        let ctl = self.ctl(CtlType::Single);
        if ctl.is_attached() {
            pchannels = ctl.values;
            cchannels = ctl.values;
            if ctl.elem_type == ElemType::Integer {
                caps.insert(SelemCaps::GVOLUME);
                prange = Some(ctl.range());
                crange = Some(ctl.range());
            } else {
                caps.insert(SelemCaps::GSWITCH);
            }
        }

        let ctl = self.ctl(CtlType::GlobalSwitch);
        if ctl.is_attached() {
            pchannels = pchannels.max(ctl.values);
            cchannels = cchannels.max(ctl.values);
            caps.insert(SelemCaps::GSWITCH);
        }

        let ctl = self.ctl(CtlType::GlobalRoute);
        if ctl.is_attached() {
            pchannels = pchannels.max(ctl.values);
            cchannels = cchannels.max(ctl.values);
            caps.insert(SelemCaps::GSWITCH);
        }

        let ctl = self.ctl(CtlType::GlobalVolume);
        if ctl.is_attached() {
            pchannels = pchannels.max(ctl.values);
            cchannels = cchannels.max(ctl.values);
            unite(&mut prange, ctl);
            unite(&mut crange, ctl);
            caps.insert(SelemCaps::GVOLUME);
        }

        let ctl = self.ctl(CtlType::PlaybackSwitch);
        if ctl.is_attached() {
            pchannels = pchannels.max(ctl.values);
            caps.insert(SelemCaps::PSWITCH);
            caps.remove(SelemCaps::GSWITCH);
        }

        let ctl = self.ctl(CtlType::PlaybackRoute);
        if ctl.is_attached() {
            pchannels = pchannels.max(ctl.values);
            caps.insert(SelemCaps::PSWITCH);
            caps.remove(SelemCaps::GSWITCH);
        }

        let ctl = self.ctl(CtlType::CaptureSwitch);
        if ctl.is_attached() {
            cchannels = cchannels.max(ctl.values);
            caps.insert(SelemCaps::CSWITCH);
            caps.remove(SelemCaps::GSWITCH);
        }

        let ctl = self.ctl(CtlType::CaptureRoute);
        if ctl.is_attached() {
            cchannels = cchannels.max(ctl.values);
            caps.insert(SelemCaps::CSWITCH);
            caps.remove(SelemCaps::GSWITCH);
        }

        let ctl = self.ctl(CtlType::PlaybackVolume);
        if ctl.is_attached() {
            pchannels = pchannels.max(ctl.values);
            unite(&mut prange, ctl);
            caps.insert(SelemCaps::PVOLUME);
            caps.remove(SelemCaps::GVOLUME);
        }

        let ctl = self.ctl(CtlType::CaptureVolume);
        if ctl.is_attached() {
            cchannels = cchannels.max(ctl.values);
            unite(&mut crange, ctl);
            caps.insert(SelemCaps::CVOLUME);
            caps.remove(SelemCaps::GVOLUME);
        }

        let ctl = self.ctl(CtlType::CaptureSource);
        if ctl.is_attached() {
            cchannels = cchannels.max(ctl.values);
            caps.insert(SelemCaps::CSWITCH | SelemCaps::CSWITCH_EXCL);
            caps.remove(SelemCaps::GSWITCH);
        }

        let ctl = self.ctl(CtlType::EnumList);
        if ctl.is_attached() {
            pchannels = pchannels.max(ctl.values);
            caps.insert(SelemCaps::ENUM);
        }

        pchannels = pchannels.min(CHANNELS_MAX);
        cchannels = cchannels.min(CHANNELS_MAX);

        if caps.intersects(SelemCaps::GSWITCH | SelemCaps::PSWITCH) {
            caps.insert(SelemCaps::PSWITCH_JOIN);
        }
        if caps.intersects(SelemCaps::GVOLUME | SelemCaps::PVOLUME) {
            caps.insert(SelemCaps::PVOLUME_JOIN);
        }
        if caps.intersects(SelemCaps::GSWITCH | SelemCaps::CSWITCH) {
            caps.insert(SelemCaps::CSWITCH_JOIN);
        }
        if caps.intersects(SelemCaps::GVOLUME | SelemCaps::CVOLUME) {
            caps.insert(SelemCaps::CVOLUME_JOIN);
        }

        let is_multi = |ctl_type: CtlType| {
            let ctl = self.ctl(ctl_type);
            ctl.is_attached() && ctl.values > 1
        };

        if pchannels > 1 || cchannels > 1 {
            if is_multi(CtlType::Single) {
                if caps.contains(SelemCaps::GSWITCH) {
                    caps.remove(SelemCaps::PSWITCH_JOIN | SelemCaps::CSWITCH_JOIN);
                } else {
                    caps.remove(SelemCaps::PVOLUME_JOIN | SelemCaps::CVOLUME_JOIN);
                }
            }
            if self.has_ctl(CtlType::GlobalRoute) || is_multi(CtlType::GlobalSwitch) {
                caps.remove(SelemCaps::PSWITCH_JOIN | SelemCaps::CSWITCH_JOIN);
            }
            if is_multi(CtlType::GlobalVolume) {
                caps.remove(SelemCaps::PVOLUME_JOIN | SelemCaps::CVOLUME_JOIN);
            }
        }
        if pchannels > 1 {
            if self.has_ctl(CtlType::PlaybackRoute) || is_multi(CtlType::PlaybackSwitch) {
                caps.remove(SelemCaps::PSWITCH_JOIN);
            }
            if is_multi(CtlType::PlaybackVolume) {
                caps.remove(SelemCaps::PVOLUME_JOIN);
            }
        }
        if cchannels > 1 {
            if self.has_ctl(CtlType::CaptureRoute) || is_multi(CtlType::CaptureSwitch) {
                caps.remove(SelemCaps::CSWITCH_JOIN);
            }
            if is_multi(CtlType::CaptureVolume) {
                caps.remove(SelemCaps::CVOLUME_JOIN);
            }
        }

        // The global switch shared by both directions is exposed as playback switch only.
        let switches = caps & (SelemCaps::GSWITCH | SelemCaps::PSWITCH | SelemCaps::CSWITCH);
        if !switches.is_empty() && switches == caps & SelemCaps::GSWITCH {
            caps.remove(SelemCaps::GSWITCH | SelemCaps::CSWITCH_JOIN | SelemCaps::CSWITCH_EXCL);
            caps.insert(SelemCaps::PSWITCH);
        }

        self.caps = caps;

        let prange = prange.unwrap_or_default();
        let s = self.stream_mut(Direction::Playback);
        s.channels = pchannels;
        if !s.forced_range {
            s.min = prange.min;
            s.max = prange.max;
        }

        let crange = crange.unwrap_or_default();
        let s = self.stream_mut(Direction::Capture);
        s.channels = cchannels;
        if !s.forced_range {
            s.min = crange.min;
            s.max = crange.max;
        }
    }

    pub fn id(&self) -> &SelemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn index(&self) -> u32 {
        self.id.index
    }

    /// The weight to sort simple elements.
    pub fn compare_weight(&self) -> u32 {
        self.compare_weight
    }

    pub fn caps(&self) -> SelemCaps {
        self.caps
    }

    /// The item of enumerated control element which the simple element represents as source of
    /// capture.
    pub fn capture_item(&self) -> u32 {
        self.capture_item
    }

    /// The role of attached control element.
    pub fn ctl_type_of(&self, elem_id: &ElemId) -> Option<CtlType> {
        CtlType::ALL
            .iter()
            .find(|ctl_type| self.ctl(**ctl_type).elem_id.as_ref() == Some(elem_id))
            .copied()
    }

    pub fn channels(&self, dir: Direction) -> usize {
        self.stream(dir).channels
    }

    /// Whether none of attached control elements is inactive.
    pub fn is_active(&self) -> bool {
        self.ctls
            .iter()
            .all(|ctl| !ctl.is_attached() || !ctl.inactive)
    }

    pub fn is_mono(&self, dir: Direction) -> bool {
        self.stream(dir).channels == 1
    }

    pub fn has_channel(&self, dir: Direction, channel: usize) -> bool {
        channel < self.stream(dir).channels
    }

    pub fn is_enumerated(&self) -> bool {
        self.has_ctl(CtlType::EnumList)
    }

    /// The number of items in enumerated control element.
    pub fn enum_item_count(&self) -> Result<usize, Error> {
        let ctl = self.ctl(CtlType::EnumList);
        if ctl.is_attached() {
            Ok(ctl.max as usize)
        } else {
            Err(Error::invalid("not enumerated"))
        }
    }

    /// The label of item in enumerated control element, truncated within the maximum length.
    pub fn enum_item_name(&self, item: usize, maxlen: usize) -> Result<String, Error> {
        let ctl = self.ctl(CtlType::EnumList);
        if !ctl.is_attached() {
            Err(Error::invalid("not enumerated"))?;
        }
        if item as i64 >= ctl.max {
            Err(Error::invalid(format!("item {} is out of range", item)))?;
        }
        let label = ctl.labels.get(item).map(|l| l.as_str()).unwrap_or_default();
        let mut len = std::cmp::min(label.len(), maxlen);
        while !label.is_char_boundary(len) {
            len -= 1;
        }
        Ok(label[..len].to_string())
    }

    pub fn range(&self, dir: Direction) -> ValueRange {
        self.stream(dir).range()
    }

    pub fn db_range(&self, _: Direction) -> Result<ValueRange, Error> {
        Err(Error::NotSupported)
    }

    fn volume_caps(dir: Direction) -> (SelemCaps, SelemCaps) {
        match dir {
            Direction::Playback => (
                SelemCaps::PVOLUME | SelemCaps::GVOLUME,
                SelemCaps::PVOLUME_JOIN,
            ),
            Direction::Capture => (
                SelemCaps::CVOLUME | SelemCaps::GVOLUME,
                SelemCaps::CVOLUME_JOIN,
            ),
        }
    }

    fn switch_caps(dir: Direction) -> (SelemCaps, SelemCaps) {
        match dir {
            Direction::Playback => (
                SelemCaps::PSWITCH | SelemCaps::GSWITCH,
                SelemCaps::PSWITCH_JOIN,
            ),
            Direction::Capture => (
                SelemCaps::CSWITCH | SelemCaps::GSWITCH,
                SelemCaps::CSWITCH_JOIN,
            ),
        }
    }

    // The global volume and switch are kept in playback direction.
    fn volume_dir(&self, dir: Direction) -> Direction {
        if self.caps.contains(SelemCaps::GVOLUME) {
            Direction::Playback
        } else {
            dir
        }
    }

    fn switch_dir(&self, dir: Direction) -> Direction {
        if self.caps.contains(SelemCaps::GSWITCH) {
            Direction::Playback
        } else {
            dir
        }
    }

    fn check_channel(&self, dir: Direction, channel: usize) -> Result<(), Error> {
        if self.has_channel(dir, channel) {
            Ok(())
        } else {
            Err(Error::invalid(format!("channel {} is out of range", channel)))
        }
    }

    pub(crate) fn check_volume_caps(&self, dir: Direction) -> Result<(), Error> {
        let (avail, _) = Self::volume_caps(dir);
        if self.caps.intersects(avail) {
            Ok(())
        } else {
            Err(Error::invalid("no volume"))
        }
    }

    pub(crate) fn check_switch_caps(&self, dir: Direction) -> Result<(), Error> {
        let (avail, _) = Self::switch_caps(dir);
        if self.caps.intersects(avail) {
            Ok(())
        } else {
            Err(Error::invalid("no switch"))
        }
    }

    /// The volume of channel in user side.
    pub fn volume(&self, dir: Direction, channel: usize) -> Result<i64, Error> {
        let dir = self.volume_dir(dir);
        self.check_channel(dir, channel)?;
        self.check_volume_caps(dir)?;
        let (_, join) = Self::volume_caps(dir);
        let channel = if self.caps.contains(join) { 0 } else { channel };
        Ok(self.stream(dir).vol[channel])
    }

    pub fn db(&self, _: Direction, _: usize) -> Result<i64, Error> {
        Err(Error::NotSupported)
    }

    pub fn switch(&self, dir: Direction, channel: usize) -> Result<bool, Error> {
        let dir = self.switch_dir(dir);
        self.check_channel(dir, channel)?;
        self.check_switch_caps(dir)?;
        let (_, join) = Self::switch_caps(dir);
        let channel = if self.caps.contains(join) { 0 } else { channel };
        Ok(self.stream(dir).sw & (1 << channel) > 0)
    }

    /// Force the range in user side.
    pub(crate) fn force_range(&mut self, dir: Direction, min: i64, max: i64) {
        let s = self.stream_mut(dir);
        s.forced_range = true;
        s.min = min;
        s.max = max;
    }

    /// Change cached volume of the channel, then return whether it changes.
    pub(crate) fn change_volume(
        &mut self,
        dir: Direction,
        channel: usize,
        value: i64,
    ) -> Result<bool, Error> {
        let dir = self.volume_dir(dir);
        self.check_channel(dir, channel)?;
        if !self.range(dir).contains(value) {
            Err(Error::invalid(format!("{} is out of range", value)))?;
        }
        let (_, join) = Self::volume_caps(dir);
        let channel = if self.caps.contains(join) { 0 } else { channel };
        let s = self.stream_mut(dir);
        if s.vol[channel] != value {
            s.vol[channel] = value;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn change_volume_all(&mut self, dir: Direction, value: i64) -> Result<bool, Error> {
        let dir = self.volume_dir(dir);
        if !self.range(dir).contains(value) {
            Err(Error::invalid(format!("{} is out of range", value)))?;
        }
        let s = self.stream_mut(dir);
        let channels = s.channels;
        let mut changed = false;
        s.vol[..channels].iter_mut().for_each(|v| {
            if *v != value {
                *v = value;
                changed = true;
            }
        });
        Ok(changed)
    }

    pub(crate) fn change_switch(
        &mut self,
        dir: Direction,
        channel: usize,
        value: bool,
    ) -> Result<bool, Error> {
        let dir = self.switch_dir(dir);
        self.check_channel(dir, channel)?;
        let (_, join) = Self::switch_caps(dir);
        let channel = if self.caps.contains(join) { 0 } else { channel };
        let s = self.stream_mut(dir);
        let mask = 1 << channel;
        let prev = s.sw;
        if value {
            s.sw |= mask;
        } else {
            s.sw &= !mask;
        }
        Ok(prev != s.sw)
    }

    pub(crate) fn change_switch_all(&mut self, dir: Direction, value: bool) -> bool {
        let dir = self.switch_dir(dir);
        let s = self.stream_mut(dir);
        let sw = if value { ALL_SWITCHES_ON } else { 0 };
        if s.sw != sw {
            s.sw = sw;
            true
        } else {
            false
        }
    }
}
