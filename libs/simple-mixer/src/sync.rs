// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Synchronization between the cache of simple element and the values of control elements.

use {
    super::{
        elem_value_accessor::ElemValueAccessor,
        range::{from_user, to_user},
        selem::*,
        *,
    },
    tracing::debug,
};

fn read_value<R: ControlRegistry>(
    registry: &R,
    elem_id: &ElemId,
    elem_value: &mut ElemValue,
) -> Result<(), Error> {
    let res = registry.read_elem_value(elem_id, elem_value);
    debug!(%elem_id, ?res, "read");
    res.map_err(Error::from)
}

fn write_value<R: ControlRegistry>(
    registry: &mut R,
    elem_id: &ElemId,
    elem_value: &ElemValue,
) -> Result<(), Error> {
    let res = registry.write_elem_value(elem_id, elem_value);
    debug!(%elem_id, ?res, "write");
    res.map_err(Error::from)
}

// The number of values to write; any channel beyond the cache is not available.
fn write_count(ctl: &SelemCtl) -> usize {
    std::cmp::min(ctl.values, CHANNELS_MAX)
}

impl SimpleElem {
    fn attached_ctl(&self, ctl_type: CtlType) -> Option<(&ElemId, &SelemCtl)> {
        let ctl = self.ctl(ctl_type);
        ctl.elem_id.as_ref().map(|elem_id| (elem_id, ctl))
    }

    fn read_volume<R: ControlRegistry>(
        &mut self,
        registry: &R,
        dir: Direction,
        ctl_type: CtlType,
    ) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(ctl_type) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        let device = ctl.range();
        let values = ctl.values;
        let s = &mut self.str[dir as usize];
        let user = s.range();
        (0..s.channels).for_each(|ch| {
            let val = ElemValueAccessor::<i32>::channel_val(&elem_value, ch, values);
            s.vol[ch] = to_user(val as i64, &device, &user);
        });
        Ok(())
    }

    fn read_switch<R: ControlRegistry>(
        &mut self,
        registry: &R,
        dir: Direction,
        ctl_type: CtlType,
    ) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(ctl_type) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        let values = ctl.values;
        let s = &mut self.str[dir as usize];
        (0..s.channels).for_each(|ch| {
            if !ElemValueAccessor::<bool>::channel_val(&elem_value, ch, values) {
                s.sw &= !(1 << ch);
            }
        });
        Ok(())
    }

    // Only the diagonal of matrix is meaningful.
    fn read_route<R: ControlRegistry>(
        &mut self,
        registry: &R,
        dir: Direction,
        ctl_type: CtlType,
    ) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(ctl_type) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        let values = ctl.values;
        let s = &mut self.str[dir as usize];
        (0..s.channels).for_each(|ch| {
            let pos = if ch >= values { 0 } else { ch };
            if !ElemValueAccessor::<bool>::val_at(&elem_value, pos * values + pos) {
                s.sw &= !(1 << ch);
            }
        });
        Ok(())
    }

    // The bit of channel is cleared unless the item for the simple element is selected.
    fn read_capture_source<R: ControlRegistry>(&mut self, registry: &R) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(CtlType::CaptureSource) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        let values = ctl.values;
        let capture_item = self.capture_item;
        let s = &mut self.str[Direction::Capture as usize];
        (0..s.channels).for_each(|ch| {
            if ElemValueAccessor::<u32>::channel_val(&elem_value, ch, values) != capture_item {
                s.sw &= !(1 << ch);
            }
        });
        Ok(())
    }

    // The selected items are cached as volume of playback direction.
    fn read_enum<R: ControlRegistry>(&mut self, registry: &R) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(CtlType::EnumList) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        let values = ctl.values;
        let s = &mut self.str[Direction::Playback as usize];
        (0..s.channels).for_each(|ch| {
            s.vol[ch] = ElemValueAccessor::<u32>::channel_val(&elem_value, ch, values) as i64;
        });
        Ok(())
    }

    fn volume_source(&self, dir: Direction) -> Option<CtlType> {
        let dedicated = match dir {
            Direction::Playback => CtlType::PlaybackVolume,
            Direction::Capture => CtlType::CaptureVolume,
        };
        if self.has_ctl(dedicated) {
            Some(dedicated)
        } else if self.has_ctl(CtlType::GlobalVolume) {
            Some(CtlType::GlobalVolume)
        } else if self.has_ctl(CtlType::Single)
            && self.ctl(CtlType::Single).elem_type == ElemType::Integer
        {
            Some(CtlType::Single)
        } else {
            None
        }
    }

    fn read_direction<R: ControlRegistry>(
        &mut self,
        registry: &R,
        dir: Direction,
    ) -> Result<(), Error> {
        if let Some(ctl_type) = self.volume_source(dir) {
            self.read_volume(registry, dir, ctl_type)?;
        }

        let (caps, switch, route) = match dir {
            Direction::Playback => (
                SelemCaps::GSWITCH | SelemCaps::PSWITCH,
                CtlType::PlaybackSwitch,
                CtlType::PlaybackRoute,
            ),
            Direction::Capture => (
                SelemCaps::GSWITCH | SelemCaps::CSWITCH,
                CtlType::CaptureSwitch,
                CtlType::CaptureRoute,
            ),
        };

        if !self.caps.intersects(caps) {
            self.str[dir as usize].sw = 0;
            return Ok(());
        }

        self.read_switch(registry, dir, switch)?;
        self.read_switch(registry, dir, CtlType::GlobalSwitch)?;
        if self.ctl(CtlType::Single).elem_type == ElemType::Boolean {
            self.read_switch(registry, dir, CtlType::Single)?;
        }
        self.read_route(registry, dir, route)?;
        self.read_route(registry, dir, CtlType::GlobalRoute)?;
        if dir == Direction::Capture {
            self.read_capture_source(registry)?;
        }

        Ok(())
    }

    /// Read the values of attached control elements into the cache, then return whether the
    /// cache changes.
    pub(crate) fn read<R: ControlRegistry>(&mut self, registry: &R) -> Result<bool, Error> {
        let prev = self.str.clone();

        self.str.iter_mut().for_each(|s| {
            s.vol = [0; CHANNELS_MAX];
            s.sw = !0;
        });

        let res = if self.has_ctl(CtlType::EnumList) {
            self.read_enum(registry)
        } else {
            self.read_direction(registry, Direction::Playback)
                .and_then(|_| self.read_direction(registry, Direction::Capture))
        };
        if let Err(err) = res {
            self.str = prev;
            return Err(err);
        }

        let changed = self
            .str
            .iter()
            .zip(prev.iter())
            .any(|(curr, prev)| curr.vol != prev.vol || curr.sw != prev.sw);
        debug!(selem = %self.id(), changed);

        Ok(changed)
    }

    fn write_volume<R: ControlRegistry>(
        &self,
        registry: &mut R,
        dir: Direction,
        ctl_type: CtlType,
    ) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(ctl_type) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        let device = ctl.range();
        let s = self.stream(dir);
        let user = s.range();
        ElemValueAccessor::<i32>::set_vals(&mut elem_value, write_count(ctl), |ch| {
            from_user(s.vol[ch], &device, &user) as i32
        });
        write_value(registry, elem_id, &elem_value)
    }

    fn write_switch<R: ControlRegistry>(
        &self,
        registry: &mut R,
        dir: Direction,
        ctl_type: CtlType,
    ) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(ctl_type) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        let sw = self.stream(dir).sw;
        ElemValueAccessor::<bool>::set_vals(&mut elem_value, write_count(ctl), |ch| {
            sw & (1 << ch) > 0
        });
        write_value(registry, elem_id, &elem_value)
    }

    fn write_switch_constant<R: ControlRegistry>(
        &self,
        registry: &mut R,
        ctl_type: CtlType,
        val: bool,
    ) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(ctl_type) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        ElemValueAccessor::<bool>::set_vals(&mut elem_value, ctl.values, |_| val);
        write_value(registry, elem_id, &elem_value)
    }

    // The whole matrix is cleared, then the diagonal is set.
    fn write_route<R: ControlRegistry>(
        &self,
        registry: &mut R,
        dir: Direction,
        ctl_type: CtlType,
    ) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(ctl_type) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        let values = ctl.values;
        ElemValueAccessor::<bool>::set_vals(&mut elem_value, values * values, |_| false);
        let sw = self.stream(dir).sw;
        (0..write_count(ctl)).for_each(|ch| {
            ElemValueAccessor::<bool>::set_val_at(
                &mut elem_value,
                ch * values + ch,
                sw & (1 << ch) > 0,
            );
        });
        write_value(registry, elem_id, &elem_value)
    }

    fn write_capture_source<R: ControlRegistry>(&self, registry: &mut R) -> Result<(), Error> {
        let (elem_id, ctl) = match self.attached_ctl(CtlType::CaptureSource) {
            Some(entry) => entry,
            None => return Ok(()),
        };
        let mut elem_value = ElemValue::new();
        read_value(registry, elem_id, &mut elem_value)?;

        let sw = self.stream(Direction::Capture).sw;
        (0..write_count(ctl))
            .filter(|ch| sw & (1 << ch) > 0)
            .for_each(|ch| {
                ElemValueAccessor::<u32>::set_val_at(&mut elem_value, ch, self.capture_item);
            });
        write_value(registry, elem_id, &elem_value)
    }

    /// Write the cache into attached control elements.
    pub(crate) fn write<R: ControlRegistry>(&mut self, registry: &mut R) -> Result<(), Error> {
        if let Some((_, ctl)) = self.attached_ctl(CtlType::Single) {
            if ctl.elem_type == ElemType::Integer {
                self.write_volume(registry, Direction::Playback, CtlType::Single)?;
            } else {
                self.write_switch(registry, Direction::Playback, CtlType::Single)?;
            }
        }

        self.write_volume(registry, Direction::Playback, CtlType::GlobalVolume)?;

        if self.has_ctl(CtlType::PlaybackSwitch) && self.has_ctl(CtlType::CaptureSwitch) {
            self.write_switch_constant(registry, CtlType::GlobalSwitch, true)?;
        } else {
            self.write_switch(registry, Direction::Playback, CtlType::GlobalSwitch)?;
        }

        self.write_volume(registry, Direction::Playback, CtlType::PlaybackVolume)?;
        self.write_switch(registry, Direction::Playback, CtlType::PlaybackSwitch)?;
        self.write_route(registry, Direction::Playback, CtlType::PlaybackRoute)?;
        self.write_volume(registry, Direction::Capture, CtlType::CaptureVolume)?;
        self.write_switch(registry, Direction::Capture, CtlType::CaptureSwitch)?;
        self.write_route(registry, Direction::Capture, CtlType::CaptureRoute)?;

        if self.has_ctl(CtlType::CaptureSource) {
            self.write_capture_source(registry)?;
            self.read(registry)?;
        }

        Ok(())
    }
}
