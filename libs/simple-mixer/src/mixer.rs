// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Mixer which maintains simple elements according to events of control elements.
//!
//! The [`Mixer`] receives [`ElemEvent`] for control elements in the registry, then adds, updates,
//! or removes simple elements. The change of simple element is published as [`MixerEvent`] to
//! subscribers. The simple elements are kept in the order by the weight of their names.

use {
    super::{
        elem_value_accessor::ElemValueAccessor,
        name::{classify, short_name, truncate_name, CAPTURE_SOURCE_NAME},
        selem::*,
        *,
    },
    std::{collections::HashMap, sync::mpsc},
    tracing::{debug, debug_span},
};

/// The event of control element delivered by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElemEvent {
    Add(ElemId),
    Remove(ElemId),
    /// The information of control element changes.
    Info(ElemId),
    Value(ElemId),
}

impl ElemEvent {
    pub fn elem_id(&self) -> &ElemId {
        match self {
            Self::Add(elem_id)
            | Self::Remove(elem_id)
            | Self::Info(elem_id)
            | Self::Value(elem_id) => elem_id,
        }
    }
}

/// The event of simple element published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixerEvent {
    Add(SelemId),
    /// The capabilities, the number of channels, or the range changes.
    Info(SelemId),
    Value(SelemId),
    Remove(SelemId),
}

impl MixerEvent {
    pub fn selem_id(&self) -> &SelemId {
        match self {
            Self::Add(id) | Self::Info(id) | Self::Value(id) | Self::Remove(id) => id,
        }
    }
}

// Check the type of control element for the role, then return the refined role and the number of
// values. None when the control element is not available for the role.
fn refine_role(ctl_type: CtlType, elem_info: &ElemInfo) -> Option<(CtlType, usize)> {
    let values = elem_info.value_count;
    match (ctl_type, elem_info.elem_type) {
        (CtlType::CaptureSource, ElemType::Enumerated) => Some((ctl_type, values)),
        (CtlType::CaptureSource, _) => None,
        (_, ElemType::Enumerated) => Some((CtlType::EnumList, values)),
        (CtlType::Single, ElemType::Boolean) | (CtlType::Single, ElemType::Integer) => {
            Some((ctl_type, values))
        }
        (CtlType::GlobalRoute, ElemType::Boolean)
        | (CtlType::PlaybackRoute, ElemType::Boolean)
        | (CtlType::CaptureRoute, ElemType::Boolean) => {
            // The control element should express square matrix.
            let n = (values as f64).sqrt() as usize;
            if n * n == values {
                Some((ctl_type, n))
            } else {
                None
            }
        }
        (CtlType::GlobalSwitch, ElemType::Boolean)
        | (CtlType::PlaybackSwitch, ElemType::Boolean)
        | (CtlType::CaptureSwitch, ElemType::Boolean) => Some((ctl_type, values)),
        (CtlType::GlobalVolume, ElemType::Integer)
        | (CtlType::PlaybackVolume, ElemType::Integer)
        | (CtlType::CaptureVolume, ElemType::Integer) => Some((ctl_type, values)),
        _ => None,
    }
}

/// The mixer of simple elements over the registry of control elements.
pub struct Mixer<R: ControlRegistry> {
    registry: R,
    selems: Vec<SimpleElem>,
    attachments: HashMap<ElemId, Vec<SelemId>>,
    subscribers: Vec<mpsc::Sender<MixerEvent>>,
}

impl<R: ControlRegistry> Mixer<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            selems: Default::default(),
            attachments: Default::default(),
            subscribers: Default::default(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Subscribe events of simple elements. The subscription is released when the receiver is
    /// dropped.
    pub fn subscribe(&mut self) -> mpsc::Receiver<MixerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, event: MixerEvent) {
        debug!(?event);
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Add simple elements for all of control elements in the registry.
    pub fn load(&mut self) -> Result<(), Error> {
        let _enter = debug_span!("load").entered();
        let elem_id_list = self.registry.elem_id_list()?;
        elem_id_list
            .into_iter()
            .try_for_each(|elem_id| self.handle_elem_event(&ElemEvent::Add(elem_id)))
    }

    /// Handle the event of control element. The control element in the other interface than mixer
    /// is ignored.
    pub fn handle_elem_event(&mut self, event: &ElemEvent) -> Result<(), Error> {
        let elem_id = event.elem_id();
        if elem_id.iface() != ElemIfaceType::Mixer {
            return Ok(());
        }

        let _enter = debug_span!("element").entered();
        debug!(?event);

        match event {
            ElemEvent::Add(elem_id) => {
                if self.attachments.contains_key(elem_id) {
                    self.info(elem_id)
                } else {
                    self.add(elem_id)
                }
            }
            ElemEvent::Remove(elem_id) => self.remove(elem_id),
            ElemEvent::Info(elem_id) => self.info(elem_id),
            ElemEvent::Value(elem_id) => self.value(elem_id),
        }
    }

    fn add(&mut self, elem_id: &ElemId) -> Result<(), Error> {
        let elem_info = self.registry.elem_info(elem_id)?;

        if elem_id.name() == CAPTURE_SOURCE_NAME {
            // Each item is expressed as one simple element.
            if elem_info.elem_type != ElemType::Enumerated {
                return Ok(());
            }
            elem_info
                .labels
                .iter()
                .enumerate()
                .try_for_each(|(item, label)| {
                    self.add_one(
                        truncate_name(label),
                        elem_id,
                        &elem_info,
                        CtlType::CaptureSource,
                        item as u32,
                    )
                })
        } else {
            let (base, ctl_type) = classify(elem_id.name());
            self.add_one(truncate_name(base), elem_id, &elem_info, ctl_type, 0)
        }
    }

    fn add_one(
        &mut self,
        name: &str,
        elem_id: &ElemId,
        elem_info: &ElemInfo,
        ctl_type: CtlType,
        capture_item: u32,
    ) -> Result<(), Error> {
        let (ctl_type, values) = match refine_role(ctl_type, elem_info) {
            Some(entry) => entry,
            None => {
                debug!(%elem_id, ?ctl_type, "unavailable");
                return Ok(());
            }
        };

        let selem_id = SelemId::new(short_name(name), elem_id.index());

        match self.position(&selem_id) {
            Some(pos) => {
                let selem = &mut self.selems[pos];
                selem.attach(ctl_type, elem_id, elem_info, values, capture_item)?;
                selem.update();
                let res = selem.read(&self.registry);

                self.record_attachment(elem_id, &selem_id);
                self.publish(MixerEvent::Info(selem_id.clone()));
                if res? {
                    self.publish(MixerEvent::Value(selem_id));
                }
            }
            None => {
                let mut selem = SimpleElem::new(selem_id.clone());
                selem.attach(ctl_type, elem_id, elem_info, values, capture_item)?;
                selem.update();
                let changed = selem.read(&self.registry)?;

                let key = (selem.compare_weight(), selem.name(), selem.index());
                let pos = self
                    .selems
                    .partition_point(|s| (s.compare_weight(), s.name(), s.index()) < key);
                self.selems.insert(pos, selem);

                self.record_attachment(elem_id, &selem_id);
                self.publish(MixerEvent::Add(selem_id.clone()));
                if changed {
                    self.publish(MixerEvent::Value(selem_id));
                }
            }
        }

        Ok(())
    }

    fn record_attachment(&mut self, elem_id: &ElemId, selem_id: &SelemId) {
        let selem_ids = self.attachments.entry(elem_id.clone()).or_default();
        if !selem_ids.contains(selem_id) {
            selem_ids.push(selem_id.clone());
        }
    }

    fn remove(&mut self, elem_id: &ElemId) -> Result<(), Error> {
        let selem_ids = match self.attachments.remove(elem_id) {
            Some(selem_ids) => selem_ids,
            None => return Ok(()),
        };

        selem_ids.into_iter().for_each(|selem_id| {
            let pos = match self.position(&selem_id) {
                Some(pos) => pos,
                None => {
                    debug_assert!(false, "{} is not found", selem_id);
                    return;
                }
            };

            let selem = &mut self.selems[pos];
            if selem.detach(elem_id).is_none() {
                debug_assert!(false, "{} is not attached to {}", elem_id, selem_id);
                return;
            }

            if selem.is_empty() {
                self.selems.remove(pos);
                self.publish(MixerEvent::Remove(selem_id));
            } else {
                selem.update();
                self.publish(MixerEvent::Info(selem_id));
            }
        });

        Ok(())
    }

    fn info(&mut self, elem_id: &ElemId) -> Result<(), Error> {
        self.remove(elem_id)?;
        self.add(elem_id)
    }

    fn value(&mut self, elem_id: &ElemId) -> Result<(), Error> {
        let selem_ids = match self.attachments.get(elem_id) {
            Some(selem_ids) => selem_ids.clone(),
            None => return Ok(()),
        };
        self.refresh(&selem_ids)
    }

    // Read simple elements, then publish the change.
    fn refresh(&mut self, selem_ids: &[SelemId]) -> Result<(), Error> {
        selem_ids.iter().try_for_each(|selem_id| {
            let changed = match self.position(selem_id) {
                Some(pos) => self.selems[pos].read(&self.registry)?,
                None => false,
            };
            if changed {
                self.publish(MixerEvent::Value(selem_id.clone()));
            }
            Ok(())
        })
    }

    // The other simple elements which share any control element with the simple element.
    fn siblings(&self, selem_id: &SelemId) -> Vec<SelemId> {
        let mut siblings: Vec<SelemId> = Vec::new();
        if let Some(selem) = self.find_selem(selem_id) {
            selem
                .elem_ids()
                .into_iter()
                .filter_map(|elem_id| self.attachments.get(elem_id))
                .flatten()
                .filter(|id| id.ne(&selem_id))
                .for_each(|id| {
                    if !siblings.contains(id) {
                        siblings.push(id.clone());
                    }
                });
        }
        siblings
    }

    fn position(&self, selem_id: &SelemId) -> Option<usize> {
        self.selems.iter().position(|selem| selem.id().eq(selem_id))
    }

    /// The list of simple elements in the order of their weight.
    pub fn elements(&self) -> &[SimpleElem] {
        &self.selems
    }

    pub fn find_selem(&self, selem_id: &SelemId) -> Option<&SimpleElem> {
        self.selems.iter().find(|selem| selem.id().eq(selem_id))
    }

    fn selem_pos(&self, selem_id: &SelemId) -> Result<usize, Error> {
        self.position(selem_id)
            .ok_or_else(|| Error::invalid(format!("{} is not found", selem_id)))
    }

    // Write the cache when it changes, then synchronize the other simple elements.
    fn commit(&mut self, pos: usize, changed: bool) -> Result<(), Error> {
        if !changed {
            return Ok(());
        }
        let selem = &mut self.selems[pos];
        let selem_id = selem.id().clone();
        let _enter = debug_span!("write", selem = %selem_id).entered();
        selem.write(&mut self.registry)?;
        let siblings = self.siblings(&selem_id);
        self.refresh(&siblings)
    }

    /// The item selected for the channel in enumerated simple element.
    pub fn get_enum_item(&self, selem_id: &SelemId, channel: usize) -> Result<u32, Error> {
        let selem = &self.selems[self.selem_pos(selem_id)?];
        let elem_id = selem
            .ctl(CtlType::EnumList)
            .elem_id
            .as_ref()
            .ok_or_else(|| Error::invalid("not enumerated"))?;
        if !selem.has_channel(Direction::Playback, channel) {
            Err(Error::invalid(format!("channel {} is out of range", channel)))?;
        }
        let mut elem_value = ElemValue::new();
        self.registry.read_elem_value(elem_id, &mut elem_value)?;
        Ok(ElemValueAccessor::<u32>::val_at(&elem_value, channel))
    }

    /// Select the item for the channel in enumerated simple element.
    pub fn set_enum_item(
        &mut self,
        selem_id: &SelemId,
        channel: usize,
        item: u32,
    ) -> Result<(), Error> {
        let pos = self.selem_pos(selem_id)?;
        let selem = &self.selems[pos];
        let ctl = selem.ctl(CtlType::EnumList);
        let elem_id = ctl
            .elem_id
            .clone()
            .ok_or_else(|| Error::invalid("not enumerated"))?;
        if !selem.has_channel(Direction::Playback, channel) {
            Err(Error::invalid(format!("channel {} is out of range", channel)))?;
        }
        if item as i64 >= ctl.max {
            Err(Error::invalid(format!("item {} is out of range", item)))?;
        }

        let mut elem_value = ElemValue::new();
        self.registry.read_elem_value(&elem_id, &mut elem_value)?;
        ElemValueAccessor::<u32>::set_val_at(&mut elem_value, channel, item);
        let res = self.registry.write_elem_value(&elem_id, &elem_value);
        debug!(%elem_id, channel, item, ?res);
        res?;

        let mut selem_ids = vec![selem_id.clone()];
        selem_ids.append(&mut self.siblings(selem_id));
        self.refresh(&selem_ids)
    }

    /// Force the range in user side. The values of volume are read again in the range.
    pub fn set_range(
        &mut self,
        selem_id: &SelemId,
        dir: Direction,
        min: i64,
        max: i64,
    ) -> Result<(), Error> {
        if min > max {
            Err(Error::invalid(format!("{} is larger than {}", min, max)))?;
        }
        let pos = self.selem_pos(selem_id)?;
        let selem = &mut self.selems[pos];
        selem.force_range(dir, min, max);
        selem.read(&self.registry).map(|_| ())
    }

    pub fn set_volume(
        &mut self,
        selem_id: &SelemId,
        dir: Direction,
        channel: usize,
        value: i64,
    ) -> Result<(), Error> {
        let pos = self.selem_pos(selem_id)?;
        let selem = &mut self.selems[pos];
        selem.check_volume_caps(dir)?;
        let changed = selem.change_volume(dir, channel, value)?;
        self.commit(pos, changed)
    }

    pub fn set_volume_all(
        &mut self,
        selem_id: &SelemId,
        dir: Direction,
        value: i64,
    ) -> Result<(), Error> {
        let pos = self.selem_pos(selem_id)?;
        let selem = &mut self.selems[pos];
        selem.check_volume_caps(dir)?;
        let changed = selem.change_volume_all(dir, value)?;
        self.commit(pos, changed)
    }

    pub fn set_db(&mut self, _: &SelemId, _: Direction, _: usize, _: i64) -> Result<(), Error> {
        Err(Error::NotSupported)
    }

    pub fn set_db_all(&mut self, _: &SelemId, _: Direction, _: i64) -> Result<(), Error> {
        Err(Error::NotSupported)
    }

    pub fn set_switch(
        &mut self,
        selem_id: &SelemId,
        dir: Direction,
        channel: usize,
        value: bool,
    ) -> Result<(), Error> {
        let pos = self.selem_pos(selem_id)?;
        let selem = &mut self.selems[pos];
        selem.check_switch_caps(dir)?;
        let changed = selem.change_switch(dir, channel, value)?;
        self.commit(pos, changed)
    }

    pub fn set_switch_all(
        &mut self,
        selem_id: &SelemId,
        dir: Direction,
        value: bool,
    ) -> Result<(), Error> {
        let pos = self.selem_pos(selem_id)?;
        let selem = &mut self.selems[pos];
        selem.check_switch_caps(dir)?;
        let changed = selem.change_switch_all(dir, value);
        self.commit(pos, changed)
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::test_registry::{mixer_elem_id, MemoryRegistry},
    };

    fn drain(rx: &mpsc::Receiver<MixerEvent>) -> Vec<MixerEvent> {
        rx.try_iter().collect()
    }

    fn selem_id(name: &str, index: u32) -> SelemId {
        SelemId::new(name, index)
    }

    #[test]
    fn lifecycle() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        let rx = mixer.subscribe();

        let elem_id = mixer
            .registry_mut()
            .add_elem("Master Playback Volume", 0, ElemInfo::integer(2, 0, 31));
        mixer
            .registry_mut()
            .set_int("Master Playback Volume", 0, &[10, 20]);
        mixer.handle_elem_event(&ElemEvent::Add(elem_id.clone())).unwrap();

        let id = selem_id("Master", 0);
        assert_eq!(
            drain(&rx),
            vec![MixerEvent::Add(id.clone()), MixerEvent::Value(id.clone())]
        );
        let selem = mixer.find_selem(&id).unwrap();
        assert_eq!(selem.volume(Direction::Playback, 1), Ok(20));
        assert!(selem.caps().contains(SelemCaps::PVOLUME));

        let switch_id = mixer
            .registry_mut()
            .add_elem("Master Playback Switch", 0, ElemInfo::boolean(1));
        mixer.handle_elem_event(&ElemEvent::Add(switch_id.clone())).unwrap();
        assert_eq!(
            drain(&rx),
            vec![MixerEvent::Info(id.clone()), MixerEvent::Value(id.clone())]
        );
        assert_eq!(mixer.elements().len(), 1);
        assert!(mixer.find_selem(&id).unwrap().caps().contains(SelemCaps::PSWITCH));

        mixer.registry_mut().remove_elem("Master Playback Switch", 0);
        mixer.handle_elem_event(&ElemEvent::Remove(switch_id)).unwrap();
        assert_eq!(drain(&rx), vec![MixerEvent::Info(id.clone())]);
        assert!(!mixer.find_selem(&id).unwrap().caps().contains(SelemCaps::PSWITCH));

        mixer.registry_mut().remove_elem("Master Playback Volume", 0);
        mixer.handle_elem_event(&ElemEvent::Remove(elem_id.clone())).unwrap();
        assert_eq!(drain(&rx), vec![MixerEvent::Remove(id.clone())]);
        assert!(mixer.find_selem(&id).is_none());

        // Nothing happens for unknown control element.
        mixer.handle_elem_event(&ElemEvent::Remove(elem_id)).unwrap();
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn value_event() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        let elem_id = mixer
            .registry_mut()
            .add_elem("PCM Playback Volume", 0, ElemInfo::integer(1, 0, 255));
        mixer.load().unwrap();
        let rx = mixer.subscribe();

        mixer.handle_elem_event(&ElemEvent::Value(elem_id.clone())).unwrap();
        assert!(drain(&rx).is_empty());

        mixer.registry_mut().set_int("PCM Playback Volume", 0, &[128]);
        mixer.handle_elem_event(&ElemEvent::Value(elem_id)).unwrap();
        let id = selem_id("PCM", 0);
        assert_eq!(drain(&rx), vec![MixerEvent::Value(id.clone())]);
        assert_eq!(
            mixer.find_selem(&id).unwrap().volume(Direction::Playback, 0),
            Ok(128)
        );
    }

    #[test]
    fn capture_source_fan_out() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer.registry_mut().add_elem(
            "Capture Source",
            0,
            ElemInfo::enumerated(1, &["Mic", "Line", "CD"]),
        );
        mixer.load().unwrap();

        let names: Vec<&str> = mixer.elements().iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), 3);
        ["Mic", "Line", "CD"].iter().enumerate().for_each(|(i, name)| {
            let selem = mixer.find_selem(&selem_id(name, 0)).unwrap();
            assert_eq!(selem.capture_item(), i as u32);
            assert_eq!(
                selem.ctl_type_of(&mixer_elem_id("Capture Source", 0)),
                Some(CtlType::CaptureSource)
            );
            assert!(selem.caps().contains(SelemCaps::CSWITCH | SelemCaps::CSWITCH_EXCL));
        });

        // The first item is selected at first.
        let mic = selem_id("Mic", 0);
        let line = selem_id("Line", 0);
        assert_eq!(mixer.find_selem(&mic).unwrap().switch(Direction::Capture, 0), Ok(true));
        assert_eq!(mixer.find_selem(&line).unwrap().switch(Direction::Capture, 0), Ok(false));

        let rx = mixer.subscribe();
        mixer.set_switch(&line, Direction::Capture, 0, true).unwrap();
        assert_eq!(mixer.registry().enumerated("Capture Source", 0)[0], 1);
        assert_eq!(mixer.find_selem(&line).unwrap().switch(Direction::Capture, 0), Ok(true));
        assert_eq!(mixer.find_selem(&mic).unwrap().switch(Direction::Capture, 0), Ok(false));
        assert_eq!(drain(&rx), vec![MixerEvent::Value(mic.clone())]);

        // Removal of the control element destroys all of simple elements.
        let elem_id = mixer.registry_mut().remove_elem("Capture Source", 0);
        mixer.handle_elem_event(&ElemEvent::Remove(elem_id)).unwrap();
        assert!(mixer.elements().is_empty());
        assert_eq!(drain(&rx).len(), 3);
    }

    #[test]
    fn capture_source_not_enumerated() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Capture Source", 0, ElemInfo::integer(1, 0, 2));
        mixer.load().unwrap();
        assert!(mixer.elements().is_empty());
    }

    #[test]
    fn set_without_change() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Master Playback Volume", 0, ElemInfo::integer(2, 0, 31));
        mixer
            .registry_mut()
            .set_int("Master Playback Volume", 0, &[10, 10]);
        mixer
            .registry_mut()
            .add_elem("Master Playback Switch", 0, ElemInfo::boolean(2));
        mixer.load().unwrap();

        let id = selem_id("Master", 0);
        mixer.set_volume(&id, Direction::Playback, 0, 10).unwrap();
        mixer.set_volume_all(&id, Direction::Playback, 10).unwrap();
        mixer.set_switch(&id, Direction::Playback, 1, false).unwrap();
        assert_eq!(mixer.registry().write_count(), 0);

        // All of attached control elements are written.
        mixer.set_volume(&id, Direction::Playback, 1, 11).unwrap();
        assert_eq!(mixer.registry().write_count(), 2);
        assert_eq!(&mixer.registry().int("Master Playback Volume", 0)[..2], &[10, 11]);
    }

    #[test]
    fn invalid_argument() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Master Playback Volume", 0, ElemInfo::integer(2, 0, 31));
        mixer.load().unwrap();

        let id = selem_id("Master", 0);
        let cases = [
            mixer.set_volume(&id, Direction::Playback, 0, 32),
            mixer.set_volume(&id, Direction::Playback, 0, -1),
            mixer.set_volume(&id, Direction::Playback, 2, 0),
            mixer.set_volume_all(&id, Direction::Playback, 100),
            mixer.set_volume(&id, Direction::Capture, 0, 0),
            mixer.set_switch(&id, Direction::Playback, 0, true),
            mixer.set_range(&id, Direction::Playback, 10, 0),
            mixer.set_volume(&selem_id("Unknown", 0), Direction::Playback, 0, 0),
            mixer.set_enum_item(&id, 0, 0),
        ];
        cases.iter().for_each(|res| {
            assert!(matches!(res, Err(Error::InvalidArgument(_))), "{:?}", res);
        });
        assert_eq!(mixer.registry().write_count(), 0);
        assert_eq!(
            mixer.find_selem(&id).unwrap().volume(Direction::Playback, 0),
            Ok(0)
        );
    }

    #[test]
    fn db_operations() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Master Playback Volume", 0, ElemInfo::integer(2, 0, 31));
        mixer.load().unwrap();

        let id = selem_id("Master", 0);
        assert_eq!(mixer.set_db(&id, Direction::Playback, 0, 0), Err(Error::NotSupported));
        assert_eq!(mixer.set_db_all(&id, Direction::Playback, 0), Err(Error::NotSupported));
        let selem = mixer.find_selem(&id).unwrap();
        assert_eq!(selem.db(Direction::Playback, 0), Err(Error::NotSupported));
        assert_eq!(selem.db_range(Direction::Playback), Err(Error::NotSupported));
    }

    #[test]
    fn set_range() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Master Playback Volume", 0, ElemInfo::integer(1, 0, 31));
        mixer.registry_mut().set_int("Master Playback Volume", 0, &[31]);
        mixer.load().unwrap();

        let id = selem_id("Master", 0);
        mixer.set_range(&id, Direction::Playback, 0, 100).unwrap();
        let selem = mixer.find_selem(&id).unwrap();
        assert_eq!(selem.range(Direction::Playback), ValueRange::new(0, 100));
        assert_eq!(selem.volume(Direction::Playback, 0), Ok(100));

        mixer.set_volume(&id, Direction::Playback, 0, 50).unwrap();
        assert_eq!(mixer.registry().int("Master Playback Volume", 0)[0], 16);
    }

    #[test]
    fn set_full_range() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Master Playback Volume", 0, ElemInfo::integer(1, 0, 31));
        mixer.registry_mut().set_int("Master Playback Volume", 0, &[31]);
        mixer.load().unwrap();

        let id = selem_id("Master", 0);
        mixer
            .set_range(&id, Direction::Playback, i64::MIN, i64::MAX)
            .unwrap();
        let selem = mixer.find_selem(&id).unwrap();
        assert_eq!(selem.volume(Direction::Playback, 0), Ok(i64::MAX));

        mixer
            .set_volume(&id, Direction::Playback, 0, i64::MIN)
            .unwrap();
        assert_eq!(mixer.registry().int("Master Playback Volume", 0)[0], 0);
        let selem = mixer.find_selem(&id).unwrap();
        assert_eq!(selem.volume(Direction::Playback, 0), Ok(i64::MIN));
    }

    #[test]
    fn single_volume_with_playback_switch() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Line", 0, ElemInfo::integer(1, 0, 31));
        mixer.registry_mut().set_int("Line", 0, &[20]);
        mixer
            .registry_mut()
            .add_elem("Line Playback Switch", 0, ElemInfo::boolean(1));
        mixer
            .registry_mut()
            .set_bool("Line Playback Switch", 0, &[true]);
        mixer.load().unwrap();

        let id = selem_id("Line", 0);
        mixer.set_switch(&id, Direction::Playback, 0, false).unwrap();
        assert!(!mixer.registry().bool("Line Playback Switch", 0)[0]);
        assert_eq!(mixer.registry().int("Line", 0)[0], 20);
        let selem = mixer.find_selem(&id).unwrap();
        assert_eq!(selem.switch(Direction::Playback, 0), Ok(false));
    }

    #[test]
    fn global_volume_in_both_directions() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Mic Volume", 0, ElemInfo::integer(1, 0, 15));
        mixer.registry_mut().set_int("Mic Volume", 0, &[5]);
        mixer.load().unwrap();

        let id = selem_id("Mic", 0);
        let selem = mixer.find_selem(&id).unwrap();
        assert!(selem.caps().contains(SelemCaps::GVOLUME));
        assert_eq!(selem.volume(Direction::Capture, 0), Ok(5));

        mixer.set_volume(&id, Direction::Capture, 0, 7).unwrap();
        assert_eq!(mixer.registry().int("Mic Volume", 0)[0], 7);
        let selem = mixer.find_selem(&id).unwrap();
        assert_eq!(selem.volume(Direction::Playback, 0), Ok(7));
    }

    #[test]
    fn duplicate_slot() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Master Playback Volume", 0, ElemInfo::integer(1, 0, 31));
        // The same role in the other interface is not for mixer.
        let elem_id = ElemId::new_by_name(ElemIfaceType::Card, 0, 0, "Master Playback Volume", 0);
        mixer
            .registry_mut()
            .add_elem_by_id(elem_id, ElemInfo::integer(1, 0, 31));
        mixer.load().unwrap();
        assert_eq!(mixer.elements().len(), 1);

        // The control element in the other device has the same role.
        let elem_id = ElemId::new_by_name(ElemIfaceType::Mixer, 1, 0, "Master Playback Volume", 0);
        mixer
            .registry_mut()
            .add_elem_by_id(elem_id.clone(), ElemInfo::integer(1, 0, 31));
        assert_eq!(
            mixer.handle_elem_event(&ElemEvent::Add(elem_id.clone())),
            Err(Error::DuplicateSlot { elem_id })
        );
        assert_eq!(mixer.elements().len(), 1);
    }

    #[test]
    fn info_event() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        let elem_id = mixer
            .registry_mut()
            .add_elem("Master Playback Volume", 0, ElemInfo::integer(1, 0, 31));
        mixer.load().unwrap();
        let rx = mixer.subscribe();

        mixer
            .registry_mut()
            .set_info("Master Playback Volume", 0, ElemInfo::integer(2, -10, 10));
        mixer.handle_elem_event(&ElemEvent::Info(elem_id.clone())).unwrap();

        let id = selem_id("Master", 0);
        let selem = mixer.find_selem(&id).unwrap();
        assert_eq!(selem.channels(Direction::Playback), 2);
        assert_eq!(selem.range(Direction::Playback), ValueRange::new(-10, 10));
        let events = drain(&rx);
        assert_eq!(events[0], MixerEvent::Remove(id.clone()));
        assert_eq!(events[1], MixerEvent::Add(id.clone()));

        // Add event for the control element already attached is handled as info event.
        mixer.handle_elem_event(&ElemEvent::Add(elem_id)).unwrap();
        assert_eq!(mixer.elements().len(), 1);
    }

    #[test]
    fn enumerated() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer.registry_mut().add_elem(
            "Channel Mode",
            0,
            ElemInfo::enumerated(2, &["2ch", "4ch", "6ch"]),
        );
        mixer.load().unwrap();
        let rx = mixer.subscribe();

        let id = selem_id("Channel Mode", 0);
        assert!(mixer.find_selem(&id).unwrap().is_enumerated());
        assert_eq!(mixer.get_enum_item(&id, 1), Ok(0));

        mixer.set_enum_item(&id, 1, 2).unwrap();
        assert_eq!(mixer.get_enum_item(&id, 1), Ok(2));
        assert_eq!(&mixer.registry().enumerated("Channel Mode", 0)[..2], &[0, 2]);
        assert_eq!(drain(&rx), vec![MixerEvent::Value(id.clone())]);

        assert!(matches!(mixer.set_enum_item(&id, 0, 3), Err(Error::InvalidArgument(_))));
        assert!(matches!(mixer.set_enum_item(&id, 2, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(mixer.get_enum_item(&id, 2), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn unavailable_roles() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        let registry = mixer.registry_mut();
        // Boolean for volume, integer for switch, non-square matrix for route.
        registry.add_elem("Line Playback Volume", 0, ElemInfo::boolean(1));
        registry.add_elem("Line Playback Switch", 0, ElemInfo::integer(1, 0, 1));
        registry.add_elem("Line Playback Route", 0, ElemInfo::boolean(3));
        mixer.load().unwrap();
        assert!(mixer.elements().is_empty());
    }

    #[test]
    fn route_matrix() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Line Capture Route", 0, ElemInfo::boolean(9));
        mixer.load().unwrap();
        let selem = mixer.find_selem(&selem_id("Line", 0)).unwrap();
        assert_eq!(selem.channels(Direction::Capture), 3);
        assert!(selem.caps().contains(SelemCaps::CSWITCH));
    }

    #[test]
    fn ordering() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        let registry = mixer.registry_mut();
        registry.add_elem("Beep Playback Volume", 0, ElemInfo::integer(1, 0, 3));
        registry.add_elem("PCM Playback Volume", 1, ElemInfo::integer(1, 0, 3));
        registry.add_elem("Capture Volume", 0, ElemInfo::integer(1, 0, 3));
        registry.add_elem("PCM Playback Volume", 0, ElemInfo::integer(1, 0, 3));
        registry.add_elem("Aardvark Playback Volume", 0, ElemInfo::integer(1, 0, 3));
        registry.add_elem("Master Playback Volume", 0, ElemInfo::integer(1, 0, 3));
        mixer.load().unwrap();

        let ids: Vec<(&str, u32)> = mixer
            .elements()
            .iter()
            .map(|s| (s.name(), s.index()))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("Master", 0),
                ("PCM", 0),
                ("PCM", 1),
                ("Capture", 0),
                ("Aardvark", 0),
                ("Beep", 0),
            ]
        );
    }

    #[test]
    fn verbose_name() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Tone Control - Bass", 0, ElemInfo::integer(1, 0, 15));
        mixer.load().unwrap();
        assert!(mixer.find_selem(&selem_id("Bass", 0)).is_some());
    }

    #[test]
    fn other_iface() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        let elem_id = ElemId::new_by_name(ElemIfaceType::Pcm, 0, 0, "PCM Playback Volume", 0);
        mixer
            .registry_mut()
            .add_elem_by_id(elem_id, ElemInfo::integer(1, 0, 3));
        mixer.load().unwrap();
        assert!(mixer.elements().is_empty());
    }

    #[test]
    fn io_error() {
        let mut mixer = Mixer::new(MemoryRegistry::default());
        mixer
            .registry_mut()
            .add_elem("Master Playback Volume", 0, ElemInfo::integer(1, 0, 31));
        mixer.registry_mut().set_fail_io(true);
        assert!(matches!(mixer.load(), Err(Error::Registry(_))));
        assert!(mixer.elements().is_empty());

        mixer.registry_mut().set_fail_io(false);
        mixer.load().unwrap();
        let reads = mixer.registry().read_count();
        assert!(reads > 0);

        mixer.registry_mut().set_fail_io(true);
        let id = selem_id("Master", 0);
        assert!(matches!(
            mixer.set_volume(&id, Direction::Playback, 0, 1),
            Err(Error::Registry(_))
        ));
    }
}
