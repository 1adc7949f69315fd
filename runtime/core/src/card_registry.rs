// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Registry of control elements over the control character device of sound card.

use {
    super::*,
    alsa_simple_mixer as mixer,
    alsactl::{prelude::*, *},
    glib::FileError,
    tracing::{debug, enabled, Level},
};

/// The registry of control elements in sound card.
#[derive(Default)]
pub struct CardRegistry {
    pub card: Card,
}

/// The mixer over control elements in sound card.
pub type CardMixer = mixer::Mixer<CardRegistry>;

impl CardRegistry {
    pub fn open(card_id: u32) -> Result<Self, Error> {
        let card = Card::new();
        card.open(card_id, 0)?;
        Ok(Self { card })
    }

    fn card_elem_type(&self, elem_id: &alsactl::ElemId) -> Result<mixer::ElemType, Error> {
        self.card
            .elem_info(elem_id)
            .map(|elem_info| elem_info_from_card(&elem_info).elem_type)
    }
}

fn registry_error(e: &Error) -> mixer::RegistryError {
    mixer::RegistryError::new(&e.to_string())
}

/// Convert the identifier of control element in sound card.
pub fn elem_id_from_card(elem_id: &alsactl::ElemId) -> Option<mixer::ElemId> {
    let iface = match elem_id.iface() {
        ElemIfaceType::Card => mixer::ElemIfaceType::Card,
        ElemIfaceType::Hwdep => mixer::ElemIfaceType::Hwdep,
        ElemIfaceType::Mixer => mixer::ElemIfaceType::Mixer,
        ElemIfaceType::Pcm => mixer::ElemIfaceType::Pcm,
        ElemIfaceType::Rawmidi => mixer::ElemIfaceType::Rawmidi,
        ElemIfaceType::Timer => mixer::ElemIfaceType::Timer,
        ElemIfaceType::Sequencer => mixer::ElemIfaceType::Sequencer,
        _ => return None,
    };
    Some(mixer::ElemId::new_by_name(
        iface,
        elem_id.device_id(),
        elem_id.subdevice_id(),
        elem_id.name().as_str(),
        elem_id.index(),
    ))
}

fn elem_id_to_card(elem_id: &mixer::ElemId) -> alsactl::ElemId {
    let iface = match elem_id.iface() {
        mixer::ElemIfaceType::Card => ElemIfaceType::Card,
        mixer::ElemIfaceType::Hwdep => ElemIfaceType::Hwdep,
        mixer::ElemIfaceType::Mixer => ElemIfaceType::Mixer,
        mixer::ElemIfaceType::Pcm => ElemIfaceType::Pcm,
        mixer::ElemIfaceType::Rawmidi => ElemIfaceType::Rawmidi,
        mixer::ElemIfaceType::Timer => ElemIfaceType::Timer,
        mixer::ElemIfaceType::Sequencer => ElemIfaceType::Sequencer,
    };
    alsactl::ElemId::new_by_name(
        iface,
        elem_id.device_id(),
        elem_id.subdevice_id(),
        elem_id.name(),
        elem_id.index(),
    )
}

fn is_inactive(access: ElemAccessFlag) -> bool {
    access.contains(ElemAccessFlag::INACTIVE)
}

fn elem_info_from_card(elem_info: &alsactl::ElemInfo) -> mixer::ElemInfo {
    match elem_info {
        alsactl::ElemInfo::Boolean(info) => {
            mixer::ElemInfo::boolean(info.value_count() as usize)
                .with_inactive(is_inactive(info.access()))
        }
        alsactl::ElemInfo::Integer(info) => mixer::ElemInfo::integer(
            info.value_count() as usize,
            info.value_min(),
            info.value_max(),
        )
        .with_inactive(is_inactive(info.access())),
        alsactl::ElemInfo::Enumerated(info) => {
            let labels: Vec<String> = info
                .labels()
                .iter()
                .map(|label| label.to_string())
                .collect();
            mixer::ElemInfo::enumerated(info.value_count() as usize, &labels)
                .with_inactive(is_inactive(info.access()))
        }
        alsactl::ElemInfo::Bytes(info) => mixer::ElemInfo {
            elem_type: mixer::ElemType::Bytes,
            value_count: info.value_count() as usize,
            inactive: is_inactive(info.access()),
            ..Default::default()
        },
        alsactl::ElemInfo::Integer64(info) => mixer::ElemInfo {
            elem_type: mixer::ElemType::Integer64,
            value_count: info.value_count() as usize,
            inactive: is_inactive(info.access()),
            ..Default::default()
        },
        alsactl::ElemInfo::Iec60958(info) => mixer::ElemInfo {
            elem_type: mixer::ElemType::Iec60958,
            value_count: 1,
            inactive: is_inactive(info.access()),
            ..Default::default()
        },
    }
}

fn dump_elem_info(elem_id: &alsactl::ElemId, elem_info: &mixer::ElemInfo) {
    match elem_info.elem_type {
        mixer::ElemType::Integer => {
            debug!(
                numid=?elem_id.numid(),
                elem_type=?elem_info.elem_type,
                inactive=?elem_info.inactive,
                value_count=?elem_info.value_count,
                value_min=?elem_info.value_min,
                value_max=?elem_info.value_max
            );
        }
        mixer::ElemType::Enumerated => {
            debug!(
                numid=?elem_id.numid(),
                elem_type=?elem_info.elem_type,
                inactive=?elem_info.inactive,
                value_count=?elem_info.value_count,
                labels=?elem_info.labels
            );
        }
        _ => {
            debug!(
                numid=?elem_id.numid(),
                elem_type=?elem_info.elem_type,
                inactive=?elem_info.inactive,
                value_count=?elem_info.value_count
            );
        }
    }
}

impl mixer::ControlRegistry for CardRegistry {
    fn elem_id_list(&self) -> Result<Vec<mixer::ElemId>, mixer::RegistryError> {
        self.card
            .elem_id_list()
            .map(|elem_id_list| elem_id_list.iter().filter_map(elem_id_from_card).collect())
            .map_err(|e| registry_error(&e))
    }

    fn elem_info(
        &self,
        elem_id: &mixer::ElemId,
    ) -> Result<mixer::ElemInfo, mixer::RegistryError> {
        let card_elem_id = elem_id_to_card(elem_id);
        let elem_info = self
            .card
            .elem_info(&card_elem_id)
            .map(|elem_info| elem_info_from_card(&elem_info))
            .map_err(|e| registry_error(&e))?;

        if enabled!(Level::DEBUG) {
            dump_elem_info(&card_elem_id, &elem_info);
        }

        Ok(elem_info)
    }

    fn read_elem_value(
        &self,
        elem_id: &mixer::ElemId,
        elem_value: &mut mixer::ElemValue,
    ) -> Result<(), mixer::RegistryError> {
        let mut v = ElemValue::new();
        self.card
            .read_elem_value(&elem_id_to_card(elem_id), &mut v)
            .map_err(|e| registry_error(&e))?;

        elem_value.set_bool(&v.boolean());
        elem_value.set_int(&v.int());
        elem_value.set_enum(&v.enumerated());

        Ok(())
    }

    // The storage of value is shared by each type, thus fill it according to the type.
    fn write_elem_value(
        &mut self,
        elem_id: &mixer::ElemId,
        elem_value: &mixer::ElemValue,
    ) -> Result<(), mixer::RegistryError> {
        let card_elem_id = elem_id_to_card(elem_id);
        let elem_type = self
            .card_elem_type(&card_elem_id)
            .map_err(|e| registry_error(&e))?;

        let v = ElemValue::new();
        match elem_type {
            mixer::ElemType::Boolean => v.set_bool(elem_value.boolean()),
            mixer::ElemType::Integer => v.set_int(elem_value.int()),
            mixer::ElemType::Enumerated => v.set_enum(elem_value.enumerated()),
            _ => {
                let msg = format!("{} is not supported", elem_id);
                return Err(mixer::RegistryError::new(&msg));
            }
        }

        self.card
            .write_elem_value(&card_elem_id, &v)
            .map_err(|e| registry_error(&e))
    }
}

/// Translate the mask of events into the sequence of events for the mixer.
pub fn elem_events_from_card(
    elem_id: &alsactl::ElemId,
    events: ElemEventMask,
) -> Vec<mixer::ElemEvent> {
    let elem_id = match elem_id_from_card(elem_id) {
        Some(elem_id) => elem_id,
        None => return Vec::new(),
    };

    if events.contains(ElemEventMask::REMOVE) {
        return vec![mixer::ElemEvent::Remove(elem_id)];
    }

    let mut elem_events = Vec::new();
    if events.contains(ElemEventMask::ADD) {
        elem_events.push(mixer::ElemEvent::Add(elem_id.clone()));
    }
    if events.contains(ElemEventMask::INFO) {
        elem_events.push(mixer::ElemEvent::Info(elem_id.clone()));
    } else if events.contains(ElemEventMask::VALUE) {
        elem_events.push(mixer::ElemEvent::Value(elem_id));
    }
    elem_events
}

/// Convert the error of mixer into the error of glib.
pub fn mixer_error_to_glib(err: &mixer::Error) -> Error {
    let code = match err {
        mixer::Error::InvalidArgument(_) => FileError::Inval,
        mixer::Error::NotSupported => FileError::Nxio,
        mixer::Error::DuplicateSlot { .. } => FileError::Exist,
        mixer::Error::Registry(_) => FileError::Io,
        mixer::Error::OutOfMemory => FileError::Nomem,
    };
    Error::new(code, &err.to_string())
}
