// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Literal report of simple elements.

use alsa_simple_mixer::{ControlRegistry, Direction, Mixer, MixerEvent, SelemCaps, SimpleElem};

// The maximum length of item label in report.
const ITEM_NAME_MAX: usize = 64;

const CAPS_LABELS: &[(SelemCaps, &str)] = &[
    (SelemCaps::GVOLUME, "gvolume"),
    (SelemCaps::GSWITCH, "gswitch"),
    (SelemCaps::PVOLUME, "pvolume"),
    (SelemCaps::PVOLUME_JOIN, "pvolume-joined"),
    (SelemCaps::PSWITCH, "pswitch"),
    (SelemCaps::PSWITCH_JOIN, "pswitch-joined"),
    (SelemCaps::CVOLUME, "cvolume"),
    (SelemCaps::CVOLUME_JOIN, "cvolume-joined"),
    (SelemCaps::CSWITCH, "cswitch"),
    (SelemCaps::CSWITCH_JOIN, "cswitch-joined"),
    (SelemCaps::CSWITCH_EXCL, "cswitch-exclusive"),
    (SelemCaps::PENUM, "penum"),
    (SelemCaps::CENUM, "cenum"),
];

const DIRECTIONS: [(Direction, &str); 2] = [
    (Direction::Playback, "playback"),
    (Direction::Capture, "capture"),
];

fn caps_literal(caps: SelemCaps) -> String {
    let labels: Vec<&str> = CAPS_LABELS
        .iter()
        .filter(|(flag, _)| caps.contains(*flag))
        .map(|(_, label)| *label)
        .collect();
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(",")
    }
}

fn volume_literal(selem: &SimpleElem, dir: Direction) -> Option<String> {
    (0..selem.channels(dir))
        .map(|ch| selem.volume(dir, ch).map(|val| val.to_string()))
        .collect::<Result<Vec<String>, _>>()
        .ok()
        .filter(|vals| !vals.is_empty())
        .map(|vals| {
            let range = selem.range(dir);
            format!("[{}] in {}..{}", vals.join(" "), range.min, range.max)
        })
}

fn switch_literal(selem: &SimpleElem, dir: Direction) -> Option<String> {
    (0..selem.channels(dir))
        .map(|ch| {
            selem
                .switch(dir, ch)
                .map(|val| if val { "on" } else { "off" })
        })
        .collect::<Result<Vec<&str>, _>>()
        .ok()
        .filter(|vals| !vals.is_empty())
        .map(|vals| format!("[{}]", vals.join(" ")))
}

fn items_literal<R: ControlRegistry>(mixer: &Mixer<R>, selem: &SimpleElem) -> Option<String> {
    (0..selem.channels(Direction::Playback))
        .map(|ch| {
            mixer
                .get_enum_item(selem.id(), ch)
                .and_then(|item| selem.enum_item_name(item as usize, ITEM_NAME_MAX))
        })
        .collect::<Result<Vec<String>, _>>()
        .ok()
        .map(|labels| format!("[{}]", labels.join(" ")))
}

fn selem_literal<R: ControlRegistry>(mixer: &Mixer<R>, selem: &SimpleElem) -> String {
    let mut entries = vec![format!("caps {}", caps_literal(selem.caps()))];

    if !selem.is_active() {
        entries.push("inactive".to_string());
    }

    if selem.is_enumerated() {
        if let Some(literal) = items_literal(mixer, selem) {
            entries.push(format!("items {}", literal));
        }
    } else {
        DIRECTIONS.iter().for_each(|&(dir, label)| {
            if let Some(literal) = volume_literal(selem, dir) {
                entries.push(format!("{} volume {}", label, literal));
            }
            if let Some(literal) = switch_literal(selem, dir) {
                entries.push(format!("{} switch {}", label, literal));
            }
        });
    }

    entries.join("; ")
}

/// The literal to report the event of simple element.
pub fn event_literal<R: ControlRegistry>(mixer: &Mixer<R>, event: &MixerEvent) -> String {
    let kind = match event {
        MixerEvent::Add(_) => "add",
        MixerEvent::Info(_) => "info",
        MixerEvent::Value(_) => "value",
        MixerEvent::Remove(_) => "remove",
    };
    let selem_id = event.selem_id();

    match event {
        MixerEvent::Remove(_) => format!("{} {}", kind, selem_id),
        _ => match mixer.find_selem(selem_id) {
            Some(selem) => format!("{} {}: {}", kind, selem_id, selem_literal(mixer, selem)),
            None => format!("{} {}", kind, selem_id),
        },
    }
}
