// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

//! Interpretation of the name of control element.
//!
//! The name of control element consists of the base name and the suffix to express its role;
//! e.g. `PCM Playback Volume` is playback volume of the simple element named `PCM`. The base
//! name is also used to compute the weight to sort simple elements.

use super::selem::CtlType;

/// The name of enumerated control element which represents source of capture. Each item of the
/// element is expressed as one simple element.
pub const CAPTURE_SOURCE_NAME: &str = "Capture Source";

/// The weight for the simple element whose name is not in the table of priority.
pub const COMPARE_WEIGHT_NOT_FOUND: u32 = 1000000000;

const COMPARE_WEIGHT_SIMPLE_BASE: u32 = 0;

/// The maximum length of the name for simple element.
pub const SELEM_NAME_MAX_LENGTH: usize = 127;

// The more specific suffix is earlier.
const SUFFIXES: &[(&str, CtlType)] = &[
    (" Playback Switch", CtlType::PlaybackSwitch),
    (" Playback Route", CtlType::PlaybackRoute),
    (" Playback Volume", CtlType::PlaybackVolume),
    (" Capture Switch", CtlType::CaptureSwitch),
    (" Capture Route", CtlType::CaptureRoute),
    (" Capture Volume", CtlType::CaptureVolume),
    (" Switch", CtlType::GlobalSwitch),
    (" Route", CtlType::GlobalRoute),
    (" Volume", CtlType::GlobalVolume),
];

const SHORT_NAMES: &[(&str, &str)] = &[
    ("Tone Control - Switch", "Tone"),
    ("Tone Control - Bass", "Bass"),
    ("Tone Control - Treble", "Treble"),
    ("Synth Tone Control - Switch", "Synth Tone"),
    ("Synth Tone Control - Bass", "Synth Bass"),
    ("Synth Tone Control - Treble", "Synth Treble"),
];

const BASE_NAMES: &[&str] = &[
    "Master",
    "Headphone",
    "Tone",
    "Bass",
    "Treble",
    "3D Control",
    "PCM",
    "Front",
    "Surround",
    "Center",
    "LFE",
    "Side",
    "Synth",
    "FM",
    "Wave",
    "Music",
    "DSP",
    "Line",
    "CD",
    "Mic",
    "Video",
    "Zoom Video",
    "Phone",
    "I2S",
    "IEC958",
    "PC Speaker",
    "Aux",
    "Mono",
    "Playback",
    "Capture",
    "Mix",
];

const QUALIFIER_NAMES: &[&str] = &["-"];

const TAIL_NAMES: &[&str] = &[
    "Mono", "Digital", "Switch", "Depth", "Wide", "Space", "Level", "Center", "Output", "Boost",
    "Tone", "Bass", "Treble",
];

/// Detect the length of base name and the role expressed by suffix. The suffix just after
/// hyphen is not interpreted; e.g. `3D Control - Switch`.
fn base_len(name: &str) -> Option<(usize, CtlType)> {
    SUFFIXES
        .iter()
        .find(|(suffix, _)| name.len() > suffix.len() && name.ends_with(suffix))
        .and_then(|(suffix, ctl_type)| {
            let len = name.len() - suffix.len();
            if name.as_bytes()[len - 1] != b'-' {
                Some((len, *ctl_type))
            } else {
                None
            }
        })
}

/// Split the name of control element into the name of simple element and its role in it.
pub fn classify(name: &str) -> (&str, CtlType) {
    match base_len(name) {
        Some((len, ctl_type)) => {
            let base = &name[..len];
            let ctl_type = match ctl_type {
                CtlType::GlobalVolume if base == "Capture" => CtlType::CaptureVolume,
                CtlType::GlobalSwitch if base == "Capture" => CtlType::CaptureSwitch,
                _ => ctl_type,
            };
            (base, ctl_type)
        }
        None => (name, CtlType::Single),
    }
}

/// Translate some verbose names into short ones.
pub fn short_name(name: &str) -> &str {
    SHORT_NAMES
        .iter()
        .find(|(long, _)| name.eq(*long))
        .map(|(_, short)| *short)
        .unwrap_or(name)
}

/// Truncate the name within the maximum length for simple element.
pub fn truncate_name(name: &str) -> &str {
    if name.len() <= SELEM_NAME_MAX_LENGTH {
        name
    } else {
        let mut len = SELEM_NAME_MAX_LENGTH;
        while !name.is_char_boundary(len) {
            len -= 1;
        }
        &name[..len]
    }
}

// Find the entry as prefix of the name, then return the weight and the rest of name without the
// entry and one following space.
fn lookup_priority<'a>(name: &'a [u8], entries: &[&str], coef: u32) -> Option<(u32, &'a [u8])> {
    entries
        .iter()
        .enumerate()
        .find(|(_, entry)| name.starts_with(entry.as_bytes()))
        .map(|(pos, entry)| {
            let mut rest = &name[entry.len()..];
            if rest.first() == Some(&b' ') {
                rest = &rest[1..];
            }
            (pos as u32 * coef + 1, rest)
        })
}

/// Compute the weight to sort simple elements by their names. The well-known names come earlier.
pub fn compare_weight(name: &str, index: u32) -> u32 {
    let (mut weight, name) = match lookup_priority(name.as_bytes(), BASE_NAMES, 1000) {
        Some(res) => res,
        None => return COMPARE_WEIGHT_NOT_FOUND,
    };

    if !name.is_empty() {
        // Seek the last word, then the word before it if any.
        let mut pos = name.len() - 1;
        while pos > 0 && name[pos] != b' ' {
            pos -= 1;
        }
        while pos > 0 && name[pos] == b' ' {
            pos -= 1;
        }

        let tail = if pos > 0 {
            while pos > 0 && name[pos] != b' ' {
                pos -= 1;
            }
            match lookup_priority(&name[pos..], QUALIFIER_NAMES, 200) {
                Some((w, rest)) => {
                    weight += w;
                    rest
                }
                None => return COMPARE_WEIGHT_SIMPLE_BASE + weight,
            }
        } else {
            &name[pos..]
        };

        // The index is not counted unless the tail is known.
        match lookup_priority(tail, TAIL_NAMES, 20) {
            Some((w, _)) => weight += w,
            None => return COMPARE_WEIGHT_SIMPLE_BASE + weight,
        }
    }

    (COMPARE_WEIGHT_SIMPLE_BASE + weight).saturating_add(index)
}
