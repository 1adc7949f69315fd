// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

use {clap::Parser, mixer_runtime::MixerRuntime, runtime_core::cmdline::*, runtime_core::LogLevel};

struct MixerServiceCmd;

#[derive(Parser, Default)]
#[clap(name = "snd-simple-mixer-monitor")]
struct Arguments {
    /// The numeric identifier of sound card in Linux sound subsystem.
    card_id: u32,

    /// The level to debug runtime, disabled as a default.
    #[clap(long, short, value_enum)]
    log_level: Option<LogLevel>,
}

impl ServiceCmd<Arguments, u32, MixerRuntime> for MixerServiceCmd {
    fn params(args: &Arguments) -> (u32, Option<LogLevel>) {
        (args.card_id, args.log_level)
    }
}

fn main() {
    MixerServiceCmd::run()
}
