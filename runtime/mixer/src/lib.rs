// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto
mod report;

use {
    alsa_simple_mixer::MixerEvent,
    alsactl::{prelude::*, *},
    glib::{ControlFlow, Error},
    nix::sys::signal,
    report::*,
    runtime_core::{card_registry::*, dispatcher::*, *},
    std::sync::mpsc,
    tracing::{debug, debug_span, Level},
};

enum Event {
    Shutdown,
    Disconnected,
    Elem(alsactl::ElemId, alsactl::ElemEventMask),
}

pub struct MixerRuntime {
    mixer: CardMixer,
    mixer_rx: mpsc::Receiver<MixerEvent>,
    rx: mpsc::Receiver<Event>,
    tx: mpsc::SyncSender<Event>,
    dispatchers: Vec<Dispatcher>,
}

impl RuntimeOperation<u32> for MixerRuntime {
    fn new(card_id: u32, log_level: Option<LogLevel>) -> Result<Self, Error> {
        if let Some(level) = log_level {
            let fmt_level = match level {
                LogLevel::Debug => Level::DEBUG,
            };
            tracing_subscriber::fmt().with_max_level(fmt_level).init();
        }

        let registry = CardRegistry::open(card_id)?;
        let mut mixer = CardMixer::new(registry);
        let mixer_rx = mixer.subscribe();

        // Use uni-directional channel for communication to child threads.
        let (tx, rx) = mpsc::sync_channel(32);

        let dispatchers = Vec::new();

        Ok(MixerRuntime {
            mixer,
            mixer_rx,
            rx,
            tx,
            dispatchers,
        })
    }

    fn listen(&mut self) -> Result<(), Error> {
        self.launch_system_event_dispatcher()?;

        let enter = debug_span!("load").entered();
        self.mixer
            .load()
            .map_err(|e| mixer_error_to_glib(&e))?;
        enter.exit();

        self.report_mixer_events();

        Ok(())
    }

    fn run(&mut self) -> Result<(), Error> {
        let enter = debug_span!("event").entered();
        loop {
            if let Ok(ev) = self.rx.recv() {
                match ev {
                    Event::Shutdown => break,
                    Event::Disconnected => break,
                    Event::Elem(elem_id, events) => {
                        let _enter = debug_span!("element").entered();

                        debug!(
                            numid = elem_id.numid(),
                            name = elem_id.name().as_str(),
                            iface = ?elem_id.iface(),
                            device_id = elem_id.device_id(),
                            subdevice_id = elem_id.subdevice_id(),
                            index = elem_id.index(),
                            ?events,
                        );

                        for event in elem_events_from_card(&elem_id, events) {
                            let res = self.mixer.handle_elem_event(&event);
                            debug!(?event, ?res);
                        }

                        self.report_mixer_events();
                    }
                }
            }
        }

        enter.exit();

        Ok(())
    }
}

impl Drop for MixerRuntime {
    fn drop(&mut self) {
        // At first, stop event loop in all of dispatchers to avoid queueing new events.
        for dispatcher in &mut self.dispatchers {
            dispatcher.stop();
        }

        // Next, consume all events in queue to release blocked thread for sender.
        for _ in self.rx.try_iter() {}

        // Finally Finish I/O threads.
        self.dispatchers.clear();
    }
}

const SYSTEM_DISPATCHER_NAME: &str = "system event dispatcher";

impl MixerRuntime {
    fn launch_system_event_dispatcher(&mut self) -> Result<(), Error> {
        let name = SYSTEM_DISPATCHER_NAME.to_string();
        let mut dispatcher = Dispatcher::run(name)?;

        let tx = self.tx.clone();
        dispatcher.attach_signal_handler(signal::Signal::SIGINT, move || {
            let _ = tx.send(Event::Shutdown);
            ControlFlow::Break
        });

        let card = &self.mixer.registry().card;

        let tx = self.tx.clone();
        dispatcher.attach_snd_card(card, move |_| {
            let _ = tx.send(Event::Disconnected);
        })?;

        let tx = self.tx.clone();
        card.connect_handle_elem_event(move |_, elem_id, events| {
            let elem_id: alsactl::ElemId = elem_id.clone();
            let _ = tx.send(Event::Elem(elem_id, events));
        });

        self.dispatchers.push(dispatcher);

        Ok(())
    }

    fn report_mixer_events(&self) {
        self.mixer_rx
            .try_iter()
            .for_each(|event| println!("{}", event_literal(&self.mixer, &event)));
    }
}
