// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

use {
    super::*,
    alsactl::{prelude::CardExt, Card},
    glib::{prelude::IsA, source, ControlFlow, FileError, MainContext, MainLoop, Source},
    nix::sys::signal,
    std::{
        sync::{mpsc, Arc},
        thread,
        time::Duration,
    },
};

const LAUNCH_TIMEOUT: Duration = Duration::from_secs(1);

/// The thread to dispatch events of sources in own context.
pub struct Dispatcher {
    name: String,
    th: Option<thread::JoinHandle<()>>,
    ev_loop: Arc<MainLoop>,
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.ev_loop.quit();

        if let Some(th) = self.th.take() {
            if th.join().is_err() {
                eprintln!("Fail to join thread for {}.", self.name);
            }
        }
    }
}

impl Dispatcher {
    pub fn run(name: String) -> Result<Dispatcher, Error> {
        // Use own context.
        let ctx = MainContext::new();
        let ev_loop = Arc::new(MainLoop::new(Some(&ctx), false));

        // The idle source is dispatched just after the loop starts.
        let (tx, rx) = mpsc::sync_channel(1);
        let src = source::idle_source_new(None, source::Priority::DEFAULT_IDLE, move || {
            let _ = tx.send(());
            ControlFlow::Break
        });
        src.attach(Some(&ctx));

        let l = ev_loop.clone();
        let th = thread::Builder::new()
            .name(name.clone())
            .spawn(move || l.run())
            .map_err(|e| Error::new(FileError::Failed, &e.to_string()))?;

        if rx.recv_timeout(LAUNCH_TIMEOUT).is_err() {
            ev_loop.quit();
            let _ = th.join();
            let msg = format!("Fail to launch {}", name);
            Err(Error::new(FileError::Failed, &msg))?;
        }

        Ok(Dispatcher {
            name,
            th: Some(th),
            ev_loop,
        })
    }

    pub fn stop(&mut self) {
        self.ev_loop.quit();
    }

    fn attach_src_to_ctx(&mut self, src: &Source) {
        let ctx = self.ev_loop.context();
        src.attach(Some(&ctx));
    }

    pub fn attach_signal_handler<F>(&mut self, signum: signal::Signal, cb: F)
    where
        F: FnMut() -> ControlFlow + Send + 'static,
    {
        let src =
            source::unix_signal_source_new(signum as i32, None, source::Priority::DEFAULT_IDLE, cb);

        self.attach_src_to_ctx(&src);
    }

    pub fn attach_snd_card<C, F>(&mut self, card: &C, disconnect_cb: F) -> Result<(), Error>
    where
        C: IsA<Card>,
        F: Fn(&C) + 'static,
    {
        let src = card.create_source()?;

        card.connect_handle_disconnection(disconnect_cb);

        self.attach_src_to_ctx(&src);

        Ok(())
    }
}
