// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (c) 2024 Takashi Sakamoto

use {
    super::{LogLevel, RuntimeOperation},
    alsactl::CardError,
    clap::Parser,
    glib::{Error, FileError},
};

pub trait ServiceCmd<A, T, R>: Sized
where
    A: Parser,
    R: RuntimeOperation<T>,
{
    fn params(args: &A) -> (T, Option<LogLevel>);

    fn run() {
        let code = A::try_parse()
            .map_err(|err| err.to_string())
            .map(|args| Self::params(&args))
            .and_then(|(arg, log_level)| {
                R::new(arg, log_level)
                    .and_then(|mut runtime| {
                        runtime.listen()?;
                        runtime.run()?;
                        Ok(libc::EXIT_SUCCESS)
                    })
                    .map_err(|err| specific_err_to_string(&err))
            })
            .unwrap_or_else(|msg| {
                eprintln!("{}", msg);
                libc::EXIT_FAILURE
            });

        std::process::exit(code)
    }
}

fn specific_err_to_string(e: &Error) -> String {
    let (domain, cause) = if let Some(error) = e.kind::<FileError>() {
        (
            "Linux file operation error",
            match error {
                FileError::Acces => "Access permission",
                FileError::Isdir => "Is directory",
                FileError::Noent => "Not exists",
                FileError::Inval => "Invalid argument",
                FileError::Nxio => "Not supported",
                FileError::Exist => "Already exists",
                FileError::Io => "Input/output error",
                FileError::Nomem => "Out of memory",
                _ => "",
            },
        )
    } else if let Some(error) = e.kind::<CardError>() {
        (
            "ALSA control operation error",
            match error {
                CardError::Disconnected => "Sound card is disconnected",
                _ => "",
            },
        )
    } else {
        ("Unknown domain error", "")
    };
    format!("{}: {}, {}", domain, cause, e)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_literal() {
        let err = Error::new(FileError::Noent, "/dev/snd/controlC9");
        assert_eq!(
            specific_err_to_string(&err),
            "Linux file operation error: Not exists, /dev/snd/controlC9"
        );

        let err = Error::new(CardError::Disconnected, "ioctl");
        assert_eq!(
            specific_err_to_string(&err),
            "ALSA control operation error: Sound card is disconnected, ioctl"
        );
    }
}
