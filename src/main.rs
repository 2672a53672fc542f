//! `ecviz` binary: opens the visualization window against the HTTP crypto
//! service.
//!
//! ```text
//! ecviz [--options <file.toml>] [--service <url>] [message...]
//! ```
//!
//! `--options` loads a TOML preset, `--service` overrides its base URL and
//! the remaining words prefill the message that encryption sends. Logging
//! goes through `env_logger`; set `RUST_LOG=ecviz=debug` for frame detail.

use std::{path::PathBuf, sync::Arc};

use ecviz::{service::HttpCryptoService, Options, Viewer, VizError};

const USAGE: &str =
    "Usage: ecviz [--options <file.toml>] [--service <url>] [message...]";

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct Args {
    options: Option<PathBuf>,
    service: Option<String>,
    message: String,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut words = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--options" => {
                let path = args.next().ok_or("--options needs a path")?;
                parsed.options = Some(PathBuf::from(path));
            }
            "--service" => {
                parsed.service =
                    Some(args.next().ok_or("--service needs a URL")?);
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown flag {flag}"));
            }
            _ => words.push(arg),
        }
    }
    parsed.message = words.join(" ");
    Ok(parsed)
}

fn run(args: Args) -> Result<(), VizError> {
    let mut options = match &args.options {
        Some(path) => {
            log::info!("loading options from {}", path.display());
            Options::load(path)?
        }
        None => Options::default(),
    };
    if let Some(url) = args.service {
        options.service.base_url = url;
    }

    let service = Arc::new(HttpCryptoService::new(options.service.base_url.clone()));
    log::info!("crypto service at {}", service.base_url());

    Viewer::builder(service)
        .with_options(options)
        .with_message(args.message)
        .build()
        .run()
}

fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            log::error!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Result<Args, String> {
        parse_args(words.iter().map(|w| (*w).to_owned()))
    }

    #[test]
    fn flags_and_message_words() {
        let parsed =
            args(&["--service", "http://svc:9000", "hello", "curve"]).unwrap();
        assert_eq!(parsed.service.as_deref(), Some("http://svc:9000"));
        assert_eq!(parsed.message, "hello curve");
        assert_eq!(parsed.options, None);
    }

    #[test]
    fn missing_flag_value_is_an_error() {
        assert!(args(&["--options"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }
}
