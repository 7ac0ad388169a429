use guest::{FibError, Strategy};
use serde::Serialize;
use std::fmt::Display;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
enum Error {
    #[error("could not parse {var}={value:?}: {reason}")]
    Config {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Compute(#[from] FibError),
}

#[derive(Serialize)]
struct Stats {
    program: &'static str,
    method: &'static str,
    n: i64,
    result: u64,
    compute_secs: f32,
}

#[derive(Debug, PartialEq)]
struct Config {
    n: i64,
    method: Strategy,
    stats: bool,
}

impl Config {
    fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        Ok(Config {
            n: env_or(&lookup, "FIB_ARG", 9i64)?,
            method: env_or(&lookup, "FIB_METHOD", Strategy::Naive)?,
            stats: env_flag(&lookup, "FIB_STATS")?,
        })
    }
}

fn env_or<T: FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    var: &'static str,
    def: T,
) -> Result<T, Error>
where
    <T as FromStr>::Err: Display,
{
    match lookup(var) {
        Some(value) => value.parse::<T>().map_err(|e| Error::Config {
            var,
            reason: e.to_string(),
            value,
        }),
        None => Ok(def),
    }
}

fn env_flag(lookup: impl Fn(&str) -> Option<String>, var: &'static str) -> Result<bool, Error> {
    let Some(value) = lookup(var) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(Error::Config {
            var,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    debug!(?config, "resolved configuration");

    let Config { n, method, stats } = config;
    let it = Instant::now();
    let result = method.compute(n)?;
    let compute_secs = it.elapsed().as_secs_f32();

    info!(%method, "fib({n}) = {result}");
    println!("{result}");

    if stats {
        let stats = Stats {
            program: "fib-native",
            method: method.as_str(),
            n,
            result,
            compute_secs,
        };
        match serde_json::to_string(&stats) {
            Ok(line) => eprintln!("{line}"),
            Err(e) => error!("could not serialize stats: {e}"),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
