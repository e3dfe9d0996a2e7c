//! Command line parsing into a validated [`RainConfig`].
//!
//! Validation happens here so the engine can assume a non-empty character pool
//! made of valid scalar values.

use std::io::{self, Read};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use unicode_width::UnicodeWidthChar;

use crate::types::{
    CharPool, MessageConfig, RainConfig, SourceMode, ASCII_CHAR, ASCII_RANGE,
    DEFAULT_MESSAGE_DELAY_MS, UNICODE_CHAR, UNICODE_RANGE,
};

/// Environment variable that pins the RNG seed (overrides `--seed`).
pub const SEED_ENV: &str = "MATRIX_RAIN_SEED";

/// How long a non-terminal stdin gets to produce its first byte.
pub const STDIN_WAIT: Duration = Duration::from_millis(50);

const SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDFFF;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "matrix-rain", version, about = "Digital rain for your terminal")]
pub struct Args {
    /// use ascii characters only
    #[arg(long)]
    pub ascii: bool,

    /// hex code point used as the first character of the pool (e.g. 30A1)
    #[arg(long = "char-seed", value_name = "HEX", value_parser = parse_hex)]
    pub char_seed: Option<u32>,

    /// how many code points after the seed to draw from
    #[arg(long)]
    pub range: Option<u32>,

    /// use the characters of this string instead of a code point range
    #[arg(long)]
    pub stream: Option<String>,

    /// how a literal source fills each stream
    #[arg(long = "stream-mode", value_enum, default_value_t = StreamMode::Random)]
    pub stream_mode: StreamMode,

    /// number of streams (default: derived from the screen width)
    #[arg(long = "number-of-streams")]
    pub number_of_streams: Option<usize>,

    /// message revealed in the middle of the screen
    #[arg(long)]
    pub message: Option<String>,

    /// ms between message character reveals
    #[arg(long = "message-delay", value_name = "MS", default_value_t = DEFAULT_MESSAGE_DELAY_MS)]
    pub message_delay: u64,

    /// seed for reproducible animations
    #[arg(long)]
    pub seed: Option<u64>,

    /// print a run summary to stderr on exit
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StreamMode {
    Random,
    Sequential,
}

impl From<StreamMode> for SourceMode {
    fn from(mode: StreamMode) -> Self {
        match mode {
            StreamMode::Random => SourceMode::Random,
            StreamMode::Sequential => SourceMode::Sequential,
        }
    }
}

fn parse_hex(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix("U+"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex code point {s:?}: {e}"))
}

/// Everything outside the argument list that feeds the configuration.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    /// Text piped on stdin, if stdin is not a terminal.
    pub piped: Option<String>,
    /// Value of [`SEED_ENV`].
    pub env_seed: Option<String>,
}

/// A resolved configuration plus notes worth logging once the screen is restored.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: RainConfig,
    pub notes: Vec<String>,
}

impl Args {
    pub fn resolve(&self, inputs: &Inputs) -> Result<Resolved> {
        let mut notes = Vec::new();

        let pool = match (&self.stream, &inputs.piped) {
            (Some(stream), _) => {
                let chars: Vec<char> = stream.chars().collect();
                if chars.is_empty() {
                    bail!("--stream: the character source must not be empty");
                }
                CharPool::Source(chars)
            }
            (None, Some(piped)) => {
                let chars = printable_chars(piped);
                if chars.is_empty() {
                    notes.push("stdin had no printable characters, using the code point range".into());
                    self.range_pool()?
                } else {
                    notes.push(format!("using {} characters from stdin", chars.len()));
                    CharPool::Source(chars)
                }
            }
            (None, None) => self.range_pool()?,
        };

        if self.number_of_streams == Some(0) {
            bail!("--number-of-streams must be at least 1");
        }

        let message = match &self.message {
            Some(text) if text.chars().all(char::is_whitespace) => {
                bail!("--message must contain visible text")
            }
            Some(text) => Some(MessageConfig::new(
                text,
                Duration::from_millis(self.message_delay),
            )),
            None => None,
        };

        let seed = match &inputs.env_seed {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{SEED_ENV}: invalid seed {raw:?}"))?,
            ),
            None => self.seed,
        };

        let full_width = has_wide_chars(&pool);
        Ok(Resolved {
            config: RainConfig {
                pool,
                source_mode: self.stream_mode.into(),
                stream_count: self.number_of_streams,
                message,
                full_width,
                seed,
            },
            notes,
        })
    }

    fn range_pool(&self) -> Result<CharPool> {
        let (default_seed, default_range) = if self.ascii {
            (ASCII_CHAR, ASCII_RANGE)
        } else {
            (UNICODE_CHAR, UNICODE_RANGE)
        };

        let seed = match self.char_seed {
            Some(cp) => char::from_u32(cp)
                .ok_or_else(|| anyhow!("--char-seed: {cp:#x} is not a valid code point"))?,
            None => default_seed,
        };
        let range = self.range.unwrap_or(default_range);
        if range == 0 {
            bail!("--range must be at least 1");
        }

        let first = seed as u32;
        let last = first
            .checked_add(range - 1)
            .filter(|&cp| cp <= char::MAX as u32)
            .ok_or_else(|| anyhow!("--range: {range} code points from {first:#x} runs past U+10FFFF"))?;
        if first <= *SURROGATES.end() && last >= *SURROGATES.start() {
            bail!("--range: {first:#x}..={last:#x} overlaps the surrogate block");
        }

        Ok(CharPool::Range { seed, range })
    }
}

/// Printable, non-space characters of `text`.
pub fn printable_chars(text: &str) -> Vec<char> {
    text.chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect()
}

fn has_wide_chars(pool: &CharPool) -> bool {
    pool.chars().any(|c| c.width() == Some(2))
}

enum Piped {
    Started,
    Done(io::Result<Vec<u8>>),
}

/// Read all of `reader` if it produces data (or EOF) within `wait`.
///
/// A pipe that stays silent, such as an inherited stdin nobody writes to, gives
/// `Ok(None)`. The reader thread is then left behind blocked in `read`. Once
/// the first bytes arrive the rest is read to EOF with no deadline.
pub fn read_when_ready<R>(mut reader: R, wait: Duration) -> Result<Option<String>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let mut bytes = vec![0u8; 4096];
            let first = loop {
                match reader.read(&mut bytes) {
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    other => break other,
                }
            };
            let result = match first {
                Ok(n) if n > 0 => {
                    bytes.truncate(n);
                    let _ = tx.send(Piped::Started);
                    reader.read_to_end(&mut bytes).map(|_| bytes)
                }
                Ok(_) => Ok(Vec::new()),
                Err(e) => Err(e),
            };
            let _ = tx.send(Piped::Done(result));
        })
        .context("spawning stdin reader")?;

    let done = match rx.recv_timeout(wait) {
        Ok(Piped::Done(result)) => result,
        Ok(Piped::Started) => match rx.recv() {
            Ok(Piped::Done(result)) => result,
            _ => bail!("stdin reader exited early"),
        },
        Err(RecvTimeoutError::Timeout) => return Ok(None),
        Err(RecvTimeoutError::Disconnected) => bail!("stdin reader exited early"),
    };
    let bytes = done.context("reading stdin")?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}
