//! Command-line overrides for a run
//!
//! The overrides use single-dash forms (`-conf`, `-patch1`, `-no-native`,
//! `-jN`) and are parsed here rather than by the CLI argument parser.

use precheck_errors::ConfigError;
use precheck_events::EventEmitter;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Number of parallel jobs, 1 through 99
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Parallelism(u8);

impl Parallelism {
    /// Number of jobs
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// `-jN` flag passed to make
    #[must_use]
    pub fn as_flag(self) -> String {
        format!("-j{}", self.0)
    }

    /// Parse the digits of a parallelism value: `[1-9]` or `[1-9][0-9]`
    fn from_digits(digits: &str) -> Option<Self> {
        let bytes = digits.as_bytes();
        let well_formed = matches!(bytes.len(), 1 | 2)
            && matches!(bytes[0], b'1'..=b'9')
            && bytes[1..].iter().all(u8::is_ascii_digit);
        if well_formed {
            digits.parse().ok().map(Self)
        } else {
            None
        }
    }
}

impl fmt::Display for Parallelism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Parallelism {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_digits(s).ok_or_else(|| ConfigError::InvalidValue {
            field: "parallelism".to_string(),
            value: s.to_string(),
        })
    }
}

/// Options that shape one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
    /// Extra arguments for the configure script, in order
    pub extra_configure_args: Vec<String>,
    /// Patches applied with `-p1`, in order
    pub patch_files: Vec<PathBuf>,
    /// Build native-code artifacts
    pub build_native: bool,
    /// Explicit job count
    pub parallelism: Option<Parallelism>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            extra_configure_args: Vec::new(),
            patch_files: Vec::new(),
            build_native: true,
            parallelism: None,
        }
    }
}

impl BuildOptions {
    /// Defaults seeded from an environment parallelism hint
    ///
    /// A malformed hint is dropped with a warning event; it never fails the
    /// run.
    pub fn from_jobs_hint(hint: Option<&str>, emitter: &impl EventEmitter) -> Self {
        let parallelism = hint.and_then(|raw| {
            let parsed = Parallelism::from_digits(raw);
            if parsed.is_none() {
                emitter.emit_warning_with_context(
                    format!("ignoring malformed parallelism hint `{raw}`"),
                    "expected one or two digits, not starting with 0",
                );
            }
            parsed
        });

        Self {
            parallelism,
            ..Self::default()
        }
    }
}

/// Parse overrides starting from the defaults
///
/// # Errors
///
/// Returns `ConfigError::UnknownOption` for any unrecognized token and
/// `ConfigError::MissingOptionValue` when `-conf` or `-patch1` ends the list.
pub fn parse<I, S>(argv: I) -> Result<BuildOptions, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_with(BuildOptions::default(), argv)
}

/// Parse overrides on top of `defaults`
///
/// A `-jN` override replaces any parallelism present in `defaults`.
///
/// # Errors
///
/// Same as [`parse`].
pub fn parse_with<I, S>(defaults: BuildOptions, argv: I) -> Result<BuildOptions, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = defaults;
    let mut args = argv.into_iter();

    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        match arg {
            "-conf" => {
                let value = next_value(&mut args, arg)?;
                options.extra_configure_args.push(value);
            }
            "-patch1" => {
                let value = next_value(&mut args, arg)?;
                options.patch_files.push(PathBuf::from(value));
            }
            "-no-native" => options.build_native = false,
            _ => {
                let jobs = arg
                    .strip_prefix("-j")
                    .and_then(Parallelism::from_digits)
                    .ok_or_else(|| ConfigError::UnknownOption {
                        option: arg.to_string(),
                    })?;
                options.parallelism = Some(jobs);
            }
        }
    }

    Ok(options)
}

fn next_value<I, S>(args: &mut I, option: &str) -> Result<String, ConfigError>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    args.next()
        .map(|value| value.as_ref().to_string())
        .ok_or_else(|| ConfigError::MissingOptionValue {
            option: option.to_string(),
        })
}
