//! # Flag Sets
//!
//! Named sets of typed flags bound from command-line arguments.
//!
//! Parsing is delegated to `clap`: every parse builds a `clap::Command` with
//! one `Arg` per defined flag plus a trailing positional that swallows
//! everything from the first non-flag argument on. That trailing capture is
//! what lets a top-level set stop at the verb and hand the verb's own flags
//! through untouched.
//!
//! Accepted syntax: `-name value`, `--name value`, `-name=value`,
//! `--name=value`; booleans as `-name` or `-name=false`; `--` ends flags.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use clap::builder::BoolishValueParser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use tracing::debug;

use crate::error::{FlagError, Result};
use crate::output::Sink;

/// Id of the trailing positional capture; flag names can't start with `-`.
const TRAILING_ARGS: &str = "-trailing-args";

/// Typed value of a flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
    Int(i64),
    Uint(u64),
}

impl FlagValue {
    /// Type word shown in the defaults listing (empty for booleans)
    pub fn type_name(&self) -> &'static str {
        match self {
            FlagValue::Bool(_) => "",
            FlagValue::Str(_) => "string",
            FlagValue::Int(_) => "int",
            FlagValue::Uint(_) => "uint",
        }
    }

    /// Whether this is the zero value of its type
    pub fn is_zero(&self) -> bool {
        match self {
            FlagValue::Bool(b) => !b,
            FlagValue::Str(s) => s.is_empty(),
            FlagValue::Int(i) => *i == 0,
            FlagValue::Uint(u) => *u == 0,
        }
    }

    /// Parse `raw` into a value of the same type as `self`
    fn parse_like(&self, raw: &str) -> std::result::Result<FlagValue, String> {
        match self {
            FlagValue::Bool(_) => match raw.to_ascii_lowercase().as_str() {
                "1" | "t" | "true" | "y" | "yes" | "on" => Ok(FlagValue::Bool(true)),
                "0" | "f" | "false" | "n" | "no" | "off" => Ok(FlagValue::Bool(false)),
                _ => Err("value was not a boolean".to_string()),
            },
            FlagValue::Str(_) => Ok(FlagValue::Str(raw.to_string())),
            FlagValue::Int(_) => raw
                .parse()
                .map(FlagValue::Int)
                .map_err(|e: std::num::ParseIntError| e.to_string()),
            FlagValue::Uint(_) => raw
                .parse()
                .map(FlagValue::Uint)
                .map_err(|e: std::num::ParseIntError| e.to_string()),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{}", b),
            FlagValue::Str(s) => write!(f, "{}", s),
            FlagValue::Int(i) => write!(f, "{}", i),
            FlagValue::Uint(u) => write!(f, "{}", u),
        }
    }
}

/// A single defined flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    name: String,
    usage: String,
    default: FlagValue,
    value: FlagValue,
}

impl Flag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn default_value(&self) -> &FlagValue {
        &self.default
    }

    /// Default value as text, as shown in help listings
    pub fn def_value(&self) -> String {
        self.default.to_string()
    }

    /// Current value (the default until parsed or set)
    pub fn value(&self) -> &FlagValue {
        &self.value
    }
}

/// Callback invoked when a flag set needs to explain its usage
pub type UsageFn = Rc<dyn Fn(&FlagSet)>;

/// A named set of flags.
///
/// Flags are kept sorted by name; [`FlagSet::visit_all`] and the defaults
/// listing follow that order. Clones share the usage callback and output sink.
#[derive(Clone)]
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, Flag>,
    actual: BTreeSet<String>,
    args: Vec<String>,
    parsed: bool,
    output: Sink,
    usage: Option<UsageFn>,
}

impl FlagSet {
    /// Create an empty flag set. Diagnostics go to stderr until
    /// [`FlagSet::set_output`] says otherwise.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: BTreeMap::new(),
            actual: BTreeSet::new(),
            args: Vec::new(),
            parsed: false,
            output: Sink::Stderr,
            usage: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define a boolean flag
    ///
    /// # Panics
    ///
    /// If `name` is already defined on this set, is empty, starts with `-`
    /// or contains `=`.
    pub fn bool_flag(&mut self, name: &str, default: bool, usage: &str) -> &mut Self {
        self.define(name, FlagValue::Bool(default), usage)
    }

    /// Define a string flag. Panics like [`FlagSet::bool_flag`].
    pub fn string_flag(&mut self, name: &str, default: &str, usage: &str) -> &mut Self {
        self.define(name, FlagValue::Str(default.to_string()), usage)
    }

    /// Define a signed integer flag. Panics like [`FlagSet::bool_flag`].
    pub fn int_flag(&mut self, name: &str, default: i64, usage: &str) -> &mut Self {
        self.define(name, FlagValue::Int(default), usage)
    }

    /// Define an unsigned integer flag. Panics like [`FlagSet::bool_flag`].
    pub fn uint_flag(&mut self, name: &str, default: u64, usage: &str) -> &mut Self {
        self.define(name, FlagValue::Uint(default), usage)
    }

    fn define(&mut self, name: &str, default: FlagValue, usage: &str) -> &mut Self {
        if name.is_empty() || name.starts_with('-') || name.contains('=') {
            panic!("flag {:?} has an invalid name", name);
        }
        if self.flags.contains_key(name) {
            panic!("{} flag redefined: {}", self.name, name);
        }
        self.flags.insert(
            name.to_string(),
            Flag {
                name: name.to_string(),
                usage: usage.to_string(),
                value: default.clone(),
                default,
            },
        );
        self
    }

    /// Parse `args` (without the program or verb name).
    ///
    /// Parsing stops at the first non-flag argument; it and everything after
    /// it become the positional arguments. On failure the error is written to
    /// the output sink (except for a help request) and the usage callback runs.
    pub fn parse<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parsed = true;
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        match self.bind(&args) {
            Ok(()) => {
                debug!(flag_set = %self.name, positional = self.args.len(), "flags parsed");
                Ok(())
            }
            Err(err) => {
                debug!(flag_set = %self.name, error = %err, "flag parsing failed");
                if !err.is_help() {
                    let mut out = self.output.clone();
                    let _ = writeln!(out, "{}", err);
                }
                self.usage();
                Err(err)
            }
        }
    }

    fn bind(&mut self, args: &[String]) -> Result<()> {
        let matches = self
            .command()
            .try_get_matches_from(self.normalize(args)?)
            .map_err(translate_error)?;

        for flag in self.flags.values_mut() {
            if let Some(value) = matched_value(&matches, flag) {
                flag.value = value;
                self.actual.insert(flag.name.clone());
            }
        }

        self.args = matches
            .get_many::<String>(TRAILING_ARGS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        Ok(())
    }

    /// Rewrite the flag prefix of `args` into clap's long form: `-name`
    /// becomes `--name`, and a value-taking flag absorbs its following value
    /// as `--name=value` so values that look like flags survive.
    ///
    /// At most two leading dashes are accepted; `---name`, `-=x` and the
    /// like are a syntax error.
    fn normalize(&self, args: &[String]) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(args.len());
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            if arg == "--" || arg == "-" || !arg.starts_with('-') {
                out.push(arg.clone());
                out.extend(iter.cloned());
                break;
            }

            let body = arg.strip_prefix("--").unwrap_or(&arg[1..]);
            if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
                return Err(FlagError::Syntax(format!("bad flag syntax: {}", arg)));
            }
            let name = body.split('=').next().unwrap_or(body);
            let takes_value = self
                .flags
                .get(name)
                .is_some_and(|f| !matches!(f.default, FlagValue::Bool(_)));

            if takes_value && !body.contains('=') {
                match iter.next() {
                    Some(value) => out.push(format!("--{}={}", name, value)),
                    None => out.push(format!("--{}", name)),
                }
            } else {
                out.push(format!("--{}", body));
            }
        }
        Ok(out)
    }

    fn command(&self) -> clap::Command {
        let trailing = Arg::new(TRAILING_ARGS)
            .action(ArgAction::Append)
            .num_args(1..)
            .trailing_var_arg(true)
            .value_parser(value_parser!(String));

        let mut cmd = clap::Command::new(self.name.clone())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true);

        for flag in self.flags.values() {
            let arg = Arg::new(flag.name.clone())
                .long(flag.name.clone())
                .action(ArgAction::Set);
            let arg = match flag.default {
                FlagValue::Bool(_) => arg
                    .num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
                    .value_parser(BoolishValueParser::new()),
                FlagValue::Str(_) => arg
                    .num_args(1)
                    .allow_hyphen_values(true)
                    .value_parser(value_parser!(String)),
                FlagValue::Int(_) => arg
                    .num_args(1)
                    .allow_negative_numbers(true)
                    .value_parser(value_parser!(i64)),
                FlagValue::Uint(_) => arg.num_args(1).value_parser(value_parser!(u64)),
            };
            cmd = cmd.arg(arg);
        }

        cmd.arg(trailing)
    }

    /// Set a flag by name, as if it had been given on the command line
    pub fn set(&mut self, name: &str, raw: &str) -> Result<()> {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| FlagError::Undefined(name.to_string()))?;
        flag.value = flag
            .default
            .parse_like(raw)
            .map_err(|reason| FlagError::InvalidValue {
                flag: name.to_string(),
                value: raw.to_string(),
                reason,
            })?;
        self.actual.insert(name.to_string());
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.lookup(name)?.value {
            FlagValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match &self.lookup(name)?.value {
            FlagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.lookup(name)?.value {
            FlagValue::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn get_uint(&self, name: &str) -> Option<u64> {
        match self.lookup(name)?.value {
            FlagValue::Uint(u) => Some(u),
            _ => None,
        }
    }

    /// Visit every defined flag in name order
    pub fn visit_all(&self, mut f: impl FnMut(&Flag)) {
        self.flags.values().for_each(|flag| f(flag));
    }

    /// Visit only the flags that were set, in name order
    pub fn visit(&self, mut f: impl FnMut(&Flag)) {
        for name in &self.actual {
            if let Some(flag) = self.flags.get(name) {
                f(flag);
            }
        }
    }

    /// Number of defined flags
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of flags that were set
    pub fn n_flag(&self) -> usize {
        self.actual.len()
    }

    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Positional arguments left after parsing
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    pub fn narg(&self) -> usize {
        self.args.len()
    }

    pub fn output(&self) -> &Sink {
        &self.output
    }

    pub fn set_output(&mut self, output: Sink) {
        self.output = output;
    }

    /// Replace the usage callback
    pub fn set_usage(&mut self, usage: impl Fn(&FlagSet) + 'static) {
        self.usage = Some(Rc::new(usage));
    }

    /// Run the usage callback, or print the default usage message
    pub fn usage(&self) {
        match &self.usage {
            Some(usage) => usage(self),
            None => {
                let mut out = self.output.clone();
                let header = if self.name.is_empty() {
                    "Usage:".to_string()
                } else {
                    format!("Usage of {}:", self.name)
                };
                let _ = writeln!(out, "{}", header).and_then(|_| self.write_defaults(&mut out));
            }
        }
    }

    /// Write the defaults listing of every flag to the set's output sink
    pub fn print_defaults(&self) -> io::Result<()> {
        self.write_defaults(&mut self.output.clone())
    }

    /// Write the defaults listing of every flag to `w`:
    ///
    /// ```text
    ///   -name string
    ///     	who to greet (default "world")
    ///   -v	verbose output
    /// ```
    pub fn write_defaults(&self, w: &mut dyn Write) -> io::Result<()> {
        for flag in self.flags.values() {
            let mut line = format!("  -{}", flag.name);
            let type_name = flag.default.type_name();
            if !type_name.is_empty() {
                line.push(' ');
                line.push_str(type_name);
            }
            // Short names fit on the same line as their usage
            if line.len() <= 4 {
                line.push('\t');
            } else {
                line.push_str("\n    \t");
            }
            line.push_str(&flag.usage.replace('\n', "\n    \t"));

            if !flag.default.is_zero() {
                match &flag.default {
                    FlagValue::Str(s) => line.push_str(&format!(" (default {:?})", s)),
                    other => line.push_str(&format!(" (default {})", other)),
                }
            }
            writeln!(w, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("flags", &self.flags.keys().collect::<Vec<_>>())
            .field("args", &self.args)
            .field("parsed", &self.parsed)
            .finish()
    }
}

fn matched_value(matches: &ArgMatches, flag: &Flag) -> Option<FlagValue> {
    let id = flag.name.as_str();
    match flag.default {
        FlagValue::Bool(_) => matches.get_one::<bool>(id).copied().map(FlagValue::Bool),
        FlagValue::Str(_) => matches.get_one::<String>(id).cloned().map(FlagValue::Str),
        FlagValue::Int(_) => matches.get_one::<i64>(id).copied().map(FlagValue::Int),
        FlagValue::Uint(_) => matches.get_one::<u64>(id).copied().map(FlagValue::Uint),
    }
}

fn translate_error(err: clap::Error) -> FlagError {
    let context = |kind| match err.get(kind) {
        Some(ContextValue::String(s)) => s.clone(),
        _ => String::new(),
    };
    let arg = context(ContextKind::InvalidArg);

    match err.kind() {
        ErrorKind::UnknownArgument if matches!(arg.as_str(), "--h" | "--help") => {
            FlagError::HelpRequested
        }
        ErrorKind::UnknownArgument => FlagError::Undefined(arg),
        ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
            let flag = flag_name(&arg);
            let value = context(ContextKind::InvalidValue);
            if value.is_empty() && err.kind() == ErrorKind::InvalidValue {
                return FlagError::MissingValue(flag);
            }
            let reason = std::error::Error::source(&err)
                .map(|source| source.to_string())
                .unwrap_or_else(|| "invalid value".to_string());
            FlagError::InvalidValue {
                flag,
                value,
                reason,
            }
        }
        _ => {
            let rendered = err.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            FlagError::Syntax(first.trim_start_matches("error: ").to_string())
        }
    }
}

/// `--count <count>` / `--count=<count>` -> `count`
fn flag_name(arg: &str) -> String {
    arg.trim_start_matches('-')
        .split(|c: char| c == ' ' || c == '=')
        .next()
        .unwrap_or_default()
        .to_string()
}
