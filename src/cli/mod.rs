pub(crate) mod files;
pub(crate) mod logger;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use ingrid::{ErrorPolicy, Field, HandlerResult, Mapping, ParserBuilder, SyntaxError};
use log::{debug, error};

use self::files::IniFiles;

#[derive(Debug, Default, PartialEq)]
pub(crate) struct CliOptions {
    pub(crate) keep_going: bool,
    pub(crate) paths: Vec<PathBuf>,
    pub(crate) verbose: bool,
    pub(crate) version: bool,
    pub(crate) help: bool,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum RuntimeError {
    #[error("missing file argument")]
    CliMissingPaths,
    #[error("unknown argument {0:?}")]
    CliUnknownArgument(String),
    #[error("{0:?}: {1}")]
    Io(PathBuf, #[source] io::Error),
    #[error("{0:?}: {1}")]
    Parse(PathBuf, #[source] ingrid::Error),
    #[error("cannot search {0:?}: {1}")]
    Walk(PathBuf, #[source] walkdir::Error),
    #[error("{0} of {1} files failed")]
    Failed(usize, usize),
}

pub(crate) fn help() {
    println!(
        "Usage:
ingrid --version
ingrid [-v|--verbose] [-k|--keep-going] PATH...

Prints every key of the given .ini files as `section.key = value`.
Directories are searched for *.ini, *.cfg and *.conf files."
    );
}

pub(crate) fn parse_args(args: Vec<String>) -> Result<CliOptions, RuntimeError> {
    let mut cfg = CliOptions::default();
    let mut only_paths = false;

    for arg in args.into_iter().skip(1) {
        if only_paths {
            cfg.paths.push(arg.into());
            continue;
        }
        match &arg[..] {
            "--" => only_paths = true,
            "-h" | "--help" => cfg.help = true,
            "-k" | "--keep-going" => cfg.keep_going = true,
            "-v" | "--verbose" => cfg.verbose = true,
            "--version" => cfg.version = true,
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(RuntimeError::CliUnknownArgument(arg))
            }
            _ => cfg.paths.push(arg.into()),
        }
    }

    if cfg.paths.is_empty() && !cfg.help && !cfg.version {
        return Err(RuntimeError::CliMissingPaths);
    }

    Ok(cfg)
}

/// Prints `section.key = value` for every field with a key.
pub(crate) struct KeyValuePrinter<W: Write> {
    out: W,
}

impl<W: Write> KeyValuePrinter<W> {
    pub(crate) fn new(out: W) -> Self {
        KeyValuePrinter { out }
    }

    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Mapping for KeyValuePrinter<W> {
    fn map(&mut self, field: &Field<'_>, error: Option<&SyntaxError>) -> HandlerResult {
        if field.key.is_empty() || error.is_some() {
            return Ok(());
        }
        if !field.section.is_empty() {
            write!(self.out, "{}.", field.section)?;
        }
        writeln!(self.out, "{} = {}", field.key, field.value)?;
        Ok(())
    }
}

/// Parses one file, printing its keys to `out`.
pub(crate) fn parse_file<W: Write>(
    path: &Path,
    policy: ErrorPolicy,
    out: &mut KeyValuePrinter<W>,
) -> Result<(), RuntimeError> {
    debug!("Parsing {path:?}");

    let file = File::open(path).map_err(|e| RuntimeError::Io(path.to_path_buf(), e))?;
    ParserBuilder::new()
        .policy(policy)
        .build(BufReader::new(file))
        .map(out)
        .map_err(|e| RuntimeError::Parse(path.to_path_buf(), e))
}

/// Parses every file named by `cfg`.
///
/// Without `keep_going` the first failing file ends the run, otherwise all
/// files are parsed and their errors logged.
pub(crate) fn run<W: Write>(cfg: &CliOptions, out: W) -> Result<(), RuntimeError> {
    let policy = if cfg.keep_going {
        ErrorPolicy::CollectAll
    } else {
        ErrorPolicy::FailFast
    };
    let mut printer = KeyValuePrinter::new(out);
    let mut total = 0;
    let mut failed = 0;

    for path in IniFiles::new(cfg.paths.clone()) {
        total += 1;
        let result = path.and_then(|path| parse_file(&path, policy, &mut printer));
        if let Err(e) = result {
            if !cfg.keep_going {
                return Err(e);
            }
            error!("{e}");
            failed += 1;
        }
    }

    printer
        .into_inner()
        .flush()
        .map_err(|e| RuntimeError::Io(PathBuf::from("<stdout>"), e))?;

    if failed > 0 {
        return Err(RuntimeError::Failed(failed, total));
    }
    Ok(())
}
