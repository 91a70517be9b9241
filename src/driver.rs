//! Drives a [`LineTransformer`] from an input file into a generated output
//! file.
//!
//! Output is staged in a temporary file next to the target and only renamed
//! over it once every line has been transformed, so a failed run leaves any
//! previous output untouched.

use crate::config::AppConfig;
use crate::errors::Result;
use crate::table::ObfuscationTable;
use crate::transformer::{LineTransformer, TransformStats};
use serde::Serialize;
use std::env;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// The "do not edit" block written ahead of the transformed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub editable_source: String,
    pub generator: String,
}

impl Header {
    pub fn new(editable_source: impl Into<String>, generator: impl Into<String>) -> Self {
        Self {
            editable_source: editable_source.into(),
            generator: generator.into(),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "// THIS SOURCE FILE WAS AUTOMATICALLY GENERATED. DO NOT MANUALLY EDIT.")?;
        writeln!(f, "// Edit {}", self.editable_source)?;
        writeln!(f, "// and then run the {} script.", self.generator)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub dry_run: bool,
    pub stats: TransformStats,
}

impl RunReport {
    pub fn adjusted_lines(&self) -> usize {
        self.stats.adjusted_lines
    }

    pub fn report_lines(&self) -> [String; 3] {
        [
            format!("input:  {}", self.input.display()),
            format!("output: {}", self.output.display()),
            format!("{} lines adjusted", self.stats.adjusted_lines),
        ]
    }
}

/// Writes the header, then every emitted line in input order. Line
/// terminators are carried through unchanged.
pub fn transform_stream<R, W>(
    table: &ObfuscationTable,
    mut reader: R,
    mut writer: W,
    header: &Header,
) -> Result<TransformStats>
where
    R: BufRead,
    W: Write,
{
    write!(writer, "{}", header)?;

    let mut transformer = LineTransformer::new(table);
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if let Some(out) = transformer.process_line(&line)? {
            writer.write_all(out.as_bytes())?;
        }
    }
    writer.flush()?;
    Ok(transformer.finish())
}

pub fn run(config: &AppConfig, table: &ObfuscationTable, dry_run: bool) -> Result<RunReport> {
    let input = absolute(&config.input_path())?;
    let output = absolute(&config.output_path())?;
    let header = config.header();
    info!(input = %input.display(), output = %output.display(), dry_run, "transforming");

    let reader = BufReader::new(File::open(&input)?);
    let stats = if dry_run {
        transform_stream(table, reader, io::sink(), &header)?
    } else {
        write_atomically(&output, |file| transform_stream(table, reader, BufWriter::new(file), &header))?
    };

    info!(
        adjusted = stats.adjusted_lines,
        replacements = stats.replacements,
        "done"
    );
    Ok(RunReport {
        input,
        output,
        dry_run,
        stats,
    })
}

/// An existing target keeps its permissions. A new target is created as
/// `0o644` on Unix: the staging file is always `0o600`, and the process umask
/// cannot be read without `libc`, so the usual source-file mode is set
/// explicitly instead.
fn write_atomically<T, F>(target: &Path, body: F) -> Result<T>
where
    F: FnOnce(&mut File) -> Result<T>,
{
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    debug!(staged = %staged.path().display(), "staging output");

    let value = body(staged.as_file_mut())?;

    let permissions = match fs::metadata(target) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        staged.as_file().set_permissions(permissions)?;
    }
    staged.persist(target)?;
    Ok(value)
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

/// Makes `path` absolute against the working directory and folds away `.`
/// and `..` without touching the filesystem. Symlinks are left as written.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}
