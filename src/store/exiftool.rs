use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

use crate::error::StoreError;
use crate::models::WriteOutcome;

use super::{BatchReport, MetadataStore, WriteOptions};

/// Backend driving the `exiftool` program.
///
/// Each batch is one process: one for reading every staged file, one for
/// writing every surviving file. exiftool keeps a `<name>_original` copy of
/// each file it rewrites unless told to overwrite in place.
#[derive(Debug, Clone)]
pub struct ExifToolStore {
    program: String,
    args: Vec<OsString>,
}

impl ExifToolStore {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parse a configured command such as `perl /opt/exiftool/exiftool`.
    pub fn from_command(command: &str) -> Result<Self, StoreError> {
        let mut words = shlex::split(command).unwrap_or_default().into_iter();
        let program = words.next().ok_or_else(|| StoreError::Launch {
            program: command.to_string(),
            message: "empty or malformed command".to_string(),
        })?;
        Ok(Self::new(program).with_args(words))
    }

    /// Arguments passed before every batch's own arguments.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn run(&self, args: Vec<OsString>) -> Result<Output, StoreError> {
        tracing::debug!("Running {} with {} arguments", self.program, args.len());
        Command::new(&self.program)
            .args(&self.args)
            .args(args)
            .output()
            .map_err(|e| StoreError::Launch {
                program: self.program.clone(),
                message: e.to_string(),
            })
    }
}

impl Default for ExifToolStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EXIFTOOL)
    }
}

impl MetadataStore for ExifToolStore {
    fn read(&self, path: &Path, field: &str) -> Result<Option<String>, StoreError> {
        self.read_batch(&[path.to_path_buf()], field)
            .pop()
            .unwrap_or_else(|| Err(StoreError::Output("no result".to_string())))
    }

    fn write(
        &mut self,
        path: &Path,
        field: &str,
        value: &str,
        options: WriteOptions,
    ) -> Result<(), StoreError> {
        let report = self.write_batch(&[path.to_path_buf()], field, value, options);
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }
        match report.outcome(path) {
            Some(WriteOutcome::Failed(message)) => Err(StoreError::File {
                path: path.to_path_buf(),
                message: message.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn read_batch(
        &self,
        paths: &[PathBuf],
        field: &str,
    ) -> Vec<Result<Option<String>, StoreError>> {
        if paths.is_empty() {
            return Vec::new();
        }
        let sources: Vec<OsString> = paths.iter().map(|p| source_arg(p)).collect();
        let mut args: Vec<OsString> = vec!["-json".into(), format!("-{field}").into()];
        args.extend(sources.iter().cloned());

        let output = match self.run(args) {
            Ok(output) => output,
            Err(e) => return paths.iter().map(|_| Err(e.clone())).collect(),
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return paths
                .iter()
                .map(|p| {
                    Err(StoreError::File {
                        path: p.clone(),
                        message: message.clone(),
                    })
                })
                .collect();
        }
        parse_read_output(&stdout, paths, &lossy(&sources), field)
    }

    fn write_batch(
        &mut self,
        paths: &[PathBuf],
        field: &str,
        value: &str,
        options: WriteOptions,
    ) -> BatchReport {
        if paths.is_empty() {
            return BatchReport::default();
        }
        let sources: Vec<OsString> = paths.iter().map(|p| source_arg(p)).collect();
        let mut args: Vec<OsString> = vec![format!("-{field}={value}").into()];
        if !options.preserve_originals {
            args.push("-overwrite_original".into());
        }
        args.extend(sources.iter().cloned());

        let output = match self.run(args) {
            Ok(output) => output,
            Err(e) => {
                let reason = e.to_string();
                return BatchReport {
                    outcomes: paths
                        .iter()
                        .map(|p| (p.clone(), WriteOutcome::Failed(reason.clone())))
                        .collect(),
                    warnings: Vec::new(),
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = attribute_diagnostics(&stderr, &lossy(&sources));
        for (index, message) in &diagnostics.warnings {
            tracing::warn!("{}: {}", paths[*index].display(), message);
        }
        let summary = Summary::parse(&stdout).merge(Summary::parse(&stderr));

        settle(
            &self.program,
            paths,
            diagnostics,
            summary,
            output.status.success(),
        )
    }
}

/// exiftool reads arguments starting with `-` as options.
fn source_arg(path: &Path) -> OsString {
    if path.as_os_str().to_string_lossy().starts_with('-') {
        Path::new(".").join(path).into_os_string()
    } else {
        path.as_os_str().to_owned()
    }
}

fn lossy(sources: &[OsString]) -> Vec<String> {
    sources
        .iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect()
}

/// Map exiftool `-json` output back onto the requested paths.
fn parse_read_output(
    stdout: &str,
    paths: &[PathBuf],
    sources: &[String],
    field: &str,
) -> Vec<Result<Option<String>, StoreError>> {
    let entries: Vec<Value> = match serde_json::from_str(stdout) {
        Ok(entries) => entries,
        Err(e) => {
            let err = StoreError::Output(e.to_string());
            return paths.iter().map(|_| Err(err.clone())).collect();
        }
    };

    let by_source: HashMap<&str, &Value> = entries
        .iter()
        .filter_map(|entry| Some((entry.get("SourceFile")?.as_str()?, entry)))
        .collect();

    paths
        .iter()
        .zip(sources)
        .map(|(path, source)| {
            let entry = by_source.get(source.as_str()).ok_or_else(|| StoreError::File {
                path: path.clone(),
                message: "no metadata returned".to_string(),
            })?;
            if let Some(error) = entry.get("Error").and_then(Value::as_str) {
                return Err(StoreError::File {
                    path: path.clone(),
                    message: error.to_string(),
                });
            }
            Ok(entry.get(field).map(field_text))
        })
        .collect()
}

/// exiftool prints numeric-looking values as JSON numbers.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Counts from exiftool's closing report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Summary {
    updated: usize,
    unchanged: usize,
    failed: usize,
    nothing_to_do: bool,
    /// Any count line was printed.
    reported: bool,
}

impl Summary {
    /// Reads lines such as `    2 image files updated`,
    /// `    1 files weren't updated due to errors` and `Nothing to do.`.
    fn parse(text: &str) -> Self {
        let mut summary = Self::default();
        for line in text.lines().map(str::trim) {
            if line == "Nothing to do." {
                summary.nothing_to_do = true;
                continue;
            }
            let Some((count, rest)) = line.split_once(' ') else {
                continue;
            };
            let Ok(count) = count.parse::<usize>() else {
                continue;
            };
            if rest.contains("weren't updated") || rest.contains("wasn't updated") {
                summary.failed += count;
            } else if rest.contains("unchanged") {
                summary.unchanged += count;
            } else if rest.contains("updated") || rest.contains("created") {
                summary.updated += count;
            } else {
                continue;
            }
            summary.reported = true;
        }
        summary
    }

    fn merge(self, other: Self) -> Self {
        Self {
            updated: self.updated + other.updated,
            unchanged: self.unchanged + other.unchanged,
            failed: self.failed + other.failed,
            nothing_to_do: self.nothing_to_do || other.nothing_to_do,
            reported: self.reported || other.reported,
        }
    }

    /// Files that now hold the requested value.
    fn applied(&self) -> usize {
        self.updated + self.unchanged
    }
}

/// Decide per-path outcomes of one write run.
///
/// A write counts only when exiftool confirms it: a summary with at least one
/// file applied, or a clean exit when no summary was printed. A non-zero exit
/// after confirmed writes is a warning, never a failure.
fn settle(
    program: &str,
    paths: &[PathBuf],
    diagnostics: Diagnostics,
    summary: Summary,
    success: bool,
) -> BatchReport {
    let confirmed = if summary.nothing_to_do {
        false
    } else if summary.reported {
        summary.applied() > 0
    } else {
        success
    };

    if !confirmed {
        let reason = if diagnostics.unattributed.is_empty() {
            format!("{program} applied no changes")
        } else {
            diagnostics.unattributed.join("; ")
        };
        let outcomes = paths
            .iter()
            .enumerate()
            .map(|(index, path)| {
                let message = diagnostics.errors.get(&index).unwrap_or(&reason);
                (path.clone(), WriteOutcome::Failed(message.clone()))
            })
            .collect();
        return BatchReport {
            outcomes,
            warnings: Vec::new(),
        };
    }

    let mut warnings = diagnostics.unattributed;
    let expected = paths.len() - diagnostics.errors.len();
    if summary.reported && summary.applied() < expected {
        warnings.push(format!(
            "{program} confirmed {} of {} writes; the rest could not be matched to a file",
            summary.applied(),
            expected
        ));
    } else if !success && diagnostics.errors.is_empty() {
        warnings.push(format!(
            "{program} exited with an error after writing; changes were applied"
        ));
    }

    let outcomes = paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let outcome = match diagnostics.errors.get(&index) {
                Some(message) => WriteOutcome::Failed(message.clone()),
                None => WriteOutcome::Written,
            };
            (path.clone(), outcome)
        })
        .collect();

    BatchReport { outcomes, warnings }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Diagnostics {
    /// Source index to error message.
    errors: HashMap<usize, String>,
    warnings: Vec<(usize, String)>,
    unattributed: Vec<String>,
}

/// Sort `Error: <msg> - <file>` and `Warning: <msg> - <file>` lines by file.
fn attribute_diagnostics(stderr: &str, sources: &[String]) -> Diagnostics {
    let index: HashMap<&str, usize> = sources
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();
    let mut diagnostics = Diagnostics::default();

    for line in stderr.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (is_error, rest) = if let Some(rest) = line.strip_prefix("Error: ") {
            (true, rest)
        } else if let Some(rest) = line.strip_prefix("Warning: ") {
            (false, rest)
        } else {
            diagnostics.unattributed.push(line.to_string());
            continue;
        };

        let attributed = rest.match_indices(" - ").find_map(|(at, sep)| {
            let file = &rest[at + sep.len()..];
            Some((index.get(file)?, &rest[..at]))
        });
        match attributed {
            Some((&i, message)) if is_error => {
                diagnostics.errors.insert(i, message.to_string());
            }
            Some((&i, message)) => diagnostics.warnings.push((i, message.to_string())),
            None => diagnostics.unattributed.push(line.to_string()),
        }
    }
    diagnostics
}
