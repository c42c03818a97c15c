use std::{
    error::Error,
    fmt::Display,
    path::{Path, PathBuf},
};

use owo_colors::OwoColorize;
use skel::SkeletonError;
use skel_input::{ParseError, SourcePos};

#[derive(Debug)]
pub enum Severity {
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "{}", "error".bright_red().bold()),
        }
    }
}

#[derive(Debug)]
pub struct Location {
    pos: SourcePos,
    file: PathBuf,
    text: String,
}

impl Location {
    fn from_pos(pos: SourcePos, file: &Path, contents: &str) -> Option<Location> {
        let text = contents.lines().nth(pos.line.checked_sub(1)?)?;
        Some(Location {
            pos,
            file: file.to_path_buf(),
            text: text.to_string(),
        })
    }
}

#[derive(Debug)]
pub struct SkelError {
    severity: Severity,
    error: SkelErrorType,
}

#[derive(Debug)]
enum SkelErrorType {
    Parse {
        file: PathBuf,
        location: Option<Location>,
        error: ParseError,
    },
    Skeleton {
        file: PathBuf,
        error: SkeletonError,
    },
    IO {
        file: PathBuf,
        error: std::io::Error,
    },
}

impl SkelError {
    pub fn parse(file: &Path, contents: &str, error: ParseError) -> Self {
        let location = error
            .pos()
            .and_then(|pos| Location::from_pos(pos, file, contents));
        SkelError {
            severity: Severity::Error,
            error: SkelErrorType::Parse {
                file: file.to_path_buf(),
                location,
                error,
            },
        }
    }

    pub fn skeleton(file: &Path, error: SkeletonError) -> Self {
        SkelError {
            severity: Severity::Error,
            error: SkelErrorType::Skeleton {
                file: file.to_path_buf(),
                error,
            },
        }
    }

    pub fn io(file: PathBuf, error: std::io::Error) -> Self {
        SkelError {
            severity: Severity::Error,
            error: SkelErrorType::IO { file, error },
        }
    }
}

impl SkelErrorType {
    fn message(&self) -> &'static str {
        match self {
            SkelErrorType::Parse { .. } => "invalid automaton description",
            SkelErrorType::Skeleton { .. } => "failed to build skeleton",
            SkelErrorType::IO { .. } => "failed to access file",
        }
    }
}

impl Display for SkelErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkelErrorType::Parse {
                location: Some(location),
                error,
                ..
            } => write_section(location, error.bold(), f),
            SkelErrorType::Parse {
                file,
                location: None,
                error,
            } => write!(f, "     file: {}\n     reason: {}", file.display(), error),
            SkelErrorType::Skeleton { file, error } => {
                write!(f, "     file: {}\n     reason: {}", file.display(), error)
            }
            SkelErrorType::IO { file, error } => {
                write!(f, "     file: {}\n     reason: {}", file.display(), error)
            }
        }
    }
}

impl Error for SkelError {}

fn write_section<D: Display>(
    location: &Location,
    contents: D,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(
        f,
        " {} {}:{}:{}",
        "-->".blue().bold(),
        location.file.display(),
        location.pos.line,
        location.pos.col
    )?;
    let marker = format!(
        "{}{}",
        " ".repeat(location.pos.col.saturating_sub(1)),
        "^".bright_red().bold()
    );
    let formatted = format!("{}\n{}\n\n{}", location.text.as_str(), marker, contents);
    let lines_iter_padded = std::iter::once("").chain(formatted.lines().chain(std::iter::once("")));
    let lines: Vec<String> = lines_iter_padded
        .map(|l| format!("  {}  {}", "|".blue().bold(), l))
        .collect();
    write!(f, "{}", lines.join("\n"))
}

impl Display for SkelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {}", self.severity, self.error.message())?;
        write!(f, "{}", self.error)
    }
}
