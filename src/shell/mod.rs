//! Line-oriented command shell over a [`Registry`]
//!
//! Each input line is parsed into a [`Command`], executed against the
//! registry and reported either as plain text or as one JSON object per line.
//! Failures are reported and never end the session; only `EXIT` or end of
//! input does.

mod command;

pub use command::Command;

use std::fmt;
use std::io::{self, BufRead, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::registry::{Registry, ResourceRank};
use crate::version::{VersionId, VersionNode};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub version: VersionId,
    pub snapshot_at: Option<DateTime<Utc>>,
    pub message: String,
}

impl From<&VersionNode> for HistoryEntry {
    fn from(node: &VersionNode) -> Self {
        Self {
            version: node.id(),
            snapshot_at: node.snapshot_at(),
            message: node.message().to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankedBy {
    Recent,
    Biggest,
}

/// Result of one successfully executed command
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Outcome {
    Created {
        name: String,
    },
    Content {
        name: String,
        version: VersionId,
        content: String,
    },
    Written {
        name: String,
        version: VersionId,
        parent: Option<VersionId>,
        branched: bool,
    },
    Snapshotted {
        name: String,
        version: VersionId,
        message: String,
    },
    RolledBack {
        name: String,
        version: VersionId,
        to_parent: bool,
    },
    History {
        name: String,
        versions: Vec<HistoryEntry>,
    },
    Ranking {
        by: RankedBy,
        entries: Vec<ResourceRank>,
    },
    Exit,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created { name } => write!(f, "File '{}' created successfully.", name),
            Outcome::Content {
                name,
                version,
                content,
            } => write!(f, "Content of '{}' (Version {}):\n{}", name, version, content),
            Outcome::Written {
                name,
                version,
                parent,
                branched,
            } => {
                let parent = parent.map_or_else(|| "none".to_string(), |p| p.to_string());
                if *branched {
                    write!(
                        f,
                        "New version {} created for '{}'. Parent is version {}.",
                        version, name, parent
                    )
                } else {
                    write!(
                        f,
                        "Version {} of '{}' updated in place. Parent is version {}.",
                        version, name, parent
                    )
                }
            }
            Outcome::Snapshotted { name, message, .. } => {
                write!(f, "Snapshot created for '{}' with message: {}", name, message)
            }
            Outcome::RolledBack {
                name,
                version,
                to_parent,
            } => {
                if *to_parent {
                    write!(
                        f,
                        "Active version for '{}' set to parent version {}.",
                        name, version
                    )
                } else {
                    write!(f, "Active version for '{}' set to {}.", name, version)
                }
            }
            Outcome::History { versions, .. } => {
                let lines: Vec<String> = versions
                    .iter()
                    .map(|v| {
                        let at = v.snapshot_at.map(timestamp).unwrap_or_default();
                        format!("{} {} {}", v.version, at, v.message)
                    })
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            Outcome::Ranking { by, entries } => {
                let lines: Vec<String> = entries
                    .iter()
                    .map(|e| match by {
                        RankedBy::Recent => format!("{} {}", e.name, timestamp(e.last_modified)),
                        RankedBy::Biggest => format!("{} {}", e.name, e.total_versions),
                    })
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            Outcome::Exit => write!(f, "Exiting shell. Goodbye!"),
        }
    }
}

pub struct Shell {
    registry: Registry,
    format: OutputFormat,
}

impl Shell {
    pub fn new(registry: Registry, format: OutputFormat) -> Self {
        Self { registry, format }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run one command against the registry
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let outcome = match command {
            Command::Create { name } => {
                self.registry.create(&name)?;
                Outcome::Created { name }
            }
            Command::Read { name } => {
                let content = self.registry.read(&name)?.to_string();
                let version = self.active_id(&name);
                Outcome::Content {
                    name,
                    version,
                    content,
                }
            }
            Command::Insert { name, content } => {
                let before = self.total_versions(&name);
                let node = self.registry.insert(&name, &content)?;
                Self::written(name, node, before)
            }
            Command::Update { name, content } => {
                let before = self.total_versions(&name);
                let node = self.registry.update(&name, &content)?;
                Self::written(name, node, before)
            }
            Command::Snapshot { name, message } => {
                let node = self.registry.snapshot(&name, message.as_deref())?;
                Outcome::Snapshotted {
                    version: node.id(),
                    message: node.message().to_string(),
                    name,
                }
            }
            Command::Rollback { name, version } => {
                let node = match version {
                    Some(id) => self.registry.rollback_to(&name, id)?,
                    None => self.registry.rollback_to_parent(&name)?,
                };
                Outcome::RolledBack {
                    version: node.id(),
                    to_parent: version.is_none(),
                    name,
                }
            }
            Command::History { name } => {
                let versions = self
                    .registry
                    .history(&name)?
                    .into_iter()
                    .map(HistoryEntry::from)
                    .collect();
                Outcome::History { name, versions }
            }
            Command::RecentFiles { k } => Outcome::Ranking {
                by: RankedBy::Recent,
                entries: self.registry.recent(k)?,
            },
            Command::BiggestTrees { k } => Outcome::Ranking {
                by: RankedBy::Biggest,
                entries: self.registry.biggest(k)?,
            },
            Command::Exit => Outcome::Exit,
        };
        Ok(outcome)
    }

    /// Parse, execute and report one line. Returns false once the session should end.
    pub fn run_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let result = match Command::parse(line) {
            Ok(None) => return Ok(true),
            Ok(Some(command)) => self.execute(command),
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                self.report(&outcome, out)?;
                Ok(outcome != Outcome::Exit)
            }
            Err(e) => {
                log::warn!("command rejected: {:?}: {}", line.trim(), e);
                match self.format {
                    OutputFormat::Text => writeln!(out, "Error: {}", e)?,
                    OutputFormat::Json => {
                        writeln!(out, "{}", serde_json::json!({ "error": e.to_string() }))?
                    }
                }
                Ok(true)
            }
        }
    }

    /// Process lines until `EXIT` or end of input
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        for line in input.lines() {
            if !self.run_line(&line?, out)? {
                break;
            }
        }
        out.flush()
    }

    fn report(&self, outcome: &Outcome, out: &mut impl Write) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                // empty history/ranking prints nothing
                let text = outcome.to_string();
                if !text.is_empty() {
                    writeln!(out, "{}", text)?;
                }
            }
            OutputFormat::Json => {
                let json = serde_json::to_string(outcome)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                writeln!(out, "{}", json)?;
            }
        }
        Ok(())
    }

    fn written(name: String, node: &VersionNode, versions_before: usize) -> Outcome {
        Outcome::Written {
            version: node.id(),
            parent: node.parent(),
            branched: node.id() >= versions_before,
            name,
        }
    }

    fn total_versions(&self, name: &str) -> usize {
        self.registry.get(name).map_or(0, |r| r.total_versions())
    }

    fn active_id(&self, name: &str) -> VersionId {
        self.registry.get(name).map_or(0, |r| r.active().id())
    }
}
