//! Parsing of shell input lines into typed commands

use crate::error::{ArborError, Result};
use crate::version::VersionId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Create { name: String },
    Read { name: String },
    Insert { name: String, content: String },
    Update { name: String, content: String },
    Snapshot { name: String, message: Option<String> },
    Rollback { name: String, version: Option<VersionId> },
    History { name: String },
    RecentFiles { k: usize },
    BiggestTrees { k: usize },
    Exit,
}

/// Split off the first whitespace-delimited token
fn token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(s.split_at(s.find(char::is_whitespace).unwrap_or(s.len())))
}

fn usage(form: &str) -> ArborError {
    ArborError::Validation(format!("Invalid command. Usage: {}", form))
}

/// Free text after the resource name, minus the single separating space
fn free_text(rest: &str) -> Option<String> {
    if rest.is_empty() || rest == " " {
        return None;
    }
    Some(rest.strip_prefix(' ').unwrap_or(rest).to_string())
}

fn parse_k(rest: &str, form: &str) -> Result<usize> {
    let (raw, _) = token(rest).ok_or_else(|| usage(form))?;
    let k: i64 = raw.parse().map_err(|_| usage(form))?;
    if k <= 0 {
        return Err(ArborError::Validation(
            "Invalid command. k must be positive.".to_string(),
        ));
    }
    usize::try_from(k).map_err(|_| usage(form))
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let Some((keyword, rest)) = token(line) else {
            return Ok(None);
        };

        let command = match keyword {
            "CREATE" => {
                let (name, _) = token(rest).ok_or_else(|| usage("CREATE <filename>"))?;
                Command::Create { name: name.to_string() }
            }
            "READ" => {
                let (name, _) = token(rest).ok_or_else(|| usage("READ <filename>"))?;
                Command::Read { name: name.to_string() }
            }
            "INSERT" | "UPDATE" => {
                let form = format!("{} <filename> <content>", keyword);
                let (name, rest) = token(rest).ok_or_else(|| usage(&form))?;
                let content = free_text(rest).ok_or_else(|| usage(&form))?;
                let name = name.to_string();
                if keyword == "INSERT" {
                    Command::Insert { name, content }
                } else {
                    Command::Update { name, content }
                }
            }
            "SNAPSHOT" => {
                let (name, rest) =
                    token(rest).ok_or_else(|| usage("SNAPSHOT <filename> [message]"))?;
                Command::Snapshot {
                    name: name.to_string(),
                    message: free_text(rest),
                }
            }
            "ROLLBACK" => {
                let form = "ROLLBACK <filename> [versionID]";
                let (name, rest) = token(rest).ok_or_else(|| usage(form))?;
                let version = match token(rest) {
                    None => None,
                    Some((raw, _)) => {
                        let id: i64 = raw.parse().map_err(|_| usage(form))?;
                        if id < 0 {
                            return Err(ArborError::Validation(
                                "VersionID must be non-negative.".to_string(),
                            ));
                        }
                        Some(VersionId::try_from(id).map_err(|_| usage(form))?)
                    }
                };
                Command::Rollback {
                    name: name.to_string(),
                    version,
                }
            }
            "HISTORY" => {
                let (name, _) = token(rest).ok_or_else(|| usage("HISTORY <filename>"))?;
                Command::History { name: name.to_string() }
            }
            "RECENT_FILES" => Command::RecentFiles {
                k: parse_k(rest, "RECENT_FILES <k>")?,
            },
            "BIGGEST_TREES" => Command::BiggestTrees {
                k: parse_k(rest, "BIGGEST_TREES <k>")?,
            },
            "EXIT" => Command::Exit,
            other => {
                return Err(ArborError::Validation(format!(
                    "Unknown command '{}'.",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    fn parse_err(line: &str) -> String {
        Command::parse(line).unwrap_err().to_string()
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   \t").unwrap(), None);
    }

    #[test]
    fn test_content_keeps_inner_spacing() {
        assert_eq!(
            parse("INSERT notes  two spaces"),
            Command::Insert {
                name: "notes".into(),
                content: " two spaces".into()
            }
        );
        assert_eq!(
            parse("UPDATE notes hello world"),
            Command::Update {
                name: "notes".into(),
                content: "hello world".into()
            }
        );
    }

    #[test]
    fn test_missing_content() {
        assert!(parse_err("INSERT notes").contains("Usage: INSERT"));
        assert!(parse_err("UPDATE notes ").contains("Usage: UPDATE"));
        assert!(parse_err("UPDATE").contains("Usage: UPDATE"));
    }

    #[test]
    fn test_snapshot_message_optional() {
        assert_eq!(
            parse("SNAPSHOT notes"),
            Command::Snapshot {
                name: "notes".into(),
                message: None
            }
        );
        assert_eq!(
            parse("SNAPSHOT notes first draft"),
            Command::Snapshot {
                name: "notes".into(),
                message: Some("first draft".into())
            }
        );
    }

    #[test]
    fn test_rollback_forms() {
        assert_eq!(
            parse("ROLLBACK notes"),
            Command::Rollback {
                name: "notes".into(),
                version: None
            }
        );
        assert_eq!(
            parse("ROLLBACK notes 3"),
            Command::Rollback {
                name: "notes".into(),
                version: Some(3)
            }
        );
        assert!(parse_err("ROLLBACK notes -1").contains("non-negative"));
        assert!(parse_err("ROLLBACK notes three").contains("Usage: ROLLBACK"));
    }

    #[test]
    fn test_top_k_arguments() {
        assert_eq!(parse("RECENT_FILES 2"), Command::RecentFiles { k: 2 });
        assert_eq!(parse("BIGGEST_TREES 1"), Command::BiggestTrees { k: 1 });
        assert!(parse_err("RECENT_FILES 0").contains("k must be positive"));
        assert!(parse_err("BIGGEST_TREES -4").contains("k must be positive"));
        assert!(parse_err("RECENT_FILES many").contains("Usage: RECENT_FILES"));
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_err("DELETE notes").contains("Unknown command 'DELETE'"));
        assert_eq!(parse("EXIT"), Command::Exit);
    }
}
