//! Edit scripts: a line-oriented way to drive a document's history.
//!
//! ```text
//! # comments and blank lines are ignored
//! init opening scene
//! push opening scene + choice
//! undo
//! redo
//! save
//! status
//! ```

use std::io::Write;

use anyhow::{bail, Context, Result};
use plotweave_config::{AppConfig, EditSurface};
use plotweave_core::history::{generate_unsaved_id, HistoryConfig};
use plotweave_core::Document;

/// One script instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load a snapshot, resetting history.
    Init(String),
    /// Commit a snapshot as a new edit.
    Push(String),
    Undo,
    Redo,
    /// Mark the present snapshot as saved.
    Save,
    /// Print the current history state.
    Status,
}

/// A command with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub command: Command,
}

/// Parses a whole script.
///
/// # Errors
///
/// Returns an error naming the line of the first malformed command.
pub fn parse_script(source: &str) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let number = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let command = parse_command(trimmed).with_context(|| format!("line {number}"))?;
        lines.push(Line { number, command });
    }
    Ok(lines)
}

fn parse_command(line: &str) -> Result<Command> {
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };
    let command = match keyword {
        "init" | "push" => {
            if rest.is_empty() {
                bail!("`{keyword}` needs snapshot text");
            }
            if keyword == "init" {
                Command::Init(rest.to_string())
            } else {
                Command::Push(rest.to_string())
            }
        }
        "undo" | "redo" | "save" | "status" => {
            if !rest.is_empty() {
                bail!("`{keyword}` takes no arguments, got {rest:?}");
            }
            match keyword {
                "undo" => Command::Undo,
                "redo" => Command::Redo,
                "save" => Command::Save,
                _ => Command::Status,
            }
        }
        other => bail!("unknown command {other:?}"),
    };
    Ok(command)
}

/// Final state after a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub present: String,
    pub undo_count: usize,
    pub redo_count: usize,
    pub modified: bool,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "present={:?} undo={} redo={} modified={}",
            self.present, self.undo_count, self.redo_count, self.modified
        )
    }
}

/// Replays parsed commands against a single document.
pub struct Replayer {
    surface: EditSurface,
    config: HistoryConfig,
    doc: Option<Document<str>>,
}

impl Replayer {
    pub fn new(app: &AppConfig, surface: EditSurface) -> Self {
        Self {
            surface,
            config: HistoryConfig::for_surface(app, surface),
            doc: None,
        }
    }

    /// Runs every command, writing undo/redo results and status lines to
    /// `out`.
    ///
    /// Returns `None` if the script never initialized a document.
    ///
    /// # Errors
    ///
    /// Fails on the first command that cannot be applied (e.g. `push`
    /// before `init`), naming its line.
    pub fn run(&mut self, lines: &[Line], out: &mut impl Write) -> Result<Option<Summary>> {
        for line in lines {
            self.apply(&line.command, out)
                .with_context(|| format!("line {}", line.number))?;
        }
        self.summary()
    }

    fn apply(&mut self, command: &Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Init(text) => {
                if let Some(doc) = self.doc.as_mut() {
                    doc.reload(text.as_str());
                } else {
                    let doc = Document::open(
                        generate_unsaved_id(),
                        "script",
                        self.surface,
                        text.as_str(),
                        &self.config,
                    )?;
                    self.doc = Some(doc);
                }
            }
            Command::Push(text) => self.doc_mut("push")?.commit(text.as_str())?,
            Command::Undo => {
                let prev = self.doc_mut("undo")?.undo()?;
                report(out, "undo", prev.as_deref())?;
            }
            Command::Redo => {
                let next = self.doc_mut("redo")?.redo()?;
                report(out, "redo", next.as_deref())?;
            }
            Command::Save => self.doc_mut("save")?.mark_saved(),
            Command::Status => {
                if let Some(summary) = self.summary()? {
                    writeln!(out, "{summary}")?;
                } else {
                    writeln!(out, "uninitialized")?;
                }
            }
        }
        Ok(())
    }

    fn doc_mut(&mut self, operation: &str) -> Result<&mut Document<str>> {
        match &mut self.doc {
            Some(doc) => Ok(doc),
            None => bail!("`{operation}` before `init`"),
        }
    }

    fn summary(&self) -> Result<Option<Summary>> {
        let Some(doc) = &self.doc else {
            return Ok(None);
        };
        Ok(Some(Summary {
            present: doc.current()?.to_string(),
            undo_count: doc.undo_count(),
            redo_count: doc.redo_count(),
            modified: doc.is_modified(),
        }))
    }
}

fn report(out: &mut impl Write, operation: &str, snapshot: Option<&str>) -> Result<()> {
    match snapshot {
        Some(s) => writeln!(out, "{operation} -> {s:?}")?,
        None => writeln!(out, "{operation} -> (nothing)")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(capacity: usize, script: &str) -> (Option<Summary>, String) {
        let mut app = AppConfig::default();
        app.surface_capacities.insert(EditSurface::NodeGraph, capacity);
        let lines = parse_script(script).unwrap();
        let mut out = Vec::new();
        let summary = Replayer::new(&app, EditSurface::NodeGraph)
            .run(&lines, &mut out)
            .unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let lines = parse_script("# header\n\ninit s0\n  push   s1 with spaces  \nundo\n").unwrap();
        assert_eq!(
            lines,
            vec![
                Line { number: 3, command: Command::Init("s0".into()) },
                Line { number: 4, command: Command::Push("s1 with spaces".into()) },
                Line { number: 5, command: Command::Undo },
            ]
        );
    }

    #[test]
    fn test_parse_reports_line_numbers() {
        let err = parse_script("init a\n\nfrobnicate\n").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 3"), "{msg}");
        assert!(msg.contains("frobnicate"), "{msg}");
    }

    #[test]
    fn test_parse_rejects_missing_text() {
        let err = parse_script("push").unwrap_err();
        assert!(format!("{err:#}").contains("needs snapshot text"));
    }

    #[test]
    fn test_parse_rejects_extra_arguments() {
        let err = parse_script("init a\nundo twice").unwrap_err();
        assert!(format!("{err:#}").contains("takes no arguments"));
    }

    #[test]
    fn test_capacity_scenario_replay() {
        let script = "init s0\npush s1\npush s2\npush s3\npush s4\nstatus\nundo\nstatus\npush s5\n";
        let (summary, out) = replay(3, script);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "present=\"s4\" undo=3 redo=0 modified=true",
                "undo -> \"s3\"",
                "present=\"s3\" undo=2 redo=1 modified=true",
            ]
        );
        let summary = summary.unwrap();
        assert_eq!(summary.present, "s5");
        assert_eq!(summary.undo_count, 3);
        assert_eq!(summary.redo_count, 0);
    }

    #[test]
    fn test_empty_undo_redo_report_nothing() {
        let (summary, out) = replay(5, "init only\nundo\nredo\n");
        assert_eq!(out, "undo -> (nothing)\nredo -> (nothing)\n");
        assert!(!summary.unwrap().modified);
    }

    #[test]
    fn test_save_clears_modified() {
        let (summary, _) = replay(5, "init a\npush b\nsave\n");
        assert!(!summary.unwrap().modified);
    }

    #[test]
    fn test_reinit_resets_history() {
        let (summary, _) = replay(5, "init a\npush b\nundo\ninit c\n");
        let summary = summary.unwrap();
        assert_eq!(summary.present, "c");
        assert_eq!((summary.undo_count, summary.redo_count), (0, 0));
    }

    #[test]
    fn test_push_before_init_fails() {
        let lines = parse_script("status\npush x\n").unwrap();
        let mut out = Vec::new();
        let err = Replayer::new(&AppConfig::default(), EditSurface::BlockTree)
            .run(&lines, &mut out)
            .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 2"), "{msg}");
        assert!(msg.contains("before `init`"), "{msg}");
        assert_eq!(String::from_utf8(out).unwrap(), "uninitialized\n");
    }

    #[test]
    fn test_zero_capacity_rejected_on_init() {
        let mut app = AppConfig::default();
        app.surface_capacities.insert(EditSurface::Settings, 0);
        let lines = parse_script("init a\n").unwrap();
        let err = Replayer::new(&app, EditSurface::Settings)
            .run(&lines, &mut Vec::<u8>::new())
            .unwrap_err();
        assert!(format!("{err:#}").contains("capacity must be positive"));
    }

    #[test]
    fn test_script_without_init_has_no_summary() {
        let (summary, out) = replay(5, "# nothing here\n");
        assert!(summary.is_none());
        assert!(out.is_empty());
    }
}
