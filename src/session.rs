//! Interactive history form.
//!
//! Each input line is one user event. Mutations go straight to the
//! in-memory [`RecordStore`]; nothing reaches disk unless the user types
//! `save`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Utc;
use medhist_lib::document::write_export;
use medhist_lib::{ImportSummary, Importer, RecordStore, Status};
use tracing::debug;

use crate::error::MedHistError;
use crate::format::format_table;

const HELP: &str = "\
Commands:
  list                 show active conditions
  all                  show every condition, including removed ones
  add                  add a blank condition
  name ID TEXT         rename a condition
  status ID yes|no     set whether the patient has it
  since ID TEXT        set the onset
  notes ID TEXT        set the notes
  remove ID            remove a condition
  save [DIR]           export active conditions to medical-history-<date>.json
  load FILE            replace everything with a saved file
  count                show the active count
  prune                forget removed conditions for good
  help                 show this help
  quit                 end the session";

/// One parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    List,
    All,
    Add,
    Name(u64, String),
    Status(u64, Status),
    Since(u64, String),
    Notes(u64, String),
    Remove(u64),
    Save(Option<PathBuf>),
    Load(PathBuf),
    Count,
    Prune,
    Help,
    Quit,
}

fn split_word(text: &str) -> (&str, &str) {
    text.split_once(char::is_whitespace)
        .map_or((text, ""), |(word, rest)| (word, rest.trim()))
}

fn parse_id(text: &str) -> Result<u64, MedHistError> {
    if text.is_empty() {
        return Err(MedHistError::validation("id", "missing entry id"));
    }
    text.trim_start_matches('#')
        .parse()
        .map_err(|_| MedHistError::validation("id", format!("not an entry id: {text}")))
}

/// Split `ID TEXT`; the text is the rest of the line and may be empty.
fn parse_id_text(args: &str) -> Result<(u64, String), MedHistError> {
    let (id, text) = split_word(args);
    Ok((parse_id(id)?, text.to_string()))
}

impl FromStr for SessionCommand {
    type Err = MedHistError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, args) = split_word(line.trim());
        match word.to_lowercase().as_str() {
            "list" | "ls" => Ok(Self::List),
            "all" => Ok(Self::All),
            "add" => Ok(Self::Add),
            "name" => parse_id_text(args).map(|(id, text)| Self::Name(id, text)),
            "status" => {
                let (id, value) = split_word(args);
                Ok(Self::Status(parse_id(id)?, value.parse()?))
            }
            "since" => parse_id_text(args).map(|(id, text)| Self::Since(id, text)),
            "notes" => parse_id_text(args).map(|(id, text)| Self::Notes(id, text)),
            "remove" | "rm" => parse_id(args).map(Self::Remove),
            "save" => Ok(Self::Save(
                (!args.is_empty()).then(|| PathBuf::from(args)),
            )),
            "load" => {
                if args.is_empty() {
                    Err(MedHistError::validation("load", "missing file path"))
                } else {
                    Ok(Self::Load(PathBuf::from(args)))
                }
            }
            "count" => Ok(Self::Count),
            "prune" => Ok(Self::Prune),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(MedHistError::validation(
                "command",
                format!("unknown command '{other}' (try help)"),
            )),
        }
    }
}

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One run of the history form.
pub struct Session {
    store: RecordStore,
    importer: Importer,
    export_dir: PathBuf,
    prompt: bool,
}

impl Session {
    #[must_use]
    pub fn new(store: RecordStore, export_dir: PathBuf) -> Self {
        Self {
            store,
            importer: Importer::new(),
            export_dir,
            prompt: false,
        }
    }

    /// Print a `> ` prompt before each line (for terminals).
    #[must_use]
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub const fn importer(&self) -> &Importer {
        &self.importer
    }

    /// Load a document before the session starts.
    ///
    /// # Errors
    ///
    /// Returns the read or parse error; the store is left untouched.
    pub fn preload(&mut self, path: &std::path::Path) -> medhist_lib::Result<ImportSummary> {
        self.importer.import_file(&mut self.store, path)
    }

    /// Read commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<()> {
        self.render(out, false)?;
        let mut line = String::new();
        loop {
            if self.prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.parse::<SessionCommand>() {
                Ok(command) => {
                    if self.execute(command, out)? == Flow::Quit {
                        break;
                    }
                }
                Err(err) => writeln!(out, "{err}")?,
            }
        }
        debug!(entries = self.store.len(), "Session ended");
        Ok(())
    }

    /// Apply one command and report the result to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing output fails.
    pub fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> io::Result<Flow> {
        match command {
            SessionCommand::List => self.render(out, false)?,
            SessionCommand::All => self.render(out, true)?,
            SessionCommand::Add => match self.store.add() {
                Ok(id) => writeln!(out, "Added #{id} ({} active)", self.store.active_count())?,
                Err(err) => writeln!(out, "{err}")?,
            },
            SessionCommand::Name(id, text) => {
                let changed = self.store.set_name(id, text);
                report_edit(out, id, "name", changed)?;
            }
            SessionCommand::Status(id, status) => {
                let changed = self.store.set_status(id, status);
                report_edit(out, id, "status", changed)?;
            }
            SessionCommand::Since(id, text) => {
                let changed = self.store.set_since(id, text);
                report_edit(out, id, "since", changed)?;
            }
            SessionCommand::Notes(id, text) => {
                let changed = self.store.set_notes(id, text);
                report_edit(out, id, "notes", changed)?;
            }
            SessionCommand::Remove(id) => {
                if self.store.remove(id) {
                    writeln!(out, "Removed #{id} ({} active)", self.store.active_count())?;
                } else {
                    writeln!(out, "No active entry #{id}; nothing changed")?;
                }
            }
            SessionCommand::Save(dir) => {
                let dir = dir.unwrap_or_else(|| self.export_dir.clone());
                match write_export(&self.store, &dir, Utc::now()) {
                    Ok(path) => writeln!(
                        out,
                        "Saved {} entries to {}",
                        self.store.active_entries().count(),
                        path.display()
                    )?,
                    Err(err) => writeln!(out, "Error saving file: {err}")?,
                }
            }
            SessionCommand::Load(path) => {
                match self.importer.import_file(&mut self.store, &path) {
                    Ok(ImportSummary {
                        entries,
                        active_count,
                    }) => {
                        writeln!(out, "Loaded {entries} entries ({active_count} active)")?;
                        self.render(out, false)?;
                    }
                    Err(err) => writeln!(
                        out,
                        "Error loading file: {err}. Please ensure it's a valid JSON file."
                    )?,
                }
            }
            SessionCommand::Count => writeln!(out, "{} active", self.store.active_count())?,
            SessionCommand::Prune => {
                let pruned = self.store.prune_inactive();
                writeln!(out, "Pruned {pruned} removed entries")?;
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn render<W: Write>(&self, out: &mut W, include_removed: bool) -> io::Result<()> {
        let rows: Vec<_> = if include_removed {
            self.store.entries().iter().collect()
        } else {
            self.store.active_entries().collect()
        };
        write!(out, "{}", format_table(&rows, self.store.active_count()))
    }
}

fn report_edit<W: Write>(out: &mut W, id: u64, field: &str, changed: bool) -> io::Result<()> {
    if changed {
        writeln!(out, "Updated #{id} {field}")
    } else {
        writeln!(out, "No entry #{id}; nothing changed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medhist_lib::ImportOutcome;
    use std::io::Cursor;

    fn init_logging() {
        crate::logging::init_test_logging();
    }

    fn run_lines(session: &mut Session, input: &str) -> String {
        let mut out = Vec::new();
        session.run(Cursor::new(input.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("add".parse::<SessionCommand>().unwrap(), SessionCommand::Add);
        assert_eq!(
            "name 3 Blood  Transfusion ".parse::<SessionCommand>().unwrap(),
            SessionCommand::Name(3, "Blood  Transfusion".to_string())
        );
        assert_eq!(
            "notes #4".parse::<SessionCommand>().unwrap(),
            SessionCommand::Notes(4, String::new())
        );
        assert_eq!(
            "STATUS 2 yes".parse::<SessionCommand>().unwrap(),
            SessionCommand::Status(2, Status::Yes)
        );
        assert_eq!(
            "save".parse::<SessionCommand>().unwrap(),
            SessionCommand::Save(None)
        );
        assert_eq!(
            "load my file.json".parse::<SessionCommand>().unwrap(),
            SessionCommand::Load(PathBuf::from("my file.json"))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("remove".parse::<SessionCommand>().is_err());
        assert!("remove x".parse::<SessionCommand>().is_err());
        assert!("status 2 maybe".parse::<SessionCommand>().is_err());
        assert!("load".parse::<SessionCommand>().is_err());
        assert!("frobnicate".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn test_session_edits_store() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(RecordStore::seeded(), dir.path().to_path_buf());
        let output = run_lines(
            &mut session,
            "add\nname 12 Gout\nstatus 12 yes\nremove 3\nnotes 99 nope\nbogus\n",
        );

        let store = session.store();
        assert_eq!(store.active_count(), 11);
        assert_eq!(store.get(12).unwrap().name, "Gout");
        assert_eq!(store.get(12).unwrap().status, Status::Yes);
        assert!(!store.get(3).unwrap().active);

        assert!(output.starts_with("PAST HISTORY  11 active\n"));
        assert!(output.contains("Added #12 (12 active)"));
        assert!(output.contains("Removed #3 (11 active)"));
        assert!(output.contains("No entry #99; nothing changed"));
        assert!(output.contains("unknown command 'bogus'"));
    }

    #[test]
    fn test_quit_stops_reading() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(RecordStore::seeded(), dir.path().to_path_buf());
        run_lines(&mut session, "quit\nadd\n");
        assert_eq!(session.store().len(), 11);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(RecordStore::seeded(), dir.path().to_path_buf());
        run_lines(&mut session, "remove 3\nremove 10\nsave\n");

        let saved: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(saved.len(), 1);
        let name = saved[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("medical-history-"));
        assert!(name.ends_with(".json"));

        let mut fresh = Session::new(RecordStore::seeded(), dir.path().to_path_buf());
        let output = run_lines(&mut fresh, &format!("load {}\nall\n", saved[0].display()));
        assert!(output.contains("Loaded 9 entries (9 active)"));
        assert_eq!(fresh.store().len(), 9);
        assert_eq!(fresh.store().active_count(), 9);
        assert!(!output.contains("(removed)"));
    }

    #[test]
    fn test_failed_load_keeps_store() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();

        let mut session = Session::new(RecordStore::seeded(), dir.path().to_path_buf());
        let output = run_lines(&mut session, &format!("remove 1\nload {}\n", bad.display()));

        assert!(output.contains("Error loading file"));
        assert_eq!(session.store().len(), 11);
        assert_eq!(session.store().active_count(), 10);
        assert!(matches!(
            session.importer().last_outcome(),
            Some(ImportOutcome::Rejected { .. })
        ));
    }

    #[test]
    fn test_load_with_largest_id_is_refused() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("huge.json");
        std::fs::write(
            &file,
            r#"{"activeCount": 1, "entries": [{"id": 18446744073709551615, "status": "No"}]}"#,
        )
        .unwrap();

        let mut session = Session::new(RecordStore::seeded(), dir.path().to_path_buf());
        let output = run_lines(&mut session, &format!("load {}
add
", file.display()));

        assert!(output.contains("Error loading file"));
        assert!(output.contains("Added #12 (12 active)"));
        assert_eq!(session.store().len(), 12);
    }

    #[test]
    fn test_prune_and_all() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(RecordStore::seeded(), dir.path().to_path_buf());
        let output = run_lines(&mut session, "remove 2\nall\nprune\nadd\n");
        assert!(output.contains("(removed)"));
        assert!(output.contains("Pruned 1 removed entries"));
        assert!(output.contains("Added #12"));
        assert_eq!(session.store().len(), 11);
    }
}
