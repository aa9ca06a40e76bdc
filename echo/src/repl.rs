//! Line-oriented game loop for the ECHO-7 diagnostic terminal.
//!
//! Reads commands from stdin, dispatches them against the game session, and
//! prints plain text to stdout. No terminal UI, no colors.

use crate::commands::{self, CommandKind, ParseError, ParsedCommand, COMMANDS};
use echo_core::{save_path, AccessError, GameSession, PersistError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HISTORY_LIMIT: usize = 50;
const HISTORY_SHOWN: usize = 10;
const DEFAULT_SAVE_NAME: &str = "autosave";

pub struct Repl {
    session: GameSession,
    history: Vec<String>,
    save_dir: PathBuf,
    running: bool,
}

/// Run the game loop until the player quits or stdin closes.
pub async fn run(save_dir: PathBuf) -> io::Result<()> {
    let mut repl = Repl::new(save_dir);
    repl.print_intro();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while repl.running {
        print!("\n> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        repl.record_history(line);
        repl.dispatch(line, &mut lines).await;
    }

    Ok(())
}

impl Repl {
    fn new(save_dir: PathBuf) -> Self {
        Self {
            session: GameSession::new(),
            history: Vec::new(),
            save_dir,
            running: true,
        }
    }

    fn print_intro(&self) {
        println!("{}", "=".repeat(60));
        println!("              ECHO PROTOCOL v2.1.7");
        println!("         Memory Recovery System Online");
        println!("{}", "=".repeat(60));
        println!();
        println!("[SYSTEM] Initializing diagnostic terminal...");
        println!("[SYSTEM] Connecting to damaged AI core ECHO-7...");
        println!("[WARNING] Memory corruption detected: {:.0}% integrity",
            self.session.state().integrity() * 100.0
        );
        println!();
        println!("You are a diagnostic technician investigating the failure");
        println!("of research AI ECHO-7. Navigate its memory sectors, recover");
        println!("data fragments, and piece together what happened.");
        println!();
        println!("Type 'help' for available commands.");
    }

    fn record_history(&mut self, line: &str) {
        self.history.push(line.to_string());
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }

    async fn dispatch<I>(&mut self, line: &str, lines: &mut I)
    where
        I: Iterator<Item = io::Result<String>>,
    {
        match commands::parse(line) {
            Ok(parsed) => self.execute(parsed, lines).await,
            Err(ParseError::Unknown(name)) => {
                println!("[ERROR] Unknown command: '{name}'");
                if let Some(suggestion) = commands::suggest(&name) {
                    println!("Did you mean '{suggestion}'?");
                }
                println!("Type 'help' for available commands.");
            }
            Err(err) => println!("[ERROR] {err}"),
        }
    }

    async fn execute<I>(&mut self, cmd: ParsedCommand, lines: &mut I)
    where
        I: Iterator<Item = io::Result<String>>,
    {
        match cmd.kind {
            CommandKind::Help => self.cmd_help(cmd.args.first().map(String::as_str)),
            CommandKind::Scan => self.cmd_scan(),
            CommandKind::Navigate => self.cmd_navigate(&cmd.args[0]),
            CommandKind::Read => self.cmd_read(&cmd.args[0]),
            CommandKind::List => self.cmd_list(),
            CommandKind::Analyze => println!("\n{}", self.session.analysis_report()),
            CommandKind::Status => println!("\n{}", self.session.status_report()),
            CommandKind::Inventory => self.cmd_inventory(),
            CommandKind::Save => {
                let name = cmd.args.first().map(String::as_str).unwrap_or(DEFAULT_SAVE_NAME);
                self.cmd_save(name).await;
            }
            CommandKind::Load => {
                let name = cmd.args.first().map(String::as_str).unwrap_or(DEFAULT_SAVE_NAME);
                self.cmd_load(name).await;
            }
            CommandKind::Unlock => self.cmd_unlock(&cmd.args[0], &cmd.args[1]),
            CommandKind::History => self.cmd_history(),
            CommandKind::Quit => self.cmd_quit(lines).await,
        }
    }

    // ========================================================================
    // Command handlers
    // ========================================================================

    fn cmd_help(&self, topic: Option<&str>) {
        if let Some(topic) = topic {
            match commands::find(&topic.to_lowercase()) {
                Some(spec) => {
                    println!("\n{} - {}", spec.name, spec.description);
                    println!("Usage: {}", spec.usage);
                    if !spec.aliases.is_empty() {
                        println!("Aliases: {}", spec.aliases.join(", "));
                    }
                }
                None => println!("[ERROR] No such command: '{topic}'"),
            }
            return;
        }

        println!("\n[HELP] Available commands");
        println!("{}", "-".repeat(50));
        for spec in COMMANDS {
            println!("  {:<22} {}", spec.usage, spec.description);
        }
    }

    fn cmd_scan(&mut self) {
        match self.session.scan() {
            Ok(report) => println!("\n{report}"),
            Err(err) => self.print_access_error(&err),
        }
    }

    fn cmd_navigate(&mut self, target: &str) {
        let target_id = self
            .session
            .resolve_sector_id(target)
            .unwrap_or_else(|| target.to_uppercase());

        match self.session.navigate(&target_id) {
            Ok(msg) => {
                println!("[SYSTEM] {msg}");
                if let Ok(description) = self.session.describe_current() {
                    println!("\n{description}");
                }
            }
            Err(err) => self.print_access_error(&err),
        }
    }

    fn cmd_read(&mut self, fragment_id: &str) {
        match self.session.read_fragment(fragment_id) {
            Ok(view) => {
                println!("\n[MEMORY FRAGMENT: {}]", view.id);
                println!("{}", "-".repeat(50));
                println!("{}", view.content);
                if let Some(clue) = view.clue_discovered {
                    println!("\n[CLUE DISCOVERED] {clue}");
                }
            }
            Err(err) => self.print_access_error(&err),
        }
    }

    fn cmd_list(&mut self) {
        match self.session.list_fragments() {
            Ok(fragments) if fragments.is_empty() => {
                println!("[SYSTEM] No accessible fragments in this sector.");
            }
            Ok(fragments) => {
                println!(
                    "\n[AVAILABLE FRAGMENTS IN {}]",
                    self.session.current_sector_name()
                );
                println!("{}", "-".repeat(50));
                for (id, preview) in fragments {
                    println!("  {id:<20} | {preview}");
                }
            }
            Err(err) => self.print_access_error(&err),
        }
    }

    fn cmd_inventory(&self) {
        let clues = self.session.state().discovered_clues();
        println!("\n[INVENTORY] Discovered Evidence ({} items)", clues.len());
        println!("{}", "-".repeat(50));
        if clues.is_empty() {
            println!("  No evidence collected yet.");
        } else {
            for clue in clues {
                println!("  - {clue}");
            }
        }
        println!(
            "\nPuzzles solved: {}",
            self.session.state().solved_puzzles().len()
        );
    }

    async fn cmd_save(&mut self, name: &str) {
        if let Err(err) = tokio::fs::create_dir_all(&self.save_dir).await {
            println!("[ERROR] Save failed: {err}");
            return;
        }
        let path = save_path(&self.save_dir, name);
        match self.session.save(&path).await {
            Ok(()) => println!("[SYSTEM] Progress saved to {}", path.display()),
            Err(err) => println!("[ERROR] Save failed: {err}"),
        }
    }

    async fn cmd_load(&mut self, name: &str) {
        let path = save_path(&self.save_dir, name);
        match GameSession::load(&path).await {
            Ok(session) => {
                self.session = session;
                println!("[SYSTEM] Progress loaded from {}", path.display());
                println!(
                    "[SYSTEM] Resuming in sector: {}",
                    self.session.current_sector_name()
                );
            }
            Err(PersistError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                println!("[ERROR] No save named '{name}' found.");
            }
            Err(err) => println!("[ERROR] Load failed: {err}"),
        }
    }

    fn cmd_unlock(&mut self, sector: &str, key: &str) {
        let sector_id = self
            .session
            .resolve_sector_id(sector)
            .unwrap_or_else(|| sector.to_uppercase());

        match self.session.unlock_sector(&sector_id, key) {
            Ok(msg) => println!("[SUCCESS] {msg}"),
            Err(err) => self.print_access_error(&err),
        }
    }

    fn cmd_history(&self) {
        println!("\n[HISTORY] Recent commands");
        let start = self.history.len().saturating_sub(HISTORY_SHOWN);
        for (i, entry) in self.history[start..].iter().enumerate() {
            println!("  {:>2}. {entry}", start + i + 1);
        }
    }

    async fn cmd_quit<I>(&mut self, lines: &mut I)
    where
        I: Iterator<Item = io::Result<String>>,
    {
        print!("[SYSTEM] Save progress before shutdown? (yes/no/cancel)\n> ");
        let _ = io::stdout().flush();

        let answer = match lines.next() {
            Some(Ok(line)) => line.trim().to_lowercase(),
            // stdin closed; shut down without saving.
            _ => "no".to_string(),
        };

        match answer.as_str() {
            "yes" | "y" => {
                self.cmd_save(DEFAULT_SAVE_NAME).await;
                self.shutdown();
            }
            "no" | "n" => self.shutdown(),
            _ => println!("[SYSTEM] Shutdown cancelled."),
        }
    }

    fn shutdown(&mut self) {
        println!("\n[SYSTEM] Disconnecting from ECHO-7...");
        println!("[SYSTEM] Diagnostic terminal offline.");
        self.running = false;
    }

    fn print_access_error(&self, err: &AccessError) {
        if err.is_access_denied() {
            println!("[ACCESS DENIED] {err}");
        } else {
            println!("[ERROR] {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_capped() {
        let mut repl = Repl::new(PathBuf::from("saves"));
        for i in 0..(HISTORY_LIMIT + 10) {
            repl.record_history(&format!("scan {i}"));
        }
        assert_eq!(repl.history.len(), HISTORY_LIMIT);
        assert_eq!(repl.history.last().map(String::as_str), Some("scan 59"));
    }
}
