//! Headless mode for the gift.
//!
//! A line-oriented interface over [`HeadlessGift`] for scripts and automated
//! testing. Timed screens play on virtual time.

use std::io::{self, BufRead, Write};

use gift_core::{
    Clock, HeadlessGift, Rasterizer, Screen, SessionConfig, SessionError, StorageBackend,
};

const HELP: &[&str] = &[
    "  #go <screen>   - Navigate (home, present-selection, song, ...)",
    "  #save <text>   - Save a message on the current screen",
    "  #items         - List saved items",
    "  #memories      - List photo memories",
    "  #delete <id>   - Delete a saved item or memory",
    "  #clear         - Remove all saved items and memories",
    "  #play          - Play the heart wall to the end",
    "  #status        - Show current status",
    "  #quit          - Exit",
    "  (anything else is saved as a message)",
];

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run the gift in headless mode, reading commands from stdin.
pub fn run_headless(config: SessionConfig) -> Result<(), SessionError> {
    let mut gift = HeadlessGift::open(config);

    println!("=== Gift Headless Mode ===");
    println!("[STATUS] {}", gift.status());
    println!();
    println!("Commands:");
    for line in HELP {
        println!("{line}");
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let flow = process_line(&mut gift, &line, &mut stdout);
        stdout.flush().ok();
        if flow == Flow::Quit {
            break;
        }
    }

    Ok(())
}

/// Handle one input line, writing responses to `out`.
pub fn process_line<S, C, R>(
    gift: &mut HeadlessGift<S, C, R>,
    line: &str,
    out: &mut impl Write,
) -> Flow
where
    S: StorageBackend + Clone,
    C: Clock + Clone,
    R: Rasterizer,
{
    let line = line.trim();
    if line.is_empty() {
        return Flow::Continue;
    }

    let Some(command) = line.strip_prefix('#') else {
        save(gift, line, out);
        return Flow::Continue;
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    let result = match name {
        "quit" | "exit" => {
            writeln!(out, "Goodbye!").ok();
            return Flow::Quit;
        }
        "go" => go(gift, arg, out),
        "save" if !arg.is_empty() => {
            save(gift, arg, out);
            Ok(())
        }
        "save" => writeln!(out, "[ERROR] Usage: #save <text>"),
        "items" => {
            let items = gift.items();
            writeln!(out, "[ITEMS] {}", items.len()).ok();
            for item in items {
                let preview: String = item.data.chars().take(60).collect();
                writeln!(
                    out,
                    "  {} {:?} {} {} {preview}",
                    item.id, item.kind, item.page_id, item.timestamp
                )
                .ok();
            }
            Ok(())
        }
        "memories" => {
            let memories = gift.memories();
            writeln!(out, "[MEMORIES] {}", memories.len()).ok();
            for memory in memories {
                writeln!(
                    out,
                    "  {} {} {} {}",
                    memory.id, memory.page_id, memory.timestamp, memory.title
                )
                .ok();
            }
            Ok(())
        }
        "delete" if !arg.is_empty() => {
            if gift.delete(arg) {
                writeln!(out, "[DELETED] {arg}")
            } else {
                writeln!(out, "[ERROR] No item with id {arg}")
            }
        }
        "delete" => writeln!(out, "[ERROR] Usage: #delete <id>"),
        "clear" => {
            gift.clear();
            writeln!(out, "[CLEARED]")
        }
        "play" => match gift.play() {
            Ok(report) => {
                writeln!(
                    out,
                    "[PLAYED] placed {} clusters in {:.1}s, completed: {}",
                    report.placed,
                    report.elapsed.as_secs_f32(),
                    report.completed
                )
                .ok();
                if let Some(memory) = report.memory {
                    writeln!(out, "[MEMORY] {} {}", memory.id, memory.title).ok();
                }
                Ok(())
            }
            Err(e) => writeln!(out, "[ERROR] {e}"),
        },
        "status" => writeln!(out, "[STATUS] {}", gift.status()),
        "help" => {
            writeln!(out, "[HELP]").ok();
            for line in HELP {
                writeln!(out, "{line}").ok();
            }
            Ok(())
        }
        _ => writeln!(out, "[ERROR] Unknown command. Type #help for help."),
    };

    if let Err(e) = result {
        tracing::warn!("could not write headless output: {e}");
    }
    Flow::Continue
}

fn go<S, C, R>(gift: &mut HeadlessGift<S, C, R>, arg: &str, out: &mut impl Write) -> io::Result<()>
where
    S: StorageBackend + Clone,
    C: Clock + Clone,
    R: Rasterizer,
{
    let target: Screen = match arg.parse() {
        Ok(screen) => screen,
        Err(e) => return writeln!(out, "[ERROR] {e}"),
    };
    match gift.go(target) {
        Ok(_) => writeln!(out, "[SCREEN] {}", gift.current()),
        Err(e) => writeln!(out, "[ERROR] {e}"),
    }
}

fn save<S, C, R>(gift: &mut HeadlessGift<S, C, R>, text: &str, out: &mut impl Write)
where
    S: StorageBackend + Clone,
    C: Clock + Clone,
    R: Rasterizer,
{
    let written = match gift.save(text) {
        Ok(item) => writeln!(out, "[SAVED] {}", item.id),
        Err(e) => writeln!(out, "[ERROR] Save failed: {e}"),
    };
    written.ok();
}
