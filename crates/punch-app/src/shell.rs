//! Line commands for the interactive shell.

use thiserror::Error;

/// A line that is not a valid command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseError(pub String);

/// One parsed shell command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Re-render the current view.
    Show,
    /// Return to the unit list.
    Back,
    /// Open a unit's checklist.
    Open(String),
    /// Create a unit.
    Add {
        /// Unit name.
        name: String,
        /// Street address.
        address: String,
    },
    /// Create the 4 × 20 building plan.
    Generate,
    /// Flip a task (0-based index).
    Toggle {
        /// Trade name.
        trade: String,
        /// Task position.
        index: usize,
    },
    /// Set a task's completion flag (0-based index).
    Mark {
        /// Trade name.
        trade: String,
        /// Task position.
        index: usize,
        /// New flag.
        completed: bool,
    },
    /// Append a task.
    Task {
        /// Trade name.
        trade: String,
        /// Task text.
        text: String,
    },
    /// Ask for suggested tasks.
    Suggest(String),
    /// Print a shareable link to the open unit.
    Link,
    /// Print current counter values.
    Metrics,
    /// Print usage.
    Help,
    /// Leave the shell.
    Quit,
}

/// Usage text.
pub const HELP: &str = "\
commands:
  list                      show the unit list (alias: back)
  open <unit>               open a unit's checklist
  add <name> | <address>    create a unit
  generate                  create buildings A-D with 20 units each
  toggle <trade> <n>        flip task n (1-based) of a trade
  done <trade> <n>          mark task n complete
  undo <trade> <n>          mark task n incomplete
  task <trade> <text>       append a task to a trade
  suggest <trade>           append suggested tasks for a trade
  link                      print a shareable link to the open unit
  metrics                   print counters in Prometheus text format
  show                      redraw the current view
  help                      this text
  quit                      exit";

/// Parse one input line. Blank lines parse as [`Command::Show`].
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Show);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    match word.to_ascii_lowercase().as_str() {
        "show" => Ok(Command::Show),
        "list" | "back" | "home" => Ok(Command::Back),
        "open" => required(rest, "open <unit>").map(|name| Command::Open(name.to_string())),
        "add" => {
            let (name, address) = rest
                .split_once('|')
                .ok_or_else(|| usage("add <name> | <address>"))?;
            Ok(Command::Add {
                name: name.trim().to_string(),
                address: address.trim().to_string(),
            })
        }
        "generate" => Ok(Command::Generate),
        "toggle" => {
            let (trade, index) = trade_and_position(rest, "toggle <trade> <n>")?;
            Ok(Command::Toggle { trade, index })
        }
        "done" | "undo" => {
            let (trade, index) = trade_and_position(rest, "done|undo <trade> <n>")?;
            Ok(Command::Mark {
                trade,
                index,
                completed: word.eq_ignore_ascii_case("done"),
            })
        }
        "task" => {
            let (trade, text) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| usage("task <trade> <text>"))?;
            Ok(Command::Task {
                trade: trade.to_string(),
                text: text.trim().to_string(),
            })
        }
        "suggest" => {
            required(rest, "suggest <trade>").map(|trade| Command::Suggest(trade.to_string()))
        }
        "link" | "share" => Ok(Command::Link),
        "metrics" => Ok(Command::Metrics),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError(format!("unknown command '{other}' (try 'help')"))),
    }
}

fn usage(form: &str) -> ParseError {
    ParseError(format!("usage: {form}"))
}

fn required<'a>(rest: &'a str, form: &str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(usage(form))
    } else {
        Ok(rest)
    }
}

/// `<trade> <n>` with a 1-based position, returned 0-based.
fn trade_and_position(rest: &str, form: &str) -> Result<(String, usize), ParseError> {
    let mut parts = rest.split_whitespace();
    let (Some(trade), Some(number), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(usage(form));
    };
    match number.parse::<usize>() {
        Ok(n) if n >= 1 => Ok((trade.to_string(), n - 1)),
        _ => Err(ParseError(format!(
            "task number must be a positive integer, got '{number}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn blank_line_redraws() {
        assert_eq!(parse("   "), Ok(Command::Show));
    }

    #[test]
    fn navigation_commands() {
        assert_eq!(parse("list"), Ok(Command::Back));
        assert_eq!(parse("BACK"), Ok(Command::Back));
        assert_eq!(parse("open B-Unit04"), Ok(Command::Open("B-Unit04".into())));
        assert_matches!(parse("open"), Err(_));
    }

    #[test]
    fn add_splits_on_pipe() {
        assert_eq!(
            parse("add A-1 | 123 Main St"),
            Ok(Command::Add {
                name: "A-1".into(),
                address: "123 Main St".into()
            })
        );
        assert_matches!(parse("add A-1 123 Main"), Err(ParseError(msg)) if msg.starts_with("usage"));
    }

    #[test]
    fn toggle_is_one_based() {
        assert_eq!(
            parse("toggle Electrical 1"),
            Ok(Command::Toggle {
                trade: "Electrical".into(),
                index: 0
            })
        );
        assert_matches!(parse("toggle Electrical 0"), Err(_));
        assert_matches!(parse("toggle Electrical x"), Err(_));
        assert_matches!(parse("toggle Electrical"), Err(_));
        assert_matches!(parse("toggle Electrical 1 2"), Err(_));
    }

    #[test]
    fn done_and_undo_set_flag() {
        assert_eq!(
            parse("done Plumbing 2"),
            Ok(Command::Mark {
                trade: "Plumbing".into(),
                index: 1,
                completed: true
            })
        );
        assert_eq!(
            parse("undo Plumbing 2"),
            Ok(Command::Mark {
                trade: "Plumbing".into(),
                index: 1,
                completed: false
            })
        );
    }

    #[test]
    fn task_keeps_full_text() {
        assert_eq!(
            parse("task Electrical Install panel  cover"),
            Ok(Command::Task {
                trade: "Electrical".into(),
                text: "Install panel  cover".into()
            })
        );
        assert_matches!(parse("task Electrical"), Err(_));
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse("suggest Drywall"), Ok(Command::Suggest("Drywall".into())));
        assert_eq!(parse("generate"), Ok(Command::Generate));
        assert_eq!(parse("link"), Ok(Command::Link));
        assert_eq!(parse("metrics"), Ok(Command::Metrics));
        assert_eq!(parse("?"), Ok(Command::Help));
        assert_eq!(parse("exit"), Ok(Command::Quit));
        assert_matches!(parse("frobnicate"), Err(ParseError(msg)) if msg.contains("frobnicate"));
    }
}
