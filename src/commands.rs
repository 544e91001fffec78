// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use logtide_core::Intent;

pub const HELP: &str = "\
commands:
  :source <id>   switch to another source
  :tail <n>      reconnect requesting <n> historical lines
  :refresh       re-list sources and reconnect
  :sources       list selectable sources
  :help          show this help
  :q             quit";

/// A parsed command typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Close the session and exit
    Quit,
    // Display help
    Help,
    // Switch the tailed source
    Source(String),
    // Change tail depth; the raw value is validated by the controller
    Tail(String),
    // Re-list sources and reconnect
    Refresh,
    // Print the known sources
    Sources,
}

impl Command {
    /// Parse a raw command line. The leading `:` is optional.
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// line returns `Err("")` as a sentinel meaning "nothing to do".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        let input = input.strip_prefix(':').unwrap_or(input).trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" | "exit" => Ok(Command::Quit),
            "help" | "h" | "?" => Ok(Command::Help),
            "refresh" | "r" => Ok(Command::Refresh),
            "sources" | "ls" => Ok(Command::Sources),
            "source" | "s" => {
                if rest.is_empty() {
                    Err("usage: source <id>".to_string())
                } else {
                    Ok(Command::Source(rest.to_string()))
                }
            }
            "tail" | "t" => {
                if rest.is_empty() {
                    Err("usage: tail <lines>".to_string())
                } else {
                    Ok(Command::Tail(rest.to_string()))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }

    /// The controller intent this command maps to, if any.
    pub fn into_intent(self) -> Option<Intent> {
        match self {
            Command::Source(id) => Some(Intent::SelectSource(id)),
            Command::Tail(raw) => Some(Intent::SetTailDepth(raw)),
            Command::Refresh => Some(Intent::Refresh),
            Command::Quit | Command::Help | Command::Sources => None,
        }
    }
}
