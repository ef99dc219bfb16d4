//! Interactive Vim tutor.
//!
//! Lessons are read from the built-in curriculum; learner progress lives in
//! `<home>/users/<name>.json` and editor settings in `<home>/config.toml`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use vimlearn::commands::{self, CommandContext, StartArgs};
use vimlearn::exit_codes;
use vimlearn::io::editor::ExternalEditor;
use vimlearn::io::terminal::TerminalConsole;
use vimlearn::logging;

#[derive(Parser, Debug)]
#[command(name = "vimlearn", version, about = "Interactive Vim tutor")]
struct Cli {
    /// Data directory holding config.toml and users/ (default: ~/.vimlearn).
    #[arg(long, global = true, env = "VIMLEARN_HOME", value_name = "DIR")]
    home: Option<PathBuf>,

    /// Debug-level diagnostics on stderr when RUST_LOG is unset.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Start or resume learning.
    Start {
        /// Username; prompted for when omitted.
        #[arg(short, long)]
        user: Option<String>,
        /// Jump to a lesson id such as 1.1.
        #[arg(short, long)]
        lesson: Option<String>,
    },
    /// List all modules and lessons.
    Lessons,
    /// Show a user's statistics and completed lessons.
    Progress {
        /// Username.
        username: String,
    },
    /// Reset a user's progress.
    Reset {
        /// Username.
        username: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// List known usernames, one per line.
    Users,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let ctx = CommandContext::load(cli.home.as_deref())?;
    let mut console = TerminalConsole::stdio();
    match cli.command {
        Command::Start { user, lesson } => {
            let editor = ExternalEditor::from_config(&ctx.config.editor);
            commands::start(&ctx, &StartArgs { user, lesson }, editor, &mut console)
        }
        Command::Lessons => commands::lessons(&ctx, &mut console),
        Command::Progress { username } => commands::progress(&ctx, &username, &mut console),
        Command::Reset { username, yes } => commands::reset(&ctx, &username, yes, &mut console),
        Command::Users => commands::users(&ctx, &mut console),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_accepts_short_flags() {
        let cli = Cli::try_parse_from(["vimlearn", "start", "-u", "ada", "-l", "2.1"])
            .expect("parse");
        assert_eq!(
            cli.command,
            Command::Start {
                user: Some("ada".to_string()),
                lesson: Some("2.1".to_string()),
            }
        );
    }

    #[test]
    fn home_flag_is_global() {
        let cli = Cli::try_parse_from(["vimlearn", "users", "--home", "/tmp/vl"]).expect("parse");
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/vl")));
        assert_eq!(cli.command, Command::Users);
    }

    #[test]
    fn reset_requires_username() {
        assert!(Cli::try_parse_from(["vimlearn", "reset"]).is_err());
        let cli = Cli::try_parse_from(["vimlearn", "reset", "ada", "--yes"]).expect("parse");
        assert_eq!(
            cli.command,
            Command::Reset {
                username: "ada".to_string(),
                yes: true,
            }
        );
    }
}
