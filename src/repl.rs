// src/repl.rs
// =============================================================================
// The interactive session.
//
// One loop waits on two things at once:
// - a line typed on stdin (a command)
// - a finished check coming back from the controller's queue
//
// Both are handled on this one task, so the controller (and the log inside
// it) is only ever touched from here. Typing keeps working while a request
// is still running.
// =============================================================================

use crate::checker::CheckError;
use crate::cli::to_index;
use crate::opener;
use crate::output::{print_log, print_targets};
use crate::session::Controller;
use anyhow::{anyhow, bail, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  list              show the targets
  check N           check target N
  rename N NAME     rename target N
  open N            open target N in the browser
  cancel            stop the running check
  clear             clear the log
  log               show the log
  help              show this help
  quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    List,
    Check(usize),
    Rename(usize, String),
    Open(usize),
    Cancel,
    Clear,
    Log,
    Help,
    Quit,
}

// Parses one input line. Blank lines give Ok(None).
pub fn parse_command(line: &str) -> Result<Option<ReplCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "list" | "ls" => ReplCommand::List,
        "check" => ReplCommand::Check(parse_number(rest)?),
        "open" => ReplCommand::Open(parse_number(rest)?),
        "rename" => {
            let (number, name) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| anyhow!("Usage: rename N NAME"))?;
            ReplCommand::Rename(parse_number(number)?, name.trim().to_string())
        }
        "cancel" => ReplCommand::Cancel,
        "clear" => ReplCommand::Clear,
        "log" => ReplCommand::Log,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => bail!("Unknown command '{}' (try 'help')", other),
    };

    Ok(Some(command))
}

// Target numbers are 1-based, like in `list`
fn parse_number(text: &str) -> Result<usize> {
    match text.trim().parse::<u64>() {
        Ok(number) if number >= 1 => Ok(to_index(number)),
        _ => bail!("Expected a target number (1 or more), got '{}'", text.trim()),
    }
}

// Runs the session on stdin until `quit` or end of input
pub async fn run(controller: Controller) -> Result<()> {
    run_with_input(controller, BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

// Runs the session on any line source and hands the controller back
//
// At end of input a running check is waited for, so piped commands still
// get their outcome line. Only `quit` abandons a running check.
pub async fn run_with_input<R>(mut controller: Controller, input: R) -> Result<Controller>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut quit = false;

    println!("🔍 site-pulse session (timeout {}s)", controller.checker_timeout().as_secs());
    print_targets(controller.state().targets(), false)?;
    println!("{}", HELP);
    print_log(&controller);
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // End of input
                    break;
                };

                match parse_command(&line) {
                    Ok(Some(ReplCommand::Quit)) => {
                        quit = true;
                        break;
                    }
                    Ok(Some(command)) => execute(&mut controller, command)?,
                    Ok(None) => {}
                    Err(e) => println!("{}", e),
                }
                prompt()?;
            }
            Some(completion) = controller.next_event() => {
                if controller.apply(completion).is_some() {
                    println!();
                    print_log(&controller);
                    prompt()?;
                }
            }
        }
    }

    if quit {
        if controller.cancel() {
            println!("Cancelled the running check");
        }
    } else if controller.is_pending() {
        controller.settle().await;
        println!();
        print_log(&controller);
    }
    Ok(controller)
}

fn execute(controller: &mut Controller, command: ReplCommand) -> Result<()> {
    match command {
        ReplCommand::List => print_targets(controller.state().targets(), false)?,
        ReplCommand::Check(index) => match controller.check(index) {
            Ok(_) => print_log(controller),
            // The log already says "Invalid URL: ..."
            Err(CheckError::MalformedUrl { .. }) => print_log(controller),
            Err(e) => println!("{}", e),
        },
        ReplCommand::Rename(index, name) => match controller.rename(index, name) {
            Ok(()) => print_targets(controller.state().targets(), false)?,
            Err(e) => println!("{}", e),
        },
        ReplCommand::Open(index) => {
            let opened = controller
                .state()
                .target(index)
                .map_err(anyhow::Error::from)
                .and_then(opener::open_target);
            match opened {
                Ok(url) => println!("🌐 Opened {}", url),
                Err(e) => println!("{}", e),
            }
        }
        ReplCommand::Cancel => {
            if controller.cancel() {
                println!("Cancelled");
            } else {
                println!("Nothing to cancel");
            }
        }
        ReplCommand::Clear => {
            controller.clear_log();
            print_log(controller);
        }
        ReplCommand::Log => print_log(controller),
        ReplCommand::Help => println!("{}", HELP),
        // Handled by the loop
        ReplCommand::Quit => {}
    }
    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Checker;
    use crate::target::Target;
    use std::time::Duration;

    fn controller(url: String) -> Controller {
        let checker = Checker::new(Duration::from_secs(5)).unwrap();
        Controller::new(vec![Target::new("Local", url)], checker)
    }

    #[tokio::test]
    async fn test_end_of_input_waits_for_running_check() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(200).create_async().await;
        let url = format!("{}/", server.url());

        let controller = run_with_input(controller(url.clone()), &b"check 1\n"[..])
            .await
            .unwrap();

        assert!(!controller.is_pending());
        assert_eq!(
            controller.state().log().as_str(),
            format!("Testing \"Local\"\n{}\n\n✅ SUCCESS: Status code: 200", url)
        );
    }

    #[tokio::test]
    async fn test_rename_then_check_uses_new_name() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(404).create_async().await;
        let url = format!("{}/", server.url());

        let input = &b"rename 1 Staging box\ncheck 1\n"[..];
        let controller = run_with_input(controller(url), input).await.unwrap();

        let log = controller.state().log().as_str();
        assert!(log.starts_with("Testing \"Staging box\""));
        assert!(log.ends_with("⚠️ CLIENT ERROR: Status code: 404"));
    }

    #[tokio::test]
    async fn test_quit_abandons_running_check() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let input = &b"check 1\nquit\n"[..];
        let controller = run_with_input(controller(format!("http://{}/", addr)), input)
            .await
            .unwrap();

        assert!(!controller.is_pending());
        assert!(!controller.state().log().as_str().contains("Status code"));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("list").unwrap(), Some(ReplCommand::List));
        assert_eq!(parse_command("  check 3 ").unwrap(), Some(ReplCommand::Check(2)));
        assert_eq!(parse_command("OPEN 1").unwrap(), Some(ReplCommand::Open(0)));
        assert_eq!(parse_command("clear").unwrap(), Some(ReplCommand::Clear));
        assert_eq!(parse_command("q").unwrap(), Some(ReplCommand::Quit));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_rename_keeps_spaces_in_name() {
        assert_eq!(
            parse_command("rename 2 QR Code Maker").unwrap(),
            Some(ReplCommand::Rename(1, "QR Code Maker".to_string()))
        );
        assert!(parse_command("rename 2").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        assert!(parse_command("check").is_err());
        assert!(parse_command("check 0").is_err());
        assert!(parse_command("check two").is_err());
        assert!(parse_command("frobnicate").is_err());
    }
}
