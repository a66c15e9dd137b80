// src/session/controller.rs
// =============================================================================
// The controller owns the AppState and is the only thing that writes to it.
//
// How a check flows through here:
// 1. check() parses the URL. A bad URL replaces the log with one line and
//    stops there.
// 2. Otherwise the log is reset to the "Testing ..." header and a tokio task
//    is spawned to make the request.
// 3. When the request finishes, the task posts a Completion onto a channel.
// 4. Whoever drives the controller (the session loop, or settle()) receives
//    the Completion and hands it to apply(), which appends the outcome line.
//
// Every check gets a new generation number. Starting another check (or
// cancelling) aborts the running task and moves the generation on, so a
// Completion that was already queued is recognised as stale and dropped.
//
// Rust concepts:
// - tokio::spawn: run the request in the background
// - mpsc channels: hand results back to a single consumer
// - JoinHandle::abort: stop a background task early
// =============================================================================

use super::state::AppState;
use crate::checker::{CheckError, CheckOutcome, Checker};
use crate::target::Target;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

// What a finished request task sends back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub generation: u64,
    pub outcome: CheckOutcome,
}

// The check that is currently running, if any
#[derive(Debug)]
struct InFlight {
    generation: u64,
    task: JoinHandle<()>,
}

#[derive(Debug)]
pub struct Controller {
    state: AppState,
    checker: Checker,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: Option<InFlight>,
}

impl Controller {
    pub fn new(targets: Vec<Target>, checker: Checker) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Controller {
            state: AppState::new(targets),
            checker,
            completions_tx,
            completions_rx,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn checker_timeout(&self) -> Duration {
        self.checker.timeout()
    }

    /// Checks the target at the 0-based `index`.
    pub fn check(&mut self, index: usize) -> Result<u64, CheckError> {
        let target = self.state.target(index)?.clone();
        self.check_target(&target)
    }

    // Starts a check of any target, listed or not
    //
    // Returns the generation of the new check. The outcome arrives later
    // through next_event()/apply(), or through settle().
    pub fn check_target(&mut self, target: &Target) -> Result<u64, CheckError> {
        self.abort_in_flight();
        let generation = self.state.next_generation();

        let url = match target.parse_url() {
            Ok(url) => url,
            Err(e) => {
                // Replaces the log rather than appending to it
                self.state.log_mut().replace(e.to_string());
                return Err(e);
            }
        };

        self.state
            .log_mut()
            .replace(format!("Testing \"{}\"\n{}\n", target.name, target.url));

        info!(name = %target.name, %url, generation, "check started");

        let checker = self.checker.clone();
        let tx = self.completions_tx.clone();
        let task = tokio::spawn(async move {
            let outcome = checker.probe(&url).await;
            // The receiver lives as long as the controller; if it's gone
            // there is nobody left to tell
            let _ = tx.send(Completion {
                generation,
                outcome,
            });
        });

        self.in_flight = Some(InFlight { generation, task });
        Ok(generation)
    }

    /// Aborts the running check. Returns false if nothing was running.
    pub fn cancel(&mut self) -> bool {
        if self.in_flight.is_none() {
            return false;
        }
        self.abort_in_flight();
        self.state.next_generation();
        true
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> Result<(), CheckError> {
        self.state.rename(index, name)
    }

    pub fn clear_log(&mut self) {
        self.state.log_mut().clear();
    }

    // Waits for the next completion from any request task
    //
    // Cancel safe: if the future is dropped before it resolves, the
    // completion stays in the channel.
    pub async fn next_event(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    // Applies a completion to the log
    //
    // Returns the outcome if it was applied, or None if the completion
    // belongs to a check that has since been superseded or cancelled.
    pub fn apply(&mut self, completion: Completion) -> Option<CheckOutcome> {
        if completion.generation != self.state.generation() {
            debug!(
                stale = completion.generation,
                current = self.state.generation(),
                "dropping stale completion"
            );
            return None;
        }

        self.state
            .log_mut()
            .append(&completion.outcome.to_string());

        if matches!(&self.in_flight, Some(f) if f.generation == completion.generation) {
            self.in_flight = None;
        }

        info!(
            generation = completion.generation,
            outcome = %completion.outcome,
            "check finished"
        );
        Some(completion.outcome)
    }

    /// Drives the queue until the running check has finished.
    /// Returns None right away if no check is running.
    pub async fn settle(&mut self) -> Option<CheckOutcome> {
        while self.in_flight.is_some() {
            let completion = self.next_event().await?;
            if let Some(outcome) = self.apply(completion) {
                return Some(outcome);
            }
        }
        None
    }

    fn abort_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(generation = in_flight.generation, "aborting superseded check");
            in_flight.task.abort();
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a channel instead of writing to the log from the task?
//    - The task runs on some worker thread, the log belongs to the controller
//    - Sending a message keeps a single writer, so no Mutex is needed
//
// 2. What does abort() do?
//    - It asks tokio to stop the task at its next .await
//    - The request future is dropped, which closes the connection
//    - A task that already sent its Completion can't take it back, which
//      is why apply() also compares generations
//
// 3. What is matches! with an `if`?
//    - A pattern plus a guard, evaluated to a bool
//    - Some(f) if f.generation == ... is true only for the matching check
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::log::PLACEHOLDER;
    use tokio::net::TcpListener;

    fn controller(targets: Vec<Target>) -> Controller {
        let checker = Checker::new(Duration::from_secs(5)).unwrap();
        Controller::new(targets, checker)
    }

    // A server that accepts connections and never answers
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_invalid_url_replaces_log() {
        let mut controller = controller(vec![Target::new("Broken", "not a url")]);
        controller.state.log_mut().append("older line");

        let err = controller.check(0).unwrap_err();

        assert!(matches!(err, CheckError::MalformedUrl { .. }));
        assert_eq!(controller.state().log().as_str(), "Invalid URL: not a url");
        assert!(!controller.is_pending());
        assert!(controller.completions_rx.try_recv().is_err());
        assert_eq!(controller.settle().await, None);
    }

    #[tokio::test]
    async fn test_successful_check() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(200).create_async().await;
        let url = format!("{}/", server.url());

        let mut controller = controller(vec![Target::new("Local", url.clone())]);
        controller.check(0).unwrap();
        assert!(controller.is_pending());

        let outcome = controller.settle().await;

        assert_eq!(outcome, Some(CheckOutcome::Success { code: 200 }));
        assert!(!controller.is_pending());
        assert_eq!(
            controller.state().log().as_str(),
            format!("Testing \"Local\"\n{}\n\n✅ SUCCESS: Status code: 200", url)
        );
    }

    #[tokio::test]
    async fn test_new_check_supersedes_old_one() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(503).create_async().await;

        let slow = Target::new("Slow", silent_server().await);
        let fast = Target::new("Fast", format!("{}/", server.url()));
        let mut controller = controller(vec![slow, fast]);

        let first = controller.check(0).unwrap();
        let second = controller.check(1).unwrap();
        assert!(second > first);

        let outcome = controller.settle().await;
        assert_eq!(outcome, Some(CheckOutcome::ServerError { code: 503 }));

        let log = controller.state().log().as_str().to_string();
        assert!(log.starts_with("Testing \"Fast\""));
        assert!(log.ends_with("❌ SERVER ERROR: Status code: 503"));
        assert_eq!(log.matches("Status code").count(), 1);

        // A completion from the first check that slipped through is ignored
        let stale = Completion {
            generation: first,
            outcome: CheckOutcome::ServerDown,
        };
        assert_eq!(controller.apply(stale), None);
        assert_eq!(controller.state().log().as_str(), log);
    }

    #[tokio::test]
    async fn test_cancel() {
        let mut controller = controller(vec![Target::new("Slow", silent_server().await)]);

        assert!(!controller.cancel());
        controller.check(0).unwrap();
        assert!(controller.cancel());

        assert!(!controller.is_pending());
        assert_eq!(controller.settle().await, None);
        assert!(controller.state().log().as_str().starts_with("Testing \"Slow\""));
    }

    #[tokio::test]
    async fn test_rename_and_clear() {
        let mut controller = controller(crate::target::default_targets());

        controller.rename(0, "Home").unwrap();
        assert_eq!(controller.state().targets()[0].name, "Home");
        assert!(controller.rename(9, "Nope").is_err());

        controller.state.log_mut().append("something");
        controller.clear_log();
        controller.clear_log();
        assert_eq!(controller.state().log().render(), PLACEHOLDER);
    }
}
