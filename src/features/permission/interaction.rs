//! User interaction trigger
//!
//! Every line typed on the terminal counts as a user interaction and
//! re-runs the permission gate, the way a click on the page would.

use super::{GateOutcome, PermissionGate};
use log::{debug, warn};
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Read stdin on a dedicated thread
///
/// tokio's stdin cannot be cancelled and would hold up runtime shutdown, so
/// lines are forwarded over a channel instead. The thread ends at EOF.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read from stdin: {e}");
                    break;
                }
            }
        }
    });
    rx
}

/// Re-run the gate for every interaction until the channel closes
///
/// Checks run in their own tasks so a pending consent prompt does not hold
/// up later interactions. Returns the number of interactions seen.
pub async fn interaction_loop(
    gate: Arc<PermissionGate>,
    mut interactions: mpsc::Receiver<String>,
) -> usize {
    let mut seen = 0;
    while interactions.recv().await.is_some() {
        seen += 1;
        let gate = gate.clone();
        tokio::spawn(async move {
            let outcome = gate.check_and_enable().await;
            if outcome != GateOutcome::AlreadyRunning {
                debug!("Permission check after interaction: {outcome:?}");
            }
        });
    }
    debug!("Interaction source closed after {seen} interaction(s)");
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::permission::PermissionState;
    use crate::test_utils::{at, CountingLauncher, ManualClock, MockCapability};

    #[tokio::test]
    async fn test_each_interaction_rechecks_gate() {
        let capability = Arc::new(
            MockCapability::new(PermissionState::Default).answering(PermissionState::Granted),
        );
        let launcher = Arc::new(CountingLauncher::default());
        let gate = Arc::new(PermissionGate::new(
            capability.clone(),
            Arc::new(ManualClock::new(at(2024, 4, 5, 9, 7))),
            launcher.clone(),
        ));

        let (tx, rx) = mpsc::channel(8);
        for _ in 0..3 {
            tx.send(String::new()).await.unwrap();
        }
        drop(tx);

        assert_eq!(interaction_loop(gate.clone(), rx).await, 3);
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }

        assert_eq!(capability.prompts(), 1);
        assert_eq!(launcher.launches(), 1);
        assert_eq!(gate.check_and_enable().await, GateOutcome::AlreadyRunning);
    }

    #[tokio::test]
    async fn test_denied_interactions_never_start() {
        let capability = Arc::new(MockCapability::new(PermissionState::Denied));
        let launcher = Arc::new(CountingLauncher::default());
        let gate = Arc::new(PermissionGate::new(
            capability.clone(),
            Arc::new(ManualClock::new(at(2024, 4, 5, 9, 7))),
            launcher.clone(),
        ));

        let (tx, rx) = mpsc::channel(8);
        for _ in 0..5 {
            tx.send("clicked".to_string()).await.unwrap();
        }
        drop(tx);

        assert_eq!(interaction_loop(gate, rx).await, 5);
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }

        assert_eq!(capability.prompts(), 0);
        assert_eq!(launcher.launches(), 0);
    }
}
