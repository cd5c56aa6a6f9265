//! Background move evaluation.
//!
//! Each request runs on its own thread with an owned snapshot and answers
//! exactly once over a one-slot channel. The reply carries the generation it
//! was started under so the session can drop answers that arrive after a
//! restart or undo.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use fastrand::Rng;
use tracing::{debug, error};

use crate::board::Point;
use crate::config::Config;
use crate::evaluator::{EvaluationRequest, evaluate_safely};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationReply {
    pub generation: u64,
    /// `None` means pass
    pub choice: Option<Point>,
}

/// State of an outstanding evaluation when polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Pending,
    Ready(EvaluationReply),
    /// The worker went away without answering
    Lost,
}

/// Handle to one in-flight evaluation.
#[derive(Debug)]
pub struct EvaluationHandle {
    generation: u64,
    cancelled: Arc<AtomicBool>,
    receiver: Receiver<EvaluationReply>,
}

impl EvaluationHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn poll(&self) -> Poll {
        match self.receiver.try_recv() {
            Ok(reply) => Poll::Ready(reply),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Lost,
        }
    }

    /// Block until the worker answers. `None` if it died without replying.
    pub fn wait(&self) -> Option<EvaluationReply> {
        self.receiver.recv().ok()
    }

    /// Ask the worker not to send its answer. Dropping the handle afterwards
    /// also closes the channel.
    pub fn cancel(self) {
        self.cancelled.store(true, Ordering::Release);
        debug!(generation = self.generation, "evaluation cancelled");
    }
}

/// Start evaluating `request` on a background thread.
pub fn spawn_evaluation(
    request: EvaluationRequest,
    config: Config,
    mut rng: Rng,
    generation: u64,
) -> EvaluationHandle {
    let (tx, rx) = bounded(1);
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);

    let spawned = thread::Builder::new()
        .name(format!("evaluator-{generation}"))
        .spawn(move || {
            let choice = evaluate_safely(&request, &config, &mut rng);
            if flag.load(Ordering::Acquire) {
                return;
            }
            // The session may have dropped the receiver; nothing to do then.
            let _ = tx.send(EvaluationReply { generation, choice });
        });
    if let Err(err) = spawned {
        // The closure (and its sender) is dropped, so the handle reports `Lost`.
        error!(%err, "failed to start evaluation thread");
    }

    EvaluationHandle {
        generation,
        cancelled,
        receiver: rx,
    }
}
