//! Request lifecycle: submission, in-flight tracking and settlement.
//!
//! [`RequestOrchestrator::submit`] moves the state to [`LifecycleState::Pending`] synchronously
//! and hands back a [`Dispatch`]. The dispatch is executed elsewhere ([`execute`], or
//! [`spawn_dispatch`] for front ends with an event loop) and its [`Settlement`] is fed back
//! through [`RequestOrchestrator::settle`].
//!
//! Every submission gets a sequence number. Only the settlement of the most recently issued
//! ticket is applied; older ones are reported as [`SettleOutcome::Stale`] and dropped, so a slow
//! response can never overwrite a newer one.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::client::RuleService;
use crate::error::GenerateError;
use crate::input::InputModel;
use crate::protocol::{GenerationResult, RuleRequest};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Pending,
    Resolved(GenerationResult),
    Failed(String),
}

impl LifecycleState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LifecycleState::Pending)
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            LifecycleState::Resolved(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LifecycleState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Pending => "pending",
            LifecycleState::Resolved(_) => "resolved",
            LifecycleState::Failed(_) => "failed",
        }
    }
}

/// Sequence number assigned at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// A submitted request waiting to be executed. The payload is fixed at submission time.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub ticket: RequestTicket,
    pub request: RuleRequest,
}

#[derive(Debug)]
pub struct Settlement {
    pub ticket: RequestTicket,
    pub outcome: Result<GenerationResult, GenerateError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Applied,
    /// A newer request was submitted after this one; its outcome was discarded.
    Stale,
}

#[derive(Debug, Default)]
pub struct RequestOrchestrator {
    state: LifecycleState,
    last_issued: u64,
}

impl RequestOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// Enters `Pending` (dropping any previous result or error) and builds the payload.
    ///
    /// Calling this while already pending issues a new ticket that supersedes the old one.
    pub fn submit(&mut self, input: &InputModel) -> Dispatch {
        self.last_issued += 1;
        let ticket = RequestTicket(self.last_issued);
        if self.state.is_pending() {
            tracing::info!(seq = ticket.seq(), "submission supersedes in-flight request");
        }
        self.state = LifecycleState::Pending;
        Dispatch {
            ticket,
            request: input.to_request_payload(),
        }
    }

    pub fn settle(&mut self, settlement: Settlement) -> SettleOutcome {
        let Settlement { ticket, outcome } = settlement;
        if ticket.seq() != self.last_issued {
            tracing::warn!(
                seq = ticket.seq(),
                latest = self.last_issued,
                "dropping stale settlement"
            );
            return SettleOutcome::Stale;
        }
        self.state = match outcome {
            Ok(result) => {
                tracing::info!(seq = ticket.seq(), "generate-rule resolved");
                LifecycleState::Resolved(result)
            }
            Err(err) => {
                tracing::info!(seq = ticket.seq(), error = %err, "generate-rule failed");
                LifecycleState::Failed(err.to_string())
            }
        };
        SettleOutcome::Applied
    }

    /// Submits, executes and settles in one call.
    ///
    /// The state never stays `Pending` past this call: if the future is dropped or the service
    /// panics, the in-flight guard settles the ticket as [`GenerateError::Interrupted`].
    pub async fn run(&mut self, input: &InputModel, service: &dyn RuleService) -> SettleOutcome {
        let dispatch = self.submit(input);
        let guard = InFlight {
            orchestrator: self,
            ticket: dispatch.ticket,
            settled: false,
        };
        let settlement = execute(service, dispatch).await;
        guard.finish(settlement)
    }
}

/// Clears the in-flight state of one ticket on every exit path.
struct InFlight<'a> {
    orchestrator: &'a mut RequestOrchestrator,
    ticket: RequestTicket,
    settled: bool,
}

impl InFlight<'_> {
    fn finish(mut self, settlement: Settlement) -> SettleOutcome {
        self.settled = true;
        self.orchestrator.settle(settlement)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.orchestrator.settle(Settlement {
                ticket: self.ticket,
                outcome: Err(GenerateError::Interrupted),
            });
        }
    }
}

/// Executes one dispatch against the service. Exactly one request; no retry.
pub async fn execute(service: &dyn RuleService, dispatch: Dispatch) -> Settlement {
    let Dispatch { ticket, request } = dispatch;
    let span = tracing::info_span!("generate_rule", seq = ticket.seq());
    let outcome = async {
        tracing::info!(context_docs = request.context_docs.len(), "submitting rule prompt");
        service.generate(&request).await
    }
    .instrument(span)
    .await;
    Settlement { ticket, outcome }
}

/// Sends exactly one settlement for its ticket: the real one, or `Interrupted` from `Drop`.
struct SettlementGuard {
    ticket: RequestTicket,
    tx: Option<UnboundedSender<Settlement>>,
}

impl SettlementGuard {
    fn deliver(mut self, settlement: Settlement) {
        if let Some(tx) = self.tx.take() {
            // The receiver is gone only when the front end is shutting down.
            let _ = tx.send(settlement);
        }
    }
}

impl Drop for SettlementGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            tracing::warn!(seq = self.ticket.seq(), "request task ended without an outcome");
            let _ = tx.send(Settlement {
                ticket: self.ticket,
                outcome: Err(GenerateError::Interrupted),
            });
        }
    }
}

/// Runs the dispatch on the tokio runtime and reports its settlement on `tx`.
pub fn spawn_dispatch(
    service: Arc<dyn RuleService>,
    dispatch: Dispatch,
    tx: UnboundedSender<Settlement>,
) -> JoinHandle<()> {
    let guard = SettlementGuard {
        ticket: dispatch.ticket,
        tx: Some(tx),
    };
    tokio::spawn(async move {
        let settlement = execute(service.as_ref(), dispatch).await;
        guard.deliver(settlement);
    })
}
