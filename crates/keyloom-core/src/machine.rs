//! Generic transition interpreter.
//!
//! A flow is an exhaustive state enum implementing [`StateMachine`]; the
//! [`FlowInterpreter`] owns the single current state value, serializes event
//! submission, and publishes each accepted transition on a watch channel for
//! the navigation layer to observe. The interpreter owns no domain
//! knowledge: legality of `(state, event)` pairs lives entirely in the
//! flow's `accept`.

use crate::errors::{FlowError, FlowResult};
use crate::progress::FlowProgress;
use async_lock::Mutex;
use async_trait::async_trait;
use tokio::sync::watch;

/// An asynchronous state machine over a closed state/event pair.
///
/// `accept` is a pure function of `(state, event)` given the provider's
/// results: it performs no mutation, and any `(state, event)` combination it
/// does not explicitly handle must fail with
/// [`FlowError::InvalidEvent`] rather than silently no-op. On error the
/// caller's state is unchanged.
#[async_trait]
pub trait StateMachine: FlowProgress + Clone + Send + Sync + Sized {
    /// Externally-triggered inputs this machine reacts to.
    type Event: Send;

    /// Capability bundle injected per transition call.
    type Provider: Send + Sync;

    /// Produce the successor state for `event`, awaiting provider I/O as
    /// needed.
    async fn accept(&self, event: Self::Event, provider: &Self::Provider) -> FlowResult<Self>;
}

/// Owns one flow's current state and drives it one event at a time.
///
/// Event submission is serialized with an async mutex: a second `send` waits
/// until the in-flight transition's provider call completes. State is only
/// replaced after a transition succeeds, so a discarded or failed transition
/// cannot corrupt it.
#[derive(Debug)]
pub struct FlowInterpreter<M: StateMachine> {
    state: Mutex<M>,
    tx: watch::Sender<M>,
}

impl<M: StateMachine> FlowInterpreter<M> {
    /// Start a fresh flow at `initial`.
    pub fn new(initial: M) -> Self {
        let (tx, _rx) = watch::channel(initial.clone());
        Self {
            state: Mutex::new(initial),
            tx,
        }
    }

    /// Resume a flow from a previously persisted state.
    ///
    /// Refuses non-continuable states: a flow must never restart inside a
    /// dead-end like a `Broken` lockout.
    pub fn resume(state: M) -> FlowResult<Self> {
        if !state.continuable() {
            return Err(FlowError::not_resumable(state.name()));
        }
        Ok(Self::new(state))
    }

    /// Submit one event, awaiting the transition to completion.
    ///
    /// Returns the new state, which is also published to subscribers. On
    /// error the current state is left unchanged.
    pub async fn send(&self, event: M::Event, provider: &M::Provider) -> FlowResult<M> {
        let mut current = self.state.lock().await;
        let next = match current.accept(event, provider).await {
            Ok(next) => next,
            Err(err) => {
                if !matches!(err, FlowError::InvalidEvent { .. }) {
                    tracing::error!(
                        state = current.name(),
                        error = %err,
                        "transition failed, state unchanged"
                    );
                }
                return Err(err);
            }
        };
        tracing::debug!(
            from = current.name(),
            to = next.name(),
            step = next.step(),
            "transition accepted"
        );
        *current = next.clone();
        self.tx.send_replace(next.clone());
        Ok(next)
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> M {
        self.tx.borrow().clone()
    }

    /// Observe every accepted transition.
    pub fn subscribe(&self) -> watch::Receiver<M> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::SignerError;
    use assert_matches::assert_matches;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Door {
        Closed,
        Open,
        Jammed,
    }

    enum DoorEvent {
        Open,
        Close,
        Kick,
    }

    struct DoorProvider {
        fail_open: bool,
    }

    impl FlowProgress for Door {
        fn step(&self) -> u32 {
            match self {
                Door::Closed => 1,
                Door::Open => 2,
                Door::Jammed => 3,
            }
        }

        fn continuable(&self) -> bool {
            !matches!(self, Door::Jammed)
        }

        fn name(&self) -> &'static str {
            match self {
                Door::Closed => "closed",
                Door::Open => "open",
                Door::Jammed => "jammed",
            }
        }
    }

    #[async_trait]
    impl StateMachine for Door {
        type Event = DoorEvent;
        type Provider = DoorProvider;

        async fn accept(&self, event: DoorEvent, provider: &DoorProvider) -> FlowResult<Self> {
            match (self, event) {
                (Door::Closed, DoorEvent::Open) => {
                    if provider.fail_open {
                        return Err(SignerError::new("hinge fault").into());
                    }
                    Ok(Door::Open)
                }
                (Door::Open, DoorEvent::Close) => Ok(Door::Closed),
                (Door::Closed, DoorEvent::Kick) => Ok(Door::Jammed),
                (state, event) => Err(FlowError::invalid_event(
                    state.name(),
                    match event {
                        DoorEvent::Open => "open",
                        DoorEvent::Close => "close",
                        DoorEvent::Kick => "kick",
                    },
                )),
            }
        }
    }

    #[tokio::test]
    async fn send_advances_and_publishes() {
        let interpreter = FlowInterpreter::new(Door::Closed);
        let mut rx = interpreter.subscribe();
        let provider = DoorProvider { fail_open: false };

        let next = interpreter.send(DoorEvent::Open, &provider).await.unwrap();
        assert_eq!(next, Door::Open);
        assert_eq!(interpreter.current(), Door::Open);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Door::Open);
    }

    #[tokio::test]
    async fn invalid_event_leaves_state_unchanged() {
        let interpreter = FlowInterpreter::new(Door::Open);
        let provider = DoorProvider { fail_open: false };

        let err = interpreter
            .send(DoorEvent::Open, &provider)
            .await
            .unwrap_err();
        assert_matches!(err, FlowError::InvalidEvent { .. });
        assert_eq!(interpreter.current(), Door::Open);
    }

    #[tokio::test]
    async fn provider_failure_leaves_state_unchanged() {
        let interpreter = FlowInterpreter::new(Door::Closed);
        let provider = DoorProvider { fail_open: true };

        let err = interpreter
            .send(DoorEvent::Open, &provider)
            .await
            .unwrap_err();
        assert_matches!(err, FlowError::Signer(_));
        assert_eq!(interpreter.current(), Door::Closed);
    }

    #[tokio::test]
    async fn resume_refuses_non_continuable_states() {
        assert_matches!(
            FlowInterpreter::resume(Door::Jammed).unwrap_err(),
            FlowError::NotResumable { state } if state == "jammed"
        );
        assert!(FlowInterpreter::resume(Door::Closed).is_ok());
    }
}
