//! Progress/resume contract.
//!
//! Every flow state exposes a monotonic step number (UI ordering and
//! back-navigation only, never business logic) and a continuable flag. The
//! external persistence collaborator must not resume a flow from a state
//! whose `continuable` is false; [`crate::machine::FlowInterpreter::resume`]
//! enforces this.

/// Stride between composite phases: composite step = `phase * 100 + inner`.
pub const PHASE_STRIDE: u32 = 100;

/// Derived, pure progress properties of a flow state.
pub trait FlowProgress {
    /// Monotonic position of this state within its flow.
    fn step(&self) -> u32;

    /// Whether the flow may be resumed from this state after a restart.
    fn continuable(&self) -> bool;

    /// Short stable name for logs and protocol-violation errors.
    fn name(&self) -> &'static str;
}

/// Step number for a composite state wrapping a leaf at `inner_step`.
pub fn composite_step(phase: u32, inner_step: u32) -> u32 {
    phase * PHASE_STRIDE + inner_step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_dominate_inner_steps() {
        assert!(composite_step(1, 99) < composite_step(2, 1));
        assert_eq!(composite_step(3, 2), 302);
    }
}
