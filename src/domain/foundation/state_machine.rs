//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating state transitions across
//! the session, question and open/closed item lifecycles.

use super::ConflictReason;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for QuestionStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Pending, Approved) | (Approved, Pending) /* ... */)
///     }
///     // ...
/// }
///
/// let next = question.status.transition_to(QuestionStatus::Approved)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Wire name of the state.
    fn as_str(&self) -> &'static str;

    /// Performs transition with validation.
    ///
    /// Requesting the current state is accepted and leaves it unchanged.
    fn transition_to(&self, target: Self) -> Result<Self, ConflictReason> {
        if *self == target || self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ConflictReason::InvalidTransition {
                from: self.as_str(),
                to: target.as_str(),
            })
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
