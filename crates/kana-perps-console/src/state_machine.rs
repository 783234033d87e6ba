/*
[INPUT]:  WorkflowState targets requested by the submission workflow
[OUTPUT]: Validated state transitions and the visited-state trail
[POS]:    Workflow domain logic - state machine for one transaction submission
[UPDATE]: When workflow stages or failure handling change
*/

use std::fmt;

use thiserror::Error;

/// Stages of one submission, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    Idle,
    Validating,
    BuildingRequest,
    AwaitingGatewayResponse,
    AwaitingSignature,
    AwaitingConfirmation,
    Settled,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Settled | WorkflowState::Failed)
    }

    /// The only forward successor, if any
    fn next(self) -> Option<WorkflowState> {
        match self {
            WorkflowState::Idle => Some(WorkflowState::Validating),
            WorkflowState::Validating => Some(WorkflowState::BuildingRequest),
            WorkflowState::BuildingRequest => Some(WorkflowState::AwaitingGatewayResponse),
            WorkflowState::AwaitingGatewayResponse => Some(WorkflowState::AwaitingSignature),
            WorkflowState::AwaitingSignature => Some(WorkflowState::AwaitingConfirmation),
            WorkflowState::AwaitingConfirmation => Some(WorkflowState::Settled),
            WorkflowState::Settled | WorkflowState::Failed => None,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Validating => "validating",
            WorkflowState::BuildingRequest => "building_request",
            WorkflowState::AwaitingGatewayResponse => "awaiting_gateway_response",
            WorkflowState::AwaitingSignature => "awaiting_signature",
            WorkflowState::AwaitingConfirmation => "awaiting_confirmation",
            WorkflowState::Settled => "settled",
            WorkflowState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Errors occurring during state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: WorkflowState,
        to: WorkflowState,
    },
}

/// Single forward path; any non-terminal state may fail.
#[derive(Debug, Clone)]
pub struct TransactionStateMachine {
    current_state: WorkflowState,
    history: Vec<WorkflowState>,
}

impl Default for TransactionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: WorkflowState::Idle,
            history: vec![WorkflowState::Idle],
        }
    }

    pub fn can_transition(&self, to: WorkflowState) -> bool {
        let from = self.current_state;
        match to {
            WorkflowState::Failed => !from.is_terminal(),
            _ => from.next() == Some(to),
        }
    }

    pub fn transition(&mut self, to: WorkflowState) -> Result<(), StateError> {
        if !self.can_transition(to) {
            return Err(StateError::InvalidTransition {
                from: self.current_state,
                to,
            });
        }

        self.current_state = to;
        self.history.push(to);
        Ok(())
    }

    pub fn state(&self) -> WorkflowState {
        self.current_state
    }

    /// Every state visited, starting with `Idle`
    pub fn history(&self) -> &[WorkflowState] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAPPY_PATH: [WorkflowState; 6] = [
        WorkflowState::Validating,
        WorkflowState::BuildingRequest,
        WorkflowState::AwaitingGatewayResponse,
        WorkflowState::AwaitingSignature,
        WorkflowState::AwaitingConfirmation,
        WorkflowState::Settled,
    ];

    #[test]
    fn test_initial_state() {
        let machine = TransactionStateMachine::new();
        assert_eq!(machine.state(), WorkflowState::Idle);
        assert_eq!(machine.history(), &[WorkflowState::Idle]);
    }

    #[test]
    fn test_happy_path() {
        let mut machine = TransactionStateMachine::new();
        for state in HAPPY_PATH {
            assert!(machine.transition(state).is_ok());
        }
        assert_eq!(machine.state(), WorkflowState::Settled);
        assert_eq!(machine.history().len(), 7);
    }

    #[test]
    fn test_any_live_state_can_fail() {
        // Idle plus the five in-flight stages
        for steps in 0..HAPPY_PATH.len() {
            let mut machine = TransactionStateMachine::new();
            for state in &HAPPY_PATH[..steps] {
                machine.transition(*state).unwrap();
            }
            assert!(machine.transition(WorkflowState::Failed).is_ok());
            assert_eq!(machine.state(), WorkflowState::Failed);
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut machine = TransactionStateMachine::new();
        for state in HAPPY_PATH {
            machine.transition(state).unwrap();
        }
        let result = machine.transition(WorkflowState::Failed);
        assert_eq!(
            result,
            Err(StateError::InvalidTransition {
                from: WorkflowState::Settled,
                to: WorkflowState::Failed,
            })
        );

        let mut machine = TransactionStateMachine::new();
        machine.transition(WorkflowState::Failed).unwrap();
        assert!(machine.transition(WorkflowState::Validating).is_err());
        assert!(machine.transition(WorkflowState::Failed).is_err());
    }

    #[test]
    fn test_skipping_a_stage_is_rejected() {
        let mut machine = TransactionStateMachine::new();
        machine.transition(WorkflowState::Validating).unwrap();
        let result = machine.transition(WorkflowState::AwaitingSignature);
        assert!(result.is_err());
        assert_eq!(machine.state(), WorkflowState::Validating);
    }
}
