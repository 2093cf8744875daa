//! Edge detection for actuator state reports

use super::machine::ActuatorState;

/// Remembers the previous tick's state and flags changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateEdge {
    last: ActuatorState,
}

impl StateEdge {
    /// Start in the stopped state
    pub const fn new() -> Self {
        Self {
            last: ActuatorState::Stopped,
        }
    }

    /// State recorded on the previous update
    pub fn last(&self) -> ActuatorState {
        self.last
    }

    /// Record this tick's state
    ///
    /// Returns `Some(state)` only when it differs from the previous one.
    pub fn update(&mut self, state: ActuatorState) -> Option<ActuatorState> {
        if state == self.last {
            return None;
        }
        self.last = state;
        Some(state)
    }

    /// Overwrite the remembered state without reporting
    pub fn force(&mut self, state: ActuatorState) {
        self.last = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_stopped_is_not_an_edge() {
        let mut edge = StateEdge::new();
        assert_eq!(edge.update(ActuatorState::Stopped), None);
    }

    #[test]
    fn test_reports_each_transition_once() {
        let mut edge = StateEdge::new();

        assert_eq!(
            edge.update(ActuatorState::Extending),
            Some(ActuatorState::Extending)
        );
        assert_eq!(edge.update(ActuatorState::Extending), None);
        assert_eq!(
            edge.update(ActuatorState::Stopped),
            Some(ActuatorState::Stopped)
        );
        assert_eq!(
            edge.update(ActuatorState::Retracting),
            Some(ActuatorState::Retracting)
        );
        assert_eq!(edge.last(), ActuatorState::Retracting);
    }

    #[test]
    fn test_force_is_silent() {
        let mut edge = StateEdge::new();
        edge.update(ActuatorState::Extending);
        edge.force(ActuatorState::Stopped);
        assert_eq!(edge.last(), ActuatorState::Stopped);
        assert_eq!(
            edge.update(ActuatorState::Extending),
            Some(ActuatorState::Extending)
        );
    }
}
