//! Selection state for one OOB selection dialog
//!
//! `Idle -> MethodChosen -> {Confirmed | Cancelled}`. `MethodChosen` may be
//! re-entered any number of times; the two terminal phases accept nothing.

use log::{debug, info, warn};
use mesh_oob_proto::{InputAction, OutputAction, Start, start_size};

use crate::method::{AuthenticationMethod, CapabilityDescriptor, UiHint, compute_available_methods};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    MethodChosen,
    Confirmed,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Confirmed | Phase::Cancelled)
    }
}

/// Terminal result of a selection dialog
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    NoAuthentication,
    StaticAuthentication(String),
    OutputAuthentication(OutputAction),
    InputAuthentication(InputAction),
    Cancelled,
}

impl Outcome {
    /// Start PDU parameters announcing this outcome to the device
    ///
    /// Returns `None` for a cancelled selection, which sends nothing.
    pub fn to_start(&self, capabilities: &CapabilityDescriptor) -> Option<Start> {
        let start = match self {
            Outcome::NoAuthentication => Start::new(AuthenticationMethod::None.wire_value(), 0, 0),
            Outcome::StaticAuthentication(_) => {
                Start::new(AuthenticationMethod::Static.wire_value(), 0, 0)
            }
            Outcome::OutputAuthentication(action) => Start::new(
                AuthenticationMethod::Output.wire_value(),
                action.bit(),
                start_size(capabilities.output_oob_size),
            ),
            Outcome::InputAuthentication(action) => Start::new(
                AuthenticationMethod::Input.wire_value(),
                action.bit(),
                start_size(capabilities.input_oob_size),
            ),
            Outcome::Cancelled => return None,
        };
        Some(start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("static OOB value must not be empty")]
    EmptyStaticInput,
    #[error("no OOB action selected")]
    NoActionChosen,
    #[error("no authentication method selected")]
    NoMethodChosen,
    #[error("{0} is not supported by the device")]
    MethodUnavailable(AuthenticationMethod),
    #[error("selection already finished")]
    SelectionFinished,
}

/// Live check for the static OOB field, run as the user types
pub fn validate_static_input(value: &str) -> Result<(), SelectionError> {
    if value.is_empty() {
        Err(SelectionError::EmptyStaticInput)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    capabilities: CapabilityDescriptor,
    available_methods: Vec<AuthenticationMethod>,
    chosen_method: Option<AuthenticationMethod>,
    chosen_output_action: Option<OutputAction>,
    chosen_input_action: Option<InputAction>,
    static_input: String,
    phase: Phase,
}

impl SelectionState {
    pub fn new(capabilities: CapabilityDescriptor) -> Self {
        let available_methods = compute_available_methods(&capabilities);
        debug!("offering OOB methods {available_methods:?}");
        Self {
            capabilities,
            available_methods,
            chosen_method: None,
            chosen_output_action: None,
            chosen_input_action: None,
            static_input: String::new(),
            phase: Phase::Idle,
        }
    }

    pub fn capabilities(&self) -> &CapabilityDescriptor {
        &self.capabilities
    }

    pub fn available_methods(&self) -> &[AuthenticationMethod] {
        &self.available_methods
    }

    pub fn chosen_method(&self) -> Option<AuthenticationMethod> {
        self.chosen_method
    }

    pub fn chosen_output_action(&self) -> Option<OutputAction> {
        self.chosen_output_action
    }

    pub fn chosen_input_action(&self) -> Option<InputAction> {
        self.chosen_input_action
    }

    pub fn static_input(&self) -> &str {
        &self.static_input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Output actions a view should list in the output panel
    pub fn output_actions(&self) -> Vec<OutputAction> {
        self.capabilities.supported_output_actions.iter().collect()
    }

    /// Input actions a view should list in the input panel
    pub fn input_actions(&self) -> Vec<InputAction> {
        self.capabilities.supported_input_actions.iter().collect()
    }

    /// Record the chosen method and return the panel to show
    ///
    /// The caller only offers members of `available_methods`, so this never
    /// fails. A later call overwrites the earlier choice.
    pub fn select_method(&mut self, method: AuthenticationMethod) -> UiHint {
        if self.phase.is_terminal() {
            warn!("OOB method {method:?} selected after the selection finished");
            return method.hint();
        }
        debug!("OOB method selected: {method:?}");
        self.chosen_method = Some(method);
        self.phase = Phase::MethodChosen;
        method.hint()
    }

    /// Like [`Self::select_method`], rejecting methods the device did not offer
    pub fn try_select_method(&mut self, method: AuthenticationMethod) -> Result<UiHint, SelectionError> {
        self.ensure_open()?;
        if !self.available_methods.contains(&method) {
            warn!("rejected unavailable OOB method {method:?}");
            return Err(SelectionError::MethodUnavailable(method));
        }
        Ok(self.select_method(method))
    }

    pub fn choose_output_action(&mut self, action: OutputAction) -> Result<(), SelectionError> {
        self.ensure_open()?;
        debug!("output OOB action chosen: {action:?}");
        self.chosen_output_action = Some(action);
        Ok(())
    }

    pub fn choose_input_action(&mut self, action: InputAction) -> Result<(), SelectionError> {
        self.ensure_open()?;
        debug!("input OOB action chosen: {action:?}");
        self.chosen_input_action = Some(action);
        Ok(())
    }

    pub fn set_static_input(&mut self, value: impl Into<String>) -> Result<(), SelectionError> {
        self.ensure_open()?;
        self.static_input = value.into();
        Ok(())
    }

    /// Validate the current choice and move to `Confirmed`
    ///
    /// On error the state is left untouched so the user can be re-prompted.
    pub fn finalize(&mut self) -> Result<Outcome, SelectionError> {
        self.ensure_open()?;
        let outcome = match self.chosen_method {
            None => Err(SelectionError::NoMethodChosen),
            Some(AuthenticationMethod::None) => Ok(Outcome::NoAuthentication),
            Some(AuthenticationMethod::Static) => validate_static_input(&self.static_input)
                .map(|()| Outcome::StaticAuthentication(self.static_input.clone())),
            Some(AuthenticationMethod::Output) => self
                .chosen_output_action
                .map(Outcome::OutputAuthentication)
                .ok_or(SelectionError::NoActionChosen),
            Some(AuthenticationMethod::Input) => self
                .chosen_input_action
                .map(Outcome::InputAuthentication)
                .ok_or(SelectionError::NoActionChosen),
        };

        match outcome {
            Ok(outcome) => {
                info!("OOB selection confirmed: {outcome:?}");
                self.phase = Phase::Confirmed;
                Ok(outcome)
            }
            Err(e) => {
                warn!("OOB selection not confirmed: {e}");
                Err(e)
            }
        }
    }

    /// Abandon the selection; valid from any non-terminal phase
    pub fn cancel(&mut self) -> Result<Outcome, SelectionError> {
        self.ensure_open()?;
        info!("OOB selection cancelled");
        self.phase = Phase::Cancelled;
        Ok(Outcome::Cancelled)
    }

    fn ensure_open(&self) -> Result<(), SelectionError> {
        if self.phase.is_terminal() {
            warn!("OOB selection used after it finished ({:?})", self.phase);
            return Err(SelectionError::SelectionFinished);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> CapabilityDescriptor {
        CapabilityDescriptor {
            static_oob_available: true,
            supported_output_actions: [OutputAction::Blink].into_iter().collect(),
            output_oob_size: 4,
            ..Default::default()
        }
    }

    #[test]
    fn output_blink_scenario() {
        let mut state = SelectionState::new(descriptor());
        assert_eq!(
            state.available_methods(),
            &[AuthenticationMethod::None, AuthenticationMethod::Static, AuthenticationMethod::Output]
        );
        assert_eq!(state.select_method(AuthenticationMethod::Output), UiHint::ShowOutputActions);
        state.choose_output_action(OutputAction::Blink).unwrap();
        let outcome = state.finalize().unwrap();
        assert_eq!(outcome, Outcome::OutputAuthentication(OutputAction::Blink));
        assert_eq!(state.phase(), Phase::Confirmed);
        assert_eq!(outcome.to_start(state.capabilities()).unwrap().to_bytes(), vec![0, 0, 2, 0, 4]);
    }

    #[test]
    fn second_selection_overwrites_first() {
        let mut state = SelectionState::new(descriptor());
        assert_eq!(state.select_method(AuthenticationMethod::Static), UiHint::ShowStaticInput);
        assert_eq!(state.select_method(AuthenticationMethod::None), UiHint::ShowNone);
        assert_eq!(state.chosen_method(), Some(AuthenticationMethod::None));
        assert_eq!(state.phase(), Phase::MethodChosen);
        assert_eq!(state.finalize(), Ok(Outcome::NoAuthentication));
    }

    #[test]
    fn empty_static_input_is_recoverable() {
        let mut state = SelectionState::new(descriptor());
        state.select_method(AuthenticationMethod::Static);
        assert_eq!(state.finalize(), Err(SelectionError::EmptyStaticInput));
        assert_eq!(state.phase(), Phase::MethodChosen);

        state.set_static_input("00112233").unwrap();
        assert_eq!(state.finalize(), Ok(Outcome::StaticAuthentication("00112233".to_string())));
    }

    #[test]
    fn static_input_is_not_hex_checked() {
        let mut state = SelectionState::new(descriptor());
        state.select_method(AuthenticationMethod::Static);
        state.set_static_input("not hex").unwrap();
        assert_eq!(state.finalize(), Ok(Outcome::StaticAuthentication("not hex".to_string())));
    }

    #[test]
    fn output_without_action() {
        let mut state = SelectionState::new(descriptor());
        state.select_method(AuthenticationMethod::Output);
        assert_eq!(state.finalize(), Err(SelectionError::NoActionChosen));
    }

    #[test]
    fn input_uses_input_action_only() {
        let caps = CapabilityDescriptor {
            supported_input_actions: [InputAction::Push, InputAction::InputNumeric].into_iter().collect(),
            input_oob_size: 0,
            ..Default::default()
        };
        let mut state = SelectionState::new(caps);
        state.choose_output_action(OutputAction::Beep).unwrap();
        state.select_method(AuthenticationMethod::Input);
        assert_eq!(state.finalize(), Err(SelectionError::NoActionChosen));

        state.choose_input_action(InputAction::InputNumeric).unwrap();
        let outcome = state.finalize().unwrap();
        assert_eq!(outcome, Outcome::InputAuthentication(InputAction::InputNumeric));
        // size clamped up to 1 when the device advertises 0
        assert_eq!(outcome.to_start(state.capabilities()).unwrap().to_bytes(), vec![0, 0, 3, 2, 1]);
    }

    #[test]
    fn finalize_without_method() {
        let mut state = SelectionState::new(descriptor());
        assert_eq!(state.finalize(), Err(SelectionError::NoMethodChosen));
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn cancel_regardless_of_choice() {
        let mut state = SelectionState::new(CapabilityDescriptor::default());
        state.select_method(AuthenticationMethod::None);
        assert_eq!(state.cancel(), Ok(Outcome::Cancelled));
        assert_eq!(state.phase(), Phase::Cancelled);
        assert_eq!(Outcome::Cancelled.to_start(state.capabilities()), None);

        let mut idle = SelectionState::new(CapabilityDescriptor::default());
        assert_eq!(idle.cancel(), Ok(Outcome::Cancelled));
    }

    #[test]
    fn terminal_phases_accept_nothing() {
        let mut state = SelectionState::new(descriptor());
        state.select_method(AuthenticationMethod::None);
        state.finalize().unwrap();
        assert_eq!(state.cancel(), Err(SelectionError::SelectionFinished));
        assert_eq!(state.finalize(), Err(SelectionError::SelectionFinished));
        assert_eq!(
            state.try_select_method(AuthenticationMethod::Static),
            Err(SelectionError::SelectionFinished)
        );
        assert_eq!(state.set_static_input("ab"), Err(SelectionError::SelectionFinished));
    }

    #[test]
    fn unavailable_method_rejected() {
        let mut state = SelectionState::new(CapabilityDescriptor::default());
        assert_eq!(
            state.try_select_method(AuthenticationMethod::Input),
            Err(SelectionError::MethodUnavailable(AuthenticationMethod::Input))
        );
        assert_eq!(state.chosen_method(), None);
        assert_eq!(state.try_select_method(AuthenticationMethod::None), Ok(UiHint::ShowNone));
    }

    #[test]
    fn outcome_json() {
        let json = serde_json::to_string(&Outcome::OutputAuthentication(OutputAction::Blink)).unwrap();
        assert_eq!(json, r#"{"outcome":"output_authentication","value":"Blink"}"#);
        let json = serde_json::to_string(&Outcome::Cancelled).unwrap();
        assert_eq!(json, r#"{"outcome":"cancelled"}"#);
    }
}
