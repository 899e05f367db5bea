//! Listener and view traits, and the flow that connects them to the engine
//!
//! A UI implements [`SelectionView`] to render hints and report user input.
//! Whoever starts provisioning passes a [`SelectionListener`] in; it hears
//! exactly one callback when the dialog ends.

use log::debug;
use mesh_oob_proto::{InputAction, OutputAction};

use crate::method::{AuthenticationMethod, CapabilityDescriptor, UiHint};
use crate::state::{Outcome, SelectionError, SelectionState, validate_static_input};

/// Receives the terminal outcome of a selection dialog
pub trait SelectionListener {
    fn on_no_oob_selected(&mut self);

    fn on_static_oob_selected(&mut self, value: &str);

    fn on_output_oob_action_selected(&mut self, action: OutputAction);

    fn on_input_oob_action_selected(&mut self, action: InputAction);

    fn on_selection_cancelled(&mut self);
}

impl<F: FnMut(Outcome)> SelectionListener for F {
    fn on_no_oob_selected(&mut self) {
        self(Outcome::NoAuthentication)
    }

    fn on_static_oob_selected(&mut self, value: &str) {
        self(Outcome::StaticAuthentication(value.to_string()))
    }

    fn on_output_oob_action_selected(&mut self, action: OutputAction) {
        self(Outcome::OutputAuthentication(action))
    }

    fn on_input_oob_action_selected(&mut self, action: InputAction) {
        self(Outcome::InputAuthentication(action))
    }

    fn on_selection_cancelled(&mut self) {
        self(Outcome::Cancelled)
    }
}

/// Route an outcome to the matching listener callback
pub fn dispatch<L: SelectionListener + ?Sized>(listener: &mut L, outcome: &Outcome) {
    match outcome {
        Outcome::NoAuthentication => listener.on_no_oob_selected(),
        Outcome::StaticAuthentication(value) => listener.on_static_oob_selected(value),
        Outcome::OutputAuthentication(action) => listener.on_output_oob_action_selected(*action),
        Outcome::InputAuthentication(action) => listener.on_input_oob_action_selected(*action),
        Outcome::Cancelled => listener.on_selection_cancelled(),
    }
}

/// Input reported by a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    MethodSelected(AuthenticationMethod),
    OutputActionChosen(OutputAction),
    InputActionChosen(InputAction),
    StaticInputChanged(String),
    Confirm,
    Cancel,
}

/// Result of applying one [`UserEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Visible panel changed
    Render(UiHint),
    /// State changed, panel unchanged
    Updated,
    /// Event refused; the flow is still open
    Rejected(SelectionError),
    /// Terminal outcome, already sent to the listener
    Finished(Outcome),
}

/// Trait for presentation layers driving a selection
///
/// A GUI dialog, a terminal prompt or a test script implements this.
pub trait SelectionView {
    /// Error type for view I/O
    type Error;

    /// Show the offered methods, in order
    fn show_methods(&mut self, methods: &[AuthenticationMethod]) -> Result<(), Self::Error>;

    /// Make the panel for `hint` the only visible one
    fn show_panel(&mut self, hint: UiHint, state: &SelectionState) -> Result<(), Self::Error>;

    /// Report a validation error next to the relevant panel
    fn show_error(&mut self, error: &SelectionError) -> Result<(), Self::Error>;

    /// Block until the user does something
    fn next_event(&mut self) -> Result<UserEvent, Self::Error>;
}

/// One selection dialog: the engine state plus the injected listener
pub struct SelectionFlow<L> {
    state: SelectionState,
    listener: L,
}

impl<L: SelectionListener> SelectionFlow<L> {
    pub fn new(capabilities: CapabilityDescriptor, listener: L) -> Self {
        Self {
            state: SelectionState::new(capabilities),
            listener,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Apply one user event
    pub fn handle(&mut self, event: UserEvent) -> Step {
        debug!("OOB selection event {event:?}");
        let result = match event {
            UserEvent::MethodSelected(method) => self.state.try_select_method(method).map(Step::Render),
            UserEvent::OutputActionChosen(action) => {
                self.state.choose_output_action(action).map(|()| Step::Updated)
            }
            UserEvent::InputActionChosen(action) => {
                self.state.choose_input_action(action).map(|()| Step::Updated)
            }
            UserEvent::StaticInputChanged(value) => {
                let live = validate_static_input(&value);
                self.state
                    .set_static_input(value)
                    .map(|()| live.map_or_else(Step::Rejected, |()| Step::Updated))
            }
            UserEvent::Confirm => self.state.finalize().map(Step::Finished),
            UserEvent::Cancel => self.state.cancel().map(Step::Finished),
        };

        match result {
            Ok(Step::Finished(outcome)) => {
                dispatch(&mut self.listener, &outcome);
                Step::Finished(outcome)
            }
            Ok(step) => step,
            Err(e) => Step::Rejected(e),
        }
    }

    /// Drive `view` until the user confirms a valid choice or cancels
    pub fn run<V: SelectionView>(mut self, view: &mut V) -> Result<Outcome, V::Error> {
        view.show_methods(self.state.available_methods())?;
        // The first entry is pre-selected, as a spinner would be
        let first = self.state.available_methods()[0];
        if let Step::Render(hint) = self.handle(UserEvent::MethodSelected(first)) {
            view.show_panel(hint, &self.state)?;
        }

        loop {
            let event = view.next_event()?;
            match self.handle(event) {
                Step::Render(hint) => view.show_panel(hint, &self.state)?,
                Step::Updated => {}
                Step::Rejected(e) => view.show_error(&e)?,
                Step::Finished(outcome) => return Ok(outcome),
            }
        }
    }
}
