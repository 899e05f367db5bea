//! Line-oriented terminal view for the selection flow
//!
//! Commands:
//!   <n>        select the n-th offered method
//!   a <n>      choose the n-th action of the visible panel
//!   s <value>  set the static OOB value (non-hex characters are dropped)
//!   ok         confirm
//!   cancel     cancel (also on end of input)

use std::io::{self, BufRead, Write};

use mesh_oob_proto::{InputAction, OutputAction};
use mesh_oob_select::{AuthenticationMethod, SelectionError, SelectionState, SelectionView, UiHint, UserEvent};

const HELP: &str = "commands: <n> method, a <n> action, s <value> static OOB, ok, cancel";

/// Keep only hex digits, like a hex key filter on a text field
pub fn filter_hex(value: &str) -> String {
    value.chars().filter(char::is_ascii_hexdigit).collect()
}

pub struct TerminalView<R, W> {
    input: R,
    output: W,
    methods: Vec<AuthenticationMethod>,
    panel: UiHint,
    output_actions: Vec<OutputAction>,
    input_actions: Vec<InputAction>,
}

impl<R: BufRead, W: Write> TerminalView<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            methods: Vec::new(),
            panel: UiHint::ShowNone,
            output_actions: Vec::new(),
            input_actions: Vec::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn parse(&mut self, line: &str) -> io::Result<Option<UserEvent>> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let event = match command {
            "" => None,
            "ok" => Some(UserEvent::Confirm),
            "cancel" | "q" => Some(UserEvent::Cancel),
            "s" if self.panel == UiHint::ShowStaticInput => {
                Some(UserEvent::StaticInputChanged(filter_hex(arg)))
            }
            "s" => {
                writeln!(self.output, "static OOB is not selected")?;
                None
            }
            "a" => self.action_event(arg)?,
            n => match n.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                Some(i) if i < self.methods.len() => Some(UserEvent::MethodSelected(self.methods[i])),
                Some(_) => {
                    writeln!(self.output, "no method {n}")?;
                    None
                }
                None => {
                    writeln!(self.output, "{HELP}")?;
                    None
                }
            },
        };
        Ok(event)
    }

    fn action_event(&mut self, arg: &str) -> io::Result<Option<UserEvent>> {
        let index = arg.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
        let event = match (self.panel, index) {
            (UiHint::ShowOutputActions, Some(i)) => {
                self.output_actions.get(i).copied().map(UserEvent::OutputActionChosen)
            }
            (UiHint::ShowInputActions, Some(i)) => {
                self.input_actions.get(i).copied().map(UserEvent::InputActionChosen)
            }
            (UiHint::ShowOutputActions | UiHint::ShowInputActions, None) => None,
            _ => {
                writeln!(self.output, "no actions to choose for this method")?;
                return Ok(None);
            }
        };
        if event.is_none() {
            writeln!(self.output, "no action {arg}")?;
        }
        Ok(event)
    }
}

impl<R: BufRead, W: Write> SelectionView for TerminalView<R, W> {
    type Error = io::Error;

    fn show_methods(&mut self, methods: &[AuthenticationMethod]) -> io::Result<()> {
        self.methods = methods.to_vec();
        writeln!(self.output, "Select OOB type:")?;
        for (i, method) in methods.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, method)?;
        }
        Ok(())
    }

    fn show_panel(&mut self, hint: UiHint, state: &SelectionState) -> io::Result<()> {
        self.panel = hint;
        match hint {
            UiHint::ShowNone => writeln!(self.output, "No OOB authentication will be used.")?,
            UiHint::ShowStaticInput => writeln!(self.output, "Enter the static OOB value: s <hex>")?,
            UiHint::ShowOutputActions => {
                self.output_actions = state.output_actions();
                writeln!(self.output, "Output OOB actions:")?;
                for (i, action) in self.output_actions.iter().enumerate() {
                    writeln!(self.output, "  a {}) {}", i + 1, action.label())?;
                }
            }
            UiHint::ShowInputActions => {
                self.input_actions = state.input_actions();
                writeln!(self.output, "Input OOB actions:")?;
                for (i, action) in self.input_actions.iter().enumerate() {
                    writeln!(self.output, "  a {}) {}", i + 1, action.label())?;
                }
            }
        }
        Ok(())
    }

    fn show_error(&mut self, error: &SelectionError) -> io::Result<()> {
        writeln!(self.output, "error: {error}")
    }

    fn next_event(&mut self) -> io::Result<UserEvent> {
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(UserEvent::Cancel);
            }
            if let Some(event) = self.parse(&line)? {
                return Ok(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_oob_select::{CapabilityDescriptor, Outcome, SelectionFlow};
    use std::io::Cursor;

    fn run(caps: CapabilityDescriptor, script: &str) -> (Outcome, Vec<Outcome>, String) {
        let mut seen = Vec::new();
        let mut view = TerminalView::new(Cursor::new(script.to_string()), Vec::new());
        let flow = SelectionFlow::new(caps, |o: Outcome| seen.push(o));
        let outcome = flow.run(&mut view).unwrap();
        let output = String::from_utf8(view.into_output()).unwrap();
        (outcome, seen, output)
    }

    fn full() -> CapabilityDescriptor {
        CapabilityDescriptor {
            static_oob_available: true,
            supported_output_actions: [OutputAction::Blink, OutputAction::OutputNumeric].into_iter().collect(),
            supported_input_actions: [InputAction::Twist].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn hex_filter() {
        assert_eq!(filter_hex("0a:Bc-zz 9"), "0aBc9");
    }

    #[test]
    fn choose_output_numeric() {
        let (outcome, seen, output) = run(full(), "3\nok\na 2\nok\n");
        assert_eq!(outcome, Outcome::OutputAuthentication(OutputAction::OutputNumeric));
        assert_eq!(seen, vec![outcome]);
        assert!(output.contains("  3) Output OOB authentication"));
        assert!(output.contains("  a 2) output numeric"));
        assert!(output.contains("error: no OOB action selected"));
    }

    #[test]
    fn static_value_is_filtered() {
        let (outcome, _, output) = run(full(), "2\ns xyz\nok\ns 12-34\nok\n");
        assert_eq!(outcome, Outcome::StaticAuthentication("1234".to_string()));
        assert!(output.contains("error: static OOB value must not be empty"));
    }

    #[test]
    fn end_of_input_cancels() {
        let (outcome, seen, _) = run(CapabilityDescriptor::default(), "");
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(seen, vec![Outcome::Cancelled]);
    }

    #[test]
    fn bad_commands_are_ignored() {
        let (outcome, _, output) = run(full(), "9\na 1\nhello\n4\na 5\na 1\nok\n");
        assert_eq!(outcome, Outcome::InputAuthentication(InputAction::Twist));
        assert!(output.contains("no method 9"));
        assert!(output.contains("no actions to choose for this method"));
        assert!(output.contains(HELP));
        assert!(output.contains("no action 5"));
    }

    #[test]
    fn default_is_no_oob() {
        let (outcome, _, output) = run(full(), "ok\n");
        assert_eq!(outcome, Outcome::NoAuthentication);
        assert!(output.contains("No OOB authentication will be used."));
    }
}
