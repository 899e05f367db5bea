//! Authentication method types and the capability filter
//!
//! The descriptor comes from the device's Capabilities PDU. The methods a
//! provisioner may offer are derived from it in a fixed order so indexed
//! widgets (spinners, numbered menus) stay stable.

use mesh_oob_proto::{
    AUTH_INPUT_OOB, AUTH_NO_OOB, AUTH_OUTPUT_OOB, AUTH_STATIC_OOB, Capabilities, InputActions,
    OutputActions,
};

/// What an unprovisioned device supports for OOB authentication
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CapabilityDescriptor {
    pub static_oob_available: bool,
    #[serde(default)]
    pub supported_output_actions: OutputActions,
    #[serde(default)]
    pub supported_input_actions: InputActions,
    /// Maximum digits/characters the device can output
    #[serde(default)]
    pub output_oob_size: u8,
    /// Maximum digits/characters the device can accept
    #[serde(default)]
    pub input_oob_size: u8,
}

impl From<&Capabilities> for CapabilityDescriptor {
    fn from(caps: &Capabilities) -> Self {
        Self {
            static_oob_available: caps.static_oob_available(),
            supported_output_actions: caps.output_oob_actions,
            supported_input_actions: caps.input_oob_actions,
            output_oob_size: caps.output_oob_size,
            input_oob_size: caps.input_oob_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AuthenticationMethod {
    None,
    Static,
    Output,
    Input,
}

impl AuthenticationMethod {
    /// Value of the Authentication Method field in the Start PDU
    pub fn wire_value(self) -> u8 {
        match self {
            AuthenticationMethod::None => AUTH_NO_OOB,
            AuthenticationMethod::Static => AUTH_STATIC_OOB,
            AuthenticationMethod::Output => AUTH_OUTPUT_OOB,
            AuthenticationMethod::Input => AUTH_INPUT_OOB,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuthenticationMethod::None => "No OOB authentication",
            AuthenticationMethod::Static => "Static OOB authentication",
            AuthenticationMethod::Output => "Output OOB authentication",
            AuthenticationMethod::Input => "Input OOB authentication",
        }
    }

    /// Panel a view should show while this method is selected
    pub fn hint(self) -> UiHint {
        match self {
            AuthenticationMethod::None => UiHint::ShowNone,
            AuthenticationMethod::Static => UiHint::ShowStaticInput,
            AuthenticationMethod::Output => UiHint::ShowOutputActions,
            AuthenticationMethod::Input => UiHint::ShowInputActions,
        }
    }
}

impl std::fmt::Display for AuthenticationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which one of the mutually exclusive panels is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiHint {
    ShowNone,
    ShowStaticInput,
    ShowOutputActions,
    ShowInputActions,
}

/// Methods the device allows, always starting with `None`
///
/// Order is `None, Static, Output, Input` filtered by the descriptor.
pub fn compute_available_methods(capabilities: &CapabilityDescriptor) -> Vec<AuthenticationMethod> {
    let mut methods = vec![AuthenticationMethod::None];

    if capabilities.static_oob_available {
        methods.push(AuthenticationMethod::Static);
    }

    if !capabilities.supported_output_actions.is_empty() {
        methods.push(AuthenticationMethod::Output);
    }

    if !capabilities.supported_input_actions.is_empty() {
        methods.push(AuthenticationMethod::Input);
    }

    methods
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_oob_proto::{InputAction, OutputAction};

    #[test]
    fn empty_descriptor_offers_only_none() {
        let caps = CapabilityDescriptor::default();
        assert_eq!(compute_available_methods(&caps), vec![AuthenticationMethod::None]);
    }

    #[test]
    fn none_is_always_first() {
        for bits in 0u8..8 {
            let caps = CapabilityDescriptor {
                static_oob_available: bits & 1 != 0,
                supported_output_actions: OutputActions::from_bits((bits as u16 >> 1) & 1),
                supported_input_actions: InputActions::from_bits((bits as u16 >> 2) & 1),
                ..Default::default()
            };
            let methods = compute_available_methods(&caps);
            assert_eq!(methods.first(), Some(&AuthenticationMethod::None));
            assert_eq!(methods.len(), 1 + bits.count_ones() as usize);
        }
    }

    #[test]
    fn all_capabilities() {
        let caps = CapabilityDescriptor {
            static_oob_available: true,
            supported_output_actions: [OutputAction::Beep].into_iter().collect(),
            supported_input_actions: [InputAction::Twist].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(
            compute_available_methods(&caps),
            vec![
                AuthenticationMethod::None,
                AuthenticationMethod::Static,
                AuthenticationMethod::Output,
                AuthenticationMethod::Input,
            ]
        );
    }

    #[test]
    fn order_ignores_action_insertion_order() {
        let a = CapabilityDescriptor {
            supported_output_actions: [OutputAction::Vibrate, OutputAction::Blink].into_iter().collect(),
            supported_input_actions: [InputAction::InputNumeric, InputAction::Push].into_iter().collect(),
            ..Default::default()
        };
        let b = CapabilityDescriptor {
            supported_output_actions: [OutputAction::Blink, OutputAction::Vibrate].into_iter().collect(),
            supported_input_actions: [InputAction::Push, InputAction::InputNumeric].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(a, b);
        assert_eq!(compute_available_methods(&a), compute_available_methods(&b));
        assert_eq!(
            compute_available_methods(&a),
            vec![AuthenticationMethod::None, AuthenticationMethod::Output, AuthenticationMethod::Input]
        );
    }

    #[test]
    fn descriptor_from_capabilities_pdu() {
        let caps = Capabilities::from_bytes(&[1, 0, 1, 0, 0, 0, 0, 0, 2, 0, 0x0c]).unwrap();
        let descriptor = CapabilityDescriptor::from(&caps);
        assert!(!descriptor.static_oob_available);
        assert!(descriptor.supported_output_actions.is_empty());
        assert_eq!(
            descriptor.supported_input_actions.iter().collect::<Vec<_>>(),
            vec![InputAction::InputNumeric, InputAction::InputAlphaNumeric]
        );
        assert_eq!(descriptor.input_oob_size, 2);
    }
}
