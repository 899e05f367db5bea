//! OOB action bitmasks carried in the Provisioning Capabilities PDU
//!
//! Each action is one bit of a 16-bit field. The sets below iterate in bit
//! order, so two sets with the same members always list them the same way.

/// Physical action the device performs to show the OOB value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputAction {
    Blink,
    Beep,
    Vibrate,
    OutputNumeric,
    OutputAlphaNumeric,
}

/// Physical action the user performs on the device to enter the OOB value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputAction {
    Push,
    Twist,
    InputNumeric,
    InputAlphaNumeric,
}

impl OutputAction {
    pub const ALL: [OutputAction; 5] = [
        OutputAction::Blink,
        OutputAction::Beep,
        OutputAction::Vibrate,
        OutputAction::OutputNumeric,
        OutputAction::OutputAlphaNumeric,
    ];

    /// Bit index in the Output OOB Action field, also the Start PDU action value
    pub fn bit(self) -> u8 {
        match self {
            OutputAction::Blink => 0,
            OutputAction::Beep => 1,
            OutputAction::Vibrate => 2,
            OutputAction::OutputNumeric => 3,
            OutputAction::OutputAlphaNumeric => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputAction::Blink => "blink",
            OutputAction::Beep => "beep",
            OutputAction::Vibrate => "vibrate",
            OutputAction::OutputNumeric => "output numeric",
            OutputAction::OutputAlphaNumeric => "output alphanumeric",
        }
    }
}

impl InputAction {
    pub const ALL: [InputAction; 4] = [
        InputAction::Push,
        InputAction::Twist,
        InputAction::InputNumeric,
        InputAction::InputAlphaNumeric,
    ];

    /// Bit index in the Input OOB Action field, also the Start PDU action value
    pub fn bit(self) -> u8 {
        match self {
            InputAction::Push => 0,
            InputAction::Twist => 1,
            InputAction::InputNumeric => 2,
            InputAction::InputAlphaNumeric => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InputAction::Push => "push",
            InputAction::Twist => "twist",
            InputAction::InputNumeric => "input numeric",
            InputAction::InputAlphaNumeric => "input alphanumeric",
        }
    }
}

/// Set of supported output actions, stored as the wire bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputActions(u16);

/// Set of supported input actions, stored as the wire bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputActions(u16);

macro_rules! action_set {
    ($set:ident, $action:ident) => {
        impl $set {
            /// Build from a raw bitmask, dropping reserved bits
            pub fn from_bits(bits: u16) -> Self {
                let known = $action::ALL.iter().fold(0u16, |m, a| m | (1 << a.bit()));
                Self(bits & known)
            }

            pub fn bits(&self) -> u16 {
                self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0 == 0
            }

            pub fn contains(&self, action: $action) -> bool {
                self.0 & (1 << action.bit()) != 0
            }

            pub fn insert(&mut self, action: $action) {
                self.0 |= 1 << action.bit();
            }

            pub fn iter(&self) -> impl Iterator<Item = $action> + '_ {
                $action::ALL.into_iter().filter(|a| self.contains(*a))
            }
        }

        impl FromIterator<$action> for $set {
            fn from_iter<I: IntoIterator<Item = $action>>(iter: I) -> Self {
                let mut set = Self::default();
                for action in iter {
                    set.insert(action);
                }
                set
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $set {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_seq(self.iter())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $set {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let actions = Vec::<$action>::deserialize(deserializer)?;
                Ok(actions.into_iter().collect())
            }
        }
    };
}

action_set!(OutputActions, OutputAction);
action_set!(InputActions, InputAction);
