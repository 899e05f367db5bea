//! Bluetooth Mesh provisioning wire types - capabilities, start and framing

use std::io;

pub mod actions;

pub use actions::{InputAction, InputActions, OutputAction, OutputActions};

// Provisioning PDU types
pub const PDU_CAPABILITIES: u8 = 0x01;
pub const PDU_START: u8 = 0x02;

// Authentication Method field of the Start PDU
pub const AUTH_NO_OOB: u8 = 0x00;
pub const AUTH_STATIC_OOB: u8 = 0x01;
pub const AUTH_OUTPUT_OOB: u8 = 0x02;
pub const AUTH_INPUT_OOB: u8 = 0x03;

/// Static OOB Type bit: static OOB information available
pub const STATIC_OOB_AVAILABLE: u8 = 0x01;

/// Largest Output/Input OOB Size a device may advertise
pub const MAX_OOB_SIZE: u8 = 8;

/// FIPS P-256 Elliptic Curve, the only algorithm defined for provisioning
pub const ALGORITHM_FIPS_P256: u16 = 0x0001;

/// Capabilities PDU parameters, sent by the device in reply to an invite
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capabilities {
    pub elements: u8,
    pub algorithms: u16,
    pub public_key_type: u8,
    pub static_oob_type: u8,
    pub output_oob_size: u8,
    pub output_oob_actions: OutputActions,
    pub input_oob_size: u8,
    pub input_oob_actions: InputActions,
}

impl Capabilities {
    pub const LEN: usize = 11;

    pub fn static_oob_available(&self) -> bool {
        self.static_oob_type & STATIC_OOB_AVAILABLE != 0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::LEN);
        buf.push(self.elements);
        buf.extend_from_slice(&self.algorithms.to_be_bytes());
        buf.push(self.public_key_type);
        buf.push(self.static_oob_type);
        buf.push(self.output_oob_size);
        buf.extend_from_slice(&self.output_oob_actions.bits().to_be_bytes());
        buf.push(self.input_oob_size);
        buf.extend_from_slice(&self.input_oob_actions.bits().to_be_bytes());
        buf
    }

    pub fn from_bytes(data: &[u8]) -> io::Result<Self> {
        if data.len() < Self::LEN {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "CAPABILITIES too short"));
        }
        if data[0] == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "CAPABILITIES with zero elements"));
        }
        Ok(Self {
            elements: data[0],
            algorithms: u16::from_be_bytes([data[1], data[2]]),
            public_key_type: data[3],
            static_oob_type: data[4],
            output_oob_size: data[5],
            output_oob_actions: OutputActions::from_bits(u16::from_be_bytes([data[6], data[7]])),
            input_oob_size: data[8],
            input_oob_actions: InputActions::from_bits(u16::from_be_bytes([data[9], data[10]])),
        })
    }
}

/// Start PDU parameters, sent by the provisioner to pick the authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Start {
    pub algorithm: u8,
    pub public_key: u8,
    pub auth_method: u8,
    pub auth_action: u8,
    pub auth_size: u8,
}

impl Start {
    /// Start with FIPS P-256 and no OOB public key
    pub fn new(auth_method: u8, auth_action: u8, auth_size: u8) -> Self {
        Self {
            algorithm: 0,
            public_key: 0,
            auth_method,
            auth_action,
            auth_size,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        vec![
            self.algorithm,
            self.public_key,
            self.auth_method,
            self.auth_action,
            self.auth_size,
        ]
    }
}

/// Clamp an advertised OOB size into the range a Start PDU may carry
pub fn start_size(advertised: u8) -> u8 {
    advertised.clamp(1, MAX_OOB_SIZE)
}

/// Provisioning PDU: one type byte followed by the parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    pub pdu_type: u8,
    pub parameters: Vec<u8>,
}

impl Pdu {
    pub fn new(pdu_type: u8, parameters: Vec<u8>) -> Self {
        Self { pdu_type, parameters }
    }

    pub fn start(start: &Start) -> Self {
        Self::new(PDU_START, start.to_bytes())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + self.parameters.len());
        buf.push(self.pdu_type);
        buf.extend_from_slice(&self.parameters);
        buf
    }

    pub fn from_bytes(data: &[u8]) -> io::Result<Self> {
        let (&pdu_type, parameters) = data
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "empty PDU"))?;
        // Upper two bits are padding and must be zero
        if pdu_type & 0xc0 != 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "PDU padding bits set"));
        }
        Ok(Self::new(pdu_type, parameters.to_vec()))
    }
}
