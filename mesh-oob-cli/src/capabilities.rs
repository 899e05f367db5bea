//! Loading device capabilities from the command line, a file or the environment

use std::path::{Path, PathBuf};

use mesh_oob_proto::{Capabilities, PDU_CAPABILITIES, Pdu};
use mesh_oob_select::CapabilityDescriptor;

/// Environment variable holding hex Capabilities PDU parameters
pub const CAPABILITIES_ENV: &str = "MESH_OOB_CAPABILITIES";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no capabilities given, use --capabilities, --file or MESH_OOB_CAPABILITIES")]
    Missing,
    #[error("invalid hex: {0}")]
    Hex(#[from] data_encoding::DecodeError),
    #[error("invalid capabilities PDU: {0}")]
    Pdu(std::io::Error),
    #[error("expected a capabilities PDU, got type 0x{0:02x}")]
    WrongPduType(u8),
    #[error("expected 11 or 12 capabilities bytes, got {0}")]
    Length(usize),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid capabilities file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode hex Capabilities parameters, with or without the PDU type byte
pub fn parse_hex(hex: &str) -> Result<Capabilities, LoadError> {
    let hex = hex.trim();
    let hex = match hex.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => &hex[2..],
        _ => hex,
    };
    let cleaned: String = hex
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let bytes = data_encoding::HEXLOWER_PERMISSIVE.decode(cleaned.as_bytes())?;

    let parameters = match bytes.len() {
        Capabilities::LEN => bytes,
        n if n == Capabilities::LEN + 1 => {
            let pdu = Pdu::from_bytes(&bytes).map_err(LoadError::Pdu)?;
            if pdu.pdu_type != PDU_CAPABILITIES {
                return Err(LoadError::WrongPduType(pdu.pdu_type));
            }
            pdu.parameters
        }
        n => return Err(LoadError::Length(n)),
    };

    Capabilities::from_bytes(&parameters).map_err(LoadError::Pdu)
}

/// Read a JSON descriptor file
pub fn read_file(path: &Path) -> Result<CapabilityDescriptor, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Hex from the flag, falling back to the environment
pub fn hex_source(flag: Option<&str>) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| std::env::var(CAPABILITIES_ENV).ok())
}

/// Resolve the descriptor: `--capabilities`, then `--file`, then the environment
pub fn load(hex: Option<&str>, file: Option<&Path>) -> Result<CapabilityDescriptor, LoadError> {
    if let Some(hex) = hex {
        return Ok(CapabilityDescriptor::from(&parse_hex(hex)?));
    }
    if let Some(path) = file {
        return read_file(path);
    }
    match hex_source(None) {
        Some(hex) => Ok(CapabilityDescriptor::from(&parse_hex(&hex)?)),
        None => Err(LoadError::Missing),
    }
}
