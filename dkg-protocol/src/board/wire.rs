use bincode::Options;
use dkg_core::domain::Signed;
use dkg_core::foundation::{DkgError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

const WIRE_PROTOCOL_VERSION_V1: u16 = 1;

pub fn encode_envelope<T: Serialize>(envelope: &Signed<T>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(&WIRE_PROTOCOL_VERSION_V1.to_le_bytes());
    let bytes = bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .serialize(envelope)
        .map_err(|err| DkgError::SerializationError(err.to_string()))?;
    out.extend_from_slice(&bytes);
    Ok(out)
}

pub fn decode_envelope<T: DeserializeOwned>(bytes: &[u8]) -> Result<Signed<T>> {
    if bytes.len() < 2 {
        return Err(DkgError::NetworkError("board message too short".to_string()));
    }
    let version = u16::from_le_bytes([bytes[0], bytes[1]]);
    if version != WIRE_PROTOCOL_VERSION_V1 {
        return Err(DkgError::NetworkError(format!(
            "wire protocol version mismatch: expected {WIRE_PROTOCOL_VERSION_V1}, got {version}"
        )));
    }
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .deserialize(&bytes[2..])
        .map_err(|err| DkgError::SerializationError(err.to_string()))
}
