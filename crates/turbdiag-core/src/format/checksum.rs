// crates/turbdiag-core/src/format/checksum.rs
//
// Integrity trailer shared by binary containers: crc32 (LE) over the body,
// then the first 16 bytes of blake3 over body + crc.

use crate::error::{DiagError, Result};

pub const TRAILER_LEN: usize = 4 + 16;

pub fn blake3_16(bytes: &[u8]) -> [u8; 16] {
    let hash = blake3::hash(bytes);
    let mut id = [0u8; 16];
    id.copy_from_slice(&hash.as_bytes()[..16]);
    id
}

/// Append the trailer to a finished body.
pub fn seal(buf: &mut Vec<u8>) {
    let crc = crc32fast::hash(buf);
    buf.extend_from_slice(&crc.to_le_bytes());
    let id = blake3_16(buf);
    buf.extend_from_slice(&id);
}

/// Check the trailer at the end of `bytes`; returns the body and its id.
pub fn verify(bytes: &[u8]) -> Result<(&[u8], [u8; 16])> {
    let Some(body_end) = bytes.len().checked_sub(TRAILER_LEN) else {
        return Err(DiagError::GridFormat("too short for checksum trailer".into()));
    };
    let (body, trailer) = bytes.split_at(body_end);

    let mut crc = [0u8; 4];
    crc.copy_from_slice(&trailer[..4]);
    if u32::from_le_bytes(crc) != crc32fast::hash(body) {
        return Err(DiagError::GridFormat("crc32 mismatch".into()));
    }

    let mut id = [0u8; 16];
    id.copy_from_slice(&trailer[4..]);
    if id != blake3_16(&bytes[..body_end + 4]) {
        return Err(DiagError::GridFormat("blake3 mismatch".into()));
    }
    Ok((body, id))
}
