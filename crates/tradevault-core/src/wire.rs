//! Fixed-width big-endian primitives shared by the canonical order encoding
//! and the adapter argument codecs.
//!
//! Readers check the remaining length before every read, so truncated input
//! yields [`CoreError::DecodeError`] instead of a panic.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::CoreError;
use crate::types::{Address, AssetId};

/// Upper bound on any length-prefixed field.
pub const MAX_FIELD_LEN: usize = 4096;

pub fn put_str(buf: &mut BytesMut, s: &str) {
    put_bytes(buf, s.as_bytes());
}

pub fn put_bytes(buf: &mut BytesMut, bytes: &[u8]) {
    buf.put_u32(bytes.len() as u32);
    buf.put_slice(bytes);
}

fn ensure<B: Buf>(buf: &B, needed: usize, what: &str) -> Result<(), CoreError> {
    if buf.remaining() < needed {
        return Err(CoreError::DecodeError(format!(
            "truncated {}: need {} bytes, have {}",
            what,
            needed,
            buf.remaining()
        )));
    }
    Ok(())
}

pub fn get_u8<B: Buf>(buf: &mut B, what: &str) -> Result<u8, CoreError> {
    ensure(buf, 1, what)?;
    Ok(buf.get_u8())
}

pub fn get_u64<B: Buf>(buf: &mut B, what: &str) -> Result<u64, CoreError> {
    ensure(buf, 8, what)?;
    Ok(buf.get_u64())
}

pub fn get_u128<B: Buf>(buf: &mut B, what: &str) -> Result<u128, CoreError> {
    ensure(buf, 16, what)?;
    Ok(buf.get_u128())
}

pub fn get_address<B: Buf>(buf: &mut B, what: &str) -> Result<Address, CoreError> {
    ensure(buf, Address::LEN, what)?;
    let mut bytes = [0u8; 20];
    buf.copy_to_slice(&mut bytes);
    Ok(Address::from_bytes(bytes))
}

pub fn get_bytes<B: Buf>(buf: &mut B, what: &str) -> Result<Vec<u8>, CoreError> {
    ensure(buf, 4, what)?;
    let len = buf.get_u32() as usize;
    if len > MAX_FIELD_LEN {
        return Err(CoreError::DecodeError(format!(
            "{} length {} exceeds limit {}",
            what, len, MAX_FIELD_LEN
        )));
    }
    ensure(buf, len, what)?;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    Ok(bytes)
}

pub fn get_asset<B: Buf>(buf: &mut B, what: &str) -> Result<AssetId, CoreError> {
    let raw = get_bytes(buf, what)?;
    let s = String::from_utf8(raw)
        .map_err(|e| CoreError::DecodeError(format!("{} is not utf-8: {}", what, e)))?;
    AssetId::new(s)
}

/// Boolean presence flag: 0 or 1, anything else is rejected.
pub fn get_flag<B: Buf>(buf: &mut B, what: &str) -> Result<bool, CoreError> {
    match get_u8(buf, what)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(CoreError::DecodeError(format!("invalid {} flag {}", what, other))),
    }
}
