use tradevault_core::OrderHash;

/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Identity of an order: the BLAKE3 hash of its full signing payload.
pub fn order_hash(signing_payload: &[u8]) -> OrderHash {
    OrderHash(hash(signing_payload))
}
