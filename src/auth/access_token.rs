use chrono::Utc;

// Opaque session token: hex(timestamp_le) + hex(ttl_le) + hex(signature),
// signature is a blake3 keyed hash over timestamp and ttl. The rest of the
// crate treats the identity behind it as opaque.

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

fn signature_payload(timestamp: i64, ttl_secs: u16) -> [u8; 10] {
    let mut payload = [0u8; 10];
    payload[..8].copy_from_slice(&timestamp.to_le_bytes());
    payload[8..].copy_from_slice(&ttl_secs.to_le_bytes());
    payload
}

pub fn create_access_token(secret: &[u8; 32], ttl_secs: u16) -> String {
    let timestamp = Utc::now().timestamp();
    let hash = blake3::keyed_hash(secret, &signature_payload(timestamp, ttl_secs));
    format!(
        "{}{}{}",
        hex_encode(&timestamp.to_le_bytes()),
        hex_encode(&ttl_secs.to_le_bytes()),
        hex_encode(hash.as_bytes())
    )
}

pub fn verify_access_token(token_str: &str, secret: &[u8; 32]) -> bool {
    if token_str.len() != 84 {
        return false;
    }

    let timestamp_bytes = hex_decode(&token_str[0..16]).unwrap_or_default();
    if timestamp_bytes.len() != 8 {
        return false;
    }
    let timestamp = i64::from_le_bytes(timestamp_bytes.try_into().unwrap_or([0; 8]));
    if timestamp == 0 {
        return false;
    }

    let ttl_bytes = hex_decode(&token_str[16..20]).unwrap_or_default();
    if ttl_bytes.len() != 2 {
        return false;
    }
    let ttl_secs = u16::from_le_bytes(ttl_bytes.try_into().unwrap_or([0; 2]));
    let signature = hex_decode(&token_str[20..]).unwrap_or_default();

    if Utc::now().timestamp() - timestamp > i64::from(ttl_secs) {
        return false;
    }

    let expected = blake3::keyed_hash(secret, &signature_payload(timestamp, ttl_secs));
    constant_time_eq(expected.as_bytes(), &signature)
}
