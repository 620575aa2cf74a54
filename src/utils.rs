use chrono::Utc;
use rand::Rng;

const HEX_ALPHABET: &[u8; 16] = b"0123456789abcdef";

pub const HASH_HEX_DIGITS: usize = 40;

pub const ID_RANDOM_BOUND: u32 = 1000;

pub const DEFAULT_ID_PREFIX: &str = "tx";
pub const DEFAULT_CONFIRMATION_DELAY_MS: u64 = 2000;

pub const REDEMPTION_TASK_ID: &str = "redemption";

/// Display-only: random, not derived from any content.
pub fn generate_hash() -> String {
    let mut rng = rand::thread_rng();
    let mut hash = String::with_capacity(2 + HASH_HEX_DIGITS);
    hash.push_str("0x");
    for _ in 0..HASH_HEX_DIGITS {
        hash.push(HEX_ALPHABET[rng.gen_range(0..HEX_ALPHABET.len())] as char);
    }
    hash
}

pub fn generate_transaction_id(prefix: &str, timestamp: i64) -> String {
    let suffix = rand::thread_rng().gen_range(0..ID_RANDOM_BOUND);
    format!("{}-{}-{}", prefix, timestamp, suffix)
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Narrow a wide point total back to `i64`, saturating at the bounds.
pub fn clamp_points(total: i128) -> i64 {
    total.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

pub fn is_hash(candidate: &str) -> bool {
    candidate.len() == 2 + HASH_HEX_DIGITS
        && candidate.starts_with("0x")
        && candidate[2..].bytes().all(|b| HEX_ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn hash_has_prefix_and_forty_hex_digits() {
        let hash = generate_hash();
        assert_eq!(hash.len(), 42);
        assert!(hash.starts_with("0x"));
        assert!(is_hash(&hash));
    }

    #[test]
    fn ten_thousand_hashes_are_distinct() {
        let hashes: HashSet<String> = (0..10_000).map(|_| generate_hash()).collect();
        assert_eq!(hashes.len(), 10_000);
    }

    #[test]
    fn transaction_id_layout() {
        let id = generate_transaction_id("tx", 1_700_000_000_000);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "tx");
        assert_eq!(parts[1], "1700000000000");
        let suffix: u32 = parts[2].parse().unwrap();
        assert!(suffix < ID_RANDOM_BOUND);
    }

    #[test]
    fn clamps_only_out_of_range_totals() {
        assert_eq!(clamp_points(-42), -42);
        assert_eq!(clamp_points(i128::from(i64::MAX) + 5), i64::MAX);
        assert_eq!(clamp_points(i128::from(i64::MIN) - 5), i64::MIN);
    }

    #[test]
    fn rejects_malformed_hashes() {
        assert!(!is_hash("0x123"));
        assert!(!is_hash(&format!("0X{}", "a".repeat(40))));
        assert!(!is_hash(&format!("0x{}", "G".repeat(40))));
    }
}
