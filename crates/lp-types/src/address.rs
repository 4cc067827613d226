use tiny_keccak::Hasher;

/// Currency0/1 of a pool is the zero address when the leg is the native asset.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

const ADDRESS_HEX_LEN: usize = 40;

fn hex_body(address: &str) -> Option<&str> {
    let body = address.strip_prefix("0x")?;
    (body.len() == ADDRESS_HEX_LEN && body.chars().all(|c| c.is_ascii_hexdigit())).then_some(body)
}

/// Structural EVM address check: `0x` followed by exactly 40 hex digits, any case.
pub fn validate_address(address: &str) -> bool {
    hex_body(address).is_some()
}

/// Same as [`validate_address`], but mixed-case input must carry a valid
/// EIP-55 checksum. All-lowercase and all-uppercase bodies carry no checksum
/// and are accepted.
pub fn validate_address_checksum(address: &str) -> bool {
    let Some(body) = hex_body(address) else {
        return false;
    };

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    to_checksum_address(address).is_some_and(|checksummed| checksummed == address)
}

/// Returns the EIP-55 mixed-case form of a structurally valid address.
pub fn to_checksum_address(address: &str) -> Option<String> {
    let lower = hex_body(address)?.to_ascii_lowercase();

    let mut hasher = tiny_keccak::Keccak::v256();
    hasher.update(lower.as_bytes());
    let mut hash = [0_u8; 32];
    hasher.finalize(&mut hash);
    let hash_hex = hex::encode(hash);

    let mut checksummed = String::with_capacity(ADDRESS_HEX_LEN + 2);
    checksummed.push_str("0x");
    for (ch, nibble) in lower.chars().zip(hash_hex.bytes()) {
        if ch.is_ascii_alphabetic() && nibble >= b'8' {
            checksummed.push(ch.to_ascii_uppercase());
        } else {
            checksummed.push(ch);
        }
    }
    Some(checksummed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address() {
        assert!(validate_address("0x742d35cc6634c0532925a3b844bc9e7595f0beb1"));
        assert!(validate_address("0xABCDEF0123456789ABCDEF0123456789ABCDEF01"));
        assert!(validate_address(ZERO_ADDRESS));
        // mixed case without a matching checksum is still structurally valid
        assert!(validate_address("0xAbCdEf0123456789abcdef0123456789ABCDEF01"));

        assert!(!validate_address(""));
        assert!(!validate_address("0x"));
        assert!(!validate_address("742d35cc6634c0532925a3b844bc9e7595f0beb1"));
        assert!(!validate_address("0x742d35cc6634c0532925a3b844bc9e7595f0beb"));
        assert!(!validate_address("0x742d35cc6634c0532925a3b844bc9e7595f0beb12"));
        assert!(!validate_address("0x742d35cc6634c0532925a3b844bc9e7595f0bexz"));
        assert!(!validate_address("0X742d35cc6634c0532925a3b844bc9e7595f0beb1"));
    }

    #[test]
    fn test_checksum_address() {
        // reference vectors from EIP-55
        let vectors = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];
        for vector in vectors {
            assert_eq!(
                to_checksum_address(&vector.to_lowercase()).as_deref(),
                Some(vector)
            );
            assert!(validate_address_checksum(vector));
        }
    }

    #[test]
    fn test_validate_address_checksum_rejects_bad_mixed_case() {
        assert!(validate_address_checksum(
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        ));
        assert!(validate_address_checksum(
            "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"
        ));
        assert!(!validate_address_checksum(
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"
        ));
        assert!(!validate_address_checksum("0x5aAeb6053F"));
    }
}
