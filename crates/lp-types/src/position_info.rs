use serde::{Deserialize, Serialize};

use crate::ZERO_ADDRESS;

const TICK_BITS: u32 = 24;
const TICK_MASK: u64 = 0xFF_FFFF;
const TICK_SIGN_LIMIT: i32 = 0x7F_FFFF;
const TICK_MODULUS: i32 = 0x100_0000;
const SUBSCRIBER_BIT: u32 = 48;

/// Tick range and subscriber flag packed into the position manager's
/// `PositionInfo` word.
///
/// Layout of the low 49 bits: `tickLower` in bits 0..24, `tickUpper` in
/// bits 24..48 (both int24 two's complement), subscriber flag at bit 48.
/// Higher bits are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub has_subscriber: bool,
}

const fn sign_extend_tick(field: u64) -> i32 {
    let value = (field & TICK_MASK) as i32;
    if value > TICK_SIGN_LIMIT {
        value - TICK_MODULUS
    } else {
        value
    }
}

const fn tick_field(tick: i32) -> u64 {
    (tick as u32 as u64) & TICK_MASK
}

impl PositionInfo {
    /// Decodes the low 64-bit limb of the packed word.
    pub const fn decode(packed: u64) -> Self {
        Self {
            tick_lower: sign_extend_tick(packed),
            tick_upper: sign_extend_tick(packed >> TICK_BITS),
            has_subscriber: (packed >> SUBSCRIBER_BIT) & 1 == 1,
        }
    }

    pub const fn encode(&self) -> u64 {
        tick_field(self.tick_lower)
            | (tick_field(self.tick_upper) << TICK_BITS)
            | ((self.has_subscriber as u64) << SUBSCRIBER_BIT)
    }

    pub const fn has_valid_range(&self) -> bool {
        self.tick_lower <= self.tick_upper
    }
}

/// ERC-20 metadata as returned by the chain reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
    pub name: String,
}

impl TokenInfo {
    pub fn native() -> Self {
        Self {
            symbol: "ETH".to_string(),
            decimals: 18,
            name: "Ethereum".to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            symbol: "UNKNOWN".to_string(),
            decimals: 18,
            name: "Unknown Token".to_string(),
        }
    }

    pub fn is_native_address(address: &str) -> bool {
        address.eq_ignore_ascii_case(ZERO_ADDRESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_sign_extension() {
        let max = PositionInfo::decode(0x7F_FFFF);
        assert_eq!(max.tick_lower, 8_388_607);

        let min = PositionInfo::decode(0x80_0000);
        assert_eq!(min.tick_lower, -8_388_608);

        let minus_one = PositionInfo::decode(0xFF_FFFF);
        assert_eq!(minus_one.tick_lower, -1);
        assert_eq!(minus_one.tick_upper, 0);
        assert!(!minus_one.has_subscriber);
    }

    #[test]
    fn test_decode_fields() {
        // tickLower = -887220, tickUpper = 887220, subscriber set, garbage above bit 48
        let packed = (0xF2_764C_u64) | (0x0D_89B4_u64 << 24) | (1 << 48) | (0xABC << 52);
        let info = PositionInfo::decode(packed);
        assert_eq!(info.tick_lower, -887_220);
        assert_eq!(info.tick_upper, 887_220);
        assert!(info.has_subscriber);
        assert!(info.has_valid_range());
    }

    #[test]
    fn test_roundtrip_full_tick_range() {
        for tick in (-8_388_608..=8_388_607).step_by(4099).chain([-8_388_608, -1, 0, 8_388_607]) {
            let info = PositionInfo {
                tick_lower: tick,
                tick_upper: -tick.max(-8_388_607),
                has_subscriber: tick % 2 == 0,
            };
            assert_eq!(PositionInfo::decode(info.encode()), info);
        }
    }

    #[test]
    fn test_token_fallbacks() {
        assert_eq!(TokenInfo::native().symbol, "ETH");
        assert_eq!(TokenInfo::unknown().decimals, 18);
        assert!(TokenInfo::is_native_address(ZERO_ADDRESS));
        assert!(!TokenInfo::is_native_address(
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
        ));
    }
}
