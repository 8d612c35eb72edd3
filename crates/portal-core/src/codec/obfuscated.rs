use crate::codec::Codec;
use crate::error::{CoreError, Result};
use crate::shortcode::ShortCode;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
/// Multiplicative and XOR-based obfuscation of 64-bit ids.
///
/// The multiplier must be odd so that it has an inverse modulo 2^64.
pub struct Obfuscator {
    #[builder(default = 0x9E37_79B9_7F4A_7C15)]
    prime: u64,
    #[builder(default = 0xDEAD_BEEF_CAFE_BABE)]
    mask: u64,
}

impl Obfuscator {
    pub fn obfuscate(&self, id: u64) -> u64 {
        id.wrapping_mul(self.prime) ^ self.mask
    }
}

/// A [`Codec`] that obfuscates ids with an [`Obfuscator`] and renders the
/// eight big-endian bytes as base58.
#[derive(Debug, Clone)]
pub struct ObfuscatedCodec {
    obfuscator: Obfuscator,
    inverse: u64,
}

impl ObfuscatedCodec {
    pub fn new(obfuscator: Obfuscator) -> Result<Self> {
        if obfuscator.prime % 2 == 0 {
            return Err(CoreError::InvalidCodec(format!(
                "obfuscation multiplier must be odd, got {}",
                obfuscator.prime
            )));
        }

        let inverse = mod_inverse(obfuscator.prime);
        Ok(Self {
            obfuscator,
            inverse,
        })
    }

    fn reveal(&self, obfuscated: u64) -> u64 {
        (obfuscated ^ self.obfuscator.mask).wrapping_mul(self.inverse)
    }
}

/// Inverse of an odd `value` modulo 2^64 by Newton iteration.
fn mod_inverse(value: u64) -> u64 {
    // Correct to 3 bits to start with; each step doubles that.
    let mut inverse = value;
    for _ in 0..5 {
        inverse = inverse.wrapping_mul(2_u64.wrapping_sub(value.wrapping_mul(inverse)));
    }
    inverse
}

impl Codec for ObfuscatedCodec {
    fn encode(&self, id: u64) -> ShortCode {
        let bytes = self.obfuscator.obfuscate(id).to_be_bytes();
        ShortCode::new_unchecked(bs58::encode(bytes).into_string())
    }

    fn decode(&self, code: &ShortCode) -> Option<u64> {
        let raw = bs58::decode(code.as_str()).into_vec().ok()?;
        let bytes: [u8; 8] = raw.try_into().ok()?;
        Some(self.reveal(u64::from_be_bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> ObfuscatedCodec {
        ObfuscatedCodec::new(Obfuscator::builder().build()).unwrap()
    }

    #[test]
    fn inverse_undoes_multiplication() {
        for prime in [1_u64, 3, 0x9E37_79B9_7F4A_7C15, u64::MAX] {
            assert_eq!(prime.wrapping_mul(mod_inverse(prime)), 1);
        }
    }

    #[test]
    fn obfuscate_applies_multiplication_xor() {
        let obfuscator = Obfuscator::builder().prime(3).mask(0xFF).build();

        assert_eq!(obfuscator.obfuscate(5), 15 ^ 0xFF);
    }

    #[test]
    fn round_trips_ids() {
        let codec = codec();

        for id in (0..=2_000).chain([u32::MAX as u64, i64::MAX as u64, u64::MAX]) {
            let encoded = codec.encode(id);
            assert_eq!(codec.decode(&encoded), Some(id), "id {id} -> {encoded}");
        }
    }

    #[test]
    fn consecutive_ids_do_not_share_a_prefix() {
        let codec = codec();

        let first = codec.encode(1);
        let second = codec.encode(2);
        assert_ne!(first, second);
        assert_ne!(first.as_str()[..4], second.as_str()[..4]);
    }

    #[test]
    fn rejects_non_base58() {
        // `0`, `O`, `I` and `l` are outside the base58 alphabet.
        assert_eq!(codec().decode(&ShortCode::new_unchecked("0OIl")), None);
    }

    #[test]
    fn rejects_wrong_width() {
        let codec = codec();
        let short = bs58::encode([1_u8, 2, 3]).into_string();
        let long = bs58::encode([1_u8; 9]).into_string();

        assert_eq!(codec.decode(&ShortCode::new_unchecked(short)), None);
        assert_eq!(codec.decode(&ShortCode::new_unchecked(long)), None);
    }

    #[test]
    fn rejects_even_multiplier() {
        let obfuscator = Obfuscator::builder().prime(4).build();
        assert!(ObfuscatedCodec::new(obfuscator).is_err());
    }
}
