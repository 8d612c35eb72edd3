pub mod hashids;
pub mod obfuscated;

pub use hashids::HashidsCodec;
pub use obfuscated::{ObfuscatedCodec, Obfuscator};

use crate::shortcode::ShortCode;

/// Reversible mapping between record ids and public short codes.
///
/// Implementations must satisfy `decode(&encode(id)) == Some(id)` for every
/// id. The converse does not hold: a code that was never produced by
/// `encode` may still decode to some id, so callers must confirm the id
/// against the repository.
pub trait Codec: Send + Sync + 'static {
    /// Encodes a record id into its short code.
    fn encode(&self, id: u64) -> ShortCode;

    /// Decodes a short code back into a record id.
    ///
    /// Returns `None` if the code is not a valid encoding.
    fn decode(&self, code: &ShortCode) -> Option<u64>;
}

impl Codec for Box<dyn Codec> {
    fn encode(&self, id: u64) -> ShortCode {
        (**self).encode(id)
    }

    fn decode(&self, code: &ShortCode) -> Option<u64> {
        (**self).decode(code)
    }
}
