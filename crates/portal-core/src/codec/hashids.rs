use crate::codec::Codec;
use crate::error::{CoreError, Result};
use crate::shortcode::ShortCode;
use harsh::Harsh;
use std::panic::{self, AssertUnwindSafe};

/// A [`Codec`] implementing the Hashids algorithm.
///
/// With an empty salt and no minimum length this yields the same codes as
/// any other Hashids implementation with default settings, so links issued
/// before a migration keep resolving.
pub struct HashidsCodec {
    inner: Harsh,
    /// Length of the code for the largest id a store can assign.
    max_code_len: usize,
}

impl HashidsCodec {
    /// Creates a codec with the given salt and minimum code length.
    pub fn new(salt: &str, min_length: usize) -> Result<Self> {
        let inner = Harsh::builder()
            .salt(salt)
            .length(min_length)
            .build()
            .map_err(|e| CoreError::InvalidCodec(e.to_string()))?;
        let max_code_len = inner.encode(&[i64::MAX as u64]).len();
        Ok(Self {
            inner,
            max_code_len,
        })
    }

    /// Creates a codec with an empty salt and no minimum length.
    pub fn unsalted() -> Result<Self> {
        Self::new("", 0)
    }
}

impl std::fmt::Debug for HashidsCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashidsCodec")
            .field("max_code_len", &self.max_code_len)
            .finish_non_exhaustive()
    }
}

impl Codec for HashidsCodec {
    fn encode(&self, id: u64) -> ShortCode {
        ShortCode::new_unchecked(self.inner.encode(&[id]))
    }

    fn decode(&self, code: &ShortCode) -> Option<u64> {
        if code.as_str().len() > self.max_code_len {
            return None;
        }

        // harsh sums digits without overflow checks, so a code of the
        // maximum length can still panic in builds with overflow checks.
        let values = panic::catch_unwind(AssertUnwindSafe(|| self.inner.decode(code.as_str())))
            .ok()?
            .ok()?;
        let [id] = values.as_slice() else {
            return None;
        };

        // Several inputs can decode to the same number; only the canonical
        // encoding is accepted.
        if self.inner.encode(&[*id]) != code.as_str() {
            return None;
        }

        Some(*id)
    }
}
