//! Installed text encodings abstraction

use crate::types::EncodingInfo;

/// Enumerates the text encodings available on this platform.
///
/// Enumeration probes every installed encoding and can be slow; callers
/// must not run it on a latency-sensitive thread.
pub trait EncodingSource: Send + Sync {
    fn scan(&self) -> Vec<EncodingInfo>;
}
