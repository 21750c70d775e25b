//! Type definitions

mod charset;
mod host;
mod pubkey;

pub use charset::{CharsetMap, EncodingInfo};
pub use host::{EditRequest, HostId, HostRecord, DEFAULT_ENCODING, DEFAULT_PORT};
pub use pubkey::{PubkeyChoice, PUBKEY_ID_ANY, PUBKEY_ID_NEVER};
