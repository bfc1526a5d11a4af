//! Decode Hyperledger Fabric blocks, transactions, and channel configuration.
//!
//! # Overview
//!
//! Fabric delivers everything a client sees as deeply nested protobuf: a
//! block wraps envelopes, an envelope wraps a payload, a payload's meaning
//! depends on its header type, and each layer down is another marshaled
//! message inside a bytes field. This crate peels those layers into typed,
//! serializable document trees:
//!
//! - [`block`]: blocks, envelopes, and endorser transactions
//! - [`rwset`]: transaction read/write sets (plain and private/hashed)
//! - [`config`]: the recursive channel-configuration tree, flattened into a
//!   [`config::ChannelConfig`] snapshot
//! - [`policy`]: signature-policy and implicit-meta-policy rules
//! - [`identity`]: serialized identities, MSP principals, and MSP
//!   configuration
//!
//! Every decoder is a pure, synchronous function over an input buffer: no
//! I/O, no state between calls, nothing retained past the return. Calls may
//! run concurrently on independent inputs without coordination.
//!
//! # Error policy
//!
//! Three failure modes are deliberately kept distinct:
//!
//! 1. Structural: the outer message cannot be parsed, or a policy type is
//!    unintelligible. These return [`Error`].
//! 2. Forward-compatible: input that is valid but not understood by this
//!    version (an unrecognized header type, configuration key, or data
//!    model) decodes to an explicit placeholder and is logged, never an
//!    error. Blocks produced by newer networks must keep decoding.
//! 3. Per-entry: one bad entry in a configuration map is recorded in
//!    [`config::ChannelConfig::errors`] and skipped; its siblings decode.
//!
//! # Example
//!
//! ```
//! use prost::Message;
//!
//! let raw = weft_protos::common::Block {
//!     header: Some(weft_protos::common::BlockHeader {
//!         number: 7,
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! }
//! .encode_to_vec();
//!
//! let block = weft_ledger::block::decode_block(&raw).unwrap();
//! assert_eq!(block.header.number, "7");
//! ```

pub mod block;
pub mod config;
mod error;
pub mod identity;
pub mod policy;
pub mod rwset;

pub use error::Error;

/// Converts bytes to a hexadecimal string.
pub fn hex(bytes: &[u8]) -> String {
    let mut hex = String::new();
    for byte in bytes.iter() {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Converts a hexadecimal string to bytes.
pub fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| match u8::from_str_radix(&hex[i..i + 2], 16) {
            Ok(byte) => Some(byte),
            Err(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(&[]), "");
        assert_eq!(hex(&[0x00, 0xab, 0xff]), "00abff");
        assert_eq!(from_hex("00abff"), Some(vec![0x00, 0xab, 0xff]));
        assert_eq!(from_hex("0"), None);
        assert_eq!(from_hex("zz"), None);
    }
}
