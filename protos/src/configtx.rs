//! The recursive channel-configuration tree (`common/configtx.proto`).

use crate::common::Envelope;
use bytes::Bytes;
use std::collections::HashMap;

/// A committed channel configuration plus the update envelope that produced
/// it.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ConfigEnvelope {
    #[prost(message, optional, tag = "1")]
    pub config: Option<Config>,
    /// The CONFIG_UPDATE envelope this configuration was computed from.
    #[prost(message, optional, tag = "2")]
    pub last_update: Option<Envelope>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Config {
    /// Increments with every configuration transaction committed.
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(message, optional, tag = "2")]
    pub channel_group: Option<ConfigGroup>,
}

/// A node in the configuration tree: named sub-groups, named values, and
/// named policies. Valid input is a tree (no cycles) of bounded depth.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ConfigGroup {
    #[prost(uint64, tag = "1")]
    pub version: u64,
    #[prost(map = "string, message", tag = "2")]
    pub groups: HashMap<String, ConfigGroup>,
    #[prost(map = "string, message", tag = "3")]
    pub values: HashMap<String, ConfigValue>,
    #[prost(map = "string, message", tag = "4")]
    pub policies: HashMap<String, ConfigPolicy>,
    /// Name of the policy governing modification of this node.
    #[prost(string, tag = "5")]
    pub mod_policy: String,
}

/// A configuration value. The interpretation of `value` is dictated by the
/// map key this entry is stored under.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ConfigValue {
    #[prost(uint64, tag = "1")]
    pub version: u64,
    #[prost(bytes = "bytes", tag = "2")]
    pub value: Bytes,
    #[prost(string, tag = "3")]
    pub mod_policy: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ConfigPolicy {
    #[prost(uint64, tag = "1")]
    pub version: u64,
    #[prost(message, optional, tag = "2")]
    pub policy: Option<crate::policies::Policy>,
    #[prost(string, tag = "3")]
    pub mod_policy: String,
}

/// A proposed configuration change with collected signatures.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ConfigUpdateEnvelope {
    /// Marshaled [`ConfigUpdate`].
    #[prost(bytes = "bytes", tag = "1")]
    pub config_update: Bytes,
    #[prost(message, repeated, tag = "2")]
    pub signatures: Vec<ConfigSignature>,
}

/// The delta between two configurations, expressed as the subtree read
/// (baseline versions) and the subtree written (new content).
#[derive(Clone, PartialEq, prost::Message)]
pub struct ConfigUpdate {
    #[prost(string, tag = "1")]
    pub channel_id: String,
    #[prost(message, optional, tag = "2")]
    pub read_set: Option<ConfigGroup>,
    #[prost(message, optional, tag = "3")]
    pub write_set: Option<ConfigGroup>,
    // Tag 4 is reserved by the upstream schema.
    /// Data not reflected in the resulting config, e.g. genesis-time material.
    #[prost(map = "string, bytes", tag = "5")]
    pub isolated_data: HashMap<String, Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ConfigSignature {
    /// Marshaled `common::SignatureHeader`.
    #[prost(bytes = "bytes", tag = "1")]
    pub signature_header: Bytes,
    #[prost(bytes = "bytes", tag = "2")]
    pub signature: Bytes,
}
