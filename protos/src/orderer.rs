//! Ordering-service configuration values (`orderer/configuration.proto`).

/// `ConsensusType` channel configuration value.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ConsensusType {
    /// Consensus implementation name, e.g. `solo` or `kafka`.
    #[prost(string, tag = "1")]
    pub r#type: String,
}

/// `BatchSize` channel configuration value: block-cutting limits.
#[derive(Clone, PartialEq, prost::Message)]
pub struct BatchSize {
    /// Maximum number of messages per batch.
    #[prost(uint32, tag = "1")]
    pub max_message_count: u32,
    /// Hard ceiling on serialized batch size; messages above this are
    /// rejected.
    #[prost(uint32, tag = "2")]
    pub absolute_max_bytes: u32,
    /// Soft target for batch size; a single larger message still forms its
    /// own batch.
    #[prost(uint32, tag = "3")]
    pub preferred_max_bytes: u32,
}

/// `BatchTimeout` channel configuration value.
#[derive(Clone, PartialEq, prost::Message)]
pub struct BatchTimeout {
    /// Wait duration before cutting a partial batch, in Go `time.Duration`
    /// string form (e.g. `"2s"`).
    #[prost(string, tag = "1")]
    pub timeout: String,
}

/// `KafkaBrokers` channel configuration value.
#[derive(Clone, PartialEq, prost::Message)]
pub struct KafkaBrokers {
    /// Broker addresses (`host:port`) for bootstrapping.
    #[prost(string, repeated, tag = "1")]
    pub brokers: Vec<String>,
}

/// `ChannelRestrictions` channel configuration value.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ChannelRestrictions {
    /// Maximum number of channels the orderer allows; 0 means unlimited.
    #[prost(uint64, tag = "1")]
    pub max_count: u64,
}
