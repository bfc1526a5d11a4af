//! Envelopes, headers, blocks, and block metadata (`common/common.proto` and
//! `common/configuration.proto`).

use bytes::Bytes;

/// Header types, stored as `int32` in [`ChannelHeader::type`].
///
/// Values outside this set are legal on the wire (newer or internal-only
/// message kinds); decoders must treat them as opaque rather than reject them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum HeaderType {
    Message = 0,
    Config = 1,
    ConfigUpdate = 2,
    EndorserTransaction = 3,
    OrdererTransaction = 4,
    DeliverSeekInfo = 5,
    ChaincodePackage = 6,
}

/// Positional indices into [`BlockMetadata::metadata`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum BlockMetadataIndex {
    Signatures = 0,
    LastConfig = 1,
    TransactionsFilter = 2,
}

/// Wire-identical rendering of `google.protobuf.Timestamp`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

/// The outermost wrapper: an opaque payload plus the creator's signature over
/// it.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Envelope {
    /// Marshaled [`Payload`].
    #[prost(bytes = "bytes", tag = "1")]
    pub payload: Bytes,
    /// Signature by the creator identified in the payload header.
    #[prost(bytes = "bytes", tag = "2")]
    pub signature: Bytes,
}

/// The message contents plus the header describing them.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Payload {
    #[prost(message, optional, tag = "1")]
    pub header: Option<Header>,
    /// Interpretation is dictated by `header.channel_header.type`.
    #[prost(bytes = "bytes", tag = "2")]
    pub data: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Header {
    /// Marshaled [`ChannelHeader`].
    #[prost(bytes = "bytes", tag = "1")]
    pub channel_header: Bytes,
    /// Marshaled [`SignatureHeader`].
    #[prost(bytes = "bytes", tag = "2")]
    pub signature_header: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChannelHeader {
    /// One of [`HeaderType`], kept as `int32` for forward compatibility.
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    /// Message protocol version.
    #[prost(int32, tag = "2")]
    pub version: i32,
    /// Local time when the message was created.
    #[prost(message, optional, tag = "3")]
    pub timestamp: Option<Timestamp>,
    /// Channel this message is bound for.
    #[prost(string, tag = "4")]
    pub channel_id: String,
    /// End-to-end use transaction id, computed by the client.
    #[prost(string, tag = "5")]
    pub tx_id: String,
    /// Epoch in which the message was generated.
    #[prost(uint64, tag = "6")]
    pub epoch: u64,
    /// Attachment dependent on the header type (e.g. a marshaled
    /// `ChaincodeHeaderExtension` for endorser transactions).
    #[prost(bytes = "bytes", tag = "7")]
    pub extension: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SignatureHeader {
    /// Marshaled `msp::SerializedIdentity` of the message creator.
    #[prost(bytes = "bytes", tag = "1")]
    pub creator: Bytes,
    /// Arbitrary number used once, to guard against replay.
    #[prost(bytes = "bytes", tag = "2")]
    pub nonce: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Block {
    #[prost(message, optional, tag = "1")]
    pub header: Option<BlockHeader>,
    #[prost(message, optional, tag = "2")]
    pub data: Option<BlockData>,
    #[prost(message, optional, tag = "3")]
    pub metadata: Option<BlockMetadata>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BlockHeader {
    /// Position in the chain.
    #[prost(uint64, tag = "1")]
    pub number: u64,
    /// Hash of the previous block's header.
    #[prost(bytes = "bytes", tag = "2")]
    pub previous_hash: Bytes,
    /// Hash of this block's data.
    #[prost(bytes = "bytes", tag = "3")]
    pub data_hash: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BlockData {
    /// One marshaled [`Envelope`] per transaction.
    #[prost(bytes = "bytes", repeated, tag = "1")]
    pub data: Vec<Bytes>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BlockMetadata {
    /// Indexed by [`BlockMetadataIndex`]: marshaled [`Metadata`] at the
    /// signatures and last-config slots, one validation-code byte per
    /// transaction at the transactions-filter slot.
    #[prost(bytes = "bytes", repeated, tag = "1")]
    pub metadata: Vec<Bytes>,
}

/// A metadata value with a set of signatures over it.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Metadata {
    #[prost(bytes = "bytes", tag = "1")]
    pub value: Bytes,
    #[prost(message, repeated, tag = "2")]
    pub signatures: Vec<MetadataSignature>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MetadataSignature {
    /// Marshaled [`SignatureHeader`].
    #[prost(bytes = "bytes", tag = "1")]
    pub signature_header: Bytes,
    /// Signature over the concatenation of the metadata value, this header,
    /// and the block header.
    #[prost(bytes = "bytes", tag = "2")]
    pub signature: Bytes,
}

/// Value of the last-config metadata slot: the index of the most recent
/// configuration block.
#[derive(Clone, PartialEq, prost::Message)]
pub struct LastConfig {
    #[prost(uint64, tag = "1")]
    pub index: u64,
}

/// `HashingAlgorithm` channel configuration value.
#[derive(Clone, PartialEq, prost::Message)]
pub struct HashingAlgorithm {
    #[prost(string, tag = "1")]
    pub name: String,
}

/// `BlockDataHashingStructure` channel configuration value.
#[derive(Clone, PartialEq, prost::Message)]
pub struct BlockDataHashingStructure {
    /// Merkle tree width for block data hashing; `u32::MAX` means a flat
    /// concatenation hash.
    #[prost(uint32, tag = "1")]
    pub width: u32,
}

/// `OrdererAddresses` channel configuration value.
#[derive(Clone, PartialEq, prost::Message)]
pub struct OrdererAddresses {
    #[prost(string, repeated, tag = "1")]
    pub addresses: Vec<String>,
}

/// `Consortium` channel configuration value.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Consortium {
    #[prost(string, tag = "1")]
    pub name: String,
}
