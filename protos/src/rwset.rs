//! Transaction read/write sets (`ledger/rwset/rwset.proto`,
//! `ledger/rwset/kvrwset/kv_rwset.proto`).

use bytes::Bytes;

/// Data models for [`TxReadWriteSet::data_model`]. Only `Kv` is interpreted
/// by this client; other models pass through undecoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum DataModel {
    Kv = 0,
}

/// The read/write set of a transaction, split by namespace (chaincode).
#[derive(Clone, PartialEq, prost::Message)]
pub struct TxReadWriteSet {
    /// One of [`DataModel`], kept as `int32`.
    #[prost(int32, tag = "1")]
    pub data_model: i32,
    #[prost(message, repeated, tag = "2")]
    pub ns_rwset: Vec<NsReadWriteSet>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct NsReadWriteSet {
    #[prost(string, tag = "1")]
    pub namespace: String,
    /// Marshaled [`KvRwSet`] under the KV data model.
    #[prost(bytes = "bytes", tag = "2")]
    pub rwset: Bytes,
    /// Hashed read/write sets of private-data collections in this namespace.
    #[prost(message, repeated, tag = "3")]
    pub collection_hashed_rwset: Vec<CollectionHashedReadWriteSet>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CollectionHashedReadWriteSet {
    #[prost(string, tag = "1")]
    pub collection_name: String,
    /// Marshaled [`HashedRwSet`] under the KV data model.
    #[prost(bytes = "bytes", tag = "2")]
    pub hashed_rwset: Bytes,
    /// Hash of the unhashed private read/write set, for pulling private data
    /// from authorized peers.
    #[prost(bytes = "bytes", tag = "3")]
    pub pvt_rwset_hash: Bytes,
}

/// The KV-model read/write set of one namespace.
#[derive(Clone, PartialEq, prost::Message)]
pub struct KvRwSet {
    #[prost(message, repeated, tag = "1")]
    pub reads: Vec<KvRead>,
    #[prost(message, repeated, tag = "2")]
    pub range_queries_info: Vec<RangeQueryInfo>,
    #[prost(message, repeated, tag = "3")]
    pub writes: Vec<KvWrite>,
    #[prost(message, repeated, tag = "4")]
    pub metadata_writes: Vec<KvMetadataWrite>,
}

/// The KV-model hashed read/write set of one private collection: identical
/// in shape to [`KvRwSet`] with keys and values replaced by their hashes.
#[derive(Clone, PartialEq, prost::Message)]
pub struct HashedRwSet {
    #[prost(message, repeated, tag = "1")]
    pub hashed_reads: Vec<KvReadHash>,
    #[prost(message, repeated, tag = "2")]
    pub hashed_writes: Vec<KvWriteHash>,
    #[prost(message, repeated, tag = "3")]
    pub metadata_writes: Vec<KvMetadataWriteHash>,
}

/// A read of `key` observed at `version`; an absent version means the key
/// did not exist.
#[derive(Clone, PartialEq, prost::Message)]
pub struct KvRead {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(message, optional, tag = "2")]
    pub version: Option<Version>,
}

/// A write of `value` to `key`; deletion is signaled by `is_delete`, not by
/// an empty value.
#[derive(Clone, PartialEq, prost::Message)]
pub struct KvWrite {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(bool, tag = "2")]
    pub is_delete: bool,
    #[prost(bytes = "bytes", tag = "3")]
    pub value: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KvMetadataWrite {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(message, repeated, tag = "2")]
    pub entries: Vec<KvMetadataEntry>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KvReadHash {
    #[prost(bytes = "bytes", tag = "1")]
    pub key_hash: Bytes,
    #[prost(message, optional, tag = "2")]
    pub version: Option<Version>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KvWriteHash {
    #[prost(bytes = "bytes", tag = "1")]
    pub key_hash: Bytes,
    #[prost(bool, tag = "2")]
    pub is_delete: bool,
    #[prost(bytes = "bytes", tag = "3")]
    pub value_hash: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KvMetadataWriteHash {
    #[prost(bytes = "bytes", tag = "1")]
    pub key_hash: Bytes,
    #[prost(message, repeated, tag = "2")]
    pub entries: Vec<KvMetadataEntry>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KvMetadataEntry {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(bytes = "bytes", tag = "2")]
    pub value: Bytes,
}

/// The height (block, transaction-within-block) at which a key was last
/// committed.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Version {
    #[prost(uint64, tag = "1")]
    pub block_num: u64,
    #[prost(uint64, tag = "2")]
    pub tx_num: u64,
}

/// A range query performed during simulation, recorded for phantom-read
/// validation: either the literal reads or a Merkle summary of them.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RangeQueryInfo {
    #[prost(string, tag = "1")]
    pub start_key: String,
    #[prost(string, tag = "2")]
    pub end_key: String,
    /// Whether the iterator was drained to the end of the range.
    #[prost(bool, tag = "3")]
    pub itr_exhausted: bool,
    #[prost(oneof = "range_query_info::ReadsInfo", tags = "4, 5")]
    pub reads_info: Option<range_query_info::ReadsInfo>,
}

pub mod range_query_info {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum ReadsInfo {
        #[prost(message, tag = "4")]
        RawReads(super::QueryReads),
        #[prost(message, tag = "5")]
        ReadsMerkleHashes(super::QueryReadsMerkleSummary),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryReads {
    #[prost(message, repeated, tag = "1")]
    pub kv_reads: Vec<KvRead>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryReadsMerkleSummary {
    #[prost(uint32, tag = "1")]
    pub max_degree: u32,
    #[prost(uint32, tag = "2")]
    pub max_level: u32,
    #[prost(bytes = "bytes", repeated, tag = "3")]
    pub max_level_hashes: Vec<Bytes>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn range_query_oneof_round_trips_both_branches() {
        let raw = RangeQueryInfo {
            start_key: "a".into(),
            end_key: "z".into(),
            itr_exhausted: true,
            reads_info: Some(range_query_info::ReadsInfo::RawReads(QueryReads {
                kv_reads: vec![KvRead {
                    key: "k1".into(),
                    version: Some(Version {
                        block_num: 4,
                        tx_num: 2,
                    }),
                }],
            })),
        };
        assert_eq!(
            RangeQueryInfo::decode(raw.encode_to_vec().as_slice()).unwrap(),
            raw
        );

        let merkle = RangeQueryInfo {
            reads_info: Some(range_query_info::ReadsInfo::ReadsMerkleHashes(
                QueryReadsMerkleSummary {
                    max_degree: 50,
                    max_level: 2,
                    max_level_hashes: vec![Bytes::from_static(&[0xab; 32])],
                },
            )),
            ..Default::default()
        };
        assert_eq!(
            RangeQueryInfo::decode(merkle.encode_to_vec().as_slice()).unwrap(),
            merkle
        );
    }
}
