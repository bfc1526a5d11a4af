//! Transaction read/write-set decoding.
//!
//! Only the KV data model is structurally decoded. Any other model passes
//! the per-namespace payloads through as raw bytes so that blocks produced
//! under a model this client predates still decode.

use crate::Error;
use prost::Message;
use serde::Serialize;
use tracing::debug;
use weft_protos::rwset;

/// A decoded transaction read/write set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadWriteSet {
    pub data_model: i32,
    pub ns_rwset: Vec<NsReadWriteSet>,
}

/// The read/write set of one namespace (chaincode).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NsReadWriteSet {
    pub namespace: String,
    pub rwset: NsData,
    pub collection_hashed_rwset: Vec<CollectionHashedRwSet>,
}

/// Namespace payload: decoded under the KV model, raw bytes otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NsData {
    Kv(KvRwSet),
    Raw(Vec<u8>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KvRwSet {
    pub reads: Vec<KvRead>,
    pub range_queries_info: Vec<RangeQuery>,
    pub writes: Vec<KvWrite>,
    pub metadata_writes: Vec<KvMetadataWrite>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KvRead {
    pub key: String,
    /// Height at which the key was last committed; absent if the key did
    /// not exist when read.
    pub version: Option<Version>,
}

/// A committed height, rendered as decimal strings to survive consumers
/// that would round 64-bit integers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Version {
    pub block_num: String,
    pub tx_num: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KvWrite {
    pub key: String,
    pub is_delete: bool,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KvMetadataWrite {
    pub key: String,
    pub entries: Vec<KvMetadataEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KvMetadataEntry {
    pub name: String,
    pub value: Vec<u8>,
}

/// A recorded range query: whichever of the literal reads or the Merkle
/// summary the wire carried is populated, the other is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeQuery {
    pub start_key: String,
    pub end_key: String,
    pub itr_exhausted: bool,
    pub raw_reads: Option<QueryReads>,
    pub reads_merkle_hashes: Option<MerkleSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReads {
    pub kv_reads: Vec<KvRead>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerkleSummary {
    pub max_degree: u32,
    pub max_level: u32,
    pub max_level_hashes: Vec<Vec<u8>>,
}

/// The hashed read/write set of one private-data collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionHashedRwSet {
    pub collection_name: String,
    pub hashed_rwset: HashedData,
    pub pvt_rwset_hash: Vec<u8>,
}

/// Collection payload: decoded under the KV model, raw bytes otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HashedData {
    Kv(HashedRwSet),
    Raw(Vec<u8>),
}

/// Same shape as [`KvRwSet`] with keys and values replaced by their hashes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HashedRwSet {
    pub hashed_reads: Vec<KvReadHash>,
    pub hashed_writes: Vec<KvWriteHash>,
    pub metadata_writes: Vec<KvMetadataWriteHash>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KvReadHash {
    pub key_hash: Vec<u8>,
    pub version: Option<Version>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KvWriteHash {
    pub key_hash: Vec<u8>,
    pub is_delete: bool,
    pub value_hash: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KvMetadataWriteHash {
    pub key_hash: Vec<u8>,
    pub entries: Vec<KvMetadataEntry>,
}

/// Decodes a marshaled `TxReadWriteSet`.
///
/// The data-model discriminant is checked before any per-namespace decode is
/// attempted; under an unrecognized model every namespace payload is passed
/// through raw.
pub fn decode_read_write_set(bytes: &[u8]) -> Result<ReadWriteSet, Error> {
    let tx_rwset = rwset::TxReadWriteSet::decode(bytes)
        .map_err(|err| Error::Proto("TxReadWriteSet", err))?;

    let kv = tx_rwset.data_model == rwset::DataModel::Kv as i32;
    if !kv {
        debug!(
            data_model = tx_rwset.data_model,
            "unrecognized read/write set data model, passing namespaces through raw"
        );
    }

    let ns_rwset = tx_rwset
        .ns_rwset
        .iter()
        .map(|ns| decode_namespace(ns, kv))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReadWriteSet {
        data_model: tx_rwset.data_model,
        ns_rwset,
    })
}

fn decode_namespace(ns: &rwset::NsReadWriteSet, kv: bool) -> Result<NsReadWriteSet, Error> {
    let rwset_data = if kv {
        NsData::Kv(decode_kv_rwset(&ns.rwset)?)
    } else {
        NsData::Raw(ns.rwset.to_vec())
    };

    let collection_hashed_rwset = ns
        .collection_hashed_rwset
        .iter()
        .map(|collection| {
            let hashed = if kv {
                HashedData::Kv(decode_hashed_rwset(&collection.hashed_rwset)?)
            } else {
                HashedData::Raw(collection.hashed_rwset.to_vec())
            };
            Ok(CollectionHashedRwSet {
                collection_name: collection.collection_name.clone(),
                hashed_rwset: hashed,
                pvt_rwset_hash: collection.pvt_rwset_hash.to_vec(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(NsReadWriteSet {
        namespace: ns.namespace.clone(),
        rwset: rwset_data,
        collection_hashed_rwset,
    })
}

fn decode_kv_rwset(bytes: &[u8]) -> Result<KvRwSet, Error> {
    let kv = rwset::KvRwSet::decode(bytes).map_err(|err| Error::Proto("KvRwSet", err))?;
    Ok(KvRwSet {
        reads: kv.reads.iter().map(decode_read).collect(),
        range_queries_info: kv
            .range_queries_info
            .iter()
            .map(decode_range_query)
            .collect(),
        writes: kv
            .writes
            .iter()
            .map(|write| KvWrite {
                key: write.key.clone(),
                is_delete: write.is_delete,
                value: String::from_utf8_lossy(&write.value).into_owned(),
            })
            .collect(),
        metadata_writes: kv
            .metadata_writes
            .iter()
            .map(|write| KvMetadataWrite {
                key: write.key.clone(),
                entries: decode_metadata_entries(&write.entries),
            })
            .collect(),
    })
}

fn decode_hashed_rwset(bytes: &[u8]) -> Result<HashedRwSet, Error> {
    let hashed =
        rwset::HashedRwSet::decode(bytes).map_err(|err| Error::Proto("HashedRwSet", err))?;
    Ok(HashedRwSet {
        hashed_reads: hashed
            .hashed_reads
            .iter()
            .map(|read| KvReadHash {
                key_hash: read.key_hash.to_vec(),
                version: read.version.as_ref().map(decode_version),
            })
            .collect(),
        hashed_writes: hashed
            .hashed_writes
            .iter()
            .map(|write| KvWriteHash {
                key_hash: write.key_hash.to_vec(),
                is_delete: write.is_delete,
                value_hash: write.value_hash.to_vec(),
            })
            .collect(),
        metadata_writes: hashed
            .metadata_writes
            .iter()
            .map(|write| KvMetadataWriteHash {
                key_hash: write.key_hash.to_vec(),
                entries: decode_metadata_entries(&write.entries),
            })
            .collect(),
    })
}

fn decode_read(read: &rwset::KvRead) -> KvRead {
    KvRead {
        key: read.key.clone(),
        version: read.version.as_ref().map(decode_version),
    }
}

fn decode_version(version: &rwset::Version) -> Version {
    Version {
        block_num: version.block_num.to_string(),
        tx_num: version.tx_num.to_string(),
    }
}

fn decode_range_query(info: &rwset::RangeQueryInfo) -> RangeQuery {
    let mut query = RangeQuery {
        start_key: info.start_key.clone(),
        end_key: info.end_key.clone(),
        itr_exhausted: info.itr_exhausted,
        raw_reads: None,
        reads_merkle_hashes: None,
    };
    match &info.reads_info {
        Some(rwset::range_query_info::ReadsInfo::RawReads(reads)) => {
            query.raw_reads = Some(QueryReads {
                kv_reads: reads.kv_reads.iter().map(decode_read).collect(),
            });
        }
        Some(rwset::range_query_info::ReadsInfo::ReadsMerkleHashes(summary)) => {
            query.reads_merkle_hashes = Some(MerkleSummary {
                max_degree: summary.max_degree,
                max_level: summary.max_level,
                max_level_hashes: summary
                    .max_level_hashes
                    .iter()
                    .map(|hash| hash.to_vec())
                    .collect(),
            });
        }
        None => {}
    }
    query
}

fn decode_metadata_entries(entries: &[rwset::KvMetadataEntry]) -> Vec<KvMetadataEntry> {
    entries
        .iter()
        .map(|entry| KvMetadataEntry {
            name: entry.name.clone(),
            value: entry.value.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn kv_fixture() -> rwset::KvRwSet {
        rwset::KvRwSet {
            reads: vec![
                rwset::KvRead {
                    key: "asset1".into(),
                    version: Some(rwset::Version {
                        block_num: 5,
                        tx_num: 3,
                    }),
                },
                rwset::KvRead {
                    key: "missing".into(),
                    version: None,
                },
            ],
            range_queries_info: vec![rwset::RangeQueryInfo {
                start_key: "asset1".into(),
                end_key: "asset9".into(),
                itr_exhausted: true,
                reads_info: Some(rwset::range_query_info::ReadsInfo::RawReads(
                    rwset::QueryReads {
                        kv_reads: vec![rwset::KvRead {
                            key: "asset2".into(),
                            version: Some(rwset::Version {
                                block_num: 4,
                                tx_num: 0,
                            }),
                        }],
                    },
                )),
            }],
            writes: vec![
                rwset::KvWrite {
                    key: "asset1".into(),
                    is_delete: false,
                    value: Bytes::from_static(b"{\"owner\":\"alice\"}"),
                },
                rwset::KvWrite {
                    key: "asset7".into(),
                    is_delete: true,
                    value: Bytes::new(),
                },
            ],
            metadata_writes: vec![rwset::KvMetadataWrite {
                key: "asset1".into(),
                entries: vec![rwset::KvMetadataEntry {
                    name: "VALIDATION_PARAMETER".into(),
                    value: Bytes::from_static(&[0x08, 0x01]),
                }],
            }],
        }
    }

    #[test]
    fn kv_model_decodes_all_four_lists() {
        let tx_rwset = rwset::TxReadWriteSet {
            data_model: rwset::DataModel::Kv as i32,
            ns_rwset: vec![rwset::NsReadWriteSet {
                namespace: "assets".into(),
                rwset: kv_fixture().encode_to_vec().into(),
                collection_hashed_rwset: vec![],
            }],
        };

        let decoded = decode_read_write_set(&tx_rwset.encode_to_vec()).unwrap();
        assert_eq!(decoded.data_model, 0);
        assert_eq!(decoded.ns_rwset.len(), 1);

        let ns = &decoded.ns_rwset[0];
        assert_eq!(ns.namespace, "assets");
        let NsData::Kv(kv) = &ns.rwset else {
            panic!("expected decoded KV namespace");
        };
        assert_eq!(
            kv.reads[0].version,
            Some(Version {
                block_num: "5".into(),
                tx_num: "3".into(),
            })
        );
        assert_eq!(kv.reads[1].version, None);
        assert_eq!(kv.writes[0].value, "{\"owner\":\"alice\"}");
        assert!(kv.writes[1].is_delete);
        assert_eq!(kv.writes[1].value, "");
        assert_eq!(kv.metadata_writes[0].entries[0].name, "VALIDATION_PARAMETER");

        let range = &kv.range_queries_info[0];
        assert!(range.itr_exhausted);
        assert_eq!(
            range.raw_reads.as_ref().unwrap().kv_reads[0].key,
            "asset2"
        );
        assert_eq!(range.reads_merkle_hashes, None);
    }

    #[test]
    fn merkle_branch_leaves_raw_reads_absent() {
        let kv = rwset::KvRwSet {
            range_queries_info: vec![rwset::RangeQueryInfo {
                start_key: "a".into(),
                end_key: "z".into(),
                itr_exhausted: false,
                reads_info: Some(rwset::range_query_info::ReadsInfo::ReadsMerkleHashes(
                    rwset::QueryReadsMerkleSummary {
                        max_degree: 50,
                        max_level: 3,
                        max_level_hashes: vec![Bytes::from_static(&[0xaa; 4])],
                    },
                )),
            }],
            ..Default::default()
        };
        let tx_rwset = rwset::TxReadWriteSet {
            data_model: rwset::DataModel::Kv as i32,
            ns_rwset: vec![rwset::NsReadWriteSet {
                namespace: "assets".into(),
                rwset: kv.encode_to_vec().into(),
                collection_hashed_rwset: vec![],
            }],
        };

        let decoded = decode_read_write_set(&tx_rwset.encode_to_vec()).unwrap();
        let NsData::Kv(kv) = &decoded.ns_rwset[0].rwset else {
            panic!("expected decoded KV namespace");
        };
        let range = &kv.range_queries_info[0];
        assert_eq!(range.raw_reads, None);
        let summary = range.reads_merkle_hashes.as_ref().unwrap();
        assert_eq!(summary.max_degree, 50);
        assert_eq!(summary.max_level_hashes, vec![vec![0xaa; 4]]);
    }

    #[test]
    fn non_kv_model_passes_namespaces_through_raw() {
        // Payload bytes that are NOT a valid KvRwSet: a truncated field.
        let opaque = vec![0x0a, 0xff];
        let tx_rwset = rwset::TxReadWriteSet {
            data_model: 9,
            ns_rwset: vec![rwset::NsReadWriteSet {
                namespace: "assets".into(),
                rwset: opaque.clone().into(),
                collection_hashed_rwset: vec![rwset::CollectionHashedReadWriteSet {
                    collection_name: "secret".into(),
                    hashed_rwset: opaque.clone().into(),
                    pvt_rwset_hash: Bytes::from_static(&[0x99]),
                }],
            }],
        };

        let decoded = decode_read_write_set(&tx_rwset.encode_to_vec()).unwrap();
        assert_eq!(decoded.data_model, 9);
        assert_eq!(decoded.ns_rwset[0].rwset, NsData::Raw(opaque.clone()));
        assert_eq!(
            decoded.ns_rwset[0].collection_hashed_rwset[0].hashed_rwset,
            HashedData::Raw(opaque)
        );
    }

    #[test]
    fn hashed_collection_decodes_under_kv_model() {
        let hashed = rwset::HashedRwSet {
            hashed_reads: vec![rwset::KvReadHash {
                key_hash: Bytes::from_static(&[0x01, 0x02]),
                version: Some(rwset::Version {
                    block_num: 8,
                    tx_num: 1,
                }),
            }],
            hashed_writes: vec![rwset::KvWriteHash {
                key_hash: Bytes::from_static(&[0x01, 0x02]),
                is_delete: false,
                value_hash: Bytes::from_static(&[0x03, 0x04]),
            }],
            metadata_writes: vec![],
        };
        let tx_rwset = rwset::TxReadWriteSet {
            data_model: rwset::DataModel::Kv as i32,
            ns_rwset: vec![rwset::NsReadWriteSet {
                namespace: "assets".into(),
                rwset: Bytes::new(),
                collection_hashed_rwset: vec![rwset::CollectionHashedReadWriteSet {
                    collection_name: "secret".into(),
                    hashed_rwset: hashed.encode_to_vec().into(),
                    pvt_rwset_hash: Bytes::from_static(&[0x77, 0x88]),
                }],
            }],
        };

        let decoded = decode_read_write_set(&tx_rwset.encode_to_vec()).unwrap();
        let collection = &decoded.ns_rwset[0].collection_hashed_rwset[0];
        assert_eq!(collection.collection_name, "secret");
        assert_eq!(collection.pvt_rwset_hash, vec![0x77, 0x88]);
        let HashedData::Kv(hashed) = &collection.hashed_rwset else {
            panic!("expected decoded hashed collection");
        };
        assert_eq!(hashed.hashed_reads[0].key_hash, vec![0x01, 0x02]);
        assert_eq!(
            hashed.hashed_reads[0].version,
            Some(Version {
                block_num: "8".into(),
                tx_num: "1".into(),
            })
        );
        assert_eq!(hashed.hashed_writes[0].value_hash, vec![0x03, 0x04]);
    }

    #[test]
    fn malformed_outer_message_is_fatal() {
        assert!(matches!(
            decode_read_write_set(&[0xff, 0xff, 0xff]),
            Err(Error::Proto("TxReadWriteSet", _))
        ));
    }

    #[test]
    fn empty_input_decodes_to_empty_set() {
        let decoded = decode_read_write_set(&[]).unwrap();
        assert_eq!(decoded.data_model, 0);
        assert!(decoded.ns_rwset.is_empty());
    }
}
