//! Channel-configuration loading.
//!
//! A channel's governance state arrives as a recursive tree of groups,
//! values, and policies whose interpretation hangs off string keys at every
//! level. The loader walks that tree and produces two things at once: a
//! versions tree mirroring the group structure, and a flat
//! [`ChannelConfig`] snapshot (organizations, anchor peers, orderer
//! endpoints, batch settings) accumulated at whatever depth each item is
//! discovered.
//!
//! Configuration blocks accumulate entries across the lifetime of a channel
//! and clients of different vintages must interoperate, so one entry this
//! version cannot decode never aborts the load: recognized-but-corrupt
//! entries are recorded in [`ChannelConfig::errors`] and skipped, and
//! unrecognized keys keep their version with the value body undecoded.

use crate::{
    identity::Msp,
    policy::{decode_policy, Policy},
    Error,
};
use prost::Message;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use weft_protos::{common, configtx, msp, orderer, peer};

/// A flattened channel-configuration snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChannelConfig {
    /// Present when loaded from a configuration update.
    pub channel_id: Option<String>,
    /// Present when loaded from a committed configuration; decimal string.
    pub sequence: Option<String>,
    pub msps: Vec<Msp>,
    pub anchor_peers: Vec<AnchorPeer>,
    pub orderers: Vec<String>,
    pub kafka_brokers: Vec<String>,
    pub settings: Settings,
    pub versions: GroupVersions,
    /// Entries that failed to decode, keyed by tree path; absence of a key
    /// from the snapshot plus an entry here is the per-entry failure signal.
    #[serde(skip)]
    pub errors: Vec<EntryError>,
}

/// An anchor peer, tagged with the organization group it was found under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorPeer {
    pub org: String,
    pub host: String,
    pub port: i32,
}

/// Scalar channel settings gathered from recognized configuration values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Settings {
    pub consensus_type: Option<String>,
    pub batch_size: Option<BatchSize>,
    pub batch_timeout: Option<String>,
    pub channel_restrictions: Option<ChannelRestrictions>,
    pub consortium: Option<String>,
    pub hashing_algorithm: Option<String>,
    /// Merkle width for block data hashing.
    pub block_data_hashing_width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSize {
    pub max_message_count: u32,
    pub absolute_max_bytes: u32,
    pub preferred_max_bytes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRestrictions {
    /// Decimal string; the wire carries a 64-bit count.
    pub max_count: String,
}

/// The versions tree: one node per configuration group, mirroring the wire
/// structure with decoded policies attached.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupVersions {
    pub version: u64,
    pub groups: BTreeMap<String, GroupVersions>,
    pub values: BTreeMap<String, ValueVersion>,
    pub policies: BTreeMap<String, PolicyVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueVersion {
    pub version: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyVersion {
    pub version: u64,
    /// Absent for the recognized-but-unimplemented MSP policy type.
    pub policy: Option<Policy>,
}

/// A configuration entry that failed to decode and was skipped.
#[derive(Debug, Clone)]
pub struct EntryError {
    /// Dotted group path, e.g. `channel.Application.Org1MSP`.
    pub path: String,
    pub key: String,
    pub error: Error,
}

/// Recognized configuration value keys. The wire dispatches on strings;
/// mapping to this enum at the boundary keeps the dispatch exhaustive while
/// the `Unknown` arm preserves keys added by newer schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKey {
    AnchorPeers,
    Msp,
    ConsensusType,
    BatchSize,
    BatchTimeout,
    ChannelRestrictions,
    Consortium,
    HashingAlgorithm,
    BlockDataHashingStructure,
    OrdererAddresses,
    KafkaBrokers,
    Unknown,
}

impl ValueKey {
    fn from_name(name: &str) -> Self {
        match name {
            "AnchorPeers" => Self::AnchorPeers,
            "MSP" => Self::Msp,
            "ConsensusType" => Self::ConsensusType,
            "BatchSize" => Self::BatchSize,
            "BatchTimeout" => Self::BatchTimeout,
            "ChannelRestrictions" => Self::ChannelRestrictions,
            "Consortium" => Self::Consortium,
            "HashingAlgorithm" => Self::HashingAlgorithm,
            "BlockDataHashingStructure" => Self::BlockDataHashingStructure,
            "OrdererAddresses" => Self::OrdererAddresses,
            "KafkaBrokers" => Self::KafkaBrokers,
            _ => Self::Unknown,
        }
    }
}

/// Loads a committed channel configuration.
pub fn load_config_envelope(envelope: &configtx::ConfigEnvelope) -> ChannelConfig {
    let mut acc = Accumulator::default();
    let mut sequence = None;
    let mut versions = GroupVersions::default();

    if let Some(config) = &envelope.config {
        sequence = Some(config.sequence.to_string());
        if let Some(group) = &config.channel_group {
            versions = load_group(&mut acc, group, None, "channel");
        }
    }

    acc.into_config(None, sequence, versions)
}

/// Loads a configuration update from its marshaled `ConfigUpdate` bytes.
///
/// The read set (baseline) is processed before the write set (new content)
/// so that write-set entries override read-set entries at every key path.
/// Reversing this order would silently reintroduce stale configuration.
pub fn load_config_update(bytes: &[u8]) -> Result<ChannelConfig, Error> {
    let update =
        configtx::ConfigUpdate::decode(bytes).map_err(|err| Error::Proto("ConfigUpdate", err))?;

    let mut acc = Accumulator::default();
    let read = update
        .read_set
        .as_ref()
        .map(|group| load_group(&mut acc, group, None, "read_set"))
        .unwrap_or_default();
    let write = update
        .write_set
        .as_ref()
        .map(|group| load_group(&mut acc, group, None, "write_set"))
        .unwrap_or_default();
    let versions = merge_versions(read, write);

    Ok(acc.into_config(Some(update.channel_id), None, versions))
}

/// Flat collections accumulated during the group walk. The tree shape does
/// not mirror the lists callers need (anchor peers live several levels deep
/// per organization), so discoveries are pushed here at the point the walk
/// encounters them.
#[derive(Default)]
struct Accumulator {
    msps: Vec<Msp>,
    anchor_peers: Vec<AnchorPeer>,
    orderers: Vec<String>,
    kafka_brokers: Vec<String>,
    settings: Settings,
    errors: Vec<EntryError>,
}

impl Accumulator {
    fn into_config(
        self,
        channel_id: Option<String>,
        sequence: Option<String>,
        versions: GroupVersions,
    ) -> ChannelConfig {
        ChannelConfig {
            channel_id,
            sequence,
            msps: self.msps,
            anchor_peers: self.anchor_peers,
            orderers: self.orderers,
            kafka_brokers: self.kafka_brokers,
            settings: self.settings,
            versions,
            errors: self.errors,
        }
    }

    fn record(&mut self, path: &str, key: &str, error: Error) {
        warn!(path, key, %error, "failed to decode configuration entry, skipping");
        self.errors.push(EntryError {
            path: path.to_string(),
            key: key.to_string(),
            error,
        });
    }
}

/// Walks one group node: sub-groups first, then values, then policies.
/// `org` is the name this node is stored under in its parent's group map;
/// values that carry per-organization data (anchor peers, MSPs) are tagged
/// with it at the point of discovery.
fn load_group(
    acc: &mut Accumulator,
    group: &configtx::ConfigGroup,
    org: Option<&str>,
    path: &str,
) -> GroupVersions {
    let mut node = GroupVersions {
        version: group.version,
        ..Default::default()
    };

    // Sorted iteration keeps the walk order (and with it log output and
    // accumulated list order) independent of map randomization.
    let mut names: Vec<_> = group.groups.keys().collect();
    names.sort();
    for name in names {
        let child = &group.groups[name];
        let child_path = format!("{path}.{name}");
        node.groups.insert(
            name.clone(),
            load_group(acc, child, Some(name.as_str()), &child_path),
        );
    }

    let mut value_names: Vec<_> = group.values.keys().collect();
    value_names.sort();
    for name in value_names {
        let value = &group.values[name];
        node.values
            .insert(name.clone(), ValueVersion { version: value.version });
        if let Err(error) = decode_value(acc, name, value, org) {
            acc.record(path, name, error);
        }
    }

    let mut policy_names: Vec<_> = group.policies.keys().collect();
    policy_names.sort();
    for name in policy_names {
        let config_policy = &group.policies[name];
        match decode_config_policy(config_policy) {
            Ok(policy) => {
                node.policies.insert(
                    name.clone(),
                    PolicyVersion {
                        version: config_policy.version,
                        policy,
                    },
                );
            }
            Err(error) => acc.record(path, name, error),
        }
    }

    node
}

fn decode_config_policy(policy: &configtx::ConfigPolicy) -> Result<Option<Policy>, Error> {
    match &policy.policy {
        Some(proto) => decode_policy(proto),
        None => Ok(None),
    }
}

/// Dispatches one configuration value by its key string. Later occurrences
/// of a key replace earlier ones wholesale (the write set of an update must
/// override the read set), keyed by organization where the value is
/// per-organization.
fn decode_value(
    acc: &mut Accumulator,
    key: &str,
    value: &configtx::ConfigValue,
    org: Option<&str>,
) -> Result<(), Error> {
    let bytes = value.value.as_ref();
    match ValueKey::from_name(key) {
        ValueKey::AnchorPeers => {
            let peers = peer::AnchorPeers::decode(bytes)
                .map_err(|err| Error::Proto("AnchorPeers", err))?;
            let org = org.unwrap_or_default().to_string();
            acc.anchor_peers.retain(|p| p.org != org);
            acc.anchor_peers.extend(peers.anchor_peers.iter().map(|p| AnchorPeer {
                org: org.clone(),
                host: p.host.clone(),
                port: p.port,
            }));
        }
        ValueKey::Msp => {
            let config =
                msp::MspConfig::decode(bytes).map_err(|err| Error::Proto("MspConfig", err))?;
            let decoded = crate::identity::decode_msp_config(&config)?;
            acc.msps.retain(|m| m.id != decoded.id);
            acc.msps.push(decoded);
        }
        ValueKey::ConsensusType => {
            let consensus = orderer::ConsensusType::decode(bytes)
                .map_err(|err| Error::Proto("ConsensusType", err))?;
            acc.settings.consensus_type = Some(consensus.r#type);
        }
        ValueKey::BatchSize => {
            let batch = orderer::BatchSize::decode(bytes)
                .map_err(|err| Error::Proto("BatchSize", err))?;
            acc.settings.batch_size = Some(BatchSize {
                max_message_count: batch.max_message_count,
                absolute_max_bytes: batch.absolute_max_bytes,
                preferred_max_bytes: batch.preferred_max_bytes,
            });
        }
        ValueKey::BatchTimeout => {
            let timeout = orderer::BatchTimeout::decode(bytes)
                .map_err(|err| Error::Proto("BatchTimeout", err))?;
            acc.settings.batch_timeout = Some(timeout.timeout);
        }
        ValueKey::ChannelRestrictions => {
            let restrictions = orderer::ChannelRestrictions::decode(bytes)
                .map_err(|err| Error::Proto("ChannelRestrictions", err))?;
            acc.settings.channel_restrictions = Some(ChannelRestrictions {
                max_count: restrictions.max_count.to_string(),
            });
        }
        ValueKey::Consortium => {
            let consortium = common::Consortium::decode(bytes)
                .map_err(|err| Error::Proto("Consortium", err))?;
            acc.settings.consortium = Some(consortium.name);
        }
        ValueKey::HashingAlgorithm => {
            let algorithm = common::HashingAlgorithm::decode(bytes)
                .map_err(|err| Error::Proto("HashingAlgorithm", err))?;
            acc.settings.hashing_algorithm = Some(algorithm.name);
        }
        ValueKey::BlockDataHashingStructure => {
            let structure = common::BlockDataHashingStructure::decode(bytes)
                .map_err(|err| Error::Proto("BlockDataHashingStructure", err))?;
            acc.settings.block_data_hashing_width = Some(structure.width);
        }
        ValueKey::OrdererAddresses => {
            let addresses = common::OrdererAddresses::decode(bytes)
                .map_err(|err| Error::Proto("OrdererAddresses", err))?;
            acc.orderers = addresses.addresses;
        }
        ValueKey::KafkaBrokers => {
            let brokers = orderer::KafkaBrokers::decode(bytes)
                .map_err(|err| Error::Proto("KafkaBrokers", err))?;
            acc.kafka_brokers = brokers.brokers;
        }
        ValueKey::Unknown => {
            debug!(key, "unrecognized configuration value, leaving undecoded");
        }
    }
    Ok(())
}

/// Merges two versions trees, the second (write set) winning wherever both
/// carry the same key path.
fn merge_versions(base: GroupVersions, over: GroupVersions) -> GroupVersions {
    let mut groups = base.groups;
    for (name, over_child) in over.groups {
        let merged = match groups.remove(&name) {
            Some(base_child) => merge_versions(base_child, over_child),
            None => over_child,
        };
        groups.insert(name, merged);
    }

    let mut values = base.values;
    values.extend(over.values);
    let mut policies = base.policies;
    policies.extend(over.policies);

    GroupVersions {
        version: over.version,
        groups,
        values,
        policies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use weft_protos::policies;

    fn value(version: u64, bytes: Vec<u8>) -> configtx::ConfigValue {
        configtx::ConfigValue {
            version,
            value: bytes.into(),
            mod_policy: "Admins".into(),
        }
    }

    fn org_group(msp_name: &str, anchor_host: &str) -> configtx::ConfigGroup {
        let mut group = configtx::ConfigGroup {
            version: 1,
            ..Default::default()
        };
        group.values.insert(
            "MSP".into(),
            value(
                0,
                msp::MspConfig {
                    r#type: 0,
                    config: msp::FabricMspConfig {
                        name: msp_name.into(),
                        root_certs: vec![Bytes::from_static(b"-----BEGIN CERTIFICATE-----")],
                        ..Default::default()
                    }
                    .encode_to_vec()
                    .into(),
                }
                .encode_to_vec(),
            ),
        );
        group.values.insert(
            "AnchorPeers".into(),
            value(
                0,
                peer::AnchorPeers {
                    anchor_peers: vec![peer::AnchorPeer {
                        host: anchor_host.into(),
                        port: 7051,
                    }],
                }
                .encode_to_vec(),
            ),
        );
        group
    }

    fn channel_group() -> configtx::ConfigGroup {
        let mut application = configtx::ConfigGroup {
            version: 1,
            ..Default::default()
        };
        application
            .groups
            .insert("Org1MSP".into(), org_group("Org1MSP", "peer0.org1"));
        application
            .groups
            .insert("Org2MSP".into(), org_group("Org2MSP", "peer0.org2"));

        let mut orderer_group = configtx::ConfigGroup {
            version: 2,
            ..Default::default()
        };
        orderer_group.values.insert(
            "ConsensusType".into(),
            value(
                0,
                orderer::ConsensusType {
                    r#type: "kafka".into(),
                }
                .encode_to_vec(),
            ),
        );
        orderer_group.values.insert(
            "BatchSize".into(),
            value(
                0,
                orderer::BatchSize {
                    max_message_count: 10,
                    absolute_max_bytes: 99 * 1024 * 1024,
                    preferred_max_bytes: 512 * 1024,
                }
                .encode_to_vec(),
            ),
        );
        orderer_group.values.insert(
            "BatchTimeout".into(),
            value(0, orderer::BatchTimeout { timeout: "2s".into() }.encode_to_vec()),
        );
        orderer_group.values.insert(
            "KafkaBrokers".into(),
            value(
                0,
                orderer::KafkaBrokers {
                    brokers: vec!["kafka0:9092".into(), "kafka1:9092".into()],
                }
                .encode_to_vec(),
            ),
        );
        orderer_group.policies.insert(
            "Admins".into(),
            configtx::ConfigPolicy {
                version: 0,
                policy: Some(policies::Policy {
                    r#type: policies::PolicyType::ImplicitMeta as i32,
                    value: policies::ImplicitMetaPolicy {
                        sub_policy: "Admins".into(),
                        rule: policies::ImplicitMetaRule::Majority as i32,
                    }
                    .encode_to_vec()
                    .into(),
                }),
                mod_policy: "Admins".into(),
            },
        );

        let mut root = configtx::ConfigGroup {
            version: 3,
            ..Default::default()
        };
        root.groups.insert("Application".into(), application);
        root.groups.insert("Orderer".into(), orderer_group);
        root.values.insert(
            "OrdererAddresses".into(),
            value(
                0,
                common::OrdererAddresses {
                    addresses: vec!["orderer0:7050".into()],
                }
                .encode_to_vec(),
            ),
        );
        root.values.insert(
            "HashingAlgorithm".into(),
            value(
                0,
                common::HashingAlgorithm { name: "SHA256".into() }.encode_to_vec(),
            ),
        );
        root.values.insert(
            "BlockDataHashingStructure".into(),
            value(
                0,
                common::BlockDataHashingStructure { width: u32::MAX }.encode_to_vec(),
            ),
        );
        root.values.insert(
            "Consortium".into(),
            value(
                0,
                common::Consortium { name: "SampleConsortium".into() }.encode_to_vec(),
            ),
        );
        root
    }

    fn envelope(group: configtx::ConfigGroup) -> configtx::ConfigEnvelope {
        configtx::ConfigEnvelope {
            config: Some(configtx::Config {
                sequence: 4,
                channel_group: Some(group),
            }),
            last_update: None,
        }
    }

    #[test]
    fn envelope_load_flattens_the_tree() {
        let config = load_config_envelope(&envelope(channel_group()));

        assert_eq!(config.sequence.as_deref(), Some("4"));
        assert!(config.errors.is_empty(), "{:?}", config.errors);

        let mut msp_ids: Vec<_> = config.msps.iter().map(|m| m.id.as_str()).collect();
        msp_ids.sort();
        assert_eq!(msp_ids, ["Org1MSP", "Org2MSP"]);

        assert_eq!(config.anchor_peers.len(), 2);
        let org1: Vec<_> = config
            .anchor_peers
            .iter()
            .filter(|p| p.org == "Org1MSP")
            .collect();
        assert_eq!(org1[0].host, "peer0.org1");
        assert_eq!(org1[0].port, 7051);

        assert_eq!(config.orderers, vec!["orderer0:7050"]);
        assert_eq!(config.kafka_brokers, vec!["kafka0:9092", "kafka1:9092"]);

        assert_eq!(config.settings.consensus_type.as_deref(), Some("kafka"));
        assert_eq!(
            config.settings.batch_size,
            Some(BatchSize {
                max_message_count: 10,
                absolute_max_bytes: 99 * 1024 * 1024,
                preferred_max_bytes: 512 * 1024,
            })
        );
        assert_eq!(config.settings.batch_timeout.as_deref(), Some("2s"));
        assert_eq!(config.settings.hashing_algorithm.as_deref(), Some("SHA256"));
        assert_eq!(config.settings.block_data_hashing_width, Some(u32::MAX));
        assert_eq!(
            config.settings.consortium.as_deref(),
            Some("SampleConsortium")
        );

        // The versions tree mirrors the wire structure.
        assert_eq!(config.versions.version, 3);
        assert_eq!(config.versions.groups["Application"].version, 1);
        assert_eq!(
            config.versions.groups["Application"].groups["Org2MSP"]
                .values["AnchorPeers"],
            ValueVersion { version: 0 }
        );
        let admins = &config.versions.groups["Orderer"].policies["Admins"];
        assert!(matches!(admins.policy, Some(Policy::ImplicitMeta(_))));
    }

    #[test]
    fn corrupt_entry_is_isolated_from_siblings() {
        let mut group = channel_group();
        let orderer_group = group.groups.get_mut("Orderer").unwrap();
        // A recognized key with a payload that cannot parse: a truncated
        // length-delimited field.
        orderer_group
            .values
            .insert("BatchSize".into(), value(7, vec![0x0a, 0xff]));

        let config = load_config_envelope(&envelope(group));

        // The corrupted entry is absent from the snapshot...
        assert_eq!(config.settings.batch_size, None);
        // ...its siblings decoded...
        assert_eq!(config.settings.consensus_type.as_deref(), Some("kafka"));
        assert_eq!(config.settings.batch_timeout.as_deref(), Some("2s"));
        // ...and the failure is observable.
        assert_eq!(config.errors.len(), 1);
        assert_eq!(config.errors[0].key, "BatchSize");
        assert_eq!(config.errors[0].path, "channel.Orderer");
        assert!(matches!(config.errors[0].error, Error::Proto("BatchSize", _)));
        // The version survives even though the value body did not decode.
        assert_eq!(
            config.versions.groups["Orderer"].values["BatchSize"],
            ValueVersion { version: 7 }
        );
    }

    #[test]
    fn unknown_value_key_keeps_version_without_decoding() {
        let mut group = channel_group();
        group
            .values
            .insert("Capabilities".into(), value(2, vec![0xde, 0xad, 0xbe, 0xef]));

        let config = load_config_envelope(&envelope(group));

        assert!(config.errors.is_empty());
        assert_eq!(
            config.versions.values["Capabilities"],
            ValueVersion { version: 2 }
        );
    }

    #[test]
    fn update_write_set_overrides_read_set() {
        let mut read_set = configtx::ConfigGroup::default();
        read_set.values.insert(
            "BatchTimeout".into(),
            value(0, orderer::BatchTimeout { timeout: "2s".into() }.encode_to_vec()),
        );
        let mut write_set = configtx::ConfigGroup {
            version: 1,
            ..Default::default()
        };
        write_set.values.insert(
            "BatchTimeout".into(),
            value(1, orderer::BatchTimeout { timeout: "5s".into() }.encode_to_vec()),
        );

        let update = configtx::ConfigUpdate {
            channel_id: "mychannel".into(),
            read_set: Some(read_set),
            write_set: Some(write_set),
            ..Default::default()
        };

        let config = load_config_update(&update.encode_to_vec()).unwrap();
        assert_eq!(config.channel_id.as_deref(), Some("mychannel"));
        // Never the read set's "2s".
        assert_eq!(config.settings.batch_timeout.as_deref(), Some("5s"));
        assert_eq!(
            config.versions.values["BatchTimeout"],
            ValueVersion { version: 1 }
        );
        assert_eq!(config.versions.version, 1);
    }

    #[test]
    fn update_keeps_read_only_entries_in_merged_versions() {
        let mut read_set = configtx::ConfigGroup::default();
        read_set.values.insert(
            "Consortium".into(),
            value(
                0,
                common::Consortium { name: "SampleConsortium".into() }.encode_to_vec(),
            ),
        );
        let mut write_set = configtx::ConfigGroup::default();
        write_set.values.insert(
            "BatchTimeout".into(),
            value(1, orderer::BatchTimeout { timeout: "1s".into() }.encode_to_vec()),
        );

        let update = configtx::ConfigUpdate {
            channel_id: "mychannel".into(),
            read_set: Some(read_set),
            write_set: Some(write_set),
            ..Default::default()
        };

        let config = load_config_update(&update.encode_to_vec()).unwrap();
        assert!(config.versions.values.contains_key("Consortium"));
        assert!(config.versions.values.contains_key("BatchTimeout"));
    }

    #[test]
    fn malformed_update_bytes_are_fatal() {
        assert!(matches!(
            load_config_update(&[0xff, 0xff]),
            Err(Error::Proto("ConfigUpdate", _))
        ));
    }

    #[test]
    fn msp_policy_entry_is_present_without_payload() {
        let mut group = configtx::ConfigGroup::default();
        group.policies.insert(
            "Legacy".into(),
            configtx::ConfigPolicy {
                version: 5,
                policy: Some(policies::Policy {
                    r#type: policies::PolicyType::Msp as i32,
                    value: Bytes::from_static(&[1, 2]),
                }),
                mod_policy: String::new(),
            },
        );

        let config = load_config_envelope(&envelope(group));
        assert!(config.errors.is_empty());
        let legacy = &config.versions.policies["Legacy"];
        assert_eq!(legacy.version, 5);
        assert!(legacy.policy.is_none());
    }

    #[test]
    fn unintelligible_policy_type_is_isolated_per_entry() {
        let mut group = channel_group();
        group.policies.insert(
            "Mystery".into(),
            configtx::ConfigPolicy {
                version: 0,
                policy: Some(policies::Policy {
                    r#type: 99,
                    value: Bytes::new(),
                }),
                mod_policy: String::new(),
            },
        );

        let config = load_config_envelope(&envelope(group));
        // The entry is absent from the tree, the failure recorded, and the
        // rest of the configuration loaded.
        assert!(!config.versions.policies.contains_key("Mystery"));
        assert!(config
            .errors
            .iter()
            .any(|e| e.key == "Mystery"
                && matches!(e.error, Error::UnknownPolicyType(99))));
        assert_eq!(config.msps.len(), 2);
    }
}
