//! Block, envelope, and transaction decoding.
//!
//! A block is an envelope of envelopes: every level wraps the next as a
//! marshaled bytes field, and the meaning of a payload is only knowable
//! after decoding its header. The decoders here peel each level in order —
//! header, then data, then metadata — and dispatch on the channel header
//! type to pick the payload decoding branch.
//!
//! Unrecognized header types decode to an empty [`PayloadData::Unknown`]
//! rather than failing: a block containing message kinds newer than this
//! client must not become unreadable because of them.
//!
//! 64-bit counters (block numbers, epochs, ledger indices) are rendered as
//! decimal strings so that JSON consumers with 53-bit number precision see
//! exact values; hashes are rendered as lowercase hex.

use crate::{
    config::{self, ChannelConfig},
    hex,
    identity::{decode_identity, Identity},
    rwset::{decode_read_write_set, ReadWriteSet},
    Error,
};
use prost::Message;
use serde::Serialize;
use tracing::{debug, warn};
use weft_protos::{common, configtx, peer};

/// A fully decoded block.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub header: BlockHeader,
    pub data: BlockData,
    /// `None` when the metadata section failed to decode; header and data
    /// are still populated (partial decode).
    pub metadata: Option<BlockMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockHeader {
    /// Decimal string.
    pub number: String,
    /// Lowercase hex.
    pub previous_hash: String,
    /// Lowercase hex.
    pub data_hash: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BlockData {
    pub data: Vec<Envelope>,
}

/// The three positional metadata slots of a block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlockMetadata {
    pub signatures: MetadataEntry,
    pub last_config: LastConfig,
    /// One validation-code byte per transaction in `data.data`, by position.
    pub transaction_filter: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetadataEntry {
    pub value: Vec<u8>,
    pub signatures: Vec<MetadataSignature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataSignature {
    pub signature_header: SignatureHeader,
    pub signature: Vec<u8>,
}

/// Pointer to the most recent configuration block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LastConfig {
    /// Decimal string.
    pub index: String,
    pub signatures: Vec<MetadataSignature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub signature: Vec<u8>,
    pub payload: Payload,
}

#[derive(Debug, Clone, Serialize)]
pub struct Payload {
    pub header: Header,
    pub data: PayloadData,
}

#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub channel_header: ChannelHeader,
    pub signature_header: SignatureHeader,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelHeader {
    pub r#type: i32,
    /// Name of the header type, or `UNKNOWN` for out-of-range values.
    pub type_string: String,
    pub version: i32,
    /// RFC 3339.
    pub timestamp: Option<String>,
    pub channel_id: String,
    pub tx_id: String,
    /// Decimal string.
    pub epoch: String,
    pub extension: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SignatureHeader {
    pub creator: Identity,
    pub nonce: Vec<u8>,
}

/// Payload contents, selected by the channel header type.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PayloadData {
    Config(ConfigEnvelope),
    ConfigUpdate(ConfigUpdateEnvelope),
    Transaction(Transaction),
    /// Any header type this decoder does not handle; serializes as `{}`.
    Unknown(Unknown),
}

#[derive(Debug, Clone, Serialize)]
pub struct Unknown {}

/// A committed channel configuration (CONFIG payload).
#[derive(Debug, Clone, Serialize)]
pub struct ConfigEnvelope {
    pub config: ChannelConfig,
    /// The update envelope the configuration was computed from.
    pub last_update: Option<Box<Envelope>>,
}

/// A proposed configuration change (CONFIG_UPDATE payload).
#[derive(Debug, Clone, Serialize)]
pub struct ConfigUpdateEnvelope {
    pub config_update: ChannelConfig,
    pub signatures: Vec<ConfigSignature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSignature {
    pub signature_header: SignatureHeader,
    pub signature: Vec<u8>,
}

/// An endorser transaction (ENDORSER_TRANSACTION payload).
///
/// A transaction's validity is not stored here: it lives in the parent
/// block's transaction-filter metadata, indexed by transaction position.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub actions: Vec<TransactionAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionAction {
    pub header: SignatureHeader,
    pub payload: ChaincodeActionPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChaincodeActionPayload {
    pub chaincode_proposal_payload: ChaincodeProposalPayload,
    pub action: Option<ChaincodeEndorsedAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChaincodeProposalPayload {
    pub input: ChaincodeInvocationSpec,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChaincodeInvocationSpec {
    pub chaincode_spec: Option<ChaincodeSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChaincodeSpec {
    pub r#type: i32,
    pub chaincode_id: Option<ChaincodeId>,
    pub input: ChaincodeInput,
    pub timeout: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChaincodeInput {
    /// Raw argument bytes; by convention the first is the function name.
    pub args: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChaincodeId {
    pub path: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChaincodeEndorsedAction {
    pub proposal_response_payload: ProposalResponsePayload,
    pub endorsements: Vec<Endorsement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Endorsement {
    pub endorser: Identity,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProposalResponsePayload {
    /// Lowercase hex.
    pub proposal_hash: String,
    pub extension: ChaincodeAction,
}

/// The effects of a chaincode execution.
#[derive(Debug, Clone, Serialize)]
pub struct ChaincodeAction {
    pub results: ReadWriteSet,
    pub events: ChaincodeEvent,
    pub response: Response,
    pub chaincode_id: Option<ChaincodeId>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChaincodeEvent {
    pub chaincode_id: String,
    pub tx_id: String,
    pub event_name: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Response {
    pub status: i32,
    pub message: String,
    pub payload: Vec<u8>,
}

/// A transaction as returned by ledger queries.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedTransaction {
    pub validation_code: i32,
    pub transaction_envelope: Envelope,
}

/// Decodes a marshaled `Block`.
///
/// Header and data decode before metadata; a metadata failure is logged and
/// leaves `metadata` as `None` while the call still succeeds. Failures in
/// the header or data sections are fatal.
pub fn decode_block(bytes: &[u8]) -> Result<Block, Error> {
    let block = common::Block::decode(bytes).map_err(|err| Error::Proto("Block", err))?;

    let header = block
        .header
        .map(|header| BlockHeader {
            number: header.number.to_string(),
            previous_hash: hex(&header.previous_hash),
            data_hash: hex(&header.data_hash),
        })
        .unwrap_or_default();

    let data = match &block.data {
        Some(data) => BlockData {
            data: data
                .data
                .iter()
                .map(|envelope| decode_envelope(envelope))
                .collect::<Result<Vec<_>, _>>()?,
        },
        None => BlockData::default(),
    };

    let metadata = match &block.metadata {
        Some(metadata) => match decode_block_metadata(metadata) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(%err, "failed to decode block metadata");
                None
            }
        },
        None => None,
    };

    Ok(Block {
        header,
        data,
        metadata,
    })
}

/// Decodes a marshaled `ProcessedTransaction`.
pub fn decode_processed_transaction(bytes: &[u8]) -> Result<ProcessedTransaction, Error> {
    let processed = peer::ProcessedTransaction::decode(bytes)
        .map_err(|err| Error::Proto("ProcessedTransaction", err))?;
    let envelope = processed
        .transaction_envelope
        .as_ref()
        .ok_or(Error::MissingField("ProcessedTransaction.transaction_envelope"))?;
    Ok(ProcessedTransaction {
        validation_code: processed.validation_code,
        transaction_envelope: decode_envelope_message(envelope)?,
    })
}

/// Decodes a marshaled `Envelope`.
pub fn decode_envelope(bytes: &[u8]) -> Result<Envelope, Error> {
    let envelope =
        common::Envelope::decode(bytes).map_err(|err| Error::Proto("Envelope", err))?;
    decode_envelope_message(&envelope)
}

fn decode_envelope_message(envelope: &common::Envelope) -> Result<Envelope, Error> {
    let payload = common::Payload::decode(envelope.payload.as_ref())
        .map_err(|err| Error::Proto("Payload", err))?;
    let header = payload
        .header
        .as_ref()
        .ok_or(Error::MissingField("Payload.header"))?;
    let channel_header = common::ChannelHeader::decode(header.channel_header.as_ref())
        .map_err(|err| Error::Proto("ChannelHeader", err))?;
    let signature_header = decode_signature_header(&header.signature_header)?;
    let data = decode_payload_data(channel_header.r#type, &payload.data)?;

    Ok(Envelope {
        signature: envelope.signature.to_vec(),
        payload: Payload {
            header: Header {
                channel_header: decode_channel_header(&channel_header),
                signature_header,
            },
            data,
        },
    })
}

/// The polymorphism point: picks the data-decoding branch from the header
/// type. Everything outside the three handled types decodes to `Unknown`.
fn decode_payload_data(header_type: i32, data: &[u8]) -> Result<PayloadData, Error> {
    match common::HeaderType::try_from(header_type) {
        Ok(common::HeaderType::Config) => {
            Ok(PayloadData::Config(decode_config_envelope(data)?))
        }
        Ok(common::HeaderType::ConfigUpdate) => Ok(PayloadData::ConfigUpdate(
            decode_config_update_envelope(data)?,
        )),
        Ok(common::HeaderType::EndorserTransaction) => {
            Ok(PayloadData::Transaction(decode_transaction(data)?))
        }
        _ => {
            debug!(header_type, "unhandled header type, leaving payload data empty");
            Ok(PayloadData::Unknown(Unknown {}))
        }
    }
}

fn decode_config_envelope(bytes: &[u8]) -> Result<ConfigEnvelope, Error> {
    let envelope = configtx::ConfigEnvelope::decode(bytes)
        .map_err(|err| Error::Proto("ConfigEnvelope", err))?;
    let config = config::load_config_envelope(&envelope);
    let last_update = envelope
        .last_update
        .as_ref()
        .and_then(|update| match decode_envelope_message(update) {
            Ok(decoded) => Some(Box::new(decoded)),
            Err(err) => {
                warn!(%err, "failed to decode last_update envelope");
                None
            }
        });
    Ok(ConfigEnvelope {
        config,
        last_update,
    })
}

fn decode_config_update_envelope(bytes: &[u8]) -> Result<ConfigUpdateEnvelope, Error> {
    let envelope = configtx::ConfigUpdateEnvelope::decode(bytes)
        .map_err(|err| Error::Proto("ConfigUpdateEnvelope", err))?;
    let config_update = config::load_config_update(&envelope.config_update)?;
    let signatures = envelope
        .signatures
        .iter()
        .map(|signature| {
            Ok(ConfigSignature {
                signature_header: decode_signature_header(&signature.signature_header)?,
                signature: signature.signature.to_vec(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(ConfigUpdateEnvelope {
        config_update,
        signatures,
    })
}

fn decode_transaction(bytes: &[u8]) -> Result<Transaction, Error> {
    let transaction =
        peer::Transaction::decode(bytes).map_err(|err| Error::Proto("Transaction", err))?;
    Ok(Transaction {
        actions: transaction
            .actions
            .iter()
            .map(decode_transaction_action)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn decode_transaction_action(
    action: &peer::TransactionAction,
) -> Result<TransactionAction, Error> {
    let header = decode_signature_header(&action.header)?;
    let payload = peer::ChaincodeActionPayload::decode(action.payload.as_ref())
        .map_err(|err| Error::Proto("ChaincodeActionPayload", err))?;
    let proposal_payload =
        peer::ChaincodeProposalPayload::decode(payload.chaincode_proposal_payload.as_ref())
            .map_err(|err| Error::Proto("ChaincodeProposalPayload", err))?;

    Ok(TransactionAction {
        header,
        payload: ChaincodeActionPayload {
            chaincode_proposal_payload: ChaincodeProposalPayload {
                input: decode_invocation_spec(&proposal_payload.input)?,
            },
            action: payload
                .action
                .as_ref()
                .map(decode_endorsed_action)
                .transpose()?,
        },
    })
}

fn decode_invocation_spec(bytes: &[u8]) -> Result<ChaincodeInvocationSpec, Error> {
    let invocation = peer::ChaincodeInvocationSpec::decode(bytes)
        .map_err(|err| Error::Proto("ChaincodeInvocationSpec", err))?;
    Ok(ChaincodeInvocationSpec {
        chaincode_spec: invocation.chaincode_spec.as_ref().map(|spec| ChaincodeSpec {
            r#type: spec.r#type,
            chaincode_id: spec.chaincode_id.as_ref().map(decode_chaincode_id),
            input: spec
                .input
                .as_ref()
                .map(|input| ChaincodeInput {
                    args: input.args.iter().map(|arg| arg.to_vec()).collect(),
                })
                .unwrap_or_default(),
            timeout: spec.timeout,
        }),
    })
}

fn decode_endorsed_action(
    action: &peer::ChaincodeEndorsedAction,
) -> Result<ChaincodeEndorsedAction, Error> {
    let response_payload =
        peer::ProposalResponsePayload::decode(action.proposal_response_payload.as_ref())
            .map_err(|err| Error::Proto("ProposalResponsePayload", err))?;
    let chaincode_action = peer::ChaincodeAction::decode(response_payload.extension.as_ref())
        .map_err(|err| Error::Proto("ChaincodeAction", err))?;
    let events = peer::ChaincodeEvent::decode(chaincode_action.events.as_ref())
        .map_err(|err| Error::Proto("ChaincodeEvent", err))?;

    Ok(ChaincodeEndorsedAction {
        proposal_response_payload: ProposalResponsePayload {
            proposal_hash: hex(&response_payload.proposal_hash),
            extension: ChaincodeAction {
                results: decode_read_write_set(&chaincode_action.results)?,
                events: ChaincodeEvent {
                    chaincode_id: events.chaincode_id,
                    tx_id: events.tx_id,
                    event_name: events.event_name,
                    payload: events.payload.to_vec(),
                },
                response: chaincode_action
                    .response
                    .map(|response| Response {
                        status: response.status,
                        message: response.message,
                        payload: response.payload.to_vec(),
                    })
                    .unwrap_or_default(),
                chaincode_id: chaincode_action.chaincode_id.as_ref().map(decode_chaincode_id),
            },
        },
        endorsements: action
            .endorsements
            .iter()
            .map(|endorsement| Endorsement {
                endorser: decode_identity(&endorsement.endorser),
                signature: endorsement.signature.to_vec(),
            })
            .collect(),
    })
}

fn decode_chaincode_id(id: &peer::ChaincodeId) -> ChaincodeId {
    ChaincodeId {
        path: id.path.clone(),
        name: id.name.clone(),
        version: id.version.clone(),
    }
}

fn decode_block_metadata(metadata: &common::BlockMetadata) -> Result<BlockMetadata, Error> {
    let slot = |index: common::BlockMetadataIndex| metadata.metadata.get(index as usize);

    let signatures = match slot(common::BlockMetadataIndex::Signatures) {
        Some(bytes) => {
            let entry = common::Metadata::decode(bytes.as_ref())
                .map_err(|err| Error::Proto("Metadata", err))?;
            MetadataEntry {
                value: entry.value.to_vec(),
                signatures: decode_metadata_signatures(&entry.signatures)?,
            }
        }
        None => MetadataEntry::default(),
    };

    let last_config = match slot(common::BlockMetadataIndex::LastConfig) {
        Some(bytes) => {
            let entry = common::Metadata::decode(bytes.as_ref())
                .map_err(|err| Error::Proto("Metadata", err))?;
            let last_config = common::LastConfig::decode(entry.value.as_ref())
                .map_err(|err| Error::Proto("LastConfig", err))?;
            LastConfig {
                index: last_config.index.to_string(),
                signatures: decode_metadata_signatures(&entry.signatures)?,
            }
        }
        None => LastConfig::default(),
    };

    let transaction_filter = slot(common::BlockMetadataIndex::TransactionsFilter)
        .map(|bytes| bytes.to_vec())
        .unwrap_or_default();

    Ok(BlockMetadata {
        signatures,
        last_config,
        transaction_filter,
    })
}

fn decode_metadata_signatures(
    signatures: &[common::MetadataSignature],
) -> Result<Vec<MetadataSignature>, Error> {
    signatures
        .iter()
        .map(|signature| {
            Ok(MetadataSignature {
                signature_header: decode_signature_header(&signature.signature_header)?,
                signature: signature.signature.to_vec(),
            })
        })
        .collect()
}

fn decode_signature_header(bytes: &[u8]) -> Result<SignatureHeader, Error> {
    let header = common::SignatureHeader::decode(bytes)
        .map_err(|err| Error::Proto("SignatureHeader", err))?;
    Ok(SignatureHeader {
        creator: decode_identity(&header.creator),
        nonce: header.nonce.to_vec(),
    })
}

fn decode_channel_header(header: &common::ChannelHeader) -> ChannelHeader {
    ChannelHeader {
        r#type: header.r#type,
        type_string: header_type_name(header.r#type).to_string(),
        version: header.version,
        timestamp: header.timestamp.as_ref().map(render_timestamp),
        channel_id: header.channel_id.clone(),
        tx_id: header.tx_id.clone(),
        epoch: header.epoch.to_string(),
        extension: header.extension.to_vec(),
    }
}

fn render_timestamp(timestamp: &common::Timestamp) -> String {
    chrono::DateTime::from_timestamp(
        timestamp.seconds,
        timestamp.nanos.try_into().unwrap_or_default(),
    )
    .unwrap_or_default()
    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Name of a header type value, `UNKNOWN` for anything out of range.
pub fn header_type_name(header_type: i32) -> &'static str {
    match common::HeaderType::try_from(header_type) {
        Ok(common::HeaderType::Message) => "MESSAGE",
        Ok(common::HeaderType::Config) => "CONFIG",
        Ok(common::HeaderType::ConfigUpdate) => "CONFIG_UPDATE",
        Ok(common::HeaderType::EndorserTransaction) => "ENDORSER_TRANSACTION",
        Ok(common::HeaderType::OrdererTransaction) => "ORDERER_TRANSACTION",
        Ok(common::HeaderType::DeliverSeekInfo) => "DELIVER_SEEK_INFO",
        Ok(common::HeaderType::ChaincodePackage) => "CHAINCODE_PACKAGE",
        Err(_) => "UNKNOWN",
    }
}

/// Name of a transaction validation code, `UNKNOWN` for anything out of
/// range.
pub fn validation_code_name(code: i32) -> &'static str {
    match code {
        0 => "VALID",
        1 => "NIL_ENVELOPE",
        2 => "BAD_PAYLOAD",
        3 => "BAD_COMMON_HEADER",
        4 => "BAD_CREATOR_SIGNATURE",
        5 => "INVALID_ENDORSER_TRANSACTION",
        6 => "INVALID_CONFIG_TRANSACTION",
        7 => "UNSUPPORTED_TX_PAYLOAD",
        8 => "BAD_PROPOSAL_TXID",
        9 => "DUPLICATE_TXID",
        10 => "ENDORSEMENT_POLICY_FAILURE",
        11 => "MVCC_READ_CONFLICT",
        12 => "PHANTOM_READ_CONFLICT",
        13 => "UNKNOWN_TX_TYPE",
        14 => "TARGET_CHAIN_NOT_FOUND",
        15 => "MARSHAL_TX_ERROR",
        16 => "NIL_TXACTION",
        17 => "EXPIRED_CHAINCODE",
        18 => "CHAINCODE_VERSION_CONFLICT",
        19 => "BAD_HEADER_EXTENSION",
        20 => "BAD_CHANNEL_HEADER",
        21 => "BAD_RESPONSE_PAYLOAD",
        22 => "BAD_RWSET",
        23 => "ILLEGAL_WRITESET",
        24 => "INVALID_WRITESET",
        254 => "NOT_VALIDATED",
        255 => "INVALID_OTHER_REASON",
        _ => "UNKNOWN",
    }
}
