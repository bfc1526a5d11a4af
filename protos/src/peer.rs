//! Transactions, proposals, endorsements, and chaincode
//! (`peer/transaction.proto`, `peer/proposal.proto`,
//! `peer/proposal_response.proto`, `peer/chaincode.proto`,
//! `peer/chaincode_event.proto`, `peer/configuration.proto`).

use crate::common::Envelope;
use bytes::Bytes;
use std::collections::HashMap;

/// A transaction as returned by ledger queries: the original envelope plus
/// the validation code assigned by the committing peer.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ProcessedTransaction {
    #[prost(message, optional, tag = "1")]
    pub transaction_envelope: Option<Envelope>,
    /// A `TxValidationCode` value.
    #[prost(int32, tag = "2")]
    pub validation_code: i32,
}

/// The payload of an ENDORSER_TRANSACTION envelope: one or more independently
/// structured actions.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Transaction {
    #[prost(message, repeated, tag = "1")]
    pub actions: Vec<TransactionAction>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactionAction {
    /// Marshaled `common::SignatureHeader` of the action's proposer.
    #[prost(bytes = "bytes", tag = "1")]
    pub header: Bytes,
    /// Marshaled [`ChaincodeActionPayload`].
    #[prost(bytes = "bytes", tag = "2")]
    pub payload: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeActionPayload {
    /// Marshaled [`ChaincodeProposalPayload`], with the transient map
    /// stripped.
    #[prost(bytes = "bytes", tag = "1")]
    pub chaincode_proposal_payload: Bytes,
    #[prost(message, optional, tag = "2")]
    pub action: Option<ChaincodeEndorsedAction>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeEndorsedAction {
    /// Marshaled [`ProposalResponsePayload`], the bytes every endorser
    /// signed.
    #[prost(bytes = "bytes", tag = "1")]
    pub proposal_response_payload: Bytes,
    #[prost(message, repeated, tag = "2")]
    pub endorsements: Vec<Endorsement>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Endorsement {
    /// Marshaled `msp::SerializedIdentity` of the endorsing peer.
    #[prost(bytes = "bytes", tag = "1")]
    pub endorser: Bytes,
    /// Signature over the proposal response payload concatenated with the
    /// endorser's identity.
    #[prost(bytes = "bytes", tag = "2")]
    pub signature: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProposalResponsePayload {
    /// Hash of the proposal that triggered this response.
    #[prost(bytes = "bytes", tag = "1")]
    pub proposal_hash: Bytes,
    /// Marshaled [`ChaincodeAction`].
    #[prost(bytes = "bytes", tag = "2")]
    pub extension: Bytes,
}

/// The effects of a chaincode execution, as recorded by the endorser.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeAction {
    /// Marshaled `rwset::TxReadWriteSet`.
    #[prost(bytes = "bytes", tag = "1")]
    pub results: Bytes,
    /// Marshaled [`ChaincodeEvent`].
    #[prost(bytes = "bytes", tag = "2")]
    pub events: Bytes,
    #[prost(message, optional, tag = "3")]
    pub response: Option<Response>,
    #[prost(message, optional, tag = "4")]
    pub chaincode_id: Option<ChaincodeId>,
}

/// A chaincode's application-level response, HTTP-status-like.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Response {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(bytes = "bytes", tag = "3")]
    pub payload: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeEvent {
    #[prost(string, tag = "1")]
    pub chaincode_id: String,
    #[prost(string, tag = "2")]
    pub tx_id: String,
    #[prost(string, tag = "3")]
    pub event_name: String,
    #[prost(bytes = "bytes", tag = "4")]
    pub payload: Bytes,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeProposalPayload {
    /// Marshaled [`ChaincodeInvocationSpec`].
    #[prost(bytes = "bytes", tag = "1")]
    pub input: Bytes,
    /// Ephemeral inputs withheld from the ledger; absent in committed
    /// transactions.
    #[prost(map = "string, bytes", tag = "2")]
    pub transient_map: HashMap<String, Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeInvocationSpec {
    #[prost(message, optional, tag = "1")]
    pub chaincode_spec: Option<ChaincodeSpec>,
}

/// Chaincode runtime types for [`ChaincodeSpec::type`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ChaincodeSpecType {
    Undefined = 0,
    Golang = 1,
    Node = 2,
    Car = 3,
    Java = 4,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeSpec {
    /// One of [`ChaincodeSpecType`].
    #[prost(enumeration = "ChaincodeSpecType", tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub chaincode_id: Option<ChaincodeId>,
    #[prost(message, optional, tag = "3")]
    pub input: Option<ChaincodeInput>,
    #[prost(int32, tag = "4")]
    pub timeout: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeId {
    /// Install path; unused after instantiation.
    #[prost(string, tag = "1")]
    pub path: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub version: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeInput {
    /// Invocation arguments; by convention the first is the function name.
    #[prost(bytes = "bytes", repeated, tag = "1")]
    pub args: Vec<Bytes>,
    #[prost(map = "string, bytes", tag = "2")]
    pub decorations: HashMap<String, Vec<u8>>,
}

/// `AnchorPeers` channel configuration value (per-organization).
#[derive(Clone, PartialEq, prost::Message)]
pub struct AnchorPeers {
    #[prost(message, repeated, tag = "1")]
    pub anchor_peers: Vec<AnchorPeer>,
}

/// A peer other organizations use for cross-org gossip bootstrapping.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AnchorPeer {
    #[prost(string, tag = "1")]
    pub host: String,
    #[prost(int32, tag = "2")]
    pub port: i32,
}
