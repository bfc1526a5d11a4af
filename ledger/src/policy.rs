//! Signature-policy and implicit-meta-policy decoding.
//!
//! A policy that cannot be understood at all must not be silently treated as
//! permissive or restrictive, so this is the one decoder where an unknown
//! type tag is fatal. The MSP policy type is the exception: it is recognized
//! by the schema but has never been implemented network-wide, so it decodes
//! to "absent" with a warning.

use crate::{
    identity::{decode_msp_principal, MspPrincipal},
    Error,
};
use prost::Message;
use serde::Serialize;
use tracing::{debug, warn};
use weft_protos::policies;

/// A decoded channel policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Policy {
    Signature(SignaturePolicyEnvelope),
    ImplicitMeta(ImplicitMetaPolicy),
}

/// A signature policy: a recursive rule tree over a flat principal list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignaturePolicyEnvelope {
    pub version: i32,
    pub rule: SignaturePolicy,
    pub identities: Vec<MspPrincipal>,
}

/// One node of a signature-policy rule tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SignaturePolicy {
    /// Index into the sibling [`SignaturePolicyEnvelope::identities`] list.
    #[serde(rename = "signed_by")]
    SignedBy(i32),
    /// Satisfied when at least `n` of `rules` are satisfied.
    #[serde(rename = "n_out_of")]
    NOutOf {
        n: i32,
        rules: Vec<SignaturePolicy>,
    },
}

/// A policy evaluated as a threshold over a named sub-policy of each
/// immediate child group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImplicitMetaPolicy {
    pub sub_policy: String,
    /// Absent when the wire carries a rule value this version does not
    /// recognize.
    pub rule: Option<ImplicitMetaRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImplicitMetaRule {
    #[serde(rename = "ANY")]
    Any,
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "MAJORITY")]
    Majority,
}

/// Decodes a policy by its type tag.
///
/// Returns `Ok(None)` for the recognized-but-unimplemented MSP type and
/// `Err` for type values this decoder cannot classify at all.
pub fn decode_policy(policy: &policies::Policy) -> Result<Option<Policy>, Error> {
    match policies::PolicyType::try_from(policy.r#type) {
        Ok(policies::PolicyType::Signature) => Ok(Some(Policy::Signature(
            decode_signature_policy_envelope(&policy.value)?,
        ))),
        Ok(policies::PolicyType::ImplicitMeta) => Ok(Some(Policy::ImplicitMeta(
            decode_implicit_meta_policy(&policy.value)?,
        ))),
        Ok(policies::PolicyType::Msp) => {
            warn!("MSP policies are not implemented, skipping");
            Ok(None)
        }
        Ok(policies::PolicyType::Unknown) | Err(_) => {
            Err(Error::UnknownPolicyType(policy.r#type))
        }
    }
}

/// Decodes a signature-policy envelope: version, recursive rule tree, and
/// the principal list the tree's `signed_by` leaves index into.
///
/// Indices are validated against the principal list here, where the sibling
/// array is in scope; a rule referencing a nonexistent principal cannot be
/// evaluated correctly by any caller, so it fails the decode.
pub fn decode_signature_policy_envelope(
    bytes: &[u8],
) -> Result<SignaturePolicyEnvelope, Error> {
    let envelope = policies::SignaturePolicyEnvelope::decode(bytes)
        .map_err(|err| Error::Proto("SignaturePolicyEnvelope", err))?;

    let rule = envelope
        .rule
        .as_ref()
        .ok_or(Error::MissingField("SignaturePolicyEnvelope.rule"))?;
    let rule = decode_signature_policy(rule)?;

    let identities = envelope
        .identities
        .iter()
        .map(decode_msp_principal)
        .collect::<Result<Vec<_>, _>>()?;

    validate_indices(&rule, identities.len())?;

    Ok(SignaturePolicyEnvelope {
        version: envelope.version,
        rule,
        identities,
    })
}

/// Decodes one rule node, recursing through `n_out_of` combinators. Indices
/// are preserved verbatim; bounds are the envelope decoder's concern.
fn decode_signature_policy(
    policy: &policies::SignaturePolicy,
) -> Result<SignaturePolicy, Error> {
    match &policy.r#type {
        Some(policies::signature_policy::Type::SignedBy(index)) => {
            Ok(SignaturePolicy::SignedBy(*index))
        }
        Some(policies::signature_policy::Type::NOutOf(n_out_of)) => {
            Ok(SignaturePolicy::NOutOf {
                n: n_out_of.n,
                rules: n_out_of
                    .rules
                    .iter()
                    .map(decode_signature_policy)
                    .collect::<Result<Vec<_>, _>>()?,
            })
        }
        None => Err(Error::EmptySignaturePolicy),
    }
}

fn validate_indices(rule: &SignaturePolicy, identities: usize) -> Result<(), Error> {
    match rule {
        SignaturePolicy::SignedBy(index) => {
            if *index < 0 || *index as usize >= identities {
                return Err(Error::SignedByOutOfRange {
                    index: *index,
                    identities,
                });
            }
            Ok(())
        }
        SignaturePolicy::NOutOf { rules, .. } => {
            rules.iter().try_for_each(|rule| validate_indices(rule, identities))
        }
    }
}

fn decode_implicit_meta_policy(bytes: &[u8]) -> Result<ImplicitMetaPolicy, Error> {
    let policy = policies::ImplicitMetaPolicy::decode(bytes)
        .map_err(|err| Error::Proto("ImplicitMetaPolicy", err))?;
    Ok(ImplicitMetaPolicy {
        sub_policy: policy.sub_policy,
        rule: match policies::ImplicitMetaRule::try_from(policy.rule) {
            Ok(policies::ImplicitMetaRule::Any) => Some(ImplicitMetaRule::Any),
            Ok(policies::ImplicitMetaRule::All) => Some(ImplicitMetaRule::All),
            Ok(policies::ImplicitMetaRule::Majority) => Some(ImplicitMetaRule::Majority),
            Err(_) => {
                debug!(rule = policy.rule, "unrecognized implicit meta rule");
                None
            }
        },
    })
}
