//! Signature and implicit-meta policies (`common/policies.proto`).

use bytes::Bytes;

/// Recognized policy payload types for [`Policy::type`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum PolicyType {
    Unknown = 0,
    Signature = 1,
    Msp = 2,
    ImplicitMeta = 3,
}

/// A policy of some type; `value` is the marshaled payload for that type.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Policy {
    /// One of [`PolicyType`], kept as `int32`.
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(bytes = "bytes", tag = "2")]
    pub value: Bytes,
}

/// A signature policy: a recursive rule tree over a flat list of principals.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SignaturePolicyEnvelope {
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(message, optional, tag = "2")]
    pub rule: Option<SignaturePolicy>,
    /// Principals referenced by `signed_by` indices in the rule tree.
    #[prost(message, repeated, tag = "3")]
    pub identities: Vec<crate::msp::MspPrincipal>,
}

/// One node of the rule tree: either a leaf naming a principal by index, or
/// an n-out-of combinator over child rules.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SignaturePolicy {
    #[prost(oneof = "signature_policy::Type", tags = "1, 2")]
    pub r#type: Option<signature_policy::Type>,
}

pub mod signature_policy {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Type {
        /// Index into [`super::SignaturePolicyEnvelope::identities`].
        #[prost(int32, tag = "1")]
        SignedBy(i32),
        #[prost(message, tag = "2")]
        NOutOf(super::NOutOf),
    }
}

/// Satisfied when at least `n` of `rules` are satisfied.
#[derive(Clone, PartialEq, prost::Message)]
pub struct NOutOf {
    #[prost(int32, tag = "1")]
    pub n: i32,
    #[prost(message, repeated, tag = "2")]
    pub rules: Vec<SignaturePolicy>,
}

/// Threshold rules for [`ImplicitMetaPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ImplicitMetaRule {
    Any = 0,
    All = 1,
    Majority = 2,
}

/// A policy satisfied by evaluating `sub_policy` in each immediate child
/// group and applying `rule` to the outcomes.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ImplicitMetaPolicy {
    #[prost(string, tag = "1")]
    pub sub_policy: String,
    /// One of [`ImplicitMetaRule`].
    #[prost(enumeration = "ImplicitMetaRule", tag = "2")]
    pub rule: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn signature_policy_round_trip_preserves_recursion() {
        let signed_by = |i| SignaturePolicy {
            r#type: Some(signature_policy::Type::SignedBy(i)),
        };
        let rule = SignaturePolicy {
            r#type: Some(signature_policy::Type::NOutOf(NOutOf {
                n: 2,
                rules: vec![
                    SignaturePolicy {
                        r#type: Some(signature_policy::Type::NOutOf(NOutOf {
                            n: 1,
                            rules: vec![signed_by(0), signed_by(1)],
                        })),
                    },
                    signed_by(2),
                ],
            })),
        };
        let decoded = SignaturePolicy::decode(rule.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, rule);
    }

    #[test]
    fn policy_value_is_opaque() {
        let inner = ImplicitMetaPolicy {
            sub_policy: "Writers".into(),
            rule: ImplicitMetaRule::Majority as i32,
        };
        let policy = Policy {
            r#type: PolicyType::ImplicitMeta as i32,
            value: inner.encode_to_vec().into(),
        };
        let decoded = Policy::decode(policy.encode_to_vec().as_slice()).unwrap();
        let inner_decoded = ImplicitMetaPolicy::decode(decoded.value.clone()).unwrap();
        assert_eq!(inner_decoded, inner);
    }
}
