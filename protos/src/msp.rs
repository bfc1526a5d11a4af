//! Identities, principals, and MSP configuration (`msp/identities.proto`,
//! `msp/msp_principal.proto`, `msp/msp_config.proto`).

use bytes::Bytes;

/// An identity as it travels on the wire: the MSP it belongs to plus the
/// MSP-specific material (for the default X.509 provider, a PEM certificate).
#[derive(Clone, PartialEq, prost::Message)]
pub struct SerializedIdentity {
    #[prost(string, tag = "1")]
    pub mspid: String,
    #[prost(bytes = "bytes", tag = "2")]
    pub id_bytes: Bytes,
}

/// How the `principal` payload of an [`MspPrincipal`] is classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Classification {
    Role = 0,
    OrganizationUnit = 1,
    Identity = 2,
}

/// A principal condition inside a signature policy: `principal` is a
/// marshaled [`MspRole`], [`OrganizationUnit`], or [`SerializedIdentity`]
/// depending on the classification.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MspPrincipal {
    /// One of [`Classification`], kept as `int32`.
    #[prost(int32, tag = "1")]
    pub principal_classification: i32,
    #[prost(bytes = "bytes", tag = "2")]
    pub principal: Bytes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum MspRoleType {
    Member = 0,
    Admin = 1,
}

/// Membership of a given role within an MSP.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MspRole {
    #[prost(string, tag = "1")]
    pub msp_identifier: String,
    /// One of [`MspRoleType`], kept as `int32`.
    #[prost(int32, tag = "2")]
    pub role: i32,
}

/// Membership of an organizational unit under certificates chaining to
/// `certifiers_identifier`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct OrganizationUnit {
    #[prost(string, tag = "1")]
    pub msp_identifier: String,
    #[prost(string, tag = "2")]
    pub organizational_unit_identifier: String,
    /// Hash of the certificate chain trusted to certify this OU.
    #[prost(bytes = "bytes", tag = "3")]
    pub certifiers_identifier: Bytes,
}

/// An MSP configuration of some provider type; `config` is the marshaled
/// provider-specific payload (for type 0, a [`FabricMspConfig`]).
#[derive(Clone, PartialEq, prost::Message)]
pub struct MspConfig {
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(bytes = "bytes", tag = "2")]
    pub config: Bytes,
}

/// Configuration for the default (X.509) membership provider.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FabricMspConfig {
    /// MSP identifier, e.g. `Org1MSP`.
    #[prost(string, tag = "1")]
    pub name: String,
    /// Self-signed root CA certificates (PEM).
    #[prost(bytes = "bytes", repeated, tag = "2")]
    pub root_certs: Vec<Bytes>,
    /// Intermediate CA certificates (PEM).
    #[prost(bytes = "bytes", repeated, tag = "3")]
    pub intermediate_certs: Vec<Bytes>,
    /// Certificates of this MSP's administrators.
    #[prost(bytes = "bytes", repeated, tag = "4")]
    pub admins: Vec<Bytes>,
    /// Certificate revocation lists.
    #[prost(bytes = "bytes", repeated, tag = "5")]
    pub revocation_list: Vec<Bytes>,
    // Tag 6 (signing identity) and tag 8 (crypto config) are server-side
    // concerns this client never reads.
    #[prost(message, repeated, tag = "7")]
    pub organizational_unit_identifiers: Vec<FabricOuIdentifier>,
    /// Trusted roots for TLS server identities (PEM).
    #[prost(bytes = "bytes", repeated, tag = "9")]
    pub tls_root_certs: Vec<Bytes>,
    /// Intermediates for TLS server identities (PEM).
    #[prost(bytes = "bytes", repeated, tag = "10")]
    pub tls_intermediate_certs: Vec<Bytes>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FabricOuIdentifier {
    /// Certificate of the CA that certifies identities carrying this OU.
    #[prost(bytes = "bytes", tag = "1")]
    pub certificate: Bytes,
    #[prost(string, tag = "2")]
    pub organizational_unit_identifier: String,
}
