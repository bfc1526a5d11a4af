//! Serialized identities, MSP principals, and MSP configuration.

use crate::Error;
use prost::Message;
use serde::Serialize;
use tracing::{debug, warn};
use weft_protos::msp;

/// A decoded creator/endorser identity.
///
/// The serialized field names (`Mspid`, `IdBytes`) are a historical quirk of
/// the wire-adjacent JSON rendering and are preserved for compatibility with
/// existing consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Identity {
    #[serde(rename = "Mspid")]
    pub mspid: String,
    /// Certificate material (PEM) rendered as a string.
    #[serde(rename = "IdBytes")]
    pub id_bytes: String,
}

/// A decoded MSP principal condition from a signature policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MspPrincipal {
    /// Membership of a role within an MSP. Role values other than
    /// MEMBER/ADMIN decode with `role` absent.
    Role {
        msp_identifier: String,
        #[serde(rename = "Role")]
        role: Option<MspRole>,
    },
    /// Membership of an organizational unit.
    OrganizationUnit {
        msp_identifier: String,
        organizational_unit_identifier: String,
        certifiers_identifier: Vec<u8>,
    },
    /// A literal identity.
    Identity(Identity),
    /// A classification this decoder version does not understand; the
    /// payload is preserved undecoded.
    Unknown { classification: i32, principal: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MspRole {
    #[serde(rename = "MEMBER")]
    Member,
    #[serde(rename = "ADMIN")]
    Admin,
}

/// A decoded organization MSP definition from the channel configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Msp {
    /// MSP identifier, e.g. `Org1MSP`.
    pub id: String,
    pub root_certs: Vec<String>,
    pub intermediate_certs: Vec<String>,
    pub admins: Vec<String>,
    pub revocation_list: Vec<String>,
    pub organizational_unit_identifiers: Vec<OuIdentifier>,
    pub tls_root_certs: Vec<String>,
    pub tls_intermediate_certs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OuIdentifier {
    pub certificate: String,
    pub organizational_unit_identifier: String,
}

/// Decodes a serialized-identity envelope.
///
/// Never fails: identities are decoded on non-critical paths (metadata
/// signatures, debug rendering) as well as critical ones, and a malformed
/// identity must read as "no identity" rather than abort the surrounding
/// decode. Failures are logged and yield a default (empty) [`Identity`].
pub fn decode_identity(bytes: &[u8]) -> Identity {
    match msp::SerializedIdentity::decode(bytes) {
        Ok(identity) => Identity {
            mspid: identity.mspid,
            id_bytes: String::from_utf8_lossy(&identity.id_bytes).into_owned(),
        },
        Err(err) => {
            warn!(?err, "failed to decode serialized identity");
            Identity::default()
        }
    }
}

/// Decodes an MSP principal by its classification.
pub fn decode_msp_principal(principal: &msp::MspPrincipal) -> Result<MspPrincipal, Error> {
    match msp::Classification::try_from(principal.principal_classification) {
        Ok(msp::Classification::Role) => {
            let role = msp::MspRole::decode(principal.principal.as_ref())
                .map_err(|err| Error::Proto("MspRole", err))?;
            Ok(MspPrincipal::Role {
                msp_identifier: role.msp_identifier,
                role: match msp::MspRoleType::try_from(role.role) {
                    Ok(msp::MspRoleType::Member) => Some(MspRole::Member),
                    Ok(msp::MspRoleType::Admin) => Some(MspRole::Admin),
                    Err(_) => {
                        debug!(role = role.role, "unrecognized MSP role value");
                        None
                    }
                },
            })
        }
        Ok(msp::Classification::OrganizationUnit) => {
            let unit = msp::OrganizationUnit::decode(principal.principal.as_ref())
                .map_err(|err| Error::Proto("OrganizationUnit", err))?;
            Ok(MspPrincipal::OrganizationUnit {
                msp_identifier: unit.msp_identifier,
                organizational_unit_identifier: unit.organizational_unit_identifier,
                certifiers_identifier: unit.certifiers_identifier.to_vec(),
            })
        }
        Ok(msp::Classification::Identity) => {
            Ok(MspPrincipal::Identity(decode_identity(&principal.principal)))
        }
        Err(_) => {
            debug!(
                classification = principal.principal_classification,
                "unrecognized principal classification, leaving undecoded"
            );
            Ok(MspPrincipal::Unknown {
                classification: principal.principal_classification,
                principal: principal.principal.to_vec(),
            })
        }
    }
}

/// Decodes an MSP configuration value into an organization definition.
pub fn decode_msp_config(config: &msp::MspConfig) -> Result<Msp, Error> {
    let fabric = msp::FabricMspConfig::decode(config.config.as_ref())
        .map_err(|err| Error::Proto("FabricMspConfig", err))?;
    let pem = |certs: &[bytes::Bytes]| {
        certs
            .iter()
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect()
    };
    Ok(Msp {
        id: fabric.name,
        root_certs: pem(&fabric.root_certs),
        intermediate_certs: pem(&fabric.intermediate_certs),
        admins: pem(&fabric.admins),
        revocation_list: pem(&fabric.revocation_list),
        organizational_unit_identifiers: fabric
            .organizational_unit_identifiers
            .iter()
            .map(|ou| OuIdentifier {
                certificate: String::from_utf8_lossy(&ou.certificate).into_owned(),
                organizational_unit_identifier: ou.organizational_unit_identifier.clone(),
            })
            .collect(),
        tls_root_certs: pem(&fabric.tls_root_certs),
        tls_intermediate_certs: pem(&fabric.tls_intermediate_certs),
    })
}
