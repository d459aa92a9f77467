use krb_asn1::wrapper::{
    ApplicationTag, Asn1SequenceOf, ExplicitContextTag0, ExplicitContextTag1, ExplicitContextTag2, ExplicitContextTag3,
    ExplicitContextTag4, ExplicitContextTag5, ExplicitContextTag6, IntegerAsn1, Optional,
};
use serde::{Deserialize, Serialize};

use crate::constants::types::{AP_REQ_MSG_TYPE, AS_REP_MSG_TYPE, KERBEROS_VERSION, TGS_REP_MSG_TYPE};
use crate::data_types::{ApOptions, EncryptedData, PaData, PrincipalName, Realm, Ticket};
use crate::error::{Error, Result};

/// [KRB_KDC_REP Definition](https://www.rfc-editor.org/rfc/rfc4120#section-5.4.2)
/// ```not_rust
/// KDC-REP         ::= SEQUENCE {
///         pvno            [0] INTEGER (5),
///         msg-type        [1] INTEGER (11 -- AS -- | 13 -- TGS --),
///         padata          [2] SEQUENCE OF PA-DATA OPTIONAL
///                                 -- NOTE: not empty --,
///         crealm          [3] Realm,
///         cname           [4] PrincipalName,
///         ticket          [5] Ticket,
///         enc-part        [6] EncryptedData
///                                 -- EncASRepPart or EncTGSRepPart,
///                                 -- as appropriate
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdcRep {
    pub pvno: ExplicitContextTag0<IntegerAsn1>,
    pub msg_type: ExplicitContextTag1<IntegerAsn1>,
    #[serde(default)]
    pub padata: Optional<Option<ExplicitContextTag2<Asn1SequenceOf<PaData>>>>,
    pub crealm: ExplicitContextTag3<Realm>,
    pub cname: ExplicitContextTag4<PrincipalName>,
    pub ticket: ExplicitContextTag5<Ticket>,
    pub enc_part: ExplicitContextTag6<EncryptedData>,
}

/// ```not_rust
/// AS-REP          ::= [APPLICATION 11] KDC-REP
/// ```
pub type AsRep = ApplicationTag<KdcRep, AS_REP_MSG_TYPE>;

/// ```not_rust
/// TGS-REP         ::= [APPLICATION 13] KDC-REP
/// ```
pub type TgsRep = ApplicationTag<KdcRep, TGS_REP_MSG_TYPE>;

/// [KRB_AP_REQ Definition](https://www.rfc-editor.org/rfc/rfc4120#section-5.5.1)
/// ```not_rust
/// AP-REQ          ::= [APPLICATION 14] SEQUENCE {
///         pvno            [0] INTEGER (5),
///         msg-type        [1] INTEGER (14),
///         ap-options      [2] APOptions,
///         ticket          [3] Ticket,
///         authenticator   [4] EncryptedData -- Authenticator
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApReqInner {
    pub pvno: ExplicitContextTag0<IntegerAsn1>,
    pub msg_type: ExplicitContextTag1<IntegerAsn1>,
    pub ap_options: ExplicitContextTag2<ApOptions>,
    pub ticket: ExplicitContextTag3<Ticket>,
    pub authenticator: ExplicitContextTag4<EncryptedData>,
}

pub type ApReq = ApplicationTag<ApReqInner, AP_REQ_MSG_TYPE>;

impl ApReqInner {
    pub fn new(ap_options: ApOptions, ticket: Ticket, authenticator: EncryptedData) -> Self {
        Self {
            pvno: IntegerAsn1::from(KERBEROS_VERSION).into(),
            msg_type: IntegerAsn1::from(AP_REQ_MSG_TYPE).into(),
            ap_options: ap_options.into(),
            ticket: ticket.into(),
            authenticator: authenticator.into(),
        }
    }

    /// Checks the fixed `pvno` and `msg-type` fields
    pub fn check_header(&self) -> Result<()> {
        check_field("pvno", &self.pvno, KERBEROS_VERSION)?;
        check_field("msg-type", &self.msg_type, AP_REQ_MSG_TYPE)
    }
}

impl KdcRep {
    pub fn check_header(&self, msg_type: u8) -> Result<()> {
        check_field("pvno", &self.pvno, KERBEROS_VERSION)?;
        check_field("msg-type", &self.msg_type, msg_type)
    }
}

fn check_field(field: &'static str, value: &IntegerAsn1, expected: u8) -> Result<()> {
    match value.to_i64() {
        Some(actual) if actual == i64::from(expected) => Ok(()),
        actual => Err(Error::InvalidField {
            field,
            expected: i64::from(expected),
            actual: actual.unwrap_or(-1),
        }),
    }
}

/// DER-encodes any message or data type
pub fn encode<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(krb_asn1_der::to_vec(value)?)
}

/// Decodes a complete DER value; no byte may follow it
pub fn decode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    Ok(krb_asn1_der::from_bytes(bytes)?)
}

/// Decodes an AP-REQ and checks its fixed fields
pub fn decode_ap_req(bytes: &[u8]) -> Result<ApReq> {
    let ap_req: ApReq = decode(bytes)?;
    ap_req.0.check_header()?;
    Ok(ap_req)
}
