use krb_asn1::date::GeneralizedTime;
use krb_asn1::wrapper::{GeneralizedTimeAsn1, IntegerAsn1, Optional};
use rand::rngs::OsRng;
use rand::RngCore;
use time::OffsetDateTime;

use crate::constants::key_usages::AP_REQ_AUTHENTICATOR;
use crate::constants::types::AUTHENTICATOR_VERSION;
use crate::data_types::{kerberos_flags, Authenticator, AuthenticatorInner, EncryptedData};
use crate::error::Result;
use crate::key::KeyMaterial;
use crate::messages::{encode, ApReq, ApReqInner, KdcRep};

/// Builds an AP-REQ presenting the ticket of `kdc_rep`
///
/// A new authenticator is generated on every call, stamped with the current time and a random
/// sequence number, then encrypted under `session_key` with the AP-REQ authenticator key usage.
pub fn build_ap_req(kdc_rep: &KdcRep, session_key: &KeyMaterial, ap_options: u32) -> Result<ApReq> {
    let seq_number = OsRng.next_u32() & 0x7FFF_FFFF;

    build_ap_req_at(kdc_rep, session_key, ap_options, OffsetDateTime::now_utc(), seq_number)
}

pub fn build_ap_req_at(
    kdc_rep: &KdcRep,
    session_key: &KeyMaterial,
    ap_options: u32,
    now: OffsetDateTime,
    seq_number: u32,
) -> Result<ApReq> {
    let ticket = &kdc_rep.ticket.0;
    let ctime = GeneralizedTime::try_from(now)?;

    let authenticator: Authenticator = AuthenticatorInner {
        authenticator_vno: IntegerAsn1::from(AUTHENTICATOR_VERSION).into(),
        crealm: ticket.0.realm.clone(),
        cname: kdc_rep.cname.0.clone().into(),
        cksum: Optional(None),
        cusec: IntegerAsn1::from(now.microsecond()).into(),
        ctime: GeneralizedTimeAsn1::from(ctime).into(),
        subkey: Optional(None),
        seq_number: Optional(Some(IntegerAsn1::from(seq_number).into())),
        authorization_data: Optional(None),
    }
    .into();

    log::debug!(
        "building AP-REQ for {}@{} (seq-number {})",
        kdc_rep.cname.components().collect::<Vec<_>>().join("/"),
        ticket.0.realm.0 .0,
        seq_number
    );

    let encoded = encode(&authenticator)?;
    let encrypted = EncryptedData::encrypt(&encoded, session_key, AP_REQ_AUTHENTICATOR, None)?;

    Ok(ApReqInner::new(kerberos_flags(ap_options), ticket.clone(), encrypted).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ap_options::MUTUAL_REQUIRED;
    use crate::constants::types::{AS_REP_MSG_TYPE, KERBEROS_VERSION, NT_PRINCIPAL, NT_SRV_INST};
    use crate::crypto::CipherSuite;
    use crate::error::Error;
    use krb_asn1::date::YearOutOfRange;
    use crate::data_types::{kerberos_flags_value, PrincipalName, Realm, Ticket, TicketInner};
    use crate::messages::{decode, decode_ap_req};
    use proptest::prelude::*;
    use time::macros::datetime;

    fn as_rep(user: &str) -> KdcRep {
        KdcRep {
            pvno: IntegerAsn1::from(KERBEROS_VERSION).into(),
            msg_type: IntegerAsn1::from(AS_REP_MSG_TYPE).into(),
            padata: Optional(None),
            crealm: Realm::from("EXAMPLE.COM").into(),
            cname: PrincipalName::new(NT_PRINCIPAL, &[user]).into(),
            ticket: Ticket::from(TicketInner {
                tkt_vno: IntegerAsn1::from(KERBEROS_VERSION).into(),
                realm: Realm::from("EXAMPLE.COM").into(),
                sname: PrincipalName::new(NT_SRV_INST, &["krbtgt", "EXAMPLE.COM"]).into(),
                enc_part: EncryptedData::new(CipherSuite::Aes256CtsHmacSha196, Some(2), vec![0x5A; 64]).into(),
            })
            .into(),
            enc_part: EncryptedData::new(CipherSuite::Rc4HmacMd5, None, vec![0xA5; 48]).into(),
        }
    }

    fn session_key() -> KeyMaterial {
        KeyMaterial::from_key(CipherSuite::Rc4HmacMd5, vec![0x11; 16]).unwrap()
    }

    fn open(ap_req: &ApReq, key: &KeyMaterial) -> AuthenticatorInner {
        let plain = ap_req.0.authenticator.decrypt(key, AP_REQ_AUTHENTICATOR).unwrap();
        decode::<Authenticator>(&plain).unwrap().0
    }

    #[test]
    fn authenticator_fields() {
        let rep = as_rep("alice");
        let key = session_key();
        let now = datetime!(2024-05-06 07:08:09.123456 UTC);

        let ap_req = build_ap_req_at(&rep, &key, MUTUAL_REQUIRED, now, 42).unwrap();

        assert_eq!(kerberos_flags_value(&ap_req.0.ap_options), MUTUAL_REQUIRED);
        assert_eq!(ap_req.0.ticket.0, rep.ticket.0);
        assert_eq!(ap_req.0.authenticator.kvno(), None);
        assert_eq!(ap_req.0.authenticator.cipher_suite().unwrap(), CipherSuite::Rc4HmacMd5);

        let authenticator = open(&ap_req, &key);
        assert_eq!(authenticator.authenticator_vno.to_u32(), Some(5));
        assert_eq!(authenticator.crealm.0 .0, "EXAMPLE.COM");
        assert_eq!(authenticator.cname.components().collect::<Vec<_>>(), ["alice"]);
        assert_eq!(authenticator.cusec.to_u32(), Some(123_456));
        assert_eq!(authenticator.ctime.0, GeneralizedTime::new(2024, 5, 6, 7, 8, 9).unwrap());
        assert_eq!(authenticator.seq_number.0.as_ref().and_then(|n| n.to_u32()), Some(42));
        assert!(authenticator.subkey.0.is_none());
        assert!(authenticator.cksum.0.is_none());
    }

    #[test]
    fn clock_outside_four_digit_years() {
        let now = time::Date::from_calendar_date(-1, time::Month::June, 1)
            .unwrap()
            .midnight()
            .assume_utc();

        let err = build_ap_req_at(&as_rep("alice"), &session_key(), 0, now, 1).unwrap_err();

        assert!(matches!(err, Error::InvalidTime(YearOutOfRange(-1))), "{:?}", err);
    }

    #[test]
    fn encoded_ap_req_decodes() {
        let ap_req = build_ap_req(&as_rep("bob"), &session_key(), 0).unwrap();

        let encoded = encode(&ap_req).unwrap();
        assert_eq!(encoded[0], 0x6E);

        let decoded = decode_ap_req(&encoded).unwrap();
        assert_eq!(decoded, ap_req);
    }

    #[test]
    fn authenticator_is_fresh_on_every_call() {
        let rep = as_rep("alice");
        let key = session_key();

        let first = build_ap_req(&rep, &key, 0).unwrap();
        let second = build_ap_req(&rep, &key, 0).unwrap();

        assert_ne!(first.0.authenticator.cipher(), second.0.authenticator.cipher());

        let seq_number = open(&first, &key).seq_number.0.and_then(|n| n.to_u32()).unwrap();
        assert!(seq_number <= 0x7FFF_FFFF);
    }

    #[test]
    fn wrong_session_key() {
        let ap_req = build_ap_req(&as_rep("alice"), &session_key(), 0).unwrap();
        let other = KeyMaterial::from_key(CipherSuite::Rc4HmacMd5, vec![0x12; 16]).unwrap();

        let err = ap_req.0.authenticator.decrypt(&other, AP_REQ_AUTHENTICATOR).unwrap_err();

        assert!(err.is_integrity_error());
    }

    proptest! {
        #[test]
        fn any_user_and_sequence_number(user in "[a-z]{1,20}", seq_number in 0..=0x7FFF_FFFFu32) {
            let key = KeyMaterial::from_key(CipherSuite::Aes128CtsHmacSha196, vec![0x22; 16]).unwrap();
            let now = datetime!(2030-01-01 00:00:00 UTC);

            let ap_req = build_ap_req_at(&as_rep(&user), &key, 0, now, seq_number).unwrap();
            let authenticator = open(&ap_req, &key);

            prop_assert_eq!(authenticator.cname.components().collect::<Vec<_>>(), vec![user.as_str()]);
            prop_assert_eq!(authenticator.seq_number.0.and_then(|n| n.to_u32()), Some(seq_number));
        }
    }
}
