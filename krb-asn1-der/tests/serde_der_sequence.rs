use krb_asn1::wrapper::{
    Asn1SequenceOf, ExplicitContextTag0, ExplicitContextTag1, ExplicitContextTag2, GeneralStringAsn1, IntegerAsn1,
    OctetStringAsn1, Optional,
};
use krb_asn1_der::{from_bytes, to_vec, Asn1DerError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
struct TestStruct {
    number: u8,
    #[serde(with = "serde_bytes")]
    vec: Vec<u8>,
    tuple: (usize, ()),
}

/// Same shape as a Kerberos `EncryptedData`
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
struct Envelope {
    etype: ExplicitContextTag0<IntegerAsn1>,
    #[serde(default)]
    kvno: Optional<Option<ExplicitContextTag1<IntegerAsn1>>>,
    cipher: ExplicitContextTag2<OctetStringAsn1>,
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq)]
struct Names {
    names: ExplicitContextTag0<Asn1SequenceOf<GeneralStringAsn1>>,
}

#[test]
fn test() {
    // Nested tuple
    let plain = (7u8, "Testolope".to_string(), (4usize, ()));
    let der = b"\x30\x15\x02\x01\x07\x0c\x09\x54\x65\x73\x74\x6f\x6c\x6f\x70\x65\x30\x05\x02\x01\x04\x05\x00";

    let encoded = to_vec(&plain).unwrap();
    assert_eq!(encoded, der.as_ref());

    let decoded: (u8, String, (usize, ())) = from_bytes(&encoded).unwrap();
    assert_eq!(decoded, plain);

    // Test struct
    let plain = TestStruct {
        number: 7,
        vec: b"Testolope".to_vec(),
        tuple: (4, ()),
    };
    let der = b"\x30\x15\x02\x01\x07\x04\x09\x54\x65\x73\x74\x6f\x6c\x6f\x70\x65\x30\x05\x02\x01\x04\x05\x00";

    let encoded = to_vec(&plain).unwrap();
    assert_eq!(encoded, der.as_ref());

    let decoded: TestStruct = from_bytes(&encoded).unwrap();
    assert_eq!(decoded, plain);
}

#[rstest]
#[case::without_kvno(None, "300da003020117a2060404deadbeef")]
#[case::with_kvno(Some(2), "3012a003020117a103020102a2060404deadbeef")]
fn envelope(#[case] kvno: Option<u32>, #[case] expected: &str) {
    let plain = Envelope {
        etype: IntegerAsn1::from(23u32).into(),
        kvno: Optional(kvno.map(|kvno| IntegerAsn1::from(kvno).into())),
        cipher: OctetStringAsn1(vec![0xDE, 0xAD, 0xBE, 0xEF]).into(),
    };

    let encoded = to_vec(&plain).unwrap();
    assert_eq!(hex::encode(&encoded), expected);

    let decoded: Envelope = from_bytes(&encoded).unwrap();
    assert_eq!(decoded, plain);
}

#[test]
fn sequence_of_general_strings() {
    let plain = Names {
        names: Asn1SequenceOf(vec!["krbtgt".into(), "EXAMPLE.COM".into()]).into(),
    };
    let der = hex::decode("3019a01730151b066b72627467741b0b4558414d504c452e434f4d").unwrap();

    let encoded = to_vec(&plain).unwrap();
    assert_eq!(encoded, der);

    let decoded: Names = from_bytes(&der).unwrap();
    assert_eq!(decoded, plain);
}

#[test]
fn test_err() {
    // Invalid tag
    let der = b"\xFF\x15\x02\x01\x07\x04\x09\x54\x65\x73\x74\x6f\x6c\x6f\x70\x65\x30\x05\x02\x01\x04\x05\x00";
    match from_bytes::<TestStruct>(der) {
        Err(Asn1DerError::InvalidData) => (),
        result => panic!("invalid tag => invalid result: {:?}", result),
    }

    // Truncated data
    let der = b"\x30\x15\x02\x01\x07\x04\x09\x54\x65\x73\x74\x6f\x6c\x6f\x70\x65\x30\x05\x02\x01\x04\x05";
    match from_bytes::<TestStruct>(der) {
        Err(Asn1DerError::TruncatedData) => (),
        result => panic!("truncated data => invalid result: {:?}", result),
    }

    // Trailing byte after the top-level value
    let der = b"\x30\x15\x02\x01\x07\x04\x09\x54\x65\x73\x74\x6f\x6c\x6f\x70\x65\x30\x05\x02\x01\x04\x05\x00\x00";
    match from_bytes::<TestStruct>(der) {
        Err(Asn1DerError::TrailingData) => (),
        result => panic!("trailing data => invalid result: {:?}", result),
    }
}

#[rstest]
#[case::indefinite_length("3080a003020117a2060404deadbeef0000")]
#[case::long_form_short_length("30810da003020117a2060404deadbeef")]
#[case::non_minimal_integer("300ea00402020017a2060404deadbeef")]
#[case::wrong_context_tag("300da103020117a2060404deadbeef")]
#[case::missing_cipher("3005a003020117")]
fn malformed_envelope(#[case] der: &str) {
    let der = hex::decode(der).unwrap();
    let result = from_bytes::<Envelope>(&der);
    assert!(result.is_err(), "{:?}", result);
}

#[test]
fn integer_overflow_is_unsupported() {
    let der = b"\x02\x02\x01\x00";
    match from_bytes::<u8>(der) {
        Err(Asn1DerError::UnsupportedValue) => (),
        result => panic!("overflow => invalid result: {:?}", result),
    }
    assert_eq!(from_bytes::<u16>(der).unwrap(), 256);
}
