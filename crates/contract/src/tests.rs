use crate::*;
use parcel::Decoder;
use parcel::Encoder;

// ============================================================================
//  FIXTURES
// ============================================================================

static STRING: Kind = Kind::String;
static INT32: Kind = Kind::Int32;
static PAIR: RecordSchema = RecordSchema::new("Pair", &[
    Field::new("id", Kind::Int32),
    Field::new("label", Kind::String),
]);
static PAIR_KIND: Kind = Kind::Record(&PAIR);

static ECHO_PARAMS: &[Param] = &[
    Param::new("id", Kind::Int32),
    Param::new("label", Kind::String),
];

static OPS: &[OperationDescriptor] = &[
    OperationDescriptor {
        name: "names",
        code: FIRST_CALL_TRANSACTION,
        params: &[Param::new("owner", Kind::Int32)],
        ret: Kind::Sequence { item: &STRING, max: 3 },
        failures: &[FailureKind::Security],
    },
    OperationDescriptor {
        name: "find",
        code: FIRST_CALL_TRANSACTION + 1,
        params: ECHO_PARAMS,
        ret: Kind::Nullable(&PAIR_KIND),
        failures: &[FailureKind::Security, FailureKind::IllegalArgument],
    },
    OperationDescriptor {
        name: "reset",
        code: FIRST_CALL_TRANSACTION + 2,
        params: &[],
        ret: Kind::Void,
        failures: &[],
    },
];

static TEST_CONTRACT: Contract = Contract {
    descriptor: "test.IThing",
    version: 1,
    operations: OPS,
};

const _: () = assert!(TEST_CONTRACT.has_unique_codes() && TEST_CONTRACT.codes_in_range());

fn op(name: &str) -> &'static OperationDescriptor {
    TEST_CONTRACT.by_name(name).expect("fixture operation")
}

fn encode(value: &Value, kind: &Kind) -> Result<Vec<u8>> {
    let mut enc = Encoder::new();
    encode_value(&mut enc, value, kind)?;
    Ok(enc.into_bytes()?)
}

fn roundtrip(value: Value, kind: &Kind) {
    let bytes = encode(&value, kind).expect("encode");
    let mut dec = Decoder::new(&bytes);
    let decoded = decode_value(&mut dec, kind).expect("decode");
    dec.finish().expect("fully consumed");
    assert_eq!(value, decoded);
}

fn pair(id: i32, label: &str) -> Value {
    Value::Record(vec![Value::Int32(id), label.into()])
}

// ============================================================================
//  DESCRIPTORS
// ============================================================================

#[test]
fn test_lookup_by_code_and_name() {
    assert_eq!(TEST_CONTRACT.lookup(FIRST_CALL_TRANSACTION + 1).map(|o| o.name), Some("find"));
    assert_eq!(TEST_CONTRACT.by_name("reset").map(|o| o.code), Some(FIRST_CALL_TRANSACTION + 2));
    assert!(TEST_CONTRACT.lookup(99).is_none());
    assert_eq!(TEST_CONTRACT.require(99).unwrap_err().kind(), ErrorKind::UnknownOperation);
    assert!(TEST_CONTRACT.validate().is_ok());
}

#[test]
fn test_duplicate_codes_rejected() {
    static DUPES: &[OperationDescriptor] = &[
        OperationDescriptor { name: "a", code: 7, params: &[], ret: Kind::Void, failures: &[] },
        OperationDescriptor { name: "b", code: 7, params: &[], ret: Kind::Void, failures: &[] },
    ];
    let contract = Contract { descriptor: "dupes", version: 1, operations: DUPES };
    assert!(!contract.has_unique_codes());
    assert_eq!(
        contract.validate(),
        Err(Error::DuplicateCode { code: 7, first: "a", second: "b" })
    );
}

#[test]
fn test_reserved_codes_rejected() {
    static RESERVED: &[OperationDescriptor] = &[
        OperationDescriptor { name: "ping", code: PING_TRANSACTION, params: &[], ret: Kind::Void, failures: &[] },
    ];
    let contract = Contract { descriptor: "reserved", version: 1, operations: RESERVED };
    assert!(!contract.codes_in_range());
    assert!(matches!(contract.validate(), Err(Error::ReservedCode { operation: "ping", .. })));
}

#[test]
fn test_declares() {
    assert!(op("find").declares(FailureKind::IllegalArgument));
    assert!(!op("names").declares(FailureKind::IllegalArgument));
    assert_eq!(op("find").param_kinds().len(), 2);
}

#[test]
fn test_kind_display() {
    assert_eq!(op("names").ret.to_string(), "sequence<string; 3>");
    assert_eq!(op("find").ret.to_string(), "Pair?");
}

// ============================================================================
//  CODEC
// ============================================================================

#[test]
fn test_roundtrip_primitives() {
    roundtrip(Value::Int32(-1), &Kind::Int32);
    roundtrip(Value::Int64(i64::MIN), &Kind::Int64);
    roundtrip("hello".into(), &Kind::String);
    roundtrip(Value::String(None), &Kind::String);
    roundtrip(Value::Null, &Kind::Nullable(&STRING));
    roundtrip("there".into(), &Kind::Nullable(&STRING));
    roundtrip(Value::Void, &Kind::Void);
}

#[test]
fn test_absent_string_has_one_spelling() {
    // a plain string slot is null through the string itself
    let err = encode(&Value::Null, &Kind::String).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { found: "null", .. }), "{err:?}");

    // a nullable slot is null through the marker
    let err = encode(&Value::String(None), &Kind::Nullable(&STRING)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { found: "string", .. }), "{err:?}");
}

#[test]
fn test_roundtrip_composites() {
    roundtrip(pair(1, "one"), &PAIR_KIND);
    roundtrip(Value::Null, &Kind::Nullable(&PAIR_KIND));
    roundtrip(pair(2, "two"), &Kind::Nullable(&PAIR_KIND));
    roundtrip(
        Value::Sequence(vec![pair(1, "a"), pair(2, "b")]),
        &Kind::Sequence { item: &PAIR_KIND, max: 8 },
    );
    roundtrip(Value::Sequence(vec![]), &Kind::Sequence { item: &INT32, max: 0 });
}

#[test]
fn test_void_encodes_nothing() {
    assert!(encode(&Value::Void, &Kind::Void).expect("encode").is_empty());
}

#[test]
fn test_type_mismatch_on_encode() {
    let err = encode(&Value::Int64(1), &Kind::Int32).unwrap_err();
    assert_eq!(err, Error::TypeMismatch { expected: "int32".into(), found: "int64" });
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);

    let err = encode(&Value::Record(vec![Value::Int32(1)]), &PAIR_KIND).unwrap_err();
    assert_eq!(err, Error::ArityMismatch { context: "Pair", expected: 2, found: 1 });
}

#[test]
fn test_oversized_sequence_refused_before_writing() {
    let kind = Kind::Sequence { item: &STRING, max: 2 };
    let value = Value::Sequence(vec!["a".into(), "b".into(), "c".into()]);
    let err = encode(&value, &kind).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PayloadTooLarge);
}

#[test]
fn test_oversized_sequence_refused_on_read() {
    let wide = Kind::Sequence { item: &STRING, max: 10 };
    let narrow = Kind::Sequence { item: &STRING, max: 2 };
    let bytes = encode(&Value::Sequence(vec!["a".into(), "b".into(), "c".into()]), &wide).expect("encode");
    let err = decode_value(&mut Decoder::new(&bytes), &narrow).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PayloadTooLarge);
}

#[test]
fn test_record_with_extra_field_is_schema_mismatch() {
    static WIDE: RecordSchema = RecordSchema::new("Wide", &[
        Field::new("id", Kind::Int32),
        Field::new("label", Kind::String),
        Field::new("extra", Kind::Int64),
    ]);
    let bytes = encode(
        &Value::Record(vec![Value::Int32(1), "x".into(), Value::Int64(9)]),
        &Kind::Record(&WIDE),
    )
    .expect("encode");
    let err = decode_value(&mut Decoder::new(&bytes), &PAIR_KIND).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn test_decode_wrong_kind_is_schema_mismatch() {
    let bytes = encode(&Value::Int64(3), &Kind::Int64).expect("encode");
    let err = decode_value(&mut Decoder::new(&bytes), &Kind::Int32).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn test_truncated_value_is_malformed() {
    let bytes = encode(&pair(5, "five"), &PAIR_KIND).expect("encode");
    let err = decode_value(&mut Decoder::new(&bytes[..bytes.len() - 2]), &PAIR_KIND).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedPayload);
}

#[test]
fn test_args_arity() {
    let mut enc = Encoder::new();
    let err = encode_values(&mut enc, op("find"), &[Value::Int32(1)]).unwrap_err();
    assert_eq!(err, Error::ArityMismatch { context: "find", expected: 2, found: 1 });
}

// ============================================================================
//  FRAMES
// ============================================================================

fn request_bytes(op: &OperationDescriptor, args: &[Value]) -> Vec<u8> {
    let mut enc = Encoder::new();
    RequestEncoder::new(&TEST_CONTRACT, op, args).encode(&mut enc).expect("encode request");
    enc.into_bytes().expect("scopes closed")
}

#[test]
fn test_request_roundtrip() {
    let args = [Value::Int32(4), "four".into()];
    let bytes = request_bytes(op("find"), &args);
    let req = RequestDecoder::decode(&TEST_CONTRACT, op("find"), Decoder::new(&bytes)).expect("decode");
    assert_eq!(req.args, args);
}

#[test]
fn test_request_for_other_interface() {
    static OTHER: Contract = Contract { descriptor: "test.IOther", version: 1, operations: OPS };
    let bytes = request_bytes(op("reset"), &[]);
    let err = RequestDecoder::decode(&OTHER, op("reset"), Decoder::new(&bytes)).unwrap_err();
    assert_eq!(
        err,
        Error::InterfaceMismatch { expected: "test.IOther", found: Some("test.IThing".into()) }
    );
}

#[test]
fn test_request_with_trailing_args() {
    let bytes = request_bytes(op("names"), &[Value::Int32(1000)]);
    // decoding as a parameterless operation leaves the argument unread
    let err = RequestDecoder::decode(&TEST_CONTRACT, op("reset"), Decoder::new(&bytes)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn test_reply_ok() {
    let value = Value::Sequence(vec!["com.example.app".into()]);
    let mut enc = Encoder::new();
    ReplyOkEncoder::new(op("names"), &value).encode(&mut enc).expect("encode");
    let bytes = enc.into_bytes().expect("closed");

    let reply = ReplyDecoder::decode(op("names"), Decoder::new(&bytes)).expect("decode");
    assert_eq!(reply.status, Ok(value));
}

#[test]
fn test_reply_void_is_status_only() {
    let mut enc = Encoder::new();
    ReplyOkEncoder::new(op("reset"), &Value::Void).encode(&mut enc).expect("encode");
    let bytes = enc.into_bytes().expect("closed");
    assert_eq!(bytes, [0x09, 0, 0, 0, 0]);
}

#[test]
fn test_reply_declared_failure() {
    let failure = Failure::new(FailureKind::IllegalArgument, "no such user");
    let mut enc = Encoder::new();
    ReplyErrEncoder::new(&failure).encode(&mut enc).expect("encode");
    let bytes = enc.into_bytes().expect("closed");

    let reply = ReplyDecoder::decode(op("find"), Decoder::new(&bytes)).expect("decode");
    assert_eq!(reply.status, Err(failure));
}

#[test]
fn test_reply_undeclared_failure() {
    let failure = Failure::bare(FailureKind::IllegalState);
    let mut enc = Encoder::new();
    ReplyErrEncoder::new(&failure).encode(&mut enc).expect("encode");
    let bytes = enc.into_bytes().expect("closed");

    let err = ReplyDecoder::decode(op("find"), Decoder::new(&bytes)).unwrap_err();
    assert_eq!(err, Error::UndeclaredFailure { operation: "find", kind: FailureKind::IllegalState });
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn test_reply_unknown_status() {
    let mut enc = Encoder::new();
    enc.i32(-99).expect("encode");
    let bytes = enc.into_bytes().expect("closed");
    let err = ReplyDecoder::decode(op("find"), Decoder::new(&bytes)).unwrap_err();
    assert_eq!(err, Error::UnknownFailureCode(-99));
    assert_eq!(err.kind(), ErrorKind::MalformedPayload);
}

#[test]
fn test_interface_reply() {
    let mut enc = Encoder::new();
    encode_interface_reply(&mut enc, &TEST_CONTRACT).expect("encode");
    let bytes = enc.into_bytes().expect("closed");
    assert_eq!(decode_interface_reply(&bytes), Ok(Some("test.IThing".to_string())));
}

// ============================================================================
//  PARCELABLE
// ============================================================================

#[test]
fn test_parcelable_primitives() -> anyhow::Result<()> {
    assert_eq!(i32::from_value(Value::Int32(3))?, 3);
    assert_eq!(Option::<String>::from_value(Value::String(None))?, None);
    assert_eq!(None::<String>.into_value(), Value::String(None));
    assert_eq!(Option::<i32>::from_value(Value::Null)?, None);
    assert_eq!(None::<i32>.into_value(), Value::Null);
    assert!(Option::<i32>::from_value(Value::String(None)).is_err());
    assert!(Option::<String>::from_value(Value::Null).is_err());
    assert_eq!(Vec::<i64>::from_value(vec![1i64, 2].into_value())?, vec![1, 2]);
    assert_eq!(String::from_value(Value::String(None)), Err(Error::UnexpectedNull("string")));
    assert!(i64::from_value(Value::Int32(1)).is_err());
    Ok(())
}

#[test]
fn test_record_fields_arity() {
    let err = RecordFields::new(pair(1, "x"), "Triple", 3).err();
    assert_eq!(err, Some(Error::ArityMismatch { context: "Triple", expected: 3, found: 2 }));
}
