//! Round-trips every primitive field kind the marshaler supports through
//! one composite struct: every integer width, both float widths, bool,
//! binary, and a timestamp.

use dynamorm::marshal::AttributeValue;
use dynamorm::Marshal;
use dynamorm::DynamormModel;

#[derive(DynamormModel, Debug, Clone, PartialEq)]
#[dynamorm(table = "widgets")]
struct Everything {
    #[dynamorm(pk)]
    id: String,
    #[dynamorm(sk)]
    name: String,
    a_i8: i8,
    a_i16: i16,
    a_i32: i32,
    a_i64: i64,
    a_u8: u8,
    a_u32: u32,
    a_u64: u64,
    a_f32: f32,
    a_f64: f64,
    flag: bool,
    blob: Vec<u8>,
    created_at: aws_smithy_types::DateTime,
}

fn sample() -> Everything {
    Everything {
        id: "w1".to_string(),
        name: "Widget".to_string(),
        a_i8: -12,
        a_i16: -1234,
        a_i32: -123456,
        a_i64: -123456789,
        a_u8: 200,
        a_u32: 4_000_000_000,
        a_u64: 18_000_000_000_000_000_000,
        a_f32: 1.5,
        a_f64: 2.718281828,
        flag: true,
        blob: vec![0, 1, 2, 255],
        created_at: aws_smithy_types::DateTime::from_secs(1_700_000_000),
    }
}

#[test]
fn every_integer_width_round_trips_exactly() {
    let value = sample();
    let item = value.to_item();
    assert_eq!(item.get("aI8"), Some(&AttributeValue::N("-12".to_string())));
    assert_eq!(item.get("aU64"), Some(&AttributeValue::N("18000000000000000000".to_string())));
    let decoded = Everything::from_item(&item).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn floats_and_booleans_round_trip() {
    let value = sample();
    let item = value.to_item();
    assert!(matches!(item.get("flag"), Some(AttributeValue::Bool(true))));
    let decoded = Everything::from_item(&item).unwrap();
    assert_eq!(decoded.a_f32, value.a_f32);
    assert_eq!(decoded.a_f64, value.a_f64);
}

#[test]
fn binary_and_timestamp_round_trip() {
    let value = sample();
    let item = value.to_item();
    assert!(matches!(item.get("blob"), Some(AttributeValue::B(_))));
    let decoded = Everything::from_item(&item).unwrap();
    assert_eq!(decoded.blob, value.blob);
    assert_eq!(decoded.created_at, value.created_at);
}

#[test]
fn an_integer_too_large_for_the_target_width_is_rejected() {
    use std::collections::HashMap;
    let value = sample();
    let mut item: HashMap<String, AttributeValue> = value.to_item();
    // `a_u8` only fits 0..=255; push in a value that overflows it.
    item.insert("aU8".to_string(), AttributeValue::N("99999".to_string()));
    assert!(Everything::from_item(&item).is_err());
}
