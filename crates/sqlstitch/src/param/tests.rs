use super::*;
use crate::error::StitchError;
use crate::template::Arg;
use crate::value::{Value, ValueKind};

#[test]
fn get_translates_null_to_none() {
    let mut params = Parameters::new();
    params.add("p0", Option::<i32>::None);

    assert_eq!(params.get::<Option<i32>>("p0").unwrap(), None);
    assert_eq!(
        params.get::<i32>("p0"),
        Err(StitchError::NullValue("p0".to_string()))
    );
}

#[test]
fn get_reports_missing_and_mismatched() {
    let mut params = Parameters::new();
    params.add("p0", "John");

    assert!(params.get::<String>("p1").unwrap_err().is_not_found());
    assert_eq!(
        params.get::<i64>("p0"),
        Err(StitchError::TypeMismatch {
            name: "p0".to_string(),
            expected: "i64",
            found: "string",
        })
    );
}

#[test]
fn add_replaces_same_name_in_place() {
    let mut params = Parameters::new();
    params.add("a", 1).add("b", 2).add("a", 3);

    assert_eq!(params.names().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(params.get::<i32>("a").unwrap(), 3);
}

#[test]
fn set_value_keeps_metadata() {
    let mut params = Parameters::new();
    params.add_with(
        "out",
        Value::Null,
        ParamOptions::new()
            .with_direction(Direction::Output)
            .with_db_type(DbType::Int32),
    );
    params.set_value("out", 42).unwrap();

    let entry = params.entry("out").unwrap();
    assert_eq!(entry.direction(), Direction::Output);
    assert_eq!(entry.options.db_type, Some(DbType::Int32));
    assert_eq!(params.get::<i32>("out").unwrap(), 42);
    assert!(params.set_value("missing", 1).is_err());
}

#[test]
fn extend_merges_bags() {
    let mut a = Parameters::new();
    a.add("x", 1);
    let mut b = Parameters::new();
    b.add("x", 2).add("y", 3);

    a.extend(&b);
    assert_eq!(a.len(), 2);
    assert_eq!(a.get::<i32>("x").unwrap(), 2);
}

#[test]
fn descriptor_cannot_be_renamed() {
    let mut d = ParamDescriptor::new(10).named("id").unwrap();
    assert_eq!(d.name(), Some("id"));
    assert_eq!(
        d.set_name("other"),
        Err(StitchError::AlreadyNamed {
            name: "id".to_string()
        })
    );
}

#[test]
fn descriptor_cannot_wrap_descriptor() {
    let inner = Arg::Param(ParamDescriptor::new(1));
    assert_eq!(
        ParamDescriptor::wrap(inner).unwrap_err(),
        StitchError::NestedParameter
    );
    assert!(ParamDescriptor::wrap(Arg::Value(Value::I32(1))).is_ok());
}

#[test]
fn descriptor_kind_defaults_to_value_kind() {
    let d = ParamDescriptor::new(1i16);
    assert_eq!(d.kind(), ValueKind::I16);
    assert_eq!(d.with_kind(ValueKind::I64).kind(), ValueKind::I64);
}

#[test]
fn parameters_serialize_as_list() {
    let mut params = Parameters::new();
    params.add_with("p0", 10, ParamOptions::new().with_size(4));

    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(json[0]["name"], "p0");
    assert_eq!(json[0]["value"], 10);
    assert_eq!(json[0]["size"], 4);
}
