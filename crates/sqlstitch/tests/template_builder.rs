//! End-to-end tests for the free-form template builder.

use sqlstitch::prelude::*;
use sqlstitch::{BuilderOptions, DbType, Direction};

#[test]
fn builds_a_filtered_query() {
    let name = "John";
    let min_age = 18;
    let table = "Users";

    let mut b = sqlstitch::builder();
    b.append_intact(sql!("SELECT * FROM {table:raw}"))
        .append(sql!("WHERE Name = {name}"))
        .append_if(min_age > 0, || sql!("AND Age >= {min_age}"));

    assert_eq!(
        b.sql(),
        "SELECT * FROM Users WHERE Name = @p0 AND Age >= @p1"
    );
    assert_eq!(b.get_value::<String>("p0").unwrap(), "John");
    assert_eq!(b.get_value::<i32>("p1").unwrap(), 18);
}

#[test]
fn equal_values_get_distinct_names_without_reuse() {
    let mut b = sqlstitch::builder();
    b.append_intact(sql!("A = {5} OR B = {5}"));

    assert_eq!(b.sql(), "A = @p0 OR B = @p1");
    assert_eq!(b.parameters().len(), 2);
}

#[test]
fn descriptors_are_reused_and_keep_metadata() {
    let code = ParamDescriptor::new("X1")
        .with_db_type(DbType::AnsiStringFixedLength)
        .with_size(2);

    let mut b = sqlstitch::builder();
    b.append_intact(sql!("Code = {code.clone()} OR Alt = {code}"));

    assert_eq!(b.sql(), "Code = @p0 OR Alt = @p0");
    let entry = b.parameters().entry("p0").unwrap();
    assert_eq!(entry.options.db_type, Some(DbType::AnsiStringFixedLength));
    assert_eq!(entry.options.size, Some(2));
    assert_eq!(entry.direction(), Direction::Input);
}

#[test]
fn output_parameters_can_be_written_back() {
    let total = ParamDescriptor::new(Value::Null)
        .with_direction(Direction::Output)
        .named("Total")
        .unwrap();

    let mut b = sqlstitch::builder();
    b.append_intact(sql!("EXEC CountUsers {total}"));
    let (sql, mut params) = b.build().unwrap();
    assert_eq!(sql, "EXEC CountUsers @Total");

    params.set_value("Total", 42).unwrap();
    assert_eq!(params.get::<i32>("Total").unwrap(), 42);
    assert_eq!(params.entry("Total").unwrap().direction(), Direction::Output);
}

#[test]
fn subquery_shares_the_parameter_sequence() {
    let role = "admin";
    let sub = sql!("SELECT UserId FROM Roles WHERE Role = {role}");

    let mut b = sqlstitch::builder();
    b.append_intact(sql!("SELECT * FROM Users WHERE Active = {true}"))
        .append(sql!("AND Id IN ({sub})"));

    assert_eq!(
        b.sql(),
        "SELECT * FROM Users WHERE Active = @p0 AND Id IN (SELECT UserId FROM Roles WHERE Role = @p1)"
    );
}

#[test]
fn list_values_bind_as_collections() {
    let ids = vec![1, 2, 3];

    let mut b = sqlstitch::builder();
    b.append_intact(sql!("WHERE Id IN {ids} AND Type = {4}"));

    assert_eq!(b.sql(), "WHERE Id IN @pc0_ AND Type = @p0");
    assert_eq!(b.get_value::<Vec<i32>>("pc0_").unwrap(), vec![1, 2, 3]);
}

#[test]
fn options_override_defaults_per_builder() {
    let options = BuilderOptions::new()
        .prefix(":")
        .name_template("arg")
        .reuse_parameters(true);

    let mut b = sqlstitch::builder_with(&options).unwrap();
    b.append_intact(sql!("{1} {1} {vec![1]}"));

    assert_eq!(b.sql(), ":arg0 :arg0 :argc0_");
}

#[test]
fn invalid_overrides_fail_at_construction() {
    let options = BuilderOptions::new().prefix("").name_template("");
    let err = sqlstitch::builder_with(&options).unwrap_err();
    assert!(matches!(err, sqlstitch::StitchError::Config(_)));
    assert!(sqlstitch::fluent_with(&options).is_err());

    let settings = sqlstitch::Settings::new().with_collection_template("list");
    assert!(sqlstitch::TemplateBuilder::try_new(settings.clone()).is_err());
    assert!(sqlstitch::FluentBuilder::try_new(settings).is_err());
}

#[test]
fn collection_template_override() {
    let options = BuilderOptions::new().collection_template("{name}list{n}");
    let mut b = sqlstitch::builder_with(&options).unwrap();
    b.append_intact(sql!("{vec![1, 2]} {vec![3]}"));

    assert_eq!(b.sql(), "@plist0 @plist1");
}

#[test]
fn parameters_serialize_as_json() {
    let mut b = sqlstitch::builder();
    b.append_intact(sql!("{\"John\"} {7}"));

    let json = serde_json::to_value(b.parameters()).unwrap();
    assert_eq!(json[0]["name"], "p0");
    assert_eq!(json[0]["value"], "John");
    assert_eq!(json[1]["value"], 7);
}
