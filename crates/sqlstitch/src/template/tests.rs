use super::*;
use crate::sql;

/// Records what a template feeds to its sink.
#[derive(Default)]
struct Recorder {
    out: Vec<String>,
}

impl TemplateSink for Recorder {
    fn write_literal(&mut self, text: &str) {
        self.out.push(format!("lit:{text}"));
    }

    fn write_value(&mut self, arg: Arg, format: Option<&str>) {
        let kind = match arg {
            Arg::Value(v) => format!("value:{v}"),
            Arg::Param(p) => format!("param:{}", p.value()),
            Arg::Template(t) => format!("template:{}", t.value_count()),
        };
        self.out.push(format!("{kind}:{}", format.unwrap_or("-")));
    }
}

#[test]
fn adjacent_literals_merge() {
    let t = Template::new().literal("SELECT ").literal("*").literal("");
    assert_eq!(t.segments(), &[Segment::Literal("SELECT *".into())]);
    assert!(t.is_literal());
}

#[test]
fn segments_are_fed_in_order() {
    let t = Template::new()
        .literal("A = ")
        .value(1)
        .literal(" AND T = ")
        .raw("Users")
        .formatted(2.5, "n2");

    let mut rec = Recorder::default();
    t.write_to(&mut rec);
    assert_eq!(
        rec.out,
        [
            "lit:A = ",
            "value:1:-",
            "lit: AND T = ",
            "value:Users:raw",
            "value:2.5:n2",
        ]
    );
}

#[test]
fn macro_decomposes_format_string() {
    let id = 10;
    let table = "Users";
    let t = sql!("SELECT * FROM {table:raw} WHERE Id = {id}");

    assert_eq!(t.value_count(), 2);
    assert_eq!(
        t.segments()[0],
        Segment::Literal("SELECT * FROM ".into())
    );
    assert_eq!(
        t.segments()[1],
        Segment::Value {
            arg: Arg::Value(Value::from("Users")),
            format: Some("raw".into()),
        }
    );
    assert_eq!(
        t.segments()[3],
        Segment::Value {
            arg: Arg::Value(Value::I32(10)),
            format: None,
        }
    );
}

#[test]
fn macro_positional_named_and_escapes() {
    let t = sql!("{{{}}} {0} {name}", 1, name = "x");

    let mut rec = Recorder::default();
    t.write_to(&mut rec);
    assert_eq!(
        rec.out,
        [
            "lit:{",
            "value:1:-",
            "lit:} ",
            "value:1:-",
            "lit: ",
            "value:x:-",
        ]
    );
}

#[test]
fn nested_templates_stay_nested() {
    let inner = sql!("SELECT Id FROM Roles WHERE Name = {\"admin\"}");
    let outer = sql!("WHERE RoleId IN ({inner})");

    assert_eq!(outer.value_count(), 1);
    assert!(matches!(
        &outer.segments()[1],
        Segment::Value { arg: Arg::Template(t), .. } if t.value_count() == 1
    ));
}

#[test]
fn collections_convert_to_lists() {
    assert_eq!(
        vec![1, 2].into_arg(),
        Arg::Value(Value::List(vec![Value::I32(1), Value::I32(2)]))
    );
    assert_eq!(Option::<i32>::None.into_arg(), Arg::Value(Value::Null));
}
