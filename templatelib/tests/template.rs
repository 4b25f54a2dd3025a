use std::sync::Arc;

use templatelib::{Conversion, Interpolation, InvalidConversion, Template, TemplatePart, Thunk, Value};

fn interp(value: f64, expr: &str) -> Interpolation {
    Interpolation::new(Value::Number(value), expr)
}

fn strings(template: &Template) -> Vec<&str> {
    template.strings().collect()
}

#[test]
fn empty_template() {
    let template = Template::new();
    assert_eq!(strings(&template), vec![""]);
    assert_eq!(template.interpolations().count(), 0);
    assert_eq!(template.iter().count(), 0);
}

#[test]
fn from_parts_empty_input() {
    let template = Template::from_parts(std::iter::empty::<TemplatePart>());
    assert_eq!(strings(&template), vec![""]);
    assert_eq!(template, Template::new());
}

#[test]
fn single_string() {
    let template = Template::from_parts(["hello"]);
    assert_eq!(strings(&template), vec!["hello"]);
    assert_eq!(template.interpolations().count(), 0);
    assert_eq!(template.iter().count(), 1);
}

#[test]
fn neighboring_strings_merge() {
    let template = Template::from_parts(["hello", "world"]);
    assert_eq!(strings(&template), vec!["helloworld"]);
}

#[test]
fn whitespace_only_string_survives() {
    let template = Template::from_parts(["   "]);
    assert_eq!(strings(&template), vec!["   "]);
}

#[test]
fn single_interpolation() {
    let template = Template::from_interpolation(interp(42.0, "answer"));
    assert_eq!(strings(&template), vec!["", ""]);
    let records: Vec<_> = template.interpolations().collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value, Value::Number(42.0));
    assert_eq!(records[0].expression, "answer");
}

#[test]
fn neighboring_interpolations() {
    let template = Template::from_parts([
        TemplatePart::from(interp(42.0, "i1")),
        TemplatePart::from(interp(99.0, "i2")),
    ]);
    assert_eq!(strings(&template), vec!["", "", ""]);
    assert_eq!(template.interpolations().count(), 2);
}

#[test]
fn interleaving_mixed_pieces() {
    let template = Template::from_parts([
        TemplatePart::from("hello"),
        TemplatePart::from("there"),
        TemplatePart::from(interp(42.0, "i1")),
        TemplatePart::from(interp(99.0, "i2")),
        TemplatePart::from("wow"),
        TemplatePart::from("neat"),
        TemplatePart::from(interp(100.0, "i3")),
        TemplatePart::from("fun"),
        TemplatePart::from(interp(101.0, "i4")),
    ]);
    assert_eq!(strings(&template), vec!["hellothere", "", "wowneat", "fun", ""]);
    assert_eq!(template.interpolations().count(), 4);
}

#[test]
fn parts_strictly_alternate() {
    let template = Template::from_parts([
        TemplatePart::from(interp(1.0, "a")),
        TemplatePart::from("x"),
        TemplatePart::from(interp(2.0, "b")),
        TemplatePart::from(interp(3.0, "c")),
    ]);
    let parts = template.parts();
    assert_eq!(parts.len(), 7);
    for (i, part) in parts.iter().enumerate() {
        match part {
            TemplatePart::Literal(_) => assert_eq!(i % 2, 0),
            TemplatePart::Interpolation(_) => assert_eq!(i % 2, 1),
        }
    }
    assert_eq!(strings(&template).len(), template.interpolations().count() + 1);
}

#[test]
fn round_trip_ordered_content() {
    let i1 = interp(1.0, "i1");
    let i2 = interp(2.0, "i2");
    let template = Template::from_parts([
        TemplatePart::from("a"),
        TemplatePart::from(i1.clone()),
        TemplatePart::from("b"),
        TemplatePart::from(i2.clone()),
        TemplatePart::from("c"),
    ]);
    assert_eq!(strings(&template), vec!["a", "b", "c"]);
    let records: Vec<_> = template.interpolations().collect();
    assert_eq!(*records[0].as_ref(), i1);
    assert_eq!(*records[1].as_ref(), i2);
    assert_eq!(
        template.parts(),
        &[
            TemplatePart::from("a"),
            TemplatePart::from(i1),
            TemplatePart::from("b"),
            TemplatePart::from(i2),
            TemplatePart::from("c"),
        ]
    );
}

#[test]
fn iter_skips_empty_segments() {
    let template = Template::from_interpolation(interp(42.0, "x"));
    let visible: Vec<_> = template.iter().collect();
    assert_eq!(visible.len(), 1);
    assert!(matches!(visible[0], TemplatePart::Interpolation(_)));

    let template = Template::from_parts([
        TemplatePart::from("hello"),
        TemplatePart::from(interp(42.0, "x")),
        TemplatePart::from("world"),
    ]);
    assert_eq!((&template).into_iter().count(), 3);
}

#[test]
fn add_template_str() {
    let template = Template::literal("hello") + "world";
    assert_eq!(strings(&template), vec!["helloworld"]);
    assert_eq!(template.interpolations().count(), 0);
}

#[test]
fn add_template_str_keeps_interpolations() {
    let greeting = Template::from_parts([
        TemplatePart::from("hello "),
        TemplatePart::from(Interpolation::new(Value::Str("world".to_string()), "name")),
        TemplatePart::from("!"),
    ]);
    let template = &greeting + " how are you?";
    assert_eq!(strings(&template), vec!["hello ", "! how are you?"]);
    assert_eq!(template.interpolations().count(), 1);
}

#[test]
fn add_str_template() {
    let template = "hello" + Template::literal("world");
    assert_eq!(strings(&template), vec!["helloworld"]);

    let inner = Template::from_parts([
        TemplatePart::from("there, "),
        TemplatePart::from(Interpolation::new(Value::Str("world".to_string()), "name")),
        TemplatePart::from("!"),
    ]);
    let template = "hello " + inner;
    assert_eq!(strings(&template), vec!["hello there, ", "!"]);
    assert_eq!(template.interpolations().count(), 1);
}

#[test]
fn add_template_template_merges_boundary() {
    let left = Template::from_parts([
        TemplatePart::from("hello "),
        TemplatePart::from(Interpolation::new(Value::Str("world".to_string()), "name")),
        TemplatePart::from("!"),
    ]);
    let right = Template::from_parts([
        TemplatePart::from(" how are "),
        TemplatePart::from(Interpolation::new(Value::Str("you".to_string()), "other")),
        TemplatePart::from("?"),
    ]);
    let template = &left + &right;
    assert_eq!(strings(&template), vec!["hello ", "! how are ", "?"]);
    assert_eq!(template.interpolations().count(), 2);
    assert_eq!(template.parts().len(), 5);
}

#[test]
fn concat_shares_records() {
    let record = Arc::new(interp(42.0, "x"));
    let template = Template::from_parts([TemplatePart::Interpolation(record.clone())]);
    let sum = &template + &Template::literal("!");
    let carried = sum.interpolations().next().expect("record missing");
    assert!(Arc::ptr_eq(carried, &record));
}

#[test]
fn concat_associativity() {
    let t1 = Template::from_parts([
        TemplatePart::from("a"),
        TemplatePart::from(interp(1.0, "x")),
    ]);
    let t2 = Template::literal("b");
    let t3 = Template::from_parts([
        TemplatePart::from(interp(2.0, "y")),
        TemplatePart::from("c"),
    ]);
    let left = (&t1 + &t2) + &t3;
    let right = &t1 + (&t2 + &t3);
    assert_eq!(left, right);
    assert_eq!(strings(&left), vec!["a", "b", "c"]);
}

#[test]
fn equality_is_structural() {
    let build = || {
        Template::from_parts([
            TemplatePart::from("x = "),
            TemplatePart::from(interp(1.0, "x")),
        ])
    };
    assert_eq!(build(), build());

    let other = Template::from_parts([
        TemplatePart::from("x = "),
        TemplatePart::from(interp(2.0, "x")),
    ]);
    assert_ne!(build(), other);
}

#[test]
fn interpolation_equality_by_attributes() {
    assert_eq!(interp(1.0, "x"), interp(1.0, "x"));
    assert_ne!(interp(1.0, "x"), interp(1.0, "y"));
    assert_ne!(
        interp(1.0, "x"),
        interp(1.0, "x").with_format_spec(".2f")
    );
}

#[test]
fn equal_templates_hash_equal() {
    let build = || {
        Template::from_parts([
            TemplatePart::from("v: "),
            TemplatePart::from(interp(7.0, "v").with_format_spec("04d")),
        ])
    };
    let h1 = build().try_hash().expect("hashable");
    let h2 = build().try_hash().expect("hashable");
    assert_eq!(h1, h2);
}

#[test]
fn negative_zero_hashes_like_zero() {
    let t1 = Template::from_interpolation(interp(0.0, "z"));
    let t2 = Template::from_interpolation(interp(-0.0, "z"));
    assert_eq!(t1, t2);
    assert_eq!(t1.try_hash().expect("hashable"), t2.try_hash().expect("hashable"));
}

#[test]
fn nan_values_compare_unequal() {
    let t1 = Template::from_interpolation(interp(f64::NAN, "n"));
    let t2 = Template::from_interpolation(interp(f64::NAN, "n"));
    assert_ne!(t1, t2);
}

#[test]
fn thunk_value_is_unhashable() {
    let thunk = Thunk::new(|| Value::Number(1.0));
    let template =
        Template::from_interpolation(Interpolation::new(Value::Thunk(thunk), "deferred"));
    let error = template.try_hash().expect_err("thunks have no hash");
    assert_eq!(error.type_name, "Thunk");
}

#[test]
fn nested_template_value_hashes() {
    let inner = Arc::new(Template::literal("inner"));
    let template =
        Template::from_interpolation(Interpolation::new(Value::Template(inner), "inner"));
    assert!(template.try_hash().is_ok());
}

#[test]
fn thunks_compare_by_identity() {
    let thunk = Thunk::new(|| Value::Unit);
    assert_eq!(Value::Thunk(thunk.clone()), Value::Thunk(thunk));
    assert_ne!(
        Value::Thunk(Thunk::new(|| Value::Unit)),
        Value::Thunk(Thunk::new(|| Value::Unit))
    );
}

#[test]
fn conversion_letters() {
    assert_eq!(Conversion::try_from('a'), Ok(Conversion::Ascii));
    assert_eq!(Conversion::try_from('r'), Ok(Conversion::Repr));
    assert_eq!(Conversion::try_from('s'), Ok(Conversion::Str));
    assert_eq!(Conversion::try_from('b'), Err(InvalidConversion('b')));
    assert_eq!(Conversion::Repr.as_char(), 'r');
}

#[test]
fn many_interpolations() {
    let mut parts = Vec::new();
    for i in 0..300 {
        parts.push(TemplatePart::from(interp(i as f64, "x")));
        parts.push(TemplatePart::from(" "));
    }
    let template = Template::from_parts(parts);
    assert_eq!(template.interpolations().count(), 300);
    assert_eq!(template.strings().count(), 301);
}
