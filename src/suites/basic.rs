//! Passing sample classes

use serde_json::json;

use crate::catalog::{fail, TestClass, TestMethod};
use crate::selector::TypeName;

pub fn dummy_class() -> TestClass {
    TestClass::new("DummyClass")
        .with_description("Single test that does nothing")
        .test("nothing", |_| Ok(()))
}

pub fn second_dummy_class() -> TestClass {
    TestClass::new("SecondDummyClass")
        .with_description("Single test that does nothing")
        .test("nothing", |_| Ok(()))
}

/// Parameterized tests; `single` is overloaded on its parameter type
pub fn dummy_property_class() -> TestClass {
    TestClass::new("DummyPropertyClass")
        .with_description("Parameterized tests")
        .with_method(TestMethod::parameterized(
            "single",
            vec![TypeName::of::<String>()],
            vec![vec![json!("one")]],
            |ctx| match ctx.argument(0).and_then(|v| v.as_str()) {
                Some(value) if !value.is_empty() => Ok(()),
                _ => fail("expected a non-empty string argument"),
            },
        ))
        .with_method(TestMethod::parameterized(
            "single",
            vec![TypeName::of::<i64>()],
            vec![vec![json!(1)]],
            |ctx| match ctx.argument(0).and_then(|v| v.as_i64()) {
                Some(_) => Ok(()),
                None => fail("expected an integer argument"),
            },
        ))
        .with_method(TestMethod::parameterized(
            "sum",
            vec![TypeName::of::<i64>(), TypeName::of::<i64>()],
            vec![vec![json!(1), json!(2)], vec![json!(20), json!(22)]],
            |ctx| {
                let total: i64 = ctx.arguments().iter().filter_map(|v| v.as_i64()).sum();
                ctx.publish_value(total.to_string());
                Ok(())
            },
        ))
}
