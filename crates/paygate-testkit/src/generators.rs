//! Proptest generators for property-based testing.

use proptest::prelude::*;

use paygate_core::{Amount, ParameterSet};

/// Generate a field name as processors use them (`vnp_Amount`, `orderId`).
pub fn field_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a field value, including spaces, reserved characters and
/// Vietnamese text.
pub fn field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,24}".prop_map(String::from),
        "\\PC{0,16}".prop_map(String::from),
        Just("Thanh toán đơn hàng #42".to_string()),
        Just("https://shop.example/return?a=1&b=2".to_string()),
        Just(String::new()),
    ]
}

/// Generate a parameter set with up to `max_fields` fields.
pub fn parameter_set(max_fields: usize) -> impl Strategy<Value = ParameterSet> {
    prop::collection::vec((field_name(), field_value()), 1..=max_fields.max(1))
        .prop_map(ParameterSet::from_pairs)
}

/// Generate a valid (positive) amount.
pub fn amount() -> impl Strategy<Value = Amount> {
    (1i64..=10_000_000_000).prop_filter_map("positive", |v| Amount::new(v).ok())
}

/// Generate an invalid amount (zero or negative).
pub fn non_positive_amount() -> impl Strategy<Value = i64> {
    i64::MIN..=0
}

/// Pick a field of `params` and a replacement value that differs from it.
pub fn tamper(params: &ParameterSet) -> impl Strategy<Value = (String, String)> {
    let names: Vec<String> = params.iter().map(|(k, _)| k.to_string()).collect();
    let current: Vec<String> = params.iter().map(|(_, v)| v.to_string()).collect();
    (0..names.len().max(1), "[a-z0-9]{1,8}").prop_map(move |(i, suffix)| {
        let i = i.min(names.len().saturating_sub(1));
        let name = names.get(i).cloned().unwrap_or_default();
        let value = format!("{}{}", current.get(i).cloned().unwrap_or_default(), suffix);
        (name, value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn test_parameter_set_is_never_empty() {
        let mut runner = TestRunner::default();
        for _ in 0..32 {
            let params = parameter_set(6).new_tree(&mut runner).unwrap().current();
            assert!(!params.is_empty());
        }
    }

    #[test]
    fn test_tamper_changes_value() {
        let params = ParameterSet::from_pairs([("amount", "1000"), ("orderId", "O1")]);
        let mut runner = TestRunner::default();
        for _ in 0..32 {
            let (name, value) = tamper(&params).new_tree(&mut runner).unwrap().current();
            assert_ne!(params.get(&name), Some(value.as_str()));
        }
    }
}
