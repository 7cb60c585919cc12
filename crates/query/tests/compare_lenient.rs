use rstest::rstest;
use schematree_model::{Element, elem};
use schematree_query::{CompareOptions, ElementsMismatch, assert_elements_equal};

fn with_text(text: &str) -> Element {
    elem("a").child(elem("b1").text(text)).build()
}

#[rstest]
#[case("+1", "+ 1 ")]
#[case("1", "true ")]
#[case("true ", "1")]
#[case(" 0", "false ")]
#[case("false ", " 0")]
#[case("0", "false")]
#[case("TRUE", "1")]
#[case("1.50", "1.5")]
fn tolerant_text_accepts(#[case] expected: &str, #[case] actual: &str) {
    assert_elements_equal(&with_text(expected), &with_text(actual), CompareOptions::lenient())
        .unwrap();
}

#[rstest]
#[case("+1", "+1.1 ")]
#[case("1", "false ")]
#[case(" 0", "true ")]
#[case("2", "true")]
#[case("text", "other")]
fn tolerant_text_rejects(#[case] expected: &str, #[case] actual: &str) {
    let err =
        assert_elements_equal(&with_text(expected), &with_text(actual), CompareOptions::lenient())
            .unwrap_err();
    assert!(matches!(err, ElementsMismatch::Text { .. }));
}

#[rstest]
fn rejection_messages_quote_the_original_content() {
    let err =
        assert_elements_equal(&with_text("+1"), &with_text("+1.1 "), CompareOptions::lenient())
            .unwrap_err();
    assert_eq!(err.to_string(), r#"texts differ: Some("+1") != Some("+1.1 ")"#);
}

#[rstest]
fn missing_text_is_equivalent_to_whitespace() {
    let absent = elem("a").child(elem("b1")).build();
    let blank = with_text(" \n ");
    assert_elements_equal(&absent, &blank, CompareOptions::lenient()).unwrap();
    assert_elements_equal(&blank, &absent, CompareOptions::lenient()).unwrap();

    let err = assert_elements_equal(&absent, &with_text("text"), CompareOptions::lenient())
        .unwrap_err();
    assert_eq!(err.to_string(), r#"texts differ: None != Some("text")"#);
}

#[rstest]
fn whitespace_only_tail_differences_are_tolerated() {
    let expected = elem("a").child(elem("b1").tail("\n")).child(elem("b2")).build();
    let actual = elem("a").child(elem("b1")).child(elem("b2")).build();
    assert_elements_equal(&expected, &actual, CompareOptions::lenient()).unwrap();

    let trailing = elem("a").child(elem("b1").tail("tail")).child(elem("b2")).build();
    let err = assert_elements_equal(&actual, &trailing, CompareOptions::lenient()).unwrap_err();
    assert_eq!(err.to_string(), r#"tails differ: None != Some("tail")"#);
}

#[rstest]
fn extra_trailing_actual_children_are_tolerated() {
    let expected = elem("a").child(elem("b1")).build();
    let actual = elem("a").child(elem("b1")).child(elem("b2")).build();
    assert_elements_equal(&expected, &actual, CompareOptions::lenient()).unwrap();

    // The other direction stays an error: the producing side may append
    // generated children, the expected side may not invent them.
    let err = assert_elements_equal(&actual, &expected, CompareOptions::lenient()).unwrap_err();
    assert!(matches!(err, ElementsMismatch::Children { lesser_count: 1, greater_count: 2, .. }));
}

#[rstest]
fn attribute_values_are_compared_trimmed() {
    let expected = elem("a").child(elem("b1").attr("a", "1")).build();
    let padded = elem("a").child(elem("b1").attr("a", "1 ")).build();
    assert_elements_equal(&expected, &padded, CompareOptions::lenient()).unwrap();

    let different = elem("a").child(elem("b1").attr("a", "2 ")).build();
    let err = assert_elements_equal(&expected, &different, CompareOptions::lenient()).unwrap_err();
    assert_eq!(err.to_string(), "attribute 'a' values differ: '1' != '2'");
}

#[rstest]
fn differing_attribute_sets_are_reported_whole() {
    let expected = elem("a").child(elem("b1").attr("a", "1")).build();
    let actual = elem("a").child(elem("b1").attr("b", "1")).build();

    let err = assert_elements_equal(&expected, &actual, CompareOptions::lenient()).unwrap_err();
    assert_eq!(err.to_string(), r#"attributes differ: {"a": "1"} != {"b": "1"}"#);
}
