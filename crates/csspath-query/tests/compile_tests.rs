//! Integration tests for selector-list compilation and the compiled cache.

use csspath_query::{CompiledMap, ExpressionType, Query, QueryError};
use serde_json::json;

/// Helper to compile a CSS expression with a fresh compiler
fn compile(expression: &str) -> Result<String, QueryError> {
    Query::new().compile(expression, ExpressionType::Css)
}

/// The class-membership predicate for `class`
fn class_test(class: &str) -> String {
    format!(r#"contains(concat(" ", normalize-space(@class), " "), " {class} ")"#)
}

#[test]
fn test_xpath_passthrough() {
    let mut query = Query::new();
    for expression in ["//div[@id='x']", "", "not , even / valid", "a, b"] {
        assert_eq!(
            query.compile(expression, ExpressionType::Xpath).unwrap(),
            expression
        );
    }
    assert!(query.get_compiled().is_empty());
}

#[test]
fn test_xpath_type_token_case_insensitive() {
    let mut query = Query::new();
    for token in ["XPATH", "xpath", "XPath"] {
        assert_eq!(query.compile_as("div:bogus", token).unwrap(), "div:bogus");
    }
    assert!(query.get_compiled().is_empty());
}

#[test]
fn test_unknown_type_token_means_css() {
    let mut query = Query::new();
    assert_eq!(query.compile_as("div", "html").unwrap(), "//div");
}

#[test]
fn test_type_selector() {
    assert_eq!(compile("div").unwrap(), "//div");
}

#[test]
fn test_universal_selector() {
    assert_eq!(compile("*").unwrap(), "//*");
}

#[test]
fn test_class_selector() {
    assert_eq!(
        compile("div.foo").unwrap(),
        r#"//div[contains(concat(" ", normalize-space(@class), " "), " foo ")]"#
    );
}

#[test]
fn test_multiple_classes_parenthesized() {
    assert_eq!(
        compile(".a.b").unwrap(),
        format!("//*[({}) and ({})]", class_test("a"), class_test("b"))
    );
}

#[test]
fn test_id_child_combinator() {
    assert_eq!(compile("#main > p").unwrap(), "//*[@id='main']/p");
}

#[test]
fn test_child_combinator_without_spaces() {
    assert_eq!(compile("ul>li").unwrap(), "//ul/li");
}

#[test]
fn test_descendant_chain() {
    // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    assert_eq!(
        compile("div.container > ul li a").unwrap(),
        format!("//div[{}]/ul//li//a", class_test("container"))
    );
}

#[test]
fn test_attribute_selectors() {
    assert_eq!(compile("a[href]").unwrap(), "//a[@href]");
    assert_eq!(
        compile("input[type=text][disabled]").unwrap(),
        r#"//input[(@type="text") and (@disabled)]"#
    );
}

#[test]
fn test_attribute_value_with_equals_is_truncated() {
    assert_eq!(compile("a[data-x=1=2]").unwrap(), r#"//a[@data-x="1"]"#);
}

#[test]
fn test_attribute_empty_value_is_presence() {
    assert_eq!(compile("a[title=]").unwrap(), "//a[@title]");
}

#[test]
fn test_repeated_attribute_keeps_last_value() {
    assert_eq!(
        compile("a[rel=a][href][rel=b]").unwrap(),
        r#"//a[(@rel="b") and (@href)]"#
    );
}

#[test]
fn test_full_predicate_order() {
    assert_eq!(
        compile("li#item.x[data-k=v]:last-child").unwrap(),
        format!(
            r#"//li[(@id='item') and (@data-k="v") and ({}) and (last())]"#,
            class_test("x")
        )
    );
}

#[test]
fn test_selector_list() {
    assert_eq!(compile("a, b").unwrap(), "//a|//b");
    assert_eq!(compile(" p ,div.x").unwrap(), format!("//p|//div[{}]", class_test("x")));
}

#[test]
fn test_selector_list_keeps_duplicates() {
    assert_eq!(compile("a,a").unwrap(), "//a|//a");
}

#[test]
fn test_first_child() {
    assert_eq!(compile("li:first-child").unwrap(), "//li[1]");
}

#[test]
fn test_last_child() {
    assert_eq!(compile("ul > li:last-child").unwrap(), "//ul/li[last()]");
}

#[test]
fn test_nth_child_odd() {
    let xpath = compile("li:nth-child(odd)").unwrap();
    assert_eq!(xpath, "//li[(position() -1) mod 2 = 0 and position() >= 1]");
}

#[test]
fn test_nth_child_even() {
    assert_eq!(
        compile("li:nth-child(even)").unwrap(),
        "//li[position() mod 2 = 0 and position() >= 0]"
    );
}

#[test]
fn test_nth_child_number_and_formula() {
    assert_eq!(compile("tr:nth-child(3)").unwrap(), "//tr[position() = 3]");
    assert_eq!(
        compile("tr:nth-child(3n+1)").unwrap(),
        "//tr[(position() -1) mod 3 = 0 and position() >= 1]"
    );
}

#[test]
fn test_nth_child_padded_number_copied_verbatim() {
    // Surrounding whitespace still reads as a number and is kept as written.
    assert_eq!(
        compile("li:nth-child( 3 )").unwrap(),
        "//li[position() =  3 ]"
    );
}

#[test]
fn test_pseudo_combined_with_class() {
    assert_eq!(
        compile("li.item:first-child").unwrap(),
        format!("//li[({}) and (1)]", class_test("item"))
    );
}

#[test]
fn test_empty_selector_is_invalid() {
    assert!(matches!(compile(""), Err(QueryError::InvalidSelector { .. })));
    assert!(matches!(compile("   "), Err(QueryError::InvalidSelector { .. })));
}

#[test]
fn test_empty_chunk_is_invalid() {
    assert!(matches!(compile("a,"), Err(QueryError::InvalidSelector { .. })));
    assert!(matches!(compile("a,,b"), Err(QueryError::InvalidSelector { .. })));
}

#[test]
fn test_unparseable_selector_is_invalid() {
    assert!(matches!(compile("h1 + p"), Err(QueryError::InvalidSelector { .. })));
    assert!(matches!(compile("div."), Err(QueryError::InvalidSelector { .. })));
}

#[test]
fn test_unknown_pseudo_class() {
    assert_eq!(
        compile("div:bogus"),
        Err(QueryError::UnsupportedPseudoClass {
            name: "bogus".to_string(),
            expression: None,
        })
    );
}

#[test]
fn test_nth_child_without_expression() {
    assert!(matches!(
        compile("li:nth-child"),
        Err(QueryError::UnsupportedPseudoClass { .. })
    ));
    assert!(matches!(
        compile("li:nth-child(2n-1)"),
        Err(QueryError::UnsupportedPseudoClass { .. })
    ));
}

#[test]
fn test_compile_memoizes_chunks() {
    let mut query = Query::new();
    let first = query.compile("div.foo", ExpressionType::Css).unwrap();

    let compiled = query.get_compiled();
    assert_eq!(compiled.get("div.foo"), Some(&first));

    let second = query.compile("div.foo", ExpressionType::Css).unwrap();
    assert_eq!(first, second);
    assert_eq!(query.get_compiled(), compiled);
}

#[test]
fn test_cache_keys_are_trimmed_chunks() {
    let mut query = Query::new();
    let _ = query.compile(" a ,  b > c ", ExpressionType::Css).unwrap();
    let keys: Vec<String> = query.get_compiled().into_keys().collect();
    assert_eq!(keys, ["a", "b > c"]);
    assert!(keys.iter().all(|key| !key.contains(',')));
}

#[test]
fn test_failure_aborts_whole_call() {
    let mut query = Query::new();
    let err = query.compile("a, div:bogus, b", ExpressionType::Css).unwrap_err();
    assert!(matches!(err, QueryError::UnsupportedPseudoClass { .. }));

    // Chunks before the failure stay cached; the failing one and later ones do not.
    let compiled = query.get_compiled();
    assert_eq!(compiled.get("a").map(String::as_str), Some("//a"));
    assert!(!compiled.contains_key("div:bogus"));
    assert!(!compiled.contains_key("b"));
}

#[test]
fn test_set_compiled_round_trip() {
    let mut query = Query::new();
    let mut compiled = CompiledMap::new();
    let _ = compiled.insert("p".to_string(), "//custom".to_string());
    let _ = compiled.insert("q".to_string(), "//other".to_string());

    query.set_compiled(compiled.clone());
    assert_eq!(query.get_compiled(), compiled);
    assert_eq!(query.compile("p, q", ExpressionType::Css).unwrap(), "//custom|//other");
}

#[test]
fn test_set_compiled_replaces_everything() {
    let mut query = Query::new();
    let _ = query.compile("a", ExpressionType::Css).unwrap();
    query.set_compiled(CompiledMap::new());
    assert!(query.get_compiled().is_empty());
}

#[test]
fn test_set_compiled_value() {
    let mut query = Query::new();
    query.set_compiled_value(json!({"div": "//div"})).unwrap();
    assert_eq!(query.get_compiled().get("div").map(String::as_str), Some("//div"));
}

#[test]
fn test_set_compiled_value_rejects_non_mapping() {
    let mut query = Query::new();
    let _ = query.compile("a", ExpressionType::Css).unwrap();

    for value in [json!("div"), json!(["//div"]), json!(null), json!({"div": false})] {
        assert!(matches!(
            query.set_compiled_value(value),
            Err(QueryError::InvalidCacheReplacement { .. })
        ));
    }
    assert_eq!(query.get_compiled().len(), 1);
}

#[test]
fn test_separate_queries_do_not_share_cache() {
    let mut first = Query::new();
    let second = Query::new();
    let _ = first.compile("a", ExpressionType::Css).unwrap();
    assert!(second.get_compiled().is_empty());
}
