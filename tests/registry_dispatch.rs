//! レジストリ経由の呼び出しテスト
//!
//! ホストと同じく名前と引数だけでオペレーションを呼び出す。

use list_ops::{list, record, CallArgs, ErrorKind, NativeFunc, Registry, RegistryConfig, Value};

fn registry() -> Registry {
    Registry::new()
}

#[test]
fn merge_example_across_inputs() {
    let a = list![
        record! {"id" => 1, "name" => "a"},
        record! {"id" => 2, "name" => "b"},
    ];
    let b = list![
        record! {"id" => 2, "color" => "red"},
        record! {"id" => 3, "name" => "c"},
    ];
    let out = registry()
        .invoke("lists_mergeby", &[a, b, Value::from("id")])
        .unwrap();
    assert_eq!(
        out,
        list![
            record! {"id" => 1, "name" => "a"},
            record! {"id" => 2, "name" => "b", "color" => "red"},
            record! {"id" => 3, "name" => "c"},
        ]
    );
}

#[test]
fn merge_example_duplicates_in_one_input() {
    let a = list![record! {"id" => 1, "x" => 1}, record! {"id" => 1, "y" => 2}];
    let out = registry()
        .invoke("lists_mergeby", &[a, list![], Value::from("id")])
        .unwrap();
    assert_eq!(out, list![record! {"id" => 1, "x" => 1, "y" => 2}]);
}

#[test]
fn split_period_example() {
    let out = registry()
        .invoke("split_period", &[list![1, 2, 3, 4, 5], Value::Integer(2)])
        .unwrap();
    assert_eq!(out, list![list![1, 2], list![3, 4], list![5]]);
}

#[test]
fn select_by_bool_mask_example() {
    let reg = registry();
    let mask = list![true, false, true];
    let values = list![10, 20, 30];
    assert_eq!(
        reg.invoke("select_by_bool_mask", &[mask.clone(), values.clone()])
            .unwrap(),
        list![10, 30]
    );
    let negated = CallArgs::new([mask, values]).with_keyword("negate", true);
    assert_eq!(
        reg.invoke_with("select_by_bool_mask", negated).unwrap(),
        list![20]
    );
}

#[test]
fn remove_absent_value_fails() {
    let err = registry()
        .invoke("remove", &[list![1, 2, 3], Value::Integer(9)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
}

#[test]
fn remove_value_defaults_to_empty_string() {
    let reg = registry();
    assert_eq!(
        reg.invoke("remove", &[list!["a", "", "b"]]).unwrap(),
        list!["a", "b"]
    );
    let err = reg.invoke("list_remove", &[list![1, 2]]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
}

#[test]
fn unknown_operation() {
    let err = registry().invoke("list_test", &[list![]]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownOperation);

    let err = registry().invoke("sort_by_kye", &[list![]]).unwrap_err();
    assert!(err
        .suggestions()
        .iter()
        .any(|s| s.contains("sort_by_key")));
}

#[test]
fn legacy_names_dispatch_to_the_same_operation() {
    let reg = registry();
    let rows = list![record! {"n" => 2}, record! {"n" => 1}];
    assert_eq!(
        reg.invoke("list_sort_dict", &[rows.clone(), Value::from("n")])
            .unwrap(),
        reg.invoke("sort_by_key", &[rows, Value::from("n")]).unwrap()
    );
    assert_eq!(
        reg.invoke("list_range", &[list![0, 3]]).unwrap(),
        list![0, 1, 2]
    );
}

#[test]
fn inputs_are_never_mutated() {
    let reg = registry();
    let input = list![3, 1, 2];
    for (name, extra) in [
        ("append", vec![Value::Integer(4)]),
        ("insert", vec![Value::Integer(0), Value::Integer(9)]),
        ("remove", vec![Value::Integer(1)]),
        ("pop", vec![]),
        ("sort", vec![]),
        ("reverse", vec![]),
        ("clear", vec![]),
    ] {
        let mut args = vec![input.clone()];
        args.extend(extra);
        reg.invoke(name, &args).unwrap();
        assert_eq!(input, list![3, 1, 2], "{} changed its input", name);
    }
}

#[test]
fn arity_and_type_errors_are_invalid_argument() {
    let reg = registry();
    for (name, args) in [
        ("append", vec![]),
        ("count", vec![list![1]]),
        ("zip", vec![list![1], Value::Integer(1)]),
        ("clear", vec![list![], list![]]),
        ("range", vec![]),
        ("range", vec![Value::Integer(0), Value::Integer(5), Value::Integer(0)]),
        ("split_period", vec![list![1], Value::Integer(-1)]),
        ("search", vec![list!["a"], Value::from("[")]),
        ("lists_mergeby", vec![list![], list![]]),
        ("lists_mergeby", vec![list![], Value::Nil, Value::from("k")]),
    ] {
        let err = reg.invoke(name, &args).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::InvalidArgument,
            "{} with {:?}",
            name,
            args
        );
        assert!(err.operation().is_some());
    }
}

#[test]
fn keyword_binding_errors() {
    let reg = registry();
    let dup = CallArgs::new([list![1], Value::Integer(0)]).with_keyword("index", 1);
    assert_eq!(
        reg.invoke_with("pop", dup).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    let unknown = CallArgs::new([list![1]]).with_keyword("idx", 0);
    assert_eq!(
        reg.invoke_with("pop", unknown).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn unordered_merge_key_is_reported() {
    let err = registry()
        .invoke(
            "lists_mergeby",
            &[
                list![record! {"k" => 1}],
                list![record! {"k" => "1"}],
                Value::from("k"),
            ],
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnorderedMergeKey);
    assert_eq!(err.operation(), Some("lists_mergeby"));
    assert!(err.full().contains("= help:"));
}

#[test]
fn wrapper_with_host_function() {
    let join = Value::Function(NativeFunc::new("join", |args: &[Value]| {
        Ok(Value::String(
            args.iter()
                .map(Value::to_plain_string)
                .collect::<Vec<_>>()
                .join("-"),
        ))
    }));
    let reg = registry();
    assert_eq!(
        reg.invoke("wrapper", &[list!["a", 1], join.clone()]).unwrap(),
        Value::from("a-1")
    );
    assert_eq!(
        reg.invoke("wrapper_comp", &[list!["a", "b"], join]).unwrap(),
        list!["a", "-", "b"]
    );
}

#[test]
fn search_uses_config_cache() {
    let reg = registry();
    let items = list!["web01", "web02", "db01"];
    assert_eq!(
        reg.invoke("search", &[items.clone(), Value::from("web")])
            .unwrap(),
        list!["web01", "web02"]
    );
    reg.invoke("search", &[items, Value::from("web")]).unwrap();
    assert_eq!(reg.context().regex_cache.len(), 1);

    let mut config = RegistryConfig::default();
    config.search.cache_patterns = false;
    let uncached = Registry::with_config(&config);
    uncached
        .invoke("search", &[list!["a"], Value::from("a")])
        .unwrap();
    assert!(uncached.context().regex_cache.is_empty());
}

#[test]
fn registry_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list-ops.toml");
    std::fs::write(&path, "[registry]\nlegacy_names = false\n").unwrap();

    let config = RegistryConfig::load(&path).unwrap();
    let reg = Registry::with_config(&config);
    assert!(reg.invoke("list_copy", &[list![]]).is_err());
    assert_eq!(reg.invoke("copy", &[list![1]]).unwrap(), list![1]);
}

#[cfg(feature = "format-json")]
#[test]
fn json_values_round_through_merge() {
    let a = Value::from_json(serde_json::json!([{"id": 2, "a": true}, {"id": 1}]));
    let b = Value::from_json(serde_json::json!([{"id": 2.0, "b": null}]));
    let out = registry()
        .invoke("lists_mergeby", &[a, b, Value::from("id")])
        .unwrap();
    assert_eq!(
        out.to_json(),
        serde_json::json!([{"id": 1}, {"id": 2.0, "a": true, "b": null}])
    );

    let err = registry().invoke("pop", &[list![]]).unwrap_err();
    assert_eq!(err.to_json()["kind"], "OperationFailed");
}
