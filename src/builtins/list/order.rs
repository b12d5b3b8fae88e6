//! リスト操作 - 並べ替え
//!
//! すべて安定ソート。比較不能な値が混在する場合は OperationFailed。

use crate::builtins::value_helpers::{
    element_as_record, get_bool_arg, get_list_arg, get_string_ref, resolve_index,
};
use crate::error::{render_value, ListError};
use crate::i18n::{fmt_msg, MsgKey};
use crate::value::{sort_naturally, Collection, Value};

/// キーと要素のペアをキーの自然順序で並べ替える
fn sort_decorated(
    op: &str,
    mut pairs: Vec<(Value, Value)>,
    reverse: bool,
) -> Result<Value, ListError> {
    sort_naturally(&mut pairs, |(key, _)| key, reverse).map_err(|pair| {
        ListError::operation_failed(
            op,
            fmt_msg(
                MsgKey::Unorderable,
                &[op, &render_value(&pair.left), &render_value(&pair.right)],
            ),
        )
    })?;
    Ok(Value::List(pairs.into_iter().map(|(_, item)| item).collect()))
}

/// sort - 自然順序で並べ替え（keyに関数を渡すと各要素に適用した結果で比較）
pub fn native_sort(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "sort", "list")?;
    let reverse = get_bool_arg(args, 2, "sort", "reverse", false)?;

    let pairs = match args.get(1) {
        None | Some(Value::Nil) => items.iter().map(|v| (v.clone(), v.clone())).collect(),
        Some(Value::Function(f)) => items
            .iter()
            .map(|item| {
                f.call(std::slice::from_ref(item))
                    .map(|key| (key, item.clone()))
                    .map_err(|e| ListError::function_failed("sort", &f.name, &e))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ListError::type_mismatch(
                "sort",
                1,
                "key",
                "a function or nil",
                other,
            ))
        }
    };

    sort_decorated("sort", pairs, reverse)
}

/// sort_by_index - 各要素の `element[index]` で並べ替え
///
/// 整数indexはリスト要素（負は末尾から）、文字列indexはマップ要素のフィールド。
pub fn native_sort_by_index(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "sort_by_index", "list")?;
    let index = args.get(1).unwrap_or(&Value::Nil);
    if !matches!(index, Value::Integer(_) | Value::String(_)) {
        return Err(ListError::type_mismatch(
            "sort_by_index",
            1,
            "index",
            "an integer or a string",
            index,
        ));
    }
    let reverse = get_bool_arg(args, 2, "sort_by_index", "reverse", false)?;

    let pairs = items
        .iter()
        .enumerate()
        .map(|(i, item)| Ok((lookup("sort_by_index", i, item, index)?, item.clone())))
        .collect::<Result<Vec<_>, ListError>>()?;

    sort_decorated("sort_by_index", pairs, reverse)
}

/// 要素から添字で値を取り出す
fn lookup(op: &str, element: usize, item: &Value, index: &Value) -> Result<Value, ListError> {
    match (item, index) {
        (Value::List(inner), Value::Integer(i)) => resolve_index(*i, inner.len())
            .map(|at| inner[at].clone())
            .ok_or_else(|| {
                ListError::operation_failed(
                    op,
                    fmt_msg(
                        MsgKey::IndexOutOfRange,
                        &[op, &i.to_string(), &inner.len().to_string()],
                    ),
                )
            }),
        (Value::Map(fields), Value::String(name)) => {
            fields.get(name).cloned().ok_or_else(|| {
                ListError::operation_failed(
                    op,
                    fmt_msg(MsgKey::FieldNotFound, &[op, &element.to_string(), name]),
                )
            })
        }
        _ => Err(ListError::operation_failed(
            op,
            fmt_msg(
                MsgKey::NotIndexable,
                &[
                    op,
                    &element.to_string(),
                    item.type_name(),
                    &render_value(index),
                ],
            ),
        )),
    }
}

/// sort_by_key - マップ要素の指定フィールドで並べ替え
pub fn native_sort_by_key(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "sort_by_key", "list")?;
    let attribute = get_string_ref(args, 1, "sort_by_key", "attribute")?;
    let reverse = get_bool_arg(args, 2, "sort_by_key", "reverse", false)?;

    let mut pairs = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let fields = element_as_record(item, i, "sort_by_key", 0)?;
        let key = fields.get(attribute).cloned().ok_or_else(|| {
            ListError::operation_failed(
                "sort_by_key",
                fmt_msg(
                    MsgKey::FieldNotFound,
                    &["sort_by_key", &i.to_string(), attribute],
                ),
            )
        })?;
        pairs.push((key, item.clone()));
    }

    sort_decorated("sort_by_key", pairs, reverse)
}

/// reverse - 逆順
pub fn native_reverse(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "reverse", "list")?;
    Ok(Value::List(items.iter().rev().cloned().collect()))
}

/// copy - 浅いコピー（構造共有なのでO(1)）
pub fn native_copy(args: &[Value]) -> Result<Value, ListError> {
    let items: &Collection = get_list_arg(args, 0, "copy", "list")?;
    Ok(Value::List(items.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::NativeFunc;
    use crate::{list, record};

    #[test]
    fn test_sort_natural_and_reverse() {
        let input = list![3, 1.5, 2];
        assert_eq!(native_sort(&[input.clone()]).unwrap(), list![1.5, 2, 3]);
        assert_eq!(
            native_sort(&[input.clone(), Value::Nil, Value::Bool(true)]).unwrap(),
            list![3, 2, 1.5]
        );
        assert_eq!(input, list![3, 1.5, 2]);
    }

    #[test]
    fn test_sort_with_key_function() {
        let neg = NativeFunc::new("neg", |args: &[Value]| match args.first() {
            Some(Value::Integer(n)) => Ok(Value::Integer(-n)),
            _ => Err("expected integer".to_string()),
        });
        let result = native_sort(&[list![1, 3, 2], Value::Function(neg.clone())]).unwrap();
        assert_eq!(result, list![3, 2, 1]);

        let err = native_sort(&[list![1, "x"], Value::Function(neg)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
    }

    #[test]
    fn test_sort_incomparable() {
        let err = native_sort(&[list![1, "a"]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
        assert_eq!(err.operation(), Some("sort"));
    }

    #[test]
    fn test_sort_nan_among_many_floats() {
        let mut items: Vec<Value> = (0..40)
            .map(|i| Value::Float(((i * 37) % 97) as f64))
            .collect();
        items.insert(3, Value::Float(f64::NAN));
        items.insert(31, Value::Float(f64::NAN));
        for reverse in [false, true] {
            let args = [Value::from(items.clone()), Value::Nil, Value::Bool(reverse)];
            let err = native_sort(&args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OperationFailed);
        }
    }

    #[test]
    fn test_sort_mixed_types_many() {
        let items: Vec<Value> = (0..45)
            .map(|i| match i % 3 {
                0 => Value::Integer(i),
                1 => Value::from(format!("s{}", i)),
                _ => Value::Float(f64::NAN),
            })
            .collect();
        let err = native_sort(&[Value::from(items)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
    }

    #[test]
    fn test_sort_many_mixed_numbers() {
        let items: Vec<Value> = (0..60)
            .map(|i| {
                if i % 2 == 0 {
                    Value::Integer((i * 7919) % 101)
                } else {
                    Value::Float(((i * 31) % 89) as f64 - 0.5)
                }
            })
            .collect();
        let Value::List(sorted) = native_sort(&[Value::from(items)]).unwrap() else {
            panic!("expected list");
        };
        assert_eq!(sorted.len(), 60);
        assert!(sorted
            .iter()
            .zip(sorted.iter().skip(1))
            .all(|(a, b)| a.natural_cmp(b) != Some(std::cmp::Ordering::Greater)));
    }

    #[test]
    fn test_sort_by_key_nan_among_many_records() {
        let mut rows: Vec<Value> = (0..35).map(|i| record! {"v" => i as f64}).collect();
        rows.insert(17, record! {"v" => f64::NAN});
        let err = native_sort_by_key(&[Value::from(rows), Value::from("v")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
    }

    #[test]
    fn test_sort_by_index_lists() {
        let rows = list![list!["b", 2], list!["a", 1], list!["c", 0]];
        assert_eq!(
            native_sort_by_index(&[rows.clone(), Value::Integer(1)]).unwrap(),
            list![list!["c", 0], list!["a", 1], list!["b", 2]]
        );
        assert_eq!(
            native_sort_by_index(&[rows, Value::Integer(0), Value::Bool(true)]).unwrap(),
            list![list!["c", 0], list!["b", 2], list!["a", 1]]
        );
    }

    #[test]
    fn test_sort_by_index_missing() {
        let err = native_sort_by_index(&[list![list![1], list![]], Value::Integer(0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);

        let err = native_sort_by_index(&[list![1], Value::Float(0.0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_sort_by_key_stable() {
        let rows = list![
            record! {"n" => 2, "tag" => "first"},
            record! {"n" => 1},
            record! {"n" => 2, "tag" => "second"},
        ];
        let sorted = native_sort_by_key(&[rows, Value::from("n")]).unwrap();
        assert_eq!(
            sorted,
            list![
                record! {"n" => 1},
                record! {"n" => 2, "tag" => "first"},
                record! {"n" => 2, "tag" => "second"},
            ]
        );
    }

    #[test]
    fn test_sort_by_key_missing_field() {
        let rows = list![record! {"n" => 1}, record! {"m" => 2}];
        let err = native_sort_by_key(&[rows, Value::from("n")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
    }

    #[test]
    fn test_reverse_and_copy() {
        assert_eq!(native_reverse(&[list![1, 2, 3]]).unwrap(), list![3, 2, 1]);
        assert_eq!(native_copy(&[list![1, 2]]).unwrap(), list![1, 2]);
    }
}
