//! Value型の抽出・変換ヘルパー関数
//!
//! オペレーションでの引数の型チェックとデータ抽出を統一するヘルパー関数群。
//! エラーには常にオペレーション名・引数位置・パラメータ名を含める。

use crate::error::{ArgumentRef, ErrorCode, ListError};
use crate::i18n::{fmt_msg, MsgKey};
use crate::value::{Collection, NativeFunc, Record, Value};

/// 引数からList型を抽出
///
/// # 使用例
///
/// ```
/// use list_ops::value::Value;
/// use list_ops::builtins::value_helpers::get_list_arg;
///
/// let args = vec![Value::from(vec![Value::Integer(1)])];
/// let items = get_list_arg(&args, 0, "append", "list").unwrap();
/// assert_eq!(items.len(), 1);
/// ```
pub fn get_list_arg<'a>(
    args: &'a [Value],
    idx: usize,
    op: &str,
    param: &str,
) -> Result<&'a Collection, ListError> {
    match args.get(idx) {
        Some(Value::List(items)) => Ok(items),
        other => Err(mismatch(op, idx, param, "a list", other)),
    }
}

/// 引数からInteger型を抽出
pub fn get_int_arg(args: &[Value], idx: usize, op: &str, param: &str) -> Result<i64, ListError> {
    match args.get(idx) {
        Some(Value::Integer(n)) => Ok(*n),
        other => Err(mismatch(op, idx, param, "an integer", other)),
    }
}

/// 省略可能なInteger引数を抽出（未指定またはnilはNone）
pub fn get_opt_int_arg(
    args: &[Value],
    idx: usize,
    op: &str,
    param: &str,
) -> Result<Option<i64>, ListError> {
    match args.get(idx) {
        None | Some(Value::Nil) => Ok(None),
        Some(Value::Integer(n)) => Ok(Some(*n)),
        other => Err(mismatch(op, idx, param, "an integer", other)),
    }
}

/// 引数からString型の参照を抽出（クローンなし）
pub fn get_string_ref<'a>(
    args: &'a [Value],
    idx: usize,
    op: &str,
    param: &str,
) -> Result<&'a str, ListError> {
    match args.get(idx) {
        Some(Value::String(s)) => Ok(s.as_str()),
        other => Err(mismatch(op, idx, param, "a string", other)),
    }
}

/// 省略可能なBool引数を抽出（未指定またはnilはdefault）
pub fn get_bool_arg(
    args: &[Value],
    idx: usize,
    op: &str,
    param: &str,
    default: bool,
) -> Result<bool, ListError> {
    match args.get(idx) {
        None | Some(Value::Nil) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        other => Err(mismatch(op, idx, param, "a boolean", other)),
    }
}

/// 引数から関数を抽出
pub fn get_function_arg<'a>(
    args: &'a [Value],
    idx: usize,
    op: &str,
    param: &str,
) -> Result<&'a NativeFunc, ListError> {
    match args.get(idx) {
        Some(Value::Function(f)) => Ok(f),
        other => Err(mismatch(op, idx, param, "a function", other)),
    }
}

/// 省略可能な引数を取得（未指定はdefault）
pub fn get_arg_or(args: &[Value], idx: usize, default: Value) -> Value {
    args.get(idx).cloned().unwrap_or(default)
}

/// コレクション要素をレコードとして参照
pub fn element_as_record<'a>(
    item: &'a Value,
    element: usize,
    op: &str,
    arg_idx: usize,
) -> Result<&'a Record, ListError> {
    item.as_record()
        .ok_or_else(|| element_mismatch(op, element, arg_idx, "a map", item))
}

/// コレクション要素の型の不一致
pub fn element_mismatch(
    op: &str,
    element: usize,
    arg_idx: usize,
    expected: &str,
    item: &Value,
) -> ListError {
    ListError::new(
        ErrorCode::E0101,
        fmt_msg(
            MsgKey::ElementMustBeType,
            &[
                op,
                &element.to_string(),
                &(arg_idx + 1).to_string(),
                expected,
                item.type_name(),
            ],
        ),
    )
    .with_operation(op)
    .with_argument(ArgumentRef::new(arg_idx, "element", item))
}

/// Python風の負インデックスを正規化（範囲外はNone）
pub fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let resolved = if index < 0 { index + len } else { index };
    (0..len).contains(&resolved).then_some(resolved as usize)
}

/// スライス境界を正規化（範囲外は両端にクランプ）
pub fn clamp_bound(index: i64, len: usize) -> usize {
    let len = len as i64;
    let resolved = if index < 0 { index + len } else { index };
    resolved.clamp(0, len) as usize
}

fn mismatch(
    op: &str,
    idx: usize,
    param: &str,
    expected: &str,
    actual: Option<&Value>,
) -> ListError {
    ListError::type_mismatch(op, idx, param, expected, actual.unwrap_or(&Value::Nil))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_get_list_arg() {
        let args = vec![Value::from(vec![Value::Integer(1)]), Value::Integer(42)];

        assert_eq!(get_list_arg(&args, 0, "test", "list").unwrap().len(), 1);

        let err = get_list_arg(&args, 1, "test", "list").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.argument().unwrap().position, 1);

        assert!(get_list_arg(&args, 2, "test", "list").is_err());
    }

    #[test]
    fn test_get_opt_int_arg() {
        let args = vec![Value::Integer(3), Value::Nil, Value::from("x")];
        assert_eq!(get_opt_int_arg(&args, 0, "test", "i").unwrap(), Some(3));
        assert_eq!(get_opt_int_arg(&args, 1, "test", "i").unwrap(), None);
        assert_eq!(get_opt_int_arg(&args, 5, "test", "i").unwrap(), None);
        assert!(get_opt_int_arg(&args, 2, "test", "i").is_err());
    }

    #[test]
    fn test_get_bool_arg_default() {
        let args = vec![Value::Bool(true)];
        assert!(get_bool_arg(&args, 0, "test", "reverse", false).unwrap());
        assert!(!get_bool_arg(&args, 1, "test", "reverse", false).unwrap());
        assert!(get_bool_arg(&[Value::Integer(1)], 0, "test", "reverse", false).is_err());
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(0, 3), Some(0));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(3, 3), None);
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(0, 0), None);
    }

    #[test]
    fn test_clamp_bound() {
        assert_eq!(clamp_bound(-1, 5), 4);
        assert_eq!(clamp_bound(-10, 5), 0);
        assert_eq!(clamp_bound(10, 5), 5);
    }
}
