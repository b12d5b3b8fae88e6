//! リスト操作 - ホスト関数の適用
//!
//! コレクションの要素を位置引数に展開して関数を呼び出す。

use crate::builtins::value_helpers::{get_function_arg, get_list_arg};
use crate::error::ListError;
use crate::i18n::{fmt_msg, MsgKey};
use crate::value::{Collection, Value};

fn call_spread(op: &str, args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, op, "list")?;
    let func = get_function_arg(args, 1, op, "function")?;
    let spread: Vec<Value> = items.iter().cloned().collect();
    func.call(&spread)
        .map_err(|e| ListError::function_failed(op, &func.name, &e))
}

/// wrapper - `function(*collection)` の結果をそのまま返す
pub fn native_wrapper(args: &[Value]) -> Result<Value, ListError> {
    call_spread("wrapper", args)
}

/// wrapper_comp - `function(*collection)` の結果をリストに具体化
///
/// ストリームは読み切り、文字列は文字単位、マップはキーの列にする。
pub fn native_wrapper_comp(args: &[Value]) -> Result<Value, ListError> {
    let result = call_spread("wrapper_comp", args)?;
    let items: Collection = match result {
        Value::List(items) => items,
        Value::Stream(stream) => stream.write().drain(),
        Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
        Value::Map(fields) => fields.keys().map(|k| Value::String(k.clone())).collect(),
        other => {
            return Err(ListError::operation_failed(
                "wrapper_comp",
                fmt_msg(MsgKey::NotIterable, &["wrapper_comp", other.type_name()]),
            ))
        }
    };
    Ok(Value::List(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::NativeFunc;
    use crate::{list, record};

    fn sum() -> Value {
        Value::Function(NativeFunc::new("sum", |args: &[Value]| {
            args.iter().try_fold(0i64, |acc, v| match v {
                Value::Integer(n) => Ok(acc + n),
                other => Err(format!("cannot add {}", other.type_name())),
            })
            .map(Value::Integer)
        }))
    }

    fn counting_stream() -> Value {
        Value::Function(NativeFunc::new("upto", |args: &[Value]| {
            let limit = match args.first() {
                Some(Value::Integer(n)) => *n,
                _ => return Err("expected integer".to_string()),
            };
            let mut i = 0;
            Ok(Value::stream(move || {
                i += 1;
                (i <= limit).then_some(Value::Integer(i))
            }))
        }))
    }

    #[test]
    fn test_wrapper_spreads_arguments() {
        assert_eq!(
            native_wrapper(&[list![1, 2, 3], sum()]).unwrap(),
            Value::Integer(6)
        );
    }

    #[test]
    fn test_wrapper_function_failure() {
        let err = native_wrapper(&[list![1, "x"], sum()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
        assert!(err.message().contains("sum"));
    }

    #[test]
    fn test_wrapper_requires_function() {
        let err = native_wrapper(&[list![1], Value::from("sum")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_wrapper_comp_materializes_stream() {
        assert_eq!(
            native_wrapper_comp(&[list![3], counting_stream()]).unwrap(),
            list![1, 2, 3]
        );
    }

    #[test]
    fn test_wrapper_comp_iterables() {
        let chars = Value::Function(NativeFunc::new("id", |args: &[Value]| {
            Ok(args.first().cloned().unwrap_or(Value::Nil))
        }));
        assert_eq!(
            native_wrapper_comp(&[list!["ab"], chars.clone()]).unwrap(),
            list!["a", "b"]
        );
        assert_eq!(
            native_wrapper_comp(&[list![record! {"k" => 1}], chars.clone()]).unwrap(),
            list!["k"]
        );
        let err = native_wrapper_comp(&[list![1], chars]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OperationFailed);
    }
}
