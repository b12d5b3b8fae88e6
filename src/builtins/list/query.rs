//! リスト操作 - 検索・集計

use crate::builtins::value_helpers::{clamp_bound, get_list_arg, get_opt_int_arg};
use crate::error::ListError;
use crate::value::Value;

/// index - 値の最初の出現位置を返す（見つからなければ-1）
///
/// start/end はスライスと同じ規則で解釈し、返す位置はコレクション全体での位置。
pub fn native_index(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "index", "list")?;
    let target = args.get(1).unwrap_or(&Value::Nil);
    let len = items.len();

    let start = get_opt_int_arg(args, 2, "index", "start")?.map_or(0, |i| clamp_bound(i, len));
    let end = get_opt_int_arg(args, 3, "index", "end")?.map_or(len, |i| clamp_bound(i, len));

    if start >= end {
        return Ok(Value::Integer(-1));
    }

    let found = items
        .iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .find(|(_, item)| *item == target)
        .map_or(-1, |(i, _)| i as i64);

    Ok(Value::Integer(found))
}

/// count - 値の出現回数
pub fn native_count(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "count", "list")?;
    let target = args.get(1).unwrap_or(&Value::Nil);
    let n = items.iter().filter(|item| *item == target).count();
    Ok(Value::Integer(n as i64))
}
