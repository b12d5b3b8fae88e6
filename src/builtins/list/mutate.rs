//! リスト操作 - 要素の追加・削除
//!
//! 入力は変更せず、常に操作後の新しいコレクションを返す。

use crate::builtins::value_helpers::{
    clamp_bound, get_arg_or, get_int_arg, get_list_arg, get_opt_int_arg, resolve_index,
};
use crate::error::{render_value, ListError};
use crate::i18n::{fmt_msg, MsgKey};
use crate::value::{Collection, Value};

/// append - 末尾に値を追加（値の既定は空文字列）
pub fn native_append(args: &[Value]) -> Result<Value, ListError> {
    let mut items = get_list_arg(args, 0, "append", "list")?.clone();
    items.push_back(get_arg_or(args, 1, Value::String(String::new())));
    Ok(Value::List(items))
}

/// extend - 末尾に別のコレクションを連結
pub fn native_extend(args: &[Value]) -> Result<Value, ListError> {
    let mut items = get_list_arg(args, 0, "extend", "list")?.clone();
    if args.len() > 1 {
        items.append(get_list_arg(args, 1, "extend", "other")?.clone());
    }
    Ok(Value::List(items))
}

/// insert - 指定位置に値を挿入
///
/// 負のインデックスは末尾から数え、範囲外は両端にクランプする。
pub fn native_insert(args: &[Value]) -> Result<Value, ListError> {
    let mut items = get_list_arg(args, 0, "insert", "list")?.clone();
    let index = match args.get(1) {
        None | Some(Value::Nil) => 0,
        Some(_) => get_int_arg(args, 1, "insert", "index")?,
    };
    let value = get_arg_or(args, 2, Value::String(String::new()));

    let at = clamp_bound(index, items.len());
    items.insert(at, value);
    Ok(Value::List(items))
}

/// remove - 最初に出現した値を削除（存在しなければ失敗）
pub fn native_remove(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "remove", "list")?;
    let target = get_arg_or(args, 1, Value::String(String::new()));

    let position = items.iter().position(|item| *item == target).ok_or_else(|| {
        ListError::operation_failed(
            "remove",
            fmt_msg(MsgKey::ValueNotFound, &["remove", &render_value(&target)]),
        )
    })?;

    let mut items = items.clone();
    items.remove(position);
    Ok(Value::List(items))
}

/// pop - 指定位置（既定は末尾）の要素を取り出して返す
pub fn native_pop(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "pop", "list")?;
    if items.is_empty() {
        return Err(ListError::operation_failed(
            "pop",
            fmt_msg(MsgKey::PopFromEmpty, &["pop"]),
        ));
    }

    let index = get_opt_int_arg(args, 1, "pop", "index")?.unwrap_or(-1);
    let at = resolve_index(index, items.len()).ok_or_else(|| {
        ListError::operation_failed(
            "pop",
            fmt_msg(
                MsgKey::IndexOutOfRange,
                &["pop", &index.to_string(), &items.len().to_string()],
            ),
        )
    })?;

    Ok(items[at].clone())
}

/// clear - 空のコレクションを返す
pub fn native_clear(args: &[Value]) -> Result<Value, ListError> {
    get_list_arg(args, 0, "clear", "list")?;
    Ok(Value::List(Collection::new()))
}
