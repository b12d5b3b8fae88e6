//! リスト操作 - 変換関数

use crate::builtins::value_helpers::{
    element_as_record, get_bool_arg, get_int_arg, get_list_arg, get_string_ref,
};
use crate::error::{ArgumentRef, ErrorCode, ListError};
use crate::i18n::{fmt_msg, MsgKey};
use crate::value::{Collection, Record, Value};
use dashmap::DashMap;
use regex::Regex;

/// コンパイル済み正規表現のキャッシュ
///
/// `enabled` がfalseの場合は毎回コンパイルする。
#[derive(Debug)]
pub struct RegexCache {
    patterns: DashMap<String, Regex>,
    enabled: bool,
}

impl RegexCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            patterns: DashMap::new(),
            enabled,
        }
    }

    /// パターンを先頭アンカー付きでコンパイル
    pub fn compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        if self.enabled {
            if let Some(re) = self.patterns.get(pattern) {
                return Ok(re.clone());
            }
        }

        let re = Regex::new(&format!(r"\A(?:{})", pattern))?;
        if self.enabled {
            self.patterns.insert(pattern.to_string(), re.clone());
        }
        Ok(re)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// search - 文字列形式が先頭からパターンに一致する要素を抽出
pub fn native_search(args: &[Value], cache: &RegexCache) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "search", "list")?;
    let pattern = get_string_ref(args, 1, "search", "pattern")?;

    let re = cache.compile(pattern).map_err(|e| {
        ListError::invalid_value(
            "search",
            1,
            "pattern",
            &args[1],
            fmt_msg(MsgKey::InvalidRegex, &["search", &e.to_string()]),
        )
    })?;

    let matched = items
        .iter()
        .filter(|item| match item {
            Value::String(s) => re.is_match(s),
            other => re.is_match(&other.to_string()),
        })
        .cloned()
        .collect();
    Ok(Value::List(matched))
}

/// flatten - 1段階だけ平坦化（リスト以外の要素はそのまま）
pub fn native_flatten(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "flatten", "list")?;
    let mut flat = Collection::new();
    for item in items {
        match item {
            Value::List(inner) => flat.append(inner.clone()),
            other => flat.push_back(other.clone()),
        }
    }
    Ok(Value::List(flat))
}

/// zip - 2要素リストのリスト（短い方に合わせる）
pub fn native_zip(args: &[Value]) -> Result<Value, ListError> {
    let left = get_list_arg(args, 0, "zip", "list")?;
    let right = get_list_arg(args, 1, "zip", "other")?;
    let pairs = left
        .iter()
        .zip(right.iter())
        .map(|(a, b)| Value::List(vec![a.clone(), b.clone()].into()))
        .collect();
    Ok(Value::List(pairs))
}

/// 値をマップのキーに変換
fn field_name(op: &str, position: usize, value: &Value) -> Result<String, ListError> {
    value.to_field_name().ok_or_else(|| {
        ListError::new(
            ErrorCode::E0101,
            fmt_msg(MsgKey::InvalidMapKey, &[op, value.type_name()]),
        )
        .with_operation(op)
        .with_argument(ArgumentRef::new(position, "key", value))
    })
}

fn zip_to_record(op: &str, args: &[Value], keys_from_first: bool) -> Result<Value, ListError> {
    let left = get_list_arg(args, 0, op, "list")?;
    let right = get_list_arg(args, 1, op, "other")?;

    let mut record = Record::new();
    for (a, b) in left.iter().zip(right.iter()) {
        let (key, value, position) = if keys_from_first {
            (a, b, 0)
        } else {
            (b, a, 1)
        };
        record.insert(field_name(op, position, key)?, value.clone());
    }
    Ok(Value::Map(record))
}

/// dict_zip - `{a_i: b_i}`
pub fn native_dict_zip(args: &[Value]) -> Result<Value, ListError> {
    zip_to_record("dict_zip", args, true)
}

/// dict_zip_rev - `{b_i: a_i}`
pub fn native_dict_zip_rev(args: &[Value]) -> Result<Value, ListError> {
    zip_to_record("dict_zip_rev", args, false)
}

/// list_to_dict - 内側のレコード群を順に上書きマージして1レコードにする
pub fn native_list_to_dict(args: &[Value]) -> Result<Value, ListError> {
    let groups = get_list_arg(args, 0, "list_to_dict", "list")?;

    let mut out = Collection::new();
    for group in groups {
        let Value::List(records) = group else {
            return Err(ListError::type_mismatch(
                "list_to_dict",
                0,
                "list",
                "a list of lists",
                group,
            ));
        };
        let mut merged = Record::new();
        for (i, item) in records.iter().enumerate() {
            let fields = element_as_record(item, i, "list_to_dict", 0)?;
            merged = fields.clone().union(merged);
        }
        out.push_back(Value::Map(merged));
    }
    Ok(Value::List(out))
}

/// split_period - period個ずつに分割（最後は短くてよい）
pub fn native_split_period(args: &[Value]) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "split_period", "list")?;
    let period = get_int_arg(args, 1, "split_period", "period")?;
    if period <= 0 {
        return Err(ListError::invalid_value(
            "split_period",
            1,
            "period",
            &args[1],
            fmt_msg(MsgKey::MustBePositive, &["split_period", "period"]),
        ));
    }

    let period = period as usize;
    let mut rest = items.clone();
    let mut chunks = Collection::new();
    while !rest.is_empty() {
        let at = period.min(rest.len());
        let tail = rest.split_off(at);
        chunks.push_back(Value::List(rest));
        rest = tail;
    }
    Ok(Value::List(chunks))
}

/// select_by_bool_mask - マスクが真（negateなら偽）の位置の値を抽出
pub fn native_select_by_bool_mask(args: &[Value]) -> Result<Value, ListError> {
    let mask = get_list_arg(args, 0, "select_by_bool_mask", "mask")?;
    let values = get_list_arg(args, 1, "select_by_bool_mask", "values")?;
    let negate = get_bool_arg(args, 2, "select_by_bool_mask", "negate", false)?;

    let selected = mask
        .iter()
        .zip(values.iter())
        .filter(|(flag, _)| flag.is_truthy() != negate)
        .map(|(_, value)| value.clone())
        .collect();
    Ok(Value::List(selected))
}

/// range - 半開区間の整数列
///
/// `[start, stop, step]` 形式のリスト1つ、または1〜3個の整数を受け付ける。
pub fn native_range(args: &[Value]) -> Result<Value, ListError> {
    let params: Vec<Value> = match args {
        [Value::List(items)] => items.iter().cloned().collect(),
        _ => args.to_vec(),
    };
    if params.is_empty() || params.len() > 3 {
        return Err(ListError::arg_count(
            "range",
            fmt_msg(
                MsgKey::NeedArgsInRange,
                &["range", "1", "3", &params.len().to_string()],
            ),
        ));
    }

    let names: &[&str] = match params.len() {
        1 => &["stop"],
        2 => &["start", "stop"],
        _ => &["start", "stop", "step"],
    };
    let mut ints = [0i64; 3];
    for (i, name) in names.iter().enumerate() {
        ints[i] = get_int_arg(&params, i, "range", name)?;
    }
    let (start, stop, step) = match params.len() {
        1 => (0, ints[0], 1),
        2 => (ints[0], ints[1], 1),
        _ => (ints[0], ints[1], ints[2]),
    };
    if step == 0 {
        return Err(ListError::invalid_value(
            "range",
            2,
            "step",
            &params[2],
            fmt_msg(MsgKey::StepMustNotBeZero, &["range"]),
        ));
    }

    Ok(Value::List(range_values(start, stop, step)))
}

fn range_values(start: i64, stop: i64, step: i64) -> Collection {
    let mut out = Collection::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        out.push_back(Value::Integer(current));
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    out
}
