//! キー付きマージ
//!
//! レコードのコレクション群を共有キーでグループ化し、
//! 同じキーのレコードをフィールド単位で後勝ちマージして、キーの昇順で返す。
//!
//! - キーを持たないレコードは黙って除外
//! - 1 と 1.0 は同じグループ、nil は nil 同士でまとまる
//! - キーの値が比較不能なら `MergeError::Unordered`
//!
//! レジストリとは独立して使える。

use crate::builtins::value_helpers::element_mismatch;
use crate::error::ListError;
use crate::i18n::{fmt_msg, msg, MsgKey};
use crate::value::{sort_naturally, Collection, GroupKey, Record, Value};
use crate::{new_hashmap, HashMap};
use std::fmt;

/// マージの失敗
#[derive(Debug, Clone, PartialEq)]
pub enum MergeError {
    /// 入力の要素がレコードでない
    NotRecord {
        input: usize,
        element: usize,
        value: Value,
    },
    /// キーの値がグループ化できない型
    Unhashable { key: String, value: Value },
    /// キーの値同士が比較不能
    Unordered {
        key: String,
        left: Value,
        right: Value,
    },
}

impl MergeError {
    /// オペレーション名を付けて ListError に変換
    pub fn into_list_error(self, op: &str) -> ListError {
        match self {
            MergeError::NotRecord {
                input,
                element,
                value,
            } => element_mismatch(op, element, input, "a map", &value),
            MergeError::Unhashable { key, value } => ListError::operation_failed(
                op,
                fmt_msg(
                    MsgKey::UnhashableMergeKey,
                    &[op, &key, value.type_name()],
                ),
            )
            .with_help(msg(MsgKey::HelpMergeKeyTypes)),
            MergeError::Unordered { key, left, right } => {
                ListError::unordered_merge_key(op, &key, &left, &right)
            }
        }
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clone().into_list_error("merge_by").message())
    }
}

impl std::error::Error for MergeError {}

/// マージの途中状態（1回のマージ呼び出しに閉じる）
#[derive(Debug, Clone)]
pub struct MergeAccumulator {
    key: String,
    index: HashMap<GroupKey, usize>,
    entries: Vec<(Value, Record)>,
    skipped: usize,
}

impl MergeAccumulator {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            index: new_hashmap(),
            entries: Vec::new(),
            skipped: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// グループ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キーがなく除外されたレコード数
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// レコードを取り込む（キーがなければfalse）
    pub fn absorb(&mut self, record: &Record) -> Result<bool, MergeError> {
        let Some(key_value) = record.get(&self.key) else {
            self.skipped += 1;
            return Ok(false);
        };
        let group = key_value.group_key().ok_or_else(|| MergeError::Unhashable {
            key: self.key.clone(),
            value: key_value.clone(),
        })?;

        match self.index.get(&group).copied() {
            Some(slot) => {
                let (current_key, merged) = &mut self.entries[slot];
                for (field, value) in record {
                    merged.insert(field.clone(), value.clone());
                }
                *current_key = key_value.clone();
            }
            None => {
                self.index.insert(group, self.entries.len());
                self.entries.push((key_value.clone(), record.clone()));
            }
        }
        Ok(true)
    }

    /// キーの自然順序で並べた結果を返す
    pub fn finish(self) -> Result<Collection, MergeError> {
        let MergeAccumulator { key, mut entries, .. } = self;
        sort_naturally(&mut entries, |(k, _)| k, false).map_err(|pair| {
            MergeError::Unordered {
                key: key.clone(),
                left: pair.left,
                right: pair.right,
            }
        })?;
        Ok(entries
            .into_iter()
            .map(|(_, record)| Value::Map(record))
            .collect())
    }
}

/// 複数のコレクションを引数順にマージ
///
/// # 使用例
///
/// ```
/// use list_ops::{list, record};
/// use list_ops::merge::merge_by;
///
/// let l1 = list![record! {"id" => 2, "a" => 1}, record! {"id" => 1, "a" => 2}];
/// let l2 = list![record! {"id" => 1, "b" => 3}];
/// let merged = merge_by(&[l1.as_list().unwrap(), l2.as_list().unwrap()], "id").unwrap();
/// assert_eq!(merged[0], record! {"id" => 1, "a" => 2, "b" => 3});
/// ```
pub fn merge_by(inputs: &[&Collection], key: &str) -> Result<Collection, MergeError> {
    let mut acc = MergeAccumulator::new(key);
    for (input, items) in inputs.iter().enumerate() {
        for (element, item) in items.iter().enumerate() {
            let Value::Map(record) = item else {
                return Err(MergeError::NotRecord {
                    input,
                    element,
                    value: item.clone(),
                });
            };
            acc.absorb(record)?;
        }
    }

    tracing::trace!(
        key,
        inputs = inputs.len(),
        skipped = acc.skipped(),
        groups = acc.len(),
        "merge accumulated"
    );

    acc.finish()
}

/// lists_mergeby - `(list1, list2, key)` または `(list1, ..., listN, key)`
pub fn native_lists_mergeby(args: &[Value]) -> Result<Value, ListError> {
    const OP: &str = "lists_mergeby";

    let (key_arg, list_args) = match args.split_last() {
        Some((key_arg, list_args)) if list_args.len() >= 2 => (key_arg, list_args),
        _ => {
            return Err(ListError::arg_count(
                OP,
                fmt_msg(
                    MsgKey::NeedAtLeastNArgs,
                    &[OP, "3", &args.len().to_string()],
                ),
            )
            .with_help(msg(MsgKey::HelpMergeArgs)))
        }
    };

    let mut inputs = Vec::with_capacity(list_args.len());
    for (position, arg) in list_args.iter().enumerate() {
        match arg {
            Value::List(items) => inputs.push(items),
            other => {
                let param = format!("list{}", position + 1);
                return Err(
                    ListError::type_mismatch(OP, position, &param, "a list", other)
                        .with_help(msg(MsgKey::HelpMergeArgs)),
                );
            }
        }
    }
    let Value::String(key) = key_arg else {
        return Err(ListError::type_mismatch(
            OP,
            list_args.len(),
            "key",
            "a string",
            key_arg,
        )
        .with_help(msg(MsgKey::HelpMergeArgs)));
    };

    merge_by(&inputs, key)
        .map(Value::List)
        .map_err(|e| e.into_list_error(OP))
}
