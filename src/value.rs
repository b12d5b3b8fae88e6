//! 値モデル
//!
//! ホストから渡される動的な値を表現する。
//! - `List` はコレクション（im::Vectorで構造共有、clone()はO(1)）
//! - `Map` はレコード（キー順序付きのim::OrdMap、フィールド挿入順に依存しない）
//! - `Function` / `Stream` は wrapper 系オペレーション用

use im::{OrdMap, Vector};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// コレクション（順序付きシーケンス）
pub type Collection = Vector<Value>;

/// レコード（文字列キー → 任意の値）
pub type Record = OrdMap<String, Value>;

/// ネイティブ関数の本体
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync;

/// 動的な値
#[derive(Debug, Clone)]
pub enum Value {
    /// nil値（None/null）
    Nil,
    /// bool値
    Bool(bool),
    /// 整数
    Integer(i64),
    /// 浮動小数点数
    Float(f64),
    /// 文字列
    String(String),
    /// リスト
    List(Collection),
    /// マップ（レコード）
    Map(Record),
    /// ホストが渡すネイティブ関数
    Function(NativeFunc),
    /// ストリーム（遅延評価）
    Stream(Arc<RwLock<Stream>>),
}

/// ネイティブ関数
#[derive(Clone)]
pub struct NativeFunc {
    pub name: String,
    pub func: Arc<NativeFn>,
}

impl NativeFunc {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        NativeFunc {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// 関数を呼び出す
    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.func)(args)
    }
}

impl PartialEq for NativeFunc {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for NativeFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunc({})", self.name)
    }
}

/// ストリーム（遅延評価）
///
/// `next_fn` が `None` を返した時点で終端。
pub struct Stream {
    pub next_fn: Box<dyn FnMut() -> Option<Value> + Send + Sync>,
}

impl Stream {
    pub fn new<F>(next_fn: F) -> Self
    where
        F: FnMut() -> Option<Value> + Send + Sync + 'static,
    {
        Stream {
            next_fn: Box::new(next_fn),
        }
    }

    /// 残りの要素をすべて取り出す
    pub fn drain(&mut self) -> Collection {
        let mut items = Vector::new();
        while let Some(item) = (self.next_fn)() {
            items.push_back(item);
        }
        items
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream {{ next_fn: <closure> }}")
    }
}

/// マージ時のグループ化キー
///
/// 整数値と等しい浮動小数点数は整数として扱う（1 と 1.0 は同じグループ）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Nil,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
    List(Vec<GroupKey>),
}

const I64_MIN_F: f64 = -9_223_372_036_854_775_808.0;
const I64_MAX_F: f64 = 9_223_372_036_854_775_808.0;

/// 比較不能な値のペア（ソート失敗時に返す）
#[derive(Debug, Clone, PartialEq)]
pub struct Incomparable {
    pub left: Value,
    pub right: Value,
}

impl Value {
    /// 真偽値判定
    ///
    /// nil、false、0、0.0、空文字列、空リスト、空マップがfalsy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(m) => !m.is_empty(),
            Value::Function(_) | Value::Stream(_) => true,
        }
    }

    /// 型名を取得（エラーメッセージ用）
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Stream(_) => "stream",
        }
    }

    pub fn as_list(&self) -> Option<&Collection> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// 自然順序での比較
    ///
    /// 数値同士（整数/浮動小数点の混在可）、文字列同士、bool同士、
    /// リスト同士（辞書式）のみ比較可能。それ以外は `None`。
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Integer(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.natural_cmp(y)? {
                        Ordering::Equal => continue,
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// グループ化キーに変換（マップ/関数/ストリームは不可）
    pub fn group_key(&self) -> Option<GroupKey> {
        match self {
            Value::Nil => Some(GroupKey::Nil),
            Value::Bool(b) => Some(GroupKey::Bool(*b)),
            Value::Integer(n) => Some(GroupKey::Int(*n)),
            Value::Float(f) => {
                // i64の範囲内で小数部がない場合は整数と同一視
                if f.fract() == 0.0 && (I64_MIN_F..I64_MAX_F).contains(f) {
                    Some(GroupKey::Int(*f as i64))
                } else {
                    Some(GroupKey::Float(f.to_bits()))
                }
            }
            Value::String(s) => Some(GroupKey::Str(s.clone())),
            Value::List(items) => items
                .iter()
                .map(Value::group_key)
                .collect::<Option<Vec<_>>>()
                .map(GroupKey::List),
            Value::Map(_) | Value::Function(_) | Value::Stream(_) => None,
        }
    }

    /// マップのキー文字列に変換
    ///
    /// 文字列はそのまま、スカラー値は表示形式。コレクション等は不可。
    pub fn to_field_name(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Nil | Value::Bool(_) | Value::Integer(_) | Value::Float(_) => {
                Some(self.to_string())
            }
            _ => None,
        }
    }

    /// 文字列形式（文字列は引用符なし）
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// ストリーム値を作成
    pub fn stream<F>(next_fn: F) -> Value
    where
        F: FnMut() -> Option<Value> + Send + Sync + 'static,
    {
        Value::Stream(Arc::new(RwLock::new(Stream::new(next_fn))))
    }
}

/// 自然順序による安定ソート
///
/// 全順序 (`total_cmp`) で並べ替えた後、隣接ペアを `natural_cmp` で検査し、
/// 比較不能なペアがあれば最初の1組を `Err` で返す（このときの並びは不定）。
/// `reverse` でも等価な要素の相対順序は保たれる。
pub fn sort_naturally<T, F>(items: &mut [T], key: F, reverse: bool) -> Result<(), Incomparable>
where
    F: Fn(&T) -> &Value,
{
    items.sort_by(|a, b| {
        let ord = key(a).total_cmp(key(b));
        if reverse {
            ord.reverse()
        } else {
            ord
        }
    });
    match items
        .windows(2)
        .find(|pair| key(&pair[0]).natural_cmp(key(&pair[1])).is_none())
    {
        Some(pair) => Err(Incomparable {
            left: key(&pair[0]).clone(),
            right: key(&pair[1]).clone(),
        }),
        None => Ok(()),
    }
}

/// 整数と浮動小数点数を丸めずに比較（NaNは `None`）
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= I64_MAX_F {
        return Some(Ordering::Less);
    }
    if f < I64_MIN_F {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0f64.partial_cmp(&(f - whole)),
        ord => Some(ord),
    }
}

/// NaNを最大とする浮動小数点の全順序（-0.0と0.0は等価）
fn cmp_float_total(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// 型ごとの並び順（全順序の第1キー）
fn class_rank(value: &Value) -> u8 {
    match value {
        Value::Nil => 0,
        Value::Bool(_) => 1,
        Value::Integer(_) | Value::Float(_) => 2,
        Value::String(_) => 3,
        Value::List(_) => 4,
        Value::Map(_) => 5,
        Value::Function(_) => 6,
        Value::Stream(_) => 7,
    }
}

impl Value {
    /// 並べ替え用の全順序
    ///
    /// `natural_cmp` が `Some` を返すペアでは同じ結果になる。
    /// 比較不能なペアは型順 → NaN最大 → 関数/ストリームは等価 で決まる。
    pub(crate) fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => cmp_float_total(*a, *b),
            (Value::Integer(a), Value::Float(b)) => {
                cmp_int_float(*a, *b).unwrap_or(Ordering::Less)
            }
            (Value::Float(a), Value::Integer(b)) => cmp_int_float(*b, *a)
                .map(Ordering::reverse)
                .unwrap_or(Ordering::Greater),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Value::Map(a), Value::Map(b)) => a
                .iter()
                .zip(b.iter())
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| va.total_cmp(vb)))
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => class_rank(self).cmp(&class_rank(other)),
        }
    }
}

/// ValueのPartialEq実装（整数と浮動小数点は数値として比較、関数/ストリームはポインタ比較）
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                cmp_int_float(*a, *b) == Some(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Stream(a), Value::Stream(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\": {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Function(nf) => write!(f, "#<function:{}>", nf.name),
            Value::Stream(_) => write!(f, "#<stream>"),
        }
    }
}

// ========================================
// 変換
// ========================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }
}

impl From<Collection> for Value {
    fn from(items: Collection) -> Self {
        Value::List(items)
    }
}

impl From<Record> for Value {
    fn from(m: Record) -> Self {
        Value::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

#[cfg(feature = "format-json")]
impl Value {
    /// serde_json::Value から変換
    ///
    /// i64に収まる数値は整数、それ以外は浮動小数点数。
    pub fn from_json(json: serde_json::Value) -> Value {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Nil,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from_json).collect()),
            Json::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// serde_json::Value に変換（関数/ストリームはnull）
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Nil | Value::Function(_) | Value::Stream(_) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Integer(n) => Json::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(m) => Json::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}
