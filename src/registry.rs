//! オペレーションレジストリ
//!
//! 名前から `Operation` を引き、引数をシグネチャに束縛して呼び出す。
//! - 名前は完全一致（部分一致・大文字小文字の同一視はしない）
//! - 旧名（list_* 形式）も設定で有効化できる
//! - 未登録名には編集距離の近い候補をサジェスト
//!
//! 構築後は不変なので、スレッド間で共有できる。

use crate::builtins::list;
use crate::builtins::list::RegexCache;
use crate::config::RegistryConfig;
use crate::error::ListError;
use crate::i18n::{fmt_msg, MsgKey};
use crate::merge::native_lists_mergeby;
use crate::value::{Record, Value};
use crate::{new_hashmap, HashMap};
use smallvec::SmallVec;
use std::collections::BinaryHeap;

/// サジェスト候補とみなす最大編集距離
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// 登録されているオペレーション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Append,
    Extend,
    Insert,
    Remove,
    Pop,
    Clear,
    Index,
    Count,
    Sort,
    SortByIndex,
    SortByKey,
    Reverse,
    Copy,
    Search,
    Flatten,
    Sample,
    Zip,
    DictZip,
    DictZipRev,
    ListToDict,
    SplitPeriod,
    SelectByBoolMask,
    Range,
    Wrapper,
    WrapperComp,
    ListsMergeby,
}

/// パラメータ定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub required: bool,
}

const fn req(name: &'static str) -> Param {
    Param {
        name,
        required: true,
    }
}

const fn opt(name: &'static str) -> Param {
    Param {
        name,
        required: false,
    }
}

/// オペレーションのシグネチャ
///
/// 可変長のオペレーションは位置引数のみを受け付け、検証は本体に任せる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub params: &'static [Param],
    pub variadic: bool,
}

impl Signature {
    const fn fixed(params: &'static [Param]) -> Self {
        Self {
            params,
            variadic: false,
        }
    }

    const fn variadic() -> Self {
        Self {
            params: &[],
            variadic: true,
        }
    }

    /// 必須パラメータの数
    pub fn min_args(&self) -> usize {
        self.params.iter().filter(|p| p.required).count()
    }

    /// 位置引数とキーワード引数をパラメータ順の引数列に束縛
    ///
    /// 途中の省略されたパラメータはnilで埋める。
    pub fn bind(&self, op: &str, call: &CallArgs) -> Result<SmallVec<[Value; 4]>, ListError> {
        if self.variadic {
            if let Some(name) = call.keyword.keys().next() {
                return Err(ListError::binding(
                    op,
                    fmt_msg(MsgKey::UnexpectedKeyword, &[op, name]),
                ));
            }
            return Ok(call.positional.iter().cloned().collect());
        }

        let given = call.positional.len();
        let max = self.params.len();
        if given > max {
            let min = self.min_args();
            let message = if min == max {
                fmt_msg(
                    MsgKey::NeedExactlyNArgs,
                    &[op, &max.to_string(), &given.to_string()],
                )
            } else {
                fmt_msg(
                    MsgKey::NeedArgsInRange,
                    &[op, &min.to_string(), &max.to_string(), &given.to_string()],
                )
            };
            return Err(ListError::arg_count(op, message));
        }

        let mut slots: SmallVec<[Option<Value>; 4]> =
            call.positional.iter().cloned().map(Some).collect();

        for (name, value) in &call.keyword {
            let idx = self
                .params
                .iter()
                .position(|p| p.name == name.as_str())
                .ok_or_else(|| {
                    ListError::binding(op, fmt_msg(MsgKey::UnexpectedKeyword, &[op, name]))
                })?;
            if slots.get(idx).is_some_and(Option::is_some) {
                return Err(ListError::binding(
                    op,
                    fmt_msg(MsgKey::DuplicateArgument, &[op, name]),
                ));
            }
            if slots.len() <= idx {
                slots.resize(idx + 1, None);
            }
            slots[idx] = Some(value.clone());
        }

        for (idx, param) in self.params.iter().enumerate() {
            if param.required && !matches!(slots.get(idx), Some(Some(_))) {
                return Err(ListError::arg_count(
                    op,
                    fmt_msg(MsgKey::MissingArgument, &[op, param.name]),
                ));
            }
        }

        Ok(slots
            .into_iter()
            .map(|slot| slot.unwrap_or(Value::Nil))
            .collect())
    }
}

/// 呼び出し引数（位置引数 + キーワード引数）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keyword: Record,
}

impl CallArgs {
    pub fn new(positional: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: positional.into_iter().collect(),
            keyword: Record::new(),
        }
    }

    pub fn with_keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// 呼び出し時に参照する共有状態（結果には影響しない）
#[derive(Debug, Default)]
pub struct InvocationContext {
    pub regex_cache: RegexCache,
    pub sample_seed: Option<u64>,
}

impl InvocationContext {
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            regex_cache: RegexCache::new(config.search.cache_patterns),
            sample_seed: config.sample.seed,
        }
    }
}

const LIST: &[Param] = &[req("list")];
const LIST_VALUE: &[Param] = &[req("list"), req("value")];
const LIST_OTHER: &[Param] = &[req("list"), req("other")];
const LIST_FUNCTION: &[Param] = &[req("list"), req("function")];
const APPEND: &[Param] = &[req("list"), opt("value")];
const REMOVE: &[Param] = &[req("list"), opt("value")];
const EXTEND: &[Param] = &[req("list"), opt("other")];
const INSERT: &[Param] = &[req("list"), opt("index"), opt("value")];
const POP: &[Param] = &[req("list"), opt("index")];
const INDEX: &[Param] = &[req("list"), req("value"), opt("start"), opt("end")];
const SORT: &[Param] = &[req("list"), opt("key"), opt("reverse")];
const SORT_BY_INDEX: &[Param] = &[req("list"), req("index"), opt("reverse")];
const SORT_BY_KEY: &[Param] = &[req("list"), req("attribute"), opt("reverse")];
const SEARCH: &[Param] = &[req("list"), req("pattern")];
const SAMPLE: &[Param] = &[req("list"), req("n"), opt("seed")];
const SPLIT_PERIOD: &[Param] = &[req("list"), req("period")];
const SELECT_BY_BOOL_MASK: &[Param] = &[req("mask"), req("values"), opt("negate")];

impl Operation {
    /// すべてのオペレーション
    pub const ALL: &'static [Operation] = &[
        Operation::Append,
        Operation::Extend,
        Operation::Insert,
        Operation::Remove,
        Operation::Pop,
        Operation::Clear,
        Operation::Index,
        Operation::Count,
        Operation::Sort,
        Operation::SortByIndex,
        Operation::SortByKey,
        Operation::Reverse,
        Operation::Copy,
        Operation::Search,
        Operation::Flatten,
        Operation::Sample,
        Operation::Zip,
        Operation::DictZip,
        Operation::DictZipRev,
        Operation::ListToDict,
        Operation::SplitPeriod,
        Operation::SelectByBoolMask,
        Operation::Range,
        Operation::Wrapper,
        Operation::WrapperComp,
        Operation::ListsMergeby,
    ];

    /// 正式名
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Append => "append",
            Operation::Extend => "extend",
            Operation::Insert => "insert",
            Operation::Remove => "remove",
            Operation::Pop => "pop",
            Operation::Clear => "clear",
            Operation::Index => "index",
            Operation::Count => "count",
            Operation::Sort => "sort",
            Operation::SortByIndex => "sort_by_index",
            Operation::SortByKey => "sort_by_key",
            Operation::Reverse => "reverse",
            Operation::Copy => "copy",
            Operation::Search => "search",
            Operation::Flatten => "flatten",
            Operation::Sample => "sample",
            Operation::Zip => "zip",
            Operation::DictZip => "dict_zip",
            Operation::DictZipRev => "dict_zip_rev",
            Operation::ListToDict => "list_to_dict",
            Operation::SplitPeriod => "split_period",
            Operation::SelectByBoolMask => "select_by_bool_mask",
            Operation::Range => "range",
            Operation::Wrapper => "wrapper",
            Operation::WrapperComp => "wrapper_comp",
            Operation::ListsMergeby => "lists_mergeby",
        }
    }

    /// 旧名（list_* 形式）
    pub fn legacy_name(&self) -> Option<&'static str> {
        let legacy = match self {
            Operation::Append => "list_append",
            Operation::Extend => "list_extend",
            Operation::Insert => "list_insert",
            Operation::Remove => "list_remove",
            Operation::Pop => "list_pop",
            Operation::Clear => "list_clear",
            Operation::Index => "list_index",
            Operation::Count => "list_count",
            Operation::Sort => "list_sort",
            Operation::SortByIndex => "list_sort_list",
            Operation::SortByKey => "list_sort_dict",
            Operation::Reverse => "list_reverse",
            Operation::Copy => "list_copy",
            Operation::Search => "list_search",
            Operation::Flatten => "list_flatten",
            Operation::Sample => "list_sample",
            Operation::Zip => "list_zip",
            Operation::DictZip => "list_dict_zip",
            Operation::DictZipRev => "list_dict_zip_rev",
            Operation::ListToDict => "list_list2dict",
            Operation::SplitPeriod => "list_split_period",
            Operation::SelectByBoolMask => "list_select_list_bool",
            Operation::Range => "list_range",
            Operation::Wrapper => "list_wrapper",
            Operation::WrapperComp => "list_wrapper_comp",
            Operation::ListsMergeby => return None,
        };
        Some(legacy)
    }

    pub fn signature(&self) -> Signature {
        let params = match self {
            Operation::Append => APPEND,
            Operation::Extend => EXTEND,
            Operation::Insert => INSERT,
            Operation::Remove => REMOVE,
            Operation::Count => LIST_VALUE,
            Operation::Pop => POP,
            Operation::Clear
            | Operation::Reverse
            | Operation::Copy
            | Operation::Flatten
            | Operation::ListToDict => LIST,
            Operation::Index => INDEX,
            Operation::Sort => SORT,
            Operation::SortByIndex => SORT_BY_INDEX,
            Operation::SortByKey => SORT_BY_KEY,
            Operation::Search => SEARCH,
            Operation::Sample => SAMPLE,
            Operation::Zip | Operation::DictZip | Operation::DictZipRev => LIST_OTHER,
            Operation::SplitPeriod => SPLIT_PERIOD,
            Operation::SelectByBoolMask => SELECT_BY_BOOL_MASK,
            Operation::Wrapper | Operation::WrapperComp => LIST_FUNCTION,
            // 引数の形が可変なので本体で検証する
            Operation::Range | Operation::ListsMergeby => return Signature::variadic(),
        };
        Signature::fixed(params)
    }

    /// 束縛済みの引数でオペレーションを実行
    pub fn apply(&self, args: &[Value], ctx: &InvocationContext) -> Result<Value, ListError> {
        match self {
            Operation::Append => list::native_append(args),
            Operation::Extend => list::native_extend(args),
            Operation::Insert => list::native_insert(args),
            Operation::Remove => list::native_remove(args),
            Operation::Pop => list::native_pop(args),
            Operation::Clear => list::native_clear(args),
            Operation::Index => list::native_index(args),
            Operation::Count => list::native_count(args),
            Operation::Sort => list::native_sort(args),
            Operation::SortByIndex => list::native_sort_by_index(args),
            Operation::SortByKey => list::native_sort_by_key(args),
            Operation::Reverse => list::native_reverse(args),
            Operation::Copy => list::native_copy(args),
            Operation::Search => list::native_search(args, &ctx.regex_cache),
            Operation::Flatten => list::native_flatten(args),
            Operation::Sample => list::native_sample(args, ctx.sample_seed),
            Operation::Zip => list::native_zip(args),
            Operation::DictZip => list::native_dict_zip(args),
            Operation::DictZipRev => list::native_dict_zip_rev(args),
            Operation::ListToDict => list::native_list_to_dict(args),
            Operation::SplitPeriod => list::native_split_period(args),
            Operation::SelectByBoolMask => list::native_select_by_bool_mask(args),
            Operation::Range => list::native_range(args),
            Operation::Wrapper => list::native_wrapper(args),
            Operation::WrapperComp => list::native_wrapper_comp(args),
            Operation::ListsMergeby => native_lists_mergeby(args),
        }
    }
}

/// オペレーションレジストリ
#[derive(Debug)]
pub struct Registry {
    operations: HashMap<&'static str, Operation>,
    context: InvocationContext,
    max_suggestions: usize,
}

impl Registry {
    /// 既定の設定で作成
    pub fn new() -> Self {
        Self::with_config(&RegistryConfig::default())
    }

    pub fn with_config(config: &RegistryConfig) -> Self {
        let mut operations = new_hashmap();
        for op in Operation::ALL {
            operations.insert(op.name(), *op);
            if config.registry.legacy_names {
                if let Some(legacy) = op.legacy_name() {
                    operations.insert(legacy, *op);
                }
            }
        }

        tracing::debug!(
            operations = operations.len(),
            legacy_names = config.registry.legacy_names,
            "registry built"
        );

        Self {
            operations,
            context: InvocationContext::from_config(config),
            max_suggestions: config.registry.max_suggestions,
        }
    }

    /// 名前からオペレーションを引く
    pub fn resolve(&self, name: &str) -> Result<Operation, ListError> {
        self.operations
            .get(name)
            .copied()
            .ok_or_else(|| ListError::unknown_operation(name, self.similar_names(name)))
    }

    /// 編集距離の近い登録名（近い順）
    fn similar_names(&self, target: &str) -> Vec<String> {
        if self.max_suggestions == 0 {
            return Vec::new();
        }

        // 上位 max_suggestions 件だけを保持（最も遠い候補が先頭）
        let mut heap: BinaryHeap<(usize, &'static str)> = BinaryHeap::new();
        for name in self.operations.keys().copied() {
            let distance = strsim::levenshtein(target, name);
            if distance <= MAX_SUGGESTION_DISTANCE {
                heap.push((distance, name));
                if heap.len() > self.max_suggestions {
                    heap.pop();
                }
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// 位置引数で呼び出す
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, ListError> {
        self.invoke_with(name, CallArgs::new(args.iter().cloned()))
    }

    /// 位置引数とキーワード引数で呼び出す
    pub fn invoke_with(&self, name: &str, call: CallArgs) -> Result<Value, ListError> {
        let result = self.resolve(name).and_then(|op| {
            tracing::debug!(
                operation = op.name(),
                requested = name,
                args = call.len(),
                "dispatch"
            );
            let args = op.signature().bind(op.name(), &call)?;
            op.apply(&args, &self.context)
        });

        if let Err(err) = &result {
            tracing::warn!(
                code = %err.code(),
                operation = err.operation().unwrap_or(name),
                "{}",
                err.message()
            );
        }
        result
    }

    /// 解決可能なすべての名前（ソート済み）
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.operations.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn context(&self) -> &InvocationContext {
        &self.context
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
