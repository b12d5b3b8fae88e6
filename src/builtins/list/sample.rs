//! リスト操作 - 無作為抽出
//!
//! 乱数源は呼び出し側から注入する。シード指定時は `StdRng` で再現可能。

use crate::builtins::value_helpers::{get_int_arg, get_list_arg, get_opt_int_arg};
use crate::error::ListError;
use crate::i18n::{fmt_msg, msg, MsgKey};
use crate::value::{Collection, Value};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// 重複なしでn個の位置を一様に選び、その要素を返す
///
/// nが負またはコレクション長を超える場合は失敗。
pub fn sample_with<R: Rng + ?Sized>(
    items: &Collection,
    n: i64,
    rng: &mut R,
) -> Result<Collection, ListError> {
    if n < 0 || n as u64 > items.len() as u64 {
        return Err(ListError::operation_failed(
            "sample",
            fmt_msg(
                MsgKey::SampleOutOfRange,
                &["sample", &n.to_string(), &items.len().to_string()],
            ),
        )
        .with_help(msg(MsgKey::HelpSampleSize)));
    }

    Ok(index::sample(rng, items.len(), n as usize)
        .into_iter()
        .map(|i| items[i].clone())
        .collect())
}

/// sample - n個の要素を無作為抽出
///
/// シードの優先順位: 引数 > `default_seed`（設定） > スレッドローカル乱数
pub fn native_sample(args: &[Value], default_seed: Option<u64>) -> Result<Value, ListError> {
    let items = get_list_arg(args, 0, "sample", "list")?;
    let n = get_int_arg(args, 1, "sample", "n")?;
    let seed = get_opt_int_arg(args, 2, "sample", "seed")?.map(|s| s as u64);

    let picked = match seed.or(default_seed) {
        Some(seed) => sample_with(items, n, &mut StdRng::seed_from_u64(seed))?,
        None => sample_with(items, n, &mut rand::rng())?,
    };
    Ok(Value::List(picked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::list;

    fn as_ints(value: &Value) -> Vec<i64> {
        value
            .as_list()
            .unwrap()
            .iter()
            .map(|v| match v {
                Value::Integer(n) => *n,
                other => panic!("unexpected {}", other),
            })
            .collect()
    }

    #[test]
    fn test_sample_distinct_members() {
        let items = list![1, 2, 3, 4, 5, 6, 7, 8];
        let picked = native_sample(&[items, Value::Integer(5)], None).unwrap();
        let mut ints = as_ints(&picked);
        assert_eq!(ints.len(), 5);
        ints.sort_unstable();
        ints.dedup();
        assert_eq!(ints.len(), 5);
        assert!(ints.iter().all(|n| (1..=8).contains(n)));
    }

    #[test]
    fn test_sample_seed_is_reproducible() {
        let items = list![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let seeded = [items.clone(), Value::Integer(4), Value::Integer(7)];
        let a = native_sample(&seeded, None).unwrap();
        let b = native_sample(&[items.clone(), Value::Integer(4)], Some(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_bounds() {
        let items = list![1, 2, 3];
        assert_eq!(native_sample(&[items.clone(), Value::Integer(0)], None).unwrap(), list![]);
        let all = native_sample(&[items.clone(), Value::Integer(3)], None).unwrap();
        assert_eq!(as_ints(&all).len(), 3);

        let over = native_sample(&[items.clone(), Value::Integer(4)], None).unwrap_err();
        assert_eq!(over.kind(), ErrorKind::OperationFailed);
        let negative = native_sample(&[items, Value::Integer(-1)], None).unwrap_err();
        assert_eq!(negative.kind(), ErrorKind::OperationFailed);
    }

    #[test]
    fn test_sample_with_injected_rng() {
        let items: Collection = (0..20).map(Value::Integer).collect();
        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(1);
        assert_eq!(
            sample_with(&items, 6, &mut rng_a).unwrap(),
            sample_with(&items, 6, &mut rng_b).unwrap()
        );
    }
}
