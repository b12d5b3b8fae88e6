//! 値の組み立て用マクロ
//!
//! ホストやテストからコレクションとレコードを簡潔に作るためのマクロ。

/// リスト値を作成するマクロ
///
/// # 使用例
///
/// ```
/// use list_ops::list;
/// use list_ops::value::Value;
///
/// let items = list![1, "a", true];
/// assert_eq!(items.as_list().map(|v| v.len()), Some(3));
/// assert_eq!(list![], Value::List(Default::default()));
/// ```
#[macro_export]
macro_rules! list {
    () => {
        $crate::value::Value::List($crate::value::Collection::new())
    };
    ($($item:expr),+ $(,)?) => {
        $crate::value::Value::List(
            vec![$($crate::value::Value::from($item)),+].into()
        )
    };
}

/// レコード（マップ）値を作成するマクロ
///
/// # 使用例
///
/// ```
/// use list_ops::record;
///
/// let r = record! { "id" => 1, "name" => "a" };
/// assert_eq!(r.as_record().map(|m| m.len()), Some(2));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::value::Value::Map($crate::value::Record::new())
    };
    ($($key:expr => $val:expr),+ $(,)?) => {{
        let mut fields = $crate::value::Record::new();
        $(
            fields.insert(
                ::std::string::String::from($key),
                $crate::value::Value::from($val),
            );
        )+
        $crate::value::Value::Map(fields)
    }};
}

#[cfg(test)]
mod tests {
    use crate::value::Value;

    #[test]
    fn test_list_macro() {
        let items = list![1, 2.5, "x", Value::Nil];
        let seq = items.as_list().unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq[0], Value::Integer(1));
        assert_eq!(seq[3], Value::Nil);
    }

    #[test]
    fn test_record_macro_nested() {
        let r = record! { "id" => 1, "tags" => list!["a"] };
        let fields = r.as_record().unwrap();
        assert_eq!(fields.get("tags"), Some(&list!["a"]));
    }
}
