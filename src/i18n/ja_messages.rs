use super::msg_key::MsgKey;
use super::msg_key::MsgKey::*;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 日本語エラーメッセージ
pub static JA_MSGS: LazyLock<HashMap<MsgKey, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // レジストリ
        (UnknownOperation, "未登録のオペレーション: {0}"),
        (DidYouMean, "もしかして: {0}?"),
        // 引数エラー
        (NeedExactlyNArgs, "{0}には{1}個の引数が必要です（実際: {2}）"),
        (NeedArgsInRange, "{0}には{1}〜{2}個の引数が必要です（実際: {3}）"),
        (NeedAtLeastNArgs, "{0}には少なくとも{1}個の引数が必要です（実際: {2}）"),
        (MissingArgument, "{0}: 必須引数 '{1}' がありません"),
        (UnexpectedKeyword, "{0}: 不明なキーワード引数 '{1}'"),
        (DuplicateArgument, "{0}: 引数 '{1}' に複数の値が指定されています"),
        // 型エラー
        (ArgMustBeType, "{0}: 第{1}引数（{2}）は{3}である必要があります（実際: {4}）"),
        (
            ElementMustBeType,
            "{0}: 第{2}引数の要素{1}は{3}である必要があります（実際: {4}）",
        ),
        (MustBePositive, "{0}: {1}は正の数である必要があります"),
        (StepMustNotBeZero, "{0}: stepに0は指定できません"),
        (InvalidRegex, "{0}: 不正なパターン: {1}"),
        (InvalidMapKey, "{0}: {1}型の値はマップのキーとして使用できません"),
        // オペレーション固有の失敗
        (ValueNotFound, "{0}: 値がコレクション内に見つかりません: {1}"),
        (PopFromEmpty, "{0}: 空のコレクションからはpopできません"),
        (IndexOutOfRange, "{0}: インデックス{1}は範囲外です（長さ: {2}）"),
        (
            SampleOutOfRange,
            "{0}: サンプル数が要素数を超えているか負です（n={1}, 長さ={2}）",
        ),
        (Unorderable, "{0}: 値同士を比較できません: {1} と {2}"),
        (FieldNotFound, "{0}: 要素{1}にフィールド{2}がありません"),
        (NotIndexable, "{0}: {2}型の要素{1}は{3}で参照できません"),
        (NotIterable, "{0}: {1}型の結果は反復できません"),
        (FunctionFailed, "{0}: 関数{1}が失敗しました: {2}"),
        // マージ
        (
            UnorderedMergeKey,
            "{0}: マージキー '{1}' の値を順序付けできません: {2} と {3}",
        ),
        (
            UnhashableMergeKey,
            "{0}: マージキー '{1}' の値（{2}型）はキーとして使用できません",
        ),
        // 注記
        (NoteConflictingKeys, "{0} は{1}型、{2} は{3}型です"),
        // ヘルプ
        (HelpMergeArgs, "(マップのリスト, マップのリスト, フィールド名) を渡してください"),
        (
            HelpMergeKeyTypes,
            "マージキーの値はすべて数値、すべて文字列、またはすべてboolにしてください",
        ),
        (HelpSampleSize, "nは0以上、要素数以下にしてください"),
    ])
});
