/// エラーメッセージキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgKey {
    // レジストリ
    UnknownOperation, // unknown operation: {0}
    DidYouMean,       // did you mean: {0}?

    // 引数エラー（バインド）
    NeedExactlyNArgs,   // {0} takes exactly {1} argument(s), got {2}
    NeedArgsInRange,    // {0} takes {1} to {2} argument(s), got {3}
    NeedAtLeastNArgs,   // {0} requires at least {1} argument(s), got {2}
    MissingArgument,    // {0}: missing required argument '{1}'
    UnexpectedKeyword,  // {0}: unexpected keyword argument '{1}'
    DuplicateArgument,  // {0}: got multiple values for argument '{1}'

    // 型エラー
    ArgMustBeType,       // {0}: argument #{1} ({2}) must be {3}, got {4}
    ElementMustBeType,   // {0}: element {1} of argument #{2} must be {3}, got {4}
    MustBePositive,      // {0}: {1} must be positive
    StepMustNotBeZero,   // {0}: step must not be zero
    InvalidRegex,        // {0}: invalid pattern: {1}
    InvalidMapKey,       // {0}: value of type {1} cannot be used as a map key

    // オペレーション固有の失敗
    ValueNotFound,     // {0}: value not found in collection: {1}
    PopFromEmpty,      // {0}: pop from empty collection
    IndexOutOfRange,   // {0}: index {1} out of range for length {2}
    SampleOutOfRange,  // {0}: sample larger than population or is negative (n={1}, len={2})
    Unorderable,       // {0}: values are not mutually comparable: {1} and {2}
    FieldNotFound,     // {0}: element {1} has no field {2}
    NotIndexable,      // {0}: element {1} of type {2} cannot be indexed by {3}
    NotIterable,       // {0}: result of type {1} is not iterable
    FunctionFailed,    // {0}: function {1} failed: {2}

    // マージ
    UnorderedMergeKey,  // {0}: merge key '{1}' has values that cannot be ordered: {2} and {3}
    UnhashableMergeKey, // {0}: merge key '{1}' has an unhashable value of type {2}

    // 注記
    NoteConflictingKeys, // {0} is of type {1}, {2} is of type {3}

    // ヘルプ
    HelpMergeArgs,     // expected (list-of-maps, list-of-maps, field-name)
    HelpMergeKeyTypes, // merge key values must all be numbers, all strings, or all booleans
    HelpSampleSize,    // n must be between 0 and the collection length
}
