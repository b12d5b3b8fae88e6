//! エラー処理
//!
//! オペレーション呼び出しの失敗を構造化された値で返す：
//! - エラーコードによる分類（種別は `ErrorKind`）
//! - オペレーション名と問題の引数
//! - ヒントとサジェスト
//! - 複数の出力形式（人間向け/JSON）

use crate::i18n::{fmt_msg, msg, MsgKey};
use crate::value::Value;
use std::fmt;

/// 表示する引数値の最大長
const MAX_RENDERED_LEN: usize = 80;

/// エラーの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 未登録のオペレーション名
    UnknownOperation,
    /// 引数の型・個数・キーワードの誤り
    InvalidArgument,
    /// オペレーション固有の失敗
    OperationFailed,
    /// マージキーの値が比較不能
    UnorderedMergeKey,
}

/// エラーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 0xxx: レジストリ
    E0001, // 未登録のオペレーション

    // 1xxx: 型エラー
    E0101, // 型の不一致
    E0102, // 値が不正（0のstep、不正な正規表現など）

    // 2xxx: 引数エラー
    E0201, // 引数の数が一致しない
    E0202, // キーワード引数のバインドエラー

    // 3xxx: オペレーションエラー
    E0301, // オペレーション固有の失敗
    E0302, // ホスト関数の失敗

    // 4xxx: マージエラー
    E0401, // マージキーが比較不能
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::E0001 => ErrorKind::UnknownOperation,
            ErrorCode::E0101 | ErrorCode::E0102 | ErrorCode::E0201 | ErrorCode::E0202 => {
                ErrorKind::InvalidArgument
            }
            ErrorCode::E0301 | ErrorCode::E0302 => ErrorKind::OperationFailed,
            ErrorCode::E0401 => ErrorKind::UnorderedMergeKey,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 問題のある引数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentRef {
    /// 0始まりの位置
    pub position: usize,
    /// パラメータ名
    pub name: String,
    /// 値の表示形式（長い場合は切り詰め）
    pub rendered: String,
}

impl ArgumentRef {
    pub fn new(position: usize, name: &str, value: &Value) -> Self {
        Self {
            position,
            name: name.to_string(),
            rendered: render_value(value),
        }
    }
}

/// 構造化されたエラー情報
#[derive(Debug, Clone)]
pub struct ListError {
    code: ErrorCode,
    message: String,
    operation: Option<String>,
    argument: Option<ArgumentRef>,
    notes: Vec<String>,
    help: Vec<String>,
    suggestions: Vec<String>,
}

impl ListError {
    pub fn new<S: Into<String>>(code: ErrorCode, message: S) -> Self {
        Self {
            code,
            message: message.into(),
            operation: None,
            argument: None,
            notes: Vec::new(),
            help: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_operation<S: Into<String>>(mut self, operation: S) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_argument(mut self, argument: ArgumentRef) -> Self {
        self.argument = Some(argument);
        self
    }

    pub fn with_note<S: Into<String>>(mut self, note: S) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help.push(help.into());
        self
    }

    pub fn with_suggestion<S: Into<String>>(mut self, suggestion: S) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// シンプルなメッセージのみ取得（ホストの診断表示用）
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub fn argument(&self) -> Option<&ArgumentRef> {
        self.argument.as_ref()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// エラーコード + メッセージ（ログ用）
    pub fn short(&self) -> String {
        format!("error[{}]: {}", self.code, self.message)
    }

    /// 完全な詳細情報
    pub fn full(&self) -> String {
        let mut output = format!("error[{}]: {}\n", self.code, self.message);

        if let Some(op) = &self.operation {
            output.push_str(&format!("  --> operation `{}`", op));
            if let Some(arg) = &self.argument {
                output.push_str(&format!(
                    ", argument #{} ({}) = {}",
                    arg.position + 1,
                    arg.name,
                    arg.rendered
                ));
            }
            output.push('\n');
        }

        for note in &self.notes {
            output.push_str(&format!("  = note: {}\n", note));
        }
        for help_text in &self.help {
            output.push_str(&format!("  = help: {}\n", help_text));
        }
        for suggestion in &self.suggestions {
            output.push_str(&format!("  = suggestion: {}\n", suggestion));
        }

        output
    }

    /// JSON形式で出力（ホスト連携用）
    #[cfg(feature = "format-json")]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        json!({
            "code": self.code.to_string(),
            "kind": format!("{:?}", self.kind()),
            "message": self.message,
            "operation": self.operation,
            "argument": self.argument.as_ref().map(|arg| json!({
                "position": arg.position,
                "name": arg.name,
                "value": arg.rendered,
            })),
            "notes": self.notes,
            "help": self.help,
            "suggestions": self.suggestions,
        })
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full())
    }
}

impl std::error::Error for ListError {}

// ========================================
// エラー構築ヘルパー関数
// ========================================

impl ListError {
    /// 未登録のオペレーション
    pub fn unknown_operation(name: &str, candidates: Vec<String>) -> Self {
        let mut err = ListError::new(
            ErrorCode::E0001,
            fmt_msg(MsgKey::UnknownOperation, &[name]),
        );
        for candidate in candidates {
            err = err.with_suggestion(fmt_msg(MsgKey::DidYouMean, &[&candidate]));
        }
        err
    }

    /// 引数の型の不一致
    pub fn type_mismatch(
        op: &str,
        position: usize,
        param: &str,
        expected: &str,
        actual: &Value,
    ) -> Self {
        let pos = (position + 1).to_string();
        ListError::new(
            ErrorCode::E0101,
            fmt_msg(
                MsgKey::ArgMustBeType,
                &[op, &pos, param, expected, actual.type_name()],
            ),
        )
        .with_operation(op)
        .with_argument(ArgumentRef::new(position, param, actual))
    }

    /// 引数の値が不正
    pub fn invalid_value(
        op: &str,
        position: usize,
        param: &str,
        actual: &Value,
        message: String,
    ) -> Self {
        ListError::new(ErrorCode::E0102, message)
            .with_operation(op)
            .with_argument(ArgumentRef::new(position, param, actual))
    }

    /// 引数の数の不一致
    pub fn arg_count(op: &str, message: String) -> Self {
        ListError::new(ErrorCode::E0201, message).with_operation(op)
    }

    /// キーワード引数のバインドエラー
    pub fn binding(op: &str, message: String) -> Self {
        ListError::new(ErrorCode::E0202, message).with_operation(op)
    }

    /// オペレーション固有の失敗
    pub fn operation_failed(op: &str, message: String) -> Self {
        ListError::new(ErrorCode::E0301, message).with_operation(op)
    }

    /// ホスト関数の失敗
    pub fn function_failed(op: &str, func: &str, cause: &str) -> Self {
        ListError::new(
            ErrorCode::E0302,
            fmt_msg(MsgKey::FunctionFailed, &[op, func, cause]),
        )
        .with_operation(op)
    }

    /// マージキーの値が比較不能
    pub fn unordered_merge_key(op: &str, key: &str, left: &Value, right: &Value) -> Self {
        ListError::new(
            ErrorCode::E0401,
            fmt_msg(
                MsgKey::UnorderedMergeKey,
                &[op, key, &render_value(left), &render_value(right)],
            ),
        )
        .with_operation(op)
        .with_note(fmt_msg(
            MsgKey::NoteConflictingKeys,
            &[
                &render_value(left),
                left.type_name(),
                &render_value(right),
                right.type_name(),
            ],
        ))
        .with_help(msg(MsgKey::HelpMergeKeyTypes))
    }
}

/// 値を表示用に整形（長すぎる場合は切り詰め）
pub fn render_value(value: &Value) -> String {
    let s = value.to_string();
    if s.chars().count() <= MAX_RENDERED_LEN {
        return s;
    }
    let truncated: String = s.chars().take(MAX_RENDERED_LEN).collect();
    format!("{}...", truncated)
}
