use super::msg_key::MsgKey;
use super::{EN_MSGS, JA_MSGS};
use std::sync::OnceLock;

/// 言語設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    En,
    Ja,
}

impl Lang {
    /// 環境変数から言語を取得
    /// 優先順位: LIST_OPS_LANG > LANG > デフォルト(en)
    pub fn from_env() -> Self {
        if let Ok(lang) = std::env::var("LIST_OPS_LANG") {
            return Self::parse(&lang);
        }

        // LANGから言語コードを取得（ja_JP.UTF-8 -> ja）
        if let Ok(lang) = std::env::var("LANG") {
            let lang_code = lang.split(['_', '.']).next().unwrap_or("");
            return Self::parse(lang_code);
        }

        Lang::En
    }

    /// 言語コードをパース（未対応言語は英語にフォールバック）
    pub fn parse(code: &str) -> Self {
        match code {
            "ja" | "ja_JP" => Lang::Ja,
            _ => Lang::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Ja => "ja",
            Lang::En => "en",
        }
    }
}

/// メッセージマネージャー（HashMap検索、enフォールバック）
pub struct Messages {
    lang: Lang,
}

impl Messages {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// メッセージを取得（jaになければenにフォールバック）
    pub fn get(&self, key: MsgKey) -> &'static str {
        match self.lang {
            Lang::En => EN_MSGS.get(&key).copied().unwrap_or("[missing message]"),
            Lang::Ja => JA_MSGS
                .get(&key)
                .or_else(|| EN_MSGS.get(&key))
                .copied()
                .unwrap_or("[missing message]"),
        }
    }

    /// メッセージをフォーマット（プレースホルダー {0}, {1}, ... を置換）
    ///
    /// 対応する引数がないプレースホルダーはそのまま残す。
    pub fn fmt(&self, key: MsgKey, args: &[&str]) -> String {
        let template = self.get(key);
        let estimated_size = template.len() + args.iter().map(|s| s.len()).sum::<usize>();
        let mut result = String::with_capacity(estimated_size);

        let mut rest = template;
        while let Some(open) = rest.find('{') {
            result.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let digits_len = after.chars().take_while(char::is_ascii_digit).count();
            let closed = digits_len > 0 && after[digits_len..].starts_with('}');

            let arg = closed
                .then(|| after[..digits_len].parse::<usize>().ok())
                .flatten()
                .and_then(|index| args.get(index));

            match arg {
                Some(arg) => {
                    result.push_str(arg);
                    rest = &after[digits_len + 1..];
                }
                None => {
                    result.push('{');
                    rest = after;
                }
            }
        }
        result.push_str(rest);

        result
    }
}

// グローバルインスタンス
static MESSAGES: OnceLock<Messages> = OnceLock::new();

/// i18nシステムを環境変数から初期化
pub fn init() {
    tracing::debug!(lang = messages().lang().as_str(), "messages initialized");
}

/// 言語を指定して初期化（既に初期化済みの場合はfalse）
pub fn init_with(lang: Lang) -> bool {
    MESSAGES.set(Messages::new(lang)).is_ok()
}

/// グローバルなメッセージインスタンスを取得
pub fn messages() -> &'static Messages {
    MESSAGES.get_or_init(|| Messages::new(Lang::from_env()))
}

/// メッセージを取得してフォーマット
pub fn fmt_msg(key: MsgKey, args: &[&str]) -> String {
    messages().fmt(key, args)
}

/// メッセージを取得
pub fn msg(key: MsgKey) -> &'static str {
    messages().get(key)
}
