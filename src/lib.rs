//! 名前で呼び出すリスト変換と、キー付きレコードマージ
//!
//! テンプレートエンジンなどのホストが、実行時の値に対してオペレーションを
//! 名前で呼び出すためのライブラリ。
//!
//! ```
//! use list_ops::{list, record, Registry, Value};
//!
//! let registry = Registry::new();
//! let merged = registry
//!     .invoke(
//!         "lists_mergeby",
//!         &[
//!             list![record! {"name" => "b", "x" => 2}, record! {"name" => "a", "x" => 1}],
//!             list![record! {"name" => "b", "y" => 20}],
//!             Value::from("name"),
//!         ],
//!     )
//!     .unwrap();
//! assert_eq!(
//!     merged,
//!     list![
//!         record! {"name" => "a", "x" => 1},
//!         record! {"name" => "b", "x" => 2, "y" => 20},
//!     ]
//! );
//! ```

#[macro_use]
mod macros;

pub mod builtins;
pub mod config;
pub mod error;
pub mod i18n;
pub mod log;
pub mod merge;
pub mod registry;
pub mod value;

pub use config::RegistryConfig;
pub use error::{ErrorCode, ErrorKind, ListError};
pub use merge::{merge_by, MergeAccumulator, MergeError};
pub use registry::{CallArgs, InvocationContext, Operation, Param, Registry, Signature};
pub use value::{Collection, NativeFunc, Record, Value};

// ========================================
// システム共通型定義
// ========================================

use ahash::RandomState;

/// クレート共通のHashMap型（im::HashMapにahashを適用）
pub type HashMap<K, V> = im::HashMap<K, V, RandomState>;

/// HashMapを作成するヘルパー関数
#[inline]
pub fn new_hashmap<K, V>() -> HashMap<K, V> {
    im::HashMap::with_hasher(RandomState::new())
}
