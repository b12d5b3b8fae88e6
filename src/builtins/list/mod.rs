//! リスト操作関数
//!
//! すべての関数は純粋関数で、入力のコレクションを変更しない。
//! 名前による呼び出しは `registry` が担当する。

pub mod apply;
pub mod mutate;
pub mod order;
pub mod query;
pub mod sample;
pub mod transform;

pub use apply::*;
pub use mutate::*;
pub use order::*;
pub use query::*;
pub use sample::*;
pub use transform::*;
