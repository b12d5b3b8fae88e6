//! 組み込みオペレーションモジュール
//!
//! このモジュールはオペレーションを機能別に整理しています:
//! - list: リスト操作（追加・削除、検索、並べ替え、変換、無作為抽出、関数適用）
//! - value_helpers: 引数の型チェックと抽出
//!
//! キー付きマージは `crate::merge` に独立している。

pub mod list;
pub mod value_helpers;
