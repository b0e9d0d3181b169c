//! confession-page
//!
//! 名前を入力して Yes/No の質問に答えるだけの小さなページ。翻訳リソースの
//! 読み込み・フォールバック・テンプレート置換と、言語切り替えを扱う。

pub mod config;
pub mod i18n;
pub mod page;
mod test_utils;

pub use i18n::ResourceStore;
pub use page::Page;
