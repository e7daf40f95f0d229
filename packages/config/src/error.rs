//! # 設定読み込みエラー
//!
//! いずれも起動時に発生し、発生した時点でサーバーは起動しない。

use std::path::PathBuf;

use thiserror::Error;

/// 設定の解決に失敗した理由
#[derive(Debug, Error)]
pub enum ConfigError {
   /// 設定ファイルが存在しない
   #[error("設定ファイルが見つかりません: {}", path.display())]
   NotFound { path: PathBuf },

   /// 設定ファイルの読み込みに失敗した（存在しない場合を除く）
   #[error("設定ファイルを読み込めません: {}", path.display())]
   Read {
      path:   PathBuf,
      #[source]
      source: std::io::Error,
   },

   /// YAML として解釈できない
   #[error("設定ファイルの YAML が不正です: {}", path.display())]
   Parse {
      path:   PathBuf,
      #[source]
      source: serde_yaml::Error,
   },

   /// トップレベルがマッピングではない
   #[error("設定ファイルのトップレベルはマッピングである必要があります: {}", path.display())]
   NotAMapping { path: PathBuf },

   /// マッピングのキーが文字列に変換できない
   #[error("設定ファイルに文字列化できないキーがあります: {} ({key})", path.display())]
   NonStringKey { path: PathBuf, key: String },

   /// 文字列化した結果、同じマッピング内でキーが重複した（例: `1` と `"1"`）
   #[error("設定ファイルに重複したキーがあります: {} ({key})", path.display())]
   DuplicateKey { path: PathBuf, key: String },

   /// 環境名がファイル名として使えない
   #[error("環境名が不正です: {name:?}")]
   InvalidEnvironment { name: String },

   /// マッピングとそれ以外の値が衝突した（`MergePolicy::Strict` のみ）
   #[error("設定値の型が一致しません: {key_path}")]
   TypeMismatch { key_path: String },

   /// 設定セクションを型に変換できない
   #[error("設定セクションを解釈できません: {key}")]
   Decode {
      key:    String,
      #[source]
      source: serde_json::Error,
   },
}
