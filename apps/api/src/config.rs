//! # アプリケーション設定
//!
//! マージ済みの YAML 設定（[`EffectiveConfig`]）からサーバー設定を取り出す。
//!
//! ## 設定キー一覧
//!
//! | キー | デフォルト | 説明 |
//! |------|------------|------|
//! | `server.host` | `0.0.0.0` | バインドアドレス |
//! | `server.port` | `3000` | ポート番号 |
//! | `upload.dir` | `uploads` | multipart で受け取ったファイルの保存先 |
//!
//! 設定ファイル自体の場所は環境変数 `CONFIG_DIR` / `APP_ENV` で決まる
//! （`stratum_config` を参照）。

use std::path::PathBuf;

use serde::Deserialize;
use stratum_config::{ConfigError, EffectiveConfig};

/// HTTP サーバー設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
   /// バインドアドレス（例: `0.0.0.0`, `127.0.0.1`）
   pub host: String,
   /// ポート番号
   pub port: u16,
}

impl Default for ServerConfig {
   fn default() -> Self {
      Self {
         host: "0.0.0.0".to_string(),
         port: 3000,
      }
   }
}

/// アップロード設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
   /// 保存先ディレクトリ
   pub dir: PathBuf,
}

impl Default for UploadConfig {
   fn default() -> Self {
      Self {
         dir: PathBuf::from("uploads"),
      }
   }
}

/// アプリケーション全体の設定
///
/// 起動時に一度だけ構築し、`AppState` 経由で各ハンドラに渡す。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
   pub server: ServerConfig,
   pub upload: UploadConfig,
}

impl AppConfig {
   /// マージ済み設定から読み取る
   ///
   /// セクションが無い場合はデフォルト値を使う。
   /// 型が合わない場合は [`ConfigError::Decode`] を返す。
   pub fn from_effective(config: &EffectiveConfig) -> Result<Self, ConfigError> {
      Ok(Self {
         server: config.section("server")?.unwrap_or_default(),
         upload: config.section("upload")?.unwrap_or_default(),
      })
   }

   /// `host:port` 形式のバインドアドレス
   pub fn bind_address(&self) -> String {
      format!("{}:{}", self.server.host, self.server.port)
   }
}

#[cfg(test)]
mod tests {
   use std::path::Path;

   use pretty_assertions::assert_eq;
   use stratum_config::{Environment, parse_document};

   use super::*;

   fn effective(text: &str) -> EffectiveConfig {
      EffectiveConfig::new(
         Environment::default(),
         parse_document(text, Path::new("test.yml")).unwrap(),
      )
   }

   #[test]
   fn test_セクションが無ければデフォルト値になる() {
      let config = AppConfig::from_effective(&effective("mysql: {host: db}\n")).unwrap();

      assert_eq!(config, AppConfig::default());
      assert_eq!(config.bind_address(), "0.0.0.0:3000");
   }

   #[test]
   fn test_一部のキーだけ指定すれば残りはデフォルトになる() {
      let config = AppConfig::from_effective(&effective("server: {port: 8080}\n")).unwrap();

      assert_eq!(config.server.host, "0.0.0.0");
      assert_eq!(config.server.port, 8080);
      assert_eq!(config.upload.dir, PathBuf::from("uploads"));
   }

   #[test]
   fn test_すべてのキーを読み取る() {
      let config = AppConfig::from_effective(&effective(
         "server: {host: 127.0.0.1, port: 4000}\nupload: {dir: /tmp/files}\n",
      ))
      .unwrap();

      assert_eq!(config.bind_address(), "127.0.0.1:4000");
      assert_eq!(config.upload.dir, PathBuf::from("/tmp/files"));
   }

   #[test]
   fn test_ポート番号が範囲外ならdecodeエラーになる() {
      let result = AppConfig::from_effective(&effective("server: {port: 70000}\n"));

      assert!(matches!(result, Err(ConfigError::Decode { key, .. }) if key == "server"));
   }
}
