//! # 実行環境名
//!
//! 環境別設定ファイルの名前（拡張子を除く部分）として使う。

use std::fmt;

use crate::ConfigError;

/// 環境名を読み取る環境変数
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// 環境変数が未設定のときの環境名
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// 実行環境（`development`, `production` など）
///
/// 設定ディレクトリの外を指せないよう、パス区切りや `..` を含む名前は受け付けない。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment(String);

impl Environment {
   pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
      let name = name.into();
      let is_plain = !name.is_empty()
         && !name.starts_with('.')
         && !name.contains("..")
         && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
      if is_plain {
         Ok(Self(name))
      } else {
         Err(ConfigError::InvalidEnvironment { name })
      }
   }

   /// 環境変数 `APP_ENV` から読み取る
   ///
   /// 未設定または空文字の場合は [`DEFAULT_ENVIRONMENT`] を使う。
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_optional(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
   }

   /// 任意の値から読み取る（`None` と空文字はデフォルト扱い）
   pub fn from_optional(value: Option<&str>) -> Result<Self, ConfigError> {
      match value.map(str::trim) {
         Some(name) if !name.is_empty() => Self::new(name),
         _ => Ok(Self::default()),
      }
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl Default for Environment {
   fn default() -> Self {
      Self(DEFAULT_ENVIRONMENT.to_string())
   }
}

impl fmt::Display for Environment {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.0)
   }
}

#[cfg(test)]
mod tests {
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case(None)]
   #[case(Some(""))]
   #[case(Some("   "))]
   fn test_未設定や空文字はdevelopmentになる(#[case] value: Option<&str>) {
      let environment = Environment::from_optional(value).unwrap();

      assert_eq!(environment.as_str(), DEFAULT_ENVIRONMENT);
   }

   #[rstest]
   #[case("production")]
   #[case("staging")]
   #[case("test-eu_1")]
   #[case("v1.2")]
   fn test_通常の環境名を受け付ける(#[case] name: &str) {
      assert_eq!(Environment::new(name).unwrap().as_str(), name);
   }

   #[rstest]
   #[case("../secrets")]
   #[case("a/b")]
   #[case("a\\b")]
   #[case(".hidden")]
   #[case("prod..")]
   #[case("")]
   fn test_パスとして危険な環境名は拒否する(#[case] name: &str) {
      assert!(matches!(
         Environment::new(name),
         Err(ConfigError::InvalidEnvironment { .. })
      ));
   }

   #[test]
   fn test_値の前後の空白は取り除かれる() {
      let environment = Environment::from_optional(Some(" production ")).unwrap();

      assert_eq!(environment.as_str(), "production");
      assert_eq!(environment.to_string(), "production");
   }
}
