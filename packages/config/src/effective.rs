//! # 解決済み設定
//!
//! 起動時に 1 度だけ構築し、以降は読み取り専用で共有する。

use serde::de::DeserializeOwned;

use crate::{ConfigError, ConfigValue, Environment, Mapping};

/// `common` と環境別設定をマージした結果
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
   environment: Environment,
   root:        Mapping,
}

impl EffectiveConfig {
   pub fn new(environment: Environment, root: Mapping) -> Self {
      Self { environment, root }
   }

   pub fn environment(&self) -> &Environment {
      &self.environment
   }

   pub fn root(&self) -> &Mapping {
      &self.root
   }

   /// ドット区切りのキーパスで値を取得する（例: `"mysql.host"`）
   pub fn get(&self, key_path: &str) -> Option<&ConfigValue> {
      let mut segments = key_path.split('.');
      let first = segments.next().filter(|s| !s.is_empty())?;
      segments.try_fold(self.root.get(first)?, |value, segment| {
         value.as_mapping()?.get(segment)
      })
   }

   /// キーパス配下を型付きの構造体として取り出す
   ///
   /// キーが存在しない場合は `Ok(None)`。
   pub fn section<T: DeserializeOwned>(&self, key_path: &str) -> Result<Option<T>, ConfigError> {
      let Some(value) = self.get(key_path) else {
         return Ok(None);
      };
      let decode = |source| ConfigError::Decode {
         key: key_path.to_string(),
         source,
      };
      let json = serde_json::to_value(value).map_err(decode)?;
      serde_json::from_value(json).map(Some).map_err(decode)
   }
}
