//! # 設定ファイルの読み込み
//!
//! 設定ディレクトリから `common.yml` と `<環境名>.yml` を読み、マージする。
//! 拡張子は `.yml` を優先し、無ければ `.yaml` を探す。

use std::{
   env,
   fs,
   io,
   path::{Path, PathBuf},
};

use crate::{ConfigError, ConfigValue, EffectiveConfig, Environment, Mapping, MergePolicy};

/// 常に読み込むベース設定の名前
pub const COMMON_DOCUMENT: &str = "common";

/// 設定ディレクトリを指定する環境変数
pub const CONFIG_DIR_VAR: &str = "CONFIG_DIR";

/// `CONFIG_DIR` 未設定時の設定ディレクトリ
pub const DEFAULT_CONFIG_DIR: &str = "config";

const EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// 設定ローダー
#[derive(Debug, Clone)]
pub struct ConfigLoader {
   dir:    PathBuf,
   policy: MergePolicy,
}

impl ConfigLoader {
   pub fn new(dir: impl Into<PathBuf>) -> Self {
      Self {
         dir:    dir.into(),
         policy: MergePolicy::default(),
      }
   }

   /// 環境変数 `CONFIG_DIR` のディレクトリを使う
   pub fn from_env() -> Self {
      Self::new(env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string()))
   }

   pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
      self.policy = policy;
      self
   }

   pub fn dir(&self) -> &Path {
      &self.dir
   }

   /// ベース設定と環境別設定を読み込んでマージする
   ///
   /// どちらかのファイルが読めない・解釈できない場合はエラーを返し、
   /// 部分的な結果は返さない。
   pub fn load(&self, environment: &Environment) -> Result<EffectiveConfig, ConfigError> {
      let base = self.read_document(COMMON_DOCUMENT)?;
      let overlay = self.read_document(environment.as_str())?;
      let root = self.policy.apply(base, overlay)?;

      tracing::info!(
         environment = %environment,
         dir = %self.dir.display(),
         "設定を読み込みました"
      );

      Ok(EffectiveConfig::new(environment.clone(), root))
   }

   fn locate(&self, stem: &str) -> Result<PathBuf, ConfigError> {
      EXTENSIONS
         .iter()
         .map(|ext| self.dir.join(format!("{stem}.{ext}")))
         .find(|candidate| candidate.is_file())
         .ok_or_else(|| ConfigError::NotFound {
            path: self.dir.join(format!("{stem}.{}", EXTENSIONS[0])),
         })
   }

   fn read_document(&self, stem: &str) -> Result<Mapping, ConfigError> {
      let path = self.locate(stem)?;
      tracing::debug!(path = %path.display(), "設定ファイルを読み込みます");

      let text = fs::read_to_string(&path).map_err(|source| match source.kind() {
         io::ErrorKind::NotFound => ConfigError::NotFound { path: path.clone() },
         _ => ConfigError::Read {
            path: path.clone(),
            source,
         },
      })?;
      parse_document(&text, &path)
   }
}

/// YAML テキストを設定ドキュメントとして解釈する
///
/// 空のドキュメント（コメントのみを含む）は空のマッピングとして扱う。
/// `path` はエラー報告にのみ使う。
pub fn parse_document(text: &str, path: &Path) -> Result<Mapping, ConfigError> {
   let is_blank = text.lines().all(|line| {
      let line = line.trim();
      line.is_empty() || line.starts_with('#')
   });
   if is_blank {
      return Ok(Mapping::new());
   }

   let parse_error = |source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
   };
   let mut value: serde_yaml::Value = serde_yaml::from_str(text).map_err(parse_error)?;
   value.apply_merge().map_err(parse_error)?;

   match ConfigValue::from_yaml(value, path)? {
      ConfigValue::Mapping(map) => Ok(map),
      ConfigValue::Null => Ok(Mapping::new()),
      _ => Err(ConfigError::NotAMapping {
         path: path.to_path_buf(),
      }),
   }
}

/// `CONFIG_DIR` の設定ディレクトリから指定環境の設定を解決する
pub fn resolve(environment: &Environment) -> Result<EffectiveConfig, ConfigError> {
   ConfigLoader::from_env().load(environment)
}
