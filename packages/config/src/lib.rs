//! # Stratum 設定解決
//!
//! `common` 設定と環境別設定の 2 つの YAML ドキュメントを読み込み、
//! 環境別の値を優先してディープマージした [`EffectiveConfig`] を返す。
//!
//! ## ファイル配置
//!
//! ```text
//! config/
//! ├── common.yml        # 常に読み込む
//! ├── development.yml   # APP_ENV 未設定時
//! └── production.yml
//! ```
//!
//! ## マージ規則
//!
//! - マッピング同士はキー単位で再帰的にマージする
//! - それ以外（スカラー、シーケンス、null）は上書き側の値で丸ごと置き換える
//! - マッピングとスカラーの衝突は既定で置き換え（[`MergePolicy::Replace`]）。
//!   [`MergePolicy::Strict`] を指定するとエラーになる
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use stratum_config::{ConfigLoader, Environment};
//!
//! let environment = Environment::from_env()?;
//! let config = ConfigLoader::new("config").load(&environment)?;
//! let port = config.get("server.port");
//! ```

mod effective;
mod environment;
mod error;
mod loader;
mod value;

pub use effective::EffectiveConfig;
pub use environment::{DEFAULT_ENVIRONMENT, ENVIRONMENT_VAR, Environment};
pub use error::ConfigError;
pub use loader::{
   COMMON_DOCUMENT,
   CONFIG_DIR_VAR,
   ConfigLoader,
   DEFAULT_CONFIG_DIR,
   parse_document,
   resolve,
};
pub use value::{ConfigValue, Mapping, MergePolicy, merge, merge_mappings, merge_strict};
