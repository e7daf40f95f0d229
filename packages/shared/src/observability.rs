//! # ログ出力
//!
//! `tracing` の subscriber を組み立てる。出力先は次のとおり。
//!
//! | 出力先 | 有効条件 | 出力するイベント |
//! |--------|----------|------------------|
//! | コンソール | 常に | `RUST_LOG` に従う |
//! | `<LOG_DIR>/application.<日時>.log` | `LOG_DAILY_ROTATE_FILE_OPEN=OPEN` | `RUST_LOG` に従う |
//! | `<LOG_DIR>/error.<日時>.log` | 同上 | ERROR のみ |
//!
//! ファイルは 1 時間ごとに切り替わり、直近 14 日分だけ残る。
//! ファイルへの書き込みは専用スレッドで行うため、[`init_tracing`] が返す
//! [`TracingGuard`] をプロセス終了まで保持すること。

use std::{env, path::PathBuf};

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,stratum=debug";

pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// `OPEN` のときファイル出力を有効にする
pub const ROTATE_FILE_VAR: &str = "LOG_DAILY_ROTATE_FILE_OPEN";

pub const LOG_DIR_VAR: &str = "LOG_DIR";

pub const DEFAULT_LOG_DIR: &str = "logs";

const ROTATE_FILE_ON: &str = "OPEN";

/// 1 時間ごとのファイルを 14 日分
const RETAINED_FILES: usize = 14 * 24;

/// コンソールの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
   /// 1 イベント 1 行の JSON（フィールドはトップレベル）
   Json,
   #[default]
   Pretty,
}

impl LogFormat {
   /// `LOG_FORMAT` の値から決める
   ///
   /// 大文字小文字は区別しない。未設定・空なら `Pretty`。
   /// 知らない値も `Pretty` にするが、subscriber がまだ無いので stderr に直接警告する。
   pub fn from_value(value: Option<&str>) -> Self {
      match value.map(str::trim) {
         None | Some("") => Self::default(),
         Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
         Some(v) if v.eq_ignore_ascii_case("pretty") => Self::Pretty,
         Some(other) => {
            eprintln!("WARNING: {LOG_FORMAT_VAR}={other:?} は未対応のため pretty で出力します");
            Self::Pretty
         }
      }
   }

   pub fn from_env() -> Self {
      Self::from_value(env::var(LOG_FORMAT_VAR).ok().as_deref())
   }
}

/// ローテーションするログファイルの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingFileConfig {
   /// ファイルを置くディレクトリ（無ければ作る）
   pub dir:       PathBuf,
   /// 残すファイル数（application / error それぞれ）
   pub max_files: usize,
}

impl RollingFileConfig {
   pub fn new(dir: impl Into<PathBuf>) -> Self {
      Self {
         dir:       dir.into(),
         max_files: RETAINED_FILES,
      }
   }

   /// 切り替えの値とディレクトリの値から決める
   ///
   /// `toggle` が `OPEN`（大文字小文字は区別しない）のときだけ `Some`。
   /// `dir` が未設定・空なら [`DEFAULT_LOG_DIR`]。
   pub fn from_values(toggle: Option<&str>, dir: Option<&str>) -> Option<Self> {
      let enabled = toggle.is_some_and(|v| v.trim().eq_ignore_ascii_case(ROTATE_FILE_ON));
      if !enabled {
         return None;
      }
      let dir = dir
         .map(str::trim)
         .filter(|d| !d.is_empty())
         .unwrap_or(DEFAULT_LOG_DIR);
      Some(Self::new(dir))
   }

   pub fn from_env() -> Option<Self> {
      Self::from_values(
         env::var(ROTATE_FILE_VAR).ok().as_deref(),
         env::var(LOG_DIR_VAR).ok().as_deref(),
      )
   }

   #[cfg(feature = "observability")]
   fn appender(
      &self,
      prefix: &str,
   ) -> Result<tracing_appender::rolling::RollingFileAppender, tracing_appender::rolling::InitError>
   {
      use tracing_appender::rolling::{RollingFileAppender, Rotation};

      RollingFileAppender::builder()
         .rotation(Rotation::HOURLY)
         .filename_prefix(prefix)
         .filename_suffix("log")
         .max_log_files(self.max_files)
         .build(&self.dir)
   }
}

/// subscriber の組み立て方
#[derive(Debug, Clone)]
pub struct TracingConfig {
   /// 起動ログのスパンに付けるサービス名
   pub service_name: String,
   pub log_format:   LogFormat,
   /// `None` ならコンソールのみ
   pub rolling_file: Option<RollingFileConfig>,
}

impl TracingConfig {
   pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
      Self {
         service_name: service_name.into(),
         log_format,
         rolling_file: None,
      }
   }

   pub fn with_rolling_file(mut self, rolling_file: Option<RollingFileConfig>) -> Self {
      self.rolling_file = rolling_file;
      self
   }

   /// `LOG_FORMAT` / `LOG_DAILY_ROTATE_FILE_OPEN` / `LOG_DIR` から組み立てる
   pub fn from_env(service_name: impl Into<String>) -> Self {
      Self::new(service_name, LogFormat::from_env()).with_rolling_file(RollingFileConfig::from_env())
   }
}

/// ファイル書き込みスレッドの寿命
///
/// drop するとバッファに残ったログを書き出してスレッドが終わる。
#[cfg(feature = "observability")]
#[must_use = "drop するとファイルへのログ出力が止まる"]
#[derive(Debug)]
pub struct TracingGuard {
   _workers: Vec<tracing_appender::non_blocking::WorkerGuard>,
}

/// グローバルな subscriber を登録する
///
/// プロセスで 1 度だけ呼ぶ。ログディレクトリを作れない場合はエラー。
#[cfg(feature = "observability")]
pub fn init_tracing(
   config: &TracingConfig,
) -> Result<TracingGuard, tracing_appender::rolling::InitError> {
   use tracing_subscriber::{
      EnvFilter,
      Layer as _,
      filter::LevelFilter,
      fmt,
      layer::SubscriberExt,
      util::SubscriberInitExt,
   };

   let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

   let console = match config.log_format {
      LogFormat::Json => fmt::layer()
         .json()
         .flatten_event(true)
         .with_current_span(true)
         .with_span_list(false)
         .boxed(),
      LogFormat::Pretty => fmt::layer().boxed(),
   };

   let mut workers = Vec::new();
   let (application_file, error_file) = match &config.rolling_file {
      Some(rolling) => {
         let (application_writer, application_worker) =
            tracing_appender::non_blocking(rolling.appender("application")?);
         let (error_writer, error_worker) =
            tracing_appender::non_blocking(rolling.appender("error")?);
         workers.extend([application_worker, error_worker]);

         (
            Some(fmt::layer().with_ansi(false).with_writer(application_writer)),
            Some(
               fmt::layer()
                  .with_ansi(false)
                  .with_writer(error_writer)
                  .with_filter(LevelFilter::ERROR),
            ),
         )
      }
      None => (None, None),
   };

   tracing_subscriber::registry()
      .with(filter)
      .with(console)
      .with(application_file)
      .with(error_file)
      .init();

   Ok(TracingGuard { _workers: workers })
}
