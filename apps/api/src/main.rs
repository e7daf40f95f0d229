//! # Stratum API サーバー
//!
//! ## 起動シーケンス
//!
//! 1. 環境変数の読み込み（.env ファイル）
//! 2. トレーシングの初期化
//! 3. 設定の解決（`common.yml` + `<APP_ENV>.yml`）。失敗したら起動しない
//! 4. ルーターの構築
//! 5. HTTP サーバーの起動
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `APP_ENV` | No | 環境名（デフォルト: `development`） |
//! | `CONFIG_DIR` | No | 設定ディレクトリ（デフォルト: `config`） |
//! | `LOG_FORMAT` | No | `pretty` / `json`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,stratum=debug`） |
//! | `LOG_DAILY_ROTATE_FILE_OPEN` | No | `OPEN` でローテーションするログファイルにも出力 |
//! | `LOG_DIR` | No | ログファイルの出力先（デフォルト: `logs`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p stratum-api
//!
//! # 本番環境
//! APP_ENV=production LOG_FORMAT=json LOG_DAILY_ROTATE_FILE_OPEN=OPEN \
//!    cargo run -p stratum-api --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use stratum_api::{
   app_builder::{AppState, build_router},
   config::AppConfig,
};
use stratum_config::{ConfigLoader, Environment};
use stratum_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let tracing_config = TracingConfig::from_env("stratum-api");
   let _log_guard = init_tracing(&tracing_config).context("ログ出力を初期化できません")?;
   let _tracing_guard = tracing::info_span!("app", service = %tracing_config.service_name).entered();

   // 設定が不完全なまま起動しない
   let environment = Environment::from_env()?;
   let loader = ConfigLoader::from_env();
   tracing::info!(config_dir = %loader.dir().display(), "設定ディレクトリ");
   let effective = loader
      .load(&environment)
      .context("設定の読み込みに失敗しました")?;
   let config = AppConfig::from_effective(&effective).context("サーバー設定が不正です")?;

   tracing::info!(
      environment = %environment,
      "サーバーを起動します: {}",
      config.bind_address()
   );

   let addr: SocketAddr = config
      .bind_address()
      .parse()
      .context("アドレスのパースに失敗しました")?;
   let app = build_router(Arc::new(AppState::new(effective, config)));

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
