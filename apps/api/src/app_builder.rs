//! # アプリケーション構築
//!
//! 共有状態の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。
//!
//! ## レイヤー構成（外側から）
//!
//! 1. `TraceLayer` - リクエストごとのスパン
//! 2. `CatchPanicLayer` - パニックを 500 のエラーエンベロープに変換
//! 3. [`error_boundary`] - 正規化されていない 4xx / 5xx をエラーエンベロープに変換
//! 4. ルート + フォールバック（未定義のパスは 404）

use std::sync::Arc;

use axum::{
   Router,
   middleware::from_fn,
   routing::{get, post},
};
use stratum_config::EffectiveConfig;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
   config::AppConfig,
   error::AppError,
   handler::{create_from_form, create_from_json, find_one, hello, query, upload},
   middleware::{error_boundary, handle_panic},
   usecase::GreetingUseCase,
};

/// 全ハンドラで共有する状態
///
/// 起動後は読み取り専用。`Arc` で包んでロックなしに共有する。
#[derive(Debug)]
pub struct AppState {
   /// マージ済みの設定全体
   pub effective: Arc<EffectiveConfig>,
   /// サーバー設定
   pub config:    AppConfig,
   pub greeting:  GreetingUseCase,
}

impl AppState {
   pub fn new(effective: EffectiveConfig, config: AppConfig) -> Self {
      Self {
         effective: Arc::new(effective),
         config,
         greeting: GreetingUseCase::new(),
      }
   }
}

/// アプリケーションのルーターを構築する
pub fn build_router(state: Arc<AppState>) -> Router {
   let routes = Router::new()
      .route("/", get(hello))
      .route("/person", get(query))
      .route("/person/{id}", get(find_one))
      .route("/person/json", post(create_from_json))
      .route("/person/upload", post(upload))
      .route("/person/add", post(create_from_form))
      .with_state(state);

   with_error_boundary(routes)
}

/// ルーター全体にエラー境界を適用する
///
/// ルートを追加し終えたルーターに対して 1 度だけ呼ぶ。
/// これ以降に追加したルートにはレイヤーが適用されない。
pub fn with_error_boundary(router: Router) -> Router {
   router
      .fallback(not_found)
      .layer(from_fn(error_boundary))
      .layer(CatchPanicLayer::custom(handle_panic))
      .layer(TraceLayer::new_for_http())
}

async fn not_found() -> AppError {
   AppError::NotFound
}
