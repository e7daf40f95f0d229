//! # Stratum 共有ユーティリティ
//!
//! API サーバーと設定クレートから共通で使う型を提供する。
//!
//! ## 設計方針
//!
//! - レスポンスエンベロープは純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum への依存は持たない（HTTP レスポンスへの変換は各アプリの責務）
//! - トレーシング初期化は `observability` feature でのみ有効化する

pub mod api_response;
pub mod error_response;
pub mod observability;

pub use api_response::ApiResponse;
pub use error_response::{EmptyData, ErrorResponse};
