//! # Stratum API サーバー
//!
//! 設定解決とレスポンス正規化を備えた最小構成の HTTP サービス。
//!
//! ## リクエストの流れ
//!
//! ```text
//! Request
//!    ↓
//! TraceLayer → CatchPanicLayer → error_boundary → handler
//!                                                   ↓
//!                              Ok(T)                             Err(AppError)
//!                                ↓                                    ↓
//!            {"data": T, "code": 0, "msg": ...}   {"data": {}, "message": ..., "code": -1}
//! ```
//!
//! - 成功: [`response::Success`] が `ApiResponse` に包む
//! - 失敗: [`error::AppError`] とグローバルな [`middleware::error_boundary`] が
//!   `ErrorResponse` に変換する
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - 共有状態とルーター構築
//! - [`config`] - マージ済み設定から読み取るサーバー設定
//! - [`error`] - 障害の分類とエラーレスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - グローバルなエラー境界
//! - [`response`] - 成功レスポンスの正規化
//! - [`usecase`] - ハンドラから呼び出すサービス

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod response;
pub mod usecase;
