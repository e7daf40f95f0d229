//! # API エラーハンドリング
//!
//! ハンドラで発生した障害を分類し、固定形のエラーレスポンスへ変換する。
//!
//! ## 設計方針
//!
//! - **固定形**: どの障害でもボディは `{"data": {}, "message": "程序出错了", "code": -1}`
//! - **分類はステータスラインで表す**: HTTP ステータスを持つ障害はそのまま使い、
//!   持たない障害（`Internal`、パニック）は 500 にする
//! - **詳細はログのみ**: 障害の詳細はクライアントに返さず、`tracing` にだけ出力する
//!
//! ## エラーの流れ
//!
//! ```text
//! handler が返す Err(AppError) ─┐
//! extractor の rejection など ──┼─▶ normalize() ─▶ (StatusCode, ErrorResponse)
//! パニック ─────────────────────┘
//! ```
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use stratum_api::{error::AppError, response::ApiResult};
//!
//! async fn find(id: String) -> ApiResult<String> {
//!     let person = repository.find(&id).ok_or(AppError::NotFound)?;
//!     Ok(person.name.into())
//! }
//! ```

use axum::{
   http::{HeaderValue, StatusCode, header},
   response::{IntoResponse, Response},
};
use stratum_shared::ErrorResponse;
use thiserror::Error;

/// レスポンスの `Content-Type`
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// シリアライズに失敗した場合に返す固定ボディ
const FALLBACK_BODY: &str = r#"{"data":{},"message":"程序出错了","code":-1}"#;

/// エラー正規化済みであることを示すレスポンス拡張
///
/// [`crate::middleware::error_boundary`] はこの拡張を持つレスポンスを書き換えない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedError;

/// API 層で発生する障害
///
/// `IntoResponse` を実装しているため、ハンドラから `Err` で返すだけで
/// エラーレスポンスに変換される。
#[derive(Debug, Error)]
pub enum AppError {
   /// リソースが見つからない（404 Not Found）
   #[error("リソースが見つかりません")]
   NotFound,

   /// 不正なリクエスト（400 Bad Request）
   #[error("不正なリクエスト: {0}")]
   BadRequest(String),

   /// 認証エラー（401 Unauthorized）
   #[error("認証エラー")]
   Unauthorized,

   /// 権限エラー（403 Forbidden）
   #[error("権限エラー")]
   Forbidden,

   /// 競合（409 Conflict）
   #[error("リソースが競合しています")]
   Conflict,

   /// 任意の HTTP ステータスを持つ障害
   ///
   /// extractor の rejection など、フレームワークが決めたステータスをそのまま運ぶ。
   #[error("HTTP {status}: {detail}")]
   Status { status: StatusCode, detail: String },

   /// 分類されていない障害（500 Internal Server Error）
   ///
   /// `#[from]` により、`?` で任意の `anyhow::Error` から変換される。
   #[error("内部エラー: {0:#}")]
   Internal(#[from] anyhow::Error),
}

impl AppError {
   /// 障害自身が持つ HTTP ステータス
   ///
   /// 分類されていない障害は `None`。
   pub fn classification(&self) -> Option<StatusCode> {
      match self {
         AppError::NotFound => Some(StatusCode::NOT_FOUND),
         AppError::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
         AppError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
         AppError::Forbidden => Some(StatusCode::FORBIDDEN),
         AppError::Conflict => Some(StatusCode::CONFLICT),
         AppError::Status { status, .. } => Some(*status),
         AppError::Internal(_) => None,
      }
   }

   /// レスポンスに使う HTTP ステータス
   pub fn status_code(&self) -> StatusCode {
      resolve_status(self.classification())
   }
}

/// 分類からレスポンスのステータスを決める
///
/// エラーでないステータス（1xx〜3xx）が渡された場合も 500 にする。
/// 成功ステータスのエラーエンベロープは返さない。
pub fn resolve_status(classification: Option<StatusCode>) -> StatusCode {
   match classification {
      Some(status) if status.is_client_error() || status.is_server_error() => status,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
   }
}

/// 障害をステータスとエラーエンベロープに正規化する
pub fn normalize(fault: &AppError) -> (StatusCode, ErrorResponse) {
   (fault.status_code(), ErrorResponse::new())
}

/// エラーエンベロープのレスポンスを組み立てる
///
/// ボディのシリアライズに失敗しても固定ボディで応答し、この関数自体は失敗しない。
pub fn error_response(status: StatusCode, body: &ErrorResponse) -> Response {
   let bytes = serde_json::to_vec(body).unwrap_or_else(|_| FALLBACK_BODY.as_bytes().to_vec());
   let mut response = (
      status,
      [(
         header::CONTENT_TYPE,
         HeaderValue::from_static(JSON_CONTENT_TYPE),
      )],
      bytes,
   )
      .into_response();
   response.extensions_mut().insert(NormalizedError);
   response
}

impl IntoResponse for AppError {
   fn into_response(self) -> Response {
      let (status, body) = normalize(&self);

      // 詳細はログにのみ出力する
      if status.is_server_error() {
         tracing::error!(status = status.as_u16(), error = ?self, "リクエストの処理に失敗しました");
      } else {
         tracing::warn!(status = status.as_u16(), error = %self, "リクエストを拒否しました");
      }

      error_response(status, &body)
   }
}
