//! # 成功レスポンスの正規化
//!
//! ハンドラの戻り値を `{"data": T, "code": 0, "msg": "请求成功"}` に包む。
//!
//! ハンドラは [`ApiResult<T>`] を返し、`Ok(value.into())` と書くだけでよい。
//! 値の形は問わない（文字列、数値、配列、オブジェクト、`()` → `null`）。
//! ステータスはフレームワークの既定（200 OK）のまま変更しない。

use axum::{
   http::{HeaderValue, StatusCode, header},
   response::{IntoResponse, Response},
};
use serde::Serialize;
use stratum_shared::ApiResponse;

use crate::error::{AppError, JSON_CONTENT_TYPE};

/// 成功レスポンスに包まれるハンドラの戻り値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success<T>(pub T);

impl<T> From<T> for Success<T> {
   fn from(value: T) -> Self {
      Self(value)
   }
}

/// ハンドラの戻り値型
pub type ApiResult<T> = Result<Success<T>, AppError>;

impl<T: Serialize> IntoResponse for Success<T> {
   fn into_response(self) -> Response {
      match serde_json::to_vec(&ApiResponse::new(self.0)) {
         Ok(body) => (
            StatusCode::OK,
            [(
               header::CONTENT_TYPE,
               HeaderValue::from_static(JSON_CONTENT_TYPE),
            )],
            body,
         )
            .into_response(),
         Err(e) => {
            AppError::Internal(anyhow::Error::new(e).context("レスポンスのシリアライズに失敗しました"))
               .into_response()
         }
      }
   }
}
