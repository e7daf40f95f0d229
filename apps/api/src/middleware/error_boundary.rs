//! # グローバルなエラー境界
//!
//! ハンドラの外で生まれたエラーレスポンスもエラーエンベロープに揃える。
//!
//! ## 対象
//!
//! - extractor の rejection（不正な JSON、`Content-Type` 不一致など）
//! - メソッド不一致（405）
//! - ハンドラのパニック（[`handle_panic`] を `CatchPanicLayer` に渡す）
//!
//! [`AppError`] から作られたレスポンスは [`NormalizedError`] 拡張を持つため、
//! ここでは書き換えない。

use std::any::Any;

use axum::{
   body::{self, Body},
   extract::Request,
   middleware::Next,
   response::{IntoResponse, Response},
};

use crate::error::{AppError, NormalizedError};

/// ログ用に読み取るボディの上限
const DETAIL_LIMIT: usize = 16 * 1024;

/// 正規化されていない 4xx / 5xx レスポンスをエラーエンベロープに置き換える
///
/// 元のステータスを障害の分類として引き継ぎ、元のボディはログにのみ出力する。
pub async fn error_boundary(request: Request, next: Next) -> Response {
   let response = next.run(request).await;

   let status = response.status();
   let is_error = status.is_client_error() || status.is_server_error();
   if !is_error || response.extensions().get::<NormalizedError>().is_some() {
      return response;
   }

   let detail = read_detail(response.into_body()).await;
   AppError::Status { status, detail }.into_response()
}

async fn read_detail(body: Body) -> String {
   match body::to_bytes(body, DETAIL_LIMIT).await {
      Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
      Err(_) => "<読み取れないボディ>".to_string(),
   }
}

/// パニックを 500 のエラーエンベロープに変換する
///
/// `tower_http::catch_panic::CatchPanicLayer::custom` に渡す。
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
   let message = if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
   } else if let Some(s) = payload.downcast_ref::<&str>() {
      (*s).to_string()
   } else {
      "不明なパニック".to_string()
   };

   AppError::Internal(anyhow::anyhow!("ハンドラがパニックしました: {message}")).into_response()
}

#[cfg(test)]
mod tests {
   use axum::{
      Router,
      http::{Request as HttpRequest, StatusCode, header},
      middleware::from_fn,
      routing::get,
   };
   use pretty_assertions::assert_eq;
   use tower::ServiceExt;

   use super::*;

   async fn call(router: Router, uri: &str) -> Response {
      router
         .layer(from_fn(error_boundary))
         .oneshot(HttpRequest::get(uri).body(Body::empty()).unwrap())
         .await
         .unwrap()
   }

   async fn body_json(response: Response) -> serde_json::Value {
      let bytes = body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      serde_json::from_slice(&bytes).unwrap()
   }

   #[tokio::test]
   async fn test_素のエラーレスポンスはエンベロープに置き換わる() {
      let router = Router::new().route(
         "/teapot",
         get(|| async { (StatusCode::IM_A_TEAPOT, "plain text detail") }),
      );

      let response = call(router, "/teapot").await;

      assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
      assert_eq!(
         response.headers()[header::CONTENT_TYPE],
         "application/json; charset=utf-8"
      );
      assert_eq!(
         body_json(response).await,
         serde_json::json!({ "data": {}, "message": "程序出错了", "code": -1 })
      );
   }

   #[tokio::test]
   async fn test_成功レスポンスは書き換えない() {
      let router = Router::new().route("/ok", get(|| async { "raw" }));

      let response = call(router, "/ok").await;

      assert_eq!(response.status(), StatusCode::OK);
      let bytes = body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      assert_eq!(&bytes[..], b"raw");
   }

   #[tokio::test]
   async fn test_正規化済みのエラーはそのまま通す() {
      let router = Router::new().route(
         "/missing",
         get(|| async { AppError::NotFound.into_response() }),
      );

      let response = call(router, "/missing").await;

      assert_eq!(response.status(), StatusCode::NOT_FOUND);
      assert!(response.extensions().get::<NormalizedError>().is_some());
   }

   #[tokio::test]
   async fn test_パニックのペイロードによらず500になる() {
      let payloads: Vec<Box<dyn Any + Send>> = vec![
         Box::new("static str"),
         Box::new(String::from("owned")),
         Box::new(42_u8),
      ];

      for payload in payloads {
         let response = handle_panic(payload);

         assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
         assert_eq!(body_json(response).await["code"], -1);
      }
   }
}
