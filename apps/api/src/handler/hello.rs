//! # 挨拶ハンドラ
//!
//! ```text
//! GET /
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! { "data": "Hello World!", "code": 0, "msg": "请求成功" }
//! ```

use std::sync::Arc;

use axum::extract::State;

use crate::{app_builder::AppState, response::ApiResult};

/// 挨拶を返す
///
/// 設定の `common` / `mysql` セクションを参照し、ログに出力する。
pub async fn hello(State(state): State<Arc<AppState>>) -> ApiResult<String> {
   let config = &state.effective;
   tracing::info!(
      environment = %config.environment(),
      common = ?config.get("common"),
      mysql = ?config.get("mysql"),
      "設定を参照しました"
   );

   Ok(state.greeting.hello().to_string().into())
}
