//! # エラーレスポンスエンベロープ
//!
//! すべての失敗レスポンスで共通の `{ "data": {}, "message": "...", "code": -1 }` を提供する。
//!
//! ## 設計
//!
//! - 形は固定。障害の種類によってフィールドが増減することはない
//! - `message` はクライアントに見せてよい固定文言で、障害の詳細は含めない
//! - HTTP ステータスはボディではなくステータスラインで表現する（変換は各アプリの責務）

use serde::{Deserialize, Serialize};

/// エラー時の `code`
pub const ERROR_CODE: i32 = -1;

/// エラー時の `message`
pub const ERROR_MESSAGE: &str = "程序出错了";

/// 常に `{}` としてシリアライズされる空データ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyData {}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   pub data:    EmptyData,
   pub message: String,
   pub code:    i32,
}

impl ErrorResponse {
   /// 固定形のエラーエンベロープを作成する
   pub fn new() -> Self {
      Self {
         data:    EmptyData {},
         message: ERROR_MESSAGE.to_string(),
         code:    ERROR_CODE,
      }
   }
}

impl Default for ErrorResponse {
   fn default() -> Self {
      Self::new()
   }
}
