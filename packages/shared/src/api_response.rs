//! # 成功レスポンスエンベロープ
//!
//! 正常終了したハンドラの戻り値を `{ "data": T, "code": 0, "msg": "..." }` 形式で包む。

use serde::{Deserialize, Serialize};

/// 成功時の `code`
pub const SUCCESS_CODE: i32 = 0;

/// 成功時の `msg`
pub const SUCCESS_MESSAGE: &str = "请求成功";

/// 成功レスポンスの統一型
///
/// `data` にはハンドラの戻り値をそのまま格納する。
/// 値の形（文字列、数値、配列、オブジェクト、`null`）は一切見ない。
///
/// ## 使用例
///
/// ```
/// use stratum_shared::ApiResponse;
///
/// let response = ApiResponse::new("Hello World!");
/// assert_eq!(response.data, "Hello World!");
/// assert_eq!(response.code, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
   pub data: T,
   pub code: i32,
   pub msg:  String,
}

impl<T> ApiResponse<T> {
   /// 成功エンベロープを作成する
   pub fn new(data: T) -> Self {
      Self {
         data,
         code: SUCCESS_CODE,
         msg: SUCCESS_MESSAGE.to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use serde_json::{Value, json};

   use super::*;

   #[test]
   fn test_serializeで文字列をエンベロープに包む() {
      let response = ApiResponse::new("Hello World!");
      let json = serde_json::to_value(&response).unwrap();

      assert_eq!(
         json,
         json!({ "data": "Hello World!", "code": 0, "msg": "请求成功" })
      );
   }

   #[rstest]
   #[case::null(Value::Null)]
   #[case::空オブジェクト(json!({}))]
   #[case::数値(json!(42))]
   #[case::配列(json!([1, "two", null]))]
   #[case::オブジェクト(json!({ "data": 1, "code": 9 }))]
   fn test_任意の値をそのままdataに格納する(#[case] value: Value) {
      let json = serde_json::to_value(ApiResponse::new(value.clone())).unwrap();

      assert_eq!(json["data"], value);
      assert_eq!(json["code"], 0);
      assert_eq!(json["msg"], SUCCESS_MESSAGE);
   }

   #[test]
   fn test_フィールドはdata_code_msgの3つだけ() {
      let json = serde_json::to_value(ApiResponse::new(vec!["a", "b"])).unwrap();
      let keys: Vec<&String> = json.as_object().unwrap().keys().collect();

      assert_eq!(keys.len(), 3);
      assert!(json.get("data").is_some());
      assert!(json.get("code").is_some());
      assert!(json.get("msg").is_some());
   }

   #[test]
   fn test_deserializeでjsonからオブジェクトに変換する() {
      let json = r#"{"data": "world", "code": 0, "msg": "请求成功"}"#;
      let response: ApiResponse<String> = serde_json::from_str(json).unwrap();

      assert_eq!(response, ApiResponse::new("world".to_string()));
   }
}
