//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - 戻り値は [`ApiResult`](crate::response::ApiResult) に統一し、
//!   成功・失敗どちらのエンベロープに包むかはハンドラの外で決める
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs          # 親モジュール（re-export）
//! └── handler/
//!     ├── hello.rs    # GET /
//!     └── person.rs   # 入力バインディングのデモ（JSON / multipart / form / query / path）
//! ```

pub mod hello;
pub mod person;

pub use hello::hello;
pub use person::{
   CreatePerson,
   PersonQuery,
   create_from_form,
   create_from_json,
   find_one,
   query,
   upload,
};
