//! # ミドルウェア
//!
//! ルーター全体に 1 度だけ適用するエラー境界を提供する。

mod error_boundary;

pub use error_boundary::{error_boundary, handle_panic};
