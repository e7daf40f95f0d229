//! # ユースケース
//!
//! ハンドラから呼び出すサービス。起動時に 1 度だけ構築し、`AppState` で共有する。

/// 挨拶を返すサービス
#[derive(Debug, Clone)]
pub struct GreetingUseCase {
   greeting: String,
}

impl GreetingUseCase {
   pub fn new() -> Self {
      tracing::info!("GreetingUseCase を初期化しました");
      Self {
         greeting: "Hello World!".to_string(),
      }
   }

   pub fn hello(&self) -> &str {
      &self.greeting
   }
}

impl Default for GreetingUseCase {
   fn default() -> Self {
      Self::new()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_helloはhello_worldを返す() {
      assert_eq!(GreetingUseCase::new().hello(), "Hello World!");
   }
}
