//! # 人物ハンドラ
//!
//! 入力のバインディング方法ごとのデモ。受け取った内容をそのまま文字列で返す。
//!
//! ## エンドポイント
//!
//! - `POST /person/json` - JSON ボディ
//! - `POST /person/upload` - multipart/form-data（テキスト項目 + 任意のファイル）
//! - `POST /person/add` - application/x-www-form-urlencoded
//! - `GET /person?name=&age=` - クエリ文字列
//! - `GET /person/{id}` - パスパラメータ
//!
//! バインディングに失敗した場合は extractor が 4xx を返し、
//! グローバルなエラー境界がエラーエンベロープに変換する。

use std::{
   collections::BTreeMap,
   path::{Path as FsPath, PathBuf},
   sync::Arc,
};

use anyhow::Context as _;
use axum::{
   Form,
   Json,
   body::Bytes,
   extract::{Multipart, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{app_builder::AppState, error::AppError, response::ApiResult};

/// 人物作成リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePerson {
   pub name: String,
   pub age:  u32,
}

impl CreatePerson {
   /// multipart のテキスト項目から組み立てる
   fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self, AppError> {
      let name = fields
         .get("name")
         .ok_or_else(|| AppError::BadRequest("name がありません".to_string()))?;
      let age = fields
         .get("age")
         .ok_or_else(|| AppError::BadRequest("age がありません".to_string()))?
         .trim()
         .parse::<u32>()
         .map_err(|e| AppError::BadRequest(format!("age が不正です: {e}")))?;

      Ok(Self {
         name: name.clone(),
         age,
      })
   }

   fn received(&self) -> ApiResult<String> {
      let json = serde_json::to_string(self).context("受信内容のシリアライズに失敗しました")?;
      Ok(format!("received: {json}").into())
   }
}

/// クエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct PersonQuery {
   pub name: Option<String>,
   pub age:  Option<u32>,
}

/// 受信したファイル項目（保存前）
#[derive(Debug)]
struct ReceivedFile {
   field:         String,
   original_name: String,
   bytes:         Bytes,
}

/// JSON ボディで受け取る
pub async fn create_from_json(Json(person): Json<CreatePerson>) -> ApiResult<String> {
   tracing::info!(?person, "JSON で受信しました");
   person.received()
}

/// URL エンコードされたフォームで受け取る
pub async fn create_from_form(Form(person): Form<CreatePerson>) -> ApiResult<String> {
   tracing::info!(?person, "フォームで受信しました");
   person.received()
}

/// multipart/form-data で受け取る
///
/// ファイル項目はメモリに受け取り、テキスト項目から [`CreatePerson`] を
/// 組み立てられた場合にだけ `upload.dir` へ生成した名前で保存する。
/// 拒否したリクエストのファイルはディスクに残らない。
pub async fn upload(
   State(state): State<Arc<AppState>>,
   mut multipart: Multipart,
) -> ApiResult<String> {
   let mut fields = BTreeMap::new();
   let mut files = Vec::new();

   while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
      let name = field.name().unwrap_or_default().to_string();
      let file_name = field.file_name().map(str::to_string);
      match file_name {
         Some(original_name) => {
            let bytes = field.bytes().await.map_err(multipart_error)?;
            files.push(ReceivedFile {
               field: name,
               original_name,
               bytes,
            });
         }
         None => {
            let value = field.text().await.map_err(multipart_error)?;
            fields.insert(name, value);
         }
      }
   }

   let person = CreatePerson::from_fields(&fields)?;
   store_files(&state.config.upload.dir, &files).await?;
   person.received()
}

/// クエリ文字列で受け取る
pub async fn query(Query(params): Query<PersonQuery>) -> ApiResult<String> {
   let name = params.name.unwrap_or_default();
   let age = params.age.map(|age| age.to_string()).unwrap_or_default();

   Ok(format!("received: name={name},age={age}").into())
}

/// パスパラメータで受け取る
pub async fn find_one(Path(id): Path<String>) -> ApiResult<String> {
   Ok(format!("received: id={id}").into())
}

/// 受信したファイルをすべて保存する
///
/// 途中で失敗した場合は、それまでに保存したファイルを削除してからエラーを返す。
async fn store_files(dir: &FsPath, files: &[ReceivedFile]) -> Result<Vec<PathBuf>, AppError> {
   if files.is_empty() {
      return Ok(Vec::new());
   }
   tokio::fs::create_dir_all(dir)
      .await
      .with_context(|| format!("アップロード先を作成できません: {}", dir.display()))?;

   let mut stored = Vec::with_capacity(files.len());
   for file in files {
      let path = dir.join(Uuid::now_v7().simple().to_string());
      if let Err(e) = tokio::fs::write(&path, &file.bytes).await {
         remove_stored(&stored).await;
         return Err(anyhow::Error::new(e)
            .context(format!("ファイルを保存できません: {}", path.display()))
            .into());
      }
      tracing::info!(
         field = %file.field,
         original_name = %file.original_name,
         path = %path.display(),
         size = file.bytes.len(),
         "ファイルを保存しました"
      );
      stored.push(path);
   }
   Ok(stored)
}

async fn remove_stored(paths: &[PathBuf]) {
   for path in paths {
      if let Err(e) = tokio::fs::remove_file(path).await {
         tracing::warn!(path = %path.display(), error = %e, "保存済みファイルを削除できません");
      }
   }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
   AppError::Status {
      status: e.status(),
      detail: e.body_text(),
   }
}
