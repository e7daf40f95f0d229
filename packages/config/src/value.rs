//! # 設定値とディープマージ
//!
//! YAML ドキュメントを再帰的な和型 [`ConfigValue`] で表現し、
//! 構造的再帰でマージする。
//!
//! ## YAML からの変換規則
//!
//! - 数値・真偽値のキーは文字列化する。文字列化の結果が同じマッピング内の
//!   既存キーと重なった場合は [`ConfigError::DuplicateKey`]
//! - タグ（`!env TOKEN` など）は解釈せずに捨て、中身の値をそのまま使う。
//!   `!env TOKEN` は文字列 `"TOKEN"` になり、環境変数の展開は行わない

use std::{collections::BTreeMap, path::Path};

use serde::Serialize;

use crate::ConfigError;

/// 文字列キーのマッピング
pub type Mapping = BTreeMap<String, ConfigValue>;

/// 設定ドキュメントの 1 ノード
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
   Null,
   Bool(bool),
   Integer(i64),
   Float(f64),
   String(String),
   Sequence(Vec<ConfigValue>),
   Mapping(Mapping),
}

/// マッピングとそれ以外が衝突したときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
   /// 上書き側の値でサブツリーごと置き換える
   #[default]
   Replace,
   /// [`ConfigError::TypeMismatch`] を返す
   Strict,
}

impl ConfigValue {
   pub fn is_mapping(&self) -> bool {
      matches!(self, ConfigValue::Mapping(_))
   }

   pub fn as_mapping(&self) -> Option<&Mapping> {
      match self {
         ConfigValue::Mapping(map) => Some(map),
         _ => None,
      }
   }

   pub fn as_str(&self) -> Option<&str> {
      match self {
         ConfigValue::String(s) => Some(s),
         _ => None,
      }
   }

   pub fn as_i64(&self) -> Option<i64> {
      match self {
         ConfigValue::Integer(n) => Some(*n),
         _ => None,
      }
   }

   pub fn as_bool(&self) -> Option<bool> {
      match self {
         ConfigValue::Bool(b) => Some(*b),
         _ => None,
      }
   }

   /// `serde_yaml::Value` から変換する
   ///
   /// 変換規則はモジュールドキュメントを参照。
   /// `path` はエラー報告用。
   pub(crate) fn from_yaml(value: serde_yaml::Value, path: &Path) -> Result<Self, ConfigError> {
      use serde_yaml::Value;

      Ok(match value {
         Value::Null => ConfigValue::Null,
         Value::Bool(b) => ConfigValue::Bool(b),
         Value::Number(n) => {
            if let Some(i) = n.as_i64() {
               ConfigValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
               ConfigValue::Float(f)
            } else {
               ConfigValue::String(n.to_string())
            }
         }
         Value::String(s) => ConfigValue::String(s),
         Value::Sequence(items) => ConfigValue::Sequence(
            items
               .into_iter()
               .map(|item| ConfigValue::from_yaml(item, path))
               .collect::<Result<_, _>>()?,
         ),
         Value::Mapping(entries) => {
            let mut map = Mapping::new();
            for (key, value) in entries {
               let key = match key {
                  Value::String(s) => s,
                  Value::Bool(b) => b.to_string(),
                  Value::Number(n) => n.to_string(),
                  other => {
                     return Err(ConfigError::NonStringKey {
                        path: path.to_path_buf(),
                        key:  format!("{other:?}"),
                     });
                  }
               };
               let value = ConfigValue::from_yaml(value, path)?;
               if map.contains_key(&key) {
                  return Err(ConfigError::DuplicateKey {
                     path: path.to_path_buf(),
                     key,
                  });
               }
               map.insert(key, value);
            }
            ConfigValue::Mapping(map)
         }
         Value::Tagged(tagged) => ConfigValue::from_yaml(tagged.value, path)?,
      })
   }
}

/// 2 つの値をディープマージする（上書き側優先）
///
/// 両方がマッピングのときだけ再帰し、それ以外は `overlay` をそのまま返す。
/// 失敗しない。
pub fn merge(base: ConfigValue, overlay: ConfigValue) -> ConfigValue {
   match (base, overlay) {
      (ConfigValue::Mapping(base), ConfigValue::Mapping(overlay)) => {
         ConfigValue::Mapping(merge_mappings(base, overlay))
      }
      (_, overlay) => overlay,
   }
}

/// 2 つのマッピングをディープマージする
pub fn merge_mappings(mut base: Mapping, overlay: Mapping) -> Mapping {
   for (key, overlay_value) in overlay {
      let merged = match base.remove(&key) {
         Some(base_value) => merge(base_value, overlay_value),
         None => overlay_value,
      };
      base.insert(key, merged);
   }
   base
}

/// マッピングとそれ以外の衝突をエラーにするマージ
///
/// 衝突が 1 つでもあれば何もマージせずに最初の衝突箇所を返す。
pub fn merge_strict(base: Mapping, overlay: Mapping) -> Result<Mapping, ConfigError> {
   let mut key_path = Vec::new();
   check_compatible(&base, &overlay, &mut key_path)?;
   Ok(merge_mappings(base, overlay))
}

fn check_compatible<'a>(
   base: &'a Mapping,
   overlay: &'a Mapping,
   key_path: &mut Vec<&'a str>,
) -> Result<(), ConfigError> {
   for (key, overlay_value) in overlay {
      let Some(base_value) = base.get(key) else {
         continue;
      };
      key_path.push(key);
      match (base_value, overlay_value) {
         (ConfigValue::Mapping(b), ConfigValue::Mapping(o)) => check_compatible(b, o, key_path)?,
         (b, o) if b.is_mapping() != o.is_mapping() => {
            return Err(ConfigError::TypeMismatch {
               key_path: key_path.join("."),
            });
         }
         _ => {}
      }
      key_path.pop();
   }
   Ok(())
}

impl MergePolicy {
   /// ポリシーに従ってマッピングをマージする
   pub fn apply(self, base: Mapping, overlay: Mapping) -> Result<Mapping, ConfigError> {
      match self {
         MergePolicy::Replace => Ok(merge_mappings(base, overlay)),
         MergePolicy::Strict => merge_strict(base, overlay),
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   fn yaml(text: &str) -> ConfigValue {
      let value: serde_yaml::Value = serde_yaml::from_str(text).unwrap();
      ConfigValue::from_yaml(value, Path::new("test.yml")).unwrap()
   }

   fn mapping(text: &str) -> Mapping {
      match yaml(text) {
         ConfigValue::Mapping(map) => map,
         other => panic!("mapping を期待したが {other:?}"),
      }
   }

   #[test]
   fn test_ネストしたマッピングはキー単位でマージされる() {
      let base = yaml("a: {x: 1, y: 2}\nb: base\n");
      let overlay = yaml("a: {y: 3}\nb: override\n");

      assert_eq!(
         merge(base, overlay),
         yaml("a: {x: 1, y: 3}\nb: override\n")
      );
   }

   #[rstest]
   #[case::スカラーのみ("a: 1\nb: text\n")]
   #[case::ネスト("a: {b: {c: [1, 2]}, d: true}\n")]
   #[case::空("{}")]
   #[case::null値("a: ~\nb: {c: ~}\n")]
   fn test_自分自身とマージしても変わらない(#[case] text: &str) {
      let document = yaml(text);

      assert_eq!(merge(document.clone(), document.clone()), document);
   }

   #[test]
   fn test_両方にあるキーは上書き側の値になる() {
      let merged = merge(
         yaml("db: {host: localhost, port: 3306}\nname: base\n"),
         yaml("db: {host: prod.example.com}\nname: prod\n"),
      );

      assert_eq!(
         merged,
         yaml("db: {host: prod.example.com, port: 3306}\nname: prod\n")
      );
   }

   #[test]
   fn test_ベースにしかないキーは保持される() {
      let merged = merge(
         yaml("keep: {deep: {value: 1}}\nalso: [a, b]\n"),
         yaml("other: 2\n"),
      );

      assert_eq!(
         merged,
         yaml("keep: {deep: {value: 1}}\nalso: [a, b]\nother: 2\n")
      );
   }

   #[test]
   fn test_シーケンスは要素単位ではなく丸ごと置き換える() {
      let merged = merge(yaml("list: [1, 2, 3]\n"), yaml("list: [9]\n"));

      assert_eq!(merged, yaml("list: [9]\n"));
   }

   #[rstest]
   #[case::スカラーがマッピングを置き換える("a: {x: 1}\n", "a: 5\n", "a: 5\n")]
   #[case::マッピングがスカラーを置き換える("a: 5\n", "a: {x: 1}\n", "a: {x: 1}\n")]
   #[case::nullがマッピングを置き換える("a: {x: 1}\n", "a: ~\n", "a: ~\n")]
   fn test_型の衝突は上書き側で置き換える(
      #[case] base: &str,
      #[case] overlay: &str,
      #[case] expected: &str,
   ) {
      assert_eq!(merge(yaml(base), yaml(overlay)), yaml(expected));
   }

   #[test]
   fn test_strictでは型の衝突がエラーになる() {
      let result = merge_strict(mapping("a: {b: {c: 1}}\n"), mapping("a: {b: 5}\n"));

      match result {
         Err(ConfigError::TypeMismatch { key_path }) => assert_eq!(key_path, "a.b"),
         other => panic!("TypeMismatch を期待したが {other:?}"),
      }
   }

   #[test]
   fn test_strictでも衝突がなければreplaceと同じ結果になる() {
      let base = mapping("a: {x: 1, y: [1]}\nb: base\n");
      let overlay = mapping("a: {y: [2]}\nb: override\nc: new\n");

      assert_eq!(
         merge_strict(base.clone(), overlay.clone()).unwrap(),
         merge_mappings(base, overlay)
      );
   }

   #[test]
   fn test_applyはポリシーごとに振る舞いが変わる() {
      let base = mapping("a: {x: 1}\n");
      let overlay = mapping("a: 1\n");

      assert_eq!(
         MergePolicy::Replace
            .apply(base.clone(), overlay.clone())
            .unwrap(),
         overlay
      );
      assert!(MergePolicy::Strict.apply(base, overlay).is_err());
   }

   #[test]
   fn test_yamlのスカラーが対応する型に変換される() {
      let map = mapping("i: 42\nf: 1.5\ns: text\nb: true\nn: ~\nbig: 18446744073709551615\n");

      assert_eq!(map["i"], ConfigValue::Integer(42));
      assert_eq!(map["f"], ConfigValue::Float(1.5));
      assert_eq!(map["s"], ConfigValue::String("text".to_string()));
      assert_eq!(map["b"], ConfigValue::Bool(true));
      assert_eq!(map["n"], ConfigValue::Null);
      assert!(matches!(map["big"], ConfigValue::Float(_)));
   }

   #[test]
   fn test_数値と真偽値のキーは文字列化される() {
      let map = mapping("1: one\ntrue: yes\n");

      assert_eq!(map["1"], ConfigValue::String("one".to_string()));
      assert_eq!(map["true"], ConfigValue::String("yes".to_string()));
   }

   #[test]
   fn test_複合キーはエラーになる() {
      let value: serde_yaml::Value = serde_yaml::from_str("? [a, b]\n: value\n").unwrap();
      let result = ConfigValue::from_yaml(value, Path::new("test.yml"));

      assert!(matches!(result, Err(ConfigError::NonStringKey { .. })));
   }

   #[rstest]
   #[case::数値と文字列("1: first\n\"1\": second\n", "1")]
   #[case::真偽値と文字列("true: first\n\"true\": second\n", "true")]
   #[case::ネストした位置("outer:\n  \"2\": a\n  2: b\n", "2")]
   fn test_文字列化して重なるキーはエラーになる(#[case] text: &str, #[case] expected_key: &str) {
      let value: serde_yaml::Value = serde_yaml::from_str(text).unwrap();
      let result = ConfigValue::from_yaml(value, Path::new("test.yml"));

      match result {
         Err(ConfigError::DuplicateKey { key, .. }) => assert_eq!(key, expected_key),
         other => panic!("DuplicateKey を期待したが {other:?}"),
      }
   }

   #[test]
   fn test_タグ付き値は中身を使う() {
      let map = mapping("secret: !env TOKEN\n");

      assert_eq!(map["secret"], ConfigValue::String("TOKEN".to_string()));
   }

   #[test]
   fn test_jsonへのシリアライズはタグなしになる() {
      let json = serde_json::to_value(yaml("a: {b: [1, x, ~]}\nc: false\n")).unwrap();

      assert_eq!(
         json,
         serde_json::json!({ "a": { "b": [1, "x", null] }, "c": false })
      );
   }
}
