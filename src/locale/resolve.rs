//! ドット区切りキーの解決

use serde_json::Value;

/// キーのセグメント区切り
pub const KEY_SEPARATOR: char = '.';

/// ドット区切りのキーでネストしたバンドルから文字列を取り出す
///
/// 途中のセグメントが存在しない場合や末端が文字列でない場合は `None`。
/// 配列は数値セグメントで添字指定できる。
#[must_use]
pub fn resolve<'a>(bundle: &'a Value, key: &str) -> Option<&'a str> {
    key.split(KEY_SEPARATOR)
        .try_fold(bundle, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })?
        .as_str()
}
