use serde_json::Value;

use crate::error::ValidationError;

/// gidが空でなく、パスの1セグメントとして埋め込める形式であることを確認する。
///
/// 英数字、`_`、`-`のみを許可する。`.`や`..`、`%`を含む値はパスの別のリソースを指しうるため受け付けない。
///
/// # Arguments
///
/// * `name` - エラーメッセージに利用する引数名
/// * `gid` - 確認するgid
pub fn require_gid(name: &'static str, gid: &str) -> Result<(), ValidationError> {
    if gid.trim().is_empty() {
        return Err(ValidationError::EmptyId(name));
    }
    if !gid
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
    {
        return Err(ValidationError::MalformedId {
            name,
            value: gid.to_string(),
        });
    }

    Ok(())
}

/// 指定されている場合のみgidの形式を確認する。
pub fn optional_gid(name: &'static str, gid: Option<&str>) -> Result<(), ValidationError> {
    gid.map_or(Ok(()), |gid| require_gid(name, gid))
}

/// データに必須のキーが含まれていることを確認する。
///
/// 値が`null`のキーは含まれていないものとして扱う。
pub fn require_fields(data: &Value, fields: &[&'static str]) -> Result<(), ValidationError> {
    fields.iter().try_for_each(|field| match data.get(field) {
        Some(value) if !value.is_null() => Ok(()),
        _ => Err(ValidationError::MissingField(field)),
    })
}
