//! Device category keys
//!
//! The `device_categories` table may be keyed by an integer or by a text key (e.g. a UUID),
//! depending on how the table was created. [CategoryId] accepts either.

use serde::{Deserialize, Serialize};

/// Primary key of a device category, also used as the foreign key on programs.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum CategoryId {
    /// Integer key
    Int(i64),
    /// Text key
    Text(String),
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        CategoryId::Int(id)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        CategoryId::Text(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_de_tokens, Token};

    #[test]
    fn integer_key() {
        assert_de_tokens(&CategoryId::Int(3), &[Token::I64(3)]);
        assert_de_tokens(&CategoryId::Int(3), &[Token::U64(3)]);
    }

    #[test]
    fn text_key() {
        assert_de_tokens(
            &CategoryId::from("8f14e45f"),
            &[Token::Str("8f14e45f")],
        );
    }

    #[test]
    fn json_keys() {
        let ids: Vec<CategoryId> = serde_json::from_str(r#"[1, "two", 3]"#).unwrap();
        assert_eq!(
            vec![CategoryId::Int(1), CategoryId::from("two"), CategoryId::Int(3)],
            ids
        );
    }
}
