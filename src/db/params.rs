//! Statement parameters and `:name` placeholder expansion.

use super::{DbError, Value};

/// Values bound to a statement's placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// Bound to `?` placeholders in order.
    Positional(Vec<Value>),
    /// Bound to `:name` placeholders. Keys may carry the leading colon.
    Named(Vec<(String, Value)>),
}

impl Params {
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Params::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Rewrite `sql` for the driver and return the values in binding order.
    ///
    /// Positional parameters pass through untouched. Named parameters are
    /// replaced by `?` and their values emitted once per occurrence.
    pub fn resolve(self, sql: &str) -> Result<(String, Vec<Value>), DbError> {
        match self {
            Params::Positional(values) => Ok((sql.to_string(), values)),
            Params::Named(pairs) => {
                let (rewritten, names) = rewrite_named(sql);
                let mut values = Vec::with_capacity(names.len());
                for name in names {
                    let value = pairs
                        .iter()
                        .find(|(key, _)| key.strip_prefix(':').unwrap_or(key) == name)
                        .map(|(_, value)| value.clone())
                        .ok_or(DbError::MissingParameter(name))?;
                    values.push(value);
                }
                Ok((rewritten, values))
            }
        }
    }
}

/// Replace each `:name` outside quoted text and comments with `?`,
/// collecting the names.
///
/// Backslash escapes inside `'...'` and `"..."` follow MySQL.
fn rewrite_named(sql: &str) -> (String, Vec<String>) {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut names = Vec::new();
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && q != '`' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
                i += 1;
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                let end = chars[i..]
                    .iter()
                    .position(|&ch| ch == '\n')
                    .map_or(chars.len(), |offset| i + offset);
                out.extend(&chars[i..end]);
                i = end;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let end = chars[i + 2..]
                    .windows(2)
                    .position(|pair| pair == ['*', '/'])
                    .map_or(chars.len(), |offset| i + 2 + offset + 2);
                out.extend(&chars[i..end]);
                i = end;
            }
            // `::` is a cast, not a placeholder
            ':' if chars.get(i + 1) == Some(&':') => {
                out.push_str("::");
                i += 2;
            }
            ':' if chars.get(i + 1).is_some_and(|n| is_ident_start(*n)) => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_ident_char(chars[end]) {
                    end += 1;
                }
                names.push(chars[start..end].iter().collect());
                out.push('?');
                i = end;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    (out, names)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_passthrough() {
        let (sql, values) = Params::positional([1i64, 2])
            .resolve("SELECT * FROM t WHERE a = ? AND b = ?")
            .unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE a = ? AND b = ?");
        assert_eq!(values, vec![Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn test_named_rewritten_in_occurrence_order() {
        let (sql, values) = Params::named([(":b", Value::from(2i64)), ("a", Value::from(1i64))])
            .resolve("SELECT * FROM t WHERE a = :a AND (b = :b OR c = :a)")
            .unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE a = ? AND (b = ? OR c = ?)");
        assert_eq!(
            values,
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(1)]
        );
    }

    #[test]
    fn test_colons_in_literals_and_casts_untouched() {
        let (sql, names) = rewrite_named("SELECT ':x', \"a:b\", v::text, '12:30' FROM t WHERE id = :id");
        assert_eq!(
            sql,
            "SELECT ':x', \"a:b\", v::text, '12:30' FROM t WHERE id = ?"
        );
        assert_eq!(names, vec!["id".to_string()]);
    }

    #[test]
    fn test_backslash_escaped_quote_stays_inside_literal() {
        let (sql, values) = Params::named([("id", 5i64)])
            .resolve(r"SELECT 'it\'s :id' AS s, :id AS i")
            .unwrap();
        assert_eq!(sql, r"SELECT 'it\'s :id' AS s, ? AS i");
        assert_eq!(values, vec![Value::Integer(5)]);
    }

    #[test]
    fn test_comments_are_not_scanned() {
        let (sql, names) = rewrite_named(
            "SELECT * FROM t -- filter on :ignored\nWHERE /* :also 'ignored */ id = :id",
        );
        assert_eq!(
            sql,
            "SELECT * FROM t -- filter on :ignored\nWHERE /* :also 'ignored */ id = ?"
        );
        assert_eq!(names, vec!["id".to_string()]);
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        let (sql, names) = rewrite_named("SELECT :a /* :b");
        assert_eq!(sql, "SELECT ? /* :b");
        assert_eq!(names, vec!["a".to_string()]);
    }

    #[test]
    fn test_missing_named_value() {
        let err = Params::named([("id", 1i64)])
            .resolve("SELECT * FROM t WHERE id = :id AND nom = :nom")
            .unwrap_err();
        match err {
            DbError::MissingParameter(name) => assert_eq!(name, "nom"),
            other => panic!("Expected MissingParameter, got {other:?}"),
        }
    }
}
