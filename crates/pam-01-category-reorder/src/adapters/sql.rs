//! SQL text for the PostgreSQL adapter.
//!
//! Identifiers come from validated [`CategoryTableConfig`] and are always
//! double-quoted; every value is a bound parameter except the integer
//! statement timeout, which `SET` cannot take as a parameter.

use crate::config::CategoryTableConfig;
use crate::domain::value_objects::{IsolationLevel, TransactionOptions};

/// Statements for one category table, built once per store
#[derive(Clone, Debug)]
pub struct CategoryStatements {
    /// Table name as `pg_get_serial_sequence` expects it
    pub table_arg: String,
    /// Key column name as `pg_get_serial_sequence` expects it
    pub key_column_arg: String,
    pub list: String,
    /// `$1` new key, `$2` name
    pub rekey_by_name: String,
    /// `$1` new key, `$2` current key
    pub rekey: String,
    pub lock: String,
    /// `$1` table arg, `$2` key column arg
    pub advance_sequence: String,
    /// `$1` table arg, `$2` key column arg
    pub sequence_name: String,
}

impl CategoryStatements {
    pub fn new(table: &CategoryTableConfig) -> Self {
        let t = table.table.quoted();
        let k = table.key_column.quoted();
        let n = table.name_column.quoted();

        Self {
            table_arg: t.clone(),
            key_column_arg: table.key_column.as_str().to_string(),
            list: format!("SELECT {k}::int8, {n}::text FROM {t} ORDER BY {k}"),
            rekey_by_name: format!("UPDATE {t} SET {k} = $1 WHERE {n} = $2"),
            rekey: format!("UPDATE {t} SET {k} = $1 WHERE {k} = $2"),
            lock: format!("LOCK TABLE {t} IN SHARE ROW EXCLUSIVE MODE"),
            advance_sequence: format!(
                "SELECT setval(pg_get_serial_sequence($1, $2), \
                 COALESCE((SELECT MAX({k}) FROM {t}), 0) + 1, false)"
            ),
            sequence_name: "SELECT pg_get_serial_sequence($1, $2)".to_string(),
        }
    }

    /// Must be the first statement after `BEGIN`.
    pub fn set_isolation(level: IsolationLevel) -> String {
        format!("SET TRANSACTION ISOLATION LEVEL {}", level.as_sql())
    }

    /// Local to the transaction. A utility statement, so it takes no snapshot
    /// and the table lock still comes first.
    pub fn set_statement_timeout(timeout_ms: u64) -> String {
        format!("SET LOCAL statement_timeout = {timeout_ms}")
    }

    /// Statements run right after `BEGIN`, in order. None of them may take a
    /// snapshot before the service locks the table.
    pub fn opening(options: &TransactionOptions) -> Vec<String> {
        let mut statements = vec![Self::set_isolation(options.isolation)];
        if let Some(timeout_ms) = options.statement_timeout_ms {
            statements.push(Self::set_statement_timeout(timeout_ms));
        }
        statements
    }

    /// Next value of `sequence` without consuming it; `$1` the same name as text.
    ///
    /// `sequence` is the already-quoted name returned by `pg_get_serial_sequence`.
    pub fn peek_sequence(sequence: &str) -> String {
        format!(
            "SELECT CASE WHEN s.is_called THEN s.last_value + p.seqincrement ELSE s.last_value END \
             FROM {sequence} s, pg_sequence p WHERE p.seqrelid = $1::regclass"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::SqlIdentifier;

    #[test]
    fn test_default_table_statements() {
        let sql = CategoryStatements::new(&CategoryTableConfig::default());

        assert_eq!(sql.list, r#"SELECT "id"::int8, "nama"::text FROM "kategori" ORDER BY "id""#);
        assert_eq!(sql.rekey_by_name, r#"UPDATE "kategori" SET "id" = $1 WHERE "nama" = $2"#);
        assert_eq!(sql.rekey, r#"UPDATE "kategori" SET "id" = $1 WHERE "id" = $2"#);
        assert_eq!(sql.lock, r#"LOCK TABLE "kategori" IN SHARE ROW EXCLUSIVE MODE"#);
        assert_eq!(
            sql.advance_sequence,
            r#"SELECT setval(pg_get_serial_sequence($1, $2), COALESCE((SELECT MAX("id") FROM "kategori"), 0) + 1, false)"#
        );
    }

    #[test]
    fn test_serial_sequence_arguments() {
        let table = CategoryTableConfig {
            table: SqlIdentifier::new("Categories").unwrap(),
            key_column: SqlIdentifier::new("categoryId").unwrap(),
            name_column: SqlIdentifier::new("label").unwrap(),
        };
        let sql = CategoryStatements::new(&table);

        // Table argument is parsed as an identifier, column argument is taken literally
        assert_eq!(sql.table_arg, r#""Categories""#);
        assert_eq!(sql.key_column_arg, "categoryId");
    }

    #[test]
    fn test_no_values_interpolated() {
        let sql = CategoryStatements::new(&CategoryTableConfig::default());
        for statement in [&sql.rekey_by_name, &sql.rekey] {
            assert!(statement.contains("$1") && statement.contains("$2"));
        }
    }

    #[test]
    fn test_isolation_statement() {
        assert_eq!(
            CategoryStatements::set_isolation(IsolationLevel::Serializable),
            "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE"
        );
    }

    #[test]
    fn test_opening_statements_take_no_snapshot() {
        let options = TransactionOptions {
            isolation: IsolationLevel::Serializable,
            statement_timeout_ms: Some(5000),
        };
        let statements = CategoryStatements::opening(&options);

        assert_eq!(
            statements,
            vec![
                "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE".to_string(),
                "SET LOCAL statement_timeout = 5000".to_string(),
            ]
        );
        assert!(statements.iter().all(|s| s.starts_with("SET ")));
    }

    #[test]
    fn test_opening_without_timeout() {
        let statements = CategoryStatements::opening(&TransactionOptions::default());
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_peek_sequence() {
        let sql = CategoryStatements::peek_sequence("public.kategori_id_seq");
        assert!(sql.contains("FROM public.kategori_id_seq s, pg_sequence p"));
    }
}
