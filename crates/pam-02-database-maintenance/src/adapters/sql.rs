//! SQL text for the PostgreSQL account adapter.

use crate::config::SchemaConfig;
use shared_types::Role;

/// Statements for the platform schema, built once per store
#[derive(Clone, Debug)]
pub struct AccountStatements {
    pub count_users: String,
    pub count_categories: String,
    pub count_posts: String,
    /// `$1` limit
    pub sample_users: String,
    /// `$1` email
    pub find_user_by_email: String,
    insert_prefix: String,
    insert_values: String,
    returning: String,
}

impl AccountStatements {
    pub fn new(schema: &SchemaConfig) -> Self {
        let users = schema.users_table.quoted();
        let columns = r#""id"::int8, "nim"::text, "nama"::text, "email"::text, "peran"::text"#;

        let (timestamp_columns, timestamp_values) = if schema.timestamps {
            (r#", "createdAt", "updatedAt""#, ", NOW(), NOW()")
        } else {
            ("", "")
        };

        Self {
            count_users: format!("SELECT COUNT(*) FROM {users}"),
            count_categories: format!("SELECT COUNT(*) FROM {}", schema.categories_table.quoted()),
            count_posts: format!("SELECT COUNT(*) FROM {}", schema.posts_table.quoted()),
            sample_users: format!("SELECT {columns} FROM {users} ORDER BY \"id\" LIMIT $1"),
            find_user_by_email: format!("SELECT {columns} FROM {users} WHERE \"email\" = $1"),
            insert_prefix: format!(
                r#"INSERT INTO {users} ("nim", "nama", "email", "kata_sandi", "peran"{timestamp_columns})"#
            ),
            insert_values: timestamp_values.to_string(),
            returning: format!("RETURNING {columns}"),
        }
    }

    /// `$1` nim, `$2` name, `$3` email, `$4` password hash.
    ///
    /// The role is written as an untyped literal so it coerces to the column's
    /// enum type; it comes from the closed [`Role`] set, never from input.
    pub fn insert_user(&self, role: Role) -> String {
        format!(
            "{} VALUES ($1, $2, $3, $4, '{}'{}) {}",
            self.insert_prefix,
            role.as_str(),
            self.insert_values,
            self.returning
        )
    }
}
