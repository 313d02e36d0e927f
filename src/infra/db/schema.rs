//! Entity registry used by migration autogeneration.
//!
//! Tables are listed parent-first so generated `CREATE TABLE` statements
//! satisfy foreign keys when replayed in order.

use sea_orm::{DbBackend, EntityTrait, Schema};

use crate::infra::repositories::entities::{
    category, comment, post, post_category, profile, role, user, user_role,
};

/// A table derived from entity metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub create_sql: String,
}

fn definition<E>(backend: DbBackend, entity: E) -> TableDefinition
where
    E: EntityTrait,
{
    let schema = Schema::new(backend);
    let statement = schema.create_table_from_entity(entity);
    TableDefinition {
        name: entity.table_name().to_string(),
        create_sql: backend.build(&statement).to_string(),
    }
}

/// Every mapped table in dependency order.
pub fn entity_tables(backend: DbBackend) -> Vec<TableDefinition> {
    vec![
        definition(backend, user::Entity),
        definition(backend, profile::Entity),
        definition(backend, post::Entity),
        definition(backend, category::Entity),
        definition(backend, post_category::Entity),
        definition(backend, comment::Entity),
        definition(backend, role::Entity),
        definition(backend, user_role::Entity),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_parent_first() {
        let tables = entity_tables(DbBackend::Postgres);
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();

        let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert!(position("users") < position("posts"));
        assert!(position("posts") < position("post_categories"));
        assert!(position("categories") < position("post_categories"));
        assert!(position("roles") < position("user_roles"));
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_create_sql_mentions_foreign_keys() {
        let tables = entity_tables(DbBackend::Postgres);
        let comments = tables.iter().find(|t| t.name == "comments").unwrap();

        assert!(comments.create_sql.starts_with("CREATE TABLE"));
        assert!(comments.create_sql.contains("FOREIGN KEY"));
        assert!(comments.create_sql.contains("\"parent_id\""));
    }
}
