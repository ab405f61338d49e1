use assert_matches::assert_matches;
use catalog_authz::{AuthorizationChecker, AuthorizationHandle, Policy, PolicyGrant, Privilege, Scope};
use catalog_store::model::{HdfsFileFormat, Table, TablePayload};
use catalog_store::open_catalog;

use super::*;
use crate::wire::{AlterTableParams, CreateDbParams, CreateTableParams, DropDbParams, DropTableParams};

struct AlwaysFailClient;

impl MetaStoreClient for AlwaysFailClient {
    fn load_table(&self, db: &str, table: &str) -> Result<Table, FacadeError> {
        Err(FacadeError::Metastore(format!("no such table {db}.{table} in the store")))
    }
}

struct FixedTableClient(Table);

impl MetaStoreClient for FixedTableClient {
    fn load_table(&self, _db: &str, _table: &str) -> Result<Table, FacadeError> {
        Ok(self.0.clone())
    }
}

/// A client whose `create_database` call fails, used to prove a DDL method actually drives the
/// metastore (rather than only mutating the local cache).
struct FailingCreateDbClient;

impl MetaStoreClient for FailingCreateDbClient {
    fn load_table(&self, db: &str, table: &str) -> Result<Table, FacadeError> {
        Err(FacadeError::Metastore(format!("no such table {db}.{table} in the store")))
    }

    fn create_database(&self, _params: &CreateDbParams) -> Result<(), FacadeError> {
        Err(FacadeError::Metastore("metastore unreachable".to_string()))
    }
}

fn facade_with_policy(grants: Vec<PolicyGrant>) -> CatalogFacade {
    let (reader, writer) = open_catalog();
    let auth = AuthorizationHandle::new(AuthorizationChecker::new(Policy { grants }, true));
    let metastore = MetaStorePool::new(vec![Box::new(AlwaysFailClient)]);
    CatalogFacade::new(reader, writer, auth, metastore, HadoopConfig::default())
}

/// Grants `principal` `ALL` on the server, covering `create_database`/`drop_database`'s
/// server-scoped check.
fn server_grant(principal: &str) -> PolicyGrant {
    PolicyGrant { principal: principal.to_string(), scope: Scope::Server, privileges: vec![Privilege::All] }
}

/// Grants `principal` `ALL` on `db`, which the checker's scope hierarchy also extends to every
/// table and column within it (`database_grant_covers_its_tables_and_columns` in
/// `checker_test.rs`) but not, by design, down from `Scope::Server`
/// (`all_of_scope_requires_every_privilege_satisfied`).
fn db_grant(principal: &str, db: &str) -> PolicyGrant {
    PolicyGrant { principal: principal.to_string(), scope: Scope::Database(db.to_string()), privileges: vec![Privilege::All] }
}

#[tokio::test]
async fn create_database_then_create_table_are_visible_to_a_privileged_reader() {
    let facade = facade_with_policy(vec![server_grant("alice"), db_grant("alice", "sales")]);

    facade
        .create_database(
            "alice",
            CreateDbParams {
                name: "sales".to_string(),
                owner: "alice".to_string(),
                comment: None,
                location: None,
                if_not_exists: false,
            },
        )
        .await
        .unwrap();

    facade
        .create_table(
            "alice",
            CreateTableParams {
                db: "sales".to_string(),
                table: "orders".to_string(),
                owner: "alice".to_string(),
                columns: Vec::new(),
                num_clustering_cols: 0,
                payload: TablePayload::HBase { hbase_table_name: "h".to_string() },
                if_not_exists: false,
            },
        )
        .await
        .unwrap();

    assert_eq!(facade.get_db_names("alice", None), vec!["sales".to_string()]);
    assert_eq!(facade.get_table_names("alice", "sales", None), vec!["orders".to_string()]);
}

#[tokio::test]
async fn create_database_without_privilege_is_denied() {
    let facade = facade_with_policy(vec![]);

    let result = facade
        .create_database(
            "mallory",
            CreateDbParams {
                name: "sales".to_string(),
                owner: "mallory".to_string(),
                comment: None,
                location: None,
                if_not_exists: false,
            },
        )
        .await;

    assert_matches!(result, Err(FacadeError::Authorization(_)));
}

#[tokio::test]
async fn create_database_twice_fails_unless_if_not_exists() {
    let facade = facade_with_policy(vec![server_grant("alice")]);
    let params = |if_not_exists: bool| CreateDbParams {
        name: "sales".to_string(),
        owner: "alice".to_string(),
        comment: None,
        location: None,
        if_not_exists,
    };

    facade.create_database("alice", params(false)).await.unwrap();

    assert_matches!(
        facade.create_database("alice", params(false)).await,
        Err(FacadeError::AlreadyExists(_))
    );
    assert!(facade.create_database("alice", params(true)).await.is_ok());
}

#[tokio::test]
async fn create_database_surfaces_a_metastore_failure_without_publishing_anything() {
    let (reader, writer) = open_catalog();
    let auth = AuthorizationHandle::new(AuthorizationChecker::new(
        Policy { grants: vec![server_grant("alice")] },
        true,
    ));
    let metastore = MetaStorePool::new(vec![Box::new(FailingCreateDbClient)]);
    let facade = CatalogFacade::new(reader, writer, auth, metastore, HadoopConfig::default());

    let result = facade
        .create_database(
            "alice",
            CreateDbParams {
                name: "sales".to_string(),
                owner: "alice".to_string(),
                comment: None,
                location: None,
                if_not_exists: false,
            },
        )
        .await;

    assert_matches!(result, Err(FacadeError::Metastore(_)));
    assert!(facade.get_db_names("alice", None).is_empty(), "a metastore failure must not publish a catalog update");
}

#[tokio::test]
async fn listings_are_filtered_by_per_database_privilege() {
    let facade = facade_with_policy(vec![
        server_grant("alice"),
        db_grant("alice", "sales"),
        db_grant("alice", "sales_archive"),
        db_grant("alice", "salesqa"),
        db_grant("alice", "default"),
        PolicyGrant {
            principal: "carol".to_string(),
            scope: Scope::Database("sales".to_string()),
            privileges: vec![Privilege::ViewMetadata],
        },
    ]);

    for name in ["sales", "sales_archive", "SalesQA", "default"] {
        facade
            .create_database(
                "alice",
                CreateDbParams {
                    name: name.to_string(),
                    owner: "alice".to_string(),
                    comment: None,
                    location: None,
                    if_not_exists: false,
                },
            )
            .await
            .unwrap();
    }

    let mut visible_to_carol = facade.get_db_names("carol", Some("sales*"));
    visible_to_carol.sort();
    assert_eq!(visible_to_carol, vec!["sales".to_string()]);

    let mut visible_to_alice = facade.get_db_names("alice", Some("sales*"));
    visible_to_alice.sort();
    assert_eq!(visible_to_alice, vec!["sales".to_string(), "sales_archive".to_string(), "salesqa".to_string()]);
}

#[tokio::test]
async fn drop_table_is_reflected_immediately_to_readers() {
    let facade = facade_with_policy(vec![server_grant("alice"), db_grant("alice", "sales")]);
    facade
        .create_database(
            "alice",
            CreateDbParams { name: "sales".to_string(), owner: "alice".to_string(), comment: None, location: None, if_not_exists: false },
        )
        .await
        .unwrap();
    facade
        .create_table(
            "alice",
            CreateTableParams {
                db: "sales".to_string(),
                table: "orders".to_string(),
                owner: "alice".to_string(),
                columns: Vec::new(),
                num_clustering_cols: 0,
                payload: TablePayload::HBase { hbase_table_name: "h".to_string() },
                if_not_exists: false,
            },
        )
        .await
        .unwrap();

    facade
        .drop_table("alice", DropTableParams { db: "sales".to_string(), table: "orders".to_string(), if_exists: false })
        .await
        .unwrap();

    assert!(facade.get_table_names("alice", "sales", None).is_empty());
    assert_matches!(
        facade
            .drop_table("alice", DropTableParams { db: "sales".to_string(), table: "orders".to_string(), if_exists: false })
            .await,
        Err(FacadeError::TableNotFound { .. })
    );
    assert!(facade
        .drop_table("alice", DropTableParams { db: "sales".to_string(), table: "orders".to_string(), if_exists: true })
        .await
        .is_ok());
}

#[tokio::test]
async fn drop_database_missing_fails_unless_if_exists() {
    let facade = facade_with_policy(vec![db_grant("alice", "ghost")]);
    assert_matches!(
        facade.drop_database("alice", DropDbParams { name: "ghost".to_string(), if_exists: false }).await,
        Err(FacadeError::DatabaseNotFound(_))
    );
    assert!(facade.drop_database("alice", DropDbParams { name: "ghost".to_string(), if_exists: true }).await.is_ok());
}

#[tokio::test]
async fn alter_table_add_replace_columns_and_set_file_format() {
    let facade = facade_with_policy(vec![server_grant("alice"), db_grant("alice", "sales")]);
    facade
        .create_database(
            "alice",
            CreateDbParams { name: "sales".to_string(), owner: "alice".to_string(), comment: None, location: None, if_not_exists: false },
        )
        .await
        .unwrap();
    facade
        .create_table(
            "alice",
            CreateTableParams {
                db: "sales".to_string(),
                table: "orders".to_string(),
                owner: "alice".to_string(),
                columns: vec![catalog_store::model::Column {
                    name: "id".to_string(),
                    type_name: "bigint".to_string(),
                    comment: None,
                }],
                num_clustering_cols: 0,
                payload: TablePayload::Hdfs {
                    format: HdfsFileFormat::Text,
                    row_format: None,
                    partitions: Vec::new(),
                    location: "hdfs:///sales/orders".to_string(),
                },
                if_not_exists: false,
            },
        )
        .await
        .unwrap();

    facade
        .alter_table(
            "alice",
            AlterTableParams::AddReplaceColumns {
                db: "sales".to_string(),
                table: "orders".to_string(),
                columns: vec![catalog_store::model::Column {
                    name: "amount".to_string(),
                    type_name: "double".to_string(),
                    comment: None,
                }],
                replace_existing: false,
            },
        )
        .await
        .unwrap();

    facade
        .alter_table(
            "alice",
            AlterTableParams::SetFileFormat { db: "sales".to_string(), table: "orders".to_string(), format: HdfsFileFormat::Parquet },
        )
        .await
        .unwrap();

    let described = facade.describe_table("alice", "sales", "orders").unwrap();
    assert_eq!(described.table.columns.len(), 2);
    assert!(described.table.get_column("AMOUNT").is_some());
    assert_matches!(described.table.payload, TablePayload::Hdfs { format: HdfsFileFormat::Parquet, .. });
}

#[tokio::test]
async fn rename_table_moves_the_table_and_drops_the_old_name() {
    let facade = facade_with_policy(vec![
        server_grant("alice"),
        db_grant("alice", "sales"),
        db_grant("alice", "archive"),
    ]);
    facade
        .create_database(
            "alice",
            CreateDbParams { name: "sales".to_string(), owner: "alice".to_string(), comment: None, location: None, if_not_exists: false },
        )
        .await
        .unwrap();
    facade
        .create_database(
            "alice",
            CreateDbParams { name: "archive".to_string(), owner: "alice".to_string(), comment: None, location: None, if_not_exists: false },
        )
        .await
        .unwrap();
    facade
        .create_table(
            "alice",
            CreateTableParams {
                db: "sales".to_string(),
                table: "orders".to_string(),
                owner: "alice".to_string(),
                columns: Vec::new(),
                num_clustering_cols: 0,
                payload: TablePayload::HBase { hbase_table_name: "h".to_string() },
                if_not_exists: false,
            },
        )
        .await
        .unwrap();

    facade
        .alter_table(
            "alice",
            AlterTableParams::RenameTable {
                db: "sales".to_string(),
                table: "orders".to_string(),
                new_db: "archive".to_string(),
                new_table: "orders_2024".to_string(),
            },
        )
        .await
        .unwrap();

    assert!(facade.get_table_names("alice", "sales", None).is_empty());
    assert_eq!(facade.get_table_names("alice", "archive", None), vec!["orders_2024".to_string()]);
}

#[tokio::test]
async fn rename_table_across_databases_requires_create_on_the_destination() {
    let facade = facade_with_policy(vec![
        server_grant("alice"),
        PolicyGrant {
            principal: "alice".to_string(),
            scope: Scope::Database("sales".to_string()),
            privileges: vec![Privilege::Drop, Privilege::Create],
        },
    ]);
    facade
        .create_database(
            "alice",
            CreateDbParams { name: "sales".to_string(), owner: "alice".to_string(), comment: None, location: None, if_not_exists: false },
        )
        .await
        .unwrap();
    facade
        .create_database(
            "alice",
            CreateDbParams { name: "archive".to_string(), owner: "alice".to_string(), comment: None, location: None, if_not_exists: false },
        )
        .await
        .unwrap();
    facade
        .create_table(
            "alice",
            CreateTableParams {
                db: "sales".to_string(),
                table: "orders".to_string(),
                owner: "alice".to_string(),
                columns: Vec::new(),
                num_clustering_cols: 0,
                payload: TablePayload::HBase { hbase_table_name: "h".to_string() },
                if_not_exists: false,
            },
        )
        .await
        .unwrap();

    let result = facade
        .alter_table(
            "alice",
            AlterTableParams::RenameTable {
                db: "sales".to_string(),
                table: "orders".to_string(),
                new_db: "archive".to_string(),
                new_table: "orders_2024".to_string(),
            },
        )
        .await;

    assert_matches!(result, Err(FacadeError::Authorization(_)));
    assert_eq!(facade.get_table_names("alice", "sales", None), vec!["orders".to_string()]);
}

#[tokio::test]
async fn describe_table_surfaces_table_loading_error_for_incomplete_tables() {
    let facade = facade_with_policy(vec![server_grant("alice"), db_grant("alice", "sales")]);
    let incomplete = Table {
        table_id: 0,
        db_name: "sales".to_string(),
        name: "bad".to_string(),
        owner: String::new(),
        columns: Vec::new(),
        num_clustering_cols: 0,
        version: catalog_store::version::CatalogVersion(1),
        payload: TablePayload::Incomplete {
            cause: std::sync::Arc::new(catalog_store::model::IncompleteTableCause {
                message: "permission denied on hdfs path".to_string(),
            }),
        },
    };
    facade
        .create_database(
            "alice",
            CreateDbParams { name: "sales".to_string(), owner: "alice".to_string(), comment: None, location: None, if_not_exists: false },
        )
        .await
        .unwrap();
    facade.update_metastore(catalog_store::batch::CatalogUpdateBatch {
        updated_objects: vec![catalog_store::batch::CatalogObject::Table(incomplete)],
        removed_objects: vec![],
        service_id: catalog_store::version::ServiceId::UNKNOWN,
    }).unwrap();

    // list_table_names still surfaces the name (§7 scenario 5).
    assert_eq!(facade.get_table_names("alice", "sales", None), vec!["bad".to_string()]);
    assert_matches!(
        facade.describe_table("alice", "sales", "bad"),
        Err(FacadeError::TableLoading { .. })
    );
}

#[tokio::test]
async fn reset_table_caches_a_metastore_failure_as_an_incomplete_table() {
    let (reader, writer) = open_catalog();
    writer
        .apply_update(catalog_store::batch::CatalogUpdateBatch {
            updated_objects: vec![catalog_store::batch::CatalogObject::Database(catalog_store::model::Database::new(
                "sales",
                "alice",
                catalog_store::version::CatalogVersion(1),
            ))],
            removed_objects: vec![],
            service_id: catalog_store::version::ServiceId::new(1, 2),
        })
        .unwrap();
    let auth = AuthorizationHandle::new(AuthorizationChecker::new(
        Policy { grants: vec![db_grant("alice", "sales")] },
        true,
    ));
    let metastore = MetaStorePool::new(vec![Box::new(AlwaysFailClient)]);
    let facade = CatalogFacade::new(reader, writer, auth, metastore, HadoopConfig::default());

    facade.reset_table("sales", "orders").await.unwrap();

    assert_matches!(
        facade.describe_table("alice", "sales", "orders"),
        Err(FacadeError::TableLoading { .. })
    );
}

#[tokio::test]
async fn reset_table_replaces_an_incomplete_record_once_the_metastore_recovers() {
    let (reader, writer) = open_catalog();
    writer
        .apply_update(catalog_store::batch::CatalogUpdateBatch {
            updated_objects: vec![catalog_store::batch::CatalogObject::Database(catalog_store::model::Database::new(
                "sales",
                "alice",
                catalog_store::version::CatalogVersion(1),
            ))],
            removed_objects: vec![],
            service_id: catalog_store::version::ServiceId::new(1, 2),
        })
        .unwrap();
    let auth = AuthorizationHandle::new(AuthorizationChecker::new(
        Policy { grants: vec![db_grant("alice", "sales")] },
        true,
    ));
    let good_table = Table {
        table_id: 7,
        db_name: "sales".to_string(),
        name: "orders".to_string(),
        owner: "alice".to_string(),
        columns: Vec::new(),
        num_clustering_cols: 0,
        version: catalog_store::version::CatalogVersion(1),
        payload: TablePayload::HBase { hbase_table_name: "h".to_string() },
    };
    let metastore = MetaStorePool::new(vec![Box::new(FixedTableClient(good_table))]);
    let facade = CatalogFacade::new(reader, writer, auth, metastore, HadoopConfig::default());

    facade.reset_table("sales", "orders").await.unwrap();

    let described = facade.describe_table("alice", "sales", "orders").unwrap();
    assert!(!described.table.is_incomplete());
}

#[tokio::test]
async fn reset_catalog_flushes_everything() {
    let facade = facade_with_policy(vec![server_grant("alice"), db_grant("alice", "sales")]);
    facade
        .create_database(
            "alice",
            CreateDbParams { name: "sales".to_string(), owner: "alice".to_string(), comment: None, location: None, if_not_exists: false },
        )
        .await
        .unwrap();
    assert!(!facade.get_db_names("alice", None).is_empty());

    facade.reset_catalog();

    assert!(facade.get_db_names("alice", None).is_empty());
}

#[test]
fn hadoop_config_rendering_matches_the_documented_shape() {
    let mut config = HadoopConfig { source_summary: "core-site.xml, hdfs-site.xml".to_string(), entries: Default::default() };
    config.entries.insert("fs.defaultFS".to_string(), "hdfs://nn:8020".to_string());
    let (reader, writer) = open_catalog();
    let auth = AuthorizationHandle::empty();
    let metastore = MetaStorePool::new(vec![Box::new(AlwaysFailClient)]);
    let facade = CatalogFacade::new(reader, writer, auth, metastore, config);

    let text = facade.get_hadoop_config(true);
    assert!(text.starts_with("Hadoop Configuration\n"));
    assert!(text.contains("fs.defaultFS=hdfs://nn:8020"));

    let html = facade.get_hadoop_config(false);
    assert!(html.starts_with("<h2>Hadoop Configuration</h2>\n"));
    assert!(html.contains("<td>fs.defaultFS</td><td>hdfs://nn:8020</td>"));

    assert_eq!(facade.get_hadoop_config_value("fs.defaultFS"), Some("hdfs://nn:8020".to_string()));
    assert_eq!(facade.get_hadoop_config_value("missing"), None);
}
