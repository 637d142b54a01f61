//! SQLite integration tests
//!
//! Each test gets its own in-memory database with migrations applied.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test sqlite_integration
//! ```

use chrono::{DateTime, Duration, SubsecRound, Utc};
use store::{
    InventoryStore, InventoryStoreExt, Money, NewProduct, NewTransaction, ProductChanges,
    ProductId, SqliteStore, StoreError, TransactionKind, TransactionQuery,
};

async fn get_test_store() -> SqliteStore {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    store.run_migrations().await.unwrap();
    store
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn new_product(name: &str, category: Option<&str>, supplier: Option<&str>) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: format!("{name} description"),
        category: category.map(str::to_string),
        price: Money::from_cents(1299),
        quantity: 50,
        min_stock: 20,
        supplier: supplier.map(str::to_string),
        created_at: now(),
    }
}

fn entry(product_id: ProductId, kind: TransactionKind, quantity: u32) -> NewTransaction {
    NewTransaction {
        product_id,
        kind,
        quantity,
        unit_price: Money::from_cents(250),
        notes: Some("restock".to_string()),
        timestamp: now(),
    }
}

mod products {
    use super::*;

    #[tokio::test]
    async fn create_and_read_back() {
        let store = get_test_store().await;
        let created = store
            .create_product(new_product("Coffee Beans", Some("Food"), Some("CoffeeCorp")))
            .await
            .unwrap();

        let by_id = store.get_product(created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_name = store.get_product_by_name("Coffee Beans").await.unwrap();
        assert_eq!(by_name.map(|p| p.id), Some(created.id));
    }

    #[tokio::test]
    async fn name_lookup_is_case_sensitive() {
        let store = get_test_store().await;
        store
            .create_product(new_product("Laptop", None, None))
            .await
            .unwrap();

        assert!(store.get_product_by_name("laptop").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_category_stays_null() {
        let store = get_test_store().await;
        let created = store
            .create_product(new_product("Loose Part", None, None))
            .await
            .unwrap();

        let product = store.get_product(created.id).await.unwrap().unwrap();
        assert_eq!(product.category, None);
        assert_eq!(product.supplier, None);
    }

    #[tokio::test]
    async fn duplicate_name_maps_to_store_error() {
        let store = get_test_store().await;
        store
            .create_product(new_product("Laptop", None, None))
            .await
            .unwrap();

        let result = store
            .create_product(new_product("Laptop", None, None))
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateName(name)) if name == "Laptop"));
        assert_eq!(store.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_applies_only_given_columns() {
        let store = get_test_store().await;
        let created = store
            .create_product(new_product("Office Chair", Some("Furniture"), Some("FurniCorp")))
            .await
            .unwrap();

        let later = created.last_updated + Duration::seconds(3);
        let mut changes = ProductChanges::touch(later).quantity(7);
        changes.price = Some(Money::from_cents(29950));
        changes.supplier = Some(None);

        let updated = store
            .update_product(created.id, changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.price.cents(), 29950);
        assert_eq!(updated.supplier, None);
        assert_eq!(updated.category.as_deref(), Some("Furniture"));
        assert_eq!(updated.name, "Office Chair");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.last_updated, later);
    }

    #[tokio::test]
    async fn update_unknown_returns_none() {
        let store = get_test_store().await;
        let result = store
            .update_product(ProductId::new(404), ProductChanges::touch(now()).quantity(1))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn rename_collision_maps_to_duplicate() {
        let store = get_test_store().await;
        store
            .create_product(new_product("A", None, None))
            .await
            .unwrap();
        let b = store
            .create_product(new_product("B", None, None))
            .await
            .unwrap();

        let mut changes = ProductChanges::touch(now());
        changes.name = Some("A".to_string());
        let result = store.update_product(b.id, changes).await;
        assert!(matches!(result, Err(StoreError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn list_orders_by_name_bytewise() {
        let store = get_test_store().await;
        for name in ["banana", "Cherry", "apple"] {
            store
                .create_product(new_product(name, None, None))
                .await
                .unwrap();
        }

        let names: Vec<_> = store
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Cherry", "apple", "banana"]);
    }

    #[tokio::test]
    async fn search_matches_name_category_or_supplier() {
        let store = get_test_store().await;
        store
            .create_product(new_product("Laptop", Some("Electronics"), Some("TechCorp")))
            .await
            .unwrap();
        store
            .create_product(new_product("Notebook", Some("Stationery"), Some("PaperCorp")))
            .await
            .unwrap();
        store
            .create_product(new_product("Apple", Some("Food"), None))
            .await
            .unwrap();

        let corp: Vec<_> = store
            .search_products("corp")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(corp, vec!["Laptop", "Notebook"]);

        let food = store.search_products("FOOD").await.unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].name, "Apple");

        assert_eq!(store.search_products("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let store = get_test_store().await;
        store
            .create_product(new_product("Motor Oil", Some("Schmierstoffe"), Some("ÖLWERK GmbH")))
            .await
            .unwrap();
        store
            .create_product(new_product("Crème Brûlée", Some("Desserts"), None))
            .await
            .unwrap();

        let oil = store.search_products("ölwerk").await.unwrap();
        assert_eq!(oil.len(), 1);
        assert_eq!(oil[0].name, "Motor Oil");

        let dessert = store.search_products("CRÈME").await.unwrap();
        assert_eq!(dessert.len(), 1);
        assert_eq!(dessert[0].name, "Crème Brûlée");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let store = get_test_store().await;
        store
            .create_product(new_product("100% Cotton", None, None))
            .await
            .unwrap();
        store
            .create_product(new_product("Wool", None, None))
            .await
            .unwrap();

        let results = store.search_products("%").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "100% Cotton");
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let store = get_test_store().await;
        let created = store
            .create_product(new_product("Temp", None, None))
            .await
            .unwrap();

        assert!(store.delete_product(created.id).await.unwrap());
        assert!(!store.delete_product(created.id).await.unwrap());
        assert!(store.get_product(created.id).await.unwrap().is_none());
    }
}

mod ledger {
    use super::*;

    #[tokio::test]
    async fn append_and_read_history() {
        let store = get_test_store().await;
        let product = store
            .create_product(new_product("Widget", None, None))
            .await
            .unwrap();

        let appended = store
            .append_transaction(entry(product.id, TransactionKind::StockIn, 5))
            .await
            .unwrap();

        let history = store
            .list_transactions(TransactionQuery::for_product(product.id))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].transaction, appended);
        assert_eq!(history[0].product_name.as_deref(), Some("Widget"));
    }

    #[tokio::test]
    async fn append_for_unknown_product_fails() {
        let store = get_test_store().await;
        let result = store
            .append_transaction(entry(ProductId::new(12), TransactionKind::StockIn, 1))
            .await;
        assert!(matches!(result, Err(StoreError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn history_is_newest_first_with_id_tiebreak() {
        let store = get_test_store().await;
        let product = store
            .create_product(new_product("Widget", None, None))
            .await
            .unwrap();

        let ts = now();
        let mut older = entry(product.id, TransactionKind::InitialStock, 50);
        older.timestamp = ts - Duration::seconds(10);
        let mut tie_a = entry(product.id, TransactionKind::StockIn, 1);
        tie_a.timestamp = ts;
        let mut tie_b = entry(product.id, TransactionKind::StockOut, 2);
        tie_b.timestamp = ts;

        let older = store.append_transaction(older).await.unwrap();
        let tie_a = store.append_transaction(tie_a).await.unwrap();
        let tie_b = store.append_transaction(tie_b).await.unwrap();

        let ids: Vec<_> = store
            .list_transactions(TransactionQuery::new())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.transaction.id)
            .collect();
        assert_eq!(ids, vec![tie_b.id, tie_a.id, older.id]);
    }

    #[tokio::test]
    async fn orphaned_entries_survive_product_delete() {
        let store = get_test_store().await;
        let product = store
            .create_product(new_product("Discontinued", None, None))
            .await
            .unwrap();
        store
            .append_transaction(entry(product.id, TransactionKind::InitialStock, 50))
            .await
            .unwrap();

        store.delete_product(product.id).await.unwrap();

        let history = store
            .list_transactions(TransactionQuery::new())
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].is_orphaned());
        assert_eq!(history[0].transaction.product_id, product.id);
    }

    #[tokio::test]
    async fn ledger_rows_reject_update_and_delete() {
        let store = get_test_store().await;
        let product = store
            .create_product(new_product("Widget", None, None))
            .await
            .unwrap();
        store
            .append_transaction(entry(product.id, TransactionKind::InitialStock, 50))
            .await
            .unwrap();

        let update = sqlx::query("UPDATE transactions SET quantity = 1")
            .execute(store.pool())
            .await;
        assert!(update.is_err());

        let delete = sqlx::query("DELETE FROM transactions")
            .execute(store.pool())
            .await;
        assert!(delete.is_err());
    }

    #[tokio::test]
    async fn history_limit() {
        let store = get_test_store().await;
        let product = store
            .create_product(new_product("Widget", None, None))
            .await
            .unwrap();
        for _ in 0..5 {
            store
                .append_transaction(entry(product.id, TransactionKind::StockIn, 1))
                .await
                .unwrap();
        }

        let history = store
            .list_transactions(TransactionQuery::new().limit(3))
            .await
            .unwrap();
        assert_eq!(history.len(), 3);
    }
}

mod units_of_work {
    use super::*;

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let store = get_test_store().await;

        let mut tx = store.begin().await.unwrap();
        let product = tx
            .create_product(new_product("Paired", None, None))
            .await
            .unwrap();
        tx.append_transaction(entry(product.id, TransactionKind::InitialStock, 50))
            .await
            .unwrap();
        tx.commit().await.unwrap();
        drop(tx);

        assert!(store.get_product(product.id).await.unwrap().is_some());
        assert_eq!(
            store
                .list_transactions(TransactionQuery::new())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back_both_writes() {
        let store = get_test_store().await;

        {
            let mut tx = store.begin().await.unwrap();
            let product = tx
                .create_product(new_product("Half Written", None, None))
                .await
                .unwrap();
            tx.append_transaction(entry(product.id, TransactionKind::InitialStock, 50))
                .await
                .unwrap();
        }

        assert!(store.list_products().await.unwrap().is_empty());
        assert!(
            store
                .list_transactions(TransactionQuery::new())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn use_after_commit_fails() {
        let store = get_test_store().await;
        let mut tx = store.begin().await.unwrap();
        tx.commit().await.unwrap();

        let result = tx.get_product(ProductId::new(1)).await;
        assert!(matches!(result, Err(StoreError::TransactionClosed)));
    }
}
