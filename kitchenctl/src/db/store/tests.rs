use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use crate::db::errors::{DbError, constraints};
use crate::db::handlers::{CookFilter, DishFilter, DishTypeFilter};
use crate::db::models::{
    cooks::{CookCreateDBRequest, CookUpdateDBRequest},
    dish_types::{DeletePolicy, DishTypeCreateDBRequest, DishTypeUpdateDBRequest},
    dishes::{DishCreateDBRequest, DishUpdateDBRequest},
};
use crate::db::store::{CatalogStore, in_memory::InMemoryStore};
use crate::types::{CookId, DishTypeId};

#[cfg(feature = "postgres-tests")]
use crate::db::store::postgres::PostgresStore;

fn dish_type(name: &str) -> DishTypeCreateDBRequest {
    DishTypeCreateDBRequest { name: name.to_string() }
}

fn cook(username: &str, first_name: &str, last_name: &str) -> CookCreateDBRequest {
    CookCreateDBRequest {
        username: username.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        years_of_experience: 2,
        password_hash: None,
    }
}

fn dish(name: &str, dish_type_id: DishTypeId, cook_ids: Vec<CookId>) -> DishCreateDBRequest {
    DishCreateDBRequest {
        name: name.to_string(),
        description: format!("{name}, made fresh"),
        price: Decimal::new(650, 2),
        dish_type_id,
        cook_ids,
    }
}

/// Fixture that returns InMemoryStore
#[fixture]
fn in_memory_store() -> InMemoryStore {
    InMemoryStore::new()
}

async fn run_test_dish_type_counts<S: CatalogStore>(store: &S) {
    let dessert = store.create_dish_type(&dish_type("Dessert")).await.unwrap();
    let soup = store.create_dish_type(&dish_type("Soup")).await.unwrap();
    store.create_dish(&dish("Pie", dessert.id, vec![])).await.unwrap();
    store.create_dish(&dish("Cake", dessert.id, vec![])).await.unwrap();

    let listed = store.list_dish_types(&DishTypeFilter::default()).await.unwrap();
    let summary: Vec<(String, i64)> = listed.iter().map(|dt| (dt.name.clone(), dt.dish_count)).collect();
    assert_eq!(summary, vec![("Dessert".to_string(), 2), ("Soup".to_string(), 0)]);

    let fetched = store.get_dish_type(soup.id).await.unwrap().unwrap();
    assert_eq!(fetched.dish_count, 0);

    let filtered = store.list_dish_types(&DishTypeFilter::default().with_search("SOU")).await.unwrap();
    assert_eq!(filtered.iter().map(|dt| dt.id).collect::<Vec<_>>(), vec![soup.id]);
}

#[rstest]
#[tokio::test]
async fn test_dish_type_counts(in_memory_store: InMemoryStore) {
    run_test_dish_type_counts(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_dish_type_counts_postgres(pool: sqlx::PgPool) {
    run_test_dish_type_counts(&PostgresStore::new(pool)).await;
}

async fn run_test_duplicate_dish_type_name<S: CatalogStore>(store: &S) {
    let soup = store.create_dish_type(&dish_type("Soup")).await.unwrap();
    let salad = store.create_dish_type(&dish_type("Salad")).await.unwrap();

    let err = store.create_dish_type(&dish_type("Soup")).await.unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
    assert_eq!(err.constraint(), Some(constraints::DISH_TYPES_NAME_UNIQUE));

    let err = store
        .update_dish_type(salad.id, &DishTypeUpdateDBRequest { name: Some("Soup".to_string()) })
        .await
        .unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::DISH_TYPES_NAME_UNIQUE));

    // Renaming to its own name is not a conflict
    let renamed = store
        .update_dish_type(soup.id, &DishTypeUpdateDBRequest { name: Some("Soup".to_string()) })
        .await
        .unwrap();
    assert_eq!(renamed.name, "Soup");
    assert_eq!(store.count_dish_types().await.unwrap(), 2);
}

#[rstest]
#[tokio::test]
async fn test_duplicate_dish_type_name(in_memory_store: InMemoryStore) {
    run_test_duplicate_dish_type_name(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_duplicate_dish_type_name_postgres(pool: sqlx::PgPool) {
    run_test_duplicate_dish_type_name(&PostgresStore::new(pool)).await;
}

async fn run_test_cook_search<S: CatalogStore>(store: &S) {
    let ann = store.create_cook(&cook("annl", "Ann", "Lee")).await.unwrap();
    let ben = store.create_cook(&cook("benf", "Ben", "Ford")).await.unwrap();

    let found = store.list_cooks(&CookFilter::default().with_search("for")).await.unwrap();
    assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ben.id]);

    let found = store.list_cooks(&CookFilter::default().with_search("ANN")).await.unwrap();
    assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ann.id]);

    let all = store.list_cooks(&CookFilter::default()).await.unwrap();
    assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ann.id, ben.id]);

    let all = store.list_cooks(&CookFilter::default().with_search("")).await.unwrap();
    assert_eq!(all.len(), 2);

    let none = store.list_cooks(&CookFilter::default().with_search("zzz")).await.unwrap();
    assert!(none.is_empty());

    let by_username = store.get_cook_by_username("benf").await.unwrap().unwrap();
    assert_eq!(by_username.id, ben.id);
    assert!(store.get_cook_by_username("BENF").await.unwrap().is_none());
}

#[rstest]
#[tokio::test]
async fn test_cook_search(in_memory_store: InMemoryStore) {
    run_test_cook_search(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_cook_search_postgres(pool: sqlx::PgPool) {
    run_test_cook_search(&PostgresStore::new(pool)).await;
}

async fn run_test_cook_constraints<S: CatalogStore>(store: &S) {
    let ann = store.create_cook(&cook("annl", "Ann", "Lee")).await.unwrap();

    let err = store.create_cook(&cook("annl", "Other", "Ann")).await.unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::COOKS_USERNAME_UNIQUE));

    let mut negative = cook("newbie", "New", "Bie");
    negative.years_of_experience = -1;
    let err = store.create_cook(&negative).await.unwrap_err();
    assert!(matches!(err, DbError::CheckViolation { .. }));
    assert_eq!(err.constraint(), Some(constraints::COOKS_YEARS_OF_EXPERIENCE_NON_NEGATIVE));

    let err = store
        .update_cook(
            ann.id,
            &CookUpdateDBRequest {
                years_of_experience: Some(-5),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::COOKS_YEARS_OF_EXPERIENCE_NON_NEGATIVE));

    let unchanged = store.get_cook(ann.id).await.unwrap().unwrap();
    assert_eq!(unchanged.years_of_experience, 2);
    assert_eq!(store.count_cooks().await.unwrap(), 1);
}

#[rstest]
#[tokio::test]
async fn test_cook_constraints(in_memory_store: InMemoryStore) {
    run_test_cook_constraints(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_cook_constraints_postgres(pool: sqlx::PgPool) {
    run_test_cook_constraints(&PostgresStore::new(pool)).await;
}

async fn run_test_cook_update_keeps_password<S: CatalogStore>(store: &S) {
    let mut request = cook("annl", "Ann", "Lee");
    request.password_hash = Some("$argon2id$v=19$stored".to_string());
    let ann = store.create_cook(&request).await.unwrap();

    let updated = store
        .update_cook(
            ann.id,
            &CookUpdateDBRequest {
                first_name: Some("Anne".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Anne");
    assert_eq!(updated.last_name, "Lee");
    assert_eq!(updated.password_hash.as_deref(), Some("$argon2id$v=19$stored"));
}

#[rstest]
#[tokio::test]
async fn test_cook_update_keeps_password(in_memory_store: InMemoryStore) {
    run_test_cook_update_keeps_password(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_cook_update_keeps_password_postgres(pool: sqlx::PgPool) {
    run_test_cook_update_keeps_password(&PostgresStore::new(pool)).await;
}

async fn run_test_dish_references<S: CatalogStore>(store: &S) {
    let dessert = store.create_dish_type(&dish_type("Dessert")).await.unwrap();
    let ann = store.create_cook(&cook("annl", "Ann", "Lee")).await.unwrap();

    let err = store.create_dish(&dish("Pie", dessert.id + 100, vec![])).await.unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    assert_eq!(err.constraint(), Some(constraints::DISHES_DISH_TYPE_ID_FKEY));

    let err = store.create_dish(&dish("Pie", dessert.id, vec![ann.id, ann.id + 100])).await.unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::DISH_COOKS_COOK_ID_FKEY));

    let mut negative = dish("Pie", dessert.id, vec![]);
    negative.price = Decimal::new(-1, 2);
    let err = store.create_dish(&negative).await.unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::DISHES_PRICE_NON_NEGATIVE));

    // Nothing was written by the failed attempts
    assert_eq!(store.count_dishes().await.unwrap(), 0);

    let pie = store.create_dish(&dish("Pie", dessert.id, vec![ann.id, ann.id])).await.unwrap();
    assert_eq!(pie.cook_ids, vec![ann.id]);
    assert_eq!(pie.price, Decimal::new(650, 2));
    assert_eq!(store.get_dish(pie.id).await.unwrap().unwrap().cook_ids, vec![ann.id]);
}

#[rstest]
#[tokio::test]
async fn test_dish_references(in_memory_store: InMemoryStore) {
    run_test_dish_references(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_dish_references_postgres(pool: sqlx::PgPool) {
    run_test_dish_references(&PostgresStore::new(pool)).await;
}

async fn run_test_dish_update<S: CatalogStore>(store: &S) {
    let dessert = store.create_dish_type(&dish_type("Dessert")).await.unwrap();
    let soup = store.create_dish_type(&dish_type("Soup")).await.unwrap();
    let ann = store.create_cook(&cook("annl", "Ann", "Lee")).await.unwrap();
    let ben = store.create_cook(&cook("benf", "Ben", "Ford")).await.unwrap();
    let pie = store.create_dish(&dish("Pie", dessert.id, vec![ann.id])).await.unwrap();

    // Absent fields are unchanged, including the cook set
    let moved = store
        .update_dish(
            pie.id,
            &DishUpdateDBRequest {
                dish_type_id: Some(soup.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.dish_type_id, soup.id);
    assert_eq!(moved.name, "Pie");
    assert_eq!(moved.price, pie.price);
    assert_eq!(moved.cook_ids, vec![ann.id]);

    // A supplied cook list replaces the set
    let recast = store
        .update_dish(
            pie.id,
            &DishUpdateDBRequest {
                cook_ids: Some(vec![ben.id]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(recast.cook_ids, vec![ben.id]);

    let err = store
        .update_dish(
            pie.id,
            &DishUpdateDBRequest {
                dish_type_id: Some(soup.id + 100),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.constraint(), Some(constraints::DISHES_DISH_TYPE_ID_FKEY));
    assert_eq!(store.get_dish(pie.id).await.unwrap().unwrap().dish_type_id, soup.id);

    let err = store.update_dish(pie.id + 100, &DishUpdateDBRequest::default()).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound));
}

#[rstest]
#[tokio::test]
async fn test_dish_update(in_memory_store: InMemoryStore) {
    run_test_dish_update(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_dish_update_postgres(pool: sqlx::PgPool) {
    run_test_dish_update(&PostgresStore::new(pool)).await;
}

async fn run_test_dish_filters<S: CatalogStore>(store: &S) {
    let dessert = store.create_dish_type(&dish_type("Dessert")).await.unwrap();
    let soup = store.create_dish_type(&dish_type("Soup")).await.unwrap();
    let ann = store.create_cook(&cook("annl", "Ann", "Lee")).await.unwrap();
    let pie = store.create_dish(&dish("Apple Pie", dessert.id, vec![ann.id])).await.unwrap();
    let tart = store.create_dish(&dish("Tart", dessert.id, vec![])).await.unwrap();
    let broth = store.create_dish(&dish("Pie-crust broth", soup.id, vec![])).await.unwrap();

    let ids = |dishes: Vec<crate::db::models::dishes::DishDBResponse>| dishes.into_iter().map(|d| d.id).collect::<Vec<_>>();

    assert_eq!(ids(store.list_dishes(&DishFilter::default()).await.unwrap()), vec![pie.id, tart.id, broth.id]);
    assert_eq!(
        ids(store.list_dishes(&DishFilter::default().with_search("pie")).await.unwrap()),
        vec![pie.id, broth.id]
    );
    assert_eq!(
        ids(store.list_dishes(&DishFilter::default().with_dish_type(dessert.id)).await.unwrap()),
        vec![pie.id, tart.id]
    );
    assert_eq!(ids(store.list_dishes(&DishFilter::default().with_cook(ann.id)).await.unwrap()), vec![pie.id]);
    assert_eq!(
        ids(store
            .list_dishes(&DishFilter::default().with_search("pie").with_dish_type(soup.id))
            .await
            .unwrap()),
        vec![broth.id]
    );
}

#[rstest]
#[tokio::test]
async fn test_dish_filters(in_memory_store: InMemoryStore) {
    run_test_dish_filters(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_dish_filters_postgres(pool: sqlx::PgPool) {
    run_test_dish_filters(&PostgresStore::new(pool)).await;
}

async fn run_test_delete_dish_type_restrict<S: CatalogStore>(store: &S) {
    let dessert = store.create_dish_type(&dish_type("Dessert")).await.unwrap();
    let empty = store.create_dish_type(&dish_type("Empty")).await.unwrap();
    store.create_dish(&dish("Pie", dessert.id, vec![])).await.unwrap();

    let err = store.delete_dish_type(dessert.id, DeletePolicy::Restrict).await.unwrap_err();
    assert!(matches!(err, DbError::ProtectedEntity { .. }));
    assert!(store.get_dish_type(dessert.id).await.unwrap().is_some());
    assert_eq!(store.count_dishes().await.unwrap(), 1);

    assert!(store.delete_dish_type(empty.id, DeletePolicy::Restrict).await.unwrap());
    assert!(!store.delete_dish_type(empty.id, DeletePolicy::Restrict).await.unwrap());
}

#[rstest]
#[tokio::test]
async fn test_delete_dish_type_restrict(in_memory_store: InMemoryStore) {
    run_test_delete_dish_type_restrict(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_delete_dish_type_restrict_postgres(pool: sqlx::PgPool) {
    run_test_delete_dish_type_restrict(&PostgresStore::new(pool)).await;
}

async fn run_test_delete_dish_type_cascade<S: CatalogStore>(store: &S) {
    let dessert = store.create_dish_type(&dish_type("Dessert")).await.unwrap();
    let soup = store.create_dish_type(&dish_type("Soup")).await.unwrap();
    let ann = store.create_cook(&cook("annl", "Ann", "Lee")).await.unwrap();
    store.create_dish(&dish("Pie", dessert.id, vec![ann.id])).await.unwrap();
    let broth = store.create_dish(&dish("Broth", soup.id, vec![ann.id])).await.unwrap();

    assert!(store.delete_dish_type(dessert.id, DeletePolicy::Cascade).await.unwrap());

    assert!(store.get_dish_type(dessert.id).await.unwrap().is_none());
    let remaining = store.list_dishes(&DishFilter::default()).await.unwrap();
    assert_eq!(remaining.iter().map(|d| d.id).collect::<Vec<_>>(), vec![broth.id]);
    assert_eq!(
        store.list_dishes(&DishFilter::default().with_cook(ann.id)).await.unwrap().len(),
        1
    );
    // The cook is untouched
    assert!(store.get_cook(ann.id).await.unwrap().is_some());
}

#[rstest]
#[tokio::test]
async fn test_delete_dish_type_cascade(in_memory_store: InMemoryStore) {
    run_test_delete_dish_type_cascade(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_delete_dish_type_cascade_postgres(pool: sqlx::PgPool) {
    run_test_delete_dish_type_cascade(&PostgresStore::new(pool)).await;
}

async fn run_test_delete_cook_and_dish<S: CatalogStore>(store: &S) {
    let dessert = store.create_dish_type(&dish_type("Dessert")).await.unwrap();
    let ann = store.create_cook(&cook("annl", "Ann", "Lee")).await.unwrap();
    let ben = store.create_cook(&cook("benf", "Ben", "Ford")).await.unwrap();
    let pie = store.create_dish(&dish("Pie", dessert.id, vec![ann.id, ben.id])).await.unwrap();

    assert!(store.delete_cook(ann.id).await.unwrap());
    assert!(!store.delete_cook(ann.id).await.unwrap());

    let pie_now = store.get_dish(pie.id).await.unwrap().unwrap();
    assert_eq!(pie_now.cook_ids, vec![ben.id]);

    assert!(store.delete_dish(pie.id).await.unwrap());
    assert!(store.get_dish(pie.id).await.unwrap().is_none());
    assert!(!store.delete_dish(pie.id).await.unwrap());

    // Deleting the last dish frees the type for a restricted delete
    assert_eq!(store.get_dish_type(dessert.id).await.unwrap().unwrap().dish_count, 0);
    assert!(store.delete_dish_type(dessert.id, DeletePolicy::Restrict).await.unwrap());
}

#[rstest]
#[tokio::test]
async fn test_delete_cook_and_dish(in_memory_store: InMemoryStore) {
    run_test_delete_cook_and_dish(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_delete_cook_and_dish_postgres(pool: sqlx::PgPool) {
    run_test_delete_cook_and_dish(&PostgresStore::new(pool)).await;
}

async fn run_test_bulk_lookup_and_counts<S: CatalogStore>(store: &S) {
    let ann = store.create_cook(&cook("annl", "Ann", "Lee")).await.unwrap();
    let ben = store.create_cook(&cook("benf", "Ben", "Ford")).await.unwrap();

    let bulk = store.get_cooks_bulk(vec![ben.id, ann.id, ben.id + 100]).await.unwrap();
    assert_eq!(bulk.len(), 2);
    assert_eq!(bulk[&ann.id].username, "annl");

    assert!(store.get_cooks_bulk(vec![]).await.unwrap().is_empty());
    assert!(ann.id < ben.id);
    assert_eq!(store.count_cooks().await.unwrap(), 2);
    assert_eq!(store.count_dish_types().await.unwrap(), 0);
    assert_eq!(store.count_dishes().await.unwrap(), 0);
}

#[rstest]
#[tokio::test]
async fn test_bulk_lookup_and_counts(in_memory_store: InMemoryStore) {
    run_test_bulk_lookup_and_counts(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_bulk_lookup_and_counts_postgres(pool: sqlx::PgPool) {
    run_test_bulk_lookup_and_counts(&PostgresStore::new(pool)).await;
}
