//! End-to-end aggregate scenarios against the in-memory store.

#![cfg(feature = "inmemory")]

use std::collections::HashSet;

use uuid::Uuid;

use fairway::storage::inmemory::InMemoryStore;
use fairway::AggregateStore;
use fairway_core::model::{Order, OrderItem, OrderStatus, Product, ProductOption, User};
use fairway_core::storage::OrderedStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fairway=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn new_store() -> AggregateStore<InMemoryStore> {
    init_tracing();
    AggregateStore::new(InMemoryStore::new())
}

fn john_doe() -> User {
    User::new("John", "Doe", "johnDoe@gmail.com").with_user_name("johnDoe")
}

#[tokio::test]
async fn test_product_aggregate_in_insertion_order() {
    let store = new_store();

    let product = store.add_parent(Product::new("Driver")).await.unwrap();
    let standard = store
        .add_child(product.id, ProductOption::sized("Standard"))
        .await
        .unwrap();
    let tall = store
        .add_child(product.id, ProductOption::sized("Tall"))
        .await
        .unwrap();

    let aggregate = store
        .get_aggregate::<Product>(product.id)
        .await
        .unwrap()
        .expect("product aggregate");

    assert_eq!(aggregate.parent.name, "Driver");
    assert_eq!(aggregate.parent, product);

    let sizes: Vec<_> = aggregate
        .children
        .iter()
        .map(|option| option.size.as_deref())
        .collect();
    assert_eq!(sizes, vec![Some("Standard"), Some("Tall")]);
    assert_eq!(aggregate.children, vec![standard, tall]);
}

#[tokio::test]
async fn test_fully_populated_product_survives_storage() {
    let store = new_store();

    let product = store
        .add_parent(
            Product::new("Driver")
                .with_description("460cc titanium head")
                .with_price(49_999)
                .with_weight(310)
                .with_image("driver.png", "driver-thumb.png"),
        )
        .await
        .unwrap();
    let option = store
        .add_child(
            product.id,
            ProductOption::sized("Tall")
                .with_stock(12)
                .with_shaft_stiffness(6.5)
                .with_socket("hosel")
                .with_color("black"),
        )
        .await
        .unwrap();

    let aggregate = store
        .get_aggregate::<Product>(product.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(aggregate.parent, product);
    assert_eq!(aggregate.children, vec![option]);
}

#[tokio::test]
async fn test_children_match_the_set_added() {
    let store = new_store();
    let product = store.add_parent(Product::new("Putter")).await.unwrap();

    let mut added = HashSet::new();
    for size in ["Short", "Standard", "Long", "Tall"] {
        let option = store
            .add_child(product.id, ProductOption::sized(size))
            .await
            .unwrap();
        added.insert(option.id);
    }

    let aggregate = store
        .get_aggregate::<Product>(product.id)
        .await
        .unwrap()
        .unwrap();
    let read: HashSet<Uuid> = aggregate.children.iter().map(|option| option.id).collect();

    assert_eq!(read, added);
}

#[tokio::test]
async fn test_aggregates_do_not_leak_between_partitions() {
    let store = new_store();

    let driver = store.add_parent(Product::new("Driver")).await.unwrap();
    let putter = store.add_parent(Product::new("Putter")).await.unwrap();
    store
        .add_child(driver.id, ProductOption::sized("Tall"))
        .await
        .unwrap();

    let aggregate = store
        .get_aggregate::<Product>(putter.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(aggregate.parent, putter);
    assert!(aggregate.children.is_empty());
}

#[tokio::test]
async fn test_absent_aggregate() {
    let store = new_store();

    let product = store.get_aggregate::<Product>(Uuid::now_v7()).await.unwrap();
    let user = store.get_aggregate::<User>(Uuid::now_v7()).await.unwrap();

    assert!(product.is_none());
    assert!(user.is_none());
}

#[tokio::test]
async fn test_orders_found_by_id_alone() {
    let store = new_store();

    let user = store.add_parent(john_doe()).await.unwrap();
    let first = store
        .add_child(user.id, Order::new("123 Main Street NY, NY 12345", 5000))
        .await
        .unwrap();
    let second = store
        .add_child(user.id, Order::new("123 Main Street NY, NY 12345", 12_500))
        .await
        .unwrap();

    for order in [&first, &second] {
        let fetched = store
            .get_child::<Order>(order.id)
            .await
            .unwrap()
            .expect("order by id");

        assert_eq!(&fetched, order);
        assert_eq!(fetched.user_id, user.id);
    }

    let aggregate = store.get_aggregate::<User>(user.id).await.unwrap().unwrap();
    assert_eq!(aggregate.parent, user);
    assert_eq!(aggregate.children, vec![first, second]);
}

#[tokio::test]
async fn test_order_with_items() {
    let store = new_store();

    let product = store.add_parent(Product::new("Driver")).await.unwrap();
    let tall = store
        .add_child(product.id, ProductOption::sized("Tall"))
        .await
        .unwrap();

    let user = store.add_parent(john_doe()).await.unwrap();
    let order = store
        .add_child(user.id, Order::new("123 Main Street NY, NY 12345", 0))
        .await
        .unwrap();
    let driver_line = store
        .add_child(
            order.id,
            OrderItem::new(product.id, 1, 49_999).with_option(tall.id),
        )
        .await
        .unwrap();
    let ball_line = store
        .add_child(order.id, OrderItem::new(Uuid::now_v7(), 3, 1_500))
        .await
        .unwrap();

    let aggregate = store
        .get_nested_aggregate::<Order>(order.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(aggregate.parent, order);
    assert_eq!(aggregate.children, vec![driver_line, ball_line]);
    assert_eq!(
        aggregate
            .children
            .iter()
            .map(OrderItem::line_total)
            .sum::<i64>(),
        54_499
    );

    // The user's aggregate holds the order, not its items.
    let user_aggregate = store.get_aggregate::<User>(user.id).await.unwrap().unwrap();
    assert_eq!(user_aggregate.children.len(), 1);
}

#[tokio::test]
async fn test_order_status_overwrite() {
    let store = new_store();

    let user = store.add_parent(john_doe()).await.unwrap();
    let order = store
        .add_child(user.id, Order::new("123 Main Street NY, NY 12345", 5000))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    let shipped = order.clone().with_status(OrderStatus::Shipped);
    store.save_child(user.id, &shipped).await.unwrap();

    let fetched = store.get_child::<Order>(order.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, OrderStatus::Shipped);
    assert_eq!(store.store().item_count().await, 2);
}

#[tokio::test]
async fn test_parent_lookup_from_child() {
    let store = new_store();

    let user = store.add_parent(john_doe()).await.unwrap();
    let order = store
        .add_child(user.id, Order::new("123 Main Street NY, NY 12345", 5000))
        .await
        .unwrap();
    let item = store
        .add_child(order.id, OrderItem::new(Uuid::now_v7(), 1, 5000))
        .await
        .unwrap();

    assert_eq!(
        store.get_parent_id::<Order>(order.id).await.unwrap(),
        Some(user.id)
    );
    assert_eq!(
        store.get_parent_id::<OrderItem>(item.id).await.unwrap(),
        Some(order.id)
    );
}

#[tokio::test]
async fn test_concurrent_children() {
    let store = new_store();
    let product = store.add_parent(Product::new("Iron Set")).await.unwrap();

    let handles: Vec<_> = (4..=9)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .add_child(product.id, ProductOption::sized(format!("{n}-iron")))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let aggregate = store
        .get_aggregate::<Product>(product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.children.len(), 6);
}

#[tokio::test]
async fn test_user_found_by_email() {
    let store = new_store();

    let user = store
        .add_user(User::new("Jane", "Smith", "jd.smith@gmail.com").with_user_name("jdsmith"))
        .await
        .unwrap();
    store
        .add_child(user.id, Order::new("9 Fairway Drive", 2500))
        .await
        .unwrap();

    let fetched = store
        .get_user_by_email("jd.smith@gmail.com")
        .await
        .unwrap()
        .expect("user by email");

    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, "jd.smith@gmail.com");
    assert_eq!(fetched, user);
    assert!(store
        .get_user_by_email("johnDoe@gmail.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_metadata_records_are_not_indexed() {
    let store = new_store();

    let product = store.add_parent(Product::new("Driver")).await.unwrap();
    let user = store.add_user(john_doe()).await.unwrap();
    store
        .add_child(product.id, ProductOption::sized("Tall"))
        .await
        .unwrap();
    store
        .add_child(user.id, Order::new("123 Main Street NY, NY 12345", 5000))
        .await
        .unwrap();

    let metadata = store.store().query_inverted("METADATA#").await.unwrap();

    assert!(metadata.is_empty());
    assert_eq!(store.store().index_count().await, 2);
}
