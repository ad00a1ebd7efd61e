use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use powermarket_catalog::{Catalog, Category, ProductId, RawFilters, SortKey};
use powermarket_core::UserId;
use powermarket_sales::{CheckoutRequest, OrderFilter, PaymentMethod, ShippingDetails, ShippingMethod};
use powermarket_storefront::{
    AppState, CurrentUser, InMemoryStore, KeyValueStore, ListingPhase, PageEntry, Session,
    StorefrontConfig,
};
use powermarket_storefront::storage::CART_KEY;

fn session_with(config: StorefrontConfig) -> (Session, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let catalog = Catalog::seeded().expect("seed catalog");
    (Session::new(Arc::new(catalog), store.clone(), config), store)
}

fn shopper() -> CurrentUser {
    CurrentUser {
        id: UserId::new(),
        first_name: "Diana".into(),
        last_name: "Prince".into(),
        email: "diana@power.market".into(),
    }
}

fn checkout_request(shipping_method: ShippingMethod) -> CheckoutRequest {
    CheckoutRequest {
        shipping: ShippingDetails {
            first_name: "Diana".into(),
            last_name: "Prince".into(),
            email: "diana@power.market".into(),
            phone: "912345678".into(),
            address: "Av. Themyscira 100".into(),
            city: "Lima".into(),
            zip: "15001".into(),
            country: "Perú".into(),
        },
        shipping_method,
        payment_method: PaymentMethod::CreditCard,
    }
}

#[tokio::test]
async fn browse_search_and_paginate() {
    let (session, _) = session_with(StorefrontConfig {
        search_page_size: 5,
        ..StorefrontConfig::default()
    });

    let mut listing = session.search_listing("");
    let first = listing.load().await;
    assert_eq!(first.phase, ListingPhase::DisplayingResults);
    assert_eq!(first.page.total_items, 14);
    assert_eq!(first.page.total_pages, 3);
    assert_eq!(first.controls.next, Some(2));
    assert_eq!(first.controls.entries[0], PageEntry::Current(1));

    let last = listing.go_to_page(3).await;
    assert_eq!(last.page.items.len(), 4);
    assert!(last.page.has_prev);
    assert!(!last.page.has_next);

    let beyond = listing.go_to_page(9).await;
    assert!(beyond.page.items.is_empty());
    assert_eq!(beyond.phase, ListingPhase::DisplayingResults);

    let filtered = listing
        .set_filters(RawFilters {
            category: "mentales".into(),
            min_price: "2500".into(),
            max_price: "not-a-number".into(),
            ..RawFilters::default()
        })
        .await;
    let ids: Vec<u32> = filtered.page.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![8, 7]);
    assert_eq!(listing.page(), 1);

    let sorted = listing.set_sort(SortKey::PriceDesc).await;
    let ids: Vec<u32> = sorted.page.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![7, 8]);
}

#[tokio::test]
async fn category_browse_with_text_refinement() {
    let (session, _) = session_with(StorefrontConfig::default());
    let mut listing = session.category_listing(Category::Fisicos);

    assert_eq!(listing.load().await.page.total_items, 3);
    let narrowed = listing.set_search_text("relámpago").await;
    let ids: Vec<u32> = narrowed.page.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![11]);

    let none = listing.set_search_text("telepatía").await;
    assert_eq!(none.phase, ListingPhase::DisplayingEmpty);
}

#[tokio::test]
async fn cart_to_order_history() {
    let (session, store) = session_with(StorefrontConfig::default());
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    let state = session.load_state().unwrap();
    let state = session.sign_in(state, shopper()).unwrap();
    let state = session.add_to_cart(state, ProductId(7), 1, now).unwrap();
    let state = session.add_to_cart(state, ProductId(10), 3, now).unwrap();

    let mut recommendations = session.recommendations_listing(&state.cart);
    let recommended: Vec<u32> = recommendations
        .load()
        .await
        .page
        .items
        .iter()
        .map(|c| c.id)
        .collect();
    assert!(!recommended.contains(&7) && !recommended.contains(&10));
    assert!(recommended.len() <= 4);

    let too_many = session.update_quantity(state.clone(), ProductId(7), 99, now);
    assert!(too_many.is_err());

    let (state, order) = session
        .checkout(state, &checkout_request(ShippingMethod::Standard), now)
        .unwrap();
    assert!(state.cart.is_empty());
    assert_eq!(order.item_count(), 4);

    let (state, _) = {
        let state = session.add_to_cart(state, ProductId(26), 1, now + Duration::days(1)).unwrap();
        session
            .checkout(state, &checkout_request(ShippingMethod::Express), now + Duration::days(1))
            .unwrap()
    };

    let user_id = state.user_id().unwrap();
    let mut history = session.order_history_listing(user_id, OrderFilter::default(), now + Duration::days(2));
    let page = history.load().await;
    assert_eq!(page.page.total_items, 2);
    assert_eq!(page.page.items[1].id, order.id().to_string());
    assert_eq!(page.page.items[0].status_label, "Completada");

    let filtered = history
        .set_order_filter(OrderFilter::parse("cancelled", "all"))
        .await;
    assert_eq!(filtered.phase, ListingPhase::DisplayingEmpty);

    let stats = session.profile_stats(&state).unwrap();
    assert_eq!(stats.completed_orders, 2);
    assert_eq!(stats.units_acquired, 5);

    let reloaded = AppState::load(store.as_ref()).unwrap();
    assert_eq!(reloaded.orders.len(), 2);
    assert_eq!(reloaded.current_user.map(|u| u.id), Some(user_id));
}

#[tokio::test]
async fn saved_items_survive_reload() {
    let (session, store) = session_with(StorefrontConfig::default());
    let now = Utc::now();

    let state = session.add_to_cart(AppState::default(), ProductId(5), 2, now).unwrap();
    let state = session.save_for_later(state, ProductId(5), now).unwrap();
    assert!(state.cart.is_empty());
    assert!(state.cart.is_saved(ProductId(5)));

    let reloaded = session.load_state().unwrap();
    assert!(reloaded.cart.is_saved(ProductId(5)));

    let state = session.move_to_cart(reloaded, ProductId(5), now).unwrap();
    assert_eq!(state.cart.item_count(), 1);
    assert!(!state.cart.is_saved(ProductId(5)));

    store.set(CART_KEY, "{broken".to_string()).unwrap();
    let recovered = session.load_state().unwrap();
    assert!(recovered.cart.is_empty());
}
