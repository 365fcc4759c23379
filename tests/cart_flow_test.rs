mod common;

use common::item;
use nftcart::application::{CartViewModel, Completion, UpdateContext};
use nftcart::domain::cart::{CartItem, Price};
use nftcart::domain::ports::CartServiceArc;
use nftcart::infrastructure::in_memory::InMemoryNftService;
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::test]
async fn test_load_notifies_every_subscriber() {
    let service = InMemoryNftService::new(
        vec![item("1", dec!(1.5)), item("2", dec!(2.25)), item("3", dec!(0.0))],
        Vec::new(),
    );
    let vm = CartViewModel::new(Arc::new(service), UpdateContext::immediate());

    let seen: Vec<Arc<Mutex<Vec<Vec<CartItem>>>>> = (0..3)
        .map(|_| {
            let log = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&log);
            vm.items().subscribe(move |items| sink.lock().push(items.clone()));
            log
        })
        .collect();

    vm.on_screen_load().await.unwrap();

    assert_eq!(vm.items().get().len(), 3);
    for log in &seen {
        let log = log.lock();
        assert_eq!(log.len(), 2, "initial value plus the loaded list");
        assert!(log[0].is_empty());
        assert_eq!(log[1].len(), 3);
    }
    assert_eq!(vm.total_price().unwrap(), Price::new(dec!(3.75)).unwrap());
}

#[tokio::test]
async fn test_load_failure_preserves_prior_items() {
    let service = InMemoryNftService::new(vec![item("1", dec!(1.0)), item("2", dec!(2.0))], Vec::new());
    let vm = CartViewModel::new(Arc::new(service.clone()), UpdateContext::immediate());
    vm.on_screen_load().await.unwrap();
    let before = vm.items().get();

    service.fail_cart(true);
    let completion = vm.on_screen_load().await.unwrap();

    assert_eq!(completion, Completion::Failed);
    assert_eq!(vm.items().get(), before);
    assert!(!vm.is_loading().get());
}

#[tokio::test]
async fn test_queued_context_keeps_writes_on_the_update_loop() {
    let service: CartServiceArc = Arc::new(
        InMemoryNftService::new(vec![item("1", dec!(1.0))], Vec::new())
            .with_latency(std::time::Duration::from_millis(5)),
    );
    let (context, mut updates) = UpdateContext::queued();
    let vm = CartViewModel::new(service, context);

    let completion = vm.on_screen_load().await.unwrap();
    assert_eq!(completion, Completion::Succeeded);
    assert_eq!(vm.count(), 0, "nothing applied before the loop runs");
    assert!(vm.is_loading().get());

    assert!(updates.apply_next().await);
    assert_eq!(vm.count(), 1);
    assert!(!vm.is_loading().get());
}

#[tokio::test]
async fn test_totals_follow_the_current_list() {
    let service = InMemoryNftService::new(
        vec![item("a", dec!(0.1)), item("b", dec!(0.2)), item("c", dec!(0.3))],
        Vec::new(),
    );
    let vm = CartViewModel::new(Arc::new(service), UpdateContext::immediate());
    vm.on_screen_load().await.unwrap();

    let totals = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&totals);
    vm.items().subscribe(move |items: &Vec<CartItem>| {
        sink.lock().push(nftcart::domain::cart::total_price(items).unwrap().to_string())
    });

    vm.remove_item("b");
    vm.remove_at(0);

    assert_eq!(*totals.lock(), vec!["0.60", "0.40", "0.30"]);
    assert_eq!(vm.total_price().unwrap().value(), dec!(0.3));
}
