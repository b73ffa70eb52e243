use actor_framework::mock::MockClient;
use actor_framework::FrameworkError;
use chrono::Utc;
use order_service::broadcast::BroadcastHandle;
use order_service::clients::OrderClient;
use order_service::model::{Order, OrderDraft, OrderId, OrderState, StatusChangeEvent};
use order_service::order_actor::OrderError;
use tokio::sync::mpsc;

/// Engine over a scripted store, plus the receiver its events are published to.
fn engine(mock: &MockClient<Order>) -> (OrderClient, mpsc::UnboundedReceiver<StatusChangeEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (OrderClient::new(mock.client(), BroadcastHandle::new(sender)), receiver)
}

fn order(id: i32) -> Order {
    Order::new(OrderId(id), OrderDraft::new("ALFKI", Utc::now()))
}

#[tokio::test]
async fn test_successful_transition_publishes_before_returning() {
    let mut mock = MockClient::<Order>::new();
    mock.expect_action(OrderId(7)).return_ok(OrderState::InWork);
    mock.expect_action(OrderId(7)).return_ok(OrderState::Closed);
    let (client, mut events) = engine(&mock);

    client.process_order(OrderId(7)).await.unwrap();
    assert_eq!(
        events.try_recv().unwrap(),
        StatusChangeEvent::new(OrderId(7), OrderState::InWork)
    );

    client.close_order(OrderId(7)).await.unwrap();
    assert_eq!(
        events.try_recv().unwrap(),
        StatusChangeEvent::new(OrderId(7), OrderState::Closed)
    );
    assert!(events.try_recv().is_err());

    mock.verify();
}

#[tokio::test]
async fn test_failed_transition_publishes_nothing() {
    let mut mock = MockClient::<Order>::new();
    mock.expect_action(OrderId(3)).return_err(FrameworkError::EntityError(Box::new(
        OrderError::InvalidState {
            id: OrderId(3),
            state: OrderState::Closed,
            operation: "process",
        },
    )));
    mock.expect_action(OrderId(4)).return_err(FrameworkError::ActorClosed);
    let (client, mut events) = engine(&mock);

    let err = client.process_order(OrderId(3)).await.unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidState {
            id: OrderId(3),
            state: OrderState::Closed,
            operation: "process",
        }
    );

    let err = client.close_order(OrderId(4)).await.unwrap_err();
    assert!(matches!(err, OrderError::StoreUnavailable(_)));
    assert!(!err.is_request_fault());

    assert!(events.try_recv().is_err());
    mock.verify();
}

#[tokio::test]
async fn test_store_replies_map_to_domain_errors() {
    let mut mock = MockClient::<Order>::new();
    mock.expect_get(OrderId(5)).return_ok(None);
    mock.expect_delete(OrderId(5)).return_ok(0);
    mock.expect_action(OrderId(6))
        .return_err(FrameworkError::NotFound("6".into()));
    mock.expect_list().return_err(FrameworkError::ActorDropped);
    let (client, _events) = engine(&mock);

    assert_eq!(
        client.get_order(OrderId(5)).await,
        Err(OrderError::NotFound("5".into()))
    );
    assert_eq!(
        client.delete_order(OrderId(5)).await,
        Err(OrderError::NotFound("5".into()))
    );
    assert_eq!(
        client.process_order(OrderId(6)).await,
        Err(OrderError::NotFound("6".into()))
    );
    assert!(matches!(
        client.all_orders().await,
        Err(OrderError::StoreUnavailable(_))
    ));

    mock.verify();
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_store() {
    let mock = MockClient::<Order>::new();
    let (client, mut events) = engine(&mock);

    assert!(matches!(
        client.create_order(None).await,
        Err(OrderError::InvalidArgument(_))
    ));
    assert!(matches!(
        client.create_order(Some(OrderDraft::new("", Utc::now()))).await,
        Err(OrderError::InvalidArgument(_))
    ));
    assert!(matches!(
        client.update_order(None).await,
        Err(OrderError::InvalidArgument(_))
    ));
    assert!(matches!(
        client.update_order(Some(order(0))).await,
        Err(OrderError::NotFound(_))
    ));
    assert!(matches!(
        client.delete_order(OrderId(-1)).await,
        Err(OrderError::NotFound(_))
    ));
    assert!(matches!(
        client.process_order(OrderId(-5)).await,
        Err(OrderError::NotFound(_))
    ));

    assert!(events.try_recv().is_err());
    mock.verify();
}

#[tokio::test]
async fn test_all_orders_are_sorted_by_id() {
    let mut mock = MockClient::<Order>::new();
    mock.expect_list().return_ok(vec![order(9), order(2), order(5)]);
    let (client, _events) = engine(&mock);

    let ids: Vec<i32> = client
        .all_orders()
        .await
        .unwrap()
        .iter()
        .map(|o| o.id.0)
        .collect();
    assert_eq!(ids, vec![2, 5, 9]);

    mock.verify();
}

#[tokio::test]
async fn test_update_sends_the_editable_fields() {
    let mut mock = MockClient::<Order>::new();
    let mut stored = order(8);
    stored.ship_city = "Bern".into();
    mock.expect_update(OrderId(8)).return_ok(stored.clone());
    let (client, mut events) = engine(&mock);

    let updated = client.update_order(Some(stored.clone())).await.unwrap();
    assert_eq!(updated, stored);
    assert!(events.try_recv().is_err());

    mock.verify();
}

#[tokio::test]
async fn test_exhausted_ids_are_not_reported_as_unavailable_store() {
    let mut mock = MockClient::<Order>::new();
    mock.expect_create().return_err(FrameworkError::IdsExhausted);
    let (client, _events) = engine(&mock);

    let err = client
        .create_order(Some(OrderDraft::new("ALFKI", Utc::now())))
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::IdsExhausted);
    assert!(!err.is_request_fault());

    mock.verify();
}
