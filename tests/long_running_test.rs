use order_service::lifecycle::{OrderSystem, ServiceConfig};
use order_service::order_actor::OrderError;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

async fn seeded_system() -> OrderSystem {
    OrderSystem::start(ServiceConfig::default()).await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_waits_at_least_the_requested_duration() {
    let system = seeded_system().await;

    let started = Instant::now();
    system.service.simulate_long_running_operation(10).await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(10));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_other_requests_proceed_while_waiting() {
    let system = seeded_system().await;

    let slow = system.service.clone();
    let started = Instant::now();
    let long_running = tokio::spawn(async move { slow.simulate_long_running_operation(2).await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let orders = tokio::time::timeout(Duration::from_millis(500), system.service.get_all())
        .await
        .expect("get_all must not wait for the long-running operation")
        .unwrap();
    assert_eq!(orders.len(), 3);
    assert!(!long_running.is_finished());

    long_running.await.unwrap().unwrap();
    assert!(started.elapsed() >= Duration::from_secs(2));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_caller_cancellation_ends_the_wait() {
    let system = seeded_system().await;
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        system.service.simulate_long_running_operation_with(60, &cancel),
    )
    .await
    .unwrap();
    assert_eq!(result, Err(OrderError::Cancelled));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_interrupts_pending_operations() {
    let system = seeded_system().await;

    let slow = system.service.clone();
    let long_running = tokio::spawn(async move { slow.simulate_long_running_operation(60).await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    tokio::time::timeout(Duration::from_secs(5), system.shutdown())
        .await
        .expect("shutdown should not wait out the operation")
        .unwrap();
    assert_eq!(long_running.await.unwrap(), Err(OrderError::Cancelled));
}

#[tokio::test]
async fn test_zero_seconds_returns_immediately() {
    let system = seeded_system().await;
    tokio::time::timeout(
        Duration::from_millis(500),
        system.service.simulate_long_running_operation(0),
    )
    .await
    .unwrap()
    .unwrap();
    system.shutdown().await.unwrap();
}
