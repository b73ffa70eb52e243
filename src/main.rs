use anyhow::Context;
use order_service::lifecycle::{setup_tracing, OrderSystem, ServiceConfig};
use order_service::model::{Order, OrderDraft, OrderLine};
use std::time::Duration;
use tracing::{info, info_span, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = ServiceConfig::from_env().context("loading configuration")?;
    let system = OrderSystem::start(config).await?;
    let service = system.service.clone();

    let mut notifications = service
        .subscribe_channel("demo-client")
        .context("subscribing demo client")?;

    async {
        let draft = OrderDraft {
            freight: 11.61,
            ship_name: "Ernst Handel".into(),
            ship_city: "Graz".into(),
            ship_country: "Austria".into(),
            lines: vec![OrderLine::new(17, 31.2, 6), OrderLine::new(64, 26.6, 15)],
            ..OrderDraft::new("ERNSH", chrono::Utc::now() + chrono::Duration::days(7))
        };
        let id = service.create_new_order(Some(draft)).await?;
        service.process_order(id).await?;
        service.close_order(id).await?;

        for _ in 0..2 {
            let event = tokio::time::timeout(Duration::from_secs(1), notifications.recv())
                .await
                .context("waiting for status change")?
                .context("notification channel closed")?;
            info!(order_id = %event.order_id, state = %event.state, "Status change received");
        }

        let orders = service.get_all().await?;
        let value: f64 = orders.iter().map(Order::total).sum();
        info!(count = orders.len(), value, "Orders in store");

        let slow = service.clone();
        let long_running = tokio::spawn(async move { slow.simulate_long_running_operation(1).await });
        let during = service.get_all().await?;
        info!(count = during.len(), "Store answered during long-running operation");
        long_running.await??;

        service.unsubscribe("demo-client");
        anyhow::Ok(())
    }
    .instrument(info_span!("demo"))
    .await?;

    drop(service);
    system.shutdown().await?;
    Ok(())
}
