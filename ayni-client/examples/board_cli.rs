//! Order Board Example
//!
//! Logs in (or reuses `AYNI_TOKEN`), loads the board and prints each lane.
//! Optionally moves one order first.
//!
//! Run: cargo run --example board_cli
//!      cargo run --example board_cli -- 42 confirmado

use std::sync::Arc;

use anyhow::Context;
use ayni_client::agenda::machine_label;
use ayni_client::logger::setup_environment;
use ayni_client::{OrderBoard, OrderId, OrderStatus, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = setup_environment();
    let session: Arc<Session> = config.build_session();
    let board = OrderBoard::connect(&config, session.clone())?;

    println!("\n🧵 Studio Ayni - Pedidos");
    println!("========================");
    println!("API: {}\n", config.base_url);

    if let (Ok(email), Ok(password)) = (std::env::var("AYNI_EMAIL"), std::env::var("AYNI_PASSWORD")) {
        board
            .api()
            .http()
            .login(&email, &password)
            .await
            .context("login failed")?;
    }
    if board.requires_login().await {
        anyhow::bail!("no session: set AYNI_TOKEN or AYNI_EMAIL/AYNI_PASSWORD");
    }

    board.load_orders().await?;

    let mut args = std::env::args().skip(1);
    if let (Some(id), Some(status)) = (args.next(), args.next()) {
        let status = OrderStatus::from_wire(&status)
            .with_context(|| format!("unknown status '{status}'"))?;
        let id = OrderId::from(id.as_str());
        if board.move_order(&id, status).await? {
            if let Some(notice) = board.notice().await {
                println!("{}\n", notice.message);
            }
        } else {
            println!("Pedido #{id} ya está en {}\n", status.label());
        }
    }

    for view in board.lanes().await {
        if view.orders.is_empty() && view.lane.status().is_none() {
            continue;
        }
        println!("{} ({})", view.lane.label(), view.count());
        for order in &view.orders {
            let urgent = if order.urgent { " 🔥" } else { "" };
            let machine = machine_label(order)
                .map(|m| format!(" [{m}]"))
                .unwrap_or_default();
            println!(
                "  #{} {} - Bs {}{}{}",
                order.id, order.customer.name, order.total, machine, urgent
            );
        }
    }

    let stats = board.stats().await;
    println!(
        "\nTotal: {} pedidos, Bs {} en ventas",
        stats.total_orders, stats.total_sales
    );
    Ok(())
}
