//! Simple test client for a running lobbyd instance.
//!
//! Run with: cargo run --example test_client -- [host] [port]
//!
//! Tests:
//! 1. c:ping - Echo check
//! 2. c:protocols - Capability exchange
//! 3. c:server_port - Downstream game port
//! 4. c:player_profiles_list - Roster after our heartbeat landed
//! 5. Unknown operation rejection test
//! 6. c:player_easytier_id - Advertised but unsupported

use std::time::Duration;

use lobbyd::client::LobbyClient;
use lobbyd::error::LobbyError;
use lobbyd::protocol::negotiate::OP_PLAYER_EASYTIER_ID;
use lobbyd::roster::PlayerIdentity;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let host = args.get(1).cloned().unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = args.get(2).map(|p| p.parse()).transpose()?.unwrap_or(3939);

    println!("=== lobbyd test client ({host}:{port}) ===\n");

    let machine_id = format!("demo-{}", uuid::Uuid::new_v4());
    let identity = PlayerIdentity::new(Some("DemoPlayer".to_string()), machine_id.clone(), None);
    let client = LobbyClient::new(identity, host, port);
    client.connect().await?;

    // Test 1: Ping
    println!("Test 1: c:ping");
    let echoed = client.ping(b"Hello!").await?;
    println!("Echoed: {:?}\n", String::from_utf8_lossy(&echoed));

    // Test 2: Protocol negotiation
    println!("Test 2: c:protocols");
    let protocols = client.protocols().await?;
    println!("Server operations: {:?}\n", protocols);

    // Test 3: Game port (may legitimately be down)
    println!("Test 3: c:server_port");
    match client.server_port().await {
        Ok(port) => println!("Game port: {}\n", port),
        Err(LobbyError::GameUnavailable) => println!("Game service not running yet\n"),
        Err(e) => return Err(e.into()),
    }

    // Test 4: Roster (give the first heartbeat a moment to land)
    println!("Test 4: c:player_profiles_list");
    tokio::time::sleep(Duration::from_millis(200)).await;
    let players = client.player_profiles_list().await?;
    println!("Players ({}):", players.len());
    for player in &players {
        println!("  {:?}", player);
    }
    assert!(
        players.iter().any(|p| p.machine_id == machine_id),
        "our own heartbeat should be visible"
    );
    println!();

    // Test 5: Unknown operation
    println!("Test 5: unknown operation");
    let (status, body) = client.send_request("c:teleport", b"").await?;
    println!(
        "Status {}: {}\n",
        status,
        String::from_utf8_lossy(&body)
    );

    // Test 6: Advertised operation without a handler
    println!("Test 6: {}", OP_PLAYER_EASYTIER_ID);
    let (status, body) = client.send_request(OP_PLAYER_EASYTIER_ID, b"").await?;
    println!(
        "Status {}: {}\n",
        status,
        String::from_utf8_lossy(&body)
    );

    client.disconnect().await?;
    println!("=== All tests completed ===");
    Ok(())
}
