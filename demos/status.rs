//! Connects to a console and prints the output of `status`.
//!
//! Usage:
//!   cargo run --example status -- <host:port> <secret>
//!   cargo run --example status -- 127.0.0.1:28016 docker

// ============================================================================
// Imports
// ============================================================================

use webrcon::{Result, Session};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let address = args.next().unwrap_or_else(|| "127.0.0.1:28016".to_string());
    let secret = args.next().unwrap_or_else(|| "docker".to_string());

    let mut session = Session::connect(&address, &secret).await?;
    println!(
        "connected: {} -> {}",
        session.local_addr(),
        session.remote_addr()
    );

    let status = session.execute("status").await?;
    println!("{status}");

    session.close().await
}
