//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16) -> Result<()> {
    let db = open_db(db_path)?;

    println!("🚀 Starting Tally web server...");
    println!("   Database: {}", db.path());
    println!("   Listening: http://{}:{}", host, port);
    println!("   🔑 Requests must carry an {} header", tally_server::USER_ID_HEADER);
    println!();

    tally_server::serve(db, host, port)
        .await
        .context("Server exited with an error")
}
