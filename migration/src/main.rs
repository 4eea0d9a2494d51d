//! Schema CLI for the greenhouse database.
//!
//! `DATABASE_URL` is read from the environment or a `.env` file, e.g.
//! `DATABASE_URL=sqlite://greenhouse.db?mode=rwc cargo run -p migration -- status`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(migration::Migrator).await;
}
