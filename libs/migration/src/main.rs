use migration::Migrator;
use sea_orm_migration::cli;

/// `DATABASE_URL=sqlite://todo.db?mode=rwc cargo run -p migration -- up`
#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
