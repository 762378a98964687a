use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// SQLite file to create or extend
    db_path: String,

    /// JSON inventory fixture
    fixture: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    seeder::seed(&args.db_path, &args.fixture).await?;

    Ok(())
}
