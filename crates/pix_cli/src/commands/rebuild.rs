use anyhow::{Context, Result};
use clap::Args;
use sqlx::PgPool;

use pix_db::schema::rebuild_database;

#[derive(Debug, Args)]
pub struct RebuildArgs {
    /// Required: the rebuild drops existing tables
    #[arg(long)]
    pub yes: bool,
}

pub async fn execute(pool: PgPool, args: RebuildArgs) -> Result<()> {
    if !args.yes {
        anyhow::bail!("rebuild drops pix_codes and estabelecimentos; pass --yes to continue");
    }

    println!("🏗️  Rebuilding Database Schema...");
    rebuild_database(&pool).await.context("schema rebuild failed")?;
    println!("✅ Database Schema Applied Successfully.");
    Ok(())
}
