use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use eyeson_auth::app::{build_token_service, init_tracing};
use eyeson_auth::config::Config;
use eyeson_auth::repos::user_repo::PgUserRepo;
use eyeson_auth::services::auth::TokenError;

/// Mint an access/refresh token pair for an existing user.
///
/// Reads the same environment as the server (JWT_SECRET, DATABASE_URL,
/// *_TOKEN_VALIDITY_IN_SECONDS) and looks the user up by email.
#[derive(Parser, Debug)]
#[command(name = "mint-token", version, about)]
struct Args {
    /// Email of the user to mint tokens for
    #[arg(long)]
    email: String,

    /// Comma-separated authorities written into the `auth` claim
    #[arg(long, default_value = "ROLE_USER")]
    authorities: String,

    /// Print only the access token, for use in scripts. Without it both
    /// tokens, `expires_in` and the Authorization value are printed.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if !args.quiet {
        init_tracing();
    }

    let config = Config::from_env().context("failed to load configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    let tokens = build_token_service(&config, Arc::new(PgUserRepo::new(pool)))?;

    let pair = match tokens.create_token_pair(&args.email, &args.authorities).await {
        Ok(pair) => pair,
        Err(TokenError::UserNotFound) => anyhow::bail!("no user registered for {}", args.email),
        Err(e) => return Err(e).context("failed to mint token pair"),
    };

    if args.quiet {
        println!("{}", pair.access_token);
        return Ok(());
    }

    println!("access_token={}", pair.access_token);
    println!("refresh_token={}", pair.refresh_token);
    println!("expires_in={}", pair.expires_in);
    println!("authorization={}", pair.authorization_header_value());

    Ok(())
}
