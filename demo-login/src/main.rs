use axum::Router;

use session_auth_axum::{
    AUTH_ROUTE_PREFIX, Account, AccountStore, AuthService, session_auth_router,
};

mod protected;
mod server;

use crate::server::{init_tracing, spawn_http_server};

const DEFAULT_PORT: u16 = 3001;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("demo_login");

    let auth = std::sync::Arc::new(AuthService::from_env().await?);
    seed_demo_account(auth.accounts().as_ref()).await?;

    let prefix = AUTH_ROUTE_PREFIX.as_str();
    let auth_routes = session_auth_router(auth.clone());
    // axum cannot nest at the root
    let auth_routes = if prefix == "/" {
        Router::new().merge(auth_routes)
    } else {
        Router::new().nest(prefix, auth_routes)
    };
    let app = auth_routes.merge(protected::router(auth));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    spawn_http_server(port, app).await??;
    Ok(())
}

/// Create the account named by `DEMO_USERNAME`/`DEMO_PASSWORD` when missing.
async fn seed_demo_account(accounts: &dyn AccountStore) -> Result<(), Box<dyn std::error::Error>> {
    let (Ok(username), Ok(password)) = (
        std::env::var("DEMO_USERNAME"),
        std::env::var("DEMO_PASSWORD"),
    ) else {
        tracing::info!("DEMO_USERNAME/DEMO_PASSWORD not set, skipping demo account");
        return Ok(());
    };

    if accounts.username_exists(&username).await? {
        tracing::info!(username = %username, "Demo account already exists");
        return Ok(());
    }

    let email = std::env::var("DEMO_EMAIL").unwrap_or_else(|_| format!("{username}@example.com"));
    let mut account = Account::new(username, email);
    account.is_active = true;
    account.is_superuser = std::env::var("DEMO_SUPERUSER").is_ok_and(|v| v == "true");
    account.set_password(&password)?;
    accounts.create(&account).await?;
    tracing::info!(username = %account.username, "Created demo account");
    Ok(())
}
