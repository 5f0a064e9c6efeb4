//! Replays a wishlist fixture through the listing controller and prints the
//! rendered page as JSON.
//!
//! Usage: `storefront-replay <fixture.json> [query-string]`

use std::env;
use std::error::Error;
use std::path::Path;

use campus_storefront::domain::types::UserId;
use campus_storefront::models::config::StorefrontConfig;
use campus_storefront::models::session::{Session, SessionUser};
use campus_storefront::repository::memory::MemoryMarket;
use campus_storefront::services::listing::ListingView;
use campus_storefront::url_sync::{HistoryPort, MemoryHistory};
use dotenvy::dotenv;

const REPLAY_USER_ID: i32 = 1;

fn replay(config: &StorefrontConfig, fixture: &str, location: &str) -> Result<(), Box<dyn Error>> {
    let user_id = UserId::new(REPLAY_USER_ID)?;
    let json = std::fs::read_to_string(fixture)?;

    let market = MemoryMarket::new();
    let count = market.load_wishlist_json(user_id, &json)?;
    log::info!("Loaded {count} wishlist entries from {fixture}");

    let session = Session::signed_in(SessionUser::new(user_id, "replay"));
    let mut history = MemoryHistory::new(location);
    let mut view = ListingView::wishlist(session, config.wishlist_defaults())?;
    view.mount(&market, &mut history)?;

    let current = history.current_query();
    if current != location.trim_start_matches('?') {
        log::info!("Location rewritten to `?{current}`");
    }

    println!("{}", serde_json::to_string_pretty(&view.page_data())?);
    Ok(())
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());
    let config_dir = env::var("APP_CONFIG_DIR").unwrap_or_else(|_| "config".into());

    let mut args = env::args().skip(1);
    let Some(fixture) = args.next() else {
        log::error!("Usage: storefront-replay <fixture.json> [query-string]");
        std::process::exit(2);
    };
    let location = args.next().unwrap_or_default();

    let config = match StorefrontConfig::load(Path::new(&config_dir), &app_env) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = replay(&config, &fixture, &location) {
        log::error!("Replay failed: {err}");
        std::process::exit(1);
    }
}
