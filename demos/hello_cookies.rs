use std::sync::Arc;

use gosub_doc_cookies::cookies::{CookieManager, HostCookieStore, InMemoryHostStore, SetOptions};
use gosub_doc_cookies::ManagerConfig;
use time::{Duration, OffsetDateTime};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Pretend the page already carries a couple of cookies.
    let store = Arc::new(InMemoryHostStore::from_cookie_string("theme=dark; lang=en"));

    let config = ManagerConfig::builder().default_path("/").build()?;
    let mut cookies = CookieManager::with_config(store.clone(), config);

    println!("initial keys: {:?}", cookies.keys());
    println!("theme = {:?}", cookies.get("theme"));

    let replaced = cookies.set("lang", "nl", SetOptions::new());
    println!("lang overwritten: {replaced}");

    let week = OffsetDateTime::now_utc() + Duration::days(7);
    cookies.set("session", "abc123", SetOptions::new().expires(week).secure(true));

    cookies.remove("theme");
    println!("keys after remove: {:?}", cookies.keys());
    println!("document.cookie: {}", store.read());

    for write in store.writes() {
        println!("  wrote: {write}");
    }

    cookies.clear();
    println!("document.cookie after clear: {:?}", store.read());

    Ok(())
}
