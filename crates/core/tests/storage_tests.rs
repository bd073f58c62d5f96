// ═══════════════════════════════════════════════════════════════════
// Storage & facade tests — JsonStore round-trips over real temp dirs,
// and TradeHub command flows end to end.
// ═══════════════════════════════════════════════════════════════════

use tempfile::TempDir;

use valutatrade_core::errors::CoreError;
use valutatrade_core::models::portfolio::Portfolio;
use valutatrade_core::models::user::User;
use valutatrade_core::services::rate_service::Provenance;
use valutatrade_core::storage::store::JsonStore;
use valutatrade_core::TradeHub;

fn write_rates(dir: &TempDir, json: &str) {
    std::fs::write(dir.path().join("rates.json"), json).unwrap();
}

const RATES_JSON: &str = r#"{
    "source": "test-feed",
    "last_refresh": "2025-01-15T00:00:00Z",
    "EUR_USD": {"rate": 1.08, "updated_at": "2025-01-15T00:00:00Z"},
    "BTC_USD": {"rate": 50000.0},
    "USD_RUB": {"rate": 90.0}
}"#;

// ═══════════════════════════════════════════════════════════════════
//  JsonStore
// ═══════════════════════════════════════════════════════════════════

mod store {
    use super::*;

    #[test]
    fn missing_users_file_means_no_users() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        assert!(store.load_users().unwrap().is_empty());
    }

    #[test]
    fn users_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        let users = vec![User::new(1, "alice", "1234").unwrap()];
        store.save_users(&users).unwrap();

        let loaded = store.load_users().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].username, "alice");
        assert!(loaded[0].verify_password("1234"));
    }

    #[test]
    fn missing_portfolios_file_means_no_portfolios() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        assert!(store.load_portfolios().unwrap().is_empty());
        assert!(store.find_portfolio(1).unwrap().is_none());
    }

    #[test]
    fn portfolios_roundtrip_exact_balances() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        let mut p = Portfolio::new(1);
        p.get_or_create_wallet("BTC").deposit(0.05).unwrap();
        p.get_or_create_wallet("USD").deposit(123.456).unwrap();
        store.save_portfolios(std::slice::from_ref(&p)).unwrap();

        let loaded = store.find_portfolio(1).unwrap().unwrap();
        assert_eq!(loaded, p);
        assert_eq!(loaded.wallet("BTC").unwrap().balance, 0.05);
        assert_eq!(loaded.wallet("USD").unwrap().balance, 123.456);
    }

    #[test]
    fn upsert_appends_then_replaces() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        store.upsert_portfolio(&Portfolio::new(1)).unwrap();
        store.upsert_portfolio(&Portfolio::new(2)).unwrap();
        assert_eq!(store.load_portfolios().unwrap().len(), 2);

        let mut updated = Portfolio::new(1);
        updated.get_or_create_wallet("ETH").deposit(2.0).unwrap();
        store.upsert_portfolio(&updated).unwrap();

        let portfolios = store.load_portfolios().unwrap();
        assert_eq!(portfolios.len(), 2);
        let p1 = store.find_portfolio(1).unwrap().unwrap();
        assert_eq!(p1.wallet("ETH").unwrap().balance, 2.0);
    }

    #[test]
    fn missing_rates_file_is_rates_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        assert!(matches!(
            store.load_rates(),
            Err(CoreError::RatesUnavailable(_))
        ));
    }

    #[test]
    fn corrupt_rates_file_is_rates_unavailable() {
        let dir = TempDir::new().unwrap();
        write_rates(&dir, "{not json");
        let store = JsonStore::new(dir.path());
        assert!(matches!(
            store.load_rates(),
            Err(CoreError::RatesUnavailable(_))
        ));
    }

    #[test]
    fn rates_snapshot_parses_with_metadata() {
        let dir = TempDir::new().unwrap();
        write_rates(&dir, RATES_JSON);
        let store = JsonStore::new(dir.path());

        let rates = store.load_rates().unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates.source.as_deref(), Some("test-feed"));
        assert_eq!(rates.get_pair("BTC", "USD").unwrap().rate, 50_000.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  TradeHub facade
// ═══════════════════════════════════════════════════════════════════

mod hub {
    use super::*;

    fn hub_in(dir: &TempDir) -> TradeHub {
        TradeHub::new(dir.path())
    }

    #[test]
    fn register_then_login() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);

        let user = hub.register("alice", "1234").unwrap();
        assert_eq!(user.user_id, 1);
        assert!(hub.current_user().is_none(), "register must not log in");

        hub.login("alice", "1234").unwrap();
        assert_eq!(hub.current_user().unwrap().username, "alice");

        let logged_out = hub.logout().unwrap();
        assert_eq!(logged_out.username, "alice");
        assert!(hub.current_user().is_none());
    }

    #[test]
    fn register_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        assert_eq!(hub.register("alice", "1234").unwrap().user_id, 1);
        assert_eq!(hub.register("bob", "1234").unwrap().user_id, 2);
    }

    #[test]
    fn register_rejects_duplicate_username() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        hub.register("alice", "1234").unwrap();
        let err = hub.register("alice", "5678").unwrap_err();
        assert!(matches!(err, CoreError::UsernameTaken(name) if name == "alice"));
    }

    #[test]
    fn register_rejects_short_password() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        let err = hub.register("alice", "123").unwrap_err();
        assert!(matches!(err, CoreError::WeakPassword { min: 4 }));
    }

    #[test]
    fn login_failures() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        hub.register("alice", "1234").unwrap();

        assert!(matches!(
            hub.login("nobody", "1234"),
            Err(CoreError::UserNotFound(_))
        ));
        assert!(matches!(
            hub.login("alice", "wrong"),
            Err(CoreError::InvalidCredentials)
        ));
        assert!(hub.current_user().is_none());
    }

    #[test]
    fn commands_require_login() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        assert!(matches!(hub.show_portfolio("USD"), Err(CoreError::NotLoggedIn)));
        assert!(matches!(hub.buy("BTC", 1.0), Err(CoreError::NotLoggedIn)));
        assert!(matches!(hub.sell("BTC", 1.0), Err(CoreError::NotLoggedIn)));
    }

    #[test]
    fn buy_and_sell_roundtrip_through_disk() {
        let dir = TempDir::new().unwrap();
        write_rates(&dir, RATES_JSON);
        let mut hub = hub_in(&dir);
        hub.register("alice", "1234").unwrap();
        hub.login("alice", "1234").unwrap();

        let receipt = hub.buy("BTC", 0.05).unwrap();
        assert_eq!(receipt.unit_rate_usd, Some(50_000.0));
        assert!((receipt.estimated_usd.unwrap() - 2_500.0).abs() < 1e-9);

        let receipt = hub.sell("BTC", 0.02).unwrap();
        assert!((receipt.new_balance - 0.03).abs() < 1e-9);

        // A fresh hub over the same directory sees the persisted state
        let mut hub2 = hub_in(&dir);
        hub2.login("alice", "1234").unwrap();
        let report = hub2.show_portfolio("USD").unwrap();
        assert_eq!(report.valuation.lines.len(), 1);
        assert!((report.valuation.lines[0].balance - 0.03).abs() < 1e-9);
        assert!(!report.used_fallback_rates);
    }

    #[test]
    fn buy_rejects_unknown_currency() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        hub.register("alice", "1234").unwrap();
        hub.login("alice", "1234").unwrap();
        assert!(matches!(
            hub.buy("XYZ", 1.0),
            Err(CoreError::CurrencyNotFound { .. })
        ));
    }

    #[test]
    fn sell_without_wallet_fails() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        hub.register("alice", "1234").unwrap();
        hub.login("alice", "1234").unwrap();
        assert!(matches!(
            hub.sell("ETH", 1.0),
            Err(CoreError::WalletNotFound { .. })
        ));
    }

    #[test]
    fn show_portfolio_falls_back_when_rates_missing() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        hub.register("alice", "1234").unwrap();
        hub.login("alice", "1234").unwrap();
        hub.buy("BTC", 0.01).unwrap();

        let report = hub.show_portfolio("USD").unwrap();
        assert!(report.used_fallback_rates);
        // Fallback BTC_USD is 50000
        assert!((report.valuation.total - 500.0).abs() < 1e-9);
    }

    #[test]
    fn empty_portfolio_reported_as_empty() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        hub.register("alice", "1234").unwrap();
        hub.login("alice", "1234").unwrap();
        let report = hub.show_portfolio("USD").unwrap();
        assert!(report.valuation.is_empty());
    }

    #[test]
    fn show_portfolio_rejects_unknown_base() {
        let dir = TempDir::new().unwrap();
        let mut hub = hub_in(&dir);
        hub.register("alice", "1234").unwrap();
        hub.login("alice", "1234").unwrap();
        assert!(matches!(
            hub.show_portfolio("XYZ"),
            Err(CoreError::CurrencyNotFound { .. })
        ));
    }

    #[test]
    fn get_rate_needs_the_snapshot() {
        let dir = TempDir::new().unwrap();
        let hub = hub_in(&dir);
        // No login required for rate queries, but the snapshot must exist
        assert!(matches!(
            hub.get_rate("EUR", "USD"),
            Err(CoreError::RatesUnavailable(_))
        ));
    }

    #[test]
    fn get_rate_resolves_through_snapshot() {
        let dir = TempDir::new().unwrap();
        write_rates(&dir, RATES_JSON);
        let hub = hub_in(&dir);

        let quote = hub.get_rate("EUR", "USD").unwrap();
        assert_eq!(quote.rate, 1.08);
        assert_eq!(quote.provenance, Provenance::Direct);

        let bridged = hub.get_rate("EUR", "RUB").unwrap();
        assert_eq!(bridged.provenance, Provenance::Bridged);
        assert!((bridged.rate - 97.2).abs() < 1e-9);
    }

    #[test]
    fn get_rate_validates_codes_against_registry() {
        let dir = TempDir::new().unwrap();
        write_rates(&dir, RATES_JSON);
        let hub = hub_in(&dir);
        assert!(matches!(
            hub.get_rate("EUR", "XYZ"),
            Err(CoreError::CurrencyNotFound { code }) if code == "XYZ"
        ));
    }

    #[test]
    fn currency_listing() {
        let dir = TempDir::new().unwrap();
        let hub = hub_in(&dir);
        assert_eq!(hub.list_currencies().len(), 9);
        let counts = hub.currency_counts();
        assert_eq!((counts.fiat, counts.crypto), (5, 4));
    }
}
