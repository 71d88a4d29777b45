use clap::Parser;
use fintra_cli::cli::{Cli, Command, PageKind};
use fintra_cli::commands::{execute, watch};
use fintra_cli::config::{ConfigError, FintraConfig, LogConfig};
use fintra_cli::error::CliError;
use fintra_client::{AuthConfig, ClientConfig};
use fintra_core::RemoteError;
use fintra_storage::WorkspaceCache;
use fintra_sync::{SyncConfig, SyncService, WorkspaceContext};
use fintra_test_utils::{fixtures, MockRemote};
use proptest::prelude::*;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn base_config() -> FintraConfig {
    FintraConfig {
        client: ClientConfig {
            api_base_url: "https://project.supabase.co".to_string(),
            auth: AuthConfig {
                anon_key: "anon".to_string(),
                access_token: None,
            },
            user_id: Uuid::nil(),
            request_timeout_ms: 10_000,
        },
        sync: SyncConfig::default(),
        persistence_path: "tmp/fintra-state.json".into(),
        log: LogConfig {
            filter: "fintra=info".to_string(),
            json: false,
        },
    }
}

const SAMPLE_TOML: &str = r#"
persistence_path = "state/fintra.json"

[client]
api_base_url = "https://project.supabase.co"
user_id = "00000000-0000-0000-0000-000000000000"
request_timeout_ms = 8000

[client.auth]
anon_key = "anon"
access_token = "jwt"

[log]
filter = "fintra_sync=debug,info"
json = true
"#;

async fn service_for(remote: &Arc<MockRemote>) -> SyncService {
    let service = SyncService::new(
        remote.clone(),
        WorkspaceCache::in_memory(),
        WorkspaceContext::new(),
        SyncConfig::default(),
    );
    service.fetch_workspaces().await.unwrap();
    service
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

#[test]
fn config_base_is_valid() {
    assert!(base_config().validate().is_ok());
}

#[test]
fn config_requires_log_filter() {
    let mut config = base_config();
    config.log.filter = "  ".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "log.filter", .. })
    ));
}

#[test]
fn config_rejects_zero_fetch_timeout() {
    let mut config = base_config();
    config.sync.fetch_timeout_ms = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn config_checks_client_section() {
    let mut config = base_config();
    config.client.api_base_url = "ftp://project".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn config_parses_toml_with_default_sync() {
    let config = FintraConfig::from_toml(SAMPLE_TOML).unwrap();
    assert_eq!(config.sync.fetch_timeout_ms, 15_000);
    assert_eq!(config.client.auth.access_token.as_deref(), Some("jwt"));
    assert!(config.log.json);
    assert!(config.validate().is_ok());
}

#[test]
fn config_rejects_unknown_keys() {
    let toml = format!("{SAMPLE_TOML}\ntheme = \"dark\"\n");
    assert!(matches!(
        FintraConfig::from_toml(&toml),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn config_loads_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE_TOML.as_bytes()).unwrap();
    let config = FintraConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.client.request_timeout_ms, 8000);
}

#[test]
fn config_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FintraConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn cli_parses_subcommands() {
    let cli = Cli::try_parse_from(["fintra", "--config", "f.toml", "show", "budgeting"]).unwrap();
    assert!(matches!(cli.command, Command::Show { page: PageKind::Budgeting }));

    let id = Uuid::now_v7();
    let id_arg = id.to_string();
    let cli = Cli::try_parse_from(["fintra", "delete-account", id_arg.as_str()]).unwrap();
    assert!(matches!(cli.command, Command::DeleteAccount { account_id } if account_id == id));

    let cli = Cli::try_parse_from(["fintra", "watch"]).unwrap();
    assert!(matches!(cli.command, Command::Watch { interval_secs: 60 }));

    assert!(Cli::try_parse_from(["fintra", "switch", "not-a-uuid"]).is_err());
}

#[tokio::test]
async fn workspaces_marks_current() {
    let home = fixtures::personal_workspace();
    let office = fixtures::organization_workspace();
    let remote = Arc::new(MockRemote::new());
    remote.update(|d| d.workspaces = vec![home.clone(), office.clone()]);
    let service = service_for(&remote).await;

    let mut buf = Vec::new();
    execute(&service, Command::Workspaces, &mut buf).await.unwrap();
    let text = output(buf);
    assert!(text.contains(&format!("* {}  Personal (personal, admin)", home.id)));
    assert!(text.contains(&format!("  {}  Household (organization, admin)", office.id)));
}

#[tokio::test]
async fn switch_to_unknown_workspace_fails() {
    let ws = fixtures::personal_workspace();
    let remote = Arc::new(fixtures::remote_with_accounts(&ws, Vec::new()));
    let service = service_for(&remote).await;

    let mut buf = Vec::new();
    let err = execute(&service, Command::Switch { workspace_id: Uuid::now_v7() }, &mut buf)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Fintra(_)));
}

#[tokio::test]
async fn show_accounts_prints_balances() {
    let ws = fixtures::personal_workspace();
    let remote = Arc::new(fixtures::remote_with_accounts(
        &ws,
        vec![fixtures::account(ws.id, "Everyday", 1234.5)],
    ));
    let service = service_for(&remote).await;

    let mut buf = Vec::new();
    execute(&service, Command::Show { page: PageKind::Accounts }, &mut buf)
        .await
        .unwrap();
    let text = output(buf);
    assert!(text.contains("Everyday"));
    assert!(text.contains("1234.50"));
    assert!(text.contains("Net worth 1234.50"));
}

#[tokio::test]
async fn show_reports_blocking_fetch_error() {
    let ws = fixtures::personal_workspace();
    let remote = Arc::new(fixtures::remote_with_accounts(&ws, Vec::new()));
    remote.fail_with("get_accounts", RemoteError::transport("get_accounts", "offline"));
    let service = service_for(&remote).await;

    let mut buf = Vec::new();
    let err = execute(&service, Command::Show { page: PageKind::Accounts }, &mut buf)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Accounts: Accounts: offline");
}

#[tokio::test]
async fn show_members_on_personal_workspace() {
    let ws = fixtures::personal_workspace();
    let remote = Arc::new(fixtures::remote_with_accounts(&ws, Vec::new()));
    let service = service_for(&remote).await;

    let mut buf = Vec::new();
    execute(&service, Command::Show { page: PageKind::Members }, &mut buf)
        .await
        .unwrap();
    assert!(output(buf).contains("No members"));
    assert_eq!(remote.calls("get_workspace_members"), 0);
}

#[tokio::test]
async fn failed_delete_surfaces_server_message() {
    let ws = fixtures::personal_workspace();
    let account = fixtures::account(ws.id, "Savings", 50.0);
    let remote = Arc::new(fixtures::remote_with_accounts(&ws, vec![account.clone()]));
    remote.fail_with("delete_account", RemoteError::transport("delete_account", "network error"));
    let service = service_for(&remote).await;

    let mut buf = Vec::new();
    let err = execute(&service, Command::DeleteAccount { account_id: account.id }, &mut buf)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "network error");
    assert_eq!(remote.data().accounts[&ws.id].len(), 1);
}

#[tokio::test]
async fn delete_expense_reports_success() {
    let ws = fixtures::personal_workspace();
    let expense = fixtures::expense(ws.id, None, "Coffee", 4.0);
    let remote = Arc::new(fixtures::remote_with_accounts(&ws, Vec::new()));
    remote.update(|d| {
        d.expenses.insert(ws.id, vec![expense.clone()]);
    });
    let service = service_for(&remote).await;

    let mut buf = Vec::new();
    execute(&service, Command::DeleteExpense { expense_id: expense.id }, &mut buf)
        .await
        .unwrap();
    assert!(output(buf).contains(&format!("Deleted expense {}", expense.id)));
    assert!(remote.data().expenses[&ws.id].is_empty());
}

#[tokio::test]
async fn watch_prints_revisions_until_stopped() {
    let ws = fixtures::personal_workspace();
    let remote = Arc::new(fixtures::remote_with_accounts(
        &ws,
        vec![fixtures::account(ws.id, "Wallet", 20.0)],
    ));
    let service = service_for(&remote).await;

    let mut buf = Vec::new();
    let stop = async {
        tokio::time::sleep(Duration::from_millis(120)).await;
        Ok(())
    };
    watch(&service, Duration::from_millis(10), &mut buf, stop)
        .await
        .unwrap();

    let text = output(buf);
    assert!(text.contains("[rev 1] net worth 20.00 across 1 accounts"));
    assert!(remote.calls("get_goals") >= 2);
}

#[tokio::test]
async fn watch_fails_when_stop_signal_is_unavailable() {
    let ws = fixtures::personal_workspace();
    let remote = Arc::new(fixtures::remote_with_accounts(&ws, Vec::new()));
    let service = service_for(&remote).await;

    let mut buf = Vec::new();
    let stop = async {
        Err::<(), _>(CliError::Signal(std::io::Error::other(
            "signal driver unavailable",
        )))
    };
    let err = watch(&service, Duration::from_secs(60), &mut buf, stop)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Signal(_)));
    assert_eq!(
        err.to_string(),
        "Failed to listen for ctrl-c: signal driver unavailable"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: any positive timeouts validate; zero never does.
    #[test]
    fn prop_timeouts_must_be_positive(request in 0u64..100_000, fetch in 0u64..100_000) {
        let mut config = base_config();
        config.client.request_timeout_ms = request;
        config.sync.fetch_timeout_ms = fetch;
        prop_assert_eq!(config.validate().is_ok(), request > 0 && fetch > 0);
    }
}
