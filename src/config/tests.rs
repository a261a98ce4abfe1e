use super::*;

fn raw_with_admin() -> RawSettings {
    let mut raw = RawSettings::default();
    raw.admin.email = Some("admin@example.com".to_string());
    raw
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = raw_with_admin();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn missing_admin_email_is_fatal() {
    let err = Settings::from_raw(RawSettings::default()).expect_err("admin email required");
    assert!(matches!(err, LoadError::Missing { key: "admin.email" }));
}

#[test]
fn blank_admin_email_counts_as_missing() {
    let mut raw = RawSettings::default();
    raw.admin.email = Some("   ".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Missing { .. })
    ));
}

#[test]
fn admin_email_must_look_like_an_address() {
    let mut raw = RawSettings::default();
    raw.admin.email = Some("nobody".to_string());
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "admin.email",
            ..
        })
    ));
}

#[test]
fn defaults_fill_optional_sections() {
    let settings = Settings::from_raw(raw_with_admin()).expect("valid settings");

    assert_eq!(settings.admin.email, "admin@example.com");
    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.session.cookie_name, "__session");
    assert_eq!(
        settings.session.ttl,
        Duration::from_secs(DEFAULT_SESSION_TTL_HOURS * 3600)
    );
    assert_eq!(
        settings.database.max_connections.get(),
        DEFAULT_DB_MAX_CONNECTIONS
    );
    assert!(settings.database.url.is_none());
}

#[test]
fn zero_pool_size_is_rejected() {
    let mut raw = raw_with_admin();
    raw.database.max_connections = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "database.max_connections",
            ..
        })
    ));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = raw_with_admin();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["quire"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "quire",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database_url.as_deref(),
                Some("postgres://override")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_sessions_issue_arguments() {
    let args = CliArgs::parse_from([
        "quire",
        "--admin-email",
        "admin@example.com",
        "sessions",
        "issue",
        "--email",
        "admin@example.com",
        "--ttl-hours",
        "2",
    ]);

    assert_eq!(args.admin_email.as_deref(), Some("admin@example.com"));
    match args.command.expect("sessions command") {
        Command::Sessions(sessions) => match sessions.command {
            SessionsCommand::Issue(issue) => {
                assert_eq!(issue.email, "admin@example.com");
                assert_eq!(issue.ttl_hours, Some(2));
            }
        },
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from(["quire", "migrate", "--database-url", "postgres://example"]);

    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(
                migrate.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

fn env_vars(pairs: &[(&str, &str)]) -> Map<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn bare_admin_email_env_is_read() {
    let args = CliArgs::parse_from(["quire", "migrate"]);
    let env = env_vars(&[("ADMIN_EMAIL", "legacy@example.com")]);

    let settings = load_with_env(&args, Some(env)).expect("valid settings");
    assert_eq!(settings.admin.email, "legacy@example.com");
}

#[test]
fn prefixed_admin_email_env_beats_bare_variable() {
    let args = CliArgs::parse_from(["quire", "migrate"]);
    let env = env_vars(&[
        ("ADMIN_EMAIL", "legacy@example.com"),
        ("QUIRE__ADMIN__EMAIL", "primary@example.com"),
    ]);

    let settings = load_with_env(&args, Some(env)).expect("valid settings");
    assert_eq!(settings.admin.email, "primary@example.com");
}

#[test]
fn admin_email_flag_beats_environment() {
    let args = CliArgs::parse_from(["quire", "--admin-email", "flag@example.com", "migrate"]);
    let env = env_vars(&[
        ("ADMIN_EMAIL", "legacy@example.com"),
        ("QUIRE__ADMIN__EMAIL", "primary@example.com"),
    ]);

    let settings = load_with_env(&args, Some(env)).expect("valid settings");
    assert_eq!(settings.admin.email, "flag@example.com");
}
