use std::{process, sync::Arc};

use quire::{
    application::{
        admin::AdminPostService,
        env::SiteEnv,
        error::AppError,
        posts::PostService,
        render::{ComrakRenderer, MarkdownRenderer},
        repos::{HealthRepo, PostsRepo, PostsWriteRepo, SessionsRepo},
        session::SessionService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AppState},
        telemetry,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
        config::Command::Sessions(args) => match args.command {
            config::SessionsCommand::Issue(issue) => run_issue_session(settings, issue).await,
        },
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings, true).await?;
    let state = build_app_state(repositories, &settings)?;
    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings, true).await?;
    info!(target = "quire::migrate", "database migrations applied");
    Ok(())
}

async fn run_issue_session(
    settings: config::Settings,
    args: config::IssueSessionArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings, false).await?;
    let sessions = build_session_service(repositories, &settings)?;

    let issued = sessions
        .issue(&args.email)
        .await
        .map_err(|err| AppError::validation(err.to_string()))?;

    info!(
        target = "quire::sessions",
        email = %issued.user.email,
        is_admin = sessions.is_admin(&issued.user),
        expires_at = %issued.expires_at,
        "session issued"
    );
    println!("{}={}", settings.session.cookie_name, issued.token);
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
    migrate: bool,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    if migrate {
        PostgresRepositories::run_migrations(&pool)
            .await
            .map_err(|err| AppError::from(InfraError::migration(err.to_string())))?;
    }

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_session_service(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<SessionService, AppError> {
    let sessions_repo: Arc<dyn SessionsRepo> = repositories;
    let ttl = time::Duration::try_from(settings.session.ttl)
        .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))?;

    Ok(SessionService::new(
        sessions_repo,
        Arc::new(SiteEnv::from_settings(settings)),
        ttl,
    ))
}

fn build_app_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<AppState, AppError> {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let health_repo: Arc<dyn HealthRepo> = repositories.clone();
    let renderer: Arc<dyn MarkdownRenderer> = Arc::new(ComrakRenderer::new());

    let sessions = build_session_service(repositories, settings)?;

    Ok(AppState {
        env: Arc::new(SiteEnv::from_settings(settings)),
        posts: Arc::new(PostService::new(posts_repo.clone(), renderer)),
        admin_posts: Arc::new(AdminPostService::new(posts_repo, posts_write_repo)),
        sessions: Arc::new(sessions),
        health: health_repo,
        session_cookie: Arc::from(settings.session.cookie_name.as_str()),
    })
}

async fn serve_http(settings: &config::Settings, state: AppState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "quire::http",
        addr = %settings.server.addr,
        "listening"
    );

    let shutdown = Arc::new(Notify::new());
    let signal = shutdown.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.notified().await });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        joined = &mut server => return server_result(joined),
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                warn!(target = "quire::http", error = %err, "failed to listen for shutdown signal");
            }
        }
    }

    info!(target = "quire::http", "shutdown requested, draining connections");
    shutdown.notify_one();

    match tokio::time::timeout(settings.server.graceful_shutdown, server).await {
        Ok(joined) => server_result(joined),
        Err(_) => {
            warn!(
                target = "quire::http",
                timeout_secs = settings.server.graceful_shutdown.as_secs(),
                "graceful shutdown timed out"
            );
            Ok(())
        }
    }
}

fn server_result(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    joined
        .map_err(|err| AppError::unexpected(format!("server task failed: {err}")))?
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}
