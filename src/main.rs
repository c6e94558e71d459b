use std::{future::IntoFuture, process, sync::Arc, time::Duration};

use folio::{
    application::{
        error::AppError,
        posts::{BlogPostsService, PostsQuery},
        repos::PostsSource,
    },
    api_types::Direction,
    config::{self, PaginateArgs, Settings},
    infra::{
        cache::CachedPostsSource,
        content::FileContentStore,
        error::InfraError,
        http::{self, HttpState},
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

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    match command {
        config::Command::Serve(_) => {
            telemetry::init(&settings.logging).map_err(AppError::from)?;
            run_serve(settings).await
        }
        // Stdout carries the JSON page, so no subscriber is installed here.
        config::Command::Paginate(args) => run_paginate(settings, args).await,
    }
}

fn posts_source(settings: &Settings) -> Arc<dyn PostsSource> {
    let store: Arc<dyn PostsSource> = Arc::new(FileContentStore::new(&settings.content.directory));
    if !settings.cache.enabled {
        return store;
    }
    Arc::new(CachedPostsSource::new(
        store,
        settings.cache.capacity,
        settings.cache.ttl,
    ))
}

async fn run_serve(settings: Settings) -> Result<(), AppError> {
    let posts = Arc::new(BlogPostsService::new(
        posts_source(&settings),
        settings.pagination.limits,
        settings.content.default_locale.clone(),
    ));
    let router = http::build_router(HttpState { posts });

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "folio::serve",
        addr = %settings.server.addr,
        content_dir = %settings.content.directory.display(),
        default_locale = %settings.content.default_locale,
        cache_enabled = settings.cache.enabled,
        "Listening"
    );

    let stopping = Arc::new(Notify::new());
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown({
            let stopping = stopping.clone();
            async move {
                shutdown_signal().await;
                stopping.notify_one();
            }
        })
        .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = grace_period(&stopping, settings.server.graceful_shutdown) => {
            warn!(
                target = "folio::serve",
                grace_seconds = settings.server.graceful_shutdown.as_secs(),
                "Graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!(target = "folio::serve", "Server stopped");
    Ok(())
}

async fn grace_period(stopping: &Notify, grace: Duration) {
    stopping.notified().await;
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "folio::serve", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target = "folio::serve", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!(target = "folio::serve", "Shutdown signal received");
}

async fn run_paginate(settings: Settings, args: PaginateArgs) -> Result<(), AppError> {
    if let Some(direction) = args.direction.as_deref() {
        direction
            .parse::<Direction>()
            .map_err(|err| AppError::validation(err.to_string()))?;
    }

    let source: Arc<dyn PostsSource> = Arc::new(FileContentStore::new(&settings.content.directory));
    let service = BlogPostsService::new(
        source,
        settings.pagination.limits,
        settings.content.default_locale.clone(),
    );

    let query = PostsQuery {
        cursor: args.cursor,
        limit: args.limit,
        direction: args.direction,
        locale: args.locale,
    };
    let page = service.page(&query).await?;

    let rendered = serde_json::to_string_pretty(&page)
        .map_err(|err| AppError::unexpected(format!("failed to render page: {err}")))?;
    println!("{rendered}");
    Ok(())
}
