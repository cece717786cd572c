use anyhow::anyhow;
use content_service::build_router;
use content_service::config::Config;
use content_service::export::export_site;
use content_service::logger::{Logger, log_error};
use content_service::posts::ContentStore;
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let hostname = hostname::get()
        .ok()
        .and_then(|value| value.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());
    let logger = Logger::new(hostname);
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--config-check") {
        logger.info(
            "config.check_passed",
            json!({
                "port": config.port,
                "contentDir": config.content_dir.display().to_string(),
                "siteUrl": config.site_url,
                "allowedOrigins": config.allowed_origins,
                "allowAllOrigins": config.allow_all_origins,
            }),
        );
        return Ok(());
    }

    if let Some(out_dir) = export_target(&args)? {
        let store = ContentStore::new(config.content_dir.clone()).with_logger(logger.clone());
        return match export_site(&store, &config.site_url, &out_dir).await {
            Ok(summary) => {
                logger.info(
                    "export.completed",
                    json!({
                        "outDir": out_dir.display().to_string(),
                        "posts": summary.posts,
                        "files": summary.files,
                    }),
                );
                Ok(())
            }
            Err(error) => {
                log_error(&logger, "export.failed", format!("{error:#}"));
                Err(error)
            }
        };
    }

    if tokio::fs::metadata(&config.content_dir).await.is_err() {
        logger.warn(
            "posts.dir_missing",
            json!({ "contentDir": config.content_dir.display().to_string() }),
        );
    }

    let port = config.port;
    let app = build_router(Arc::new(config), logger.clone())?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    logger.info("server.started", json!({ "port": port }));

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    logger.info("server.stopped", json!({}));
    Ok(())
}

/// `--export <dir>` or `--export=<dir>`.
fn export_target(args: &[String]) -> anyhow::Result<Option<PathBuf>> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--export=") {
            return Ok(Some(PathBuf::from(value)));
        }
        if arg == "--export" {
            return iter
                .next()
                .filter(|value| !value.starts_with("--"))
                .map(|value| Some(PathBuf::from(value)))
                .ok_or_else(|| anyhow!("--export requires an output directory"));
        }
    }
    Ok(None)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
