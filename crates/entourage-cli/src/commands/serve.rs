use crate::commands::Context;
use crate::http::{router, AppState};
use crate::intake::{IntakeService, SqliteSink};
use anyhow::{Context as _, Result};
use clap::Args;
use entourage_config::NotificationsConfig;
use entourage_notify::{NotificationTemplate, Notifier, ResendNotifier};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on; overrides `[server].bind`
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

pub fn serve(ctx: &Context<'_>, args: ServeArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let notifications = &ctx.config.notifications;
    let bind = args.bind.unwrap_or(ctx.config.server.bind);
    let template = NotificationTemplate {
        from: notifications.from.clone(),
        to: notifications.to.clone(),
        subject: notifications.subject.clone(),
    };

    let runtime = Runtime::new().with_context(|| "start async runtime")?;
    runtime.block_on(async move {
        let notifier = build_notifier(notifications)?;
        let intake = IntakeService::new(Arc::new(SqliteSink::new(store)), notifier, template);
        let app = router(AppState {
            intake: Arc::new(intake),
        });

        let listener = tokio::net::TcpListener::bind(bind)
            .await
            .with_context(|| format!("bind {bind}"))?;
        let local = listener.local_addr().with_context(|| "read listen address")?;
        info!(addr = %local, "waitlist server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .with_context(|| "serve http")?;
        info!("waitlist server stopped");
        Ok::<(), anyhow::Error>(())
    })
}

fn build_notifier(config: &NotificationsConfig) -> Result<Option<Arc<dyn Notifier>>> {
    if !config.enabled {
        info!("email notifications disabled in config");
        return Ok(None);
    }
    let Some(api_key) = config.api_key() else {
        info!(
            env = %config.api_key_env,
            "{} not configured, email notifications disabled",
            config.api_key_env
        );
        return Ok(None);
    };
    let notifier = ResendNotifier::new(
        &config.api_base_url,
        api_key,
        Duration::from_secs(config.timeout_seconds),
    )
    .with_context(|| "build email client")?;
    info!(endpoint = notifier.endpoint(), to = %config.to, "email notifications enabled");
    Ok(Some(Arc::new(notifier)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::build_notifier;
    use entourage_config::{AppConfig, NotificationsConfig};

    fn notifications(api_key_env: &str) -> NotificationsConfig {
        NotificationsConfig {
            api_key_env: api_key_env.to_string(),
            ..AppConfig::default().notifications
        }
    }

    #[test]
    fn missing_api_key_disables_notifications() {
        let env = "ENTOURAGE_TEST_SERVE_MISSING_KEY";
        std::env::remove_var(env);
        let notifier = build_notifier(&notifications(env)).expect("build");
        assert!(notifier.is_none());
    }

    #[test]
    fn blank_api_key_disables_notifications() {
        let env = "ENTOURAGE_TEST_SERVE_BLANK_KEY";
        std::env::set_var(env, "   ");
        let notifier = build_notifier(&notifications(env)).expect("build");
        assert!(notifier.is_none());
    }

    #[test]
    fn disabled_config_ignores_api_key() {
        let env = "ENTOURAGE_TEST_SERVE_DISABLED_KEY";
        std::env::set_var(env, "re_test");
        let config = NotificationsConfig {
            enabled: false,
            ..notifications(env)
        };
        let notifier = build_notifier(&config).expect("build");
        assert!(notifier.is_none());
    }

    #[test]
    fn configured_api_key_builds_resend_notifier() {
        let env = "ENTOURAGE_TEST_SERVE_PRESENT_KEY";
        std::env::set_var(env, "re_test");
        let notifier = build_notifier(&notifications(env))
            .expect("build")
            .expect("notifier");
        assert_eq!(notifier.backend_name(), "resend");
    }
}
