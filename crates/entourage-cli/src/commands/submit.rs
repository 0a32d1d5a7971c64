use crate::commands::{print_json, Context};
use crate::error::{invalid_input, signup_failed};
use anyhow::{Context as _, Result};
use clap::Args;
use entourage_core::{SignupPayload, SignupResponse};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

const FALLBACK_SUCCESS: &str = "Successfully joined!";
const FALLBACK_ERROR: &str = "Something went wrong";
const TRANSPORT_ERROR: &str = "Failed to submit. Please try again.";

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    /// Signup endpoint; defaults to the configured server bind address
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitReport {
    pub status: &'static str,
    pub message: String,
}

impl SubmitReport {
    fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

pub fn submit(ctx: &Context<'_>, args: SubmitArgs) -> Result<()> {
    let url = match args.url.as_deref() {
        Some(raw) => Url::parse(raw).map_err(|err| invalid_input(format!("invalid url: {err}")))?,
        None => Url::parse(&format!("http://{}/api/waitlist", ctx.config.server.bind))
            .map_err(|err| invalid_input(format!("invalid server bind: {err}")))?,
    };
    let payload = SignupPayload {
        email: Some(Value::String(args.email)),
        name: args.name.map(Value::String),
        company: args.company.map(Value::String),
    };

    let runtime = Runtime::new().with_context(|| "start async runtime")?;
    let report = runtime.block_on(post_signup(url, &payload));

    if ctx.json {
        print_json(&report)?;
    } else if report.is_success() {
        println!("{}", report.message);
    }
    if report.is_success() {
        Ok(())
    } else {
        Err(signup_failed(report.message))
    }
}

async fn post_signup(url: Url, payload: &SignupPayload) -> SubmitReport {
    let client = match reqwest::Client::builder()
        .user_agent("entourage")
        .timeout(Duration::from_secs(30))
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            debug!(error = %err, "failed to build http client");
            return SubmitReport::error(TRANSPORT_ERROR);
        }
    };

    let response = match client.post(url).json(payload).send().await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, "signup request failed");
            return SubmitReport::error(TRANSPORT_ERROR);
        }
    };
    let ok = response.status().is_success();
    debug!(status = response.status().as_u16(), "signup response received");
    let body = match response.json::<SignupResponse>().await {
        Ok(body) => Some(body),
        Err(err) => {
            debug!(error = %err, "signup response was not json");
            None
        }
    };
    interpret_response(ok, body)
}

/// Maps a server reply to what the user sees.
pub fn interpret_response(ok: bool, body: Option<SignupResponse>) -> SubmitReport {
    let Some(body) = body else {
        return SubmitReport::error(TRANSPORT_ERROR);
    };
    if ok {
        SubmitReport::success(body.message.unwrap_or_else(|| FALLBACK_SUCCESS.to_string()))
    } else {
        SubmitReport::error(body.error.unwrap_or_else(|| FALLBACK_ERROR.to_string()))
    }
}
