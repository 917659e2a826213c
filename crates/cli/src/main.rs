//! dedao CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration** — the seven credential tokens and the transport
//!    settings come from flags or `DEDAO_*` environment variables. Missing
//!    credentials are empty strings, which the platform treats as logged out.
//! 2. **Wire observability** — configure `tracing-subscriber` with an
//!    `EnvFilter` (`RUST_LOG`, default `info`) and a text or JSON formatter on
//!    stderr. All `tracing` events emitted by `session` and `envelope` flow
//!    through it.
//! 3. **Construct the session** — one [`session::Session`] per invocation.
//! 4. **Run one command** — print cookies, or issue one GET/POST and print the
//!    decoded envelope content as pretty JSON on stdout.

use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use envelope::{Credentials, BASE_URL, PLATFORM_ROOT};
use serde_json::Value;
use session::{Session, SessionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dedao",
    version,
    about = "Issue calls against the dedao web API through a cookie-authenticated session"
)]
struct Cli {
    #[command(flatten)]
    credentials: CredentialArgs,

    /// Origin every request path is joined onto.
    #[arg(long, env = "DEDAO_BASE_URL", default_value = BASE_URL)]
    base_url: String,

    /// Bare platform domain the credential cookies are scoped under.
    #[arg(long, env = "DEDAO_PLATFORM_ROOT", default_value = PLATFORM_ROOT)]
    platform_root: String,

    /// Override the `User-Agent` header.
    #[arg(long, env = "DEDAO_USER_AGENT")]
    user_agent: Option<String>,

    /// Whole-request timeout in seconds.
    #[arg(long, env = "DEDAO_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log line format on stderr.
    #[arg(long, env = "DEDAO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

/// The seven login cookies, as exported from a logged-in browser.
#[derive(Args)]
struct CredentialArgs {
    #[arg(long, env = "DEDAO_GAT", default_value = "", hide_env_values = true)]
    gat: String,
    #[arg(long, env = "DEDAO_ISID", default_value = "", hide_env_values = true)]
    isid: String,
    #[arg(long, env = "DEDAO_SID", default_value = "", hide_env_values = true)]
    sid: String,
    #[arg(long, env = "DEDAO_ACW_TC", default_value = "", hide_env_values = true)]
    acw_tc: String,
    #[arg(long, env = "DEDAO_IGET", default_value = "", hide_env_values = true)]
    iget: String,
    #[arg(long, env = "DEDAO_TOKEN", default_value = "", hide_env_values = true)]
    token: String,
    #[arg(long, env = "DEDAO_GUARD_DEVICE_ID", default_value = "", hide_env_values = true)]
    guard_device_id: String,
}

impl CredentialArgs {
    fn into_credentials(self) -> Credentials {
        Credentials::new(
            self.gat,
            self.isid,
            self.sid,
            self.acw_tc,
            self.iget,
            self.token,
            self.guard_device_id,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the session cookies as a JSON object.
    Cookies {
        /// Include the `www`-scoped cookies, not just the root-domain ones.
        #[arg(long)]
        all: bool,
    },
    /// GET `path` and print the decoded envelope content.
    Get { path: String },
    /// POST a JSON body to `path` and print the decoded envelope content.
    Post {
        path: String,
        /// Request body; must be valid JSON.
        #[arg(long, default_value = "{}")]
        body: String,
    },
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::default()
            .with_base_url(&self.base_url)
            .with_platform_root(&self.platform_root);
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = cli.session_config();
    let Cli {
        credentials,
        command,
        ..
    } = cli;
    let session = Session::with_config(&credentials.into_credentials(), &config)
        .context("build session")?;
    info!(base_url = %session.base_url(), "session ready");

    let output = run(&session, command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run(session: &Session, command: Command) -> anyhow::Result<Value> {
    match command {
        Command::Cookies { all } => {
            let cookies = if all {
                session.www_cookies()
            } else {
                session.cookies()
            };
            Ok(serde_json::to_value(cookies)?)
        }
        Command::Get { path } => session
            .get_json(&path)
            .await
            .with_context(|| format!("GET {path}")),
        Command::Post { path, body } => {
            let body: Value = serde_json::from_str(&body).context("--body is not valid JSON")?;
            session
                .post_json(&path, &body)
                .await
                .with_context(|| format!("POST {path}"))
        }
    }
}
