use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use clap::{Parser, ValueEnum};

use posreports_auth::{Role, StaticRoleProvider};
use posreports_console::{ReportSession, TextPresenter};
use posreports_core::ShopId;
use posreports_infra::{PostgrestSource, config, fetch_shops};
use posreports_observability::{LogConfig, LogFormat};
use posreports_products::Shop;
use posreports_reports::{ReportKind, ShopFilter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LogStyle {
    Json,
    Pretty,
}

/// Render one sales/inventory report from the shop backend.
#[derive(Debug, Parser)]
#[command(name = "posreports", version, about)]
struct Cli {
    /// Report identifier (see --list)
    #[arg(required_unless_present = "list")]
    report: Option<String>,

    /// Shop filter: a shop id or "all" (managers only)
    #[arg(long)]
    shop: Option<ShopFilter>,

    /// Report date (YYYY-MM-DD); defaults to today in the reporting offset
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Role of the operator
    #[arg(long, env = "POSREPORTS_ROLE", default_value = "manager")]
    role: String,

    /// Shop the operator is signed in at
    #[arg(long, env = "POSREPORTS_SHOP_ID")]
    current_shop: Option<ShopId>,

    /// List available reports and exit
    #[arg(long)]
    list: bool,

    #[arg(long, value_enum, default_value_t = LogStyle::Json)]
    log_format: LogStyle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = match cli.log_format {
        LogStyle::Json => LogFormat::Json,
        LogStyle::Pretty => LogFormat::Pretty,
    };
    posreports_observability::init_with(&LogConfig::default().with_format(format));

    if cli.list {
        for kind in ReportKind::ALL {
            println!("{:<16} {}", kind.id(), kind.title());
        }
        return Ok(());
    }

    let settings = config::settings_from_env().context("invalid report settings")?;
    let source = PostgrestSource::from_env().context("backend is not configured")?;

    let current_shop = match cli.current_shop {
        Some(id) => {
            let shops = fetch_shops(&source).await;
            Some(
                shops
                    .into_iter()
                    .find(|s| s.id == id)
                    .unwrap_or_else(|| Shop::new(id, id.to_string())),
            )
        }
        None => None,
    };

    let date = cli.date.unwrap_or_else(|| settings.local_date(Utc::now()));
    let roles = StaticRoleProvider::new(Role::new(cli.role));
    let session = ReportSession::new(
        source,
        TextPresenter::stdout(),
        roles,
        current_shop,
        settings,
        date,
    );

    let options = session.load_shop_options().await?;
    for option in &options {
        tracing::debug!(filter = %option.filter, label = %option.label, "shop option");
    }

    if let Some(filter) = cli.shop {
        session.change_shop(filter).await?;
    }

    let report = cli.report.unwrap_or_default();
    session.open(&report).await?;
    tracing::info!(report = %report, "done");
    Ok(())
}
