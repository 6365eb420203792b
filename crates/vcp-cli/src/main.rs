//! VCP Screener Dashboard CLI
//!
//! Runs the dashboard tabs once from flags, or opens an interactive menu.
//!
//! # Usage
//!
//! ```bash
//! # Interactive menu
//! cargo run --bin vcp-dashboard
//!
//! # Screen, then export the results into ./out
//! cargo run --bin vcp-dashboard -- --tab screener --tab export --output out
//!
//! # Headlines for one ticker
//! cargo run --bin vcp-dashboard -- --tab news --symbol INFY
//! ```

use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use vcp_screener::dashboard::render;
use vcp_screener::{
    CommandOutcome, ContractionThreshold, Dashboard, HistoryPolicy, ScreenerConfig, Tab,
};

#[derive(Parser, Debug)]
#[command(name = "vcp-dashboard")]
#[command(about = "VCP screener dashboard for NSE stocks", long_about = None)]
struct Args {
    /// Tab to run; repeat to run several in order. Omit for the interactive menu
    #[arg(short, long, value_enum)]
    tab: Vec<TabArg>,

    /// Ticker for the fundamentals and news tabs (symbol, base symbol or index)
    #[arg(short, long)]
    symbol: Option<String>,

    /// Directory or file path for the exported workbook
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Contraction threshold as a fraction of the last close
    #[arg(long)]
    relative_threshold: Option<f64>,

    /// Require full 50/200-day windows before a breakout can match
    #[arg(long)]
    require_full_history: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TabArg {
    Screener,
    Fundamentals,
    Sectors,
    News,
    Export,
}

impl From<TabArg> for Tab {
    fn from(arg: TabArg) -> Self {
        match arg {
            TabArg::Screener => Tab::VcpScreener,
            TabArg::Fundamentals => Tab::CompanyFundamentals,
            TabArg::Sectors => Tab::SectorRotation,
            TabArg::News => Tab::NewsAndEvents,
            TabArg::Export => Tab::Export,
        }
    }
}

fn build_config(args: &Args) -> vcp_screener::Result<ScreenerConfig> {
    let mut builder = ScreenerConfig::builder().with_env();
    if let Some(fraction) = args.relative_threshold {
        builder = builder.threshold(ContractionThreshold::Relative(fraction));
    }
    if args.require_full_history {
        builder = builder.history_policy(HistoryPolicy::RequireFull);
    }
    builder.build()
}

async fn run_once(
    dashboard: &mut Dashboard,
    tabs: &[TabArg],
    symbol: Option<&str>,
) -> anyhow::Result<()> {
    for tab in tabs {
        let output = dashboard.run_tab(Tab::from(*tab), symbol).await?;
        println!("{output}\n");
    }
    Ok(())
}

async fn run_menu(dashboard: &mut Dashboard) -> anyhow::Result<()> {
    println!("{}\n", render::banner());
    println!("{}\n", render::menu());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("vcp> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match dashboard.process_input(input).await {
            Ok(CommandOutcome::Render(output)) => println!("{output}\n"),
            Ok(CommandOutcome::Exit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = vcp_utils::Config::from_env();
    vcp_utils::init_tracing_with(app.log_format);

    let args = Args::parse();
    let config = build_config(&args)?;

    if config.criteria.threshold.is_scale_dependent() {
        warn!(
            "Contraction threshold {} is in price units; use --relative-threshold to compare across price scales",
            config.criteria.threshold.value()
        );
    }

    let mut dashboard = Dashboard::from_config(config)?.with_export_dir(args.output.clone());
    info!(
        "Starting {} ({}) session {}",
        app.app_name,
        app.environment,
        dashboard.session().id
    );

    if args.tab.is_empty() {
        run_menu(&mut dashboard).await
    } else {
        run_once(&mut dashboard, &args.tab, args.symbol.as_deref()).await
    }
}
