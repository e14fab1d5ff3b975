// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use bike_dashboard::{load_csv, logging, parse_date_param, report, Dashboard, DashboardConfig, DateRange};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("report") => run_report(&args[2..]),
        None | Some("tui") => run_ui_mode(),
        Some(other) => bail!("unknown command {:?} (expected `tui` or `report [START END]`)", other),
    }
}

fn load_dashboard() -> Result<Dashboard> {
    let config = DashboardConfig::from_env().context("Failed to load configuration")?;
    let dataset = load_csv(&config.data_path)
        .with_context(|| format!("Failed to load dataset {}", config.data_path.display()))?;
    Ok(Dashboard::new(dataset, config))
}

fn run_report(args: &[String]) -> Result<()> {
    logging::init_tracing("bike-dashboard");

    let dashboard = load_dashboard()?;
    let range = match args {
        [] => dashboard.full_range(),
        [start, end] => {
            let start = parse_date_param(start).with_context(|| format!("Invalid start date {:?}", start))?;
            let end = parse_date_param(end).with_context(|| format!("Invalid end date {:?}", end))?;
            DateRange::new(start, end)
        }
        _ => bail!("usage: bike-dashboard report [START END]"),
    };

    print!("{}", report::render_text(&dashboard.render(range)));
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    logging::init_tui_tracing("bike-dashboard");

    println!("🚲 Loading Bike Sharing Dashboard...\n");
    let dashboard = load_dashboard()?;
    println!(
        "✓ Loaded {} days ({} .. {})",
        dashboard.dataset().len(),
        dashboard.dataset().min_date(),
        dashboard.dataset().max_date()
    );

    let mut app = ui::App::new(dashboard);
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the text report: cargo run -- report");
    eprintln!("   Or the web UI: cargo run --bin bike-server --features server");
    std::process::exit(1);
}
