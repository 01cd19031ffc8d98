mod action;
mod app;
mod event;
mod logging;
#[cfg(test)]
mod test_support;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use app::App;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::KeyEventKind;
use event::{Event, EventHandler};
use grouptop::config::{Config, load_config, load_config_from_path};
use grouptop::system::group::GroupSummary;
use grouptop::system::info::SystemInfo;
use grouptop::system::monitor::ProcessMonitor;
use grouptop::system::query::SortKey;
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "grouptop",
    about = "TUI process monitor that groups processes by executable name"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// UI refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Sampler poll interval in milliseconds
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Sort column: memory, cpu, name, start_time
    #[arg(long)]
    sort: Option<String>,

    /// Sort ascending instead of descending
    #[arg(long, default_value_t = false)]
    ascending: bool,

    /// Only show groups whose name contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Poll once, print groups and system info as JSON, then exit.
    #[arg(long, default_value_t = false)]
    dump: bool,

    /// Log file path (defaults to the user cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Serialize)]
struct DumpRow {
    name: String,
    #[serde(flatten)]
    summary: GroupSummary,
}

#[derive(Serialize)]
struct Dump {
    system: SystemInfo,
    groups: Vec<DumpRow>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if cli.dump {
        return run_dump(&config, &cli);
    }

    let log_path = config
        .logging
        .path()
        .ok_or_else(|| eyre!("no log path: pass --log-file"))?;
    logging::init_file(&log_path, &config.logging.level, config.logging.json)?;

    let monitor = ProcessMonitor::with_sysinfo(config.monitor_config());
    monitor.start_sampling()?;
    info!(log = %log_path.display(), "grouptop started");

    let mut terminal = ratatui::init();
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, &config, &cli, monitor.clone()).await;

    ratatui::restore();
    monitor.shutdown();
    info!("grouptop stopped");

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: &Config,
    cli: &Cli,
    monitor: ProcessMonitor,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms.max(50));
    let mut events = EventHandler::new(tick_rate);
    let mut app = App::new(config, monitor.clone(), events.sender());
    if let Some(filter) = &cli.filter {
        app.filter_text = filter.clone();
    }

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        // Until the first snapshot lands, readiness counts as a tick.
        let next = if app.ready {
            events.next().await
        } else {
            tokio::select! {
                () = monitor.wait_ready() => Some(Event::Tick),
                event = events.next() => event,
            }
        };
        let Some(event) = next else {
            break;
        };

        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::Tick => app.refresh_data(),
            Event::Resize => {}
            Event::KillFinished(report) => {
                app.on_kill_finished(report);
                app.refresh_data();
            }
            Event::InstancesLoaded(name, instances) => {
                app.on_instances_loaded(name, instances);
            }
        }
        terminal.draw(|frame| ui::draw(frame, &app))?;
    }

    Ok(())
}

fn run_dump(config: &Config, cli: &Cli) -> Result<()> {
    logging::init_stderr(&config.logging.level)?;

    let monitor = ProcessMonitor::with_sysinfo(config.monitor_config());
    let report = monitor.poll_once()?;
    info!(groups = report.groups, "poll complete");

    let filter = cli.filter.as_deref().unwrap_or("");
    let sort_key = SortKey::from_label(&config.general.default_sort);
    let groups = monitor
        .get_filtered(filter, sort_key, config.general.sort_descending)
        .into_iter()
        .map(|(name, summary)| DumpRow { name, summary })
        .collect();

    let dump = Dump {
        system: monitor.system_info(),
        groups,
    };
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(interval) = cli.poll_interval {
        config.sampler.poll_interval_ms = interval;
    }
    if let Some(sort) = &cli.sort {
        config.general.default_sort = sort.clone();
    }
    if cli.ascending {
        config.general.sort_descending = false;
    }
    if let Some(path) = &cli.log_file {
        config.logging.file = Some(path.clone());
    }

    config
}
