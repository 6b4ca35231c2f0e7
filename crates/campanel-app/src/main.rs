#![warn(missing_docs)]
//! # campanel binary
//!
//! Line-oriented terminal host for the camera panel.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use campanel_app::{
    APP_VERSION, AppError, CaptureResult, Command, DEVICE_URL_ENV, DeleteReport, HELP_TEXT,
    LOCALE_ENV, Panel, PanelConfig, PanelHost, PhotoReport, RebootOutcome, app_version,
    init_tracing,
};
use campanel_core::{Clock, SystemClock};
use campanel_stream::StreamChange;
use campanel_ui::{FileListState, FileListView, Message, ModalContent, ModalInput, ToastKind};
use clap::Parser;
use tracing::info;

const TICK: Duration = Duration::from_millis(100);

/// Terminal control panel for an ESP32-CAM.
#[derive(Debug, Parser)]
#[command(name = "campanel", version = APP_VERSION)]
struct Cli {
    /// Device base URL; overrides CAMPANEL_DEVICE_URL.
    #[arg(long, value_name = "URL")]
    device: Option<String>,
    /// Display language (en, ja); overrides CAMPANEL_LOCALE.
    #[arg(long, value_name = "TAG")]
    locale: Option<String>,
}

/// CLI entry point.
fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("campanel: {error}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<PanelConfig, AppError> {
    let config = PanelConfig::from_lookup(|key| match key {
        DEVICE_URL_ENV if cli.device.is_some() => cli.device.clone(),
        LOCALE_ENV if cli.locale.is_some() => cli.locale.clone(),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(&cli)?;
    init_tracing(&config.log_filter)?;
    info!(version = app_version(), device = %config.device_url, locale = config.locale.tag(), "starting panel");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let mut host = TerminalHost::spawn()?;
    let mut panel = Panel::from_config(&config, Arc::clone(&clock))?;
    panel.initialize();

    println!("campanel {} -> {}", app_version(), config.device_url);
    println!("{HELP_TEXT}");
    let mut seen_toast = print_toasts(&panel, 0);
    print_status(&panel);

    loop {
        match host.lines.recv_timeout(TICK) {
            Ok(line) => match Command::parse(&line) {
                Some(Command::Quit) => break,
                Some(command) => dispatch(&mut panel, &mut host, command),
                None if line.trim().is_empty() => {}
                None => println!("unknown command; type `help`"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Some(change) = panel.pump() {
            print_stream_change(&panel, change);
        }
        seen_toast = print_toasts(&panel, seen_toast);

        if let Some(target) = host.reload.take() {
            info!(%target, "reloading panel");
            panel = Panel::from_config(&config, Arc::clone(&clock))?;
            panel.initialize();
            seen_toast = print_toasts(&panel, 0);
            print_status(&panel);
        }
    }

    info!("panel closed");
    Ok(())
}

fn dispatch(panel: &mut Panel, host: &mut TerminalHost, command: Command) {
    let locale = panel.locale();
    match command {
        Command::Preview => {
            let live = panel.toggle_preview();
            println!("preview {}", if live { "connecting" } else { "stopped" });
            print_surface(panel);
        }
        Command::Capture => {
            let report = panel.capture_photo();
            if report.outcome == CaptureResult::Busy {
                println!("capture already in progress");
            }
            if report.resumed {
                println!("resuming preview");
            }
        }
        Command::Files => {
            panel.refresh_file_list();
            print_files(panel);
        }
        Command::Storage => {
            panel.refresh_storage();
            print_storage(panel);
        }
        Command::Show(name) => {
            match panel.preview_file(&name) {
                PhotoReport::Shown { bytes, elapsed_ms } => {
                    println!("showing {name} ({bytes} bytes, {elapsed_ms} ms)");
                }
                PhotoReport::Failed { .. } => print_surface(panel),
            }
        }
        Command::Delete(name) => {
            if panel.delete_file(&name, host) == DeleteReport::Deleted {
                print_files(panel);
            }
        }
        Command::Info => {
            if panel.open_hardware_modal() {
                print_modal(panel);
            }
        }
        Command::Close => close_modal(panel, ModalInput::CloseButton),
        Command::Escape => close_modal(panel, ModalInput::Escape),
        Command::Backdrop => close_modal(panel, ModalInput::Backdrop),
        Command::Reboot => match panel.reboot_device(host) {
            RebootOutcome::Cancelled => println!("reboot cancelled"),
            RebootOutcome::Online { attempts, .. } => {
                println!("device back online after {attempts} probes");
            }
            RebootOutcome::Unreachable { .. } => {
                println!("{}", Message::RebootUnreachable.text(locale));
            }
        },
        Command::Status => print_status(panel),
        Command::Help => println!("{HELP_TEXT}"),
        Command::Quit => {}
    }
}

fn close_modal(panel: &mut Panel, input: ModalInput) {
    if panel.modal_input(input) {
        println!("hardware info closed");
    } else {
        println!("hardware info is not open");
    }
}

fn print_stream_change(panel: &Panel, change: StreamChange) {
    match change {
        StreamChange::Connected => println!("preview live"),
        StreamChange::Failed | StreamChange::TimedOut => print_surface(panel),
    }
}

fn print_toasts(panel: &Panel, seen: u64) -> u64 {
    let mut latest = seen;
    for toast in panel.toasts().since(seen) {
        let tag = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        };
        println!("[{tag}] {}", toast.text.replace('\n', " | "));
        latest = latest.max(toast.id);
    }
    latest
}

fn print_surface(panel: &Panel) {
    let locale = panel.locale();
    match panel.surface().placeholder(locale) {
        Some(text) => println!("preview: {}", text.replace('\n', " | ")),
        None => println!("preview: image shown"),
    }
}

fn print_modal(panel: &Panel) {
    let locale = panel.locale();
    match panel.modal().content() {
        Some(ModalContent::Loading) => println!("{}", Message::HardwareLoading.text(locale)),
        Some(ModalContent::Loaded(rows)) => {
            for row in rows {
                println!("  {:<16} {}", row.label, row.value);
            }
        }
        Some(ModalContent::Failed { summary, hint }) => {
            println!("{}", Message::HardwareUnavailable.text(locale));
            println!("  {summary}");
            if let Some(hint) = hint {
                println!("  {hint}");
            }
        }
        None => {}
    }
}

fn print_files(panel: &Panel) {
    match panel.file_list() {
        FileListState::NotLoaded => println!("files: not loaded"),
        FileListState::Failed => println!("files: {}", Message::FileListFailed.text(panel.locale())),
        FileListState::Loaded(FileListView::Empty { title, hint }) => {
            println!("files: {title}. {hint}");
        }
        FileListState::Loaded(FileListView::Rows(rows)) => {
            for row in rows {
                println!("  {:<32} {:>8}", row.name, row.size_text);
            }
        }
    }
}

fn print_storage(panel: &Panel) {
    if let Some(view) = panel.storage() {
        let usage = match (view.usage_percent, view.level) {
            (Some(percent), Some(level)) => format!(", {percent:.1}% {level:?}"),
            _ => String::new(),
        };
        println!(
            "storage: {} used of {}, {}{usage}",
            view.used, view.total, view.file_count
        );
    }
}

fn print_status(panel: &Panel) {
    let locale = panel.locale();
    let control = panel.capture_control();
    println!("stream: {:?}", panel.stream_state());
    match control.hint(locale) {
        Some(hint) => println!("capture: {} ({hint})", control.label(locale)),
        None => println!("capture: {}", control.label(locale)),
    }
    print_surface(panel);
    print_storage(panel);
    print_files(panel);
    if panel.modal().is_open() {
        print_modal(panel);
    }
}

/// Terminal implementation of [`PanelHost`].
struct TerminalHost {
    lines: Receiver<String>,
    reload: Option<String>,
}

impl TerminalHost {
    fn spawn() -> Result<Self, AppError> {
        let (sender, lines) = mpsc::channel();
        thread::Builder::new()
            .name("campanel-stdin".to_string())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    if sender.send(line).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            lines,
            reload: None,
        })
    }
}

impl PanelHost for TerminalHost {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        match self.lines.recv() {
            Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }

    fn reload(&mut self, target: &str) {
        self.reload = Some(target.to_string());
    }
}
