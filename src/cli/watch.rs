use crate::controller::{ControllerEvent, Phase, RefreshController, REFRESH_INTERVAL};
use crate::core::models::Platform;
use crate::core::notifications::{send_desktop_notice, Notice};
use crate::core::settings::Settings;
use crate::jobs::ProfileSource;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str =
    "Commands: search <username>, platform <instagram|tiktok>, refresh, status, quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Search(String),
    Platform(Platform),
    Refresh,
    Status,
    Quit,
    Help,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "search" | "s" => Command::Search(arg.to_string()),
        "platform" | "p" => {
            let platform = Platform::from_str(arg, true)
                .map_err(|_| format!("Unknown platform '{}'. Valid: instagram, tiktok", arg))?;
            Command::Platform(platform)
        }
        "refresh" | "r" => Command::Refresh,
        "status" => Command::Status,
        "quit" | "exit" | "q" => Command::Quit,
        "help" | "?" => Command::Help,
        other => return Err(format!("Unknown command '{}'. {}", other, HELP)),
    };

    Ok(Some(command))
}

pub async fn run(platform: Platform, username: Option<String>) -> Result<()> {
    let settings = Settings::load()?;
    let desktop = settings.notifications.desktop;

    let source = Arc::new(super::build_client(&settings, settings.allow_mock_fallback));
    let (mut controller, mut events) = RefreshController::new(source, platform);

    println!(
        "Tracking {} followers, auto-refreshing every {}s. {}",
        platform,
        REFRESH_INTERVAL.as_secs(),
        HELP
    );

    if let Some(username) = username {
        search(&mut controller, &username).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(event) = events.recv() => render_event(event, desktop),
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match parse_command(&line) {
                    Ok(Some(Command::Search(username))) => search(&mut controller, &username).await,
                    Ok(Some(Command::Platform(platform))) => {
                        controller.switch_platform(platform).await;
                        println!("Switched to {}", platform);
                    }
                    Ok(Some(Command::Refresh)) => controller.refresh().await,
                    Ok(Some(Command::Status)) => print_status(&controller).await,
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => println!("{}", HELP),
                    Ok(None) => {}
                    Err(message) => eprintln!("{}", message),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    controller.stop_auto_refresh();
    while let Ok(event) = events.try_recv() {
        render_event(event, desktop);
    }

    Ok(())
}

async fn search<S: ProfileSource>(controller: &mut RefreshController<S>, username: &str) {
    if let Err(e) = controller.search(username).await {
        tracing::debug!(error = %e, user_error = e.is_user_error(), "Search did not complete");
    }
}

async fn print_status<S: ProfileSource>(controller: &RefreshController<S>) {
    println!(
        "{} | {:?} | auto-refresh {}",
        controller.platform().await,
        controller.phase().await,
        if controller.is_auto_refreshing() { "on" } else { "off" }
    );
    match controller.snapshot().await {
        Some(snapshot) => super::print_snapshot(&snapshot),
        None => println!("No profile loaded"),
    }
}

fn render_event(event: ControllerEvent, desktop: bool) {
    match event {
        ControllerEvent::SnapshotChanged(snapshot) => super::print_snapshot(&snapshot),
        ControllerEvent::StateChanged(Phase::Searching) => println!("Searching..."),
        ControllerEvent::StateChanged(phase) => tracing::debug!(?phase, "Controller state changed"),
        ControllerEvent::Notice(notice) => show_notice(&notice, desktop),
    }
}

fn show_notice(notice: &Notice, desktop: bool) {
    if notice.is_error() {
        eprintln!("{}: {}", notice.title, notice.description);
    } else {
        println!("{}: {}", notice.title, notice.description);
    }

    if desktop {
        if let Err(e) = send_desktop_notice(notice) {
            tracing::warn!(error = %e, "Failed to send desktop notice");
        }
    }
}
