//! The interactive session: outcomes typed on stdin, dashboard redrawn on a timer.

use crate::display::{self, TerminalSink};
use anyhow::Context;
use configuration::Settings;
use core_types::{CoreError, Outcome};
use engine::{DashboardRefresher, DashboardSink, RefreshControl, SessionHandle};
use std::io::{self, Write};
use std::string::FromUtf8Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::time::Duration;

/// Asks a yes/no question on stdin. Anything but "y" or "yes" is a no.
pub async fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    read_answer(&mut BufReader::new(tokio::io::stdin())).await
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Reads one yes/no answer. End of input and undecodable bytes count as a no.
async fn read_answer<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<bool> {
    Ok(matches!(read_line(reader).await?, Some(Ok(answer)) if is_yes(&answer)))
}

/// Reads one line without its terminator.
///
/// Returns `None` at end of input. A line that is not valid UTF-8 is returned as an
/// error of its own so the caller can reject it and keep reading.
async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
) -> io::Result<Option<Result<String, FromUtf8Error>>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8(buf)))
}

/// A line typed during a watch session.
#[derive(Debug, PartialEq)]
enum Input {
    Quit,
    Dashboard,
    Clear,
    Save,
    Stats,
    Profit,
    History,
    Point(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "quit" | "exit" | "q" => Input::Quit,
            "dashboard" => Input::Dashboard,
            "clear" => Input::Clear,
            "save" => Input::Save,
            "stats" => Input::Stats,
            "profit" => Input::Profit,
            "history" => Input::History,
            _ => Input::Point(line.trim().to_string()),
        }
    }

    /// Whether the input prints something the next refresh would wipe off the screen.
    fn holds_screen(&self) -> bool {
        matches!(
            self,
            Input::Clear | Input::Save | Input::Stats | Input::Profit | Input::History
        )
    }
}

/// Runs the interactive session until "quit" or end of input.
pub async fn run_session(settings: &Settings, handle: SessionHandle) -> anyhow::Result<()> {
    let min_points = settings.analysis.min_prediction_points;
    let auto_refresh = settings.dashboard.auto_refresh;
    let mut sink = TerminalSink::new(min_points);

    let (control_tx, control_rx) = watch::channel(RefreshControl::Run);
    let refresher = if auto_refresh {
        let period = Duration::from_secs(settings.dashboard.refresh_interval_secs);
        let refresher = DashboardRefresher::new(handle.clone(), period, TerminalSink::new(min_points));
        Some(tokio::spawn(refresher.run(control_rx)))
    } else {
        sink.render(&handle.snapshot().await?);
        None
    };

    let mut stdin = BufReader::new(tokio::io::stdin());
    while let Some(line) = read_line(&mut stdin).await.context("failed to read input")? {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                let text = String::from_utf8_lossy(e.as_bytes()).into_owned();
                println!("{}", CoreError::NotANumber(text));
                continue;
            }
        };

        let input = Input::parse(&line);
        if input.holds_screen() {
            control_tx.send_replace(RefreshControl::Pause);
        } else {
            control_tx.send_replace(RefreshControl::Run);
        }

        match input {
            Input::Quit => break,
            Input::Dashboard => sink.render(&handle.snapshot().await?),
            Input::Clear => {
                println!("Clear all data? [y/N]");
                if read_answer(&mut stdin).await? {
                    let cleared = handle.clear().await?;
                    if let Err(e) = cleared.persisted {
                        eprintln!("Failed to save data: {e}");
                    }
                    sink.render(&handle.snapshot().await?);
                    println!("All data cleared");
                    control_tx.send_replace(RefreshControl::Run);
                    continue;
                }
                println!("Nothing was cleared.");
            }
            Input::Save => match handle.save().await {
                Ok(()) => println!("Data saved to {}", settings.storage.data_file.display()),
                Err(e) => eprintln!("Failed to save data: {e}"),
            },
            Input::Stats => {
                let snapshot = handle.snapshot().await?;
                display::print_statistics(&snapshot.report, min_points);
            }
            Input::Profit => {
                let state = handle.state().await?;
                display::show_profit(&state, settings.wagering.stake);
            }
            Input::History => {
                let state = handle.state().await?;
                display::show_history(&state, display::HISTORY_WINDOW);
            }
            Input::Point(text) => match text.parse::<Outcome>() {
                Ok(outcome) => {
                    let recorded = handle.record(outcome).await?;
                    if let Err(e) = &recorded.persisted {
                        eprintln!("Failed to save data: {e}");
                    }
                    sink.render(&handle.snapshot().await?);
                    display::print_recorded(&recorded);
                }
                // Bad input is reported and the session carries on.
                Err(e) => println!("{e}"),
            },
        }

        if auto_refresh && *control_tx.borrow() == RefreshControl::Pause {
            println!("Auto-refresh paused. Enter a point or \"dashboard\" to resume.");
        }
    }

    control_tx.send_replace(RefreshControl::Stop);
    if let Some(task) = refresher {
        task.await.context("dashboard refresh task failed")?;
    }
    Ok(())
}
