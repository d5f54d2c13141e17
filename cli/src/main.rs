//! Interactive terminal front-end for the scheduling client.

mod command;

use std::io::{self, BufRead, Write};

use agenda_core::{ApiService, ClientConfig, PageError, Shell, Tab, Transport, UreqTransport};
use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use command::{Command, HELP};

#[derive(Debug, Parser)]
#[command(name = "agenda", about = "Cadastro de pacientes, profissionais e consultas")]
struct Args {
    /// Base URL of the scheduling API; falls back to $AGENDA_API_URL, then
    /// the local mock server
    #[arg(long)]
    api_url: Option<String>,
}

fn tab_bar(current: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == current {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render<T: Transport>(shell: &Shell<T>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", tab_bar(shell.page().tab()))?;
    writeln!(out, "{}", shell.view())
}

fn read_line(stdin: &io::Stdin) -> io::Result<Option<String>> {
    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Apply one command. Returns `false` when the session should end.
fn execute<T: Transport>(shell: &mut Shell<T>, command: Command, stdin: &io::Stdin) -> Result<bool, PageError> {
    match command {
        Command::Tab(tab) => shell.select_tab(tab),
        Command::New => shell.new_record()?,
        Command::Edit(id) => shell.edit(id)?,
        Command::Delete(id) => {
            let mut ask = |message: &str| {
                print!("{message} [s/N] ");
                // An unanswerable prompt counts as "no".
                if io::stdout().flush().is_err() {
                    return false;
                }
                matches!(
                    read_line(stdin).ok().flatten().as_deref().map(str::trim),
                    Some("s" | "S" | "sim")
                )
            };
            shell.delete(&id, &mut ask)?;
        }
        Command::Set { field, value } => shell.set_field(&field, &value)?,
        Command::Submit => {
            shell.submit()?;
        }
        Command::Cancel => shell.cancel()?,
        Command::Professional(id) => shell.select_professional(id)?,
        Command::Date(date) => shell.select_date(&date)?,
        Command::Refresh => shell.refresh(),
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = args.api_url.map(ClientConfig::new).unwrap_or_else(ClientConfig::from_env);
    info!(api_url = %config.api_url, "starting");

    let mut shell = Shell::new(ApiService::from_config(&config, UreqTransport::new()));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    render(&shell, &mut stdout).context("writing to stdout")?;

    loop {
        print!("> ");
        stdout.flush().context("writing to stdout")?;
        let Some(line) = read_line(&stdin).context("reading from stdin")? else {
            break;
        };
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        debug!(?command, "executing");
        match execute(&mut shell, command, &stdin) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("{err}"),
        }
        render(&shell, &mut stdout).context("writing to stdout")?;
    }
    Ok(())
}
