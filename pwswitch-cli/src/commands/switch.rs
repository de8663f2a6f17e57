//! Power switching commands: `cycle`, `status`, `on` and `off`.

use anyhow::{Context, Result};
use log::info;
use pwswitch::{Command, DeviceConfig, NativePort, Port, PowerSwitch, Response};
use std::io::{self, Write};
use std::time::Duration;

use crate::ui;

/// What to print before an exchange and how to label its result.
fn labels(command: Command) -> (&'static str, &'static str) {
    match command {
        Command::Inquire => ("get status", "got status"),
        Command::TurnOff => ("turn off", "got response"),
        Command::TurnOn => ("turn on", "got response"),
    }
}

/// Steps of the check cycle, in order.
const CYCLE: [Command; 3] = [Command::Inquire, Command::TurnOff, Command::TurnOn];

fn connect(config: &DeviceConfig) -> Result<PowerSwitch<NativePort>> {
    let opened = PowerSwitch::<NativePort>::open(config);
    let switch = match &config.port {
        Some(name) => opened.with_context(|| format!("failed to open {name}"))?,
        None => opened.context("failed to find and open the power switch")?,
    };
    info!("Using port {}", switch.port_name());
    Ok(switch)
}

fn exchange<P: Port>(switch: &mut PowerSwitch<P>, command: Command) -> Result<Vec<Response>> {
    let (action, _) = labels(command);
    ui::with_spinner(format!("Waiting for reply to {action:?}"), || {
        switch.send(command)
    })
    .with_context(|| format!("{action} failed"))
}

/// Quoted response names separated by spaces, e.g. `["off" "ok"]`.
fn format_responses(responses: &[Response]) -> String {
    let names: Vec<String> = responses
        .iter()
        .map(|r| format!("{:?}", r.as_str()))
        .collect();
    format!("[{}]", names.join(" "))
}

fn run_step<P: Port>(
    switch: &mut PowerSwitch<P>,
    command: Command,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let (action, result) = labels(command);
    if !json {
        writeln!(out, "{action}")?;
    }

    let responses = exchange(switch, command)?;

    if json {
        let line = serde_json::json!({
            "command": command,
            "responses": responses,
        });
        writeln!(out, "{line}")?;
    } else {
        writeln!(out, "{result}: {}", format_responses(&responses))?;
    }
    out.flush()?;
    Ok(())
}

fn run_cycle<P: Port>(
    switch: &mut PowerSwitch<P>,
    pause: Duration,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    for (i, command) in CYCLE
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            ui::pause(pause);
        }
        run_step(switch, command, json, out)?;
    }
    Ok(())
}

/// Query status, switch off, switch on, pausing between steps.
pub(crate) fn cmd_cycle(config: &DeviceConfig, pause: Duration, json: bool) -> Result<()> {
    let mut switch = connect(config)?;
    run_cycle(&mut switch, pause, json, &mut io::stdout().lock())?;
    switch
        .close()
        .context("failed to close the port")
}

/// Run a single exchange.
pub(crate) fn cmd_single(config: &DeviceConfig, command: Command, json: bool) -> Result<()> {
    let mut switch = connect(config)?;
    run_step(&mut switch, command, json, &mut io::stdout().lock())?;
    switch
        .close()
        .context("failed to close the port")
}
