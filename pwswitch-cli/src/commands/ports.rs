//! `list-ports` command.

use anyhow::{Context, Result};
use console::style;
use pwswitch::{NativePortEnumerator, PortEnumerator, PortInfo, SelectorConfig};

/// One port as printed by `list-ports --json`.
fn port_json(port: &PortInfo, selector: &SelectorConfig) -> serde_json::Value {
    serde_json::json!({
        "name": port.name,
        "matches": selector.matches(&port.name),
        "vid": port.vid,
        "pid": port.pid,
        "manufacturer": port.manufacturer,
        "product": port.product,
        "serial": port.serial_number,
    })
}

fn describe(port: &PortInfo) -> String {
    let vid_pid = if let (Some(vid), Some(pid)) = (port.vid, port.pid) {
        format!(" ({vid:04X}:{pid:04X})")
    } else {
        String::new()
    };
    let product = port
        .product
        .as_deref()
        .map(|p| format!(" - {}", style(p).dim()))
        .unwrap_or_default();
    format!("{}{vid_pid}{product}", style(&port.name).cyan())
}

pub(crate) fn cmd_list_ports(selector: &SelectorConfig, json: bool) -> Result<()> {
    let ports = NativePortEnumerator::list_ports().context("failed to enumerate serial ports")?;

    if json {
        let values: Vec<_> = ports
            .iter()
            .map(|p| port_json(p, selector))
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    eprintln!("{}", style("Available serial ports:").bold().underlined());

    if ports.is_empty() {
        eprintln!("  {}", style("(none)").dim());
        return Ok(());
    }

    for port in &ports {
        let marker = if selector.matches(&port.name) {
            format!(" {}", style("[switch]").yellow())
        } else {
            String::new()
        };
        eprintln!("  {} {}{marker}", style("•").green(), describe(port));
    }

    Ok(())
}
