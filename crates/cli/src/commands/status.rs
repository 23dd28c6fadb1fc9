//! Service status CLI command

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, HealthReply, ReadinessReply};
use crate::output::{color_status, print_error, print_info, print_success, OutputFormat};

/// Row for the component health table
#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Checked")]
    checked: String,
}

/// Show service health and readiness
pub async fn show_status(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let (_, health): (_, HealthReply) = client.get_with_status("healthz").await?;
    let (_, readiness): (_, ReadinessReply) = client.get_with_status("readyz").await?;

    match format {
        OutputFormat::Json => {
            let combined = serde_json::json!({
                "health": health,
                "readiness": readiness,
            });
            println!("{}", serde_json::to_string_pretty(&combined)?);
        }
        OutputFormat::Table => {
            println!("{}", "Service Status".bold());
            println!("{}", "=".repeat(50));
            println!("Overall:    {}", color_status(&health.status));
            println!("Ready:      {}", if readiness.ready { "yes" } else { "no" });
            println!("Version:    {}", health.version);
            println!("Uptime:     {}s", health.uptime_seconds);
            println!();

            let mut rows: Vec<ComponentRow> = health
                .components
                .iter()
                .map(|(name, component)| ComponentRow {
                    component: name.clone(),
                    status: color_status(&component.status),
                    message: component.message.clone().unwrap_or_default(),
                    checked: format_timestamp(&component.last_check),
                })
                .collect();
            rows.sort_by(|a, b| a.component.cmp(&b.component));

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!();

            if let Some(reason) = &readiness.reason {
                print_info(&format!("Reason: {}", reason));
            }
            if health.status == "healthy" && readiness.ready {
                print_success("Service is healthy and ready");
            } else {
                print_error("Service is not serving predictions");
            }
        }
    }

    Ok(())
}

/// Format timestamp for display
fn format_timestamp(ts: &str) -> String {
    // Try to parse and format nicely, otherwise return as-is
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
        dt.format("%Y-%m-%d %H:%M").to_string()
    } else {
        ts.to_string()
    }
}
