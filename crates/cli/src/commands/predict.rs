//! Prediction CLI command

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, PredictReply, PredictRequest};
use crate::output::{print_error, print_success, print_warning, OutputFormat};

/// Row for the submitted reading table
#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Request a failure prediction for one sensor reading
pub async fn request_prediction(
    client: &ApiClient,
    reading: &PredictRequest,
    format: OutputFormat,
) -> Result<()> {
    let reply: PredictReply = client.post("predict", reading).await?;

    // The service folds rejected payloads into an error body; surface it
    // and exit nonzero instead of retrying.
    if let PredictReply::Error { error } = &reply {
        print_error(&format!("Prediction rejected: {}", error));
        anyhow::bail!("prediction request rejected");
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reply)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            let rows = reading_rows(reading);
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            if let PredictReply::Outcome {
                prediction,
                failure_type,
            } = &reply
            {
                match failure_type {
                    Some(label) => print_warning(&format!("{} ({})", prediction, label)),
                    None => print_success(prediction),
                }
            }
        }
    }

    Ok(())
}

fn reading_rows(reading: &PredictRequest) -> Vec<ReadingRow> {
    vec![
        ReadingRow {
            field: "Air temperature [K]".to_string(),
            value: reading.air_temperature_k.to_string(),
        },
        ReadingRow {
            field: "Process temperature [K]".to_string(),
            value: reading.process_temperature_k.to_string(),
        },
        ReadingRow {
            field: "Rotational speed [rpm]".to_string(),
            value: reading.rotational_speed_rpm.to_string(),
        },
        ReadingRow {
            field: "Torque [Nm]".to_string(),
            value: reading.torque_nm.to_string(),
        },
        ReadingRow {
            field: "Tool wear [min]".to_string(),
            value: reading.tool_wear_min.to_string(),
        },
        ReadingRow {
            field: "Type".to_string(),
            value: reading.quality_type.to_string(),
        },
    ]
}
