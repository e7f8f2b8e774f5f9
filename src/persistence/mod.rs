//! Export Module
//!
//! Writes ranked summaries to CSV (appending) or JSON (one file per export)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::info;

use crate::portfolio::PortfolioSummary;

/// One ranked market per CSV row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRecord {
    pub timestamp: i64,
    pub rank: usize,
    pub title: String,
    pub yes_odds: f64,
    pub historical_win_rate: f64,
    pub sample_size: u32,
    pub volume: String,
    pub ev: f64,
    /// "inf" / "NaN" when non-finite
    pub risk_reward: f64,
    pub kelly: f64,
    pub confidence: u8,
    pub signal: String,
    pub valid_odds: bool,
}

impl RankingRecord {
    pub fn from_summary(summary: &PortfolioSummary, at: DateTime<Utc>) -> Vec<Self> {
        let timestamp = at.timestamp_millis();
        summary
            .ranked_results()
            .iter()
            .enumerate()
            .map(|(i, m)| RankingRecord {
                timestamp,
                rank: i + 1,
                title: m.observation.title.clone(),
                yes_odds: m.observation.yes_odds,
                historical_win_rate: m.observation.historical_win_rate,
                sample_size: m.observation.sample_size,
                volume: m.observation.volume.clone(),
                ev: m.metrics.ev,
                risk_reward: m.metrics.risk_reward,
                kelly: m.metrics.kelly,
                confidence: m.metrics.confidence,
                signal: m.signal.to_string(),
                valid_odds: m.metrics.odds_in_valid_range,
            })
            .collect()
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    exported_at: DateTime<Utc>,
    summary: &'a PortfolioSummary,
}

/// Append the ranking to `path`, writing headers only for a new or empty file.
pub fn export_csv(summary: &PortfolioSummary, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export dir {}", parent.display()))?;
    }

    let mut writer = create_writer(path)?;
    let records = RankingRecord::from_summary(summary, Utc::now());
    for record in &records {
        writer
            .serialize(record)
            .context("Failed to write ranking record")?;
    }
    writer.flush().context("Failed to flush ranking writer")?;

    info!(path = %path.display(), rows = records.len(), "Ranking exported to CSV");
    Ok(records.len())
}

/// Write the whole summary as pretty JSON, replacing any existing file.
pub fn export_json(summary: &PortfolioSummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export dir {}", parent.display()))?;
    }

    let export = JsonExport {
        exported_at: Utc::now(),
        summary,
    };
    let json = serde_json::to_string_pretty(&export).context("Failed to serialize summary")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), markets = summary.total, "Summary exported to JSON");
    Ok(())
}

fn create_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    let file_has_data =
        path.exists() && fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open CSV file")?;

    let writer = WriterBuilder::new()
        .has_headers(!file_has_data)
        .from_writer(file);

    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::sample_observations;
    use crate::portfolio::summarize;
    use crate::types::MarketObservation;
    use csv::ReaderBuilder;
    use std::path::PathBuf;

    fn temp_export_dir(test_name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "evboard_export_{}_{}",
            test_name,
            uuid::Uuid::new_v4()
        ))
    }

    #[test]
    fn csv_header_written_once_across_appends() {
        let dir = temp_export_dir("append");
        let path = dir.join("rankings.csv");
        let summary = summarize(&sample_observations());

        assert_eq!(export_csv(&summary, &path).unwrap(), 6);
        assert_eq!(export_csv(&summary, &path).unwrap(), 6);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("timestamp,rank,title").count(), 1);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .unwrap();
        let rows: Vec<RankingRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[5].rank, 6);
        assert_eq!(rows[0].signal, "WATCH");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn csv_adds_headers_when_file_exists_but_is_empty() {
        let dir = temp_export_dir("empty_file");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rankings.csv");
        fs::write(&path, "").unwrap();

        export_csv(&summarize(&sample_observations()), &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("timestamp,rank,title"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn csv_keeps_infinite_ratio() {
        let dir = temp_export_dir("infinite");
        let path = dir.join("rankings.csv");
        let summary = summarize(&[MarketObservation::new("sure", 150.0, 100.0, 1, "")]);

        export_csv(&summary, &path).unwrap();
        let mut reader = ReaderBuilder::new().from_path(&path).unwrap();
        let row: RankingRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.risk_reward, f64::INFINITY);
        assert_eq!(row.signal, "BUY");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn json_export_contains_summary() {
        let dir = temp_export_dir("json");
        let path = dir.join("summary.json");
        let summary = summarize(&sample_observations());

        export_json(&summary, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.get("exported_at").is_some());
        assert_eq!(value["summary"]["alert_tier"], "NONE");
        assert_eq!(value["summary"]["ranked_results"].as_array().unwrap().len(), 6);

        fs::remove_dir_all(&dir).ok();
    }
}
