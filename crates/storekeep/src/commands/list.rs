//! List command

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use serde::Serialize;
use storekeep_backup::{BackupEntry, SnapshotMetadata};
use tabled::{settings::Style, Table, Tabled};

use super::{CommandContext, GlobalOptions};
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Backup directory (defaults to the configured one)
    #[arg(short, long)]
    pub dir: Option<Utf8PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "Filename")]
    filename: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Records")]
    records: String,
    #[tabled(rename = "Database")]
    database: String,
}

impl From<&BackupEntry> for BackupRow {
    fn from(entry: &BackupEntry) -> Self {
        let file = entry.file();
        let (records, database) = match entry.metadata() {
            Some(metadata) => (
                metadata
                    .collections
                    .iter()
                    .map(|(_, n)| *n)
                    .sum::<usize>()
                    .to_string(),
                metadata.database.clone(),
            ),
            None => ("-".to_string(), "(unreadable)".to_string()),
        };

        Self {
            filename: file.filename.clone(),
            created: file.created.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            size: file.size_label.clone(),
            records,
            database,
        }
    }
}

#[derive(Serialize)]
struct BackupJson<'a> {
    filename: &'a str,
    path: &'a str,
    size_bytes: u64,
    created: String,
    metadata: Option<&'a SnapshotMetadata>,
}

fn render_json(entries: &[BackupEntry]) -> serde_json::Result<String> {
    let json: Vec<BackupJson<'_>> = entries
        .iter()
        .map(|entry| BackupJson {
            filename: entry.filename(),
            path: entry.path().as_str(),
            size_bytes: entry.file().size_bytes,
            created: entry.created().to_rfc3339(),
            metadata: entry.metadata(),
        })
        .collect();
    serde_json::to_string_pretty(&json)
}

pub async fn run(args: ListArgs, global: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::load(global)?;
    let dir = ctx.backup_dir(args.dir.as_deref());

    let entries = ctx
        .manager
        .list_backups(dir)
        .await
        .with_context(|| format!("Failed to list backups in {}", dir))?;

    if args.json {
        println!("{}", render_json(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info(&format!("No backups found in {}", dir));
        return Ok(());
    }

    let rows: Vec<BackupRow> = entries.iter().map(BackupRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    output::kv("Total", &entries.len().to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use storekeep_backup::{BackupFile, PerCollection};

    fn file() -> BackupFile {
        BackupFile {
            filename: "backup-2024-03-10T02-00-00-000Z.json".to_string(),
            path: Utf8PathBuf::from("backups/backup-2024-03-10T02-00-00-000Z.json"),
            size_bytes: 2048,
            size_label: "2.00 KB".to_string(),
            created: Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_row_sums_collection_counts() {
        let entry = BackupEntry::WithMetadata {
            file: file(),
            metadata: SnapshotMetadata {
                timestamp: "2024-03-10T02:00:00.000Z".to_string(),
                version: "1.0".to_string(),
                database: "storefront".to_string(),
                collections: PerCollection {
                    users: 2,
                    products: 5,
                    carts: 0,
                    orders: 0,
                    wishlists: 1,
                },
            },
        };

        let row = BackupRow::from(&entry);
        assert_eq!(row.records, "8");
        assert_eq!(row.database, "storefront");
        assert_eq!(row.created, "2024-03-10 02:00:00 UTC");
    }

    #[test]
    fn test_row_for_unparsed_entry() {
        let entry = BackupEntry::Unparsed { file: file() };
        let row = BackupRow::from(&entry);
        assert_eq!(row.records, "-");
        assert_eq!(row.size, "2.00 KB");
    }

    #[test]
    fn test_json_output_parses() {
        let entries = vec![BackupEntry::Unparsed { file: file() }];
        let rendered = render_json(&entries).unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value[0]["filename"], "backup-2024-03-10T02-00-00-000Z.json");
        assert_eq!(value[0]["size_bytes"], 2048);
        assert!(value[0]["metadata"].is_null());
    }
}
