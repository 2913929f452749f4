//! CLI parser.

use clap::{Parser, Subcommand};
use push_storage::{FilterField, StorageError};

#[derive(Parser)]
#[command(name = "pushctl")]
#[command(about = "Push message information CLI: list, show, activity, count, warnings, cleanup", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List push message information for an application or a variant, one page at a time.
    List {
        /// Field to filter on: push-application or variant.
        #[arg(long, default_value = "push-application", value_parser = parse_filter_field)]
        by: FilterField,
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "0")]
        page: u32,
        #[arg(long, default_value = "25")]
        page_size: u32,
        /// Newest first.
        #[arg(long)]
        desc: bool,
    },
    /// Print one record, with its variant metrics, as JSON.
    Show { id: String },
    /// Most recent records across the owner's applications (all applications without --owner).
    Activity {
        #[arg(long)]
        owner: Option<String>,
        #[arg(short, long, default_value = "3")]
        limit: u32,
    },
    /// Count records for the owner's applications (all applications without --owner).
    Count {
        #[arg(long)]
        owner: Option<String>,
    },
    /// Variant ids with failed deliveries.
    Warnings {
        #[arg(long)]
        owner: Option<String>,
    },
    /// Delete records older than N days (PUSH_RETENTION_DAYS when omitted).
    Cleanup {
        #[arg(long)]
        days: Option<i64>,
    },
}

fn parse_filter_field(s: &str) -> Result<FilterField, String> {
    s.parse().map_err(|e: StorageError| e.to_string())
}
