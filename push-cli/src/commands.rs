//! Subcommand handlers. Each returns the text to print so it can be tested without a terminal.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use push_storage::{PushMessageInformation, PushMessageInformationDao, RecordFilter, SortOrder};
use tracing::info;

pub async fn list(
    dao: &dyn PushMessageInformationDao,
    filter: &RecordFilter,
    order: SortOrder,
    page: u32,
    page_size: u32,
) -> Result<String> {
    let result = dao
        .find_page(filter, order, page, page_size)
        .await
        .with_context(|| format!("List records for {} '{}'", filter.field, filter.value))?;

    if result.records.is_empty() {
        return Ok(format!(
            "No records on page {} ({} '{}' has {} in total).",
            page, filter.field, filter.value, result.total_count
        ));
    }

    let mut out = render_records(&result.records);
    out.push_str(&format!(
        "\nPage {}: {} of {} record(s)\n",
        page,
        result.records.len(),
        result.total_count
    ));
    Ok(out)
}

pub async fn show(dao: &dyn PushMessageInformationDao, id: &str) -> Result<String> {
    match dao.find(id).await.context("Find record")? {
        Some(record) => serde_json::to_string_pretty(&record).context("Serialize record"),
        None => Ok(format!("No record with id {}.", id)),
    }
}

pub async fn activity(
    dao: &dyn PushMessageInformationDao,
    owner: Option<&str>,
    limit: u32,
) -> Result<String> {
    let records = dao
        .find_last_activity(owner, limit)
        .await
        .context("Query last activity")?;

    if records.is_empty() {
        return Ok("No activity.".to_string());
    }
    Ok(render_records(&records))
}

pub async fn count(dao: &dyn PushMessageInformationDao, owner: Option<&str>) -> Result<String> {
    let total = dao
        .count_for_applications(owner)
        .await
        .context("Count records")?;

    Ok(match owner {
        Some(login) => format!("{} push message(s) for applications of {}", total, login),
        None => format!("{} push message(s) for all applications", total),
    })
}

pub async fn warnings(dao: &dyn PushMessageInformationDao, owner: Option<&str>) -> Result<String> {
    let variant_ids = dao
        .find_variant_ids_with_warnings(owner)
        .await
        .context("Query variants with warnings")?;

    if variant_ids.is_empty() {
        return Ok("No variants with failed deliveries.".to_string());
    }
    Ok(variant_ids.join("\n"))
}

pub async fn cleanup(
    dao: &dyn PushMessageInformationDao,
    now: DateTime<Utc>,
    days: i64,
) -> Result<String> {
    if days < 0 {
        anyhow::bail!("--days must not be negative (got {})", days);
    }
    let oldest = TimeDelta::try_days(days)
        .and_then(|age| now.checked_sub_signed(age))
        .with_context(|| format!("--days {} is out of range", days))?;
    info!("Cleaning up push message information older than {}", oldest);

    let removed = dao
        .delete_older_than(oldest)
        .await
        .context("Delete outdated records")?;

    Ok(format!(
        "Deleted {} record(s) submitted before {}",
        removed,
        oldest.format("%Y-%m-%d %H:%M:%S")
    ))
}

fn render_records(records: &[PushMessageInformation]) -> String {
    let mut out = format!(
        "{:<36} {:<20} {:<24} {:>9} {:>8}\n",
        "id", "submit_date", "push_application_id", "receivers", "variants"
    );
    out.push_str(&"-".repeat(101));
    out.push('\n');

    for r in records {
        out.push_str(&format!(
            "{:<36} {:<20} {:<24} {:>9} {:>8}\n",
            r.id,
            r.submit_date.format("%Y-%m-%d %H:%M:%S"),
            r.push_application_id,
            r.total_receivers,
            r.variant_informations.len()
        ));
    }
    out
}
