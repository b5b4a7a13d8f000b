//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api::{self, RecordJson, ResponsesInput, ResultJson, SchemaResponse};
use crate::config::{AppConfig, Backend};
use maturogram_core::primitives::LUSTRUM_COUNT;
use maturogram_core::query::{RecordQuery, SortColumn, SortDirection};
use maturogram_core::{
    HeaderStyle, MaturityRecord, MaturityResult, MaturogramError, RecordId, checksum,
    compute_blake3_hash, verify_checksum,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a responses file (1 MiB). A full checklist is a few KiB.
const MAX_RESPONSES_FILE_SIZE: u64 = 1024 * 1024;

fn validate_file_size(path: &Path, max_size: u64) -> Result<(), MaturogramError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| MaturogramError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(MaturogramError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path and make sure it is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, MaturogramError> {
    let canonical = path.canonicalize().map_err(|e| {
        MaturogramError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(MaturogramError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path against its (existing) parent directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, MaturogramError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        MaturogramError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(MaturogramError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| MaturogramError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn print_result(result: &MaturityResult) {
    let o = &result.observed;
    let p = &result.predicted;
    println!("            Lustrum  Decade  Generation  Life Stage  Maturogram");
    println!(
        "Observed  {:>9} {:>7} {:>11} {:>11} {:>11}",
        o.lustrum, o.decade, o.generation, o.life_stage, o.value
    );
    println!(
        "Predicted {:>9} {:>7} {:>11} {:>11} {:>11}",
        p.lustrum, p.decade, p.generation, p.life_stage, p.value
    );
    println!();
    println!("Percentage: {}%", result.percentage);
    println!("Zone:       {}", result.zone.label());
}

fn print_record(record: &MaturityRecord) {
    println!("Record #{}", record.id);
    println!("Age: {}", record.age);
    let totals: Vec<String> = record.totals.iter().map(|t| t.to_string()).collect();
    println!("Lustrum totals: {}", totals.join(","));
    println!();
    print_result(&record.result);
}

/// Parse `"1,2,3,..."` into exactly 24 totals.
pub fn parse_totals(text: &str) -> Result<Vec<i64>, MaturogramError> {
    let totals = text
        .split(',')
        .map(|part| {
            part.trim().parse::<i64>().map_err(|_| {
                MaturogramError::InvalidInput(format!("'{}' is not an integer total", part.trim()))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if totals.len() != LUSTRUM_COUNT {
        return Err(MaturogramError::InvalidInput(format!(
            "expected {} totals, got {}",
            LUSTRUM_COUNT,
            totals.len()
        )));
    }
    Ok(totals)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), MaturogramError> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let archive = config.open_archive()?;

    println!("Maturogram Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", host);
    println!("  Port:       {}", port);
    println!("  Backend:    {}", config.backend.as_str());
    println!("  Database:   {:?}", config.database);
    println!("  Age policy: {}", config.age_policy.as_str());
    println!();
    println!("Endpoints:");
    println!("  GET    /health        - Health check");
    println!("  GET    /checklist     - Questionnaire");
    println!("  POST   /score         - Score lustrum totals");
    println!("  POST   /submit        - Score and store a checklist");
    println!("  GET    /status        - Archive status (admin)");
    println!("  GET    /records       - List records (admin)");
    println!("  GET    /records/{{id}}  - Show record (admin)");
    println!("  DELETE /records/{{id}}  - Delete record (admin)");
    println!("  POST   /records/undo  - Undo last delete (admin)");
    println!("  POST   /export        - CSV export (admin)");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, archive).await
}

// =============================================================================
// SCORE / SUBMIT COMMANDS
// =============================================================================

/// Score totals without storing anything.
pub fn cmd_score(
    config: &AppConfig,
    json_mode: bool,
    age: i64,
    totals: &str,
) -> Result<(), MaturogramError> {
    let totals = parse_totals(totals)?;
    let result = config.scorer().compute(age, &totals)?;

    if json_mode {
        print_json(&ResultJson::from(&result));
    } else {
        print_result(&result);
    }
    Ok(())
}

/// Score a checklist read from a JSON file and store it.
pub fn cmd_submit(
    config: &AppConfig,
    json_mode: bool,
    age: i64,
    file: &Path,
) -> Result<(), MaturogramError> {
    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_RESPONSES_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| MaturogramError::IoError(format!("Read file: {}", e)))?;
    let input: ResponsesInput = serde_json::from_slice(&contents)
        .map_err(|e| MaturogramError::InvalidInput(format!("Invalid responses file: {}", e)))?;
    let responses = input.into_response()?;

    let mut archive = config.open_archive()?;
    let record = archive.submit(age, responses)?;
    tracing::info!(id = record.id.0, "Stored checklist from {:?}", file);

    if json_mode {
        print_json(&RecordJson::from(&record));
    } else {
        print_record(&record);
    }
    Ok(())
}

// =============================================================================
// RECORD COMMANDS
// =============================================================================

/// List records.
pub fn cmd_list(
    config: &AppConfig,
    json_mode: bool,
    search: Option<String>,
    order_by: &str,
    desc: bool,
    start: usize,
    length: Option<usize>,
) -> Result<(), MaturogramError> {
    let query = RecordQuery {
        draw: 0,
        start,
        length,
        search,
        order_by: order_by.parse::<SortColumn>()?,
        direction: if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    };

    let archive = config.open_archive()?;
    let page = archive.query(&query)?;

    if json_mode {
        let output = serde_json::json!({
            "records_total": page.records_total,
            "records_filtered": page.records_filtered,
            "data": page.data.iter().map(RecordJson::from).collect::<Vec<_>>(),
        });
        print_json(&output);
        return Ok(());
    }

    println!(
        "{:>6}  {:>4}  {:>10}  {:>10}  {:>10}  Zone",
        "S/N", "Age", "Observed", "Predicted", "Percent"
    );
    for record in &page.data {
        println!(
            "{:>6}  {:>4}  {:>10}  {:>10}  {:>10}  {}",
            record.id,
            record.age,
            record.result.observed.value,
            record.result.predicted.value,
            record.result.percentage,
            record.result.zone.label()
        );
    }
    println!();
    println!(
        "Showing {} of {} records ({} total)",
        page.data.len(),
        page.records_filtered,
        page.records_total
    );
    Ok(())
}

/// Show one record.
pub fn cmd_show(config: &AppConfig, json_mode: bool, id: u64) -> Result<(), MaturogramError> {
    let archive = config.open_archive()?;
    let record = archive
        .get(RecordId(id))?
        .ok_or(MaturogramError::RecordNotFound(RecordId(id)))?;

    if json_mode {
        print_json(&RecordJson::from(&record));
    } else {
        print_record(&record);
    }
    Ok(())
}

/// Delete one record.
pub fn cmd_delete(config: &AppConfig, json_mode: bool, id: u64) -> Result<(), MaturogramError> {
    let mut archive = config.open_archive()?;
    let record = archive.delete(RecordId(id))?;
    tracing::info!(id, "Record deleted");

    if json_mode {
        print_json(&serde_json::json!({ "deleted": record.id.0 }));
    } else {
        println!("Deleted record #{} (undo with `maturogram undo`)", record.id);
    }
    Ok(())
}

/// Restore the most recently deleted record.
pub fn cmd_undo(config: &AppConfig, json_mode: bool) -> Result<(), MaturogramError> {
    let mut archive = config.open_archive()?;
    let record = archive.undo_delete()?;
    tracing::info!(id = record.id.0, "Record restored");

    if json_mode {
        print_json(&serde_json::json!({ "restored": record.id.0 }));
    } else {
        println!("Restored record #{}", record.id);
    }
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export all records.
pub fn cmd_export(
    config: &AppConfig,
    output: &Path,
    format: &str,
    labels: bool,
) -> Result<(), MaturogramError> {
    let validated_output = validate_output_path(output)?;
    let archive = config.open_archive()?;

    let (data, record_count) = match format {
        "csv" => {
            let style = if labels {
                HeaderStyle::Labels
            } else {
                HeaderStyle::Keys
            };
            let export = archive.export_csv(style)?;
            (export.data.into_bytes(), export.record_count)
        }
        "json" => {
            let records = archive.records()?;
            let json: Vec<RecordJson> = records.iter().map(RecordJson::from).collect();
            let data = serde_json::to_vec_pretty(&json)
                .map_err(|e| MaturogramError::SerializationError(e.to_string()))?;
            (data, records.len())
        }
        _ => {
            return Err(MaturogramError::InvalidInput(format!(
                "Unknown format: {}. Use: csv, json",
                format
            )));
        }
    };

    let sum = write_verified(&validated_output, &data)?;

    println!(
        "Exported {} records ({} bytes) to {:?}",
        record_count,
        data.len(),
        validated_output
    );
    println!("Checksum: {}", sum);
    println!("BLAKE3:   {}", compute_blake3_hash(&data));
    Ok(())
}

/// Write `data` and read it back, failing if the file does not match.
///
/// Returns the FNV-1a checksum of the written bytes.
pub fn write_verified(path: &Path, data: &[u8]) -> Result<u64, MaturogramError> {
    let expected = checksum(data);
    std::fs::write(path, data)
        .map_err(|e| MaturogramError::IoError(format!("Write file: {}", e)))?;

    let written =
        std::fs::read(path).map_err(|e| MaturogramError::IoError(format!("Read back: {}", e)))?;
    if !verify_checksum(&written, expected) {
        return Err(MaturogramError::IoError(format!(
            "Checksum mismatch after writing {:?}",
            path
        )));
    }
    Ok(expected)
}

// =============================================================================
// STATUS / INIT / SCHEMA COMMANDS
// =============================================================================

/// Show archive status.
pub fn cmd_status(config: &AppConfig, json_mode: bool) -> Result<(), MaturogramError> {
    let archive = config.open_archive()?;
    let record_count = archive.record_count()?;
    let undo_depth = archive.undo_depth()?;

    if json_mode {
        print_json(&serde_json::json!({
            "database": config.database.to_string_lossy(),
            "backend": config.backend.as_str(),
            "age_policy": config.age_policy.as_str(),
            "record_count": record_count,
            "undo_depth": undo_depth,
        }));
        return Ok(());
    }

    println!("Maturogram Status");
    println!("=================");
    println!("Database:   {:?}", config.database);
    println!("Backend:    {}", config.backend.as_str());
    println!("Age policy: {}", config.age_policy.as_str());
    println!();
    println!("Records:    {}", record_count);
    println!("Undoable:   {}", undo_depth);
    Ok(())
}

/// Initialize a new database.
pub fn cmd_init(config: &AppConfig, force: bool) -> Result<(), MaturogramError> {
    match config.backend {
        Backend::Redb => {
            let db_path = &config.database;
            if db_path.exists() {
                if !force {
                    return Err(MaturogramError::InvalidInput(
                        "Database already exists. Use --force to overwrite.".to_string(),
                    ));
                }
                std::fs::remove_file(db_path)
                    .map_err(|e| MaturogramError::IoError(format!("Remove db: {}", e)))?;
            }
            let _archive = config.open_archive()?;
            println!("Initialized new redb database at {:?}", db_path);
        }
        Backend::Memory => {
            println!("Memory backend needs no initialization");
        }
    }
    Ok(())
}

/// Reclaim free space in the database file.
pub fn cmd_compact(config: &AppConfig, json_mode: bool) -> Result<(), MaturogramError> {
    let mut archive = config.open_archive()?;
    let compacted = archive.compact()?;

    if json_mode {
        print_json(&serde_json::json!({
            "success": true,
            "compacted": compacted,
        }));
    } else if compacted {
        println!("Compacted {:?}", config.database);
    } else {
        println!("Memory backend has nothing to compact");
    }
    Ok(())
}

/// Print the questionnaire.
pub fn cmd_schema(json_mode: bool) -> Result<(), MaturogramError> {
    let schema = SchemaResponse::build();

    if json_mode {
        print_json(&schema);
        return Ok(());
    }

    for group in &schema.lustrums {
        println!("{}. {}", group.number, group.title);
        for item in &group.items {
            println!("   [{}] {}", item.key, item.prompt);
        }
        println!();
    }
    println!("Answer each item 0..={}.", schema.max_item_score);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
