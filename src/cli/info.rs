//! info command: what the saved snapshot for a facts directory contains.

use std::fs;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use beannav::{load_snapshot, BeanError, BeanIndex, IndexSnapshot};

use super::args::InfoArgs;

pub fn cmd_info(args: InfoArgs) -> Result<(), BeanError> {
    let path = args.source.snapshot_path();
    let Some(snapshot) = load_snapshot(&path)? else {
        eprintln!(
            "No snapshot at {}. Use 'beannav index -f {}' to create one.",
            path.display(),
            args.source.facts
        );
        return Ok(());
    };
    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info_json(&snapshot, size, &path.display().to_string()))?);
        return Ok(());
    }

    let index = BeanIndex::from_snapshot(snapshot.clone());
    let stats = index.stats();
    println!(
        "[SNAPSHOT] {} -- v{}, {} beans, {} injection points, {} files, {:.1} KB, {:.1}h ago",
        path.display(),
        snapshot.version,
        stats.beans,
        stats.injection_points,
        stats.files,
        size as f64 / 1024.0,
        age_hours(snapshot.timestamp)
    );
    Ok(())
}

fn age_hours(timestamp: u64) -> f64 {
    let age_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
        .saturating_sub(timestamp);
    (age_secs as f64 / 3600.0 * 10.0).round() / 10.0
}

/// Snapshot summary as a JSON value.
pub fn info_json(snapshot: &IndexSnapshot, size: u64, filename: &str) -> serde_json::Value {
    let primaries = snapshot.beans.iter().filter(|b| b.is_primary).count();
    let factory = snapshot
        .beans
        .iter()
        .filter(|b| b.kind == beannav::BeanKind::FactoryMethod)
        .count();
    serde_json::json!({
        "snapshot": filename,
        "version": snapshot.version,
        "beans": snapshot.beans.len(),
        "primaryBeans": primaries,
        "factoryMethodBeans": factory,
        "injectionPoints": snapshot.injection_points.len(),
        "sizeKb": (size as f64 / 1024.0 * 10.0).round() / 10.0,
        "ageHours": age_hours(snapshot.timestamp),
    })
}
