//! Demo plant fixture for the CLI

use serde_json::json;

use pulse_data::MemorySource;

/// A small in-memory plant: a few assets, one live run, some downtime.
pub fn demo_source() -> MemorySource {
    MemorySource::new("demo-plant")
        .with_collection(
            "assets",
            vec![
                json!({"id": "A-12", "name": "Grinder 5", "area": "milling", "status": "up"}),
                json!({"id": "A-13", "name": "Grinder 7", "area": "milling", "status": "up"}),
                json!({"id": "A-20", "name": "Lathe 2", "area": "turning", "status": "down"}),
                json!({"id": "A-31", "name": "Packaging Line A", "area": "packaging", "status": "up"}),
            ],
        )
        .with_collection(
            "production_runs",
            vec![
                json!({"id": "R-101", "asset_id": "A-12", "product": "bearing race", "state": "running", "rate_per_hour": 420.0}),
                json!({"id": "R-102", "asset_id": "A-31", "product": "retail pack", "state": "starved", "rate_per_hour": 0.0}),
            ],
        )
        .with_collection(
            "downtime_events",
            vec![
                json!({"id": "D-1", "asset_id": "A-20", "reason": "tooling", "started_at": "2026-08-06T05:40:00Z", "minutes": 48.0}),
                json!({"id": "D-2", "asset_id": "A-12", "reason": "jam", "started_at": "2026-08-06T07:02:00Z", "minutes": 14.0}),
            ],
        )
        .with_collection(
            "shifts",
            vec![
                json!({"id": "S-1", "name": "Day", "crew": "Alpha", "starts": "06:00", "ends": "14:00"}),
                json!({"id": "S-2", "name": "Swing", "crew": "Bravo", "starts": "14:00", "ends": "22:00"}),
                json!({"id": "S-3", "name": "Night", "crew": "Charlie", "starts": "22:00", "ends": "06:00"}),
            ],
        )
}
