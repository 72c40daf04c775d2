//! Test fixtures for integration testing
//!
//! Lays out a metadata file, recorded source payloads and a config pointing
//! at them inside a temporary directory.

use flight_calc::config::AppConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ORIGIN: &str = "Washington,DC";

pub const METADATA: &str = r#"[
    {
        "name": "Ronald Reagan Washington National",
        "shortcode": "DCA",
        "city": "Arlington",
        "state": "VA",
        "latitude": 38.8512,
        "longitude": -77.0402,
        "utc": "-5",
        "dst": true,
        "precheck": true,
        "checkpoints": [
            {"id": "1", "longname": "Terminal A", "shortname": "A"},
            {"id": "2", "longname": "Terminal B North", "shortname": "B North"},
            {"id": "3", "longname": "Terminal B South", "shortname": "B South"}
        ]
    },
    {
        "name": "Key West International",
        "shortcode": "EYW",
        "precheck": false,
        "checkpoints": [
            {"id": "1", "longname": "Main Checkpoint", "shortname": "Main"}
        ]
    },
    {
        "name": "Closed Field",
        "shortcode": "CLF",
        "precheck": false,
        "checkpoints": []
    }
]"#;

/// DCA feed, newest first; checkpoint 9 is not in the metadata
pub const DCA_WAIT_TIMES: &str = r#"{
    "WaitTimes": [
        {"CheckpointIndex": "1", "WaitTime": "2", "Created_Datetime": "2/3/2016 4:40:00 PM"},
        {"CheckpointIndex": "2", "WaitTime": "3", "Created_Datetime": "2/3/2016 4:40:00 PM"},
        {"CheckpointIndex": "3", "WaitTime": "1", "Created_Datetime": "2/3/2016 4:35:00 PM"},
        {"CheckpointIndex": "9", "WaitTime": "8", "Created_Datetime": "2/3/2016 4:30:00 PM"},
        {"CheckpointIndex": "1", "WaitTime": "4", "Created_Datetime": "2/3/2016 3:10:00 PM"},
        {"CheckpointIndex": "2", "WaitTime": "4", "Created_Datetime": "2/3/2016 2:55:00 PM"},
        {"CheckpointIndex": "1", "WaitTime": "1", "Created_Datetime": "2/3/2016 9:00:00 AM"}
    ]
}"#;

/// EYW feed with no readings at all
pub const EYW_WAIT_TIMES: &str = r#"{"WaitTimes": []}"#;

pub const DISTANCE_TO_DCA: &str = r#"{
    "destination_addresses": ["Ronald Reagan Washington National Airport, Arlington, VA 22202, USA"],
    "origin_addresses": ["Washington, DC, USA"],
    "rows": [{
        "elements": [{
            "distance": {"text": "4.9 mi", "value": 7886},
            "duration": {"text": "16 mins", "value": 1000},
            "status": "OK"
        }]
    }],
    "status": "OK"
}"#;

pub const DISTANCE_TO_EYW: &str = r#"{
    "destination_addresses": ["Key West, FL 33040, USA"],
    "origin_addresses": ["Washington, DC, USA"],
    "rows": [{"elements": [{"status": "ZERO_RESULTS"}]}],
    "status": "OK"
}"#;

/// A populated data directory and a config that points at it
pub struct Workspace {
    pub dir: TempDir,
    pub config: AppConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();

        write(&root.join("apcp.json"), METADATA);
        write(&root.join("snapshots/tsa-wait-times/dca.json"), DCA_WAIT_TIMES);
        write(&root.join("snapshots/tsa-wait-times/eyw.json"), EYW_WAIT_TIMES);
        write(&root.join("snapshots/tsa-wait-times/clf.json"), EYW_WAIT_TIMES);
        write(
            &root.join("snapshots/distance-matrix/washington-dc-to-dca.json"),
            DISTANCE_TO_DCA,
        );
        write(
            &root.join("snapshots/distance-matrix/washington-dc-to-eyw.json"),
            DISTANCE_TO_EYW,
        );

        let mut config = AppConfig::default();
        config.data.metadata_path = root.join("apcp.json");
        config.data.snapshot_dir = root.join("snapshots");
        config.data.cache_path = root.join("cache").join("cached_results.json");

        Self { dir, config }
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.config.data.snapshot_dir.clone()
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create fixture dir");
    }
    std::fs::write(path, contents).expect("write fixture");
}
