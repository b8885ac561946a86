//! Nutriscan Status Tool
//!
//! Provides runtime status information about the nutriscan service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::AppConfig;

/// Label scanning instructions for AI assistants
pub const LABEL_INSTRUCTIONS: &str = r#"
# Nutriscan Label Scanning Instructions

This guide explains how to turn OCR text from a nutrition facts panel
(Indonesian "Informasi Nilai Gizi" or English "Nutrition Facts") into
serving and sugar figures.

## Overview

`scan_label_text` takes:
1. **text** - The OCR transcript of the whole label (required unless region texts are given)
2. **serving_size_text** (optional) - Transcript of the cropped "takaran saji" / "serving size" row
3. **servings_per_pack_text** (optional) - Transcript of the cropped "sajian per kemasan" row
4. **sugar_text** (optional) - Transcript of the cropped "gula" / "sugar" row

Region texts are tried first for their field; the whole-label text is the
fallback. Pass the OCR output unedited: the normalizer repairs the common
misreads itself (a unit `g` read as the digit `9`, `sajian/kemasan` written
with a slash).

---

## What You Get Back

| Field | Meaning | When not found |
|---|---|---|
| `serving_size_gram` | Grams (or ml) per serving | 0 |
| `servings_per_pack` | Servings in the package | 1 |
| `sugar_per_serving_gram` | Sugar per serving in grams | derived from per-pack, else 0 |
| `sugar_per_pack_gram` | Sugar per package in grams | per-serving x servings |
| `provenance` | Per field: `region`, `global`, `derived`, `guessed` or `absent` | |
| `debug` | The region texts as received, plus detector boxes and per-engine text for image scans | |

Gram values are rounded to 2 decimal places by default.

**Check `provenance` before trusting a value.** A field reported as `absent`
carries the default (0 or 1), not a reading from the label.

---

## Tips

- If a figure looks wrong, call `normalize_label_text` to see exactly what
  the extractor read.
- Sodium ("natrium", "garam") values are never taken as sugar.
- Milligram sugar values are converted to grams.
- `product_name` is never extracted; ask the user for it.

---

## Example

**Input text:**
```
INFORMASI NILAI GIZI
Takaran saji 209
4 Sajian/Kemasan
Gula total 9 9
Natrium 95 mg
```

**Result:** serving size 20 g, 4 servings, 9 g sugar per serving, 36 g sugar per pack.
"#;

/// Runtime status of the nutriscan service
#[derive(Debug, Clone, Serialize)]
pub struct NutriscanStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Active configuration
    pub config: AppConfig,

    /// Process information
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    config: AppConfig,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(config: AppConfig) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            config,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> NutriscanStatus {
        let build_info = BuildInfo::current();

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriscanStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            config: self.config.clone(),
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_process_and_config() {
        let tracker = StatusTracker::new(AppConfig::default());
        let status = tracker.get_status();
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.config, AppConfig::default());
        assert!(!status.version.is_empty());
        assert!(status.started_at <= Utc::now());
    }

    #[test]
    fn test_instructions_name_the_tools() {
        assert!(LABEL_INSTRUCTIONS.contains("scan_label_text"));
        assert!(LABEL_INSTRUCTIONS.contains("normalize_label_text"));
    }
}
