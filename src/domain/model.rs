use serde::{Deserialize, Serialize};
use std::fmt;

/// 前瞻天數：參考日期之後的 6 天
pub const WINDOW_DAYS: usize = 6;

/// 上游 calendarByDistrict 回應
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCentersResponse {
    pub centers: Vec<Center>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Center {
    pub block_name: String,
    pub district_name: String,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub date: String,
    pub min_age_limit: u32,
    pub available_capacity: i64,
    pub slots: Vec<String>,
}

/// 一筆可預約的場次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    pub hospital_name: String,
    pub age_limit: u32,
    pub available_capacity: i64,
    pub slots: Vec<String>,
    pub location: String,
}

/// 單一日期下的場次，日期字串為 DD-MM-YYYY
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBucket {
    pub date: String,
    pub entries: Vec<SlotEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictReport {
    pub district_name: String,
    pub buckets: [DateBucket; WINDOW_DAYS],
}

impl DistrictReport {
    pub fn total_entries(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.entries.len()).sum()
    }

    pub fn has_any_slots(&self) -> bool {
        self.total_entries() > 0
    }
}

/// 逐列的表格文件，每列為字串欄位
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularDocument {
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedArtifact {
    pub district_name: String,
    pub storage_key: String,
    pub public_url: String,
}

/// 單一地區在管道中的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Filtering,
    Rendering,
    Publishing,
    Notifying,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Filtering => "filtering",
            Stage::Rendering => "rendering",
            Stage::Publishing => "publishing",
            Stage::Notifying => "notifying",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistrictOutcome {
    Done {
        district_id: u32,
        artifact: PublishedArtifact,
        slot_count: usize,
    },
    Failed {
        district_id: u32,
        stage: Stage,
        reason: String,
    },
}

impl DistrictOutcome {
    pub fn district_id(&self) -> u32 {
        match self {
            DistrictOutcome::Done { district_id, .. } | DistrictOutcome::Failed { district_id, .. } => {
                *district_id
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, DistrictOutcome::Done { .. })
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            DistrictOutcome::Failed { stage, .. } => Some(*stage),
            DistrictOutcome::Done { .. } => None,
        }
    }
}

/// 一次批次執行的結果
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<DistrictOutcome>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_done()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn outcome_for(&self, district_id: u32) -> Option<&DistrictOutcome> {
        self.outcomes.iter().find(|o| o.district_id() == district_id)
    }
}
