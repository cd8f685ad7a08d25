//! 場次篩選：把上游回應依日期分桶到參考日期之後的 6 天。
//!
//! 只保留 `available_capacity > 0` 且日期字串完全等於視窗內某一天的場次，
//! 其他場次直接略過。同一醫院同一天的多筆場次不合併。

use crate::domain::model::{DateBucket, DistrictReport, RawCentersResponse, SlotEntry, WINDOW_DAYS};
use crate::utils::error::{NotifierError, Result};
use chrono::{Days, NaiveDate};

pub const DATE_FORMAT: &str = "%d-%m-%Y";

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| {
        NotifierError::InvalidDateError {
            value: value.to_string(),
            source,
        }
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 參考日期 +1 到 +6 天
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    dates: [NaiveDate; WINDOW_DAYS],
    labels: [String; WINDOW_DAYS],
}

impl DateWindow {
    pub fn following(reference: NaiveDate) -> Self {
        let dates: [NaiveDate; WINDOW_DAYS] =
            std::array::from_fn(|offset| reference + Days::new(offset as u64 + 1));
        let labels = dates.map(format_date);
        Self { dates, labels }
    }

    pub fn dates(&self) -> &[NaiveDate; WINDOW_DAYS] {
        &self.dates
    }

    pub fn labels(&self) -> &[String; WINDOW_DAYS] {
        &self.labels
    }

    /// 以字串比對找出日期所在的桶
    pub fn position(&self, date: &str) -> Option<usize> {
        self.labels.iter().position(|label| label == date)
    }

    /// 每個日期各自一個獨立的空桶
    fn empty_buckets(&self) -> [DateBucket; WINDOW_DAYS] {
        std::array::from_fn(|i| DateBucket {
            date: self.labels[i].clone(),
            entries: Vec::new(),
        })
    }
}

pub fn maps_location(block_name: &str, district_name: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("api", "1")
        .append_pair("query", &format!("{}, {}", block_name, district_name))
        .finish();
    format!("{}?{}", MAPS_SEARCH_BASE, query)
}

pub fn filter_sessions(raw: &RawCentersResponse, reference_date: &str) -> Result<DistrictReport> {
    let reference = parse_date(reference_date)?;

    let first_center = raw.centers.first().ok_or(NotifierError::EmptyCentersError)?;
    let district_name = first_center.district_name.clone();

    let window = DateWindow::following(reference);
    let mut buckets = window.empty_buckets();
    let mut dropped = 0usize;

    for center in &raw.centers {
        for session in &center.sessions {
            let position = if session.available_capacity > 0 {
                window.position(&session.date)
            } else {
                None
            };

            let Some(index) = position else {
                dropped += 1;
                continue;
            };

            buckets[index].entries.push(SlotEntry {
                hospital_name: center.block_name.clone(),
                age_limit: session.min_age_limit,
                available_capacity: session.available_capacity,
                slots: session.slots.clone(),
                location: maps_location(&center.block_name, &center.district_name),
            });
        }
    }

    let report = DistrictReport {
        district_name,
        buckets,
    };
    tracing::debug!(
        "Filtered {} centers for {}: {} open sessions, {} dropped",
        raw.centers.len(),
        report.district_name,
        report.total_entries(),
        dropped
    );

    Ok(report)
}
