use crate::domain::model::{DistrictReport, TabularDocument};
use crate::utils::error::Result;

pub const COLUMN_HEADERS: [&str; 5] = [
    "Hospital Name",
    "Age Limit",
    "No of Slots Available",
    "Slot Timings",
    "Map Location",
];

const SEPARATOR_ROWS: usize = 2;

/// 依日期順序輸出：日期列、欄位標題、每筆場次、兩列空白
pub fn render(report: &DistrictReport) -> TabularDocument {
    let mut rows = Vec::new();

    for bucket in &report.buckets {
        rows.push(vec![format!("Date: {}", bucket.date)]);
        rows.push(COLUMN_HEADERS.iter().map(|h| h.to_string()).collect());

        for entry in &bucket.entries {
            rows.push(vec![
                entry.hospital_name.clone(),
                entry.age_limit.to_string(),
                entry.available_capacity.to_string(),
                entry.slots.join(", "),
                entry.location.clone(),
            ]);
        }

        for _ in 0..SEPARATOR_ROWS {
            rows.push(Vec::new());
        }
    }

    TabularDocument { rows }
}

impl TabularDocument {
    /// 序列化為 CSV，空白列輸出為空行
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut builder = csv::WriterBuilder::new();
        builder.flexible(true).terminator(csv::Terminator::CRLF);

        let mut out = Vec::new();
        for row in &self.rows {
            if row.is_empty() {
                out.extend_from_slice(b"\r\n");
                continue;
            }
            let mut writer = builder.from_writer(&mut out);
            writer.write_record(row)?;
            writer.flush()?;
        }

        Ok(out)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::DateWindow;
    use crate::domain::model::{DateBucket, SlotEntry, WINDOW_DAYS};
    use chrono::NaiveDate;

    fn report_with(entries_per_day: [Vec<SlotEntry>; WINDOW_DAYS]) -> DistrictReport {
        let window = DateWindow::following(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        let mut entries_per_day = entries_per_day.into_iter();
        DistrictReport {
            district_name: "Pune".to_string(),
            buckets: std::array::from_fn(|i| DateBucket {
                date: window.labels()[i].clone(),
                entries: entries_per_day.next().unwrap_or_default(),
            }),
        }
    }

    fn entry(name: &str) -> SlotEntry {
        SlotEntry {
            hospital_name: name.to_string(),
            age_limit: 45,
            available_capacity: 8,
            slots: vec!["09:00AM-11:00AM".to_string(), "11:00AM-01:00PM".to_string()],
            location: "https://www.google.com/maps/search/?api=1&query=Haveli%2C+Pune"
                .to_string(),
        }
    }

    #[test]
    fn test_empty_report_keeps_every_section() {
        let document = render(&report_with(Default::default()));

        // 每天：日期列 + 標題列 + 兩列空白
        assert_eq!(document.row_count(), WINDOW_DAYS * 4);
        assert_eq!(document.rows[0], vec!["Date: 20-10-2026".to_string()]);
        assert_eq!(document.rows[1], COLUMN_HEADERS.map(String::from).to_vec());
        assert!(document.rows[2].is_empty());
        assert!(document.rows[3].is_empty());
        assert_eq!(document.rows[20], vec!["Date: 25-10-2026".to_string()]);
    }

    #[test]
    fn test_entries_follow_insertion_order() {
        let mut days: [Vec<SlotEntry>; WINDOW_DAYS] = Default::default();
        days[1] = vec![entry("Mulshi"), entry("Haveli")];
        let document = render(&report_with(days));

        assert_eq!(document.row_count(), WINDOW_DAYS * 4 + 2);
        assert_eq!(document.rows[4], vec!["Date: 21-10-2026".to_string()]);
        assert_eq!(document.rows[6][0], "Mulshi");
        assert_eq!(document.rows[7][0], "Haveli");
        assert_eq!(document.rows[6][1], "45");
        assert_eq!(document.rows[6][2], "8");
        assert_eq!(document.rows[6][3], "09:00AM-11:00AM, 11:00AM-01:00PM");
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut days: [Vec<SlotEntry>; WINDOW_DAYS] = Default::default();
        days[0] = vec![entry("Haveli")];
        days[4] = vec![entry("Mulshi"), entry("Maval")];
        let report = report_with(days);

        let first = render(&report).to_csv().unwrap();
        let second = render(&report).to_csv().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_csv_layout() {
        let mut days: [Vec<SlotEntry>; WINDOW_DAYS] = Default::default();
        days[0] = vec![entry("Haveli")];
        let csv = String::from_utf8(render(&report_with(days)).to_csv().unwrap()).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[0], "Date: 20-10-2026");
        assert_eq!(
            lines[1],
            "Hospital Name,Age Limit,No of Slots Available,Slot Timings,Map Location"
        );
        assert_eq!(
            lines[2],
            "Haveli,45,8,\"09:00AM-11:00AM, 11:00AM-01:00PM\",https://www.google.com/maps/search/?api=1&query=Haveli%2C+Pune"
        );
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Date: 21-10-2026");
    }
}
