use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::model::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Title,
    Start,
    End,
    Category,
}

/// Try parsing a timestamp with several common formats. Dates without a time
/// are taken as midnight UTC.
fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%d/%m/%Y %H:%M", "%d.%m.%Y %H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t.and_utc());
        }
    }
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN).and_utc());
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

fn header_to_col(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "id" | "key" | "uuid" => Some(Column::Id),
        "title" | "name" | "label" | "task" | "item" | "activity" => Some(Column::Title),
        "start" | "startdate" | "starttime" | "from" | "begin" => Some(Column::Start),
        "end" | "enddate" | "endtime" | "to" | "finish" | "until" => Some(Column::End),
        "category" | "type" | "group" | "lane" => Some(Column::Category),
        _ => None,
    }
}

/// Import items from a CSV file.
///
/// Returns `(items, skipped_count)` on success.
pub fn import_csv(path: &Path) -> Result<(Vec<Item>, usize), AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::from_io(path, e))?;
    parse_csv(&content)
}

/// Parse CSV text into items. Headers are matched flexibly and the delimiter
/// (comma, semicolon, tab) is auto-detected from the first line.
pub fn parse_csv(content: &str) -> Result<(Vec<Item>, usize), AppError> {
    let first_line = content.lines().next().unwrap_or("");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(first_line))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::InvalidFormat {
            path: None,
            message: format!("Failed to read CSV headers: {}", e),
            line: Some(1),
            column: None,
        })?
        .clone();
    let col_map: Vec<Option<Column>> = headers.iter().map(header_to_col).collect();

    let has = |c: Column| col_map.contains(&Some(c));
    if !has(Column::Title) || !has(Column::Start) || !has(Column::End) {
        return Err(AppError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut items = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping CSV row {}: {}", row, e);
                skipped += 1;
                continue;
            }
        };

        let field = |col: Column| {
            col_map
                .iter()
                .position(|c| *c == Some(col))
                .and_then(|idx| record.get(idx))
                .filter(|s| !s.is_empty())
        };

        let Some(title) = field(Column::Title) else {
            skipped += 1;
            continue;
        };
        let Some(start) = field(Column::Start).and_then(parse_instant) else {
            log::warn!("skipping row {}: invalid start '{}'", row, field(Column::Start).unwrap_or(""));
            skipped += 1;
            continue;
        };
        let Some(end) = field(Column::End).and_then(parse_instant) else {
            log::warn!("skipping row {}: invalid end '{}'", row, field(Column::End).unwrap_or(""));
            skipped += 1;
            continue;
        };

        let mut item = Item::new(title, start, end);
        if let Some(id) = field(Column::Id) {
            match Uuid::parse_str(id) {
                Ok(id) => item.id = id,
                Err(_) => log::debug!("row {}: id '{}' is not a UUID, generated a new one", row, id),
            }
        }
        item.category = field(Column::Category).map(str::to_string);
        items.push(item);
    }

    if items.is_empty() {
        return Err(AppError::NoItems { skipped });
    }
    log::info!("imported {} items from CSV ({} skipped)", items.len(), skipped);
    Ok((items, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn test_parse_instant_formats() {
        let noon = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(parse_instant("2024-03-05T12:00:00Z"), Some(noon));
        assert_eq!(parse_instant("2024-03-05T14:00:00+02:00"), Some(noon));
        assert_eq!(parse_instant("2024-03-05 12:00"), Some(noon));
        assert_eq!(parse_instant("05.03.2024 12:00"), Some(noon));
        assert_eq!(
            parse_instant("05/03/2024"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_instant("yesterday"), None);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
    }

    #[test]
    fn test_parse_semicolon_csv_with_flexible_headers() {
        let csv = "Name;Start Date;End Date;Type\n\
                   Design;2024-01-01;2024-01-05;dev\n\
                   Broken;not a date;2024-01-05;dev\n\
                   Review;2024-01-06 09:00;2024-01-06 11:30;\n";
        let (items, skipped) = parse_csv(csv).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(skipped, 1);
        assert_eq!(items[0].title, "Design");
        assert_eq!(items[0].category.as_deref(), Some("dev"));
        assert_eq!(items[0].duration(), TimeDelta::days(4));
        assert_eq!(items[1].category, None);
        assert_eq!(items[1].duration(), TimeDelta::minutes(150));
    }

    #[test]
    fn test_parse_keeps_uuid_ids() {
        let id = Uuid::new_v4();
        let csv = format!("id,title,start,end\n{},A,2024-01-01,2024-01-02\nx,B,2024-01-01,2024-01-02\n", id);
        let (items, _) = parse_csv(&csv).unwrap();
        assert_eq!(items[0].id, id);
        assert_ne!(items[1].id, id);
    }

    #[test]
    fn test_missing_columns() {
        let err = parse_csv("title,when\nA,2024-01-01\n").unwrap_err();
        match err {
            AppError::MissingColumns { found } => assert_eq!(found, vec!["title", "when"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_no_valid_rows() {
        let err = parse_csv("title,start,end\nA,bad,bad\n").unwrap_err();
        assert!(matches!(err, AppError::NoItems { skipped: 1 }));
    }
}
