use std::io::Write;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use csv::WriterBuilder;

use crate::error::{GridError, Result};
use crate::grid::coords::Grid;
use crate::grid::slot_utils::SLOT_MINUTES;
use crate::grid::types::{ChosenSlot, EventConfig, EventMode, Responses};

const CALENDAR_BASE_URL: &str = "https://calendar.google.com/calendar/render";

/// Writes all responses as CSV: a header of slot keys, then one `1`/`0`
/// row per respondent
pub fn export_responses_csv<W: Write>(writer: W, grid: &Grid, responses: &Responses) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);

    let keys: Vec<String> = grid.keys().collect();
    let mut header = Vec::with_capacity(keys.len() + 1);
    header.push("respondent");
    header.extend(keys.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (name, availability) in responses {
        let mut row = Vec::with_capacity(keys.len() + 1);
        row.push(name.as_str());
        row.extend(
            keys.iter()
                .map(|key| if availability.is_available(key) { "1" } else { "0" }),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Date of a chosen column. Weekly columns resolve to the first matching
/// weekday on or after `reference`.
pub fn column_date(mode: EventMode, column: &str, reference: NaiveDate) -> Result<NaiveDate> {
    match mode {
        EventMode::Specific => NaiveDate::parse_from_str(column, "%Y-%m-%d")
            .map_err(|_| GridError::InvalidEvent(format!("Invalid date: {}", column))),
        EventMode::Weekly => {
            let weekday = Weekday::from_str(column)
                .map_err(|_| GridError::InvalidEvent(format!("Invalid weekday: {}", column)))?;
            let offset = (7 + weekday.num_days_from_sunday()
                - reference.weekday().num_days_from_sunday())
                % 7;
            Ok(reference + Duration::days(i64::from(offset)))
        }
    }
}

fn format_calendar_time(time: NaiveDateTime) -> String {
    time.format("%Y%m%dT%H%M%S").to_string()
}

/// Builds a calendar template link for the chosen slot (one slot long).
/// Weekly events get a weekly recurrence rule.
pub fn calendar_link(config: &EventConfig, chosen: &ChosenSlot, reference: NaiveDate) -> Result<String> {
    let date = column_date(config.mode, &chosen.column, reference)?;
    let time = NaiveTime::parse_from_str(&chosen.time, "%H:%M")
        .map_err(|_| GridError::InvalidTime(chosen.time.clone()))?;

    let start = date.and_time(time);
    let end = start + Duration::minutes(i64::from(SLOT_MINUTES));
    let dates = format!("{}/{}", format_calendar_time(start), format_calendar_time(end));

    let mut url = format!(
        "{}?action=TEMPLATE&text={}&dates={}",
        CALENDAR_BASE_URL,
        urlencoding::encode(&config.name),
        urlencoding::encode(&dates),
    );
    if config.mode == EventMode::Weekly {
        url.push_str("&recur=");
        url.push_str(&urlencoding::encode("RRULE:FREQ=WEEKLY"));
    }
    Ok(url)
}
