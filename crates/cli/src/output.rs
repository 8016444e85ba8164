//! Human-readable rendering of workflow results.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use faredesk_core::api::{ReservationSegment, Traveller};
use faredesk_core::ReservationData;

pub fn render_reservation(data: &ReservationData) -> String {
    let mut out = String::new();

    out.push_str(&format!("Passengers ({}):\n", data.travellers.len()));
    for traveller in &data.travellers {
        out.push_str(&render_traveller(traveller));
        out.push('\n');
    }

    out.push_str(&format!("Segments ({}):\n", data.reservation_segments.len()));
    for segment in &data.reservation_segments {
        out.push_str(&render_segment(segment));
        out.push('\n');
    }

    out
}

fn render_traveller(traveller: &Traveller) -> String {
    format!(
        "  [{}] {} {}, born {}",
        traveller
            .traveller_identifier
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string()),
        traveller.last_name.as_deref().unwrap_or("-"),
        traveller.first_name.as_deref().unwrap_or("-"),
        traveller
            .birth_date
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string()),
    )
}

fn render_segment(segment: &ReservationSegment) -> String {
    format!(
        "  [{}] {}{} {} {} -> {}",
        segment
            .segment_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string()),
        segment.carrier_code.as_deref().unwrap_or("-"),
        segment.flight_number.as_deref().unwrap_or(""),
        segment
            .departure_date
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string()),
        segment.from_airport.as_deref().unwrap_or("-"),
        segment.to_airport.as_deref().unwrap_or("-"),
    )
}

/// Render a raw backend payload as pretty JSON.
pub fn render_payload(payload: &Map<String, Value>) -> String {
    serde_json::to_string_pretty(&Value::Object(payload.clone())).unwrap_or_default()
}

/// Reformat an ISO date (or datetime) for display; unknown shapes pass
/// through unchanged.
fn format_date(raw: &str) -> String {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%d.%m.%Y %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d.%m.%Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_plain() {
        assert_eq!(format_date("2026-09-01"), "01.09.2026");
    }

    #[test]
    fn test_format_date_with_time() {
        assert_eq!(format_date("2026-09-01T10:30:00"), "01.09.2026 10:30");
    }

    #[test]
    fn test_format_date_passthrough() {
        assert_eq!(format_date("tomorrow"), "tomorrow");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_render_traveller_with_gaps() {
        let traveller = Traveller {
            traveller_identifier: Some(1),
            last_name: Some("IVANOV".to_string()),
            first_name: None,
            birth_date: None,
        };
        assert_eq!(render_traveller(&traveller), "  [1] IVANOV -, born -");
    }

    #[test]
    fn test_render_segment() {
        let segment = ReservationSegment {
            segment_number: Some(2),
            carrier_code: Some("SU".to_string()),
            flight_number: Some("100".to_string()),
            departure_date: Some("2026-09-01".to_string()),
            arrival_date: Some("2026-09-01".to_string()),
            from_airport: Some("SVO".to_string()),
            to_airport: Some("LED".to_string()),
        };
        assert_eq!(render_segment(&segment), "  [2] SU100 01.09.2026 SVO -> LED");
    }

    #[test]
    fn test_render_payload_pretty_prints() {
        let mut payload = Map::new();
        payload.insert("currency".to_string(), Value::String("RUB".to_string()));
        let rendered = render_payload(&payload);
        assert!(rendered.contains("\"currency\": \"RUB\""));
    }
}
