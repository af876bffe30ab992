//! Serde adapters for the persisted blob's wire formats.
//!
//! Times of day travel as `"HH:MM"`, weekdays as integers counted from
//! Sunday (0) to Saturday (6), and optional references may arrive as empty
//! strings which are read back as absent.

use chrono::{NaiveTime, Weekday};

/// Converts a Sunday-based index (0 = Sunday … 6 = Saturday) to a weekday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Parses `"HH:MM"`, also accepting `"HH:MM:SS"`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(raw, "%H:%M").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

pub(crate) mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(D::Error::custom)
    }
}

pub(crate) mod option_hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_some(&time.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_time(&raw)
                .map(Some)
                .map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}

pub(crate) mod weekday_index {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(day.num_days_from_sunday() as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let index = u8::deserialize(deserializer)?;
        super::weekday_from_index(index)
            .ok_or_else(|| D::Error::custom(format!("day of week out of range: {}", index)))
    }
}

pub(crate) mod optional_id {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.filter(|id| !id.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Slot {
        #[serde(with = "weekday_index")]
        day: Weekday,
        #[serde(with = "hh_mm")]
        start: NaiveTime,
        #[serde(default, with = "option_hh_mm")]
        end: Option<NaiveTime>,
        #[serde(default, deserialize_with = "optional_id::deserialize")]
        owner: Option<String>,
    }

    #[test]
    fn test_weekday_index_is_sunday_based() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(1), Some(Weekday::Mon));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
    }

    #[test]
    fn test_slot_serializes_to_wire_format() {
        let slot = Slot {
            day: Weekday::Wed,
            start: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end: Some(NaiveTime::from_hms_opt(19, 30, 0).unwrap()),
            owner: None,
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["day"], 3);
        assert_eq!(json["start"], "18:00");
        assert_eq!(json["end"], "19:30");
    }

    #[test]
    fn test_empty_strings_read_as_absent() {
        let json = r#"{"day": 0, "start": "08:15", "end": "", "owner": ""}"#;
        let slot: Slot = serde_json::from_str(json).unwrap();
        assert_eq!(slot.day, Weekday::Sun);
        assert_eq!(slot.end, None);
        assert_eq!(slot.owner, None);
    }

    #[test]
    fn test_seconds_are_accepted() {
        assert_eq!(
            parse_time("07:05:00").unwrap(),
            NaiveTime::from_hms_opt(7, 5, 0).unwrap()
        );
    }

    #[test]
    fn test_out_of_range_weekday_is_rejected() {
        let json = r#"{"day": 9, "start": "08:15"}"#;
        assert!(serde_json::from_str::<Slot>(json).is_err());
    }
}
