use crate::calendar::Zone;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

static MINUTES_FMT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
static SECONDS_FMT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
static SUBSECONDS_FMT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
static DATE_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// A booking as served by the CRM backend's `/api/bookings` endpoint.
///
/// Older exports name the venue directly; newer ones embed the care-home
/// contact.  Timestamps and fees are kept as sent and only parsed when
/// needed, so a single bad record never prevents the rest of the list from
/// loading.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct Booking {
    pub(crate) id: u64,
    #[serde(
        default,
        rename = "booking_from",
        alias = "start_time",
        alias = "startTime"
    )]
    pub(crate) start_time: Option<String>,
    #[serde(default, rename = "booking_to", alias = "end_time", alias = "endTime")]
    pub(crate) end_time: Option<String>,
    #[serde(default, alias = "venueName")]
    venue_name: Option<String>,
    #[serde(default)]
    contact: Option<Contact>,
    #[serde(default)]
    pub(crate) booking_type: Option<String>,
    #[serde(default)]
    pub(crate) more_info: Option<String>,
    #[serde(default, alias = "feeAgreed")]
    fee_agreed: Option<Value>,
    #[serde(default)]
    pub(crate) fee_status: FeeStatus,
}

impl Booking {
    pub(crate) fn venue_name(&self) -> &str {
        self.venue_name
            .as_deref()
            .or_else(|| self.contact.as_ref().map(|c| c.care_home_name.as_str()))
            .unwrap_or("Unknown")
    }

    pub(crate) fn telephone(&self) -> Option<&str> {
        self.contact.as_ref().and_then(|c| c.telephone.as_deref())
    }

    /// The start of the booking as a wall-clock time in `zone`
    pub(crate) fn local_start(&self, zone: Zone) -> Result<PrimitiveDateTime, TimestampError> {
        Timestamp::parse(self.start_time.as_deref()).map(|ts| ts.local(zone))
    }

    pub(crate) fn local_end(&self, zone: Zone) -> Result<PrimitiveDateTime, TimestampError> {
        Timestamp::parse(self.end_time.as_deref()).map(|ts| ts.local(zone))
    }

    /// The start of the booking exactly as the backend wrote it
    pub(crate) fn written_start(&self) -> Result<PrimitiveDateTime, TimestampError> {
        Timestamp::parse(self.start_time.as_deref()).map(Timestamp::as_written)
    }

    /// The agreed fee, or `None` if none was recorded or it cannot be read
    pub(crate) fn fee_agreed(&self) -> Option<Pence> {
        match Pence::from_json(self.fee_agreed.as_ref()?) {
            Ok(fee) => Some(fee),
            Err(e) => {
                log::debug!("ignoring fee of booking {}: {e}", self.id);
                None
            }
        }
    }

    /// The agreed fee, treating "no fee recorded" as zero
    pub(crate) fn fee(&self) -> Pence {
        self.fee_agreed().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct Contact {
    care_home_name: String,
    #[serde(default)]
    telephone: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
pub(crate) enum FeeStatus {
    #[default]
    Unpaid,
    Invoiced,
    Paid,
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeStatus::Unpaid => write!(f, "Unpaid"),
            FeeStatus::Invoiced => write!(f, "Invoiced"),
            FeeStatus::Paid => write!(f, "Paid"),
        }
    }
}

/// An amount of money in whole pence.  Credits are negative.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Pence(pub(crate) i64);

impl Pence {
    pub(crate) fn saturating_add(self, other: Pence) -> Pence {
        Pence(self.0.saturating_add(other.0))
    }

    /// Reads a fee sent either as a JSON number or as a decimal string.
    /// Both are rounded to the nearest penny the same way.
    fn from_json(raw: &Value) -> Result<Pence, FeeError> {
        let pounds = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        pounds
            .filter(|p| p.is_finite())
            .and_then(|p| Pence::parse_rounded(&format!("{p:.2}")))
            .ok_or_else(|| FeeError(raw.to_string()))
    }

    // `s` is a float formatted with exactly two decimal places
    fn parse_rounded(s: &str) -> Option<Pence> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = digits.split_once('.')?;
        let pence = whole
            .parse::<i64>()
            .ok()?
            .checked_mul(100)?
            .checked_add(frac.parse::<i64>().ok()?)?;
        Some(Pence(if negative { -pence } else { pence }))
    }
}

impl fmt::Display for Pence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}£{}.{:02}", abs / 100, abs % 100)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unreadable fee amount {0}")]
pub(crate) struct FeeError(String);

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum TimestampError {
    #[error("booking has no timestamp")]
    Missing,
    #[error("unrecognized timestamp {0:?}")]
    Malformed(String),
}

/// A backend timestamp, which may or may not carry a UTC offset
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Timestamp {
    /// Wall-clock time with no offset, which is what the backend stores and
    /// is already local
    Naive(PrimitiveDateTime),
    Offset(OffsetDateTime),
}

impl Timestamp {
    /// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS[.fff]]` (with `T` or a space),
    /// and a bare `YYYY-MM-DD`, which means local midnight
    pub(crate) fn parse(s: Option<&str>) -> Result<Timestamp, TimestampError> {
        let s = s.map(str::trim).unwrap_or_default();
        if s.is_empty() {
            return Err(TimestampError::Missing);
        }
        if let Ok(odt) = OffsetDateTime::parse(s, &Rfc3339) {
            return Ok(Timestamp::Offset(odt));
        }
        let naive = s.replacen(' ', "T", 1);
        for fmt in [MINUTES_FMT, SECONDS_FMT, SUBSECONDS_FMT] {
            if let Ok(dt) = PrimitiveDateTime::parse(&naive, &fmt) {
                return Ok(Timestamp::Naive(dt));
            }
        }
        if let Ok(date) = Date::parse(s, &DATE_FMT) {
            return Ok(Timestamp::Naive(date.midnight()));
        }
        Err(TimestampError::Malformed(s.to_owned()))
    }

    /// Wall-clock time in `zone`, using the offset in effect at this instant
    pub(crate) fn local(self, zone: Zone) -> PrimitiveDateTime {
        match self {
            Timestamp::Naive(dt) => dt,
            Timestamp::Offset(odt) => zone.to_local(odt),
        }
    }

    pub(crate) fn as_written(self) -> PrimitiveDateTime {
        match self {
            Timestamp::Naive(dt) => dt,
            Timestamp::Offset(odt) => PrimitiveDateTime::new(odt.date(), odt.time()),
        }
    }
}

#[cfg(test)]
impl Booking {
    pub(crate) fn stub(id: u64, start: &str, venue: &str) -> Booking {
        Booking {
            id,
            start_time: Some(start.to_owned()),
            end_time: None,
            venue_name: Some(venue.to_owned()),
            contact: None,
            booking_type: None,
            more_info: None,
            fee_agreed: None,
            fee_status: FeeStatus::Unpaid,
        }
    }

    pub(crate) fn with_fee(mut self, pence: u64, status: FeeStatus) -> Booking {
        self.fee_agreed = Some(Value::from(format!("{}.{:02}", pence / 100, pence % 100)));
        self.fee_status = status;
        self
    }

    pub(crate) fn ending(mut self, end: &str) -> Booking {
        self.end_time = Some(end.to_owned());
        self
    }
}
