use crate::booking::Booking;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::Date;

/// Optional bounds on the start dates of the bookings being requested, both
/// ends inclusive.  Dates are compared as the backend wrote them; callers
/// still bucket by local day themselves.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct DateRange {
    pub(crate) start: Option<Date>,
    pub(crate) end: Option<Date>,
}

impl DateRange {
    pub(crate) fn all() -> DateRange {
        DateRange::default()
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        !self.start.is_some_and(|start| date < start) && !self.end.is_some_and(|end| end < date)
    }

    /// Bookings without a readable start are let through so that the
    /// calendar can log them when it skips them.
    pub(crate) fn admits(&self, booking: &Booking) -> bool {
        match booking.written_start() {
            Ok(start) => self.contains(start.date()),
            Err(_) => true,
        }
    }
}

/// Something that can supply the list of bookings to display
pub(crate) trait BookingSource {
    fn fetch_bookings(&self, range: DateRange) -> Result<Vec<Booking>, SourceError>;
}

impl<T: BookingSource + ?Sized> BookingSource for &T {
    fn fetch_bookings(&self, range: DateRange) -> Result<Vec<Booking>, SourceError> {
        (**self).fetch_bookings(range)
    }
}

/// A fixed, in-memory list of bookings
impl BookingSource for Vec<Booking> {
    fn fetch_bookings(&self, range: DateRange) -> Result<Vec<Booking>, SourceError> {
        Ok(self.iter().filter(|b| range.admits(b)).cloned().collect())
    }
}

/// A JSON file holding an array of bookings in the shape returned by the
/// backend's `GET /api/bookings`
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub(crate) fn new<P: Into<PathBuf>>(path: P) -> JsonFile {
        JsonFile { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, src: &str) -> Result<Vec<Booking>, SourceError> {
        serde_json::from_str(src).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl BookingSource for JsonFile {
    fn fetch_bookings(&self, range: DateRange) -> Result<Vec<Booking>, SourceError> {
        let src = fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        let mut bookings = self.parse(&src)?;
        bookings.retain(|b| range.admits(b));
        log::info!(
            "loaded {} bookings from {}",
            bookings.len(),
            self.path.display()
        );
        Ok(bookings)
    }
}

#[derive(Debug, Error)]
pub(crate) enum SourceError {
    #[error("failed to read bookings from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse bookings in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{FeeStatus, Pence};
    use std::io::Write;
    use time::macros::date;

    #[test]
    fn test_parse_backend_response() {
        let source = JsonFile::new("bookings.json");
        let bookings = source
            .parse(
                r#"[
                    {
                        "id": 1,
                        "contact_id": 4,
                        "booking_from": "2024-03-05T10:00:00",
                        "booking_to": "2024-03-05T11:00:00",
                        "booking_type": null,
                        "more_info": null,
                        "fee_agreed": 120.0,
                        "fee_status": "Paid",
                        "contact": {"id": 4, "care_home_name": "Sunny Vale"}
                    },
                    {
                        "id": 2,
                        "contact_id": 5,
                        "booking_from": "2024-03-06T14:00:00",
                        "booking_to": "2024-03-06T15:00:00",
                        "fee_agreed": null,
                        "fee_status": "Unpaid",
                        "contact": null
                    }
                ]"#,
            )
            .unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].venue_name(), "Sunny Vale");
        assert_eq!(bookings[0].fee_agreed(), Some(Pence(12000)));
        assert_eq!(bookings[0].fee_status, FeeStatus::Paid);
        assert_eq!(bookings[1].venue_name(), "Unknown");
        assert_eq!(bookings[1].fee_agreed(), None);
    }

    #[test]
    fn test_odd_fees_do_not_block_other_bookings() {
        let source = JsonFile::new("bookings.json");
        let bookings = source
            .parse(
                r#"[
                    {"id": 1, "booking_from": "2024-03-05T10:00:00", "fee_agreed": 120.0},
                    {"id": 2, "booking_from": "2024-03-06T10:00:00", "fee_agreed": -5.0},
                    {"id": 3, "booking_from": "2024-03-07T10:00:00", "fee_agreed": "85.555"},
                    {"id": 4, "booking_from": "2024-03-08T10:00:00", "fee_agreed": "TBC"}
                ]"#,
            )
            .unwrap();
        let ids = bookings.iter().map(|b| b.id).collect::<Vec<_>>();
        assert_eq!(ids, [1, 2, 3, 4]);
        assert_eq!(bookings[0].fee(), Pence(12000));
        assert_eq!(bookings[1].fee(), Pence(-500));
        assert!(bookings[2].fee_agreed().is_some());
        assert_eq!(bookings[3].fee_agreed(), None);
    }

    #[test]
    fn test_parse_error_names_file() {
        let source = JsonFile::new("bookings.json");
        let e = source.parse(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(e, SourceError::Parse { .. }));
        assert_eq!(e.to_string(), "failed to parse bookings in bookings.json");
    }

    #[test]
    fn test_fetch_from_file() {
        let path = std::env::temp_dir().join(format!(
            "carecal-source-test-{}.json",
            std::process::id()
        ));
        {
            let mut fp = fs::File::create(&path).unwrap();
            fp.write_all(br#"[{"id": 9, "booking_from": "2024-03-05T10:00", "venue_name": "Oak Lodge"}]"#)
                .unwrap();
        }
        let bookings = JsonFile::new(&path).fetch_bookings(DateRange::all());
        fs::remove_file(&path).unwrap();
        let bookings = bookings.unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, 9);
        assert_eq!(bookings[0].venue_name(), "Oak Lodge");
    }

    #[test]
    fn test_fetch_missing_file() {
        let source = JsonFile::new("/nonexistent/carecal/bookings.json");
        let e = source.fetch_bookings(DateRange::all()).unwrap_err();
        assert!(matches!(e, SourceError::Read { .. }));
        assert_eq!(source.path(), Path::new("/nonexistent/carecal/bookings.json"));
    }

    #[test]
    fn test_in_memory() {
        let bookings = vec![Booking::stub(1, "2024-03-05T10:00", "Sunny Vale")];
        assert_eq!(bookings.fetch_bookings(DateRange::all()).unwrap(), bookings);
    }

    #[test]
    fn test_in_memory_range() {
        let bookings = vec![
            Booking::stub(1, "2024-02-29T23:00", "Sunny Vale"),
            Booking::stub(2, "2024-03-01T00:00", "Oak Lodge"),
            Booking::stub(3, "2024-03-31T23:59", "Elm House"),
            Booking::stub(4, "2024-04-01T00:30:00+01:00", "Birch Court"),
            Booking::stub(5, "soon", "Ash Grove"),
        ];
        let march = DateRange {
            start: Some(date!(2024 - 03 - 01)),
            end: Some(date!(2024 - 03 - 31)),
        };
        let ids = |range: DateRange| {
            bookings
                .fetch_bookings(range)
                .unwrap()
                .iter()
                .map(|b| b.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(march), [2, 3, 5]);
        let from_april = DateRange {
            start: Some(date!(2024 - 04 - 01)),
            end: None,
        };
        assert_eq!(ids(from_april), [4, 5]);
        assert_eq!(ids(DateRange::all()), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_contains() {
        let range = DateRange {
            start: None,
            end: Some(date!(2024 - 03 - 31)),
        };
        assert!(range.contains(date!(1999 - 01 - 01)));
        assert!(range.contains(date!(2024 - 03 - 31)));
        assert!(!range.contains(date!(2024 - 04 - 01)));
    }
}
