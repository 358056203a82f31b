mod grid;
mod month;
mod summary;
mod view;
mod widget;
pub(crate) use self::grid::{Day, DayCell, DayOrder, MonthGrid, Scheduled};
pub(crate) use self::month::{CalendarMonth, OutOfTimeError};
pub(crate) use self::summary::MonthSummary;
pub(crate) use self::view::MonthView;
pub(crate) use self::widget::Calendar;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// How instants are turned into local wall-clock time
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Zone {
    /// The same offset at every instant
    Fixed(UtcOffset),
    /// The system time zone, asked for the offset in effect at each instant
    /// so that daylight saving changes are honored.  The wrapped offset is
    /// used whenever the system cannot be queried.
    System(UtcOffset),
    /// `before` until the instant `at`, then `after`
    #[cfg(test)]
    Change {
        before: UtcOffset,
        at: OffsetDateTime,
        after: UtcOffset,
    },
}

impl Zone {
    pub(crate) fn offset_at(self, instant: OffsetDateTime) -> UtcOffset {
        match self {
            Zone::Fixed(offset) => offset,
            Zone::System(fallback) => UtcOffset::local_offset_at(instant).unwrap_or(fallback),
            #[cfg(test)]
            Zone::Change { before, at, after } => {
                if instant < at {
                    before
                } else {
                    after
                }
            }
        }
    }

    /// The wall-clock reading of `instant` in this zone
    pub(crate) fn to_local(self, instant: OffsetDateTime) -> PrimitiveDateTime {
        let local = instant
            .checked_to_offset(self.offset_at(instant))
            .unwrap_or(instant);
        PrimitiveDateTime::new(local.date(), local.time())
    }
}

/// The current moment as seen on the local wall clock, together with the
/// zone used to interpret booking timestamps
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Now {
    moment: PrimitiveDateTime,
    zone: Zone,
}

impl Now {
    pub(crate) fn local() -> Now {
        match OffsetDateTime::now_local() {
            Ok(moment) => Now {
                zone: Zone::System(moment.offset()),
                ..Now::at(moment)
            },
            Err(e) => {
                log::warn!("could not determine local time offset, using UTC: {e}");
                Now::at(OffsetDateTime::now_utc())
            }
        }
    }

    /// The given moment, with its offset applied to every timestamp
    pub(crate) fn at(moment: OffsetDateTime) -> Now {
        Now {
            moment: PrimitiveDateTime::new(moment.date(), moment.time()),
            zone: Zone::Fixed(moment.offset()),
        }
    }

    pub(crate) fn moment(&self) -> PrimitiveDateTime {
        self.moment
    }

    pub(crate) fn today(&self) -> Date {
        self.moment.date()
    }

    pub(crate) fn zone(&self) -> Zone {
        self.zone
    }
}

#[cfg(test)]
impl Now {
    pub(crate) fn in_zone(self, zone: Zone) -> Now {
        Now { zone, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn test_fixed_zone() {
        let zone = Zone::Fixed(offset!(+1));
        assert_eq!(
            zone.to_local(datetime!(2024 - 07 - 05 23:30 UTC)),
            datetime!(2024 - 07 - 06 0:30)
        );
        assert_eq!(
            zone.to_local(datetime!(2024 - 01 - 05 23:30 UTC)),
            datetime!(2024 - 01 - 06 0:30)
        );
    }

    #[test]
    fn test_offset_follows_the_instant() {
        let zone = Zone::Change {
            before: offset!(+0),
            at: datetime!(2024 - 03 - 31 1:00 UTC),
            after: offset!(+1),
        };
        assert_eq!(zone.offset_at(datetime!(2024 - 01 - 10 12:00 UTC)), offset!(+0));
        assert_eq!(zone.offset_at(datetime!(2024 - 03 - 31 1:00 UTC)), offset!(+1));
        assert_eq!(
            zone.to_local(datetime!(2024 - 07 - 05 23:30 UTC)),
            datetime!(2024 - 07 - 06 0:30)
        );
    }

    #[test]
    fn test_at_uses_fixed_offset() {
        let now = Now::at(datetime!(2024 - 03 - 20 12:00 +1));
        assert_eq!(now.zone(), Zone::Fixed(offset!(+1)));
        assert_eq!(now.moment(), datetime!(2024 - 03 - 20 12:00));
    }
}
