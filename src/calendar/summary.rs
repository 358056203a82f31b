use super::{MonthGrid, Now};
use crate::booking::{FeeStatus, Pence};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct FeeTally {
    pub(crate) count: usize,
    pub(crate) total: Pence,
}

impl FeeTally {
    fn add(&mut self, fee: Pence) {
        self.count += 1;
        self.total = self.total.saturating_add(fee);
    }
}

impl fmt::Display for FeeTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.count, self.total)
    }
}

/// Booking totals for the month shown in a grid
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct MonthSummary {
    pub(crate) bookings: usize,
    /// Bookings starting at or after the current moment
    pub(crate) upcoming: usize,
    pub(crate) unpaid: FeeTally,
    pub(crate) invoiced: FeeTally,
    pub(crate) paid: FeeTally,
}

impl MonthSummary {
    pub(crate) fn from_grid(grid: &MonthGrid<'_>, now: Now) -> MonthSummary {
        let mut summary = MonthSummary::default();
        for scheduled in grid.days().flat_map(|d| &d.bookings) {
            summary.bookings += 1;
            if scheduled.start >= now.moment() {
                summary.upcoming += 1;
            }
            let fee = scheduled.booking.fee();
            match scheduled.booking.fee_status {
                FeeStatus::Unpaid => summary.unpaid.add(fee),
                FeeStatus::Invoiced => summary.invoiced.add(fee),
                FeeStatus::Paid => summary.paid.add(fee),
            }
        }
        summary
    }

    pub(crate) fn total_fees(&self) -> Pence {
        self.unpaid
            .total
            .saturating_add(self.invoiced.total)
            .saturating_add(self.paid.total)
    }
}

impl fmt::Display for MonthSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bookings: {}  Upcoming: {}  Unpaid: {}  Invoiced: {}  Paid: {}  Total: {}",
            self.bookings,
            self.upcoming,
            self.unpaid,
            self.invoiced,
            self.paid,
            self.total_fees()
        )
    }
}
