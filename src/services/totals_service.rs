//! Period-bucketed aggregation over activity records.
//!
//! One pure implementation serves every call site: the self-service totals
//! view, the cross-employee rollup, and the admin variant of the rollup.
//! Callers pick the interval (usually via [`period_bounds`]) and hand the
//! records in; nothing here touches the database or the clock.

use std::cmp;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::entities::{activity_record, employee};

/// Summed counters and derived ratios for one record set over one interval.
/// Computed fresh per request, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTotals {
    #[serde(rename = "companyIVR")]
    pub company_ivr: i64,
    pub direct_dial: i64,
    #[serde(rename = "rpcVM")]
    pub rpc_vm: i64,
    pub not_verified: i64,
    pub grand_total: i64,
    pub percentage: f64,
    pub productivity: f64,
}

/// One employee's totals in a cross-employee rollup.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeTotals {
    pub name: String,
    #[serde(rename = "employeeID")]
    pub employee_code: String,
    pub totals: AggregateTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

/// The period selector was not one of the three recognized values. Surfaced
/// to the client as-is; never silently defaulted to a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid period specified. Please choose from daily, weekly, or monthly.")]
pub struct InvalidPeriod;

impl FromStr for Period {
    type Err = InvalidPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            _ => Err(InvalidPeriod),
        }
    }
}

/// Sums the four counters over records inside `[start, end]` (inclusive on
/// both ends, full date-time comparison) and derives the two ratios. With no
/// matching records the ratio denominator clamps to 1, so both ratios come
/// out 0 rather than NaN.
pub fn calculate_totals(
    records: &[activity_record::Model],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AggregateTotals {
    let mut totals = AggregateTotals::default();

    for record in records.iter().filter(|r| r.date >= start && r.date <= end) {
        totals.company_ivr += i64::from(record.company_ivr);
        totals.direct_dial += i64::from(record.direct_dial);
        totals.rpc_vm += i64::from(record.rpc_vm);
        totals.not_verified += i64::from(record.not_verified);
    }

    totals.grand_total =
        totals.company_ivr + totals.direct_dial + totals.rpc_vm + totals.not_verified;
    let denominator = cmp::max(totals.grand_total, 1) as f64;
    totals.percentage = totals.direct_dial as f64 / denominator * 100.0;
    totals.productivity = (totals.direct_dial + totals.rpc_vm) as f64 / denominator;

    totals
}

/// Computes the inclusive interval for a period, anchored to `now`.
///
/// Daily covers `now`'s calendar day, weekly runs from the most recent
/// Sunday through the end of `now`'s day, monthly covers `now`'s calendar
/// month. All starts are 00:00:00.000 and all ends 23:59:59.999.
pub fn period_bounds(period: Period, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    match period {
        Period::Daily => (start_of_day(today), end_of_day(today)),
        Period::Weekly => {
            let days_since_sunday = now.weekday().num_days_from_sunday();
            let sunday = today - Days::new(u64::from(days_since_sunday));
            (start_of_day(sunday), end_of_day(today))
        }
        Period::Monthly => {
            let first = today.with_day(1).expect("day 1 exists in every month");
            let last = first
                .checked_add_months(Months::new(1))
                .expect("in-range month arithmetic")
                - Days::new(1);
            (start_of_day(first), end_of_day(last))
        }
    }
}

/// Totals for one record set over the named period.
pub fn totals_for_period(
    records: &[activity_record::Model],
    period: Period,
    now: DateTime<Utc>,
) -> AggregateTotals {
    let (start, end) = period_bounds(period, now);
    calculate_totals(records, start, end)
}

/// Applies one shared interval to every employee's records. Output order
/// follows the input enumeration; no sort is applied.
pub fn rollup(
    employees: &[(employee::Model, Vec<activity_record::Model>)],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<EmployeeTotals> {
    employees
        .iter()
        .map(|(employee, records)| EmployeeTotals {
            name: employee.name.clone(),
            employee_code: employee.employee_code.clone(),
            totals: calculate_totals(records, start, end),
        })
        .collect()
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .expect("valid wall-clock time")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn record(date: DateTime<Utc>, counters: [i32; 4]) -> activity_record::Model {
        let [company_ivr, direct_dial, rpc_vm, not_verified] = counters;
        activity_record::Model {
            id: Uuid::new_v4(),
            employee_id: 1,
            date,
            file_name: "calls.xlsx".to_string(),
            company_ivr,
            direct_dial,
            rpc_vm,
            not_verified,
            created_at: date,
            updated_at: date,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn worked_example_from_two_days_of_records() {
        // Monday 2024-05-06; the Tuesday record must fall outside the interval.
        let records = vec![
            record(at(2024, 5, 6, 10, 0), [0, 5, 2, 3]),
            record(at(2024, 5, 7, 9, 0), [0, 1, 0, 0]),
        ];
        let (start, end) = period_bounds(Period::Daily, at(2024, 5, 6, 12, 0));

        let totals = calculate_totals(&records, start, end);

        assert_eq!(totals.company_ivr, 0);
        assert_eq!(totals.direct_dial, 5);
        assert_eq!(totals.rpc_vm, 2);
        assert_eq!(totals.not_verified, 3);
        assert_eq!(totals.grand_total, 10);
        assert_eq!(totals.percentage, 50.0);
        assert_eq!(totals.productivity, 0.7);
    }

    #[test]
    fn empty_record_set_is_all_zeros_without_division_errors() {
        let totals = calculate_totals(&[], at(2024, 1, 1, 0, 0), at(2024, 12, 31, 0, 0));

        assert_eq!(totals, AggregateTotals::default());
        assert_eq!(totals.grand_total, 0);
        assert_eq!(totals.percentage, 0.0);
        assert_eq!(totals.productivity, 0.0);
    }

    #[test]
    fn interval_is_inclusive_on_both_ends() {
        let start = at(2024, 5, 6, 0, 0);
        let end = at(2024, 5, 6, 23, 59);
        let records = vec![
            record(start, [1, 0, 0, 0]),
            record(end, [0, 0, 0, 1]),
            record(start - Days::new(1), [100, 100, 100, 100]),
            record(end + Days::new(1), [100, 100, 100, 100]),
        ];

        let totals = calculate_totals(&records, start, end);

        assert_eq!(totals.company_ivr, 1);
        assert_eq!(totals.not_verified, 1);
        assert_eq!(totals.grand_total, 2);
    }

    #[test]
    fn filtering_compares_full_datetimes_not_calendar_days() {
        // Same calendar day as the interval start, but earlier time-of-day.
        let records = vec![record(at(2024, 5, 6, 7, 59), [0, 4, 0, 0])];

        let totals = calculate_totals(&records, at(2024, 5, 6, 8, 0), at(2024, 5, 6, 23, 59));

        assert_eq!(totals.grand_total, 0);
    }

    #[test]
    fn grand_total_is_always_the_sum_of_the_four_counters() {
        let records = vec![
            record(at(2024, 5, 6, 9, 0), [3, 7, 11, 13]),
            record(at(2024, 5, 6, 14, 0), [1, 0, 2, 0]),
        ];

        let totals = calculate_totals(&records, at(2024, 5, 6, 0, 0), at(2024, 5, 6, 23, 59));

        assert_eq!(
            totals.grand_total,
            totals.company_ivr + totals.direct_dial + totals.rpc_vm + totals.not_verified
        );
        assert_eq!(totals.grand_total, 37);
    }

    #[test]
    fn ratios_stay_in_range_for_non_negative_counters() {
        let records = vec![
            record(at(2024, 5, 6, 9, 0), [5, 0, 0, 5]),
            record(at(2024, 5, 6, 10, 0), [0, 20, 20, 0]),
        ];

        let totals = calculate_totals(&records, at(2024, 5, 6, 0, 0), at(2024, 5, 6, 23, 59));

        assert!((0.0..=100.0).contains(&totals.percentage));
        assert!((0.0..=1.0).contains(&totals.productivity));
    }

    #[test]
    fn identical_inputs_produce_identical_outputs() {
        let records = vec![
            record(at(2024, 5, 6, 9, 0), [2, 3, 4, 5]),
            record(at(2024, 5, 6, 17, 30), [1, 1, 1, 1]),
        ];
        let start = at(2024, 5, 6, 0, 0);
        let end = at(2024, 5, 6, 23, 59);

        assert_eq!(
            calculate_totals(&records, start, end),
            calculate_totals(&records, start, end)
        );
    }

    #[test]
    fn daily_bounds_cover_the_whole_calendar_day() {
        let (start, end) = period_bounds(Period::Daily, at(2024, 5, 6, 15, 42));

        assert_eq!(start, at(2024, 5, 6, 0, 0));
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2024, 5, 6, 23, 59, 59).unwrap()
                + chrono::Duration::milliseconds(999)
        );
    }

    #[test]
    fn weekly_bounds_anchor_to_the_most_recent_sunday() {
        // 2024-05-08 is a Wednesday; the week began Sunday 2024-05-05.
        let (start, end) = period_bounds(Period::Weekly, at(2024, 5, 8, 15, 30));

        assert_eq!(start, at(2024, 5, 5, 0, 0));
        assert_eq!(end.date_naive(), at(2024, 5, 8, 0, 0).date_naive());
    }

    #[test]
    fn weekly_bounds_on_a_sunday_start_that_same_day() {
        let (start, _) = period_bounds(Period::Weekly, at(2024, 5, 5, 9, 0));

        assert_eq!(start, at(2024, 5, 5, 0, 0));
    }

    #[test]
    fn monthly_bounds_normalize_to_the_last_day_of_the_month() {
        // February of a leap year.
        let (start, end) = period_bounds(Period::Monthly, at(2024, 2, 15, 12, 0));

        assert_eq!(start, at(2024, 2, 1, 0, 0));
        assert_eq!(end.date_naive(), at(2024, 2, 29, 0, 0).date_naive());
    }

    #[test]
    fn monthly_bounds_handle_the_december_wrap() {
        let (start, end) = period_bounds(Period::Monthly, at(2023, 12, 31, 23, 0));

        assert_eq!(start, at(2023, 12, 1, 0, 0));
        assert_eq!(end.date_naive(), at(2023, 12, 31, 0, 0).date_naive());
    }

    #[test]
    fn unrecognized_period_selector_is_rejected() {
        assert_eq!("yearly".parse::<Period>(), Err(InvalidPeriod));
        assert_eq!("".parse::<Period>(), Err(InvalidPeriod));
        assert_eq!("Daily".parse::<Period>(), Err(InvalidPeriod));
        assert_eq!("daily".parse::<Period>(), Ok(Period::Daily));
    }

    #[test]
    fn totals_for_period_matches_explicit_bounds() {
        let now = at(2024, 5, 8, 15, 30);
        let records = vec![
            record(at(2024, 5, 5, 8, 0), [1, 2, 3, 4]),
            record(at(2024, 5, 4, 8, 0), [9, 9, 9, 9]),
        ];

        let via_period = totals_for_period(&records, Period::Weekly, now);
        let (start, end) = period_bounds(Period::Weekly, now);

        assert_eq!(via_period, calculate_totals(&records, start, end));
        assert_eq!(via_period.grand_total, 10);
    }

    #[test]
    fn rollup_keeps_enumeration_order_and_isolates_employees() {
        let make_employee = |id: i32, name: &str, code: &str| employee::Model {
            id,
            name: name.to_string(),
            employee_code: code.to_string(),
            password_hash: "x".to_string(),
            is_admin: false,
            dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            created_at: at(2024, 1, 1, 0, 0),
            updated_at: at(2024, 1, 1, 0, 0),
        };
        let employees = vec![
            (
                make_employee(2, "Priya", "EMP-2"),
                vec![record(at(2024, 5, 6, 9, 0), [0, 2, 0, 0])],
            ),
            (
                make_employee(1, "Arun", "EMP-1"),
                vec![record(at(2024, 5, 6, 9, 0), [0, 0, 0, 3])],
            ),
        ];

        let rows = rollup(&employees, at(2024, 5, 6, 0, 0), at(2024, 5, 6, 23, 59));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].employee_code, "EMP-2");
        assert_eq!(rows[0].totals.direct_dial, 2);
        assert_eq!(rows[1].employee_code, "EMP-1");
        assert_eq!(rows[1].totals.not_verified, 3);
    }

    #[test]
    fn totals_serialize_with_the_original_wire_names() {
        let records = vec![record(at(2024, 5, 6, 9, 0), [1, 2, 3, 4])];
        let totals = calculate_totals(&records, at(2024, 5, 6, 0, 0), at(2024, 5, 6, 23, 59));

        let json = serde_json::to_value(&totals).unwrap();

        assert_eq!(json["companyIVR"], 1);
        assert_eq!(json["directDial"], 2);
        assert_eq!(json["rpcVM"], 3);
        assert_eq!(json["notVerified"], 4);
        assert_eq!(json["grandTotal"], 10);
    }
}
