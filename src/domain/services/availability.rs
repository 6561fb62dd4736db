use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::domain::models::appointment::Appointment;
use crate::domain::models::business::Business;
use crate::domain::models::schedule::{BusinessHours, DaySources, HourRange, ScheduledClass, SlotBlock};
use crate::domain::models::service::Service;

const MINUTES_PER_DAY: usize = 1440;

/// Half-open [start, end) window within one day, business-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// The resolved shape of one day. The resolver pattern-matches this
/// exhaustively instead of probing nullable fields in sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum DaySchedule {
    Closed,
    SingleRange(TimeRange),
    MultiRange(Vec<TimeRange>),
    FixedClassSlots(Vec<ClassSlot>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSlot {
    pub start: NaiveTime,
    pub service_id: String,
    pub staff_id: Option<String>,
    pub facility: Option<String>,
}

impl ClassSlot {
    fn from_row(class: &ScheduledClass) -> Self {
        Self {
            start: class.start_time,
            service_id: class.service_id.clone(),
            staff_id: class.staff_id.clone(),
            facility: class.facility.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrecedenceRule {
    OffDay,
    ServiceOverride,
    LocationHours,
    DefaultHours,
}

/// The whole precedence policy lives in this one array: earlier rules win
/// outright. An off-day closes the date even when a service override exists;
/// a service override in turn ignores business hours entirely, including
/// `is_closed` on the weekday row.
const PRECEDENCE: [PrecedenceRule; 4] = [
    PrecedenceRule::OffDay,
    PrecedenceRule::ServiceOverride,
    PrecedenceRule::LocationHours,
    PrecedenceRule::DefaultHours,
];

/// A finally bookable slot, in UTC.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BookableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub remaining_capacity: i32,
    pub staff_id: Option<String>,
    pub facility: Option<String>,
}

/// Applies the precedence rules to the raw rows of one day. Missing
/// configuration resolves to `Closed`, never an error.
pub fn resolve_day_schedule(sources: &DaySources) -> DaySchedule {
    for rule in PRECEDENCE {
        match rule {
            PrecedenceRule::OffDay => {
                if sources.off_day.is_some() {
                    return DaySchedule::Closed;
                }
            }
            PrecedenceRule::ServiceOverride => {
                if !sources.service_ranges.is_empty() {
                    let mut ranges: Vec<TimeRange> = sources
                        .service_ranges
                        .iter()
                        .map(|r| TimeRange { start: r.start_time, end: r.end_time })
                        .collect();
                    ranges.sort_by_key(|r| r.start);
                    return DaySchedule::MultiRange(ranges);
                }
            }
            PrecedenceRule::LocationHours => {
                if let Some(hours) = &sources.location_hours {
                    return hours_schedule(hours, &sources.location_ranges);
                }
            }
            PrecedenceRule::DefaultHours => {
                if let Some(hours) = &sources.default_hours {
                    return hours_schedule(hours, &sources.default_ranges);
                }
            }
        }
    }

    DaySchedule::Closed
}

fn hours_schedule(hours: &BusinessHours, ranges: &[HourRange]) -> DaySchedule {
    if hours.is_closed {
        return DaySchedule::Closed;
    }
    if ranges.is_empty() {
        return DaySchedule::SingleRange(TimeRange {
            start: hours.open_time,
            end: hours.close_time,
        });
    }

    let mut sorted: Vec<&HourRange> = ranges.iter().collect();
    sorted.sort_by_key(|r| (r.display_order, r.start_time));
    DaySchedule::MultiRange(
        sorted
            .into_iter()
            .map(|r| TimeRange { start: r.start_time, end: r.end_time })
            .collect(),
    )
}

/// Fixed-list strategy for `use_class_schedule` businesses: the day's class
/// rows for the requested service become the slots as-is. A dated off-day
/// still closes the site.
fn class_day_schedule(sources: &DaySources, service_id: &str) -> DaySchedule {
    if sources.off_day.is_some() {
        return DaySchedule::Closed;
    }

    let mut slots: Vec<ClassSlot> = sources
        .classes
        .iter()
        .filter(|c| c.service_id == service_id)
        .map(ClassSlot::from_row)
        .collect();
    slots.sort_by_key(|s| s.start);
    DaySchedule::FixedClassSlots(slots)
}

fn minutes_of(t: NaiveTime) -> usize {
    (t.hour() * 60 + t.minute()) as usize
}

fn time_at(minute: usize) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt((minute / 60) as u32, (minute % 60) as u32, 0)
}

/// Subtracts slot blocks from the day's ranges. A block removes the
/// duration-sized window starting at its time, splitting the interval it
/// lands in; blocks outside every interval are ignored.
pub fn open_intervals(schedule: &DaySchedule, blocks: &[SlotBlock], duration_min: i32) -> Vec<TimeRange> {
    let base: Vec<TimeRange> = match schedule {
        DaySchedule::Closed | DaySchedule::FixedClassSlots(_) => return Vec::new(),
        DaySchedule::SingleRange(r) => vec![*r],
        DaySchedule::MultiRange(rs) => rs.clone(),
    };

    let mut spans: Vec<(usize, usize)> = base
        .iter()
        .map(|r| (minutes_of(r.start), minutes_of(r.end)))
        .collect();
    spans.sort_by_key(|s| s.0);

    for block in blocks {
        let blocked_start = minutes_of(block.start_time);
        let blocked_end = (blocked_start + duration_min.max(0) as usize).min(MINUTES_PER_DAY);

        let mut next = Vec::with_capacity(spans.len() + 1);
        for (start, end) in spans {
            if blocked_start < start || blocked_start >= end {
                next.push((start, end));
                continue;
            }
            if blocked_start > start {
                next.push((start, blocked_start));
            }
            if blocked_end < end {
                next.push((blocked_end, end));
            }
        }
        spans = next;
    }

    spans
        .into_iter()
        .filter(|(start, end)| end > start)
        .filter_map(|(start, end)| {
            Some(TimeRange {
                start: time_at(start)?,
                end: time_at(end)?,
            })
        })
        .collect()
}

/// Candidate slot starts: step by duration + buffer from each interval
/// start; a slot must fit entirely inside a single interval.
pub fn generate_slot_starts(intervals: &[TimeRange], duration_min: i32, buffer_min: i32) -> Vec<NaiveTime> {
    if duration_min <= 0 {
        return Vec::new();
    }
    let duration = duration_min as usize;
    let step = duration + buffer_min.max(0) as usize;

    let mut starts = Vec::new();
    for interval in intervals {
        let start_idx = minutes_of(interval.start);
        let mut end_idx = minutes_of(interval.end);
        if end_idx == MINUTES_PER_DAY - 1 {
            end_idx = MINUTES_PER_DAY;
        }

        let mut cursor = start_idx;
        while cursor + duration <= end_idx {
            if let Some(t) = time_at(cursor) {
                starts.push(t);
            }
            cursor += step;
        }
    }
    starts
}

/// Full availability pipeline for one (business, location, service, date):
/// resolve the day shape, slice or list candidates, then filter conflicts
/// against existing appointments. Pure over its inputs; `now` is passed in
/// so resolution stays repeatable.
pub fn calculate_slots(
    business: &Business,
    service: &Service,
    date: NaiveDate,
    sources: &DaySources,
    existing: &[Appointment],
    now: DateTime<Utc>,
) -> Vec<BookableSlot> {
    let tz: Tz = business.timezone.parse().unwrap_or(chrono_tz::UTC);

    let schedule = if business.use_class_schedule {
        class_day_schedule(sources, &service.id)
    } else {
        resolve_day_schedule(sources)
    };

    let candidates: Vec<(NaiveTime, Option<String>, Option<String>)> = match &schedule {
        DaySchedule::Closed => return Vec::new(),
        DaySchedule::FixedClassSlots(slots) => slots
            .iter()
            .map(|s| (s.start, s.staff_id.clone(), s.facility.clone()))
            .collect(),
        DaySchedule::SingleRange(_) | DaySchedule::MultiRange(_) => {
            let intervals = open_intervals(&schedule, &sources.slot_blocks, service.duration_min);
            generate_slot_starts(&intervals, service.duration_min, service.buffer_min)
                .into_iter()
                .map(|t| (t, None, None))
                .collect()
        }
    };

    let duration = Duration::minutes(service.duration_min as i64);
    let mut slots = Vec::new();

    for (time, staff_id, facility) in candidates {
        let Some(start_tz) = tz.from_local_datetime(&date.and_time(time)).single() else {
            // skipped or ambiguous local time (DST transition)
            continue;
        };
        let start = start_tz.with_timezone(&Utc);
        let end = start + duration;

        if start <= now {
            continue;
        }

        let occupied = existing
            .iter()
            .filter(|a| a.occupies_slot() && a.start_time < end && a.end_time > start)
            .count() as i32;

        if occupied < service.slot_capacity {
            slots.push(BookableSlot {
                start,
                end,
                remaining_capacity: service.slot_capacity - occupied,
                staff_id,
                facility,
            });
        }
    }

    slots.sort_by_key(|s| s.start);
    slots.dedup_by(|a, b| a.start == b.start);
    slots
}

/// UTC bounds of a business-local calendar date.
pub fn local_day_bounds(tz: Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_opt(0, 0, 0).unwrap();
    let end = date.and_hms_opt(23, 59, 59).unwrap();

    let start_tz = tz
        .from_local_datetime(&start)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&start));
    let end_tz = tz
        .from_local_datetime(&end)
        .latest()
        .unwrap_or_else(|| tz.from_utc_datetime(&end));

    (start_tz.with_timezone(&Utc), end_tz.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::appointment::{Appointment, NewAppointmentParams};
    use crate::domain::models::business::Business;
    use crate::domain::models::schedule::{
        BusinessHours, HourRange, NewScheduledClassParams, OffDay, ScheduledClass, ServiceScheduleRange, SlotBlock,
    };
    use crate::domain::models::service::{NewServiceParams, Service};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn test_business(use_class_schedule: bool) -> Business {
        Business::new("Studio".into(), "studio".into(), "UTC".into(), use_class_schedule)
    }

    fn test_service(duration_min: i32, buffer_min: i32, slot_capacity: i32) -> Service {
        Service::new(NewServiceParams {
            business_id: "biz".into(),
            slug: "cut".into(),
            name: "Cut".into(),
            description: String::new(),
            duration_min,
            buffer_min,
            slot_capacity,
        })
    }

    fn default_hours(open: NaiveTime, close: NaiveTime, is_closed: bool) -> BusinessHours {
        BusinessHours::new("biz".into(), None, 0, open, close, is_closed)
    }

    fn appointment_at(service: &Service, start: DateTime<Utc>, status: &str) -> Appointment {
        let mut appt = Appointment::new(NewAppointmentParams {
            business_id: "biz".into(),
            service_id: service.id.clone(),
            location_id: None,
            staff_id: None,
            start,
            duration_min: service.duration_min,
            name: "C".into(),
            email: Some("c@example.com".into()),
            note: None,
        });
        appt.status = status.to_string();
        appt
    }

    // 2030-01-07 is a Monday; `now` well before it keeps the past filter out
    // of the way.
    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
    }

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    fn slot_times(slots: &[BookableSlot]) -> Vec<(u32, u32)> {
        slots.iter().map(|s| (s.start.time().hour(), s.start.time().minute())).collect()
    }

    #[test]
    fn off_day_closes_regardless_of_hours() {
        let sources = DaySources {
            off_day: Some(OffDay::new("biz".into(), None, test_date(), Some("holiday".into()))),
            default_hours: Some(default_hours(t(9, 0), t(17, 0), false)),
            ..Default::default()
        };
        assert_eq!(resolve_day_schedule(&sources), DaySchedule::Closed);
    }

    #[test]
    fn off_day_beats_service_override() {
        let sources = DaySources {
            off_day: Some(OffDay::new("biz".into(), None, test_date(), None)),
            service_ranges: vec![ServiceScheduleRange::new("svc".into(), 0, t(9, 0), t(12, 0), 0)],
            ..Default::default()
        };
        assert_eq!(resolve_day_schedule(&sources), DaySchedule::Closed);
    }

    #[test]
    fn service_override_replaces_hours_even_when_closed() {
        let sources = DaySources {
            default_hours: Some(default_hours(t(9, 0), t(17, 0), true)),
            service_ranges: vec![ServiceScheduleRange::new("svc".into(), 0, t(14, 0), t(16, 0), 0)],
            ..Default::default()
        };
        assert_eq!(
            resolve_day_schedule(&sources),
            DaySchedule::MultiRange(vec![TimeRange { start: t(14, 0), end: t(16, 0) }])
        );
    }

    #[test]
    fn location_hours_shadow_default_hours() {
        let sources = DaySources {
            location_hours: Some(BusinessHours::new("biz".into(), Some("loc".into()), 0, t(10, 0), t(14, 0), false)),
            default_hours: Some(default_hours(t(9, 0), t(17, 0), false)),
            ..Default::default()
        };
        assert_eq!(
            resolve_day_schedule(&sources),
            DaySchedule::SingleRange(TimeRange { start: t(10, 0), end: t(14, 0) })
        );
    }

    #[test]
    fn hour_ranges_supersede_single_pair() {
        let hours = default_hours(t(9, 0), t(17, 0), false);
        let ranges = vec![
            HourRange::new(hours.id.clone(), t(15, 0), t(19, 0), 1),
            HourRange::new(hours.id.clone(), t(9, 0), t(13, 0), 0),
        ];
        let sources = DaySources {
            default_hours: Some(hours),
            default_ranges: ranges,
            ..Default::default()
        };
        assert_eq!(
            resolve_day_schedule(&sources),
            DaySchedule::MultiRange(vec![
                TimeRange { start: t(9, 0), end: t(13, 0) },
                TimeRange { start: t(15, 0), end: t(19, 0) },
            ])
        );
    }

    #[test]
    fn missing_configuration_is_closed() {
        assert_eq!(resolve_day_schedule(&DaySources::default()), DaySchedule::Closed);
    }

    #[test]
    fn thirty_minute_slots_fill_the_interval() {
        let schedule = DaySchedule::SingleRange(TimeRange { start: t(9, 0), end: t(12, 0) });
        let intervals = open_intervals(&schedule, &[], 30);
        let starts = generate_slot_starts(&intervals, 30, 0);
        assert_eq!(
            starts,
            vec![t(9, 0), t(9, 30), t(10, 0), t(10, 30), t(11, 0), t(11, 30)]
        );
    }

    #[test]
    fn buffer_stretches_the_step() {
        let schedule = DaySchedule::SingleRange(TimeRange { start: t(9, 0), end: t(10, 0) });
        let intervals = open_intervals(&schedule, &[], 30);
        let starts = generate_slot_starts(&intervals, 30, 15);
        assert_eq!(starts, vec![t(9, 0)]);
    }

    #[test]
    fn slots_never_cross_interval_gaps() {
        let schedule = DaySchedule::MultiRange(vec![
            TimeRange { start: t(9, 0), end: t(10, 30) },
            TimeRange { start: t(11, 0), end: t(12, 0) },
        ]);
        let intervals = open_intervals(&schedule, &[], 60);
        let starts = generate_slot_starts(&intervals, 60, 0);
        // 10:00 would spill past 10:30, 10:30 sits in the gap
        assert_eq!(starts, vec![t(9, 0), t(11, 0)]);
    }

    #[test]
    fn block_removes_only_its_window() {
        let schedule = DaySchedule::SingleRange(TimeRange { start: t(9, 0), end: t(12, 0) });
        let blocks = vec![SlotBlock::new("biz".into(), "svc".into(), test_date(), t(10, 0))];
        let intervals = open_intervals(&schedule, &blocks, 60);
        let starts = generate_slot_starts(&intervals, 60, 0);
        assert_eq!(starts, vec![t(9, 0), t(11, 0)]);
    }

    #[test]
    fn block_outside_intervals_is_ignored() {
        let schedule = DaySchedule::SingleRange(TimeRange { start: t(9, 0), end: t(12, 0) });
        let blocks = vec![SlotBlock::new("biz".into(), "svc".into(), test_date(), t(14, 0))];
        let intervals = open_intervals(&schedule, &blocks, 60);
        assert_eq!(intervals, vec![TimeRange { start: t(9, 0), end: t(12, 0) }]);
    }

    #[test]
    fn capacity_excludes_full_slots_and_reports_remaining() {
        let business = test_business(false);
        let service = test_service(60, 0, 2);
        let date = test_date();
        let sources = DaySources {
            default_hours: Some(default_hours(t(14, 0), t(16, 0), false)),
            ..Default::default()
        };

        let two_pm = Utc.with_ymd_and_hms(2030, 1, 7, 14, 0, 0).unwrap();
        let one_booked = vec![appointment_at(&service, two_pm, "CONFIRMED")];
        let slots = calculate_slots(&business, &service, date, &sources, &one_booked, test_now());
        assert_eq!(slot_times(&slots), vec![(14, 0), (15, 0)]);
        assert_eq!(slots[0].remaining_capacity, 1);
        assert_eq!(slots[1].remaining_capacity, 2);

        let fully_booked = vec![
            appointment_at(&service, two_pm, "CONFIRMED"),
            appointment_at(&service, two_pm, "COMPLETED"),
        ];
        let slots = calculate_slots(&business, &service, date, &sources, &fully_booked, test_now());
        assert_eq!(slot_times(&slots), vec![(15, 0)]);
    }

    #[test]
    fn cancelled_appointments_free_their_slot() {
        let business = test_business(false);
        let service = test_service(60, 0, 1);
        let sources = DaySources {
            default_hours: Some(default_hours(t(14, 0), t(15, 0), false)),
            ..Default::default()
        };
        let existing = vec![appointment_at(
            &service,
            Utc.with_ymd_and_hms(2030, 1, 7, 14, 0, 0).unwrap(),
            "CANCELLED",
        )];
        let slots = calculate_slots(&business, &service, test_date(), &sources, &existing, test_now());
        assert_eq!(slot_times(&slots), vec![(14, 0)]);
    }

    #[test]
    fn past_slots_are_never_bookable() {
        let business = test_business(false);
        let service = test_service(60, 0, 1);
        let sources = DaySources {
            default_hours: Some(default_hours(t(9, 0), t(12, 0), false)),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2030, 1, 7, 10, 0, 0).unwrap();
        let slots = calculate_slots(&business, &service, test_date(), &sources, &[], now);
        // 10:00 itself is excluded: start <= now
        assert_eq!(slot_times(&slots), vec![(11, 0)]);
    }

    #[test]
    fn class_mode_emits_fixed_slots() {
        let business = test_business(true);
        let service = test_service(60, 0, 10);
        let class = ScheduledClass::new(NewScheduledClassParams {
            business_id: business.id.clone(),
            location_id: "loc".into(),
            facility: Some("Room A".into()),
            day_of_week: 0,
            start_time: t(18, 0),
            service_id: service.id.clone(),
            staff_id: Some("staff-1".into()),
        });
        let other_service_class = ScheduledClass::new(NewScheduledClassParams {
            business_id: business.id.clone(),
            location_id: "loc".into(),
            facility: None,
            day_of_week: 0,
            start_time: t(19, 0),
            service_id: "other".into(),
            staff_id: None,
        });
        let sources = DaySources {
            // hours exist but are ignored in class mode
            default_hours: Some(default_hours(t(9, 0), t(12, 0), false)),
            classes: vec![class, other_service_class],
            ..Default::default()
        };

        let slots = calculate_slots(&business, &service, test_date(), &sources, &[], test_now());
        assert_eq!(slot_times(&slots), vec![(18, 0)]);
        assert_eq!(slots[0].staff_id.as_deref(), Some("staff-1"));
        assert_eq!(slots[0].facility.as_deref(), Some("Room A"));
    }

    #[test]
    fn class_mode_respects_off_days() {
        let business = test_business(true);
        let service = test_service(60, 0, 10);
        let class = ScheduledClass::new(NewScheduledClassParams {
            business_id: business.id.clone(),
            location_id: "loc".into(),
            facility: None,
            day_of_week: 0,
            start_time: t(18, 0),
            service_id: service.id.clone(),
            staff_id: None,
        });
        let sources = DaySources {
            off_day: Some(OffDay::new(business.id.clone(), None, test_date(), None)),
            classes: vec![class],
            ..Default::default()
        };
        let slots = calculate_slots(&business, &service, test_date(), &sources, &[], test_now());
        assert!(slots.is_empty());
    }

    #[test]
    fn resolution_is_idempotent() {
        let business = test_business(false);
        let service = test_service(30, 10, 3);
        let hours = default_hours(t(9, 0), t(17, 0), false);
        let sources = DaySources {
            default_ranges: vec![
                HourRange::new(hours.id.clone(), t(9, 0), t(12, 0), 0),
                HourRange::new(hours.id.clone(), t(14, 0), t(17, 0), 1),
            ],
            default_hours: Some(hours),
            slot_blocks: vec![SlotBlock::new("biz".into(), service.id.clone(), test_date(), t(10, 0))],
            ..Default::default()
        };
        let existing = vec![appointment_at(
            &service,
            Utc.with_ymd_and_hms(2030, 1, 7, 14, 0, 0).unwrap(),
            "PENDING",
        )];

        let first = calculate_slots(&business, &service, test_date(), &sources, &existing, test_now());
        let second = calculate_slots(&business, &service, test_date(), &sources, &existing, test_now());
        assert_eq!(first, second);
    }
}
