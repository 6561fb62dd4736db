use crate::domain::models::{appointment::Appointment, business::Business, service::Service};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for a confirmed appointment
pub fn generate_ics(business: &Business, service: &Service, appointment: &Appointment) -> String {
    let mut calendar = Calendar::new();

    let summary = format!("{} - {}", service.name, business.name);

    let ical_event = IcalEvent::new()
        .summary(&summary)
        .description(&service.description)
        .starts(appointment.start_time)
        .ends(appointment.end_time)
        .uid(&appointment.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
