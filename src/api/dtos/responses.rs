use serde::Serialize;

use crate::domain::models::schedule::{BusinessHours, HourRange};
use crate::domain::services::availability::BookableSlot;

#[derive(Serialize)]
pub struct BusinessCreatedResponse {
    pub business_id: String,
    pub slug: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub slots: Vec<BookableSlot>,
}

#[derive(Serialize)]
pub struct HoursView {
    #[serde(flatten)]
    pub hours: BusinessHours,
    pub ranges: Vec<HourRange>,
}
