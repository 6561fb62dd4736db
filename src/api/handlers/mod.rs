pub mod appointment;
pub mod appointment_management;
pub mod availability;
pub mod business;
pub mod class;
pub mod health;
pub mod hours;
pub mod job;
pub mod location;
pub mod off_day;
pub mod service;
pub mod service_schedule;
pub mod slot_block;
