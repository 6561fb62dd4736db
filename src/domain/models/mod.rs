pub mod appointment;
pub mod business;
pub mod job;
pub mod location;
pub mod schedule;
pub mod service;
