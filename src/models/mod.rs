pub mod application;
pub mod cv;
pub mod event;
pub mod job;
pub mod notification;
pub mod profile;
pub mod user;
