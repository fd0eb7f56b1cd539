pub mod application;
pub mod chat;
pub mod interview;
pub mod job;
pub mod notification;
pub mod user;
