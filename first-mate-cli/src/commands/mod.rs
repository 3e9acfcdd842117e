pub mod calendar;
pub mod clear;
pub mod config;
pub mod free;
pub mod like;
pub mod mates;
pub mod matches;
pub mod nearest;
pub mod profile;
pub mod refresh;
pub mod register;
pub mod users;
