mod calendar;
mod common;
mod reducer;
mod scoring;
