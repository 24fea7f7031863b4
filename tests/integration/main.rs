//! Integration tests exercising the engine end to end over the
//! in-memory store.

mod helpers;

mod booking_test;
mod calendar_test;
mod concurrency_test;
