//! # db-log-worker
//!
//! Background worker that waits for a database to come up and then appends
//! one timestamped row every interval until it is told to stop.
//!
//! Three backends are supported: PostgreSQL and MySQL through `sqlx`, and
//! MongoDB through the official driver. The backend is chosen once from
//! `DB_TYPE`; everything else is the same across backends.
//!
//! ## Architecture
//!
//! ```text
//! main (tracing, signals, CancellationToken)
//!     │
//!     ├── service::run            (config gate)
//!     │     └── LogWorker         (state machine)
//!     │           ├── prober      (bounded readiness attempts)
//!     │           └── inserter    (fixed-interval loop)
//!     │
//!     └── persistence::LogStore   (Postgres | MySql | Mongo)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
