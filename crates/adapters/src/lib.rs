// Copyright 2025 QueryBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Database backend adapters for QueryBench.
//!
//! This crate maps a resolved [`DriverKind`](querybench_core::DriverKind)
//! plus connection URL and credentials to an open connection. It is the only
//! crate that talks to the `sqlx` Any driver directly, exposing exactly the
//! functionality the harness needs:
//!
//! - **Driver installation**: one-shot registration of the compiled-in
//!   backends (PostgreSQL, MySQL, SQLite)
//! - **Credential handling**: per-backend merging of user/password into the
//!   connection URL
//! - **Connection opening**: URL-based connect returning a backend-agnostic
//!   connection handle
//!
//! # Example
//!
//! ```ignore
//! use querybench_adapters::open_connection;
//! use querybench_core::{DatabaseTarget, DriverKind};
//!
//! let target = DatabaseTarget::new(
//!     "local", DriverKind::Sqlite, "sqlite::memory:", "", "",
//! );
//! let conn = open_connection(&target).await?;
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod connect;

pub use connect::{install_drivers, open_connection, ConnectError};
