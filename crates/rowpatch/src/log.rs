//! Tracing events, compiled out without the `tracing` feature.

use std::time::Duration;

#[cfg(feature = "tracing")]
const TARGET: &str = "rowpatch.sql";

#[cfg(feature = "tracing")]
pub(crate) fn statement(sql: &str, params: usize, timeout: Option<Duration>) {
    tracing::debug!(target: TARGET, sql, param_count = params, timeout = ?timeout, "executing update");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn statement(_sql: &str, _params: usize, _timeout: Option<Duration>) {}

#[cfg(feature = "tracing")]
pub(crate) fn unrestricted(sql: &str) {
    tracing::warn!(target: TARGET, sql, "update has no WHERE clause and will touch every row");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn unrestricted(_sql: &str) {}

#[cfg(feature = "tracing")]
pub(crate) fn absent_entity(table: &str) {
    tracing::debug!(target: TARGET, table, "no entity supplied, nothing to update");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn absent_entity(_table: &str) {}

#[cfg(feature = "tracing")]
pub(crate) fn opening(database: &str) {
    tracing::debug!(target: TARGET, database, "opening connection");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn opening(_database: &str) {}

#[cfg(feature = "tracing")]
pub(crate) fn connection_ended(err: &tokio_postgres::Error) {
    tracing::warn!(target: TARGET, error = %err, "connection task ended with an error");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn connection_ended(_err: &tokio_postgres::Error) {}

#[cfg(feature = "tracing")]
pub(crate) fn timed_out(timeout: Duration) {
    tracing::warn!(target: TARGET, timeout = ?timeout, "update timed out, cancelling");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn timed_out(_timeout: Duration) {}

#[cfg(feature = "tracing")]
pub(crate) fn cancel_failed(err: &tokio_postgres::Error) {
    tracing::warn!(target: TARGET, error = %err, "failed to cancel timed out update");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn cancel_failed(_err: &tokio_postgres::Error) {}
