pub mod auth;
pub mod record;

pub use auth::{AuthToken, Session};
pub use record::{ingest_turnos, MalformedRecordError, Record, RecordBatch, RecordField};
