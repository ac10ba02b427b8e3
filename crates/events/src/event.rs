use chrono::{DateTime, Utc};

/// Fact about a committed workflow change, built from the stored record
/// returned by the guarded write.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name, e.g. `"transfer.warehouse_approved"`.
    fn event_type(&self) -> &'static str;

    /// Payload schema version; bump when fields change meaning.
    fn version(&self) -> u32;

    fn occurred_at(&self) -> DateTime<Utc>;

    /// Id of the transfer or POS transaction this is about.
    fn reference(&self) -> String;
}
