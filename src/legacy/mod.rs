pub mod blob;
pub mod fields;
pub mod row;

pub use blob::LegacyBlob;
pub use row::LegacyDonationRow;

// Legacy payment type codes
pub const TYPE_PAYPAL: &str = "PPL";
pub const TYPE_CREDIT_CARD: &str = "MCP";
pub const TYPE_SOFORT: &str = "SUB";
pub const TYPE_DIRECT_DEBIT: &str = "BEZ";
pub const TYPE_BANK_TRANSFER: &str = "UEB";
/// Booked by hand in the admin interface, no real payment behind it.
pub const TYPE_MANUALLY_BOOKED: &str = "MBK";

// Legacy status codes
pub const STATUS_NEW: &str = "N";
pub const STATUS_PROMISE: &str = "Z";
pub const STATUS_EXTERNAL_INCOMPLETE: &str = "X";
pub const STATUS_EXTERNAL_BOOKED: &str = "B";
pub const STATUS_CANCELLED: &str = "D";

/// External payments stuck incomplete, and cancelled donations, carry no
/// booking data worth applying.
pub fn is_bookable_status(status: &str) -> bool {
    !matches!(status.trim(), STATUS_EXTERNAL_INCOMPLETE | STATUS_CANCELLED)
}
