//! Firestore collection names.

/// User profiles, one per account.
pub const USERS: &str = "usuarios";

/// Sample senders.
pub const SENDERS: &str = "emisores";

/// Sample receivers.
pub const RECEIVERS: &str = "receptores";

/// Sample delivery orders.
pub const ORDERS: &str = "ordenes";

/// Collections wiped by a reset, in deletion order.
pub const SAMPLE_COLLECTIONS: [&str; 3] = [SENDERS, RECEIVERS, ORDERS];
