mod clock;
mod metrics;
mod models;
mod notifier;
mod repository;

// Publicly expose the time source and calendar helpers
pub use clock::{
    create_system_clock, date_of, day_bounds, range_bounds, week_bounds, Clock, ClockPtr,
    SystemClock,
};

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose the entity types
pub use models::{NewUser, OtpRecord, RankSnapshot, ScoreEntry, User, MAX_SCORE, MIN_SCORE};

// Publicly expose the notification seam
pub use notifier::{create_log_notifier, LogNotifier, OtpNotifier, OtpNotifierPtr};

// Publicly expose the storage abstractions
pub use repository::{
    OtpStore, OtpStorePtr, ScoreLedger, ScoreLedgerPtr, UserDirectory, UserDirectoryPtr,
};
