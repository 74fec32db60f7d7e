// Workflow layer: orchestrates the storage traits on behalf of the HTTP
// handlers. Handlers stay thin; every decision with temporal or ordering
// logic lives here or below.

mod ranking;
mod verification;

#[cfg(test)]
pub(crate) mod test_support;

pub use ranking::RankingService;
pub use verification::{VerificationService, OTP_CODE_LEN};
