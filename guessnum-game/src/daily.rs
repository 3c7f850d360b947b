//! Daily challenge numbers, stable for one calendar day.
use chrono::NaiveDate;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::constants::{DAILY_DOMAIN_TAG, DAILY_MAX_NUMBER};
use crate::error::{GameError, GameResult};

/// Number for a given date plus whether it is the first draw of that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyDraw {
    pub date: NaiveDate,
    pub number: u32,
    pub fresh: bool,
}

/// Supplies the shared daily target. Implementations must return the same
/// number for every call with the same date.
pub trait DailyNumberSource {
    /// Number in `[1, 100]` for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DailyNumberUnavailable`] when no number can be
    /// produced.
    fn daily_number(&mut self, date: NaiveDate) -> GameResult<DailyDraw>;
}

/// Derives the daily number from an HMAC of the ISO date so every player
/// with the same salt sees the same target.
#[derive(Debug, Clone, Default)]
pub struct HashedDailyNumbers {
    salt: u64,
    last_date: Option<NaiveDate>,
}

impl HashedDailyNumbers {
    #[must_use]
    pub const fn new(salt: u64) -> Self {
        Self {
            salt,
            last_date: None,
        }
    }
}

impl DailyNumberSource for HashedDailyNumbers {
    fn daily_number(&mut self, date: NaiveDate) -> GameResult<DailyDraw> {
        let number = derive_daily_number(self.salt, date)?;
        let fresh = self.last_date != Some(date);
        if fresh {
            log::info!("daily number ready for {date}");
        }
        self.last_date = Some(date);
        Ok(DailyDraw {
            date,
            number,
            fresh,
        })
    }
}

fn derive_daily_number(salt: u64, date: NaiveDate) -> GameResult<u32> {
    let mut mac = Hmac::<Sha256>::new_from_slice(&salt.to_le_bytes())
        .map_err(|_| GameError::DailyNumberUnavailable)?;
    mac.update(DAILY_DOMAIN_TAG);
    mac.update(date.format("%Y-%m-%d").to_string().as_bytes());
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8]
        .try_into()
        .map_err(|_| GameError::DailyNumberUnavailable)?;
    let value = u64::from_le_bytes(seed_bytes) % u64::from(DAILY_MAX_NUMBER);
    u32::try_from(value + 1).map_err(|_| GameError::DailyNumberUnavailable)
}
