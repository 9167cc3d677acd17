use crate::utils::error::{MiscError, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};
use std::sync::OnceLock;

/// A clock pinned to one UTC offset.
///
/// The offset can be chosen once, either at construction or later through
/// [`set_tz`](TimeZone::set_tz). The first read of an unset zone fixes it to
/// the host's local offset, after which `set_tz` fails.
#[derive(Debug)]
pub struct TimeZone {
    offset: OnceLock<FixedOffset>,
}

impl TimeZone {
    pub fn new(offset: FixedOffset) -> Self {
        let zone = Self::unset();
        let _ = zone.offset.set(offset);
        zone
    }

    pub const fn unset() -> Self {
        Self {
            offset: OnceLock::new(),
        }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// `minutes` east of UTC, e.g. `60` for UTC+01:00.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self> {
        Ok(Self::new(offset_from_minutes(minutes)?))
    }

    pub fn set_tz(&self, offset: FixedOffset) -> Result<()> {
        self.offset.set(offset).map_err(|_| MiscError::TimezoneAlreadySet {
            current: self.offset().to_string(),
        })?;
        tracing::debug!("timezone set to {}", offset);
        Ok(())
    }

    pub fn is_set(&self) -> bool {
        self.offset.get().is_some()
    }

    pub fn offset(&self) -> FixedOffset {
        *self.offset.get_or_init(|| Local::now().offset().fix())
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset())
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        Self::unset()
    }
}

pub(crate) fn offset_from_minutes(minutes: i32) -> Result<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| MiscError::InvalidArgument {
            name: "offset_minutes".to_string(),
            reason: format!("{} minutes is not a valid UTC offset", minutes),
        })
}

static DEFAULT_ZONE: TimeZone = TimeZone::unset();

/// The process-wide zone used by the free functions of this module.
pub fn default_zone() -> &'static TimeZone {
    &DEFAULT_ZONE
}

pub fn now() -> DateTime<FixedOffset> {
    DEFAULT_ZONE.now()
}

pub fn today() -> NaiveDate {
    DEFAULT_ZONE.today()
}

pub fn set_tz(offset: FixedOffset) -> Result<()> {
    DEFAULT_ZONE.set_tz(offset)
}
