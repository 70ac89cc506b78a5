//! Time scale conversions.
//!
//! Timestamps enter the crate as Unix seconds (UTC). The ephemeris works in
//! Julian centuries of Terrestrial Time, so conversions go
//! Unix → JD(UT) → JD(TT) with ΔT from [`delta_t`].

pub mod delta_t;
pub mod julian;

pub use delta_t::delta_t_seconds;
pub use julian::{
    datetime_to_unix, julian_centuries_tt, unix_to_jd_tt, unix_to_jd_ut, J2000_JD,
    SECONDS_PER_DAY, UNIX_EPOCH_JD,
};
