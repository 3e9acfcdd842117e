//! Constants shared across first-mate.

use chrono::Duration;
use chrono_tz::Tz;

/// Time used to determine whether classes start/finish at the same time.
pub const ROUGHLY_THE_SAME_TIME: Duration = Duration::minutes(15);

/// Free time a student needs on both sides of a boundary to actually meet up.
pub const ENOUGH_TIME_FOR_MEET_UP: Duration = Duration::minutes(60);

/// Free time assumed before/after a boundary when no class bounds it.
pub const FREE_DAY: Duration = Duration::hours(24);

/// Timezone of the Kensington campus.
pub const LOCAL_TZ: Tz = chrono_tz::Australia::Sydney;

/// Length of a slot in the common free time grid.
pub const TIME_SLOT_MINUTES: i64 = 30;

/// First hour covered by the common free time grid.
pub const DAY_START_HOUR: u32 = 8;

/// Hour at which the common free time grid stops.
pub const DAY_END_HOUR: u32 = 22;

/// Cap on occurrences expanded per recurring event.
pub const MAX_OCCURRENCES: u16 = 500;

/// Degrees a student can register with.
pub const DEGREES: &[&str] = &[
    "Computer Science",
    "Software Engineering",
    "Computer Engineering",
    "Math",
];
