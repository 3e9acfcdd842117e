//! The on-disk directory of registered students.
//!
//! Layout under the data directory:
//!
//! ```text
//! users/
//!   z1234567/
//!     user.toml      profile, likes
//!     calendar.ics   last downloaded timetable feed
//! ```

use std::path::{Path, PathBuf};

use chrono_tz::Tz;

use crate::class::ClassEvent;
use crate::config::FirstMateConfig;
use crate::date_range::DateRange;
use crate::error::{FirstMateError, FirstMateResult};
use crate::feed::normalize_feed_url;
use crate::free_time::{FreeDay, FreeTimeOptions};
use crate::ics::validate_calendar;
use crate::overlap::{MatchRules, Mate};
use crate::timetable::Timetable;
use crate::user::{NewUser, ProfileUpdate, User, normalize_zid, validate_degrees};

const USER_FILE: &str = "user.toml";
const CALENDAR_FILE: &str = "calendar.ics";

#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
}

impl Directory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Directory { root: root.into() }
    }

    /// The directory at the configured data path.
    pub fn open(config: &FirstMateConfig) -> Self {
        Self::new(config.data_path())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    fn user_dir(&self, zid: &str) -> PathBuf {
        self.users_dir().join(zid)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a student along with their downloaded timetable.
    pub fn register(&self, new_user: NewUser, calendar: &str) -> FirstMateResult<User> {
        let zid = normalize_zid(&new_user.zid)?;
        if self.user_dir(&zid).join(USER_FILE).exists() {
            return Err(FirstMateError::UserExists(zid));
        }

        let degrees = validate_degrees(new_user.degrees)?;
        let ical_url = normalize_feed_url(&new_user.ical_url)?.to_string();
        validate_calendar(calendar)?;

        let display_name = match new_user.display_name.trim() {
            "" => zid.clone(),
            name => name.to_string(),
        };

        let user = User {
            zid,
            display_name,
            ical_url,
            degrees,
            public_description: String::new(),
            private_description: String::new(),
            likes: Vec::new(),
        };

        self.save(&user)?;
        std::fs::write(self.user_dir(&user.zid).join(CALENDAR_FILE), calendar)?;
        tracing::info!(zid = %user.zid, "registered user");

        Ok(user)
    }

    pub fn user(&self, zid: &str) -> FirstMateResult<User> {
        let zid = normalize_zid(zid)?;
        let path = self.user_dir(&zid).join(USER_FILE);

        if !path.exists() {
            return Err(FirstMateError::UserNotFound(zid));
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| {
            FirstMateError::Serialization(format!("{}: {}", path.display(), e))
        })
    }

    /// Every registered user, sorted by zID.
    ///
    /// A missing users directory means nobody has registered yet. Unreadable
    /// records are logged and skipped.
    pub fn users(&self) -> FirstMateResult<Vec<User>> {
        let entries = match std::fs::read_dir(self.users_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut users: Vec<User> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.join(USER_FILE).exists())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                match self.user(&name) {
                    Ok(user) => Some(user),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping user record");
                        None
                    }
                }
            })
            .collect();

        users.sort_by(|a, b| a.zid.cmp(&b.zid));
        Ok(users)
    }

    pub fn update_profile(&self, zid: &str, update: ProfileUpdate) -> FirstMateResult<User> {
        let mut user = self.user(zid)?;
        update.apply(&mut user)?;
        self.save(&user)?;
        Ok(user)
    }

    /// Delete a user, and forget any likes others gave them.
    pub fn remove(&self, zid: &str) -> FirstMateResult<()> {
        let user = self.user(zid)?;

        // likes go first so a failed save leaves the user in place
        for mut other in self.users()? {
            if other.zid != user.zid && other.likes(&user.zid) {
                other.likes.retain(|liked| liked != &user.zid);
                self.save(&other)?;
            }
        }

        std::fs::remove_dir_all(self.user_dir(&user.zid))?;

        tracing::info!(zid = %user.zid, "removed user");
        Ok(())
    }

    /// Delete every user.
    pub fn clear(&self) -> FirstMateResult<()> {
        let users_dir = self.users_dir();
        if users_dir.exists() {
            std::fs::remove_dir_all(&users_dir)?;
        }
        tracing::info!(path = %users_dir.display(), "cleared all users");
        Ok(())
    }

    fn save(&self, user: &User) -> FirstMateResult<()> {
        let dir = self.user_dir(&user.zid);
        std::fs::create_dir_all(&dir)?;

        let content = toml::to_string_pretty(user)
            .map_err(|e| FirstMateError::Serialization(e.to_string()))?;

        std::fs::write(dir.join(USER_FILE), content)?;
        tracing::debug!(zid = %user.zid, "saved user record");
        Ok(())
    }

    // =========================================================================
    // Calendars
    // =========================================================================

    /// The stored timetable feed for a user.
    pub fn calendar(&self, zid: &str) -> FirstMateResult<String> {
        let user = self.user(zid)?;
        let path = self.user_dir(&user.zid).join(CALENDAR_FILE);

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a user's feed URL and stored timetable.
    pub fn set_calendar(&self, zid: &str, ical_url: &str, calendar: &str) -> FirstMateResult<()> {
        let mut user = self.user(zid)?;
        validate_calendar(calendar)?;

        user.ical_url = normalize_feed_url(ical_url)?.to_string();
        self.save(&user)?;
        std::fs::write(self.user_dir(&user.zid).join(CALENDAR_FILE), calendar)?;

        tracing::info!(zid = %user.zid, "updated calendar");
        Ok(())
    }

    pub fn timetable(&self, zid: &str) -> FirstMateResult<Timetable> {
        let calendar = self.calendar(zid)?;
        if calendar.trim().is_empty() {
            return Ok(Timetable::default());
        }
        Timetable::from_ics(&calendar)
    }

    pub fn class_events(
        &self,
        zid: &str,
        range: &DateRange,
        tz: Tz,
    ) -> FirstMateResult<Vec<ClassEvent>> {
        Ok(self.timetable(zid)?.class_events(range, tz))
    }

    // =========================================================================
    // Likes
    // =========================================================================

    pub fn like(&self, me: &str, them: &str) -> FirstMateResult<()> {
        let (mut user, them) = self.like_pair(me, them)?;

        if !user.likes(&them) {
            user.likes.push(them);
            self.save(&user)?;
        }
        Ok(())
    }

    pub fn unlike(&self, me: &str, them: &str) -> FirstMateResult<()> {
        let (mut user, them) = self.like_pair(me, them)?;

        if user.likes(&them) {
            user.likes.retain(|liked| liked != &them);
            self.save(&user)?;
        }
        Ok(())
    }

    /// Load `me` and check `them` can be liked by them.
    fn like_pair(&self, me: &str, them: &str) -> FirstMateResult<(User, String)> {
        let user = self.user(me)?;
        let them = self.user(them)?.zid;

        if user.zid == them {
            return Err(FirstMateError::SelfLike);
        }
        Ok((user, them))
    }

    /// Users who like `zid` and whom `zid` likes back.
    pub fn mutual_matches(&self, zid: &str) -> FirstMateResult<Vec<User>> {
        let me = self.user(zid)?;

        Ok(self
            .users()?
            .into_iter()
            .filter(|other| other.zid != me.zid)
            .filter(|other| me.likes(&other.zid) && other.likes(&me.zid))
            .collect())
    }

    // =========================================================================
    // Matching
    // =========================================================================

    /// Rank every other user by how often their classes line up with `zid`'s.
    ///
    /// Users whose stored timetable can't be read are logged and skipped.
    pub fn find_mates(
        &self,
        zid: &str,
        range: &DateRange,
        tz: Tz,
        rules: &MatchRules,
    ) -> FirstMateResult<Vec<Mate>> {
        let me = self.user(zid)?;
        let my_classes = self.class_events(&me.zid, range, tz)?;

        let candidates: Vec<(String, Vec<ClassEvent>)> = self
            .users()?
            .into_iter()
            .filter(|user| user.zid != me.zid)
            .filter_map(|user| match self.class_events(&user.zid, range, tz) {
                Ok(classes) => Some((user.zid, classes)),
                Err(e) => {
                    tracing::warn!(zid = %user.zid, error = %e, "skipping unreadable timetable");
                    None
                }
            })
            .collect();

        Ok(rules.find_mates(
            &me.zid,
            &my_classes,
            candidates
                .iter()
                .map(|(zid, classes)| (zid.as_str(), classes.as_slice())),
        ))
    }

    /// Days in `range` when both users are free at the same time.
    pub fn common_free_time(
        &self,
        me: &str,
        them: &str,
        range: &DateRange,
        tz: Tz,
        options: &FreeTimeOptions,
    ) -> FirstMateResult<Vec<FreeDay>> {
        let mine = self.class_events(me, range, tz)?;
        let theirs = self.class_events(them, range, tz)?;

        Ok(options.common_free_time(&mine, &theirs, range, tz))
    }
}
