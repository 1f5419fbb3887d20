//! Named log categories and the process-wide category table
//!
//! A [`LogCategory`] carries two bounds: a ceiling fixed when the category is
//! declared, and an active level that can be changed at runtime but never
//! above the ceiling. The active level lives in an `AtomicU8` so the
//! suppression check on every call site is a single relaxed load.

use super::error::{LoggerError, Result};
use super::severity::Severity;
use parking_lot::{const_mutex, Mutex};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

pub struct LogCategory {
    name: Cow<'static, str>,
    active: AtomicU8,
    ceiling: Severity,
}

impl LogCategory {
    /// Declare a category.
    ///
    /// Meant for `static` declarations (see [`define_log_category!`]): an
    /// initial level above the ceiling fails constant evaluation, so the
    /// mistake never reaches a running process.
    ///
    /// # Panics
    ///
    /// When called at runtime with `initial > ceiling`. Use
    /// [`LogCategory::try_new`] for levels that come from input.
    ///
    /// [`define_log_category!`]: crate::define_log_category
    pub const fn new(name: &'static str, initial: Severity, ceiling: Severity) -> Self {
        assert!(
            initial.as_u8() <= ceiling.as_u8(),
            "log category initial level exceeds its ceiling"
        );
        Self {
            name: Cow::Borrowed(name),
            active: AtomicU8::new(initial.as_u8()),
            ceiling,
        }
    }

    /// Checked constructor for categories built at runtime.
    pub fn try_new(
        name: impl Into<Cow<'static, str>>,
        initial: Severity,
        ceiling: Severity,
    ) -> Result<Self> {
        let name = name.into();
        if initial > ceiling {
            return Err(LoggerError::ceiling_exceeded(name, initial, ceiling));
        }
        Ok(Self {
            name,
            active: AtomicU8::new(initial.as_u8()),
            ceiling,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn ceiling(&self) -> Severity {
        self.ceiling
    }

    #[inline]
    pub fn active_level(&self) -> Severity {
        Severity::from_u8(self.active.load(Ordering::Relaxed)).unwrap_or(Severity::None)
    }

    /// True when a message at `severity` is chattier than the active level.
    ///
    /// A message exactly at the active level passes.
    #[inline]
    pub fn is_suppressed(&self, severity: Severity) -> bool {
        severity.as_u8() > self.active.load(Ordering::Relaxed)
    }

    /// Set the active level, clamped to the ceiling. Returns the level applied.
    pub fn set_active_level(&self, level: Severity) -> Severity {
        let applied = level.min(self.ceiling);
        self.active.store(applied.as_u8(), Ordering::Relaxed);
        applied
    }
}

impl fmt::Debug for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogCategory")
            .field("name", &self.name())
            .field("active", &self.active_level())
            .field("ceiling", &self.ceiling)
            .finish()
    }
}

struct CategoryTable {
    categories: Vec<&'static LogCategory>,
    /// Levels configured before the named category registered.
    pending: BTreeMap<String, Severity>,
}

/// Name-addressable table of `static` categories.
///
/// Categories are declared as statics and listed here explicitly, so runtime
/// configuration ([`LoggerConfig`](crate::core::LoggerConfig), console
/// toggles) can reach them by name. Names compare case-insensitively.
pub struct CategoryRegistry {
    table: Mutex<CategoryTable>,
}

static GLOBAL_CATEGORIES: CategoryRegistry = CategoryRegistry::new();

impl CategoryRegistry {
    pub const fn new() -> Self {
        Self {
            table: const_mutex(CategoryTable {
                categories: Vec::new(),
                pending: BTreeMap::new(),
            }),
        }
    }

    /// The process-wide category table.
    pub fn global() -> &'static CategoryRegistry {
        &GLOBAL_CATEGORIES
    }

    /// Add a category. Registering the same category twice is a no-op; a
    /// different category with the same name is rejected.
    ///
    /// A level configured earlier under this name is applied now.
    pub fn register(&self, category: &'static LogCategory) -> Result<()> {
        let mut guard = self.table.lock();
        let table = &mut *guard;

        if let Some(existing) = table
            .categories
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(category.name()))
        {
            if std::ptr::eq(*existing, category) {
                return Ok(());
            }
            return Err(LoggerError::duplicate_category(category.name()));
        }

        let pending_key = table
            .pending
            .keys()
            .find(|k| k.eq_ignore_ascii_case(category.name()))
            .cloned();
        if let Some(key) = pending_key {
            if let Some(level) = table.pending.remove(&key) {
                category.set_active_level(level);
            }
        }

        table.categories.push(category);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&'static LogCategory> {
        self.table
            .lock()
            .categories
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Change a registered category's level. Returns the clamped level.
    pub fn set_level(&self, name: &str, level: Severity) -> Result<Severity> {
        self.find(name)
            .map(|category| category.set_active_level(level))
            .ok_or_else(|| LoggerError::unknown_category(name))
    }

    /// Apply a name → level map. Names not registered yet are kept and
    /// applied on registration. Returns how many registered categories changed.
    pub fn apply_levels(&self, levels: &BTreeMap<String, Severity>) -> usize {
        let mut guard = self.table.lock();
        let table = &mut *guard;
        let mut applied = 0;

        for (name, level) in levels {
            match table
                .categories
                .iter()
                .find(|c| c.name().eq_ignore_ascii_case(name))
            {
                Some(category) => {
                    category.set_active_level(*level);
                    applied += 1;
                }
                None => {
                    table.pending.insert(name.clone(), *level);
                }
            }
        }

        applied
    }

    /// Snapshot of registered category names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.table
            .lock()
            .categories
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.lock().categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
