//! Repeatable input groups: product IDs and per-section site rows.

use super::{
    currency::CurrencySlot, site_options, CheckStatus, SiteEntry, CURRENCY_SLOTS, DEFAULT_SITES,
    MAX_PRODUCT_IDS, MAX_SITES,
};

/// Number of site rows every section is seeded with; these rows are permanent.
pub const PERMANENT_SITE_ROWS: usize = DEFAULT_SITES.len();

/// Label and enabled flag of an "add" control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddButtonState {
    pub count: usize,
    pub max: usize,
    pub enabled: bool,
    pub label: String,
}

impl AddButtonState {
    fn new(count: usize, max: usize, label: String, at_cap: String) -> Self {
        let enabled = count < max;
        Self {
            count,
            max,
            enabled,
            label: if enabled { label } else { at_cap },
        }
    }

    /// `"{count}/{max}"`.
    pub fn counter(&self) -> String {
        format!("{}/{}", self.count, self.max)
    }
}

/// Product ID inputs. Entries may be empty while the user is typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductIdList {
    entries: Vec<String>,
}

impl Default for ProductIdList {
    fn default() -> Self {
        Self {
            entries: vec![String::new()],
        }
    }
}

impl ProductIdList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds inputs from persisted IDs; an empty list yields one blank input.
    pub fn restore(ids: &[String]) -> Self {
        let mut list = Self {
            entries: Vec::new(),
        };
        for id in ids {
            list.add(Some(id.clone()));
        }
        if list.entries.is_empty() {
            list.entries.push(String::new());
        }
        list
    }

    /// Appends an input when below the cap. Returns the new index.
    pub fn add(&mut self, preset: Option<String>) -> Option<usize> {
        if self.entries.len() >= MAX_PRODUCT_IDS {
            return None;
        }
        self.entries.push(preset.unwrap_or_default());
        Some(self.entries.len() - 1)
    }

    /// Removes an input. The first input has no remove control.
    pub fn remove(&mut self, index: usize) -> bool {
        if !self.is_removable(index) {
            return false;
        }
        self.entries.remove(index);
        true
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                *entry = value.into();
                true
            }
            None => false,
        }
    }

    pub fn is_removable(&self, index: usize) -> bool {
        index > 0 && index < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Trimmed, non-empty IDs as persisted.
    pub fn collect(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn add_button(&self) -> AddButtonState {
        let count = self.entries.len();
        AddButtonState::new(
            count,
            MAX_PRODUCT_IDS,
            format!("Добавить ID ({count}/{MAX_PRODUCT_IDS})"),
            format!("Максимум {MAX_PRODUCT_IDS} ID"),
        )
    }
}

/// One site selector with its currency slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRow {
    site: Option<String>,
    slots: [CurrencySlot; CURRENCY_SLOTS],
}

impl SiteRow {
    pub fn new(site: Option<String>) -> Self {
        Self {
            site: site.filter(|name| !name.trim().is_empty()),
            slots: Default::default(),
        }
    }

    pub fn from_entry(entry: &SiteEntry) -> Self {
        let mut row = Self::new(Some(entry.site.clone()));
        for (slot, check) in row.slots.iter_mut().zip(entry.currencies.iter()) {
            *slot = CurrencySlot::from_check(check);
        }
        row
    }

    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    pub fn select_site(&mut self, site: Option<String>) {
        self.site = site
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
    }

    pub fn slots(&self) -> &[CurrencySlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&CurrencySlot> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut CurrencySlot> {
        self.slots.get_mut(index)
    }

    /// Persisted entry; rows without a site are dropped, empty slots are filtered.
    pub fn to_entry(&self) -> Option<SiteEntry> {
        let site = self.site.clone()?;
        Some(SiteEntry {
            site,
            currencies: self.slots.iter().filter_map(CurrencySlot::to_check).collect(),
        })
    }
}

/// Rendering descriptor for a site row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRowDescriptor {
    pub index: usize,
    pub site: Option<String>,
    pub options: Vec<&'static str>,
    pub removable: bool,
    pub slots: Vec<(Option<String>, CheckStatus)>,
}

/// Site rows of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSection {
    rows: Vec<SiteRow>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            rows: DEFAULT_SITES
                .iter()
                .map(|site| SiteRow::new(Some((*site).to_string())))
                .collect(),
        }
    }
}

impl SiteSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds rows from persisted entries in order. Missing permanent rows
    /// come back with no site selected, so they collect to nothing.
    pub fn restore(entries: &[SiteEntry]) -> Self {
        let mut rows: Vec<SiteRow> = entries
            .iter()
            .take(MAX_SITES)
            .map(SiteRow::from_entry)
            .collect();
        if rows.len() < PERMANENT_SITE_ROWS {
            rows.resize_with(PERMANENT_SITE_ROWS, || SiteRow::new(None));
        }
        Self { rows }
    }

    /// Appends a row when below the cap. Returns the new index.
    pub fn add(&mut self, preset: Option<String>) -> Option<usize> {
        if self.rows.len() >= MAX_SITES {
            return None;
        }
        self.rows.push(SiteRow::new(preset));
        Some(self.rows.len() - 1)
    }

    /// Removes an added row; the seeded rows are permanent.
    pub fn remove(&mut self, index: usize) -> bool {
        if !self.is_removable(index) {
            return false;
        }
        self.rows.remove(index);
        true
    }

    pub fn is_removable(&self, index: usize) -> bool {
        index >= PERMANENT_SITE_ROWS && index < self.rows.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[SiteRow] {
        &self.rows
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut SiteRow> {
        self.rows.get_mut(index)
    }

    pub fn collect(&self) -> Vec<SiteEntry> {
        self.rows.iter().filter_map(SiteRow::to_entry).collect()
    }

    pub fn add_button(&self) -> AddButtonState {
        let count = self.rows.len();
        AddButtonState::new(
            count,
            MAX_SITES,
            format!("Добавить сайт ({count}/{MAX_SITES})"),
            format!("Максимум {MAX_SITES} сайтов"),
        )
    }

    pub fn descriptors(&self) -> Vec<SiteRowDescriptor> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| SiteRowDescriptor {
                index,
                site: row.site.clone(),
                options: site_options().collect(),
                removable: self.is_removable(index),
                slots: row
                    .slots
                    .iter()
                    .map(|slot| (slot.currency().map(str::to_string), slot.status()))
                    .collect(),
            })
            .collect()
    }
}
