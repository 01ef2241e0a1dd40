use serde::Serialize;

/// Processing state of one catalog entry during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    #[default]
    Unprocessed,
    /// Present on disk and in the catalog with a matching signature.
    Processed,
    /// Recorded by a create run.
    Added,
    Excluded,
    Missing,
    Extra,
    Mismatch,
}

impl EntryStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unprocessed => "unprocessed",
            Self::Processed => "processed",
            Self::Added => "added",
            Self::Excluded => "excluded",
            Self::Missing => "missing",
            Self::Extra => "extra",
            Self::Mismatch => "mismatch",
        }
    }

    #[must_use]
    pub const fn is_unprocessed(self) -> bool {
        matches!(self, Self::Unprocessed)
    }

    /// Statuses that count towards the per-extension statistics.
    #[must_use]
    pub const fn counts_extension(self) -> bool {
        !matches!(self, Self::Unprocessed | Self::Excluded)
    }
}

/// Entry for a single file in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogEntry {
    /// Recorded signature; `None` for files that only exist on disk.
    pub signature: Option<String>,
    pub status: EntryStatus,
}

impl CatalogEntry {
    #[must_use]
    pub const fn new(signature: String) -> Self {
        Self {
            signature: Some(signature),
            status: EntryStatus::Unprocessed,
        }
    }
}

/// Count of entries per status for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectorySummary {
    pub path: String,
    pub added: usize,
    pub processed: usize,
    pub excluded: usize,
    pub missing: usize,
    pub mismatch: usize,
    pub extra: usize,
}

impl DirectorySummary {
    pub(crate) const fn record(&mut self, status: EntryStatus) {
        match status {
            EntryStatus::Added => self.added += 1,
            EntryStatus::Processed => self.processed += 1,
            EntryStatus::Excluded => self.excluded += 1,
            EntryStatus::Missing => self.missing += 1,
            EntryStatus::Mismatch => self.mismatch += 1,
            EntryStatus::Extra => self.extra += 1,
            EntryStatus::Unprocessed => {}
        }
    }
}
