use std::sync::Arc;

/// A named, independently cached collection of records.
///
/// Partitions correspond to sheets of the backing spreadsheet. The main
/// partition holds live requests; `done` and `rejected` are the archive
/// sheets the backend moves records into on fulfillment or rejection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Partition(Arc<str>);

impl Partition {
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim();
        if name.is_empty() { Self::main() } else { Self(Arc::from(name)) }
    }

    /// The live request sheet.
    pub fn main() -> Self {
        Self(Arc::from(MAIN_PARTITION))
    }

    /// Fulfilled requests archive.
    pub fn done() -> Self {
        Self(Arc::from(DONE_PARTITION))
    }

    /// Rejected requests archive.
    pub fn rejected() -> Self {
        Self(Arc::from(REJECTED_PARTITION))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_main(&self) -> bool {
        self.as_str() == MAIN_PARTITION
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const MAIN_PARTITION: &str = "main";
pub const DONE_PARTITION: &str = "done";
pub const REJECTED_PARTITION: &str = "rejected";
