use std::collections::HashSet;

use procura_cache::{CacheError, SourceCache};
use procura_core::{Partition, Record, Status};

use crate::config::{ColumnKind, RowAction, ViewConfig, column_kind};
use crate::format::{format_currency, format_date, format_datetime, format_number};

/// Lifecycle of one table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Never loaded.
    Idle,
    /// A load is in flight.
    Loading,
    /// Showing a loaded snapshot.
    Ready,
}

/// Handle for one load attempt.
///
/// Loads can overlap when a reload is requested while an older fetch is
/// still in flight; the ticket sequence number makes sure a stale result
/// never overwrites a newer one.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    seq: u64,
    partition: Partition,
}

impl LoadTicket {
    pub fn partition(&self) -> &Partition {
        &self.partition
    }
}

/// Horizontal cell alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One rendered column header.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub align: Align,
}

/// One formatted cell.
#[derive(Debug, Clone)]
pub struct RenderedCell {
    pub text: String,
    pub align: Align,
    /// Set for status cells so hosts can badge them.
    pub badge: Option<Status>,
}

/// One rendered row plus the actions the page offers on it.
#[derive(Debug, Clone)]
pub struct RenderedRow {
    pub id: String,
    pub cells: Vec<RenderedCell>,
    pub actions: &'static [RowAction],
}

/// Pagination summary line: "1–25 of 30".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl std::fmt::Display for PageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\u{2013}{} of {}", self.start, self.end, self.total)
    }
}

/// Complete render output for the current page.
#[derive(Debug, Clone)]
pub struct TableRender {
    pub title: &'static str,
    pub columns: Vec<Column>,
    pub rows: Vec<RenderedRow>,
    pub info: PageInfo,
    /// Message to show instead of rows: no data at all, or no search hits.
    pub placeholder: Option<&'static str>,
}

impl TableRender {
    /// Rows in fixed-size chunks, for hosts that draw incrementally. The
    /// concatenation of all batches is exactly [`Self::rows`].
    pub fn row_batches(&self, batch_size: usize) -> impl Iterator<Item = &[RenderedRow]> {
        self.rows.chunks(batch_size.max(1))
    }
}

/// Filtered, paginated table over one cached partition.
///
/// Holds the full partition snapshot, a derived filtered subsequence, and
/// pagination state. Searching and paging are synchronous and never
/// refetch; only [`TableView::load`] touches the network (through the
/// cache).
#[derive(Debug)]
pub struct TableView {
    config: ViewConfig,
    all_records: Vec<Record>,
    /// Indices into `all_records`, always a subsequence.
    filtered: Vec<usize>,
    columns: Vec<String>,
    query: String,
    page_size: usize,
    current_page: usize,
    phase: Phase,
    load_seq: u64,
    loaded: bool,
}

impl TableView {
    pub fn new(config: ViewConfig) -> Self {
        let page_size = config.default_page_size.max(1);
        Self {
            config,
            all_records: Vec::new(),
            filtered: Vec::new(),
            columns: Vec::new(),
            query: String::new(),
            page_size,
            current_page: 1,
            phase: Phase::Idle,
            load_seq: 0,
            loaded: false,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn record_count(&self) -> usize {
        self.all_records.len()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Visible column names of the current snapshot.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Fetch the configured partition through the cache and swap in the
    /// result. Prior state stays intact on failure.
    pub async fn load(&mut self, cache: &SourceCache) -> Result<(), CacheError> {
        let ticket = self.begin_load();
        match cache.get(ticket.partition()).await {
            Ok(records) => {
                self.apply_load(&ticket, &records);
                Ok(())
            },
            Err(e) => {
                self.fail_load(&ticket);
                Err(e)
            },
        }
    }

    /// Start a load attempt and transition to [`Phase::Loading`].
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        self.phase = Phase::Loading;
        LoadTicket { seq: self.load_seq, partition: self.config.partition.clone() }
    }

    /// Swap in a fetched snapshot.
    ///
    /// Returns `false` (and changes nothing) when a newer load has been
    /// started since `ticket` was issued.
    pub fn apply_load(&mut self, ticket: &LoadTicket, records: &[Record]) -> bool {
        if ticket.seq != self.load_seq {
            tracing::debug!(
                partition = %ticket.partition,
                seq = ticket.seq,
                newest = self.load_seq,
                "discarding stale load result"
            );
            return false;
        }

        self.all_records = match self.config.status_filter {
            Some(status) => {
                records.iter().filter(|r| r.status() == Some(status)).cloned().collect()
            },
            None => records.to_vec(),
        };
        self.columns = derive_columns(&self.all_records, self.config.hidden_fields);
        self.filtered = (0..self.all_records.len()).collect();
        self.query.clear();
        self.current_page = 1;
        self.phase = Phase::Ready;
        self.loaded = true;
        true
    }

    /// Settle a failed load attempt. Prior data stays; the loading phase
    /// always clears.
    pub fn fail_load(&mut self, ticket: &LoadTicket) -> bool {
        if ticket.seq != self.load_seq {
            return false;
        }
        self.phase = if self.loaded { Phase::Ready } else { Phase::Idle };
        true
    }

    /// Case-insensitive substring filter over the visible columns.
    ///
    /// Purely in-memory: recomputes the filtered subsequence and resets to
    /// page 1 without touching `all_records` or the network.
    pub fn search(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
        self.current_page = 1;
        if self.query.is_empty() {
            self.filtered = (0..self.all_records.len()).collect();
            return;
        }
        let query = self.query.clone();
        self.filtered = self
            .all_records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                let haystack = self
                    .columns
                    .iter()
                    .map(|c| record.text(c))
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase();
                haystack.contains(&query)
            })
            .map(|(i, _)| i)
            .collect();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Number of pages; an empty result set still has one (empty) page.
    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size).max(1)
    }

    /// Clamp `page` into the valid range and go there.
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.page_count());
    }

    /// Records of the current page, in filtered order.
    pub fn paged(&self) -> impl Iterator<Item = &Record> {
        let start = (self.current_page - 1) * self.page_size;
        self.filtered
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| &self.all_records[i])
    }

    pub fn page_info(&self) -> PageInfo {
        let total = self.filtered.len();
        if total == 0 {
            return PageInfo { start: 0, end: 0, total: 0 };
        }
        let start = (self.current_page - 1) * self.page_size + 1;
        let end = (start + self.page_size - 1).min(total);
        PageInfo { start, end, total }
    }

    /// Produce the row model for the current page.
    ///
    /// Pure: reads state, mutates nothing. Formatting and action wiring
    /// follow the view's configuration.
    pub fn render(&self) -> TableRender {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|name| {
                let kind = column_kind(name);
                Column { name: name.clone(), kind, align: align_for(kind) }
            })
            .collect();

        let placeholder = if self.all_records.is_empty() {
            Some("No data")
        } else if self.filtered.is_empty() {
            Some("No matching records")
        } else {
            None
        };

        let rows = if placeholder.is_some() {
            Vec::new()
        } else {
            self.paged().map(|record| render_row(record, &columns, self.config.row_actions)).collect()
        };

        TableRender {
            title: self.config.title,
            columns,
            rows,
            info: self.page_info(),
            placeholder,
        }
    }
}

fn align_for(kind: ColumnKind) -> Align {
    match kind {
        ColumnKind::Number | ColumnKind::Currency => Align::Right,
        ColumnKind::Date | ColumnKind::DateTime | ColumnKind::Status => Align::Center,
        ColumnKind::Text => Align::Left,
    }
}

/// Union of field names across all records, in first-seen order, minus the
/// hidden list. Looking only at the first record would drop columns when
/// records are heterogeneous.
fn derive_columns(records: &[Record], hidden: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for record in records {
        for name in record.field_names() {
            if hidden.contains(&name) {
                continue;
            }
            if seen.insert(name.to_owned()) {
                columns.push(name.to_owned());
            }
        }
    }
    columns
}

fn render_row(record: &Record, columns: &[Column], actions: &'static [RowAction]) -> RenderedRow {
    let cells = columns
        .iter()
        .map(|column| {
            let raw = record.text(&column.name);
            let (text, badge) = match column.kind {
                ColumnKind::Number => (
                    record.number(&column.name).map_or_else(|| raw.into_owned(), format_number),
                    None,
                ),
                ColumnKind::Currency => (
                    record.number(&column.name).map_or_else(|| raw.into_owned(), format_currency),
                    None,
                ),
                ColumnKind::Date => (format_date(&raw), None),
                ColumnKind::DateTime => (format_datetime(&raw), None),
                ColumnKind::Status => (raw.into_owned(), record.status()),
                ColumnKind::Text => (raw.into_owned(), None),
            };
            RenderedCell { text, align: column.align, badge }
        })
        .collect();

    RenderedRow { id: record.id().unwrap_or_default().to_owned(), cells, actions }
}
