//! Table controllers for the tracker pages.
//!
//! All pages share one parametrized [`TableView`], configured per page by
//! a [`ViewConfig`] preset (hidden fields, status pre-filter, page size,
//! row actions). Rendering is a pure function of the current state and
//! produces a [`TableRender`] row model a host shell (CLI, web) can draw.

mod config;
mod format;
mod table;

pub use config::{ColumnKind, RowAction, TRUNCATE_FIELDS, ViewConfig, column_kind};
pub use format::{format_currency, format_date, format_datetime, format_number};
pub use table::{
    Align, Column, LoadTicket, PageInfo, Phase, RenderedCell, RenderedRow, TableRender, TableView,
};
