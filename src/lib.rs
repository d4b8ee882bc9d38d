/*!
# Table Viewer

A browser-based viewer for delimited-text tables, built in Rust.

## Overview

A user uploads a CSV (or TSV) file and the viewer renders it as a paginated,
filterable table. The current dataset and filter selections can be saved to a
single-slot store on the server and loaded back later. The slot lives in
memory and is overwritten by every save.

## Architecture

### Tabular data (`table`)
- `Schema` - ordered column names, fixed at ingestion
- `Dataset` - rows validated against the schema
- `FilterState` - per-column substring patterns
- `Snapshot` - the (dataset, filters) pair read from or written to the stored JSON

### Filter/Pagination Engine (`engine`)
- Case-insensitive substring filtering, order-stable
- Distinct-value discovery; columns with at most 10 values get a selector
- Page slicing; out-of-range pages are empty

### Persistence (`store`, `gateway`)
- `SnapshotStore` - replace/read contract over a raw JSON payload, `MemoryStore` implementation
- `Gateway` - synchronous put/get used by the viewer

### Presentation (`viewer`, `render`, `app`)
- `Viewer` - upload, filter, page, save, load and role actions
- Server-side HTML rendering of the current view
- axum routes for the page and the `/api/snapshot` endpoint

## REST API Endpoints

- `GET /api/snapshot` - Last saved snapshot, or 404 if nothing was saved
- `PUT /api/snapshot` (or `POST`) - Replace the stored snapshot with any JSON body, kept verbatim
- `GET /` - The viewer page
- `POST /upload`, `POST /save`, `POST /load` - Page actions
- `GET /filter`, `GET /page`, `GET /page-size`, `GET /role` - Page controls
- `GET /export.csv` - Filtered rows as CSV
*/

pub mod downloader;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod store;
pub mod table;
pub mod viewer;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod config;
#[cfg(feature = "web")]
pub mod render;

pub use error::{GatewayError, ParseError, ViewerError};
pub use gateway::{Gateway, StoreGateway};
pub use store::{MemoryStore, SnapshotStore};
pub use table::{Dataset, FilterState, Record, Row, Schema, Snapshot};
pub use viewer::{LoadOutcome, Role, Viewer};
