//! CSV feed mapping.
//!
//! Turns the published spreadsheet text into `PortfolioData`:
//! header-keyed records, trimmed keys and values, column defaults,
//! media classification, delivery rewriting, section bucketing and
//! priority ordering.
//!
//! Column names match case-insensitively, and both the English and the
//! Spanish spreadsheet headers are accepted.

use csv::{ReaderBuilder, StringRecord, Trim};

use super::delivery::{DeliveryOptions, optimize_url};
use super::error::{FeedError, FeedResult};
use super::item::{DEFAULT_SECTION, Layout, ProjectItem};
use super::media::detect_media_type;
use super::portfolio::PortfolioData;

/// Recognized column, with every accepted (normalized) header spelling.
/// Discriminants index `ColumnMap::positions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Section,
    Title,
    MediaUrl,
    History,
    Priority,
    Layout,
}

impl Column {
    const ALL: [Self; 6] = [
        Self::Section,
        Self::Title,
        Self::MediaUrl,
        Self::History,
        Self::Priority,
        Self::Layout,
    ];

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Section => &["section", "seccion", "sección"],
            Self::Title => &["title", "titulo", "título"],
            Self::MediaUrl => &["media_url", "mediaurl"],
            Self::History => &["history", "historial"],
            Self::Priority => &["priority", "prioridad"],
            Self::Layout => &["layout"],
        }
    }

    fn matches(self, normalized_header: &str) -> bool {
        self.aliases().contains(&normalized_header)
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Header position of each recognized column. First match wins.
#[derive(Debug, Default)]
struct ColumnMap {
    positions: [Option<usize>; Column::ALL.len()],
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut map = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            let normalized = normalize_header(header);
            for column in Column::ALL {
                let slot = &mut map.positions[column as usize];
                if slot.is_none() && column.matches(&normalized) {
                    *slot = Some(idx);
                }
            }
        }
        map
    }

    fn get<'r>(&self, record: &'r StringRecord, column: Column) -> &'r str {
        self.positions[column as usize]
            .and_then(|idx| record.get(idx))
            .map_or("", str::trim)
    }

    fn item_from(&self, record: &StringRecord, delivery: &DeliveryOptions) -> ProjectItem {
        let section = match self.get(record, Column::Section) {
            "" => DEFAULT_SECTION,
            s => s,
        };
        let raw_url = self.get(record, Column::MediaUrl);

        ProjectItem {
            section: section.to_string(),
            title: self.get(record, Column::Title).to_string(),
            media_url: optimize_url(raw_url, delivery),
            history: self.get(record, Column::History).to_string(),
            priority: coerce_priority(self.get(record, Column::Priority)),
            layout: Layout::from_cell(self.get(record, Column::Layout)),
            media_type: detect_media_type(raw_url),
        }
    }
}

/// Integer priority; anything else (blank, text, decimals) is 0.
pub fn coerce_priority(cell: &str) -> i64 {
    cell.trim().parse().unwrap_or(0)
}

/// Parse feed text into the section-keyed collection.
///
/// Empty and whitespace-only lines are skipped, as are rows whose cells
/// are all blank (`,,,`); such rows never become untitled "Otros"
/// items. A non-blank row whose column count differs from the header
/// fails the whole parse.
pub fn parse_feed(text: &str, delivery: &DeliveryOptions) -> FeedResult<PortfolioData> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?;
    let width = headers.len();
    let columns = ColumnMap::from_headers(headers);

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != width {
            return Err(FeedError::parse(
                record.position().map(csv::Position::line),
                format!(
                    "found record with {} fields, but the header has {width} fields",
                    record.len()
                ),
            ));
        }
        items.push(columns.item_from(&record, delivery));
    }

    Ok(PortfolioData::from_items(items))
}
