use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Column order of the exported table.
pub const COLUMNS: [&str; 22] = [
    "title",
    "url",
    "city",
    "location",
    "property_type",
    "latitude",
    "longitude",
    "price",
    "rating",
    "reviews",
    "guests",
    "studio",
    "bedrooms",
    "beds",
    "baths",
    "shared_bath",
    "kitchen",
    "wifi",
    "washer",
    "tv",
    "parking",
    "refrigerator",
];

/// One scraped listing row.
///
/// Every field is optional: markup missing from the source page is an
/// expected state and is recorded as an empty cell, not an error.
/// Boolean flags are tri-state through `Option<bool>`: `None` means the
/// page never answered the question, `Some(false)` means a confirmed no.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub title: Option<String>,
    pub url: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: Option<f64>,
    pub rating: Option<String>,
    pub reviews: Option<u32>,
    pub guests: Option<u32>,
    pub studio: Option<bool>,
    pub bedrooms: Option<u32>,
    pub beds: Option<u32>,
    pub baths: Option<f64>,
    pub shared_bath: Option<bool>,
    pub kitchen: Option<bool>,
    pub wifi: Option<bool>,
    pub washer: Option<bool>,
    pub tv: Option<bool>,
    pub parking: Option<bool>,
    pub refrigerator: Option<bool>,
}

impl Listing {
    /// Render the record as one cell per column, in `COLUMNS` order.
    fn to_cells(&self) -> Vec<Option<String>> {
        vec![
            self.title.clone(),
            self.url.clone(),
            self.city.clone(),
            self.location.clone(),
            self.property_type.clone(),
            number(&self.latitude),
            number(&self.longitude),
            number(&self.price),
            self.rating.clone(),
            number(&self.reviews),
            number(&self.guests),
            flag(&self.studio),
            number(&self.bedrooms),
            number(&self.beds),
            number(&self.baths),
            flag(&self.shared_bath),
            flag(&self.kitchen),
            flag(&self.wifi),
            flag(&self.washer),
            flag(&self.tv),
            flag(&self.parking),
            flag(&self.refrigerator),
        ]
    }
}

fn number<T: ToString>(value: &Option<T>) -> Option<String> {
    value.as_ref().map(T::to_string)
}

fn flag(value: &Option<bool>) -> Option<String> {
    value.map(|set| if set { "1" } else { "0" }.to_string())
}

/// Column-major accumulator for scraped listings.
///
/// Rows arrive fully assembled, one per visited item, so the per-column
/// value lists stay equally long. Export verifies that invariant and
/// refuses to write a ragged table.
#[derive(Debug)]
pub struct Dataset {
    columns: Vec<Vec<Option<String>>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self {
            columns: vec![Vec::new(); COLUMNS.len()],
        }
    }

    /// Commit one record, appending a cell to every column.
    pub fn append(&mut self, record: &Listing) {
        for (column, cell) in self.columns.iter_mut().zip(record.to_cells()) {
            column.push(cell);
        }
    }

    /// Number of committed rows.
    pub fn len(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write all rows as CSV into `dir`, returning the file path.
    ///
    /// The file name gets a `.csv` extension when missing. Missing values
    /// serialize as empty cells. If the columns disagree on the row count,
    /// the export fails before any file is created.
    pub fn export(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        let rows = self.len();
        for (column_name, column) in COLUMNS.iter().zip(&self.columns) {
            if column.len() != rows {
                bail!(
                    "column '{}' holds {} values where {} rows were committed; refusing to export",
                    column_name,
                    column.len(),
                    rows
                );
            }
        }

        let file_name = if name.ends_with(".csv") {
            name.to_string()
        } else {
            format!("{name}.csv")
        };
        let path = dir.join(file_name);

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        writer.write_record(COLUMNS)?;
        for row in 0..rows {
            writer.write_record(
                self.columns
                    .iter()
                    .map(|column| column[row].as_deref().unwrap_or("")),
            )?;
        }
        writer.flush()?;

        Ok(path)
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}
