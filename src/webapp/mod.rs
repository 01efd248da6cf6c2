//! The demand table page.
//!
//! [`SectorTable`] is the view state of the table: an append-only body of
//! rendered rows. [`DemandPage`] wires the table to a running server with
//! two explicit event handlers, [`DemandPage::on_ready`] (fill the table
//! once) and [`DemandPage::on_recalculate`] (re-fetch and log, no visible
//! effect).

use serde_json::Value;

use crate::client::ApiClient;
use crate::models::Sector;

/// Render one table row: name, location, and an empty demand cell.
/// Values are interpolated verbatim; the cells carry raw text, not markup.
fn render_row(sector: &Sector) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td></td></tr>",
        sector.name, sector.location
    )
}

/// Accumulated body of the demand table.
///
/// [`SectorTable::append`] only ever adds rows; nothing clears them, so
/// filling twice leaves both batches in the table.
#[derive(Debug, Default)]
pub struct SectorTable {
    body: String,
    rows: usize,
}

impl SectorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the given sectors in order and append them to the table body.
    pub fn append(&mut self, sectors: &[Sector]) {
        for sector in sectors {
            self.body.push_str(&render_row(sector));
        }
        self.rows += sectors.len();
    }

    /// The rendered `<tr>` concatenation.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }
}

/// The demand page with its event handlers.
pub struct DemandPage {
    client: ApiClient,
    table: SectorTable,
}

impl DemandPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            table: SectorTable::new(),
        }
    }

    /// Page-ready handler, invoked once: fetch the sector list and append
    /// it to the table. A failed fetch leaves the table untouched.
    pub async fn on_ready(&mut self) {
        match self.client.get_default_sectors().await {
            Ok(sectors) => self.table.append(&sectors),
            Err(e) => tracing::debug!("sector fetch failed: {}", e),
        }
    }

    /// Click handler of the recalculate button: fetch the sector list again
    /// and write the raw response to the debug log. The table is not
    /// touched. Calls may overlap; completion order is not defined.
    pub async fn on_recalculate(&self) {
        match self.client.get_default_sectors_raw().await {
            Ok(raw) => log_raw_response(&raw),
            Err(e) => tracing::debug!("recalculate fetch failed: {}", e),
        }
    }

    pub fn table(&self) -> &SectorTable {
        &self.table
    }

    /// The full page document with the current table body.
    pub fn html(&self) -> String {
        render_page(&self.table)
    }
}

/// Diagnostic channel of the recalculate trigger.
fn log_raw_response(raw: &Value) {
    tracing::debug!("recalculate response: {}", raw);
}

/// Render the demand page document around the given table.
pub fn render_page(table: &SectorTable) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Sector demands</title>\n\
         </head>\n\
         <body>\n\
         <h1>Sector demands</h1>\n\
         <table>\n\
         <thead><tr><th>Sector</th><th>Location</th><th>Demand</th></tr></thead>\n\
         <tbody id=\"demand-table\">{}</tbody>\n\
         </table>\n\
         <button id=\"calc-btn\">Calculate</button>\n\
         </body>\n\
         </html>\n",
        table.body()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(name: &str, location: &str) -> Sector {
        Sector {
            index: 0,
            id: format!("{}/{}", name.to_lowercase(), location.to_lowercase()),
            name: name.to_string(),
            code: String::new(),
            location: location.to_string(),
            description: None,
        }
    }

    #[test]
    fn empty_append_leaves_the_table_unchanged() {
        let mut table = SectorTable::new();
        table.append(&[]);
        assert_eq!(table.body(), "");
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn renders_one_row_per_sector_in_response_order() {
        let mut table = SectorTable::new();
        table.append(&[sector("Retail", "Zone A"), sector("Manufacturing", "Zone B")]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.body(),
            "<tr><td>Retail</td><td>Zone A</td><td></td></tr>\
             <tr><td>Manufacturing</td><td>Zone B</td><td></td></tr>"
        );
    }

    #[test]
    fn appending_twice_accumulates_rows() {
        let mut table = SectorTable::new();
        table.append(&[sector("A", "US"), sector("B", "US")]);
        table.append(&[sector("C", "US")]);

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.body().matches("<tr>").count(), 3);
    }

    #[test]
    fn interpolation_is_verbatim() {
        let mut table = SectorTable::new();
        table.append(&[sector("Fruit & vegetables", "US <east>")]);
        assert!(table
            .body()
            .contains("<td>Fruit & vegetables</td><td>US <east></td>"));
    }

    #[test]
    fn page_document_hosts_the_table_and_the_button() {
        let mut table = SectorTable::new();
        table.append(&[sector("Retail", "Zone A")]);
        let html = render_page(&table);

        assert!(html.contains("<tbody id=\"demand-table\">"));
        assert!(html.contains("<button id=\"calc-btn\">"));
        assert!(html.contains("<tr><td>Retail</td><td>Zone A</td><td></td></tr>"));
    }
}
