pub mod countries;

use crate::db::Country;

/// HTML page → country records. Pure; the fetch happens elsewhere.
pub fn extract_countries(html: &str) -> Vec<Country> {
    countries::extract(html)
}
