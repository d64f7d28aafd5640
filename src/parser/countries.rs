use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::db::Country;

static COUNTRY_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".country").unwrap());
static NAME_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".country-name").unwrap());
static POPULATION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".country-population").unwrap());

/// Pull every `.country` block out of the page, in document order.
pub fn extract(html: &str) -> Vec<Country> {
    let document = Html::parse_document(html);

    document
        .select(&COUNTRY_SEL)
        .map(|el| Country {
            name: child_text(el, &NAME_SEL),
            population: child_text(el, &POPULATION_SEL),
        })
        .collect()
}

/// Text of all matching descendants, joined and trimmed. Empty when nothing matches.
fn child_text(el: ElementRef<'_>, sel: &Selector) -> String {
    el.select(sel)
        .flat_map(|child| child.text())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn simple_page_in_document_order() {
        let countries = extract(&fixture("countries"));
        let names: Vec<&str> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Andorra", "United Arab Emirates", "Afghanistan", "Angola"]);
        assert_eq!(countries[0].population, "84000");
        assert_eq!(countries[3].population, "13068161");
    }

    #[test]
    fn flag_icon_and_whitespace_trimmed() {
        let countries = extract(&fixture("countries"));
        assert!(countries
            .iter()
            .all(|c| c.name == c.name.trim() && !c.name.is_empty()));
    }

    #[test]
    fn missing_population_is_empty() {
        let html = r#"
            <div class="country">
                <h3 class="country-name">Atlantis</h3>
                <div class="country-info"><span class="country-capital">Poseidonia</span></div>
            </div>"#;
        let countries = extract(html);
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].name, "Atlantis");
        assert_eq!(countries[0].population, "");
    }

    #[test]
    fn missing_name_is_empty() {
        let html = r#"<div class="country"><span class="country-population"> 42 </span></div>"#;
        let countries = extract(html);
        assert_eq!(countries[0].name, "");
        assert_eq!(countries[0].population, "42");
    }

    #[test]
    fn no_containers_no_records() {
        assert!(extract("<html><body><p>Nothing here</p></body></html>").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn duplicates_pass_through() {
        let html = r#"
            <div class="country"><h3 class="country-name">Chad</h3><span class="country-population">1</span></div>
            <div class="country"><h3 class="country-name">Chad</h3><span class="country-population">2</span></div>"#;
        let countries = extract(html);
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[1].population, "2");
    }
}
