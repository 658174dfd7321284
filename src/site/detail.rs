use crate::property::{clean_area, clean_integer, clean_money, FieldError, PropertyRecord};
use crate::site::{selector, SiteSetupError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const LABEL_CLASS: &str = "clp-description-label";
const VALUE_CLASS: &str = "clp-description-value";

/// Pattern of the inline script that places the map marker
const LOCATION_PATTERN: &str =
    r"var publicationLocation\s*=\s*\[\s*(-?[0-9]+\.[0-9]+)\s*,\s*(-?[0-9]+\.[0-9]+)\s*\];";

/// Extracts a [`PropertyRecord`] from a detail page
#[derive(Debug)]
pub struct DetailExtractor {
    details_table: Selector,
    contact_box: Selector,
    subtitle: Selector,
    row: Selector,
    cell: Selector,
    script: Selector,
    description: Selector,
    location: Regex,
}

impl DetailExtractor {
    pub fn new() -> Result<Self, SiteSetupError> {
        Ok(Self {
            details_table: selector(".clp-details-table")?,
            contact_box: selector(".clp-publication-contact-box")?,
            subtitle: selector("h2.subtitle")?,
            row: selector("tr")?,
            cell: selector("td")?,
            script: selector("script")?,
            description: selector("div.clp-description-box")?,
            location: Regex::new(LOCATION_PATTERN)?,
        })
    }

    /// Builds the record for `url`; never fails, unparsable fields stay zero
    pub fn extract(&self, document: &Html, url: &Url) -> PropertyRecord {
        let mut record = PropertyRecord::for_url(url.as_str());

        self.extract_details(document, &mut record);

        if self.extract_contacts(document, &mut record) {
            record.apply_default_broker();
        }

        if let Some((lat, lon)) = self.extract_location(document) {
            record.latitude = lat;
            record.longitude = lon;
        }

        record.description = document
            .select(&self.description)
            .map(|div| div.text().collect::<String>())
            .collect::<String>()
            .trim()
            .to_string();

        record
    }

    /// Walks the label/value pairs of the details tables
    fn extract_details(&self, document: &Html, record: &mut PropertyRecord) {
        let mut label = String::new();

        for table in document.select(&self.details_table) {
            for child in table.children().filter_map(ElementRef::wrap) {
                if has_class(&child, LABEL_CLASS) {
                    label = text_of(&child);
                } else if has_class(&child, VALUE_CLASS) {
                    let value = text_of(&child);
                    if let Err(e) = apply_field(record, &label, &value) {
                        tracing::warn!(
                            url = %record.url,
                            label = %label,
                            value = %value,
                            "Field parse error: {}",
                            e
                        );
                    }
                }
            }
        }
    }

    /// Reads seller and broker names; returns whether a contact box exists
    fn extract_contacts(&self, document: &Html, record: &mut PropertyRecord) -> bool {
        let mut found_box = false;

        for contact_box in document.select(&self.contact_box) {
            found_box = true;

            for heading in contact_box.select(&self.subtitle) {
                let title = text_of(&heading).to_lowercase();
                let Some(name) = self.first_cell_after(&heading) else {
                    continue;
                };
                if name.is_empty() {
                    continue;
                }

                match title.as_str() {
                    "información de contacto" => record.seller = name,
                    "corredora" => record.broker = name,
                    _ => {}
                }
            }
        }

        found_box
    }

    /// Text of the first row's cells in the element following `heading`
    fn first_cell_after(&self, heading: &ElementRef<'_>) -> Option<String> {
        let table = heading.next_siblings().find_map(ElementRef::wrap)?;
        let row = table.select(&self.row).next()?;
        let text: String = row
            .select(&self.cell)
            .flat_map(|cell| cell.text())
            .collect();
        Some(text.trim().to_string())
    }

    fn extract_location(&self, document: &Html) -> Option<(f64, f64)> {
        let script = document
            .select(&self.script)
            .map(|s| s.text().collect::<String>())
            .filter(|text| text.contains("publicationLocation"))
            .last()?;

        let captures = self.location.captures(&script);
        let coordinates = captures.and_then(|c| {
            let lat = c.get(1)?.as_str().parse::<f64>().ok()?;
            let lon = c.get(2)?.as_str().parse::<f64>().ok()?;
            Some((lat, lon))
        });

        // A marker script that does not match still resets the position
        Some(coordinates.unwrap_or((0.0, 0.0)))
    }
}

/// Applies one labeled value to the record
fn apply_field(record: &mut PropertyRecord, label: &str, value: &str) -> Result<(), FieldError> {
    match label {
        "Valor:" => {
            if value.starts_with('$') {
                record.price_clp = clean_money(value)?;
            } else if value.starts_with("UF") {
                record.price_uf = clean_money(value)?;
            }
        }
        "Valor (UF aprox.)*:" => record.price_uf = clean_money(value)?,
        "Valor (CLP aprox.)*:" => record.price_clp = clean_money(value)?,
        "Habitaciones:" => record.bedrooms = clean_integer(value)?,
        "Baño:" | "Baños:" => record.bathrooms = clean_integer(value)?,
        "Estacionamientos:" => record.parking_spots = clean_integer(value)?,
        "Superficie Total:" => record.total_area = clean_area(value)?,
        "Superficie Construida:" => record.built_area = clean_area(value)?,
        "Año Construcción:" => record.construction_year = clean_integer(value)?,
        "Dirección:" => record.set_location(value),
        "Tipo de propiedad:" => record.property_type = value.to_string(),
        _ => {}
    }
    Ok(())
}

fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
