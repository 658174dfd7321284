/// Broker name used when a listing has a contact box but no broker
pub const DEFAULT_BROKER: &str = "Dueño Directo";

/// One property extracted from a detail page
///
/// Every field defaults to its zero value when the page omits the label or
/// its value fails to convert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRecord {
    /// Price in Chilean pesos
    pub price_clp: f64,
    /// Price in Unidades de Fomento
    pub price_uf: f64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub parking_spots: i64,
    /// Total lot area in m²
    pub total_area: f64,
    /// Built area in m²
    pub built_area: f64,
    pub construction_year: i64,
    pub commune: String,
    pub address: String,
    /// Source detail page
    pub url: String,
    pub property_type: String,
    pub seller: String,
    pub broker: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
}

impl PropertyRecord {
    /// Empty record for the detail page at `url`
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Splits a `"Comuna, calle y número"` value: the first part is the
    /// commune, the rest is the street address
    pub fn set_location(&mut self, value: &str) {
        match value.split_once(',') {
            Some((commune, street)) => {
                self.commune = commune.trim().to_string();
                self.address = street.trim().to_string();
            }
            None => self.commune = value.trim().to_string(),
        }
    }

    /// Fills in the broker when the listing is sold directly by its owner
    pub fn apply_default_broker(&mut self) {
        if self.broker.is_empty() {
            self.broker = DEFAULT_BROKER.to_string();
        }
    }
}
