use crate::output::traits::{Exporter, OutputError, OutputResult};
use crate::property::PropertyRecord;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed header of the exported file
pub const CSV_HEADERS: [&str; 16] = [
    "Comuna",
    "Link",
    "Tipo_Vivienda",
    "N_Habitaciones",
    "N_Baños",
    "N_Estacionamientos",
    "Total_Superficie",
    "Superficie_Construida",
    "Valor_UF",
    "Valor_CLP",
    "Dirección",
    "Quien_Vende",
    "Corredor",
    "Latitud",
    "Longitud",
    "Descripcion",
];

/// Formats one record as a row matching [`CSV_HEADERS`]
///
/// Areas and UF value use 2 decimals, the peso price 0, coordinates 6.
pub fn record_to_row(record: &PropertyRecord) -> [String; 16] {
    [
        record.commune.clone(),
        record.url.clone(),
        record.property_type.clone(),
        record.bedrooms.to_string(),
        record.bathrooms.to_string(),
        record.parking_spots.to_string(),
        format!("{:.2}", record.total_area),
        format!("{:.2}", record.built_area),
        format!("{:.2}", record.price_uf),
        format!("{:.0}", record.price_clp),
        record.address.clone(),
        record.seller.clone(),
        record.broker.clone(),
        format!("{:.6}", record.latitude),
        format!("{:.6}", record.longitude),
        record.description.clone(),
    ]
}

/// Writes records as CSV to any writer
pub fn write_records<W: Write>(writer: W, records: &[PropertyRecord]) -> OutputResult<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record(record_to_row(record))?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Exports records to a CSV file, replacing any existing file
#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Exporter for CsvExporter {
    fn export(&self, records: &[PropertyRecord]) -> OutputResult<usize> {
        let file = File::create(&self.path).map_err(|source| OutputError::Create {
            path: self.path.display().to_string(),
            source,
        })?;
        write_records(file, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> PropertyRecord {
        PropertyRecord {
            price_clp: 342_000_000.4,
            price_uf: 8950.0,
            bedrooms: 4,
            bathrooms: 3,
            parking_spots: 2,
            total_area: 1250.5,
            built_area: 180.0,
            construction_year: 1998,
            commune: "La Reina".to_string(),
            address: "Príncipe de Gales 5921".to_string(),
            url: "https://chilepropiedades.cl/ver-publicacion/1".to_string(),
            property_type: "Casa".to_string(),
            seller: "María González".to_string(),
            broker: "Propiedades Cordillera".to_string(),
            latitude: -33.445123,
            longitude: -70.541987,
            description: "Amplia casa, con \"jardín\"".to_string(),
        }
    }

    #[test]
    fn test_row_precision() {
        let row = record_to_row(&sample());
        assert_eq!(row[3], "4");
        assert_eq!(row[6], "1250.50");
        assert_eq!(row[7], "180.00");
        assert_eq!(row[8], "8950.00");
        assert_eq!(row[9], "342000000");
        assert_eq!(row[13], "-33.445123");
        assert_eq!(row[14], "-70.541987");
    }

    #[test]
    fn test_zero_record_row() {
        let row = record_to_row(&PropertyRecord::default());
        assert_eq!(row[6], "0.00");
        assert_eq!(row[9], "0");
        assert_eq!(row[13], "0.000000");
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("propiedades.csv");
        std::fs::write(&path, "stale content\n").unwrap();

        let written = CsvExporter::new(&path)
            .export(&[sample(), PropertyRecord::default()])
            .unwrap();
        assert_eq!(written, 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_HEADERS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "La Reina");
        assert_eq!(&rows[0][15], "Amplia casa, con \"jardín\"");
    }

    #[test]
    fn test_export_empty_still_writes_header() {
        let mut buffer = Vec::new();
        assert_eq!(write_records(&mut buffer, &[]).unwrap(), 0);
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Comuna,Link,"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("out.csv");
        let result = CsvExporter::new(&path).export(&[sample()]);
        assert!(matches!(result, Err(OutputError::Create { .. })));
    }
}
