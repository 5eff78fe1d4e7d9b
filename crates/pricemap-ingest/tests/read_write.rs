use encoding_rs::{UTF_8, WINDOWS_1251};
use pricemap_ingest::{
    CellEdit, ContainerFormat, CsvOptions, IngestError, ReadOptions, patch_first_sheet,
    read_table, write_table,
};
use pricemap_model::{CellValue, Table};
use proptest::prelude::*;

fn price_table() -> Table {
    Table::from_strings(
        &["Артикул", "Бренд", "Цена", "Количество"],
        vec![
            vec![
                CellValue::from("A1-123"),
                CellValue::from("SAMSUNG"),
                CellValue::Float(1999.99),
                CellValue::Int(5),
            ],
            vec![
                CellValue::from("0451103079"),
                CellValue::from("BOSCH"),
                CellValue::Float(350.0),
                CellValue::Int(12),
            ],
        ],
    )
}

#[test]
fn xlsx_output_reads_back_with_header() {
    let bytes = write_table(&price_table(), ContainerFormat::Xlsx, b';', UTF_8).expect("write");
    let parsed = read_table(&bytes, "out.xlsx", &ReadOptions::default()).expect("read");
    assert_eq!(parsed.format, ContainerFormat::Xlsx);
    assert!(parsed.encoding.is_none());
    assert!(parsed.has_header());
    assert_eq!(parsed.table.header(0), Some("Артикул"));
    assert_eq!(parsed.table.height(), 2);
    assert_eq!(parsed.table.rows[1][0], CellValue::from("0451103079"));
    assert_eq!(parsed.table.rows[0][2].as_f64(), Some(1999.99));
}

#[test]
fn cp1251_csv_falls_back_from_utf8() {
    let (bytes, _, _) = WINDOWS_1251.encode("Артикул;Цена\nA1;100\n");
    let parsed = read_table(&bytes, "prices.csv", &ReadOptions::default()).expect("read");
    assert_eq!(parsed.encoding, Some(WINDOWS_1251));
    assert_eq!(parsed.table.header(0), Some("Артикул"));
    assert_eq!(parsed.table.rows[0][1], CellValue::Int(100));
}

#[test]
fn utf8_only_list_rejects_cp1251_bytes() {
    let (bytes, _, _) = WINDOWS_1251.encode("Артикул;Цена\nA1;100\n");
    let options = ReadOptions {
        csv: CsvOptions::default()
            .with_encoding_labels(&["utf-8"])
            .expect("known label"),
        ..ReadOptions::default()
    };
    let err = read_table(&bytes, "prices.csv", &options).unwrap_err();
    assert!(matches!(err, IngestError::Undecodable { .. }));
    assert!(err.is_unreadable());
}

#[test]
fn csv_output_keeps_input_encoding() {
    let bytes = write_table(&price_table(), ContainerFormat::Csv, b';', WINDOWS_1251)
        .expect("write");
    let parsed = read_table(&bytes, "out.csv", &ReadOptions::default()).expect("read");
    assert_eq!(parsed.encoding, Some(WINDOWS_1251));
    assert_eq!(parsed.table.header(3), Some("Количество"));
    assert_eq!(parsed.table.rows[1][0], CellValue::from("0451103079"));
}

#[test]
fn garbage_workbook_is_unreadable() {
    let err = read_table(b"PK\x03\x04 not really a zip", "prices.xlsx", &ReadOptions::default())
        .unwrap_err();
    assert!(err.is_unreadable());
    let err = read_table(b"", "prices.xlsx", &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::EmptyInput));
}

#[test]
fn patching_keeps_untouched_cells() {
    let bytes = write_table(&price_table(), ContainerFormat::Xlsx, b';', UTF_8).expect("write");
    let parsed = read_table(&bytes, "in.xlsx", &ReadOptions::default()).expect("read");
    let (row, column) = parsed.table.sheet_position(1, 3);
    let patched = patch_first_sheet(
        &bytes,
        &[CellEdit {
            row,
            column,
            value: CellValue::Int(10),
        }],
    )
    .expect("patch");
    let reparsed = read_table(&patched, "in.xlsx", &ReadOptions::default()).expect("reread");
    assert_eq!(reparsed.table.rows[1][3].as_f64(), Some(10.0));
    assert_eq!(reparsed.table.rows[0], parsed.table.rows[0]);
    assert_eq!(reparsed.table.headers, parsed.table.headers);
}

proptest! {
    #[test]
    fn csv_text_cells_survive_writing(values in prop::collection::vec("[A-Za-zА-Яа-я]{1,12}", 1..8)) {
        let rows = values.iter().map(|v| vec![CellValue::from(v.as_str()), CellValue::Int(1)]).collect();
        let table = Table::from_strings(&["Наименование", "Кол-во"], rows);
        let bytes = write_table(&table, ContainerFormat::Csv, b';', UTF_8).unwrap();
        let parsed = read_table(&bytes, "x.csv", &ReadOptions::default()).unwrap();
        prop_assert_eq!(parsed.table.height(), values.len());
        for (row, value) in parsed.table.rows.iter().zip(&values) {
            prop_assert_eq!(&row[0], &CellValue::from(value.as_str()));
        }
    }
}
