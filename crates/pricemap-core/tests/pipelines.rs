use encoding_rs::WINDOWS_1251;
use pricemap_core::{
    NormalizeOptions, ProcessingPipeline, analyze, annotate_multiplicity, default_registry,
    infer_and_normalize, rewrite_report,
};
use pricemap_ingest::{ReadOptions, read_table, write_xlsx};
use pricemap_model::{CellValue, FailureKind, ProcessorKind, Role, Table};
use pricemap_standards::{SchemaRegistry, Standards, embedded_standards};

fn standards() -> &'static Standards {
    embedded_standards().expect("embedded standards")
}

fn read_back(bytes: &[u8], file_name: &str) -> Table {
    read_table(bytes, file_name, &ReadOptions::default())
        .expect("output is readable")
        .table
}

#[test]
fn scenario_price_list_is_normalized() {
    let input = "Art;Brand;RUB;Qty\nA1-123;SAMSUNG;1999.99;5\n";
    let outcome = infer_and_normalize(
        input.as_bytes(),
        "prices.csv",
        standards(),
        &NormalizeOptions::default(),
    );
    assert!(outcome.success(), "{:?}", outcome.report.failure);
    assert_eq!(outcome.file_name(), "prices_normalized.csv");
    assert_eq!(outcome.report.schema.as_deref(), Some("generic"));
    for role in [Role::Article, Role::Brand, Role::Price, Role::Quantity] {
        let column = outcome.report.column_for(role).expect("assigned");
        assert!(column.confidence > 0.7, "{role}");
    }
    let output = String::from_utf8(outcome.bytes).expect("utf-8 output");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        ["Артикул;Бренд;Цена;Количество", "A1-123;SAMSUNG;1999.99;5"]
    );
}

#[test]
fn unlabeled_price_list_is_normalized() {
    let input = "W712/75;Фильтр масляный MANN W712/75;MANN;350;1\n\
                 BKR6E;Свеча зажигания NGK BKR6E;NGK;1200;4\n\
                 K20TT;Свеча зажигания DENSO K20TT;DENSO;780;2\n\
                 F026400049;Фильтр воздушный BOSCH F026400049;BOSCH;450;1\n";
    let outcome = infer_and_normalize(
        input.as_bytes(),
        "prices.csv",
        standards(),
        &NormalizeOptions::default(),
    );
    assert!(outcome.success(), "{:?}", outcome.report.failure);
    for (role, index) in [
        (Role::Article, 0),
        (Role::Name, 1),
        (Role::Brand, 2),
        (Role::Price, 3),
        (Role::Quantity, 4),
    ] {
        let column = outcome.report.column_for(role).expect("assigned");
        assert_eq!(column.index, index, "{role}");
    }
    let output = String::from_utf8(outcome.bytes).expect("utf-8 output");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Артикул;Бренд;Цена;Количество");
    assert_eq!(lines[1], "W712/75;MANN;350;1");
    assert_eq!(lines[4], "F026400049;BOSCH;450;1");
}

#[test]
fn missing_quantity_is_filled_with_default() {
    let input = "Артикул;Бренд;Цена\nBKR6E;NGK;310,00\nK20TT;DENSO;455,50\n";
    let outcome = infer_and_normalize(
        input.as_bytes(),
        "prices.csv",
        standards(),
        &NormalizeOptions::default(),
    );
    assert!(outcome.success(), "{:?}", outcome.report.failure);
    assert!(outcome.report.column_for(Role::Quantity).is_none());
    assert!(
        outcome
            .report
            .warnings
            .iter()
            .any(|warning| warning.contains("quantity"))
    );
    let table = read_back(&outcome.bytes, "out.csv");
    assert_eq!(table.header(3), Some("Количество"));
    assert!(table.rows.iter().all(|row| row[3] == CellValue::Int(1)));
}

#[test]
fn unreadable_input_is_passed_through() {
    let input = b"\x00\x01\x02 definitely not a workbook";
    let outcome = infer_and_normalize(
        input,
        "prices.xlsx",
        standards(),
        &NormalizeOptions::default(),
    );
    assert_eq!(outcome.report.failure_kind(), Some(FailureKind::UnreadableInput));
    assert_eq!(outcome.bytes, input.to_vec());
    assert_eq!(outcome.file_name(), "prices.xlsx");

    let outcome = rewrite_report(b"%PDF-1.7", "scan.pdf", standards());
    assert_eq!(outcome.report.failure_kind(), Some(FailureKind::UnreadableInput));
    assert_eq!(outcome.bytes, b"%PDF-1.7".to_vec());
}

#[test]
fn unknown_schema_without_default_fails() {
    let embedded = standards();
    let mut standards = embedded.clone();
    standards.suppliers = SchemaRegistry::new(
        embedded.suppliers.version.clone(),
        None,
        embedded.suppliers.schemas().to_vec(),
    )
    .expect("valid registry");
    let input = "Артикул;Бренд;Цена\nBKR6E;NGK;310,00\n";
    let outcome = infer_and_normalize(
        input.as_bytes(),
        "unknown_supplier.csv",
        &standards,
        &NormalizeOptions::default(),
    );
    let failure = outcome.report.failure.as_ref().expect("failure");
    assert_eq!(failure.kind, FailureKind::UnknownSchema);
    insta::assert_snapshot!(failure.message, @"no supplier schema matches 'unknown_supplier.csv'");
}

#[test]
fn missing_roles_are_reported_with_names() {
    let input = "Наименование;Кол-во\nСвеча зажигания иридиевая;4\nФильтр масляный двигателя;2\n";
    let outcome = infer_and_normalize(
        input.as_bytes(),
        "prices.csv",
        standards(),
        &NormalizeOptions::default(),
    );
    let failure = outcome.report.failure.as_ref().expect("failure");
    assert_eq!(failure.kind, FailureKind::MissingRequiredColumn);
    assert_eq!(failure.missing, vec!["article", "brand", "price"]);
    assert!(!outcome.report.columns.is_empty());
    assert_eq!(outcome.bytes, input.as_bytes());
}

fn movement_workbook() -> Vec<u8> {
    let table = Table::from_strings(
        &[
            "Артикул",
            "Кол-во к перем.",
            "Кратность продажи",
            "Остаток отпр",
            "Дост Ост Отпр",
            "К перемещению К",
        ],
        vec![
            vec![
                CellValue::from("W712/75"),
                CellValue::Int(7),
                CellValue::Int(5),
                CellValue::Int(12),
                CellValue::Int(12),
                CellValue::Empty,
            ],
            vec![
                CellValue::from("0451103079"),
                CellValue::Int(7),
                CellValue::Int(5),
                CellValue::Int(3),
                CellValue::Int(3),
                CellValue::Int(7),
            ],
        ],
    );
    write_xlsx(&table).expect("write workbook")
}

#[test]
fn movement_workbook_is_patched_in_place() {
    let outcome = rewrite_report(&movement_workbook(), "Перемещение.xlsx", standards());
    assert!(outcome.success(), "{:?}", outcome.report.failure);
    assert_eq!(outcome.file_name(), "Перемещение.xlsx");
    assert_eq!(outcome.report.cells_changed, 2);

    let table = read_back(&outcome.bytes, "out.xlsx");
    assert_eq!(table.rows[0][5].as_f64(), Some(5.0));
    assert!(table.rows[1][5].is_empty());
    assert_eq!(table.rows[1][0], CellValue::from("0451103079"));
    assert_eq!(table.rows[1][3].as_f64(), Some(3.0));
}

#[test]
fn movement_report_without_output_column_fails() {
    let input = "Артикул;Кол-во к перем.\nW712/75;3\n";
    let outcome = rewrite_report(input.as_bytes(), "moves.csv", standards());
    let failure = outcome.report.failure.as_ref().expect("failure");
    assert_eq!(failure.kind, FailureKind::MissingRequiredColumn);
    assert_eq!(failure.missing, vec!["К перемещению К"]);
}

#[test]
fn multiplicity_keeps_csv_encoding() {
    let (input, _, _) = WINDOWS_1251.encode(
        "Наименование;Номер по каталогу\nСвеча зажигания;BKR6E\nРычаг подвески;35123L\n",
    );
    let outcome = annotate_multiplicity(&input, "Товары.csv", standards());
    assert!(outcome.success(), "{:?}", outcome.report.failure);
    assert_eq!(outcome.file_name(), "Товары_кратность.csv");
    let parsed = read_table(&outcome.bytes, "out.csv", &ReadOptions::default()).expect("read");
    assert_eq!(parsed.encoding, Some(WINDOWS_1251));
    assert_eq!(parsed.table.header(2), Some("Кратность"));
    assert_eq!(parsed.table.rows[0][2], CellValue::Int(4));
    assert_eq!(parsed.table.rows[1][2], CellValue::Int(1));
}

#[test]
fn multiplicity_header_is_added_to_workbook() {
    let table = Table::from_strings(
        &["Наименование", "Номер по каталогу"],
        vec![vec![
            CellValue::from("Амортизатор передний"),
            CellValue::from("334302"),
        ]],
    );
    let input = write_xlsx(&table).expect("write workbook");
    let outcome = annotate_multiplicity(&input, "Товары.xlsx", standards());
    assert!(outcome.success(), "{:?}", outcome.report.failure);
    let table = read_back(&outcome.bytes, "out.xlsx");
    assert_eq!(table.header(2), Some("Кратность"));
    assert_eq!(table.rows[0][2].as_f64(), Some(2.0));
}

#[test]
fn pipeline_dispatches_by_kind() {
    let pipeline = ProcessingPipeline::new(default_registry(), ProcessorKind::Multiplicity, standards())
        .expect("registered");
    assert_eq!(pipeline.kind(), ProcessorKind::Multiplicity);
    let input = "Наименование\nФара\n";
    let (bytes, report) = pipeline.run(input.as_bytes(), "list.csv");
    assert!(report.success());
    assert_eq!(report.processor, ProcessorKind::Multiplicity);
    assert_ne!(bytes, input.as_bytes());

    let (bytes, report) = pipeline.run(b"", "list.csv");
    assert_eq!(report.failure_kind(), Some(FailureKind::UnreadableInput));
    assert!(bytes.is_empty());
}

#[test]
fn analyze_reports_columns_without_projecting() {
    let input = "Art;Brand;RUB;Qty\nA1-123;SAMSUNG;1999.99;5\n";
    let report = analyze(
        input.as_bytes(),
        "prices.csv",
        standards(),
        &NormalizeOptions::default(),
    );
    assert!(report.success());
    assert_eq!(report.columns.len(), 4);
    assert!(report.output_file_name.is_none());
    assert!(report.columns.iter().all(|column| column.output_position.is_none()));
}

#[test]
fn failure_report_serializes_kind() {
    let outcome = annotate_multiplicity(b"", "empty.xlsx", standards());
    let json = serde_json::to_value(&outcome.report).expect("serialize");
    assert_eq!(json["processor"], "multiplicity");
    assert_eq!(json["failure"]["kind"], "unreadable_input");
    assert_eq!(json["output_file_name"], serde_json::Value::Null);
}
