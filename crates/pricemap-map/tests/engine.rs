use std::cell::Cell;
use std::collections::BTreeMap;

use pricemap_map::{
    Confirmation, ContentClassifier, InferenceEngine, InferenceOptions, MapError, NoConfirmation,
};
use pricemap_model::{CellValue, ColumnProfile, Role, Table};
use pricemap_standards::{Standards, embedded_standards};

fn standards() -> &'static Standards {
    embedded_standards().expect("embedded standards")
}

fn text(values: &[&str]) -> Vec<CellValue> {
    values.iter().map(|v| CellValue::from(*v)).collect()
}

fn headerless(columns: Vec<Vec<CellValue>>) -> Table {
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    let rows = (0..height)
        .map(|row| {
            columns
                .iter()
                .map(|column| column.get(row).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Table::new(Vec::new(), rows)
}

#[test]
fn scenario_assigns_all_four_roles() {
    let table = Table::from_strings(
        &["Art", "Brand", "RUB", "Qty"],
        vec![vec![
            CellValue::from("A1-123"),
            CellValue::from("SAMSUNG"),
            CellValue::Float(1999.99),
            CellValue::Int(5),
        ]],
    );
    let engine = InferenceEngine::new(&standards().catalog, InferenceOptions::default());
    let inference = engine.infer(&table, None, &NoConfirmation).expect("infer");
    for (index, role) in [Role::Article, Role::Brand, Role::Price, Role::Quantity]
        .into_iter()
        .enumerate()
    {
        let profile = &inference.profiles[index];
        assert_eq!(profile.assigned_role(), role, "column {index}");
        assert!(profile.confidence() > 0.7, "column {index}");
    }
    assert!(inference.warnings.is_empty());
}

#[test]
fn unlabeled_price_list_assigns_every_role() {
    let table = headerless(vec![
        text(&["W712/75", "BKR6E", "K20TT", "F026400049"]),
        text(&[
            "Фильтр масляный MANN W712/75",
            "Свеча зажигания NGK BKR6E",
            "Свеча зажигания DENSO K20TT",
            "Фильтр воздушный BOSCH F026400049",
        ]),
        text(&["MANN", "NGK", "DENSO", "BOSCH"]),
        [350, 1200, 780, 450].into_iter().map(CellValue::Int).collect(),
        [1, 4, 2, 1].into_iter().map(CellValue::Int).collect(),
    ]);
    let engine = InferenceEngine::new(&standards().catalog, InferenceOptions::default());
    let inference = engine.infer(&table, None, &NoConfirmation).expect("infer");
    let roles: Vec<Role> = inference.profiles.iter().map(|p| p.assigned_role()).collect();
    assert_eq!(
        roles,
        vec![Role::Article, Role::Name, Role::Brand, Role::Price, Role::Quantity]
    );
    assert!(inference.uninterpretable.is_empty());
    assert!(!inference.reviewed);
}

#[test]
fn first_pattern_matches_score_full_confidence() {
    let catalog = &standards().catalog;
    let examples: [(Role, Vec<CellValue>); 5] = [
        (Role::Brand, text(&["SAMSUNG", "Bosch", "PHILIPS"])),
        (Role::Article, text(&["AB-1234", "X5-99", "KL/778"])),
        (Role::Price, text(&["12.50", "7,99", "1500.75"])),
        (Role::Quantity, text(&["5", "12", "300"])),
        (Role::Unit, text(&["шт", "кг", "упак."])),
    ];
    let classifier = ContentClassifier::new(catalog);
    for (role, sample) in examples {
        let entry = catalog.role(role).expect("role in catalog");
        let first = &entry.patterns[0];
        assert!(
            sample.iter().all(|cell| first.is_match(&cell.to_string())),
            "{role} example does not match its first pattern"
        );
        let scores = classifier.classify(0, &sample).expect("classify");
        assert_eq!(scores.score(role), 1.0, "{role}");
    }
}

#[test]
fn competing_articles_resolve_to_the_shorter_column_every_time() {
    let table = headerless(vec![
        text(&["ABCDEF-1234567", "GHIJKL-7654321", "MNOPQR-1112223"]),
        text(&["AB-123", "CD-456", "EF-789"]),
    ]);
    let engine = InferenceEngine::new(&standards().catalog, InferenceOptions::default());
    for _ in 0..3 {
        let inference = engine.infer(&table, None, &NoConfirmation).expect("infer");
        let roles: Vec<Role> = inference.profiles.iter().map(|p| p.assigned_role()).collect();
        assert_eq!(roles, vec![Role::Undefined, Role::Article]);
        assert_eq!(inference.profiles[0].confidence(), 0.0);
    }
}

#[test]
fn uninterpretable_columns_warn_or_fail() {
    let table = headerless(vec![
        text(&["AB-123", "CD-456", "EF-789"]),
        text(&["под заказ", "в пути", "нет"]),
    ]);
    let engine = InferenceEngine::new(&standards().catalog, InferenceOptions::default());
    let inference = engine.infer(&table, None, &NoConfirmation).expect("infer");
    assert_eq!(inference.uninterpretable, vec![1]);
    assert_eq!(inference.warnings.len(), 1);
    assert_eq!(inference.profiles[1].assigned_role(), Role::Undefined);

    let strict = InferenceOptions {
        strict_columns: true,
        ..InferenceOptions::default()
    };
    let err = InferenceEngine::new(&standards().catalog, strict)
        .infer(&table, None, &NoConfirmation)
        .unwrap_err();
    assert_eq!(err, MapError::UninterpretableColumns { indices: vec![1] });
}

#[test]
fn schema_source_headers_pin_columns() {
    let schema = standards()
        .suppliers
        .get("moskvorechie_vip")
        .expect("schema");
    let table = Table::from_strings(
        &["Номер производителя", "Производитель", "Цена, Рубль", "Наличие на складе"],
        vec![vec![
            CellValue::from("0451103079"),
            CellValue::from("BOSCH"),
            CellValue::Float(350.5),
            CellValue::Int(4),
        ]],
    );
    let engine = InferenceEngine::new(&standards().catalog, InferenceOptions::default());

    let unpinned = engine.infer(&table, None, &NoConfirmation).expect("infer");
    assert_eq!(unpinned.profiles[0].header_role, Some(Role::Brand));

    let pinned = engine
        .infer(&table, Some(schema), &NoConfirmation)
        .expect("infer");
    let roles: Vec<Role> = pinned.profiles.iter().map(|p| p.assigned_role()).collect();
    assert_eq!(
        roles,
        vec![Role::Article, Role::Brand, Role::Price, Role::Quantity]
    );
    assert!(pinned.profiles.iter().all(ColumnProfile::is_pinned));
}

fn weak_quantity_table() -> Table {
    headerless(vec![text(&["1", "2", "3", "≈4", "abc"])])
}

#[test]
fn low_confidence_triggers_review() {
    let calls = Cell::new(0);
    let hook = |profiles: &[ColumnProfile]| {
        calls.set(calls.get() + 1);
        assert_eq!(profiles[0].assigned_role(), Role::Quantity);
        Confirmation::Remap(BTreeMap::from([(0, Role::Price)]))
    };
    let engine = InferenceEngine::new(&standards().catalog, InferenceOptions::default());
    let inference = engine.infer(&weak_quantity_table(), None, &hook).expect("infer");
    assert_eq!(calls.get(), 1);
    assert!(inference.reviewed);
    assert_eq!(inference.profiles[0].assigned_role(), Role::Price);
    assert!(inference.profiles[0].is_pinned());
}

#[test]
fn rejected_review_fails_inference() {
    let reject = |_: &[ColumnProfile]| Confirmation::Reject;
    let engine = InferenceEngine::new(&standards().catalog, InferenceOptions::default());
    let err = engine
        .infer(&weak_quantity_table(), None, &reject)
        .unwrap_err();
    assert_eq!(err, MapError::ConfirmationRejected);
}

#[test]
fn confident_tables_skip_review() {
    let reject = |_: &[ColumnProfile]| Confirmation::Reject;
    let table = headerless(vec![text(&["AB-123", "CD-456", "EF-789"])]);
    let engine = InferenceEngine::new(&standards().catalog, InferenceOptions::default());
    let inference = engine.infer(&table, None, &reject).expect("infer");
    assert!(!inference.reviewed);
}
