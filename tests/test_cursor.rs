//! Integration tests for walking results with a cursor.

use dal_dbapi::{
    connect, Cursor, CursorIterExt, Datatype, Error, ErrorClass, FieldDesc, ResultCursor,
    ResultTable, ScrollMode, Value, API_LEVEL, NUMBER, PARAM_STYLE, STRING, THREAD_SAFETY,
};

/// The 3-row `name`/`flux` result used throughout.
fn flux_table() -> ResultTable {
    let mut table = ResultTable::new(vec![
        FieldDesc::new("name", Datatype::Char).with_arraysize("*"),
        FieldDesc::new("flux", Datatype::Double).with_unit("mJy"),
    ])
    .unwrap();
    table
        .push_row(vec![Value::from("3C 273"), Value::Double(37.1)])
        .unwrap();
    table
        .push_row(vec![Value::from("3C 279"), Value::Double(12.9)])
        .unwrap();
    table
        .push_row(vec![Value::from("M87"), Value::Null])
        .unwrap();
    table
}

#[test]
fn test_module_capabilities() {
    assert_eq!(API_LEVEL, "2.0");
    assert_eq!(THREAD_SAFETY, 2);
    assert_eq!(PARAM_STYLE, "n/a");
}

#[test]
fn test_name_flux_example() {
    let table = flux_table();
    let mut cursor = ResultCursor::new(&table);

    let pairs: Vec<_> = cursor.description().iter().map(|c| c.as_pair()).collect();
    assert_eq!(pairs, vec![("name", STRING), ("flux", NUMBER)]);

    let rows = cursor.fetch_all().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.len() == 2));
    assert_eq!(rows[2].get_by_name("flux"), Some(&Value::Null));

    assert!(cursor.fetch_one().unwrap().is_none());
}

#[test]
fn test_description_covers_every_datatype() {
    let names = [
        "short",
        "int",
        "long",
        "float",
        "double",
        "floatComplex",
        "doubleComplex",
        "boolean",
        "char",
        "unicodeChar",
        "unsignedByte",
        "bit",
        "votable:timestamp",
    ];
    let fields = names
        .iter()
        .enumerate()
        .map(|(i, dt)| FieldDesc::new(format!("c{}", i), Datatype::parse(dt)))
        .collect();
    let table = ResultTable::new(fields).unwrap();
    let cursor = ResultCursor::new(&table);

    let description = cursor.description();
    assert_eq!(description.len(), names.len());
    for (i, column) in description.iter().enumerate() {
        assert_eq!(column.name, format!("c{}", i));
        let expected = if i < 8 { NUMBER } else { STRING };
        assert_eq!(column.type_code, expected, "datatype {}", names[i]);
    }
}

#[test]
fn test_rewind_matches_fresh_cursor() {
    let table = flux_table();

    let mut fresh = ResultCursor::new(&table);
    let expected = fresh.fetch_all().unwrap();

    let mut cursor = ResultCursor::new(&table);
    cursor.fetch_one().unwrap();
    cursor.fetch_one().unwrap();
    cursor.scroll(0, ScrollMode::Absolute).unwrap();
    assert_eq!(cursor.fetch_all().unwrap(), expected);
}

#[test]
fn test_independent_cursors_share_result() {
    let table = flux_table();
    let mut first = ResultCursor::new(&table);
    let mut second = ResultCursor::new(&table);

    first.scroll(2, ScrollMode::Absolute).unwrap();
    let a = first.fetch_one().unwrap().unwrap();
    let b = second.fetch_one().unwrap().unwrap();

    assert_eq!(a.values()[0], Value::from("M87"));
    assert_eq!(b.values()[0], Value::from("3C 273"));
    assert_eq!(second.position(), 1);
}

#[test]
fn test_rows_iterator() {
    let table = flux_table();
    let mut cursor = ResultCursor::new(&table);
    cursor.scroll(1, ScrollMode::Relative).unwrap();

    let fluxes: Vec<Option<f64>> = cursor
        .rows()
        .map(|row| row.unwrap().get(1).and_then(Value::to_f64))
        .collect();
    assert_eq!(fluxes, vec![Some(12.9), None]);
}

#[test]
fn test_unsupported_operations() {
    assert!(matches!(
        connect("https://archive.example.org/tap"),
        Err(Error::NotSupported { .. })
    ));

    let table = flux_table();
    let mut cursor = ResultCursor::new(&table);
    let err = cursor.next_set().unwrap_err();
    assert_eq!(err.class(), ErrorClass::NotSupported);
    assert!(err.is_database_error());
}

#[test]
fn test_empty_result() {
    let table = ResultTable::new(vec![FieldDesc::new("id", Datatype::Long)]).unwrap();
    let mut cursor = ResultCursor::new(&table);

    assert_eq!(cursor.rowcount(), 0);
    assert!(cursor.fetch_one().unwrap().is_none());
    assert!(cursor.fetch_many(Some(5)).unwrap().is_empty());
    assert!(cursor.fetch_all().unwrap().is_empty());
    assert_eq!(cursor.get_data_url(), None);
    assert!(matches!(
        cursor.get_by_name("id"),
        Err(Error::NoCurrentRow { position: 0 })
    ));
}

#[test]
fn test_fetched_rows_keep_addressing() {
    let mut table = ResultTable::new(vec![
        FieldDesc::new("ra", Datatype::Double)
            .with_id("RA")
            .with_ucd("pos.eq.ra;meta.main"),
        FieldDesc::new("acref", Datatype::Char).with_utype("ssa:Access.Reference"),
    ])
    .unwrap();
    table
        .push_row(vec![
            Value::Double(187.7),
            Value::from("https://archive.example.org/m87.fits"),
        ])
        .unwrap();
    table
        .push_row(vec![Value::Double(83.6), Value::from("")])
        .unwrap();

    let mut cursor = ResultCursor::new(&table);
    let rows = cursor.fetch_all().unwrap();

    assert_eq!(rows[1].position(), 1);
    assert_eq!(rows[0].get_by_id("RA"), Some(&Value::Double(187.7)));
    assert_eq!(rows[1].get_by_ucd("POS.EQ.RA;META.MAIN"), Some(&Value::Double(83.6)));
    assert_eq!(
        rows[0].get_by_utype("ssa:access.reference"),
        Some(&Value::from("https://archive.example.org/m87.fits"))
    );
    assert_eq!(rows[0].data_url(), Some("https://archive.example.org/m87.fits"));
    assert_eq!(rows[1].data_url(), None);
    assert_eq!(rows[1].get_by_ucd("phot.flux"), None);
}
