use qrtrack::core::db::{BatchInput, RecordStore};
use qrtrack::core::store::Store;
use qrtrack::plugins::batch::{RecordOptions, record_batch};
use qrtrack::plugins::listing::{
    Listing, NOT_FOUND_MARKER, QrCell, render_html, render_listing, render_text,
};
use qrtrack::plugins::qr::{PNG_DATA_URI_PREFIX, image_to_base64};
use std::fs;
use tempfile::tempdir;

fn add(store: &RecordStore, layout: &Store, batch_id: &str, pic: &str) {
    let input = BatchInput {
        batch_id,
        tanggal: "2024-01-10",
        pic,
        tempat_produksi: "Plant A",
        varian_produksi: "Arabica Dark",
    };
    record_batch(store, layout, &input, RecordOptions::default()).unwrap();
}

#[test]
fn test_listing_empty_store_signals_empty_state() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path());
    let store = RecordStore::open(&layout.db_path()).unwrap();

    let listing = render_listing(&store, &layout).unwrap();
    assert!(listing.is_empty());
    assert!(matches!(listing, Listing::Empty));
    assert!(!render_html(&listing, 100).contains("<table"));
}

#[test]
fn test_listing_inlines_image_bytes_as_data_uri() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path());
    let store = RecordStore::open(&layout.db_path()).unwrap();
    add(&store, &layout, "B001", "Ani");

    let listing = render_listing(&store, &layout).unwrap();
    let rows = listing.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].text_cells(),
        ["B001", "2024-01-10", "Ani", "Plant A", "Arabica Dark"]
    );

    let expected = format!(
        "{}{}",
        PNG_DATA_URI_PREFIX,
        image_to_base64(&layout.qr_path("B001")).unwrap()
    );
    match &rows[0].qr_code {
        QrCell::Inline { data_uri, bytes } => {
            assert_eq!(data_uri, &expected);
            assert_eq!(*bytes, fs::read(layout.qr_path("B001")).unwrap().len());
        }
        QrCell::NotFound => panic!("image should be resolvable"),
    }

    let html = render_html(&listing, 120);
    assert!(html.contains(&format!("<img src=\"{}\" width=\"120\">", expected)));
}

#[test]
fn test_listing_missing_image_marks_only_that_row() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path());
    let store = RecordStore::open(&layout.db_path()).unwrap();
    add(&store, &layout, "B001", "Ani");
    add(&store, &layout, "B002", "Budi");
    add(&store, &layout, "B003", "Citra");

    fs::remove_file(layout.qr_path("B002")).unwrap();

    let listing = render_listing(&store, &layout).unwrap();
    let cells: Vec<bool> = listing
        .rows()
        .iter()
        .map(|r| matches!(r.qr_code, QrCell::Inline { .. }))
        .collect();
    assert_eq!(cells, vec![true, false, true]);

    let text = render_text(&listing);
    assert_eq!(text.matches(NOT_FOUND_MARKER).count(), 1);
    assert!(text.contains("Budi"));
}

#[test]
fn test_listing_duplicate_batch_ids_share_latest_image() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path());
    let store = RecordStore::open(&layout.db_path()).unwrap();
    add(&store, &layout, "DUP", "Ani");
    add(&store, &layout, "DUP", "Budi");

    let listing = render_listing(&store, &layout).unwrap();
    let rows = listing.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].qr_code, rows[1].qr_code);
    assert_eq!(rows[0].record.pic, "Ani");
    assert_eq!(rows[1].record.pic, "Budi");
}
