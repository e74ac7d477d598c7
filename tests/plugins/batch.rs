use qrtrack::core::db::{BatchInput, RecordStore};
use qrtrack::core::error::QrTrackError;
use qrtrack::core::store::Store;
use qrtrack::plugins::batch::{RecordOptions, record_batch};
use qrtrack::plugins::qr::format_payload;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn decode_qr(path: &Path) -> String {
    let img = image::open(path).expect("open qr png").to_luma8();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(img.width() as usize, img.height() as usize, |x, y| {
            img.get_pixel(x as u32, y as u32).0[0]
        });
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR grid in {}", path.display());
    let (_meta, content) = grids[0].decode().expect("decode qr grid");
    content
}

fn png_count(layout: &Store) -> usize {
    match fs::read_dir(layout.qr_dir()) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
            .count(),
        Err(_) => 0,
    }
}

fn open(layout: &Store) -> RecordStore {
    RecordStore::open(&layout.db_path()).expect("open store")
}

#[test]
fn test_batch_scenario_b001_stores_row_and_scannable_image() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path());
    let store = open(&layout);
    let input = BatchInput {
        batch_id: "B001",
        tanggal: "2024-01-10",
        pic: "Ani",
        tempat_produksi: "Plant A",
        varian_produksi: "Arabica Dark",
    };

    let path = record_batch(&store, &layout, &input, RecordOptions::default()).unwrap();

    assert_eq!(path, tmp.path().join("qr_codes").join("B001.png"));
    let rows = store.fetch_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].as_input(), input);
    assert_eq!(
        decode_qr(&path),
        "Batch ID: B001\nTanggal: 2024-01-10\nPIC: Ani\nTempat Produksi: Plant A\nVarian Produksi: Arabica Dark"
    );
}

#[test]
fn test_batch_any_empty_field_adds_nothing() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path());
    let store = open(&layout);

    let full = BatchInput {
        batch_id: "B010",
        tanggal: "2024-03-01",
        pic: "Budi",
        tempat_produksi: "Roastery 2",
        varian_produksi: "Robusta",
    };
    let variants = [
        BatchInput { batch_id: "", ..full },
        BatchInput { tanggal: "", ..full },
        BatchInput { pic: "", ..full },
        BatchInput { tempat_produksi: " ", ..full },
        BatchInput { varian_produksi: "", ..full },
    ];

    for (input, label) in variants.iter().zip(qrtrack::core::schemas::FIELD_LABELS) {
        let err = record_batch(&store, &layout, input, RecordOptions::default()).unwrap_err();
        match err {
            QrTrackError::MissingFields(fields) => assert_eq!(fields, vec![label]),
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    assert_eq!(store.count().unwrap(), 0);
    assert_eq!(png_count(&layout), 0);
}

#[test]
fn test_batch_rows_come_back_in_submission_order() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path());
    let store = open(&layout);

    let ids = ["B3", "B1", "B2", "B10"];
    for id in ids {
        let input = BatchInput {
            batch_id: id,
            tanggal: "2024-01-10",
            pic: "Ani",
            tempat_produksi: "Plant A",
            varian_produksi: "Arabica Dark",
        };
        record_batch(&store, &layout, &input, RecordOptions::default()).unwrap();
    }

    let rows = store.fetch_all().unwrap();
    let stored: Vec<&str> = rows.iter().map(|r| r.batch_id.as_str()).collect();
    assert_eq!(stored, ids);
    assert_eq!(png_count(&layout), ids.len());
}

#[test]
fn test_batch_same_id_overwrites_image_with_second_payload() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path());
    let store = open(&layout);

    let first = BatchInput {
        batch_id: "DUP",
        tanggal: "2024-01-10",
        pic: "Ani",
        tempat_produksi: "Plant A",
        varian_produksi: "Arabica Dark",
    };
    let second = BatchInput {
        batch_id: "DUP",
        tanggal: "2024-02-20",
        pic: "Citra",
        tempat_produksi: "Plant B",
        varian_produksi: "Liberica Light",
    };

    let p1 = record_batch(&store, &layout, &first, RecordOptions::default()).unwrap();
    let p2 = record_batch(&store, &layout, &second, RecordOptions::default()).unwrap();

    assert_eq!(p1, p2);
    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(png_count(&layout), 1);
    assert_eq!(decode_qr(&p2), format_payload(&second));
}

#[test]
fn test_batch_failed_image_write_rolls_back_row() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path());
    let store = open(&layout);
    // A regular file where the image root should be makes the write fail.
    fs::write(layout.qr_dir(), b"not a directory").unwrap();

    let input = BatchInput {
        batch_id: "B404",
        tanggal: "2024-01-10",
        pic: "Ani",
        tempat_produksi: "Plant A",
        varian_produksi: "Arabica Dark",
    };
    let err = record_batch(&store, &layout, &input, RecordOptions::default()).unwrap_err();
    assert_eq!(err.category(), "io");
    assert_eq!(store.count().unwrap(), 0);

    drop(store);
    assert_eq!(open(&layout).count().unwrap(), 0);
}

#[test]
fn test_batch_rejects_batch_id_that_escapes_image_root() {
    let tmp = tempdir().unwrap();
    let layout = Store::new(tmp.path().join("data"));
    let store = open(&layout);

    let input = BatchInput {
        batch_id: "../outside",
        tanggal: "2024-01-10",
        pic: "Ani",
        tempat_produksi: "Plant A",
        varian_produksi: "Arabica Dark",
    };
    let err = record_batch(&store, &layout, &input, RecordOptions::default()).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.count().unwrap(), 0);
    assert!(!tmp.path().join("data").join("outside.png").exists());
    assert!(!tmp.path().join("outside.png").exists());
}
