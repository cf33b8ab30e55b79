use std::io::Write;

use stopgo_config::load_trace_csv;
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write csv");
    file.flush().expect("flush csv");
    file
}

#[test]
fn loads_epoch_second_rows() {
    let file = write_csv("ts,x,y\n0,1.5,2.5\n1,3.0,4.0\n2.5,5.0,6.0\n");
    let rows = load_trace_csv(file.path()).expect("load");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].ts, 0.0);
    assert_eq!(rows[2].ts, 2.5);
    assert_eq!(rows[1].x, 3.0);
    assert!(rows.iter().all(|r| r.motion_score.is_none()));
}

#[test]
fn loads_rfc3339_rows_with_motion_column() {
    let file = write_csv(
        "ts,x,y,motion_score\n\
         2024-05-01T08:30:00Z,1.0,2.0,0.4\n\
         2024-05-01T08:30:01Z,3.0,4.0,\n",
    );
    let rows = load_trace_csv(file.path()).expect("load");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].ts - rows[0].ts, 1.0);
    assert_eq!(rows[0].motion_score, Some(0.4));
    assert_eq!(rows[1].motion_score, None);
}

#[test]
fn rejects_wrong_headers() {
    let file = write_csv("time,lat,lng\n0,1,2\n");
    let err = load_trace_csv(file.path()).expect_err("bad headers");
    assert!(format!("{err}").contains("must have headers"));
}

#[test]
fn rejects_out_of_order_timestamps_naming_the_line() {
    let file = write_csv("ts,x,y\n10,1.0,1.0\n5,2.0,2.0\n");
    let err = load_trace_csv(file.path()).expect_err("regression in ts");
    let message = format!("{err}");
    assert!(message.contains("line 3"), "got: {message}");
    assert!(message.contains("non-decreasing"));
}

#[test]
fn rejects_unparseable_cells_naming_the_line() {
    let file = write_csv("ts,x,y\n0,1.0,1.0\nsoon,2.0,2.0\n");
    let err = load_trace_csv(file.path()).expect_err("bad ts cell");
    assert!(format!("{err}").contains("line 3"));
}
